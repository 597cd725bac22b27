//! Client-side form validation.
//!
//! Each form validates every field and reports all failures at once, so the
//! caller can flag each offending input. A validated form converts into the
//! typed payload sent to the API.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime};
use regex::Regex;
use serde::{Serialize, Serializer};

use crate::catalog::{NewService, ServiceUpdate};
use crate::error::DomainError;
use crate::id::{ServiceId, UserId};
use crate::schedule::{Appointment, AppointmentUpdate, NewAppointment};
use crate::staff::{NewStaffMember, Role, StaffUpdate};
use crate::value_object::{Price, ServiceDuration};

static DURATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").expect("valid regex"));
static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+([.,]\d{1,2})?$").expect("valid regex"));
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("valid regex"));

pub const MIN_PASSWORD_LEN: usize = 6;

/// Validation failures keyed by form field, in the order they were found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(&'static str, String)>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a failure; the first message for a field wins.
    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.0.push((field, message.into()));
        }
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, m)| m.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(f, m)| (*f, m.as_str()))
    }

    /// `Ok(())` when nothing was recorded.
    pub fn into_result(self) -> Result<(), DomainError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(DomainError::InvalidForm(self))
        }
    }
}

impl core::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for (i, (field, message)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(f, m)| (*f, m)))
    }
}

fn require(errors: &mut FieldErrors, field: &'static str, value: &str, message: &str) -> bool {
    if value.trim().is_empty() {
        errors.add(field, message);
        false
    } else {
        true
    }
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// Login
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        let mut errors = FieldErrors::new();
        require(&mut errors, "username", &self.username, "username is required");
        // Passwords are not trimmed before sending, but a blank one is never valid.
        require(&mut errors, "password", &self.password, "password is required");
        errors.into_result()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Service
// ─────────────────────────────────────────────────────────────────────────────

/// Raw service form input, as typed by the user.
#[derive(Debug, Clone, Default)]
pub struct ServiceForm {
    pub name: String,
    pub duration: String,
    pub price: String,
}

impl ServiceForm {
    fn check(&self) -> (FieldErrors, Option<ServiceDuration>, Option<Price>) {
        let mut errors = FieldErrors::new();
        require(&mut errors, "name", &self.name, "service name is required");

        let duration = self.duration.trim();
        let duration = if duration.is_empty() {
            errors.add("duration", "duration is required");
            None
        } else if !DURATION_RE.is_match(duration) {
            errors.add("duration", "duration must contain only digits");
            None
        } else {
            match duration
                .parse::<u32>()
                .map_err(|_| DomainError::validation("duration is too large"))
                .and_then(ServiceDuration::from_minutes)
            {
                Ok(d) => Some(d),
                Err(e) => {
                    errors.add("duration", domain_message(e));
                    None
                }
            }
        };

        let price = self.price.trim();
        let price = if price.is_empty() {
            errors.add("price", "price is required");
            None
        } else if !PRICE_RE.is_match(price) {
            errors.add("price", "price must be a valid monetary amount");
            None
        } else {
            match price.parse::<Price>() {
                Ok(p) => Some(p),
                Err(e) => {
                    errors.add("price", domain_message(e));
                    None
                }
            }
        };

        (errors, duration, price)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.check().0.into_result()
    }

    pub fn into_new_service(self) -> Result<NewService, DomainError> {
        let (errors, duration, price) = self.check();
        errors.into_result()?;
        match (duration, price) {
            (Some(duration), Some(price)) => Ok(NewService {
                name: self.name.trim().to_string(),
                duration,
                price,
            }),
            _ => Err(DomainError::validation("service form is incomplete")),
        }
    }

    /// Full replacement of the editable service fields.
    pub fn into_update(self) -> Result<ServiceUpdate, DomainError> {
        let service = self.into_new_service()?;
        Ok(ServiceUpdate {
            name: Some(service.name),
            duration: Some(service.duration),
            price: Some(service.price),
            is_active: None,
        })
    }
}

fn domain_message(err: DomainError) -> String {
    match err {
        DomainError::Validation(msg) => msg,
        other => other.to_string(),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Staff
// ─────────────────────────────────────────────────────────────────────────────

/// Raw staff form input (create and edit share the same fields).
#[derive(Debug, Clone, Default)]
pub struct StaffForm {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub role: Option<Role>,
}

impl StaffForm {
    fn check(&self, password_required: bool) -> FieldErrors {
        let mut errors = FieldErrors::new();
        require(&mut errors, "username", &self.username, "username is required");
        require(&mut errors, "first_name", &self.first_name, "first name is required");
        require(&mut errors, "last_name", &self.last_name, "last name is required");

        if require(&mut errors, "email", &self.email, "email is required")
            && !EMAIL_RE.is_match(self.email.trim())
        {
            errors.add("email", "email is invalid");
        }

        if self.password.is_empty() {
            if password_required {
                errors.add("password", "password is required");
            }
        } else if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add(
                "password",
                format!("password must have at least {MIN_PASSWORD_LEN} characters"),
            );
        }

        errors
    }

    pub fn validate_create(&self) -> Result<(), DomainError> {
        self.check(true).into_result()
    }

    pub fn validate_update(&self) -> Result<(), DomainError> {
        self.check(false).into_result()
    }

    /// Build a creation payload; an unset role defaults to `EMPLOYEE`.
    pub fn into_new_member(self) -> Result<NewStaffMember, DomainError> {
        self.validate_create()?;
        Ok(NewStaffMember {
            username: self.username.trim().to_lowercase(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password,
            phone: non_blank(&self.phone),
            role: self.role.unwrap_or(Role::Employee),
        })
    }

    /// Build an edit payload; an empty password leaves the current one intact.
    pub fn into_update(self) -> Result<StaffUpdate, DomainError> {
        self.validate_update()?;
        Ok(StaffUpdate {
            username: Some(self.username.trim().to_lowercase()),
            first_name: Some(self.first_name.trim().to_string()),
            last_name: Some(self.last_name.trim().to_string()),
            email: Some(self.email.trim().to_string()),
            password: (!self.password.is_empty()).then_some(self.password),
            phone: Some(self.phone.trim().to_string()),
            role: self.role,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Appointment
// ─────────────────────────────────────────────────────────────────────────────

/// Raw appointment form input.
#[derive(Debug, Clone, Default)]
pub struct AppointmentForm {
    pub client_name: String,
    pub client_contact: String,
    pub service_id: Option<ServiceId>,
    pub employee_id: Option<UserId>,
    /// RFC 3339 or `YYYY-MM-DDTHH:MM[:SS]`.
    pub start_time: String,
    pub notes: String,
}

/// Parse a start time and normalize it for the API.
///
/// Offsets are preserved; naive values are sent without an offset and are
/// interpreted in the server's time zone.
pub fn normalize_start_time(raw: &str) -> Result<String, DomainError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.to_rfc3339());
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string())
        .ok_or_else(|| {
            DomainError::validation("invalid date/time format (e.g. YYYY-MM-DDTHH:MM:SS)")
        })
}

impl AppointmentForm {
    /// Prefill the form from an existing appointment (edit flow).
    pub fn from_appointment(appt: &Appointment) -> Self {
        Self {
            client_name: appt.client_name.clone(),
            client_contact: appt.client_contact.clone(),
            service_id: Some(appt.service.id),
            employee_id: Some(appt.employee.id),
            start_time: appt.start_time.to_rfc3339(),
            notes: appt.notes.clone(),
        }
    }

    fn check(&self) -> (FieldErrors, Option<String>) {
        let mut errors = FieldErrors::new();
        require(&mut errors, "client_name", &self.client_name, "client name is required");
        require(
            &mut errors,
            "client_contact",
            &self.client_contact,
            "client contact is required",
        );
        if self.service_id.is_none() {
            errors.add("service_id", "service is required");
        }
        if self.employee_id.is_none() {
            errors.add("employee_id", "professional is required");
        }

        let start = if require(&mut errors, "start_time", &self.start_time, "date and time are required") {
            match normalize_start_time(&self.start_time) {
                Ok(s) => Some(s),
                Err(e) => {
                    errors.add("start_time", domain_message(e));
                    None
                }
            }
        } else {
            None
        };

        (errors, start)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.check().0.into_result()
    }

    pub fn into_new_appointment(self) -> Result<NewAppointment, DomainError> {
        let (errors, start) = self.check();
        errors.into_result()?;
        match (self.service_id, self.employee_id, start) {
            (Some(service_id), Some(employee_id), Some(start_time)) => Ok(NewAppointment {
                client_name: self.client_name.trim().to_string(),
                client_contact: self.client_contact.trim().to_string(),
                service_id,
                employee_id,
                start_time,
                notes: non_blank(&self.notes),
            }),
            _ => Err(DomainError::validation("appointment form is incomplete")),
        }
    }

    /// Diff against the stored appointment; only changed fields are sent.
    pub fn into_update(self, current: &Appointment) -> Result<AppointmentUpdate, DomainError> {
        let new = self.into_new_appointment()?;
        let start_changed = DateTime::parse_from_rfc3339(&new.start_time)
            .map(|dt| dt != current.start_time)
            .unwrap_or(true);
        let notes = new.notes.unwrap_or_default();

        Ok(AppointmentUpdate {
            client_name: (new.client_name != current.client_name).then_some(new.client_name),
            client_contact: (new.client_contact != current.client_contact)
                .then_some(new.client_contact),
            service_id: (new.service_id != current.service.id).then_some(new.service_id),
            employee_id: (new.employee_id != current.employee.id).then_some(new.employee_id),
            start_time: start_changed.then_some(new.start_time),
            notes: (notes != current.notes).then_some(notes),
            status: None,
        })
    }
}
