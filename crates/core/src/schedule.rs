//! Appointments and their lifecycle.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Service;
use crate::id::{AppointmentId, ServiceId, UserId};
use crate::staff::StaffMember;

/// Appointment status lifecycle: `reserved` → `cancelled` | `completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Reserved,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Reserved => "reserved",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::Completed => "completed",
        }
    }
}

/// An appointment with its service and assigned professional expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: AppointmentId,
    pub client_name: String,
    pub client_contact: String,
    pub service: Service,
    pub employee: StaffMember,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    pub status: AppointmentStatus,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub created_at: Option<DateTime<FixedOffset>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<FixedOffset>>,
}

impl Appointment {
    pub fn is_assigned_to(&self, user_id: UserId) -> bool {
        self.employee.id == user_id
    }

    /// Only reserved appointments that have not started yet can be cancelled.
    pub fn can_cancel_at(&self, now: DateTime<Utc>) -> bool {
        self.status == AppointmentStatus::Reserved && now <= self.start_time.with_timezone(&Utc)
    }

    /// Only reserved appointments that already started can be completed.
    pub fn can_complete_at(&self, now: DateTime<Utc>) -> bool {
        self.status == AppointmentStatus::Reserved && now >= self.start_time.with_timezone(&Utc)
    }
}

/// Payload for booking an appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewAppointment {
    pub client_name: String,
    pub client_contact: String,
    pub service_id: ServiceId,
    pub employee_id: UserId,
    /// ISO 8601 timestamp; naive values are interpreted in the server's zone.
    pub start_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update of an appointment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AppointmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<ServiceId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employee_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<AppointmentStatus>,
}

impl AppointmentUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn sample_appointment_json() -> serde_json::Value {
        json!({
            "id": 10,
            "client_name": "Ana",
            "client_contact": "(11) 99999-0000",
            "service": {
                "id": 3,
                "name": "Corte",
                "duration": 30,
                "price": "50.00",
                "is_active": true,
                "can_delete": false
            },
            "employee": {
                "id": 5,
                "username": "joana",
                "first_name": "Joana",
                "last_name": "Lima",
                "email": "joana@example.com",
                "phone": "",
                "role": "PROFESSIONAL",
                "is_active": true
            },
            "start_time": "2030-05-01T10:00:00-03:00",
            "end_time": "2030-05-01T10:30:00-03:00",
            "status": "reserved",
            "notes": ""
        })
    }

    #[test]
    fn decodes_expanded_appointment() {
        let appt: Appointment = serde_json::from_value(sample_appointment_json()).unwrap();
        assert_eq!(appt.status, AppointmentStatus::Reserved);
        assert!(appt.is_assigned_to(UserId::new(5)));
        assert_eq!(appt.end_time - appt.start_time, chrono::Duration::minutes(30));
    }

    #[test]
    fn cancel_and_complete_windows() {
        let appt: Appointment = serde_json::from_value(sample_appointment_json()).unwrap();
        let before = Utc.with_ymd_and_hms(2030, 5, 1, 12, 0, 0).unwrap();
        let after = Utc.with_ymd_and_hms(2030, 5, 1, 14, 0, 0).unwrap();

        assert!(appt.can_cancel_at(before));
        assert!(!appt.can_complete_at(before));
        assert!(!appt.can_cancel_at(after));
        assert!(appt.can_complete_at(after));

        let done = Appointment {
            status: AppointmentStatus::Completed,
            ..appt
        };
        assert!(!done.can_cancel_at(before));
        assert!(!done.can_complete_at(after));
    }

    #[test]
    fn empty_update_is_detected() {
        assert!(AppointmentUpdate::default().is_empty());
        let update = AppointmentUpdate {
            notes: Some("trazer referência".into()),
            ..AppointmentUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
