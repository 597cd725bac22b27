use serde::Serialize;
use thiserror::Error;

use sasb_core::{Appointment, AppointmentStatus, AppointmentUpdate};

use crate::roles::grants;
use crate::{Permission, Role, UserIdentity};

#[derive(Debug, Error, Clone, PartialEq, Eq, Serialize)]
pub enum AccessError {
    #[error("not authenticated")]
    Unauthenticated,

    #[error("account is inactive")]
    Inactive,

    #[error("forbidden: role {role} lacks permission '{permission}'")]
    Forbidden { role: Role, permission: Permission },

    #[error("appointment is assigned to another professional")]
    NotAssigned,

    #[error("completed appointments cannot be changed")]
    AppointmentClosed,

    #[error("role {role} cannot assign appointments to another professional")]
    ReassignForbidden { role: Role },
}

/// Authorize the current caller for `required`.
///
/// - No IO
/// - No panics
/// - `None` means the session has no user (anonymous or still loading)
pub fn authorize(user: Option<&UserIdentity>, required: Permission) -> Result<(), AccessError> {
    let user = user.ok_or(AccessError::Unauthenticated)?;
    if !user.is_active {
        return Err(AccessError::Inactive);
    }
    if grants(user.role, required) {
        Ok(())
    } else {
        tracing::debug!(
            username = %user.username,
            role = %user.role,
            permission = %required,
            "access denied"
        );
        Err(AccessError::Forbidden {
            role: user.role,
            permission: required,
        })
    }
}

/// Whether `user` may edit, cancel or complete `appointment`.
///
/// Administrators and employees may change any open appointment; a
/// professional only the ones assigned to them. Completed appointments are
/// frozen for everyone.
pub fn can_modify_appointment(user: &UserIdentity, appointment: &Appointment) -> bool {
    require_appointment_change(Some(user), appointment).is_ok()
}

pub fn require_appointment_change(
    user: Option<&UserIdentity>,
    appointment: &Appointment,
) -> Result<(), AccessError> {
    let user = user.ok_or(AccessError::Unauthenticated)?;
    if !user.is_active {
        return Err(AccessError::Inactive);
    }

    match user.role {
        Role::Admin | Role::Employee => {}
        Role::Professional => {
            if !appointment.is_assigned_to(user.id) {
                return Err(AccessError::NotAssigned);
            }
        }
    }

    match appointment.status {
        AppointmentStatus::Completed => Err(AccessError::AppointmentClosed),
        AppointmentStatus::Reserved | AppointmentStatus::Cancelled => Ok(()),
    }
}

/// Whether `user` may move an appointment to a different professional.
pub fn can_reassign_professional(user: &UserIdentity) -> bool {
    match user.role {
        Role::Admin | Role::Employee => true,
        Role::Professional => false,
    }
}

/// Check a partial update of `appointment` before it is sent.
pub fn require_appointment_update(
    user: Option<&UserIdentity>,
    appointment: &Appointment,
    update: &AppointmentUpdate,
) -> Result<(), AccessError> {
    require_appointment_change(user, appointment)?;
    let user = user.ok_or(AccessError::Unauthenticated)?;

    let reassigns = update
        .employee_id
        .is_some_and(|employee| !appointment.is_assigned_to(employee));
    if reassigns && !can_reassign_professional(user) {
        tracing::debug!(username = %user.username, appointment = %appointment.id, "reassignment denied");
        return Err(AccessError::ReassignForbidden { role: user.role });
    }
    Ok(())
}
