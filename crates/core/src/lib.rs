//! `sasb-core` — domain foundation for the salon scheduling client.
//!
//! This crate contains **pure domain** types (no HTTP, no storage): identifiers,
//! staff/catalog/schedule models as exchanged with the API, and the client-side
//! form validation rules.

pub mod catalog;
pub mod error;
pub mod id;
pub mod schedule;
pub mod staff;
pub mod validation;
pub mod value_object;

pub use catalog::{NewService, Service, ServiceUpdate};
pub use error::{DomainError, DomainResult};
pub use id::{AppointmentId, ServiceId, UserId};
pub use schedule::{Appointment, AppointmentStatus, AppointmentUpdate, NewAppointment};
pub use staff::{NewStaffMember, Role, StaffMember, StaffUpdate};
pub use validation::FieldErrors;
pub use value_object::{Price, ServiceDuration, ValueObject};
