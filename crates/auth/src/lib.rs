//! `sasb-auth` — identity and role-based access decisions for the client.
//!
//! No HTTP and no storage here: this crate only knows
//! who the caller is and what that caller may do.

pub mod authorize;
pub mod identity;
pub mod permissions;
pub mod roles;

pub use authorize::{
    AccessError, authorize, can_modify_appointment, can_reassign_professional,
    require_appointment_change, require_appointment_update,
};
pub use identity::{TokenPair, UserIdentity};
pub use permissions::Permission;
pub use roles::Role;
