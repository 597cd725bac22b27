//! Role → permission mapping.

use crate::Permission;

pub use sasb_core::Role;

/// Permissions granted to each role.
///
/// Adding a role to [`Role`] fails to compile until it is given a grant set
/// here.
pub fn permissions_for(role: Role) -> &'static [Permission] {
    match role {
        Role::Admin => &[
            Permission::ViewCatalog,
            Permission::ManageCatalog,
            Permission::ManageStaff,
            Permission::ViewAppointments,
            Permission::ManageAppointments,
        ],
        Role::Employee => &[
            Permission::ViewCatalog,
            Permission::ViewAppointments,
            Permission::ManageAppointments,
        ],
        Role::Professional => &[Permission::ViewCatalog, Permission::ViewAppointments],
    }
}

/// Whether `role` holds `permission`.
pub fn grants(role: Role, permission: Permission) -> bool {
    permissions_for(role).contains(&permission)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_admin_manages_staff_and_catalog() {
        for role in Role::ALL {
            let is_admin = role == Role::Admin;
            assert_eq!(grants(role, Permission::ManageStaff), is_admin);
            assert_eq!(grants(role, Permission::ManageCatalog), is_admin);
        }
    }

    #[test]
    fn front_desk_manages_appointments() {
        assert!(grants(Role::Admin, Permission::ManageAppointments));
        assert!(grants(Role::Employee, Permission::ManageAppointments));
        assert!(!grants(Role::Professional, Permission::ManageAppointments));
    }

    #[test]
    fn everyone_can_view() {
        for role in Role::ALL {
            assert!(grants(role, Permission::ViewCatalog));
            assert!(grants(role, Permission::ViewAppointments));
        }
    }
}
