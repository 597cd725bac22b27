use serde::{Deserialize, Serialize};

/// Something a signed-in staff member may be allowed to do.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// List and read services.
    ViewCatalog,
    /// Create, edit and delete services.
    ManageCatalog,
    /// Create, edit and delete staff accounts.
    ManageStaff,
    /// List and read appointments.
    ViewAppointments,
    /// Book, edit, cancel and complete any appointment.
    ManageAppointments,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ViewCatalog => "catalog.read",
            Permission::ManageCatalog => "catalog.write",
            Permission::ManageStaff => "staff.write",
            Permission::ViewAppointments => "appointments.read",
            Permission::ManageAppointments => "appointments.write",
        }
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
