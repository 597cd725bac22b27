//! Staff members: administrators, front-desk employees and professionals.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::id::UserId;

/// Role of a staff member.
///
/// The set is closed: every access decision matches on it exhaustively, so a
/// new role cannot slip through unhandled.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    Employee,
    Professional,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Employee, Role::Professional];

    /// Wire name used by the API (`ADMIN`, `EMPLOYEE`, `PROFESSIONAL`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Employee => "EMPLOYEE",
            Role::Professional => "PROFESSIONAL",
        }
    }

    /// Human-facing label shown next to the logged-in user.
    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Administrador",
            Role::Employee => "Funcionário",
            Role::Professional => "Profissional",
        }
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::UnknownRole(wanted.to_string()))
    }
}

/// A staff member as returned by the users endpoints and by `/me/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: UserId,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub phone: Option<String>,
    pub role: Role,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl StaffMember {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

fn default_true() -> bool {
    true
}

/// The API returns an empty string for an unset phone.
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.trim().is_empty()))
}

/// Payload for creating a staff member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewStaffMember {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub role: Role,
}

/// Partial update of a staff member (PATCH semantics: absent fields untouched).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StaffUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn role_parses_case_insensitively() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!(" PROFESSIONAL ".parse::<Role>().unwrap(), Role::Professional);
        assert!(matches!("manager".parse::<Role>(), Err(DomainError::UnknownRole(_))));
    }

    #[test]
    fn staff_member_decodes_api_shape() {
        let member: StaffMember = serde_json::from_value(json!({
            "id": 1,
            "username": "maria",
            "first_name": "Maria",
            "last_name": "Silva",
            "email": "maria@example.com",
            "phone": "",
            "role": "ADMIN",
            "is_staff": true,
            "is_active": true
        }))
        .unwrap();

        assert_eq!(member.id, UserId::new(1));
        assert_eq!(member.role, Role::Admin);
        assert_eq!(member.phone, None);
        assert_eq!(member.full_name(), "Maria Silva");
    }

    #[test]
    fn unknown_role_fails_to_decode() {
        let res = serde_json::from_value::<StaffMember>(json!({
            "id": 2,
            "username": "x",
            "first_name": "",
            "last_name": "",
            "email": "x@example.com",
            "role": "Administrador"
        }));
        assert!(res.is_err());
    }

    #[test]
    fn update_omits_untouched_fields() {
        let update = StaffUpdate {
            email: Some("new@example.com".into()),
            ..StaffUpdate::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({ "email": "new@example.com" })
        );
    }
}
