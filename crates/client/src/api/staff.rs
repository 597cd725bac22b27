use sasb_core::{NewStaffMember, Role, StaffMember, StaffUpdate, UserId};

use super::ApiClient;
use crate::error::ClientError;
use crate::transport::ApiRequest;

/// Set of roles to filter `/users/` by; empty means everyone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleFilter(Vec<Role>);

impl RoleFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn only(roles: impl IntoIterator<Item = Role>) -> Self {
        let mut picked: Vec<Role> = Vec::new();
        for role in roles {
            if !picked.contains(&role) {
                picked.push(role);
            }
        }
        Self(picked)
    }

    /// `role` query value, e.g. `EMPLOYEE,PROFESSIONAL`.
    fn query_value(&self) -> Option<String> {
        if self.0.is_empty() {
            return None;
        }
        Some(
            self.0
                .iter()
                .map(Role::as_str)
                .collect::<Vec<_>>()
                .join(","),
        )
    }
}

fn user_path(id: UserId) -> String {
    format!("/users/{id}/")
}

/// Creation endpoint for a role.
fn create_path(role: Role) -> &'static str {
    match role {
        Role::Employee => "/employees/",
        Role::Professional => "/professionals/",
        Role::Admin => "/users/",
    }
}

impl ApiClient {
    pub async fn list_users(&self, filter: &RoleFilter) -> Result<Vec<StaffMember>, ClientError> {
        let mut request = ApiRequest::get("/users/");
        if let Some(roles) = filter.query_value() {
            request = request.query("role", roles);
        }
        self.fetch(request).await
    }

    pub async fn get_user(&self, id: UserId) -> Result<StaffMember, ClientError> {
        self.get_json(&user_path(id)).await
    }

    pub async fn list_employees(&self) -> Result<Vec<StaffMember>, ClientError> {
        self.get_json("/employees/").await
    }

    pub async fn list_professionals(&self) -> Result<Vec<StaffMember>, ClientError> {
        self.get_json("/professionals/").await
    }

    pub async fn create_user(&self, member: &NewStaffMember) -> Result<StaffMember, ClientError> {
        self.post_json(create_path(member.role), member).await
    }

    pub async fn update_user(&self, id: UserId, update: &StaffUpdate) -> Result<StaffMember, ClientError> {
        self.patch_json(&user_path(id), update).await
    }

    pub async fn delete_user(&self, id: UserId) -> Result<(), ClientError> {
        self.delete(&user_path(id)).await
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;
    use serde_json::json;

    use super::*;
    use crate::api::testing::{client, staff_json};
    use crate::transport::scripted::ScriptedTransport;

    #[test]
    fn role_filter_joins_with_commas() {
        assert_eq!(RoleFilter::all().query_value(), None);
        assert_eq!(
            RoleFilter::only([Role::Employee, Role::Professional, Role::Employee]).query_value(),
            Some("EMPLOYEE,PROFESSIONAL".to_string())
        );
    }

    #[tokio::test]
    async fn list_users_sends_role_filter() {
        let (client, transport) = client(
            ScriptedTransport::new().reply(200, json!([staff_json(2, "EMPLOYEE"), staff_json(3, "PROFESSIONAL")])),
        );

        let users = client
            .list_users(&RoleFilter::only([Role::Employee, Role::Professional]))
            .await
            .unwrap();

        assert_eq!(users.len(), 2);
        assert_eq!(
            transport.requests()[0].query,
            vec![("role".to_string(), "EMPLOYEE,PROFESSIONAL".to_string())]
        );
    }

    #[tokio::test]
    async fn create_picks_endpoint_by_role() {
        let (client, transport) = client(
            ScriptedTransport::new()
                .reply(201, staff_json(5, "PROFESSIONAL"))
                .reply(201, staff_json(6, "ADMIN")),
        );

        let mut member = NewStaffMember {
            username: "bia".into(),
            first_name: "Bia".into(),
            last_name: "Lima".into(),
            email: "bia@example.com".into(),
            password: "secret1".into(),
            phone: None,
            role: Role::Professional,
        };
        client.create_user(&member).await.unwrap();
        member.role = Role::Admin;
        client.create_user(&member).await.unwrap();

        assert_eq!(transport.paths(), vec!["/professionals/", "/users/"]);
        assert_eq!(transport.requests()[0].body.as_ref().unwrap()["role"], "PROFESSIONAL");
    }

    #[tokio::test]
    async fn update_and_delete_target_user_path() {
        let (client, transport) = client(
            ScriptedTransport::new()
                .reply(200, staff_json(4, "EMPLOYEE"))
                .reply(204, json!(null)),
        );

        let update = StaffUpdate {
            phone: Some("11 99999-0000".into()),
            ..StaffUpdate::default()
        };
        client.update_user(UserId::new(4), &update).await.unwrap();
        client.delete_user(UserId::new(4)).await.unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].method, Method::PATCH);
        assert_eq!(sent[0].body, Some(json!({"phone": "11 99999-0000"})));
        assert_eq!(sent[1].method, Method::DELETE);
        assert_eq!(sent[1].path, "/users/4/");
    }
}
