use serde::{Deserialize, Serialize};

use sasb_core::{Appointment, AppointmentId, AppointmentUpdate, NewAppointment};

use super::ApiClient;
use crate::error::ClientError;

/// Acknowledgement returned by the cancel and complete actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub status: String,
    #[serde(default)]
    pub message: String,
}

fn appointment_path(id: AppointmentId) -> String {
    format!("/appointments/{id}/")
}

impl ApiClient {
    /// Appointments visible to the caller; professionals only see their own.
    pub async fn list_appointments(&self) -> Result<Vec<Appointment>, ClientError> {
        self.get_json("/appointments/").await
    }

    pub async fn get_appointment(&self, id: AppointmentId) -> Result<Appointment, ClientError> {
        self.get_json(&appointment_path(id)).await
    }

    pub async fn create_appointment(&self, appointment: &NewAppointment) -> Result<Appointment, ClientError> {
        self.post_json("/appointments/", appointment).await
    }

    pub async fn update_appointment(
        &self,
        id: AppointmentId,
        update: &AppointmentUpdate,
    ) -> Result<Appointment, ClientError> {
        self.patch_json(&appointment_path(id), update).await
    }

    pub async fn delete_appointment(&self, id: AppointmentId) -> Result<(), ClientError> {
        self.delete(&appointment_path(id)).await
    }

    /// Cancel a reserved appointment that has not started yet.
    pub async fn cancel_appointment(&self, id: AppointmentId) -> Result<ActionOutcome, ClientError> {
        self.post_json(&format!("/appointments/{id}/cancel/"), &serde_json::json!({}))
            .await
    }

    /// Mark a reserved appointment that already started as completed.
    pub async fn complete_appointment(&self, id: AppointmentId) -> Result<ActionOutcome, ClientError> {
        self.post_json(&format!("/appointments/{id}/complete/"), &serde_json::json!({}))
            .await
    }
}

#[cfg(test)]
mod tests {
    use reqwest::{Method, StatusCode};
    use serde_json::json;

    use super::*;
    use crate::api::testing::{appointment_json, client};
    use crate::transport::scripted::ScriptedTransport;
    use sasb_core::{AppointmentStatus, ServiceId, UserId};

    #[tokio::test]
    async fn list_decodes_nested_service_and_employee() {
        let (client, _) = client(
            ScriptedTransport::new().reply(200, json!([appointment_json(1, "reserved")])),
        );

        let appointments = client.list_appointments().await.unwrap();

        assert_eq!(appointments[0].service.name, "Corte");
        assert!(appointments[0].is_assigned_to(UserId::new(7)));
        assert_eq!(appointments[0].status, AppointmentStatus::Reserved);
    }

    #[tokio::test]
    async fn create_posts_ids_and_start_time() {
        let (client, transport) = client(
            ScriptedTransport::new().reply(201, appointment_json(2, "reserved")),
        );

        let new = NewAppointment {
            client_name: "Joana".into(),
            client_contact: "joana@example.com".into(),
            service_id: ServiceId::new(1),
            employee_id: UserId::new(7),
            start_time: "2030-05-01T10:00:00".into(),
            notes: None,
        };
        let created = client.create_appointment(&new).await.unwrap();

        assert_eq!(created.id, AppointmentId::new(2));
        assert_eq!(
            transport.requests()[0].body,
            Some(json!({
                "client_name": "Joana",
                "client_contact": "joana@example.com",
                "service_id": 1,
                "employee_id": 7,
                "start_time": "2030-05-01T10:00:00"
            }))
        );
    }

    #[tokio::test]
    async fn cancel_and_complete_use_action_endpoints() {
        let (client, transport) = client(
            ScriptedTransport::new()
                .reply(200, json!({"status": "success", "message": "Agendamento cancelado com sucesso"}))
                .reply(200, json!({"status": "success", "message": "Agendamento concluído com sucesso"})),
        );

        let cancelled = client.cancel_appointment(AppointmentId::new(3)).await.unwrap();
        let completed = client.complete_appointment(AppointmentId::new(4)).await.unwrap();

        assert_eq!(cancelled.status, "success");
        assert_eq!(completed.message, "Agendamento concluído com sucesso");
        let sent = transport.requests();
        assert!(sent.iter().all(|r| r.method == Method::POST));
        assert_eq!(
            transport.paths(),
            vec!["/appointments/3/cancel/", "/appointments/4/complete/"]
        );
    }

    #[tokio::test]
    async fn cancel_rejection_carries_backend_message() {
        let (client, _) = client(ScriptedTransport::new().reply(
            400,
            json!({"status": "error", "message": "Não é possível cancelar um agendamento que já começou."}),
        ));

        let err = client
            .cancel_appointment(AppointmentId::new(5))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(
            err.api_error().and_then(|b| b.summary()).as_deref(),
            Some("Não é possível cancelar um agendamento que já começou.")
        );
    }

    #[tokio::test]
    async fn update_patches_only_changed_fields() {
        let (client, transport) = client(
            ScriptedTransport::new().reply(200, appointment_json(6, "reserved")),
        );

        let update = AppointmentUpdate {
            notes: Some("trazer referência".into()),
            ..AppointmentUpdate::default()
        };
        client
            .update_appointment(AppointmentId::new(6), &update)
            .await
            .unwrap();

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, Method::PATCH);
        assert_eq!(sent.path, "/appointments/6/");
        assert_eq!(sent.body, Some(json!({"notes": "trazer referência"})));
    }
}
