use sasb_core::{NewService, Service, ServiceId, ServiceUpdate};

use super::ApiClient;
use crate::error::ClientError;
use crate::transport::ApiRequest;

fn service_path(id: ServiceId) -> String {
    format!("/services/{id}/")
}

impl ApiClient {
    /// Catalog listing, optionally filtered by a name search.
    pub async fn list_services(&self, search: Option<&str>) -> Result<Vec<Service>, ClientError> {
        let mut request = ApiRequest::get("/services/");
        if let Some(term) = search.map(str::trim).filter(|t| !t.is_empty()) {
            request = request.query("search", term);
        }
        self.fetch(request).await
    }

    pub async fn get_service(&self, id: ServiceId) -> Result<Service, ClientError> {
        self.get_json(&service_path(id)).await
    }

    pub async fn create_service(&self, service: &NewService) -> Result<Service, ClientError> {
        self.post_json("/services/", service).await
    }

    pub async fn update_service(&self, id: ServiceId, update: &ServiceUpdate) -> Result<Service, ClientError> {
        self.patch_json(&service_path(id), update).await
    }

    /// Rejected with 400 `service_has_future_appointments` while the service
    /// is still booked; see [`ClientError::api_error`].
    pub async fn delete_service(&self, id: ServiceId) -> Result<(), ClientError> {
        self.delete(&service_path(id)).await
    }
}
