//! Typed access to the salon API.
//!
//! `ApiClient` owns the session and the pipeline; every method here goes
//! through [`AuthPipeline::execute`] except the token exchange in `login`.

mod appointments;
mod auth;
mod services;
mod staff;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

use sasb_auth::UserIdentity;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::pipeline::AuthPipeline;
use crate::session::{AuthState, IdentityProvider, Session};
use crate::storage::{FileTokenStore, TokenStore};
use crate::transport::{ApiRequest, ApiResponse, HttpTransport, ReqwestTransport};

pub use appointments::ActionOutcome;
pub use staff::RoleFilter;

#[derive(Clone)]
pub struct ApiClient {
    pipeline: AuthPipeline,
}

impl ApiClient {
    /// Client talking to `config.api_url` with tokens persisted at
    /// `config.token_path`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        let transport = ReqwestTransport::new(&config.api_url, &config.user_agent)?;
        let store = FileTokenStore::new(&config.token_path);
        Ok(Self::with_parts(Arc::new(transport), Arc::new(store)))
    }

    pub fn with_parts(transport: Arc<dyn HttpTransport>, store: Arc<dyn TokenStore>) -> Self {
        let session = Arc::new(Session::new(store));
        Self {
            pipeline: AuthPipeline::new(transport, session),
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        self.pipeline.session()
    }

    pub fn pipeline(&self) -> &AuthPipeline {
        &self.pipeline
    }

    /// Restore the persisted session. See [`Session::initialize`].
    pub async fn initialize(&self) -> AuthState {
        self.session().initialize(self).await
    }

    pub fn logout(&self) {
        self.session().logout();
    }

    /// Generic authenticated request for endpoints without a typed wrapper.
    pub async fn request(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        self.pipeline.execute(request).await
    }

    async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ClientError> {
        self.pipeline.execute(request).await?.json()
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        self.fetch(ApiRequest::get(path)).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch(ApiRequest::post(path).json(body)?).await
    }

    async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        self.fetch(ApiRequest::patch(path).json(body)?).await
    }

    async fn delete(&self, path: &str) -> Result<(), ClientError> {
        self.pipeline.execute(ApiRequest::delete(path)).await?;
        Ok(())
    }
}

#[async_trait]
impl IdentityProvider for ApiClient {
    async fn fetch_identity(&self) -> Result<UserIdentity, ClientError> {
        self.me().await
    }
}
