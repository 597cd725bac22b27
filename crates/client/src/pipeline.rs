//! Authenticated request pipeline.
//!
//! Every call attaches the current access token. A 401 on the first attempt
//! triggers one refresh via `/token/refresh/` and one replay of the call with
//! the new token; if the refresh fails the session is cleared before the
//! failure is returned. Concurrent 401s each run their own refresh.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::session::{ClearReason, Session};
use crate::transport::{ApiRequest, ApiResponse, HttpTransport};

pub const REFRESH_PATH: &str = "/token/refresh/";

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access: String,
    /// Present when the server rotates refresh tokens.
    #[serde(default)]
    refresh: Option<String>,
}

/// Per-call state: the request as it will be (re)dispatched, and whether the
/// refresh-and-retry cycle has already been spent.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request: ApiRequest,
    retried: bool,
}

impl RequestContext {
    pub fn new(request: ApiRequest) -> Self {
        Self {
            request,
            retried: false,
        }
    }

    pub fn request(&self) -> &ApiRequest {
        &self.request
    }

    pub fn retried(&self) -> bool {
        self.retried
    }

    fn mark_retried(&mut self) {
        self.retried = true;
    }
}

#[derive(Clone)]
pub struct AuthPipeline {
    transport: Arc<dyn HttpTransport>,
    session: Arc<Session>,
}

impl AuthPipeline {
    pub fn new(transport: Arc<dyn HttpTransport>, session: Arc<Session>) -> Self {
        Self { transport, session }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Dispatch `request` with the session's credentials, recovering once
    /// from an expired access token.
    pub async fn execute(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let mut ctx = RequestContext::new(request);
        if let Some(token) = self.session.access_token() {
            ctx.request.set_bearer(&token);
        }

        match self.dispatch(&ctx.request).await {
            Err(err) if err.is_unauthorized() && !ctx.retried() => {
                self.refresh_and_replay(ctx).await
            }
            result => result,
        }
    }

    /// Dispatch without credentials and without the refresh cycle. Used for
    /// the token endpoints.
    pub async fn execute_anonymous(&self, request: ApiRequest) -> Result<ApiResponse, ClientError> {
        self.dispatch(&request).await
    }

    async fn refresh_and_replay(&self, mut ctx: RequestContext) -> Result<ApiResponse, ClientError> {
        ctx.mark_retried();
        tracing::debug!(
            method = %ctx.request.method,
            path = %ctx.request.path,
            "access token rejected; refreshing"
        );

        let access = match self.refresh_access_token().await {
            Ok(access) => access,
            Err(err) => {
                tracing::warn!(error = %err, "token refresh failed; session cleared");
                self.session.clear_with(ClearReason::RefreshFailed);
                return Err(err);
            }
        };

        ctx.request.set_bearer(&access);
        self.dispatch(&ctx.request).await
    }

    /// Exchange the stored refresh token for a new access token and persist it.
    pub async fn refresh_access_token(&self) -> Result<String, ClientError> {
        let refresh = self
            .session
            .refresh_token()
            .ok_or(ClientError::MissingRefreshToken)?;

        let request = ApiRequest::post(REFRESH_PATH).json(&RefreshRequest { refresh: &refresh })?;
        let tokens: RefreshResponse = self.dispatch(&request).await?.json()?;

        self.session.set_access_token(&tokens.access)?;
        if let Some(rotated) = tokens.refresh.as_deref() {
            self.session.set_refresh_token(rotated)?;
        }
        tracing::info!("access token refreshed");
        Ok(tokens.access)
    }

    async fn dispatch(&self, request: &ApiRequest) -> Result<ApiResponse, ClientError> {
        let response = self.transport.send(request).await?;
        tracing::debug!(
            method = %request.method,
            path = %request.path,
            status = response.status.as_u16(),
            "api response"
        );
        response.error_for_status()
    }
}
