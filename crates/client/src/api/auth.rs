use reqwest::StatusCode;
use serde::Serialize;

use sasb_auth::{TokenPair, UserIdentity};
use sasb_core::validation::LoginForm;

use super::ApiClient;
use crate::error::ClientError;
use crate::session::ClearReason;
use crate::transport::ApiRequest;

pub const TOKEN_PATH: &str = "/token/";
pub const ME_PATH: &str = "/me/";

#[derive(Serialize)]
struct Credentials<'a> {
    username: &'a str,
    password: &'a str,
}

impl ApiClient {
    /// Exchange credentials for a token pair, persist it and load the user.
    ///
    /// Bad credentials and an unreachable server are reported as distinct
    /// errors; neither is retried.
    pub async fn login(&self, username: &str, password: &str) -> Result<UserIdentity, ClientError> {
        let form = LoginForm::new(username.trim(), password);
        form.validate()?;

        let request = ApiRequest::post(TOKEN_PATH).json(&Credentials {
            username: &form.username,
            password: &form.password,
        })?;

        let pair: TokenPair = match self.pipeline.execute_anonymous(request).await {
            Ok(resp) => resp.json()?,
            Err(ClientError::Api { status, .. })
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::BAD_REQUEST =>
            {
                tracing::info!(username = %form.username, "login rejected");
                return Err(ClientError::InvalidCredentials);
            }
            Err(ClientError::Transport(err)) => {
                tracing::warn!(error = %err, "login failed: server unreachable");
                return Err(ClientError::Unreachable(err));
            }
            Err(err) => return Err(err),
        };

        self.session().set_tokens(&pair)?;
        let clears = self.session().clear_count();
        let user = match self.me().await {
            Ok(user) => user,
            Err(err) => {
                self.session().clear_unless_cleared_since(clears, ClearReason::Logout);
                return Err(err);
            }
        };

        tracing::info!(username = %user.username, role = %user.role, "logged in");
        self.session().mark_logged_in(user.clone());
        Ok(user)
    }

    /// Identity bound to the current access token.
    pub async fn me(&self) -> Result<UserIdentity, ClientError> {
        self.get_json(ME_PATH).await
    }
}
