//! `sasb-client`
//!
//! **Responsibility:** authenticated access to the salon scheduling API.
//!
//! This crate provides:
//! - Durable token storage (`accessToken` / `refreshToken`)
//! - The session store (tokens + current user, load-on-start, clear-on-failure)
//! - The request pipeline (bearer token, one refresh-and-retry on 401)
//! - Typed wrappers for the users, services and appointments endpoints
//!
//! Callers never touch tokens directly; everything goes through [`ApiClient`].

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod session;
pub mod storage;
pub mod transport;

pub use api::{ActionOutcome, ApiClient, RoleFilter};
pub use config::ClientConfig;
pub use error::{ApiErrorBody, ClientError, StorageError, TransportError};
pub use pipeline::{AuthPipeline, RequestContext};
pub use session::{AuthState, ClearReason, IdentityProvider, LoadingState, Session, SessionEvent, SessionView};
pub use storage::{FileTokenStore, MemoryTokenStore, TokenKey, TokenStore};
pub use transport::{ApiRequest, ApiResponse, HttpTransport, ReqwestTransport};
