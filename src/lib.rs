//! Coremind — device-login CLI with an AI chat session behind it.
//!
//! Authenticates the local machine against an identity server via the OAuth
//! 2.0 Device Authorization Grant, persists the credential across
//! invocations, and attaches it as a bearer token on backend calls. The chat
//! session and the demo session endpoint sit behind that credential.
//!
//! # Quick Start
//!
//! ```no_run
//! use coremind::auth::{AuthConfig, DeviceAuthClient};
//!
//! # async fn example() -> Result<(), coremind::auth::AuthError> {
//! let client = DeviceAuthClient::new(AuthConfig {
//!     server_url: "http://localhost:5000".to_string(),
//!     client_id: "my-client".to_string(),
//!     scope: "openid profile email".to_string(),
//! });
//! let session = client.request_device_code().await?;
//! println!("Visit {} and enter {}", session.verification_target(), session.user_code);
//! let grant = client.poll_for_token(&session).await?;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod llm;
pub mod session;
