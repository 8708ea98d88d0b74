//! # VK Integration Module
//!
//! Everything that talks to VK lives here, in the order a run uses it:
//!
//! ```text
//! form    scrape the login page: form target + hidden fields
//!   ↓
//! auth    implicit OAuth flow, access token from the redirect fragment
//!   ↓
//! api     method endpoint (`audio.get`, ...) with the session token
//! ```
//!
//! ## Authentication
//!
//! VK offers no client-credential flow for audio access, so [`auth`] logs in
//! the way the mobile web page does: it fetches the authorization page,
//! posts the login form with the user's e-mail and password and reads
//! `access_token`, `expires_in` and `user_id` from the fragment of the
//! `blank.html` redirect. The token is never refreshed.
//!
//! ## Method calls
//!
//! [`api::ApiClient::call`] is the single entry point for method calls. The
//! namespace helpers (`client.audio().get(..)`) only build the method name
//! and typed parameters on top of it.
//!
//! ```rust
//! let auth = Authenticator::new(AuthConfig::from_env())?;
//! let session = auth.authorize(&Credentials::new(login, password)).await?;
//! let client = ApiClient::new(session)?;
//! let list = client.audio().get(&AudioQuery::default()).await?;
//! ```

pub mod api;
pub mod auth;
pub mod form;

pub use api::{ApiClient, AudioMethods, Namespace};
pub use auth::{AuthConfig, Authenticator};
pub use form::scrape_form;
