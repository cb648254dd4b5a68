//! Platform API client
//!
//! All property-scoped traffic goes through [`PgClient::send`], which
//! resolves the `:pgId` placeholder and handles the one-shot session
//! refresh on 401.

pub mod api;
pub mod cookies;
pub mod http;
#[cfg(test)]
pub mod mock;
pub mod models;
pub mod request;
pub mod scope;

pub use api::{PropertyApi, SessionApi};
pub use http::{PgClient, UnauthorizedHandler};
#[cfg(test)]
pub use mock::MockPgClient;
pub use models::{Credentials, PropertySummary, UserInfo};
pub use request::ApiRequest;
pub use scope::PropertyScope;
