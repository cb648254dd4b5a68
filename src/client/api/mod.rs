//! API trait definitions split by responsibility
//!
//! - [`SessionApi`] - Login, current user, refresh and logout
//! - [`PropertyApi`] - Listing the properties the user manages

mod property;
mod session;

pub use property::PropertyApi;
pub use session::SessionApi;
