//! Domain layer shared by the repository and API crates.
//!
//! Everything in this crate is pure: no I/O, no database handles. The API
//! crate maps [`error::CoreError`] values onto HTTP responses.

pub mod authz;
pub mod error;
pub mod pagination;
pub mod roles;
pub mod types;
pub mod validate;
