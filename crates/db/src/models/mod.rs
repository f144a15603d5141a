//! Entity models and DTOs.
//!
//! Row structs derive [`sqlx::FromRow`]; separate Create/Update DTOs carry
//! inbound data and response structs shape outbound JSON.

pub mod category;
pub mod comment;
pub mod genre;
pub mod review;
pub mod title;
pub mod user;
