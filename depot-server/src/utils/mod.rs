//! Utility module
//!
//! - [`logger`]: tracing subscriber setup
//! - [`validation`]: request field checks
//! - [`password`]: argon2 hashing
//! - [`time`]: injectable clock and id generator

pub mod logger;
pub mod password;
pub mod time;
pub mod validation;

pub use time::{Clock, FixedClock, IdGenerator, RandomIds, SystemClock};
