//! Authentication and authorization
//!
//! - [`session`]: token → `{user_id, role}` store with TTL
//! - [`extractor`]: `CurrentSession` from the `session` header
//! - [`policy`]: declarative `Operation → Policy` table

pub mod extractor;
pub mod policy;
pub mod session;

pub use extractor::{CurrentSession, SESSION_HEADER};
pub use policy::{Access, Operation, Policy, authorize};
pub use session::{MemorySessionStore, Session, SessionStore};
