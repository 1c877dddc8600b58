//! In-memory repositories - used when no database is configured and in tests.
//!
//! Data is lost on process restart.

mod groups;
mod posts;
mod users;

pub use groups::InMemoryGroupRepository;
pub use posts::InMemoryPostRepository;
pub use users::InMemoryUserRepository;
