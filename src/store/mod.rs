//! Persistence layer.
//!
//! Each entity type (users, OTPs) lives in its own whole-collection JSON
//! file owned by a [`file::FileCollection`]. Collections are read and
//! rewritten as a unit; a per-collection lock serializes every
//! load-mutate-persist cycle so concurrent requests cannot lose updates.
//! Collections for different entity types do not block each other.

pub mod file;

pub use file::FileCollection;
