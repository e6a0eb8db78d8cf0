//! Outbound adapters implementing domain ports.
//!
//! - **memory**: single-process store used without a database and in tests
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **crypto**: Argon2id password hashing
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod crypto;
pub mod memory;
pub mod persistence;
