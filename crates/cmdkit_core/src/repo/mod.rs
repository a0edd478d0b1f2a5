//! Persistence implementations for host contracts.
//!
//! # Responsibility
//! - Keep SQLite query details out of services and commands.
//!
//! # Invariants
//! - Writes are committed before change notifications go out.

pub mod settings_repo;
