//! Extension lifecycle: teardown contracts, the typed service registry, and
//! the manager that composes them.

pub mod lifecycle;
pub mod manager;
pub mod registry;
