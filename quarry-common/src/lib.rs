//! Shared utilities for the Quarry workspace. Currently just the tracing
//! initializer that binaries and integration tests call once at startup.

pub mod observability;
