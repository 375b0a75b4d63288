//! Store adapters that live outside the core crate.
//!
//! The in-memory store ships with `opinions_core`; only backends that need
//! third-party clients are implemented here.
//!
//! Build with DynamoDB:
//! ```bash
//! cargo build -p opinions --no-default-features --features dynamodb
//! ```

#[cfg(feature = "dynamodb")]
pub mod dynamodb;
