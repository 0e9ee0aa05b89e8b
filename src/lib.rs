//! # Photo Filer
//!
//! Files photos into folders named after when and where they were taken.
//!
//! ## Workflow
//! 1. Expand the path arguments (directories one level deep)
//! 2. Read each photo's capture time and GPS position, label the place
//! 3. Cluster photos taken close together at the same place
//! 4. Show the proposed folders and ask for confirmation
//! 5. Check the whole plan against the filesystem, then move the files
//!
//! ## Architecture
//! - `core` - The filing engine (no terminal I/O)
//! - `error` - Error types, one enum per stage

pub mod core;
pub mod error;

// Re-export commonly used types at the crate root
pub use error::{PhotoFilerError, Result};

/// Initialize tracing for the library
///
/// Logs go to stderr so the plan printed on stdout stays readable.
/// Filtering follows `RUST_LOG`.
pub fn init_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set global default tracing subscriber");
}
