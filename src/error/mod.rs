//! Error handling for loading and export operations.
//!
//! Every fallible operation in the crate returns [`Result`], whose error is
//! the top-level [`NorthwindError`]. The variants mirror the four failure
//! kinds callers are expected to distinguish:
//! - configuration problems (bad config file, strategy changed mid-traversal)
//! - data integrity violations (missing cost, oversized names, dangling keys)
//! - I/O failures while opening or writing an export destination
//! - lookups for categories or products that are not present
//!
//! # Example
//!
//! ```rust,no_run
//! use northwind_export::error::{NorthwindError, Result};
//!
//! fn report(result: Result<()>) {
//!     match result {
//!         Err(NorthwindError::DataIntegrity(e)) => eprintln!("bad record: {e}"),
//!         Err(e) => eprintln!("{e}"),
//!         Ok(()) => {}
//!     }
//! }
//! ```

pub mod kinds;

pub use kinds::{ConfigError, IntegrityError, NorthwindError, NotFoundError, Result};
