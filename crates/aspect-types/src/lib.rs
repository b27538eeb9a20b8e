//! # aspect-types
//!
//! Shared domain types for the aspect topic aggregation workspace.
//!
//! This crate defines the data that flows between the upstream parser and the
//! topic engine:
//! - Aspect occurrences: one (noun phrase, descriptor) tuple per mention
//! - Aspect counts: the aggregated phrase -> frequency table
//! - Settings: layered configuration for the binary
//!
//! ## Usage
//!
//! ```rust
//! use aspect_types::{AspectCounts, AspectOccurrence};
//!
//! let occurrences = vec![
//!     AspectOccurrence::new("c1", 3, "chair", "comfy", false),
//!     AspectOccurrence::new("c2", 1, "chair", "wobbly", true),
//! ];
//! let counts = AspectCounts::from_occurrences(&occurrences);
//! assert_eq!(counts.get("chair"), Some(2));
//! ```

pub mod aspect;
pub mod config;
pub mod error;

pub use aspect::{AspectCounts, AspectOccurrence};
pub use config::{load_section, Settings};
pub use error::AspectError;
