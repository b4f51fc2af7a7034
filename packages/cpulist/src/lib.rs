#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Parsing and emitting of the compressed `cpulist` format that the Linux kernel uses in sysfs to
//! list processors, NUMA nodes and similar numeric hardware identifiers.
//!
//! Example cpulist string: `0-17,36-53`
//!
//! # Format
//!
//! The value is a comma-separated list of zero or more items, where each item is either:
//!
//! * a single integer (e.g. `1`)
//! * an inclusive range of integers (e.g. `2-4`)
//!
//! Whitespace or extra characters are not allowed anywhere in the string. Callers reading sysfs
//! files are expected to trim the trailing newline before parsing.
//!
//! The identifiers in the list are of size `u32`.
//!
//! # Example
//!
//! ```
//! let local_cores = cpulist::parse("0-3,8,12-15").unwrap();
//! assert_eq!(local_cores, vec![0, 1, 2, 3, 8, 12, 13, 14, 15]);
//!
//! assert_eq!(cpulist::emit(&local_cores), "0-3,8,12-15");
//! ```

mod emit;
mod error;
mod parse;

pub use emit::*;
pub use error::*;
pub use parse::*;

/// A single identifier in a cpulist, typically a processor ID.
pub type Item = u32;
