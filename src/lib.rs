//! # Chained Hash Map
//!
//! A Rust implementation of a hash table with separate chaining and automatic growth,
//! together with a small harness that compares it against `BTreeMap`.
//!
//! `ChainedHashMap` keeps one singly linked chain per bucket. Lookups walk the chain of
//! bucket `hash(key) mod capacity`; once the ratio of entries to buckets reaches the
//! configured load factor the bucket array doubles and every entry is relinked.
//!
//! ## Basic Usage
//!
//! ```rust
//! use chainmap::{ChainedHashMap, MapError};
//!
//! // Create a map with 3 buckets that grows at 75% load
//! let mut map = ChainedHashMap::with_capacity_and_load_factor(3, 0.75)?;
//!
//! // Insert values
//! map.put(1, "one");
//! map.put(17, "seventeen");
//! map.put(3, "three");
//! assert_eq!(map.size(), 3);
//! assert_eq!(map.capacity(), 6);
//!
//! // Update values
//! assert_eq!(map.put(1, "uno"), Some("one"));
//! assert_eq!(map.get(&1), Ok(&"uno"));
//!
//! // Remove values
//! assert_eq!(map.remove(&1), Some("uno"));
//! assert_eq!(map.get(&1), Err(MapError::KeyNotFound));
//! # Ok::<(), MapError>(())
//! ```
//!
//! ## Benchmark Harness
//!
//! ```rust
//! use chainmap::{Dataset, PerformanceAnalysis, SystemClock, TableSizing, probe::MemoryProbe};
//!
//! struct NoMemory;
//!
//! impl MemoryProbe for NoMemory {
//!     fn bytes_in_use(&self) -> usize {
//!         0
//!     }
//! }
//!
//! let records = (0..1_000).map(|i| format!("record {i}")).collect();
//! let dataset = Dataset::new("records.txt", records);
//! let sizing = TableSizing { search_capacity: 2_048, ..TableSizing::default() };
//!
//! let analysis = PerformanceAnalysis::new(dataset, SystemClock::new(), NoMemory, sizing)?;
//! let report = analysis.compare_data_structures()?;
//! assert_eq!(report.measurements().len(), 6);
//! println!("{report}");
//! # Ok::<(), chainmap::AnalysisError>(())
//! ```

/// Benchmark harness driving the map and `BTreeMap`
pub mod analysis;
/// Module implementing the separate-chaining hash map
mod chained_hashmap;
/// Command-line configuration for the comparison binary
pub mod config;
/// Loading benchmark records
pub mod dataset;
/// Error types
mod error;
/// Clock and memory probes
pub mod probe;
/// Report rendering
pub mod report;
/// Utility functions and traits for the hash map
mod utils;

pub use analysis::{BenchTarget, Measurement, Operation, PerformanceAnalysis, Structure, TableSizing};
pub use chained_hashmap::{ChainedHashMap, Iter};
pub use config::Config;
pub use dataset::Dataset;
pub use error::{AnalysisError, MapError};
pub use probe::{Clock, CountingAllocator, MemoryProbe, SystemClock};
pub use report::Report;
pub use utils::{HashMapExtensions, from_iter};
