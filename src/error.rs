//! Error types for the map and the benchmark harness

use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors reported by `ChainedHashMap` operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// A key was missing or a construction parameter was out of range
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested key is not stored in the map
    #[error("key not present")]
    KeyNotFound,
}

/// Errors reported while loading data and running the comparison
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Reading a data or manifest file failed
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that could not be read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// A dataset contained no records to benchmark
    #[error("dataset {name} has no records")]
    EmptyDataset {
        /// Name of the offending dataset
        name: String,
    },

    /// A manifest file was malformed
    #[error("invalid manifest {}: {reason}", path.display())]
    Manifest {
        /// Manifest that was rejected
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// Rendering the chart failed
    #[error("plotting failed: {0}")]
    Plot(String),

    /// A map operation failed during a run
    #[error(transparent)]
    Map(#[from] MapError),
}
