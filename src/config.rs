//! Command-line configuration for the comparison binary

use std::path::{Path, PathBuf};

use clap::Parser;
use rand::{SeedableRng, rngs::StdRng};

use crate::{
    analysis::TableSizing,
    dataset::{self, Dataset},
    error::AnalysisError,
};

/// Record count used when no input is given
const DEFAULT_SYNTHETIC_RECORDS: usize = 10_000;

/// Compares a separate-chaining hash map with a B-tree map on insert, search and delete
#[derive(Debug, Clone, PartialEq, Parser)]
#[command(name = "perf_analysis", version, about)]
pub struct Config {
    /// Newline-delimited data files; record `i` is stored under key `i`
    pub files: Vec<PathBuf>,

    /// CSV manifest whose first column (after a header row) lists more data files
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// Also benchmark COUNT randomly generated records
    #[arg(long, value_name = "COUNT")]
    pub synthetic: Option<usize>,

    /// Length of each synthetic record
    #[arg(long, default_value_t = 16)]
    pub record_len: usize,

    /// Seed for synthetic records; a random seed is used when absent
    #[arg(long)]
    pub seed: Option<u64>,

    /// Initial hash table capacity for the insertion run
    #[arg(long, default_value_t = 10)]
    pub insert_capacity: usize,

    /// Initial hash table capacity for the deletion run
    #[arg(long, default_value_t = 50)]
    pub delete_capacity: usize,

    /// Initial hash table capacity for the search run
    #[arg(long, default_value_t = 1_000_000)]
    pub search_capacity: usize,

    /// Load factor that triggers hash table growth, in (0, 1]
    #[arg(long, default_value_t = 0.75)]
    pub load_factor: f64,

    /// Write a bar chart of the timings to this PNG file
    #[arg(long, value_name = "PNG")]
    pub plot: Option<PathBuf>,
}

impl Config {
    /// Hash table parameters for every run
    #[must_use]
    pub fn sizing(&self) -> TableSizing {
        TableSizing {
            insert_capacity: self.insert_capacity,
            delete_capacity: self.delete_capacity,
            search_capacity: self.search_capacity,
            load_factor: self.load_factor,
        }
    }

    /// Positional files followed by the files listed in the manifest.
    ///
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or lists no files.
    pub fn data_files(&self) -> Result<Vec<PathBuf>, AnalysisError> {
        let mut files = self.files.clone();
        if let Some(manifest) = &self.manifest {
            files.extend(dataset::read_manifest(manifest)?);
        }
        Ok(files)
    }

    /// Loads every dataset to benchmark.
    ///
    /// Without files, a manifest or `--synthetic`, a synthetic dataset of
    /// 10 000 records is generated.
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be read.
    pub fn datasets(&self) -> Result<Vec<Dataset>, AnalysisError> {
        let mut datasets = self
            .data_files()?
            .iter()
            .map(|path| Dataset::load(path))
            .collect::<Result<Vec<_>, _>>()?;

        let synthetic = match self.synthetic {
            Some(count) => Some(count),
            None if datasets.is_empty() => Some(DEFAULT_SYNTHETIC_RECORDS),
            None => None,
        };
        if let Some(count) = synthetic {
            let mut rng = self.seed.map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
            datasets.push(Dataset::synthetic(
                format!("synthetic-{count}"),
                count,
                self.record_len,
                &mut rng,
            ));
        }
        Ok(datasets)
    }

    /// Where to write the chart for `dataset_name`.
    ///
    /// With several datasets the dataset name is appended to the file stem so charts do not
    /// overwrite each other.
    #[must_use]
    pub fn plot_path(&self, dataset_name: &str, dataset_count: usize) -> Option<PathBuf> {
        let path = self.plot.as_deref()?;
        if dataset_count <= 1 {
            return Some(path.to_path_buf());
        }
        Some(suffixed(path, dataset_name))
    }
}

/// `dir/stem.ext` becomes `dir/stem-suffix.ext`
fn suffixed(path: &Path, suffix: &str) -> PathBuf {
    let stem = path.file_stem().map_or_else(String::new, |s| s.to_string_lossy().into_owned());
    let mut name = format!("{stem}-{suffix}");
    if let Some(ext) = path.extension() {
        name.push('.');
        name.push_str(&ext.to_string_lossy());
    }
    path.with_file_name(name)
}
