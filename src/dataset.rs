//! Loading benchmark records from newline-delimited files

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::{Path, PathBuf},
};

use log::debug;
use rand::{Rng, distr::Alphanumeric};

use crate::error::AnalysisError;

/// An ordered sequence of text records; record `i` is benchmarked under key `i`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    /// Label shown in the report
    name: String,
    /// One entry per input line
    records: Vec<String>,
}

impl Dataset {
    /// Wraps already loaded records
    pub fn new(name: impl Into<String>, records: Vec<String>) -> Self {
        Self { name: name.into(), records }
    }

    /// Reads every line of the file at `path`.
    ///
    /// The dataset is named after the file-name component of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Io`] if the file cannot be opened or read.
    pub fn load(path: &Path) -> Result<Self, AnalysisError> {
        let io_error = |source| AnalysisError::Io { path: path.to_path_buf(), source };
        let file = File::open(path).map_err(io_error)?;
        let name = path.file_name().map_or_else(
            || path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );

        let dataset = Self::from_reader(name, BufReader::new(file)).map_err(io_error)?;
        debug!("loaded {} records from {}", dataset.len(), path.display());
        Ok(dataset)
    }

    /// Reads every line of `reader`, without line terminators.
    ///
    /// # Errors
    ///
    /// Propagates read failures and invalid UTF-8.
    pub fn from_reader<R: BufRead>(name: impl Into<String>, reader: R) -> io::Result<Self> {
        let records = reader.lines().collect::<io::Result<Vec<_>>>()?;
        Ok(Self::new(name, records))
    }

    /// Generates `count` random alphanumeric records of `record_len` characters
    pub fn synthetic<R: Rng>(
        name: impl Into<String>,
        count: usize,
        record_len: usize,
        rng: &mut R,
    ) -> Self {
        let records = (0..count)
            .map(|_| (0..record_len).map(|_| char::from(rng.sample(Alphanumeric))).collect())
            .collect();
        Self::new(name, records)
    }

    /// Label shown in the report
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The records in file order
    #[must_use]
    pub fn records(&self) -> &[String] {
        &self.records
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if there are no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Reads the data file paths listed in a manifest.
///
/// A manifest is a comma-separated file with a header row. The first column of every
/// following non-blank line names a data file; relative names resolve against the
/// manifest's own directory.
///
/// # Errors
///
/// Returns [`AnalysisError::Io`] if the manifest cannot be read and
/// [`AnalysisError::Manifest`] if it lists no files.
pub fn read_manifest(path: &Path) -> Result<Vec<PathBuf>, AnalysisError> {
    let io_error = |source| AnalysisError::Io { path: path.to_path_buf(), source };
    let file = File::open(path).map_err(io_error)?;
    let base = path.parent().unwrap_or_else(|| Path::new(""));

    let files = parse_manifest(base, BufReader::new(file)).map_err(io_error)?;
    if files.is_empty() {
        return Err(AnalysisError::Manifest {
            path: path.to_path_buf(),
            reason: "no data files listed after the header row".to_owned(),
        });
    }
    Ok(files)
}

/// Extracts the first column of every data row
fn parse_manifest<R: BufRead>(base: &Path, reader: R) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for line in reader.lines().skip(1) {
        let line = line?;
        let Some(first) = line.split(',').next().map(str::trim) else { continue };
        if first.is_empty() {
            continue;
        }
        files.push(base.join(first));
    }
    Ok(files)
}
