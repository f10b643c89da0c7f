//! Benchmark harness comparing `ChainedHashMap` with `BTreeMap`
//!
//! Every record of a [`Dataset`] is stored under its index. Insertion is timed from
//! construction through the last `put`; deletion and search first fill a fresh structure
//! and then time removals or lookups in descending key order.

use std::{collections::BTreeMap, fmt, hint::black_box, time::Duration};

use log::{debug, info};

use crate::{
    ChainedHashMap,
    chained_hashmap::check_parameters,
    dataset::Dataset,
    error::{AnalysisError, MapError},
    probe::{Clock, MemoryProbe, Snapshot},
    report::Report,
    utils::HashMapExtensions,
};

/// Data structure under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Structure {
    /// `ChainedHashMap`
    HashTable,
    /// `std::collections::BTreeMap`
    TreeMap,
}

impl Structure {
    /// Report order
    pub const ALL: [Self; 2] = [Self::HashTable, Self::TreeMap];

    /// Column label used in the report
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::HashTable => "HASHTABLE",
            Self::TreeMap => "TREEMAP",
        }
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Operation being timed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Inserting every record
    Put,
    /// Looking up every key
    Get,
    /// Removing every key
    Remove,
}

impl Operation {
    /// Report order
    pub const ALL: [Self; 3] = [Self::Put, Self::Get, Self::Remove];

    /// Column label used in the report
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Put => "PUT",
            Self::Get => "GET",
            Self::Remove => "REMOVE",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// One timed run of an operation over the whole dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    /// What was timed
    pub operation: Operation,
    /// Which structure it ran on
    pub structure: Structure,
    /// Wall-clock time of the run
    pub elapsed: Duration,
    /// Change in heap bytes in use across the run; negative when memory was freed
    pub bytes_delta: i64,
}

impl Measurement {
    /// Elapsed time in whole microseconds
    #[must_use]
    pub fn micros(&self) -> u128 {
        self.elapsed.as_micros()
    }
}

/// Key-value store the harness can drive
pub trait BenchTarget {
    /// Stores `value` under `key`
    fn put(&mut self, key: usize, value: String);

    /// Looks up `key`
    fn get(&self, key: usize) -> Option<&String>;

    /// Removes `key`, returning its value
    fn remove(&mut self, key: usize) -> Option<String>;

    /// Number of stored entries
    fn len(&self) -> usize;

    /// Returns true if nothing is stored
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl BenchTarget for ChainedHashMap<usize, String> {
    fn put(&mut self, key: usize, value: String) {
        Self::put(self, key, value);
    }

    fn get(&self, key: usize) -> Option<&String> {
        Self::get(self, &key).ok()
    }

    fn remove(&mut self, key: usize) -> Option<String> {
        Self::remove(self, &key)
    }

    fn len(&self) -> usize {
        Self::len(self)
    }
}

impl BenchTarget for BTreeMap<usize, String> {
    fn put(&mut self, key: usize, value: String) {
        self.insert(key, value);
    }

    fn get(&self, key: usize) -> Option<&String> {
        Self::get(self, &key)
    }

    fn remove(&mut self, key: usize) -> Option<String> {
        Self::remove(self, &key)
    }

    fn len(&self) -> usize {
        Self::len(self)
    }
}

/// Initial hash table parameters for each run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableSizing {
    /// Initial capacity for the insertion run
    pub insert_capacity: usize,
    /// Initial capacity for the deletion run
    pub delete_capacity: usize,
    /// Initial capacity for the search run
    pub search_capacity: usize,
    /// Load factor threshold for every run
    pub load_factor: f64,
}

impl Default for TableSizing {
    fn default() -> Self {
        Self {
            insert_capacity: 10,
            delete_capacity: 50,
            search_capacity: 1_000_000,
            load_factor: 0.75,
        }
    }
}

/// Runs the comparison for one dataset
#[derive(Debug)]
pub struct PerformanceAnalysis<C, M> {
    /// Records to store
    dataset: Dataset,
    /// Time source
    clock: C,
    /// Heap usage source
    probe: M,
    /// Hash table parameters
    sizing: TableSizing,
}

impl<C: Clock, M: MemoryProbe> PerformanceAnalysis<C, M> {
    /// Prepares a comparison over `dataset`.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::EmptyDataset`] if the dataset has no records and
    /// [`AnalysisError::Map`] if `sizing` describes an invalid table.
    pub fn new(
        dataset: Dataset,
        clock: C,
        probe: M,
        sizing: TableSizing,
    ) -> Result<Self, AnalysisError> {
        if dataset.is_empty() {
            return Err(AnalysisError::EmptyDataset { name: dataset.name().to_owned() });
        }
        for capacity in [sizing.insert_capacity, sizing.delete_capacity, sizing.search_capacity]
        {
            check_parameters(capacity, sizing.load_factor)?;
        }
        Ok(Self { dataset, clock, probe, sizing })
    }

    /// The dataset being benchmarked
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Runs insertion, deletion and search for both structures and collects the results.
    ///
    /// # Errors
    ///
    /// Propagates any failure of the individual comparisons.
    pub fn compare_data_structures(&self) -> Result<Report, AnalysisError> {
        info!("comparing structures on {} ({} records)", self.dataset.name(), self.dataset.len());

        let mut measurements = Vec::with_capacity(6);
        measurements.extend(self.compare_insertion()?);
        measurements.extend(self.compare_deletion()?);
        measurements.extend(self.compare_search()?);
        Ok(Report::new(self.dataset.name(), measurements))
    }

    /// Times building each structure and inserting every record.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Map`] if the hash table cannot be built.
    pub fn compare_insertion(&self) -> Result<[Measurement; 2], AnalysisError> {
        info!("timing insertion");
        let capacity = self.sizing.insert_capacity;
        Ok([
            self.time_insertion(Structure::HashTable, || self.hash_table(capacity))?,
            self.time_insertion(Structure::TreeMap, || Ok(BTreeMap::<usize, String>::new()))?,
        ])
    }

    /// Times removing every key, highest first, from a filled structure.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Map`] if the hash table cannot be built.
    pub fn compare_deletion(&self) -> Result<[Measurement; 2], AnalysisError> {
        info!("timing deletion");
        let mut table = self.filled(self.hash_table(self.sizing.delete_capacity)?);
        let mut tree = self.filled(BTreeMap::<usize, String>::new());
        Ok([
            self.time_deletion(Structure::HashTable, &mut table),
            self.time_deletion(Structure::TreeMap, &mut tree),
        ])
    }

    /// Times looking up every key, highest first, in a filled structure.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Map`] if the hash table cannot be built or a stored key
    /// cannot be found.
    pub fn compare_search(&self) -> Result<[Measurement; 2], AnalysisError> {
        info!("timing search");
        let table = self.filled(self.hash_table(self.sizing.search_capacity)?);
        debug!(
            "search table: capacity {}, longest chain {}",
            table.capacity(),
            table.longest_chain()
        );
        let tree = self.filled(BTreeMap::<usize, String>::new());
        Ok([
            self.time_search(Structure::HashTable, &table)?,
            self.time_search(Structure::TreeMap, &tree)?,
        ])
    }

    /// Builds an empty hash table with the configured load factor
    fn hash_table(&self, capacity: usize) -> Result<ChainedHashMap<usize, String>, AnalysisError> {
        Ok(ChainedHashMap::with_capacity_and_load_factor(capacity, self.sizing.load_factor)?)
    }

    /// Stores every record of the dataset under its index
    fn fill<T: BenchTarget>(&self, target: &mut T) {
        for (key, record) in self.dataset.records().iter().enumerate() {
            target.put(key, record.clone());
        }
    }

    /// Returns `target` after filling it
    fn filled<T: BenchTarget>(&self, mut target: T) -> T {
        self.fill(&mut target);
        target
    }

    /// Timed construction followed by a full fill
    fn time_insertion<T, F>(
        &self,
        structure: Structure,
        build: F,
    ) -> Result<Measurement, AnalysisError>
    where
        T: BenchTarget,
        F: FnOnce() -> Result<T, AnalysisError>,
    {
        let start = self.snapshot();
        let mut target = build()?;
        self.fill(&mut target);
        let measurement = self.finish(Operation::Put, structure, start);
        debug!("{structure} holds {} entries", target.len());
        Ok(measurement)
    }

    /// Timed removal of every key in descending order
    fn time_deletion<T: BenchTarget>(&self, structure: Structure, target: &mut T) -> Measurement {
        let start = self.snapshot();
        for key in (0..self.dataset.len()).rev() {
            black_box(target.remove(key));
        }
        self.finish(Operation::Remove, structure, start)
    }

    /// Timed lookup of every key in descending order
    fn time_search<T: BenchTarget>(
        &self,
        structure: Structure,
        target: &T,
    ) -> Result<Measurement, AnalysisError> {
        let start = self.snapshot();
        for key in (0..self.dataset.len()).rev() {
            black_box(target.get(key)).ok_or(MapError::KeyNotFound)?;
        }
        Ok(self.finish(Operation::Get, structure, start))
    }

    /// Current clock and memory readings
    fn snapshot(&self) -> Snapshot {
        Snapshot::take(&self.clock, &self.probe)
    }

    /// Closes a run started at `start`
    fn finish(&self, operation: Operation, structure: Structure, start: Snapshot) -> Measurement {
        let (elapsed, bytes_delta) = start.until(self.snapshot());
        let measurement = Measurement { operation, structure, elapsed, bytes_delta };
        debug!("{operation} on {structure}: {}us, {bytes_delta} bytes", measurement.micros());
        measurement
    }
}
