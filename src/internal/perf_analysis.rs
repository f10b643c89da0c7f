#![allow(clippy::missing_docs_in_private_items)]

use chainmap::{Config, CountingAllocator, PerformanceAnalysis, SystemClock, report};
use clap::Parser;
use env_logger::Env;
use log::info;

#[global_allocator]
static ALLOCATOR: CountingAllocator = CountingAllocator::new();

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    let datasets = config.datasets()?;
    let dataset_count = datasets.len();
    info!("benchmarking {dataset_count} dataset(s)");

    for dataset in datasets {
        let plot_path = config.plot_path(dataset.name(), dataset_count);
        let analysis =
            PerformanceAnalysis::new(dataset, SystemClock::new(), &ALLOCATOR, config.sizing())?;
        let report = analysis.compare_data_structures()?;

        print!("{report}");

        if let Some(path) = plot_path {
            report::plot(&report, &path)?;
            info!("wrote chart for {} to {}", analysis.dataset().name(), path.display());
        }
    }

    Ok(())
}
