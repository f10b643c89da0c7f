//! Fixed-width text report and bar chart for a comparison run

use std::{fmt, path::Path};

use plotters::prelude::*;

use crate::{
    analysis::{Measurement, Operation, Structure},
    error::AnalysisError,
};

/// Width of every rule line; matches the sum of the column widths plus separators
const RULE_WIDTH: usize = 96;

/// Results of one comparison run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Dataset label printed in the first column
    file_name: String,
    /// One entry per operation and structure
    measurements: Vec<Measurement>,
}

impl Report {
    /// Collects `measurements` taken on the dataset `file_name`
    pub fn new(file_name: impl Into<String>, measurements: Vec<Measurement>) -> Self {
        Self { file_name: file_name.into(), measurements }
    }

    /// Dataset label
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Measurements in the order they were taken
    #[must_use]
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Looks up the measurement for one operation on one structure
    #[must_use]
    pub fn measurement(&self, operation: Operation, structure: Structure) -> Option<&Measurement> {
        self.measurements.iter().find(|m| m.operation == operation && m.structure == structure)
    }

    /// Measurements in report order: PUT, GET, REMOVE, hash table before tree map
    fn rows(&self) -> impl Iterator<Item = &Measurement> + '_ {
        Operation::ALL.into_iter().flat_map(move |operation| {
            Structure::ALL
                .into_iter()
                .filter_map(move |structure| self.measurement(operation, structure))
        })
    }
}

/// Writes one table row; each cell is right-aligned in its column
fn write_row(
    f: &mut fmt::Formatter<'_>,
    cells: [&dyn fmt::Display; 5],
) -> fmt::Result {
    let [file, operation, structure, time, bytes] = cells;
    writeln!(f, "|{file:>20}|{operation:>15}|{structure:>15}|{time:>25}|{bytes:>15}|")
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rule = "-".repeat(RULE_WIDTH);
        writeln!(f, "{rule}")?;
        write_row(
            f,
            [&"FileName", &"Operation", &"Data Structure", &"Time Taken (micro sec)", &"Bytes Used"],
        )?;
        writeln!(f, "{rule}")?;
        for m in self.rows() {
            write_row(
                f,
                [&self.file_name, &m.operation, &m.structure, &m.micros(), &m.bytes_delta],
            )?;
        }
        writeln!(f, "{rule}")
    }
}

/// Renders the elapsed times of `report` as a grouped bar chart PNG at `path`.
///
/// # Errors
///
/// Returns [`AnalysisError::Plot`] if the chart cannot be drawn or written.
pub fn plot(report: &Report, path: &Path) -> Result<(), AnalysisError> {
    draw_chart(report, path).map_err(|e| AnalysisError::Plot(e.to_string()))
}

/// Number of bars in the chart, one per operation and structure
const BAR_COUNT: usize = Operation::ALL.len() * Structure::ALL.len();

/// Bar position of a measurement on the x axis
#[allow(clippy::cast_possible_truncation)]
fn bar_index(operation: Operation, structure: Structure) -> u32 {
    let op = Operation::ALL.iter().position(|&o| o == operation).unwrap_or(0);
    let st = Structure::ALL.iter().position(|&s| s == structure).unwrap_or(0);
    op.saturating_mul(Structure::ALL.len()).saturating_add(st) as u32
}

/// Label shown under bar `index`
fn bar_label(index: u32) -> String {
    Operation::ALL
        .iter()
        .flat_map(|&operation| Structure::ALL.iter().map(move |&structure| (operation, structure)))
        .find(|&(operation, structure)| bar_index(operation, structure) == index)
        .map(|(operation, structure)| format!("{operation} {structure}"))
        .unwrap_or_default()
}

/// Draws the chart with the bitmap backend
fn draw_chart(report: &Report, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let font_family = "sans-serif";
    let colors = [RGBColor(220, 50, 50), RGBColor(50, 90, 220)];
    let bar_count = u32::try_from(BAR_COUNT)?;

    let root = BitMapBackend::new(path, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_micros = report
        .measurements()
        .iter()
        .map(|m| m.elapsed.as_secs_f64() * 1e6)
        .fold(1.0, f64::max) *
        1.1; // Add 10% margin

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Hash table vs tree map: {}", report.file_name()),
            (font_family, 35),
        )
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d((0..bar_count).into_segmented(), 0.0..max_micros)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(BAR_COUNT)
        .x_label_formatter(&|value| match value {
            SegmentValue::CenterOf(index) => bar_label(*index),
            _ => String::new(),
        })
        .x_desc("Operation")
        .y_desc("Time Taken (micro sec)")
        .axis_desc_style((font_family, 16))
        .draw()?;

    for (structure, color) in Structure::ALL.into_iter().zip(colors) {
        let bars: Vec<(u32, f64)> = report
            .measurements()
            .iter()
            .filter(|m| m.structure == structure)
            .map(|m| (bar_index(m.operation, m.structure), m.elapsed.as_secs_f64() * 1e6))
            .collect();

        chart
            .draw_series(Histogram::vertical(&chart).style(color.filled()).margin(10).data(bars))?
            .label(structure.label())
            .legend(move |(x, y)| {
                let upper_left = (x, y.saturating_sub(5));
                let lower_right = (x.saturating_add(20), y.saturating_add(5));
                Rectangle::new([upper_left, lower_right], color.filled())
            });
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    root.present()?;
    Ok(())
}
