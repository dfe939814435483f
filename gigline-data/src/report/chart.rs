//! SVG charts of the genre price and city distribution sections.
//!
//! Charts are drawn into memory and written with the same atomic rename as
//! the text reports.

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use gigline_core::{CityTierCount, GenrePrice, Report, Tier};
use log::info;
use plotters::prelude::*;

use super::{RenderError, ReportRenderer};

/// Bar chart of the average price per genre.
pub const GENRE_PRICE_CHART_FILE: &str = "genre_price_bar_chart.svg";
/// Stacked chart of event counts per city and tier.
pub const DISTRIBUTION_CHART_FILE: &str = "price_city_distribution_stackplot.svg";

/// Error raised by the SVG drawing backend.
pub type ChartError = DrawingAreaErrorKind<std::io::Error>;

const GENRE_CHART_SIZE: (u32, u32) = (1000, 600);
const DISTRIBUTION_CHART_SIZE: (u32, u32) = (1200, 800);

/// Draws the genre price and city distribution charts into a directory.
///
/// # Examples
/// ```
/// use gigline_core::{GenrePrice, Report};
/// use gigline_data::report::{ChartReportRenderer, GENRE_PRICE_CHART_FILE, ReportRenderer};
///
/// let dir = tempfile::tempdir()?;
/// let root = camino::Utf8Path::from_path(dir.path()).ok_or("non-UTF-8 temp dir")?;
/// let report = Report {
///     genre_prices: vec![GenrePrice { genre: "Rock".into(), average_price: 80.0 }],
///     ..Report::default()
/// };
///
/// let written = ChartReportRenderer::new(root).render(&report)?;
/// assert_eq!(written, vec![root.join(GENRE_PRICE_CHART_FILE)]);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartReportRenderer {
    output_dir: Utf8PathBuf,
}

impl ChartReportRenderer {
    /// Render into `output_dir`, creating it when missing.
    #[must_use]
    pub fn new(output_dir: impl AsRef<Utf8Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_owned(),
        }
    }

    fn save(
        &self,
        name: &str,
        draw: impl FnOnce(&mut String) -> Result<(), ChartError>,
    ) -> Result<Utf8PathBuf, RenderError> {
        let path = self.output_dir.join(name);
        let mut svg = String::new();
        if let Err(source) = draw(&mut svg) {
            return Err(RenderError::Chart { path, source });
        }
        gigline_fs::write_atomic(&path, svg.as_bytes()).map_err(|source| RenderError::Write {
            path: path.clone(),
            source,
        })?;
        info!("wrote {path}");
        Ok(path)
    }
}

impl ReportRenderer for ChartReportRenderer {
    fn render(&self, report: &Report) -> Result<Vec<Utf8PathBuf>, RenderError> {
        let sorted = report.clone().sorted();
        let mut written = Vec::new();
        if !sorted.genre_prices.is_empty() {
            written.push(self.save(GENRE_PRICE_CHART_FILE, |svg| {
                draw_genre_prices(svg, &sorted.genre_prices)
            })?);
        }
        if !sorted.city_tiers.is_empty() {
            written.push(self.save(DISTRIBUTION_CHART_FILE, |svg| {
                draw_distribution(svg, &sorted.city_tiers)
            })?);
        }
        Ok(written)
    }
}

fn draw_genre_prices(svg: &mut String, rows: &[GenrePrice]) -> Result<(), ChartError> {
    let names: Vec<&str> = rows.iter().map(|row| row.genre.as_str()).collect();
    let top = rows
        .iter()
        .map(|row| row.average_price)
        .fold(1.0_f64, f64::max);

    let root = SVGBackend::with_string(svg, GENRE_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Average Ticket Price by Genre", ("sans-serif", 24))
        .margin(16)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d((0..segment_count(&names)).into_segmented(), 0.0..top)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Genre")
        .y_desc("Average Price (USD)")
        .x_labels(names.len().saturating_add(1))
        .x_label_formatter(&|value| segment_label(value, &names))
        .y_label_formatter(&|price| format!("${price:.0}"))
        .draw()?;
    chart.draw_series(rows.iter().zip(0_u32..).enumerate().map(
        |(position, (row, index))| {
            Rectangle::new(
                [
                    (SegmentValue::Exact(index), 0.0),
                    (SegmentValue::Exact(index.saturating_add(1)), row.average_price),
                ],
                Palette99::pick(position).filled(),
            )
        },
    ))?;
    root.present()?;
    Ok(())
}

fn draw_distribution(svg: &mut String, rows: &[CityTierCount]) -> Result<(), ChartError> {
    let mut stacks: BTreeMap<&str, TierStack> = BTreeMap::new();
    for row in rows {
        stacks
            .entry(row.city.as_str())
            .or_default()
            .add(row.tier, row.event_count);
    }
    let names: Vec<&str> = stacks.keys().copied().collect();
    let top = stacks.values().map(|stack| stack.total()).fold(1, u64::max);

    let root = SVGBackend::with_string(svg, DISTRIBUTION_CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Distribution of Events Across Prices and Cities",
            ("sans-serif", 24),
        )
        .margin(16)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d((0..segment_count(&names)).into_segmented(), 0..top)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("City")
        .y_desc("Event Count")
        .x_labels(names.len().saturating_add(1))
        .x_label_formatter(&|value| segment_label(value, &names))
        .draw()?;
    for tier in Tier::ALL {
        let colour = tier_colour(tier);
        chart
            .draw_series(stacks.values().zip(0_u32..).map(|(stack, index)| {
                let (bottom, upper) = stack.span(tier);
                Rectangle::new(
                    [
                        (SegmentValue::Exact(index), bottom),
                        (SegmentValue::Exact(index.saturating_add(1)), upper),
                    ],
                    colour.filled(),
                )
            }))?
            .label(tier.label())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], colour.filled()));
    }
    chart
        .configure_series_labels()
        .background_style(WHITE)
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

fn segment_count(names: &[&str]) -> u32 {
    u32::try_from(names.len()).unwrap_or(u32::MAX)
}

fn segment_label(value: &SegmentValue<u32>, names: &[&str]) -> String {
    match value {
        SegmentValue::CenterOf(index) => usize::try_from(*index)
            .ok()
            .and_then(|position| names.get(position))
            .map(|name| (*name).to_owned())
            .unwrap_or_default(),
        SegmentValue::Exact(_) | SegmentValue::Last => String::new(),
    }
}

const fn tier_colour(tier: Tier) -> RGBColor {
    match tier {
        Tier::Low => RGBColor(0x88, 0xCC, 0xEE),
        Tier::Medium => RGBColor(0xDD, 0xCC, 0x77),
        Tier::High => RGBColor(0xCC, 0x66, 0x77),
    }
}

/// Event counts for one city, stacked Low, Medium, High from the axis up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TierStack {
    low: u64,
    medium: u64,
    high: u64,
}

impl TierStack {
    const fn add(&mut self, tier: Tier, count: u64) {
        let slot = match tier {
            Tier::Low => &mut self.low,
            Tier::Medium => &mut self.medium,
            Tier::High => &mut self.high,
        };
        *slot = slot.saturating_add(count);
    }

    const fn count(self, tier: Tier) -> u64 {
        match tier {
            Tier::Low => self.low,
            Tier::Medium => self.medium,
            Tier::High => self.high,
        }
    }

    const fn total(self) -> u64 {
        self.low.saturating_add(self.medium).saturating_add(self.high)
    }

    /// Vertical range `tier` occupies in the stack.
    const fn span(self, tier: Tier) -> (u64, u64) {
        let bottom = match tier {
            Tier::Low => 0,
            Tier::Medium => self.low,
            Tier::High => self.low.saturating_add(self.medium),
        };
        (bottom, bottom.saturating_add(self.count(tier)))
    }
}
