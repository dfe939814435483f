//! Plain-text rendering: one file per report section, rows in
//! [`Report::sorted`] order.

use camino::{Utf8Path, Utf8PathBuf};
use gigline_core::{ArtistSummary, CityTierCount, GenrePrice, Report};
use log::info;

use super::{RenderError, ReportRenderer};

/// File holding the per-genre averages.
pub const GENRE_PRICES_FILE: &str = "average_ticket_prices.txt";
/// File holding the city/tier distribution.
pub const DISTRIBUTION_FILE: &str = "event_distribution.txt";
/// File holding the per-artist summaries.
pub const ARTIST_SUMMARY_FILE: &str = "artist_summary.txt";

/// Writes the three text reports into a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextReportRenderer {
    output_dir: Utf8PathBuf,
}

impl TextReportRenderer {
    /// Render into `output_dir`, creating it when missing.
    #[must_use]
    pub fn new(output_dir: impl AsRef<Utf8Path>) -> Self {
        Self {
            output_dir: output_dir.as_ref().to_owned(),
        }
    }

    fn write(&self, name: &str, contents: &str) -> Result<Utf8PathBuf, RenderError> {
        let path = self.output_dir.join(name);
        gigline_fs::write_atomic(&path, contents.as_bytes()).map_err(|source| {
            RenderError::Write {
                path: path.clone(),
                source,
            }
        })?;
        info!("wrote {path}");
        Ok(path)
    }
}

impl ReportRenderer for TextReportRenderer {
    fn render(&self, report: &Report) -> Result<Vec<Utf8PathBuf>, RenderError> {
        let sorted = report.clone().sorted();
        let mut written = Vec::new();
        if !sorted.genre_prices.is_empty() {
            written.push(self.write(GENRE_PRICES_FILE, &render_genre_prices(&sorted.genre_prices))?);
        }
        if !sorted.city_tiers.is_empty() {
            written.push(self.write(DISTRIBUTION_FILE, &render_distribution(&sorted.city_tiers))?);
        }
        if !sorted.artists.is_empty() {
            written.push(self.write(ARTIST_SUMMARY_FILE, &render_artist_summaries(&sorted.artists))?);
        }
        Ok(written)
    }
}

/// Render the per-genre averages section.
#[must_use]
pub fn render_genre_prices(rows: &[GenrePrice]) -> String {
    section(
        "Average Ticket Prices by Genre:",
        rows.iter()
            .map(|row| format!("{}: ${:.2}", row.genre, row.average_price)),
    )
}

/// Render the city/tier distribution section.
#[must_use]
pub fn render_distribution(rows: &[CityTierCount]) -> String {
    section(
        "Event Distribution by City and Price Range:",
        rows.iter()
            .map(|row| format!("{} ({}): {} events", row.city, row.tier, row.event_count)),
    )
}

/// Render the per-artist summaries section.
#[must_use]
pub fn render_artist_summaries(rows: &[ArtistSummary]) -> String {
    section(
        "Events per Artist:",
        rows.iter().map(|row| match (row.average_price, row.tier()) {
            (Some(average), Some(tier)) => format!(
                "{}: {} events, average ${average:.2} ({tier})",
                row.artist, row.event_count
            ),
            _ => format!("{}: {} events, no price data", row.artist, row.event_count),
        }),
    )
}

fn section(header: &str, lines: impl Iterator<Item = String>) -> String {
    std::iter::once(header.to_owned())
        .chain(lines)
        .map(|line| line + "\n")
        .collect()
}
