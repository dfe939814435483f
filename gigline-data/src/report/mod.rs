//! Presentation of aggregate reports.
//!
//! Every [`ReportRenderer`] writes into an output directory and skips
//! sections with no rows. [`TextReportRenderer`] writes one text file per
//! section; [`ChartReportRenderer`] draws SVG charts of the price and
//! distribution sections.

use camino::Utf8PathBuf;
use gigline_core::Report;
use thiserror::Error;

mod chart;
mod text;

pub use chart::{
    ChartError, ChartReportRenderer, DISTRIBUTION_CHART_FILE, GENRE_PRICE_CHART_FILE,
};
pub use text::{
    ARTIST_SUMMARY_FILE, DISTRIBUTION_FILE, GENRE_PRICES_FILE, TextReportRenderer,
    render_artist_summaries, render_distribution, render_genre_prices,
};

/// Errors raised while rendering a report.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A report file could not be written.
    #[error("failed to write report file {path}")]
    Write {
        /// Target file.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// A chart could not be drawn.
    #[error("failed to draw chart {path}")]
    Chart {
        /// Target file.
        path: Utf8PathBuf,
        /// Drawing error.
        #[source]
        source: ChartError,
    },
}

/// Something that presents a [`Report`].
pub trait ReportRenderer {
    /// Render `report`, returning the locations written.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] when output cannot be produced.
    fn render(&self, report: &Report) -> Result<Vec<Utf8PathBuf>, RenderError>;
}
