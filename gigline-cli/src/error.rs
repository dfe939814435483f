//! Error types emitted by the gigline CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.
//! Messages describe their own layer only; the binary prints the source chain.

use std::sync::Arc;

use camino::Utf8PathBuf;
use gigline_core::{CursorError, CursorKeyError};
use gigline_data::pipeline::PipelineError;
use gigline_data::report::RenderError;
use gigline_data::store::StoreError;
use gigline_data::ticketmaster::SourceBuildError;
use thiserror::Error;

/// Errors emitted by the gigline CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without the leading dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// The genre cannot scope a cursor.
    #[error("invalid genre")]
    InvalidGenre(#[source] CursorKeyError),
    /// The requested page size is outside what the API accepts.
    #[error("page size {value} is outside 1..={max}")]
    InvalidPageSize {
        /// Requested size.
        value: u32,
        /// Largest accepted size.
        max: u32,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        /// Flag naming the path.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        /// Flag naming the path.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}")]
    InspectSourcePath {
        /// Flag naming the path.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Constructing the Ticketmaster client failed.
    #[error("failed to build event source for {base_url:?}")]
    BuildEventSource {
        /// Base URL the client was configured with.
        base_url: String,
        /// Builder error.
        #[source]
        source: SourceBuildError,
    },
    /// The event database could not be opened.
    #[error("failed to open event database {path:?}")]
    OpenDatabase {
        /// Database location.
        path: Utf8PathBuf,
        /// Store error.
        #[source]
        source: StoreError,
    },
    /// The ingestion run stopped on an error.
    #[error("ingestion failed")]
    Ingest(#[source] PipelineError),
    /// The report queries failed.
    #[error("failed to aggregate {path:?}")]
    Aggregate {
        /// Database location.
        path: Utf8PathBuf,
        /// Store error.
        #[source]
        source: StoreError,
    },
    /// Writing the report files failed.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// Resetting the cursor failed.
    #[error(transparent)]
    ResetCursor(#[from] CursorError),
    /// Writing command output failed.
    #[error("failed to write command output")]
    WriteOutput(#[source] std::io::Error),
}
