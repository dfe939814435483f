//! `reset-cursor` command: rewind a genre's cursor to page zero.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use gigline_core::{CursorKey, CursorStore};
use gigline_data::cursor::FileCursorStore;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{ARG_CURSOR_DIR, ARG_GENRE, CliError, DEFAULT_CURSOR_DIR, ENV_RESET_GENRE};

/// CLI arguments for the `reset-cursor` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "reset-cursor",
    about = "Rewind a genre's cursor so the next ingest starts at page zero"
)]
#[ortho_config(prefix = "GIGLINE")]
pub(crate) struct ResetArgs {
    /// Genre whose cursor is reset.
    #[arg(long = ARG_GENRE, value_name = "genre")]
    #[serde(default)]
    pub(crate) genre: Option<String>,
    /// Directory holding cursor files (default `.`).
    #[arg(long = ARG_CURSOR_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) cursor_dir: Option<Utf8PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ResetConfig {
    pub(crate) key: CursorKey,
    pub(crate) cursor_dir: Utf8PathBuf,
}

impl TryFrom<ResetArgs> for ResetConfig {
    type Error = CliError;

    fn try_from(args: ResetArgs) -> Result<Self, Self::Error> {
        let genre = args.genre.ok_or(CliError::MissingArgument {
            field: ARG_GENRE,
            env: ENV_RESET_GENRE,
        })?;
        Ok(Self {
            key: CursorKey::new(&genre).map_err(CliError::InvalidGenre)?,
            cursor_dir: args
                .cursor_dir
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_CURSOR_DIR)),
        })
    }
}

pub(crate) fn run_reset_with(args: ResetArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let config = ResetConfig::try_from(merged)?;
    let cursors = FileCursorStore::new(&config.cursor_dir);
    cursors.reset(&config.key)?;
    writeln!(
        writer,
        "reset cursor {} to page 0",
        cursors.path_for(&config.key)
    )
    .map_err(CliError::WriteOutput)
}
