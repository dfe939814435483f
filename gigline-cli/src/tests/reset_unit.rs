//! Unit tests for the reset-cursor command.

use super::helpers::Workspace;
use super::*;
use crate::reset::{ResetArgs, ResetConfig, run_reset_with};
use gigline_core::{CursorKey, CursorStore};
use gigline_data::cursor::FileCursorStore;
use rstest::rstest;

#[rstest]
fn missing_genre_names_flag_and_variable() {
    let err = ResetConfig::try_from(ResetArgs::default()).expect_err("genre is required");
    match err {
        CliError::MissingArgument { field, env } => {
            assert_eq!(field, ARG_GENRE);
            assert_eq!(env, ENV_RESET_GENRE);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn blank_genre_is_rejected() {
    let args = ResetArgs {
        genre: Some(" ".into()),
        cursor_dir: None,
    };
    let err = ResetConfig::try_from(args).expect_err("blank genre");
    assert!(matches!(err, CliError::InvalidGenre(_)), "found {err:?}");
}

#[rstest]
fn reset_rewinds_an_advanced_cursor() {
    let workspace = Workspace::new();
    let cursors = FileCursorStore::new(workspace.cursor_dir());
    let key = CursorKey::new("Hip Hop").expect("key");
    cursors.save(&key, 7).expect("seed cursor");
    let args = ResetArgs {
        genre: Some("Hip Hop".into()),
        cursor_dir: Some(workspace.cursor_dir()),
    };
    let mut stdout = Vec::new();

    run_reset_with(args, &mut stdout).expect("reset");

    assert_eq!(cursors.load(&key), 0);
    let output = String::from_utf8(stdout).expect("utf-8 output");
    assert!(
        output.contains("current_page_Hip%20Hop.txt"),
        "output was {output:?}"
    );
}

#[rstest]
fn reset_creates_missing_cursor_directory() {
    let workspace = Workspace::new();
    let cursor_dir = workspace.root().join("nested/cursors");
    let args = ResetArgs {
        genre: Some("Rock".into()),
        cursor_dir: Some(cursor_dir.clone()),
    };
    let mut stdout = Vec::new();

    run_reset_with(args, &mut stdout).expect("reset");

    let key = CursorKey::new("Rock").expect("key");
    let path = FileCursorStore::new(&cursor_dir).path_for(&key);
    assert_eq!(gigline_fs::read_to_string(&path).expect("cursor file").trim(), "0");
}
