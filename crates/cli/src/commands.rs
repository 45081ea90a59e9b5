use std::{
    io::Write,
    path::{Path, PathBuf},
};

use json_patch::{apply, apply_mut_at, diff_with_options, DiffOptions, Patch};
use json_pointer::ValueExt;
use json_value::{json_eq, Value};
use serde::{de::DeserializeOwned, Serialize};

use crate::{CliConfig, CliError, Command};

pub fn run(config: CliConfig) -> Result<(), CliError> {
    let compact = config.compact;

    match config.command {
        Command::Diff {
            source,
            target,
            detect_moves,
            output,
        } => {
            let source_doc: Value = read_json(&source)?;
            let target_doc: Value = read_json(&target)?;
            let options = DiffOptions::default().detect_moves(detect_moves);

            let patch = diff_with_options(&source_doc, &target_doc, &options);
            tracing::info!(
                source = %source.display(),
                target = %target.display(),
                operations = patch.len(),
                "diff"
            );
            write_json(output.as_deref(), &patch, compact)
        }
        Command::Apply {
            document,
            patch,
            prefix,
            output,
        } => {
            let mut doc: Value = read_json(&document)?;
            let patch: Patch = read_json(&patch)?;

            apply_mut_at(&mut doc, prefix.as_ref(), &patch)?;
            tracing::info!(
                document = %document.display(),
                operations = patch.len(),
                "patch applied"
            );
            write_json(output.as_deref(), &doc, compact)
        }
        Command::Sync {
            source,
            target,
            detect_moves,
            patch_output,
            output,
        } => {
            let source_doc: Value = read_json(&source)?;
            let target_doc: Value = read_json(&target)?;
            let options = DiffOptions::default().detect_moves(detect_moves);

            let (patch, result) = sync_documents(&source_doc, &target_doc, &options)?;
            tracing::info!(operations = patch.len(), "documents synchronized");
            tracing::debug!(?patch, "sync patch");

            if let Some(path) = patch_output {
                write_json(Some(&path), &patch, compact)?;
            }
            write_json(output.as_deref(), &result, compact)
        }
        Command::Get { document, pointer } => {
            let doc: Value = read_json(&document)?;
            let value = doc
                .locate(&pointer)
                .ok_or_else(|| CliError::PathNotFound {
                    pointer: pointer.clone(),
                })?;
            write_json(None, value, compact)
        }
    }
}

/// Diffs `source` against `target`, replays the patch on `source` and checks
/// that the replay reproduces `target`.
pub fn sync_documents(
    source: &Value,
    target: &Value,
    options: &DiffOptions,
) -> Result<(Patch, Value), CliError> {
    let patch = diff_with_options(source, target, options);
    let result = apply(source, &patch)?;
    if !json_eq(&result, target) {
        return Err(CliError::Diverged {
            operations: patch.len(),
        });
    }
    Ok((patch, result))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let data = std::fs::read(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&data).map_err(|source| CliError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_json<T: Serialize + ?Sized>(
    output: Option<&Path>,
    value: &T,
    compact: bool,
) -> Result<(), CliError> {
    let mut data = if compact {
        serde_json::to_vec(value)
    } else {
        serde_json::to_vec_pretty(value)
    }
    .map_err(CliError::Serialize)?;
    data.push(b'\n');

    match output {
        Some(path) => std::fs::write(path, &data).map_err(|source| CliError::Io {
            path: PathBuf::from(path),
            source,
        }),
        None => std::io::stdout()
            .lock()
            .write_all(&data)
            .map_err(CliError::Stdout),
    }
}
