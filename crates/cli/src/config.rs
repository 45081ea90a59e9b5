use std::path::PathBuf;

use clap::{Parser, Subcommand};
use json_pointer::JsonPointer;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Parser)]
#[clap(author, version, about)]
pub struct CliConfig {
    /// Write compact JSON instead of pretty-printed JSON
    #[clap(long, global = true)]
    pub(crate) compact: bool,
    #[clap(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Serialize, Deserialize, Subcommand)]
pub enum Command {
    /// Print the JSON Patch that turns SOURCE into TARGET
    Diff {
        source: PathBuf,
        target: PathBuf,
        /// Emit `move` for object members renamed without a value change
        #[clap(long)]
        detect_moves: bool,
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
    /// Apply the JSON Patch document PATCH to DOCUMENT
    Apply {
        document: PathBuf,
        patch: PathBuf,
        /// Resolve every pointer in the patch below this pointer
        #[clap(long)]
        prefix: Option<JsonPointer>,
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
    /// Diff SOURCE against TARGET, replay the patch on SOURCE and write the verified result
    Sync {
        source: PathBuf,
        target: PathBuf,
        #[clap(long)]
        detect_moves: bool,
        /// Also write the computed patch to this file
        #[clap(long)]
        patch_output: Option<PathBuf>,
        #[clap(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the value POINTER addresses inside DOCUMENT
    Get {
        document: PathBuf,
        pointer: JsonPointer,
    },
}

impl CliConfig {
    pub fn new(command: Command) -> Self {
        Self {
            compact: false,
            command,
        }
    }

    #[must_use]
    pub fn compact(self, compact: bool) -> Self {
        Self { compact, ..self }
    }

    pub fn parse() -> Self {
        Parser::parse()
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use json_pointer::json_pointer;

    use super::*;

    #[test]
    fn parse_apply() {
        let config = CliConfig::try_parse_from([
            "jsondelta",
            "apply",
            "doc.json",
            "patch.json",
            "--prefix",
            "/users/0",
            "--compact",
        ])
        .unwrap();

        assert!(config.compact);
        match config.command {
            Command::Apply {
                document,
                patch,
                prefix,
                output,
            } => {
                assert_eq!(document, PathBuf::from("doc.json"));
                assert_eq!(patch, PathBuf::from("patch.json"));
                assert_eq!(prefix, Some(json_pointer!("/users/0")));
                assert_eq!(output, None);
            }
            command => panic!("unexpected command: {:?}", command),
        }
    }

    #[test]
    fn rejects_malformed_pointer() {
        assert!(CliConfig::try_parse_from(["jsondelta", "get", "doc.json", "a/b"]).is_err());
        assert!(CliConfig::try_parse_from(["jsondelta", "get", "doc.json", "/a~9"]).is_err());
    }
}
