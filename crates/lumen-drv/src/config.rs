//! CLI surface and the optional `lumen.toml` defaults file (spec §4.10,
//! ambient — not part of the language itself).

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

/// `lumen SOURCE.mml [--emit-tokens] [--emit-ast] [-v]... [--no-color]`
#[derive(Debug, Parser)]
#[command(name = "lumen", about = "Lexes, parses, type-checks, and evaluates a Lumen program")]
pub struct Cli {
    /// Path to the `.mml` source file to run.
    pub source: PathBuf,

    /// Print the token stream and stop (exit 0), instead of running the
    /// pipeline to completion.
    #[arg(long)]
    pub emit_tokens: bool,

    /// Print the parsed AST and stop (exit 0).
    #[arg(long)]
    pub emit_ast: bool,

    /// Increase log verbosity; repeatable (`-v`, `-vv`).
    #[arg(short, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Disable ANSI color in diagnostic output.
    #[arg(long)]
    pub no_color: bool,
}

/// Persistent defaults read from a `lumen.toml` beside the source file, if
/// one exists. CLI flags always take precedence over these.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub no_color: bool,
    #[serde(default)]
    pub verbose: u8,
}

impl FileConfig {
    /// Looks for `lumen.toml` next to `source`; absence is not an error —
    /// the defaults are optional, not required, configuration.
    pub fn load_beside(source: &Path) -> Self {
        let dir = source.parent().unwrap_or_else(|| Path::new("."));
        let candidate = dir.join("lumen.toml");
        let Ok(text) = std::fs::read_to_string(&candidate) else {
            return Self::default();
        };
        match toml::from_str(&text) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %candidate.display(), error = %e, "ignoring malformed lumen.toml");
                Self::default()
            }
        }
    }
}

/// The CLI, merged with any `lumen.toml` defaults it didn't already override.
#[derive(Debug)]
pub struct Config {
    pub source: PathBuf,
    pub emit_tokens: bool,
    pub emit_ast: bool,
    pub verbose: u8,
    pub no_color: bool,
}

impl Config {
    pub fn resolve(cli: Cli) -> Self {
        let file = FileConfig::load_beside(&cli.source);
        Self {
            no_color: cli.no_color || file.no_color,
            verbose: cli.verbose.max(file.verbose),
            source: cli.source,
            emit_tokens: cli.emit_tokens,
            emit_ast: cli.emit_ast,
        }
    }
}
