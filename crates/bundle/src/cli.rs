//! Command-line surface for classifying text and previewing layouts.

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use serde::Serialize;

use crate::app::classify::classify;
use crate::app::factory::ButtonFactory;
use crate::app::surface::{BundleSurface, Placement};
use crate::domain::model::TextKind;
use crate::infra::clipboard::Clipboard;
use crate::infra::config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "bundle",
    author,
    version,
    about = "Classify dropped text and lay it out on a bundle grid",
    long_about = None
)]
pub struct Cli {
    /// Config file layered over the built-in defaults instead of the user/workspace files
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the kind of a block of text
    Classify {
        /// Text to classify; read from stdin when omitted
        text: Option<String>,
        /// Classify the clipboard contents
        #[arg(long, conflicts_with = "text")]
        clipboard: bool,
        #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,
    },
    /// Drop each file's contents onto an empty surface and print where it lands
    Layout {
        /// Files whose contents are dropped in order; stdin is used when none are given
        files: Vec<PathBuf>,
        /// Drop the clipboard contents after the files
        #[arg(long)]
        clipboard: bool,
        /// Override the configured column limit
        #[arg(long)]
        max_columns: Option<usize>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Plain)]
        format: OutputFormat,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Output encodings for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Human readable text.
    Plain,
    /// One JSON document.
    Json,
}

/// Result of classifying one block of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassifyReport {
    pub kind: TextKind,
    pub entries: Vec<String>,
}

impl ClassifyReport {
    pub fn new(text: &str) -> Self {
        let kind = classify(text);
        let entries = match kind {
            TextKind::Unknown => Vec::new(),
            kind => ButtonFactory::entries(kind, text),
        };
        Self { kind, entries }
    }
}

/// A placement together with the input it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourcedPlacement {
    pub source: String,
    #[serde(flatten)]
    pub placement: Placement,
}

/// Everything `bundle layout` learned from a sequence of drops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutReport {
    pub max_columns: usize,
    pub placements: Vec<SourcedPlacement>,
    pub skipped: Vec<String>,
}

impl LayoutReport {
    /// Drop every `(source, text)` pair onto `surface` in order.
    pub fn build(surface: &mut BundleSurface, drops: &[(String, String)]) -> Result<Self> {
        let mut placements = Vec::new();
        let mut skipped = Vec::new();

        for (source, text) in drops {
            match surface
                .drop_text(text)
                .with_context(|| format!("failed to place drop from {source}"))?
            {
                Some(placement) => placements.push(SourcedPlacement {
                    source: source.clone(),
                    placement,
                }),
                None => skipped.push(source.clone()),
            }
        }

        Ok(Self {
            max_columns: surface.max_columns(),
            placements,
            skipped,
        })
    }

    /// Tab separated table, then one line per skipped source.
    pub fn render_plain(&self) -> String {
        let mut out = String::from("row\tcol\tkind\ticon\tentries\tsource\n");
        for item in &self.placements {
            let p = &item.placement;
            out.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\n",
                p.slot.row,
                p.slot.col,
                p.kind,
                p.icon,
                p.entries.len(),
                item.source
            ));
        }
        for source in &self.skipped {
            out.push_str(&format!("skipped\t{source}\tunrecognised text\n"));
        }
        out
    }
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Execute the parsed command, writing results to stdout.
    pub fn run(self) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();

        match self.command {
            Commands::Completions { shell } => {
                clap_complete::generate(shell, &mut Cli::command(), "bundle", &mut out);
                Ok(())
            }
            Commands::Classify {
                text,
                clipboard,
                format,
            } => {
                let text = match (text, clipboard) {
                    (Some(text), _) => text,
                    (None, true) => Clipboard::new().read_text()?,
                    (None, false) => read_stdin()?,
                };
                let report = ClassifyReport::new(&text);
                match format {
                    OutputFormat::Plain => writeln!(out, "{}", report.kind)?,
                    OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&report)?)?,
                }
                Ok(())
            }
            Commands::Layout {
                files,
                clipboard,
                max_columns,
                format,
            } => {
                let config = match &self.config {
                    Some(path) => Config::load_from(path)?,
                    None => Config::load()?,
                };
                let mut drops = Vec::new();
                for path in &files {
                    let text = fs::read_to_string(path)
                        .with_context(|| format!("failed to read {}", path.display()))?;
                    drops.push((path.display().to_string(), text));
                }
                if clipboard {
                    drops.push(("<clipboard>".to_owned(), Clipboard::new().read_text()?));
                }
                if drops.is_empty() {
                    drops.push(("<stdin>".to_owned(), read_stdin()?));
                }

                let mut surface = match max_columns {
                    Some(columns) => BundleSurface::new(columns, config.icons.clone()),
                    None => BundleSurface::from_config(&config),
                };
                let report = LayoutReport::build(&mut surface, &drops)?;
                match format {
                    OutputFormat::Plain => write!(out, "{}", report.render_plain())?,
                    OutputFormat::Json => {
                        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?
                    }
                }
                Ok(())
            }
        }
    }
}

fn read_stdin() -> Result<String> {
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("failed to read text from stdin")?;
    Ok(text)
}
