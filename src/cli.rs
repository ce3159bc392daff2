//! Command-line front end.
//!
//! Each subcommand drives one [`EditorSession`] the way the editor window
//! would: open a file, apply one edit, export. Output goes to the writer
//! passed to [`run`] so commands can be exercised without a terminal.

use crate::models::{RecordId, TypeRecord};
use crate::services;
use crate::state::EditorSession;
use anyhow::{Context, Result, bail};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use regex::Regex;
use std::io::Write;

#[derive(Parser, Debug)]
#[command(name = "typesforge")]
#[command(about = "Inspect and edit DayZ types.xml loot tables")]
#[command(version)]
pub struct Cli {
    /// Directory holding typesforge.yaml
    #[arg(long, global = true, default_value = "typesforge")]
    pub config_dir: Utf8PathBuf,

    /// Log at debug level
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the types in a file
    List {
        file: Utf8PathBuf,

        /// Only show names matching this regular expression
        #[arg(short, long)]
        filter: Option<String>,
    },

    /// Show every field of one type
    Show {
        file: Utf8PathBuf,
        name: String,

        /// Print the type as it would be written to types.xml
        #[arg(long)]
        xml: bool,
    },

    /// Merge files into a base file; names already present are kept
    Merge {
        base: Utf8PathBuf,

        #[arg(required = true)]
        incoming: Vec<Utf8PathBuf>,

        #[arg(short, long)]
        output: Utf8PathBuf,
    },

    /// Copy a type, inserting the copy right after it
    Duplicate {
        file: Utf8PathBuf,
        name: String,

        /// Name of the copy (default: <name>_Copy)
        #[arg(long = "as")]
        new_name: Option<String>,

        /// Write here instead of overwriting the input
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,
    },

    /// Remove a type
    Delete {
        file: Utf8PathBuf,
        name: String,

        #[arg(short, long)]
        output: Option<Utf8PathBuf>,
    },

    /// Add a type using a preset from a reference file
    Preset {
        /// Reference file, usually the vanilla types.xml
        #[arg(long)]
        presets: Utf8PathBuf,

        /// Preset to copy
        #[arg(long)]
        name: String,

        /// File to add the type to (default: start a new list)
        #[arg(long)]
        into: Option<Utf8PathBuf>,

        /// Name for the new type
        #[arg(long = "as")]
        new_name: Option<String>,

        /// Replace a type of the same name instead of failing
        #[arg(long)]
        overwrite: bool,

        #[arg(short, long)]
        output: Utf8PathBuf,
    },

    /// Print the category list offered for a file
    Categories {
        file: Utf8PathBuf,

        #[arg(long)]
        presets: Option<Utf8PathBuf>,
    },

    /// Rewrite a file in canonical form
    Normalize {
        file: Utf8PathBuf,

        #[arg(short, long)]
        output: Utf8PathBuf,
    },
}

/// Execute one command against `session`, writing results to `out`.
pub fn run<W: Write>(command: &Command, session: &EditorSession, out: &mut W) -> Result<()> {
    match command {
        Command::List { file, filter } => {
            let filter = filter
                .as_deref()
                .map(Regex::new)
                .transpose()
                .context("Invalid --filter expression")?;
            session.open_working(file)?;
            let state = session.snapshot();
            for record in state.working.list() {
                if filter.as_ref().is_some_and(|re| !re.is_match(&record.name)) {
                    continue;
                }
                writeln!(
                    out,
                    "{}\t{}\tnominal={} min={}",
                    record.name,
                    record.category.as_deref().unwrap_or("-"),
                    record.nominal,
                    record.min
                )?;
            }
        }

        Command::Show { file, name, xml } => {
            session.open_working(file)?;
            let record = session
                .read(|state| state.working.get_by_name(name).cloned())
                .with_context(|| format!("Type '{}' not found in {}", name, file))?;
            if *xml {
                write!(out, "{}", to_fragment(&record)?)?;
            } else {
                write!(out, "{}", describe(&record))?;
            }
        }

        Command::Merge {
            base,
            incoming,
            output,
        } => {
            open_reporting(session, base, out)?;
            for path in incoming {
                let report = session.merge_working(path)?;
                writeln!(out, "{}: {}", path, report.summary())?;
            }
            let count = session.export(output)?;
            writeln!(out, "Wrote {} types to {}", count, output)?;
        }

        Command::Duplicate {
            file,
            name,
            new_name,
            output,
        } => {
            open_reporting(session, file, out)?;
            let id = require(session, name)?;
            let copy = session.duplicate(id, new_name.as_deref())?;
            let copy_name = session.read(|state| {
                state
                    .working
                    .get(copy)
                    .map(|r| r.name.clone())
                    .unwrap_or_default()
            });
            let target = output.as_ref().unwrap_or(file);
            session.export(target)?;
            writeln!(out, "Duplicated {} as {} in {}", name, copy_name, target)?;
        }

        Command::Delete { file, name, output } => {
            open_reporting(session, file, out)?;
            let id = require(session, name)?;
            session.delete(id)?;
            let target = output.as_ref().unwrap_or(file);
            session.export(target)?;
            writeln!(out, "Deleted {} from {}", name, target)?;
        }

        Command::Preset {
            presets,
            name,
            into,
            new_name,
            overwrite,
            output,
        } => {
            match into {
                Some(path) => open_reporting(session, path, out)?,
                None => session.new_list(),
            }
            session.load_presets(presets)?;
            let final_name = new_name.as_deref().unwrap_or(name);
            let target = if *overwrite {
                session.find(final_name)
            } else {
                None
            };
            session.apply_preset(name, target, new_name.as_deref())?;
            session.export(output)?;
            writeln!(out, "Added {} from preset {} to {}", final_name, name, output)?;
        }

        Command::Categories { file, presets } => {
            session.open_working(file)?;
            if let Some(path) = presets {
                session.load_presets(path)?;
            }
            for category in session.category_pool() {
                writeln!(out, "{}", category)?;
            }
        }

        Command::Normalize { file, output } => {
            open_reporting(session, file, out)?;
            let count = session.export(output)?;
            writeln!(out, "Wrote {} types to {}", count, output)?;
        }
    }

    Ok(())
}

/// Open `path` as the working set and print any type that could not be kept,
/// since commands that re-export would otherwise lose it unnoticed.
fn open_reporting<W: Write>(session: &EditorSession, path: &Utf8Path, out: &mut W) -> Result<()> {
    let report = session.open_working(path)?;
    if report.has_conflicts() {
        writeln!(
            out,
            "{}: dropped repeated types: {}",
            path,
            report.skipped.join(", ")
        )?;
    }
    Ok(())
}

fn require(session: &EditorSession, name: &str) -> Result<RecordId> {
    match session.find(name) {
        Some(id) => Ok(id),
        None => bail!("Type '{}' not found", name),
    }
}

/// Human-readable dump of every field of a record.
pub fn describe(record: &TypeRecord) -> String {
    let list = |items: &[String]| {
        if items.is_empty() {
            "-".to_string()
        } else {
            items.join(", ")
        }
    };
    let enabled = record.flags.enabled();

    let mut text = format!("{}\n", record.name);
    for (label, value) in [
        ("nominal", record.nominal),
        ("lifetime", record.lifetime),
        ("restock", record.restock),
        ("min", record.min),
        ("quantmin", record.quantmin),
        ("quantmax", record.quantmax),
        ("cost", record.cost),
    ] {
        text.push_str(&format!("  {:<9}{}\n", label, value));
    }
    text.push_str(&format!(
        "  {:<9}{}\n",
        "flags",
        if enabled.is_empty() {
            "-".to_string()
        } else {
            enabled.join(", ")
        }
    ));
    text.push_str(&format!(
        "  {:<9}{}\n",
        "category",
        record.category.as_deref().unwrap_or("-")
    ));
    text.push_str(&format!("  {:<9}{}\n", "usage", list(&record.usage)));
    text.push_str(&format!("  {:<9}{}\n", "value", list(&record.value)));
    text.push_str(&format!("  {:<9}{}\n", "tag", list(&record.tag)));
    text
}

/// Render one record as a `types.xml` fragment without declaration.
pub fn to_fragment(record: &TypeRecord) -> Result<String> {
    let settings = crate::models::ExportSettings {
        xml_declaration: false,
        ..Default::default()
    };
    Ok(services::export(std::iter::once(record), &settings)?)
}
