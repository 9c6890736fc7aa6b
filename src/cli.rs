//! Minimal CLI: schema JSON on stdin → JSON Schema document on stdout or disk
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::level_filters::LevelFilter;

use crate::document::{generate, render};
use crate::translate::TranslateOptions;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// translate a parsed IDL schema (JSON on stdin) into a JSON Schema draft-04 document
#[derive(Parser, Debug)]
#[command(name = "idl-json-schema")]
pub struct CommandLineInterface {
    /// output .json file, or a directory to write `<SchemaName>.json` into (stdout if omitted)
    #[arg(short = 'o')]
    out: Option<PathBuf>,

    /// base path for generated references
    #[arg(short = 'b')]
    base_path: Option<String>,

    /// IDL source file; ignored
    #[arg(short = 's')]
    source: Option<String>,

    /// more logging on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Where the rendered document goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputTarget {
    Stdout,
    File(PathBuf),
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl CommandLineInterface {
    /// Parse the process arguments. Usage errors come back to the caller
    /// instead of exiting the process.
    pub fn load() -> Result<Self, clap::Error> {
        Self::load_from(std::env::args_os())
    }

    pub fn load_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        Self::try_parse_from(args)
    }

    pub fn init_logging(&self) {
        let level = match self.verbose {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        };
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .with_writer(std::io::stderr)
            .init();
    }

    pub fn run(&self) -> Result<()> {
        if let Some(source) = self.source.as_deref() {
            tracing::debug!(source, "ignoring IDL source path");
        }

        let schema = crate::path_de::read_schema(std::io::stdin().lock())?;
        let options = TranslateOptions { base_path: self.base_path.clone() };
        let document = generate(&schema, &options)
            .with_context(|| format!("failed to translate schema `{}`", schema.name))?;
        for diagnostic in &document.diagnostics {
            eprintln!("{diagnostic}");
        }

        // nothing is opened until the document is fully rendered
        let rendered = render(&document.body)?;
        let target = OutputTarget::resolve(self.out.as_deref(), &schema.name);
        tracing::debug!(?target, bytes = rendered.len(), "writing document");
        target.write(&rendered)
    }
}

impl OutputTarget {
    /// `None` or empty → stdout; `*.json` → that exact file; anything else is a
    /// directory receiving `<schema_name>.json`.
    pub fn resolve(out: Option<&Path>, schema_name: &str) -> Self {
        let Some(out) = out.filter(|p| !p.as_os_str().is_empty()) else {
            return OutputTarget::Stdout;
        };
        if out.to_string_lossy().ends_with(".json") {
            return OutputTarget::File(out.to_path_buf());
        }
        let stem = if schema_name.is_empty() { "anonymous" } else { schema_name };
        OutputTarget::File(out.join(format!("{stem}.json")))
    }

    pub fn write(&self, bytes: &[u8]) -> Result<()> {
        match self {
            OutputTarget::Stdout => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(bytes)?;
                stdout.flush()?;
            }
            OutputTarget::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create {}", parent.display()))?;
                }
                let file = File::create(path)
                    .with_context(|| format!("failed to create {}", path.display()))?;
                let mut writer = BufWriter::new(file);
                writer.write_all(bytes)?;
                writer.flush()
                    .with_context(|| format!("failed to write {}", path.display()))?;
            }
        }
        Ok(())
    }
}
