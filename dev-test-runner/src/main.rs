//! Golden-file runner: every `fixtures/<case>.idl.json` must translate to
//! `fixtures/<case>.schema.json`. Pass `--bless` to rewrite the expectations.
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use colored::Colorize;
use serde_json::Value;

use idl_json_schema::path_de::from_str_with_path;
use idl_json_schema::{Schema, TranslateOptions, generate, render};

fn main() -> ExitCode {
    let bless = std::env::args().any(|arg| arg == "--bless");
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures");
    let cases = match collect_cases(&fixtures) {
        Ok(cases) => cases,
        Err(error) => {
            eprintln!("*** {error:#}");
            return ExitCode::FAILURE;
        }
    };

    let mut failed = 0usize;
    for input in &cases {
        let name = case_name(input);
        match run_case(input, bless) {
            Ok(true) => eprintln!("{} {name}", "✅ pass".green()),
            Ok(false) => {
                failed += 1;
                eprintln!("{} {name}", "❌ mismatch".red());
            }
            Err(error) => {
                failed += 1;
                eprintln!("{} {name}: {error:#}", "❌ error".red());
            }
        }
    }

    let summary = format!("{} cases, {failed} failed", cases.len());
    if failed == 0 {
        eprintln!("{}", summary.bold().green());
        ExitCode::SUCCESS
    } else {
        eprintln!("{}", summary.bold().red());
        ExitCode::FAILURE
    }
}

fn collect_cases(fixtures: &Path) -> Result<Vec<PathBuf>> {
    let pattern = fixtures.join("*.idl.json");
    let pattern = pattern.to_string_lossy();
    let mut cases = glob::glob(&pattern)
        .with_context(|| format!("bad fixture pattern {pattern}"))?
        .collect::<Result<Vec<_>, _>>()?;
    cases.sort();
    Ok(cases)
}

fn case_name(input: &Path) -> String {
    let file = input.file_name().map(|f| f.to_string_lossy().to_string()).unwrap_or_default();
    file.trim_end_matches(".idl.json").to_string()
}

/// Translate one fixture; `Ok(false)` when the output differs from the expectation.
fn run_case(input: &Path, bless: bool) -> Result<bool> {
    let source = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let schema: Schema = from_str_with_path(&source)?;
    let document = generate(&schema, &TranslateOptions::default())?;
    let rendered = render(&document.body)?;

    let expected_path = input.with_file_name(format!("{}.schema.json", case_name(input)));
    if bless {
        std::fs::write(&expected_path, &rendered)?;
        return Ok(true);
    }
    let expected = std::fs::read_to_string(&expected_path)
        .with_context(|| format!("missing expectation {}", expected_path.display()))?;
    let expected: Value = serde_json::from_str(&expected)?;
    let actual: Value = serde_json::from_slice(&rendered)?;
    if expected != actual {
        eprintln!("{}\n{}", "expected:".yellow(), serde_json::to_string_pretty(&expected)?);
        eprintln!("{}\n{}", "actual:".yellow(), serde_json::to_string_pretty(&actual)?);
    }
    Ok(expected == actual)
}
