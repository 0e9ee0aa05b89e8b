//! # CLI Module
//!
//! Command-line interface for the photo filer.
//!
//! ## Usage
//! ```bash
//! # File every photo directly inside a folder
//! photo-filer ~/DCIM/100APPLE
//!
//! # File individual photos
//! photo-filer IMG_0001.jpg IMG_0002.jpg
//! ```
//!
//! Folders are created in the current working directory. Nothing is moved
//! until the printed plan is confirmed with `y`.

use clap::Parser;
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use photo_filer::core::catalog::{basename, CatalogBuilder};
use photo_filer::core::geocode::{NominatimConfig, NominatimResolver};
use photo_filer::core::metadata::ExifMetadataResolver;
use photo_filer::core::organize::{Clusterer, MoveReport, Mover};
use photo_filer::core::reporter::render_plan;
use photo_filer::error::Result;
use std::io::BufRead;
use std::path::PathBuf;
use std::process::ExitCode;

/// The only answer that lets the move go ahead
const CONFIRM_TOKEN: &str = "y";

const CONFIRM_PROMPT: &str = "Create directories and organize files? (y/[n])? ";

/// Organize photos by date taken
#[derive(Parser, Debug)]
#[command(name = "photo-filer")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Image file to organize. If directory, only children are read
    #[arg(value_name = "FILE", required = true)]
    files: Vec<PathBuf>,
}

/// Run the CLI
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    let term = Term::stderr();

    match run_files(&term, &cli.files) {
        Ok(code) => code,
        Err(e) => {
            term.write_line(&format!("{} {}", style("error:").red().bold(), e))
                .ok();
            ExitCode::FAILURE
        }
    }
}

fn run_files(term: &Term, files: &[PathBuf]) -> Result<ExitCode> {
    let places = NominatimResolver::new(NominatimConfig::default())?;
    let mut builder = CatalogBuilder::new(ExifMetadataResolver::new(), places);

    let progress = progress_bar("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}");
    let build = builder.build_with_progress(files, |done, total, path| {
        progress.set_length(total as u64);
        progress.set_position(done as u64);
        progress.set_message(basename(path));
    });
    progress.finish_and_clear();

    for skipped in &build.skipped {
        term.write_line(&format!("{} {}", style("warning:").yellow(), skipped))
            .ok();
    }

    let plan = Clusterer::cluster(&build.catalog);
    if plan.is_empty() {
        term.write_line("No photos with a capture date found. Nothing to organize.")
            .ok();
        return Ok(ExitCode::SUCCESS);
    }

    let out = Term::stdout();
    out.write_str(&render_plan(&plan)).ok();
    out.write_line("").ok();

    if !confirm(&out) {
        return Ok(ExitCode::SUCCESS);
    }

    let root = std::env::current_dir()?;
    let validated = match Mover::new(root).validate(&plan) {
        Ok(validated) => validated,
        Err(e) => {
            term.write_line(&format!("{} {}", style("error:").red().bold(), e))
                .ok();
            return Ok(ExitCode::from(1));
        }
    };

    let progress = progress_bar("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}");
    progress.set_length(plan.photo_count() as u64);
    let report = validated.execute_with_progress(|done, _, name| {
        progress.set_position(done as u64);
        progress.set_message(name.to_string());
    });
    progress.finish_and_clear();

    print_report(term, &report);
    Ok(ExitCode::SUCCESS)
}

fn progress_bar(template: &str) -> ProgressBar {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb
}

/// Ask for confirmation; anything but the exact token declines
///
/// The answer is read from stdin so a piped `y` works when stdout is not a
/// terminal.
fn confirm(term: &Term) -> bool {
    if term.write_str(CONFIRM_PROMPT).is_err() || term.flush().is_err() {
        return false;
    }
    read_answer(&mut std::io::stdin().lock())
}

fn read_answer(input: &mut impl BufRead) -> bool {
    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(_) => is_affirmative(&answer),
        Err(_) => false,
    }
}

fn is_affirmative(answer: &str) -> bool {
    answer.trim_end_matches(['\r', '\n']) == CONFIRM_TOKEN
}

fn print_report(term: &Term, report: &MoveReport) {
    for failure in &report.failures {
        term.write_line(&format!("{} {}", style("error:").red(), failure))
            .ok();
    }

    term.write_line(&format!(
        "{} {} files moved into {} folders in {:.1}s",
        style("✓").green().bold(),
        style(report.files_moved).cyan(),
        style(report.folders_created).cyan(),
        report.duration_ms as f64 / 1000.0
    ))
    .ok();

    if !report.is_clean() {
        term.write_line(&format!(
            "  {} files left in place",
            style(report.files_left()).yellow()
        ))
        .ok();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn at_least_one_path_is_required() {
        assert!(Cli::try_parse_from(["photo-filer"]).is_err());
    }

    #[test]
    fn accepts_files_and_directories() {
        let cli = Cli::try_parse_from(["photo-filer", "a.jpg", "DCIM"]).unwrap();
        assert_eq!(cli.files, vec![PathBuf::from("a.jpg"), PathBuf::from("DCIM")]);
    }

    #[test]
    fn only_exact_y_confirms() {
        assert!(is_affirmative("y"));
        assert!(is_affirmative("y\n"));
        assert!(!is_affirmative("Y"));
        assert!(!is_affirmative("yes"));
        assert!(!is_affirmative(" y"));
        assert!(!is_affirmative(""));
    }

    #[test]
    fn answer_is_read_from_a_plain_stream() {
        assert!(read_answer(&mut "y\n".as_bytes()));
        assert!(read_answer(&mut "y".as_bytes()));
        assert!(!read_answer(&mut "n\n".as_bytes()));
        assert!(!read_answer(&mut "".as_bytes()));
    }
}
