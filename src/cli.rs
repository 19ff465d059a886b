//! Command-line argument parsing.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// demostat - summary statistics over demographic/income survey CSVs
///
/// Examples:
///   demostat data/survey.csv
///   demostat data/survey.csv --mode json
///   demostat --mode tui --data-dir data
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// CSV file to analyze (required in console and json modes)
    #[arg(value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// How to report the results
    #[arg(short, long, value_enum, default_value_t = Mode::Console)]
    pub mode: Mode,

    /// Directory the interactive picker lists CSV files from
    #[arg(long, value_name = "DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Print the ten labeled report lines to stdout
    Console,
    /// Print the result as pretty JSON
    Json,
    /// Interactive terminal UI with a CSV file picker
    Tui,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.mode != Mode::Tui && self.input.is_none() {
            return Err(format!(
                "an input CSV file is required in {:?} mode",
                self.mode
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_mode_requires_an_input() {
        let args = Args::try_parse_from(["demostat"]).unwrap();
        assert!(args.validate().is_err());
    }

    #[test]
    fn tui_mode_needs_no_input() {
        let args = Args::try_parse_from(["demostat", "--mode", "tui"]).unwrap();
        assert!(args.validate().is_ok());
        assert_eq!(args.data_dir, PathBuf::from("data"));
    }

    #[test]
    fn input_and_mode_parse() {
        let args =
            Args::try_parse_from(["demostat", "survey.csv", "--mode", "json"]).unwrap();
        assert_eq!(args.input, Some(PathBuf::from("survey.csv")));
        assert_eq!(args.mode, Mode::Json);
    }
}
