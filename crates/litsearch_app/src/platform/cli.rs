use std::path::PathBuf;

use clap::Parser;
use litsearch_core::{MAX_RESULTS_MAX, MAX_RESULTS_MIN};

use super::settings::Settings;

/// Streaming literature search client.
#[derive(Debug, Clone, Parser)]
#[command(name = "litsearch", version, about)]
pub struct Cli {
    /// Settings file (RON). Defaults to `litsearch.ron` in the working directory.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Streaming search endpoint.
    #[arg(long, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Directory that receives CSV exports.
    #[arg(long, value_name = "DIR")]
    pub export_dir: Option<PathBuf>,

    /// Keyword to prefill (required with --headless).
    #[arg(long, value_name = "KEYWORD")]
    pub keyword: Option<String>,

    /// Number of results to request.
    #[arg(
        long,
        value_name = "N",
        value_parser = clap::value_parser!(u32)
            .range(i64::from(MAX_RESULTS_MIN)..=i64::from(MAX_RESULTS_MAX))
    )]
    pub max_results: Option<u32>,

    /// Skip full-text extraction.
    #[arg(long)]
    pub no_fulltext: bool,

    /// Run one search without the terminal UI and print the log.
    #[arg(long, requires = "keyword")]
    pub headless: bool,

    /// Write the CSV export when a headless search finishes.
    #[arg(long, requires = "headless")]
    pub export: bool,
}

/// Initial values for the keyword field and the confirmation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartInputs {
    pub keyword: String,
    pub max_results: u32,
    pub enable_fulltext: bool,
}

impl Cli {
    pub fn start_inputs(&self, settings: &Settings) -> StartInputs {
        StartInputs {
            keyword: self.keyword.clone().unwrap_or_default(),
            max_results: self.max_results.unwrap_or(settings.default_max_results),
            enable_fulltext: !self.no_fulltext,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn headless_requires_keyword() {
        assert!(Cli::try_parse_from(["litsearch", "--headless"]).is_err());
        let cli = Cli::try_parse_from(["litsearch", "--headless", "--keyword", "zinc"]).unwrap();
        assert!(cli.headless);
    }

    #[test]
    fn max_results_is_range_checked() {
        assert!(Cli::try_parse_from(["litsearch", "--max-results", "0"]).is_err());
        assert!(Cli::try_parse_from(["litsearch", "--max-results", "101"]).is_err());
        let cli = Cli::try_parse_from(["litsearch", "--max-results", "35"]).unwrap();
        assert_eq!(cli.max_results, Some(35));
    }

    #[test]
    fn start_inputs_fall_back_to_settings() {
        let settings = Settings {
            default_max_results: 42,
            ..Settings::default()
        };
        let cli = Cli::try_parse_from(["litsearch", "--no-fulltext"]).unwrap();
        assert_eq!(
            cli.start_inputs(&settings),
            StartInputs {
                keyword: String::new(),
                max_results: 42,
                enable_fulltext: false,
            }
        );
    }
}
