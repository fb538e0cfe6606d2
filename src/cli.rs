/// CLI argument definitions for the `dupscan` command.
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::config::AnalyzerConfig;
use crate::enhance::EnhancerConfig;
use crate::report;
use crate::{AnalyzeOptions, Analyzer};

/// Analyze a codebase for duplicated and reimplemented functionality.
#[derive(Parser)]
#[command(
    name = "dupscan",
    version,
    about = "Source-code duplication and architectural-compliance analyzer"
)]
pub struct Cli {
    /// Project root to analyze (default: current directory)
    pub path: Option<PathBuf>,

    /// Specific files or directories to analyze, relative to the root
    #[arg(long = "paths", value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Additional exclusion glob (repeatable)
    #[arg(long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Skip the external reasoning enhancement
    #[arg(long)]
    pub no_enhance: bool,

    /// Output the full report as JSON
    #[arg(long)]
    pub json: bool,

    /// How many recommendations to show (default: 10)
    #[arg(long, default_value = "10")]
    pub top: usize,

    /// Abort pending analysis stages after this many seconds
    #[arg(long, value_name = "SECS")]
    pub deadline_secs: Option<u64>,
}

/// Run one analysis from parsed arguments. Returns the process exit code.
pub fn run(cli: Cli) -> i32 {
    let root = cli.path.unwrap_or_else(|| PathBuf::from("."));

    let config = AnalyzerConfig {
        top_recommendations: cli.top,
        ..Default::default()
    };

    let mut analyzer = Analyzer::new(config);
    if !cli.no_enhance
        && let Some(enhancer) = EnhancerConfig::from_env(analyzer.config().enhancer_timeout)
    {
        analyzer = analyzer.with_enhancer(enhancer);
    }

    let options = AnalyzeOptions {
        targets: cli.paths,
        exclude: cli.exclude,
        disable_enhancement: cli.no_enhance,
        deadline: cli.deadline_secs.map(Duration::from_secs),
    };

    let result = analyzer.analyze(&root, &options);

    if cli.json {
        match result.to_json() {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: {err}");
                return 1;
            }
        }
    } else {
        report::print_text(&result, cli.top);
    }

    if result.error.is_some() { 1 } else { 0 }
}
