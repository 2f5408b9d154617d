use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Only show critical errors
    Quiet,
    /// Show standard information
    #[default]
    Normal,
    /// Show detailed information
    Verbose,
}

impl VerbosityLevel {
    /// Log filter used when `RUST_LOG` is not set
    pub fn default_log_filter(&self) -> &'static str {
        match self {
            VerbosityLevel::Quiet => "error",
            VerbosityLevel::Normal => "warn",
            VerbosityLevel::Verbose => "prismic_sitemap=debug,info",
        }
    }
}

/// Generate an XML sitemap from a Prismic repository
#[derive(Parser, Debug, Clone)]
#[command(name = "prismic-sitemap")]
#[command(about = "Generate an XML sitemap from the documents of a Prismic repository")]
#[command(version)]
pub struct Cli {
    /// Configuration file (TOML or JSON)
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Prismic API endpoint, e.g. https://my-repo.cdn.prismic.io/api/v2
    #[arg(long = "endpoint")]
    pub endpoint: Option<String>,

    /// Access token for private repositories
    #[arg(long = "access-token")]
    pub access_token: Option<String>,

    /// Base URL of the site
    #[arg(long = "hostname")]
    pub hostname: Option<String>,

    /// Document type to include (repeatable, default all types)
    #[arg(short = 't', long = "type", action = clap::ArgAction::Append)]
    pub document_types: Vec<String>,

    /// URL template, placeholders {type} {uid} {id} {lang}
    #[arg(short = 'l', long = "link-template")]
    pub link_template: Option<String>,

    /// Output file name
    #[arg(long = "file-name")]
    pub file_name: Option<String>,

    /// Output directory
    #[arg(long = "public-path")]
    pub public_path: Option<PathBuf>,

    /// Directory the default "public" output directory is placed in
    #[arg(long = "base-dir")]
    pub base_dir: Option<PathBuf>,

    /// Add <lastmod> from each document's last publication date
    #[arg(long = "lastmod")]
    pub lastmod: bool,

    /// Indent the generated XML
    #[arg(long = "pretty")]
    pub pretty: bool,

    /// HTTP request timeout in seconds
    #[arg(long = "timeout")]
    pub timeout: Option<u64>,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", help = "Enable verbose output")]
    pub verbose: bool,

    /// Enable quiet mode (errors only)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Quiet mode",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }

    /// Base directory for the default output path: the flag, else the executable's directory
    pub fn get_base_dir(&self) -> PathBuf {
        self.base_dir.clone().unwrap_or_else(|| {
            std::env::current_exe()
                .ok()
                .and_then(|exe| exe.parent().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from("."))
        })
    }
}
