use anyhow::Context;

use prismic_sitemap::logging::setup_logging;
use prismic_sitemap::{Cli, ConfigManager, HttpClientConfig, Output, SitemapBuilder, SitemapConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();
    let verbosity = cli.verbosity();
    setup_logging(verbosity.default_log_filter());

    let settings = ConfigManager::load_settings(&cli)
        .await
        .context("Failed to load configuration")?;
    let config = SitemapConfig::from_settings(&settings, &cli.get_base_dir())?;

    let http_config = HttpClientConfig {
        timeout_seconds: settings.network.timeout_seconds,
        ..Default::default()
    };
    let builder = SitemapBuilder::prismic(http_config)?;

    let report = builder
        .build_with_report(&config)
        .await
        .context("Sitemap build failed")?;

    print!("{}", Output::new(verbosity).format_report(&report));
    Ok(())
}
