use clap::Parser;
use scraper::Html;
use tracing_subscriber::EnvFilter;

use stellenparser::config::{Command, Config};
use stellenparser::fetch::Fetcher;
use stellenparser::{detect_portal, extract};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("stellenparser=info")),
        )
        .init();

    let config = Config::parse();

    match config.command {
        Command::Extract { url, html } => {
            let body = match html {
                Some(path) => tokio::fs::read_to_string(path).await?,
                None => {
                    let fetcher = Fetcher::new(config.timeout)?;
                    fetcher.fetch(&url).await?
                }
            };
            let doc = Html::parse_document(&body);
            let record = extract(&url, &doc);
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Command::Detect { url } => {
            println!("{}", detect_portal(&url).unwrap_or("generic"));
        }
    }

    Ok(())
}
