use std::path::PathBuf;
use std::process;
use std::time::Duration;

use chainsift::BitqueryConfig;
use chainsift::enrich::{
    BitqueryClient, CREATOR_COLUMN, CreatorTable, DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_PATH,
    EnrichOptions, Enricher,
};
use chainsift::labels::{
    DEFAULT_WEBDRIVER_URL, HttpPageSource, LABEL_CLOUD_URL, LABEL_PREFIX, LabelListing,
    LabelScraper, PageSource, ScraperError, WebDriverPageSource,
};
use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

#[derive(Parser)]
#[command(name = "chainsift")]
#[command(about = "Etherscan label scraper and contract-creation enricher", long_about = None)]
struct Cli {
    #[arg(
        short = 'l',
        long = "log-level",
        value_enum,
        default_value = "info",
        global = true,
        help = "Set the logging level"
    )]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape label detail links from the Etherscan label cloud
    Labels {
        #[arg(long, default_value = LABEL_CLOUD_URL, help = "Page to scrape")]
        url: String,

        #[arg(long, default_value = LABEL_PREFIX, help = "Keep only links starting with this prefix")]
        prefix: String,

        #[arg(
            long,
            value_name = "URL",
            default_value = DEFAULT_WEBDRIVER_URL,
            help = "WebDriver server that renders the page (chromedriver, geckodriver, ...)"
        )]
        webdriver: String,

        #[arg(
            long,
            conflicts_with_all = ["webdriver", "render_wait", "headed"],
            help = "Fetch the raw page over plain HTTP instead of rendering it in a browser"
        )]
        http: bool,

        #[arg(
            long,
            value_name = "SECONDS",
            default_value_t = 5,
            help = "Seconds to wait for client-side rendering when using a WebDriver"
        )]
        render_wait: u64,

        #[arg(long, help = "Show the browser window instead of running headless")]
        headed: bool,

        #[arg(
            short = 'o',
            long = "output",
            value_enum,
            default_value = "text",
            help = "Output format"
        )]
        format: OutputFormat,
    },
    /// Look up contracts deployed by each creator in a CSV and write an augmented copy
    Enrich {
        #[arg(long, default_value = DEFAULT_INPUT_PATH, help = "CSV file with creator addresses")]
        input: PathBuf,

        #[arg(long, default_value = DEFAULT_OUTPUT_PATH, help = "Where to write the augmented CSV")]
        output: PathBuf,

        #[arg(long, default_value = CREATOR_COLUMN, help = "Column holding the creator addresses")]
        address_column: String,

        #[arg(long, default_value = "ethereum", help = "Bitquery network name")]
        network: String,

        #[arg(
            long,
            default_value_t = 100,
            help = "Maximum contract creations to fetch per creator",
            value_parser = clap::value_parser!(u32).range(1..)
        )]
        max_results: u32,

        #[arg(long, default_value_t = 300, help = "How many days back to search")]
        days_back: u64,
    },
}

fn serialize_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            log::error!("Error serializing to JSON: {}", e);
            process::exit(1);
        }
    }
}

async fn scrape<S: PageSource>(
    source: S,
    url: String,
    prefix: String,
) -> Result<LabelListing, ScraperError> {
    LabelScraper::new(source)
        .with_url(url)
        .with_prefix(prefix)
        .fetch_labels()
        .await
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level.clone().into())
        .init();

    match cli.command {
        Commands::Labels {
            url,
            prefix,
            webdriver,
            http,
            render_wait,
            headed,
            format,
        } => {
            let result = if http {
                let source = HttpPageSource::new().unwrap_or_else(|e| {
                    log::error!("Error creating HTTP client: {}", e);
                    process::exit(1);
                });
                scrape(source, url, prefix).await
            } else {
                let source = WebDriverPageSource::new(webdriver)
                    .with_render_wait(Duration::from_secs(render_wait))
                    .with_headless(!headed);
                scrape(source, url, prefix).await
            };

            let listing = result.unwrap_or_else(|e| {
                log::error!("Error scraping labels: {}", e);
                process::exit(1);
            });

            match format {
                OutputFormat::Json => serialize_json(&listing),
                OutputFormat::Text => print!("{}", listing),
            }
        }

        Commands::Enrich {
            input,
            output,
            address_column,
            network,
            max_results,
            days_back,
        } => {
            let config = BitqueryConfig::from_env().unwrap_or_else(|e| {
                log::error!("Invalid configuration: {}", e);
                process::exit(1);
            });

            let client = BitqueryClient::new(config).unwrap_or_else(|e| {
                log::error!("Error creating Bitquery client: {}", e);
                process::exit(1);
            });

            let table = CreatorTable::read_csv(&input, &address_column).unwrap_or_else(|e| {
                log::error!("Error reading {}: {}", input.display(), e);
                process::exit(1);
            });

            let options = EnrichOptions {
                network,
                max_results,
                days_back,
            };
            let enricher = Enricher::new(client, options);
            let (enriched, summary) = enricher.enrich_table(table).await;

            enriched.write_csv(&output).unwrap_or_else(|e| {
                log::error!("Error writing {}: {}", output.display(), e);
                process::exit(1);
            });

            println!("Wrote {}", output.display());
            print!("{}", summary);
        }
    }
}
