use anyhow::Result;
use clap::{Parser, Subcommand};
use kis_core::{Currency, Locale, Table};
use kis_data::{csv_writer, decode_output, ReplaySource};
use kis_query::{
    fetch_all_pages, get_continuous_query_code, get_currency_code_from_market_code,
    market_codes_for_currency, ContinuousQueryConfig,
};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "kis")]
#[command(about = "Helpers for the KIS brokerage API: market lookups and continuous queries")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the settlement currency of an exchange code
    Currency {
        /// Exchange code (e.g. "NASD", "hks")
        market_code: String,
    },

    /// List the exchange codes settled in a currency
    Markets {
        /// Currency code (USD, HKD, CNY, JPY, VND)
        currency: String,
    },

    /// Print the continuation code used in CTX_AREA_* parameter names
    QueryCode {
        /// Overseas query instead of domestic
        #[arg(long)]
        foreign: bool,
    },

    /// Replay recorded responses through the continuous query and print the result as CSV
    Replay {
        /// JSON file holding an array of recorded responses
        #[arg(short, long)]
        pages: PathBuf,

        /// Body field holding the page's records
        #[arg(short, long, default_value = "output1")]
        output_key: String,

        /// Overseas query instead of domestic
        #[arg(long)]
        foreign: bool,

        /// Maximum pages to fetch
        #[arg(long)]
        max_pages: Option<usize>,

        /// TOML config file (max_pages, locale)
        #[arg(short, long, env = "KIS_QUERY_CONFIG")]
        config: Option<PathBuf>,

        /// Write CSV here instead of stdout
        #[arg(long)]
        csv: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Currency { market_code } => {
            let currency = get_currency_code_from_market_code(&market_code)?;
            println!("{}", currency);
        }
        Commands::Markets { currency } => {
            let currency: Currency = currency.parse()?;
            println!("{}", market_codes_for_currency(currency).join(" "));
        }
        Commands::QueryCode { foreign } => {
            println!("{}", get_continuous_query_code(!foreign));
        }
        Commands::Replay {
            pages,
            output_key,
            foreign,
            max_pages,
            config,
            csv,
        } => {
            let mut query_config = match config {
                Some(path) => ContinuousQueryConfig::load(&path)?,
                None => ContinuousQueryConfig::default(),
            };
            if foreign {
                query_config.locale = Locale::Foreign;
            }
            if let Some(max_pages) = max_pages {
                query_config.max_pages = max_pages;
            }

            run_replay(pages, output_key, query_config, csv).await?;
        }
    }

    Ok(())
}

async fn run_replay(
    pages_path: PathBuf,
    output_key: String,
    config: ContinuousQueryConfig,
    csv_path: Option<PathBuf>,
) -> Result<()> {
    tracing::info!(
        pages = %pages_path.display(),
        output_key = %output_key,
        locale = ?config.locale,
        max_pages = config.max_pages,
        "Replaying continuous query"
    );

    let mut source = ReplaySource::load(&pages_path)?;
    let table: Table =
        fetch_all_pages(&mut source, |res| decode_output(res, &output_key), &config).await?;

    if source.remaining() > 0 {
        tracing::warn!(
            unused = source.remaining(),
            "Recording has pages past the end of the query"
        );
    }

    match csv_path {
        Some(path) => {
            csv_writer::write_csv_to_path(&table, &path)?;
            tracing::info!(rows = table.len(), file = %path.display(), "CSV written");
        }
        None => csv_writer::write_csv(&table, std::io::stdout().lock())?,
    }

    Ok(())
}
