//! Fama-French regression for a single ticker.
//!
//! Fetches prices from Yahoo Finance, builds the factor table, fits the
//! requested model and prints the regression summary.
//!
//! Usage:
//!   cargo run --bin regress --features cli -- AAPL --model 3-factor
//!   cargo run --bin regress --features cli -- MSFT --start 2020-01-01 --end 2024-01-01
//!   cargo run --bin regress --features cli -- NVDA --export-data nvda.csv -v

use std::{error::Error, fs::File, path::{Path, PathBuf}, process::ExitCode, time::Duration};

use chrono::{Local, Months, NaiveDate};
use clap::{ArgAction, Parser};
use fama::{
    data::{YahooConfig, YahooPriceSource},
    factors::{BuilderConfig, MomentumConfig},
    model::{FamaFrenchModel, RegressionConfig, get_stock_data},
    primitives::{FactorTable, ModelVariant},
    utils::frame::{factors_from_frame, factors_to_frame},
};
use polars::prelude::*;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::EnvFilter;

const DEFAULT_YEARS: u32 = 5;

#[derive(Debug, Parser)]
#[command(name = "regress", version, about = "Fama-French factor regression for one ticker")]
struct Args {
    /// Ticker symbol, e.g. AAPL
    ticker: String,

    /// First date of the window (YYYY-MM-DD). Defaults to `--years` before `--end`.
    #[arg(long)]
    start: Option<NaiveDate>,

    /// End of the window, exclusive (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Window length in years when `--start` is not given.
    #[arg(long, default_value_t = DEFAULT_YEARS)]
    years: u32,

    /// Factor model: 3-factor, 5-factor or 6-factor.
    #[arg(short, long, default_value = "5-factor")]
    model: String,

    /// Momentum lookback in trading days.
    #[arg(long, default_value_t = MomentumConfig::default().window)]
    momentum_window: usize,

    /// Confidence level of the reported intervals.
    #[arg(long, default_value_t = 0.95)]
    confidence: f64,

    /// Pause after each Yahoo request, in milliseconds.
    #[arg(long, default_value_t = 250)]
    request_delay_ms: u64,

    /// Read the factor table from a CSV instead of building it.
    #[arg(long, value_name = "CSV")]
    factors: Option<PathBuf>,

    /// Write the factor table to a CSV.
    #[arg(long, value_name = "CSV")]
    export_factors: Option<PathBuf>,

    /// Write the aligned regression data to a CSV.
    #[arg(long, value_name = "CSV")]
    export_data: Option<PathBuf>,

    /// Write the coefficient table to a CSV.
    #[arg(long, value_name = "CSV")]
    export_coefficients: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::INFO,
        1 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let filter = EnvFilter::builder().with_default_directive(level.into()).from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    // Reject a bad model name before any request goes out.
    let variant: ModelVariant = args.model.parse()?;

    let end = args.end.unwrap_or_else(|| Local::now().date_naive());
    let start = match args.start {
        Some(start) => start,
        None => end
            .checked_sub_months(Months::new(args.years.saturating_mul(12)))
            .ok_or("--years reaches before the supported date range")?,
    };
    info!(ticker = %args.ticker, %start, %end, model = %variant, "running regression");

    let source = YahooPriceSource::with_config(YahooConfig {
        request_delay: Duration::from_millis(args.request_delay_ms),
    })?;
    let config = RegressionConfig {
        builder: BuilderConfig { momentum: MomentumConfig { window: args.momentum_window } },
        confidence_level: args.confidence,
        ..RegressionConfig::default()
    };
    let runner = FamaFrenchModel::new(&source).with_config(config);

    let returns = get_stock_data(&source, &args.ticker, start, end)?;
    let factors = match &args.factors {
        Some(path) => read_factors(path)?,
        None => runner.factors(start, end)?,
    };

    let mut factor_frame = factors_to_frame(&factors)?;
    println!("Factor returns ({} rows):", factors.len());
    println!("{}", factor_frame.head(Some(5)));
    if let Some(path) = &args.export_factors {
        write_csv(path, &mut factor_frame)?;
    }

    let model = runner.regress(args.ticker.trim(), &returns, &factors, variant)?;
    println!();
    println!("{}", model.summary());

    if let Some(path) = &args.export_data {
        write_csv(path, &mut model.data().to_frame()?)?;
    }
    if let Some(path) = &args.export_coefficients {
        write_csv(path, &mut model.coefficients_frame()?)?;
    }

    Ok(())
}

fn read_factors(path: &Path) -> Result<FactorTable, Box<dyn Error>> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_try_parse_dates(true))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    let table = factors_from_frame(&df)?;
    info!(path = %path.display(), rows = table.len(), "loaded factor table");
    Ok(table)
}

fn write_csv(path: &Path, df: &mut DataFrame) -> Result<(), Box<dyn Error>> {
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    info!(path = %path.display(), rows = df.height(), "wrote csv");
    Ok(())
}
