//! Fit all three factor models against synthetic prices held in memory.
//!
//! No network access is needed. The ticker's returns are built as a known
//! mix of the proxy returns so the fitted loadings can be compared against
//! the true ones.
//!
//! Run with: cargo run --example offline_regression

use fama::{
    data::InMemoryPriceSource,
    factors::Proxy,
    model::{ModelError, run_fama_french_regression},
    primitives::Date,
};

const DAYS: usize = 400;

fn compounded(base: f64, returns: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut close = base;
    returns
        .map(|r| {
            close *= 1.0 + r;
            close
        })
        .collect()
}

fn wave(freq: f64, amplitude: f64) -> impl Iterator<Item = f64> {
    (0..DAYS).map(move |i| amplitude * (i as f64 * freq).sin())
}

fn main() -> Result<(), ModelError> {
    let first = Date::from_ymd_opt(2022, 1, 3).expect("valid date");
    let dates: Vec<Date> = first.iter_days().take(DAYS).collect();
    let (start, end) = (dates[0], dates[DAYS - 1]);

    let market: Vec<f64> = wave(0.83, 0.01).collect();
    let mut source = InMemoryPriceSource::new()
        .with_closes(
            Proxy::Market.ticker(),
            dates.iter().copied().zip(compounded(4000.0, market.iter().copied())),
        )
        .with_closes(Proxy::RiskFree.ticker(), dates.iter().map(|&d| (d, 4.5)));
    for (k, proxy) in Proxy::STYLES.into_iter().enumerate() {
        let closes = compounded(100.0, wave(0.41 + 0.29 * k as f64, 0.008));
        source = source.with_closes(proxy.ticker(), dates.iter().copied().zip(closes));
    }

    // Beta of 1.3 to the market plus an idiosyncratic wiggle.
    let ticker = market.iter().zip(wave(2.7, 0.002)).map(|(m, e)| 1.3 * m + e);
    source = source.with_closes("DEMO", dates.iter().copied().zip(compounded(50.0, ticker)));

    for model_type in ["3-factor", "5-factor", "6-factor"] {
        let model = run_fama_french_regression(&source, "DEMO", start, end, model_type)?;
        println!("{}", model.summary());
        for (name, coef) in model.params() {
            println!("  {name:<8} {coef:>10.4}");
        }
        println!();
    }

    println!("{} prices fetched in total", source.fetch_count());
    Ok(())
}
