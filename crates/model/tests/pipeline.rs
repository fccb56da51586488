//! End-to-end regression runs against in-memory price data.
#![allow(missing_docs)]

use std::{
    io,
    sync::{Arc, Mutex},
};

use approx::assert_relative_eq;
use fama_data::InMemoryPriceSource;
use fama_factors::Proxy;
use fama_model::{
    ErrorKind, FamaFrenchModel, ModelError, RegressionConfig, regress, run_fama_french_regression,
};
use fama_primitives::{Date, FactorName, FactorTable, ModelVariant, ReturnSeries};
use rstest::rstest;

const DAYS: usize = 90;
const MARKET_FREQ: f64 = 0.83;

fn calendar(n: usize) -> Vec<Date> {
    Date::from_ymd_opt(2023, 9, 1).unwrap().iter_days().take(n).collect()
}

fn start_end() -> (Date, Date) {
    let days = calendar(DAYS + 1);
    (days[0], days[DAYS])
}

/// Compounded closes whose daily returns follow `amplitude * sin(freq * i + phase)`.
fn closes(dates: &[Date], base: f64, amplitude: f64, freq: f64, phase: f64) -> Vec<(Date, f64)> {
    let mut close = base;
    dates
        .iter()
        .enumerate()
        .map(|(i, &d)| {
            close *= 1.0 + amplitude * (i as f64 * freq + phase).sin();
            (d, close)
        })
        .collect()
}

fn ticker_closes(dates: &[Date]) -> Vec<(Date, f64)> {
    closes(dates, 30.0, 0.02, 2.41, 1.7)
}

fn market_source() -> InMemoryPriceSource {
    let dates = calendar(DAYS);
    let mut source = InMemoryPriceSource::new()
        .with_closes(Proxy::Market.ticker(), closes(&dates, 4500.0, 0.01, MARKET_FREQ, 0.0))
        .with_closes(
            Proxy::RiskFree.ticker(),
            dates.iter().enumerate().map(|(i, &d)| (d, 5.0 + 0.01 * (i % 7) as f64)),
        );
    for (k, proxy) in Proxy::STYLES.into_iter().enumerate() {
        // Distinct frequencies keep the factor columns linearly independent.
        let freq = 0.41 + 0.29 * k as f64;
        source = source.with_closes(proxy.ticker(), closes(&dates, 80.0, 0.012, freq, 0.3));
    }
    source.with_closes("ACME", ticker_closes(&dates))
}

#[rstest]
#[case("3-factor", 4)]
#[case("5-factor", 7)]
#[case("6-factor", 8)]
fn design_width_per_variant(#[case] model_type: &str, #[case] width: usize) {
    let source = market_source();
    let (start, end) = start_end();
    let model = run_fama_french_regression(&source, "ACME", start, end, model_type).unwrap();

    assert_eq!(model.design_width(), width);
    assert_eq!(model.ols().coefficients.len(), width);
    assert_eq!(model.regressors()[0], "const");
    assert_eq!(model.variant().as_str(), model_type);
    assert!(model.intercept().is_finite());
    assert_eq!(source.fetch_count(), 10);
}

#[test]
fn unsupported_variant_fetches_nothing() {
    let source = market_source();
    let (start, end) = start_end();
    let err = run_fama_french_regression(&source, "ACME", start, end, "4-factor").unwrap_err();

    assert!(matches!(err, ModelError::InvalidModel(_)));
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(source.fetch_count(), 0);
}

#[rstest]
#[case("ZZZZ")]
#[case("NOPE")]
fn unknown_ticker_is_unavailable(#[case] ticker: &str) {
    let source = market_source();
    let (start, end) = start_end();
    let err = run_fama_french_regression(&source, ticker, start, end, "3-factor").unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DataUnavailable);
}

#[test]
fn missing_style_proxy_is_unavailable() {
    let source = market_source().with_closes(Proxy::Conservative.ticker(), []);
    let (start, end) = start_end();
    let err = run_fama_french_regression(&source, "ACME", start, end, "5-factor").unwrap_err();

    assert!(matches!(err, ModelError::Factor(_)));
    assert_eq!(err.kind(), ErrorKind::DataUnavailable);
}

#[test]
fn factor_table_reconstructs_market() {
    let source = market_source();
    let (start, end) = start_end();
    let factors = FamaFrenchModel::new(&source).factors(start, end).unwrap();

    let market = calendar(DAYS);
    let market_closes = closes(&market, 4500.0, 0.01, MARKET_FREQ, 0.0);
    for (row, &date) in factors.dates().iter().enumerate() {
        let i = market.iter().position(|d| *d == date).expect("factor date is a market date");
        let market_return = market_closes[i].1 / market_closes[i - 1].1 - 1.0;
        let total = factors.column(FactorName::MktRf).unwrap()[row]
            + factors.column(FactorName::Rf).unwrap()[row];
        assert_relative_eq!(total, market_return, epsilon = 1e-14);
    }
    for name in FactorName::ALL {
        assert!(factors.column(name).unwrap().iter().all(|v| v.is_finite()));
    }
}

#[test]
fn ticker_gaps_take_earlier_returns() {
    let dates = calendar(DAYS);
    // The ticker skips every third day.
    let sparse: Vec<(Date, f64)> = ticker_closes(&dates)
        .into_iter()
        .enumerate()
        .filter(|(i, _)| i % 3 != 2)
        .map(|(_, obs)| obs)
        .collect();
    let source = market_source().with_closes("ACME", sparse.clone());
    let (start, end) = start_end();
    let model =
        FamaFrenchModel::new(&source).run("ACME", start, end, ModelVariant::SixFactor).unwrap();

    let data = model.data();
    assert!(model.alignment().ticker_filled > 0);
    for (k, &date) in data.dates().iter().enumerate() {
        let latest = sparse.iter().rposition(|(d, _)| *d <= date).unwrap();
        let expected = sparse[latest].1 / sparse[latest - 1].1 - 1.0;
        assert_relative_eq!(data.returns()[k], expected, epsilon = 1e-15);
    }
}

#[rstest]
#[case(ModelVariant::ThreeFactor)]
#[case(ModelVariant::FiveFactor)]
#[case(ModelVariant::SixFactor)]
fn constant_returns_leave_only_the_intercept(#[case] variant: ModelVariant) {
    let dates = calendar(40);
    let n = dates.len();
    let factors = FactorTable::new(
        dates.clone(),
        FactorName::ALL.into_iter().map(|name| {
            let value = if name == FactorName::MktRf { 0.005 } else { 0.0 };
            (name, vec![value; n])
        }),
    )
    .unwrap();
    let returns = ReturnSeries::new("Return", dates, vec![0.01; n]).unwrap();

    let model = regress("FLAT", &returns, &factors, variant).unwrap();

    assert_relative_eq!(model.intercept(), 0.01, epsilon = 1e-15);
    let aliased: Vec<&str> = model.aliased().collect();
    assert_eq!(aliased.len(), variant.design_width() - 1);
    for name in variant.factors() {
        assert!(model.coefficient(name.as_str()).unwrap().is_nan());
    }
    assert!(model.summary().to_string().contains("nan"));
}

#[test]
fn late_listing_drops_leading_factor_rows() {
    let dates = calendar(DAYS);
    let listed = ticker_closes(&dates[40..]);
    let source = market_source().with_closes("ACME", listed);
    let (start, end) = start_end();
    let model =
        FamaFrenchModel::new(&source).run("ACME", start, end, ModelVariant::ThreeFactor).unwrap();

    let report = model.alignment();
    assert!(report.rows_dropped > 0);
    assert_eq!(report.rows_used + report.rows_dropped, report.factor_rows);
    assert_eq!(model.n_obs(), report.rows_used);
    assert!(model.data().dates()[0] > dates[40]);
}

#[test]
fn custom_confidence_level() {
    let source = market_source();
    let (start, end) = start_end();
    let config = RegressionConfig { confidence_level: 0.9, ..RegressionConfig::default() };
    let narrow = FamaFrenchModel::new(&source)
        .with_config(config)
        .run("ACME", start, end, ModelVariant::ThreeFactor)
        .unwrap();
    let wide =
        FamaFrenchModel::new(&source).run("ACME", start, end, ModelVariant::ThreeFactor).unwrap();

    let width = |m: &fama_model::FittedModel| m.ols().conf_upper[1] - m.ols().conf_lower[1];
    assert!(width(&narrow) < width(&wide));
    assert_relative_eq!(narrow.coefficient("Mkt-RF").unwrap(), wide.coefficient("Mkt-RF").unwrap());
}

#[test]
fn prefetched_data_matches_full_run() {
    let source = market_source();
    let (start, end) = start_end();
    let runner = FamaFrenchModel::new(&source);

    let returns = fama_model::get_stock_data(&source, "ACME", start, end).unwrap();
    let factors = runner.factors(start, end).unwrap();
    let split = runner.regress("ACME", &returns, &factors, ModelVariant::FiveFactor).unwrap();
    let full = runner.run("ACME", start, end, ModelVariant::FiveFactor).unwrap();

    assert_eq!(split.n_obs(), full.n_obs());
    for ((name, a), (_, b)) in split.params().zip(full.params()) {
        assert_relative_eq!(a, b, epsilon = 1e-12, max_relative = 1e-12);
        assert!(split.coefficient(name).is_some());
    }
    assert_eq!(source.fetch_count(), 1 + 9 + 10);
}

/// Log sink shared between the subscriber and the test.
#[derive(Debug, Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn summary_is_logged_at_debug() {
    let (start, end) = start_end();
    let logs = LogBuffer::default();
    let sink = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || sink.clone())
        .finish();

    let model = tracing::subscriber::with_default(subscriber, || {
        run_fama_french_regression(&market_source(), "ACME", start, end, "5-factor")
    })
    .unwrap();

    let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
    assert!(text.contains("regression summary"));
    assert!(text.contains("OLS Regression Results"));
    assert!(text.contains(&model.summary().to_string()));
}
