//! # fama
//!
//! Fama-French factor regressions for individual equities.
//!
//! Factor returns are rebuilt from ETF proxies (market, T-bill yield and the
//! size, value, profitability and investment style funds), a ticker's daily
//! returns are aligned onto them, and an OLS fit of excess returns on the
//! 3, 5 or 6 factors is returned with a statsmodels-style summary.
//!
//! This crate re-exports the workspace components behind feature flags.
//!
//! ## Features
//!
//! - `full` (default): Enables all components
//! - `primitives`: Core type definitions
//! - `traits`: The price source abstraction
//! - `math`: OLS estimation and test statistics
//! - `utils`: Alignment, smoothing and DataFrame helpers
//! - `data`: In-memory and Yahoo Finance price sources
//! - `factors`: Factor proxy construction
//! - `model`: The regression runner
//! - `cli`: The `regress` binary
//!
//! ## Example
//!
//! ```rust,ignore
//! use fama::data::YahooPriceSource;
//! use fama::model::run_fama_french_regression;
//!
//! let source = YahooPriceSource::new()?;
//! let model = run_fama_french_regression(&source, "AAPL", start, end, "5-factor")?;
//! println!("{}", model.summary());
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

#[cfg(feature = "primitives")]
#[doc(inline)]
pub use fama_primitives as primitives;
#[cfg(feature = "traits")]
#[doc(inline)]
pub use fama_traits as traits;
#[cfg(feature = "math")]
#[doc(inline)]
pub use fama_math as math;
#[cfg(feature = "utils")]
#[doc(inline)]
pub use fama_utils as utils;
#[cfg(feature = "data")]
#[doc(inline)]
pub use fama_data as data;
#[cfg(feature = "factors")]
#[doc(inline)]
pub use fama_factors as factors;
#[cfg(feature = "model")]
#[doc(inline)]
pub use fama_model as model;

// Used by the `regress` binary only.
#[cfg(feature = "cli")]
use {chrono as _, clap as _, polars as _, tracing as _, tracing_subscriber as _};
