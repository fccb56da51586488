#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fama/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod asset;
pub use asset::Symbol;

mod series;
pub use series::{PriceSeries, ReturnSeries};

mod factor;
pub use factor::{FactorColumn, FactorName, FactorTable};

mod variant;
pub use variant::ModelVariant;

mod error;
pub use error::{ParseVariantError, SeriesError};

/// Re-export common date type.
pub type Date = chrono::NaiveDate;
