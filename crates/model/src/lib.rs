#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fama/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod returns;
pub use returns::get_stock_data;

mod align;
pub use align::{AlignedData, AlignmentReport, CONSTANT, RESPONSE, align};

mod regression;
pub use regression::{FamaFrenchModel, RegressionConfig, regress, run_fama_french_regression};

mod summary;
pub use summary::{FittedModel, Summary};

mod error;
pub use error::{ErrorKind, ModelError};

/// Re-export commonly used types.
pub mod prelude {
    pub use fama_primitives::ModelVariant;
    pub use fama_traits::PriceSource;

    pub use super::{FamaFrenchModel, FittedModel, ModelError, run_fama_french_regression};
}
