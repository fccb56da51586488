#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fama/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod fill;
pub use fill::{FillReport, fill_report, forward_fill_onto, observed_column};

mod smooth;
pub use smooth::{finite, relative_change, trailing_mean};

mod returns;
pub use returns::{price_returns, returns_frame};

pub mod frame;

mod error;
pub use error::UtilsError;
