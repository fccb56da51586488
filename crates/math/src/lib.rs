#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fama/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod linalg;
pub use linalg::{OlsConfig, OlsResult, invert_matrix, ordinary_least_squares};

mod stats;
pub use stats::{f_test_p_value, student_t_p_value, student_t_quantile};

mod error;
pub use error::MathError;
