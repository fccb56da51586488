#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/fama/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod builder;
pub use builder::{BuilderConfig, FactorBuilder, get_fama_french_factors};

mod momentum;
pub use momentum::{MomentumConfig, MomentumFactor};

mod proxies;
pub use proxies::Proxy;

mod error;
pub use error::FactorError;
