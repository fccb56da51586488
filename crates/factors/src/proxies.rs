//! Exchange-traded proxies for the factor legs.

use derive_more::Display;
use fama_primitives::Symbol;

/// A price series the factor builder fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Proxy {
    /// Broad market index.
    #[display("market")]
    Market,
    /// 13-week T-bill yield, quoted in percent.
    #[display("risk-free")]
    RiskFree,
    /// Small-cap equities.
    #[display("small cap")]
    SmallCap,
    /// Value equities.
    #[display("value")]
    Value,
    /// Growth equities.
    #[display("growth")]
    Growth,
    /// High-profitability equities.
    #[display("high profitability")]
    HighProfitability,
    /// Low-profitability equities.
    #[display("low profitability")]
    LowProfitability,
    /// Conservative-investment equities.
    #[display("conservative investment")]
    Conservative,
    /// Aggressive-investment equities.
    #[display("aggressive investment")]
    Aggressive,
}

impl Proxy {
    /// Style legs, in fetch order.
    pub const STYLES: [Self; 7] = [
        Self::SmallCap,
        Self::Value,
        Self::Growth,
        Self::HighProfitability,
        Self::LowProfitability,
        Self::Conservative,
        Self::Aggressive,
    ];

    /// Ticker fetched for this proxy.
    #[must_use]
    pub const fn ticker(self) -> &'static str {
        match self {
            Self::Market => "^GSPC",
            Self::RiskFree => "^IRX",
            Self::SmallCap => "IWM",
            Self::Value => "IVE",
            Self::Growth => "IVW",
            Self::HighProfitability => "QUAL",
            Self::LowProfitability => "IWC",
            Self::Conservative => "USMV",
            Self::Aggressive => "IWO",
        }
    }

    /// Ticker as a [`Symbol`].
    #[must_use]
    pub fn symbol(self) -> Symbol {
        Symbol::from(self.ticker())
    }
}
