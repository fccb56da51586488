//! Supported regression model variants.

use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::{FactorName, ParseVariantError};

const THREE_FACTOR: [FactorName; 3] = [FactorName::MktRf, FactorName::Smb, FactorName::Hml];

const FIVE_FACTOR: [FactorName; 6] = [
    FactorName::MktRf,
    FactorName::Smb,
    FactorName::Hml,
    FactorName::Rf,
    FactorName::Rmw,
    FactorName::Cma,
];

const SIX_FACTOR: [FactorName; 7] = [
    FactorName::MktRf,
    FactorName::Smb,
    FactorName::Hml,
    FactorName::Rf,
    FactorName::Rmw,
    FactorName::Cma,
    FactorName::Umd,
];

/// Which factor subset a regression uses.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, Serialize, Deserialize,
)]
pub enum ModelVariant {
    /// Market, size and value.
    #[display("3-factor")]
    #[serde(rename = "3-factor")]
    ThreeFactor,
    /// Adds the risk-free rate, profitability and investment.
    #[default]
    #[display("5-factor")]
    #[serde(rename = "5-factor")]
    FiveFactor,
    /// Five-factor plus momentum.
    #[display("6-factor")]
    #[serde(rename = "6-factor")]
    SixFactor,
}

impl ModelVariant {
    /// Every supported variant.
    pub const ALL: [Self; 3] = [Self::ThreeFactor, Self::FiveFactor, Self::SixFactor];

    /// Regressor columns, in design-matrix order.
    #[must_use]
    pub const fn factors(self) -> &'static [FactorName] {
        match self {
            Self::ThreeFactor => &THREE_FACTOR,
            Self::FiveFactor => &FIVE_FACTOR,
            Self::SixFactor => &SIX_FACTOR,
        }
    }

    /// Width of the design matrix: one column per factor plus the intercept.
    #[must_use]
    pub const fn design_width(self) -> usize {
        self.factors().len() + 1
    }

    /// Variant name as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ThreeFactor => "3-factor",
            Self::FiveFactor => "5-factor",
            Self::SixFactor => "6-factor",
        }
    }
}

impl FromStr for ModelVariant {
    type Err = ParseVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| ParseVariantError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("3-factor", ModelVariant::ThreeFactor, 4)]
    #[case("5-factor", ModelVariant::FiveFactor, 7)]
    #[case("6-factor", ModelVariant::SixFactor, 8)]
    fn parse_variant(#[case] name: &str, #[case] expected: ModelVariant, #[case] width: usize) {
        let variant: ModelVariant = name.parse().unwrap();
        assert_eq!(variant, expected);
        assert_eq!(variant.design_width(), width);
        assert_eq!(variant.to_string(), name);
    }

    #[rstest]
    #[case("4-factor")]
    #[case("")]
    #[case("3-Factor")]
    fn parse_unknown_variant(#[case] name: &str) {
        assert_eq!(name.parse::<ModelVariant>(), Err(ParseVariantError(name.to_string())));
    }

    #[test]
    fn three_factor_excludes_rf() {
        assert!(!ModelVariant::ThreeFactor.factors().contains(&FactorName::Rf));
        assert!(ModelVariant::FiveFactor.factors().contains(&FactorName::Rf));
        assert_eq!(ModelVariant::SixFactor.factors().last(), Some(&FactorName::Umd));
    }

    #[test]
    fn default_is_five_factor() {
        assert_eq!(ModelVariant::default(), ModelVariant::FiveFactor);
    }
}
