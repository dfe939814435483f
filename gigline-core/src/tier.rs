//! Price tiers used for distribution reporting.
//!
//! A [`Tier`] buckets a ticket price into one of three fixed bands. The
//! thresholds are inclusive on the `Medium` side: exactly `50.0` and exactly
//! `100.0` are both `Medium`.
//!
//! # Examples
//! ```
//! use gigline_core::Tier;
//!
//! assert_eq!(Tier::classify(10.0), Tier::Low);
//! assert_eq!(Tier::classify(50.0), Tier::Medium);
//! assert_eq!(Tier::classify(150.0), Tier::High);
//! assert_eq!(Tier::High.to_string(), "High");
//! ```
use thiserror::Error;

/// Fixed price band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    /// Prices strictly below [`Tier::MEDIUM_FLOOR`].
    Low,
    /// Prices between [`Tier::MEDIUM_FLOOR`] and [`Tier::MEDIUM_CEILING`], inclusive.
    Medium,
    /// Prices strictly above [`Tier::MEDIUM_CEILING`].
    High,
}

/// Error returned when parsing an unknown tier label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown price tier '{label}'")]
pub struct UnknownTier {
    /// The label that failed to parse.
    pub label: String,
}

impl Tier {
    /// Lowest price classified as [`Tier::Medium`].
    pub const MEDIUM_FLOOR: f64 = 50.0;
    /// Highest price classified as [`Tier::Medium`].
    pub const MEDIUM_CEILING: f64 = 100.0;
    /// Every tier in ascending order.
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    /// Classify a finite price.
    ///
    /// Non-finite input is not meaningful; `NaN` falls through to
    /// [`Tier::High`] because it fails both comparisons.
    #[must_use]
    pub fn classify(value: f64) -> Self {
        if value < Self::MEDIUM_FLOOR {
            Self::Low
        } else if value <= Self::MEDIUM_CEILING {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Human-readable label, also used as the SQL bucket value.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Tier {
    type Err = UnknownTier;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tier| tier.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownTier {
                label: s.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;
    use std::str::FromStr;

    #[rstest]
    #[case(10.0, Tier::Low)]
    #[case(49.99, Tier::Low)]
    #[case(50.0, Tier::Medium)]
    #[case(75.0, Tier::Medium)]
    #[case(100.0, Tier::Medium)]
    #[case(100.01, Tier::High)]
    #[case(150.0, Tier::High)]
    fn classifies_against_fixed_thresholds(#[case] value: f64, #[case] expected: Tier) {
        assert_eq!(Tier::classify(value), expected);
    }

    #[rstest]
    fn buckets_reference_inputs() {
        let tiers: Vec<Tier> = [10.0, 50.0, 75.0, 150.0]
            .into_iter()
            .map(Tier::classify)
            .collect();
        assert_eq!(tiers, vec![Tier::Low, Tier::Medium, Tier::Medium, Tier::High]);
    }

    #[rstest]
    #[case("Low", Tier::Low)]
    #[case("medium", Tier::Medium)]
    #[case(" HIGH ", Tier::High)]
    fn parses_labels(#[case] label: &str, #[case] expected: Tier) {
        assert_eq!(Tier::from_str(label), Ok(expected));
    }

    #[test]
    fn parsing_rejects_unknown() {
        let err = Tier::from_str("premium").expect_err("unknown tier");
        assert!(err.to_string().contains("premium"));
    }

    proptest! {
        #[test]
        fn classification_is_monotonic(a in 0.0f64..1_000.0, b in 0.0f64..1_000.0) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(Tier::classify(low) <= Tier::classify(high));
        }

        #[test]
        fn label_round_trips(value in 0.0f64..1_000.0) {
            let tier = Tier::classify(value);
            prop_assert_eq!(Tier::from_str(tier.label()), Ok(tier));
        }
    }
}
