use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PropcalcError;
use crate::utils::saturating_sum;

/// One slice of a progressive table.
///
/// `width` is the size of the slice this bracket taxes, not an absolute
/// income ceiling: brackets are consumed one after another, so with widths
/// 6000 and 44000 the second bracket covers amounts from 6000 up to 50000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct TaxBracket {
    /// `None` for the last, unbounded bracket
    pub width: Option<Decimal>,
    /// Marginal rate as a fraction (0.19 = 19%)
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn new(width: Decimal, rate: Decimal) -> Self {
        Self {
            width: Some(width),
            rate,
        }
    }

    pub fn unbounded(rate: Decimal) -> Self {
        Self { width: None, rate }
    }
}

/// Capital gain brackets used for the income tax on a home sale:
/// 19% on the first 6000, 21% on the next 44000, 23% on the rest.
pub fn default_gain_brackets() -> Vec<TaxBracket> {
    vec![
        TaxBracket::new(Decimal::new(6000, 0), Decimal::new(19, 2)),
        TaxBracket::new(Decimal::new(44000, 0), Decimal::new(21, 2)),
        TaxBracket::unbounded(Decimal::new(23, 2)),
    ]
}

/// Portion of the taxable amount that fell into a single bracket
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BracketSlice {
    pub bracket_index: usize,
    pub taxed_amount: Decimal,
    pub rate: Decimal,
    pub tax: Decimal,
}

/// Walk the brackets in order and tax the slice of `amount` each one covers.
///
/// Stops as soon as nothing remains; amounts at or below zero produce no slices.
pub fn compute_tax_breakdown(amount: Decimal, brackets: &[TaxBracket]) -> Vec<BracketSlice> {
    let mut slices = Vec::new();
    let mut remaining = amount;

    if remaining <= Decimal::ZERO {
        return slices;
    }

    for (bracket_index, bracket) in brackets.iter().enumerate() {
        let taxed_amount = match bracket.width {
            Some(width) => remaining.min(width),
            None => remaining,
        };

        slices.push(BracketSlice {
            bracket_index,
            taxed_amount,
            rate: bracket.rate,
            tax: taxed_amount.saturating_mul(bracket.rate),
        });

        remaining = remaining.saturating_sub(taxed_amount);
        if remaining <= Decimal::ZERO {
            break;
        }
    }

    slices
}

/// Total progressive tax on `amount`. Returns zero for non-positive input
/// and saturates at `Decimal::MAX`.
pub fn compute_tax(amount: Decimal, brackets: &[TaxBracket]) -> Decimal {
    saturating_sum(
        compute_tax_breakdown(amount, brackets)
            .iter()
            .map(|slice| slice.tax),
    )
}

/// Parses `WIDTH:RATE_PCT`, e.g. `6000:19`. A width of `inf` (or `*`) makes
/// the bracket unbounded.
impl FromStr for TaxBracket {
    type Err = PropcalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, rate) = s.trim().split_once(':').ok_or_else(|| {
            PropcalcError::Parse(format!(
                "invalid bracket '{}', expected WIDTH:RATE_PCT (e.g. 6000:19 or inf:23)",
                s
            ))
        })?;

        let rate_pct = Decimal::from_str(rate.trim())
            .map_err(|_| PropcalcError::Parse(format!("invalid bracket rate '{}'", rate)))?;
        let rate = rate_pct / Decimal::ONE_HUNDRED;

        match width.trim().to_lowercase().as_str() {
            "inf" | "infinity" | "*" => Ok(TaxBracket::unbounded(rate)),
            w => {
                let width = Decimal::from_str(w).map_err(|_| {
                    PropcalcError::Parse(format!("invalid bracket width '{}'", width))
                })?;
                if width < Decimal::ZERO {
                    return Err(PropcalcError::Parse(format!(
                        "bracket width must not be negative, got {}",
                        width
                    )));
                }
                Ok(TaxBracket::new(width, rate))
            }
        }
    }
}

impl TryFrom<String> for TaxBracket {
    type Error = PropcalcError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for TaxBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rate_pct = self.rate.saturating_mul(Decimal::ONE_HUNDRED).normalize();
        match self.width {
            Some(width) => write!(f, "{}:{}", width.normalize(), rate_pct),
            None => write!(f, "inf:{}", rate_pct),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_first_bracket_only() {
        let tax = compute_tax(dec!(6000), &default_gain_brackets());
        assert_eq!(tax, dec!(1140));
    }

    #[test]
    fn test_second_bracket_width_is_consumed_fully() {
        // 6000 * 0.19 + 44000 * 0.21
        let tax = compute_tax(dec!(50000), &default_gain_brackets());
        assert_eq!(tax, dec!(10380));

        let tax = compute_tax(dec!(50001), &default_gain_brackets());
        assert_eq!(tax, dec!(10380.23));
    }

    #[test]
    fn test_gain_reaching_top_bracket() {
        // 6000 * 0.19 + 44000 * 0.21 + 50000 * 0.23
        let tax = compute_tax(dec!(100000), &default_gain_brackets());
        assert_eq!(tax, dec!(1140) + dec!(9240) + dec!(11500));
    }

    #[test]
    fn test_zero_and_negative_amounts_are_untaxed() {
        let brackets = default_gain_brackets();
        assert_eq!(compute_tax(Decimal::ZERO, &brackets), Decimal::ZERO);
        assert_eq!(compute_tax(dec!(-500), &brackets), Decimal::ZERO);
        assert!(compute_tax_breakdown(dec!(-500), &brackets).is_empty());
    }

    #[test]
    fn test_huge_amount_saturates() {
        let steep = vec![
            TaxBracket::new(dec!(1), dec!(0.5)),
            TaxBracket::unbounded(dec!(10)),
        ];
        assert_eq!(compute_tax(Decimal::MAX, &steep), Decimal::MAX);

        let tax = compute_tax(Decimal::MAX, &default_gain_brackets());
        assert!(tax > Decimal::ZERO && tax < Decimal::MAX);
    }

    #[test]
    fn test_empty_table_taxes_nothing() {
        assert_eq!(compute_tax(dec!(10000), &[]), Decimal::ZERO);
    }

    #[test]
    fn test_tax_is_monotonic() {
        let brackets = default_gain_brackets();
        let mut previous = Decimal::ZERO;
        let mut amount = Decimal::ZERO;
        while amount <= dec!(120000) {
            let tax = compute_tax(amount, &brackets);
            assert!(tax >= previous, "tax dropped at {}", amount);
            previous = tax;
            amount += dec!(250.5);
        }
    }

    #[test]
    fn test_breakdown_matches_total() {
        let brackets = default_gain_brackets();
        let slices = compute_tax_breakdown(dec!(75000), &brackets);

        assert_eq!(slices.len(), 3);
        assert_eq!(slices[0].taxed_amount, dec!(6000));
        assert_eq!(slices[1].taxed_amount, dec!(44000));
        assert_eq!(slices[2].taxed_amount, dec!(25000));

        let total: Decimal = slices.iter().map(|s| s.tax).sum();
        assert_eq!(total, compute_tax(dec!(75000), &brackets));
    }

    #[test]
    fn test_parse_bracket() {
        let bracket: TaxBracket = "6000:19".parse().unwrap();
        assert_eq!(bracket, TaxBracket::new(dec!(6000), dec!(0.19)));

        let top: TaxBracket = "inf:23".parse().unwrap();
        assert_eq!(top, TaxBracket::unbounded(dec!(0.23)));

        assert!("6000".parse::<TaxBracket>().is_err());
        assert!("abc:19".parse::<TaxBracket>().is_err());
        assert!("-10:19".parse::<TaxBracket>().is_err());
    }

    #[test]
    fn test_bracket_display_round_trips_through_parse() {
        for bracket in default_gain_brackets() {
            let parsed: TaxBracket = bracket.to_string().parse().unwrap();
            assert_eq!(parsed, bracket);
        }
    }
}
