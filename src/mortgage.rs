//! Fixed monthly payment of an amortizing loan

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use tracing::warn;

use crate::error::PropcalcError;
use crate::utils::saturating_div;

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Length of a loan, held as a whole number of monthly payments.
///
/// Entered and shown in years; any number of years that comes to at least
/// one whole month is accepted (12.5 years is 150 payments).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct MortgageTerm(NonZeroU32);

impl MortgageTerm {
    pub const fn from_months(months: NonZeroU32) -> Self {
        Self(months)
    }

    pub fn from_years(years: Decimal) -> Result<Self, PropcalcError> {
        // Years derived from a month count may carry a repeating fraction
        years
            .checked_mul(MONTHS_PER_YEAR)
            .map(|months| months.round_dp(9))
            .filter(|months| months.fract().is_zero())
            .and_then(|months| months.to_u32())
            .and_then(NonZeroU32::new)
            .map(Self)
            .ok_or_else(|| {
                PropcalcError::Validation(format!(
                    "mortgage term must be a positive whole number of months, got {} years",
                    years.normalize()
                ))
            })
    }

    pub fn months(&self) -> u32 {
        self.0.get()
    }

    pub fn years(&self) -> Decimal {
        (Decimal::from(self.months()) / MONTHS_PER_YEAR).normalize()
    }
}

impl TryFrom<Decimal> for MortgageTerm {
    type Error = PropcalcError;

    fn try_from(years: Decimal) -> Result<Self, Self::Error> {
        Self::from_years(years)
    }
}

impl From<MortgageTerm> for Decimal {
    fn from(term: MortgageTerm) -> Self {
        term.years()
    }
}

impl fmt::Display for MortgageTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.years().round_dp(4).normalize())
    }
}

/// (1 + rate)^periods by repeated squaring. `None` when the power no longer
/// fits in a `Decimal`.
fn checked_growth(rate: Decimal, periods: u32) -> Option<Decimal> {
    let mut base = Decimal::ONE.checked_add(rate)?;
    let mut exponent = periods;
    let mut growth = Decimal::ONE;

    while exponent > 0 {
        if exponent & 1 == 1 {
            growth = growth.checked_mul(base)?;
        }
        exponent >>= 1;
        if exponent > 0 {
            base = base.checked_mul(base)?;
        }
    }

    Some(growth)
}

/// Monthly payment that repays `principal` plus interest over `term`.
///
/// `annual_rate_pct` is a whole-number percentage (3.5 = 3.5%). A zero rate
/// splits the principal evenly across the months. Otherwise the standard
/// annuity formula `P·r / (1 − (1 + r)^−n)` applies, written as
/// `P·r·g / (g − 1)` with `g = (1 + r)^n` so no negative power is needed.
/// Figures beyond the `Decimal` range saturate.
pub fn compute_monthly_payment(
    principal: Decimal,
    annual_rate_pct: Decimal,
    term: MortgageTerm,
) -> Decimal {
    let monthly_rate = annual_rate_pct / Decimal::ONE_HUNDRED / MONTHS_PER_YEAR;
    let periods = term.months();
    let straight_line = principal / Decimal::from(periods);

    if monthly_rate.is_zero() {
        return straight_line;
    }

    let Some(growth) = checked_growth(monthly_rate, periods) else {
        // (1 + r)^n overflowed, so g / (g - 1) is 1 to within Decimal precision
        warn!(
            %annual_rate_pct,
            periods, "compound growth overflowed, using interest-only payment"
        );
        return principal.saturating_mul(monthly_rate);
    };

    let denominator = growth.saturating_sub(Decimal::ONE);
    if denominator.is_zero() {
        warn!(
            %annual_rate_pct,
            periods, "degenerate mortgage rate, using straight-line payment"
        );
        return straight_line;
    }

    principal
        .saturating_mul(monthly_rate)
        .saturating_mul(saturating_div(growth, denominator))
}
