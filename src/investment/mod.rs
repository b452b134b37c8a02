//! Rental property investment metrics
//!
//! Per-property figures (financing, income, cash flow, returns) and the
//! portfolio-level fold over them. Nothing here is cached: metrics are
//! derived from the current inputs every time they are asked for.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;
use tracing::debug;

use crate::error::PropcalcError;
use crate::mortgage::{compute_monthly_payment, MortgageTerm};
use crate::utils::{percent_of, saturating_div, saturating_sum};

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

const DEFAULT_TERM: MortgageTerm = match NonZeroU32::new(25 * 12) {
    Some(months) => MortgageTerm::from_months(months),
    None => panic!("default mortgage term must be non-zero"),
};

/// A rental property as entered by the user. Percentages are whole numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PropertyInput {
    pub purchase_price: Decimal,
    pub down_payment_pct: Decimal,
    /// Whole months, entered in years
    pub mortgage_term_years: MortgageTerm,
    pub annual_interest_rate_pct: Decimal,
    /// Taxes and closing costs paid on purchase, as a share of the price
    pub purchase_fees_pct: Decimal,
    pub renovation_cost: Decimal,
    pub num_rooms: Decimal,
    pub rent_per_room: Decimal,
    pub monthly_expenses: Decimal,
    pub vacancy_pct: Decimal,
}

impl Default for PropertyInput {
    fn default() -> Self {
        Self {
            purchase_price: Decimal::new(150_000, 0),
            down_payment_pct: Decimal::new(20, 0),
            mortgage_term_years: DEFAULT_TERM,
            annual_interest_rate_pct: Decimal::new(35, 1),
            purchase_fees_pct: Decimal::new(12, 0),
            renovation_cost: Decimal::ZERO,
            num_rooms: Decimal::new(3, 0),
            rent_per_room: Decimal::new(400, 0),
            monthly_expenses: Decimal::new(150, 0),
            vacancy_pct: Decimal::new(8, 0),
        }
    }
}

/// Names one editable field of [`PropertyInput`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyField {
    PurchasePrice,
    DownPaymentPct,
    MortgageTermYears,
    AnnualInterestRatePct,
    PurchaseFeesPct,
    RenovationCost,
    NumRooms,
    RentPerRoom,
    MonthlyExpenses,
    VacancyPct,
}

impl PropertyField {
    pub const ALL: [PropertyField; 10] = [
        PropertyField::PurchasePrice,
        PropertyField::DownPaymentPct,
        PropertyField::MortgageTermYears,
        PropertyField::AnnualInterestRatePct,
        PropertyField::PurchaseFeesPct,
        PropertyField::RenovationCost,
        PropertyField::NumRooms,
        PropertyField::RentPerRoom,
        PropertyField::MonthlyExpenses,
        PropertyField::VacancyPct,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyField::PurchasePrice => "purchase_price",
            PropertyField::DownPaymentPct => "down_payment_pct",
            PropertyField::MortgageTermYears => "mortgage_term_years",
            PropertyField::AnnualInterestRatePct => "annual_interest_rate_pct",
            PropertyField::PurchaseFeesPct => "purchase_fees_pct",
            PropertyField::RenovationCost => "renovation_cost",
            PropertyField::NumRooms => "num_rooms",
            PropertyField::RentPerRoom => "rent_per_room",
            PropertyField::MonthlyExpenses => "monthly_expenses",
            PropertyField::VacancyPct => "vacancy_pct",
        }
    }
}

impl fmt::Display for PropertyField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyField {
    type Err = PropcalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        PropertyField::ALL
            .into_iter()
            .find(|field| field.as_str() == normalized)
            .ok_or_else(|| {
                let known: Vec<&str> = PropertyField::ALL.iter().map(PropertyField::as_str).collect();
                PropcalcError::Parse(format!(
                    "unknown property field '{}'. Known fields: {}",
                    s,
                    known.join(", ")
                ))
            })
    }
}

impl PropertyInput {
    /// Apply a field-level edit.
    ///
    /// Every field takes any numeric value except the mortgage term, which
    /// must come to a positive whole number of months.
    pub fn set(&mut self, field: PropertyField, value: Decimal) -> Result<(), PropcalcError> {
        match field {
            PropertyField::PurchasePrice => self.purchase_price = value,
            PropertyField::DownPaymentPct => self.down_payment_pct = value,
            PropertyField::MortgageTermYears => {
                self.mortgage_term_years = MortgageTerm::from_years(value)?;
            }
            PropertyField::AnnualInterestRatePct => self.annual_interest_rate_pct = value,
            PropertyField::PurchaseFeesPct => self.purchase_fees_pct = value,
            PropertyField::RenovationCost => self.renovation_cost = value,
            PropertyField::NumRooms => self.num_rooms = value,
            PropertyField::RentPerRoom => self.rent_per_room = value,
            PropertyField::MonthlyExpenses => self.monthly_expenses = value,
            PropertyField::VacancyPct => self.vacancy_pct = value,
        }
        Ok(())
    }
}

/// Figures derived from one [`PropertyInput`]. ROI and yield are fractions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyMetrics {
    pub down_payment: Decimal,
    pub loan_amount: Decimal,
    pub initial_investment: Decimal,
    pub monthly_payment: Decimal,
    pub gross_monthly_income: Decimal,
    pub net_monthly_income: Decimal,
    pub monthly_cash_flow: Decimal,
    pub annual_roi: Decimal,
    pub annual_net_yield: Decimal,
}

/// Cash put in up front: down payment, purchase fees and renovation
pub fn initial_investment(property: &PropertyInput) -> Decimal {
    saturating_sum([
        percent_of(property.purchase_price, property.down_payment_pct),
        percent_of(property.purchase_price, property.purchase_fees_pct),
        property.renovation_cost,
    ])
}

/// Derive every metric for one property. Figures beyond the `Decimal` range
/// saturate at `Decimal::MAX` or `Decimal::MIN`.
pub fn compute_metrics(property: &PropertyInput) -> PropertyMetrics {
    let down_payment = percent_of(property.purchase_price, property.down_payment_pct);
    let loan_amount = property.purchase_price.saturating_sub(down_payment);
    let monthly_payment = compute_monthly_payment(
        loan_amount,
        property.annual_interest_rate_pct,
        property.mortgage_term_years,
    );

    let gross_monthly_income = property.num_rooms.saturating_mul(property.rent_per_room);
    let occupancy = Decimal::ONE.saturating_sub(property.vacancy_pct / Decimal::ONE_HUNDRED);
    let net_monthly_income = gross_monthly_income
        .saturating_mul(occupancy)
        .saturating_sub(property.monthly_expenses);
    let monthly_cash_flow = net_monthly_income.saturating_sub(monthly_payment);

    let initial_investment = initial_investment(property);
    let annual_roi = if initial_investment > Decimal::ZERO {
        saturating_div(monthly_cash_flow.saturating_mul(MONTHS_PER_YEAR), initial_investment)
    } else {
        Decimal::ZERO
    };
    // Same guard as ROI so a zero price never divides by zero
    let annual_net_yield = if property.purchase_price.is_zero() {
        Decimal::ZERO
    } else {
        saturating_div(
            net_monthly_income.saturating_mul(MONTHS_PER_YEAR),
            property.purchase_price,
        )
    };

    debug!(
        purchase_price = %property.purchase_price,
        monthly_cash_flow = %monthly_cash_flow,
        "computed property metrics"
    );

    PropertyMetrics {
        down_payment,
        loan_amount,
        initial_investment,
        monthly_payment,
        gross_monthly_income,
        net_monthly_income,
        monthly_cash_flow,
        annual_roi,
        annual_net_yield,
    }
}

/// Portfolio totals and averages. All zero for an empty portfolio.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PortfolioSummary {
    pub property_count: usize,
    pub capital_used: Decimal,
    pub total_monthly_cash_flow: Decimal,
    pub average_roi: Decimal,
    pub average_net_yield: Decimal,
}

#[derive(Default)]
struct SummaryAccumulator {
    count: usize,
    capital_used: Decimal,
    cash_flow: Decimal,
    roi_total: Decimal,
    yield_total: Decimal,
}

pub fn compute_summary<'a, I>(properties: I) -> PortfolioSummary
where
    I: IntoIterator<Item = &'a PropertyInput>,
{
    let totals = properties
        .into_iter()
        .fold(SummaryAccumulator::default(), |mut acc, property| {
            let metrics = compute_metrics(property);
            acc.count += 1;
            acc.capital_used = acc.capital_used.saturating_add(metrics.initial_investment);
            acc.cash_flow = acc.cash_flow.saturating_add(metrics.monthly_cash_flow);
            acc.roi_total = acc.roi_total.saturating_add(metrics.annual_roi);
            acc.yield_total = acc.yield_total.saturating_add(metrics.annual_net_yield);
            acc
        });

    if totals.count == 0 {
        return PortfolioSummary::default();
    }

    let count = Decimal::from(totals.count);
    PortfolioSummary {
        property_count: totals.count,
        capital_used: totals.capital_used,
        total_monthly_cash_flow: totals.cash_flow,
        average_roi: totals.roi_total / count,
        average_net_yield: totals.yield_total / count,
    }
}
