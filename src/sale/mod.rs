//! Home sale calculator
//!
//! Computes what is left of a sale price once the municipal gain tax, the
//! progressive income tax on the gain, the transaction fees and the
//! outstanding mortgage have been paid. Every call recomputes the whole
//! result from the input; nothing is patched incrementally.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::PropcalcError;
use crate::tax::{compute_tax, default_gain_brackets, TaxBracket};
use crate::utils::{percent_of, saturating_sum};

/// Fee and tax rates charged on a sale, as whole-number percentages (7 = 7%)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FeeRates {
    /// Municipal tax on the gross gain
    pub municipal_gain_tax_pct: Decimal,
    /// Shown alongside the other rates but never applied: the income tax
    /// always comes from the progressive gain brackets.
    pub income_tax_pct: Decimal,
    pub agency_fee_pct: Decimal,
    pub notary_pct: Decimal,
    pub registry_pct: Decimal,
    pub agency_management_pct: Decimal,
    pub other_pct: Decimal,
}

impl Default for FeeRates {
    fn default() -> Self {
        Self {
            municipal_gain_tax_pct: Decimal::new(7, 0),
            income_tax_pct: Decimal::new(19, 0),
            agency_fee_pct: Decimal::new(4, 0),
            notary_pct: Decimal::new(3, 1),
            registry_pct: Decimal::new(15, 2),
            agency_management_pct: Decimal::new(5, 1),
            other_pct: Decimal::new(12, 1),
        }
    }
}

/// Names one field of [`FeeRates`] so it can be edited generically
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeeKind {
    MunicipalGainTax,
    IncomeTax,
    AgencyFee,
    Notary,
    Registry,
    AgencyManagement,
    Other,
}

impl FeeKind {
    /// Display order
    pub const ALL: [FeeKind; 7] = [
        FeeKind::MunicipalGainTax,
        FeeKind::IncomeTax,
        FeeKind::AgencyFee,
        FeeKind::Notary,
        FeeKind::Registry,
        FeeKind::AgencyManagement,
        FeeKind::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeeKind::MunicipalGainTax => "municipal_gain_tax",
            FeeKind::IncomeTax => "income_tax",
            FeeKind::AgencyFee => "agency_fee",
            FeeKind::Notary => "notary",
            FeeKind::Registry => "registry",
            FeeKind::AgencyManagement => "agency_management",
            FeeKind::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FeeKind::MunicipalGainTax => "Municipal gain tax",
            FeeKind::IncomeTax => "Income tax (informational)",
            FeeKind::AgencyFee => "Agency fee",
            FeeKind::Notary => "Notary",
            FeeKind::Registry => "Registry",
            FeeKind::AgencyManagement => "Agency management",
            FeeKind::Other => "Other",
        }
    }
}

impl fmt::Display for FeeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeeKind {
    type Err = PropcalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        let name = normalized.strip_suffix("_pct").unwrap_or(&normalized);

        FeeKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == name)
            .ok_or_else(|| {
                let known: Vec<&str> = FeeKind::ALL.iter().map(FeeKind::as_str).collect();
                PropcalcError::Parse(format!(
                    "unknown fee '{}'. Known fees: {}",
                    s,
                    known.join(", ")
                ))
            })
    }
}

impl FeeRates {
    pub fn get(&self, kind: FeeKind) -> Decimal {
        match kind {
            FeeKind::MunicipalGainTax => self.municipal_gain_tax_pct,
            FeeKind::IncomeTax => self.income_tax_pct,
            FeeKind::AgencyFee => self.agency_fee_pct,
            FeeKind::Notary => self.notary_pct,
            FeeKind::Registry => self.registry_pct,
            FeeKind::AgencyManagement => self.agency_management_pct,
            FeeKind::Other => self.other_pct,
        }
    }

    pub fn set(&mut self, kind: FeeKind, pct: Decimal) {
        let slot = match kind {
            FeeKind::MunicipalGainTax => &mut self.municipal_gain_tax_pct,
            FeeKind::IncomeTax => &mut self.income_tax_pct,
            FeeKind::AgencyFee => &mut self.agency_fee_pct,
            FeeKind::Notary => &mut self.notary_pct,
            FeeKind::Registry => &mut self.registry_pct,
            FeeKind::AgencyManagement => &mut self.agency_management_pct,
            FeeKind::Other => &mut self.other_pct,
        };
        *slot = pct;
    }
}

/// A single sale scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SaleInput {
    pub sale_price: Decimal,
    pub purchase_price: Decimal,
    /// Informational only; does not affect any figure
    pub years_held: u32,
    pub outstanding_mortgage: Decimal,
    pub fees: FeeRates,
}

impl Default for SaleInput {
    fn default() -> Self {
        Self {
            sale_price: Decimal::new(300_000, 0),
            purchase_price: Decimal::new(200_000, 0),
            years_held: 5,
            outstanding_mortgage: Decimal::new(60_000, 0),
            fees: FeeRates::default(),
        }
    }
}

/// Scalar fields of [`SaleInput`] that can be edited one at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleField {
    SalePrice,
    PurchasePrice,
    YearsHeld,
    OutstandingMortgage,
}

impl SaleField {
    pub const ALL: [SaleField; 4] = [
        SaleField::SalePrice,
        SaleField::PurchasePrice,
        SaleField::YearsHeld,
        SaleField::OutstandingMortgage,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SaleField::SalePrice => "sale_price",
            SaleField::PurchasePrice => "purchase_price",
            SaleField::YearsHeld => "years_held",
            SaleField::OutstandingMortgage => "outstanding_mortgage",
        }
    }
}

impl FromStr for SaleField {
    type Err = PropcalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('-', "_");
        SaleField::ALL
            .into_iter()
            .find(|field| field.as_str() == normalized)
            .ok_or_else(|| PropcalcError::Parse(format!("unknown sale field '{}'", s)))
    }
}

impl SaleInput {
    /// Apply a field-level edit. Years held is a whole, non-negative count;
    /// anything else coerces to 0 the same way non-numeric input does.
    pub fn set(&mut self, field: SaleField, value: Decimal) {
        match field {
            SaleField::SalePrice => self.sale_price = value,
            SaleField::PurchasePrice => self.purchase_price = value,
            SaleField::YearsHeld => self.years_held = value.trunc().to_u32().unwrap_or(0),
            SaleField::OutstandingMortgage => self.outstanding_mortgage = value,
        }
    }
}

/// Every figure derived from a [`SaleInput`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleResult {
    pub gross_gain: Decimal,
    pub municipal_tax: Decimal,
    pub income_tax: Decimal,
    pub agency_fee: Decimal,
    pub notary_fee: Decimal,
    pub registry_fee: Decimal,
    pub management_fee: Decimal,
    pub other_fee: Decimal,
    pub outstanding_mortgage: Decimal,
    pub net_proceeds: Decimal,
}

impl SaleResult {
    /// Taxes, fees and mortgage payoff taken out of the sale price
    pub fn total_deductions(&self) -> Decimal {
        saturating_sum([
            self.municipal_tax,
            self.income_tax,
            self.agency_fee,
            self.notary_fee,
            self.registry_fee,
            self.management_fee,
            self.other_fee,
            self.outstanding_mortgage,
        ])
    }
}

/// Compute a sale using the default capital gain brackets
pub fn compute_sale(input: &SaleInput) -> SaleResult {
    compute_sale_with_brackets(input, &default_gain_brackets())
}

/// Compute a sale taxing the gain with a custom bracket table.
///
/// Figures beyond the `Decimal` range saturate at `Decimal::MAX` or
/// `Decimal::MIN`.
pub fn compute_sale_with_brackets(input: &SaleInput, brackets: &[TaxBracket]) -> SaleResult {
    let fees = &input.fees;
    let gross_gain = input
        .sale_price
        .saturating_sub(input.purchase_price)
        .max(Decimal::ZERO);

    let mut result = SaleResult {
        gross_gain,
        municipal_tax: percent_of(gross_gain, fees.municipal_gain_tax_pct),
        income_tax: compute_tax(gross_gain, brackets),
        agency_fee: percent_of(input.sale_price, fees.agency_fee_pct),
        notary_fee: percent_of(input.sale_price, fees.notary_pct),
        registry_fee: percent_of(input.sale_price, fees.registry_pct),
        management_fee: percent_of(input.sale_price, fees.agency_management_pct),
        other_fee: percent_of(input.sale_price, fees.other_pct),
        outstanding_mortgage: input.outstanding_mortgage,
        net_proceeds: Decimal::ZERO,
    };
    result.net_proceeds = input.sale_price.saturating_sub(result.total_deductions());

    debug!(
        sale_price = %input.sale_price,
        gross_gain = %result.gross_gain,
        net_proceeds = %result.net_proceeds,
        "computed sale"
    );

    result
}
