//! Working state shared between the sale calculator and the portfolio
//!
//! The sale's net proceeds flow one way into the portfolio as available
//! capital. The session holds that figure explicitly instead of sharing
//! mutable globals, and republishes it whenever a sale input changes.

use rust_decimal::Decimal;
use tracing::info;

use crate::config::Config;
use crate::investment::{PortfolioSummary, PropertyInput};
use crate::portfolio::Portfolio;
use crate::sale::{compute_sale_with_brackets, FeeKind, SaleField, SaleInput, SaleResult};
use crate::tax::TaxBracket;

#[derive(Debug, Clone)]
pub struct Session {
    sale: SaleInput,
    brackets: Vec<TaxBracket>,
    pub portfolio: Portfolio,
    sale_proceeds: Decimal,
    available_capital: Decimal,
}

impl Session {
    /// Start a session and publish the initial sale's proceeds as capital
    pub fn new(sale: SaleInput, brackets: Vec<TaxBracket>, template: PropertyInput) -> Self {
        let mut session = Self {
            sale,
            brackets,
            portfolio: Portfolio::with_template(template),
            sale_proceeds: Decimal::ZERO,
            available_capital: Decimal::ZERO,
        };
        session.publish_sale();
        session
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.sale.clone(),
            config.sale_brackets(),
            config.property.clone(),
        )
    }

    pub fn sale(&self) -> &SaleInput {
        &self.sale
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Recompute the sale from the current inputs
    pub fn sale_result(&self) -> SaleResult {
        compute_sale_with_brackets(&self.sale, &self.brackets)
    }

    /// Recompute the sale and record its net proceeds as both the sale
    /// proceeds and the available capital. Any manual capital override is
    /// replaced.
    pub fn publish_sale(&mut self) -> SaleResult {
        let result = self.sale_result();
        self.sale_proceeds = result.net_proceeds;
        self.available_capital = result.net_proceeds;
        info!(net_proceeds = %result.net_proceeds, "published sale proceeds as capital");
        result
    }

    pub fn update_sale(&mut self, field: SaleField, value: Decimal) -> SaleResult {
        self.sale.set(field, value);
        self.publish_sale()
    }

    pub fn update_fee(&mut self, kind: FeeKind, pct: Decimal) -> SaleResult {
        self.sale.fees.set(kind, pct);
        self.publish_sale()
    }

    pub fn sale_proceeds(&self) -> Decimal {
        self.sale_proceeds
    }

    pub fn available_capital(&self) -> Decimal {
        self.available_capital
    }

    /// Override the capital by hand; the recorded sale proceeds stay as they were
    pub fn set_available_capital(&mut self, capital: Decimal) {
        self.available_capital = capital;
        info!(%capital, "available capital set manually");
    }

    pub fn summary(&self) -> PortfolioSummary {
        self.portfolio.summary()
    }

    /// Capital left after the portfolio's initial investments
    pub fn remaining_capital(&self) -> Decimal {
        self.available_capital
            .saturating_sub(self.summary().capital_used)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::investment::PropertyField;
    use rust_decimal_macros::dec;

    #[test]
    fn test_new_session_publishes_initial_sale() {
        let session = Session::default();
        assert_eq!(session.sale_proceeds(), dec!(192670));
        assert_eq!(session.available_capital(), dec!(192670));
    }

    #[test]
    fn test_sale_edit_republishes_capital() {
        let mut session = Session::default();
        session.set_available_capital(dec!(5000));

        let result = session.update_sale(SaleField::OutstandingMortgage, Decimal::ZERO);

        assert_eq!(result.net_proceeds, dec!(252670));
        assert_eq!(session.sale_proceeds(), dec!(252670));
        assert_eq!(session.available_capital(), dec!(252670));
    }

    #[test]
    fn test_fee_edit_recomputes_from_scratch() {
        let mut session = Session::default();
        session.update_fee(FeeKind::AgencyFee, Decimal::ZERO);
        session.update_fee(FeeKind::AgencyFee, dec!(4));
        assert_eq!(session.sale_proceeds(), dec!(192670));
    }

    #[test]
    fn test_manual_capital_keeps_sale_proceeds() {
        let mut session = Session::default();
        session.set_available_capital(dec!(100000));
        assert_eq!(session.available_capital(), dec!(100000));
        assert_eq!(session.sale_proceeds(), dec!(192670));
    }

    #[test]
    fn test_remaining_capital() {
        let mut session = Session::default();
        assert_eq!(session.remaining_capital(), dec!(192670));

        let id = session.portfolio.add();
        session
            .portfolio
            .update(id, PropertyField::RenovationCost, dec!(2000))
            .unwrap();

        // 30000 down + 18000 fees + 2000 renovation
        assert_eq!(session.remaining_capital(), dec!(142670));
    }

    #[test]
    fn test_config_brackets_are_used() {
        let config = Config::from_toml_str("[tax]\nbrackets = [\"inf:0\"]").unwrap();
        let session = Session::from_config(&config);
        assert_eq!(session.sale_result().income_tax, Decimal::ZERO);
        assert_eq!(session.sale_proceeds(), dec!(192670) + dec!(21880));
    }
}
