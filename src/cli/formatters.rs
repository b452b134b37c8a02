//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of calculation from presentation. Rounding to cents
//! happens only here.

use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

use propcalc::investment::{PortfolioSummary, PropertyMetrics};
use propcalc::mortgage::MortgageTerm;
use propcalc::portfolio::PropertyId;
use propcalc::sale::{FeeKind, SaleInput, SaleResult};
use propcalc::tax::BracketSlice;
use propcalc::utils::{format_amount, format_amount_aligned, format_percent};

/// Pretty JSON for any result record
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string_pretty(value)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Green when non-negative, red otherwise
fn signed(text: String, value: Decimal) -> String {
    if value >= Decimal::ZERO {
        text.green().to_string()
    } else {
        text.red().to_string()
    }
}

#[derive(Tabled)]
struct LineRow {
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

impl LineRow {
    fn new(item: &str, rate: Option<Decimal>, amount: Decimal) -> Self {
        Self {
            item: item.to_string(),
            rate: rate.map(|pct| format!("{}%", pct.normalize())).unwrap_or_default(),
            amount: format_amount(amount),
        }
    }
}

fn right_aligned(rows: Vec<impl Tabled>, from_column: usize) -> String {
    let mut table = Table::new(rows);
    table.with(Style::modern());
    table.modify(Columns::new(from_column..), Alignment::right());
    table.to_string()
}

pub fn format_sale_table(input: &SaleInput, result: &SaleResult) -> String {
    let fees = &input.fees;
    let mut output = String::new();

    output.push_str(&format!("\n{}\n\n", "Home sale".cyan().bold()));
    output.push_str(&format!(
        "{:<22} {}\n{:<22} {}\n{:<22} {}\n\n",
        "Sale price:",
        format_amount(input.sale_price),
        "Purchase price:",
        format_amount(input.purchase_price),
        "Years held:",
        input.years_held
    ));

    let rows = vec![
        LineRow::new("Gross gain", None, result.gross_gain),
        LineRow::new(
            FeeKind::MunicipalGainTax.label(),
            Some(fees.municipal_gain_tax_pct),
            result.municipal_tax,
        ),
        LineRow::new("Income tax (brackets)", None, result.income_tax),
        LineRow::new(
            FeeKind::AgencyFee.label(),
            Some(fees.agency_fee_pct),
            result.agency_fee,
        ),
        LineRow::new(FeeKind::Notary.label(), Some(fees.notary_pct), result.notary_fee),
        LineRow::new(
            FeeKind::Registry.label(),
            Some(fees.registry_pct),
            result.registry_fee,
        ),
        LineRow::new(
            FeeKind::AgencyManagement.label(),
            Some(fees.agency_management_pct),
            result.management_fee,
        ),
        LineRow::new(FeeKind::Other.label(), Some(fees.other_pct), result.other_fee),
        LineRow::new("Outstanding mortgage", None, result.outstanding_mortgage),
    ];
    output.push_str(&right_aligned(rows, 1));

    output.push_str(&format!(
        "\n\n{:<22} {}",
        "Total deductions:".bold(),
        format_amount(result.total_deductions())
    ));
    output.push_str(&format!(
        "\n{:<22} {}\n",
        "Net proceeds:".bold(),
        signed(format_amount(result.net_proceeds), result.net_proceeds)
    ));

    output
}

pub fn format_tax_table(amount: Decimal, slices: &[BracketSlice], total: Decimal) -> String {
    #[derive(Tabled)]
    struct SliceRow {
        #[tabled(rename = "Bracket")]
        bracket: usize,
        #[tabled(rename = "Taxed")]
        taxed: String,
        #[tabled(rename = "Rate")]
        rate: String,
        #[tabled(rename = "Tax")]
        tax: String,
    }

    let mut output = format!(
        "\n{} on {}\n\n",
        "Progressive tax".cyan().bold(),
        format_amount(amount)
    );

    if slices.is_empty() {
        output.push_str("Nothing to tax\n");
        return output;
    }

    let rows: Vec<SliceRow> = slices
        .iter()
        .map(|slice| SliceRow {
            bracket: slice.bracket_index + 1,
            taxed: format_amount(slice.taxed_amount),
            rate: format_percent(slice.rate),
            tax: format_amount(slice.tax),
        })
        .collect();
    output.push_str(&right_aligned(rows, 1));
    output.push_str(&format!("\n\n{:<12} {}\n", "Total tax:".bold(), format_amount(total)));
    output
}

pub fn format_mortgage(
    principal: Decimal,
    rate_pct: Decimal,
    term: MortgageTerm,
    payment: Decimal,
) -> String {
    format!(
        "\n{}\n\n{:<18} {}\n{:<18} {}%\n{:<18} {} years ({} payments)\n{:<18} {}\n",
        "Mortgage".cyan().bold(),
        "Principal:",
        format_amount(principal),
        "Annual rate:",
        rate_pct.normalize(),
        "Term:",
        term,
        term.months(),
        "Monthly payment:".bold(),
        format_amount(payment)
    )
}

pub fn format_property_metrics(metrics: &PropertyMetrics) -> String {
    #[derive(Tabled)]
    struct MetricRow {
        #[tabled(rename = "Metric")]
        name: &'static str,
        #[tabled(rename = "Value")]
        value: String,
    }

    let row = |name, value| MetricRow { name, value };
    let rows = vec![
        row("Down payment", format_amount(metrics.down_payment)),
        row("Loan amount", format_amount(metrics.loan_amount)),
        row("Initial investment", format_amount(metrics.initial_investment)),
        row("Monthly payment", format_amount(metrics.monthly_payment)),
        row("Gross monthly income", format_amount(metrics.gross_monthly_income)),
        row("Net monthly income", format_amount(metrics.net_monthly_income)),
        row(
            "Monthly cash flow",
            signed(format_amount(metrics.monthly_cash_flow), metrics.monthly_cash_flow),
        ),
        row(
            "Annual ROI",
            signed(format_percent(metrics.annual_roi), metrics.annual_roi),
        ),
        row("Annual net yield", format_percent(metrics.annual_net_yield)),
    ];

    format!(
        "\n{}\n\n{}\n",
        "Rental property".cyan().bold(),
        right_aligned(rows, 1)
    )
}

pub fn format_portfolio_table(rows: &[(PropertyId, PropertyMetrics)]) -> String {
    #[derive(Tabled)]
    struct PropertyRow {
        #[tabled(rename = "#")]
        id: PropertyId,
        #[tabled(rename = "Invested")]
        invested: String,
        #[tabled(rename = "Payment")]
        payment: String,
        #[tabled(rename = "Net Income")]
        net_income: String,
        #[tabled(rename = "Cash Flow")]
        cash_flow: String,
        #[tabled(rename = "ROI")]
        roi: String,
        #[tabled(rename = "Net Yield")]
        net_yield: String,
    }

    if rows.is_empty() {
        return format_empty_portfolio();
    }

    let table_rows: Vec<PropertyRow> = rows
        .iter()
        .map(|(id, m)| PropertyRow {
            id: *id,
            invested: format_amount(m.initial_investment),
            payment: format_amount(m.monthly_payment),
            net_income: format_amount(m.net_monthly_income),
            cash_flow: signed(format_amount(m.monthly_cash_flow), m.monthly_cash_flow),
            roi: signed(format_percent(m.annual_roi), m.annual_roi),
            net_yield: format_percent(m.annual_net_yield),
        })
        .collect();

    format!(
        "\n{}\n\n{}\n",
        "Properties".cyan().bold(),
        right_aligned(table_rows, 1)
    )
}

/// Summary block, with the capital still free when one is known
pub fn format_summary(summary: &PortfolioSummary, available_capital: Option<Decimal>) -> String {
    const WIDTH: usize = 14;
    let mut output = String::new();

    output.push_str(&format!("\n{} Summary", "━".repeat(40).bright_black()));
    output.push_str(&format!(
        "\n{:<24} {:>width$}",
        "Properties:".bold(),
        summary.property_count,
        width = WIDTH
    ));

    match available_capital {
        Some(capital) => {
            let remaining = capital - summary.capital_used;
            output.push_str(&format!(
                "\n{:<24} {} / {}",
                "Capital used:".bold(),
                format_amount_aligned(summary.capital_used, WIDTH),
                format_amount(capital)
            ));
            output.push_str(&format!(
                "\n{:<24} {}",
                "Remaining capital:".bold(),
                signed(format_amount_aligned(remaining, WIDTH), remaining)
            ));
        }
        None => output.push_str(&format!(
            "\n{:<24} {}",
            "Capital used:".bold(),
            format_amount_aligned(summary.capital_used, WIDTH)
        )),
    }

    output.push_str(&format!(
        "\n{:<24} {}",
        "Monthly cash flow:".bold(),
        signed(
            format_amount_aligned(summary.total_monthly_cash_flow, WIDTH),
            summary.total_monthly_cash_flow
        )
    ));
    output.push_str(&format!(
        "\n{:<24} {:>width$}",
        "Average ROI:".bold(),
        format_percent(summary.average_roi),
        width = WIDTH
    ));
    output.push_str(&format!(
        "\n{:<24} {:>width$}\n",
        "Average net yield:".bold(),
        format_percent(summary.average_net_yield),
        width = WIDTH
    ));

    output
}

/// Format empty portfolio message
pub fn format_empty_portfolio() -> String {
    format!(
        "{} No properties yet\nAdd one with: {}\n",
        "ℹ".blue().bold(),
        "property add".bold()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use propcalc::investment::{compute_metrics, PropertyInput};
    use propcalc::sale::compute_sale;
    use propcalc::tax::{compute_tax_breakdown, default_gain_brackets};
    use rust_decimal_macros::dec;

    fn plain() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_empty_portfolio_message() {
        let msg = format_empty_portfolio();
        assert!(msg.contains("No properties yet"));
        assert!(msg.contains("property add"));
    }

    #[test]
    fn test_sale_table_shows_rounded_totals() {
        plain();
        let input = SaleInput::default();
        let output = format_sale_table(&input, &compute_sale(&input));
        assert!(output.contains("192670.00"));
        assert!(output.contains("21880.00"));
        assert!(output.contains("Agency fee"));
        assert!(output.contains("4%"));
    }

    #[test]
    fn test_tax_table_lists_each_bracket() {
        plain();
        let slices = compute_tax_breakdown(dec!(100000), &default_gain_brackets());
        let output = format_tax_table(dec!(100000), &slices, dec!(21880));
        assert!(output.contains("19.00%"));
        assert!(output.contains("11500.00"));
        assert!(output.contains("21880.00"));

        let empty = format_tax_table(dec!(0), &[], dec!(0));
        assert!(empty.contains("Nothing to tax"));
    }

    #[test]
    fn test_summary_with_capital() {
        plain();
        let summary = PortfolioSummary {
            property_count: 1,
            capital_used: dec!(48000),
            ..PortfolioSummary::default()
        };
        let output = format_summary(&summary, Some(dec!(50000)));
        assert!(output.contains("48000.00 / 50000.00"));
        assert!(output.contains("2000.00"));
    }

    #[test]
    fn test_property_metrics_table() {
        plain();
        let output = format_property_metrics(&compute_metrics(&PropertyInput::default()));
        assert!(output.contains("48000.00"));
        assert!(output.contains("7.63%"));
    }

    #[test]
    fn test_json_output() {
        let json = format_json(&compute_sale(&SaleInput::default()));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let net: Decimal = value["net_proceeds"].as_str().unwrap().parse().unwrap();
        assert_eq!(net, dec!(192670));
    }
}
