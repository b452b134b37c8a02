use anyhow::Result;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::Path;
use tracing::info;

use propcalc::config::{Config, Scenario};
use propcalc::investment::{compute_metrics, PortfolioSummary, PropertyField, PropertyInput, PropertyMetrics};
use propcalc::mortgage::{compute_monthly_payment, MortgageTerm};
use propcalc::portfolio::{Portfolio, PropertyId};
use propcalc::sale::{compute_sale_with_brackets, FeeKind, SaleField, SaleInput, SaleResult};
use propcalc::session::Session;
use propcalc::tax::{compute_tax_breakdown, BracketSlice, TaxBracket};

use crate::cli::formatters::{
    format_json, format_mortgage, format_portfolio_table, format_property_metrics,
    format_sale_table, format_summary, format_tax_table,
};
use crate::cli::Commands;
use crate::ui::launch_repl;

/// Execute a one-shot subcommand, or start the interactive session
pub fn run_command(command: Commands, config: &Config, json_output: bool) -> Result<()> {
    match command {
        Commands::Sale {
            sale_price,
            purchase_price,
            years_held,
            outstanding_mortgage,
            fees,
        } => {
            let mut input = config.sale.clone();
            let overrides = [
                (SaleField::SalePrice, sale_price),
                (SaleField::PurchasePrice, purchase_price),
                (SaleField::YearsHeld, years_held),
                (SaleField::OutstandingMortgage, outstanding_mortgage),
            ];
            for (field, value) in overrides {
                if let Some(value) = value {
                    input.set(field, value);
                }
            }
            run_sale(input, &fees, &config.sale_brackets(), json_output);
            Ok(())
        }
        Commands::Tax { amount, brackets } => {
            let brackets = if brackets.is_empty() {
                config.sale_brackets()
            } else {
                brackets
            };
            run_tax(amount, &brackets, json_output);
            Ok(())
        }
        Commands::Mortgage {
            principal,
            rate_pct,
            term_years,
        } => {
            run_mortgage(principal, rate_pct, term_years, json_output);
            Ok(())
        }
        Commands::Property { fields } => run_property(config.property.clone(), &fields, json_output),
        Commands::Portfolio { file } => run_portfolio(&file, config, json_output),
        Commands::Interactive => launch_repl(Session::from_config(config), json_output),
    }
}

fn run_sale(mut input: SaleInput, fees: &[(FeeKind, Decimal)], brackets: &[TaxBracket], json_output: bool) {
    for &(kind, pct) in fees {
        input.fees.set(kind, pct);
    }

    let result = compute_sale_with_brackets(&input, brackets);
    if json_output {
        #[derive(Serialize)]
        struct SaleReport<'a> {
            input: &'a SaleInput,
            result: &'a SaleResult,
            total_deductions: Decimal,
        }

        let report = SaleReport {
            input: &input,
            result: &result,
            total_deductions: result.total_deductions(),
        };
        println!("{}", format_json(&report));
    } else {
        print!("{}", format_sale_table(&input, &result));
    }
}

fn run_tax(amount: Decimal, brackets: &[TaxBracket], json_output: bool) {
    let slices = compute_tax_breakdown(amount, brackets);
    let total: Decimal = slices.iter().map(|slice| slice.tax).sum();

    if json_output {
        #[derive(Serialize)]
        struct TaxReport<'a> {
            amount: Decimal,
            tax: Decimal,
            slices: &'a [BracketSlice],
        }

        println!(
            "{}",
            format_json(&TaxReport {
                amount,
                tax: total,
                slices: &slices,
            })
        );
    } else {
        print!("{}", format_tax_table(amount, &slices, total));
    }
}

fn run_mortgage(principal: Decimal, rate_pct: Decimal, term: MortgageTerm, json_output: bool) {
    let payment = compute_monthly_payment(principal, rate_pct, term);

    if json_output {
        let report = serde_json::json!({
            "principal": principal,
            "annual_interest_rate_pct": rate_pct,
            "term_years": term,
            "term_months": term.months(),
            "monthly_payment": payment,
        });
        println!("{}", format_json(&report));
    } else {
        print!("{}", format_mortgage(principal, rate_pct, term, payment));
    }
}

fn run_property(
    mut input: PropertyInput,
    fields: &[(PropertyField, Decimal)],
    json_output: bool,
) -> Result<()> {
    for &(field, value) in fields {
        input.set(field, value)?;
    }

    let metrics = compute_metrics(&input);
    if json_output {
        #[derive(Serialize)]
        struct PropertyReport<'a> {
            input: &'a PropertyInput,
            metrics: &'a PropertyMetrics,
        }

        println!(
            "{}",
            format_json(&PropertyReport {
                input: &input,
                metrics: &metrics,
            })
        );
    } else {
        print!("{}", format_property_metrics(&metrics));
    }
    Ok(())
}

fn run_portfolio(path: &Path, config: &Config, json_output: bool) -> Result<()> {
    let scenario = Scenario::from_file(path)?;

    let mut portfolio = Portfolio::with_template(config.property.clone());
    for property in scenario.properties {
        portfolio.add_with(property);
    }

    let capital = match scenario.capital {
        Some(capital) => capital,
        None => compute_sale_with_brackets(&config.sale, &config.sale_brackets()).net_proceeds,
    };
    info!(path = %path.display(), properties = portfolio.len(), %capital, "evaluating portfolio");

    let metrics = portfolio.metrics();
    let summary = portfolio.summary();

    if json_output {
        #[derive(Serialize)]
        struct PropertyEntry<'a> {
            id: PropertyId,
            metrics: &'a PropertyMetrics,
        }

        #[derive(Serialize)]
        struct PortfolioReport<'a> {
            properties: Vec<PropertyEntry<'a>>,
            summary: &'a PortfolioSummary,
            available_capital: Decimal,
            remaining_capital: Decimal,
        }

        let report = PortfolioReport {
            properties: metrics
                .iter()
                .map(|(id, metrics)| PropertyEntry { id: *id, metrics })
                .collect(),
            summary: &summary,
            available_capital: capital,
            remaining_capital: capital - summary.capital_used,
        };
        println!("{}", format_json(&report));
    } else {
        print!("{}", format_portfolio_table(&metrics));
        print!("{}", format_summary(&summary, Some(capital)));
    }
    Ok(())
}
