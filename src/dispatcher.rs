//! Command dispatcher for the interactive session
//!
//! Routes parsed commands to the session and renders the result, either
//! as tables or as JSON records.

use anyhow::Result;
use colored::Colorize;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;
use tracing::info;

use propcalc::investment::PropertyMetrics;
use propcalc::portfolio::Property;
use propcalc::session::Session;
use propcalc::utils::format_amount;

use crate::cli::formatters::{
    format_json, format_portfolio_table, format_sale_table, format_summary,
};
use crate::cli::help::{render_help, RenderOpts};
use crate::commands::{Command, SaleTarget};

/// Whether the session should keep reading commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Serialize)]
struct CapitalReport {
    sale_proceeds: Decimal,
    available_capital: Decimal,
    remaining_capital: Decimal,
}

fn capital_report(session: &Session) -> CapitalReport {
    CapitalReport {
        sale_proceeds: session.sale_proceeds(),
        available_capital: session.available_capital(),
        remaining_capital: session.remaining_capital(),
    }
}

/// Route a parsed command to its handler
pub fn dispatch_command<W: Write>(
    session: &mut Session,
    command: Command,
    json_output: bool,
    out: &mut W,
) -> Result<Flow> {
    match command {
        Command::SaleShow => show_sale(session, json_output, out)?,
        Command::SaleSet { target, value } => {
            match target {
                SaleTarget::Field(field) => {
                    session.update_sale(field, value);
                }
                SaleTarget::Fee(kind) => {
                    session.update_fee(kind, value);
                }
            }
            show_sale(session, json_output, out)?;
        }
        Command::SalePublish => {
            session.publish_sale();
            show_capital(session, json_output, out)?;
        }
        Command::Capital { amount } => {
            session.set_available_capital(amount);
            show_capital(session, json_output, out)?;
        }
        Command::PropertyAdd => {
            let id = session.portfolio.add();
            if json_output {
                writeln!(out, "{}", format_json(&serde_json::json!({ "id": id })))?;
            } else {
                writeln!(out, "{} Added property #{}", "✓".green().bold(), id)?;
            }
        }
        Command::PropertyRemove { id } => {
            session.portfolio.remove(id)?;
            if json_output {
                writeln!(out, "{}", format_json(&serde_json::json!({ "removed": id })))?;
            } else {
                writeln!(out, "{} Removed property #{}", "✓".green().bold(), id)?;
            }
        }
        Command::PropertySet { id, field, value } => {
            session.portfolio.update(id, field, value)?;
            info!(%id, %field, %value, "property updated");
            list_properties(session, json_output, out)?;
        }
        Command::PropertyList => list_properties(session, json_output, out)?,
        Command::Summary => {
            let summary = session.summary();
            if json_output {
                writeln!(
                    out,
                    "{}",
                    format_json(&serde_json::json!({
                        "summary": summary,
                        "capital": capital_report(session),
                    }))
                )?;
            } else {
                write!(
                    out,
                    "{}",
                    format_summary(&summary, Some(session.available_capital()))
                )?;
            }
        }
        Command::Help => render_help(&mut *out, &RenderOpts::default())?,
        Command::Exit => return Ok(Flow::Exit),
    }

    Ok(Flow::Continue)
}

fn show_sale<W: Write>(session: &Session, json_output: bool, out: &mut W) -> Result<()> {
    let result = session.sale_result();
    if json_output {
        writeln!(out, "{}", format_json(&result))?;
    } else {
        write!(out, "{}", format_sale_table(session.sale(), &result))?;
        writeln!(
            out,
            "{:<22} {}",
            "Available capital:".bold(),
            format_amount(session.available_capital())
        )?;
    }
    Ok(())
}

fn show_capital<W: Write>(session: &Session, json_output: bool, out: &mut W) -> Result<()> {
    if json_output {
        writeln!(out, "{}", format_json(&capital_report(session)))?;
    } else {
        writeln!(
            out,
            "{:<22} {}",
            "Available capital:".bold(),
            format_amount(session.available_capital())
        )?;
        writeln!(
            out,
            "{:<22} {}",
            "Remaining capital:".bold(),
            format_amount(session.remaining_capital())
        )?;
    }
    Ok(())
}

fn list_properties<W: Write>(session: &Session, json_output: bool, out: &mut W) -> Result<()> {
    let metrics = session.portfolio.metrics();
    if json_output {
        #[derive(Serialize)]
        struct Row<'a> {
            #[serde(flatten)]
            property: &'a Property,
            metrics: &'a PropertyMetrics,
        }

        let rows: Vec<Row<'_>> = session
            .portfolio
            .iter()
            .zip(metrics.iter())
            .map(|(property, (_, metrics))| Row { property, metrics })
            .collect();
        writeln!(out, "{}", format_json(&rows))?;
    } else {
        write!(out, "{}", format_portfolio_table(&metrics))?;
    }
    Ok(())
}
