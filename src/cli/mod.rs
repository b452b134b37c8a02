use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

use propcalc::investment::PropertyField;
use propcalc::mortgage::MortgageTerm;
use propcalc::sale::FeeKind;
use propcalc::tax::TaxBracket;
use propcalc::utils::coerce_decimal;

pub mod formatters;
pub mod help;
pub mod runner;

#[derive(Parser)]
#[command(name = "propcalc")]
#[command(version, about = "Home sale proceeds and rental portfolio calculator")]
#[command(
    long_about = "Work out what is left after selling a home (gain taxes, fees, mortgage payoff) and how far those proceeds go when reinvested in rental properties."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Config file to use instead of the default location
    #[arg(long = "config", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Net proceeds of a home sale
    Sale {
        #[arg(long, value_parser = parse_amount)]
        sale_price: Option<Decimal>,

        #[arg(long, value_parser = parse_amount)]
        purchase_price: Option<Decimal>,

        #[arg(long, value_parser = parse_amount)]
        years_held: Option<Decimal>,

        /// Outstanding mortgage paid off at closing
        #[arg(long = "mortgage", value_parser = parse_amount)]
        outstanding_mortgage: Option<Decimal>,

        /// Override a fee rate, e.g. --fee agency_fee=3.5 (repeatable)
        #[arg(long = "fee", value_name = "KIND=PCT", value_parser = parse_fee)]
        fees: Vec<(FeeKind, Decimal)>,
    },

    /// Progressive tax on an amount, with the per-bracket breakdown
    Tax {
        #[arg(value_parser = parse_amount)]
        amount: Decimal,

        /// Bracket as WIDTH:RATE_PCT, in order; the last may use `inf` (repeatable)
        #[arg(long = "bracket", value_name = "WIDTH:PCT")]
        brackets: Vec<TaxBracket>,
    },

    /// Fixed monthly payment of an amortizing mortgage
    Mortgage {
        #[arg(value_parser = parse_amount)]
        principal: Decimal,

        /// Annual interest rate in percent
        #[arg(value_parser = parse_amount)]
        rate_pct: Decimal,

        /// Term in years; must come to a whole number of months (12.5 is 150)
        #[arg(value_parser = parse_term)]
        term_years: MortgageTerm,
    },

    /// Metrics for a single rental property
    Property {
        /// Override a property field, e.g. --set rent_per_room=450 (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE", value_parser = parse_property_field)]
        fields: Vec<(PropertyField, Decimal)>,
    },

    /// Evaluate a portfolio scenario file
    Portfolio {
        /// TOML file with `capital` and `[[property]]` records
        file: PathBuf,
    },

    /// Launch the interactive session
    Interactive,
}

fn parse_amount(s: &str) -> Result<Decimal, String> {
    coerce_decimal(s).map_err(|e| e.to_string())
}

fn parse_term(s: &str) -> Result<MortgageTerm, String> {
    let years = parse_amount(s)?;
    MortgageTerm::from_years(years).map_err(|e| e.to_string())
}

fn split_assignment(s: &str) -> Result<(&str, &str), String> {
    s.split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{}'", s))
}

fn parse_fee(s: &str) -> Result<(FeeKind, Decimal), String> {
    let (name, value) = split_assignment(s)?;
    let kind = name.parse::<FeeKind>().map_err(|e| e.to_string())?;
    Ok((kind, parse_amount(value)?))
}

fn parse_property_field(s: &str) -> Result<(PropertyField, Decimal), String> {
    let (name, value) = split_assignment(s)?;
    let field = name.parse::<PropertyField>().map_err(|e| e.to_string())?;
    Ok((field, parse_amount(value)?))
}
