//! Command parsing for the interactive session
//!
//! A small hand-written parser for readline input. Commands may be typed
//! with or without a leading slash and keywords are case-insensitive.

use rust_decimal::Decimal;

use propcalc::investment::PropertyField;
use propcalc::portfolio::PropertyId;
use propcalc::sale::{FeeKind, SaleField};
use propcalc::utils::coerce_decimal;

/// Parsed command from user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `sale show`
    SaleShow,
    /// `sale set <field|fee> <value>`
    SaleSet { target: SaleTarget, value: Decimal },
    /// `sale publish`
    SalePublish,
    /// `capital <amount>`
    Capital { amount: Decimal },
    /// `property add`
    PropertyAdd,
    /// `property remove <id>`
    PropertyRemove { id: PropertyId },
    /// `property set <id> <field> <value>`
    PropertySet {
        id: PropertyId,
        field: PropertyField,
        value: Decimal,
    },
    /// `property list`
    PropertyList,
    /// `summary`
    Summary,
    /// Show help
    Help,
    /// Exit/quit
    Exit,
}

/// What a `sale set` edits: a scalar input or one of the fee rates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaleTarget {
    Field(SaleField),
    Fee(FeeKind),
}

/// Error type for command parsing
#[derive(Debug, Clone)]
pub struct CommandParseError {
    pub message: String,
}

impl std::fmt::Display for CommandParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CommandParseError {}

fn parse_error(message: impl Into<String>) -> CommandParseError {
    CommandParseError {
        message: message.into(),
    }
}

fn parse_id(token: Option<&str>, usage: &str) -> Result<PropertyId, CommandParseError> {
    let token = token.ok_or_else(|| parse_error(format!("missing property id. Usage: {}", usage)))?;
    token
        .trim_start_matches('#')
        .parse::<u64>()
        .map(PropertyId)
        .map_err(|_| parse_error(format!("invalid property id '{}'", token)))
}

fn parse_value(token: Option<&str>, usage: &str) -> Result<Decimal, CommandParseError> {
    let token = token.ok_or_else(|| parse_error(format!("missing value. Usage: {}", usage)))?;
    coerce_decimal(token).map_err(|e| parse_error(e.to_string()))
}

fn parse_sale_target(name: &str) -> Result<SaleTarget, CommandParseError> {
    if let Ok(field) = name.parse::<SaleField>() {
        return Ok(SaleTarget::Field(field));
    }
    name.parse::<FeeKind>()
        .map(SaleTarget::Fee)
        .map_err(|_| {
            parse_error(format!(
                "unknown sale field '{}'. Type `help` for the field list",
                name
            ))
        })
}

/// Parse a command string into a Command enum
///
/// Examples:
/// - `sale set sale_price 320000` or `/sale set agency_fee 3.5`
/// - `property set 2 rent_per_room 450`
/// - `capital 150000`
pub fn parse_command(input: &str) -> Result<Command, CommandParseError> {
    let input = input.trim();

    if input.is_empty() {
        return Err(parse_error("Empty command. Type `help` for commands."));
    }

    let input = input.strip_prefix('/').unwrap_or(input);

    let mut parts = input.split_whitespace();
    let cmd = parts
        .next()
        .ok_or_else(|| parse_error("No command provided"))?;

    match cmd.to_lowercase().as_str() {
        "sale" => {
            let action = parts
                .next()
                .ok_or_else(|| parse_error("sale requires action. Usage: sale <show|set|publish>"))?
                .to_lowercase();

            match action.as_str() {
                "show" => Ok(Command::SaleShow),
                "publish" => Ok(Command::SalePublish),
                "set" => {
                    const USAGE: &str = "sale set <field> <value>";
                    let name = parts
                        .next()
                        .ok_or_else(|| parse_error(format!("missing field. Usage: {}", USAGE)))?;
                    let target = parse_sale_target(name)?;
                    let value = parse_value(parts.next(), USAGE)?;
                    Ok(Command::SaleSet { target, value })
                }
                _ => Err(parse_error(format!(
                    "Unknown sale action: {}. Use: sale <show|set|publish>",
                    action
                ))),
            }
        }
        "capital" => {
            let amount = parse_value(parts.next(), "capital <amount>")?;
            Ok(Command::Capital { amount })
        }
        "property" => {
            let action = parts
                .next()
                .ok_or_else(|| {
                    parse_error("property requires action. Usage: property <add|remove|set|list>")
                })?
                .to_lowercase();

            match action.as_str() {
                "add" => Ok(Command::PropertyAdd),
                "list" => Ok(Command::PropertyList),
                "remove" => {
                    let id = parse_id(parts.next(), "property remove <id>")?;
                    Ok(Command::PropertyRemove { id })
                }
                "set" => {
                    const USAGE: &str = "property set <id> <field> <value>";
                    let id = parse_id(parts.next(), USAGE)?;
                    let field = parts
                        .next()
                        .ok_or_else(|| parse_error(format!("missing field. Usage: {}", USAGE)))?
                        .parse::<PropertyField>()
                        .map_err(|e| parse_error(e.to_string()))?;
                    let value = parse_value(parts.next(), USAGE)?;
                    Ok(Command::PropertySet { id, field, value })
                }
                _ => Err(parse_error(format!(
                    "Unknown property action: {}. Use: property <add|remove|set|list>",
                    action
                ))),
            }
        }
        "summary" => Ok(Command::Summary),
        "help" | "?" => Ok(Command::Help),
        "exit" | "quit" | "q" => Ok(Command::Exit),
        other => Err(parse_error(format!(
            "Unknown command: {}. Type `help` for commands.",
            other
        ))),
    }
}
