//! Interactive session
//!
//! A readline loop over a [`Session`]: each line is parsed, dispatched and
//! rendered. Errors are reported and the loop keeps going.

pub mod readline;

use anyhow::Result;
use colored::Colorize;
use rustyline::error::ReadlineError;
use std::io;

use propcalc::investment::PropertyField;
use propcalc::sale::{FeeKind, SaleField};
use propcalc::session::Session;

use crate::commands::parse_command;
use crate::dispatcher::{dispatch_command, Flow};
use readline::PLACEHOLDER;

const COMMAND_PATTERNS: &[&[&str]] = &[
    &["sale", "show"],
    &["sale", "publish"],
    &["capital"],
    &["property", "add"],
    &["property", "remove"],
    &["property", "list"],
    &["summary"],
    &["help"],
    &["exit"],
    &["quit"],
];

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

/// Fixed command patterns plus one per editable field name
fn completion_patterns() -> Vec<Vec<String>> {
    let mut patterns: Vec<Vec<String>> = COMMAND_PATTERNS.iter().map(|p| owned(p)).collect();
    patterns.extend(
        SaleField::ALL
            .iter()
            .map(SaleField::as_str)
            .chain(FeeKind::ALL.iter().map(FeeKind::as_str))
            .map(|field| owned(&["sale", "set", field])),
    );
    patterns.extend(
        PropertyField::ALL
            .iter()
            .map(|field| owned(&["property", "set", PLACEHOLDER, field.as_str()])),
    );
    patterns
}

/// Run the interactive session until the user exits.
pub fn launch_repl(mut session: Session, json_output: bool) -> Result<()> {
    println!("{}", "Propcalc - Interactive Mode".bold());
    println!(
        "Type {} for help, {} to exit\n",
        "help".cyan(),
        "exit".cyan()
    );

    let mut rl = readline::Readline::new(completion_patterns(), None)?;
    let mut stdout = io::stdout();

    loop {
        match rl.readline("propcalc> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                match parse_command(trimmed) {
                    Ok(cmd) => match dispatch_command(&mut session, cmd, json_output, &mut stdout) {
                        Ok(Flow::Exit) => {
                            println!("Goodbye!");
                            break;
                        }
                        Ok(Flow::Continue) => {}
                        Err(e) => eprintln!("{} {:#}", "Error:".red().bold(), e),
                    },
                    Err(e) => {
                        eprintln!("{} {}", "Parse error:".yellow().bold(), e.message);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C
                println!("^C");
                continue;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D
                println!("Goodbye!");
                break;
            }
            Err(err) => {
                eprintln!("{} {}", "Error:".red().bold(), err);
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contains(patterns: &[Vec<String>], words: &[&str]) -> bool {
        patterns.iter().any(|p| p.as_slice() == words)
    }

    #[test]
    fn test_patterns_cover_every_field() {
        let patterns = completion_patterns();

        assert!(contains(&patterns, &["sale", "set", "agency_fee"]));
        assert!(contains(&patterns, &["sale", "set", "outstanding_mortgage"]));
        assert!(contains(&patterns, &["property", "set", PLACEHOLDER, "vacancy_pct"]));
        assert!(contains(&patterns, &["summary"]));
    }
}
