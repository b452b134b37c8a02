use colored::Colorize;
use std::io::{self, Write};

use propcalc::investment::PropertyField;
use propcalc::sale::{FeeKind, SaleField};

pub struct RenderOpts {
    pub show_fields: bool,
}

impl Default for RenderOpts {
    fn default() -> Self {
        RenderOpts { show_fields: true }
    }
}

pub fn render_help<W: Write>(mut out: W, opts: &RenderOpts) -> io::Result<()> {
    writeln!(out, "{}", "Propcalc - Interactive Help".bold())?;
    writeln!(out)?;

    writeln!(out, "{}", "Sale:".bold())?;
    writeln!(out, "  {:34} - Show the sale breakdown", "sale show")?;
    writeln!(
        out,
        "  {:34} - Edit a sale input or fee rate",
        "sale set <field> <value>"
    )?;
    writeln!(
        out,
        "  {:34} - Use the sale's net proceeds as capital",
        "sale publish"
    )?;
    writeln!(out, "  {:34} - Set available capital by hand", "capital <amount>")?;

    writeln!(out)?;
    writeln!(out, "{}", "Portfolio:".bold())?;
    writeln!(out, "  {:34} - Add a property from the template", "property add")?;
    writeln!(out, "  {:34} - Remove a property", "property remove <id>")?;
    writeln!(
        out,
        "  {:34} - Edit a property field",
        "property set <id> <field> <value>"
    )?;
    writeln!(out, "  {:34} - Per-property metrics", "property list")?;
    writeln!(out, "  {:34} - Portfolio totals and capital", "summary")?;

    writeln!(out)?;
    writeln!(out, "  {:34} - Show this help", "help")?;
    writeln!(out, "  {:34} - Leave the session", "exit")?;

    if opts.show_fields {
        let sale: Vec<&str> = SaleField::ALL.iter().map(SaleField::as_str).collect();
        let fees: Vec<&str> = FeeKind::ALL.iter().map(FeeKind::as_str).collect();
        let property: Vec<&str> = PropertyField::ALL.iter().map(PropertyField::as_str).collect();

        writeln!(out)?;
        writeln!(out, "{}", "Fields:".bold())?;
        writeln!(out, "  sale:     {}", sale.join(", "))?;
        writeln!(out, "  fees:     {}", fees.join(", "))?;
        writeln!(out, "  property: {}", property.join(", "))?;
        writeln!(out)?;
        writeln!(out, "Values that are not numbers count as 0.")?;
        writeln!(
            out,
            "The mortgage term is in years and must come to whole months (12.5 is fine)."
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_lists_commands_and_fields() {
        let mut buf = Vec::new();
        render_help(&mut buf, &RenderOpts::default()).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.contains("property set <id> <field> <value>"));
        assert!(text.contains("agency_fee"));
        assert!(text.contains("mortgage_term_years"));
    }

    #[test]
    fn test_help_without_fields() {
        let mut buf = Vec::new();
        render_help(&mut buf, &RenderOpts { show_fields: false }).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(!text.contains("Fields:"));
    }
}
