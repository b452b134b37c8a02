// Tax module - progressive bracket levies applied to the gain on a home sale

pub mod progressive;

pub use progressive::{
    compute_tax, compute_tax_breakdown, default_gain_brackets, BracketSlice, TaxBracket,
};
