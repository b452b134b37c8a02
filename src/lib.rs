//! Propcalc - home sale proceeds and rental portfolio calculator
//!
//! This library computes the net cash left after selling a home (gain
//! taxes, transaction fees, mortgage payoff) and the financing, cash flow
//! and return metrics of a portfolio of rental properties bought with it.

pub mod config;
pub mod error;
pub mod investment;
pub mod mortgage;
pub mod portfolio;
pub mod sale;
pub mod session;
pub mod tax;
pub mod utils;
