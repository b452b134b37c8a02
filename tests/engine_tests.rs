//! Calculation engine behaviour through the public library API

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use propcalc::investment::{compute_metrics, compute_summary, PortfolioSummary, PropertyInput};
use propcalc::mortgage::{compute_monthly_payment, MortgageTerm};
use propcalc::portfolio::Portfolio;
use propcalc::sale::{compute_sale, SaleInput};
use propcalc::tax::{compute_tax, default_gain_brackets};

fn years(n: Decimal) -> MortgageTerm {
    MortgageTerm::from_years(n).unwrap()
}

#[test]
fn gross_gain_is_floored_at_zero() {
    let cases = [
        (dec!(300000), dec!(200000), dec!(100000)),
        (dec!(200000), dec!(200000), dec!(0)),
        (dec!(150000), dec!(200000), dec!(0)),
        (dec!(1), dec!(0), dec!(1)),
    ];

    for (sale_price, purchase_price, expected) in cases {
        let input = SaleInput {
            sale_price,
            purchase_price,
            ..SaleInput::default()
        };
        assert_eq!(compute_sale(&input).gross_gain, expected, "sale {}", sale_price);
    }
}

#[test]
fn tax_on_default_brackets() {
    let brackets = default_gain_brackets();
    assert_eq!(compute_tax(Decimal::ZERO, &brackets), Decimal::ZERO);
    assert_eq!(compute_tax(dec!(6000), &brackets), dec!(1140));
    assert_eq!(compute_tax(dec!(50000), &brackets), dec!(10380));
    assert_eq!(compute_tax(dec!(50001), &brackets), dec!(10380.23));
}

#[test]
fn tax_is_monotonic() {
    let brackets = default_gain_brackets();
    let mut previous = Decimal::ZERO;
    let mut amount = Decimal::ZERO;
    while amount <= dec!(120000) {
        let tax = compute_tax(amount, &brackets);
        assert!(tax >= previous, "tax dropped at {}", amount);
        previous = tax;
        amount += dec!(1250.5);
    }
}

#[test]
fn zero_rate_mortgage_is_straight_line() {
    let payment = compute_monthly_payment(dec!(100000), Decimal::ZERO, years(dec!(10)));
    assert_eq!(payment.round_dp(2), dec!(833.33));
}

#[test]
fn mortgage_matches_closed_form() {
    for (term, n) in [(dec!(25), 300), (dec!(12.5), 150), (dec!(0.5), 6)] {
        let payment = compute_monthly_payment(dec!(100000), dec!(3.5), years(term))
            .to_f64()
            .unwrap();

        let r: f64 = 0.035 / 12.0;
        let growth = (1.0 + r).powi(n);
        let expected = 100000.0 * r * growth / (growth - 1.0);

        assert!(((payment - expected) / expected).abs() < 1e-6, "term {}", term);
    }
}

#[test]
fn huge_inputs_produce_full_results() {
    let sale = SaleInput {
        sale_price: dec!(50000000000000000000000000000),
        ..SaleInput::default()
    };
    let result = compute_sale(&sale);
    assert_eq!(result.net_proceeds, sale.sale_price - result.total_deductions());

    let property = PropertyInput {
        rent_per_room: dec!(30000000000000000000000000000),
        ..PropertyInput::default()
    };
    let metrics = compute_metrics(&property);
    assert_eq!(metrics.gross_monthly_income, Decimal::MAX);
    assert!(metrics.monthly_cash_flow > Decimal::ZERO);

    let mut portfolio = Portfolio::new();
    portfolio.add_with(property.clone());
    portfolio.add_with(property);
    assert_eq!(portfolio.summary().property_count, 2);
}

#[test]
fn default_sale_scenario() {
    let result = compute_sale(&SaleInput::default());

    assert_eq!(result.gross_gain, dec!(100000));
    assert_eq!(result.municipal_tax, dec!(7000));
    // 6000 at 19% + 44000 at 21% + 50000 at 23%
    assert_eq!(result.income_tax, dec!(21880));
    assert_eq!(result.agency_fee, dec!(12000));
    assert_eq!(result.notary_fee, dec!(900));
    assert_eq!(result.registry_fee, dec!(450));
    assert_eq!(result.management_fee, dec!(1500));
    assert_eq!(result.other_fee, dec!(3600));
    assert_eq!(result.net_proceeds, dec!(192670));
}

#[test]
fn empty_summary_is_zero() {
    let empty: [PropertyInput; 0] = [];
    assert_eq!(compute_summary(&empty), PortfolioSummary::default());
}

#[test]
fn compute_functions_are_idempotent() {
    let sale = SaleInput::default();
    assert_eq!(compute_sale(&sale), compute_sale(&sale));

    let property = PropertyInput::default();
    assert_eq!(compute_metrics(&property), compute_metrics(&property));

    let brackets = default_gain_brackets();
    assert_eq!(
        compute_tax(dec!(77777), &brackets),
        compute_tax(dec!(77777), &brackets)
    );
}

#[test]
fn removing_a_property_matches_summary_without_it() {
    let variants = [
        PropertyInput::default(),
        PropertyInput {
            purchase_price: dec!(90000),
            num_rooms: dec!(2),
            ..PropertyInput::default()
        },
        PropertyInput {
            purchase_price: dec!(240000),
            renovation_cost: dec!(15000),
            rent_per_room: dec!(520),
            num_rooms: dec!(5),
            ..PropertyInput::default()
        },
    ];

    let mut portfolio = Portfolio::new();
    let ids: Vec<_> = variants
        .iter()
        .map(|input| portfolio.add_with(input.clone()))
        .collect();
    assert_eq!(portfolio.len(), 3);

    let removed = portfolio.remove(ids[1]).unwrap();
    assert_eq!(removed, variants[1]);
    assert_eq!(portfolio.len(), 2);

    let expected = compute_summary([&variants[0], &variants[2]]);
    assert_eq!(portfolio.summary(), expected);
}
