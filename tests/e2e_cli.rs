
use assert_cmd::prelude::*;
use cli_helpers::{base_cmd, json_decimal, run_cmd, run_cmd_json, write_config, write_scenario};
use predicates::prelude::*;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::TempDir;

fn setup_temp_home() -> TempDir {
    TempDir::new().expect("failed to create temp home")
}

#[test]
fn sale_default_scenario_no_color_when_piped() {
    let home = setup_temp_home();

    base_cmd(&home)
        .arg("sale")
        .assert()
        .success()
        .stdout(predicate::str::contains("Net proceeds"))
        .stdout(predicate::str::contains("192670.00"))
        .stdout(predicate::str::contains("21880.00"))
        .stdout(predicate::str::contains("\u{001b}[").not());
}

#[test]
fn sale_json_reports_every_line() {
    let home = setup_temp_home();
    let json = run_cmd_json(&home, &["sale"]).unwrap();

    let result = &json["result"];
    assert_eq!(json_decimal(&result["gross_gain"]), dec!(100000));
    assert_eq!(json_decimal(&result["income_tax"]), dec!(21880));
    assert_eq!(json_decimal(&result["net_proceeds"]), dec!(192670));
    assert_eq!(json_decimal(&json["total_deductions"]), dec!(107330));
}

#[test]
fn sale_flags_override_inputs() {
    let home = setup_temp_home();
    let json = run_cmd_json(
        &home,
        &[
            "sale",
            "--sale-price",
            "180000",
            "--mortgage",
            "0",
            "--fee",
            "agency_fee=0",
        ],
    )
    .unwrap();

    let result = &json["result"];
    assert_eq!(json_decimal(&result["gross_gain"]), Decimal::ZERO);
    assert_eq!(json_decimal(&result["income_tax"]), Decimal::ZERO);
    assert_eq!(json_decimal(&result["agency_fee"]), Decimal::ZERO);
    // 180000 less notary, registry, management and other fees
    assert_eq!(json_decimal(&result["net_proceeds"]), dec!(176130));
}

#[test]
fn sale_non_numeric_value_counts_as_zero() {
    let home = setup_temp_home();
    let json = run_cmd_json(&home, &["sale", "--mortgage", "none"]).unwrap();
    assert_eq!(
        json_decimal(&json["result"]["outstanding_mortgage"]),
        Decimal::ZERO
    );
}

#[test]
fn tax_breakdown_with_default_brackets() {
    let home = setup_temp_home();
    let json = run_cmd_json(&home, &["tax", "50001"]).unwrap();

    assert_eq!(json_decimal(&json["tax"]), dec!(10380.23));
    let slices = json["slices"].as_array().unwrap();
    assert_eq!(slices.len(), 3);
    assert_eq!(json_decimal(&slices[2]["taxed_amount"]), dec!(1));
}

#[test]
fn tax_with_custom_brackets() {
    let home = setup_temp_home();
    let output = run_cmd(
        &home,
        &["tax", "1000", "--bracket", "500:10", "--bracket", "inf:20"],
    )
    .unwrap();
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("150.00"));
}

#[test]
fn mortgage_zero_rate() {
    let home = setup_temp_home();
    base_cmd(&home)
        .args(["mortgage", "100000", "0", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("833.33"));
}

#[test]
fn mortgage_rejects_zero_term() {
    let home = setup_temp_home();
    base_cmd(&home)
        .args(["mortgage", "100000", "3.5", "0"])
        .assert()
        .failure();
}

#[test]
fn property_with_overrides() {
    let home = setup_temp_home();
    let json = run_cmd_json(
        &home,
        &["property", "--set", "rent_per_room=500", "--set", "vacancy_pct=0"],
    )
    .unwrap();

    // 3 rooms at 500, less 150 expenses
    assert_eq!(
        json_decimal(&json["metrics"]["net_monthly_income"]),
        dec!(1350)
    );
    assert_eq!(json_decimal(&json["input"]["mortgage_term_years"]), dec!(25));
}

#[test]
fn property_accepts_fractional_term() {
    let home = setup_temp_home();
    let json = run_cmd_json(&home, &["property", "--set", "mortgage_term_years=12.5"]).unwrap();
    assert_eq!(json_decimal(&json["input"]["mortgage_term_years"]), dec!(12.5));

    // Same loan through the mortgage command: 120000 at 3.5% over 150 payments
    let mortgage = run_cmd_json(&home, &["mortgage", "120000", "3.5", "12.5"]).unwrap();
    assert_eq!(mortgage["term_months"], 150);
    assert_eq!(
        json_decimal(&json["metrics"]["monthly_payment"]),
        json_decimal(&mortgage["monthly_payment"])
    );

    let payment = json_decimal(&mortgage["monthly_payment"]).to_f64().unwrap();
    let r = 0.035_f64 / 12.0;
    let expected = 120000.0 * r / (1.0 - (1.0 + r).powi(-150));
    assert!(((payment - expected) / expected).abs() < 1e-6);
}

#[test]
fn property_rejects_partial_month_term() {
    let home = setup_temp_home();
    base_cmd(&home)
        .args(["property", "--set", "mortgage_term_years=0.01"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("mortgage term"));
}

#[test]
fn huge_sale_price_does_not_crash() {
    let home = setup_temp_home();
    let json = run_cmd_json(&home, &["sale", "--sale-price", "5e28"]).unwrap();
    assert_eq!(
        json_decimal(&json["result"]["agency_fee"]),
        dec!(2000000000000000000000000000)
    );
}

#[test]
fn out_of_range_value_is_rejected() {
    let home = setup_temp_home();
    base_cmd(&home)
        .args(["sale", "--sale-price", "1e100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside the supported numeric range"));
}

#[test]
fn portfolio_scenario_file() {
    let home = setup_temp_home();
    let scenario = write_scenario(
        home.path(),
        "scenario.toml",
        r#"
capital = 100000

[[property]]

[[property]]
purchase_price = 100000
renovation_cost = 5000
"#,
    );

    let json = run_cmd_json(&home, &["portfolio", scenario.to_str().unwrap()]).unwrap();

    assert_eq!(json["properties"].as_array().unwrap().len(), 2);
    assert_eq!(json["properties"][0]["id"], 1);
    assert_eq!(json["summary"]["property_count"], 2);
    // 48000 for the default property, 20000 + 12000 + 5000 for the second
    assert_eq!(json_decimal(&json["summary"]["capital_used"]), dec!(85000));
    assert_eq!(json_decimal(&json["remaining_capital"]), dec!(15000));
}

#[test]
fn portfolio_table_output() {
    let home = setup_temp_home();
    let scenario = write_scenario(home.path(), "one.toml", "[[property]]\n");

    base_cmd(&home)
        .args(["portfolio", scenario.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Properties"))
        .stdout(predicate::str::contains("48000.00 / 192670.00"))
        .stdout(predicate::str::contains("\u{001b}[").not());
}

#[test]
fn portfolio_missing_file_fails() {
    let home = setup_temp_home();
    base_cmd(&home)
        .args(["portfolio", "does-not-exist.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read scenario file"));
}

#[test]
fn explicit_config_changes_defaults() {
    let home = setup_temp_home();
    let config = write_config(
        &home,
        r#"
[sale]
outstanding_mortgage = 0

[tax]
brackets = ["inf:10"]
"#,
    );

    let json = run_cmd_json(&home, &["--config", config.to_str().unwrap(), "sale"]).unwrap();
    assert_eq!(json_decimal(&json["result"]["income_tax"]), dec!(10000));
    // 192670 + 60000 mortgage + 21880 - 10000 income tax
    assert_eq!(json_decimal(&json["result"]["net_proceeds"]), dec!(264550));
}

#[test]
fn invalid_config_is_reported() {
    let home = setup_temp_home();
    let config = write_config(&home, "[sale]\nprice = 1\n");

    base_cmd(&home)
        .args(["--config", config.to_str().unwrap(), "sale"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config file"));
}

#[test]
fn interactive_session_from_stdin() {
    let home = setup_temp_home();
    let mut cmd = base_cmd(&home);
    cmd.arg("interactive");

    assert_cmd::Command::from_std(cmd)
        .write_stdin("property add\nsummary\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Added property #1"))
        .stdout(predicate::str::contains("48000.00 / 192670.00"));
}
