use lp_points::{
    aggregate, integrate, Account, CalculationConfig, Decimal, LiquidityRecord, LiquiditySnapshot,
    TimeSec, TradingSnapshot, UserRecord,
};

fn d(s: &str) -> Decimal {
    Decimal::from_str_canonical(s).unwrap()
}

fn t(secs: i64) -> TimeSec {
    TimeSec::new(secs)
}

type Snap<'a> = (&'a str, &'a str, i64);

fn liquidity(account: &str, start: Option<Snap>, ended: Option<Snap>) -> LiquidityRecord {
    let snap = |(lp, base, ts): Snap| {
        LiquiditySnapshot::new(format!("{}-{}", account, ts), d(lp), d(base), t(ts))
    };
    LiquidityRecord {
        account: Account::new(account),
        lp: Decimal::zero(),
        start: start.map(snap),
        ended: ended.map(snap),
    }
}

fn trading(volume: &str, profit: &str) -> TradingSnapshot {
    TradingSnapshot {
        trading_volume: d(volume),
        net_profit: d(profit),
        ..TradingSnapshot::default()
    }
}

fn unit_rates() -> CalculationConfig {
    CalculationConfig::with_rates(Decimal::one(), Decimal::one(), Decimal::one())
}

#[test]
fn test_scenario_a_closed_form_regression() {
    let record = liquidity("a", Some(("100", "50", 1000)), Some(("200", "100", 1500)));

    // Window end precedes the ended snapshot, so no forward extrapolation:
    // 100 - (50 + 100 * (1200 - 1000)) = -19950
    let integral = integrate(&record, t(1200), t(1400));
    assert_eq!(integral, d("-19950"));

    let user = UserRecord::new(Account::new("a")).with_liquidity(record);
    let results = aggregate(&[user], &unit_rates(), t(1200), t(1400), false);
    assert_eq!(results[0].liquidity_points, Decimal::zero());
}

#[test]
fn test_scenario_b_no_liquidity_snapshots() {
    let user = UserRecord::new(Account::new("b")).with_totals(d("10"), d("0"));
    let results = aggregate(&[user], &unit_rates(), t(0), t(1000), false);
    assert_eq!(results[0].liquidity_points, Decimal::zero());
}

#[test]
fn test_scenario_c_negative_profit_earns_nothing() {
    let user = UserRecord::new(Account::new("c"))
        .with_totals(d("0"), d("50"))
        .with_start(trading("0", "100"));
    let config = CalculationConfig::with_rates(d("1"), d("1"), d("1000000"));

    let results = aggregate(&[user], &config, t(0), t(10), false);
    assert_eq!(results[0].trade_profit_points, Decimal::zero());
}

#[test]
fn test_scenario_d_two_users_in_order() {
    let users = vec![
        UserRecord::new(Account::new("first")).with_totals(d("1000"), d("0")),
        UserRecord::new(Account::new("second")).with_totals(d("2000"), d("0")),
    ];
    let results = aggregate(&users, &unit_rates(), t(0), t(10), false);

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].account, Account::new("first"));
    assert_eq!(results[0].trade_points, d("1000"));
    assert_eq!(results[1].account, Account::new("second"));
    assert_eq!(results[1].trade_points, d("2000"));
}

#[test]
fn test_window_clipping_returns_exact_zero() {
    for ended_ts in [0, 500, 999] {
        let record = liquidity("x", Some(("1", "1", 0)), Some(("1000", "99999", ended_ts)));
        assert_eq!(integrate(&record, t(1000), t(2000)), Decimal::zero());
    }
}

#[test]
fn test_baseline_subtraction_matches_max_zero() {
    let cases = [("500", "200"), ("200", "500"), ("300", "300"), ("1000.25", "0.5")];
    for (v1, v0) in cases {
        let user = UserRecord::new(Account::new("u"))
            .with_totals(d(v1), d("0"))
            .with_start(trading(v0, "0"));
        let results = aggregate(&[user], &unit_rates(), t(0), t(10), false);

        let expected = (d(v1) - d(v0)).clamp_non_negative();
        assert_eq!(results[0].trade_points, expected, "v1={} v0={}", v1, v0);
    }
}

#[test]
fn test_overtime_substitutes_ended_snapshot_for_both_categories() {
    let user = UserRecord::new(Account::new("late"))
        .with_totals(d("5000"), d("700"))
        .with_latest_update(t(2000))
        .with_start(trading("1000", "100"))
        .with_ended(trading("1800", "150"));

    let live = aggregate(&[user.clone()], &unit_rates(), t(0), t(1000), false);
    assert_eq!(live[0].trade_points, d("4000"));
    assert_eq!(live[0].trade_profit_points, d("600"));

    let overtime = aggregate(&[user], &unit_rates(), t(0), t(1000), true);
    assert_eq!(overtime[0].trade_points, d("800"));
    assert_eq!(overtime[0].trade_profit_points, d("50"));
}

#[test]
fn test_non_negativity_over_inconsistent_inputs() {
    let volumes = ["-100", "0", "250"];
    let starts = [None, Some("0"), Some("1000")];
    let liquidity_cases = [
        liquidity("n", None, None),
        liquidity("n", Some(("100", "1000000", 0)), Some(("1", "0", 10))),
        liquidity("n", None, Some(("-5", "-100", 10))),
    ];

    for volume in volumes {
        for start in starts {
            for liq in &liquidity_cases {
                let mut user = UserRecord::new(Account::new("n"))
                    .with_totals(d(volume), d(volume))
                    .with_liquidity(liq.clone());
                if let Some(s) = start {
                    user = user.with_start(trading(s, s));
                }
                let result = &aggregate(&[user], &unit_rates(), t(0), t(100), false)[0];
                assert!(!result.liquidity_points.is_negative());
                assert!(!result.trade_points.is_negative());
                assert!(!result.trade_profit_points.is_negative());
            }
        }
    }
}

#[test]
fn test_caps_are_hard_ceilings_and_transparent_below() {
    let config = CalculationConfig {
        liquidity_limit: Some(d("100")),
        trade_limit: Some(d("100")),
        trade_profit_limit: Some(d("100")),
        ..unit_rates()
    };

    for amount in ["0", "99.99", "100", "100.01", "1000000"] {
        let user = UserRecord::new(Account::new("c"))
            .with_totals(d(amount), d(amount))
            .with_liquidity(liquidity("c", None, Some(("0", amount, 0))));
        let result = &aggregate(&[user], &config, t(0), t(10), false)[0];

        let expected = d(amount).cap(Some(&d("100")));
        assert_eq!(result.liquidity_points, expected, "amount={}", amount);
        assert_eq!(result.trade_points, expected, "amount={}", amount);
        assert_eq!(result.trade_profit_points, expected, "amount={}", amount);
    }
}

#[test]
fn test_order_and_length_preserved() {
    let accounts: Vec<String> = (0..50).rev().map(|i| format!("0x{:04x}", i)).collect();
    let users: Vec<UserRecord> = accounts
        .iter()
        .map(|a| UserRecord::new(Account::new(a.clone())))
        .collect();

    let results = aggregate(&users, &unit_rates(), t(0), t(1), false);
    let out: Vec<&str> = results.iter().map(|r| r.account.as_str()).collect();
    assert_eq!(out, accounts.iter().map(String::as_str).collect::<Vec<_>>());
}

#[test]
fn test_liquidity_points_scaled_by_rate() {
    // 1000 lp held across a 3600s window starting from a snapshot at window start.
    let record = liquidity("r", Some(("1000", "0", 0)), Some(("1000", "0", 0)));
    let user = UserRecord::new(Account::new("r")).with_liquidity(record);
    let config = CalculationConfig::with_rates(d("0.0001"), Decimal::zero(), Decimal::zero());

    let results = aggregate(&[user], &config, t(0), t(3600), false);
    assert_eq!(results[0].liquidity_points, d("360"));
}

#[test]
fn test_identical_inputs_are_deterministic() {
    let users = vec![
        UserRecord::new(Account::new("a"))
            .with_totals(d("123.456"), d("7.89"))
            .with_liquidity(liquidity("a", Some(("3", "10", 5)), Some(("4", "40", 15)))),
        UserRecord::new(Account::new("b")).with_totals(d("0.000001"), d("-1")),
    ];
    let config = CalculationConfig::with_rates(d("0.3"), d("1.7"), d("2.2"));

    let first = aggregate(&users, &config, t(10), t(20), true);
    let second = aggregate(&users, &config, t(10), t(20), true);
    assert_eq!(first, second);
}

#[test]
fn test_products_beyond_96_bits_are_exact() {
    // 1e24 lp held for 2_600_000s
    let record = liquidity("whale", None, Some(("1000000000000000000000000", "0", 0)));
    assert_eq!(
        integrate(&record, t(0), t(2_600_000)),
        d("2600000000000000000000000000000")
    );

    let user = UserRecord::new(Account::new("whale"))
        .with_totals(d("50000000000000000000000000000"), d("0"))
        .with_liquidity(record);
    let config = CalculationConfig::with_rates(Decimal::one(), d("2"), Decimal::one());
    let results = aggregate(&[user], &config, t(0), t(2_600_000), false);

    assert_eq!(results[0].trade_points, d("100000000000000000000000000000"));
    assert_eq!(results[0].liquidity_points, d("2600000000000000000000000000000"));
}

#[test]
fn test_long_fraction_rates_are_not_rounded() {
    let user = UserRecord::new(Account::new("p")).with_totals(d("3"), d("0"));
    let config = CalculationConfig::with_rates(
        Decimal::zero(),
        d("0.000000000000000000000000000001"),
        Decimal::zero(),
    );
    let results = aggregate(&[user], &config, t(0), t(1), false);
    assert_eq!(
        results[0].trade_points.to_canonical_string(),
        "0.000000000000000000000000000003"
    );
}
