use ndarray::array;

#[test]
fn cost_changes_then_settles_as_rounds_grow() {
    // Unit-square clouds with epsilon on the order of the typical squared gap.
    let a = array![[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [0.5, 0.5]];
    let b = array![[0.2, 0.1], [0.9, 0.8], [0.3, 0.7], [1.0, 0.4]];
    let epsilon = 1.0;

    let costs: Vec<f64> = (1..=60)
        .map(|rounds| sinkloss::transport_cost(&a, &b, epsilon, rounds).unwrap())
        .collect();

    let early = (costs[1] - costs[0]).abs();
    let late = (costs[59] - costs[58]).abs();

    assert!(early > 0.0, "first rounds should move the cost");
    assert!(late < early, "early={} late={}", early, late);
    assert!(late < 1e-8 * costs[59], "late={} cost={}", late, costs[59]);
}

#[test]
fn fixed_rounds_ignore_convergence() {
    // Converged long before 200 rounds; the fixed-round path still runs them all
    // and lands on the same value as the early-stopped one within tolerance.
    let a = array![[0.0], [1.0], [2.0]];
    let b = array![[0.1], [0.9], [2.2]];

    let (early_cost, used) =
        sinkloss::transport_cost_with_convergence(&a, &b, 1.0, 200, 1e-10).unwrap();
    let full = sinkloss::transport_cost(&a, &b, 1.0, 200).unwrap();

    assert!(used < 200, "used={}", used);
    assert!((early_cost - full).abs() < 1e-9, "early={} full={}", early_cost, full);
}
