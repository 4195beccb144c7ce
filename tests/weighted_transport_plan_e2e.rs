use ndarray::{array, Axis};
use sinkloss::{EntropicTransport, SinkhornConfig};

#[test]
fn weighted_plan_matches_both_marginals() {
    let a = array![[0.0, 0.0], [1.0, 0.0]];
    let b = array![[0.0, 0.5], [0.5, 0.5], [1.0, 0.5]];
    let wa = array![0.5, 0.5];
    let wb = array![0.25, 0.5, 0.25];

    let solver = EntropicTransport::new(SinkhornConfig::new(1.0, 200)).unwrap();
    let plan = solver.solve_weighted(&a, &wa, &b, &wb).unwrap().plan();

    let rows = plan.sum_axis(Axis(1));
    let cols = plan.sum_axis(Axis(0));
    for (r, w) in rows.iter().zip(wa.iter()) {
        assert!((r - w).abs() < 1e-6, "row={} want={}", r, w);
    }
    for (c, w) in cols.iter().zip(wb.iter()) {
        assert!((c - w).abs() < 1e-9, "col={} want={}", c, w);
    }
}

#[test]
fn weighted_convergence_uses_weights_as_target() {
    let a = array![[0.0], [1.0]];
    let b = array![[0.2], [0.8], [1.4]];
    let wa = array![0.6, 0.4];
    let wb = array![0.3, 0.3, 0.4];

    let cfg = SinkhornConfig::new(0.5, 1000).with_tolerance(1e-8);
    let solution = EntropicTransport::new(cfg)
        .unwrap()
        .solve_weighted(&a, &wa, &b, &wb)
        .unwrap();

    assert!(solution.iterations < 1000);
    let rows = solution.plan().sum_axis(Axis(1));
    assert!((rows[0] - 0.6).abs() < 1e-7, "rows={:?}", rows);
    assert!((rows[1] - 0.4).abs() < 1e-7, "rows={:?}", rows);
}
