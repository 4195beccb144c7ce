use ndarray::Array2;

fn line(points: &[f64]) -> Array2<f64> {
    Array2::from_shape_vec((points.len(), 1), points.to_vec()).unwrap()
}

#[test]
fn small_epsilon_recovers_assignment_cost() {
    // Two interleaved combs on a line. Every near pair is 0.5 apart (cost 0.25),
    // and the only unit-mass matching over near pairs is i -> i, so the exact
    // transport cost is 4 * 0.25 = 1.0.
    let a = line(&[0.0, 1.0, 2.0, 3.0]);
    let b = line(&[0.5, 1.5, 2.5, 3.5]);
    let rounds = 500;

    let sharp = sinkloss::transport_cost(&a, &b, 0.05, rounds).unwrap();
    let mid = sinkloss::transport_cost(&a, &b, 0.5, rounds).unwrap();
    let flat = sinkloss::transport_cost(&a, &b, 2.0, rounds).unwrap();

    assert!((sharp - 1.0).abs() < 1e-6, "sharp={}", sharp);
    assert!(mid > sharp + 1e-3, "sharp={} mid={}", sharp, mid);
    assert!(flat > mid, "mid={} flat={}", mid, flat);
}

#[test]
fn larger_epsilon_spreads_plan_over_far_pairs() {
    let a = line(&[0.0, 1.0, 2.0, 3.0]);
    let b = line(&[0.5, 1.5, 2.5, 3.5]);

    let sharp = sinkloss::transport_plan(&a, &b, 0.05, 500).unwrap();
    let flat = sinkloss::transport_plan(&a, &b, 2.0, 500).unwrap();

    // Mass on pairs at least 1.5 apart.
    let far_mass = |plan: &Array2<f64>| {
        let mut s = 0.0;
        for i in 0..4 {
            for j in 0..4 {
                if (a[[i, 0]] - b[[j, 0]]).abs() > 1.0 {
                    s += plan[[i, j]];
                }
            }
        }
        s
    };

    assert!(far_mass(&sharp) < 1e-12, "sharp far mass={}", far_mass(&sharp));
    assert!(far_mass(&flat) > 0.1, "flat far mass={}", far_mass(&flat));
}
