//! Sinkhorn loss between a ring-of-Gaussians target and a drifting generator batch.
//!
//! Samples a "real" batch from eight Gaussians on a circle and a "fake" batch from
//! the same mixture shifted by a decreasing offset (a stand-in for a generator
//! that is learning). For each offset it prints the raw entropic cost and the
//! debiased divergence, then shows how the cost settles as the round budget grows.
//!
//! Run: RUST_LOG=debug cargo run --example gaussian_mixture_cost

use ndarray::Array2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use sinkloss::{EntropicTransport, SinkhornConfig};

fn ring_mixture(
    n: usize,
    modes: usize,
    radius: f64,
    sigma: f64,
    shift: f64,
    rng: &mut ChaCha8Rng,
) -> Array2<f64> {
    let noise = Normal::new(0.0, sigma).unwrap();
    let mut pts = Array2::zeros((n, 2));
    for i in 0..n {
        let k = rng.random_range(0..modes) as f64;
        let angle = k * std::f64::consts::TAU / modes as f64;
        pts[[i, 0]] = radius * angle.cos() + noise.sample(rng) + shift;
        pts[[i, 1]] = radius * angle.sin() + noise.sample(rng);
    }
    pts
}

fn main() -> Result<(), sinkloss::Error> {
    env_logger::init();

    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let batch = 128;
    let real = ring_mixture(batch, 8, 2.0, 0.1, 0.0, &mut rng);

    let solver = EntropicTransport::new(SinkhornConfig::new(0.1, 50))?;
    println!("{:>8} {:>14} {:>14}", "shift", "cost", "divergence");
    for shift in [4.0, 2.0, 1.0, 0.5, 0.1, 0.0] {
        let fake = ring_mixture(batch, 8, 2.0, 0.1, shift, &mut rng);
        let cost = solver.cost(&real, &fake)?;
        let div = solver.divergence(&real, &fake)?;
        println!("{:>8.2} {:>14.6} {:>14.6}", shift, cost, div);
    }

    let fake = ring_mixture(batch, 8, 2.0, 0.1, 0.5, &mut rng);
    println!();
    println!("{:>8} {:>14}", "rounds", "cost");
    for rounds in [0, 1, 2, 5, 10, 20, 50, 100] {
        let cost = sinkloss::transport_cost(&real, &fake, 0.1, rounds)?;
        println!("{:>8} {:>14.6}", rounds, cost);
    }

    match sinkloss::transport_cost_with_convergence(&real, &fake, 0.1, 2000, 1e-6) {
        Ok((cost, used)) => println!("\nconverged after {used} rounds: cost = {cost:.6}"),
        Err(e) => println!("\n{e}"),
    }

    Ok(())
}
