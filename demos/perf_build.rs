//! Performance profiling example for tree building
//!
//! This example focuses exclusively on benchmarking the build phase.
//! Designed to be used with low-level profilers like `samply`:
//!
//! ```bash
//! samply record cargo run --release --example perf_build
//! ```

use kdtree::prelude::*;
use std::time::{Duration, Instant};

fn main() {
    env_logger::init();

    println!("KdTree Build Performance Benchmark");
    println!("==================================\n");

    println!("Generating 1,000,000 random points...");
    let mut points = Vec::with_capacity(1_000_000);
    let mut rng = 12345u64; // Simple LCG random number generator

    for id in 0..1_000_000u32 {
        rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let x = ((rng >> 32) as f64 / f64::from(u32::MAX)) * 1000.0;

        rng = rng.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        let y = ((rng >> 32) as f64 / f64::from(u32::MAX)) * 1000.0;

        points.push((DVec2::new(x, y), id));
    }

    let num_runs = 20;
    println!("Running build phase {num_runs} times per mode for profiling...\n");

    let config = TreeConfig::default();
    let mut sequential = Duration::ZERO;
    let mut parallel = Duration::ZERO;

    for run in 1..=num_runs {
        let start = Instant::now();
        let tree = KdTree::build(points.clone(), config.max_children);
        sequential += start.elapsed();

        let start = Instant::now();
        let parallel_tree = KdTree::build_parallel(points.clone(), &config);
        parallel += start.elapsed();

        match (tree, parallel_tree) {
            (Ok(tree), Ok(parallel_tree)) => {
                assert_eq!(tree.stats(), parallel_tree.stats(), "build modes diverged");
                if run % 5 == 0 {
                    let stats = tree.stats();
                    println!(
                        "Run {run:>3}: {} leaves, depth {}",
                        stats.leaves, stats.depth
                    );
                }
            }
            (Err(err), _) | (_, Err(err)) => {
                eprintln!("build failed: {err}");
                return;
            }
        }
    }

    println!("\nBuild Performance Summary");
    println!("========================");
    println!(
        "Sequential avg: {:>8.2}ms",
        sequential.as_secs_f64() * 1000.0 / f64::from(num_runs)
    );
    println!(
        "Parallel avg:   {:>8.2}ms",
        parallel.as_secs_f64() * 1000.0 / f64::from(num_runs)
    );
}
