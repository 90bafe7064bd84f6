//! Example demonstrating shuffled arrangement generation.
//!
//! # Usage
//!
//! ```sh
//! cargo run --example shuffle_arrangement
//! ```
//!
//! Pick the grid size and number of shuffles:
//!
//! ```sh
//! cargo run --example shuffle_arrangement -- --size 4 --count 3
//! ```
//!
//! Replay a specific shuffler seed:
//!
//! ```sh
//! cargo run --example shuffle_arrangement -- --size 4 --seed 42
//! ```

use std::process;

use clap::Parser;
use tileswap_core::GridSize;
use tileswap_generator::Shuffler;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Grid side length (2-12).
    #[arg(long, value_name = "SIDE", default_value_t = 3)]
    size: u8,

    /// Shuffler seed; omit for an entropy-seeded shuffler.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Number of shuffles to print.
    #[arg(long, value_name = "COUNT", default_value_t = 1)]
    count: usize,
}

fn main() {
    let args = Args::parse();
    let size = match GridSize::new(args.size) {
        Ok(size) => size,
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    };

    let mut shuffler = args.seed.map_or_else(Shuffler::from_entropy, Shuffler::seeded);
    for _ in 0..args.count {
        let shuffled = shuffler.shuffle(size);
        println!("seed: {}", shuffled.seed);
        for row in shuffled.arrangement.pieces().chunks(usize::from(size.get())) {
            let cells: Vec<String> = row.iter().map(|piece| format!("{piece:>3}")).collect();
            println!("{}", cells.join(" "));
        }
        println!();
    }
}
