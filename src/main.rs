#[macro_use]
extern crate log;

use avl_collections::avl_tree::{AvlSet, TraversalOrder};
use rand::{Rng, SeedableRng, XorShiftRng};
use simplelog::{Config, LevelFilter, SimpleLogger, TermLogger};
use std::env;
use std::error::Error;
use std::io::{self, Write};

const DEFAULT_NUM_OF_OPERATIONS: usize = 10_000;
const LOG_LEVEL_VAR: &str = "AVL_LOG";

fn init_logging() {
    let level = env::var(LOG_LEVEL_VAR)
        .ok()
        .and_then(|level| level.parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Info);

    if TermLogger::init(level, Config::default()).is_err() {
        let _ = SimpleLogger::init(level, Config::default());
    }
}

fn print_traversals<W: Write>(set: &AvlSet<u32>, out: &mut W) -> Result<(), Box<dyn Error>> {
    for (name, order) in &[
        ("in-order", TraversalOrder::InOrder),
        ("pre-order", TraversalOrder::PreOrder),
        ("post-order", TraversalOrder::PostOrder),
    ] {
        write!(out, "{:>10}: ", name)?;
        set.write_traversal(*order, out)?;
        writeln!(out)?;
    }
    writeln!(out, "      root: {:?}, height: {}", set.root(), set.height())?;
    Ok(())
}

// Worst case height of an avl tree holding `len` values.
fn height_bound(len: usize) -> f64 {
    1.44 * ((len + 2) as f64).log2()
}

fn run_workload(num_of_operations: usize) -> Result<(), Box<dyn Error>> {
    let mut rng: XorShiftRng = SeedableRng::from_seed([1, 1, 1, 1]);
    let mut set = AvlSet::new();

    for _ in 0..num_of_operations {
        let value = rng.gen_range(0, num_of_operations as u32);
        if rng.gen::<bool>() {
            set.insert(value);
        } else {
            set.remove(&value);
        }
    }

    set.validate()?;
    info!(
        "{} operations left {} values at height {} (bound {:.2})",
        num_of_operations,
        set.len(),
        set.height(),
        height_bound(set.len()),
    );
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    init_logging();

    let num_of_operations = match env::args().nth(1) {
        Some(arg) => arg.parse::<usize>()?,
        None => DEFAULT_NUM_OF_OPERATIONS,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let mut set = AvlSet::new();
    for value in &[10, 40, 20, 30, 40, 50] {
        if !set.insert(*value) {
            debug!("ignored duplicate {}", value);
        }
    }
    writeln!(out, "after inserting 10 40 20 30 40 50")?;
    print_traversals(&set, &mut out)?;

    if let Some(root) = set.root().cloned() {
        set.remove(&root);
        writeln!(out, "after removing root {}", root)?;
        print_traversals(&set, &mut out)?;
    }

    let ascending: AvlSet<u32> = (1..8).collect();
    writeln!(out, "after inserting 1..7 in ascending order")?;
    print_traversals(&ascending, &mut out)?;

    run_workload(num_of_operations)
}
