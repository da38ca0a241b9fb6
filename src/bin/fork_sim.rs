//! Walk through a one-block fork from genesis, then grow branch B until it
//! holds the best tip, reporting the reorg when branch A was leading.

use clap::Parser;

use pow_forkchain::error::Result;
use pow_forkchain::fork::ForkGraph;
use pow_forkchain::hash::Digest;
use pow_forkchain::transaction::tagged_sample_transactions;

#[derive(Parser, Debug)]
#[command(name = "fork_sim", about = "Fork and reorg walkthrough")]
struct Args {
    /// Required leading zero hex digits in every mined block
    #[arg(short, long, env = "DIFFICULTY", default_value_t = 3)]
    difficulty: u32,

    /// Blocks branch B may add while trying to overtake branch A
    #[arg(long, default_value_t = 8)]
    max_extensions: u32,
}

fn print_tip(graph: &ForkGraph, label: &str, digest: &Digest) {
    if let Some(node) = graph.node(digest) {
        println!(
            " Tip {label}: {} work: {} cum: {}",
            digest.short(12),
            node.work,
            node.cumulative_work
        );
    }
}

fn print_best(graph: &ForkGraph) -> Result<()> {
    println!(" Best tip: {}", graph.best_tip().short(12));
    println!(" Best chain (genesis -> tip):");
    for d in graph.best_chain()? {
        println!("  {}", d.short(12));
    }
    Ok(())
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    env_logger::init();
    let args = Args::parse();

    let mut graph = ForkGraph::new(args.difficulty);
    let genesis = graph.genesis();
    println!("Genesis: {} ...", genesis.short(12));

    let a1 = graph.add_child(&genesis, tagged_sample_transactions("A1"))?;
    let b1 = graph.add_child(&genesis, tagged_sample_transactions("B1"))?;
    println!("\nAfter two branches from genesis:");
    print_tip(&graph, "A1", &a1);
    print_tip(&graph, "B1", &b1);
    print_best(&graph)?;

    let a_led = graph.best_tip() == a1;
    let mut b_tip = b1;
    for i in 2..2 + args.max_extensions {
        let label = format!("B{i}");
        b_tip = graph.add_child(&b_tip, tagged_sample_transactions(&label))?;
        println!("\nAfter branch B adds {label}:");
        print_tip(&graph, &label, &b_tip);
        print_best(&graph)?;
        if a_led && graph.best_tip() == b_tip {
            println!(" REORG: best tip moved from A1 to {label}");
        }
        if graph.best_tip() == b_tip {
            break;
        }
    }
    Ok(())
}
