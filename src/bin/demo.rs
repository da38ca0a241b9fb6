//! Mine one block over the demo transfers and print the block hash, chain
//! validity, Merkle root and an inclusion proof for the third transfer.

use clap::Parser;

use pow_forkchain::blockchain::{Block, Clock, SystemClock, mine_block, validate_chain};
use pow_forkchain::merkle::{merkle_proof, merkle_root, verify_proof};
use pow_forkchain::transaction::{FieldValue, sample_transactions};

#[derive(Parser, Debug)]
#[command(name = "demo", about = "Mine a demo block and prove a transaction")]
struct Args {
    /// Required leading zero hex digits in the block hash
    #[arg(short, long, env = "DIFFICULTY", default_value_t = 3)]
    difficulty: u32,
}

fn show(v: Option<&FieldValue>) -> String {
    match v {
        Some(FieldValue::Str(s)) => s.clone(),
        Some(FieldValue::Int(n)) => n.to_string(),
        Some(FieldValue::UInt(n)) => n.to_string(),
        Some(FieldValue::Float(f)) => f.to_string(),
        Some(FieldValue::Bool(b)) => b.to_string(),
        None => "-".to_string(),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    env_logger::init();
    let args = Args::parse();

    let genesis = Block::genesis(args.difficulty, SystemClock.now());
    let txs = sample_transactions();
    let block = mine_block(&genesis, txs.clone(), args.difficulty);
    let chain = [genesis, block];

    let root = merkle_root(&txs);
    let proof = merkle_proof(&txs, 2)?;

    println!("\n=== Transactions in Block ===");
    for tx in &txs {
        println!(
            " From: {}  ->  To: {}  Amount: {}",
            show(tx.get("from")),
            show(tx.get("to")),
            show(tx.get("amt"))
        );
    }

    println!("\n=== Block Information ===");
    println!("Block hash: {}", chain[1].hash());
    println!("Valid chain? {}", validate_chain(&chain));
    println!("Merkle root: {root}");
    println!("Proof(T3): {}", serde_json::to_string(&proof)?);
    println!("Verify T3: {}", verify_proof(&txs[2], &proof, &root));
    Ok(())
}
