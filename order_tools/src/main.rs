//! Publishes an order document onto the order queue.
//!
//! ```text
//! publish_order -f test.json
//! ```
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use async_nats::jetstream::{self, stream};
use clap::Parser;
use log::*;
use order_engine::ingest::decode_order;

#[derive(Parser, Debug)]
#[command(version = "1.0.0", about = "Publish an order JSON file to the order queue")]
pub struct Arguments {
    /// Path to the order JSON file
    #[arg(short = 'f', long = "file", default_value = "test.json")]
    file: PathBuf,
    #[arg(long = "nats-url", env = "ORDERS_NATS_URL", default_value = "nats://localhost:4222")]
    nats_url: String,
    /// The JetStream stream that captures the subject. It is created if it does not exist.
    #[arg(long = "stream", env = "ORDERS_STREAM", default_value = "ORDERS")]
    stream: String,
    #[arg(long = "subject", env = "ORDERS_SUBJECT", default_value = "orders_topic")]
    subject: String,
    /// Publish the file even if it is not a valid order
    #[arg(long = "no-check")]
    no_check: bool,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();
    let args = Arguments::parse();
    if let Err(e) = publish(args).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn publish(args: Arguments) -> Result<()> {
    let payload =
        tokio::fs::read(&args.file).await.with_context(|| format!("Could not read {}", args.file.display()))?;
    if !args.no_check {
        let order = decode_order(&payload).map_err(|e| anyhow!("{} is not a valid order. {e}", args.file.display()))?;
        info!("📤️ Publishing order [{}] with {} items", order.order_uid, order.items.len());
    }
    let client = async_nats::connect(args.nats_url.as_str())
        .await
        .with_context(|| format!("Could not connect to NATS at {}", args.nats_url))?;
    let js = jetstream::new(client);
    js.get_or_create_stream(stream::Config {
        name: args.stream.clone(),
        subjects: vec![args.subject.clone()],
        ..Default::default()
    })
    .await
    .map_err(|e| anyhow!("Could not open stream {}. {e}", args.stream))?;
    let ack = js
        .publish(args.subject.clone(), payload.into())
        .await
        .map_err(|e| anyhow!("Could not publish to {}. {e}", args.subject))?
        .await
        .map_err(|e| anyhow!("The broker did not acknowledge the message. {e}"))?;
    println!("Message published to {} (stream {}, seq {})", args.subject, ack.stream, ack.sequence);
    Ok(())
}
