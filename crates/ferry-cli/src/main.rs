mod wordcount;

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use ferry_core::adapter::{
    FlatMapFunctionAdapter, Function2Adapter, FunctionAdapter, PairFunctionAdapter,
};
use ferry_core::codec::ErrorPolicy;
use ferry_core::domain::{ShipmentId, error_chain};
use ferry_core::ports::{IdGenerator, SystemClock, UlidGenerator};
use ferry_core::{
    CallableAdapter, CatalogLoader, ClosureCodec, CodecConfig, CodecRegistry, ModuleName,
    ModuleResolver, RegistryBridge, Value,
};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::wordcount::{Stray, SumCounts, ToPair, Tokenize};

const SAMPLE: &[&str] = &[
    "the quick brown fox jumps over the lazy dog",
    "The dog sleeps; the fox runs.",
    "a fox, a dog, and the moon",
    "quick quick slow",
];

#[derive(Parser)]
#[command(name = "ferry-cli")]
#[command(about = "Ship closures to worker tasks and run a word count with them")]
#[command(version)]
struct Cli {
    /// Decode unknown closures as unresolved adapters instead of failing
    #[arg(long)]
    lenient: bool,

    /// JSON codec config (`error_policy`, `diagnostics_capacity`)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Number of worker tasks
    #[arg(long, default_value_t = 2)]
    workers: usize,
}

/// What the driver sends to one worker task.
#[derive(Serialize, Deserialize)]
struct Shipment {
    id: ShipmentId,
    lines: Vec<String>,
    tokenize: Vec<u8>,
    to_pair: Vec<u8>,
    combine: Vec<u8>,
}

static TRACING_INIT: OnceLock<()> = OnceLock::new();

fn init_tracing() {
    if TRACING_INIT.get().is_some() {
        return;
    }
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .try_init();
    let _ = TRACING_INIT.set(());
}

fn load_config(cli: &Cli) -> Result<CodecConfig> {
    let config = match &cli.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            CodecConfig::from_json_str(&raw)?
        }
        None => CodecConfig::default(),
    };
    let mut config = config.from_env()?;
    if cli.lenient {
        config.error_policy = ErrorPolicy::Lenient;
    }
    Ok(config)
}

/// Each side gets its own resolver, the way separate processes would.
fn codec(config: &CodecConfig) -> Result<ClosureCodec> {
    let loader =
        CatalogLoader::new().with_module(ModuleName::new(wordcount::MODULE)?, wordcount::define);
    tracing::debug!(modules = ?loader.module_names(), "module catalog");
    Ok(ClosureCodec::new(
        Arc::new(ModuleResolver::new(loader)),
        config,
    ))
}

/// Worker side: rebuild the adapters, count one partition, and send the
/// partial counts back as encoded pairs.
fn run_worker(config: &CodecConfig, registry: &CodecRegistry, bytes: &[u8]) -> Result<Vec<u8>> {
    let shipment: Shipment = serde_json::from_slice(bytes)?;
    let codec = codec(config)?;
    let tokenize: FlatMapFunctionAdapter = codec.decode_adapter(&shipment.tokenize)?;
    let to_pair: PairFunctionAdapter = codec.decode_adapter(&shipment.to_pair)?;
    let combine: Function2Adapter = codec.decode_adapter(&shipment.combine)?;

    let mut counts: BTreeMap<String, Value> = BTreeMap::new();
    for line in shipment.lines {
        for word in tokenize.call(Value::from(line))? {
            let (key, one) = to_pair.call(word)?;
            merge_count(&mut counts, &combine, &key, one)?;
        }
    }
    tracing::debug!(shipment = %shipment.id, words = counts.len(), "partition counted");

    let pairs = Value::list(counts.into_iter().map(|(k, v)| Value::pair(k, v)));
    Ok(registry.encode(&pairs)?)
}

fn merge_count(
    counts: &mut BTreeMap<String, Value>,
    combine: &Function2Adapter,
    key: &Value,
    count: Value,
) -> Result<()> {
    let key = key
        .as_str()
        .ok_or_else(|| anyhow!("word key is a {}", key.kind_name()))?
        .to_string();
    let merged = match counts.remove(&key) {
        Some(seen) => combine.call(seen, count)?,
        None => count,
    };
    counts.insert(key, merged);
    Ok(())
}

/// Driver side: folds one worker's encoded `(word, count)` pairs into `totals`.
fn merge_partial(
    totals: &mut BTreeMap<String, Value>,
    registry: &CodecRegistry,
    combine: &Function2Adapter,
    partial: &[u8],
) -> Result<()> {
    let pairs = registry
        .decode(partial)?
        .into_list()
        .map_err(|v| anyhow!("worker sent a {}", v.kind_name()))?;
    for pair in pairs {
        let (key, count) = pair
            .into_pair()
            .map_err(|v| anyhow!("worker sent a {}", v.kind_name()))?;
        merge_count(totals, combine, &key, count)?;
    }
    Ok(())
}

fn print_diagnostics(codec: &ClosureCodec) {
    for diag in codec.diagnostics().entries() {
        println!(
            "diagnostic {} at {}: {} (module {:?}): {}",
            diag.id,
            diag.recorded_at.to_rfc3339(),
            diag.raw_identifier,
            diag.module.as_ref().map(|m| m.as_str()),
            diag.cause
        );
    }
}

fn ship_stray(config: &CodecConfig) -> Result<()> {
    let driver = codec(config)?;
    let adapter: FunctionAdapter = CallableAdapter::of(Stray {
        note: "defined only on the driver".to_string(),
    });
    let bytes = driver.encode_adapter(&adapter)?;

    let worker = codec(config)?;
    let decoded: FunctionAdapter = worker.decode_adapter(&bytes)?;
    println!("stray closure resolved: {}", decoded.is_resolved());
    print_diagnostics(&worker);
    if let Err(err) = decoded.call(Value::Unit) {
        println!("calling it: {}", error_chain(&err));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    tracing::info!(policy = %config.error_policy, workers = cli.workers, "starting");

    let registry = Arc::new(RegistryBridge::new().build()?);
    let driver = codec(&config)?;
    let ids = UlidGenerator::new(SystemClock);

    let tokenize: FlatMapFunctionAdapter = CallableAdapter::of(Tokenize {
        lowercase: true,
        min_len: 1,
    });
    let to_pair: PairFunctionAdapter = CallableAdapter::of(ToPair);
    let combine: Function2Adapter = CallableAdapter::of(SumCounts);

    let workers = cli.workers.max(1);
    let mut partitions: Vec<Vec<String>> = vec![Vec::new(); workers];
    for (i, line) in SAMPLE.iter().enumerate() {
        partitions[i % workers].push((*line).to_string());
    }

    let mut handles = Vec::with_capacity(workers);
    for lines in partitions {
        let shipment = Shipment {
            id: ids.generate_shipment_id(),
            lines,
            tokenize: driver.encode_adapter(&tokenize)?,
            to_pair: driver.encode_adapter(&to_pair)?,
            combine: driver.encode_adapter(&combine)?,
        };
        tracing::info!(shipment = %shipment.id, lines = shipment.lines.len(), "shipping");
        let bytes = serde_json::to_vec(&shipment)?;
        let config = config.clone();
        let registry = Arc::clone(&registry);
        handles.push(tokio::task::spawn_blocking(move || {
            run_worker(&config, &registry, &bytes)
        }));
    }

    let mut totals: BTreeMap<String, Value> = BTreeMap::new();
    for handle in handles {
        let partial = handle.await??;
        merge_partial(&mut totals, &registry, &combine, &partial)?;
    }

    for (word, count) in &totals {
        println!("{word:>8} {count}");
    }

    if config.error_policy == ErrorPolicy::Lenient {
        ship_stray(&config)?;
    }
    Ok(())
}
