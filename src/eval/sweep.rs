use std::path::Path;
use std::process;

use cache_lib::error::{SimulatorError, SimulatorResult};
use cache_lib::history::CacheHistory;
use cache_lib::logger;
use cache_lib::memory::cache::CachePolicy;
use cache_lib::report::fmt_rate;
use cache_lib::run_wrapper::{load_trace, replay};
use cache_lib::trace::MalformedPolicy;

// Cache sizes in KB
const CACHE_SIZES: [usize; 4] = [4, 16, 64, 256];
// Block sizes in bytes
const BLOCK_SIZES: [usize; 4] = [16, 32, 64, 128];
const ASSOCIATIVITIES: [usize; 4] = [1, 2, 4, 8];
// Decimals kept for rates in the CSV
const RATE_PRECISION: usize = 4;

fn main() {
    logger::init(false);
    if let Err(e) = run_eval() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run_eval() -> SimulatorResult<()> {
    let param_tokens: Vec<String> = std::env::args().collect();
    let trace_path = param_tokens.get(1).ok_or_else(|| {
        SimulatorError::UsageError(
            "Usage: sweep-eval <tracefile> [output.csv]".into(),
        )
    })?;
    let trace_base_name = Path::new(trace_path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| trace_path.clone());
    let output_path = param_tokens
        .get(2)
        .cloned()
        .unwrap_or_else(|| format!("eval/sweep_eval_{}.csv", trace_base_name));

    let records = load_trace(Path::new(trace_path), MalformedPolicy::Skip)?;
    eprintln!("Loaded {} records from {}", records.len(), trace_path);

    let mut writer = csv::Writer::from_path(&output_path)?;
    writer.write_record([
        "Cache size (KB)",
        "Block size (bytes)",
        "Associativity",
        "Accesses",
        "Miss rate",
        "Read miss rate",
        "CPI",
        "Dirty evictions",
    ])?;

    for cache_size in CACHE_SIZES {
        for block_size in BLOCK_SIZES {
            for associativity in ASSOCIATIVITIES {
                let policy = CachePolicy {
                    cache_size_kb: cache_size,
                    block_size,
                    associativity,
                    ..Default::default()
                };
                let history: CacheHistory = match replay(policy, &records) {
                    Ok(history) => history,
                    Err(e) => {
                        eprintln!(
                            "Warning: skipping {}KB/{}B/{}-way: {}",
                            cache_size, block_size, associativity, e
                        );
                        continue;
                    }
                };
                writer.write_record([
                    cache_size.to_string(),
                    block_size.to_string(),
                    associativity.to_string(),
                    history.memory_accesses.to_string(),
                    fmt_rate(history.get_miss_rate(), RATE_PRECISION),
                    fmt_rate(history.get_read_miss_rate(), RATE_PRECISION),
                    fmt_rate(history.get_cpi(), RATE_PRECISION),
                    history.dirty_evictions.to_string(),
                ])?;
            }
        }
    }

    writer.flush()?;
    eprintln!("Wrote {}", output_path);
    Ok(())
}
