//! A simulator wrapper

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use log::{debug, info};

use crate::error::SimulatorResult;
use crate::history::CacheHistory;
use crate::memory::cache::{Cache, CachePolicy};
use crate::memory::StorageInterface;
use crate::trace::{self, MalformedPolicy, TraceRecord};

/// Open the trace file, or stdin when no path is given
pub fn open_trace(path: Option<&Path>) -> SimulatorResult<Box<dyn BufRead>> {
    match path {
        Some(path) => {
            debug!("reading trace from {}", path.display());
            Ok(Box::new(BufReader::new(File::open(path)?)))
        }
        None => {
            debug!("reading trace from stdin");
            Ok(Box::new(BufReader::new(io::stdin())))
        }
    }
}

/// Feed every record through the cache, one at a time,
/// and return the accumulated history
pub fn simulate<S, I>(cache: &mut S, records: I) -> SimulatorResult<CacheHistory>
where
    S: StorageInterface,
    I: IntoIterator<Item = SimulatorResult<TraceRecord>>,
{
    let policy = *cache.policy();
    let mut history = CacheHistory::default();
    for record in records {
        let record = record?;
        let outcome = cache.access(record.access_type, record.address);
        history.record(
            &policy,
            record.access_type,
            record.instruction_count,
            outcome,
        );
    }
    info!(
        "simulated {} accesses, {} misses",
        history.memory_accesses,
        history.misses()
    );
    Ok(history)
}

/// Replay an in-memory trace against a fresh cache
pub fn replay(
    policy: CachePolicy,
    records: &[TraceRecord],
) -> SimulatorResult<CacheHistory> {
    let mut cache = Cache::make(policy)?;
    simulate(&mut cache, records.iter().copied().map(Ok))
}

/// Load the trace at `trace_path` for repeated replays
pub fn load_trace(
    trace_path: &Path,
    malformed: MalformedPolicy,
) -> SimulatorResult<Vec<TraceRecord>> {
    trace::read_records(open_trace(Some(trace_path))?, malformed)
}
