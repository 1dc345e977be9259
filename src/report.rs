//! Human-readable output: configuration echo and final report

use std::fmt;

use crate::history::CacheHistory;
use crate::memory::cache::CachePolicy;

/// Placeholder for a rate whose denominator is zero
pub const NO_DATA: &str = "n/a";

/// Format a rate to `precision` decimals, or [`NO_DATA`]
pub fn fmt_rate(rate: Option<f64>, precision: usize) -> String {
    match rate {
        Some(rate) => format!("{:.*}", precision, rate),
        None => NO_DATA.to_string(),
    }
}

/// Cache parameters as printed before the simulation starts
pub struct ConfigEcho<'a>(pub &'a CachePolicy);

impl fmt::Display for ConfigEcho<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let policy = self.0;
        writeln!(f, "Cache parameters:")?;
        writeln!(f, "\tCache Size (KB)\t\t\t{}", policy.cache_size_kb)?;
        writeln!(f, "\tCache Associativity\t\t{}", policy.associativity)?;
        writeln!(f, "\tCache Block Size (bytes)\t{}", policy.block_size)?;
        writeln!(f, "\tMiss penalty (cyc)\t\t{}", policy.miss_penalty)?;
        writeln!(f)
    }
}

/// Final statistics report
pub struct Report<'a> {
    history: &'a CacheHistory,
}

impl<'a> Report<'a> {
    pub fn new(history: &'a CacheHistory) -> Self {
        Self { history }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let h = self.history;
        writeln!(f, "Simulation results:")?;
        writeln!(f, "\texecution time {} cycles", h.cycles)?;
        writeln!(f, "\tinstructions {}", h.instructions)?;
        writeln!(f, "\tmemory accesses {}", h.memory_accesses)?;
        writeln!(f, "\toverall miss rate {}", fmt_rate(h.get_miss_rate(), 2))?;
        writeln!(f, "\tread miss rate {}", fmt_rate(h.get_read_miss_rate(), 2))?;
        writeln!(f, "\ttotal CPI {}", fmt_rate(h.get_cpi(), 2))?;
        writeln!(f, "dirty evictions {}", h.dirty_evictions)?;
        writeln!(f, "load_misses {}", h.load_misses)?;
        writeln!(f, "store_misses {}", h.store_misses)?;
        writeln!(f, "load_hits {}", h.load_hits)?;
        writeln!(f, "store_hits {}", h.store_hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_echo() {
        let echo = ConfigEcho(&CachePolicy::default()).to_string();
        assert_eq!(
            echo,
            "Cache parameters:\n\
             \tCache Size (KB)\t\t\t64\n\
             \tCache Associativity\t\t1\n\
             \tCache Block Size (bytes)\t32\n\
             \tMiss penalty (cyc)\t\t30\n\
             \n"
        );
    }

    #[test]
    fn test_report() {
        let history = CacheHistory {
            instructions: 8,
            cycles: 70,
            memory_accesses: 4,
            dirty_evictions: 1,
            load_hits: 1,
            store_hits: 1,
            load_misses: 1,
            store_misses: 1,
        };
        let report = Report::new(&history).to_string();
        assert_eq!(
            report,
            "Simulation results:\n\
             \texecution time 70 cycles\n\
             \tinstructions 8\n\
             \tmemory accesses 4\n\
             \toverall miss rate 0.50\n\
             \tread miss rate 0.50\n\
             \ttotal CPI 8.75\n\
             dirty evictions 1\n\
             load_misses 1\n\
             store_misses 1\n\
             load_hits 1\n\
             store_hits 1\n"
        );
    }

    #[test]
    fn test_fmt_rate() {
        assert_eq!(fmt_rate(Some(0.6875), 2), "0.69");
        assert_eq!(fmt_rate(Some(0.6875), 4), "0.6875");
        assert_eq!(fmt_rate(None, 4), NO_DATA);
    }

    #[test]
    fn test_empty_report() {
        let report = Report::new(&CacheHistory::default()).to_string();
        assert!(report.contains("\toverall miss rate n/a\n"));
        assert!(report.contains("\tread miss rate n/a\n"));
        assert!(report.contains("\ttotal CPI n/a\n"));
        assert!(report.contains("\texecution time 0 cycles\n"));
    }
}
