use thiserror::Error;

/// Top-level error type for the simulator
#[derive(Error, Debug)]
pub enum SimulatorError {
    #[error("Invalid cache configuration: {0}")]
    ConfigError(#[from] ConfigError),

    #[error("Trace error: {0}")]
    TraceError(#[from] TraceError),

    #[error("{0}")]
    UsageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Plotting error: {0}")]
    PlotError(String),
}

/// Errors raised while deriving the cache geometry.
/// Only the cases the arithmetic cannot survive are rejected.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("associativity must be at least 1")]
    ZeroAssociativity,

    #[error("block size must be at least 1 byte")]
    ZeroBlockSize,

    #[error("cache size must be at least 1 KB")]
    ZeroCacheSize,

    #[error("{cache_size_kb} KB needs more than {max_blocks} blocks")]
    TooLarge {
        cache_size_kb: usize,
        max_blocks: usize,
    },

    #[error("{blocks} block(s) cannot hold a single set of {associativity}")]
    TooFewBlocks { blocks: usize, associativity: usize },
}

/// Errors related to trace input
#[derive(Error, Debug)]
pub enum TraceError {
    #[error("Malformed trace line {line}: '{content}' ({reason})")]
    Malformed {
        line: usize,
        content: String,
        reason: MalformedReason,
    },
}

/// Why a trace line could not be parsed
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedReason {
    #[error("expected 4 fields, found {0}")]
    FieldCount(usize),

    #[error("{0}")]
    Scan(String),

    #[error("invalid hexadecimal address '{0}'")]
    BadAddress(String),
}

/// Type alias for Result with SimulatorError
pub type SimulatorResult<T> = Result<T, SimulatorError>;
