pub mod flags;
pub mod history;
pub mod logger;
pub mod memory;
pub mod report;
pub mod run_wrapper;
pub mod trace;

pub mod error;
