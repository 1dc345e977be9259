//! Command-line options of the `sim` binary.
//!
//! Options keep the single-dash spelling of the classic course tool
//! (`-mp` is one flag, not `-m -p`), so they are matched by hand.

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{SimulatorError, SimulatorResult};
use crate::memory::cache::CachePolicy;
use crate::memory::Quirks;
use crate::trace::MalformedPolicy;

pub const USAGE: &str = "\
Usage: gunzip -c <tracefile> | sim [options]
  -a <assoc>       associativity of the cache (default 1)
  -l <blksz>       block size in bytes (default 32)
  -s <size>        cache size in KB (default 64)
  -mp <penalty>    miss penalty in cycles (default 30)
  -dp <penalty>    dirty writeback penalty in cycles (default 2)
  -t <tracefile>   read the trace from a file instead of stdin
  -compat          reproduce the legacy cachesim tool's set indexing and aging
  -malformed <p>   malformed trace lines: stop (default), skip or abort
  -v               verbose logging (RUST_LOG overrides)
  -h               print this message";

/// Simulation settings
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimArgs {
    pub policy: CachePolicy,
    pub trace: Option<PathBuf>,
    pub malformed: MalformedPolicy,
    pub verbose: bool,
}

#[derive(Debug, PartialEq)]
pub enum Command {
    Run(SimArgs),
    Help,
}

impl FromStr for MalformedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "stop" => Ok(MalformedPolicy::Stop),
            "skip" => Ok(MalformedPolicy::Skip),
            "abort" => Ok(MalformedPolicy::Abort),
            _ => Err(format!(
                "Invalid malformed-line policy: '{}'. Expected 'stop', 'skip' or 'abort'.",
                s
            )),
        }
    }
}

fn value_of<T: FromStr>(
    flag: &str,
    args: &mut impl Iterator<Item = String>,
) -> SimulatorResult<T> {
    let value = args.next().ok_or_else(|| {
        SimulatorError::UsageError(format!("Missing value after {}", flag))
    })?;
    value.parse().map_err(|_| {
        SimulatorError::UsageError(format!(
            "Invalid value '{}' for {}",
            value, flag
        ))
    })
}

/// Parse the arguments that follow the program name
pub fn parse_args<I>(args: I) -> SimulatorResult<Command>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let mut sim_args = SimArgs::default();
    let policy = &mut sim_args.policy;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-a" => policy.associativity = value_of(&arg, &mut args)?,
            "-l" => policy.block_size = value_of(&arg, &mut args)?,
            "-s" => policy.cache_size_kb = value_of(&arg, &mut args)?,
            "-mp" => policy.miss_penalty = value_of(&arg, &mut args)?,
            "-dp" => {
                policy.dirty_writeback_penalty = value_of(&arg, &mut args)?
            }
            "-t" => sim_args.trace = Some(value_of(&arg, &mut args)?),
            "-compat" => policy.quirks = Quirks::legacy(),
            "-malformed" => {
                let value = args.next().ok_or_else(|| {
                    SimulatorError::UsageError(
                        "Missing value after -malformed".into(),
                    )
                })?;
                sim_args.malformed =
                    value.parse().map_err(SimulatorError::UsageError)?;
            }
            "-v" => sim_args.verbose = true,
            "-h" => return Ok(Command::Help),
            _ => {
                return Err(SimulatorError::UsageError(format!(
                    "Unknown parameter: {}",
                    arg
                )))
            }
        }
    }

    Ok(Command::Run(sim_args))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> SimulatorResult<Command> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    fn run_args(args: &[&str]) -> SimArgs {
        match parse(args) {
            Ok(Command::Run(sim_args)) => sim_args,
            other => panic!("unexpected parse result: {:?}", other),
        }
    }

    #[test]
    fn test_defaults() {
        let sim_args = run_args(&[]);
        assert_eq!(sim_args.policy, CachePolicy::default());
        assert_eq!(sim_args.policy.dirty_writeback_penalty, 2);
        assert_eq!(sim_args.trace, None);
        assert_eq!(sim_args.malformed, MalformedPolicy::Stop);
        assert!(!sim_args.verbose);
    }

    #[test]
    fn test_all_options() {
        let sim_args = run_args(&[
            "-a", "4", "-l", "64", "-s", "16", "-mp", "100", "-dp", "5", "-t",
            "trace.txt", "-compat", "-malformed", "SKIP", "-v",
        ]);
        let policy = sim_args.policy;
        assert_eq!(policy.associativity, 4);
        assert_eq!(policy.block_size, 64);
        assert_eq!(policy.cache_size_kb, 16);
        assert_eq!(policy.miss_penalty, 100);
        assert_eq!(policy.dirty_writeback_penalty, 5);
        assert_eq!(policy.quirks, Quirks::legacy());
        assert_eq!(sim_args.trace, Some(PathBuf::from("trace.txt")));
        assert_eq!(sim_args.malformed, MalformedPolicy::Skip);
        assert!(sim_args.verbose);
    }

    #[test]
    fn test_help() {
        assert_eq!(parse(&["-a", "2", "-h"]).unwrap(), Command::Help);
    }

    #[test]
    fn test_usage_errors() {
        for args in [
            &["-a"][..],
            &["-a", "two"],
            &["-mp", "-5"],
            &["-x"],
            &["-malformed", "ignore"],
            &["-m", "p", "30"],
        ] {
            assert!(
                matches!(parse(args), Err(SimulatorError::UsageError(_))),
                "{:?} should be rejected",
                args
            );
        }
    }
}
