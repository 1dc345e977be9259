use std::env;
use std::process;

use log::warn;

use cache_lib::error::{SimulatorError, SimulatorResult};
use cache_lib::flags::{self, Command, SimArgs};
use cache_lib::logger;
use cache_lib::memory::cache::Cache;
use cache_lib::report::{ConfigEcho, Report};
use cache_lib::run_wrapper;
use cache_lib::trace::TraceReader;

fn main() {
    let sim_args = match flags::parse_args(env::args().skip(1)) {
        Ok(Command::Run(sim_args)) => sim_args,
        Ok(Command::Help) => {
            println!("{}", flags::USAGE);
            return;
        }
        Err(e) => {
            eprintln!("{}", e);
            println!("{}", flags::USAGE);
            process::exit(1);
        }
    };

    logger::init(sim_args.verbose);

    if let Err(e) = run(&sim_args) {
        eprintln!("Error: {}", e);
        if let SimulatorError::ConfigError(_) = e {
            println!("{}", flags::USAGE);
        }
        process::exit(1);
    }
}

fn run(sim_args: &SimArgs) -> SimulatorResult<()> {
    // Built before the echo so a bad geometry never starts a run
    let mut cache = Cache::make(sim_args.policy)?;
    print!("{}", ConfigEcho(&sim_args.policy));

    let reader = run_wrapper::open_trace(sim_args.trace.as_deref())?;
    let mut records = TraceReader::new(reader, sim_args.malformed);
    let history = run_wrapper::simulate(&mut cache, records.by_ref())?;
    if records.skipped() > 0 {
        warn!("{} malformed trace line(s) skipped", records.skipped());
    }

    print!("{}", Report::new(&history));
    Ok(())
}
