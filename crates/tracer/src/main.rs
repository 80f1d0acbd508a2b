//! `lc4-trace`: load object files, run the machine to halt, write the trace.

use std::env;
use std::error::Error;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process;

use simulator_core::MachineState;
use tracer::{load_object_file, run_to_halt, RunOutcome};

use thiserror as _;
#[cfg(test)]
use tempfile as _;

const USAGE_TEXT: &str = "\
Usage: lc4-trace <trace-output> <object-file>...

Loads each object file into a fresh memory image, resets the machine to the
program entry point, and runs to halt, writing one trace line per retired
instruction to <trace-output>.";

#[derive(Debug)]
struct Config {
    trace_path: PathBuf,
    object_paths: Vec<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Config, String> {
    if args.len() < 2 {
        return Err(format!(
            "expected a trace output path and at least one object file\n\n{USAGE_TEXT}"
        ));
    }
    Ok(Config {
        trace_path: PathBuf::from(&args[0]),
        object_paths: args[1..].iter().map(PathBuf::from).collect(),
    })
}

fn run(config: &Config) -> Result<(), String> {
    let file = File::create(&config.trace_path).map_err(|err| {
        format!(
            "cannot create trace file {}: {err}",
            config.trace_path.display()
        )
    })?;
    let mut trace = BufWriter::new(file);

    let mut state = MachineState::new();
    for path in &config.object_paths {
        load_object_file(&mut state, path).map_err(|err| render_error_chain(&err))?;
    }
    state.reset();

    let outcome = run_to_halt(&mut state, &mut trace)
        .and_then(|outcome| {
            trace.flush()?;
            Ok(outcome)
        })
        .map_err(|err| {
            format!(
                "cannot write trace file {}: {err}",
                config.trace_path.display()
            )
        })?;

    // A runtime fault ends the run normally from the host's point of view:
    // the trace up to the fault is valid output.
    if let RunOutcome::Faulted { cause, retired } = outcome {
        eprintln!("machine fault after {retired} retired instructions: {cause}");
    }
    Ok(())
}

fn render_error_chain(err: &dyn Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let config = match parse_args(&args) {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{message}");
            process::exit(1);
        }
    };

    if let Err(message) = run(&config) {
        eprintln!("{message}");
        // An aborted run must not leave a half-written trace behind.
        let _ = fs::remove_file(&config.trace_path);
        process::exit(1);
    }
}
