#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(coverage_nightly, coverage(off))]

//! Binary entry point for calculating core masks.
//!
//! Prints the calculated core assignment and the topology it is based on as a JSON record on
//! stdout. Diagnostics go to stderr.
//!
//! ```text
//! core_masks --interface enp5s0f0 --interface enp5s0f1
//! ```

use std::error::Error;
use std::io;
use std::iter;
use std::path::PathBuf;
use std::process::ExitCode;

use argh::FromArgs;
use core_masks::{DEFAULT_SYSFS_ROOT, RunInput, calculate};
use tracing::Level;

/// Reserve OVS control and poll-mode driver cores on the NUMA nodes local to network interfaces
/// and print them with their affinity masks.
#[derive(FromArgs)]
struct Args {
    /// network interface served by poll-mode driver threads; repeat for multiple interfaces
    #[argh(option, long = "interface")]
    interfaces: Vec<String>,

    /// root of the sysfs tree to read the host topology from
    #[argh(option, default = "PathBuf::from(DEFAULT_SYSFS_ROOT)")]
    sysfs_root: PathBuf,

    /// print the result on a single line
    #[argh(switch)]
    compact: bool,

    /// log topology discovery details to stderr
    #[argh(switch, short = 'v')]
    verbose: bool,
}

// Binary entry point - covered by the integration tests that spawn the binary.
#[cfg_attr(test, mutants::skip)]
fn main() -> ExitCode {
    let args: Args = argh::from_env();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if args.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .init();

    if args.interfaces.is_empty() {
        eprintln!("At least one --interface is required, see --help");
        return ExitCode::FAILURE;
    }

    let input = RunInput::new(args.interfaces).with_sysfs_root(args.sysfs_root);

    let facts = match calculate(&input) {
        Ok(facts) => facts,
        Err(e) => {
            eprintln!("Error calculating core masks: {}", describe_chain(&e));
            return ExitCode::FAILURE;
        }
    };

    let rendered = if args.compact {
        serde_json::to_string(&facts)
    } else {
        serde_json::to_string_pretty(&facts)
    };

    match rendered {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error serializing core masks: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Joins the messages of an error and all its sources, outermost first.
fn describe_chain(error: &(dyn Error + 'static)) -> String {
    iter::successors(Some(error), |&e| e.source())
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(": ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_includes_every_source() {
        let error = cpulist::parse("0,99999999999").unwrap_err();

        assert_eq!(
            describe_chain(&error),
            "invalid cpulist syntax: '99999999999' is invalid: item could not be parsed as an \
             integer: number too large to fit in target type"
        );
    }

    #[test]
    fn chain_without_source_is_single_message() {
        let error = io::Error::other("disk on fire");

        assert_eq!(describe_chain(&error), "disk on fire");
    }
}
