//! Command-line handling of the headless testbed.

use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Result, TestbedError};

/// Options accepted by `Testbed::run`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Options {
    pub help: bool,
    pub list: bool,
    pub pause: bool,
    pub example: Option<String>,
    pub frames: Option<usize>,
    pub seed: Option<u64>,
    pub settings: Option<PathBuf>,
    pub dump_every: Option<usize>,
}

pub fn usage(exe_name: &str) {
    info!("Usage: {} [OPTION] ", exe_name);
    info!("");
    info!("Options:");
    info!("    --help              - prints this help message and exits.");
    info!("    --list              - prints the available examples and exits.");
    info!("    --pause             - do not start the simulation right away.");
    info!("    --example <name>    - run the example with the given name.");
    info!("    --frames <n>        - number of frames to run.");
    info!("    --seed <n>          - seed of the random generator used by examples.");
    info!("    --settings <path>   - load the simulation settings from a JSON file.");
    info!("    --dump-every <n>    - log world statistics every <n> steps (0 disables).");
}

/// Parses the arguments following the executable name.
pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Options> {
    let mut options = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match &arg[..] {
            "--help" | "-h" => options.help = true,
            "--list" => options.list = true,
            "--pause" => options.pause = true,
            "--example" => options.example = Some(value(&arg, args.next())?),
            "--frames" => options.frames = Some(number(&arg, args.next())?),
            "--seed" => options.seed = Some(number(&arg, args.next())?),
            "--settings" => options.settings = Some(PathBuf::from(value(&arg, args.next())?)),
            "--dump-every" => options.dump_every = Some(number(&arg, args.next())?),
            _ => {
                return Err(TestbedError::InvalidArgument {
                    arg: arg.clone(),
                    reason: "unknown option".to_string(),
                })
            }
        }
    }

    Ok(options)
}

fn value(arg: &str, next: Option<String>) -> Result<String> {
    next.ok_or_else(|| TestbedError::InvalidArgument {
        arg: arg.to_string(),
        reason: "missing value".to_string(),
    })
}

fn number<T: FromStr>(arg: &str, next: Option<String>) -> Result<T> {
    let raw = value(arg, next)?;
    raw.parse().map_err(|_| TestbedError::InvalidArgument {
        arg: arg.to_string(),
        reason: format!("{:?} is not a valid number", raw),
    })
}
