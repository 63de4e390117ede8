#[macro_use]
extern crate log;

use std::process;

use testbed2d::Testbed;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let testbed = match Testbed::from_builders(0, examples2d::builders()) {
        Ok(testbed) => testbed,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    if let Err(e) = testbed.run() {
        error!("{}", e);
        process::exit(1);
    }
}
