// SPDX-License-Identifier:  MIT

#[macro_use]
extern crate log;
extern crate env_logger;

#[macro_use]
extern crate lazy_static;
extern crate libc;
extern crate regex;

mod cmdline;
mod directive;
mod error;
mod network;
mod util;

use cmdline::*;
use directive::*;
use network::*;
use util::*;

static CMDLINE_PATH: &str = "/proc/cmdline";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub written: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Generates one .network file per `ifcfg=` directive on `line`, in order of appearance.
///
/// Failures are reported and only affect the directive they belong to.
pub fn generate(line: &str, output: &OutputDir) -> Summary {
    let mut summary = Summary::default();

    for directive in ifcfg_directives(line) {
        debug!("Found ifcfg directive '{}'", directive);

        let spec = match InterfaceSpec::parse(directive) {
            Ok(Some(s)) => s,
            Ok(None) => {
                debug!("Empty configuration in '{}', nothing to do", directive);
                summary.skipped += 1;
                continue;
            }
            Err(e) => {
                error!("{}", e);
                summary.failed += 1;
                continue;
            }
        };

        debug!("Parsed {:?}", spec);

        match output.write_network_file(&spec) {
            Ok(path) => {
                println!(
                    "Created config: {} for interface '{}'",
                    path.display(),
                    spec.interface
                );
                summary.written += 1;
            }
            Err(e) => {
                error!("{}", e);
                summary.failed += 1;
            }
        }
    }

    summary
}

fn main() {
    env_logger::init();

    let output = match OutputDir::create(NETWORK_CONF_DIR) {
        Ok(o) => o,
        Err(e) => {
            error!("{}", e);
            exit_with(e.exit_code())
        }
    };
    debug!("Writing network files to {}", output.path().display());

    let line = match cmdline_from_args(std::env::args().skip(1)) {
        Some(l) => l,
        None => match get_cmdline_from_file(CMDLINE_PATH) {
            Ok(l) => l,
            Err(e) => {
                error!("{}", e);
                exit_with(e.exit_code())
            }
        },
    };

    let summary = generate(&line, &output);
    if summary == Summary::default() {
        info!("No ifcfg= directive on the kernel command line");
    }

    debug!("{:?}", summary);
}
