// Copyright 2020 Johannes Köster, David Lähnemann.
// Licensed under the GNU GPLv3 license (https://opensource.org/licenses/GPL-3.0)
// This file may not be copied, modified, or distributed
// except according to those terms.

use std::process::exit;

use structopt::StructOpt;

use gat::cli::{run, Gat};

pub fn main() {
    let opt = Gat::from_args();

    fern::Dispatch::new()
        .level(log::LevelFilter::Info)
        .chain(std::io::stderr())
        .apply()
        .unwrap();

    exit(match run(opt) {
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
        _ => 0,
    })
}
