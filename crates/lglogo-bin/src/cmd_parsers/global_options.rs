/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::ArgMatches;
use lglogo::PackOptions;
use log::{info, Level};

pub fn parse_options(options: &ArgMatches) -> PackOptions {
    let mut pack_options = PackOptions::default()
        .set_padding(!options.get_flag("nopadding"))
        .set_verbose(options.get_flag("verbose"));

    if let Some(threads) = options.get_one::<usize>("threads") {
        info!("Using {} threads", threads);
        pack_options = pack_options.set_threads(*threads);
    }
    if !pack_options.padding() {
        info!("Background padding disabled");
    }
    pack_options
}

/// Set up logging options
pub fn setup_logger(options: &ArgMatches) {
    let log_level = if options.get_flag("debug") {
        Level::Debug
    } else if options.get_flag("trace") {
        Level::Trace
    } else if options.get_flag("warn") {
        Level::Warn
    } else {
        Level::Info
    };

    if let Err(e) = simple_logger::init_with_level(log_level) {
        eprintln!("Could not initialize logger: {e}");
        return;
    }
    log::debug!("Initialized logger");
    log::debug!("Log level :{}", log_level);
}
