/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use clap::{value_parser, Arg, ArgAction, Command};

use crate::cmd_args::help_strings::{NOPADDING_HELP, REPACK_HELP, THREADS_HELP};

pub mod help_strings;

#[rustfmt::skip]
pub fn create_cmd_args() -> Command {
    Command::new("lglogo")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Unpack and repack boot logo firmware containers")
        .arg(Arg::new("image")
            .short('i')
            .long("image")
            .help("Container to unpack")
            .value_name("FILE"))
        .arg(Arg::new("picdir")
            .short('p')
            .long("picdir")
            .help("Directory images are unpacked to or repacked from")
            .value_name("DIR")
            .default_value("pic"))
        .arg(Arg::new("outimg")
            .short('o')
            .long("outimg")
            .help("Output file of the repacked container")
            .value_name("FILE")
            .default_value("new.img"))
        .arg(Arg::new("repack")
            .long("repack")
            .action(ArgAction::SetTrue)
            .help("Repack the image directory instead of unpacking")
            .long_help(REPACK_HELP))
        .arg(Arg::new("nopadding")
            .long("nopadding")
            .action(ArgAction::SetTrue)
            .help("Do not pad images with background rows when repacking")
            .long_help(NOPADDING_HELP))
        .arg(Arg::new("probe")
            .long("probe")
            .action(ArgAction::SetTrue)
            .conflicts_with("repack")
            .help("Print the header and metadata table of --image as json and exit"))
        .arg(Arg::new("verbose")
            .short('v')
            .long("verbose")
            .action(ArgAction::SetTrue)
            .help("Log every metadata record while unpacking"))
        .arg(Arg::new("threads")
            .short('j')
            .long("threads")
            .help_heading("ADVANCED")
            .help("Number of threads used when unpacking")
            .long_help(THREADS_HELP)
            .value_name("N")
            .value_parser(value_parser!(usize)))
        .arg(Arg::new("debug")
            .long("debug")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display debug information and higher"))
        .arg(Arg::new("trace")
            .long("trace")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display very verbose information"))
        .arg(Arg::new("warn")
            .long("warn")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display warnings and errors"))
        .arg(Arg::new("info")
            .long("info")
            .action(ArgAction::SetTrue)
            .help_heading("LOGGING")
            .help("Display progress information, the default"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_is_valid() {
        create_cmd_args().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let matches = create_cmd_args().get_matches_from(["lglogo", "-i", "logo.img"]);

        assert_eq!(matches.get_one::<String>("image").unwrap(), "logo.img");
        assert_eq!(matches.get_one::<String>("picdir").unwrap(), "pic");
        assert_eq!(matches.get_one::<String>("outimg").unwrap(), "new.img");
        assert!(!matches.get_flag("repack"));
        assert!(!matches.get_flag("nopadding"));
    }

    #[test]
    fn test_probe_conflicts_with_repack() {
        let result = create_cmd_args().try_get_matches_from(["lglogo", "--probe", "--repack"]);
        assert!(result.is_err());
    }
}
