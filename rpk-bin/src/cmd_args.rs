use clap::{Arg, ArgAction, ArgMatches, Command};
use log::Level;

pub fn create_cmd_args() -> Command
{
    Command::new("rpkconv")
        .about("Convert images between png and rpk")
        .arg(
            Arg::new("input")
                .required(true)
                .help("Input file. A `.png` suffix selects encoding to rpk, anything else decodes rpk back to png")
        )
        .arg(
            Arg::new("output")
                .required(true)
                .help("Output file. Must end in `.rpk` when encoding and `.png` when decoding")
        )
        .arg(
            Arg::new("trace")
                .long("trace")
                .action(ArgAction::SetTrue)
                .help_heading("Logging")
                .help("Display very verbose information")
        )
        .arg(
            Arg::new("debug")
                .long("debug")
                .action(ArgAction::SetTrue)
                .help_heading("Logging")
                .help("Display debug information and higher")
        )
        .arg(
            Arg::new("info")
                .long("info")
                .action(ArgAction::SetTrue)
                .help_heading("Logging")
                .help("Display information about the conversion")
        )
        .arg(
            Arg::new("warn")
                .long("warn")
                .action(ArgAction::SetTrue)
                .help_heading("Logging")
                .help("Display warnings and errors")
        )
}

/// Map the logging flags to the most verbose level asked for,
/// errors only when none was given
pub fn log_level(options: &ArgMatches) -> Level
{
    const FLAG_LEVELS: [(&str, Level); 4] = [
        ("trace", Level::Trace),
        ("debug", Level::Debug),
        ("info", Level::Info),
        ("warn", Level::Warn)
    ];

    for (flag, level) in FLAG_LEVELS
    {
        if options.get_flag(flag)
        {
            return level;
        }
    }
    Level::Error
}
