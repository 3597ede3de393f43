use std::process::ExitCode;

use log::error;

mod cmd_args;
mod convert;

fn main() -> ExitCode
{
    let options = cmd_args::create_cmd_args().get_matches();

    simple_logger::init_with_level(cmd_args::log_level(&options)).unwrap();

    if let Err(reason) = convert::run(&options)
    {
        error!("Could not complete conversion, reason {reason:?}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
