use std::process::ExitCode;

use idl_json_schema::cli::CommandLineInterface;

fn main() -> ExitCode {
    let command_line_interface = match CommandLineInterface::load() {
        Ok(command_line_interface) => command_line_interface,
        // --help
        Err(error) if !error.use_stderr() => {
            print!("{error}");
            return ExitCode::SUCCESS;
        }
        Err(error) => {
            eprint!("*** {error}");
            return ExitCode::from(1);
        }
    };
    command_line_interface.init_logging();
    match command_line_interface.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("*** {error:#}");
            ExitCode::from(1)
        }
    }
}
