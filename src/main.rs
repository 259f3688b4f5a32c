use std::process::ExitCode;

fn main() -> ExitCode {
    flowmap::cli::run()
}
