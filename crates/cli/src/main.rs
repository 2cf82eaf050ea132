use std::process::ExitCode;

fn main() -> ExitCode {
    sellpoint_cli::run()
}
