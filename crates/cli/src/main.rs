use std::process::ExitCode;

fn main() -> ExitCode {
    sourcedesk_cli::run()
}
