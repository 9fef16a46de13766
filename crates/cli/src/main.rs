use std::process::ExitCode;

fn main() -> ExitCode {
    quotation_cli::run()
}
