use std::process::ExitCode;

use hackspot::cli::{self, ExitStatus};

fn main() -> ExitCode {
    let args = match cli::parse_args() {
        Ok(args) => args,
        Err(code) => return code,
    };

    match cli::run_cli(&args) {
        Ok(_) => ExitStatus::Success.into(),
        Err(err) => {
            cli::print_error(&err);
            ExitStatus::Failure.into()
        }
    }
}
