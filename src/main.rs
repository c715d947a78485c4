use std::process::ExitCode;

fn main() -> ExitCode {
    ask::cli::entrypoint()
}
