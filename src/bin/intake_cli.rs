use std::{env, process};

use referral_intake::cli::{output, run_cli, USAGE};
use referral_intake::errors::CliError;

fn main() {
    if let Err(err) = run_cli(env::args().skip(1)) {
        output::error(&err);
        if matches!(err, CliError::Input(_)) {
            eprintln!("{USAGE}");
        }
        process::exit(1);
    }
}
