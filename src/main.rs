//! # gearview CLI
//!
//! Command-line interface for GearView.
//!
//! ## Usage
//! ```bash
//! gearview scan ~/Photos ~/Card --sort name
//! gearview copy ~/Photos --target ~/Sorted --camera "Canon EOS R5" --by-lens
//! ```

mod cli;

use std::process::ExitCode;

fn main() -> ExitCode {
    match cli::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", console::style("Error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
