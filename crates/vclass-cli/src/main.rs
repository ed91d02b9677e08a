use vclass_core::logging;

mod cli;

use crate::cli::Cli;

fn main() {
    // Initialize logging as early as possible; never let a bad log dir stop the bot.
    if let Err(err) = logging::init_logging() {
        match logging::init_logging_stderr() {
            Ok(()) => tracing::warn!("file logging unavailable, using stderr: {:#}", err),
            Err(e) => eprintln!("vclass: logging disabled: {:#}; {:#}", err, e),
        }
    }

    if let Err(err) = Cli::run_from_args() {
        eprintln!("vclass error: {:#}", err);
        std::process::exit(1);
    }
}
