mod mask;
mod utils;
mod vectorize;

use crate::cli::{Cli, Commands, GlobalOptions};
use geotrace::GeotraceResult;

/// The main function to run the command based on CLI input.
pub fn run(cli: Cli) -> GeotraceResult<()> {
    let Cli { global, command } = cli;
    dispatch(&global, command)
}

/// Dispatch the command to the appropriate handler.
fn dispatch(global: &GlobalOptions, command: Commands) -> GeotraceResult<()> {
    match command {
        Commands::Vectorize(cmd) => vectorize::run(global, cmd),
        Commands::Mask(cmd) => mask::run(global, cmd),
    }
}
