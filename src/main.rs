//! Omok rules engine CLI
//!
//! Checks placements against a stored match state and replays recorded
//! games through the state machine.

use clap::Parser;
use omok::cli::{self, Cli};
use omok::logging::init_logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    cli::run(cli)
}
