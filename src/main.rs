//! specboard: project health from journeys, scenarios, and use cases

use anyhow::Result;

fn main() -> Result<()> {
    specboard::cli::run()
}
