// Soundboard CLI entry point

use soundboard_cli::CommandRouter;

fn main() -> anyhow::Result<()> {
    CommandRouter::route()
}
