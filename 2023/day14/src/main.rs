use anyhow::{Context, Result};
use clap::Parser;
use common::{report, timed};
use day14::{CLIArgs, Direction};

fn main() -> Result<()> {
    let args = CLIArgs::parse();
    let platform = day14::read_platform(&args.input_path).with_context(|| {
        format!(
            "Failed to read platform from given file({}).",
            args.input_path.display()
        )
    })?;

    let tilted_load = timed("Part 1", || {
        let mut platform = platform.clone();
        platform.tilt(Direction::North);
        platform.north_load()
    });
    report(1, tilted_load);

    let spun_load = timed("Part 2", || {
        platform.clone().load_after_cycles(args.cycles)
    });
    report(2, spun_load);

    Ok(())
}
