use anyhow::{Context, Result};
use clap::Parser;
use common::{report, timed};
use day20::CLIArgs;

fn main() -> Result<()> {
    let args = CLIArgs::parse();
    let map = day20::read_map(&args.input_path).with_context(|| {
        format!(
            "Failed to read map from given file({}).",
            args.input_path.display()
        )
    })?;

    if map.fastest_steps_n().is_none() {
        eprintln!("Given map has no path if no cheat is allowed.");
    }

    let short_cheats_n = timed("Part 1", || {
        map.cheats_saving_at_least(args.short_cheat, args.save_threshold)
    });
    report(1, short_cheats_n);

    let long_cheats_n = timed("Part 2", || {
        map.cheats_saving_at_least(args.long_cheat, args.save_threshold)
    });
    report(2, long_cheats_n);

    Ok(())
}
