use anyhow::{Context, Result};
use clap::Parser;
use common::{report, timed};
use day22::{CLIArgs, SupportGraph};

fn main() -> Result<()> {
    let args = CLIArgs::parse();
    let mut bricks = day22::read_bricks(&args.input_path).with_context(|| {
        format!(
            "Failed to read bricks from given file({}).",
            args.input_path.display()
        )
    })?;

    let graph = timed("Settling", || {
        day22::settle(&mut bricks).map(|_| SupportGraph::new(&bricks))
    })
    .with_context(|| {
        format!(
            "Failed to settle bricks from given file({}).",
            args.input_path.display()
        )
    })?;

    let removable_n = timed("Part 1", || graph.removable_count());
    report(1, removable_n);

    let fallen_n = timed("Part 2", || graph.total_chain_reaction());
    report(2, fallen_n);

    Ok(())
}
