//! `blockgen check` command

use crate::cli::CheckArgs;
use anyhow::{Context, Result};
use blockgen_build::{run, write::MemorySink};

pub fn execute(args: CheckArgs) -> Result<()> {
    let options = super::options(&args.source)?;
    let source = super::source(&args.source)?;
    let mut sink = MemorySink::new();

    let report = run(&source, &options, &mut sink)
        .with_context(|| format!("check failed for {}", args.source.src.display()))?;

    for path in report.paths() {
        tracing::debug!("would write {}", path.display());
    }
    println!(
        "ok: {} declaration(s), {} artifact(s)",
        report.declarations,
        sink.len()
    );

    Ok(())
}
