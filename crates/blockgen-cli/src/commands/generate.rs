//! `blockgen generate` command

use crate::cli::GenerateArgs;
use anyhow::{Context, Result};
use blockgen_build::{
    INDEX_FILE, run, synth,
    write::{ArtifactSink, FsSink},
};
use std::path::{Path, PathBuf};
use tracing::info;

pub fn execute(args: GenerateArgs) -> Result<()> {
    let options = super::options(&args.source)?;
    let source = super::source(&args.source)?;
    let mut sink = FsSink::new(&args.out);

    let report = run(&source, &options, &mut sink)
        .with_context(|| format!("generation failed for {}", args.source.src.display()))?;
    sink.write(
        Path::new(INDEX_FILE),
        synth::index(report.sources.iter().map(PathBuf::as_path)).as_bytes(),
    )?;

    info!(
        "generated {} declaration(s): {} schema file(s), {} source file(s) in {}",
        report.declarations,
        report.schema.len(),
        report.sources.len(),
        args.out.display()
    );

    Ok(())
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::SourceArgs;
    use std::fs;

    #[test]
    fn writes_schema_adapters_and_index() {
        let root = tempfile::tempdir().unwrap();
        let src = root.path().join("src");
        fs::create_dir_all(&src).unwrap();
        fs::write(
            src.join("lib.rs"),
            r#"
            #[block(key_type = "CARD", name = "Card", description = "")]
            pub fn card(#[data] title: String) {}
            "#,
        )
        .unwrap();
        let config = root.path().join("blockgen.toml");
        fs::write(
            &config,
            "base_package = \"io.nativeblocks.sampleapp\"\nmodule_name = \"Demo\"\n",
        )
        .unwrap();
        let out = root.path().join("out");

        execute(GenerateArgs {
            source: SourceArgs {
                config: Some(config),
                src,
                ..SourceArgs::default()
            },
            out: out.clone(),
        })
        .unwrap();

        let block = out.join("io/nativeblocks/sampleapp/integration/consumer/block");
        assert!(block.join("Card").join("data.json").is_file());
        assert!(block.join("card_block.rs").is_file());

        let index = fs::read_to_string(out.join(INDEX_FILE)).unwrap();
        assert!(index.contains("card_block.rs"));
    }
}
