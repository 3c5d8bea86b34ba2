//! Compile-time generation pipeline for blockgen.
//!
//! A pass discovers annotated declarations, validates each one, then writes
//! its schema JSON and synthesizes its runtime adapter. After every
//! declaration of a kind, one provider registering those adapters is
//! emitted. The first fatal diagnostic ends the pass; artifacts already
//! written stay where they are.
//!
//! From a `build.rs`:
//!
//! ```ignore
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     blockgen_build::build!();
//!     Ok(())
//! }
//! ```

mod error;
mod macros;

pub mod introspect;
pub mod meta;
pub mod options;
pub mod paths;
pub mod synth;
pub mod validate;
pub mod write;

pub use blockgen_config as config;
pub use error::Error;
pub use options::Options;

use crate::{
    introspect::{SourceTree, SymbolSource},
    meta::Metadata,
    paths::RuntimePaths,
    synth::{Adapter, Synthesizer},
    validate::ValidationContext,
    write::{ArtifactSink, FsSink, SchemaWriter},
};
use blockgen_config::Config;
use blockgen_schema::{diagnostic::Diagnostic, types::Kind};
use std::{
    env,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Index of generated sources, written at the root of the output directory.
pub const INDEX_FILE: &str = "blockgen.rs";

///
/// Report
///
/// What one pass produced, in write order.
///

#[derive(Clone, Debug, Default)]
pub struct Report {
    pub declarations: usize,
    pub schema: Vec<PathBuf>,
    pub sources: Vec<PathBuf>,
}

impl Report {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.schema.is_empty() && self.sources.is_empty()
    }

    /// Every artifact path.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.schema.iter().chain(&self.sources).map(PathBuf::as_path)
    }
}

/// Run one pass over `source`, writing every artifact into `sink`.
pub fn run(
    source: &impl SymbolSource,
    options: &Options,
    sink: &mut impl ArtifactSink,
) -> Result<Report, Error> {
    options.check()?;

    let declarations = introspect::collect(source)?;
    let paths = RuntimePaths::new(&options.runtime_crate)?;
    info!(
        "generating {} block(s) and {} action(s) for {}",
        declarations.blocks.len(),
        declarations.actions.len(),
        options.module_name
    );

    let mut generator = Generator::new(options, &paths);
    for kind in [Kind::Block, Kind::Action] {
        generator.kind(kind, declarations.of_kind(kind), sink)?;
    }

    Ok(generator.report)
}

/// Generate from a `build.rs`: config from `CARGO_MANIFEST_DIR` and the
/// environment, sources from `src/`, output and index into `OUT_DIR`.
pub fn build_script() -> Result<Report, Error> {
    let manifest_dir = env_path("CARGO_MANIFEST_DIR")?;
    let out_dir = env_path("OUT_DIR")?;

    let options = Options::try_from(Config::discover(&manifest_dir)?)?;
    let source = SourceTree::scan(&manifest_dir.join("src"))?;
    let mut sink = FsSink::new(&out_dir);

    let report = run(&source, &options, &mut sink)?;
    sink.write(
        Path::new(INDEX_FILE),
        synth::index(report.sources.iter().map(PathBuf::as_path)).as_bytes(),
    )?;

    Ok(report)
}

fn env_path(key: &str) -> Result<PathBuf, Error> {
    env::var_os(key)
        .map(PathBuf::from)
        .ok_or_else(|| Diagnostic::missing(key).into())
}

///
/// Generator
///

struct Generator<'a> {
    options: &'a Options,
    synth: Synthesizer<'a>,
    context: ValidationContext,
    report: Report,
}

impl<'a> Generator<'a> {
    fn new(options: &'a Options, paths: &'a RuntimePaths) -> Self {
        Self {
            options,
            synth: Synthesizer::new(options, paths),
            context: ValidationContext::new(),
            report: Report::default(),
        }
    }

    fn kind(
        &mut self,
        kind: Kind,
        declarations: &[introspect::Declaration],
        sink: &mut impl ArtifactSink,
    ) -> Result<(), Error> {
        let mut adapters = Vec::with_capacity(declarations.len());

        for declaration in declarations {
            adapters.push(self.declaration(declaration, sink)?);
        }

        if adapters.is_empty() {
            return Ok(());
        }

        let provider = self.synth.provider(kind, &adapters)?;
        sink.write(&provider.path, provider.code.as_bytes())?;
        info!(
            "{kind}: {} adapter(s), provider {}",
            adapters.len(),
            provider.path.display()
        );
        self.report.sources.push(provider.path);

        Ok(())
    }

    fn declaration(
        &mut self,
        declaration: &introspect::Declaration,
        sink: &mut impl ArtifactSink,
    ) -> Result<Adapter, Error> {
        debug!("{} {}", declaration.kind, declaration.ident);

        if let Err(diagnostic) = self.context.validate(declaration) {
            warn!("{diagnostic}");
            return Err(diagnostic.into());
        }
        let meta = Metadata::build(declaration, self.options).inspect_err(|d| warn!("{d}"))?;

        let written = SchemaWriter::new(self.options).write(
            &Metadata::dir_name(declaration),
            &meta,
            sink,
        )?;
        self.report.schema.extend(written);

        let adapter = self.synth.adapter(declaration, &meta)?;
        sink.write(&adapter.path, adapter.code.as_bytes())?;
        self.report.sources.push(adapter.path.clone());
        self.report.declarations += 1;

        Ok(adapter)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::write::MemorySink;

    fn options() -> Options {
        Options::new("io.nativeblocks.sampleapp", "Demo").unwrap()
    }

    #[test]
    fn blank_options_fail_before_any_write() {
        let mut options = options();
        options.module_name = " ".to_string();
        let mut sink = MemorySink::new();

        let err = run(&SourceTree::from_text(""), &options, &mut sink).unwrap_err();

        assert_eq!(err.diagnostic(), Some(&Diagnostic::missing("module_name")));
        assert!(sink.is_empty());
    }

    #[test]
    fn empty_source_writes_nothing() {
        let mut sink = MemorySink::new();

        let source = SourceTree::from_text("pub fn plain() {}");
        let report = run(&source, &options(), &mut sink).unwrap();

        assert!(report.is_empty());
        assert!(sink.is_empty());
    }

    #[test]
    fn report_lists_schema_then_sources() {
        let mut sink = MemorySink::new();
        let report = run(
            &SourceTree::from_text(
                r#"
                #[block(key_type = "BUTTON", name = "Button", description = "")]
                pub fn button(#[data] text: String) {}
                "#,
            ),
            &options(),
            &mut sink,
        )
        .unwrap();

        assert_eq!(report.declarations, 1);
        assert_eq!(report.schema.len(), 5);
        assert_eq!(report.sources.len(), 2);
        assert!(report.sources[1].ends_with("provider/demo_block_provider.rs"));
        assert_eq!(report.paths().count(), sink.len());
    }
}
