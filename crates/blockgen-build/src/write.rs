use crate::{Error, Options, meta::Metadata};
use blockgen_schema::types::Kind;
use serde::Serialize;
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

/// Directory (under the base package) all consumer artifacts live in.
pub const CONSUMER_DIR: &str = "integration/consumer";

///
/// ArtifactSink
///
/// Destination for generated files. Paths are relative to the sink root.
///

pub trait ArtifactSink {
    fn write(&mut self, path: &Path, contents: &[u8]) -> Result<(), Error>;
}

///
/// FsSink
///

#[derive(Clone, Debug)]
pub struct FsSink {
    root: PathBuf,
    written: Vec<PathBuf>,
}

impl FsSink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            written: Vec::new(),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute paths written so far.
    #[must_use]
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl ArtifactSink for FsSink {
    fn write(&mut self, path: &Path, contents: &[u8]) -> Result<(), Error> {
        let target = self.root.join(path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|err| Error::io(parent, err))?;
        }
        fs::write(&target, contents).map_err(|err| Error::io(&target, err))?;

        tracing::trace!("wrote {}", target.display());
        self.written.push(target);

        Ok(())
    }
}

///
/// MemorySink
///
/// Keeps artifacts in memory; used by `check` and tests.
///

#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    files: BTreeMap<PathBuf, Vec<u8>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files
            .get(path.as_ref())
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    }

    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.files.keys().map(PathBuf::as_path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl ArtifactSink for MemorySink {
    fn write(&mut self, path: &Path, contents: &[u8]) -> Result<(), Error> {
        self.files.insert(path.to_path_buf(), contents.to_vec());

        Ok(())
    }
}

///
/// SchemaWriter
///
/// Serializes one declaration's records as compact JSON.
///

pub struct SchemaWriter<'a> {
    options: &'a Options,
}

impl<'a> SchemaWriter<'a> {
    #[must_use]
    pub const fn new(options: &'a Options) -> Self {
        Self { options }
    }

    /// `<base>/integration/consumer/<kind>/<Name>/`
    #[must_use]
    pub fn dir(&self, kind: Kind, name: &str) -> PathBuf {
        consumer_dir(self.options).join(kind.dir_name()).join(name)
    }

    /// Write every artifact for `meta` and return their paths.
    pub fn write(
        &self,
        name: &str,
        meta: &Metadata,
        sink: &mut impl ArtifactSink,
    ) -> Result<Vec<PathBuf>, Error> {
        let dir = self.dir(meta.integration.kind, name);
        let mut paths = Vec::new();

        let mut emit = |file: &str, bytes: Vec<u8>| -> Result<(), Error> {
            let path = dir.join(file);
            sink.write(&path, &bytes)?;
            paths.push(path);

            Ok(())
        };

        emit("integration.json", to_json(&meta.integration)?)?;
        emit("properties.json", to_json(&meta.properties)?)?;
        emit("data.json", to_json(&meta.data)?)?;
        emit("events.json", to_json(&meta.events)?)?;
        if meta.integration.kind == Kind::Block {
            emit("slots.json", to_json(&meta.slots)?)?;
        }

        Ok(paths)
    }
}

/// `<base>/integration/consumer`
#[must_use]
pub fn consumer_dir(options: &Options) -> PathBuf {
    options.base_path().join(CONSUMER_DIR)
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, Error> {
    Ok(serde_json::to_vec(value)?)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::introspect::{SourceTree, SymbolSource};

    fn options() -> Options {
        Options::new("io.nativeblocks.sampleapp", "Demo").unwrap()
    }

    fn metadata(text: &str) -> Metadata {
        let declarations = SourceTree::from_text(text).declarations().unwrap();

        Metadata::build(&declarations[0], &options()).unwrap()
    }

    #[test]
    fn block_artifacts_include_slots() {
        let meta = metadata(
            r#"
            #[block(key_type = "BUTTON", name = "Button", description = "")]
            pub fn button(#[data] text: String) {}
            "#,
        );
        let options = options();
        let mut sink = MemorySink::new();

        let paths = SchemaWriter::new(&options)
            .write("Button", &meta, &mut sink)
            .unwrap();

        let dir = PathBuf::from("io/nativeblocks/sampleapp/integration/consumer/block/Button");
        assert_eq!(paths.len(), 5);
        assert_eq!(paths[0], dir.join("integration.json"));
        assert_eq!(sink.get(dir.join("slots.json")), Some("[]"));
        assert_eq!(
            sink.get(dir.join("data.json")),
            Some(
                r#"[{"key":"text","type":"STRING","description":"","deprecated":false,"deprecatedReason":"","value":""}]"#
            )
        );
    }

    #[test]
    fn action_artifacts_have_no_slots() {
        let meta = metadata(
            r#"
            #[action(key_type = "BOT", name = "Bot", description = "")]
            pub struct Bot;
            "#,
        );
        let options = options();
        let mut sink = MemorySink::new();

        SchemaWriter::new(&options)
            .write("Bot", &meta, &mut sink)
            .unwrap();

        assert_eq!(sink.len(), 4);
        assert!(sink.paths().all(|p| !p.ends_with("slots.json")));
        assert!(sink.paths().all(|p| p.starts_with(
            "io/nativeblocks/sampleapp/integration/consumer/action/Bot"
        )));
    }

    #[test]
    fn fs_sink_creates_directories() {
        let root = tempfile::tempdir().unwrap();
        let mut sink = FsSink::new(root.path());

        sink.write(Path::new("a/b/c.json"), b"[]").unwrap();

        let written = root.path().join("a/b/c.json");
        assert_eq!(std::fs::read_to_string(&written).unwrap(), "[]");
        assert_eq!(sink.written(), [written]);
    }
}
