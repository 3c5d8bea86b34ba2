//! Adapter and provider synthesis.
//!
//! Every declaration becomes one adapter type bridging the runtime's
//! stringly-typed protocol to the author's function; every kind with at
//! least one adapter gets a provider that registers them by keyType.
//! Token streams are checked by parsing them back into a `syn::File`
//! before any text is produced.

mod action;
mod block;
mod provider;
mod shared;

use crate::{
    Error, Options,
    introspect::Declaration,
    meta::Metadata,
    paths::RuntimePaths,
    write::consumer_dir,
};
use blockgen_schema::types::Kind;
use convert_case::{Case, Casing};
use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident};
use std::path::{Path, PathBuf};

/// First line of every generated source file.
pub const GENERATED_HEADER: &str = "// @generated by blockgen. Do not edit.\n";

///
/// CodeBlock
///
/// Ordered token statements, emitted as written.
///

#[derive(Clone, Debug, Default)]
pub struct CodeBlock {
    statements: Vec<TokenStream>,
}

impl CodeBlock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, statement: TokenStream) {
        self.statements.push(statement);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.statements.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

impl Extend<TokenStream> for CodeBlock {
    fn extend<I: IntoIterator<Item = TokenStream>>(&mut self, iter: I) {
        self.statements.extend(iter);
    }
}

impl ToTokens for CodeBlock {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        for statement in &self.statements {
            statement.to_tokens(tokens);
        }
    }
}

///
/// ActionInstance
///
/// The author's action value an action adapter wraps; the provider takes
/// one per action.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActionInstance {
    pub field: String,
    pub item_path: Vec<String>,
}

///
/// Adapter
///

#[derive(Clone, Debug)]
pub struct Adapter {
    pub kind: Kind,
    pub key_type: String,
    pub type_name: String,

    /// Output path relative to the sink root.
    pub path: PathBuf,
    pub code: String,
    pub instance: Option<ActionInstance>,
}

///
/// CodeArtifact
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CodeArtifact {
    pub path: PathBuf,
    pub code: String,
}

///
/// Synthesizer
///

pub struct Synthesizer<'a> {
    options: &'a Options,
    paths: &'a RuntimePaths,
}

impl<'a> Synthesizer<'a> {
    #[must_use]
    pub const fn new(options: &'a Options, paths: &'a RuntimePaths) -> Self {
        Self { options, paths }
    }

    /// Generate the adapter for a validated declaration.
    pub fn adapter(&self, declaration: &Declaration, meta: &Metadata) -> Result<Adapter, Error> {
        let type_name = adapter_name(declaration);
        let name = format_ident!("{}", type_name);

        let (tokens, instance) = match declaration.kind {
            Kind::Block => (block::generate(self, declaration, meta, &name)?, None),
            Kind::Action => {
                let (tokens, instance) = action::generate(self, declaration, meta, &name)?;
                (tokens, Some(instance))
            }
        };

        Ok(Adapter {
            kind: declaration.kind,
            key_type: declaration.args.key_type.clone(),
            code: render(&type_name, tokens)?,
            type_name,
            path: self.adapter_path(declaration),
            instance,
        })
    }

    /// Generate the provider registering every `kind` adapter.
    pub fn provider(&self, kind: Kind, adapters: &[Adapter]) -> Result<CodeArtifact, Error> {
        let tokens = provider::generate(self, kind, adapters)?;
        let path = self.provider_path(kind);

        Ok(CodeArtifact {
            code: render(&path.display().to_string(), tokens)?,
            path,
        })
    }

    /// `<consumer>/<kind>/<snake>_<kind>.rs`
    #[must_use]
    pub fn adapter_path(&self, declaration: &Declaration) -> PathBuf {
        let kind = declaration.kind.dir_name();

        consumer_dir(self.options)
            .join(kind)
            .join(format!("{}_{kind}.rs", declaration.ident.to_case(Case::Snake)))
    }

    /// `<consumer>/provider/<module>_<kind>_provider.rs`
    #[must_use]
    pub fn provider_path(&self, kind: Kind) -> PathBuf {
        consumer_dir(self.options).join("provider").join(format!(
            "{}_{}_provider.rs",
            self.options.module_snake(),
            kind.dir_name()
        ))
    }
}

/// Adapter type name: `button` + BLOCK = `ButtonBlock`.
#[must_use]
pub fn adapter_name(declaration: &Declaration) -> String {
    format!(
        "{}{}",
        declaration.type_name(),
        declaration.kind.adapter_suffix()
    )
}

/// Check the tokens parse as a source file and render them with the
/// generated header.
pub fn render(name: &str, tokens: TokenStream) -> Result<String, Error> {
    let file: syn::File = syn::parse2(tokens).map_err(|err| Error::synthesis(name, err))?;

    Ok(format!("{GENERATED_HEADER}{}\n", file.to_token_stream()))
}

/// `include!` index over generated sources, relative to `OUT_DIR`.
#[must_use]
pub fn index<'p>(paths: impl IntoIterator<Item = &'p Path>) -> String {
    let mut out = String::from(GENERATED_HEADER);

    for path in paths {
        let relative = path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        out.push_str(&format!(
            "include!(concat!(env!(\"OUT_DIR\"), \"/{relative}\"));\n"
        ));
    }

    out
}

///
/// TESTS
///
