//! Declaration discovery.
//!
//! A [`SymbolSource`] yields annotated declarations; the rest of the
//! pipeline only ever sees the plain records in [`types`].

mod source;
pub mod types;

pub use source::{SourceFile, SourceTree};
pub use types::*;

use crate::Error;
use blockgen_schema::types::Kind;

///
/// SymbolSource
///

pub trait SymbolSource {
    /// Every annotated declaration, in discovery order.
    fn declarations(&self) -> Result<Vec<Declaration>, Error>;
}

impl SymbolSource for Vec<Declaration> {
    fn declarations(&self) -> Result<Vec<Declaration>, Error> {
        Ok(self.clone())
    }
}

///
/// Declarations
///
/// Blocks first, then actions; each group keeps discovery order.
///

#[derive(Clone, Debug, Default)]
pub struct Declarations {
    pub blocks: Vec<Declaration>,
    pub actions: Vec<Declaration>,
}

impl Declarations {
    #[must_use]
    pub fn of_kind(&self, kind: Kind) -> &[Declaration] {
        match kind {
            Kind::Block => &self.blocks,
            Kind::Action => &self.actions,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Declaration> {
        self.blocks.iter().chain(&self.actions)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len() + self.actions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read a source and partition it by kind.
pub fn collect(source: &impl SymbolSource) -> Result<Declarations, Error> {
    let (blocks, actions) = source
        .declarations()?
        .into_iter()
        .partition(|d| d.kind == Kind::Block);

    Ok(Declarations { blocks, actions })
}

///
/// TESTS
///
