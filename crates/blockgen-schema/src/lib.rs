//! Schema model shared by the blockgen pipeline.
//!
//! Holds the closed annotation vocabulary (`args`), the serializable
//! integration records (`node`), the primitive value model and the
//! diagnostics catalog every later stage reports through.

pub mod args;
pub mod diagnostic;
pub mod node;
pub mod types;
pub mod value;

/// Default label for a property's value-picker group.
pub const DEFAULT_PICKER_GROUP: &str = "General";

/// Publishing platform recorded on every integration unless configured.
pub const DEFAULT_PLATFORM_SUPPORT: &str = "ANDROID";

/// Type name that marks a slot callback argument as a child index.
pub const BLOCK_INDEX_TYPE: &str = "BlockIndex";

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        diagnostic::Diagnostic,
        node::*,
        types::{Kind, Then, ValuePicker, ValueType},
        value::PrimitiveValue,
    };
    pub use darling::FromMeta;
    pub use serde::{Deserialize, Serialize};
}
