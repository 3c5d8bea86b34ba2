use crate::prelude::*;
use derive_more::Display;
use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use std::str::FromStr;
use thiserror::Error as ThisError;

///
/// ParseEnumError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[error("unknown {kind} '{value}'")]
pub struct ParseEnumError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

// Upper-snake constants and hyphenated tokens compare equal after this.
fn normalize(s: &str) -> String {
    s.trim().to_ascii_lowercase().replace('_', "-")
}

///
/// Kind
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Kind {
    #[display("BLOCK")]
    Block,

    #[display("ACTION")]
    Action,
}

impl Kind {
    /// Directory segment used for artifacts of this kind.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::Action => "action",
        }
    }

    /// Suffix appended to a declaration name to form its adapter type.
    #[must_use]
    pub const fn adapter_suffix(self) -> &'static str {
        match self {
            Self::Block => "Block",
            Self::Action => "Action",
        }
    }

    /// Type name of the opaque runtime state passed to adapters of this kind.
    #[must_use]
    pub const fn context_type(self) -> &'static str {
        match self {
            Self::Block => "BlockProps",
            Self::Action => "ActionProps",
        }
    }
}

///
/// ValueType
///
/// The closed set of primitive types a property or data field may declare.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    #[display("STRING")]
    String,

    #[display("INT")]
    Int,

    #[display("LONG")]
    Long,

    #[display("FLOAT")]
    Float,

    #[display("DOUBLE")]
    Double,

    #[display("BOOLEAN")]
    Boolean,
}

impl ValueType {
    /// Map a Rust type name (last path segment) to its primitive.
    #[must_use]
    pub fn from_rust_type(name: &str) -> Option<Self> {
        match name {
            "String" => Some(Self::String),
            "i32" => Some(Self::Int),
            "i64" => Some(Self::Long),
            "f32" => Some(Self::Float),
            "f64" => Some(Self::Double),
            "bool" => Some(Self::Boolean),
            _ => None,
        }
    }

    /// The Rust type generated code uses for this primitive.
    #[must_use]
    pub fn as_type(self) -> TokenStream {
        match self {
            Self::String => quote!(::std::string::String),
            Self::Int => quote!(i32),
            Self::Long => quote!(i64),
            Self::Float => quote!(f32),
            Self::Double => quote!(f64),
            Self::Boolean => quote!(bool),
        }
    }
}

impl ToTokens for ValueType {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.extend(self.as_type());
    }
}

///
/// ValuePicker
///
/// Editor input used for a property. Serialized as a lowercase hyphenated
/// token.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValuePicker {
    #[default]
    #[display("text-input")]
    TextInput,

    #[display("text-area-input")]
    TextAreaInput,

    #[display("number-input")]
    NumberInput,

    #[display("dropdown")]
    Dropdown,

    #[display("color-picker")]
    ColorPicker,

    #[display("combobox-input")]
    ComboboxInput,
}

impl ValuePicker {
    pub const ALL: [Self; 6] = [
        Self::TextInput,
        Self::TextAreaInput,
        Self::NumberInput,
        Self::Dropdown,
        Self::ColorPicker,
        Self::ComboboxInput,
    ];
}

impl FromStr for ValuePicker {
    type Err = ParseEnumError;

    // Accepts both `TEXT_INPUT` and `text-input`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);

        Self::ALL
            .into_iter()
            .find(|picker| picker.to_string() == wanted)
            .ok_or_else(|| ParseEnumError::new("value picker", s))
    }
}

///
/// Then
///
/// Control-flow outcome attached to an action event.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Then {
    #[display("SUCCESS")]
    Success,

    #[display("FAILURE")]
    Failure,

    #[display("NEXT")]
    Next,

    #[default]
    #[display("END")]
    End,
}

impl Then {
    pub const ALL: [Self; 4] = [Self::Success, Self::Failure, Self::Next, Self::End];

    /// SUCCESS and FAILURE report an outcome.
    #[must_use]
    pub const fn is_outcome(self) -> bool {
        matches!(self, Self::Success | Self::Failure)
    }

    /// NEXT and END continue or stop the trigger chain.
    #[must_use]
    pub const fn is_flow(self) -> bool {
        matches!(self, Self::Next | Self::End)
    }
}

impl FromStr for Then {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|then| then.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseEnumError::new("then", s))
    }
}

impl FromMeta for Then {
    fn from_string(s: &str) -> Result<Self, darling::Error> {
        s.parse::<Self>()
            .map_err(|_| darling::Error::unknown_value(s))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_types_map_from_rust_names() {
        assert_eq!(ValueType::from_rust_type("String"), Some(ValueType::String));
        assert_eq!(ValueType::from_rust_type("i64"), Some(ValueType::Long));
        assert_eq!(ValueType::from_rust_type("bool"), Some(ValueType::Boolean));
        assert_eq!(ValueType::from_rust_type("u8"), None);
        assert_eq!(ValueType::from_rust_type("Dp"), None);
    }

    #[test]
    fn pickers_accept_constants_and_tokens() {
        assert_eq!(
            "TEXT_AREA_INPUT".parse::<ValuePicker>(),
            Ok(ValuePicker::TextAreaInput)
        );
        assert_eq!(
            "combobox-input".parse::<ValuePicker>(),
            Ok(ValuePicker::ComboboxInput)
        );
        assert_eq!("Dropdown".parse::<ValuePicker>(), Ok(ValuePicker::Dropdown));
        assert!("SCRIPT_AREA_INPUT".parse::<ValuePicker>().is_err());
    }

    #[test]
    fn pickers_serialize_as_hyphenated_tokens() {
        let json = serde_json::to_string(&ValuePicker::ColorPicker).unwrap();
        assert_eq!(json, "\"color-picker\"");
        assert_eq!(ValuePicker::NumberInput.to_string(), "number-input");
    }

    #[test]
    fn then_groups_are_disjoint() {
        for then in Then::ALL {
            assert_ne!(then.is_outcome(), then.is_flow(), "{then} in both groups");
        }
        assert_eq!("next".parse::<Then>(), Ok(Then::Next));
    }

    #[test]
    fn kind_serializes_upper_case() {
        assert_eq!(serde_json::to_string(&Kind::Action).unwrap(), "\"ACTION\"");
        assert_eq!(Kind::Block.adapter_suffix(), "Block");
    }
}
