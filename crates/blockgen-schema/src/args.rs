use crate::{DEFAULT_PICKER_GROUP, node::PickerOption, types::Then};
use darling::{FromMeta, ast::NestedMeta};
use derive_more::{Deref, IntoIterator};
use syn::Lit;

///
/// IntegrationArgs
///
/// Arguments of `#[block(..)]` and `#[action(..)]`.
///

#[derive(Clone, Debug, FromMeta)]
pub struct IntegrationArgs {
    pub key_type: String,
    pub name: String,
    pub description: String,

    #[darling(default = default_version)]
    pub version: u32,

    #[darling(default)]
    pub deprecated: bool,

    #[darling(default)]
    pub deprecated_reason: String,
}

const fn default_version() -> u32 {
    1
}

///
/// PropArgs
///

#[derive(Clone, Debug, Default, FromMeta)]
pub struct PropArgs {
    #[darling(default)]
    pub description: String,

    /// Raw picker name, resolved by the metadata builder.
    #[darling(default)]
    pub value_picker: Option<String>,

    #[darling(default)]
    pub value_picker_group: PickerGroup,

    #[darling(default)]
    pub value_picker_options: PickerOptions,

    #[darling(default)]
    pub deprecated: bool,

    #[darling(default)]
    pub deprecated_reason: String,

    #[darling(default)]
    pub default_value: Option<String>,

    /// Decode through the runtime converter instead of a primitive parse.
    #[darling(default)]
    pub converter: bool,
}

///
/// PickerGroup
///

#[derive(Clone, Debug, FromMeta)]
pub struct PickerGroup {
    pub text: String,
}

impl Default for PickerGroup {
    fn default() -> Self {
        Self {
            text: DEFAULT_PICKER_GROUP.to_string(),
        }
    }
}

///
/// PickerOptions
///

#[derive(Clone, Debug, Default, Deref, FromMeta, IntoIterator)]
pub struct PickerOptions {
    #[darling(multiple, rename = "option")]
    #[into_iterator(owned, ref)]
    pub options: Vec<PickerOption>,
}

///
/// DataArgs
///

#[derive(Clone, Debug, Default, FromMeta)]
pub struct DataArgs {
    #[darling(default)]
    pub description: String,

    #[darling(default)]
    pub deprecated: bool,

    #[darling(default)]
    pub deprecated_reason: String,

    #[darling(default)]
    pub default_value: Option<String>,
}

///
/// EventArgs
///

#[derive(Clone, Debug, Default, FromMeta)]
pub struct EventArgs {
    /// Only meaningful on actions; block events always continue.
    #[darling(default)]
    pub then: Then,

    #[darling(default)]
    pub description: String,

    #[darling(default)]
    pub data_binding: DataBinding,

    #[darling(default)]
    pub deprecated: bool,

    #[darling(default)]
    pub deprecated_reason: String,
}

///
/// DataBinding
///
/// Ordered data keys an event writes back to. Accepts `"a, b"` or
/// `("a", "b")`.
///

#[derive(Clone, Debug, Default, Deref, Eq, IntoIterator, PartialEq)]
pub struct DataBinding(#[into_iterator(owned, ref)] pub Vec<String>);

impl FromMeta for DataBinding {
    fn from_string(s: &str) -> Result<Self, darling::Error> {
        Ok(Self(split_keys(s)))
    }

    fn from_list(items: &[NestedMeta]) -> Result<Self, darling::Error> {
        let mut keys = Vec::with_capacity(items.len());
        let mut errors = darling::Error::accumulator();

        for item in items {
            match item {
                NestedMeta::Lit(Lit::Str(lit)) => keys.extend(split_keys(&lit.value())),
                other => {
                    errors.push(darling::Error::unexpected_type("non-string").with_span(other));
                }
            }
        }

        errors.finish_with(Self(keys))
    }
}

/// Split a comma-separated key list, dropping blanks.
#[must_use]
pub fn split_keys(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect()
}

///
/// SlotArgs
///

#[derive(Clone, Debug, Default, FromMeta)]
pub struct SlotArgs {
    #[darling(default)]
    pub description: String,

    #[darling(default)]
    pub deprecated: bool,

    #[darling(default)]
    pub deprecated_reason: String,
}

///
/// ActionParameterArgs
///
/// Links a parameter-holder struct to its action.
///

#[derive(Clone, Debug, FromMeta)]
pub struct ActionParameterArgs {
    pub action: String,
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn parse<T: FromMeta>(meta: syn::Meta) -> darling::Result<T> {
        T::from_meta(&meta)
    }

    #[test]
    fn integration_defaults_version_and_deprecation() {
        let args: IntegrationArgs = parse(parse_quote!(block(
            key_type = "BUTTON",
            name = "Button",
            description = "A button"
        )))
        .unwrap();

        assert_eq!(args.key_type, "BUTTON");
        assert_eq!(args.version, 1);
        assert!(!args.deprecated);
        assert_eq!(args.deprecated_reason, "");
    }

    #[test]
    fn integration_requires_key_type() {
        let result: darling::Result<IntegrationArgs> =
            parse(parse_quote!(block(name = "Button", description = "")));

        assert!(result.is_err());
    }

    #[test]
    fn prop_flattens_nested_picker_arguments() {
        let args: PropArgs = parse(parse_quote!(prop(
            value_picker = "DROPDOWN",
            value_picker_options(option(id = "S", text = "Small"), option(id = "L", text = "Large")),
            value_picker_group(text = "Layout")
        )))
        .unwrap();

        assert_eq!(args.value_picker.as_deref(), Some("DROPDOWN"));
        assert_eq!(args.value_picker_group.text, "Layout");
        let ids: Vec<_> = args.value_picker_options.iter().map(|o| o.id.as_str()).collect();
        assert_eq!(ids, ["S", "L"]);
    }

    #[test]
    fn prop_group_defaults_to_general() {
        let args: PropArgs = parse(parse_quote!(prop(description = "size"))).unwrap();

        assert_eq!(args.value_picker_group.text, DEFAULT_PICKER_GROUP);
        assert!(args.value_picker_options.is_empty());
        assert!(!args.converter);
    }

    #[test]
    fn data_binding_accepts_string_or_list() {
        let from_str: EventArgs =
            parse(parse_quote!(event(data_binding = "a, b", then = "SUCCESS"))).unwrap();
        let from_list: EventArgs = parse(parse_quote!(event(data_binding("a", "b")))).unwrap();

        assert_eq!(*from_str.data_binding, ["a", "b"]);
        assert_eq!(from_str.data_binding, from_list.data_binding);
        assert_eq!(from_str.then, Then::Success);
        assert_eq!(from_list.then, Then::End);
    }

    #[test]
    fn unknown_then_is_rejected() {
        let result: darling::Result<EventArgs> = parse(parse_quote!(event(then = "LATER")));

        assert!(result.is_err());
    }
}
