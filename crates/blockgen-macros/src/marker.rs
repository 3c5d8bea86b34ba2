use blockgen_schema::{
    args::{DataArgs, EventArgs, PropArgs, SlotArgs},
    types::ValuePicker,
};
use darling::FromMeta;
use syn::{Attribute, Expr, Meta};

///
/// Position
///
/// Where a field marker sits; slots only exist on block parameters.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Position {
    BlockParam,
    HolderField,
}

const FIELD_MARKERS: [&str; 5] = ["data", "default", "event", "prop", "slot"];

/// Check every field marker in `attrs` and remove it. Other attributes are
/// kept in place.
pub fn strip(attrs: &mut Vec<Attribute>, position: Position) -> darling::Result<()> {
    let mut errors = darling::Error::accumulator();

    attrs.retain(|attr| {
        let Some(name) = marker_name(attr) else {
            return true;
        };
        errors.handle(check(attr, &name, position));

        false
    });

    errors.finish()
}

fn marker_name(attr: &Attribute) -> Option<String> {
    let name = attr.path().segments.last()?.ident.to_string();

    FIELD_MARKERS.contains(&name.as_str()).then_some(name)
}

fn check(attr: &Attribute, name: &str, position: Position) -> darling::Result<()> {
    match name {
        "prop" => {
            let args: PropArgs = parse(attr)?;
            if let Some(picker) = &args.value_picker
                && picker.parse::<ValuePicker>().is_err()
            {
                return Err(darling::Error::unknown_value(picker).with_span(attr));
            }
        }
        "data" => {
            parse::<DataArgs>(attr)?;
        }
        "event" => {
            parse::<EventArgs>(attr)?;
        }
        "slot" if position == Position::BlockParam => {
            parse::<SlotArgs>(attr)?;
        }
        "slot" => {
            return Err(
                darling::Error::custom("#[slot] is only valid on block parameters").with_span(attr),
            );
        }
        _ => {
            attr.parse_args::<Expr>()?;
        }
    }

    Ok(())
}

fn parse<T: FromMeta>(attr: &Attribute) -> darling::Result<T> {
    let parsed = match &attr.meta {
        Meta::Path(_) => T::from_list(&[]),
        meta => T::from_meta(meta),
    };

    parsed.map_err(|err| err.with_span(attr))
}

///
/// TESTS
///
