use crate::{
    Error,
    introspect::{
        Callable, CallableShape, Context, Declaration, FieldAnnotation, Param, last_segment,
    },
    paths::RuntimePaths,
};
use blockgen_schema::{BLOCK_INDEX_TYPE, prelude::*};
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use syn::{Path, Type};

/// A local derived from a field name, e.g. `text` + `cell` = `text_cell`.
pub fn local(name: &str, suffix: &str) -> Ident {
    format_ident!("{}_{}", name.trim_start_matches("r#"), suffix)
}

/// Parameters carrying one annotation that matches `filter`.
pub fn with_annotation(
    declaration: &Declaration,
    filter: impl Fn(&FieldAnnotation) -> bool,
) -> impl Iterator<Item = &Param> {
    declaration
        .params
        .iter()
        .filter(move |param| param.annotation().is_some_and(&filter))
}

/// Parse a field name as written (raw identifiers included).
pub fn field_ident(name: &str) -> Result<Ident, Error> {
    syn::parse_str(name).map_err(|err| Error::synthesis(format!("field '{name}'"), err))
}

/// `crate::`-rooted path to a declared item.
pub fn item_path(segments: &[String]) -> Result<Path, Error> {
    let text = std::iter::once("crate")
        .chain(segments.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join("::");

    syn::parse_str(&text).map_err(|err| Error::synthesis(format!("path '{text}'"), err))
}

/// Parse an `Option<String>` source into the declared type, falling back to
/// the baked default.
pub fn parse_value(source: &TokenStream, default: &PrimitiveValue) -> TokenStream {
    match default.value_type() {
        ValueType::String => quote! {
            #source.unwrap_or_else(|| #default)
        },
        ValueType::Boolean => quote! {
            #source
                .and_then(|value| value.to_lowercase().parse::<bool>().ok())
                .unwrap_or(#default)
        },
        numeric => {
            let ty = numeric.as_type();
            quote! {
                #source
                    .and_then(|value| value.trim().parse::<#ty>().ok())
                    .unwrap_or(#default)
            }
        }
    }
}

/// Decode a custom property type through the runtime converter registry.
pub fn convert_value(paths: &RuntimePaths, source: &TokenStream, raw_default: &str) -> TokenStream {
    let util = paths.util();

    quote! {
        #util::convert_from_string(&#source.unwrap_or_else(|| ::std::string::String::from(#raw_default)))
    }
}

/// Type annotation for a callback argument. Primitives and `BlockIndex`
/// resolve to absolute paths; anything else is used as written.
pub fn input_type(paths: &RuntimePaths, input: &str) -> Result<TokenStream, Error> {
    let name = last_segment(input);

    if let Some(ty) = ValueType::from_rust_type(name) {
        return Ok(ty.as_type());
    }
    if name == BLOCK_INDEX_TYPE {
        let block = paths.block();
        return Ok(quote!(#block::BlockIndex));
    }

    let ty: Type = syn::parse_str(input)
        .map_err(|err| Error::synthesis(format!("callback argument '{input}'"), err))?;

    Ok(quote!(#ty))
}

/// Wrap a bound callback the way the parameter declares it. Nullable
/// parameters become `None` unless `present` holds.
pub fn wrap_callable(
    callable: &Callable,
    callback: &Ident,
    present: Option<TokenStream>,
) -> TokenStream {
    let wrapped = match &callable.shape {
        CallableShape::Pointer(pointer) => match pointer.as_str() {
            "Arc" => quote!(::std::sync::Arc::new(#callback)),
            "Rc" => quote!(::std::rc::Rc::new(#callback)),
            _ => quote!(::std::boxed::Box::new(#callback)),
        },
        CallableShape::Generic => quote!(#callback),
        CallableShape::Borrowed => quote!(&#callback),
    };

    if !callable.nullable {
        return wrapped;
    }

    match present {
        Some(present) => quote! {
            if #present { ::std::option::Option::Some(#wrapped) } else { ::std::option::Option::None }
        },
        None => quote!(::std::option::Option::Some(#wrapped)),
    }
}

/// Pass the runtime state through to a context parameter.
pub fn context_arg(context: &Context, props: &Ident) -> TokenStream {
    let value = if context.by_ref {
        quote!(#props)
    } else {
        quote!(#props.clone())
    };

    if context.nullable {
        quote!(::std::option::Option::Some(#value))
    } else {
        value
    }
}

/// Callback parameters `p0..pN`; unbound ones are underscored.
pub fn callback_params(
    paths: &RuntimePaths,
    callable: &Callable,
    bound: usize,
) -> Result<(Vec<Ident>, Vec<TokenStream>), Error> {
    let mut names = Vec::with_capacity(callable.inputs.len());
    let mut types = Vec::with_capacity(callable.inputs.len());

    for (i, input) in callable.inputs.iter().enumerate() {
        names.push(if i < bound {
            format_ident!("p{}", i)
        } else {
            format_ident!("_p{}", i)
        });
        types.push(input_type(paths, input)?);
    }

    Ok((names, types))
}

/// Trailing expression for callbacks declared with a return type.
pub fn callback_return(callable: &Callable) -> TokenStream {
    if callable.output.is_some() {
        quote!(::std::default::Default::default())
    } else {
        TokenStream::new()
    }
}

/// Write bound callback arguments back into their data variables.
pub fn data_updates(bindings: &[String], params: &[Ident]) -> TokenStream {
    let updates = bindings.iter().zip(params).map(|(key, param)| {
        let cell = local(key, "cell");
        quote! {
            if let ::std::option::Option::Some(mut updated) = #cell.clone() {
                updated.value = #param.to_string();
                props.on_variable_change(updated);
            }
        }
    });

    quote!(#(#updates)*)
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::tests::squash;

    fn callable(shape: CallableShape, nullable: bool) -> Callable {
        Callable {
            shape,
            inputs: vec!["String".to_string()],
            output: None,
            nullable,
        }
    }

    #[test]
    fn string_values_fall_back_to_default() {
        let tokens = parse_value(&quote!(raw), &PrimitiveValue::String("S".to_string()));

        assert_eq!(
            squash(&tokens.to_string()),
            squash(&quote!(raw.unwrap_or_else(|| ::std::string::String::from("S"))).to_string())
        );
    }

    #[test]
    fn numbers_parse_with_literal_fallback() {
        let tokens = parse_value(&quote!(raw), &PrimitiveValue::Int(-3));

        assert!(squash(&tokens.to_string()).contains(&squash("parse :: < i32 >")));
        let fallback = squash(&quote!(.unwrap_or(-3)).to_string());
        assert!(squash(&tokens.to_string()).ends_with(&fallback));
    }

    #[test]
    fn nullable_callables_depend_on_presence() {
        let callback = format_ident!("cb");
        let tokens = wrap_callable(
            &callable(CallableShape::Pointer("Box".to_string()), true),
            &callback,
            Some(quote!(slot.is_some())),
        );

        assert_eq!(
            squash(&tokens.to_string()),
            squash(
                &quote!(if slot.is_some() {
                    ::std::option::Option::Some(::std::boxed::Box::new(cb))
                } else {
                    ::std::option::Option::None
                })
                .to_string()
            )
        );
    }

    #[test]
    fn borrowed_and_generic_callables_pass_the_callback() {
        let callback = format_ident!("cb");

        assert_eq!(
            wrap_callable(&callable(CallableShape::Borrowed, false), &callback, None).to_string(),
            quote!(&cb).to_string()
        );
        assert_eq!(
            wrap_callable(&callable(CallableShape::Generic, false), &callback, None).to_string(),
            quote!(cb).to_string()
        );
    }

    #[test]
    fn block_index_resolves_to_the_runtime() {
        let paths = RuntimePaths::new("nativeblocks_core").unwrap();

        assert_eq!(
            input_type(&paths, "crate :: BlockIndex").unwrap().to_string(),
            quote!(::nativeblocks_core::block::BlockIndex).to_string()
        );
        assert_eq!(
            input_type(&paths, "std :: string :: String").unwrap().to_string(),
            quote!(::std::string::String).to_string()
        );
    }

    #[test]
    fn item_paths_are_crate_rooted() {
        let path = item_path(&["ui".to_string(), "button".to_string()]).unwrap();

        assert_eq!(quote!(#path).to_string(), quote!(crate::ui::button).to_string());
    }

    #[test]
    fn raw_names_get_plain_locals() {
        assert_eq!(local("r#type", "value").to_string(), "type_value");
    }
}
