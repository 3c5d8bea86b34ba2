use super::{
    ActionInstance, CodeBlock, Synthesizer,
    shared::{
        callback_params, callback_return, context_arg, convert_value, data_updates, field_ident,
        item_path, local, parse_value, with_annotation, wrap_callable,
    },
};
use crate::{
    Error,
    introspect::{Declaration, FieldAnnotation, Param, TypeTag},
    meta::Metadata,
};
use blockgen_schema::{types::Then, value::PrimitiveValue};
use convert_case::{Case, Casing};
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

/// Adapter type and `NativeAction` impl for one action.
pub fn generate(
    synth: &Synthesizer<'_>,
    declaration: &Declaration,
    meta: &Metadata,
    name: &Ident,
) -> Result<(TokenStream, ActionInstance), Error> {
    let missing = |what: &str| Error::synthesis(&declaration.ident, format!("no single {what}"));
    let handler = declaration.handler().ok_or_else(|| missing("action_function"))?;
    let holder = declaration.holder().ok_or_else(|| missing("action_parameter"))?;

    let action = synth.paths.action();
    let util = synth.paths.util();
    let props = format_ident!("action_props");
    let action_type = item_path(&declaration.item_path())?;
    let holder_type = item_path(&holder.item_path())?;
    let field = format_ident!("{}", declaration.ident.to_case(Case::Snake));
    let method = field_ident(&handler.ident)?;

    let mut body = CodeBlock::new();

    // data
    for param in with_annotation(declaration, |a| matches!(a, FieldAnnotation::Data(_))) {
        let Some(data) = meta.data(&param.name) else { continue };
        let key = &param.name;
        let cell = local(key, "cell");
        let value = local(key, "value");
        let ty = data.ty.as_type();
        let default = data.default.clone().unwrap_or(PrimitiveValue::zero(data.ty));
        let parsed = parse_value(
            &quote!(#util::action_handle_variable_value(#props, #cell.as_ref())),
            &default,
        );

        body.push(quote! {
            let #cell = #props.variable(data, #key);
            let #value: #ty = #parsed;
        });
    }

    // properties
    for param in with_annotation(declaration, |a| matches!(a, FieldAnnotation::Prop(_))) {
        let Some(property) = meta.property(&param.name) else { continue };
        let key = &param.name;
        let value = local(key, "value");
        let source = quote!(#util::action_trigger_property(#props, properties, #key));

        let expr = if property.converter.is_some() {
            convert_value(&synth.paths, &source, &property.value)
        } else {
            let ty = property.ty.as_type();
            let default = property.default.clone().unwrap_or(PrimitiveValue::zero(property.ty));
            let parsed = parse_value(&source, &default);
            quote!({ let parsed: #ty = #parsed; parsed })
        };

        body.push(quote! {
            let #value = #expr;
        });
    }

    // events
    for param in with_annotation(declaration, |a| matches!(a, FieldAnnotation::Event(_))) {
        let Some(event) = meta.event(&param.name) else { continue };
        let Some(callable) = param.ty.as_callable() else { continue };
        let callback = local(&param.name, "callback");

        let bound = event.data_binding.len().min(callable.inputs.len());
        let (names, types) = callback_params(&synth.paths, callable, bound)?;
        let cells: Vec<_> = event.data_binding[..bound]
            .iter()
            .map(|key| local(key, "cell"))
            .collect();
        let updates = data_updates(&event.data_binding[..bound], &names);
        let advance = advance(event.then);
        let returns = callback_return(callable);

        body.push(quote! {
            let #callback = {
                let props = #props.clone();
                #( let #cells = #cells.clone(); )*
                move |#(#names: #types),*| {
                    #updates
                    #advance
                    #returns
                }
            };
        });
    }

    // parameter holder
    let mut fields = Vec::with_capacity(declaration.params.len());
    for param in &declaration.params {
        let ident = field_ident(&param.name)?;
        let value = argument(param, &props)?;
        fields.push(quote!(#ident: #value));
    }
    body.push(quote! {
        let parameters = #holder_type { #(#fields),* };
    });

    body.push(match (handler.is_async, handler.has_receiver) {
        (true, true) => quote! {
            let handler = ::std::sync::Arc::clone(&self.#field);
            #props.launch(async move {
                handler.#method(parameters).await;
            });
        },
        (true, false) => quote! {
            #props.launch(async move {
                #action_type::#method(parameters).await;
            });
        },
        (false, true) => quote! {
            self.#field.#method(parameters);
        },
        (false, false) => quote! {
            #action_type::#method(parameters);
        },
    });

    let tokens = quote! {
        pub struct #name {
            #field: ::std::sync::Arc<#action_type>,
        }

        impl #name {
            #[must_use]
            pub fn new(#field: ::std::sync::Arc<#action_type>) -> Self {
                Self { #field }
            }
        }

        impl #action::NativeAction for #name {
            #[allow(unused_variables, clippy::all)]
            fn invoke(&self, #props: &#action::ActionProps) {
                let data = #props.trigger_data();
                let properties = #props.trigger_properties();

                #body
            }
        }
    };

    let instance = ActionInstance {
        field: declaration.ident.to_case(Case::Snake),
        item_path: declaration.item_path(),
    };

    Ok((tokens, instance))
}

// Continue the trigger chain the way the event declares.
fn advance(then: Then) -> TokenStream {
    let call = match then {
        Then::Success => quote!(on_success),
        Then::Failure => quote!(on_failure),
        Then::Next => quote!(on_next),
        Then::End => return TokenStream::new(),
    };

    quote! {
        if let ::std::option::Option::Some(trigger) = props.trigger() {
            props.#call(trigger);
        }
    }
}

fn argument(param: &Param, props: &Ident) -> Result<TokenStream, Error> {
    let tokens = match (param.annotation(), &param.ty) {
        (None, TypeTag::Context(context)) => context_arg(context, props),
        (Some(FieldAnnotation::Data(_) | FieldAnnotation::Prop(_)), _) => {
            let value = local(&param.name, "value");
            quote!(#value)
        }
        (Some(FieldAnnotation::Event(_)), TypeTag::Callable(callable)) => {
            wrap_callable(callable, &local(&param.name, "callback"), None)
        }
        _ => {
            return Err(Error::synthesis(
                format!("field '{}'", param.name),
                "parameter was not validated",
            ));
        }
    };

    Ok(tokens)
}
