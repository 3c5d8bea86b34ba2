use super::{
    CodeBlock, Synthesizer,
    shared::{
        callback_params, callback_return, context_arg, convert_value, data_updates, item_path,
        local, parse_value, with_annotation, wrap_callable,
    },
};
use crate::{
    Error,
    introspect::{Declaration, FieldAnnotation, Param, TypeTag},
    meta::Metadata,
};
use blockgen_schema::value::PrimitiveValue;
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};

/// Adapter type and `NativeBlock` impl for one block function.
pub fn generate(
    synth: &Synthesizer<'_>,
    declaration: &Declaration,
    meta: &Metadata,
    name: &Ident,
) -> Result<TokenStream, Error> {
    let block = synth.paths.block();
    let util = synth.paths.util();
    let props = format_ident!("block_props");
    let function = item_path(&declaration.item_path())?;

    let mut body = CodeBlock::new();
    let mut args = Vec::with_capacity(declaration.params.len());

    // data
    for param in with_annotation(declaration, |a| matches!(a, FieldAnnotation::Data(_))) {
        let Some(data) = meta.data(&param.name) else { continue };
        let key = &param.name;
        let cell = local(key, "cell");
        let value = local(key, "value");
        let ty = data.ty.as_type();
        let default = data.default.clone().unwrap_or(PrimitiveValue::zero(data.ty));
        let parsed = parse_value(
            &quote!(#util::block_handle_variable_value(#props, #cell.as_ref())),
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
        let source = quote!(#util::find_window_size_class(#props, properties, #key));

        // converter props are typed by the call site
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

    // slots
    for param in with_annotation(declaration, |a| matches!(a, FieldAnnotation::Slot(_))) {
        let slot = local(&param.name, "slot");
        let callback = local(&param.name, "callback");
        let key = &param.name;

        body.push(quote! {
            let #slot = #util::block_provide_slot(#props, slots, #key);
            let #callback = {
                let props = #props.clone();
                let slot = #slot.clone();
                move |index: #block::BlockIndex| {
                    if let ::std::option::Option::Some(slot) = &slot {
                        props.on_sub_block(props.sub_blocks(), slot, index);
                    }
                }
            };
        });
    }

    // events
    for param in with_annotation(declaration, |a| matches!(a, FieldAnnotation::Event(_))) {
        let Some(event) = meta.event(&param.name) else { continue };
        let Some(callable) = param.ty.as_callable() else { continue };
        let provided = local(&param.name, "event");
        let callback = local(&param.name, "callback");
        let key = &param.name;

        let bound = event.data_binding.len().min(callable.inputs.len());
        let (names, types) = callback_params(&synth.paths, callable, bound)?;
        let cells: Vec<_> = event.data_binding[..bound]
            .iter()
            .map(|key| local(key, "cell"))
            .collect();
        let updates = data_updates(&event.data_binding[..bound], &names);
        let returns = callback_return(callable);

        body.push(quote! {
            let #provided = #util::block_provide_event(#props, action, #key);
            let #callback = {
                let props = #props.clone();
                let event = #provided.clone();
                #( let #cells = #cells.clone(); )*
                move |#(#names: #types),*| {
                    #updates
                    if let ::std::option::Option::Some(event) = &event {
                        event.invoke();
                    }
                    #returns
                }
            };
        });
    }

    // call in declared order
    for param in &declaration.params {
        args.push(argument(param, &props)?);
    }

    Ok(quote! {
        pub struct #name;

        impl #block::NativeBlock for #name {
            #[allow(unused_variables, clippy::all)]
            fn render(&self, #props: &#block::BlockProps) {
                if !#util::block_is_visible(#props) {
                    return;
                }

                let data = #props.data();
                let properties = #props.properties();
                let slots = #props.slots();
                let action = #props.action();

                #body

                #function(#(#args),*);
            }
        }
    })
}

fn argument(param: &Param, props: &Ident) -> Result<TokenStream, Error> {
    let tokens = match (param.annotation(), &param.ty) {
        (None, TypeTag::Context(context)) => context_arg(context, props),
        (Some(FieldAnnotation::Data(_) | FieldAnnotation::Prop(_)), _) => {
            let value = local(&param.name, "value");
            quote!(#value)
        }
        (Some(FieldAnnotation::Slot(_)), TypeTag::Callable(callable)) => {
            let slot = local(&param.name, "slot");
            wrap_callable(
                callable,
                &local(&param.name, "callback"),
                Some(quote!(#slot.is_some())),
            )
        }
        (Some(FieldAnnotation::Event(_)), TypeTag::Callable(callable)) => {
            let provided = local(&param.name, "event");
            wrap_callable(
                callable,
                &local(&param.name, "callback"),
                Some(quote!(#provided.is_some())),
            )
        }
        _ => {
            return Err(Error::synthesis(
                format!("argument '{}'", param.name),
                "parameter was not validated",
            ));
        }
    };

    Ok(tokens)
}
