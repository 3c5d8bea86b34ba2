use super::{Adapter, Synthesizer, shared::item_path};
use crate::Error;
use blockgen_schema::types::Kind;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// Registration entry point for every adapter of one kind.
pub fn generate(
    synth: &Synthesizer<'_>,
    kind: Kind,
    adapters: &[Adapter],
) -> Result<TokenStream, Error> {
    let registry = synth.paths.registry();
    let name = format_ident!(
        "{}{}Provider",
        synth.options.module_pascal(),
        kind.adapter_suffix()
    );

    let mut registrations = Vec::with_capacity(adapters.len());
    let mut instances = Vec::new();

    for adapter in adapters.iter().filter(|a| a.kind == kind) {
        let key_type = &adapter.key_type;
        let ty = format_ident!("{}", adapter.type_name);

        registrations.push(match &adapter.instance {
            None => quote! {
                registry.provide_block(#key_type, ::std::boxed::Box::new(#ty));
            },
            Some(instance) => {
                let field = format_ident!("{}", instance.field);
                let path = item_path(&instance.item_path)?;
                instances.push(quote!(#field: ::std::sync::Arc<#path>));

                quote! {
                    registry.provide_action(#key_type, ::std::boxed::Box::new(#ty::new(#field)));
                }
            }
        });
    }

    let function = match kind {
        Kind::Block => format_ident!("provide_blocks"),
        Kind::Action => format_ident!("provide_actions"),
    };

    Ok(quote! {
        pub struct #name;

        impl #name {
            pub const DEFAULT_INSTANCE: &'static str = "default";

            pub fn #function(instance_name: ::std::option::Option<&str>, #(#instances),*) {
                let registry = #registry::instance(instance_name.unwrap_or(Self::DEFAULT_INSTANCE));

                #(#registrations)*
            }
        }
    })
}
