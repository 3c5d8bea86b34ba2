use crate::marker::{self, Position};
use blockgen_schema::args::{ActionParameterArgs, IntegrationArgs};
use darling::{FromMeta, ast::NestedMeta};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{Fields, FnArg, ImplItemFn, ItemFn, ItemStruct};

pub fn block(args: TokenStream, input: TokenStream) -> TokenStream {
    expand(|| {
        let args = parse_args::<IntegrationArgs>(args);
        let mut item: ItemFn = syn::parse2(input)?;

        let mut errors = darling::Error::accumulator();
        errors.handle(args);
        for input in &mut item.sig.inputs {
            if let FnArg::Typed(typed) = input {
                errors.handle(marker::strip(&mut typed.attrs, Position::BlockParam));
            }
        }
        errors.finish()?;

        Ok(quote!(#item))
    })
}

pub fn action(args: TokenStream, input: TokenStream) -> TokenStream {
    expand(|| {
        parse_args::<IntegrationArgs>(args)?;
        let item: ItemStruct = syn::parse2(input)?;

        Ok(quote!(#item))
    })
}

pub fn action_parameter(args: TokenStream, input: TokenStream) -> TokenStream {
    expand(|| {
        let args = parse_args::<ActionParameterArgs>(args);
        let mut item: ItemStruct = syn::parse2(input)?;

        let mut errors = darling::Error::accumulator();
        errors.handle(args);
        match &mut item.fields {
            Fields::Named(named) => {
                for field in &mut named.named {
                    errors.handle(marker::strip(&mut field.attrs, Position::HolderField));
                }
            }
            fields => errors.push(
                darling::Error::custom("an action parameter holder needs named fields")
                    .with_span(fields),
            ),
        }
        errors.finish()?;

        Ok(quote!(#item))
    })
}

pub fn action_function(args: TokenStream, input: TokenStream) -> TokenStream {
    expand(|| {
        if !args.is_empty() {
            return Err(
                darling::Error::custom("#[action_function] takes no arguments").with_span(&args),
            );
        }
        let item: ImplItemFn = syn::parse2(input)?;

        // the adapter passes the parameter holder as the only argument
        let typed = item
            .sig
            .inputs
            .iter()
            .filter(|input| matches!(input, FnArg::Typed(_)))
            .count();
        if typed != 1 {
            return Err(darling::Error::custom(
                "an action function takes its parameter holder as the only argument",
            )
            .with_span(&item.sig));
        }

        Ok(quote!(#item))
    })
}

fn parse_args<T: FromMeta>(args: TokenStream) -> darling::Result<T> {
    let list = NestedMeta::parse_meta_list(args)?;

    T::from_list(&list)
}

fn expand(f: impl FnOnce() -> darling::Result<TokenStream>) -> TokenStream {
    f().unwrap_or_else(darling::Error::write_errors)
}

///
/// TESTS
///
