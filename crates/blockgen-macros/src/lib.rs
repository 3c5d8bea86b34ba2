//! Declaration attributes for blockgen.
//!
//! The generation pass reads these markers from source; at compile time they
//! only check their arguments and strip the field markers so the annotated
//! item compiles as written.

use proc_macro::TokenStream;

mod declare;
mod marker;

/// Marks a function as a block.
#[proc_macro_attribute]
pub fn block(args: TokenStream, input: TokenStream) -> TokenStream {
    declare::block(args.into(), input.into()).into()
}

/// Marks a struct as an action.
#[proc_macro_attribute]
pub fn action(args: TokenStream, input: TokenStream) -> TokenStream {
    declare::action(args.into(), input.into()).into()
}

/// Marks a struct as the parameter holder of an action.
#[proc_macro_attribute]
pub fn action_parameter(args: TokenStream, input: TokenStream) -> TokenStream {
    declare::action_parameter(args.into(), input.into()).into()
}

/// Marks the method an action runs.
#[proc_macro_attribute]
pub fn action_function(args: TokenStream, input: TokenStream) -> TokenStream {
    declare::action_function(args.into(), input.into()).into()
}
