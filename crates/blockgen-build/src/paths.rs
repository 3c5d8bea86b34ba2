use crate::Error;
use proc_macro2::TokenStream;
use quote::quote;
use syn::Path;

/// Runtime crate generated code targets when nothing else is configured.
pub const DEFAULT_RUNTIME_CRATE: &str = "nativeblocks_core";

///
/// RuntimePaths
///
/// Module paths inside the runtime crate that generated adapters call into.
/// A bare crate name is anchored with a leading `::`.
///

#[derive(Clone, Debug)]
pub struct RuntimePaths {
    pub root: TokenStream,
}

impl RuntimePaths {
    pub fn new(runtime_crate: &str) -> Result<Self, Error> {
        let path = syn::parse_str::<Path>(runtime_crate.trim())
            .map_err(|err| Error::synthesis(format!("runtime crate path '{runtime_crate}'"), err))?;

        let relative = path
            .segments
            .first()
            .is_some_and(|s| s.ident == "crate" || s.ident == "self" || s.ident == "super");

        let root = if path.leading_colon.is_none() && path.segments.len() == 1 && !relative {
            quote!(::#path)
        } else {
            quote!(#path)
        };

        Ok(Self { root })
    }

    #[must_use]
    pub fn block(&self) -> TokenStream {
        let root = &self.root;
        quote!(#root::block)
    }

    #[must_use]
    pub fn action(&self) -> TokenStream {
        let root = &self.root;
        quote!(#root::action)
    }

    #[must_use]
    pub fn util(&self) -> TokenStream {
        let root = &self.root;
        quote!(#root::util)
    }

    #[must_use]
    pub fn registry(&self) -> TokenStream {
        let root = &self.root;
        quote!(#root::registry::Registry)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_crate_names_are_anchored() {
        let paths = RuntimePaths::new(DEFAULT_RUNTIME_CRATE).unwrap();

        assert_eq!(
            paths.util().to_string(),
            quote!(::nativeblocks_core::util).to_string()
        );
    }

    #[test]
    fn qualified_paths_are_kept() {
        let paths = RuntimePaths::new("crate::runtime").unwrap();

        assert_eq!(
            paths.registry().to_string(),
            quote!(crate::runtime::registry::Registry).to_string()
        );
    }

    #[test]
    fn invalid_paths_are_rejected() {
        assert!(matches!(
            RuntimePaths::new("not a path"),
            Err(Error::Synthesis { .. })
        ));
    }
}
