//! Shared utilities for the macros.

/// Find the function with the specified name in an `impl` block.
pub fn find_fn<'a>(item: &'a syn::ItemImpl, name: &str) -> Option<&'a syn::ImplItemFn> {
    item.items.iter().find_map(|impl_item| match impl_item {
        syn::ImplItem::Fn(f) if f.sig.ident == name => Some(f),
        _ => None,
    })
}

#[cfg(test)]
pub mod testing {
    //! Test utilities for snapshot testing attribute macros.

    /// Expand an attribute macro on an `impl` block and render the result with prettyplease.
    pub fn test_attribute<F>(input: &str, expand_fn: F) -> String
    where
        F: FnOnce(&mut syn::ItemImpl) -> syn::Result<proc_macro2::TokenStream>,
    {
        let mut input: syn::ItemImpl = syn::parse_str(input).expect("Failed to parse input");
        let output = expand_fn(&mut input).expect("Expansion failed");
        let file: syn::File = syn::parse2(output).expect("Failed to parse output");

        prettyplease::unparse(&file)
    }
}
