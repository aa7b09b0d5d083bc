//! Resource attribute macro.

use quote::quote;
use syn::spanned::Spanned;

use crate::utils::find_fn;

/// The action methods, along with the name of their `Action` variant, in declaration order.
const ACTIONS: [(&str, &str); 6] = [
    ("create", "Create"),
    ("list", "List"),
    ("retrieve", "Retrieve"),
    ("update", "Update"),
    ("partial_update", "PartialUpdate"),
    ("destroy", "Destroy"),
];

/// The arguments of the `resource` attribute.
#[derive(Default)]
pub struct ResourceConfig {
    /// The name of the resource.
    pub name: Option<syn::LitStr>,
}

impl ResourceConfig {
    pub fn parse(&mut self, meta: syn::meta::ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("name") {
            if self.name.is_some() {
                return Err(meta.error("duplicate `name` argument"));
            }

            let name: syn::LitStr = meta.value()?.parse()?;

            if name.value().is_empty() {
                return Err(syn::Error::new(name.span(), "resource name cannot be empty"));
            }

            self.name = Some(name);

            Ok(())
        } else {
            Err(meta.error("unsupported `resource` argument, expected `name`"))
        }
    }
}

/// Get the action variants of the action methods defined in an `impl` block.
pub fn declared_actions(item: &syn::ItemImpl) -> Vec<&'static str> {
    ACTIONS
        .iter()
        .filter(|(method, _)| find_fn(item, method).is_some())
        .map(|(_, variant)| *variant)
        .collect()
}

pub fn expand(
    config: &ResourceConfig,
    item: &mut syn::ItemImpl,
) -> syn::Result<proc_macro2::TokenStream> {
    if item.trait_.is_none() {
        return Err(syn::Error::new(
            item.self_ty.span(),
            "the `resource` attribute must be put on an `impl Resource for ...` block",
        ));
    }

    if let Some(f) = find_fn(item, "actions") {
        return Err(syn::Error::new(
            f.sig.ident.span(),
            "`actions` is implemented by the `resource` attribute and cannot be defined here",
        ));
    }

    let variants = declared_actions(item)
        .into_iter()
        .map(|variant| syn::Ident::new(variant, proc_macro2::Span::call_site()));

    item.items.push(syn::parse_quote! {
        fn actions() -> ::restology::ActionSet {
            ::restology::ActionSet::EMPTY
                #(.with(::restology::Action::#variants))*
        }
    });

    if let Some(name) = &config.name {
        if let Some(f) = find_fn(item, "name") {
            return Err(syn::Error::new(
                f.sig.ident.span(),
                "`name` is already given as an argument of the `resource` attribute",
            ));
        }

        item.items.push(syn::parse_quote! {
            fn name() -> &'static str {
                #name
            }
        });
    }

    Ok(quote! { #item })
}


#[cfg(test)]
mod snapshot_tests {
    use super::*;
    use crate::utils::testing::test_attribute;
    use insta::assert_snapshot;

    fn test_resource(config: &ResourceConfig, input: &str) -> String {
        test_attribute(input, |item| expand(config, item))
    }

    #[test]
    fn single_action() {
        let input = r#"
            impl Resource for UserView {
                async fn create(&self, request: ActionRequest) -> Response { todo!() }
            }
        "#;
        assert_snapshot!(test_resource(&ResourceConfig::default(), input), @r#"
        impl Resource for UserView {
            async fn create(&self, request: ActionRequest) -> Response {
                todo!()
            }
            fn actions() -> ::restology::ActionSet {
                ::restology::ActionSet::EMPTY.with(::restology::Action::Create)
            }
        }
        "#);
    }

    #[test]
    fn actions_in_declaration_order() {
        let input = r#"
            impl Resource for StudentView {
                async fn destroy(&self, request: ActionRequest) -> Response { todo!() }
                fn helper(&self) {}
                async fn list(&self, request: ActionRequest) -> Response { todo!() }
            }
        "#;
        assert_snapshot!(test_resource(&ResourceConfig::default(), input), @r#"
        impl Resource for StudentView {
            async fn destroy(&self, request: ActionRequest) -> Response {
                todo!()
            }
            fn helper(&self) {}
            async fn list(&self, request: ActionRequest) -> Response {
                todo!()
            }
            fn actions() -> ::restology::ActionSet {
                ::restology::ActionSet::EMPTY
                    .with(::restology::Action::List)
                    .with(::restology::Action::Destroy)
            }
        }
        "#);
    }

    #[test]
    fn no_actions() {
        let input = r#"
            impl Resource for EmptyView {}
        "#;
        assert_snapshot!(test_resource(&ResourceConfig::default(), input), @r#"
        impl Resource for EmptyView {
            fn actions() -> ::restology::ActionSet {
                ::restology::ActionSet::EMPTY
            }
        }
        "#);
    }

    #[test]
    fn with_name() {
        let config = ResourceConfig {
            name: Some(syn::parse_quote!("user")),
        };
        let input = r#"
            impl Resource for UserView {}
        "#;
        assert_snapshot!(test_resource(&config, input), @r#"
        impl Resource for UserView {
            fn actions() -> ::restology::ActionSet {
                ::restology::ActionSet::EMPTY
            }
            fn name() -> &'static str {
                "user"
            }
        }
        "#);
    }
}
