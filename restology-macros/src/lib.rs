//! Restology macros

use syn::parse_macro_input;

mod resource;
mod utils;

/// Declare the actions of a resource from its `Resource` implementation.
///
/// This attribute goes on an `impl Resource for T` block. It looks for the action methods defined
/// in the block (`create`, `list`, `retrieve`, `update`, `partial_update` and `destroy`) and
/// implements `Resource::actions` accordingly.
///
/// The optional `name` argument also implements `Resource::name`.
///
/// # Example
///
/// ```ignore
/// use restology::{ActionRequest, Resource, Response};
///
/// #[derive(Clone)]
/// struct UserView;
///
/// #[restology::resource(name = "user")]
/// impl Resource for UserView {
///     async fn create(&self, request: ActionRequest) -> Response {
///         // ...
///     }
///
///     async fn list(&self, request: ActionRequest) -> Response {
///         // ...
///     }
/// }
///
/// // `UserView::actions()` is `{create, list}`.
/// ```
#[proc_macro_attribute]
pub fn resource(
    attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let mut config = resource::ResourceConfig::default();
    let parser = syn::meta::parser(|meta| config.parse(meta));
    parse_macro_input!(attr with parser);

    let mut item = parse_macro_input!(item as syn::ItemImpl);

    resource::expand(&config, &mut item)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
