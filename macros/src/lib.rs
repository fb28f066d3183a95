//! Proc macros for magic-layout: `view!` view-document composition.
//!
//! This crate is not meant to be used directly, enable the `macros` feature on `magic-layout`.

use proc_macro::TokenStream;

mod view_macro;

/// Element-markup composition of a view subtree.
///
/// Expands to a `magic_layout::document::NodeSpec` expression, ready for
/// `Document::from_spec` or `Document::insert_spec`.
///
/// # Syntax
///
/// - `<Type />`: an element without children
/// - `<Type attr=value> ... </Type>`: an element with children
/// - exactly one root element
///
/// # Attributes
///
/// - names may be kebab-case (`flex-grow`) or snake_case (`flex_grow`); both
///   become the property `flex-grow`
/// - values are string, integer, float or bool literals, or a braced
///   expression `{ expr }` of any type convertible into a `Value`
/// - integer literals are stored as numbers
///
/// # Example
///
/// ```ignore
/// let spec = view! {
///     <View display="tabbed" tab-selected="ui:tab">
///         <Slider id="gain" class="knob" flex-grow=2 />
///         <View caption={ title }>
///             <Dummy text="hello" />
///         </View>
///     </View>
/// };
/// ```
#[proc_macro]
pub fn view(input: TokenStream) -> TokenStream {
    view_macro::view_impl(input.into())
        .unwrap_or_else(|err| err.to_compile_error())
        .into()
}
