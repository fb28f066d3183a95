//! `view!` macro: parse element markup and generate a `NodeSpec` builder chain.

use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::parse::{Parse, ParseStream};
use syn::{braced, Error, Expr, Ident, Lit, Result, Token};

// ---------------------------------------------------------------------------
// AST types
// ---------------------------------------------------------------------------

/// An attribute value: a literal or a braced Rust expression.
#[derive(Clone)]
pub(crate) enum AttrValue {
    Lit(Lit),
    Expr(Expr),
}

/// A parsed attribute: `name="value"`, `flex-grow=2`, `visible={expr}`.
#[derive(Clone)]
pub(crate) struct Attribute {
    /// Property name with `_` replaced by `-`.
    pub name: String,
    pub span: Span,
    pub value: AttrValue,
}

impl std::fmt::Debug for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Attribute").field("name", &self.name).finish_non_exhaustive()
    }
}

/// A parsed element: `<Tag attrs... />` or `<Tag attrs...> children </Tag>`.
#[derive(Clone)]
pub(crate) struct Element {
    pub tag: Ident,
    pub attrs: Vec<Attribute>,
    pub children: Vec<Element>,
    pub self_closing: bool,
}

impl std::fmt::Debug for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Element")
            .field("tag", &self.tag.to_string())
            .field("attrs", &self.attrs)
            .field("children", &self.children)
            .field("self_closing", &self.self_closing)
            .finish()
    }
}

/// The `view!` input: exactly one root element.
#[derive(Debug)]
struct ViewInput {
    root: Element,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

impl Parse for ViewInput {
    fn parse(input: ParseStream) -> Result<Self> {
        if input.is_empty() {
            return Err(Error::new(Span::call_site(), "view! requires a root element"));
        }
        let root = parse_element(input)?;
        if !input.is_empty() {
            return Err(input.error("view! takes a single root element; wrap siblings in a <View>"));
        }
        Ok(ViewInput { root })
    }
}

/// Parse an attribute name. Kebab-case (`flex-grow`) and snake_case
/// (`flex_grow`) both yield `flex-grow`.
fn parse_attr_name(input: ParseStream) -> Result<(String, Span)> {
    let first: Ident = input.call(syn::ext::IdentExt::parse_any)?;
    let span = first.span();
    let mut name = first.to_string().replace('_', "-");
    while input.peek(Token![-]) {
        input.parse::<Token![-]>()?;
        let part: Ident = input.call(syn::ext::IdentExt::parse_any)?;
        name.push('-');
        name.push_str(&part.to_string().replace('_', "-"));
    }
    Ok((name, span))
}

fn parse_attr_value(input: ParseStream) -> Result<AttrValue> {
    if input.peek(syn::token::Brace) {
        let content;
        braced!(content in input);
        return Ok(AttrValue::Expr(content.parse()?));
    }
    match input.parse::<Lit>()? {
        lit @ (Lit::Str(_) | Lit::Int(_) | Lit::Float(_) | Lit::Bool(_)) => Ok(AttrValue::Lit(lit)),
        other => Err(Error::new(other.span(), "expected a string, number, bool or `{expr}`")),
    }
}

/// Parse a single element from the token stream.
pub(crate) fn parse_element(input: ParseStream) -> Result<Element> {
    input.parse::<Token![<]>()?;
    let tag: Ident = input.parse()?;

    let mut attrs = Vec::new();
    loop {
        if input.peek(Token![/]) {
            input.parse::<Token![/]>()?;
            input.parse::<Token![>]>()?;
            return Ok(Element { tag, attrs, children: Vec::new(), self_closing: true });
        }
        if input.peek(Token![>]) {
            input.parse::<Token![>]>()?;
            break;
        }

        let (name, span) = parse_attr_name(input)?;
        input.parse::<Token![=]>()?;
        let value = parse_attr_value(input)?;
        attrs.push(Attribute { name, span, value });
    }

    let mut children = Vec::new();
    loop {
        if input.peek(Token![<]) && input.peek2(Token![/]) {
            input.parse::<Token![<]>()?;
            input.parse::<Token![/]>()?;
            let closing_tag: Ident = input.parse()?;
            if closing_tag != tag {
                return Err(Error::new(
                    closing_tag.span(),
                    format!("mismatched closing tag: expected `</{}>`, found `</{}>`", tag, closing_tag),
                ));
            }
            input.parse::<Token![>]>()?;
            break;
        }

        if input.peek(Token![<]) {
            children.push(parse_element(input)?);
        } else {
            return Err(input.error("expected `<` to start a child element or `</` to close the parent"));
        }
    }

    Ok(Element { tag, attrs, children, self_closing: false })
}

// ---------------------------------------------------------------------------
// Code generation
// ---------------------------------------------------------------------------

fn generate_value(value: &AttrValue) -> TokenStream {
    match value {
        AttrValue::Lit(Lit::Int(int)) => quote! { (#int as f64) },
        AttrValue::Lit(lit) => quote! { #lit },
        AttrValue::Expr(expr) => quote! { #expr },
    }
}

/// Generate the builder chain for one element and its subtree.
fn generate_element(elem: &Element) -> TokenStream {
    let tag = elem.tag.to_string();
    let properties = elem.attrs.iter().map(|attr| {
        let name = syn::LitStr::new(&attr.name, attr.span);
        let value = generate_value(&attr.value);
        quote! { .with_property(#name, #value) }
    });
    let children = elem.children.iter().map(|child| {
        let child = generate_element(child);
        quote! { .with_child(#child) }
    });
    quote! {
        ::magic_layout::document::NodeSpec::new(#tag) #(#properties)* #(#children)*
    }
}

/// Entry point: generate the expression for the whole `view!` invocation.
pub(crate) fn view_impl(input: TokenStream) -> Result<TokenStream> {
    let parsed: ViewInput = syn::parse2(input)?;
    Ok(generate_element(&parsed.root))
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use quote::quote;

    fn parse_root(tokens: TokenStream) -> Result<Element> {
        syn::parse2::<ViewInput>(tokens).map(|v| v.root)
    }

    // -----------------------------------------------------------------------
    // Parsing tests
    // -----------------------------------------------------------------------

    #[test]
    fn parse_self_closing_element() {
        let elem = parse_root(quote! { <Slider caption="Gain" /> }).unwrap();
        assert_eq!(elem.tag.to_string(), "Slider");
        assert!(elem.self_closing);
        assert!(elem.children.is_empty());
        assert_eq!(elem.attrs.len(), 1);
        assert_eq!(elem.attrs[0].name, "caption");
    }

    #[test]
    fn parse_nested_views() {
        let elem = parse_root(quote! {
            <View display="tabbed">
                <View>
                    <Dummy />
                </View>
                <Slider />
            </View>
        })
        .unwrap();
        assert!(!elem.self_closing);
        assert_eq!(elem.children.len(), 2);
        assert_eq!(elem.children[0].children[0].tag.to_string(), "Dummy");
        assert_eq!(elem.children[1].tag.to_string(), "Slider");
    }

    #[test]
    fn attribute_names_become_kebab_case() {
        let elem = parse_root(quote! { <Slider flex-grow=2 min_width=40 tab-caption="A" /> }).unwrap();
        let names: Vec<&str> = elem.attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["flex-grow", "min-width", "tab-caption"]);
    }

    #[test]
    fn parse_literal_and_expression_values() {
        let elem = parse_root(quote! { <Slider a="x" b=1.5 c=true d={ 2 + 3 } /> }).unwrap();
        assert!(matches!(elem.attrs[0].value, AttrValue::Lit(Lit::Str(_))));
        assert!(matches!(elem.attrs[1].value, AttrValue::Lit(Lit::Float(_))));
        assert!(matches!(elem.attrs[2].value, AttrValue::Lit(Lit::Bool(_))));
        assert!(matches!(elem.attrs[3].value, AttrValue::Expr(_)));
    }

    #[test]
    fn parse_error_mismatched_closing_tag() {
        let err = parse_root(quote! {
            <View>
                <Dummy />
            </Slider>
        })
        .unwrap_err();
        assert!(err.to_string().contains("mismatched closing tag"));
    }

    #[test]
    fn parse_error_second_root() {
        let err = parse_root(quote! { <View /> <View /> }).unwrap_err();
        assert!(err.to_string().contains("single root element"));
    }

    #[test]
    fn parse_error_char_value() {
        assert!(parse_root(quote! { <View a='x' /> }).is_err());
    }

    // -----------------------------------------------------------------------
    // Code generation tests
    // -----------------------------------------------------------------------

    #[test]
    fn codegen_properties() {
        let code = view_impl(quote! { <Slider id="gain" flex_grow=2 /> }).unwrap().to_string();
        assert!(code.contains("NodeSpec :: new (\"Slider\")"), "got: {code}");
        assert!(code.contains("with_property (\"id\" , \"gain\")"), "got: {code}");
        assert!(code.contains("with_property (\"flex-grow\" , (2 as f64))"), "got: {code}");
    }

    #[test]
    fn codegen_children() {
        let code = view_impl(quote! {
            <View>
                <Dummy text={ label } />
            </View>
        })
        .unwrap()
        .to_string();
        assert!(code.contains("with_child"));
        assert!(code.contains("NodeSpec :: new (\"Dummy\")"));
        assert!(code.contains("with_property (\"text\" , label)"));
    }

    #[test]
    fn codegen_empty_view_is_error() {
        let err = view_impl(quote! {}).unwrap_err();
        assert!(err.to_string().contains("root element"));
    }
}
