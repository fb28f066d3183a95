//! Markup writer: two-space indentation, one element per line, empty elements
//! self-closed.

use std::fmt::Write;

use crate::document::NodeSpec;

/// Serialize `spec` and its subtree.
pub fn write(spec: &NodeSpec) -> String {
    let mut out = String::new();
    write_element(&mut out, spec, 0);
    out
}

fn write_element(out: &mut String, spec: &NodeSpec, depth: usize) {
    let indent = "  ".repeat(depth);
    let _ = write!(out, "{indent}<{}", spec.node_type());
    for (name, value) in spec.data.properties() {
        let _ = write!(out, " {name}=\"{}\"", escape(&value.as_text()));
    }
    if spec.children.is_empty() {
        out.push_str("/>\n");
        return;
    }
    out.push_str(">\n");
    for child in &spec.children {
        write_element(out, child, depth + 1);
    }
    let _ = writeln!(out, "{indent}</{}>", spec.node_type());
}

/// Escape an attribute value. Line breaks and tabs are written as character
/// references so they survive a round trip.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            c => out.push(c),
        }
    }
    out
}
