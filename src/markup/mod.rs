//! Markup loading and saving.
//!
//! A saved GUI is one `<magic>` element holding the style document under
//! `<Styles>` and the view document under `<View>`:
//!
//! ```text
//! <magic>
//!   <Styles>
//!     <Style name="default">...</Style>
//!   </Styles>
//!   <View display="tabbed">
//!     <Slider id="gain" class="knob"/>
//!   </View>
//! </magic>
//! ```

pub mod parser;
pub mod tokenizer;
pub mod writer;

pub use parser::{parse, ParseError};
pub use writer::write;

use crate::document::{Document, NodeSpec};
use crate::style::names;

/// Parse a `<magic>` document into the style document and the view document.
///
/// A missing `<Styles>` or `<View>` section yields an empty document.
pub fn parse_magic(input: &str) -> Result<(Document, Document), ParseError> {
    let root = parse(input)?;
    if root.node_type() != names::MAGIC {
        return Err(ParseError::MissingRoot(names::MAGIC.to_owned()));
    }
    let styles = root.child(names::STYLES).cloned().unwrap_or_else(|| {
        log::debug!("markup has no <{}> section", names::STYLES);
        NodeSpec::new(names::STYLES)
    });
    let view = root.child(names::VIEW).cloned().unwrap_or_else(|| {
        log::debug!("markup has no <{}> section", names::VIEW);
        NodeSpec::new(names::VIEW)
    });
    Ok((Document::from_spec(&styles), Document::from_spec(&view)))
}

/// Write both documents as one `<magic>` document.
pub fn write_magic(styles: &Document, view: &Document) -> String {
    let mut root = NodeSpec::new(names::MAGIC);
    root.children.extend(styles.to_spec(styles.root()));
    root.children.extend(view.to_spec(view.root()));
    write(&root)
}
