//! Colours and `$name` palette lookup.

use std::fmt;

use crate::document::{Document, NodeId};

/// Palette entries that do not exist resolve through this string.
pub const MISSING_ENTRY_FALLBACK: &str = "ff000000";

/// A 32-bit ARGB colour.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Colour(pub u32);

impl Colour {
    /// Fully transparent black; also the zero value for failed conversions.
    pub const TRANSPARENT: Colour = Colour(0x0000_0000);
    pub const BLACK: Colour = Colour(0xff00_0000);
    pub const WHITE: Colour = Colour(0xffff_ffff);

    /// Build from components.
    pub const fn from_argb(a: u8, r: u8, g: u8, b: u8) -> Self {
        Colour((a as u32) << 24 | (r as u32) << 16 | (g as u32) << 8 | b as u32)
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }

    pub const fn is_transparent(self) -> bool {
        self.alpha() == 0
    }

    /// The same colour with its alpha scaled by `factor` (clamped to 0..=1).
    pub fn with_multiplied_alpha(self, factor: f64) -> Colour {
        let a = (self.alpha() as f64 * factor.clamp(0.0, 1.0)).round() as u8;
        Colour::from_argb(a, self.red(), self.green(), self.blue())
    }

    /// Parse a colour name or a hex string. See [`parse_colour`].
    pub fn parse(text: &str) -> Option<Colour> {
        parse_colour(text)
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a colour.
///
/// Accepts a name from the named colour table (case-insensitive), any string
/// starting with `transparent`, or hex digits with an optional `#` or `0x`
/// prefix: 6 digits are opaque RGB, 8 digits are ARGB.
pub fn parse_colour(text: &str) -> Option<Colour> {
    let text = text.trim();
    let lower = text.to_ascii_lowercase();
    if lower.starts_with("transparent") {
        return Some(Colour::TRANSPARENT);
    }
    if let Some(colour) = named_colour(&lower) {
        return Some(colour);
    }
    let digits = lower
        .strip_prefix('#')
        .or_else(|| lower.strip_prefix("0x"))
        .unwrap_or(&lower);
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        6 => u32::from_str_radix(digits, 16).ok().map(|rgb| Colour(0xff00_0000 | rgb)),
        8 => u32::from_str_radix(digits, 16).ok().map(Colour),
        _ => None,
    }
}

fn named_colour(name: &str) -> Option<Colour> {
    let argb = match name {
        "black" => 0xff000000,
        "white" => 0xffffffff,
        "silver" => 0xffc0c0c0,
        "grey" | "gray" => 0xff808080,
        "darkgrey" | "darkgray" => 0xff555555,
        "lightgrey" | "lightgray" => 0xffd3d3d3,
        "dimgrey" | "dimgray" => 0xff696969,
        "red" => 0xffff0000,
        "darkred" => 0xff8b0000,
        "green" => 0xff008000,
        "darkgreen" => 0xff006400,
        "lime" => 0xff00ff00,
        "blue" => 0xff0000ff,
        "darkblue" => 0xff00008b,
        "navy" => 0xff000080,
        "skyblue" => 0xff87ceeb,
        "lightblue" => 0xffadd8e6,
        "cyan" | "aqua" => 0xff00ffff,
        "teal" => 0xff008080,
        "magenta" | "fuchsia" => 0xffff00ff,
        "purple" => 0xff800080,
        "orange" => 0xffffa500,
        "darkorange" => 0xffff8c00,
        "yellow" => 0xffffff00,
        "gold" => 0xffffd700,
        "brown" => 0xffa52a2a,
        "pink" => 0xffffc0cb,
        "olive" => 0xff808000,
        "maroon" => 0xff800000,
        "beige" => 0xfff5f5dc,
        "ivory" => 0xfffffff0,
        "khaki" => 0xfff0e68c,
        "coral" => 0xffff7f50,
        "salmon" => 0xfffa8072,
        "tomato" => 0xffff6347,
        "violet" => 0xffee82ee,
        "indigo" => 0xff4b0082,
        "turquoise" => 0xff40e0d0,
        "slategrey" | "slategray" => 0xff708090,
        _ => return None,
    };
    Some(Colour(argb))
}

// ---------------------------------------------------------------------------
// Palette lookup
// ---------------------------------------------------------------------------

/// Resolve a colour token against `palette` (a node of the style document).
///
/// - empty -> transparent
/// - `$name` -> the palette entry `name`; transparent if there is no palette,
///   [`MISSING_ENTRY_FALLBACK`] if the entry is missing
/// - anything else is parsed with [`parse_colour`]; unparsable text is
///   transparent
pub fn resolve_colour(styles: &Document, palette: Option<NodeId>, token: &str) -> Colour {
    let token = token.trim();
    if token.is_empty() {
        return Colour::TRANSPARENT;
    }
    if let Some(entry) = token.strip_prefix('$') {
        let Some(palette) = palette else {
            log::debug!("colour {token}: no current palette");
            return Colour::TRANSPARENT;
        };
        return match styles.property(palette, entry) {
            Some(value) => resolve_colour(styles, None, &value.as_text()),
            None => {
                log::debug!("colour {token}: palette entry missing");
                parse_colour(MISSING_ENTRY_FALLBACK).unwrap_or(Colour::BLACK)
            }
        };
    }
    parse_colour(token).unwrap_or_else(|| {
        log::debug!("unparsable colour {token:?}");
        Colour::TRANSPARENT
    })
}
