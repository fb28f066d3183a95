//! Tag and property names shared by the documents and the engine.

// Document structure
pub const MAGIC: &str = "magic";
pub const STYLES: &str = "Styles";
pub const STYLE: &str = "Style";
pub const VIEW: &str = "View";
pub const NODES: &str = "Nodes";
pub const CLASSES: &str = "Classes";
pub const TYPES: &str = "Types";
pub const PALETTES: &str = "Palettes";
pub const MEDIA: &str = "media";

// Selection and identity
pub const NAME: &str = "name";
pub const SELECTED: &str = "selected";
pub const ID: &str = "id";
pub const CLASS: &str = "class";
pub const ACTIVE: &str = "active";
pub const RECURSIVE: &str = "recursive";

// Decoration
pub const BACKGROUND_COLOR: &str = "background-color";
pub const BORDER_COLOR: &str = "border-color";
pub const CAPTION: &str = "caption";
pub const CAPTION_PLACEMENT: &str = "caption-placement";
pub const CAPTION_COLOR: &str = "caption-color";
pub const CAPTION_SIZE: &str = "caption-size";
pub const TAB_CAPTION: &str = "tab-caption";
pub const TAB_COLOR: &str = "tab-color";
pub const BORDER: &str = "border";
pub const MARGIN: &str = "margin";
pub const PADDING: &str = "padding";
pub const RADIUS: &str = "radius";
pub const BACKGROUND_IMAGE: &str = "background-image";
pub const BACKGROUND_ALPHA: &str = "background-alpha";
pub const IMAGE_PLACEMENT: &str = "image-placement";
pub const BACKGROUND_GRADIENT: &str = "background-gradient";
pub const VISIBILITY: &str = "visibility";

// Container
pub const DISPLAY: &str = "display";
pub const SCROLL_MODE: &str = "scroll-mode";
pub const REPAINT_HZ: &str = "repaint-hz";
pub const TAB_HEIGHT: &str = "tab-height";
pub const TAB_SELECTED: &str = "tab-selected";

pub const DISPLAY_FLEXBOX: &str = "flexbox";
pub const DISPLAY_CONTENTS: &str = "contents";
pub const DISPLAY_TABBED: &str = "tabbed";

pub const SCROLL_NONE: &str = "no-scroll";
pub const SCROLL_HORIZONTAL: &str = "scroll-horizontal";
pub const SCROLL_VERTICAL: &str = "scroll-vertical";
pub const SCROLL_BOTH: &str = "scroll";

// Flex container
pub const FLEX_DIRECTION: &str = "flex-direction";
pub const FLEX_WRAP: &str = "flex-wrap";
pub const FLEX_ALIGN_CONTENT: &str = "flex-align-content";
pub const FLEX_ALIGN_ITEMS: &str = "flex-align-items";
pub const FLEX_JUSTIFY_CONTENT: &str = "flex-justify-content";

// Flex item
pub const FLEX_ALIGN_SELF: &str = "flex-align-self";
pub const FLEX_ORDER: &str = "flex-order";
pub const FLEX_GROW: &str = "flex-grow";
pub const FLEX_SHRINK: &str = "flex-shrink";
pub const MIN_WIDTH: &str = "min-width";
pub const MAX_WIDTH: &str = "max-width";
pub const MIN_HEIGHT: &str = "min-height";
pub const MAX_HEIGHT: &str = "max-height";
pub const WIDTH: &str = "width";
pub const HEIGHT: &str = "height";

// Absolute placement
pub const POS_X: &str = "pos-x";
pub const POS_Y: &str = "pos-y";
pub const POS_WIDTH: &str = "pos-width";
pub const POS_HEIGHT: &str = "pos-height";

// Look and feel
pub const LOOK_AND_FEEL: &str = "lookAndFeel";
pub const FONT_SIZE: &str = "font-size";
