#![forbid(unsafe_code)]

//! Cell attribute state.
//!
//! A [`CellState`] is what one screen cell looks like: its character, two
//! colors and a set of boolean attributes. The attribute optimizer compares
//! the state the terminal is in with the state a cell needs and writes the
//! difference.
//!
//! # Invariants
//!
//! - Equality is field-wise, including `character`. The optimizer ignores
//!   `character` when deciding whether anything changed.
//! - Alt-charset and PC-charset may both be set; which sequences that
//!   produces is up to the terminal profile.

use opterm_core::capabilities::Attribute;

use crate::color::Color;

bitflags::bitflags! {
    /// Boolean text attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct AttrFlags: u16 {
        /// Bold / increased intensity.
        const BOLD          = 1;
        /// Dim / decreased intensity.
        const DIM           = 1 << 1;
        /// Italic text.
        const ITALIC        = 1 << 2;
        /// Underlined text.
        const UNDERLINE     = 1 << 3;
        /// Double underline.
        const DBL_UNDERLINE = 1 << 4;
        /// Blinking text.
        const BLINK         = 1 << 5;
        /// Reverse video.
        const REVERSE       = 1 << 6;
        /// Standout (often the same as reverse).
        const STANDOUT      = 1 << 7;
        /// Invisible / secure text.
        const INVISIBLE     = 1 << 8;
        /// Protected from erasure.
        const PROTECTED     = 1 << 9;
        /// Crossed-out text.
        const CROSSED_OUT   = 1 << 10;
        /// Alternate (line drawing) character set.
        const ALT_CHARSET   = 1 << 11;
        /// PC (code page 437) character set.
        const PC_CHARSET    = 1 << 12;
    }
}

impl AttrFlags {
    /// Flag for one capability attribute.
    #[must_use]
    pub const fn from_attribute(attr: Attribute) -> Self {
        match attr {
            Attribute::Bold => Self::BOLD,
            Attribute::Dim => Self::DIM,
            Attribute::Italic => Self::ITALIC,
            Attribute::Underline => Self::UNDERLINE,
            Attribute::DoubleUnderline => Self::DBL_UNDERLINE,
            Attribute::Blink => Self::BLINK,
            Attribute::Reverse => Self::REVERSE,
            Attribute::Standout => Self::STANDOUT,
            Attribute::Invisible => Self::INVISIBLE,
            Attribute::Protected => Self::PROTECTED,
            Attribute::CrossedOut => Self::CROSSED_OUT,
            Attribute::AltCharset => Self::ALT_CHARSET,
            Attribute::PcCharset => Self::PC_CHARSET,
        }
    }

    /// Whether the flag for `attr` is set.
    #[must_use]
    pub const fn has(self, attr: Attribute) -> bool {
        self.contains(Self::from_attribute(attr))
    }
}

/// Colors, attributes and character of one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellState {
    pub character: char,
    pub fg: Color,
    pub bg: Color,
    pub attrs: AttrFlags,
}

impl Default for CellState {
    fn default() -> Self {
        Self {
            character: ' ',
            fg: Color::Default,
            bg: Color::Default,
            attrs: AttrFlags::empty(),
        }
    }
}

impl CellState {
    /// A blank cell with default colors and no attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style foreground setter.
    #[must_use]
    pub const fn with_fg(mut self, fg: Color) -> Self {
        self.fg = fg;
        self
    }

    /// Builder-style background setter.
    #[must_use]
    pub const fn with_bg(mut self, bg: Color) -> Self {
        self.bg = bg;
        self
    }

    /// Builder-style attribute setter.
    #[must_use]
    pub const fn with_attrs(mut self, attrs: AttrFlags) -> Self {
        self.attrs = attrs;
        self
    }

    /// Builder-style character setter.
    #[must_use]
    pub const fn with_char(mut self, character: char) -> Self {
        self.character = character;
        self
    }

    /// No attributes and both colors default.
    #[must_use]
    pub fn is_normal(&self) -> bool {
        self.attrs.is_empty() && self.fg.is_default() && self.bg.is_default()
    }

    /// Either channel has a non-default color.
    #[must_use]
    pub fn has_color(&self) -> bool {
        !self.fg.is_default() || !self.bg.is_default()
    }

    /// Same colors and attributes; the character is not compared.
    #[must_use]
    pub fn same_style(&self, other: &Self) -> bool {
        self.fg == other.fg && self.bg == other.bg && self.attrs == other.attrs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_cell_is_normal() {
        let cell = CellState::new();
        assert!(cell.is_normal());
        assert!(!cell.has_color());
        assert_eq!(cell.character, ' ');
    }

    #[test]
    fn color_makes_cell_not_normal() {
        let cell = CellState::new().with_bg(Color::BLACK);
        assert!(!cell.is_normal());
        assert!(cell.has_color());
    }

    #[test]
    fn attributes_make_cell_not_normal() {
        let cell = CellState::new().with_attrs(AttrFlags::PROTECTED);
        assert!(!cell.is_normal());
        assert!(!cell.has_color());
    }

    #[test]
    fn same_style_ignores_character() {
        let a = CellState::new().with_char('a').with_attrs(AttrFlags::BOLD);
        let b = CellState::new().with_char('b').with_attrs(AttrFlags::BOLD);
        assert!(a.same_style(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn attribute_mapping_is_one_to_one() {
        let mut all = AttrFlags::empty();
        for attr in Attribute::ALL {
            let flag = AttrFlags::from_attribute(attr);
            assert_eq!(flag.bits().count_ones(), 1);
            assert!(!all.intersects(flag));
            all |= flag;
        }
        assert_eq!(all, AttrFlags::all());
    }
}
