#![forbid(unsafe_code)]

//! Palette colors.
//!
//! Colors are palette indices in **VGA order** (blue before red), the order
//! used by `setf`/`setb` and by the named constants below. Terminals whose
//! templates expect ANSI order (`setaf`/`setab`) get the index through
//! [`vga_to_ansi`].
//!
//! | Index | VGA | ANSI |
//! |-------|-----|------|
//! | 1 | blue | red |
//! | 3 | cyan | yellow |
//! | 4 | red | blue |
//! | 6 | brown | cyan |

/// A cell color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// The terminal's default foreground or background.
    #[default]
    Default,
    /// A palette entry in VGA order.
    Indexed(u16),
}

impl Color {
    pub const BLACK: Self = Self::Indexed(0);
    pub const BLUE: Self = Self::Indexed(1);
    pub const GREEN: Self = Self::Indexed(2);
    pub const CYAN: Self = Self::Indexed(3);
    pub const RED: Self = Self::Indexed(4);
    pub const MAGENTA: Self = Self::Indexed(5);
    pub const BROWN: Self = Self::Indexed(6);
    pub const LIGHT_GRAY: Self = Self::Indexed(7);
    pub const DARK_GRAY: Self = Self::Indexed(8);
    pub const LIGHT_BLUE: Self = Self::Indexed(9);
    pub const LIGHT_GREEN: Self = Self::Indexed(10);
    pub const LIGHT_CYAN: Self = Self::Indexed(11);
    pub const LIGHT_RED: Self = Self::Indexed(12);
    pub const LIGHT_MAGENTA: Self = Self::Indexed(13);
    pub const YELLOW: Self = Self::Indexed(14);
    pub const WHITE: Self = Self::Indexed(15);
    pub const NAVY_BLUE: Self = Self::Indexed(17);
    pub const SPRING_GREEN3: Self = Self::Indexed(42);

    /// Whether this is the terminal default.
    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self, Self::Default)
    }

    /// Palette index, `None` for the default color.
    #[must_use]
    pub const fn index(self) -> Option<u16> {
        match self {
            Self::Default => None,
            Self::Indexed(i) => Some(i),
        }
    }
}

const VGA_TO_ANSI: [u16; 16] = [0, 4, 2, 6, 1, 5, 3, 7, 8, 12, 10, 14, 9, 13, 11, 15];

/// Map a VGA-ordered index to ANSI order. Indices from 16 up are unchanged.
#[must_use]
pub const fn vga_to_ansi(index: u16) -> u16 {
    if index < 16 {
        VGA_TO_ANSI[index as usize]
    } else {
        index
    }
}
