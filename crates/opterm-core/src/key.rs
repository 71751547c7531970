#![forbid(unsafe_code)]

//! Canonical key identifiers.
//!
//! A [`Key`] is a [`KeyCode`] plus the [`Modifiers`] held with it. Every
//! encoding a terminal may send for the same key (terminfo capability,
//! vendor fallback, xterm modifier parameter, ESC prefix) decodes to the
//! same `Key` value, so callers match on one identifier per key.
//!
//! # Design Notes
//!
//! - Function keys above F12 sent by xterm-style terminals (F13 = Shift+F1,
//!   F25 = Ctrl+F1, ...) are normalized to `F(1..=12)` plus modifiers.
//! - Back-tab is `Tab` with `SHIFT`.
//! - Ctrl+letter is `Char` with `CTRL`, lowercase letter.
//! - The `Display` impl produces the display name (`"Shift+Meta+F3"`).

use std::fmt;

use bitflags::bitflags;

/// A decoded key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Key {
    /// The key itself.
    pub code: KeyCode,

    /// Modifier keys held with it.
    pub modifiers: Modifiers,
}

impl Key {
    /// Create a key without modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Replace the modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Plain character key.
    #[must_use]
    pub const fn char(c: char) -> Self {
        Self::new(KeyCode::Char(c))
    }

    /// Check if this is a specific character key.
    #[must_use]
    pub fn is_char(&self, c: char) -> bool {
        matches!(self.code, KeyCode::Char(ch) if ch == c)
    }

    /// Check if Ctrl modifier is held.
    #[must_use]
    pub const fn ctrl(&self) -> bool {
        self.modifiers.contains(Modifiers::CTRL)
    }

    /// Check if Meta modifier is held.
    #[must_use]
    pub const fn meta(&self) -> bool {
        self.modifiers.contains(Modifiers::META)
    }

    /// Check if Shift modifier is held.
    #[must_use]
    pub const fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

impl From<KeyCode> for Key {
    fn from(code: KeyCode) -> Self {
        Self::new(code)
    }
}

bitflags! {
    /// Modifier keys that can be held during a key press.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b000;
        /// Shift key.
        const SHIFT = 0b001;
        /// Control key.
        const CTRL  = 0b010;
        /// Meta/Alt key (or an ESC prefix).
        const META  = 0b100;
    }
}

impl Modifiers {
    /// Decode the xterm modifier parameter (`CSI 1 ; <m> A`): `m - 1` is a
    /// bit set of shift (1), alt (2), ctrl (4).
    #[must_use]
    pub const fn from_xterm_param(param: u8) -> Option<Self> {
        if param < 2 || param > 8 {
            return None;
        }
        let bits = param - 1;
        let mut mods = Self::NONE;
        if bits & 1 != 0 {
            mods = mods.union(Self::SHIFT);
        }
        if bits & 2 != 0 {
            mods = mods.union(Self::META);
        }
        if bits & 4 != 0 {
            mods = mods.union(Self::CTRL);
        }
        Some(mods)
    }
}

/// Key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A character key.
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    Delete,
    Insert,
    Home,
    End,
    PageUp,
    PageDown,
    Up,
    Down,
    Left,
    Right,
    /// Function key F0..F12 (higher numbers are folded into modifiers).
    F(u8),
    Begin,
    Menu,

    // Keypad
    KeypadUpperLeft,
    KeypadUpperRight,
    KeypadCenter,
    KeypadLowerLeft,
    KeypadLowerRight,
    KeypadSlash,
    KeypadAsterisk,
    KeypadMinus,
    KeypadPlus,

    // Editing keys of old terminals
    ClearAllTabs,
    ClearScreen,
    ClearTab,
    DeleteLine,
    ExitInsert,
    ClearEndOfLine,
    ClearEndOfScreen,
    InsertLine,
    LastLine,
    ScrollForward,
    ScrollBackward,
    SetTab,

    // Command keys
    Cancel,
    Close,
    Command,
    Copy,
    Create,
    Exit,
    Find,
    Help,
    Mark,
    Message,
    Move,
    Next,
    Open,
    Options,
    Previous,
    Print,
    Redo,
    Reference,
    Refresh,
    Replace,
    Restart,
    Resume,
    Save,
    Select,
    Suspend,
    Undo,
}

impl KeyCode {
    /// Display name of the bare key (no modifiers).
    ///
    /// `Char` has no static name; see [`Key`]'s `Display`.
    #[must_use]
    pub const fn name(&self) -> Option<&'static str> {
        Some(match self {
            Self::Char(' ') => "Space",
            Self::Char(_) | Self::F(_) => return None,
            Self::Enter => "Enter",
            Self::Escape => "Esc",
            Self::Backspace => "Backspace",
            Self::Tab => "Tab",
            Self::Delete => "Del",
            Self::Insert => "Ins",
            Self::Home => "Home",
            Self::End => "End",
            Self::PageUp => "PgUp",
            Self::PageDown => "PgDn",
            Self::Up => "Up",
            Self::Down => "Down",
            Self::Left => "Left",
            Self::Right => "Right",
            Self::Begin => "Begin",
            Self::Menu => "Menu",
            Self::KeypadUpperLeft => "Upper-Left",
            Self::KeypadUpperRight => "Upper-Right",
            Self::KeypadCenter => "Center",
            Self::KeypadLowerLeft => "Lower-Left",
            Self::KeypadLowerRight => "Lower-Right",
            Self::KeypadSlash => "Keypad-Slash",
            Self::KeypadAsterisk => "Keypad-Asterisk",
            Self::KeypadMinus => "Keypad-Minus",
            Self::KeypadPlus => "Keypad-Plus",
            Self::ClearAllTabs => "Clear-All-Tabs",
            Self::ClearScreen => "Clear-Screen",
            Self::ClearTab => "Clear-Tab",
            Self::DeleteLine => "Del-line",
            Self::ExitInsert => "Exit-Ins",
            Self::ClearEndOfLine => "Clear-End-of-Line",
            Self::ClearEndOfScreen => "Clear-End-of-Screen",
            Self::InsertLine => "Ins-Line",
            Self::LastLine => "Last-Line",
            Self::ScrollForward => "Scroll-Forward",
            Self::ScrollBackward => "Scroll-Backward",
            Self::SetTab => "Set-Tab",
            Self::Cancel => "Cancel",
            Self::Close => "Close",
            Self::Command => "Command",
            Self::Copy => "Copy",
            Self::Create => "Create",
            Self::Exit => "Exit",
            Self::Find => "Find",
            Self::Help => "Help",
            Self::Mark => "Mark",
            Self::Message => "Message",
            Self::Move => "Move",
            Self::Next => "Next",
            Self::Open => "Open",
            Self::Options => "Options",
            Self::Previous => "Previous",
            Self::Print => "Print",
            Self::Redo => "Redo",
            Self::Reference => "Reference",
            Self::Refresh => "Refresh",
            Self::Replace => "Replace",
            Self::Restart => "Restart",
            Self::Resume => "Resume",
            Self::Save => "Save",
            Self::Select => "Select",
            Self::Suspend => "Suspend",
            Self::Undo => "Undo",
        })
    }
}

impl fmt::Display for Key {
    /// Modifier prefixes appear as `Shift+`, `Ctrl+`, `Meta+` in that order.
    /// Letters are shown uppercase; an uppercase letter held with Ctrl or
    /// Meta implies Shift.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shift = self.shift()
            || (matches!(self.code, KeyCode::Char(c) if c.is_ascii_uppercase())
                && (self.ctrl() || self.meta()));

        if shift {
            f.write_str("Shift+")?;
        }
        if self.ctrl() {
            f.write_str("Ctrl+")?;
        }
        if self.meta() {
            f.write_str("Meta+")?;
        }

        match self.code {
            KeyCode::F(n) => write!(f, "F{n}"),
            KeyCode::Char(c) if c != ' ' => {
                if self.modifiers.is_empty() {
                    write!(f, "{c}")
                } else {
                    write!(f, "{}", c.to_ascii_uppercase())
                }
            }
            code => f.write_str(code.name().unwrap_or("?")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(key: Key) -> String {
        key.to_string()
    }

    #[test]
    fn key_is_char() {
        let key = Key::char('q');
        assert!(key.is_char('q'));
        assert!(!key.is_char('x'));
    }

    #[test]
    fn key_modifiers() {
        let key = Key::char('c').with_modifiers(Modifiers::CTRL);
        assert!(key.ctrl());
        assert!(!key.meta());
        assert!(!key.shift());
    }

    #[test]
    fn xterm_modifier_parameter() {
        assert_eq!(Modifiers::from_xterm_param(2), Some(Modifiers::SHIFT));
        assert_eq!(Modifiers::from_xterm_param(3), Some(Modifiers::META));
        assert_eq!(Modifiers::from_xterm_param(5), Some(Modifiers::CTRL));
        assert_eq!(
            Modifiers::from_xterm_param(8),
            Some(Modifiers::SHIFT | Modifiers::CTRL | Modifiers::META)
        );
        assert_eq!(Modifiers::from_xterm_param(1), None);
        assert_eq!(Modifiers::from_xterm_param(9), None);
    }

    #[test]
    fn plain_names() {
        assert_eq!(name(KeyCode::Up.into()), "Up");
        assert_eq!(name(KeyCode::PageDown.into()), "PgDn");
        assert_eq!(name(KeyCode::Escape.into()), "Esc");
        assert_eq!(name(KeyCode::F(10).into()), "F10");
        assert_eq!(name(Key::char(' ')), "Space");
        assert_eq!(name(Key::char('x')), "x");
    }

    #[test]
    fn modifier_prefix_order() {
        let all = Modifiers::SHIFT | Modifiers::CTRL | Modifiers::META;
        assert_eq!(name(Key::new(KeyCode::Up).with_modifiers(all)), "Shift+Ctrl+Meta+Up");
        assert_eq!(
            name(Key::new(KeyCode::Left).with_modifiers(Modifiers::CTRL | Modifiers::META)),
            "Ctrl+Meta+Left"
        );
        assert_eq!(name(Key::new(KeyCode::F(1)).with_modifiers(Modifiers::SHIFT)), "Shift+F1");
        assert_eq!(name(Key::new(KeyCode::Tab).with_modifiers(Modifiers::SHIFT)), "Shift+Tab");
    }

    #[test]
    fn letter_names() {
        assert_eq!(name(Key::char('a').with_modifiers(Modifiers::META)), "Meta+A");
        assert_eq!(name(Key::char('A').with_modifiers(Modifiers::META)), "Shift+Meta+A");
        assert_eq!(name(Key::char('z').with_modifiers(Modifiers::CTRL)), "Ctrl+Z");
        assert_eq!(name(Key::char('!').with_modifiers(Modifiers::META)), "Meta+!");
        assert_eq!(name(Key::char(' ').with_modifiers(Modifiers::CTRL)), "Ctrl+Space");
    }
}
