#![forbid(unsafe_code)]

//! Key-sequence decoder.
//!
//! Maps raw input bytes to [`Key`] values through one lookup table merged
//! from the profile's key capabilities, vendor fallback sequences and the
//! generated modifier/Meta sequences (see [`crate::key_map`]).
//!
//! # Design
//!
//! The decoder is stateless. Callers keep unconsumed bytes and the escape
//! timeout themselves, or use [`crate::key_reader::KeyReader`] which does.
//!
//! ## Invariants
//! 1. The longest table entry that prefixes the input wins.
//! 2. Input that is a strict prefix of some entry reports
//!    [`KeyResult::Incomplete`], even if the input is itself an entry.
//! 3. `ESC` followed by a printable character without an entry is
//!    `Meta+<char>`; `ESC Tab` is Meta+Tab, `ESC CR`/`ESC LF` Meta+Enter.
//! 4. A lone `ESC` is only ever resolved by [`KeyDecoder::decode_final`].
//! 5. Profile capabilities override static entries with the same bytes.
//!
//! ## Failure Modes
//! - Unrecognized input yields [`KeyResult::NoMatch`]; callers treat the
//!   first byte literally.
//! - Unknown capability names in a profile are skipped.

use std::collections::{HashMap, HashSet};

use crate::capabilities::CapabilityProfile;
use crate::key::{Key, KeyCode, Modifiers};
use crate::key_map;

const ESC: u8 = 0x1b;

/// Outcome of one decode step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResult {
    /// A key was recognized in the first `consumed` bytes.
    Matched {
        /// The decoded key.
        key: Key,
        /// Number of input bytes it used.
        consumed: usize,
    },
    /// The input is a prefix of a longer sequence; wait for more bytes.
    Incomplete,
    /// Nothing in the table starts the input.
    NoMatch,
}

impl KeyResult {
    /// The matched key, if any.
    #[must_use]
    pub const fn key(&self) -> Option<Key> {
        match self {
            Self::Matched { key, .. } => Some(*key),
            _ => None,
        }
    }
}

/// Byte-sequence to key table with longest-match lookup.
#[derive(Debug, Clone)]
pub struct KeyDecoder {
    sequences: HashMap<Box<[u8]>, Key>,
    /// Every strict prefix of every sequence.
    prefixes: HashSet<Box<[u8]>>,
    max_len: usize,
}

impl Default for KeyDecoder {
    fn default() -> Self {
        Self::without_profile()
    }
}

impl KeyDecoder {
    /// Decoder with the static tables only.
    #[must_use]
    pub fn without_profile() -> Self {
        let mut decoder = Self {
            sequences: HashMap::new(),
            prefixes: HashSet::new(),
            max_len: 0,
        };
        for &(seq, key) in key_map::vendor_sequences() {
            decoder.insert(seq, key);
        }
        for (seq, key) in key_map::modifier_sequences() {
            decoder.insert(seq, *key);
        }
        decoder
    }

    /// Decoder for one terminal: static tables plus its key capabilities.
    #[must_use]
    pub fn new(profile: &CapabilityProfile) -> Self {
        let mut decoder = Self::without_profile();
        let mut _skipped = 0usize;
        for (name, seq) in &profile.keys {
            match key_map::capability_key(name) {
                Some(key) if !seq.is_empty() => decoder.insert(seq.as_bytes(), key),
                _ => _skipped += 1,
            }
        }
        crate::debug!(
            profile = %profile.profile(),
            sequences = decoder.len(),
            skipped = _skipped,
            "key decoder built"
        );
        decoder
    }

    /// Add (or replace) one sequence.
    pub fn insert(&mut self, seq: &[u8], key: Key) {
        if seq.is_empty() {
            return;
        }
        for end in 1..seq.len() {
            if !self.prefixes.contains(&seq[..end]) {
                self.prefixes.insert(seq[..end].into());
            }
        }
        self.max_len = self.max_len.max(seq.len());
        self.sequences.insert(seq.into(), key);
    }

    /// Number of distinct sequences in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }

    /// Key for exactly `seq`, without prefix handling.
    #[must_use]
    pub fn lookup(&self, seq: &[u8]) -> Option<Key> {
        self.sequences.get(seq).copied()
    }

    /// Decode the start of `input`.
    #[must_use]
    pub fn decode(&self, input: &[u8]) -> KeyResult {
        if input.is_empty() || self.prefixes.contains(input) {
            return KeyResult::Incomplete;
        }
        if let Some(matched) = self.longest_match(input) {
            return matched;
        }
        if input[0] == ESC {
            return meta_char(&input[1..]);
        }
        KeyResult::NoMatch
    }

    /// Decode after the escape timeout elapsed: no more bytes will follow.
    ///
    /// Incomplete input resolves to its longest complete prefix, or to
    /// `Escape` consuming one byte when it starts with `ESC`.
    #[must_use]
    pub fn decode_final(&self, input: &[u8]) -> KeyResult {
        match self.decode(input) {
            KeyResult::Incomplete if input.is_empty() => KeyResult::NoMatch,
            KeyResult::Incomplete => {
                if let Some(matched) = self.longest_match(input) {
                    matched
                } else if input[0] == ESC {
                    KeyResult::Matched {
                        key: Key::new(KeyCode::Escape),
                        consumed: 1,
                    }
                } else {
                    KeyResult::NoMatch
                }
            }
            other => other,
        }
    }

    fn longest_match(&self, input: &[u8]) -> Option<KeyResult> {
        let upper = input.len().min(self.max_len);
        (1..=upper).rev().find_map(|len| {
            self.sequences.get(&input[..len]).map(|&key| KeyResult::Matched {
                key,
                consumed: len,
            })
        })
    }

    /// Display name of a key, e.g. `"Shift+F1"` or `"Ctrl+Meta+Left"`.
    #[must_use]
    pub fn key_name(key: Key) -> String {
        key.to_string()
    }

    /// Termcap capability name reporting `key`, e.g. `"ku"` for Up.
    #[must_use]
    pub fn capability_name(key: Key) -> Option<&'static str> {
        key_map::capability_name(key)
    }
}

/// `ESC` followed by `rest` with no table entry.
fn meta_char(rest: &[u8]) -> KeyResult {
    let Some(&lead) = rest.first() else {
        return KeyResult::Incomplete;
    };
    let meta = |code, consumed| KeyResult::Matched {
        key: Key::new(code).with_modifiers(Modifiers::META),
        consumed,
    };
    match lead {
        b'\t' => meta(KeyCode::Tab, 2),
        b'\r' | b'\n' => meta(KeyCode::Enter, 2),
        0x20..=0x7e => meta(KeyCode::Char(char::from(lead)), 2),
        0xc2..=0xf4 => {
            let width = match lead {
                0xc2..=0xdf => 2,
                0xe0..=0xef => 3,
                _ => 4,
            };
            if rest.len() < width {
                if rest[1..].iter().all(|b| (0x80..=0xbf).contains(b)) {
                    return KeyResult::Incomplete;
                }
                return KeyResult::NoMatch;
            }
            match std::str::from_utf8(&rest[..width])
                .ok()
                .and_then(|s| s.chars().next())
            {
                Some(c) => meta(KeyCode::Char(c), 1 + width),
                None => KeyResult::NoMatch,
            }
        }
        _ => KeyResult::NoMatch,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matched(key: Key, consumed: usize) -> KeyResult {
        KeyResult::Matched { key, consumed }
    }

    fn with(code: KeyCode, modifiers: Modifiers) -> Key {
        Key::new(code).with_modifiers(modifiers)
    }

    #[test]
    fn arrow_keys_in_both_modes() {
        let decoder = KeyDecoder::default();
        assert_eq!(decoder.decode(b"\x1b[A"), matched(KeyCode::Up.into(), 3));
        assert_eq!(decoder.decode(b"\x1bOA"), matched(KeyCode::Up.into(), 3));
        assert_eq!(decoder.decode(b"\x1bOx"), matched(KeyCode::Up.into(), 3));
    }

    #[test]
    fn longest_match_wins() {
        let decoder = KeyDecoder::default();
        assert_eq!(
            decoder.decode(b"\x1b[1;3A"),
            matched(with(KeyCode::Up, Modifiers::META), 6)
        );
        assert_eq!(decoder.decode(b"\x1b[11~"), matched(KeyCode::F(1).into(), 5));
        assert_eq!(decoder.decode(b"\x1b[1~"), matched(KeyCode::Home.into(), 4));
    }

    #[test]
    fn trailing_bytes_are_left_alone() {
        let decoder = KeyDecoder::default();
        assert_eq!(decoder.decode(b"\x1b[Bxyz"), matched(KeyCode::Down.into(), 3));
    }

    #[test]
    fn strict_prefix_is_incomplete() {
        let decoder = KeyDecoder::default();
        assert_eq!(decoder.decode(b"\x1b"), KeyResult::Incomplete);
        assert_eq!(decoder.decode(b"\x1b["), KeyResult::Incomplete);
        assert_eq!(decoder.decode(b"\x1b[1;"), KeyResult::Incomplete);
        assert_eq!(decoder.decode(b"\x1bO"), KeyResult::Incomplete);
        assert_eq!(decoder.decode(b""), KeyResult::Incomplete);
    }

    #[test]
    fn decode_final_resolves_lone_escape() {
        let decoder = KeyDecoder::default();
        assert_eq!(decoder.decode_final(b"\x1b"), matched(KeyCode::Escape.into(), 1));
        assert_eq!(decoder.decode_final(b""), KeyResult::NoMatch);
    }

    #[test]
    fn decode_final_uses_longest_complete_prefix() {
        let decoder = KeyDecoder::default();
        // "ESC [" is Meta+[ once no more bytes can arrive.
        assert_eq!(
            decoder.decode_final(b"\x1b["),
            matched(with(KeyCode::Char('['), Modifiers::META), 2)
        );
        assert_eq!(
            decoder.decode_final(b"\x1b[1;"),
            matched(with(KeyCode::Char('['), Modifiers::META), 2)
        );
        // Complete input decodes the same as without the timeout.
        assert_eq!(decoder.decode_final(b"\x1b[A"), decoder.decode(b"\x1b[A"));
    }

    #[test]
    fn meta_synthesis() {
        let decoder = KeyDecoder::default();
        assert_eq!(
            decoder.decode(b"\x1ba"),
            matched(with(KeyCode::Char('a'), Modifiers::META), 2)
        );
        assert_eq!(
            decoder.decode(b"\x1b\t"),
            matched(with(KeyCode::Tab, Modifiers::META), 2)
        );
        assert_eq!(
            decoder.decode(b"\x1b\r"),
            matched(with(KeyCode::Enter, Modifiers::META), 2)
        );
        assert_eq!(
            decoder.decode(b"\x1b\n"),
            matched(with(KeyCode::Enter, Modifiers::META), 2)
        );
        assert_eq!(
            decoder.decode("\x1bé".as_bytes()),
            matched(with(KeyCode::Char('é'), Modifiers::META), 3)
        );
        assert_eq!(decoder.decode(b"\x1b\xc3"), KeyResult::Incomplete);
        assert_eq!(decoder.decode_final(b"\x1b\xc3"), matched(KeyCode::Escape.into(), 1));
    }

    #[test]
    fn control_bytes_do_not_match_without_profile() {
        let decoder = KeyDecoder::default();
        assert_eq!(decoder.decode(b"a"), KeyResult::NoMatch);
        assert_eq!(decoder.decode(b"\x01"), KeyResult::NoMatch);
        assert_eq!(decoder.decode(b"\x1b\x01"), KeyResult::NoMatch);
    }

    #[test]
    fn profile_capabilities_are_merged() {
        let decoder = KeyDecoder::new(&CapabilityProfile::linux_console());
        assert_eq!(decoder.decode(b"\x1b[[A"), matched(KeyCode::F(1).into(), 4));
        assert_eq!(decoder.decode(b"\x7f"), matched(KeyCode::Backspace.into(), 1));
        // Profile entries replace static ones.
        assert_eq!(
            decoder.decode(b"\x1b\t"),
            matched(with(KeyCode::Tab, Modifiers::SHIFT), 2)
        );
    }

    #[test]
    fn extended_function_keys_fold_into_modifiers() {
        let decoder = KeyDecoder::new(&CapabilityProfile::xterm_256color());
        assert_eq!(
            decoder.decode(b"\x1b[1;2P"),
            matched(with(KeyCode::F(1), Modifiers::SHIFT), 6)
        );
        assert_eq!(KeyDecoder::key_name(with(KeyCode::F(1), Modifiers::SHIFT)), "Shift+F1");
    }

    #[test]
    fn unknown_capability_names_are_skipped() {
        let profile = CapabilityProfile::builder()
            .key("zz", "\x1b[99~")
            .key("ku", "\x1b[99A")
            .build();
        let decoder = KeyDecoder::new(&profile);
        assert_eq!(decoder.lookup(b"\x1b[99~"), None);
        assert_eq!(decoder.lookup(b"\x1b[99A"), Some(KeyCode::Up.into()));
    }

    #[test]
    fn reverse_lookup() {
        assert_eq!(KeyDecoder::capability_name(KeyCode::Up.into()), Some("ku"));
        assert_eq!(KeyDecoder::capability_name(KeyCode::End.into()), Some("@7"));
        assert_eq!(
            KeyDecoder::capability_name(with(KeyCode::Up, Modifiers::META)),
            None
        );
    }

    #[test]
    fn names() {
        assert_eq!(KeyDecoder::key_name(KeyCode::Up.into()), "Up");
        assert_eq!(
            KeyDecoder::key_name(with(KeyCode::Left, Modifiers::CTRL | Modifiers::META)),
            "Ctrl+Meta+Left"
        );
        assert_eq!(
            KeyDecoder::key_name(with(KeyCode::Char('a'), Modifiers::META)),
            "Meta+A"
        );
    }

    #[test]
    fn result_key_accessor() {
        assert_eq!(matched(KeyCode::Up.into(), 3).key(), Some(KeyCode::Up.into()));
        assert_eq!(KeyResult::Incomplete.key(), None);
        assert_eq!(KeyResult::NoMatch.key(), None);
    }
}
