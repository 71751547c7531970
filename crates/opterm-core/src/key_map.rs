#![forbid(unsafe_code)]

//! Static key tables.
//!
//! Three sources feed the decoder:
//!
//! | Table | Key | Source |
//! |-------|-----|--------|
//! | [`capability_key`] | termcap two-character name (`ku`, `k1`, `F3`) | terminfo key capabilities |
//! | [`vendor_sequences`] | literal bytes | sequences terminals send regardless of their entry |
//! | [`modifier_sequences`] | literal bytes | xterm modifier parameters, ESC-prefixed Meta keys |
//!
//! Several encodings may map to one [`Key`]. The generated tables are built
//! once on first use.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::key::{Key, KeyCode, Modifiers};

const fn key(code: KeyCode) -> Key {
    Key::new(code)
}

const fn shifted(code: KeyCode) -> Key {
    Key::new(code).with_modifiers(Modifiers::SHIFT)
}

/// Fold an extended function key number into F1..F12 plus modifiers.
///
/// xterm reports Shift+F1 as F13, Ctrl+F1 as F25, Shift+Ctrl+F1 as F37,
/// Meta+F1 as F49 and Shift+Meta+F1 as F61.
#[must_use]
pub const fn function_key(n: u8) -> Key {
    if n <= 12 {
        return key(KeyCode::F(n));
    }
    let bank = (n - 1) / 12;
    let base = (n - 1) % 12 + 1;
    let modifiers = match bank {
        1 => Modifiers::SHIFT,
        2 => Modifiers::CTRL,
        3 => Modifiers::SHIFT.union(Modifiers::CTRL),
        4 => Modifiers::META,
        _ => Modifiers::SHIFT.union(Modifiers::META),
    };
    Key::new(KeyCode::F(base)).with_modifiers(modifiers)
}

// ---------------------------------------------------------------------------
// Capability names
// ---------------------------------------------------------------------------

const CAPABILITY_KEYS: &[(&str, Key)] = &[
    ("kb", key(KeyCode::Backspace)),
    ("ka", key(KeyCode::ClearAllTabs)),
    ("kC", key(KeyCode::ClearScreen)),
    ("kt", key(KeyCode::ClearTab)),
    ("kD", key(KeyCode::Delete)),
    ("kL", key(KeyCode::DeleteLine)),
    ("kd", key(KeyCode::Down)),
    ("kM", key(KeyCode::ExitInsert)),
    ("kE", key(KeyCode::ClearEndOfLine)),
    ("kS", key(KeyCode::ClearEndOfScreen)),
    ("k0", key(KeyCode::F(0))),
    ("k1", key(KeyCode::F(1))),
    ("k2", key(KeyCode::F(2))),
    ("k3", key(KeyCode::F(3))),
    ("k4", key(KeyCode::F(4))),
    ("k5", key(KeyCode::F(5))),
    ("k6", key(KeyCode::F(6))),
    ("k7", key(KeyCode::F(7))),
    ("k8", key(KeyCode::F(8))),
    ("k9", key(KeyCode::F(9))),
    ("k;", key(KeyCode::F(10))),
    ("kh", key(KeyCode::Home)),
    ("kI", key(KeyCode::Insert)),
    ("kA", key(KeyCode::InsertLine)),
    ("kl", key(KeyCode::Left)),
    ("kH", key(KeyCode::LastLine)),
    ("kN", key(KeyCode::PageDown)),
    ("kP", key(KeyCode::PageUp)),
    ("kr", key(KeyCode::Right)),
    ("kF", key(KeyCode::ScrollForward)),
    ("kR", key(KeyCode::ScrollBackward)),
    ("kT", key(KeyCode::SetTab)),
    ("ku", key(KeyCode::Up)),
    ("K1", key(KeyCode::KeypadUpperLeft)),
    ("K3", key(KeyCode::KeypadUpperRight)),
    ("K2", key(KeyCode::KeypadCenter)),
    ("K4", key(KeyCode::KeypadLowerLeft)),
    ("K5", key(KeyCode::KeypadLowerRight)),
    ("kB", shifted(KeyCode::Tab)),
    ("@1", key(KeyCode::Begin)),
    ("@2", key(KeyCode::Cancel)),
    ("@3", key(KeyCode::Close)),
    ("@4", key(KeyCode::Command)),
    ("@5", key(KeyCode::Copy)),
    ("@6", key(KeyCode::Create)),
    ("@7", key(KeyCode::End)),
    ("@8", key(KeyCode::Enter)),
    ("@9", key(KeyCode::Exit)),
    ("@0", key(KeyCode::Find)),
    ("%1", key(KeyCode::Help)),
    ("%2", key(KeyCode::Mark)),
    ("%3", key(KeyCode::Message)),
    ("%4", key(KeyCode::Move)),
    ("%5", key(KeyCode::Next)),
    ("%6", key(KeyCode::Open)),
    ("%7", key(KeyCode::Options)),
    ("%8", key(KeyCode::Previous)),
    ("%9", key(KeyCode::Print)),
    ("%0", key(KeyCode::Redo)),
    ("&1", key(KeyCode::Reference)),
    ("&2", key(KeyCode::Refresh)),
    ("&3", key(KeyCode::Replace)),
    ("&4", key(KeyCode::Restart)),
    ("&5", key(KeyCode::Resume)),
    ("&6", key(KeyCode::Save)),
    ("&7", key(KeyCode::Suspend)),
    ("&8", key(KeyCode::Undo)),
    ("&9", shifted(KeyCode::Begin)),
    ("&0", shifted(KeyCode::Cancel)),
    ("*1", shifted(KeyCode::Command)),
    ("*2", shifted(KeyCode::Copy)),
    ("*3", shifted(KeyCode::Create)),
    ("*4", shifted(KeyCode::Delete)),
    ("*5", shifted(KeyCode::DeleteLine)),
    ("*6", key(KeyCode::Select)),
    ("*7", shifted(KeyCode::End)),
    ("*8", shifted(KeyCode::ClearEndOfLine)),
    ("*9", shifted(KeyCode::Exit)),
    ("*0", shifted(KeyCode::Find)),
    ("#1", shifted(KeyCode::Help)),
    ("#2", shifted(KeyCode::Home)),
    ("#3", shifted(KeyCode::Insert)),
    ("#4", shifted(KeyCode::Left)),
    ("%a", shifted(KeyCode::Message)),
    ("%b", shifted(KeyCode::Move)),
    ("%c", shifted(KeyCode::Next)),
    ("%d", shifted(KeyCode::Options)),
    ("%e", shifted(KeyCode::Previous)),
    ("%f", shifted(KeyCode::Print)),
    ("%g", shifted(KeyCode::Redo)),
    ("%h", shifted(KeyCode::Replace)),
    ("%i", shifted(KeyCode::Right)),
    ("%j", shifted(KeyCode::Resume)),
    ("!1", shifted(KeyCode::Save)),
    ("!2", shifted(KeyCode::Suspend)),
    ("!3", shifted(KeyCode::Undo)),
];

/// Second characters of the `F1`..`Fr` capabilities (F11..F63).
const EXTENDED_FUNCTION_SUFFIXES: &[u8] = b"123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqr";

struct CapabilityTable {
    by_name: HashMap<&'static str, Key>,
    by_key: HashMap<Key, &'static str>,
    names: Vec<&'static str>,
}

fn capability_table() -> &'static CapabilityTable {
    static TABLE: OnceLock<CapabilityTable> = OnceLock::new();
    TABLE.get_or_init(|| {
        static EXTENDED: OnceLock<Vec<String>> = OnceLock::new();
        let extended = EXTENDED.get_or_init(|| {
            EXTENDED_FUNCTION_SUFFIXES
                .iter()
                .map(|&suffix| format!("F{}", char::from(suffix)))
                .collect()
        });

        let mut entries: Vec<(&'static str, Key)> = CAPABILITY_KEYS.to_vec();
        for (i, name) in extended.iter().enumerate() {
            let n = u8::try_from(i + 11).unwrap_or(u8::MAX);
            entries.push((name.as_str(), function_key(n)));
        }

        let mut by_key = HashMap::with_capacity(entries.len());
        for &(name, key) in &entries {
            by_key.entry(key).or_insert(name);
        }
        CapabilityTable {
            by_name: entries.iter().copied().collect(),
            by_key,
            names: entries.iter().map(|&(name, _)| name).collect(),
        }
    })
}

/// Key reported by a termcap key capability.
#[must_use]
pub fn capability_key(name: &str) -> Option<Key> {
    capability_table().by_name.get(name).copied()
}

/// Termcap name of the capability that reports `key`, if there is one.
#[must_use]
pub fn capability_name(key: Key) -> Option<&'static str> {
    capability_table().by_key.get(&key).copied()
}

/// Every known key capability name.
pub fn capability_names() -> impl Iterator<Item = &'static str> {
    capability_table().names.iter().copied()
}

// ---------------------------------------------------------------------------
// Vendor fallbacks
// ---------------------------------------------------------------------------

const VENDOR_SEQUENCES: &[(&[u8], Key)] = &[
    // VT100 application mode (PuTTY and friends)
    (b"\x1bOP", key(KeyCode::F(1))),
    (b"\x1bOQ", key(KeyCode::F(2))),
    (b"\x1bOR", key(KeyCode::F(3))),
    (b"\x1bOS", key(KeyCode::F(4))),
    (b"\x1b[D", key(KeyCode::Left)),
    (b"\x1bOD", key(KeyCode::Left)),
    (b"\x1b[C", key(KeyCode::Right)),
    (b"\x1bOC", key(KeyCode::Right)),
    (b"\x1b[A", key(KeyCode::Up)),
    (b"\x1bOA", key(KeyCode::Up)),
    (b"\x1b[B", key(KeyCode::Down)),
    (b"\x1bOB", key(KeyCode::Down)),
    (b"\x1b[a", key(KeyCode::ScrollForward)),
    (b"\x1b[b", key(KeyCode::ScrollBackward)),
    // rxvt with TERM=xterm
    (b"\x1b[7~", key(KeyCode::Home)),
    (b"\x1b[8~", key(KeyCode::End)),
    (b"\x1b[11~", key(KeyCode::F(1))),
    (b"\x1b[12~", key(KeyCode::F(2))),
    (b"\x1b[13~", key(KeyCode::F(3))),
    (b"\x1b[14~", key(KeyCode::F(4))),
    // TERM=ansi, HyperTerminal
    (b"\x1b[H", key(KeyCode::Home)),
    (b"\x1b[F", key(KeyCode::End)),
    (b"\x1b[K", key(KeyCode::End)),
    // VT220 editing block
    (b"\x1b[1~", key(KeyCode::Home)),
    (b"\x1b[2~", key(KeyCode::Insert)),
    (b"\x1b[3~", key(KeyCode::Delete)),
    (b"\x1b[4~", key(KeyCode::End)),
    (b"\x1b[5~", key(KeyCode::PageUp)),
    (b"\x1b[6~", key(KeyCode::PageDown)),
    (b"\x1b[15~", key(KeyCode::F(5))),
    (b"\x1b[17~", key(KeyCode::F(6))),
    (b"\x1b[18~", key(KeyCode::F(7))),
    (b"\x1b[19~", key(KeyCode::F(8))),
    (b"\x1b[20~", key(KeyCode::F(9))),
    (b"\x1b[21~", key(KeyCode::F(10))),
    (b"\x1b[23~", key(KeyCode::F(11))),
    (b"\x1b[24~", key(KeyCode::F(12))),
    (b"\x1b[Z", shifted(KeyCode::Tab)),
    (b"\x1bOH", key(KeyCode::Home)),
    (b"\x1bOF", key(KeyCode::End)),
    // Keypad
    (b"\x1bOM", key(KeyCode::Enter)),
    (b"\x1bOo", key(KeyCode::KeypadSlash)),
    (b"\x1bOj", key(KeyCode::KeypadAsterisk)),
    (b"\x1bOm", key(KeyCode::KeypadMinus)),
    (b"\x1bOk", key(KeyCode::KeypadPlus)),
    (b"\x1bOp", key(KeyCode::Insert)),
    (b"\x1bOn", key(KeyCode::Delete)),
    (b"\x1bOt", key(KeyCode::Left)),
    (b"\x1bOv", key(KeyCode::Right)),
    (b"\x1bOx", key(KeyCode::Up)),
    (b"\x1bOr", key(KeyCode::Down)),
    (b"\x1bOw", key(KeyCode::KeypadUpperLeft)),
    (b"\x1bOy", key(KeyCode::KeypadUpperRight)),
    (b"\x1bOu", key(KeyCode::KeypadCenter)),
    (b"\x1bOq", key(KeyCode::KeypadLowerLeft)),
    (b"\x1bOs", key(KeyCode::KeypadLowerRight)),
];

/// Sequences recognized whatever the terminal's capabilities say.
#[must_use]
pub fn vendor_sequences() -> &'static [(&'static [u8], Key)] {
    VENDOR_SEQUENCES
}

// ---------------------------------------------------------------------------
// Modifier and Meta sequences
// ---------------------------------------------------------------------------

/// Keys reported as `CSI <n> ; <m> ~`.
const TILDE_KEYS: &[(u8, KeyCode)] = &[
    (2, KeyCode::Insert),
    (3, KeyCode::Delete),
    (5, KeyCode::PageUp),
    (6, KeyCode::PageDown),
    (15, KeyCode::F(5)),
    (17, KeyCode::F(6)),
    (18, KeyCode::F(7)),
    (19, KeyCode::F(8)),
    (20, KeyCode::F(9)),
    (21, KeyCode::F(10)),
    (23, KeyCode::F(11)),
    (24, KeyCode::F(12)),
    (29, KeyCode::Menu),
];

/// Keys reported as `CSI 1 ; <m> <final>`.
const FINAL_BYTE_KEYS: &[(u8, KeyCode)] = &[
    (b'H', KeyCode::Home),
    (b'F', KeyCode::End),
    (b'P', KeyCode::F(1)),
    (b'Q', KeyCode::F(2)),
    (b'R', KeyCode::F(3)),
    (b'S', KeyCode::F(4)),
    (b'A', KeyCode::Up),
    (b'B', KeyCode::Down),
    (b'C', KeyCode::Right),
    (b'D', KeyCode::Left),
];

/// Unmodified sequences that become Meta keys behind a second ESC.
const META_PREFIXED: &[(&[u8], KeyCode)] = &[
    (b"\x1b[2~", KeyCode::Insert),
    (b"\x1b[3~", KeyCode::Delete),
    (b"\x1b[1~", KeyCode::Home),
    (b"\x1b[4~", KeyCode::End),
    (b"\x1b[5~", KeyCode::PageUp),
    (b"\x1b[6~", KeyCode::PageDown),
    (b"\x1b[11~", KeyCode::F(1)),
    (b"\x1b[12~", KeyCode::F(2)),
    (b"\x1b[13~", KeyCode::F(3)),
    (b"\x1b[14~", KeyCode::F(4)),
    (b"\x1b[15~", KeyCode::F(5)),
    (b"\x1b[17~", KeyCode::F(6)),
    (b"\x1b[18~", KeyCode::F(7)),
    (b"\x1b[19~", KeyCode::F(8)),
    (b"\x1b[20~", KeyCode::F(9)),
    (b"\x1b[21~", KeyCode::F(10)),
    (b"\x1b[23~", KeyCode::F(11)),
    (b"\x1b[24~", KeyCode::F(12)),
    (b"\x1b[A", KeyCode::Up),
    (b"\x1b[B", KeyCode::Down),
    (b"\x1b[C", KeyCode::Right),
    (b"\x1b[D", KeyCode::Left),
];

const RXVT_MODIFIED: &[(&[u8], Key)] = &[
    (b"\x1bOa", Key::new(KeyCode::Up).with_modifiers(Modifiers::CTRL)),
    (b"\x1bOb", Key::new(KeyCode::Down).with_modifiers(Modifiers::CTRL)),
    (b"\x1bOc", Key::new(KeyCode::Right).with_modifiers(Modifiers::CTRL)),
    (b"\x1bOd", Key::new(KeyCode::Left).with_modifiers(Modifiers::CTRL)),
    (b"\x1b[29~", key(KeyCode::Menu)),
    (b"\x1b[29$", shifted(KeyCode::Menu)),
    (b"\x1b[29^", Key::new(KeyCode::Menu).with_modifiers(Modifiers::CTRL)),
    (
        b"\x1b[29@",
        Key::new(KeyCode::Menu).with_modifiers(Modifiers::SHIFT.union(Modifiers::CTRL)),
    ),
    // mintty sends this for a lone Escape in application escape mode
    (b"\x1bO[", key(KeyCode::Escape)),
];

fn build_modifier_sequences() -> Vec<(Vec<u8>, Key)> {
    let mut table = Vec::with_capacity(256);

    for param in 2..=8u8 {
        let Some(modifiers) = Modifiers::from_xterm_param(param) else {
            continue;
        };
        for &(number, code) in TILDE_KEYS {
            let seq = format!("\x1b[{number};{param}~").into_bytes();
            table.push((seq, Key::new(code).with_modifiers(modifiers)));
        }
        for &(final_byte, code) in FINAL_BYTE_KEYS {
            let seq = format!("\x1b[1;{param}{}", char::from(final_byte)).into_bytes();
            table.push((seq, Key::new(code).with_modifiers(modifiers)));
        }
    }

    for &(seq, code) in META_PREFIXED {
        let mut prefixed = Vec::with_capacity(seq.len() + 1);
        prefixed.push(0x1b);
        prefixed.extend_from_slice(seq);
        table.push((prefixed, Key::new(code).with_modifiers(Modifiers::META)));
    }

    for &(seq, key) in RXVT_MODIFIED {
        table.push((seq.to_vec(), key));
    }

    let meta = |code| Key::new(code).with_modifiers(Modifiers::META);
    table.push((b"\x1b\t".to_vec(), meta(KeyCode::Tab)));
    table.push((b"\x1b\r".to_vec(), meta(KeyCode::Enter)));
    table.push((b"\x1b\n".to_vec(), meta(KeyCode::Enter)));
    table.push((b"\x1b\x7f".to_vec(), meta(KeyCode::Backspace)));
    for byte in 0x20..=0x7eu8 {
        table.push((vec![0x1b, byte], meta(KeyCode::Char(char::from(byte)))));
    }

    table
}

/// xterm modifier sequences, ESC-prefixed Meta keys and rxvt variants.
#[must_use]
pub fn modifier_sequences() -> &'static [(Vec<u8>, Key)] {
    static TABLE: OnceLock<Vec<(Vec<u8>, Key)>> = OnceLock::new();
    TABLE.get_or_init(build_modifier_sequences)
}
