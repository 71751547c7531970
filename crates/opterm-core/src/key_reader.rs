#![forbid(unsafe_code)]

//! Stateful key reader with an escape timeout.
//!
//! [`KeyDecoder`] is stateless and cannot tell a lone Escape from the start
//! of a longer sequence. `KeyReader` buffers undecided bytes and resolves
//! them once the timeout window passes without more input.
//!
//! # Design
//!
//! ## Invariants
//! 1. Bytes are only held while they are a strict prefix of a known
//!    sequence (or an unfinished UTF-8 character).
//! 2. The timeout is measured from the moment the current pending prefix
//!    started, not from the first byte ever fed.
//! 3. Bytes the decoder does not know are emitted literally: printable
//!    characters, Ctrl+letter for C0 codes, Backspace for DEL, Enter for CR,
//!    Tab for HT.
//! 4. At most `max_pending` bytes are held; beyond that the buffer is
//!    resolved immediately as if the timeout had elapsed.
//!
//! ## Failure Modes
//! - Bytes that are neither a key nor valid UTF-8 are reported as
//!   [`KeyAction::Ignored`].
//!
//! # Example
//!
//! ```
//! use opterm_core::key::{Key, KeyCode};
//! use opterm_core::key_decoder::KeyDecoder;
//! use opterm_core::key_reader::{KeyAction, KeyReader, KeyReaderConfig};
//! use std::time::{Duration, Instant};
//!
//! let mut reader = KeyReader::new(KeyDecoder::default(), KeyReaderConfig::default());
//! let now = Instant::now();
//!
//! // A lone ESC could start a sequence: nothing yet.
//! assert!(reader.feed(b"\x1b", now).is_empty());
//! assert!(reader.has_pending());
//!
//! // No more bytes within the window: it was the Escape key.
//! let actions = reader.check_timeout(now + Duration::from_millis(150)).unwrap();
//! assert_eq!(actions, vec![KeyAction::Key(Key::new(KeyCode::Escape))]);
//! ```

use std::time::{Duration, Instant};

use crate::key::{Key, KeyCode, Modifiers};
use crate::key_decoder::{KeyDecoder, KeyResult};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for [`KeyReader`].
#[derive(Debug, Clone)]
pub struct KeyReaderConfig {
    /// How long an undecided prefix may wait for more bytes (default: 100ms).
    pub escape_timeout: Duration,

    /// Largest number of bytes held while waiting (default: 256).
    pub max_pending: usize,
}

impl Default for KeyReaderConfig {
    fn default() -> Self {
        Self {
            escape_timeout: Duration::from_millis(100),
            max_pending: 256,
        }
    }
}

impl KeyReaderConfig {
    /// Create a config with a custom timeout.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            escape_timeout: timeout,
            ..Default::default()
        }
    }
}

// ---------------------------------------------------------------------------
// KeyAction
// ---------------------------------------------------------------------------

/// Output of the reader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// A key press.
    Key(Key),
    /// A byte that is neither a key nor part of a character.
    Ignored(u8),
}

impl KeyAction {
    /// The key, if this action carries one.
    #[must_use]
    pub const fn key(&self) -> Option<Key> {
        match self {
            Self::Key(key) => Some(*key),
            Self::Ignored(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// KeyReader
// ---------------------------------------------------------------------------

/// Buffers raw input and turns it into [`KeyAction`]s.
///
/// Feed bytes via [`feed`](Self::feed) and periodically call
/// [`check_timeout`](Self::check_timeout) to resolve held prefixes.
pub struct KeyReader {
    decoder: KeyDecoder,
    config: KeyReaderConfig,
    buffer: Vec<u8>,
    pending_since: Option<Instant>,
}

impl std::fmt::Debug for KeyReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyReader")
            .field("buffer_len", &self.buffer.len())
            .field("has_pending", &self.pending_since.is_some())
            .finish()
    }
}

impl KeyReader {
    /// Create a reader around a decoder.
    #[must_use]
    pub fn new(decoder: KeyDecoder, config: KeyReaderConfig) -> Self {
        Self {
            decoder,
            config,
            buffer: Vec::with_capacity(16),
            pending_since: None,
        }
    }

    /// Feed raw input bytes.
    ///
    /// Returns every key that is decidable now. Bytes that may still grow
    /// into a longer sequence stay buffered until more input arrives or the
    /// timeout is handled by [`check_timeout`](Self::check_timeout).
    pub fn feed(&mut self, bytes: &[u8], now: Instant) -> Vec<KeyAction> {
        self.buffer.extend_from_slice(bytes);
        let mut actions = Vec::new();
        let mut consumed_any = false;

        while !self.buffer.is_empty() {
            let (action, consumed) = match self.decoder.decode(&self.buffer) {
                KeyResult::Matched { key, consumed } => (KeyAction::Key(key), consumed),
                KeyResult::NoMatch => match literal(&self.buffer) {
                    Some(step) => step,
                    None => break,
                },
                KeyResult::Incomplete => break,
            };
            actions.push(action);
            self.buffer.drain(..consumed);
            consumed_any = true;
        }

        if self.buffer.is_empty() {
            self.pending_since = None;
        } else if consumed_any || self.pending_since.is_none() {
            self.pending_since = Some(now);
        }

        if self.buffer.len() > self.config.max_pending {
            crate::warn!(
                pending = self.buffer.len(),
                limit = self.config.max_pending,
                "key reader buffer over limit, resolving"
            );
            actions.extend(self.resolve_all());
        }
        actions
    }

    /// Resolve held bytes if the timeout has elapsed.
    ///
    /// Returns `None` if nothing is pending or the window is still open.
    pub fn check_timeout(&mut self, now: Instant) -> Option<Vec<KeyAction>> {
        let start = self.pending_since?;
        if now.duration_since(start) < self.config.escape_timeout {
            return None;
        }
        crate::trace!(pending = self.buffer.len(), "escape timeout elapsed");
        let actions = self.resolve_all();
        if actions.is_empty() {
            None
        } else {
            Some(actions)
        }
    }

    /// Returns true if bytes are waiting for more input.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending_since.is_some()
    }

    /// Time remaining until the pending prefix times out.
    ///
    /// Returns `None` if nothing is pending.
    #[must_use]
    pub fn time_until_timeout(&self, now: Instant) -> Option<Duration> {
        self.pending_since.map(|start| {
            let elapsed = now.duration_since(start);
            self.config.escape_timeout.saturating_sub(elapsed)
        })
    }

    /// Resolve held bytes immediately, as if the timeout had elapsed.
    pub fn flush(&mut self) -> Vec<KeyAction> {
        self.resolve_all()
    }

    /// Discard any held bytes.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.pending_since = None;
    }

    /// The decoder in use.
    #[must_use]
    pub fn decoder(&self) -> &KeyDecoder {
        &self.decoder
    }

    /// Get a reference to the current configuration.
    #[must_use]
    pub fn config(&self) -> &KeyReaderConfig {
        &self.config
    }

    /// Update the configuration. Held bytes are kept.
    pub fn set_config(&mut self, config: KeyReaderConfig) {
        self.config = config;
    }

    fn resolve_all(&mut self) -> Vec<KeyAction> {
        let mut actions = Vec::new();
        while !self.buffer.is_empty() {
            let (action, consumed) = match self.decoder.decode_final(&self.buffer) {
                KeyResult::Matched { key, consumed } => (KeyAction::Key(key), consumed),
                KeyResult::NoMatch | KeyResult::Incomplete => {
                    literal(&self.buffer).unwrap_or((KeyAction::Ignored(self.buffer[0]), 1))
                }
            };
            actions.push(action);
            self.buffer.drain(..consumed);
        }
        self.pending_since = None;
        actions
    }
}

// ---------------------------------------------------------------------------
// Internal
// ---------------------------------------------------------------------------

/// Key for the first byte(s) of input the table does not know.
///
/// Returns `None` when the input ends inside a UTF-8 character.
fn literal(input: &[u8]) -> Option<(KeyAction, usize)> {
    let byte = *input.first()?;
    let key = |code| Some((KeyAction::Key(Key::new(code)), 1));
    let ctrl = |c| {
        Some((
            KeyAction::Key(Key::new(KeyCode::Char(c)).with_modifiers(Modifiers::CTRL)),
            1,
        ))
    };

    match byte {
        0x00 => ctrl(' '),
        0x09 => key(KeyCode::Tab),
        0x0d => key(KeyCode::Enter),
        0x1b => key(KeyCode::Escape),
        0x01..=0x1a => ctrl(char::from(byte + b'a' - 1)),
        0x1c..=0x1f => ctrl(char::from(byte + 0x40)),
        0x7f => key(KeyCode::Backspace),
        0x20..=0x7e => key(KeyCode::Char(char::from(byte))),
        0xc2..=0xf4 => {
            let width = match byte {
                0xc2..=0xdf => 2,
                0xe0..=0xef => 3,
                _ => 4,
            };
            if input.len() < width {
                let continuation = input[1..].iter().all(|b| (0x80..=0xbf).contains(b));
                return if continuation {
                    None
                } else {
                    Some((KeyAction::Ignored(byte), 1))
                };
            }
            match std::str::from_utf8(&input[..width])
                .ok()
                .and_then(|s| s.chars().next())
            {
                Some(c) => Some((KeyAction::Key(Key::char(c)), width)),
                None => Some((KeyAction::Ignored(byte), 1)),
            }
        }
        _ => Some((KeyAction::Ignored(byte), 1)),
    }
}
