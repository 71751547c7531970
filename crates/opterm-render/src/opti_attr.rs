#![forbid(unsafe_code)]

//! Attribute-sequence optimizer.
//!
//! Computes the bytes that move a terminal from one cell style to another,
//! using whatever the [`CapabilityProfile`] offers: dedicated enter/exit
//! toggles, the combined `set_attributes` template, or nothing at all.
//!
//! # Design
//!
//! The optimizer models what the terminal is showing (`term`) and walks it
//! toward the target (`next`), emitting capability output for each step.
//! One of three strategies is chosen per transition:
//!
//! | Strategy | When | Output |
//! |----------|------|--------|
//! | Deactivate | target has no attributes | reset, charset exits, colors |
//! | Combined | `set_attributes` usable | reset, combined template, extra enters, colors |
//! | Incremental | otherwise | exits, colors, enters |
//!
//! ## Invariants
//! 1. Idempotence: a second call with the same target returns `None`.
//! 2. Convergence: afterwards `from` equals `to`, except that `character`
//!    becomes a space when the target is invisible.
//! 3. Attributes in the profile's no-color-video mask are never turned on
//!    while the target has a color.
//! 4. Colors are never written to monochrome profiles (`max_color < 8`).
//!
//! ## Failure Modes
//! - Missing capabilities produce no bytes; the cell is still marked as
//!   converged.
//! - Malformed templates are logged by the interpreter and skipped.

use opterm_core::capabilities::{Attribute, CapabilityProfile};
use opterm_core::tparm;

use crate::cell::{AttrFlags, CellState};
use crate::color::{Color, vga_to_ansi};

/// Canonical exit order, charsets first.
const EXIT_ORDER: [Attribute; 13] = [
    Attribute::PcCharset,
    Attribute::AltCharset,
    Attribute::Bold,
    Attribute::Dim,
    Attribute::Italic,
    Attribute::Underline,
    Attribute::Blink,
    Attribute::Reverse,
    Attribute::Standout,
    Attribute::Invisible,
    Attribute::Protected,
    Attribute::CrossedOut,
    Attribute::DoubleUnderline,
];

const ENTER_ORDER: [Attribute; 13] = [
    Attribute::AltCharset,
    Attribute::PcCharset,
    Attribute::Bold,
    Attribute::Dim,
    Attribute::Italic,
    Attribute::Underline,
    Attribute::Blink,
    Attribute::Reverse,
    Attribute::Standout,
    Attribute::Invisible,
    Attribute::Protected,
    Attribute::CrossedOut,
    Attribute::DoubleUnderline,
];

/// Parameters p1..p9 of `set_attributes`.
const COMBINED_PARAMS: [AttrFlags; 9] = [
    AttrFlags::STANDOUT,
    AttrFlags::UNDERLINE,
    AttrFlags::REVERSE,
    AttrFlags::BLINK,
    AttrFlags::DIM,
    AttrFlags::BOLD,
    AttrFlags::INVISIBLE,
    AttrFlags::PROTECTED,
    AttrFlags::ALT_CHARSET,
];

/// Attributes `set_attributes` cannot carry, entered individually afterwards.
const COMBINED_EXTRAS: [Attribute; 3] = [
    Attribute::Italic,
    Attribute::CrossedOut,
    Attribute::DoubleUnderline,
];

const DEFAULT_COLORS: &[u8] = b"\x1b[39;49m";
const DEFAULT_FG: &[u8] = b"\x1b[39m";
const DEFAULT_BG: &[u8] = b"\x1b[49m";
const DEFAULT_BG_NO_BLINK: &[u8] = b"\x1b[49;25m";
/// `orig_pair` of terminals that encode bright backgrounds as blink.
const BLINK_BG_ORIG_PAIR: &str = "\x1b[39;49;25m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy {
    Deactivate,
    Combined,
    Incremental,
}

/// Turns cell style changes into terminal output for one profile.
#[derive(Debug, Clone)]
pub struct AttributeOptimizer {
    profile: CapabilityProfile,
    no_color_video: AttrFlags,
    resets_on_exit: AttrFlags,
    charset_equivalent: bool,
}

impl AttributeOptimizer {
    /// Create an optimizer, deriving the profile's quirks once.
    #[must_use]
    pub fn new(profile: CapabilityProfile) -> Self {
        let mut no_color_video = AttrFlags::empty();
        let mut resets_on_exit = AttrFlags::empty();
        for attr in Attribute::ALL {
            if profile.no_color_video.suppresses(attr) {
                no_color_video |= AttrFlags::from_attribute(attr);
            }
            if profile.exit_resets(attr) {
                resets_on_exit |= AttrFlags::from_attribute(attr);
            }
        }
        let charset_equivalent = profile.charset_equivalent();
        Self {
            profile,
            no_color_video,
            resets_on_exit,
            charset_equivalent,
        }
    }

    /// The profile in use.
    #[must_use]
    pub const fn profile(&self) -> &CapabilityProfile {
        &self.profile
    }

    /// Attributes whose exit sequence resets everything on this terminal.
    #[must_use]
    pub const fn resets_on_exit(&self) -> AttrFlags {
        self.resets_on_exit
    }

    /// Like [`change_attribute`](Self::change_attribute), for optional cells.
    ///
    /// A missing side yields `Some` empty output and changes nothing.
    pub fn change_attribute_opt(
        &self,
        from: Option<&mut CellState>,
        to: Option<&CellState>,
    ) -> Option<Vec<u8>> {
        match (from, to) {
            (Some(from), Some(to)) => self.change_attribute(from, to),
            _ => Some(Vec::new()),
        }
    }

    /// Bytes that change the terminal from `from` to `to`.
    ///
    /// Returns `None` when nothing needs to change. Either way `from` is
    /// updated to match `to`.
    pub fn change_attribute(&self, from: &mut CellState, to: &CellState) -> Option<Vec<u8>> {
        if to.attrs.contains(AttrFlags::INVISIBLE) {
            from.character = ' ';
        }
        if from.same_style(to) {
            return None;
        }

        let mut term = *from;
        let mut next = *to;
        self.strip_no_color_video(&mut term, &mut next);

        if term.same_style(&next) {
            sync(from, to);
            return None;
        }

        let strategy = if next.attrs.is_empty() {
            Strategy::Deactivate
        } else if self.can_combine(&term) {
            Strategy::Combined
        } else {
            Strategy::Incremental
        };

        let mut out = Vec::new();
        match strategy {
            Strategy::Deactivate => self.deactivate(&mut term, &next, &mut out),
            Strategy::Combined => self.combined(&mut term, &next, &mut out),
            Strategy::Incremental => self.incremental(&mut term, &next, &mut out),
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(?strategy, bytes = out.len(), "attribute change");

        sync(from, to);
        Some(out)
    }

    // ── Strategies ─────────────────────────────────────────────────────

    fn can_combine(&self, term: &CellState) -> bool {
        self.profile.set_attributes.is_some()
            && (!term.attrs.contains(AttrFlags::PC_CHARSET) || self.charset_equivalent)
    }

    fn deactivate(&self, term: &mut CellState, next: &CellState, out: &mut Vec<u8>) {
        if !term.attrs.is_empty() {
            let had = term.attrs;
            if self.put(out, self.profile.exit_attribute_mode.as_deref(), &[]) {
                reset_model(term);
                if had.contains(AttrFlags::ALT_CHARSET) {
                    self.put(out, self.profile.alt_charset.exit.as_deref(), &[]);
                }
                if had.contains(AttrFlags::PC_CHARSET)
                    && !(self.charset_equivalent && had.contains(AttrFlags::ALT_CHARSET))
                {
                    self.put(out, self.profile.pc_charset.exit.as_deref(), &[]);
                }
            } else {
                self.turn_off(term, next, out);
            }
        }
        self.change_color(term, next, out);
    }

    fn combined(&self, term: &mut CellState, next: &CellState, out: &mut Vec<u8>) {
        if term.attrs != next.attrs {
            let had_pc = term.attrs.contains(AttrFlags::PC_CHARSET);
            self.put(out, self.profile.exit_attribute_mode.as_deref(), &[]);

            let params = COMBINED_PARAMS.map(|flag| i32::from(next.attrs.contains(flag)));
            self.put(out, self.profile.set_attributes.as_deref(), &params);
            let carried = COMBINED_PARAMS
                .iter()
                .fold(AttrFlags::empty(), |acc, &flag| acc | flag);
            reset_model(term);
            term.attrs = next.attrs & carried;

            if had_pc && !next.attrs.contains(AttrFlags::PC_CHARSET) {
                self.put(out, self.profile.pc_charset.exit.as_deref(), &[]);
            }
            for attr in COMBINED_EXTRAS {
                if next.attrs.has(attr) && self.enter(attr, out) {
                    term.attrs |= AttrFlags::from_attribute(attr);
                }
            }
            if next.attrs.contains(AttrFlags::PC_CHARSET) {
                if self.charset_equivalent && next.attrs.contains(AttrFlags::ALT_CHARSET) {
                    term.attrs |= AttrFlags::PC_CHARSET;
                } else if self.enter(Attribute::PcCharset, out) {
                    term.attrs |= AttrFlags::PC_CHARSET;
                }
            }
        }
        self.change_color(term, next, out);
    }

    fn incremental(&self, term: &mut CellState, next: &CellState, out: &mut Vec<u8>) {
        let off = term.attrs - next.attrs;
        // Attributes without an enter sequence never reached the terminal.
        let missing_exit = Attribute::ALL.into_iter().any(|attr| {
            let toggle = self.profile.toggle(attr);
            off.has(attr) && toggle.enter.is_some() && toggle.exit.is_none()
        });

        if missing_exit && self.put(out, self.profile.exit_attribute_mode.as_deref(), &[]) {
            reset_model(term);
        } else {
            self.turn_off(term, next, out);
        }
        self.change_color(term, next, out);
        self.turn_on(term, next, out);
    }

    // ── Toggles ────────────────────────────────────────────────────────

    fn turn_off(&self, term: &mut CellState, next: &CellState, out: &mut Vec<u8>) {
        for attr in EXIT_ORDER {
            let flag = AttrFlags::from_attribute(attr);
            if !term.attrs.contains(flag) || next.attrs.contains(flag) {
                continue;
            }
            let emitted = self.put(out, self.profile.toggle(attr).exit.as_deref(), &[]);
            if emitted && self.resets_on_exit.contains(flag) {
                reset_model(term);
                break;
            }
            term.attrs.remove(if emitted { flag | shared_exit(attr) } else { flag });
        }
    }

    fn turn_on(&self, term: &mut CellState, next: &CellState, out: &mut Vec<u8>) {
        let mut entered: Vec<Vec<u8>> = Vec::new();
        for attr in ENTER_ORDER {
            let flag = AttrFlags::from_attribute(attr);
            if !next.attrs.contains(flag) || term.attrs.contains(flag) {
                continue;
            }
            if attr == Attribute::PcCharset
                && self.charset_equivalent
                && term.attrs.contains(AttrFlags::ALT_CHARSET)
            {
                term.attrs |= flag;
                continue;
            }
            // Standout and reverse often share one sequence.
            if let Some(bytes) = tparm::evaluate(self.profile.toggle(attr).enter.as_deref(), &[]) {
                if !entered.contains(&bytes) {
                    out.extend_from_slice(&bytes);
                    entered.push(bytes);
                }
                term.attrs |= flag;
            }
        }
    }

    fn enter(&self, attr: Attribute, out: &mut Vec<u8>) -> bool {
        self.put(out, self.profile.toggle(attr).enter.as_deref(), &[])
    }

    // ── Colors ─────────────────────────────────────────────────────────

    fn change_color(&self, term: &mut CellState, next: &CellState, out: &mut Vec<u8>) {
        if self.profile.is_monochrome() || (term.fg == next.fg && term.bg == next.bg) {
            return;
        }

        let mut fg = next.fg;
        let mut bg = next.bg;
        let fg_reset = fg.is_default() && !term.fg.is_default();
        let bg_reset = bg.is_default() && !term.bg.is_default();

        if self.profile.default_color_support {
            if fg_reset && bg_reset {
                if !self.put(out, self.profile.orig_pair.as_deref(), &[])
                    && !self.put(out, self.profile.orig_colors.as_deref(), &[])
                {
                    out.extend_from_slice(DEFAULT_COLORS);
                }
                term.fg = Color::Default;
                term.bg = Color::Default;
            } else if fg_reset {
                out.extend_from_slice(DEFAULT_FG);
                term.fg = Color::Default;
            } else if bg_reset {
                let blink_bg = self
                    .profile
                    .orig_pair
                    .as_deref()
                    .is_some_and(|op| op.starts_with(BLINK_BG_ORIG_PAIR));
                out.extend_from_slice(if blink_bg { DEFAULT_BG_NO_BLINK } else { DEFAULT_BG });
                term.bg = Color::Default;
            }
        } else if fg_reset || bg_reset {
            if self.put(out, self.profile.orig_pair.as_deref(), &[])
                || self.put(out, self.profile.orig_colors.as_deref(), &[])
            {
                term.fg = Color::Default;
                term.bg = Color::Default;
            } else {
                if fg.is_default() {
                    fg = Color::LIGHT_GRAY;
                }
                if bg.is_default() {
                    bg = Color::BLACK;
                }
            }
        }

        let fg_changed = !fg.is_default() && fg != term.fg;
        let bg_changed = !bg.is_default() && bg != term.bg;
        if fg_changed || bg_changed {
            self.set_colors(fg, bg, fg_changed, bg_changed, out);
        }
        term.fg = fg;
        term.bg = bg;
    }

    fn set_colors(&self, fg: Color, bg: Color, fg_changed: bool, bg_changed: bool, out: &mut Vec<u8>) {
        let p = &self.profile;
        let fg_index = self.palette_index(fg, Color::LIGHT_GRAY);
        let bg_index = self.palette_index(bg, Color::BLACK);
        let mut written = false;

        if fg_changed {
            written |= self.put(out, p.set_a_foreground.as_deref(), &[ansi(fg_index)])
                || self.put(out, p.set_foreground.as_deref(), &[i32::from(fg_index)]);
        }
        if bg_changed {
            written |= self.put(out, p.set_a_background.as_deref(), &[ansi(bg_index)])
                || self.put(out, p.set_background.as_deref(), &[i32::from(bg_index)]);
        }
        if !written {
            self.put(out, p.set_color_pair.as_deref(), &[ansi(fg_index), ansi(bg_index)]);
        }
    }

    fn palette_index(&self, color: Color, fallback: Color) -> u16 {
        let index = color.index().or(fallback.index()).unwrap_or(0);
        index % self.profile.max_color.max(1)
    }

    // ── Helpers ────────────────────────────────────────────────────────

    fn strip_no_color_video(&self, term: &mut CellState, next: &mut CellState) {
        if self.no_color_video.is_empty() {
            return;
        }
        if term.has_color() {
            term.attrs -= self.no_color_video;
        }
        if next.has_color() {
            next.attrs -= self.no_color_video;
            term.attrs -= self.no_color_video;
        }
    }

    /// Evaluate `template` and append it. Returns whether anything was written.
    fn put(&self, out: &mut Vec<u8>, template: Option<&str>, params: &[i32]) -> bool {
        match tparm::evaluate(template, params) {
            Some(bytes) => {
                out.extend_from_slice(&bytes);
                true
            }
            None => false,
        }
    }
}

/// Attributes switched off together with `attr` by its exit sequence.
const fn shared_exit(attr: Attribute) -> AttrFlags {
    match attr {
        Attribute::Bold | Attribute::Dim => AttrFlags::BOLD.union(AttrFlags::DIM),
        Attribute::Underline | Attribute::DoubleUnderline => {
            AttrFlags::UNDERLINE.union(AttrFlags::DBL_UNDERLINE)
        }
        _ => AttrFlags::empty(),
    }
}

fn ansi(index: u16) -> i32 {
    i32::from(vga_to_ansi(index))
}

fn reset_model(term: &mut CellState) {
    term.attrs = AttrFlags::empty();
    term.fg = Color::Default;
    term.bg = Color::Default;
}

fn sync(from: &mut CellState, to: &CellState) {
    from.fg = to.fg;
    from.bg = to.bg;
    from.attrs = to.attrs;
}
