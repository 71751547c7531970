#![forbid(unsafe_code)]

//! Terminal capability profiles.
//!
//! A [`CapabilityProfile`] is the set of control-sequence templates one
//! terminal understands, plus the quirk values that change how those
//! templates may be combined (no-color-video mask, color depth, default-color
//! support). Templates use the `%` language evaluated by [`crate::tparm`].
//!
//! Profiles are built once per session and never mutated by consumers.
//!
//! # Predefined Profiles
//!
//! | Profile | Colors | Notes |
//! |---------|--------|-------|
//! | `ansi()` | 8 | combined SGR template, ncv = standout + underline |
//! | `vt100()` | mono | `$<2>` padding on every attribute code |
//! | `xterm_256color()` | 256 | every toggle present, 256-color setaf/setab |
//! | `rxvt()` | 8 | SI/SO alternate charset |
//! | `linux_console()` | 16 | bright colors via bold/blink, ncv = underline + dim |
//! | `cygwin()` | 16 | same sequences as the Linux console |
//! | `putty_256color()` | 256 | no default-color support |
//! | `teraterm()` | 16 | no default-color support, ncv = standout + blink + bold |
//! | `ibm_color()` | 8 | raw VGA-order setf/setb only |
//! | `dumb()` | none | no capabilities |
//!
//! ## Profile Builder
//!
//! ```
//! use opterm_core::capabilities::{Attribute, CapabilityProfileBuilder};
//!
//! let profile = CapabilityProfileBuilder::new()
//!     .toggle(Attribute::Bold, Some("\x1b[1m"), Some("\x1b[22m"))
//!     .set_a_foreground("\x1b[3%p1%dm")
//!     .max_color(8)
//!     .try_build()
//!     .expect("templates are well formed");
//!
//! assert_eq!(profile.toggle(Attribute::Bold).enter.as_deref(), Some("\x1b[1m"));
//! ```
//!
//! # Derived Quirks
//!
//! Two facts are derived from the raw templates rather than declared:
//!
//! 1. **Charset equivalence**: when the alternate and PC charsets share an
//!    enter or exit sequence, switching one implicitly switches the other.
//! 2. **Exit causes reset**: some terminals have no dedicated "exit bold"
//!    and reuse the full reset. An exit template that is the reset (or starts
//!    with `ESC [ m`, `ESC [ 0 m` or the ADM-3 `ESC G 0`) clears every
//!    attribute and both colors.
//!
//! # Failure Modes
//!
//! | Mode | Condition | Behavior |
//! |------|-----------|----------|
//! | Malformed template | builder or JSON input | [`ProfileError::InvalidTemplate`] from `try_build`/`from_json` |
//! | Unknown name | `TerminalProfile::from_str` | [`ProfileError::UnknownProfile`] |
//! | Unknown `TERM` | detection | falls back to the ansi profile |
//! | `NO_COLOR` set | detection | color templates dropped, `max_color = 0` |

use std::collections::BTreeMap;
use std::env;

use crate::tparm::{self, TemplateError};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error building or loading a capability profile.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    /// A template failed validation.
    #[error("capability `{capability}` is malformed: {source}")]
    InvalidTemplate {
        /// Name of the offending capability.
        capability: String,
        /// The underlying template defect.
        #[source]
        source: TemplateError,
    },
    /// No predefined profile has this name.
    #[error("unknown terminal profile `{0}`")]
    UnknownProfile(String),
    /// The JSON profile description could not be decoded.
    #[cfg(feature = "serde")]
    #[error("invalid profile description: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// Attributes
// ---------------------------------------------------------------------------

/// A boolean text attribute with its own enter/exit capability pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Attribute {
    Bold,
    Dim,
    Italic,
    Underline,
    Blink,
    Reverse,
    Standout,
    Invisible,
    Protected,
    CrossedOut,
    DoubleUnderline,
    AltCharset,
    PcCharset,
}

impl Attribute {
    /// Every attribute, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::Bold,
        Self::Dim,
        Self::Italic,
        Self::Underline,
        Self::Blink,
        Self::Reverse,
        Self::Standout,
        Self::Invisible,
        Self::Protected,
        Self::CrossedOut,
        Self::DoubleUnderline,
        Self::AltCharset,
        Self::PcCharset,
    ];

    /// Capability name of the enter template.
    #[must_use]
    pub const fn enter_name(self) -> &'static str {
        match self {
            Self::Bold => "enter_bold_mode",
            Self::Dim => "enter_dim_mode",
            Self::Italic => "enter_italics_mode",
            Self::Underline => "enter_underline_mode",
            Self::Blink => "enter_blink_mode",
            Self::Reverse => "enter_reverse_mode",
            Self::Standout => "enter_standout_mode",
            Self::Invisible => "enter_secure_mode",
            Self::Protected => "enter_protected_mode",
            Self::CrossedOut => "enter_crossed_out_mode",
            Self::DoubleUnderline => "enter_dbl_underline_mode",
            Self::AltCharset => "enter_alt_charset_mode",
            Self::PcCharset => "enter_pc_charset_mode",
        }
    }

    /// Capability name of the exit template.
    #[must_use]
    pub const fn exit_name(self) -> &'static str {
        match self {
            Self::Bold => "exit_bold_mode",
            Self::Dim => "exit_dim_mode",
            Self::Italic => "exit_italics_mode",
            Self::Underline => "exit_underline_mode",
            Self::Blink => "exit_blink_mode",
            Self::Reverse => "exit_reverse_mode",
            Self::Standout => "exit_standout_mode",
            Self::Invisible => "exit_secure_mode",
            Self::Protected => "exit_protected_mode",
            Self::CrossedOut => "exit_crossed_out_mode",
            Self::DoubleUnderline => "exit_dbl_underline_mode",
            Self::AltCharset => "exit_alt_charset_mode",
            Self::PcCharset => "exit_pc_charset_mode",
        }
    }

    /// The `no_color_video` bit covering this attribute, if any.
    #[must_use]
    pub const fn ncv_flag(self) -> NoColorVideo {
        match self {
            Self::Standout => NoColorVideo::STANDOUT,
            Self::Underline => NoColorVideo::UNDERLINE,
            Self::Reverse => NoColorVideo::REVERSE,
            Self::Blink => NoColorVideo::BLINK,
            Self::Dim => NoColorVideo::DIM,
            Self::Bold => NoColorVideo::BOLD,
            Self::Invisible => NoColorVideo::INVISIBLE,
            Self::Protected => NoColorVideo::PROTECTED,
            Self::AltCharset => NoColorVideo::ALT_CHARSET,
            Self::Italic | Self::CrossedOut | Self::DoubleUnderline | Self::PcCharset => {
                NoColorVideo::empty()
            }
        }
    }
}

bitflags::bitflags! {
    /// Attributes that cannot be combined with color (terminfo `ncv`).
    ///
    /// Bit values follow the terminfo definition.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NoColorVideo: u16 {
        const STANDOUT    = 1;
        const UNDERLINE   = 1 << 1;
        const REVERSE     = 1 << 2;
        const BLINK       = 1 << 3;
        const DIM         = 1 << 4;
        const BOLD        = 1 << 5;
        const INVISIBLE   = 1 << 6;
        const PROTECTED   = 1 << 7;
        const ALT_CHARSET = 1 << 8;
    }
}

impl NoColorVideo {
    /// Whether `attr` must be suppressed while color is active.
    #[must_use]
    pub const fn suppresses(self, attr: Attribute) -> bool {
        let flag = attr.ncv_flag();
        !flag.is_empty() && self.contains(flag)
    }
}

#[cfg(feature = "serde")]
mod ncv_bits {
    use super::NoColorVideo;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ncv: &NoColorVideo, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u16(ncv.bits())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NoColorVideo, D::Error> {
        u16::deserialize(d).map(NoColorVideo::from_bits_truncate)
    }
}

/// Enter/exit templates of one attribute. Either side may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Toggle {
    pub enter: Option<String>,
    pub exit: Option<String>,
}

impl Toggle {
    fn new(enter: Option<&str>, exit: Option<&str>) -> Self {
        Self {
            enter: enter.map(str::to_owned),
            exit: exit.map(str::to_owned),
        }
    }
}

// ---------------------------------------------------------------------------
// Profile identifiers
// ---------------------------------------------------------------------------

/// Known profile identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum TerminalProfile {
    Ansi,
    Vt100,
    Xterm256Color,
    Rxvt,
    LinuxConsole,
    Cygwin,
    Putty256Color,
    Teraterm,
    IbmColor,
    Dumb,
    /// Assembled by hand or loaded from a description.
    #[default]
    Custom,
    /// Chosen by [`CapabilityProfile::detect`].
    Detected,
}

impl TerminalProfile {
    /// Profile name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ansi => "ansi",
            Self::Vt100 => "vt100",
            Self::Xterm256Color => "xterm-256color",
            Self::Rxvt => "rxvt",
            Self::LinuxConsole => "linux",
            Self::Cygwin => "cygwin",
            Self::Putty256Color => "putty-256color",
            Self::Teraterm => "teraterm",
            Self::IbmColor => "ibm-color",
            Self::Dumb => "dumb",
            Self::Custom => "custom",
            Self::Detected => "detected",
        }
    }

    /// All predefined identifiers (excluding Custom and Detected).
    #[must_use]
    pub const fn all_predefined() -> &'static [Self] {
        &[
            Self::Ansi,
            Self::Vt100,
            Self::Xterm256Color,
            Self::Rxvt,
            Self::LinuxConsole,
            Self::Cygwin,
            Self::Putty256Color,
            Self::Teraterm,
            Self::IbmColor,
            Self::Dumb,
        ]
    }
}

impl std::str::FromStr for TerminalProfile {
    type Err = ProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ansi" => Ok(Self::Ansi),
            "vt100" | "vt102" | "vt220" => Ok(Self::Vt100),
            "xterm-256color" | "xterm256color" | "xterm" => Ok(Self::Xterm256Color),
            "rxvt" | "rxvt-unicode" | "urxvt" => Ok(Self::Rxvt),
            "linux" | "linux-console" => Ok(Self::LinuxConsole),
            "cygwin" => Ok(Self::Cygwin),
            "putty-256color" | "putty" => Ok(Self::Putty256Color),
            "teraterm" | "tera-term" => Ok(Self::Teraterm),
            "ibm-color" | "ibm" => Ok(Self::IbmColor),
            "dumb" => Ok(Self::Dumb),
            "custom" => Ok(Self::Custom),
            "detected" | "auto" => Ok(Self::Detected),
            _ => Err(ProfileError::UnknownProfile(s.to_owned())),
        }
    }
}

impl std::fmt::Display for TerminalProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CapabilityProfile
// ---------------------------------------------------------------------------

/// Control-sequence templates and quirks of one terminal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CapabilityProfile {
    profile: TerminalProfile,

    // Attribute toggles
    pub bold: Toggle,
    pub dim: Toggle,
    pub italic: Toggle,
    pub underline: Toggle,
    pub blink: Toggle,
    pub reverse: Toggle,
    pub standout: Toggle,
    pub invisible: Toggle,
    pub protected: Toggle,
    pub crossed_out: Toggle,
    pub dbl_underline: Toggle,
    pub alt_charset: Toggle,
    pub pc_charset: Toggle,

    // Combined attribute control
    /// `sgr`: nine parameters (standout, underline, reverse, blink, dim,
    /// bold, invisible, protected, alt charset).
    pub set_attributes: Option<String>,
    /// `sgr0`: turn everything off, including colors.
    pub exit_attribute_mode: Option<String>,

    // Colors
    /// `setaf`: foreground in ANSI palette order.
    pub set_a_foreground: Option<String>,
    /// `setab`: background in ANSI palette order.
    pub set_a_background: Option<String>,
    /// `setf`: foreground in VGA/IBM palette order.
    pub set_foreground: Option<String>,
    /// `setb`: background in VGA/IBM palette order.
    pub set_background: Option<String>,
    /// `scp`: set a color pair (foreground, background).
    pub set_color_pair: Option<String>,
    /// `op`: restore the default color pair.
    pub orig_pair: Option<String>,
    /// `oc`: restore every palette entry.
    pub orig_colors: Option<String>,

    // Quirks
    /// `ncv`: attributes suppressed while a color is set.
    #[cfg_attr(feature = "serde", serde(with = "ncv_bits"))]
    pub no_color_video: NoColorVideo,
    /// `colors`: palette size. Below 8 the terminal is treated as monochrome.
    pub max_color: u16,
    /// ANSI `ESC [ 39 m` / `ESC [ 49 m` select the default colors.
    pub default_color_support: bool,

    /// Key capabilities: two-character termcap name to input sequence.
    pub keys: BTreeMap<String, String>,
}

impl CapabilityProfile {
    // ── Profile Identification ─────────────────────────────────────────

    /// Identifier this profile was created from.
    #[must_use]
    pub const fn profile(&self) -> TerminalProfile {
        self.profile
    }

    /// Profile name, `None` for detected profiles.
    #[must_use]
    pub fn profile_name(&self) -> Option<&'static str> {
        match self.profile {
            TerminalProfile::Detected => None,
            p => Some(p.as_str()),
        }
    }

    /// Create a profile from its identifier.
    #[must_use]
    pub fn from_profile(profile: TerminalProfile) -> Self {
        match profile {
            TerminalProfile::Ansi => Self::ansi(),
            TerminalProfile::Vt100 => Self::vt100(),
            TerminalProfile::Xterm256Color => Self::xterm_256color(),
            TerminalProfile::Rxvt => Self::rxvt(),
            TerminalProfile::LinuxConsole => Self::linux_console(),
            TerminalProfile::Cygwin => Self::cygwin(),
            TerminalProfile::Putty256Color => Self::putty_256color(),
            TerminalProfile::Teraterm => Self::teraterm(),
            TerminalProfile::IbmColor => Self::ibm_color(),
            TerminalProfile::Dumb => Self::dumb(),
            TerminalProfile::Custom => Self::default(),
            TerminalProfile::Detected => Self::detect(),
        }
    }

    /// Create a builder starting from an empty profile.
    #[must_use]
    pub fn builder() -> CapabilityProfileBuilder {
        CapabilityProfileBuilder::new()
    }

    // ── Accessors ──────────────────────────────────────────────────────

    /// Templates of one attribute.
    #[must_use]
    pub const fn toggle(&self, attr: Attribute) -> &Toggle {
        match attr {
            Attribute::Bold => &self.bold,
            Attribute::Dim => &self.dim,
            Attribute::Italic => &self.italic,
            Attribute::Underline => &self.underline,
            Attribute::Blink => &self.blink,
            Attribute::Reverse => &self.reverse,
            Attribute::Standout => &self.standout,
            Attribute::Invisible => &self.invisible,
            Attribute::Protected => &self.protected,
            Attribute::CrossedOut => &self.crossed_out,
            Attribute::DoubleUnderline => &self.dbl_underline,
            Attribute::AltCharset => &self.alt_charset,
            Attribute::PcCharset => &self.pc_charset,
        }
    }

    fn toggle_mut(&mut self, attr: Attribute) -> &mut Toggle {
        match attr {
            Attribute::Bold => &mut self.bold,
            Attribute::Dim => &mut self.dim,
            Attribute::Italic => &mut self.italic,
            Attribute::Underline => &mut self.underline,
            Attribute::Blink => &mut self.blink,
            Attribute::Reverse => &mut self.reverse,
            Attribute::Standout => &mut self.standout,
            Attribute::Invisible => &mut self.invisible,
            Attribute::Protected => &mut self.protected,
            Attribute::CrossedOut => &mut self.crossed_out,
            Attribute::DoubleUnderline => &mut self.dbl_underline,
            Attribute::AltCharset => &mut self.alt_charset,
            Attribute::PcCharset => &mut self.pc_charset,
        }
    }

    /// Fewer than eight colors: color changes produce no output.
    #[must_use]
    pub const fn is_monochrome(&self) -> bool {
        self.max_color < 8
    }

    /// Alternate and PC charsets share an enter or exit sequence.
    #[must_use]
    pub fn charset_equivalent(&self) -> bool {
        let same = |a: &Option<String>, b: &Option<String>| matches!((a, b), (Some(a), Some(b)) if a == b);
        same(&self.alt_charset.enter, &self.pc_charset.enter)
            || same(&self.alt_charset.exit, &self.pc_charset.exit)
    }

    /// Whether the exit template of `attr` resets every attribute and color.
    ///
    /// Charset exits never count; they switch alphabets only.
    #[must_use]
    pub fn exit_resets(&self, attr: Attribute) -> bool {
        if matches!(attr, Attribute::AltCharset | Attribute::PcCharset) {
            return false;
        }
        let Some(cap) = self.toggle(attr).exit.as_deref() else {
            return false;
        };

        if cap.starts_with("\x1b[m") || cap.starts_with("\x1b[0m") || cap.starts_with("\x1bG0") {
            return true;
        }
        if attr != Attribute::Underline
            && self.underline.exit.as_deref() == Some(cap)
            && !cap.starts_with("\x1b[24m")
        {
            return true;
        }
        if attr != Attribute::Standout
            && self.standout.exit.as_deref() == Some(cap)
            && !cap.starts_with("\x1b[27m")
        {
            return true;
        }
        self.exit_attribute_mode.as_deref() == Some(cap)
    }

    /// Every template with its capability name, in a stable order.
    pub fn templates(&self) -> impl Iterator<Item = (&'static str, Option<&str>)> + '_ {
        let toggles = Attribute::ALL.into_iter().flat_map(move |attr| {
            let toggle = self.toggle(attr);
            [
                (attr.enter_name(), toggle.enter.as_deref()),
                (attr.exit_name(), toggle.exit.as_deref()),
            ]
        });
        let others = [
            ("set_attributes", self.set_attributes.as_deref()),
            ("exit_attribute_mode", self.exit_attribute_mode.as_deref()),
            ("set_a_foreground", self.set_a_foreground.as_deref()),
            ("set_a_background", self.set_a_background.as_deref()),
            ("set_foreground", self.set_foreground.as_deref()),
            ("set_background", self.set_background.as_deref()),
            ("set_color_pair", self.set_color_pair.as_deref()),
            ("orig_pair", self.orig_pair.as_deref()),
            ("orig_colors", self.orig_colors.as_deref()),
        ];
        toggles.chain(others)
    }

    /// Check every present template, reporting the first defect.
    pub fn validate(&self) -> Result<(), ProfileError> {
        for (name, template) in self.templates() {
            if let Some(template) = template {
                tparm::validate(template).map_err(|source| ProfileError::InvalidTemplate {
                    capability: name.to_owned(),
                    source,
                })?;
            }
        }
        Ok(())
    }

    /// Load a profile from its JSON description and validate it.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        let mut profile: Self = serde_json::from_str(json)?;
        if matches!(profile.profile, TerminalProfile::Detected) {
            profile.profile = TerminalProfile::Custom;
        }
        profile.validate()?;
        Ok(profile)
    }

    /// Serialize this profile as pretty JSON.
    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, ProfileError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ============================================================================
// Predefined Profiles
// ============================================================================

fn keys(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(name, seq)| ((*name).to_owned(), (*seq).to_owned()))
        .collect()
}

fn some(s: &str) -> Option<String> {
    Some(s.to_owned())
}

const XTERM_KEYS: &[(&str, &str)] = &[
    ("kb", "\x7f"),
    ("ku", "\x1bOA"),
    ("kd", "\x1bOB"),
    ("kr", "\x1bOC"),
    ("kl", "\x1bOD"),
    ("kh", "\x1bOH"),
    ("@7", "\x1bOF"),
    ("kI", "\x1b[2~"),
    ("kD", "\x1b[3~"),
    ("kP", "\x1b[5~"),
    ("kN", "\x1b[6~"),
    ("kB", "\x1b[Z"),
    ("k1", "\x1bOP"),
    ("k2", "\x1bOQ"),
    ("k3", "\x1bOR"),
    ("k4", "\x1bOS"),
    ("k5", "\x1b[15~"),
    ("k6", "\x1b[17~"),
    ("k7", "\x1b[18~"),
    ("k8", "\x1b[19~"),
    ("k9", "\x1b[20~"),
    ("k;", "\x1b[21~"),
    ("F1", "\x1b[23~"),
    ("F2", "\x1b[24~"),
    ("F3", "\x1b[1;2P"),
    ("F4", "\x1b[1;2Q"),
    ("F5", "\x1b[1;2R"),
    ("F6", "\x1b[1;2S"),
    ("kF", "\x1b[1;2B"),
    ("kR", "\x1b[1;2A"),
    ("#4", "\x1b[1;2D"),
    ("%i", "\x1b[1;2C"),
    ("*7", "\x1b[1;2F"),
    ("#2", "\x1b[1;2H"),
    ("@8", "\x1bOM"),
    ("K1", "\x1bOw"),
    ("K3", "\x1bOy"),
    ("K2", "\x1bOu"),
    ("K4", "\x1bOq"),
    ("K5", "\x1bOs"),
];

const LINUX_KEYS: &[(&str, &str)] = &[
    ("kb", "\x7f"),
    ("ku", "\x1b[A"),
    ("kd", "\x1b[B"),
    ("kr", "\x1b[C"),
    ("kl", "\x1b[D"),
    ("kh", "\x1b[1~"),
    ("@7", "\x1b[4~"),
    ("kI", "\x1b[2~"),
    ("kD", "\x1b[3~"),
    ("kP", "\x1b[5~"),
    ("kN", "\x1b[6~"),
    ("kB", "\x1b\t"),
    ("k1", "\x1b[[A"),
    ("k2", "\x1b[[B"),
    ("k3", "\x1b[[C"),
    ("k4", "\x1b[[D"),
    ("k5", "\x1b[[E"),
    ("k6", "\x1b[17~"),
    ("k7", "\x1b[18~"),
    ("k8", "\x1b[19~"),
    ("k9", "\x1b[20~"),
    ("k;", "\x1b[21~"),
    ("F1", "\x1b[23~"),
    ("F2", "\x1b[24~"),
    ("K2", "\x1b[G"),
    ("&7", "\x1a"),
];

const RXVT_KEYS: &[(&str, &str)] = &[
    ("kb", "\x7f"),
    ("ku", "\x1b[A"),
    ("kd", "\x1b[B"),
    ("kr", "\x1b[C"),
    ("kl", "\x1b[D"),
    ("kh", "\x1b[7~"),
    ("@7", "\x1b[8~"),
    ("kI", "\x1b[2~"),
    ("kD", "\x1b[3~"),
    ("kP", "\x1b[5~"),
    ("kN", "\x1b[6~"),
    ("k1", "\x1b[11~"),
    ("k2", "\x1b[12~"),
    ("k3", "\x1b[13~"),
    ("k4", "\x1b[14~"),
    ("k5", "\x1b[15~"),
    ("k6", "\x1b[17~"),
    ("k7", "\x1b[18~"),
    ("k8", "\x1b[19~"),
    ("k9", "\x1b[20~"),
    ("k;", "\x1b[21~"),
    ("F1", "\x1b[23~"),
    ("F2", "\x1b[24~"),
    ("kF", "\x1b[a"),
    ("kR", "\x1b[b"),
    ("#4", "\x1b[d"),
    ("%i", "\x1b[c"),
    ("@0", "\x1b[1~"),
    ("*6", "\x1b[4~"),
];

const PUTTY_KEYS: &[(&str, &str)] = &[
    ("kb", "\x7f"),
    ("ku", "\x1bOA"),
    ("kd", "\x1bOB"),
    ("kr", "\x1bOC"),
    ("kl", "\x1bOD"),
    ("kh", "\x1b[1~"),
    ("@7", "\x1b[4~"),
    ("kI", "\x1b[2~"),
    ("kD", "\x1b[3~"),
    ("kP", "\x1b[5~"),
    ("kN", "\x1b[6~"),
    ("kB", "\x1b[Z"),
    ("k1", "\x1b[11~"),
    ("k2", "\x1b[12~"),
    ("k3", "\x1b[13~"),
    ("k4", "\x1b[14~"),
    ("k5", "\x1b[15~"),
    ("k6", "\x1b[17~"),
    ("k7", "\x1b[18~"),
    ("k8", "\x1b[19~"),
    ("k9", "\x1b[20~"),
    ("k;", "\x1b[21~"),
    ("F1", "\x1b[23~"),
    ("F2", "\x1b[24~"),
];

const VT100_KEYS: &[(&str, &str)] = &[
    ("kb", "\x08"),
    ("ku", "\x1bOA"),
    ("kd", "\x1bOB"),
    ("kr", "\x1bOC"),
    ("kl", "\x1bOD"),
    ("k1", "\x1bOP"),
    ("k2", "\x1bOQ"),
    ("k3", "\x1bOR"),
    ("k4", "\x1bOS"),
    ("K1", "\x1bOq"),
    ("K3", "\x1bOs"),
    ("K2", "\x1bOr"),
    ("K4", "\x1bOp"),
    ("K5", "\x1bOn"),
    ("@8", "\x1bOM"),
];

const ANSI_KEYS: &[(&str, &str)] = &[
    ("kb", "\x08"),
    ("ku", "\x1b[A"),
    ("kd", "\x1b[B"),
    ("kr", "\x1b[C"),
    ("kl", "\x1b[D"),
    ("kh", "\x1b[H"),
    ("kI", "\x1b[L"),
    ("kB", "\x1b[Z"),
    ("k1", "\x1b[M"),
    ("k2", "\x1b[N"),
    ("k3", "\x1b[O"),
    ("k4", "\x1b[P"),
    ("k5", "\x1b[Q"),
    ("k6", "\x1b[R"),
    ("k7", "\x1b[S"),
    ("k8", "\x1b[T"),
    ("k9", "\x1b[U"),
    ("k;", "\x1b[V"),
];

const XTERM_256_SETAF: &str = "\x1b[%?%p1%{8}%<%t3%p1%d%e%p1%{16}%<%t9%p1%{8}%-%d%e38;5;%p1%d%;m";
const XTERM_256_SETAB: &str =
    "\x1b[%?%p1%{8}%<%t4%p1%d%e%p1%{16}%<%t10%p1%{8}%-%d%e48;5;%p1%d%;m";

impl CapabilityProfile {
    // ── Predefined Profiles ────────────────────────────────────────────

    /// ANSI terminal with 8 colors and a combined SGR template.
    #[must_use]
    pub fn ansi() -> Self {
        Self {
            profile: TerminalProfile::Ansi,
            bold: Toggle::new(Some("\x1b[1m"), Some("\x1b[0m")),
            dim: Toggle::new(None, Some("\x1b[0m")),
            italic: Toggle::default(),
            underline: Toggle::new(Some("\x1b[4m"), Some("\x1b[24m")),
            blink: Toggle::new(Some("\x1b[5m"), Some("\x1b[0m")),
            reverse: Toggle::new(Some("\x1b[7m"), Some("\x1b[0m")),
            standout: Toggle::new(Some("\x1b[7m"), Some("\x1b[m")),
            invisible: Toggle::new(Some("\x1b[8m"), Some("\x1b[0m")),
            protected: Toggle::new(None, Some("\x1b[0m")),
            crossed_out: Toggle::new(None, Some("\x1b[0m")),
            dbl_underline: Toggle::default(),
            alt_charset: Toggle::new(Some("\x1b[11m"), Some("\x1b[10m")),
            pc_charset: Toggle::new(Some("\x1b[11m"), Some("\x1b[10m")),
            set_attributes: some(
                "\x1b[0;10%?%p1%t;7%;%?%p2%t;4%;%?%p3%t;7%;%?%p4%t;5%;%?%p6%t;1%;%?%p7%t;8%;%?%p9%t;11%;m",
            ),
            exit_attribute_mode: some("\x1b[0m"),
            set_a_foreground: some("\x1b[3%p1%dm"),
            set_a_background: some("\x1b[4%p1%dm"),
            set_foreground: None,
            set_background: None,
            set_color_pair: None,
            orig_pair: some("\x1b[39;49m"),
            orig_colors: None,
            no_color_video: NoColorVideo::STANDOUT | NoColorVideo::UNDERLINE,
            max_color: 8,
            default_color_support: true,
            keys: keys(ANSI_KEYS),
        }
    }

    /// DEC VT100: monochrome, every attribute code padded with `$<2>`.
    #[must_use]
    pub fn vt100() -> Self {
        Self {
            profile: TerminalProfile::Vt100,
            bold: Toggle::new(Some("\x1b[1m$<2>"), Some("\x1b[0m$<2>")),
            dim: Toggle::new(None, Some("\x1b[0m$<2>")),
            italic: Toggle::default(),
            underline: Toggle::new(Some("\x1b[4m$<2>"), Some("\x1b[m$<2>")),
            blink: Toggle::new(Some("\x1b[5m$<2>"), Some("\x1b[0m$<2>")),
            reverse: Toggle::new(Some("\x1b[7m$<2>"), Some("\x1b[0m$<2>")),
            standout: Toggle::new(Some("\x1b[7m$<2>"), Some("\x1b[m$<2>")),
            invisible: Toggle::new(None, Some("\x1b[0m$<2>")),
            protected: Toggle::new(None, Some("\x1b[0m$<2>")),
            crossed_out: Toggle::new(None, Some("\x1b[0m$<2>")),
            dbl_underline: Toggle::default(),
            alt_charset: Toggle::new(Some("\x0e"), Some("\x0f")),
            pc_charset: Toggle::default(),
            set_attributes: some(
                "\x1b[0%?%p1%p6%|%t;1%;%?%p2%t;4%;%?%p1%p3%|%t;7%;%?%p4%t;5%;m%?%p9%t\x0e%e\x0f%;$<2>",
            ),
            exit_attribute_mode: some("\x1b[0m$<2>"),
            set_a_foreground: some("\x1b[3%p1%dm"),
            set_a_background: some("\x1b[4%p1%dm"),
            set_foreground: None,
            set_background: None,
            set_color_pair: None,
            orig_pair: None,
            orig_colors: None,
            no_color_video: NoColorVideo::empty(),
            max_color: 1,
            default_color_support: false,
            keys: keys(VT100_KEYS),
        }
    }

    /// xterm with 256 colors.
    #[must_use]
    pub fn xterm_256color() -> Self {
        Self {
            profile: TerminalProfile::Xterm256Color,
            bold: Toggle::new(Some("\x1b[1m"), Some("\x1b[22m")),
            dim: Toggle::new(Some("\x1b[2m"), Some("\x1b[22m")),
            italic: Toggle::new(Some("\x1b[3m"), Some("\x1b[23m")),
            underline: Toggle::new(Some("\x1b[4m"), Some("\x1b[24m")),
            blink: Toggle::new(Some("\x1b[5m"), Some("\x1b[25m")),
            reverse: Toggle::new(Some("\x1b[7m"), Some("\x1b[27m")),
            standout: Toggle::new(Some("\x1b[7m"), Some("\x1b[27m")),
            invisible: Toggle::new(Some("\x1b[8m"), Some("\x1b[28m")),
            protected: Toggle::new(None, Some("\x1b[0m")),
            crossed_out: Toggle::new(Some("\x1b[9m"), Some("\x1b[29m")),
            dbl_underline: Toggle::new(Some("\x1b[21m"), Some("\x1b[24m")),
            alt_charset: Toggle::new(Some("\x1b(0"), Some("\x1b(B")),
            pc_charset: Toggle::default(),
            set_attributes: some(
                "%?%p9%t\x1b(0%e\x1b(B%;\x1b[0%?%p6%t;1%;%?%p5%t;2%;%?%p2%t;4%;%?%p1%p3%|%t;7%;%?%p4%t;5%;%?%p7%t;8%;m",
            ),
            exit_attribute_mode: some("\x1b[0m"),
            set_a_foreground: some(XTERM_256_SETAF),
            set_a_background: some(XTERM_256_SETAB),
            set_foreground: None,
            set_background: None,
            set_color_pair: None,
            orig_pair: some("\x1b[39;49m"),
            orig_colors: None,
            no_color_video: NoColorVideo::empty(),
            max_color: 256,
            default_color_support: true,
            keys: keys(XTERM_KEYS),
        }
    }

    /// rxvt with 8 colors.
    #[must_use]
    pub fn rxvt() -> Self {
        Self {
            profile: TerminalProfile::Rxvt,
            bold: Toggle::new(Some("\x1b[1m"), Some("\x1b[22m")),
            dim: Toggle::new(None, Some("\x1b[22m")),
            italic: Toggle::default(),
            underline: Toggle::new(Some("\x1b[4m"), Some("\x1b[24m")),
            blink: Toggle::new(Some("\x1b[5m"), Some("\x1b[25m")),
            reverse: Toggle::new(Some("\x1b[7m"), Some("\x1b[27m")),
            standout: Toggle::new(Some("\x1b[7m"), Some("\x1b[27m")),
            invisible: Toggle::new(None, Some("\x1b[28m")),
            protected: Toggle::new(None, Some("\x1b[0m")),
            crossed_out: Toggle::new(Some("\x1b[9m"), Some("\x1b[29m")),
            dbl_underline: Toggle::new(Some("\x1b[21m"), Some("\x1b[24m")),
            alt_charset: Toggle::new(Some("\x0e"), Some("\x0f")),
            pc_charset: Toggle::default(),
            set_attributes: some(
                "\x1b[0%?%p6%t;1%;%?%p2%t;4%;%?%p1%p3%|%t;7%;%?%p4%t;5%;m%?%p9%t\x0e%e\x0f%;",
            ),
            exit_attribute_mode: some("\x1b[0m"),
            set_a_foreground: some("\x1b[3%p1%dm"),
            set_a_background: some("\x1b[4%p1%dm"),
            set_foreground: None,
            set_background: None,
            set_color_pair: None,
            orig_pair: some("\x1b[39;49m"),
            orig_colors: None,
            no_color_video: NoColorVideo::empty(),
            max_color: 8,
            default_color_support: true,
            keys: keys(RXVT_KEYS),
        }
    }

    /// Linux virtual console with 16 colors.
    #[must_use]
    pub fn linux_console() -> Self {
        Self {
            profile: TerminalProfile::LinuxConsole,
            bold: Toggle::new(Some("\x1b[1m"), Some("\x1b[22m")),
            dim: Toggle::default(),
            italic: Toggle::default(),
            underline: Toggle::default(),
            blink: Toggle::new(Some("\x1b[5m"), Some("\x1b[25m")),
            reverse: Toggle::new(Some("\x1b[7m"), Some("\x1b[27m")),
            standout: Toggle::new(Some("\x1b[7m"), Some("\x1b[27m")),
            invisible: Toggle::default(),
            protected: Toggle::default(),
            crossed_out: Toggle::default(),
            dbl_underline: Toggle::default(),
            alt_charset: Toggle::new(Some("\x0e"), Some("\x0f")),
            pc_charset: Toggle::new(Some("\x1b[11m"), Some("\x1b[10m")),
            set_attributes: some(
                "\x1b[0%?%p6%|%t;1%;%?%p1%p3%|%t;7%;%?%p4%t;5%;m%?%p9%t\x0e%e\x0f%;",
            ),
            exit_attribute_mode: some("\x1b[0m\x0f"),
            set_a_foreground: some("\x1b[3%p1%{8}%m%d%?%p1%{7}%>%t;1%e;22%;m"),
            set_a_background: some("\x1b[4%p1%{8}%m%d%?%p1%{7}%>%t;5%e;25%;m"),
            set_foreground: None,
            set_background: None,
            set_color_pair: None,
            orig_pair: some("\x1b[39;49;25m"),
            orig_colors: some("\x1b]R"),
            no_color_video: NoColorVideo::UNDERLINE | NoColorVideo::DIM,
            max_color: 16,
            default_color_support: true,
            keys: keys(LINUX_KEYS),
        }
    }

    /// Cygwin console: the Linux console sequences under another name.
    #[must_use]
    pub fn cygwin() -> Self {
        let mut profile = Self::linux_console();
        profile.profile = TerminalProfile::Cygwin;
        profile.keys.insert("kb".to_owned(), "\x08".to_owned());
        profile
    }

    /// PuTTY with 256 colors and no default-color support.
    #[must_use]
    pub fn putty_256color() -> Self {
        Self {
            profile: TerminalProfile::Putty256Color,
            bold: Toggle::new(Some("\x1b[1m"), Some("\x1b[22m")),
            dim: Toggle::new(Some("\x1b[2m"), Some("\x1b[22m")),
            italic: Toggle::default(),
            underline: Toggle::new(Some("\x1b[4m"), Some("\x1b[24m")),
            blink: Toggle::new(Some("\x1b[5m"), Some("\x1b[25m")),
            reverse: Toggle::new(Some("\x1b[7m"), Some("\x1b[27m")),
            standout: Toggle::new(Some("\x1b[7m"), Some("\x1b[27m")),
            invisible: Toggle::new(None, Some("\x1b[28m")),
            protected: Toggle::new(None, Some("\x1b[0m")),
            crossed_out: Toggle::new(Some("\x1b[9m"), Some("\x1b[29m")),
            dbl_underline: Toggle::new(Some("\x1b[21m"), Some("\x1b[24m")),
            alt_charset: Toggle::new(Some("\x0e"), Some("\x0f")),
            pc_charset: Toggle::new(Some("\x1b[11m"), Some("\x1b[10m")),
            set_attributes: some(
                "\x1b[0%?%p1%p6%|%t;1%;%?%p5%t;2%;%?%p2%t;4%;%?%p1%p3%|%t;7%;%?%p4%t;5%;m%?%p9%t\x0e%e\x0f%;",
            ),
            exit_attribute_mode: some("\x1b[0m"),
            set_a_foreground: some(XTERM_256_SETAF),
            set_a_background: some(XTERM_256_SETAB),
            set_foreground: None,
            set_background: None,
            set_color_pair: None,
            orig_pair: some("\x1b[39;49m"),
            orig_colors: some("\x1b]R"),
            no_color_video: NoColorVideo::empty(),
            max_color: 256,
            default_color_support: false,
            keys: keys(PUTTY_KEYS),
        }
    }

    /// Tera Term with 16 colors and no default-color support.
    #[must_use]
    pub fn teraterm() -> Self {
        Self {
            profile: TerminalProfile::Teraterm,
            bold: Toggle::new(Some("\x1b[1m"), Some("\x1b[22m")),
            dim: Toggle::new(None, Some("\x1b[22m")),
            italic: Toggle::default(),
            underline: Toggle::new(Some("\x1b[4m"), Some("\x1b[24m")),
            blink: Toggle::new(Some("\x1b[5m"), Some("\x1b[25m")),
            reverse: Toggle::new(Some("\x1b[7m"), Some("\x1b[27m")),
            standout: Toggle::new(Some("\x1b[7m"), Some("\x1b[27m")),
            invisible: Toggle::new(None, Some("\x1b[28m")),
            protected: Toggle::new(None, Some("\x1b[0m$<2>")),
            crossed_out: Toggle::new(Some("\x1b[9m"), Some("\x1b[29m")),
            dbl_underline: Toggle::new(Some("\x1b[21m"), Some("\x1b[24m")),
            alt_charset: Toggle::new(Some("\x0e"), Some("\x0f")),
            pc_charset: Toggle::default(),
            set_attributes: some(
                "\x1b[0%?%p1%p6%|%t;1%;%?%p2%t;4%;%?%p1%p3%|%t;7%;%?%p4%t;5%;m%?%p9%t\x0e%e\x0f%;$<2>",
            ),
            exit_attribute_mode: some("\x1b[0m$<2>"),
            set_a_foreground: some("\x1b[38;5;%p1%dm"),
            set_a_background: some("\x1b[48;5;%p1%dm"),
            set_foreground: None,
            set_background: None,
            set_color_pair: None,
            orig_pair: some("\x1b[39;49m"),
            orig_colors: None,
            no_color_video: NoColorVideo::STANDOUT | NoColorVideo::BLINK | NoColorVideo::BOLD,
            max_color: 16,
            default_color_support: false,
            keys: keys(XTERM_KEYS),
        }
    }

    /// Terminal with only VGA-ordered `setf`/`setb` color templates.
    #[must_use]
    pub fn ibm_color() -> Self {
        Self {
            profile: TerminalProfile::IbmColor,
            set_foreground: some(
                "\x1b[%?%p1%{0}%=%t30m%e%p1%{1}%=%t31m%e%p1%{2}%=%t32m%e%p1%{3}%=%t33m\
                 %e%p1%{4}%=%t34m%e%p1%{5}%=%t35m%e%p1%{6}%=%t36m%e%p1%{7}%=%t97m%;",
            ),
            set_background: some(
                "\x1b[%?%p1%{0}%=%t40m%e%p1%{1}%=%t41m%e%p1%{2}%=%t42m%e%p1%{3}%=%t43m\
                 %e%p1%{4}%=%t44m%e%p1%{5}%=%t45m%e%p1%{6}%=%t46m%e%p1%{7}%=%t107m%;",
            ),
            orig_pair: some("\x1b[32;40m"),
            no_color_video: NoColorVideo::STANDOUT | NoColorVideo::UNDERLINE,
            max_color: 8,
            default_color_support: false,
            keys: keys(ANSI_KEYS),
            ..Self::default()
        }
    }

    /// No capabilities at all.
    #[must_use]
    pub fn dumb() -> Self {
        Self {
            profile: TerminalProfile::Dumb,
            ..Self::default()
        }
    }
}

// ============================================================================
// Capability Profile Builder
// ============================================================================

/// Builder for custom capability profiles.
///
/// ```
/// use opterm_core::capabilities::{CapabilityProfileBuilder, TerminalProfile};
///
/// let profile = CapabilityProfileBuilder::from_profile(TerminalProfile::Xterm256Color)
///     .default_color_support(false)
///     .build();
/// assert!(!profile.default_color_support);
/// assert_eq!(profile.max_color, 256);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CapabilityProfileBuilder {
    profile: CapabilityProfile,
}

impl CapabilityProfileBuilder {
    /// Start from an empty profile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a predefined profile.
    #[must_use]
    pub fn from_profile(profile: TerminalProfile) -> Self {
        let mut profile = CapabilityProfile::from_profile(profile);
        profile.profile = TerminalProfile::Custom;
        Self { profile }
    }

    /// Finish without validating templates.
    #[must_use]
    pub fn build(self) -> CapabilityProfile {
        self.profile
    }

    /// Finish, rejecting the first malformed template.
    pub fn try_build(self) -> Result<CapabilityProfile, ProfileError> {
        self.profile.validate()?;
        Ok(self.profile)
    }

    // ── Attributes ─────────────────────────────────────────────────────

    /// Set (or clear, with `None`) both templates of an attribute.
    #[must_use]
    pub fn toggle(mut self, attr: Attribute, enter: Option<&str>, exit: Option<&str>) -> Self {
        *self.profile.toggle_mut(attr) = Toggle::new(enter, exit);
        self
    }

    /// Set the combined nine-parameter attribute template.
    #[must_use]
    pub fn set_attributes(mut self, template: impl Into<String>) -> Self {
        self.profile.set_attributes = Some(template.into());
        self
    }

    /// Set the full reset template.
    #[must_use]
    pub fn exit_attribute_mode(mut self, template: impl Into<String>) -> Self {
        self.profile.exit_attribute_mode = Some(template.into());
        self
    }

    // ── Colors ─────────────────────────────────────────────────────────

    /// Set the ANSI-ordered foreground template.
    #[must_use]
    pub fn set_a_foreground(mut self, template: impl Into<String>) -> Self {
        self.profile.set_a_foreground = Some(template.into());
        self
    }

    /// Set the ANSI-ordered background template.
    #[must_use]
    pub fn set_a_background(mut self, template: impl Into<String>) -> Self {
        self.profile.set_a_background = Some(template.into());
        self
    }

    /// Set the VGA-ordered foreground template.
    #[must_use]
    pub fn set_foreground(mut self, template: impl Into<String>) -> Self {
        self.profile.set_foreground = Some(template.into());
        self
    }

    /// Set the VGA-ordered background template.
    #[must_use]
    pub fn set_background(mut self, template: impl Into<String>) -> Self {
        self.profile.set_background = Some(template.into());
        self
    }

    /// Set the color-pair template.
    #[must_use]
    pub fn set_color_pair(mut self, template: impl Into<String>) -> Self {
        self.profile.set_color_pair = Some(template.into());
        self
    }

    /// Set the default color-pair template.
    #[must_use]
    pub fn orig_pair(mut self, template: impl Into<String>) -> Self {
        self.profile.orig_pair = Some(template.into());
        self
    }

    /// Set the palette reset template.
    #[must_use]
    pub fn orig_colors(mut self, template: impl Into<String>) -> Self {
        self.profile.orig_colors = Some(template.into());
        self
    }

    // ── Quirks ─────────────────────────────────────────────────────────

    /// Set the no-color-video mask from raw terminfo bits.
    #[must_use]
    pub fn no_color_video(mut self, bits: u16) -> Self {
        self.profile.no_color_video = NoColorVideo::from_bits_truncate(bits);
        self
    }

    /// Set the palette size.
    #[must_use]
    pub fn max_color(mut self, colors: u16) -> Self {
        self.profile.max_color = colors;
        self
    }

    /// Declare support for the ANSI default-color codes.
    #[must_use]
    pub fn default_color_support(mut self, enabled: bool) -> Self {
        self.profile.default_color_support = enabled;
        self
    }

    // ── Keys ───────────────────────────────────────────────────────────

    /// Add a key capability (two-character termcap name).
    #[must_use]
    pub fn key(mut self, name: impl Into<String>, sequence: impl Into<String>) -> Self {
        self.profile.keys.insert(name.into(), sequence.into());
        self
    }
}

// ============================================================================
// Detection
// ============================================================================

#[derive(Debug, Clone, Default)]
struct DetectInputs {
    term: String,
    no_color: bool,
}

impl DetectInputs {
    fn from_env() -> Self {
        Self {
            term: env::var("TERM").unwrap_or_default(),
            no_color: env::var("NO_COLOR").is_ok(),
        }
    }
}

impl CapabilityProfile {
    /// Pick a predefined profile from `TERM`, honoring `NO_COLOR`.
    #[must_use]
    pub fn detect() -> Self {
        Self::detect_from_inputs(&DetectInputs::from_env())
    }

    fn detect_from_inputs(env: &DetectInputs) -> Self {
        let term = env.term.to_ascii_lowercase();
        let base = if term.is_empty() || term == "dumb" {
            TerminalProfile::Dumb
        } else if term.starts_with("putty") {
            TerminalProfile::Putty256Color
        } else if term.starts_with("rxvt") || term.starts_with("urxvt") {
            TerminalProfile::Rxvt
        } else if term.starts_with("linux") {
            TerminalProfile::LinuxConsole
        } else if term.starts_with("cygwin") {
            TerminalProfile::Cygwin
        } else if term.starts_with("teraterm") {
            TerminalProfile::Teraterm
        } else if term.starts_with("vt1") || term.starts_with("vt2") {
            TerminalProfile::Vt100
        } else if term.starts_with("xterm") || term.contains("256color") {
            TerminalProfile::Xterm256Color
        } else {
            TerminalProfile::Ansi
        };

        let mut profile = Self::from_profile(base);
        profile.profile = TerminalProfile::Detected;
        if env.no_color {
            profile.strip_colors();
        }
        crate::debug!(
            term = %env.term,
            base = %base,
            no_color = env.no_color,
            "capability profile detected"
        );
        profile
    }

    fn strip_colors(&mut self) {
        self.set_a_foreground = None;
        self.set_a_background = None;
        self.set_foreground = None;
        self.set_background = None;
        self.set_color_pair = None;
        self.max_color = 0;
    }
}
