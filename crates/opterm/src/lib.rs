#![forbid(unsafe_code)]

//! opterm public facade crate.
//!
//! Re-exports the terminal profile, the attribute optimizer and the key
//! decoder from the internal crates, plus a prelude for day-to-day usage.
//!
//! ```
//! use opterm::prelude::*;
//!
//! let profile: TerminalProfile = "xterm-256color".parse()?;
//! let caps = CapabilityProfile::from_profile(profile);
//!
//! let optimizer = AttributeOptimizer::new(caps.clone());
//! let mut term = CellState::new();
//! let bytes = optimizer.change_attribute(&mut term, &CellState::new().with_fg(Color::RED));
//! assert_eq!(bytes.as_deref(), Some(&b"\x1b[31m"[..]));
//!
//! let decoder = KeyDecoder::new(&caps);
//! assert_eq!(decoder.decode(b"\x1b[1;3A").key(), Some(Key::new(KeyCode::Up).with_modifiers(Modifiers::META)));
//! # Ok::<(), opterm::Error>(())
//! ```

// --- Core re-exports -------------------------------------------------------

pub use opterm_core::capabilities::{
    Attribute, CapabilityProfile, CapabilityProfileBuilder, NoColorVideo, ProfileError,
    TerminalProfile, Toggle,
};
pub use opterm_core::key::{Key, KeyCode, Modifiers};
pub use opterm_core::key_decoder::{KeyDecoder, KeyResult};
pub use opterm_core::key_reader::{KeyAction, KeyReader, KeyReaderConfig};
pub use opterm_core::tparm::TemplateError;

// --- Render re-exports -----------------------------------------------------

pub use opterm_render::cell::{AttrFlags, CellState};
pub use opterm_render::color::{Color, vga_to_ansi};
pub use opterm_render::opti_attr::AttributeOptimizer;

// --- Errors ---------------------------------------------------------------

/// Top-level error type for opterm.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A capability template failed to evaluate or validate.
    #[error(transparent)]
    Template(#[from] TemplateError),
    /// A profile could not be named, loaded or validated.
    #[error(transparent)]
    Profile(#[from] ProfileError),
}

/// Standard result type for opterm APIs.
pub type Result<T> = std::result::Result<T, Error>;

/// Evaluate a capability template, surfacing defects as [`Error`].
pub fn tparm(template: &str, params: &[i32]) -> Result<Vec<u8>> {
    Ok(opterm_core::tparm::try_evaluate(template, params)?)
}

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        AttrFlags, Attribute, AttributeOptimizer, CapabilityProfile, CapabilityProfileBuilder,
        CellState, Color, Error, Key, KeyAction, KeyCode, KeyDecoder, KeyReader,
        KeyReaderConfig, KeyResult, Modifiers, Result, TerminalProfile,
    };

    pub use crate::{core, render};
}

pub use opterm_core as core;
pub use opterm_render as render;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_profile_converts_to_error() {
        let err: Error = "nope-term".parse::<TerminalProfile>().unwrap_err().into();
        assert!(matches!(err, Error::Profile(ProfileError::UnknownProfile(_))));
    }

    #[test]
    fn template_errors_surface() {
        assert_eq!(tparm("\x1b[3%p1%dm", &[2]).unwrap(), b"\x1b[32m");
        assert!(matches!(tparm("%p0", &[]), Err(Error::Template(_))));
    }

    #[test]
    fn builder_rejects_malformed_template() {
        let err: Error = CapabilityProfileBuilder::new()
            .set_a_foreground("\x1b[3%p1%Qm")
            .try_build()
            .unwrap_err()
            .into();
        assert!(matches!(
            err,
            Error::Profile(ProfileError::InvalidTemplate { .. })
        ));
    }
}
