#![forbid(unsafe_code)]

//! Render kernel: cell attribute state and the attribute-sequence optimizer.
//!
//! ```
//! use opterm_core::capabilities::CapabilityProfile;
//! use opterm_render::cell::{AttrFlags, CellState};
//! use opterm_render::color::Color;
//! use opterm_render::opti_attr::AttributeOptimizer;
//!
//! let optimizer = AttributeOptimizer::new(CapabilityProfile::ansi());
//! let mut term = CellState::new();
//! let target = CellState::new().with_fg(Color::RED).with_bg(Color::BLACK);
//!
//! let bytes = optimizer.change_attribute(&mut term, &target);
//! assert_eq!(bytes.as_deref(), Some(&b"\x1b[31m\x1b[40m"[..]));
//! assert!(term.same_style(&target));
//! ```

pub mod cell;
pub mod color;
pub mod opti_attr;

pub use cell::{AttrFlags, CellState};
pub use color::Color;
pub use opti_attr::AttributeOptimizer;
