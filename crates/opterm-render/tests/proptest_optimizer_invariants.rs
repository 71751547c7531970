//! Property-based invariant tests for the attribute optimizer.
//!
//! For every predefined profile and any pair of cell states:
//!
//! 1. After a change the model matches the target (convergence).
//! 2. Repeating the change writes nothing (idempotence).
//! 3. An invisible target always blanks the character.
//! 4. Monochrome profiles never emit color templates.
//! 5. Attributes in the no-color-video mask are never entered or exited
//!    under color.

use opterm_core::capabilities::{Attribute, CapabilityProfile, CapabilityProfileBuilder, TerminalProfile};
use opterm_render::cell::{AttrFlags, CellState};
use opterm_render::color::Color;
use opterm_render::opti_attr::AttributeOptimizer;
use proptest::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────────

fn color_strategy() -> impl Strategy<Value = Color> {
    prop_oneof![
        2 => Just(Color::Default),
        3 => (0u16..16).prop_map(Color::Indexed),
        1 => (16u16..256).prop_map(Color::Indexed),
    ]
}

fn cell_strategy() -> impl Strategy<Value = CellState> {
    (
        color_strategy(),
        color_strategy(),
        any::<u16>(),
        proptest::char::range('a', 'z'),
    )
        .prop_map(|(fg, bg, bits, c)| CellState {
            character: c,
            fg,
            bg,
            attrs: AttrFlags::from_bits_truncate(bits),
        })
}

fn profile_strategy() -> impl Strategy<Value = CapabilityProfile> {
    proptest::sample::select(TerminalProfile::all_predefined().to_vec())
        .prop_map(CapabilityProfile::from_profile)
}

// ═════════════════════════════════════════════════════════════════════════
// 1-3. Convergence, idempotence, invisibility
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn change_converges_and_is_idempotent(
        profile in profile_strategy(),
        from in cell_strategy(),
        to in cell_strategy(),
    ) {
        let optimizer = AttributeOptimizer::new(profile);
        let mut term = from;
        let _ = optimizer.change_attribute(&mut term, &to);

        prop_assert!(term.same_style(&to), "model {:?} != target {:?}", term, to);
        if to.attrs.contains(AttrFlags::INVISIBLE) {
            prop_assert_eq!(term.character, ' ');
        } else {
            prop_assert_eq!(term.character, from.character);
        }
        prop_assert_eq!(optimizer.change_attribute(&mut term, &to), None);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Monochrome profiles stay colorless
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn monochrome_never_writes_color(from in cell_strategy(), to in cell_strategy()) {
        let profile = CapabilityProfileBuilder::new()
            .set_a_foreground("<fg %p1%d>")
            .set_a_background("<bg %p1%d>")
            .orig_pair("<op>")
            .max_color(2)
            .build();
        let optimizer = AttributeOptimizer::new(profile);
        let mut term = from;
        let out = optimizer.change_attribute(&mut term, &to).unwrap_or_default();
        let text = String::from_utf8_lossy(&out);
        prop_assert!(!text.contains("<fg") && !text.contains("<bg") && !text.contains("<op>"));
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. No-color-video suppression
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn suppressed_attribute_untouched_under_color(
        from in cell_strategy(),
        to in cell_strategy(),
    ) {
        let profile = CapabilityProfileBuilder::new()
            .toggle(Attribute::Underline, Some("<ul>"), Some("</ul>"))
            .toggle(Attribute::Bold, Some("<b>"), Some("</b>"))
            .set_a_foreground("<fg>")
            .set_a_background("<bg>")
            .no_color_video(2)
            .max_color(256)
            .default_color_support(true)
            .build();
        let optimizer = AttributeOptimizer::new(profile);
        let mut term = from;
        let out = optimizer.change_attribute(&mut term, &to).unwrap_or_default();
        if to.has_color() {
            let text = String::from_utf8_lossy(&out);
            prop_assert!(!text.contains("<ul>"), "entered under color: {}", text);
            prop_assert!(!text.contains("</ul>"), "exited under color: {}", text);
        }
    }
}
