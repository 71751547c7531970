//! Attribute and color transitions on every predefined terminal profile.
//!
//! Each case feeds one `from -> to` transition through a fresh optimizer and
//! checks the exact byte output.

use opterm_core::capabilities::{Attribute, CapabilityProfile, CapabilityProfileBuilder};
use opterm_render::cell::{AttrFlags, CellState};
use opterm_render::color::Color;
use opterm_render::opti_attr::AttributeOptimizer;

// ── Helpers ─────────────────────────────────────────────────────────────

fn change(profile: &CapabilityProfile, mut from: CellState, to: CellState) -> Option<String> {
    let optimizer = AttributeOptimizer::new(profile.clone());
    let out = optimizer.change_attribute(&mut from, &to);
    assert!(from.same_style(&to), "state did not converge: {from:?} vs {to:?}");
    out.map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}

fn attrs(flags: AttrFlags) -> CellState {
    CellState::new().with_attrs(flags)
}

fn colors(fg: Color, bg: Color) -> CellState {
    CellState::new().with_fg(fg).with_bg(bg)
}

fn normal() -> CellState {
    CellState::new()
}

fn xterm_without_sgr() -> CapabilityProfile {
    let mut profile = CapabilityProfile::xterm_256color();
    profile.set_attributes = None;
    profile
}

// ═════════════════════════════════════════════════════════════════════════
// ANSI
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn ansi_attribute_transitions() {
    let p = CapabilityProfile::ansi();
    let cases = [
        (normal(), attrs(AttrFlags::BOLD), "\x1b[0m\x1b[0;10;1m"),
        (attrs(AttrFlags::BOLD), normal(), "\x1b[0m"),
        (normal(), attrs(AttrFlags::ALT_CHARSET), "\x1b[0m\x1b[0;10;11m"),
        (attrs(AttrFlags::ALT_CHARSET), normal(), "\x1b[0m\x1b[10m"),
        (normal(), attrs(AttrFlags::PC_CHARSET), "\x1b[0m\x1b[0;10m\x1b[11m"),
        (attrs(AttrFlags::PC_CHARSET), normal(), "\x1b[0m\x1b[10m"),
        (normal(), attrs(AttrFlags::ITALIC), "\x1b[0m\x1b[0;10m"),
    ];
    for (from, to, expected) in cases {
        assert_eq!(change(&p, from, to).as_deref(), Some(expected), "{from:?} -> {to:?}");
    }
}

#[test]
fn ansi_equivalent_charsets_share_one_sequence() {
    let p = CapabilityProfile::ansi();
    let both = AttrFlags::ALT_CHARSET | AttrFlags::PC_CHARSET;
    assert_eq!(
        change(&p, normal(), attrs(both)).as_deref(),
        Some("\x1b[0m\x1b[0;10;11m")
    );
    assert_eq!(change(&p, attrs(both), normal()).as_deref(), Some("\x1b[0m\x1b[10m"));
}

#[test]
fn ansi_all_combined_attributes() {
    let p = CapabilityProfile::ansi();
    let to = attrs(
        AttrFlags::STANDOUT
            | AttrFlags::UNDERLINE
            | AttrFlags::REVERSE
            | AttrFlags::BLINK
            | AttrFlags::DIM
            | AttrFlags::BOLD
            | AttrFlags::INVISIBLE
            | AttrFlags::PROTECTED
            | AttrFlags::ALT_CHARSET,
    );
    assert_eq!(
        change(&p, normal(), to).as_deref(),
        Some("\x1b[0m\x1b[0;10;7;4;7;5;1;8;11m")
    );
}

#[test]
fn ansi_colors() {
    let p = CapabilityProfile::ansi();
    let cases = [
        (normal(), colors(Color::RED, Color::BLACK), "\x1b[31m\x1b[40m"),
        (normal(), colors(Color::CYAN, Color::BLUE), "\x1b[36m\x1b[44m"),
        (normal(), colors(Color::SPRING_GREEN3, Color::NAVY_BLUE), "\x1b[32m\x1b[44m"),
        (colors(Color::RED, Color::BLACK), normal(), "\x1b[39;49m"),
        (colors(Color::GREEN, Color::Default), normal(), "\x1b[39m"),
        (colors(Color::Default, Color::BLUE), normal(), "\x1b[49m"),
    ];
    for (from, to, expected) in cases {
        assert_eq!(change(&p, from, to).as_deref(), Some(expected), "{from:?} -> {to:?}");
    }
}

#[test]
fn ansi_attributes_with_colors() {
    let p = CapabilityProfile::ansi();
    assert_eq!(
        change(&p, normal(), attrs(AttrFlags::BOLD).with_fg(Color::RED)).as_deref(),
        Some("\x1b[0m\x1b[0;10;1m\x1b[31m")
    );
    assert_eq!(
        change(
            &p,
            attrs(AttrFlags::BOLD).with_fg(Color::RED),
            attrs(AttrFlags::BOLD).with_fg(Color::BLUE)
        )
        .as_deref(),
        Some("\x1b[34m")
    );
}

#[test]
fn ansi_bold_then_colored_dim_italic() {
    let optimizer = AttributeOptimizer::new(CapabilityProfile::ansi());
    let mut term = normal();

    let bold = attrs(AttrFlags::BOLD);
    let out = optimizer.change_attribute(&mut term, &bold).expect("changed");
    assert_eq!(out, b"\x1b[0m\x1b[0;10;1m");

    let next = attrs(AttrFlags::DIM | AttrFlags::ITALIC).with_fg(Color::BLUE).with_bg(Color::WHITE);
    let out = optimizer.change_attribute(&mut term, &next).expect("changed");
    assert_eq!(out, b"\x1b[0m\x1b[0;10m\x1b[34m\x1b[47m");
    assert_eq!(term, next);
}

#[test]
fn ansi_bold_kept_while_adding_colored_dim_italic() {
    let optimizer = AttributeOptimizer::new(CapabilityProfile::ansi());
    let mut term = attrs(AttrFlags::BOLD);
    let next = attrs(AttrFlags::BOLD | AttrFlags::DIM | AttrFlags::ITALIC)
        .with_fg(Color::BLUE)
        .with_bg(Color::WHITE);
    let out = optimizer.change_attribute(&mut term, &next).expect("changed");
    assert_eq!(out, b"\x1b[0m\x1b[0;10;1m\x1b[34m\x1b[47m");
    assert_eq!(term, next);
}

#[test]
fn ansi_underline_is_dropped_under_color() {
    let p = CapabilityProfile::ansi();
    let underline = attrs(AttrFlags::UNDERLINE);
    assert_eq!(
        change(&p, underline, underline.with_fg(Color::BLUE)).as_deref(),
        Some("\x1b[34m")
    );
    assert_eq!(
        change(&p, underline.with_fg(Color::BLUE), normal().with_fg(Color::BLUE)),
        None
    );
}

// ═════════════════════════════════════════════════════════════════════════
// xterm-256color
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn xterm_combined_template() {
    let p = CapabilityProfile::xterm_256color();
    assert_eq!(
        change(&p, normal(), attrs(AttrFlags::BOLD)).as_deref(),
        Some("\x1b[0m\x1b(B\x1b[0;1m")
    );
    assert_eq!(
        change(&p, normal(), attrs(AttrFlags::ITALIC)).as_deref(),
        Some("\x1b[0m\x1b(B\x1b[0m\x1b[3m")
    );
    assert_eq!(
        change(
            &p,
            normal(),
            attrs(AttrFlags::CROSSED_OUT | AttrFlags::DBL_UNDERLINE)
        )
        .as_deref(),
        Some("\x1b[0m\x1b(B\x1b[0m\x1b[9m\x1b[21m")
    );
}

#[test]
fn xterm_extended_palette() {
    let p = CapabilityProfile::xterm_256color();
    assert_eq!(
        change(&p, normal(), normal().with_fg(Color::Indexed(196))).as_deref(),
        Some("\x1b[38;5;196m")
    );
    assert_eq!(
        change(&p, normal(), normal().with_fg(Color::LIGHT_BLUE)).as_deref(),
        Some("\x1b[94m")
    );
    assert_eq!(
        change(&p, normal(), normal().with_bg(Color::Indexed(100))).as_deref(),
        Some("\x1b[48;5;100m")
    );
}

#[test]
fn xterm_incremental_transitions() {
    let p = xterm_without_sgr();
    let red = |flags| attrs(flags).with_fg(Color::RED);
    let cases = [
        (normal(), attrs(AttrFlags::BOLD), "\x1b[1m"),
        (attrs(AttrFlags::BOLD), attrs(AttrFlags::DIM), "\x1b[22m\x1b[2m"),
        (
            attrs(AttrFlags::BOLD | AttrFlags::DIM),
            attrs(AttrFlags::BOLD),
            "\x1b[22m\x1b[1m",
        ),
        (
            attrs(AttrFlags::UNDERLINE | AttrFlags::DBL_UNDERLINE),
            attrs(AttrFlags::UNDERLINE),
            "\x1b[24m\x1b[4m",
        ),
        (attrs(AttrFlags::PROTECTED), attrs(AttrFlags::BOLD), "\x1b[0m\x1b[1m"),
        (
            red(AttrFlags::PROTECTED),
            red(AttrFlags::BOLD),
            "\x1b[0m\x1b[31m\x1b[1m",
        ),
        (red(AttrFlags::BOLD), red(AttrFlags::ITALIC), "\x1b[22m\x1b[3m"),
        (attrs(AttrFlags::ALT_CHARSET), attrs(AttrFlags::BOLD), "\x1b(B\x1b[1m"),
        (attrs(AttrFlags::BOLD), normal(), "\x1b[0m"),
    ];
    for (from, to, expected) in cases {
        assert_eq!(change(&p, from, to).as_deref(), Some(expected), "{from:?} -> {to:?}");
    }
}

#[test]
fn missing_exit_falls_back_to_reset() {
    let mut p = xterm_without_sgr();
    p.italic.exit = None;
    assert_eq!(
        change(
            &p,
            attrs(AttrFlags::ITALIC | AttrFlags::BOLD),
            attrs(AttrFlags::BOLD)
        )
        .as_deref(),
        Some("\x1b[0m\x1b[1m")
    );
}

#[test]
fn deactivate_without_reset_uses_exits() {
    let mut p = xterm_without_sgr();
    p.exit_attribute_mode = None;
    assert_eq!(
        change(&p, attrs(AttrFlags::BOLD), normal()).as_deref(),
        Some("\x1b[22m")
    );
}

// ═════════════════════════════════════════════════════════════════════════
// Linux console and Cygwin
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn linux_pc_charset_forces_incremental_path() {
    let p = CapabilityProfile::linux_console();
    let pc = AttrFlags::PC_CHARSET;
    assert_eq!(
        change(&p, attrs(pc), attrs(pc | AttrFlags::BOLD)).as_deref(),
        Some("\x1b[1m")
    );
    assert_eq!(
        change(&p, attrs(pc | AttrFlags::BOLD), attrs(AttrFlags::BOLD)).as_deref(),
        Some("\x1b[10m")
    );
    assert_eq!(
        change(&p, normal(), attrs(pc)).as_deref(),
        Some("\x1b[0m\x0f\x1b[0m\x0f\x1b[11m")
    );
    assert_eq!(
        change(&p, attrs(pc), normal()).as_deref(),
        Some("\x1b[0m\x0f\x1b[10m")
    );
}

#[test]
fn linux_unsupported_attributes_turn_off_silently() {
    let p = CapabilityProfile::linux_console();
    let all_on = attrs(AttrFlags::all()).with_fg(Color::CYAN).with_bg(Color::BLUE);
    for flag in [
        AttrFlags::ITALIC,
        AttrFlags::INVISIBLE,
        AttrFlags::PROTECTED,
        AttrFlags::CROSSED_OUT,
        AttrFlags::DBL_UNDERLINE,
    ] {
        let mut to = all_on;
        to.attrs.remove(flag);
        assert_eq!(change(&p, all_on, to).as_deref(), Some(""), "{flag:?} off");
    }
}

#[test]
fn linux_standout_and_reverse_share_one_sequence() {
    let p = CapabilityProfile::linux_console();
    let pc = AttrFlags::PC_CHARSET;
    assert_eq!(
        change(
            &p,
            attrs(pc),
            attrs(pc | AttrFlags::REVERSE | AttrFlags::STANDOUT)
        )
        .as_deref(),
        Some("\x1b[7m")
    );
}

#[test]
fn linux_colors() {
    let p = CapabilityProfile::linux_console();
    let cases = [
        (normal(), normal().with_fg(Color::RED), "\x1b[31;22m"),
        (normal(), normal().with_bg(Color::BLUE), "\x1b[44;25m"),
        (normal(), normal().with_fg(Color::LIGHT_RED), "\x1b[31;1m"),
        (normal().with_bg(Color::BLUE), normal(), "\x1b[49;25m"),
        (colors(Color::RED, Color::BLUE), normal(), "\x1b[39;49;25m"),
    ];
    for (from, to, expected) in cases {
        assert_eq!(change(&p, from, to).as_deref(), Some(expected), "{from:?} -> {to:?}");
    }
}

#[test]
fn cygwin_matches_linux_output() {
    let p = CapabilityProfile::cygwin();
    assert_eq!(
        change(&p, normal(), normal().with_fg(Color::RED)).as_deref(),
        Some("\x1b[31;22m")
    );
}

// ═════════════════════════════════════════════════════════════════════════
// VT100
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn vt100_keeps_padding_and_ignores_color() {
    let p = CapabilityProfile::vt100();
    assert_eq!(
        change(&p, normal(), attrs(AttrFlags::BOLD)).as_deref(),
        Some("\x1b[0m$<2>\x1b[0;1m\x0f$<2>")
    );
    assert_eq!(
        change(&p, normal(), attrs(AttrFlags::ALT_CHARSET)).as_deref(),
        Some("\x1b[0m$<2>\x1b[0m\x0e$<2>")
    );
    assert_eq!(
        change(&p, attrs(AttrFlags::ALT_CHARSET), normal()).as_deref(),
        Some("\x1b[0m$<2>\x0f")
    );
    assert_eq!(
        change(&p, normal(), colors(Color::RED, Color::BLUE)).as_deref(),
        Some("")
    );
}

// ═════════════════════════════════════════════════════════════════════════
// Terminals without default-color support
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn putty_resets_colors_with_orig_pair() {
    let p = CapabilityProfile::putty_256color();
    assert_eq!(
        change(&p, normal().with_fg(Color::RED), normal()).as_deref(),
        Some("\x1b[39;49m")
    );
    assert_eq!(
        change(
            &p,
            colors(Color::RED, Color::BLUE),
            normal().with_bg(Color::BLUE)
        )
        .as_deref(),
        Some("\x1b[39;49m\x1b[44m")
    );
    assert_eq!(
        change(&p, normal(), normal().with_fg(Color::RED)).as_deref(),
        Some("\x1b[31m")
    );
    assert_eq!(
        change(&p, attrs(AttrFlags::BOLD), normal()).as_deref(),
        Some("\x1b[0m")
    );
}

#[test]
fn ibm_uses_raw_vga_indices() {
    let p = CapabilityProfile::ibm_color();
    assert_eq!(
        change(&p, normal(), normal().with_fg(Color::RED)).as_deref(),
        Some("\x1b[34m")
    );
    assert_eq!(
        change(&p, normal(), colors(Color::BLUE, Color::RED)).as_deref(),
        Some("\x1b[31m\x1b[44m")
    );
    assert_eq!(
        change(&p, normal().with_fg(Color::RED), normal()).as_deref(),
        Some("\x1b[32;40m")
    );
    assert_eq!(
        change(&p, normal(), attrs(AttrFlags::BOLD)).as_deref(),
        Some("")
    );
}

#[test]
fn teraterm_suppresses_bold_under_color() {
    let p = CapabilityProfile::teraterm();
    assert_eq!(
        change(&p, normal(), attrs(AttrFlags::BOLD).with_fg(Color::RED)).as_deref(),
        Some("\x1b[38;5;1m")
    );
    assert_eq!(
        change(
            &p,
            attrs(AttrFlags::BOLD),
            attrs(AttrFlags::BOLD).with_fg(Color::RED)
        )
        .as_deref(),
        Some("\x1b[38;5;1m")
    );
    assert_eq!(
        change(&p, normal().with_fg(Color::RED), normal()).as_deref(),
        Some("\x1b[39;49m")
    );
    assert_eq!(
        change(&p, normal(), attrs(AttrFlags::UNDERLINE).with_fg(Color::RED)).as_deref(),
        Some("\x1b[0m$<2>\x1b[0;4m\x0f$<2>\x1b[38;5;1m")
    );
}

#[test]
fn missing_orig_pair_falls_back_to_gray_on_black() {
    let p = CapabilityProfileBuilder::new()
        .set_a_foreground("\x1b[3%p1%dm")
        .set_a_background("\x1b[4%p1%dm")
        .max_color(8)
        .default_color_support(false)
        .build();
    assert_eq!(
        change(&p, colors(Color::RED, Color::BLUE), normal()).as_deref(),
        Some("\x1b[37m\x1b[40m")
    );
}

#[test]
fn color_pair_template_is_last_resort() {
    let p = CapabilityProfileBuilder::new()
        .set_color_pair("\x1b[3%p1%d;4%p2%dm")
        .max_color(8)
        .default_color_support(true)
        .build();
    assert_eq!(
        change(&p, normal(), normal().with_fg(Color::RED)).as_deref(),
        Some("\x1b[31;40m")
    );
}

// ═════════════════════════════════════════════════════════════════════════
// rxvt and dumb
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn rxvt_combined_template() {
    let p = CapabilityProfile::rxvt();
    assert_eq!(
        change(&p, normal(), attrs(AttrFlags::UNDERLINE | AttrFlags::REVERSE)).as_deref(),
        Some("\x1b[0m\x1b[0;4;7m\x0f")
    );
    assert_eq!(
        change(&p, normal(), normal().with_fg(Color::BROWN)).as_deref(),
        Some("\x1b[33m")
    );
}

#[test]
fn dumb_terminal_writes_nothing() {
    let p = CapabilityProfile::dumb();
    assert_eq!(
        change(&p, normal(), attrs(AttrFlags::BOLD).with_fg(Color::RED)).as_deref(),
        Some("")
    );
}

#[test]
fn custom_toggle_profile_uses_exact_templates() {
    let p = CapabilityProfileBuilder::new()
        .toggle(Attribute::Reverse, Some("<rev>"), Some("</rev>"))
        .toggle(Attribute::Blink, Some("<blink>"), Some("</blink>"))
        .build();
    assert_eq!(
        change(
            &p,
            attrs(AttrFlags::REVERSE),
            attrs(AttrFlags::BLINK)
        )
        .as_deref(),
        Some("</rev><blink>")
    );
}
