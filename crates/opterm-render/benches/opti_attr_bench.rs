//! Benchmarks for attribute-sequence generation.
//!
//! Run with: cargo bench -p opterm-render --bench opti_attr_bench

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use opterm_core::capabilities::{CapabilityProfile, TerminalProfile};
use opterm_render::cell::{AttrFlags, CellState};
use opterm_render::color::Color;
use opterm_render::opti_attr::AttributeOptimizer;
use std::hint::black_box;

/// A row of cells cycling through typical styles.
fn styled_row() -> Vec<CellState> {
    let styles = [
        CellState::new(),
        CellState::new().with_attrs(AttrFlags::BOLD),
        CellState::new().with_fg(Color::RED).with_bg(Color::BLACK),
        CellState::new()
            .with_attrs(AttrFlags::UNDERLINE | AttrFlags::REVERSE)
            .with_fg(Color::Indexed(196)),
        CellState::new().with_attrs(AttrFlags::ALT_CHARSET),
        CellState::new().with_attrs(AttrFlags::ITALIC | AttrFlags::DIM),
    ];
    styles.iter().cycle().take(120).copied().collect()
}

fn bench_row_transitions(c: &mut Criterion) {
    let mut group = c.benchmark_group("opti_attr/row");
    let row = styled_row();

    for profile in [
        TerminalProfile::Ansi,
        TerminalProfile::Xterm256Color,
        TerminalProfile::LinuxConsole,
        TerminalProfile::Putty256Color,
    ] {
        let optimizer = AttributeOptimizer::new(CapabilityProfile::from_profile(profile));
        group.bench_with_input(BenchmarkId::new("change", profile.as_str()), &row, |b, row| {
            b.iter(|| {
                let mut term = CellState::new();
                let mut bytes = 0usize;
                for cell in row {
                    if let Some(out) = optimizer.change_attribute(&mut term, cell) {
                        bytes += out.len();
                    }
                }
                black_box(bytes)
            })
        });
    }
    group.finish();
}

fn bench_unchanged(c: &mut Criterion) {
    let optimizer = AttributeOptimizer::new(CapabilityProfile::xterm_256color());
    let cell = CellState::new().with_attrs(AttrFlags::BOLD).with_fg(Color::GREEN);
    c.bench_function("opti_attr/unchanged", |b| {
        b.iter(|| {
            let mut term = cell;
            black_box(optimizer.change_attribute(&mut term, black_box(&cell)))
        })
    });
}

criterion_group!(benches, bench_row_transitions, bench_unchanged);
criterion_main!(benches);
