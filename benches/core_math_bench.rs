use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tickline::Tickline;
use tickline::api::TicklineConfig;
use tickline::core::{AxisViewport, Grid, IndexFrame, Orientation, Rect};
use tickline::render::NullRenderer;

fn ruler_config() -> TicklineConfig {
    TicklineConfig::new(Rect::new(0.0, 0.0, 1920.0, 80.0))
        .with_orientation(Orientation::Horizontal)
        .with_ends(0.0, 100.0)
        .with_grid(Grid::lattice())
        .with_grid(Grid::lattice().with_scale_factor(2.0))
        .with_grid(Grid::labelless().with_scale_factor(5.0).with_min_space(2.0))
}

fn bench_axis_round_trip(c: &mut Criterion) {
    let view = AxisViewport::new(Orientation::Horizontal, Rect::new(0.0, 0.0, 1920.0, 80.0))
        .with_ends(-4_321.5, 5_678.25);

    c.bench_function("axis_round_trip", |b| {
        b.iter(|| {
            let pos = view.index_to_pos(black_box(1_234.567), IndexFrame::Current);
            let _ = view.pos_to_index(black_box(pos), true);
        })
    });
}

fn bench_lattice_enumeration(c: &mut Criterion) {
    let view = AxisViewport::new(Orientation::Horizontal, Rect::new(0.0, 0.0, 1920.0, 80.0))
        .with_ends(0.0, 100.0);
    let grid = Grid::labelless().with_scale_factor(5.0).with_min_space(2.0);

    c.bench_function("lattice_enumeration_500", |b| {
        b.iter(|| {
            let count = grid.visible_marks(black_box(&view), 0.2).count();
            black_box(count);
        })
    });
}

fn bench_build_frame(c: &mut Criterion) {
    let mut tickline =
        Tickline::new(NullRenderer::default(), ruler_config()).expect("valid tickline");

    c.bench_function("build_frame_three_grids", |b| {
        b.iter(|| {
            tickline.translate_by(0.01).expect("finite distance");
            let frame = tickline.build_frame();
            black_box(frame.marks.len());
        })
    });
}

criterion_group!(
    benches,
    bench_axis_round_trip,
    bench_lattice_enumeration,
    bench_build_frame
);
criterion_main!(benches);
