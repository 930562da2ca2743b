use proptest::prelude::*;
use tickline::Tickline;
use tickline::api::TicklineConfig;
use tickline::core::{AxisViewport, Grid, GridId, GridSet, IndexFrame, Orientation, Rect, SlotKind};
use tickline::interaction::PointerEvent;
use tickline::render::NullRenderer;

fn horizontal_config(index_0: f64, index_1: f64) -> TicklineConfig {
    TicklineConfig::new(Rect::new(0.0, 0.0, 400.0, 60.0))
        .with_orientation(Orientation::Horizontal)
        .with_ends(index_0, index_1)
}

proptest! {
    #[test]
    fn window_round_trip_property(
        index_start in -1_000.0f64..1_000.0,
        index_span in 0.1f64..10_000.0,
        value_factor in 0.0f64..1.0,
        origin in 0.0f64..500.0,
        backward in any::<bool>()
    ) {
        let view = AxisViewport::new(Orientation::Vertical, Rect::new(10.0, origin, 80.0, 640.0))
            .with_ends(index_start, index_start + index_span)
            .with_backward(backward);
        let index = index_start + value_factor * index_span;

        let pos = view.index_to_pos(index, IndexFrame::Current);
        let recovered = view.pos_to_index(pos, true);

        prop_assert!((recovered - index).abs() <= 1e-7 * index_span.max(1.0));
    }

    #[test]
    fn scale_stays_within_limits_property(
        ops in prop::collection::vec((0u8..5, -100.0f64..100.0), 1..40)
    ) {
        let config = horizontal_config(0.0, 10.0).with_scale_limits(Some(5.0), Some(50.0));
        let mut tickline = Tickline::new(NullRenderer::default(), config).expect("valid tickline");

        for (op, value) in ops {
            match op {
                0 => tickline.translate_by(value).expect("finite distance"),
                1 => tickline.set_scale(value.abs() + 0.01).expect("positive scale"),
                2 => tickline.set_index_mid(value).expect("finite mid"),
                3 => tickline.center_on(value, false).expect("finite target"),
                _ => tickline
                    .set_bounds(Rect::new(0.0, 0.0, 100.0 + value.abs() * 5.0, 60.0))
                    .expect("valid bounds"),
            }
            tickline.run_frame(1.0 / 60.0).expect("frame runs");
            prop_assert!(tickline.scale() >= 5.0 - 1e-9);
            prop_assert!(tickline.scale() <= 50.0 + 1e-9);
        }
    }

    #[test]
    fn pinch_respects_zoom_limits_property(
        first in 20.0f64..180.0,
        second in 220.0f64..380.0,
        target in 0.0f64..2_000.0
    ) {
        let config = horizontal_config(0.0, 40.0).with_scale_limits(Some(2.0), Some(50.0));
        let mut tickline = Tickline::new(NullRenderer::default(), config).expect("valid tickline");

        tickline.pointer_down(PointerEvent::new(1, first, 30.0, 0.0)).expect("finite event");
        tickline.pointer_down(PointerEvent::new(2, second, 30.0, 0.0)).expect("finite event");
        tickline.pointer_move(PointerEvent::new(2, target, 30.0, 0.1)).expect("finite event");

        prop_assert!(tickline.scale() >= 2.0 - 1e-9);
        prop_assert!(tickline.scale() <= 50.0 + 1e-9);
    }

    #[test]
    fn densest_grid_is_finest_visible_property(
        factors in prop::collection::vec((1.0f64..50.0, 1.0f64..30.0), 1..8),
        scale in 0.0f64..2_000.0
    ) {
        let grids: Vec<Grid> = factors
            .iter()
            .map(|(scale_factor, min_space)| {
                Grid::lattice()
                    .with_scale_factor(*scale_factor)
                    .with_min_space(*min_space)
            })
            .collect();
        let set = GridSet::from_grids(grids).expect("valid grids");

        match set.densest(scale) {
            Some(id) => {
                let chosen = set.get(id).expect("known grid").density_tolerance();
                prop_assert!(chosen <= scale);
                for (_, grid) in set.iter() {
                    let tolerance = grid.density_tolerance();
                    prop_assert!(tolerance > scale || tolerance <= chosen);
                }
            }
            None => {
                prop_assert!(set.iter().all(|(_, grid)| grid.density_tolerance() > scale));
            }
        }
    }

    #[test]
    fn coarser_grids_draw_whenever_finer_ones_do_property(
        factors in prop::collection::vec((1u32..20, 1.0f64..30.0), 2..6),
        index_0 in -500.0f64..500.0,
        scale in 0.5f64..400.0
    ) {
        // at most 400 px per index keeps a whole global unit on the line
        let view = AxisViewport::new(Orientation::Horizontal, Rect::new(0.0, 0.0, 400.0, 60.0))
            .with_ends(index_0, index_0 + 400.0 / scale);
        let grids: Vec<Grid> = factors
            .iter()
            .map(|(scale_factor, min_space)| {
                Grid::lattice()
                    .with_scale_factor(f64::from(*scale_factor))
                    .with_min_space(*min_space)
            })
            .collect();
        let set = GridSet::from_grids(grids).expect("valid grids");
        let extension = set.extension(view.scale());

        let drawn: Vec<(f64, bool)> = set
            .iter()
            .map(|(_, grid)| {
                let visible = grid.visible_marks(&view, extension).next().is_some();
                (grid.density_tolerance(), visible)
            })
            .collect();
        for &(coarse_tolerance, coarse_visible) in &drawn {
            for &(fine_tolerance, fine_visible) in &drawn {
                if coarse_tolerance < fine_tolerance * (1.0 - 1e-9) && fine_visible {
                    prop_assert!(coarse_visible);
                }
            }
            if coarse_visible {
                prop_assert!(coarse_tolerance <= view.scale() * (1.0 + 1e-9));
            } else {
                prop_assert!(coarse_tolerance >= view.scale() * (1.0 - 1e-9));
            }
        }
    }

    #[test]
    fn scale_matches_span_after_gestures_property(
        moves in prop::collection::vec((any::<bool>(), 0.0f64..400.0), 1..12),
        backward in any::<bool>(),
        frames in 0usize..30
    ) {
        let config = horizontal_config(0.0, 10.0)
            .with_backward(backward)
            .with_drag_threshold(0.0)
            .with_scale_limits(Some(2.0), Some(200.0))
            .with_grid(Grid::lattice());
        let mut tickline = Tickline::new(NullRenderer::default(), config).expect("valid tickline");
        let dir = if backward { -1.0 } else { 1.0 };
        let holds = |tickline: &Tickline<NullRenderer>| {
            let span = tickline.index_1() - tickline.index_0();
            (tickline.scale() * span - 400.0 * dir).abs() <= 1e-9 * 400.0
        };

        tickline.pointer_down(PointerEvent::new(1, 100.0, 30.0, 0.0)).expect("finite event");
        tickline.pointer_down(PointerEvent::new(2, 300.0, 30.0, 0.0)).expect("finite event");
        let mut time = 0.0;
        for (second, x) in moves {
            time += 0.02;
            let id = if second { 2 } else { 1 };
            tickline.pointer_move(PointerEvent::new(id, x, 30.0, time)).expect("finite event");
            prop_assert!(holds(&tickline));
        }
        tickline.pointer_up(PointerEvent::new(2, 300.0, 30.0, time + 0.02)).expect("finite event");
        tickline.pointer_up(PointerEvent::new(1, 100.0, 30.0, time + 0.04)).expect("finite event");
        for _ in 0..frames {
            tickline.run_frame(1.0 / 60.0).expect("frame runs");
            prop_assert!(holds(&tickline));
        }
    }

    #[test]
    fn finer_grid_wins_shared_anchors_property(
        ratio in 2u32..6,
        index_start in -50.0f64..50.0,
        fine_first in any::<bool>()
    ) {
        let coarse = Grid::lattice().with_min_space(0.0).with_min_label_space(0.0);
        let fine = coarse.clone().with_scale_factor(f64::from(ratio));
        let (first, second) = if fine_first { (fine, coarse) } else { (coarse, fine) };
        let fine_id = if fine_first { GridId(0) } else { GridId(1) };

        let config = horizontal_config(index_start, index_start + 8.0)
            .with_grid(first)
            .with_grid(second);
        let mut tickline = Tickline::new(NullRenderer::default(), config).expect("valid tickline");
        let frame = tickline.build_frame();

        let fine_marks = frame.marks.iter().filter(|mark| mark.grid == fine_id).count();
        prop_assert_eq!(frame.labels.len(), fine_marks);
        prop_assert!(frame.labels.iter().all(|label| label.grid == fine_id));
    }

    #[test]
    fn cyclic_index_of_round_trip_property(
        cycle in 1i64..100,
        zero_indexed in any::<bool>(),
        value_seed in 0i64..100,
        current in -10_000.0f64..10_000.0
    ) {
        let slot = SlotKind::cyclic(cycle, zero_indexed).expect("valid cycle");
        let (min, _) = slot.value_range().expect("cyclic range");
        let value = min + value_seed % cycle;

        let index = slot.index_of(value, current).expect("value in range");
        prop_assert_eq!(slot.slot_value(index), value);
        prop_assert!((index - current).abs() <= cycle as f64 / 2.0 + 1e-9);
    }
}
