use tracing::trace;

use crate::error::TicklineResult;
use crate::interaction::ScrollEffect;
use crate::render::{
    AxisLine, LabelContext, LabelRasterizer, Labeller, MarkInstruction, Renderer, TicklineFrame,
};

use super::Tickline;

impl<R, E> Tickline<R, E>
where
    R: Renderer + LabelRasterizer,
    E: ScrollEffect,
{
    /// Materializes the current state as a backend-agnostic frame.
    ///
    /// Marks are grouped per grid in insertion order. Every grid is extended
    /// by one step of the densest grid so marks straddling the edges are
    /// still drawn.
    pub fn build_frame(&mut self) -> TicklineFrame {
        let bounds = self.view.bounds();
        let mut frame = TicklineFrame::new(bounds);
        if let Some(color) = self.background_color {
            frame = frame.with_background(color);
        }
        if self.draw_line {
            frame = frame.with_line(self.axis_line());
        }

        let extend_by = self.grids.extension(self.view.scale());
        let ctx = LabelContext {
            view: &self.view,
            padding: self.label_padding,
        };
        self.labeller.begin_pass();
        for (id, grid) in self.grids.iter() {
            for mark in grid.visible_marks(&self.view, extend_by) {
                let rect = grid.mark_rect(&self.view, mark.pos);
                frame.marks.push(MarkInstruction {
                    grid: id,
                    index: mark.index,
                    rect,
                });
                self.labeller
                    .register(&ctx, id, grid, mark.index, rect, &mut self.renderer);
            }
        }
        frame.labels = self.labeller.finish_pass();
        frame
    }

    /// Builds and renders one frame.
    pub(super) fn redraw(&mut self) -> TicklineResult<()> {
        let frame = self.build_frame();
        self.renderer.render(&frame)?;
        trace!(
            marks = frame.marks.len(),
            labels = frame.labels.len(),
            scale = self.view.scale(),
            "tickline redrawn"
        );
        self.last_frame = Some(frame);
        self.redraw_count += 1;
        Ok(())
    }

    fn axis_line(&self) -> AxisLine {
        let bounds = self.view.bounds();
        let pos = self.view.line_pos();
        let (x1, y1, x2, y2) = if self.view.is_vertical() {
            (pos, bounds.y, pos, bounds.top())
        } else {
            (bounds.x, pos, bounds.right(), pos)
        };
        AxisLine {
            x1,
            y1,
            x2,
            y2,
            stroke_width: self.line_width,
            color: self.line_color,
        }
    }
}
