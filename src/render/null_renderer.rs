use crate::error::TicklineResult;
use crate::render::{LabelBitmap, LabelHandle, LabelRasterizer, Renderer, TicklineFrame};

/// No-op renderer used by tests and headless usage.
///
/// It still validates frame content, and rasterizes labels by estimating
/// their size from glyph classes so label layout stays deterministic.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_mark_count: usize,
    pub last_label_count: usize,
    pub labels_rasterized: usize,
    next_handle: u64,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &TicklineFrame) -> TicklineResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_mark_count = frame.marks.len();
        self.last_label_count = frame.labels.len();
        Ok(())
    }
}

impl LabelRasterizer for NullRenderer {
    fn rasterize(&mut self, text: &str, font_size: f64) -> Option<LabelBitmap> {
        if text.is_empty() {
            return None;
        }
        self.next_handle += 1;
        self.labels_rasterized += 1;
        Some(LabelBitmap {
            handle: LabelHandle(self.next_handle),
            width: estimate_label_text_width(text, font_size),
            height: font_size * 1.2,
        })
    }
}

pub(crate) fn estimate_label_text_width(text: &str, font_size: f64) -> f64 {
    // Keep this estimate deterministic and backend-independent.
    let units = text.chars().fold(0.0, |acc, ch| {
        acc + match ch {
            '0'..='9' => 0.62,
            '.' | ',' => 0.34,
            '-' | '+' => 0.42,
            ' ' => 0.33,
            _ => 0.58,
        }
    });
    units * font_size
}
