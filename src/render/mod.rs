mod frame;
mod labeller;
mod null_renderer;
mod primitives;

pub use frame::TicklineFrame;
pub use labeller::{
    CompositeLabeller, LabelContext, Labeller, MemberLabeller, SlotLabeller, TickLabeller,
    TicklineLabeller,
};
pub use null_renderer::NullRenderer;
pub use primitives::{AxisLine, Color, LabelBitmap, LabelHandle, LabelPlacement, MarkInstruction};

use crate::error::TicklineResult;

/// Contract implemented by any drawing backend.
///
/// Backends receive a fully materialized, deterministic `TicklineFrame` so
/// drawing code remains isolated from viewport and gesture logic.
pub trait Renderer {
    fn render(&mut self, frame: &TicklineFrame) -> TicklineResult<()>;
}

/// Turns label text into a bitmap the backend can later draw.
///
/// Returning `None` skips the label.
pub trait LabelRasterizer {
    fn rasterize(&mut self, text: &str, font_size: f64) -> Option<LabelBitmap>;
}
