pub mod axis;
pub mod grid;
pub mod grid_set;
pub mod slot;
pub mod types;

pub use axis::{AxisViewport, IndexFrame};
pub use grid::{Grid, GridId, GridTag, GridVariant, Mark, VisibleMarks};
pub use grid_set::GridSet;
pub use slot::{SlotKind, ValueFormat};
pub use types::{HAlign, LabelAlign, Orientation, Point, Rect, TickSize, VAlign};
