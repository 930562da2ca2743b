use crate::core::Rect;
use crate::error::TicklineResult;
use crate::render::{AxisLine, Color, LabelPlacement, MarkInstruction};

/// Backend-agnostic output of one redraw pass.
///
/// Marks are grouped per grid in grid order, each group in increasing screen
/// position; labels are already collision-free.
#[derive(Debug, Clone, PartialEq)]
pub struct TicklineFrame {
    pub bounds: Rect,
    pub background: Option<Color>,
    pub line: Option<AxisLine>,
    pub marks: Vec<MarkInstruction>,
    pub labels: Vec<LabelPlacement>,
}

impl TicklineFrame {
    #[must_use]
    pub fn new(bounds: Rect) -> Self {
        Self {
            bounds,
            background: None,
            line: None,
            marks: Vec::new(),
            labels: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    #[must_use]
    pub fn with_line(mut self, line: AxisLine) -> Self {
        self.line = Some(line);
        self
    }

    pub fn validate(&self) -> TicklineResult<()> {
        self.bounds.validate()?;
        if let Some(color) = self.background {
            color.validate()?;
        }
        if let Some(line) = self.line {
            line.validate()?;
        }
        for mark in &self.marks {
            mark.validate()?;
        }
        for label in &self.labels {
            label.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.line.is_none() && self.marks.is_empty() && self.labels.is_empty()
    }
}
