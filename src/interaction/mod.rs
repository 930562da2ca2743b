mod gesture;
mod scroll_effect;

pub use gesture::{GestureLimits, GestureOutcome, GestureResolver, PointerEvent};
pub use scroll_effect::{
    DampedScrollConfig, DampedScrollEffect, ScrollCalibration, ScrollConstants, ScrollEffect,
    ScrollStep,
};
