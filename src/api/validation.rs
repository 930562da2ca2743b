use crate::error::{TicklineError, TicklineResult};
use crate::interaction::PointerEvent;

pub(super) fn validate_finite(name: &str, value: f64) -> TicklineResult<f64> {
    if !value.is_finite() {
        return Err(TicklineError::InvalidConfig(format!(
            "{name} must be finite, got {value}"
        )));
    }
    Ok(value)
}

/// Optional index bound: infinite values are allowed, NaN is not.
pub(super) fn validate_optional_bound(name: &str, value: Option<f64>) -> TicklineResult<()> {
    if value.is_some_and(f64::is_nan) {
        return Err(TicklineError::InvalidConfig(format!("{name} must not be NaN")));
    }
    Ok(())
}

/// Scale limits as used at runtime: NaN rejected, `min <= max`.
pub(super) fn validate_scale_limits(min: f64, max: f64) -> TicklineResult<(f64, f64)> {
    if min.is_nan() || max.is_nan() || min < 0.0 {
        return Err(TicklineError::InvalidConfig(
            "scale limits must be >= 0 and not NaN".to_owned(),
        ));
    }
    if min > max {
        return Err(TicklineError::InvalidConfig(format!(
            "scale_min ({min}) must be <= scale_max ({max})"
        )));
    }
    Ok((min, max))
}

pub(super) fn validate_pointer_event(event: PointerEvent) -> TicklineResult<PointerEvent> {
    if !event.x.is_finite() || !event.y.is_finite() || !event.time.is_finite() {
        return Err(TicklineError::InvalidData(
            "pointer event coordinates and time must be finite".to_owned(),
        ));
    }
    Ok(event)
}

pub(super) fn validate_frame_delta(delta_seconds: f64) -> TicklineResult<f64> {
    if !delta_seconds.is_finite() || delta_seconds < 0.0 {
        return Err(TicklineError::InvalidData(
            "frame delta must be finite and >= 0".to_owned(),
        ));
    }
    Ok(delta_seconds)
}

#[cfg(test)]
mod tests {
    use super::{validate_frame_delta, validate_pointer_event, validate_scale_limits};
    use crate::interaction::PointerEvent;

    #[test]
    fn scale_limits_must_be_ordered() {
        assert!(validate_scale_limits(1.0, f64::INFINITY).is_ok());
        assert!(validate_scale_limits(5.0, 1.0).is_err());
        assert!(validate_scale_limits(f64::NAN, 1.0).is_err());
    }

    #[test]
    fn non_finite_inputs_are_rejected() {
        assert!(validate_pointer_event(PointerEvent::new(0, f64::NAN, 0.0, 0.0)).is_err());
        assert!(validate_frame_delta(-0.1).is_err());
        assert!(validate_frame_delta(0.0).is_ok());
    }
}
