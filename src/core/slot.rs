use serde::{Deserialize, Serialize};

use crate::error::{TicklineError, TicklineResult};

/// Mapping between lattice indices and discrete selectable values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlotKind {
    /// Index equals value.
    #[default]
    Plain,
    /// Values repeat every `cycle` indices, starting at `0` or `1`.
    Cyclic { cycle: i64, zero_indexed: bool },
}

impl SlotKind {
    pub fn cyclic(cycle: i64, zero_indexed: bool) -> TicklineResult<Self> {
        if cycle < 1 {
            return Err(TicklineError::InvalidConfig(format!(
                "slot cycle must be >= 1, got {cycle}"
            )));
        }
        Ok(Self::Cyclic {
            cycle,
            zero_indexed,
        })
    }

    /// Default value a freshly built slot selects.
    #[must_use]
    pub const fn first_value(self) -> i64 {
        match self {
            Self::Plain => 0,
            Self::Cyclic { zero_indexed, .. } => {
                if zero_indexed {
                    0
                } else {
                    1
                }
            }
        }
    }

    /// Inclusive range of values, `None` when unbounded.
    #[must_use]
    pub const fn value_range(self) -> Option<(i64, i64)> {
        match self {
            Self::Plain => None,
            Self::Cyclic {
                cycle,
                zero_indexed,
            } => {
                let shift = zero_indexed as i64;
                Some((1 - shift, cycle - shift))
            }
        }
    }

    /// Value shown by the slot at lattice `index`.
    #[must_use]
    pub fn slot_value(self, index: f64) -> i64 {
        match self {
            Self::Plain => index.round_ties_even() as i64,
            Self::Cyclic {
                cycle,
                zero_indexed,
            } => {
                let shift = zero_indexed as i64;
                let raw = index.rem_euclid(cycle as f64) + 1.0 - shift as f64;
                let mut value = raw.round_ties_even() as i64;
                if value >= cycle + 1 - shift {
                    value -= cycle;
                }
                value
            }
        }
    }

    /// Lattice index showing `value`; for cyclic slots the one nearest
    /// `current_index`.
    pub fn index_of(self, value: i64, current_index: f64) -> TicklineResult<f64> {
        match self {
            Self::Plain => Ok(value as f64),
            Self::Cyclic {
                cycle,
                zero_indexed,
            } => {
                let shift = zero_indexed as i64;
                let (min, max) = (1 - shift, cycle - shift);
                if !(min..=max).contains(&value) {
                    return Err(TicklineError::ValueRange { value, min, max });
                }
                let base_index = (value - 1 + shift) as f64;
                let cycle = cycle as f64;
                let periods = ((current_index - base_index) / cycle).round_ties_even();
                Ok(periods * cycle + base_index)
            }
        }
    }
}

/// How slot values are turned into label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueFormat {
    #[default]
    Plain,
    /// Left-pads with zeros to at least `width` digits, e.g. `07`.
    ZeroPadded { width: usize },
    /// Right-aligns in `width` characters, padding with `fill`.
    Padded { width: usize, fill: char },
    /// Decimal notation with `precision` fractional digits, e.g. `7.0`.
    Fixed { precision: usize },
}

impl ValueFormat {
    #[must_use]
    pub fn format(self, value: i64) -> String {
        match self {
            Self::Plain => value.to_string(),
            Self::ZeroPadded { width } => format!("{value:0width$}"),
            Self::Padded { width, fill } => {
                let digits = value.to_string();
                let pad = width.saturating_sub(digits.chars().count());
                std::iter::repeat_n(fill, pad).chain(digits.chars()).collect()
            }
            Self::Fixed { precision } => format!("{:.precision$}", value as f64),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SlotKind, ValueFormat};
    use crate::error::TicklineError;

    #[test]
    fn cyclic_value_wraps_across_period() {
        let slot = SlotKind::cyclic(12, false).expect("valid cycle");
        assert_eq!(slot.slot_value(0.0), 1);
        assert_eq!(slot.slot_value(11.0), 12);
        assert_eq!(slot.slot_value(12.0), 1);
        assert_eq!(slot.slot_value(-1.0), 12);
        assert_eq!(slot.slot_value(11.6), 1);
    }

    #[test]
    fn zero_indexed_cycle_covers_zero_to_cycle_minus_one() {
        let slot = SlotKind::cyclic(60, true).expect("valid cycle");
        assert_eq!(slot.slot_value(0.0), 0);
        assert_eq!(slot.slot_value(59.0), 59);
        assert_eq!(slot.slot_value(60.0), 0);
        assert_eq!(slot.slot_value(-61.0), 59);
        assert_eq!(slot.value_range(), Some((0, 59)));
    }

    #[test]
    fn cyclic_index_of_picks_nearest_congruent_index() {
        let slot = SlotKind::cyclic(12, false).expect("valid cycle");
        assert_eq!(slot.index_of(3, 15.0).expect("in range"), 14.0);
        assert_eq!(slot.index_of(3, -20.0).expect("in range"), -22.0);
        assert_eq!(slot.index_of(12, 0.0).expect("in range"), -1.0);
    }

    #[test]
    fn cyclic_index_of_rejects_out_of_range_values() {
        let slot = SlotKind::cyclic(12, false).expect("valid cycle");
        let err = slot.index_of(0, 5.0).expect_err("0 is not a month");
        assert!(matches!(
            err,
            TicklineError::ValueRange {
                value: 0,
                min: 1,
                max: 12
            }
        ));
        assert!(slot.index_of(13, 5.0).is_err());
    }

    #[test]
    fn zero_cycle_is_rejected() {
        assert!(SlotKind::cyclic(0, true).is_err());
    }

    #[test]
    fn plain_slot_is_identity() {
        assert_eq!(SlotKind::Plain.index_of(2013, 0.0).expect("plain"), 2013.0);
        assert_eq!(SlotKind::Plain.slot_value(2012.6), 2013);
    }

    #[test]
    fn zero_padded_format() {
        assert_eq!(ValueFormat::ZeroPadded { width: 2 }.format(7), "07");
        assert_eq!(ValueFormat::ZeroPadded { width: 2 }.format(42), "42");
        assert_eq!(ValueFormat::Plain.format(-3), "-3");
    }

    #[test]
    fn padded_and_fixed_formats() {
        let padded = ValueFormat::Padded {
            width: 4,
            fill: ' ',
        };
        assert_eq!(padded.format(7), "   7");
        assert_eq!(padded.format(-12), " -12");
        assert_eq!(padded.format(12_345), "12345");
        assert_eq!(ValueFormat::Padded { width: 3, fill: '*' }.format(5), "**5");

        assert_eq!(ValueFormat::Fixed { precision: 1 }.format(7), "7.0");
        assert_eq!(ValueFormat::Fixed { precision: 2 }.format(-3), "-3.00");
        assert_eq!(ValueFormat::Fixed { precision: 0 }.format(42), "42");
    }
}
