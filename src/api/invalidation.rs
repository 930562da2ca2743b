use serde::{Deserialize, Serialize};

/// Deferred work a tickline owes before the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvalidationTopic {
    /// Rebuild and render the frame.
    Redraw,
    /// Push range, anchor and interval to the scroll effect.
    Calibration,
    /// Push scale-dependent thresholds to the scroll effect.
    EffectConstants,
    /// Recompute the densest visible grid.
    Densest,
}

impl InvalidationTopic {
    const fn bit(self) -> u8 {
        match self {
            Self::Redraw => 1 << 0,
            Self::Calibration => 1 << 1,
            Self::EffectConstants => 1 << 2,
            Self::Densest => 1 << 3,
        }
    }
}

/// Bitmask of pending topics. Marking a topic twice is the same as once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct InvalidationTopics {
    bits: u8,
}

impl InvalidationTopics {
    const ALL_BITS: u8 = InvalidationTopic::Redraw.bit()
        | InvalidationTopic::Calibration.bit()
        | InvalidationTopic::EffectConstants.bit()
        | InvalidationTopic::Densest.bit();

    #[must_use]
    pub const fn none() -> Self {
        Self { bits: 0 }
    }

    #[must_use]
    pub const fn all() -> Self {
        Self {
            bits: Self::ALL_BITS,
        }
    }

    /// Everything a scale change invalidates.
    #[must_use]
    pub const fn scale_changed() -> Self {
        Self::all()
    }

    /// Everything a pan invalidates.
    #[must_use]
    pub const fn moved() -> Self {
        Self::from_topic(InvalidationTopic::Redraw).with_topic(InvalidationTopic::Calibration)
    }

    #[must_use]
    pub const fn from_topic(topic: InvalidationTopic) -> Self {
        Self { bits: topic.bit() }
    }

    #[must_use]
    pub const fn with_topic(self, topic: InvalidationTopic) -> Self {
        Self {
            bits: self.bits | topic.bit(),
        }
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self {
            bits: self.bits | other.bits,
        }
    }

    #[must_use]
    pub const fn contains_topic(self, topic: InvalidationTopic) -> bool {
        (self.bits & topic.bit()) != 0
    }

    #[must_use]
    pub const fn is_none(self) -> bool {
        self.bits == 0
    }

    pub fn insert(&mut self, topics: Self) {
        self.bits |= topics.bits;
    }

    /// Clears `topic` and reports whether it was pending.
    pub fn take(&mut self, topic: InvalidationTopic) -> bool {
        let pending = self.contains_topic(topic);
        self.bits &= !topic.bit();
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::{InvalidationTopic, InvalidationTopics};

    #[test]
    fn topics_coalesce_and_take_once() {
        let mut pending = InvalidationTopics::none();
        pending.insert(InvalidationTopics::from_topic(InvalidationTopic::Redraw));
        pending.insert(InvalidationTopics::moved());
        assert!(pending.contains_topic(InvalidationTopic::Calibration));
        assert!(!pending.contains_topic(InvalidationTopic::Densest));

        assert!(pending.take(InvalidationTopic::Redraw));
        assert!(!pending.take(InvalidationTopic::Redraw));
        assert!(pending.take(InvalidationTopic::Calibration));
        assert!(pending.is_none());
    }

    #[test]
    fn scale_change_marks_everything() {
        let topics = InvalidationTopics::scale_changed();
        for topic in [
            InvalidationTopic::Redraw,
            InvalidationTopic::Calibration,
            InvalidationTopic::EffectConstants,
            InvalidationTopic::Densest,
        ] {
            assert!(topics.contains_topic(topic));
        }
        assert_eq!(topics, InvalidationTopics::all());
    }
}
