//! Weights that change over the course of a level
//!
//! Level data describes how likely each shop card is as a curve over the wave
//! number. A [`WeightedCurveList`] is evaluated at the current wave to produce
//! the static [`WeightedList`] that selection works on.

use serde::{Deserialize, Serialize};

use crate::weighted::{WeightedItem, WeightedList};

/// A point on a [`Curve`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
}

impl Keyframe {
    pub fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Scalar curve over time
///
/// In TOML a bare number is a constant curve; an array of keyframes
/// (`[[0, 1.0], [10, 3.0]]` or `[{ time = 0, value = 1.0 }]`) is linear between
/// keys and flat past either end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Curve {
    Constant(f32),
    Keyframes(Vec<Keyframe>),
}

impl Default for Curve {
    fn default() -> Self {
        Self::Constant(0.0)
    }
}

impl Curve {
    pub fn constant(value: f32) -> Self {
        Self::Constant(value)
    }

    pub fn from_keys(keys: impl IntoIterator<Item = (f32, f32)>) -> Self {
        Self::Keyframes(keys.into_iter().map(|(t, v)| Keyframe::new(t, v)).collect())
    }

    /// Value at `time`; a curve without keys is 0 everywhere
    pub fn evaluate(&self, time: f32) -> f32 {
        let keys = match self {
            Self::Constant(value) => return *value,
            Self::Keyframes(keys) => keys,
        };
        let (Some(first), Some(last)) = (keys.first(), keys.last()) else {
            return 0.0;
        };
        if time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }

        for pair in keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if time <= b.time {
                let span = b.time - a.time;
                if span <= 0.0 {
                    return b.value;
                }
                return a.value + (b.value - a.value) * ((time - a.time) / span);
            }
        }
        last.value
    }

    /// Check that every value is finite and keys are sorted by time
    pub fn validate(&self) -> Result<(), String> {
        match self {
            Self::Constant(value) if !value.is_finite() => {
                Err(format!("constant curve value {value} is not finite"))
            }
            Self::Constant(_) => Ok(()),
            Self::Keyframes(keys) => {
                if let Some(bad) = keys
                    .iter()
                    .find(|k| !k.time.is_finite() || !k.value.is_finite())
                {
                    return Err(format!(
                        "keyframe ({}, {}) is not finite",
                        bad.time, bad.value
                    ));
                }
                if keys.windows(2).any(|pair| pair[1].time < pair[0].time) {
                    return Err("keyframes must be sorted by time".to_string());
                }
                Ok(())
            }
        }
    }
}

/// An item whose weight follows a curve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveEntry<T> {
    #[serde(flatten)]
    pub item: T,
    pub weight: Curve,
}

impl<T> CurveEntry<T> {
    pub fn new(item: T, weight: Curve) -> Self {
        Self { item, weight }
    }
}

/// Items with time-varying weights
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightedCurveList<T> {
    entries: Vec<CurveEntry<T>>,
}

impl<T> Default for WeightedCurveList<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> WeightedCurveList<T> {
    pub fn new(entries: Vec<CurveEntry<T>>) -> Self {
        Self { entries }
    }

    pub fn push(&mut self, item: T, weight: Curve) {
        self.entries.push(CurveEntry::new(item, weight));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CurveEntry<T>> {
        self.entries.iter()
    }

    /// Snapshot the weights at `time`, keeping only positive ones
    pub fn to_weighted_list(&self, time: f32) -> WeightedList<T>
    where
        T: Clone,
    {
        self.entries
            .iter()
            .map(|entry| WeightedItem::new(entry.item.clone(), entry.weight.evaluate(time)))
            .collect()
    }
}
