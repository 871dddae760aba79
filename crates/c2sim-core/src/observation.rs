use core::ops::Range;

use crate::PreconditionViolation;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fixed per-agent observation layout declared by the simulation environment.
///
/// The vector is `other_rows` rows of `other_width` features followed by one
/// self segment of `self_width` features. Both segments end with a
/// `num_types`-wide unit-type one-hot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ObservationLayout {
    pub other_rows: usize,
    pub other_width: usize,
    pub self_width: usize,
    pub num_types: usize,

    /// Health feature index (both segments).
    pub health: usize,
    /// Index of the x coordinate; y follows at `position + 1` (both segments).
    pub position: usize,
    pub other_cooldown: usize,
    pub self_cooldown: usize,
}

impl ObservationLayout {
    pub const UNIT_TYPES: usize = 6;

    /// Layout of the SMAX-style environment with the given team sizes.
    pub fn smax(num_allies: usize, num_enemies: usize) -> Self {
        Self {
            other_rows: (num_allies + num_enemies).saturating_sub(1),
            other_width: 13,
            self_width: 10,
            num_types: Self::UNIT_TYPES,
            health: 0,
            position: 1,
            other_cooldown: 6,
            self_cooldown: 3,
        }
    }

    pub fn len(&self) -> usize {
        self.other_rows * self.other_width + self.self_width
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Column of a unit type in a segment of `width` features. The catalog
    /// types occupy the last [`Self::UNIT_TYPES`] columns of the one-hot block.
    pub fn type_column(&self, width: usize, unit_type: usize) -> usize {
        width - Self::UNIT_TYPES + unit_type
    }

    pub fn validate(&self) -> Result<(), PreconditionViolation> {
        let checks: [(&'static str, usize, usize); 8] = [
            ("num_types", Self::UNIT_TYPES - 1, self.num_types),
            ("health", self.health, self.other_width.min(self.self_width)),
            ("position", self.position + 1, self.other_width.min(self.self_width)),
            ("other_cooldown", self.other_cooldown, self.other_width),
            ("self_cooldown", self.self_cooldown, self.self_width),
            ("num_types", self.num_types.saturating_sub(1), self.other_width),
            ("num_types", self.num_types.saturating_sub(1), self.self_width),
            ("self_width", 0, self.self_width),
        ];
        for (field, index, width) in checks {
            if index >= width {
                return Err(PreconditionViolation::FeatureIndex {
                    field,
                    index,
                    width,
                });
            }
        }
        Ok(())
    }
}

/// Borrowed, shape-checked view of one agent's observation vector.
///
/// Only [`Context::observe`](crate::Context::observe) builds one, so the view
/// always agrees with the team sizes it was observed under.
#[derive(Debug, Clone, Copy)]
pub struct ObservationView<'a> {
    data: &'a [f32],
    layout: &'a ObservationLayout,
    friends: usize,
}

impl<'a> ObservationView<'a> {
    pub(crate) fn new(
        data: &'a [f32],
        layout: &'a ObservationLayout,
        friends: usize,
    ) -> Result<Self, PreconditionViolation> {
        layout.validate()?;
        if data.len() != layout.len() {
            return Err(PreconditionViolation::ObservationLength {
                expected: layout.len(),
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            layout,
            friends,
        })
    }

    pub fn layout(&self) -> &'a ObservationLayout {
        self.layout
    }

    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Rows holding the observer's teammates.
    pub fn friend_rows(&self) -> Range<usize> {
        0..self.friends
    }

    pub fn foe_rows(&self) -> Range<usize> {
        self.friends..self.layout.other_rows
    }

    fn self_segment(&self) -> &'a [f32] {
        &self.data[self.data.len() - self.layout.self_width..]
    }

    pub fn self_health(&self) -> f32 {
        self.self_segment()[self.layout.health]
    }

    /// Own position normalized to the map (0..1 on each axis).
    pub fn self_position(&self) -> (f32, f32) {
        let seg = self.self_segment();
        (seg[self.layout.position], seg[self.layout.position + 1])
    }

    pub fn self_cooldown(&self) -> f32 {
        self.self_segment()[self.layout.self_cooldown]
    }

    pub fn self_type_flag(&self, unit_type: usize) -> f32 {
        let seg = self.self_segment();
        seg[self.layout.type_column(seg.len(), unit_type)]
    }

    pub fn row_count(&self) -> usize {
        self.layout.other_rows
    }

    pub fn row(&self, index: usize) -> Row<'a> {
        let w = self.layout.other_width;
        Row {
            index,
            features: &self.data[index * w..(index + 1) * w],
            layout: self.layout,
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'a>> + 'a {
        let view = *self;
        (0..self.layout.other_rows).map(move |i| view.row(i))
    }

    /// Rows in `range`, which must lie within `0..row_count()`.
    pub fn rows_in(&self, range: Range<usize>) -> impl Iterator<Item = Row<'a>> + 'a {
        assert!(
            range.end <= self.layout.other_rows,
            "row range {range:?} exceeds {} rows",
            self.layout.other_rows
        );
        let view = *self;
        range.map(move |i| view.row(i))
    }
}

/// One other-agent feature row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    pub index: usize,
    features: &'a [f32],
    layout: &'a ObservationLayout,
}

impl<'a> Row<'a> {
    pub fn health(&self) -> f32 {
        self.features[self.layout.health]
    }

    /// Health is zeroed for dead or unseen agents.
    pub fn is_alive(&self) -> bool {
        self.health() > 0.0
    }

    /// Position relative to the observer, normalized by sight range.
    pub fn offset(&self) -> (f32, f32) {
        (
            self.features[self.layout.position],
            self.features[self.layout.position + 1],
        )
    }

    pub fn distance(&self) -> f32 {
        let (x, y) = self.offset();
        x.hypot(y)
    }

    pub fn cooldown(&self) -> f32 {
        self.features[self.layout.other_cooldown]
    }

    pub fn type_flag(&self, unit_type: usize) -> f32 {
        self.features[self.layout.type_column(self.features.len(), unit_type)]
    }
}

/// Owned observation vector with setters, for adapters that assemble observations
/// feature by feature.
#[derive(Debug, Clone, PartialEq)]
pub struct ObservationBuf {
    layout: ObservationLayout,
    data: Vec<f32>,
}

impl ObservationBuf {
    pub fn new(layout: ObservationLayout) -> Self {
        let data = vec![0.0; layout.len()];
        Self { layout, data }
    }

    pub fn layout(&self) -> &ObservationLayout {
        &self.layout
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    fn self_base(&self) -> usize {
        self.data.len() - self.layout.self_width
    }

    pub fn set_self(&mut self, health: f32, position: (f32, f32), cooldown: f32) -> &mut Self {
        let base = self.self_base();
        self.data[base + self.layout.health] = health;
        self.data[base + self.layout.position] = position.0;
        self.data[base + self.layout.position + 1] = position.1;
        self.data[base + self.layout.self_cooldown] = cooldown;
        self
    }

    pub fn set_self_type(&mut self, unit_type: usize) -> &mut Self {
        let base = self.self_base();
        let width = self.layout.self_width;
        self.data[base + width - self.layout.num_types..].iter_mut().for_each(|f| *f = 0.0);
        self.data[base + self.layout.type_column(width, unit_type)] = 1.0;
        self
    }

    pub fn set_row(&mut self, index: usize, health: f32, offset: (f32, f32), cooldown: f32) -> &mut Self {
        let base = index * self.layout.other_width;
        self.data[base + self.layout.health] = health;
        self.data[base + self.layout.position] = offset.0;
        self.data[base + self.layout.position + 1] = offset.1;
        self.data[base + self.layout.other_cooldown] = cooldown;
        self
    }

    pub fn set_row_type(&mut self, index: usize, unit_type: usize) -> &mut Self {
        let width = self.layout.other_width;
        let base = index * width;
        self.data[base + width - self.layout.num_types..base + width]
            .iter_mut()
            .for_each(|f| *f = 0.0);
        self.data[base + self.layout.type_column(width, unit_type)] = 1.0;
        self
    }

    pub fn clear_row(&mut self, index: usize) -> &mut Self {
        let w = self.layout.other_width;
        self.data[index * w..(index + 1) * w]
            .iter_mut()
            .for_each(|f| *f = 0.0);
        self
    }
}
