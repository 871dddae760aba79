use core::ops::Range;

use crate::rng::SplitMix64;
use crate::{ObservationLayout, ObservationView, PreconditionViolation, Terrain};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Side {
    Ally,
    Enemy,
}

/// Per-run environment facts shared by every agent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnvInfo {
    pub num_allies: usize,
    pub num_enemies: usize,
    pub map_width: u32,
    pub map_height: u32,
    pub time_per_step: f32,
    pub world_steps_per_env_step: u32,
    pub terrain: Terrain,
}

impl EnvInfo {
    pub const DEFAULT_TIME_PER_STEP: f32 = 1.0 / 16.0;
    pub const DEFAULT_WORLD_STEPS: u32 = 8;

    /// Map dimensions follow the terrain raster.
    pub fn new(num_allies: usize, num_enemies: usize, terrain: Terrain) -> Self {
        Self {
            num_allies,
            num_enemies,
            map_width: terrain.width(),
            map_height: terrain.height(),
            time_per_step: Self::DEFAULT_TIME_PER_STEP,
            world_steps_per_env_step: Self::DEFAULT_WORLD_STEPS,
            terrain,
        }
    }

    pub fn with_timing(mut self, time_per_step: f32, world_steps_per_env_step: u32) -> Self {
        self.time_per_step = time_per_step;
        self.world_steps_per_env_step = world_steps_per_env_step;
        self
    }

    pub fn team_size(&self, side: Side) -> usize {
        match side {
            Side::Ally => self.num_allies,
            Side::Enemy => self.num_enemies,
        }
    }

    pub fn validate(&self) -> Result<(), PreconditionViolation> {
        if self.terrain.width() != self.map_width || self.terrain.height() != self.map_height {
            return Err(PreconditionViolation::TerrainShape {
                expected_w: self.map_width,
                expected_h: self.map_height,
                actual_w: self.terrain.width(),
                actual_h: self.terrain.height(),
            });
        }
        positive("num_allies", self.num_allies as f32)?;
        positive("num_enemies", self.num_enemies as f32)?;
        positive("time_per_step", self.time_per_step)?;
        positive("world_steps_per_env_step", self.world_steps_per_env_step as f32)
    }

    pub fn check_layout(&self, layout: &ObservationLayout) -> Result<(), PreconditionViolation> {
        let expected = (self.num_allies + self.num_enemies).saturating_sub(1);
        if layout.other_rows != expected {
            return Err(PreconditionViolation::TeamSizes {
                rows: layout.other_rows,
                allies: self.num_allies,
                enemies: self.num_enemies,
                expected,
            });
        }
        layout.validate()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AgentInfo {
    pub agent_id: u64,
    pub side: Side,
    pub velocity: f32,
    pub sight_range: f32,
    pub attack_range: f32,
}

/// Read-only metadata handed to a tick alongside one observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Context<'a> {
    pub env: &'a EnvInfo,
    pub agent: AgentInfo,
    pub tick: u64,
    pub seed: u64,
}

impl<'a> Context<'a> {
    pub fn new(env: &'a EnvInfo, agent: AgentInfo) -> Result<Self, PreconditionViolation> {
        env.validate()?;
        positive("velocity", agent.velocity)?;
        positive("sight_range", agent.sight_range)?;
        positive("attack_range", agent.attack_range)?;
        Ok(Self {
            env,
            agent,
            tick: 0,
            seed: 0,
        })
    }

    pub fn at_tick(mut self, tick: u64, seed: u64) -> Self {
        self.tick = tick;
        self.seed = seed;
        self
    }

    /// Validate `data` against `layout` and this context's team sizes.
    pub fn observe(
        &self,
        data: &'a [f32],
        layout: &'a ObservationLayout,
    ) -> Result<ObservationView<'a>, PreconditionViolation> {
        self.env.check_layout(layout)?;
        ObservationView::new(data, layout, self.friend_rows().end)
    }

    /// Reject a view observed under different team sizes or sides.
    pub fn check(&self, obs: &ObservationView<'_>) -> Result<(), PreconditionViolation> {
        let (friends, foes) = (self.friend_rows(), self.foe_rows());
        if obs.friend_rows() != friends || obs.foe_rows() != foes {
            return Err(PreconditionViolation::ViewMismatch {
                view_friends: obs.friend_rows().len(),
                view_foes: obs.foe_rows().len(),
                friends: friends.len(),
                foes: foes.len(),
            });
        }
        Ok(())
    }

    pub fn own_team_size(&self) -> usize {
        self.env.team_size(self.agent.side)
    }

    pub fn foe_team_size(&self) -> usize {
        match self.agent.side {
            Side::Ally => self.env.num_enemies,
            Side::Enemy => self.env.num_allies,
        }
    }

    /// Rows holding teammates: they precede the foes.
    pub fn friend_rows(&self) -> Range<usize> {
        0..self.own_team_size().saturating_sub(1)
    }

    pub fn foe_rows(&self) -> Range<usize> {
        let start = self.own_team_size().saturating_sub(1);
        start..start + self.foe_team_size()
    }

    /// Attack range in the sight-normalized units of the observation offsets.
    pub fn reach(&self) -> f32 {
        self.agent.attack_range / self.agent.sight_range
    }

    /// World distance covered by one environment step.
    pub fn step_length(&self) -> f32 {
        self.agent.velocity * self.env.time_per_step * self.env.world_steps_per_env_step as f32
    }

    pub fn map_dims(&self) -> (f32, f32) {
        (self.env.map_width as f32, self.env.map_height as f32)
    }

    pub fn rng(&self) -> SplitMix64 {
        SplitMix64::for_agent(self.seed, self.agent.agent_id, self.tick)
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), PreconditionViolation> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(PreconditionViolation::NonPositive { field, value })
    }
}
