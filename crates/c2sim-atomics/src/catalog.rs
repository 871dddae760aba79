use c2sim_core::{Action, Context, DeterministicRng, Heading, ObservationView, Status};

use crate::params::{Course, Direction, HpLevel, Negation, Qualifier, Region, Subject, Team, UnitType};
use crate::select;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Who `attack` aims at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AttackTarget {
    Qualified(Qualifier),
    /// A fixed slot of the foe segment (`enemy_N`).
    Slot(usize),
}

/// A resolved leaf with its validated parameters.
///
/// Every variant evaluates as a pure function of one observation and its
/// context. Conditions always report [`Action::STAND`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Atomic {
    Attack {
        target: AttackTarget,
        unit: Option<UnitType>,
    },
    /// Head toward (or away from) the unit picked by `qualifier`.
    MoveRelative {
        course: Course,
        qualifier: Qualifier,
        team: Team,
        unit: Option<UnitType>,
    },
    MoveCenter,
    /// One step along a heading; fails when the terrain blocks it.
    MoveHeading(Heading),
    Stand,
    /// Random walk, stays `Running`.
    Explore,

    InRegion(Region),
    InSight {
        team: Team,
        unit: Option<UnitType>,
    },
    InReach {
        team: Team,
        unit: Option<UnitType>,
    },
    IsArmed(Subject),
    IsDying {
        subject: Subject,
        level: HpLevel,
    },
    IsType {
        negation: Negation,
        unit: UnitType,
    },
    IsFlock {
        team: Team,
        direction: Direction,
    },
    HasObstacle(Heading),
}

impl Atomic {
    pub fn name(&self) -> &'static str {
        match self {
            Atomic::Attack { .. } => "attack",
            Atomic::MoveRelative { .. } | Atomic::MoveCenter | Atomic::MoveHeading(_) => "move",
            Atomic::Stand => "stand",
            Atomic::Explore => "explore",
            Atomic::InRegion(_) => "in_region",
            Atomic::InSight { .. } => "in_sight",
            Atomic::InReach { .. } => "in_reach",
            Atomic::IsArmed(_) => "is_armed",
            Atomic::IsDying { .. } => "is_dying",
            Atomic::IsType { .. } => "is_type",
            Atomic::IsFlock { .. } => "is_flock",
            Atomic::HasObstacle(_) => "has_obstacle",
        }
    }

    /// Actions go in `A(...)`, everything else in `C(...)`.
    pub fn is_action(&self) -> bool {
        matches!(
            self,
            Atomic::Attack { .. }
                | Atomic::MoveRelative { .. }
                | Atomic::MoveCenter
                | Atomic::MoveHeading(_)
                | Atomic::Stand
                | Atomic::Explore
        )
    }

    pub fn evaluate(&self, obs: &ObservationView<'_>, ctx: &Context<'_>) -> (Status, Action) {
        match *self {
            Atomic::Attack { target, unit } => attack(obs, ctx, target, unit),
            Atomic::MoveRelative {
                course,
                qualifier,
                team,
                unit,
            } => move_relative(obs, course, qualifier, team, unit),
            Atomic::MoveCenter => (Status::Success, move_center(obs, ctx).action()),
            Atomic::MoveHeading(heading) => {
                let status = Status::from_bool(!blocked(obs, ctx, heading));
                (status, heading.action())
            }
            Atomic::Stand => (Status::Success, Action::STAND),
            Atomic::Explore => (Status::Running, Action(ctx.rng().next_below(5))),
            Atomic::InRegion(region) => {
                let (x, y) = obs.self_position();
                condition(Region::of_position(x, y) == region)
            }
            Atomic::InSight { team, unit } => {
                condition(select::alive(obs, team, unit).next().is_some())
            }
            Atomic::InReach { team, unit } => {
                let reach = ctx.reach();
                condition(select::alive(obs, team, unit).any(|row| row.distance() < reach))
            }
            Atomic::IsArmed(subject) => condition(match subject.team() {
                None => obs.self_cooldown() <= 0.0,
                Some(team) => select::alive(obs, team, None).all(|row| row.cooldown() <= 0.0),
            }),
            Atomic::IsDying { subject, level } => {
                let threshold = level.threshold();
                condition(match subject.team() {
                    None => obs.self_health() < threshold,
                    Some(team) => select::alive(obs, team, None)
                        .map(|row| row.health())
                        .fold(f32::INFINITY, f32::min)
                        < threshold,
                })
            }
            Atomic::IsType { negation, unit } => {
                let is = select::self_is_unit(obs, unit);
                condition(match negation {
                    Negation::A => is,
                    Negation::NotA => !is,
                })
            }
            Atomic::IsFlock { team, direction } => condition(is_flock(obs, team, direction)),
            Atomic::HasObstacle(heading) => condition(blocked(obs, ctx, heading)),
        }
    }
}

fn condition(ok: bool) -> (Status, Action) {
    (Status::from_bool(ok), Action::STAND)
}

const MISS: (Status, Action) = (Status::Failure, Action::STAND);

fn attack(
    obs: &ObservationView<'_>,
    ctx: &Context<'_>,
    target: AttackTarget,
    unit: Option<UnitType>,
) -> (Status, Action) {
    if obs.self_cooldown() > 0.0 {
        return MISS;
    }
    let reach = ctx.reach();
    let first_foe = obs.foe_rows().start;
    let mut in_reach =
        select::alive(obs, Team::Foe, unit).filter(|row| row.distance() < reach);
    let chosen = match target {
        AttackTarget::Qualified(qualifier) => select::pick(in_reach, qualifier),
        AttackTarget::Slot(slot) => {
            in_reach.find(|row| row.index.checked_sub(first_foe) == Some(slot))
        }
    };
    chosen
        .and_then(|row| Action::attack(row.index - first_foe))
        .map_or(MISS, |action| (Status::Success, action))
}

fn move_relative(
    obs: &ObservationView<'_>,
    course: Course,
    qualifier: Qualifier,
    team: Team,
    unit: Option<UnitType>,
) -> (Status, Action) {
    let Some(row) = select::pick(select::alive(obs, team, unit), qualifier) else {
        return MISS;
    };
    let (x, y) = row.offset();
    let toward = Heading::of_offset(x, y);
    let heading = match course {
        Course::Toward => toward,
        Course::AwayFrom => toward.opposite(),
    };
    (Status::Success, heading.action())
}

/// Step along the axis on which the agent is furthest from the map's middle.
fn move_center(obs: &ObservationView<'_>, ctx: &Context<'_>) -> Heading {
    let (w, h) = ctx.map_dims();
    let (x, y) = obs.self_position();
    let (px, py) = (x * w - w / 2.0, y * h - h / 2.0);
    if px.abs() >= py.abs() {
        if px > 0.0 {
            Heading::West
        } else {
            Heading::East
        }
    } else if py > 0.0 {
        Heading::South
    } else {
        Heading::North
    }
}

fn blocked(obs: &ObservationView<'_>, ctx: &Context<'_>, heading: Heading) -> bool {
    let (w, h) = ctx.map_dims();
    let (x, y) = obs.self_position();
    let from = (x * w, y * h);
    let (ux, uy) = heading.unit();
    let step = ctx.step_length();
    let to = (from.0 + ux * step, from.1 + uy * step);
    ctx.env.terrain.crossing(from, to)
}

fn is_flock(obs: &ObservationView<'_>, team: Team, direction: Direction) -> bool {
    let mut rows = select::alive(obs, team, None).peekable();
    if rows.peek().is_none() {
        return false;
    }
    match direction.heading() {
        None => {
            let mut seen = [false; 4];
            for row in rows {
                let (x, y) = row.offset();
                let (ne, nw, se, sw) = (x > -y, x < y, x > y, x < -y);
                seen[0] |= ne && nw;
                seen[1] |= ne && se;
                seen[2] |= se && sw;
                seen[3] |= sw && nw;
            }
            seen.iter().all(|&s| s)
        }
        // The mean's sign decides the bucket, so the sum is enough.
        Some(heading) => {
            let (sx, sy) = rows.fold((0.0f32, 0.0f32), |(sx, sy), row| {
                let (x, y) = row.offset();
                (sx + x, sy + y)
            });
            Heading::of_offset(sx, sy) == heading
        }
    }
}

/// Status rewrite applied by a decorator to its child's result.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString, strum::Display, strum::VariantNames,
)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Transform {
    /// Swap success and failure; running passes through.
    Invert,
    ForceSuccess,
    ForceFailure,
}

impl Transform {
    /// The child's action is always kept.
    pub fn apply(self, status: Status, action: Action) -> (Status, Action) {
        let status = match (self, status) {
            (Transform::Invert, Status::Success) => Status::Failure,
            (Transform::Invert, Status::Failure) => Status::Success,
            (Transform::Invert, Status::Running) => Status::Running,
            (Transform::ForceSuccess, _) => Status::Success,
            (Transform::ForceFailure, _) => Status::Failure,
        };
        (status, action)
    }
}
