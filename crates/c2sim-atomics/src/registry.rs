//! Name resolution: the closed table from atomic names to catalog entries.

use core::str::FromStr;

use c2sim_core::{Action, Heading};
use c2sim_lang::{Arg, AtomicCall, Reference, Span};

use crate::catalog::{Atomic, AttackTarget, Transform};
use crate::error::CompileError;
use crate::params::{Course, Direction, Param, Region, UnitType};

/// Every name a program may call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::EnumString, strum::Display, strum::VariantNames)]
#[strum(serialize_all = "snake_case")]
pub enum AtomicName {
    Attack,
    Move,
    Stand,
    Explore,
    InRegion,
    InSight,
    InReach,
    IsArmed,
    IsDying,
    IsType,
    IsFlock,
    HasObstacle,
    Invert,
    ForceSuccess,
    ForceFailure,
}

/// What a call resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolved {
    Leaf(Atomic),
    Transform(Transform),
}

impl Resolved {
    pub fn kind(&self) -> &'static str {
        match self {
            Resolved::Leaf(a) if a.is_action() => "an action",
            Resolved::Leaf(_) => "a condition",
            Resolved::Transform(_) => "a decorator transform",
        }
    }
}

/// Bind `call` to a catalog entry, validating every parameter.
pub fn resolve(call: &AtomicCall, span: Span) -> Result<Resolved, CompileError> {
    let name = AtomicName::from_str(&call.name).map_err(|_| CompileError::UnknownAtomic {
        name: call.name.clone(),
        span,
    })?;
    let mut args = Args::new(call, span);

    let resolved = match name {
        AtomicName::Attack => {
            let target = match args.peek() {
                Some(Arg::Ref(Reference::Enemy(slot))) => {
                    let slot = *slot;
                    if Action::attack(slot).is_none() {
                        return Err(args.invalid(format!("`enemy_{slot}` is past the last foe slot")));
                    }
                    args.skip();
                    AttackTarget::Slot(slot)
                }
                Some(Arg::Ref(r)) => {
                    return Err(args.invalid(format!("`{r}` is not a foe slot")));
                }
                _ => AttackTarget::Qualified(args.required()?),
            };
            Resolved::Leaf(Atomic::Attack {
                target,
                unit: args.unit()?,
            })
        }
        AtomicName::Move => {
            let leaf = match args.peek().and_then(Arg::as_word) {
                Some(word) if Course::from_str(word).is_ok() => {
                    let course = args.required()?;
                    Atomic::MoveRelative {
                        course,
                        qualifier: args.required()?,
                        team: args.required()?,
                        unit: args.unit()?,
                    }
                }
                _ => match args.required::<Direction>()?.heading() {
                    Some(heading) => Atomic::MoveHeading(heading),
                    None => Atomic::MoveCenter,
                },
            };
            Resolved::Leaf(leaf)
        }
        AtomicName::Stand => Resolved::Leaf(Atomic::Stand),
        AtomicName::Explore => Resolved::Leaf(Atomic::Explore),
        AtomicName::InRegion => {
            let x: Direction = args.required()?;
            let y = args.optional()?.unwrap_or(x);
            let region = Region::from_pair(x, y)
                .ok_or_else(|| args.invalid(format!("`{x} {y}` is not a region")))?;
            Resolved::Leaf(Atomic::InRegion(region))
        }
        AtomicName::InSight => Resolved::Leaf(Atomic::InSight {
            team: args.required()?,
            unit: args.unit()?,
        }),
        AtomicName::InReach => Resolved::Leaf(Atomic::InReach {
            team: args.required()?,
            unit: args.unit()?,
        }),
        AtomicName::IsArmed => Resolved::Leaf(Atomic::IsArmed(args.required()?)),
        AtomicName::IsDying => Resolved::Leaf(Atomic::IsDying {
            subject: args.required()?,
            level: args.required()?,
        }),
        AtomicName::IsType => Resolved::Leaf(Atomic::IsType {
            negation: args.required()?,
            unit: args.required()?,
        }),
        AtomicName::IsFlock => Resolved::Leaf(Atomic::IsFlock {
            team: args.required()?,
            direction: args.required()?,
        }),
        AtomicName::HasObstacle => Resolved::Leaf(Atomic::HasObstacle(args.heading()?)),
        AtomicName::Invert => Resolved::Transform(Transform::Invert),
        AtomicName::ForceSuccess => Resolved::Transform(Transform::ForceSuccess),
        AtomicName::ForceFailure => Resolved::Transform(Transform::ForceFailure),
    };

    args.finish()?;
    Ok(resolved)
}

/// Cursor over a call's arguments.
struct Args<'c> {
    call: &'c AtomicCall,
    span: Span,
    pos: usize,
}

impl<'c> Args<'c> {
    fn new(call: &'c AtomicCall, span: Span) -> Self {
        Self { call, span, pos: 0 }
    }

    fn peek(&self) -> Option<&'c Arg> {
        self.call.args.get(self.pos)
    }

    fn skip(&mut self) {
        self.pos += 1;
    }

    fn invalid(&self, reason: String) -> CompileError {
        CompileError::InvalidParameter {
            atomic: self.call.name.clone(),
            reason,
            span: self.span,
        }
    }

    fn parse<T: Param>(&self, arg: &Arg) -> Result<T, CompileError> {
        arg.as_word()
            .and_then(|word| T::from_str(word).ok())
            .ok_or_else(|| {
                self.invalid(format!(
                    "expected {} ({}), found `{arg}`",
                    T::WHAT,
                    T::VARIANTS.join(", ")
                ))
            })
    }

    fn required<T: Param>(&mut self) -> Result<T, CompileError> {
        let arg = self.peek().ok_or_else(|| {
            self.invalid(format!(
                "missing {} ({})",
                T::WHAT,
                T::VARIANTS.join(", ")
            ))
        })?;
        let value = self.parse(arg)?;
        self.skip();
        Ok(value)
    }

    fn optional<T: Param>(&mut self) -> Result<Option<T>, CompileError> {
        match self.peek() {
            Some(_) => self.required().map(Some),
            None => Ok(None),
        }
    }

    /// Optional unit filter; `any` disables it.
    fn unit(&mut self) -> Result<Option<UnitType>, CompileError> {
        if self.peek().and_then(Arg::as_word) == Some("any") {
            self.skip();
            return Ok(None);
        }
        self.optional()
    }

    fn heading(&mut self) -> Result<Heading, CompileError> {
        let direction: Direction = self.required()?;
        direction
            .heading()
            .ok_or_else(|| self.invalid(format!("`{direction}` is not a heading")))
    }

    fn finish(self) -> Result<(), CompileError> {
        match self.peek() {
            Some(extra) => Err(self.invalid(format!("unexpected argument `{extra}`"))),
            None => Ok(()),
        }
    }
}
