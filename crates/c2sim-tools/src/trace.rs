use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What a [`TraceEvent`] records. The meaning of `value` depends on it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumString, strum::Display, strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TraceKind {
    /// A leaf was evaluated; `value` is its action code.
    #[strum(serialize = "bt.leaf")]
    Leaf,
    /// A decorator rewrote its child; `value` is the resulting status code.
    #[strum(serialize = "bt.decorator")]
    Decorator,
    /// The node that decided the root result; `value` is the action code.
    #[strum(serialize = "bt.fired")]
    Fired,
}

/// One diagnostic record of a tick, as plain data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceEvent {
    pub tick: u64,
    pub kind: TraceKind,
    pub node: u32,
    pub value: u32,
}

impl TraceEvent {
    pub fn leaf(tick: u64, node: u32, action: u32) -> Self {
        Self {
            tick,
            kind: TraceKind::Leaf,
            node,
            value: action,
        }
    }

    pub fn decorator(tick: u64, node: u32, status: u32) -> Self {
        Self {
            tick,
            kind: TraceKind::Decorator,
            node,
            value: status,
        }
    }

    pub fn fired(tick: u64, node: u32, action: u32) -> Self {
        Self {
            tick,
            kind: TraceKind::Fired,
            node,
            value: action,
        }
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} node={} value={}",
            self.tick, self.kind, self.node, self.value
        )
    }
}

pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent);
}

impl<S: TraceSink + ?Sized> TraceSink for &mut S {
    fn emit(&mut self, event: TraceEvent) {
        (**self).emit(event);
    }
}

impl TraceSink for Vec<TraceEvent> {
    fn emit(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn emit(&mut self, _event: TraceEvent) {}
}

/// Forwards only the listed kinds to `inner`.
#[derive(Debug)]
pub struct KindFilter<S> {
    kinds: Vec<TraceKind>,
    inner: S,
}

impl<S: TraceSink> KindFilter<S> {
    pub fn new(kinds: impl IntoIterator<Item = TraceKind>, inner: S) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
            inner,
        }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: TraceSink> TraceSink for KindFilter<S> {
    fn emit(&mut self, event: TraceEvent) {
        if self.kinds.contains(&event.kind) {
            self.inner.emit(event);
        }
    }
}

/// Recorded events of one or more ticks, in emission order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceLog {
    pub events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn of_kind(&self, kind: TraceKind) -> impl Iterator<Item = &TraceEvent> + '_ {
        self.events.iter().filter(move |e| e.kind == kind)
    }

    pub fn at_tick(&self, tick: u64) -> impl Iterator<Item = &TraceEvent> + '_ {
        self.events.iter().filter(move |e| e.tick == tick)
    }

    /// Deciding node of each recorded tick, oldest first.
    pub fn fired(&self) -> impl Iterator<Item = (u64, u32)> + '_ {
        self.of_kind(TraceKind::Fired).map(|e| (e.tick, e.node))
    }
}

impl TraceSink for TraceLog {
    fn emit(&mut self, event: TraceEvent) {
        self.push(event);
    }
}

impl From<Vec<TraceEvent>> for TraceLog {
    fn from(events: Vec<TraceEvent>) -> Self {
        Self { events }
    }
}

impl fmt::Display for TraceLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "{event}")?;
        }
        Ok(())
    }
}
