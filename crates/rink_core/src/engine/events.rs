//! Discrete game events and the append-only event log.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameEventType {
    GameStart,
    GameEnd,
    Goal,
    Shot,
    MissedShot,
    ShotBlock,
    Check,
    Pass,
    PassComplete,
    PassIntercept,
    GainControl,
}

impl GameEventType {
    pub fn as_str(self) -> &'static str {
        match self {
            GameEventType::GameStart => "GAME_START",
            GameEventType::GameEnd => "GAME_END",
            GameEventType::Goal => "GOAL",
            GameEventType::Shot => "SHOT",
            GameEventType::MissedShot => "MISSED_SHOT",
            GameEventType::ShotBlock => "SHOT_BLOCK",
            GameEventType::Check => "CHECK",
            GameEventType::Pass => "PASS",
            GameEventType::PassComplete => "PASS_COMPLETE",
            GameEventType::PassIntercept => "PASS_INTERCEPT",
            GameEventType::GainControl => "GAIN_CONTROL",
        }
    }
}

impl fmt::Display for GameEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable log record. Players are identified by name; game-level
/// events (GAME_START, GAME_END) carry no source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub tick: u64,
    #[serde(rename = "type")]
    pub event_type: GameEventType,
    pub source: Option<String>,
    pub target: Option<String>,
}

impl GameEvent {
    pub fn new(
        tick: u64,
        event_type: GameEventType,
        source: Option<&str>,
        target: Option<&str>,
    ) -> Self {
        Self {
            tick,
            event_type,
            source: source.map(str::to_string),
            target: target.map(str::to_string),
        }
    }
}

/// Conjunctive query over the log. Unset criteria match everything; tick
/// bounds are inclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    event_type: Option<GameEventType>,
    min_tick: Option<u64>,
    max_tick: Option<u64>,
    source: Option<String>,
    target: Option<String>,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of_type(mut self, event_type: GameEventType) -> Self {
        self.event_type = Some(event_type);
        self
    }

    pub fn since(mut self, tick: u64) -> Self {
        self.min_tick = Some(tick);
        self
    }

    pub fn until(mut self, tick: u64) -> Self {
        self.max_tick = Some(tick);
        self
    }

    pub fn at_tick(self, tick: u64) -> Self {
        self.since(tick).until(tick)
    }

    pub fn from_source(mut self, name: &str) -> Self {
        self.source = Some(name.to_string());
        self
    }

    pub fn with_target(mut self, name: &str) -> Self {
        self.target = Some(name.to_string());
        self
    }

    pub fn matches(&self, event: &GameEvent) -> bool {
        self.event_type.map_or(true, |t| t == event.event_type)
            && self.min_tick.map_or(true, |t| event.tick >= t)
            && self.max_tick.map_or(true, |t| event.tick <= t)
            && self.source.as_deref().map_or(true, |s| event.source.as_deref() == Some(s))
            && self.target.as_deref().map_or(true, |s| event.target.as_deref() == Some(s))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameEventHistory {
    events: Vec<GameEvent>,
}

impl GameEventHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: GameEvent) {
        log::debug!(
            "[tick {}] {} {} -> {}",
            event.tick,
            event.event_type,
            event.source.as_deref().unwrap_or("-"),
            event.target.as_deref().unwrap_or("-")
        );
        self.events.push(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn all(&self) -> &[GameEvent] {
        &self.events
    }

    /// Matching events in log order.
    pub fn find(&self, filter: &EventFilter) -> Vec<&GameEvent> {
        self.events.iter().filter(|e| filter.matches(e)).collect()
    }

    /// Newest matching event.
    pub fn most_recent(&self, filter: &EventFilter) -> Option<&GameEvent> {
        self.events.iter().rev().find(|e| filter.matches(e))
    }

    pub fn count(&self, filter: &EventFilter) -> usize {
        self.events.iter().filter(|e| filter.matches(e)).count()
    }
}
