//! Canonical game state.
//!
//! A statically typed record split into global, per-team and per-player
//! sections. The schema is fixed when the state is built from the roster:
//! typed accessors make unknown fields unrepresentable, and the name-based
//! boundary ([`GameState::get_field`], [`GameState::set_field`],
//! [`GameState::snapshot`], [`GameState::load_snapshot`]) rejects names that
//! are not in the schema with [`SimError::SchemaViolation`].
//!
//! Field names follow the flat layout external consumers expect:
//!
//! | section | names |
//! |---------|-------|
//! | global  | `current_phase`, `previous_phase`, `arena_{min,max}_{x,z}`, `control_team`, `control_index` |
//! | team    | `home_net_x`, `home_net_z`, `home_attack_z`, `home_score`, `home_players` (same for `away`) |
//! | player  | `home0_name`, `home0_is_human`, `home0_pos_x`, `home0_pos_z`, `home0_vel_x`, `home0_vel_z`, `home0_input_x`, `home0_input_z`, `home0_action`, `home0_action_time` |
//!
//! Player prefixes are positional (team + roster index).

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::action::Action;
use super::arena::Arena;
use super::config::SnapshotLoadPolicy;
use super::phase::GamePhase;
use super::types::{PlayerRef, TeamSide, Vec2};
use crate::error::{Result, SimError};

// ===========================================
// Scalar values and snapshots
// ===========================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Number(v) => Some(*v),
            FieldValue::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Number(_) => None,
            FieldValue::Text(s) => Some(s),
        }
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Number(v)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

/// Ordered field → value mapping, in schema order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StateSnapshot {
    fields: Vec<(String, FieldValue)>,
}

impl StateSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    /// Insert or replace, keeping first-insertion order.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        let name = name.into();
        match self.fields.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        let pos = self.fields.iter().position(|(k, _)| k == name)?;
        Some(self.fields.remove(pos).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for StateSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StateSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct SnapshotVisitor;

        impl<'de> Visitor<'de> for SnapshotVisitor {
            type Value = StateSnapshot;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of state field names to numbers or strings")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut snapshot = StateSnapshot::new();
                while let Some((k, v)) = access.next_entry::<String, FieldValue>()? {
                    snapshot.insert(k, v);
                }
                Ok(snapshot)
            }
        }

        deserializer.deserialize_map(SnapshotVisitor)
    }
}

// ===========================================
// Schema keys
// ===========================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TeamField {
    NetX,
    NetZ,
    AttackZ,
    Score,
    Players,
}

impl TeamField {
    const ALL: [TeamField; 5] =
        [TeamField::NetX, TeamField::NetZ, TeamField::AttackZ, TeamField::Score, TeamField::Players];

    fn suffix(self) -> &'static str {
        match self {
            TeamField::NetX => "_net_x",
            TeamField::NetZ => "_net_z",
            TeamField::AttackZ => "_attack_z",
            TeamField::Score => "_score",
            TeamField::Players => "_players",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PlayerField {
    Name,
    IsHuman,
    PosX,
    PosZ,
    VelX,
    VelZ,
    InputX,
    InputZ,
    Action,
    ActionTime,
}

impl PlayerField {
    const ALL: [PlayerField; 10] = [
        PlayerField::Name,
        PlayerField::IsHuman,
        PlayerField::PosX,
        PlayerField::PosZ,
        PlayerField::VelX,
        PlayerField::VelZ,
        PlayerField::InputX,
        PlayerField::InputZ,
        PlayerField::Action,
        PlayerField::ActionTime,
    ];

    fn suffix(self) -> &'static str {
        match self {
            PlayerField::Name => "_name",
            PlayerField::IsHuman => "_is_human",
            PlayerField::PosX => "_pos_x",
            PlayerField::PosZ => "_pos_z",
            PlayerField::VelX => "_vel_x",
            PlayerField::VelZ => "_vel_z",
            PlayerField::InputX => "_input_x",
            PlayerField::InputZ => "_input_z",
            PlayerField::Action => "_action",
            PlayerField::ActionTime => "_action_time",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKey {
    CurrentPhase,
    PreviousPhase,
    ArenaMinX,
    ArenaMaxX,
    ArenaMinZ,
    ArenaMaxZ,
    ControlTeam,
    ControlIndex,
    Team(TeamSide, TeamField),
    Player(PlayerRef, PlayerField),
}

impl FieldKey {
    fn name(self) -> String {
        match self {
            FieldKey::CurrentPhase => "current_phase".into(),
            FieldKey::PreviousPhase => "previous_phase".into(),
            FieldKey::ArenaMinX => "arena_min_x".into(),
            FieldKey::ArenaMaxX => "arena_max_x".into(),
            FieldKey::ArenaMinZ => "arena_min_z".into(),
            FieldKey::ArenaMaxZ => "arena_max_z".into(),
            FieldKey::ControlTeam => "control_team".into(),
            FieldKey::ControlIndex => "control_index".into(),
            FieldKey::Team(side, f) => format!("{}{}", side.name(), f.suffix()),
            FieldKey::Player(p, f) => format!("{}{}", p.field_prefix(), f.suffix()),
        }
    }

    /// Identity and geometry fields never change after construction.
    fn is_read_only(self) -> bool {
        matches!(
            self,
            FieldKey::ArenaMinX
                | FieldKey::ArenaMaxX
                | FieldKey::ArenaMinZ
                | FieldKey::ArenaMaxZ
                | FieldKey::Team(_, TeamField::NetX)
                | FieldKey::Team(_, TeamField::NetZ)
                | FieldKey::Team(_, TeamField::AttackZ)
                | FieldKey::Team(_, TeamField::Players)
                | FieldKey::Player(_, PlayerField::Name)
                | FieldKey::Player(_, PlayerField::IsHuman)
        )
    }
}

/// A parsed, validated write.
#[derive(Debug, Clone, PartialEq)]
enum FieldWrite {
    Phase { previous: bool, phase: GamePhase },
    ControlTeam(i64),
    ControlIndex(i64),
    Score(TeamSide, u32),
    Scalar(PlayerRef, PlayerField, f64),
    Action(PlayerRef, Action),
    ActionTime(PlayerRef, u32),
    /// Read-only field written with its current value.
    Unchanged,
}

// ===========================================
// Records
// ===========================================

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerFields {
    pub name: String,
    pub is_human: bool,
    pub position: Vec2,
    pub velocity: Vec2,
    pub input: Vec2,
    pub action: Action,
    /// Ticks before the player may act again (response delay or stun).
    pub action_time: u32,
}

impl PlayerFields {
    fn new(name: String, is_human: bool) -> Self {
        Self {
            name,
            is_human,
            position: Vec2::zeros(),
            velocity: Vec2::zeros(),
            input: Vec2::zeros(),
            action: Action::None,
            action_time: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamFields {
    pub net: Vec2,
    pub attack_z: f64,
    pub score: u32,
    players: Vec<PlayerFields>,
}

impl TeamFields {
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn players(&self) -> &[PlayerFields] {
        &self.players
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    current_phase: GamePhase,
    previous_phase: GamePhase,
    arena_min: Vec2,
    arena_max: Vec2,
    control: Option<PlayerRef>,
    teams: [TeamFields; 2],
}

impl GameState {
    /// Build the full schema. `rosters[side]` lists `(name, is_human)` in roster order.
    pub fn new(arena: &Arena, rosters: [Vec<(String, bool)>; 2]) -> Self {
        let [home, away] = rosters;
        let team = |side: TeamSide, players: Vec<(String, bool)>| TeamFields {
            net: arena.net_position(side),
            attack_z: arena.attack_z(side),
            score: 0,
            players: players.into_iter().map(|(n, h)| PlayerFields::new(n, h)).collect(),
        };
        let teams = [team(TeamSide::Home, home), team(TeamSide::Away, away)];

        let control = TeamSide::BOTH
            .iter()
            .find(|s| teams[s.index()].player_count() > 0)
            .map(|s| PlayerRef::new(*s, 0));

        Self {
            current_phase: GamePhase::PreGame,
            previous_phase: GamePhase::PreGame,
            arena_min: arena.mins(),
            arena_max: arena.maxs(),
            control,
            teams,
        }
    }

    // ========== Global ==========

    pub fn phase(&self) -> GamePhase {
        self.current_phase
    }

    pub fn previous_phase(&self) -> GamePhase {
        self.previous_phase
    }

    /// Move to `phase`, remembering the current one as previous.
    pub fn set_phase(&mut self, phase: GamePhase) {
        self.previous_phase = self.current_phase;
        self.current_phase = phase;
    }

    pub fn control(&self) -> Option<PlayerRef> {
        self.control
    }

    pub(crate) fn set_control(&mut self, control: Option<PlayerRef>) {
        debug_assert!(control.map_or(true, |p| self.contains(p)));
        self.control = control;
    }

    // ========== Team ==========

    pub fn team(&self, side: TeamSide) -> &TeamFields {
        &self.teams[side.index()]
    }

    pub fn score(&self, side: TeamSide) -> u32 {
        self.team(side).score
    }

    pub fn set_score(&mut self, side: TeamSide, score: u32) {
        self.teams[side.index()].score = score;
    }

    pub fn player_count(&self, side: TeamSide) -> usize {
        self.team(side).player_count()
    }

    // ========== Player ==========

    pub fn contains(&self, p: PlayerRef) -> bool {
        p.index < self.player_count(p.side)
    }

    /// Every player slot, home roster first.
    pub fn player_refs(&self) -> impl Iterator<Item = PlayerRef> + '_ {
        TeamSide::BOTH.into_iter().flat_map(move |side| {
            (0..self.player_count(side)).map(move |i| PlayerRef::new(side, i))
        })
    }

    pub fn player(&self, p: PlayerRef) -> &PlayerFields {
        &self.teams[p.side.index()].players[p.index]
    }

    fn player_mut(&mut self, p: PlayerRef) -> &mut PlayerFields {
        &mut self.teams[p.side.index()].players[p.index]
    }

    pub fn position(&self, p: PlayerRef) -> Vec2 {
        self.player(p).position
    }

    pub fn set_position(&mut self, p: PlayerRef, position: Vec2) {
        self.player_mut(p).position = position;
    }

    pub fn velocity(&self, p: PlayerRef) -> Vec2 {
        self.player(p).velocity
    }

    pub fn set_velocity(&mut self, p: PlayerRef, velocity: Vec2) {
        self.player_mut(p).velocity = velocity;
    }

    pub fn input(&self, p: PlayerRef) -> Vec2 {
        self.player(p).input
    }

    pub fn set_input(&mut self, p: PlayerRef, input: Vec2) {
        self.player_mut(p).input = input;
    }

    pub fn action(&self, p: PlayerRef) -> Action {
        self.player(p).action
    }

    pub fn set_action(&mut self, p: PlayerRef, action: Action) {
        self.player_mut(p).action = action;
    }

    pub fn action_time(&self, p: PlayerRef) -> u32 {
        self.player(p).action_time
    }

    pub fn set_action_time(&mut self, p: PlayerRef, ticks: u32) {
        self.player_mut(p).action_time = ticks;
    }

    // ===========================================
    // Name-addressed boundary
    // ===========================================

    fn schema(&self) -> Vec<FieldKey> {
        let mut keys = vec![
            FieldKey::CurrentPhase,
            FieldKey::PreviousPhase,
            FieldKey::ArenaMinX,
            FieldKey::ArenaMaxX,
            FieldKey::ArenaMinZ,
            FieldKey::ArenaMaxZ,
            FieldKey::ControlTeam,
            FieldKey::ControlIndex,
        ];
        for side in TeamSide::BOTH {
            keys.extend(TeamField::ALL.iter().map(|f| FieldKey::Team(side, *f)));
        }
        for p in self.player_refs() {
            keys.extend(PlayerField::ALL.iter().map(|f| FieldKey::Player(p, *f)));
        }
        keys
    }

    /// Every declared field name, in schema order.
    pub fn field_names(&self) -> Vec<String> {
        self.schema().into_iter().map(FieldKey::name).collect()
    }

    fn parse_key(&self, name: &str) -> Result<FieldKey> {
        let violation = || SimError::SchemaViolation { field: name.to_string() };

        let global = [
            FieldKey::CurrentPhase,
            FieldKey::PreviousPhase,
            FieldKey::ArenaMinX,
            FieldKey::ArenaMaxX,
            FieldKey::ArenaMinZ,
            FieldKey::ArenaMaxZ,
            FieldKey::ControlTeam,
            FieldKey::ControlIndex,
        ];
        if let Some(key) = global.into_iter().find(|k| k.name() == name) {
            return Ok(key);
        }

        let (side, rest) = TeamSide::BOTH
            .iter()
            .find_map(|s| name.strip_prefix(s.name()).map(|rest| (*s, rest)))
            .ok_or_else(violation)?;

        if let Some(field) = TeamField::ALL.iter().find(|f| f.suffix() == rest) {
            return Ok(FieldKey::Team(side, *field));
        }

        let digits = rest.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits == 0 {
            return Err(violation());
        }
        let index: usize = rest[..digits].parse().map_err(|_| violation())?;
        let p = PlayerRef::new(side, index);
        if !self.contains(p) {
            return Err(violation());
        }
        let key = PlayerField::ALL
            .iter()
            .find(|f| f.suffix() == &rest[digits..])
            .map(|f| FieldKey::Player(p, *f))
            .ok_or_else(violation)?;
        // only the rendering snapshot() emits; `home00_pos_x` is not `home0_pos_x`
        if key.name() != name {
            return Err(violation());
        }
        Ok(key)
    }

    fn read(&self, key: FieldKey) -> FieldValue {
        use FieldValue::{Number, Text};
        match key {
            FieldKey::CurrentPhase => Text(self.current_phase.as_str().into()),
            FieldKey::PreviousPhase => Text(self.previous_phase.as_str().into()),
            FieldKey::ArenaMinX => Number(self.arena_min.x),
            FieldKey::ArenaMaxX => Number(self.arena_max.x),
            FieldKey::ArenaMinZ => Number(self.arena_min.y),
            FieldKey::ArenaMaxZ => Number(self.arena_max.y),
            FieldKey::ControlTeam => {
                Number(self.control.map_or(-1.0, |p| p.side.index() as f64))
            }
            FieldKey::ControlIndex => Number(self.control.map_or(-1.0, |p| p.index as f64)),
            FieldKey::Team(side, field) => {
                let team = self.team(side);
                Number(match field {
                    TeamField::NetX => team.net.x,
                    TeamField::NetZ => team.net.y,
                    TeamField::AttackZ => team.attack_z,
                    TeamField::Score => team.score as f64,
                    TeamField::Players => team.player_count() as f64,
                })
            }
            FieldKey::Player(p, field) => {
                let pf = self.player(p);
                match field {
                    PlayerField::Name => Text(pf.name.clone()),
                    PlayerField::IsHuman => Number(if pf.is_human { 1.0 } else { 0.0 }),
                    PlayerField::PosX => Number(pf.position.x),
                    PlayerField::PosZ => Number(pf.position.y),
                    PlayerField::VelX => Number(pf.velocity.x),
                    PlayerField::VelZ => Number(pf.velocity.y),
                    PlayerField::InputX => Number(pf.input.x),
                    PlayerField::InputZ => Number(pf.input.y),
                    PlayerField::Action => Text(pf.action.as_str().into()),
                    PlayerField::ActionTime => Number(pf.action_time as f64),
                }
            }
        }
    }

    /// Value of a named field.
    pub fn get_field(&self, name: &str) -> Result<FieldValue> {
        Ok(self.read(self.parse_key(name)?))
    }

    /// Overwrite a named field. Unknown names are a schema violation.
    pub fn set_field(&mut self, name: &str, value: FieldValue) -> Result<()> {
        let key = self.parse_key(name)?;
        let write = self.validate(key, &value)?;
        let (mut team, mut index) = self.control_pair();
        match write {
            FieldWrite::ControlTeam(t) => team = t,
            FieldWrite::ControlIndex(i) => index = i,
            other => {
                self.apply(other);
                return Ok(());
            }
        }
        self.control = self.resolve_control(team, index)?;
        Ok(())
    }

    /// Full ordered copy of every field.
    pub fn snapshot(&self) -> StateSnapshot {
        let mut snapshot = StateSnapshot::new();
        for key in self.schema() {
            snapshot.insert(key.name(), self.read(key));
        }
        snapshot
    }

    /// Overwrite fields from an external mapping.
    ///
    /// Every entry is validated before anything is written, so a failed load
    /// leaves the state untouched. See [`SnapshotLoadPolicy`] for key-set rules.
    pub fn load_snapshot(
        &mut self,
        snapshot: &StateSnapshot,
        policy: SnapshotLoadPolicy,
    ) -> Result<()> {
        let declared = self.field_names();

        let mut unknown = Vec::new();
        let mut writes = Vec::new();
        for (name, value) in snapshot.iter() {
            match self.parse_key(name) {
                Ok(key) => writes.push(self.validate(key, value)?),
                Err(SimError::SchemaViolation { .. }) => unknown.push(name.to_string()),
                Err(e) => return Err(e),
            }
        }

        match policy {
            SnapshotLoadPolicy::Strict => {
                let missing: Vec<String> =
                    declared.into_iter().filter(|n| snapshot.get(n).is_none()).collect();
                if !missing.is_empty() || !unknown.is_empty() {
                    return Err(SimError::SnapshotMismatch { missing, unknown });
                }
            }
            SnapshotLoadPolicy::Permissive => {
                if !unknown.is_empty() {
                    log::warn!("ignoring {} unknown snapshot fields: {:?}", unknown.len(), unknown);
                }
            }
        }

        let (mut team, mut index) = self.control_pair();
        for write in &writes {
            match write {
                FieldWrite::ControlTeam(t) => team = *t,
                FieldWrite::ControlIndex(i) => index = *i,
                _ => {}
            }
        }
        let control = self.resolve_control(team, index)?;

        for write in writes {
            self.apply(write);
        }
        self.control = control;
        Ok(())
    }

    fn control_pair(&self) -> (i64, i64) {
        self.control.map_or((-1, -1), |p| (p.side.index() as i64, p.index as i64))
    }

    fn resolve_control(&self, team: i64, index: i64) -> Result<Option<PlayerRef>> {
        if team < 0 && index < 0 {
            return Ok(None);
        }
        let side = usize::try_from(team).ok().and_then(TeamSide::from_index);
        let index_ok = usize::try_from(index).ok();
        match (side, index_ok) {
            (Some(side), Some(i)) if self.contains(PlayerRef::new(side, i)) => {
                Ok(Some(PlayerRef::new(side, i)))
            }
            _ => Err(SimError::InvalidControl { team, index }),
        }
    }

    fn validate(&self, key: FieldKey, value: &FieldValue) -> Result<FieldWrite> {
        let name = key.name();
        let expect = |expected: &'static str| SimError::FieldType { field: name.clone(), expected };

        if key.is_read_only() {
            return if self.read(key) == *value {
                Ok(FieldWrite::Unchanged)
            } else {
                Err(SimError::ReadOnlyField { field: name })
            };
        }

        let number = || value.as_f64().ok_or_else(|| expect("numeric"));
        let count = || {
            let v = number()?;
            if v >= 0.0 && v.fract() == 0.0 && v <= u32::MAX as f64 {
                Ok(v as u32)
            } else {
                Err(expect("non-negative integer"))
            }
        };
        let integer = || {
            let v = number()?;
            if v.fract() == 0.0 {
                Ok(v as i64)
            } else {
                Err(expect("integer"))
            }
        };
        let text = || value.as_str().ok_or_else(|| expect("text"));

        Ok(match key {
            FieldKey::CurrentPhase => FieldWrite::Phase { previous: false, phase: text()?.parse()? },
            FieldKey::PreviousPhase => FieldWrite::Phase { previous: true, phase: text()?.parse()? },
            FieldKey::ControlTeam => FieldWrite::ControlTeam(integer()?),
            FieldKey::ControlIndex => FieldWrite::ControlIndex(integer()?),
            FieldKey::Team(side, TeamField::Score) => FieldWrite::Score(side, count()?),
            FieldKey::Player(p, PlayerField::Action) => FieldWrite::Action(p, text()?.parse()?),
            FieldKey::Player(p, PlayerField::ActionTime) => FieldWrite::ActionTime(p, count()?),
            FieldKey::Player(p, field) => {
                let v = number()?;
                if !v.is_finite() {
                    return Err(expect("finite"));
                }
                FieldWrite::Scalar(p, field, v)
            }
            _ => unreachable!("read-only keys handled above"),
        })
    }

    fn apply(&mut self, write: FieldWrite) {
        match write {
            FieldWrite::Phase { previous: true, phase } => self.previous_phase = phase,
            FieldWrite::Phase { previous: false, phase } => self.current_phase = phase,
            FieldWrite::Score(side, score) => self.set_score(side, score),
            FieldWrite::Action(p, action) => self.set_action(p, action),
            FieldWrite::ActionTime(p, t) => self.set_action_time(p, t),
            FieldWrite::Scalar(p, field, v) => {
                let pf = self.player_mut(p);
                match field {
                    PlayerField::PosX => pf.position.x = v,
                    PlayerField::PosZ => pf.position.y = v,
                    PlayerField::VelX => pf.velocity.x = v,
                    PlayerField::VelZ => pf.velocity.y = v,
                    PlayerField::InputX => pf.input.x = v,
                    PlayerField::InputZ => pf.input.y = v,
                    _ => {}
                }
            }
            FieldWrite::ControlTeam(_) | FieldWrite::ControlIndex(_) | FieldWrite::Unchanged => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_v_one() -> GameState {
        let arena = Arena::new((18.0, 36.0));
        GameState::new(
            &arena,
            [
                vec![("h1".to_string(), false), ("h2".to_string(), true)],
                vec![("a1".to_string(), false)],
            ],
        )
    }

    #[test]
    fn test_schema_layout() {
        let state = two_v_one();
        let names = state.field_names();
        assert_eq!(names.len(), 8 + 2 * 5 + 3 * 10);
        assert_eq!(names[0], "current_phase");
        assert!(names.contains(&"away_attack_z".to_string()));
        assert!(names.contains(&"home1_action_time".to_string()));
        assert!(!names.contains(&"away1_pos_x".to_string()));
    }

    #[test]
    fn test_initial_values() {
        let state = two_v_one();
        assert_eq!(state.phase(), GamePhase::PreGame);
        assert_eq!(state.control(), Some(PlayerRef::new(TeamSide::Home, 0)));
        assert_eq!(state.get_field("home_net_z").unwrap(), FieldValue::Number(18.0));
        assert_eq!(state.get_field("away_attack_z").unwrap(), FieldValue::Number(-1.0));
        assert_eq!(state.get_field("home1_is_human").unwrap(), FieldValue::Number(1.0));
        assert_eq!(state.get_field("away0_action").unwrap(), FieldValue::from("NONE"));
        assert_eq!(state.get_field("home_players").unwrap(), FieldValue::Number(2.0));
    }

    #[test]
    fn test_unknown_field_is_schema_violation() {
        let mut state = two_v_one();
        for name in ["home_goalie", "away1_pos_x", "home0_stamina", "tick", "home"] {
            let err = state.set_field(name, FieldValue::Number(1.0)).unwrap_err();
            assert_eq!(err, SimError::SchemaViolation { field: name.to_string() });
            assert!(err.is_precondition());
        }
        assert!(state.get_field("home9_name").is_err());
    }

    #[test]
    fn test_set_field_typed() {
        let mut state = two_v_one();
        state.set_field("home0_pos_x", 2.5.into()).unwrap();
        state.set_field("away0_action", "SHOOT".into()).unwrap();
        state.set_field("home_score", 3.0.into()).unwrap();
        assert_eq!(state.position(PlayerRef::new(TeamSide::Home, 0)).x, 2.5);
        assert_eq!(state.action(PlayerRef::new(TeamSide::Away, 0)), Action::Shoot);
        assert_eq!(state.score(TeamSide::Home), 3);

        assert!(matches!(
            state.set_field("home_score", 1.5.into()),
            Err(SimError::FieldType { .. })
        ));
        assert!(matches!(
            state.set_field("current_phase", "OVERTIME".into()),
            Err(SimError::UnrecognizedPhase(_))
        ));
        assert!(matches!(
            state.set_field("home0_name", "someone".into()),
            Err(SimError::ReadOnlyField { .. })
        ));
    }

    #[test]
    fn test_control_fields_validate_slot() {
        let mut state = two_v_one();
        state.set_field("control_index", 1.0.into()).unwrap();
        assert_eq!(state.control(), Some(PlayerRef::new(TeamSide::Home, 1)));

        // away has a single player
        let err = state.set_field("control_team", 1.0.into()).unwrap_err();
        assert_eq!(err, SimError::InvalidControl { team: 1, index: 1 });
        assert_eq!(state.control(), Some(PlayerRef::new(TeamSide::Home, 1)));
    }

    #[test]
    fn test_neutral_control_encoding() {
        let mut state = two_v_one();
        state.set_control(None);
        let snap = state.snapshot();
        assert_eq!(snap.get("control_team"), Some(&FieldValue::Number(-1.0)));
        assert_eq!(snap.get("control_index"), Some(&FieldValue::Number(-1.0)));
    }

    #[test]
    fn test_snapshot_load_round_trip() {
        let mut state = two_v_one();
        state.set_position(PlayerRef::new(TeamSide::Away, 0), Vec2::new(1.0, -4.0));
        state.set_phase(GamePhase::StartPlay);
        let snap = state.snapshot();

        let mut other = two_v_one();
        other.load_snapshot(&snap, SnapshotLoadPolicy::Strict).unwrap();
        assert_eq!(other, state);
    }

    #[test]
    fn test_permissive_load_ignores_unknown_and_missing() {
        let mut state = two_v_one();
        let mut snap = StateSnapshot::new();
        snap.insert("home0_vel_z", 0.25.into());
        snap.insert("bench_size", 4.0.into());
        state.load_snapshot(&snap, SnapshotLoadPolicy::Permissive).unwrap();
        assert_eq!(state.velocity(PlayerRef::new(TeamSide::Home, 0)).y, 0.25);
    }

    #[test]
    fn test_strict_load_reports_mismatch_without_writing() {
        let mut state = two_v_one();
        let mut snap = state.snapshot();
        snap.remove("away0_pos_z");
        snap.insert("bench_size", 4.0.into());
        snap.insert("home0_pos_x", 7.0.into());

        let err = state.load_snapshot(&snap, SnapshotLoadPolicy::Strict).unwrap_err();
        assert_eq!(
            err,
            SimError::SnapshotMismatch {
                missing: vec!["away0_pos_z".into()],
                unknown: vec!["bench_size".into()],
            }
        );
        assert_eq!(state.position(PlayerRef::new(TeamSide::Home, 0)).x, 0.0);
    }

    #[test]
    fn test_non_canonical_player_keys_are_rejected() {
        let mut state = two_v_one();
        for alias in ["home00_pos_x", "away00_action", "home01_vel_z"] {
            assert_eq!(
                state.get_field(alias).unwrap_err(),
                SimError::SchemaViolation { field: alias.to_string() }
            );
        }

        // an alias cannot stand in for the canonical key under strict loading
        let mut snap = state.snapshot();
        snap.remove("home0_pos_x");
        snap.insert("home00_pos_x", 5.0.into());
        let err = state.load_snapshot(&snap, SnapshotLoadPolicy::Strict).unwrap_err();
        assert_eq!(
            err,
            SimError::SnapshotMismatch {
                missing: vec!["home0_pos_x".into()],
                unknown: vec!["home00_pos_x".into()],
            }
        );
        assert_eq!(state.position(PlayerRef::new(TeamSide::Home, 0)).x, 0.0);
    }

    #[test]
    fn test_failed_load_is_atomic() {
        let mut state = two_v_one();
        let mut snap = StateSnapshot::new();
        snap.insert("home0_pos_x", 3.0.into());
        snap.insert("away0_action_time", (-2.0).into());
        assert!(state.load_snapshot(&snap, SnapshotLoadPolicy::Permissive).is_err());
        assert_eq!(state.position(PlayerRef::new(TeamSide::Home, 0)).x, 0.0);
    }

    #[test]
    fn test_snapshot_json_keeps_schema_order() {
        let state = two_v_one();
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        assert!(json.starts_with("{\"current_phase\":\"PRE_GAME\",\"previous_phase\""));

        let parsed: StateSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state.snapshot());
    }
}
