//! Possession.
//!
//! Control is two state fields (team, index) resolved through the roster on
//! every query. Neutral control (no controller) only exists between a goal
//! and the next play start.

use super::events::GameEventType;
use super::rink::Rink;
use super::simulation::TickContext;
use super::types::PlayerRef;

impl Rink {
    pub fn controller(&self) -> Option<PlayerRef> {
        self.state.control()
    }

    pub fn has_control(&self, p: PlayerRef) -> bool {
        self.controller() == Some(p)
    }

    pub(crate) fn give_control(&mut self, p: PlayerRef, ctx: &mut TickContext<'_>) {
        self.state.set_control(Some(p));
        ctx.emit(GameEventType::GainControl, Some(self.name(p)), None);
    }

    pub(crate) fn release_control(&mut self) {
        self.state.set_control(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::{GameConfig, Rules};
    use crate::engine::events::{EventFilter, GameEventHistory};
    use crate::engine::simulation::TickFrame;
    use crate::engine::types::TeamSide;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_give_get_release() {
        let mut rink = Rink::new(
            Rules::standard(),
            GameConfig::default(),
            [vec![("h1".into(), false)], vec![("a1".into(), false), ("a2".into(), false)]],
        );
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut events = GameEventHistory::new();
        let mut frame = TickFrame::default();
        let mut ctx = TickContext { tick: 4, rng: &mut rng, events: &mut events, frame: &mut frame };

        let a2 = PlayerRef::new(TeamSide::Away, 1);
        assert_eq!(rink.controller(), Some(PlayerRef::new(TeamSide::Home, 0)));
        rink.give_control(a2, &mut ctx);
        assert!(rink.has_control(a2));
        assert_eq!(rink.state().get_field("control_team").unwrap().as_f64(), Some(1.0));
        assert_eq!(rink.state().get_field("control_index").unwrap().as_f64(), Some(1.0));

        rink.release_control();
        assert_eq!(rink.controller(), None);
        assert!(!rink.has_control(a2));

        let gained = events.find(&EventFilter::new().of_type(GameEventType::GainControl));
        assert_eq!(gained.len(), 1);
        assert_eq!(gained[0].source.as_deref(), Some("a2"));
        assert_eq!(gained[0].tick, 4);
    }
}
