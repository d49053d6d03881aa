//! Explore Mode
//!
//! The session that glues the core together while the player roams the
//! grid. Owns the world, the player stats, and the fixed-step tick
//! accumulator; translates world events into audio cues and stat
//! changes. Audio is notification-only — nothing here reads anything
//! back from the engine.
//!
//! The mode switch itself (explore ↔ battle) belongs to the caller; this
//! session only raises a flag when the world reports an encounter.

use rand::Rng;

use crate::audio::AudioEngine;
use crate::config::GameConfig;
use crate::stats::PlayerStats;
use crate::world::{Intent, World};

/// One explore-mode play session.
pub struct ExploreSession {
    world: World,
    stats: PlayerStats,
    /// Seconds per projectile tick
    tick_duration: f64,
    /// Wall-clock time not yet consumed by whole ticks
    accumulator: f64,
    /// Set when the world reports an enemy encounter; cleared by
    /// `take_battle_request`
    battle_requested: bool,
}

impl ExploreSession {
    /// Start a session on a freshly generated world.
    pub fn new(config: &GameConfig, rng: &mut impl Rng) -> Self {
        Self::with_world(World::generate(config, rng), config)
    }

    /// Start a session on a prepared world (scenario setups and tests).
    pub fn with_world(world: World, config: &GameConfig) -> Self {
        Self {
            world,
            stats: PlayerStats::new(),
            tick_duration: config.tick_duration as f64,
            accumulator: 0.0,
            battle_requested: false,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn stats(&self) -> &PlayerStats {
        &self.stats
    }

    /// True once per encounter: the caller should switch to battle mode.
    pub fn take_battle_request(&mut self) -> bool {
        std::mem::take(&mut self.battle_requested)
    }

    /// Apply a finished battle to the stats. The grid enemy stays where
    /// it is — re-entering its cell starts the next round.
    pub fn finish_battle(&mut self, won: bool) {
        self.stats.apply_battle_outcome(won);
    }

    /// Feed one player intent through the world and resolve the
    /// fallout. Fire intents cue the shot sound whether or not the
    /// projectile ever hits anything.
    pub fn handle_intent(&mut self, intent: Intent, audio: &AudioEngine) {
        if intent == Intent::Fire {
            audio.play_shoot();
        }
        self.world.handle_intent(intent);
        self.drain_events(audio);
    }

    /// Advance wall-clock time, running every whole tick that has come
    /// due and carrying the remainder.
    pub fn update(&mut self, dt: f64, audio: &AudioEngine) {
        self.accumulator += dt;
        while self.tick_duration > 0.0 && self.accumulator >= self.tick_duration {
            self.accumulator -= self.tick_duration;
            self.world.tick();
        }
        self.drain_events(audio);
    }

    /// Map drained world events to stat changes and audio cues.
    fn drain_events(&mut self, audio: &AudioEngine) {
        for event in self.world.events.item_collected.drain() {
            self.stats.collect(event.kind);
            audio.play_collect();
        }
        for _ in self.world.events.battle_started.drain() {
            self.battle_requested = true;
            audio.play_battle_start();
        }
        for _ in self.world.events.enemy_destroyed.drain() {
            audio.play_enemy_hit();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{Direction, ItemKind, Position};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn session_with(world: World) -> (ExploreSession, AudioEngine) {
        let config = GameConfig::default();
        (
            ExploreSession::with_world(world, &config),
            AudioEngine::new(&config),
        )
    }

    #[test]
    fn test_update_runs_whole_ticks_and_carries_remainder() {
        let mut world = World::empty(12);
        world.spawn_projectile(Position::new(5, 5), Direction::Right);
        let (mut session, audio) = session_with(world);

        // 0.5s at a 0.2s tick: two ticks, 0.1s carried
        session.update(0.5, &audio);
        assert_eq!(session.world().projectiles()[0].position, Position::new(7, 5));

        // The carried 0.1s plus another 0.1s makes the third tick
        session.update(0.1, &audio);
        assert_eq!(session.world().projectiles()[0].position, Position::new(8, 5));
    }

    #[test]
    fn test_collection_feeds_stats() {
        let mut world = World::empty(12);
        world.spawn_item(Position::new(2, 1), ItemKind::Coffee);
        world.spawn_item(Position::new(3, 1), ItemKind::Sticker);
        let (mut session, audio) = session_with(world);

        session.handle_intent(Intent::Move(Direction::Right), &audio);
        session.handle_intent(Intent::Move(Direction::Right), &audio);

        assert_eq!(session.stats().creativity, 10);
        assert_eq!(session.stats().stickers, 1);
        assert!(session.world().items().is_empty());
    }

    #[test]
    fn test_encounter_raises_battle_request_once() {
        let mut world = World::empty(12);
        world.spawn_enemy(Position::new(2, 1));
        let (mut session, audio) = session_with(world);

        session.handle_intent(Intent::Move(Direction::Right), &audio);
        assert!(session.take_battle_request());
        assert!(!session.take_battle_request(), "request is consumed");

        // Walking off and back on raises it again
        session.handle_intent(Intent::Move(Direction::Left), &audio);
        session.handle_intent(Intent::Move(Direction::Right), &audio);
        assert!(session.take_battle_request());
    }

    #[test]
    fn test_finish_battle_applies_stats() {
        let (mut session, _audio) = session_with(World::empty(12));

        session.finish_battle(true);
        assert_eq!(session.stats().health, 120);

        session.finish_battle(false);
        assert_eq!(session.stats().health, 100);
    }

    #[test]
    fn test_generated_session() {
        let config = GameConfig::default();
        let mut rng = StdRng::seed_from_u64(42);
        let session = ExploreSession::new(&config, &mut rng);

        assert_eq!(session.world().items().len(), config.item_count);
        assert_eq!(session.world().enemies().len(), config.enemy_count);
        assert_eq!(session.stats().health, 100);
    }
}
