//! Super Creative Adventure — game core
//!
//! The engine behind a tile-grid arcade/RPG hybrid: roam a 12x12 office
//! grid collecting coffee and stickers, shoot projectiles at enemies,
//! and fight BUREAUCRAT.EXE in turn-based battles, all scored to a
//! procedurally synthesized chiptune soundtrack.
//!
//! Key pieces:
//! - `audio` — oscillator voices, note scheduling, background music
//! - `world` — the grid simulation: intents, ticks, collisions, events
//! - `battle` — the self-contained turn state machine
//! - `stats` — health / creativity / stickers scoring
//! - `explore` — the session gluing world events to stats and audio
//! - `config` — every tunable, with RON load/save
//!
//! Rendering, input mapping, and the intro/explore/battle mode switch
//! live in the embedding application, not here. The world reports what
//! happened through event queues; the audio engine is notified and never
//! asked.

pub mod audio;
pub mod battle;
pub mod config;
pub mod explore;
pub mod stats;
pub mod world;

pub use audio::{AudioEngine, MusicHandle};
pub use battle::{Battle, BattleMove, BattlePhase, TurnOutcome};
pub use config::GameConfig;
pub use explore::ExploreSession;
pub use stats::PlayerStats;
pub use world::{Direction, Intent, ItemKind, Position, World};
