//! World Simulation
//!
//! Grid-world state for the explore mode:
//! - Player cursor with a persistent facing direction
//! - Items and enemies scattered at generation time
//! - Projectiles advanced on a fixed external tick
//!
//! Two mutation pathways exist and never interleave:
//! - `handle_intent` runs synchronously per discrete input event
//! - `tick` runs once per fixed cadence and advances projectiles
//!
//! The world reports what happened through event queues (see `event`);
//! it has no knowledge of audio, stats, or rendering.

pub mod event;
pub mod grid;

pub use event::{BattleStartedEvent, EnemyDestroyedEvent, Events, ItemCollectedEvent};
pub use grid::{Direction, Position};

use rand::Rng;

use crate::config::GameConfig;

/// What an item does when collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// Energy boost: raises creativity
    Coffee,
    /// Collectible: counted, fuels the sticker attack
    Sticker,
}

/// A collectible sitting on a cell until the player walks onto it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Item {
    pub position: Position,
    pub kind: ItemKind,
}

/// An enemy occupying a cell. Health lives in the battle state, not here;
/// on the grid an enemy only exists or doesn't.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enemy {
    pub position: Position,
}

/// A projectile in flight. Moves one cell per tick along its direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projectile {
    pub position: Position,
    pub direction: Direction,
}

/// A discrete player instruction, handled synchronously and atomically.
///
/// Callers deliver one intent per key-press equivalent (edge-triggered,
/// not key-repeat). The enum is closed: malformed input is
/// unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Move the cursor one cell and face that way
    Move(Direction),
    /// Spawn a projectile at the cursor, heading the way the cursor faces
    Fire,
}

/// The grid world. Exclusively owns every entity collection and the
/// player cursor; callers mutate only through intents and ticks.
pub struct World {
    side: i32,
    player: Position,
    facing: Direction,
    items: Vec<Item>,
    enemies: Vec<Enemy>,
    projectiles: Vec<Projectile>,

    /// Events produced by intents and ticks, drained by the caller
    pub events: Events,
}

/// Resampling cap for `distinct_placements`. After this many misses on
/// a single entity the collision is accepted rather than spinning on a
/// config with more entities than free interior cells.
const PLACEMENT_ATTEMPTS: u32 = 1000;

impl World {
    /// Create an empty world: player at (1,1) facing right, nothing else.
    pub fn empty(side: i32) -> Self {
        Self {
            side,
            player: Position::new(1, 1),
            facing: Direction::Right,
            items: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            events: Events::new(),
        }
    }

    /// Generate a world: `item_count` items and `enemy_count` enemies on
    /// random non-border cells (`x, y` in `[1, side-2]`), item kinds by
    /// fair coin flip.
    ///
    /// Placements may overlap each other and the player start unless
    /// `config.distinct_placements` is set, in which case occupied cells
    /// are resampled.
    pub fn generate(config: &GameConfig, rng: &mut impl Rng) -> Self {
        let mut world = Self::empty(config.grid_side);

        for _ in 0..config.item_count {
            let position = world.sample_cell(config, rng);
            let kind = if rng.gen_bool(0.5) {
                ItemKind::Coffee
            } else {
                ItemKind::Sticker
            };
            world.items.push(Item { position, kind });
        }

        for _ in 0..config.enemy_count {
            let position = world.sample_cell(config, rng);
            world.enemies.push(Enemy { position });
        }

        world
    }

    /// Sample a random non-border cell, resampling occupied cells when the
    /// config asks for distinct placements.
    fn sample_cell(&self, config: &GameConfig, rng: &mut impl Rng) -> Position {
        let mut position = Position::new(
            rng.gen_range(1..self.side - 1),
            rng.gen_range(1..self.side - 1),
        );

        if config.distinct_placements {
            let mut attempts = 0;
            while self.is_occupied(position) && attempts < PLACEMENT_ATTEMPTS {
                position = Position::new(
                    rng.gen_range(1..self.side - 1),
                    rng.gen_range(1..self.side - 1),
                );
                attempts += 1;
            }
        }

        position
    }

    /// Whether any entity (or the player) already holds this cell.
    fn is_occupied(&self, position: Position) -> bool {
        self.player == position
            || self.items.iter().any(|i| i.position == position)
            || self.enemies.iter().any(|e| e.position == position)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn side(&self) -> i32 {
        self.side
    }

    pub fn player(&self) -> Position {
        self.player
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    // =========================================================================
    // Scenario building
    // =========================================================================

    /// Place an item directly (level setup and tests).
    pub fn spawn_item(&mut self, position: Position, kind: ItemKind) {
        self.items.push(Item { position, kind });
    }

    /// Place an enemy directly (level setup and tests).
    pub fn spawn_enemy(&mut self, position: Position) {
        self.enemies.push(Enemy { position });
    }

    /// Put a projectile in flight directly (level setup and tests).
    pub fn spawn_projectile(&mut self, position: Position, direction: Direction) {
        self.projectiles.push(Projectile {
            position,
            direction,
        });
    }

    // =========================================================================
    // Intent handling — synchronous, input-driven
    // =========================================================================

    /// Apply one player intent.
    ///
    /// Moves clamp against the grid and update facing unconditionally,
    /// even when the cursor is blocked by an edge. After a move resolves,
    /// the new cell is checked for an item (at most one collected per
    /// move), then for an enemy encounter. Encounters leave the enemy in
    /// place: walking off and back on re-triggers the battle.
    pub fn handle_intent(&mut self, intent: Intent) {
        match intent {
            Intent::Move(direction) => {
                self.facing = direction;
                self.player = self.player.step_clamped(direction, self.side);
                self.resolve_player_cell();
            }
            Intent::Fire => {
                self.projectiles.push(Projectile {
                    position: self.player,
                    direction: self.facing,
                });
            }
        }
    }

    /// Item collection first, then enemy encounter, on the player's cell.
    fn resolve_player_cell(&mut self) {
        if let Some(index) = self
            .items
            .iter()
            .position(|item| item.position == self.player)
        {
            let item = self.items.remove(index);
            self.events
                .item_collected
                .send(ItemCollectedEvent { kind: item.kind });
        }

        if self.enemies.iter().any(|e| e.position == self.player) {
            self.events.battle_started.send(BattleStartedEvent {
                position: self.player,
            });
        }
    }

    // =========================================================================
    // Tick — fixed external cadence
    // =========================================================================

    /// Advance the world one tick.
    ///
    /// One atomic transaction in fixed order:
    /// 1. Move every projectile one cell along its direction
    /// 2. Drop projectiles that left the grid
    /// 3. Hit-test every enemy against the surviving, already-moved
    ///    projectiles
    /// 4. Remove destroyed enemies and the projectiles that hit them
    ///
    /// Hit detection intentionally uses this tick's post-move positions;
    /// do not reorder.
    pub fn tick(&mut self) {
        for projectile in &mut self.projectiles {
            projectile.position = projectile.position.step(projectile.direction);
        }

        let side = self.side;
        self.projectiles.retain(|p| p.position.in_bounds(side));

        let destroyed: Vec<Position> = self
            .enemies
            .iter()
            .map(|e| e.position)
            .filter(|&cell| self.projectiles.iter().any(|p| p.position == cell))
            .collect();

        if destroyed.is_empty() {
            return;
        }

        self.enemies.retain(|e| !destroyed.contains(&e.position));
        self.projectiles.retain(|p| !destroyed.contains(&p.position));
        for position in destroyed {
            self.events
                .enemy_destroyed
                .send(EnemyDestroyedEvent { position });
        }
    }
}
