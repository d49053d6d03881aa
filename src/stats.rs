//! Player Stats
//!
//! The score sheet the HUD renders: health, creativity, stickers.
//! Creativity comes from coffee, stickers fuel the sticker attack, and
//! health only ever changes when a battle ends.

use crate::world::ItemKind;

/// Player scoring state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerStats {
    /// Hit points; ±20 per battle outcome, never below zero
    pub health: i32,
    /// Raised by coffee, capped at 100
    pub creativity: i32,
    /// Collected sticker count, uncapped
    pub stickers: i32,
}

/// Coffee's creativity bonus
const COFFEE_CREATIVITY: i32 = 10;

/// Creativity ceiling
const CREATIVITY_MAX: i32 = 100;

/// Health swing when a battle ends
const BATTLE_HEALTH_SWING: i32 = 20;

impl PlayerStats {
    pub fn new() -> Self {
        Self {
            health: 100,
            creativity: 0,
            stickers: 0,
        }
    }

    /// Apply a collected item.
    pub fn collect(&mut self, kind: ItemKind) {
        match kind {
            ItemKind::Coffee => {
                self.creativity = (self.creativity + COFFEE_CREATIVITY).min(CREATIVITY_MAX);
            }
            ItemKind::Sticker => {
                self.stickers += 1;
            }
        }
    }

    /// Apply a finished battle: winners gain health, losers bleed it
    /// (floored at zero).
    pub fn apply_battle_outcome(&mut self, won: bool) {
        if won {
            self.health += BATTLE_HEALTH_SWING;
        } else {
            self.health = (self.health - BATTLE_HEALTH_SWING).max(0);
        }
    }
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coffee_raises_creativity_to_a_cap() {
        let mut stats = PlayerStats::new();

        for _ in 0..9 {
            stats.collect(ItemKind::Coffee);
        }
        assert_eq!(stats.creativity, 90);

        stats.collect(ItemKind::Coffee);
        stats.collect(ItemKind::Coffee);
        assert_eq!(stats.creativity, 100, "creativity caps at 100");
        assert_eq!(stats.stickers, 0);
    }

    #[test]
    fn test_stickers_accumulate() {
        let mut stats = PlayerStats::new();

        stats.collect(ItemKind::Sticker);
        stats.collect(ItemKind::Sticker);
        stats.collect(ItemKind::Sticker);

        assert_eq!(stats.stickers, 3);
        assert_eq!(stats.creativity, 0);
    }

    #[test]
    fn test_battle_outcomes_swing_health() {
        let mut stats = PlayerStats::new();

        stats.apply_battle_outcome(true);
        assert_eq!(stats.health, 120);

        stats.apply_battle_outcome(false);
        assert_eq!(stats.health, 100);
    }

    #[test]
    fn test_health_floors_at_zero() {
        let mut stats = PlayerStats::new();
        stats.health = 10;

        stats.apply_battle_outcome(false);
        assert_eq!(stats.health, 0);

        stats.apply_battle_outcome(false);
        assert_eq!(stats.health, 0);
    }
}
