//! World Events
//!
//! The simulation never calls upward into game-mode or presentation code.
//! It pushes events onto queues that the caller drains after handling an
//! intent or running a tick:
//! 1. World detects a collection/encounter/hit
//! 2. Session drains the queue, updates stats, fires an audio cue
//! 3. Shell (not part of this crate) switches modes on battle start
//!
//! Each consumer handles its own concern without the world knowing about
//! any of them.

use super::grid::Position;
use super::ItemKind;

/// A queue for events of a single type.
/// Events accumulate while the world mutates and are drained by the caller.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: Vec<T>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Send an event (add to queue)
    pub fn send(&mut self, event: T) {
        self.events.push(event);
    }

    /// Iterate over events without clearing
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.events.iter()
    }

    /// Drain all events (returns iterator and clears queue)
    pub fn drain(&mut self) -> impl Iterator<Item = T> + '_ {
        self.events.drain(..)
    }

    /// Check if there are any events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Clear all events without processing
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Number of events in queue
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Container for all world events.
#[derive(Debug, Default)]
pub struct Events {
    /// Player's post-move cell matched an item
    pub item_collected: EventQueue<ItemCollectedEvent>,

    /// Player's post-move cell matched a live enemy
    pub battle_started: EventQueue<BattleStartedEvent>,

    /// A projectile reached an enemy's cell at tick resolution
    pub enemy_destroyed: EventQueue<EnemyDestroyedEvent>,
}

impl Events {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all event queues.
    pub fn clear_all(&mut self) {
        self.item_collected.clear();
        self.battle_started.clear();
        self.enemy_destroyed.clear();
    }
}

// =============================================================================
// Event Types
// =============================================================================

/// An item was collected and removed from the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemCollectedEvent {
    /// The kind of the collected item (the item itself is already gone)
    pub kind: ItemKind,
}

/// The player walked onto a live enemy's cell.
/// The enemy stays on the grid; battles are resolved elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleStartedEvent {
    /// Where the encounter happened
    pub position: Position,
}

/// An enemy was destroyed by a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyDestroyedEvent {
    /// The destroyed enemy's cell
    pub position: Position,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_queue() {
        let mut queue: EventQueue<i32> = EventQueue::new();

        queue.send(1);
        queue.send(2);
        queue.send(3);

        assert_eq!(queue.len(), 3);

        let collected: Vec<_> = queue.drain().collect();
        assert_eq!(collected, vec![1, 2, 3]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_events_container() {
        let mut events = Events::new();

        events.item_collected.send(ItemCollectedEvent {
            kind: ItemKind::Coffee,
        });
        events.enemy_destroyed.send(EnemyDestroyedEvent {
            position: Position::new(3, 3),
        });

        assert_eq!(events.item_collected.len(), 1);

        events.clear_all();
        assert!(events.item_collected.is_empty());
        assert!(events.enemy_destroyed.is_empty());
    }
}
