//! # PROSPECTOR Event System
//!
//! Gameplay notifications for layers outside the simulation.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐      ┌─────────────┐      ┌─────────────┐
//! │   States    │─────>│   Event     │─────>│  UI / audio │
//! │   Fleet     │      │   Channel   │      │  Telemetry  │
//! └─────────────┘      └─────────────┘      └─────────────┘
//! ```
//!
//! Events flow FROM the simulation outward; nothing in the simulation reads
//! them back. The channel is bounded and sends never block a frame.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use prospector_core::PoolHandle;
use prospector_shared::Vec2;

use crate::entities::{ShipId, ShipType};

/// Notifications emitted by the simulation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameEvent {
    /// A ship joined the fleet.
    ShipSpawned {
        /// New ship.
        ship: ShipId,
        /// Its type.
        ship_type: ShipType,
        /// Spawn position.
        position: Vec2,
    },

    /// A ship was removed.
    ShipDestroyed {
        /// Removed ship.
        ship: ShipId,
    },

    /// A ship's active behaviour state changed.
    ShipStateChanged {
        /// The ship.
        ship: ShipId,
        /// Previous state, `None` on the first start.
        from: Option<&'static str>,
        /// New state.
        to: &'static str,
    },

    /// A mining ship took the last units out of an asteroid.
    AsteroidDepleted {
        /// The emptied asteroid.
        asteroid: PoolHandle,
        /// The ship that emptied it.
        ship: ShipId,
    },

    /// A ship unloaded its cargo at the base.
    CargoDeposited {
        /// The ship.
        ship: ShipId,
        /// Units unloaded, all types together.
        amount: u32,
    },
}

/// Event bus for simulation notifications.
///
/// Pre-allocates a bounded channel to prevent memory growth in the hot path.
pub struct EventBus {
    /// Sender end - held by the world.
    sender: Sender<GameEvent>,
    /// Receiver end - held by consumers.
    receiver: Receiver<GameEvent>,
}

impl EventBus {
    /// Creates a new event bus.
    ///
    /// # Arguments
    ///
    /// * `capacity` - Maximum events in flight before new ones are dropped.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Creates a sender handle.
    #[must_use]
    pub fn sender(&self) -> EventSender {
        EventSender {
            sender: self.sender.clone(),
        }
    }

    /// Creates a receiver handle.
    #[must_use]
    pub fn receiver(&self) -> EventReceiver {
        EventReceiver {
            receiver: self.receiver.clone(),
        }
    }

    /// Creates a connected sender/receiver pair.
    #[must_use]
    pub fn create_pair(capacity: usize) -> (EventSender, EventReceiver) {
        let bus = Self::new(capacity);
        (bus.sender(), bus.receiver())
    }
}

/// Handle for sending events.
#[derive(Clone)]
pub struct EventSender {
    sender: Sender<GameEvent>,
}

impl EventSender {
    /// Sends an event (non-blocking).
    ///
    /// Returns `false` if the channel is full or every receiver is gone;
    /// the event is dropped to keep the frame moving.
    #[inline]
    pub fn send(&self, event: GameEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => true,
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => false,
        }
    }
}

/// Handle for receiving events.
#[derive(Clone)]
pub struct EventReceiver {
    receiver: Receiver<GameEvent>,
}

impl EventReceiver {
    /// Receives all pending events (non-blocking).
    #[must_use]
    pub fn drain(&self) -> Vec<GameEvent> {
        self.receiver.try_iter().collect()
    }

    /// Receives one event (non-blocking).
    #[inline]
    #[must_use]
    pub fn try_recv(&self) -> Option<GameEvent> {
        self.receiver.try_recv().ok()
    }

    /// Returns the number of pending events.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }

    /// Checks if there are pending events.
    #[inline]
    #[must_use]
    pub fn has_events(&self) -> bool {
        !self.receiver.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_send_receive() {
        let (sender, receiver) = EventBus::create_pair(8);

        assert!(sender.send(GameEvent::ShipDestroyed { ship: ShipId(3) }));
        assert!(receiver.has_events());
        assert_eq!(
            receiver.try_recv(),
            Some(GameEvent::ShipDestroyed { ship: ShipId(3) })
        );
        assert!(receiver.try_recv().is_none());
    }

    #[test]
    fn test_event_drain() {
        let bus = EventBus::new(100);
        let sender = bus.sender();
        let receiver = bus.receiver();

        for i in 0..10 {
            let _ = sender.send(GameEvent::CargoDeposited {
                ship: ShipId(i),
                amount: 25,
            });
        }

        assert_eq!(receiver.pending_count(), 10);
        let events = receiver.drain();
        assert_eq!(events.len(), 10);
        assert!(!receiver.has_events());
    }

    #[test]
    fn test_full_channel_drops() {
        let (sender, receiver) = EventBus::create_pair(1);
        assert!(sender.send(GameEvent::ShipDestroyed { ship: ShipId(0) }));
        assert!(!sender.send(GameEvent::ShipDestroyed { ship: ShipId(1) }));
        assert_eq!(receiver.drain().len(), 1);
    }

    #[test]
    fn test_disconnected_send_fails() {
        let (sender, receiver) = EventBus::create_pair(4);
        drop(receiver);
        assert!(!sender.send(GameEvent::ShipDestroyed { ship: ShipId(0) }));
    }
}
