//! Topic-based event bus.
//!
//! The core returns each turn's notifications synchronously; the driver
//! republishes them here so observers can subscribe to just the topics they
//! care about. Publishing is best-effort and never blocks the simulation.

use std::collections::HashMap;
use std::sync::Arc;

use battle_core::BattleEvent;
use tokio::sync::broadcast;

/// Topics for event routing.
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub enum Topic {
    /// Turn bracketing and regen (turn-start/end, action-start/end).
    Turn,
    /// Damage, healing, statuses, fury.
    Combat,
    /// Unit lifecycle and battle termination.
    Battle,
}

/// Maps an event to the topic it is published on.
pub fn topic_of(event: &BattleEvent) -> Topic {
    match event {
        BattleEvent::TurnStart { .. }
        | BattleEvent::TurnEnd { .. }
        | BattleEvent::ActionStart { .. }
        | BattleEvent::ActionEnd { .. }
        | BattleEvent::RegenApplied { .. } => Topic::Turn,

        BattleEvent::DamageDealt { .. }
        | BattleEvent::Healed { .. }
        | BattleEvent::StatusApplied { .. }
        | BattleEvent::StatusExpired { .. }
        | BattleEvent::FuryChanged { .. } => Topic::Combat,

        BattleEvent::UnitSpawned { .. }
        | BattleEvent::UnitDied { .. }
        | BattleEvent::UnitRemoved { .. }
        | BattleEvent::BattleEnded { .. } => Topic::Battle,
    }
}

/// Serializes an event for line-oriented observers and logs.
pub fn to_json(event: &BattleEvent) -> String {
    serde_json::to_string(event).unwrap_or_else(|e| format!("{{\"error\":\"{}\"}}", e))
}

/// Topic-based event bus.
///
/// Consumers subscribe per topic and receive events in publish order.
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<BattleEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut channels = HashMap::new();
        channels.insert(Topic::Turn, broadcast::channel(capacity).0);
        channels.insert(Topic::Combat, broadcast::channel(capacity).0);
        channels.insert(Topic::Battle, broadcast::channel(capacity).0);
        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publishes an event to its topic. Having no subscribers is normal,
    /// not an error.
    pub fn publish(&self, event: BattleEvent) {
        let topic = topic_of(&event);
        if let Some(tx) = self.channels.get(&topic) {
            if tx.send(event).is_err() {
                tracing::trace!("no subscribers for topic {:?}", topic);
            }
        }
    }

    /// Subscribes to a single topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<BattleEvent> {
        self.channels
            .get(&topic)
            .expect("topic channel not initialized")
            .subscribe()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{InstanceId, StatusKind};

    #[test]
    fn events_route_to_their_topic() {
        let bus = EventBus::new();
        let mut combat_rx = bus.subscribe(Topic::Combat);
        let mut turn_rx = bus.subscribe(Topic::Turn);

        let event = BattleEvent::StatusApplied {
            target: InstanceId(1),
            kind: StatusKind::Haste,
            stacks: 1,
        };
        assert_eq!(topic_of(&event), Topic::Combat);
        bus.publish(event.clone());

        assert_eq!(combat_rx.try_recv().unwrap(), event);
        assert!(turn_rx.try_recv().is_err());
    }

    #[test]
    fn to_json_produces_tagged_payloads() {
        let event = BattleEvent::FuryChanged {
            unit: InstanceId(3),
            delta: -20,
            current: 10,
        };
        let json = to_json(&event);
        assert!(json.contains("\"type\""));
        assert!(json.contains("fury_changed"));
    }
}
