//! Event bus for scene events

use crate::event::SceneEvent;

/// A simple event queue that controllers push to and the host drains
pub struct EventBus {
    events: Vec<SceneEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Push an event onto the bus
    pub fn push(&mut self, event: SceneEvent) {
        self.events.push(event);
    }

    /// Push every event from an iterator
    pub fn extend(&mut self, events: impl IntoIterator<Item = SceneEvent>) {
        self.events.extend(events);
    }

    /// Drain all events from the bus, returning them
    pub fn drain(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    /// Check if there are pending events
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tinsel_choreo::MacroState;

    #[test]
    fn test_push_and_drain() {
        let mut bus = EventBus::new();
        assert!(bus.is_empty());

        bus.push(SceneEvent::MacroStateRequested(MacroState::Formed));
        bus.push(SceneEvent::FocusRequested { x: 10.0, y: 20.0 });

        assert_eq!(bus.len(), 2);
        assert!(!bus.is_empty());

        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], SceneEvent::MacroStateRequested(MacroState::Formed));
        assert!(bus.is_empty());
    }

    #[test]
    fn test_drain_clears() {
        let mut bus = EventBus::new();
        bus.push(SceneEvent::FocusReleased);

        let _ = bus.drain();
        let events = bus.drain();
        assert!(events.is_empty());
    }

    #[test]
    fn test_extend_keeps_order() {
        let mut bus = EventBus::new();
        bus.extend([
            SceneEvent::Orbit { yaw: 0.1, pitch: 0.0 },
            SceneEvent::FocusReleased,
        ]);
        let events = bus.drain();
        assert!(matches!(events[0], SceneEvent::Orbit { .. }));
        assert_eq!(events[1], SceneEvent::FocusReleased);
    }
}
