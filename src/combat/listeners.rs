//! Combat listener registry
//!
//! Publish/subscribe registry owned by the simulation `World`. Listeners are
//! invoked synchronously, in registration order, from inside the damage call
//! that produced the notification. Whoever subscribes is responsible for
//! unsubscribing on teardown.

use bevy::prelude::*;

use super::events::CombatEvent;

/// Handle returned by [`CombatListeners::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&CombatEvent) + Send + Sync>;

#[derive(Resource, Default)]
pub struct CombatListeners {
    next_id: u64,
    listeners: Vec<(ListenerId, Listener)>,
}

impl CombatListeners {
    /// Register a listener; it sees every notification published after this call
    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&CombatEvent) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns false if the id was unknown or already removed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        // Vec::retain keeps the relative order of the survivors
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    /// Deliver `event` to every listener in registration order
    pub fn publish(&mut self, event: &CombatEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Drop every listener (simulation teardown)
    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

impl std::fmt::Debug for CombatListeners {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CombatListeners")
            .field("next_id", &self.next_id)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
