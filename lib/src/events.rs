//! Notifications broadcast by the runner and the registry of their
//! observers.
use std::{cell::RefCell, collections::HashMap, rc::Rc};

use strum::{Display, EnumDiscriminants, EnumIter};

use crate::dialogue::{DialogueChoice, DialogueLine};

/// Something that happened to the dialogue. [`EventKind`] is the
/// payload-free discriminant used to subscribe.
#[derive(Debug, Clone, PartialEq, Eq, EnumDiscriminants)]
#[strum_discriminants(name(EventKind), derive(Hash, Display, EnumIter))]
pub enum RunnerEvent {
    /// A story was started.
    Started,
    /// The story was reset to its beginning.
    Restarted,
    /// The story was stopped. Fired before the story is released.
    Stopped,
    Paused,
    Resumed,
    /// There are no more lines or choices to continue to.
    Ended,
    /// A new line of dialogue is available.
    NewLine(DialogueLine),
    /// A new set of choices is available.
    NewChoices(Vec<DialogueChoice>),
}

/// Identifies a subscription, to remove it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverToken(u64);

/// An event handler. It gets the object that fired the event, so it can
/// react by driving it further.
pub type Handler<T> = Rc<RefCell<dyn FnMut(&mut T, &RunnerEvent)>>;

/// Observers per event kind, kept in registration order.
pub struct EventRegistry<T> {
    handlers: HashMap<EventKind, Vec<(ObserverToken, Handler<T>)>>,
    next_token: u64,
}

impl<T> Default for EventRegistry<T> {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
            next_token: 0,
        }
    }
}

impl<T> EventRegistry<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &mut self,
        kind: EventKind,
        handler: impl FnMut(&mut T, &RunnerEvent) + 'static,
    ) -> ObserverToken {
        let token = ObserverToken(self.next_token);
        self.next_token += 1;

        let handler: Handler<T> = Rc::new(RefCell::new(handler));
        self.handlers.entry(kind).or_default().push((token, handler));

        token
    }

    /// Removes the handler registered with `token`. Returns `false` if it
    /// was already removed.
    pub fn unsubscribe(&mut self, token: ObserverToken) -> bool {
        for handlers in self.handlers.values_mut() {
            if let Some(position) = handlers.iter().position(|(t, _)| *t == token) {
                handlers.remove(position);
                return true;
            }
        }

        false
    }

    /// Snapshot of the handlers for `kind`, so they can be called while the
    /// registry itself is modified.
    pub fn handlers_for(&self, kind: EventKind) -> Vec<Handler<T>> {
        self.handlers
            .get(&kind)
            .map(|handlers| handlers.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default()
    }

    pub fn clear(&mut self) {
        self.handlers.clear();
    }

    /// Number of registered handlers, over all kinds.
    pub fn len(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_of_event() {
        let line = RunnerEvent::NewLine(DialogueLine::new("Hello", Vec::new()));

        assert_eq!(EventKind::NewLine, EventKind::from(&line));
        assert_eq!("NewChoices", EventKind::NewChoices.to_string());
    }

    #[test]
    fn handlers_keep_registration_order() {
        let mut registry: EventRegistry<Vec<u32>> = EventRegistry::new();
        registry.subscribe(EventKind::Ended, |calls, _| calls.push(1));
        registry.subscribe(EventKind::Ended, |calls, _| calls.push(2));
        registry.subscribe(EventKind::Started, |calls, _| calls.push(3));

        let mut calls = Vec::new();
        for handler in registry.handlers_for(EventKind::Ended) {
            (&mut *handler.borrow_mut())(&mut calls, &RunnerEvent::Ended);
        }

        assert_eq!(vec![1, 2], calls);
    }

    #[test]
    fn unsubscribe_once() {
        let mut registry: EventRegistry<()> = EventRegistry::new();
        let token = registry.subscribe(EventKind::Paused, |_, _| {});
        registry.subscribe(EventKind::Paused, |_, _| {});

        assert!(registry.unsubscribe(token));
        assert!(!registry.unsubscribe(token));
        assert_eq!(1, registry.len());
    }
}
