//! Change notification
//!
//! Every committed mutation produces exactly one [`BoardEvent`], delivered
//! synchronously to each subscriber in subscription order. The payload
//! carries enough to patch a view without reading the board again.
//!
//! A subscriber that returns an error or panics is logged and skipped; the
//! others still receive the event and the mutation stays committed.

use crate::{Column, Task};
use serde::{Deserialize, Serialize};
use std::panic::{AssertUnwindSafe, catch_unwind};

/// Kind of mutation an event reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeKind {
    Init,
    AddTask,
    RemoveTask,
    MoveTask,
    UpdateTaskDescription,
}

impl std::fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeKind::Init => write!(f, "init"),
            ChangeKind::AddTask => write!(f, "addTask"),
            ChangeKind::RemoveTask => write!(f, "removeTask"),
            ChangeKind::MoveTask => write!(f, "moveTask"),
            ChangeKind::UpdateTaskDescription => write!(f, "updateTaskDescription"),
        }
    }
}

/// A committed change to the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum BoardEvent {
    /// Board hydrated; carries every column with its tasks
    Init { columns: Vec<Column> },

    /// Task appended at `index` (always the last slot)
    #[serde(rename_all = "camelCase")]
    AddTask {
        column_id: String,
        task: Task,
        index: usize,
    },

    /// Task removed from `index`
    #[serde(rename_all = "camelCase")]
    RemoveTask {
        column_id: String,
        task: Task,
        index: usize,
    },

    /// Task now sits at `target_index` of the target column
    #[serde(rename_all = "camelCase")]
    MoveTask {
        source_column_id: String,
        target_column_id: String,
        task: Task,
        target_index: usize,
    },

    #[serde(rename_all = "camelCase")]
    UpdateTaskDescription {
        column_id: String,
        task_id: String,
        description: String,
        index: usize,
    },
}

impl BoardEvent {
    pub fn kind(&self) -> ChangeKind {
        match self {
            BoardEvent::Init { .. } => ChangeKind::Init,
            BoardEvent::AddTask { .. } => ChangeKind::AddTask,
            BoardEvent::RemoveTask { .. } => ChangeKind::RemoveTask,
            BoardEvent::MoveTask { .. } => ChangeKind::MoveTask,
            BoardEvent::UpdateTaskDescription { .. } => ChangeKind::UpdateTaskDescription,
        }
    }

    /// Id of the affected task, if the event concerns a single task
    pub fn task_id(&self) -> Option<&str> {
        match self {
            BoardEvent::Init { .. } => None,
            BoardEvent::AddTask { task, .. }
            | BoardEvent::RemoveTask { task, .. }
            | BoardEvent::MoveTask { task, .. } => Some(&task.id),
            BoardEvent::UpdateTaskDescription { task_id, .. } => Some(task_id),
        }
    }
}

/// Error type subscribers may return
pub type SubscriberError = Box<dyn std::error::Error + Send + Sync>;

/// Result of delivering one event to one subscriber
pub type SubscriberResult = std::result::Result<(), SubscriberError>;

type Subscriber = Box<dyn FnMut(&BoardEvent) -> SubscriberResult>;

/// Handle returned by [`ChangeNotifier::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Outcome of one emission
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    pub delivered: usize,
    pub failed: usize,
}

/// Ordered list of subscriber callbacks
#[derive(Default)]
pub struct ChangeNotifier {
    subscribers: Vec<(SubscriptionId, Subscriber)>,
    next_id: u64,
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

impl ChangeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback; it sees every event emitted from now on
    pub fn subscribe<F>(&mut self, subscriber: F) -> SubscriptionId
    where
        F: FnMut(&BoardEvent) -> SubscriberResult + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(subscriber)));
        id
    }

    /// Drop a callback. Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    /// Deliver an event to every subscriber, in order
    pub fn emit(&mut self, event: &BoardEvent) -> Delivery {
        let mut delivery = Delivery::default();
        let kind = event.kind();

        for (id, subscriber) in &mut self.subscribers {
            match catch_unwind(AssertUnwindSafe(|| subscriber(event))) {
                Ok(Ok(())) => delivery.delivered += 1,
                Ok(Err(e)) => {
                    tracing::warn!(subscriber = id.0, %kind, error = %e, "subscriber failed");
                    delivery.failed += 1;
                }
                Err(panic) => {
                    tracing::warn!(
                        subscriber = id.0,
                        %kind,
                        panic = panic_message(panic.as_ref()),
                        "subscriber panicked"
                    );
                    delivery.failed += 1;
                }
            }
        }

        delivery
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn add_event(id: &str) -> BoardEvent {
        BoardEvent::AddTask {
            column_id: "todo".to_string(),
            task: Task::new(id, "x"),
            index: 0,
        }
    }

    #[test]
    fn test_delivers_in_subscription_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut notifier = ChangeNotifier::new();

        for name in ["first", "second", "third"] {
            let seen = Rc::clone(&seen);
            notifier.subscribe(move |_| {
                seen.borrow_mut().push(name);
                Ok(())
            });
        }

        let delivery = notifier.emit(&add_event("1"));
        assert_eq!(delivery.delivered, 3);
        assert_eq!(*seen.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_failing_subscribers_are_isolated() {
        let seen = Rc::new(RefCell::new(0));
        let mut notifier = ChangeNotifier::new();

        notifier.subscribe(|_| Err("render failed".into()));
        notifier.subscribe(|_| panic!("boom"));
        let counter = Rc::clone(&seen);
        notifier.subscribe(move |_| {
            *counter.borrow_mut() += 1;
            Ok(())
        });

        let delivery = notifier.emit(&add_event("1"));
        assert_eq!(delivery, Delivery { delivered: 1, failed: 2 });
        assert_eq!(*seen.borrow(), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let mut notifier = ChangeNotifier::new();
        let a = notifier.subscribe(|_| Ok(()));
        let b = notifier.subscribe(|_| Ok(()));

        assert!(notifier.unsubscribe(a));
        assert!(!notifier.unsubscribe(a));
        assert_eq!(notifier.len(), 1);
        assert_eq!(notifier.emit(&add_event("1")).delivered, 1);
        assert!(notifier.unsubscribe(b));
        assert!(notifier.is_empty());
    }

    #[test]
    fn test_event_wire_shape() {
        let event = BoardEvent::MoveTask {
            source_column_id: "todo".to_string(),
            target_column_id: "doing".to_string(),
            task: Task::new("1", "write docs"),
            target_index: 0,
        };
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "moveTask");
        assert_eq!(json["payload"]["sourceColumnId"], "todo");
        assert_eq!(json["payload"]["targetColumnId"], "doing");
        assert_eq!(json["payload"]["targetIndex"], 0);
        assert_eq!(event.kind().to_string(), "moveTask");
        assert_eq!(event.task_id(), Some("1"));
    }
}
