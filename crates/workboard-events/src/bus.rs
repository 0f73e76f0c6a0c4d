//! Event bus
//!
//! Publishers hand an [`Event`] to the bus; every subscription whose topic
//! pattern matches receives a copy, and every matching handler runs on its
//! own task.

use crate::types::Event;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, warn};

/// Event bus errors.
#[derive(Debug, Error)]
pub enum EventBusError {
    #[error("could not publish event: {0}")]
    Publish(String),

    #[error("invalid topic pattern: {0:?}")]
    InvalidPattern(String),

    #[error("unknown subscription: {0}")]
    UnknownSubscription(String),

    /// Returned by handlers; the bus only logs it.
    #[error("handler failed: {0}")]
    Handler(String),

    #[error("event channel closed")]
    Closed,
}

pub type EventBusResult<T> = Result<T, EventBusError>;

/// A parsed topic pattern such as `tasks.task.*` or `*.project.#`.
///
/// `*` matches exactly one segment, `#` matches zero or more.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TopicPattern {
    raw: String,
    segments: Vec<String>,
}

impl TopicPattern {
    /// Parse a pattern. Empty patterns and empty segments are rejected.
    pub fn parse(pattern: &str) -> EventBusResult<Self> {
        let segments: Vec<String> = pattern.split('.').map(str::to_string).collect();
        if pattern.is_empty() || segments.iter().any(String::is_empty) {
            return Err(EventBusError::InvalidPattern(pattern.to_string()));
        }
        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Whether `topic` falls under this pattern.
    pub fn matches(&self, topic: &str) -> bool {
        let topic: Vec<&str> = topic.split('.').collect();
        let pattern: Vec<&str> = self.segments.iter().map(String::as_str).collect();
        match_segments(&pattern, &topic)
    }
}

impl std::fmt::Display for TopicPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

fn match_segments(pattern: &[&str], topic: &[&str]) -> bool {
    match pattern.split_first() {
        None => topic.is_empty(),
        Some((&"#", rest)) => (0..=topic.len()).any(|skip| match_segments(rest, &topic[skip..])),
        Some((&segment, rest)) => match topic.split_first() {
            Some((&head, tail)) if segment == "*" || segment == head => match_segments(rest, tail),
            _ => false,
        },
    }
}

/// A live subscription. Dropping it stops delivery to this receiver; call
/// [`EventBus::unsubscribe`] to release the id as well.
#[derive(Debug)]
pub struct Subscription {
    id: String,
    pattern: TopicPattern,
    receiver: broadcast::Receiver<Event>,
}

impl Subscription {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn pattern(&self) -> &TopicPattern {
        &self.pattern
    }

    /// Wait for the next event. A receiver that fell behind skips what it
    /// missed and carries on.
    pub async fn recv(&mut self) -> EventBusResult<Event> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Ok(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(pattern = %self.pattern, skipped, "subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return Err(EventBusError::Closed),
            }
        }
    }

    /// An event that is already waiting, if any.
    pub fn try_recv(&mut self) -> Option<Event> {
        self.receiver.try_recv().ok()
    }
}

/// Asynchronous consumer of events.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: Event) -> EventBusResult<()>;

    /// Topic patterns this handler wants.
    fn topics(&self) -> Vec<String>;
}

/// Publish/subscribe seam between the store and its consumers.
#[async_trait]
pub trait EventBus: Send + Sync {
    async fn publish(&self, event: Event) -> EventBusResult<()>;

    /// Subscribe to a topic pattern, see [`TopicPattern`].
    async fn subscribe(&self, pattern: &str) -> EventBusResult<Subscription>;

    async fn register_handler(&self, handler: Arc<dyn EventHandler>) -> EventBusResult<()>;

    async fn unsubscribe(&self, subscription_id: &str) -> EventBusResult<()>;

    async fn stats(&self) -> EventBusStats;
}

/// Counters kept by a bus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventBusStats {
    pub events_published: u64,
    /// Copies handed to subscriptions and handlers
    pub events_delivered: u64,
    pub active_subscriptions: usize,
    pub registered_handlers: usize,
}

/// One broadcast channel per distinct pattern, shared by every
/// subscription on that pattern.
struct Channel {
    pattern: TopicPattern,
    sender: broadcast::Sender<Event>,
    subscribers: HashSet<String>,
}

struct HandlerEntry {
    handler: Arc<dyn EventHandler>,
    patterns: Vec<TopicPattern>,
}

#[derive(Default)]
struct BusState {
    channels: HashMap<String, Channel>,
    handlers: Vec<HandlerEntry>,
    stats: EventBusStats,
}

/// Process-local event bus on tokio broadcast channels.
pub struct MemoryEventBus {
    state: RwLock<BusState>,
    capacity: usize,
}

impl std::fmt::Debug for MemoryEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryEventBus")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl MemoryEventBus {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// A bus whose per-pattern channels buffer `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: RwLock::new(BusState::default()),
            capacity: capacity.max(1),
        }
    }
}

impl Default for MemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventBus for MemoryEventBus {
    async fn publish(&self, event: Event) -> EventBusResult<()> {
        let topic = event.topic();
        let mut state = self.state.write().await;
        let mut delivered = 0u64;

        for channel in state.channels.values() {
            if channel.pattern.matches(&topic) && channel.sender.send(event.clone()).is_ok() {
                delivered += 1;
            }
        }

        for entry in state.handlers.iter().filter(|h| h.patterns.iter().any(|p| p.matches(&topic))) {
            delivered += 1;
            let handler = Arc::clone(&entry.handler);
            let event = event.clone();
            tokio::spawn(async move {
                let event_id = event.id;
                if let Err(e) = handler.handle(event).await {
                    warn!(%event_id, error = %e, "event handler failed");
                }
            });
        }

        state.stats.events_published += 1;
        state.stats.events_delivered += delivered;
        debug!(%topic, delivered, "event published");
        Ok(())
    }

    async fn subscribe(&self, pattern: &str) -> EventBusResult<Subscription> {
        let pattern = TopicPattern::parse(pattern)?;
        let id = uuid::Uuid::now_v7().to_string();

        let mut state = self.state.write().await;
        let capacity = self.capacity;
        let channel = state
            .channels
            .entry(pattern.as_str().to_string())
            .or_insert_with(|| Channel {
                pattern: pattern.clone(),
                sender: broadcast::channel(capacity).0,
                subscribers: HashSet::new(),
            });
        channel.subscribers.insert(id.clone());
        let receiver = channel.sender.subscribe();
        state.stats.active_subscriptions += 1;

        debug!(%pattern, subscription = %id, "subscribed");
        Ok(Subscription {
            id,
            pattern,
            receiver,
        })
    }

    async fn register_handler(&self, handler: Arc<dyn EventHandler>) -> EventBusResult<()> {
        let patterns = handler
            .topics()
            .iter()
            .map(|t| TopicPattern::parse(t))
            .collect::<EventBusResult<Vec<_>>>()?;

        let mut state = self.state.write().await;
        state.handlers.push(HandlerEntry { handler, patterns });
        let registered = state.handlers.len();
        state.stats.registered_handlers = registered;
        Ok(())
    }

    async fn unsubscribe(&self, subscription_id: &str) -> EventBusResult<()> {
        let mut state = self.state.write().await;
        let key = state
            .channels
            .iter_mut()
            .find_map(|(key, channel)| channel.subscribers.remove(subscription_id).then(|| key.clone()))
            .ok_or_else(|| EventBusError::UnknownSubscription(subscription_id.to_string()))?;

        if state.channels.get(&key).is_some_and(|c| c.subscribers.is_empty()) {
            state.channels.remove(&key);
        }
        state.stats.active_subscriptions = state.stats.active_subscriptions.saturating_sub(1);
        Ok(())
    }

    async fn stats(&self) -> EventBusStats {
        self.state.read().await.stats.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use workboard_rbac::AppModule;

    fn task_created() -> Event {
        Event::new("task.created", AppModule::Tasks, serde_json::json!({}))
    }

    fn matches(pattern: &str, topic: &str) -> bool {
        TopicPattern::parse(pattern).unwrap().matches(topic)
    }

    #[test]
    fn test_topic_patterns() {
        assert!(matches("tasks.task.created", "tasks.task.created"));
        assert!(matches("tasks.task.*", "tasks.task.created"));
        assert!(matches("*.task.created", "tasks.task.created"));
        assert!(matches("tasks.#", "tasks.task.created"));
        assert!(matches("#", "tasks.task.created"));
        assert!(matches("#.created", "tasks.task.created"));
        assert!(matches("tasks.task.created.#", "tasks.task.created"));

        assert!(!matches("tasks.task.updated", "tasks.task.created"));
        assert!(!matches("tasks.*", "tasks.task.created"));
        assert!(!matches("documents.#", "tasks.task.created"));
    }

    #[test]
    fn test_invalid_patterns() {
        assert!(matches!(TopicPattern::parse(""), Err(EventBusError::InvalidPattern(_))));
        assert!(TopicPattern::parse("tasks..created").is_err());
    }

    #[tokio::test]
    async fn test_publish_reaches_matching_subscribers_only() {
        let bus = MemoryEventBus::new();
        let mut tasks = bus.subscribe("tasks.task.*").await.unwrap();
        let mut everything = bus.subscribe("#").await.unwrap();
        let mut documents = bus.subscribe("documents.#").await.unwrap();

        let event = task_created();
        bus.publish(event.clone()).await.unwrap();

        let received = tokio::time::timeout(std::time::Duration::from_millis(100), tasks.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(received.id, event.id);
        assert_eq!(everything.try_recv().map(|e| e.id), Some(event.id));
        assert!(documents.try_recv().is_none());
    }

    #[tokio::test]
    async fn test_subscriptions_share_a_pattern_channel() {
        let bus = MemoryEventBus::new();
        let mut first = bus.subscribe("tasks.#").await.unwrap();
        let mut second = bus.subscribe("tasks.#").await.unwrap();

        bus.publish(task_created()).await.unwrap();
        assert!(first.try_recv().is_some());
        assert!(second.try_recv().is_some());

        let stats = bus.stats().await;
        assert_eq!(stats.active_subscriptions, 2);
        assert_eq!(stats.events_published, 1);
        assert_eq!(stats.events_delivered, 1);
    }

    #[tokio::test]
    async fn test_unsubscribe() {
        let bus = MemoryEventBus::new();
        let sub = bus.subscribe("tasks.#").await.unwrap();
        let id = sub.id().to_string();

        bus.unsubscribe(&id).await.unwrap();
        assert_eq!(bus.stats().await.active_subscriptions, 0);
        assert!(matches!(
            bus.unsubscribe(&id).await,
            Err(EventBusError::UnknownSubscription(_))
        ));
    }

    struct FailingHandler {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl EventHandler for FailingHandler {
        async fn handle(&self, _event: Event) -> EventBusResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(EventBusError::Handler("boom".to_string()))
        }

        fn topics(&self) -> Vec<String> {
            vec!["projects.#".to_string()]
        }
    }

    #[tokio::test]
    async fn test_handler_failure_does_not_reach_publisher() {
        let bus = MemoryEventBus::new();
        let calls = Arc::new(AtomicUsize::new(0));
        bus.register_handler(Arc::new(FailingHandler { calls: calls.clone() }))
            .await
            .unwrap();
        assert_eq!(bus.stats().await.registered_handlers, 1);

        let event = Event::new("project.created", AppModule::Projects, serde_json::json!({}));
        assert!(bus.publish(event).await.is_ok());
        bus.publish(task_created()).await.unwrap();

        for _ in 0..50 {
            if calls.load(Ordering::SeqCst) == 1 {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
