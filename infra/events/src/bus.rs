use crate::error::EventBusError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::{trace, warn};

/// Buffer for broadcast channels. Toast bursts stay well below this.
const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Broadcast { capacity: usize },
    Watch,
}

/// Anything `Send + Sync + 'static` can travel over the bus.
pub trait Event: Any + Send + Sync + 'static {}
impl<T: Any + Send + Sync + 'static> Event for T {}

#[derive(Debug)]
struct ChannelState {
    kind: ChannelKind,
    sender: Box<dyn Any + Send + Sync>,
}

impl ChannelState {
    fn broadcast<T: Event>(&self) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
        self.sender
            .downcast_ref::<broadcast::Sender<Arc<T>>>()
            .cloned()
            .ok_or_else(|| type_mismatch::<T>())
    }

    fn watch<T: Event>(&self) -> Result<watch::Sender<Arc<T>>, EventBusError> {
        self.sender
            .downcast_ref::<watch::Sender<Arc<T>>>()
            .cloned()
            .ok_or_else(|| type_mismatch::<T>())
    }
}

/// Cloneable handle to a shared registry of typed channels.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    channels: Arc<RwLock<FxHashMap<TypeId, ChannelState>>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to broadcast events of type `T`.
    ///
    /// # Errors
    /// [`EventBusError::ChannelKindMismatch`] if `T` is registered as a watch channel.
    pub fn subscribe<T: Event>(&self) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        self.subscribe_with_capacity::<T>(DEFAULT_CAPACITY)
    }

    /// Subscribes with an explicit buffer size. The first registration decides the capacity.
    ///
    /// # Errors
    /// [`EventBusError::InvalidCapacity`] for zero, or a kind mismatch.
    pub fn subscribe_with_capacity<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        if capacity == 0 {
            return Err(EventBusError::InvalidCapacity {
                message: "capacity must be >= 1".into(),
                context: Some(type_name::<T>().into()),
            });
        }
        Ok(self.broadcast_sender::<T>(capacity)?.subscribe())
    }

    /// Publishes a broadcast event and returns the number of receivers that got it.
    ///
    /// Publishing without subscribers is not an error; the event is dropped.
    ///
    /// # Errors
    /// [`EventBusError::ChannelKindMismatch`] if `T` is registered as a watch channel.
    pub fn publish<T: Event>(&self, event: T) -> Result<usize, EventBusError> {
        let sender = self.broadcast_sender::<T>(DEFAULT_CAPACITY)?;
        match sender.send(Arc::new(event)) {
            Ok(count) => {
                trace!(event = type_name::<T>(), count, "Event dispatched");
                Ok(count)
            },
            Err(_) => {
                trace!(event = type_name::<T>(), "Event dropped: no active subscribers");
                Ok(0)
            },
        }
    }

    /// Subscribes to the latest value of `T`, seeding the channel with `initial` if absent.
    ///
    /// # Errors
    /// [`EventBusError::ChannelKindMismatch`] if `T` is registered as a broadcast channel.
    pub fn subscribe_watch<T: Event>(
        &self,
        initial: T,
    ) -> Result<watch::Receiver<Arc<T>>, EventBusError> {
        Ok(self.watch_sender(initial, false)?.subscribe())
    }

    /// Replaces the latest value of `T`.
    ///
    /// # Errors
    /// [`EventBusError::ChannelKindMismatch`] if `T` is registered as a broadcast channel.
    pub fn publish_watch<T: Event>(&self, value: T) -> Result<(), EventBusError> {
        self.watch_sender(value, true).map(|_| ())
    }

    /// Drops every channel. Receivers observe closure. Returns the number of channels closed.
    pub fn shutdown(&self) -> usize {
        let mut channels = self.channels.write();
        let count = channels.len();
        channels.clear();
        count
    }

    fn broadcast_sender<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
        let id = TypeId::of::<T>();
        if let Some(state) = self.channels.read().get(&id) {
            return match state.kind {
                ChannelKind::Broadcast { capacity: existing } => {
                    if existing != capacity && capacity != DEFAULT_CAPACITY {
                        warn!(
                            event = type_name::<T>(),
                            existing,
                            requested = capacity,
                            "Broadcast channel already initialized with a different capacity"
                        );
                    }
                    state.broadcast::<T>()
                },
                ChannelKind::Watch => Err(kind_mismatch::<T>(ChannelKind::Broadcast { capacity }, state.kind)),
            };
        }

        let mut channels = self.channels.write();
        let state = channels.entry(id).or_insert_with(|| {
            trace!(event = type_name::<T>(), capacity, "Initializing broadcast channel");
            let (tx, _) = broadcast::channel::<Arc<T>>(capacity);
            ChannelState { kind: ChannelKind::Broadcast { capacity }, sender: Box::new(tx) }
        });
        match state.kind {
            ChannelKind::Broadcast { .. } => state.broadcast::<T>(),
            ChannelKind::Watch => Err(kind_mismatch::<T>(ChannelKind::Broadcast { capacity }, state.kind)),
        }
    }

    /// Returns the watch sender, creating it with `value`. When `replace` is set, an
    /// existing channel receives `value` as its new latest value.
    fn watch_sender<T: Event>(
        &self,
        value: T,
        replace: bool,
    ) -> Result<watch::Sender<Arc<T>>, EventBusError> {
        let id = TypeId::of::<T>();
        let mut channels = self.channels.write();

        if let Some(state) = channels.get(&id) {
            if state.kind != ChannelKind::Watch {
                return Err(kind_mismatch::<T>(ChannelKind::Watch, state.kind));
            }
            let sender = state.watch::<T>()?;
            if replace {
                sender.send_replace(Arc::new(value));
            }
            return Ok(sender);
        }

        trace!(event = type_name::<T>(), "Initializing watch channel");
        let (tx, _) = watch::channel(Arc::new(value));
        channels.insert(id, ChannelState { kind: ChannelKind::Watch, sender: Box::new(tx.clone()) });
        Ok(tx)
    }
}

fn type_mismatch<T>() -> EventBusError {
    EventBusError::TypeMismatch {
        message: type_name::<T>().into(),
        context: Some("Unexpected sender type in registry".into()),
    }
}

fn kind_mismatch<T>(wanted: ChannelKind, found: ChannelKind) -> EventBusError {
    EventBusError::ChannelKindMismatch {
        message: format!("Expected {wanted:?} but found {found:?} for {}", type_name::<T>()).into(),
        context: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Ping(u32);

    #[test]
    fn publish_without_subscribers_is_dropped() -> Result<(), EventBusError> {
        let bus = EventBus::new();
        assert_eq!(bus.publish(Ping(1))?, 0);
        Ok(())
    }

    #[test]
    fn kinds_cannot_be_mixed() -> Result<(), EventBusError> {
        let bus = EventBus::new();
        let _rx = bus.subscribe::<Ping>()?;
        let err = bus.publish_watch(Ping(2)).expect_err("broadcast registered first");
        assert_eq!(err.kind(), "ChannelKindMismatch");
        Ok(())
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let bus = EventBus::new();
        assert!(matches!(
            bus.subscribe_with_capacity::<Ping>(0),
            Err(EventBusError::InvalidCapacity { .. })
        ));
    }

    #[test]
    fn shutdown_counts_channels() -> Result<(), EventBusError> {
        let bus = EventBus::new();
        let _a = bus.subscribe::<Ping>()?;
        let _b = bus.subscribe_watch::<u64>(0)?;
        assert_eq!(bus.shutdown(), 2);
        assert_eq!(bus.shutdown(), 0);
        Ok(())
    }
}
