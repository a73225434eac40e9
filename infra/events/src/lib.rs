//! # Event Bus
//!
//! Typed in-process pub/sub used by the portal slices.
//!
//! Events are keyed by their Rust type. Two channel kinds exist:
//!
//! * **Broadcast**: fan-out of discrete events (toasts, "member changed").
//! * **Watch**: latest-value state (current session, verification progress).
//!
//! ```rust
//! use ctn_events::{EventBus, EventReceiverExt, EventBusError};
//!
//! #[derive(Debug, PartialEq)]
//! struct MemberSaved { org_id: String }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), EventBusError> {
//!     let bus = EventBus::new();
//!     let mut rx = bus.subscribe::<MemberSaved>()?;
//!     bus.publish(MemberSaved { org_id: "NL-0001".into() })?;
//!
//!     let event = rx.recv_event().await.expect("open channel");
//!     assert_eq!(event.org_id, "NL-0001");
//!     Ok(())
//! }
//! ```

mod bus;
mod error;
mod receiver;

pub use bus::{ChannelKind, Event, EventBus};
pub use error::{EventBusError, EventBusErrorExt};
pub use receiver::EventReceiverExt;
