//! # Autofill Core
//!
//! Coordinates replies to asynchronous page-script requests.
//!
//! A page may ask the same kind of question several times before the first
//! answer arrives (a user tabbing quickly between card fields, say). Only the
//! newest question matters: the registry keeps at most one pending reply per
//! message-type key and resolves a superseded one immediately with a
//! well-formed "no action" payload, so nothing is left waiting.
//!
//! ## Components
//!
//! - [`ReplyRegistry`] - keyed store of single-shot reply callbacks
//! - [`CancellationPolicy`] - per-key payload handed to superseded or cancelled replies
//! - [`PendingReplyCoordinator`] - shared handle used by transports and vaults

pub mod cancellation;
pub mod coordinator;
pub mod registry;
pub mod stats;

pub use cancellation::{CancellationPayload, CancellationPolicy};
pub use coordinator::{PendingReplyCoordinator, ReplyReceiver, ReplyState};
pub use registry::{ReplyCallback, ReplyRegistry};
pub use stats::{ReplyStats, StatsSnapshot};
