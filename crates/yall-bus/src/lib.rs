//! `yall-bus` – the key-value telemetry bus seen from the client side.
//!
//! The camera publishes every measurement as a named entry inside a table
//! (one table per camera) and reads its configuration from entries in the
//! same table. This crate does not speak the wire protocol; it defines the
//! [`TelemetrySource`] seam that a real bus client implements, an in-process
//! [`MemoryBus`] used by replays and tests, and the [`Table`] handle the rest
//! of the workspace reads through.
//!
//! # Modules
//!
//! - [`bus`] – [`TelemetrySource`], [`MemoryBus`] and the broadcast
//!   [`EntryUpdate`] listener.
//! - [`table`] – [`Table`]: typed reads with caller-supplied defaults.

pub mod bus;
pub mod table;

pub use bus::{EntryUpdate, MemoryBus, TelemetrySource, TimestampedValue, Value};
pub use table::{Table, TimestampedArray};
