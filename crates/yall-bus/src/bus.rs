//! Telemetry bus storage and change notification.
//!
//! [`MemoryBus`] keeps the latest value of every entry together with the bus
//! timestamp (microseconds) at which it was written, the same pair a real
//! bus hands out on an atomic read. Every write is also pushed to listeners
//! over a [`tokio::sync::broadcast`] channel so that a recorder or dashboard
//! sees each update without polling.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::trace;
use yall_types::YallError;

/// Buffered updates per listener before the slowest one starts lagging.
const DEFAULT_CAPACITY: usize = 256;

/// A value stored in a bus entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Value {
    Double(f64),
    DoubleArray(Vec<f64>),
    String(String),
    StringArray(Vec<String>),
    Boolean(bool),
}

/// The latest value of an entry and the bus time it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampedValue {
    pub value: Value,
    pub timestamp_micros: i64,
}

/// Notification emitted for every write to a [`MemoryBus`].
#[derive(Debug, Clone, PartialEq)]
pub struct EntryUpdate {
    pub table: String,
    pub key: String,
    pub value: TimestampedValue,
}

/// Read/write access to a key-value telemetry bus.
///
/// Implementations must make [`read`](TelemetrySource::read) atomic: the
/// value and its timestamp always come from the same write.
pub trait TelemetrySource: Send + Sync {
    /// Latest value of `table/key`, or `None` if it was never published.
    fn read(&self, table: &str, key: &str) -> Option<TimestampedValue>;

    /// Publish `value` under `table/key`.
    fn write(&self, table: &str, key: &str, value: Value) -> Result<(), YallError>;

    /// Whether `table/key` currently exists.
    fn contains_key(&self, table: &str, key: &str) -> bool {
        self.read(table, key).is_some()
    }

    /// Names of every table that holds at least one entry.
    fn tables(&self) -> Vec<String>;

    /// Push pending writes to the network immediately.
    fn flush(&self) -> Result<(), YallError> {
        Ok(())
    }
}

type Entries = HashMap<String, HashMap<String, TimestampedValue>>;

/// In-process telemetry bus. Clones share the same storage and listeners.
#[derive(Clone, Debug)]
pub struct MemoryBus {
    entries: Arc<RwLock<Entries>>,
    updates: broadcast::Sender<EntryUpdate>,
}

impl MemoryBus {
    /// Create an empty bus whose listener channel buffers `capacity` updates.
    pub fn new(capacity: usize) -> Self {
        let (updates, _) = broadcast::channel(capacity);
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            updates,
        }
    }

    /// Publish `value` with an explicit bus timestamp instead of "now".
    ///
    /// Replays use this so that latency compensation sees the recorded
    /// clock rather than the replay clock.
    pub fn publish_at(&self, table: &str, key: &str, value: Value, timestamp_micros: i64) {
        let stamped = TimestampedValue {
            value,
            timestamp_micros,
        };
        {
            let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
            entries
                .entry(table.to_string())
                .or_default()
                .insert(key.to_string(), stamped.clone());
        }

        let update = EntryUpdate {
            table: table.to_string(),
            key: key.to_string(),
            value: stamped,
        };
        // No listeners is the normal case outside recording sessions.
        if self.updates.send(update).is_err() {
            trace!(table, key, "bus update had no listeners");
        }
    }

    /// Subscribe to every subsequent write on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<EntryUpdate> {
        self.updates.subscribe()
    }

    /// Remove `table/key`, as happens when a publisher disappears.
    pub fn unpublish(&self, table: &str, key: &str) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(table_entries) = entries.get_mut(table) {
            table_entries.remove(key);
            if table_entries.is_empty() {
                entries.remove(table);
            }
        }
    }
}

impl Default for MemoryBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl TelemetrySource for MemoryBus {
    fn read(&self, table: &str, key: &str) -> Option<TimestampedValue> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries.get(table).and_then(|t| t.get(key)).cloned()
    }

    fn write(&self, table: &str, key: &str, value: Value) -> Result<(), YallError> {
        self.publish_at(table, key, value, chrono::Utc::now().timestamp_micros());
        Ok(())
    }

    fn tables(&self) -> Vec<String> {
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = entries.keys().cloned().collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_returns_value() {
        let bus = MemoryBus::default();
        bus.write("limelight", "tx", Value::Double(1.5)).unwrap();

        let read = bus.read("limelight", "tx").unwrap();
        assert_eq!(read.value, Value::Double(1.5));
        assert!(read.timestamp_micros > 0);
    }

    #[test]
    fn read_missing_entry_is_none() {
        let bus = MemoryBus::default();
        assert!(bus.read("limelight", "tx").is_none());
        assert!(!bus.contains_key("limelight", "tx"));
    }

    #[test]
    fn publish_at_pins_timestamp() {
        let bus = MemoryBus::default();
        bus.publish_at("limelight", "botpose_wpiblue", Value::DoubleArray(vec![1.0]), 42);
        assert_eq!(bus.read("limelight", "botpose_wpiblue").unwrap().timestamp_micros, 42);
    }

    #[test]
    fn clones_share_storage() {
        let bus = MemoryBus::default();
        let other = bus.clone();
        other.write("limelight", "getpipe", Value::Double(0.0)).unwrap();
        assert!(bus.contains_key("limelight", "getpipe"));
    }

    #[test]
    fn tables_are_sorted_and_unpublish_drops_empty_tables() {
        let bus = MemoryBus::default();
        bus.write("limelight-rear", "getpipe", Value::Double(0.0)).unwrap();
        bus.write("FMSInfo", "IsRedAlliance", Value::Boolean(true)).unwrap();
        assert_eq!(bus.tables(), vec!["FMSInfo", "limelight-rear"]);

        bus.unpublish("FMSInfo", "IsRedAlliance");
        assert_eq!(bus.tables(), vec!["limelight-rear"]);
    }

    #[tokio::test]
    async fn listener_receives_every_write() -> Result<(), Box<dyn std::error::Error>> {
        let bus = MemoryBus::default();
        let mut rx = bus.subscribe();

        bus.publish_at("limelight", "tl", Value::Double(11.0), 7);
        let update = rx.recv().await?;
        assert_eq!(update.table, "limelight");
        assert_eq!(update.key, "tl");
        assert_eq!(update.value.timestamp_micros, 7);
        Ok(())
    }

    #[tokio::test]
    async fn slow_listener_lags_instead_of_blocking_writers() {
        let bus = MemoryBus::new(4);
        let mut rx = bus.subscribe();
        for i in 0..32 {
            bus.publish_at("limelight", "tx", Value::Double(i as f64), i);
        }
        let result = rx.recv().await;
        assert!(
            matches!(result, Err(broadcast::error::RecvError::Lagged(_))),
            "expected Lagged error, got: {result:?}"
        );
    }
}
