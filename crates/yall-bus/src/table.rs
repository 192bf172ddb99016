//! [`Table`] – typed view of one camera's entries on the bus.
//!
//! Reads never fail: a missing entry or an entry of the wrong type yields the
//! caller's default, the same way a bus entry handle created with a default
//! value behaves.

use std::sync::Arc;

use yall_types::YallError;

use crate::bus::{TelemetrySource, TimestampedValue, Value};

/// A numeric array and the bus time it was published, read atomically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimestampedArray {
    pub values: Vec<f64>,
    pub timestamp_micros: i64,
}

/// Cheap, clonable handle on a single bus table.
#[derive(Clone)]
pub struct Table {
    source: Arc<dyn TelemetrySource>,
    name: String,
}

impl std::fmt::Debug for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Table").field("name", &self.name).finish()
    }
}

impl Table {
    pub fn new(source: Arc<dyn TelemetrySource>, name: impl Into<String>) -> Self {
        Self {
            source,
            name: name.into(),
        }
    }

    /// Table name on the bus.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bus this table lives on.
    pub fn source(&self) -> &Arc<dyn TelemetrySource> {
        &self.source
    }

    /// Atomic read of a numeric array. Missing or non-array entries read as
    /// an empty array stamped at `0`.
    pub fn read_array(&self, key: &str) -> TimestampedArray {
        match self.source.read(&self.name, key) {
            Some(TimestampedValue {
                value: Value::DoubleArray(values),
                timestamp_micros,
            }) => TimestampedArray {
                values,
                timestamp_micros,
            },
            _ => TimestampedArray::default(),
        }
    }

    /// Read a numeric entry, falling back to `default` when absent.
    ///
    /// Booleans read as `1.0` / `0.0`.
    pub fn read_scalar(&self, key: &str, default: f64) -> f64 {
        match self.source.read(&self.name, key).map(|v| v.value) {
            Some(Value::Double(d)) => d,
            Some(Value::Boolean(b)) => {
                if b {
                    1.0
                } else {
                    0.0
                }
            }
            _ => default,
        }
    }

    /// Read a boolean entry. `None` when absent or not boolean-like, so
    /// callers can tell "unknown" apart from `false`.
    pub fn read_bool(&self, key: &str) -> Option<bool> {
        match self.source.read(&self.name, key).map(|v| v.value) {
            Some(Value::Boolean(b)) => Some(b),
            Some(Value::Double(d)) => Some(d != 0.0),
            _ => None,
        }
    }

    pub fn read_string(&self, key: &str, default: &str) -> String {
        match self.source.read(&self.name, key).map(|v| v.value) {
            Some(Value::String(s)) => s,
            _ => default.to_string(),
        }
    }

    pub fn read_string_array(&self, key: &str) -> Vec<String> {
        match self.source.read(&self.name, key).map(|v| v.value) {
            Some(Value::StringArray(values)) => values,
            _ => Vec::new(),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.source.contains_key(&self.name, key)
    }

    /// Publish any [`Value`] under `key`.
    pub fn set(&self, key: &str, value: Value) -> Result<(), YallError> {
        self.source.write(&self.name, key, value)
    }

    pub fn set_double(&self, key: &str, value: f64) -> Result<(), YallError> {
        self.source.write(&self.name, key, Value::Double(value))
    }

    pub fn set_array(&self, key: &str, values: Vec<f64>) -> Result<(), YallError> {
        self.source.write(&self.name, key, Value::DoubleArray(values))
    }

    pub fn flush(&self) -> Result<(), YallError> {
        self.source.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::MemoryBus;

    fn table(bus: &MemoryBus) -> Table {
        Table::new(Arc::new(bus.clone()), "limelight")
    }

    #[test]
    fn read_array_is_atomic_pair() {
        let bus = MemoryBus::default();
        bus.publish_at("limelight", "botpose", Value::DoubleArray(vec![1.0, 2.0]), 1_500_000);

        let sample = table(&bus).read_array("botpose");
        assert_eq!(sample.values, vec![1.0, 2.0]);
        assert_eq!(sample.timestamp_micros, 1_500_000);
    }

    #[test]
    fn missing_or_mistyped_array_reads_empty() {
        let bus = MemoryBus::default();
        bus.write("limelight", "tx", Value::Double(3.0)).unwrap();
        let t = table(&bus);
        assert_eq!(t.read_array("botpose"), TimestampedArray::default());
        assert_eq!(t.read_array("tx"), TimestampedArray::default());
    }

    #[test]
    fn read_scalar_uses_default_when_absent() {
        let bus = MemoryBus::default();
        let t = table(&bus);
        assert_eq!(t.read_scalar("tl", -1.0), -1.0);

        t.set_double("tl", 12.0).unwrap();
        assert_eq!(t.read_scalar("tl", -1.0), 12.0);
    }

    #[test]
    fn read_scalar_accepts_booleans() {
        let bus = MemoryBus::default();
        bus.write("limelight", "tv", Value::Boolean(true)).unwrap();
        assert_eq!(table(&bus).read_scalar("tv", 0.0), 1.0);
    }

    #[test]
    fn read_bool_distinguishes_absent() {
        let bus = MemoryBus::default();
        let fms = Table::new(Arc::new(bus.clone()), "FMSInfo");
        assert_eq!(fms.read_bool("IsRedAlliance"), None);

        bus.write("FMSInfo", "IsRedAlliance", Value::Boolean(false)).unwrap();
        assert_eq!(fms.read_bool("IsRedAlliance"), Some(false));
    }

    #[test]
    fn string_reads_fall_back() {
        let bus = MemoryBus::default();
        let t = table(&bus);
        assert_eq!(t.read_string("tcclass", ""), "");
        assert!(t.read_string_array("rawbarcodes").is_empty());

        bus.write("limelight", "rawbarcodes", Value::StringArray(vec!["QR-1".into()]))
            .unwrap();
        assert_eq!(t.read_string_array("rawbarcodes"), vec!["QR-1".to_string()]);
    }
}
