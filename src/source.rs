//! Configuration Value Resolution
//!
//! Template fields name values inside a nested configuration by dotted path:
//! `model.lr` resolves key `model`, then `lr`. Resolution is an explicit
//! capability of the configuration value rather than reflection over an
//! arbitrary object graph; any `Serialize` configuration converts to a
//! `serde_json::Value` tree first and resolves from there. Missing segments
//! resolve to nothing, never to an error.

use serde_json::{Map, Value};

/// Dotted-path lookup into a nested configuration value
pub trait ResolvePath {
    /// Resolve `a.b.c` by descending nested maps
    ///
    /// Returns `None` when any segment is missing or the path crosses a
    /// non-map value.
    fn resolve(&self, path: &str) -> Option<&Value>;
}

impl ResolvePath for Value {
    fn resolve(&self, path: &str) -> Option<&Value> {
        let mut current = self;
        for segment in path.split('.') {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }
}

/// Reserved snapshot key mirroring merged performance metrics
pub const PERFORMANCE_KEY: &str = "performance";

/// Owned copy of the configuration captured at populate time
///
/// The recorder keeps this for full-dump export. Merged performance metrics
/// are mirrored into a reserved `performance` map on the snapshot; the
/// caller's own configuration value is never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSnapshot {
    root: Value,
}

impl ConfigSnapshot {
    /// Capture a configuration value
    pub fn new(root: Value) -> Self {
        Self { root }
    }

    /// The captured value, including the performance mirror
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Reset the performance mirror to an empty map
    ///
    /// No-op when the snapshot root is not a map.
    pub fn clear_performance(&mut self) {
        if let Value::Object(map) = &mut self.root {
            map.insert(PERFORMANCE_KEY.to_string(), Value::Object(Map::new()));
        }
    }

    /// Mirror one performance entry under the reserved `performance` key
    pub fn set_performance(&mut self, key: &str, value: Value) {
        if let Value::Object(map) = &mut self.root {
            let slot = map
                .entry(PERFORMANCE_KEY.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(perf) = slot {
                perf.insert(key.to_string(), value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_top_level() {
        let config = json!({"lr": 0.01, "epochs": 50});
        assert_eq!(config.resolve("lr"), Some(&json!(0.01)));
        assert_eq!(config.resolve("epochs"), Some(&json!(50)));
    }

    #[test]
    fn test_resolve_nested_path() {
        let config = json!({"model": {"optimizer": {"lr": 0.001}}});
        assert_eq!(config.resolve("model.optimizer.lr"), Some(&json!(0.001)));
    }

    #[test]
    fn test_resolve_missing_segment() {
        let config = json!({"model": {"lr": 0.01}});
        assert_eq!(config.resolve("model.depth"), None);
        assert_eq!(config.resolve("data.path"), None);
    }

    #[test]
    fn test_resolve_through_non_map_is_none() {
        let config = json!({"lr": 0.01});
        assert_eq!(config.resolve("lr.inner"), None);
    }

    #[test]
    fn test_resolve_keeps_value_type() {
        let config = json!({"loss": [0.1, 0.2], "accuracy": {"s1": 98}});
        assert_eq!(config.resolve("loss"), Some(&json!([0.1, 0.2])));
        assert_eq!(config.resolve("accuracy"), Some(&json!({"s1": 98})));
    }

    #[test]
    fn test_snapshot_performance_mirror() {
        let mut snapshot = ConfigSnapshot::new(json!({"lr": 0.01}));
        snapshot.clear_performance();
        snapshot.set_performance("accuracy", json!(0.9));

        assert_eq!(
            snapshot.root(),
            &json!({"lr": 0.01, "performance": {"accuracy": 0.9}})
        );
    }

    #[test]
    fn test_snapshot_clear_resets_mirror() {
        let mut snapshot = ConfigSnapshot::new(json!({"lr": 0.01}));
        snapshot.set_performance("loss", json!(0.2));
        snapshot.clear_performance();

        assert_eq!(snapshot.root(), &json!({"lr": 0.01, "performance": {}}));
    }

    #[test]
    fn test_snapshot_non_map_root_is_untouched() {
        let mut snapshot = ConfigSnapshot::new(json!([1, 2, 3]));
        snapshot.clear_performance();
        snapshot.set_performance("loss", json!(0.2));

        assert_eq!(snapshot.root(), &json!([1, 2, 3]));
    }
}
