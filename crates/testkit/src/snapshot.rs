//! Canonical JSON traces for determinism checks.
//!
//! Two runs with the same seed must produce byte-identical traces. Traces are
//! compared after serializing through sorted-key JSON so field order in the
//! event types never matters.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;

/// Serialize `value` as pretty JSON with object keys sorted.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String> {
    let value = serde_json::to_value(value).context("failed to serialize trace value")?;
    let value = canonicalize_value(value);
    let mut s = serde_json::to_string_pretty(&value).context("failed to format trace JSON")?;
    s.push('\n');
    Ok(s)
}

/// Fail with the first diverging entry if two traces differ.
pub fn assert_same_trace<T: Serialize>(left: &[T], right: &[T]) -> Result<()> {
    for (position, (a, b)) in left.iter().zip(right).enumerate() {
        let a = canonical_json(a)?;
        let b = canonical_json(b)?;
        if a != b {
            anyhow::bail!("traces diverge at entry {position}:\n{a}---\n{b}");
        }
    }
    if left.len() != right.len() {
        anyhow::bail!(
            "trace lengths differ: {} vs {}",
            left.len(),
            right.len()
        );
    }
    Ok(())
}

fn canonicalize_value(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut out = serde_json::Map::with_capacity(entries.len());
            for (k, v) in entries {
                out.insert(k, canonicalize_value(v));
            }
            Value::Object(out)
        }
        Value::Array(values) => Value::Array(values.into_iter().map(canonicalize_value).collect()),
        other => other,
    }
}
