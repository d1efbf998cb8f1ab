use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A base value adjusted by named additive modifiers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ModifiableValue {
    base: f64,
    modifiers: BTreeMap<String, f64>,
}

impl ModifiableValue {
    pub fn new(base: f64) -> Self {
        Self {
            base,
            modifiers: BTreeMap::new(),
        }
    }

    pub fn base(&self) -> f64 {
        self.base
    }

    pub fn set_base(&mut self, base: f64) {
        self.base = base;
    }

    /// Insert or replace a modifier; returns the previous amount.
    pub fn set_modifier(&mut self, key: impl Into<String>, amount: f64) -> Option<f64> {
        self.modifiers.insert(key.into(), amount)
    }

    pub fn remove_modifier(&mut self, key: &str) -> Option<f64> {
        self.modifiers.remove(key)
    }

    pub fn value(&self) -> f64 {
        self.base + self.modifiers.values().sum::<f64>()
    }

    /// Final value rounded down to whole ticks.
    pub fn floored(&self) -> i32 {
        self.value().floor() as i32
    }
}
