//! Initialisation data the host injects into the page at load time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Well-known initialisation entry: platform flags.
pub const INIT_PLATFORM: &str = "__gangway__platform";
/// Well-known initialisation entry: native function descriptors.
pub const INIT_FUNCTIONS: &str = "__gangway__functions";
/// Well-known initialisation entry: event ids the host listens on.
pub const INIT_REGISTERED_EVENT_IDS: &str = "__gangway__registeredGlobalEventIds";
/// Well-known initialisation entry: slider widget descriptors.
pub const INIT_SLIDERS: &str = "__gangway__sliders";
/// Well-known initialisation entry: toggle widget descriptors.
pub const INIT_TOGGLES: &str = "__gangway__toggles";
/// Well-known initialisation entry: combo box widget descriptors.
pub const INIT_COMBO_BOXES: &str = "__gangway__comboBoxes";

/// Configuration structure the host exposes to the page before any page
/// code runs.
///
/// Every entry is an array: pushing several values under one name
/// accumulates them rather than overwriting. The well-known entries are
/// always present (empty by default) so page code can index into them
/// without existence checks; hosts may add arbitrary further named
/// arrays, kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InitData {
    #[serde(rename = "__gangway__platform", default)]
    pub platform: Vec<Value>,

    #[serde(rename = "__gangway__functions", default)]
    pub functions: Vec<Value>,

    #[serde(rename = "__gangway__registeredGlobalEventIds", default)]
    pub registered_event_ids: Vec<Value>,

    #[serde(rename = "__gangway__sliders", default)]
    pub sliders: Vec<Value>,

    #[serde(rename = "__gangway__toggles", default)]
    pub toggles: Vec<Value>,

    #[serde(rename = "__gangway__comboBoxes", default)]
    pub combo_boxes: Vec<Value>,

    /// Host-defined entries beyond the well-known arrays.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Vec<Value>>,
}

impl InitData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `value` to the array stored under `name`, creating the
    /// array if the name is not a well-known entry and has not been
    /// pushed to before.
    pub fn push(&mut self, name: &str, value: Value) {
        match name {
            INIT_PLATFORM => self.platform.push(value),
            INIT_FUNCTIONS => self.functions.push(value),
            INIT_REGISTERED_EVENT_IDS => self.registered_event_ids.push(value),
            INIT_SLIDERS => self.sliders.push(value),
            INIT_TOGGLES => self.toggles.push(value),
            INIT_COMBO_BOXES => self.combo_boxes.push(value),
            _ => self.extra.entry(name.to_string()).or_default().push(value),
        }
    }

    /// Look up the array stored under `name`, well-known or extra.
    pub fn get(&self, name: &str) -> Option<&[Value]> {
        match name {
            INIT_PLATFORM => Some(&self.platform),
            INIT_FUNCTIONS => Some(&self.functions),
            INIT_REGISTERED_EVENT_IDS => Some(&self.registered_event_ids),
            INIT_SLIDERS => Some(&self.sliders),
            INIT_TOGGLES => Some(&self.toggles),
            INIT_COMBO_BOXES => Some(&self.combo_boxes),
            _ => self.extra.get(name).map(Vec::as_slice),
        }
    }
}
