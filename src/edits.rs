use crate::error::Result;
use crate::schema::month_slot;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The manually-editable actual fields. Pending edits only ever target
/// actuals; forecast and assigned figures come from the staffing plan and are
/// never overridden here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EditField {
    RevenueReal,
    FtesReal,
    ResourceCostReal,
    OtherCostReal,
}

/// In-session overlay of manual edits on top of persisted actuals.
///
/// Keyed by `(month, field)`. A key whose value is `None` explicitly clears a
/// previously entered actual, which is different from the key being absent
/// (no edit, persisted value stands). The map is owned by the editing session:
/// the resolver only reads it, and it is discarded on save or cancel.
#[derive(Debug, Clone, Default)]
pub struct PendingEdits {
    entries: BTreeMap<(u32, EditField), Option<f64>>,
}

impl PendingEdits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an edit. `None` clears the persisted actual. Last write wins
    /// for repeated edits to the same key.
    pub fn set(&mut self, month: u32, field: EditField, value: Option<f64>) -> Result<()> {
        month_slot(month)?;
        self.entries.insert((month, field), value);
        Ok(())
    }

    /// Removes a pending edit, reverting the key to its persisted value.
    pub fn unset(&mut self, month: u32, field: EditField) {
        self.entries.remove(&(month, field));
    }

    /// Outer `None` means no pending edit for this key; `Some(None)` means a
    /// pending clear of the persisted actual.
    pub fn get(&self, month: u32, field: EditField) -> Option<Option<f64>> {
        self.entries.get(&(month, field)).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Discards all pending edits. Called by the session on save-success or
    /// cancel.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Builds the payload handed to the persistence collaborator: every
    /// pending entry, grouped by month. The core never persists anything
    /// itself.
    pub fn save_payload(&self) -> SavePayload {
        let mut by_month: BTreeMap<u32, Vec<FieldEdit>> = BTreeMap::new();
        for ((month, field), value) in &self.entries {
            by_month.entry(*month).or_default().push(FieldEdit {
                field: *field,
                value: *value,
            });
        }

        SavePayload {
            months: by_month
                .into_iter()
                .map(|(month, fields)| MonthEdits { month, fields })
                .collect(),
        }
    }
}

/// One field's pending value for persistence. `value: None` asks the store to
/// delete the actual.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldEdit {
    pub field: EditField,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MonthEdits {
    pub month: u32,
    pub fields: Vec<FieldEdit>,
}

/// Pending edits grouped by month, ready for the persistence collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SavePayload {
    pub months: Vec<MonthEdits>,
}

impl SavePayload {
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}
