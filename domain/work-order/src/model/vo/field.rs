use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

wire_enum! {
    /// Form fields that can carry a validation message.
    pub enum WorkOrderField {
        WorkOrderNumber => "workOrderNumber",
        VisitInstDate => "visitInstDate",
        Description => "description",
        Hours => "hours",
        CustomerPhone => "customerPhone",
        RescheduleDate => "rescheduleDate",
        WorkOrderStatus => "workOrderStatus",
        Ids => "ids",
    }
}

/// Per-field validation messages, one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<WorkOrderField, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: WorkOrderField, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert(field, message);
        errors
    }

    /// Keeps the first message recorded for a field.
    pub fn insert(&mut self, field: WorkOrderField, message: impl Into<String>) {
        self.0.entry(field).or_insert_with(|| message.into());
    }

    pub fn get(&self, field: WorkOrderField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: WorkOrderField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (WorkOrderField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    /// `Ok(())` when no message was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}
