//! Voltage class side table.
//!
//! Assets reference a voltage class by ref; the class document maps that ref
//! to a display name and a nominal voltage in kV. A class whose value does
//! not parse keeps its name and gets a null voltage. A missing document is
//! simply an empty table.

use std::collections::HashMap;

use serde::Serialize;

use crate::coordinates::parse_decimal;
use crate::diagnostics::ConversionDiagnostics;
use crate::document::TaggedObject;
use crate::model::ObjectRef;
use crate::schema::SchemaNames;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoltageClass {
    pub name: Option<String>,
    /// Nominal voltage in kV; `None` when the source value is absent or malformed
    pub kilovolts: Option<f64>,
}

#[derive(Debug, Clone, Default)]
pub struct VoltageTable {
    classes: HashMap<ObjectRef, VoltageClass>,
}

impl VoltageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the table from voltage class records.
    pub fn from_records(
        records: &[TaggedObject],
        names: &SchemaNames,
        diagnostics: &mut ConversionDiagnostics,
    ) -> Self {
        let mut table = VoltageTable::new();
        for record in records {
            let Some(reference) = record.field(&names.reference) else {
                continue;
            };
            let name = record.field_owned(&names.description);
            let raw_value = record.field(&names.voltage_value);
            let kilovolts = raw_value.and_then(parse_decimal);
            if let (Some(raw), None) = (raw_value, kilovolts) {
                diagnostics.add_warning_with_entity(
                    "voltage",
                    &format!("malformed voltage value '{raw}'"),
                    name.as_deref().unwrap_or(reference),
                );
            }
            table.insert(ObjectRef::new(reference), VoltageClass { name, kilovolts });
        }
        table
    }

    pub fn insert(&mut self, reference: ObjectRef, class: VoltageClass) {
        self.classes.insert(reference, class);
    }

    pub fn get(&self, reference: &str) -> Option<&VoltageClass> {
        self.classes.get(reference)
    }

    /// Nominal voltage for a class ref, if known and numeric.
    pub fn kilovolts(&self, reference: &str) -> Option<f64> {
        self.get(reference).and_then(|class| class.kilovolts)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
