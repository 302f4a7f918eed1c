//! Conversion options and source-document naming.
//!
//! [`ConversionOptions`] is the one switchboard for pipeline behaviour; there
//! are no per-variant code paths. [`SchemaNames`] holds the element names of
//! the export format so that a renamed field does not require a rebuild.

use serde::{Deserialize, Serialize};

/// GUID of the latitude characteristic in a support's characteristic table.
pub const LATITUDE_CHARACTERISTIC: &str = "9a326f2d-0841-11e6-80f2-001b21b9eac9";
/// GUID of the longitude characteristic in a support's characteristic table.
pub const LONGITUDE_CHARACTERISTIC: &str = "b53e5884-0841-11e6-80f2-001b21b9eac9";

/// Which property layout emitted features use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertySchema {
    /// `pylons`/`span`/`lines`/`fulllines` tags plus the enrichment block
    #[default]
    Extended,
    /// `support`/`span`/`section`/`powerline` tags, no enrichment keys
    Simple,
}

impl PropertySchema {
    pub fn name(&self) -> &'static str {
        match self {
            PropertySchema::Extended => "extended",
            PropertySchema::Simple => "simple",
        }
    }
}

/// Behavioural switches for a single conversion run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOptions {
    /// Resolve `voltage` through the voltage class side document
    #[serde(default = "default_true")]
    pub include_voltage: bool,
    /// Write the list of supports rejected for missing coordinates
    #[serde(default)]
    pub emit_missing_coordinates: bool,
    #[serde(default)]
    pub property_schema: PropertySchema,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            include_voltage: true,
            emit_missing_coordinates: false,
            property_schema: PropertySchema::Extended,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Element names of the network export and the voltage class document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaNames {
    /// Tag of every catalog object, matched at any depth
    pub object_tag: String,
    pub reference: String,
    pub description: String,
    pub discriminator: String,
    pub parent: String,
    /// Power line field that sections link against
    pub alt_key: String,
    pub span_start: String,
    pub span_end: String,
    pub characteristics: String,
    pub characteristic_row: String,
    pub characteristic_id: String,
    pub characteristic_value: String,
    pub latitude_characteristic: String,
    pub longitude_characteristic: String,
    pub id_dzo: String,
    pub filial: String,
    pub responsible: String,
    pub voltage_class: String,
    /// Tag of every record in the voltage class document
    pub voltage_record_tag: String,
    pub voltage_value: String,
}

impl Default for SchemaNames {
    fn default() -> Self {
        Self {
            object_tag: "CatalogObject.урскСтруктураСети".to_string(),
            reference: "Ref".to_string(),
            description: "Description".to_string(),
            discriminator: "ВидТехническогоМеста".to_string(),
            parent: "Parent".to_string(),
            alt_key: "гуид".to_string(),
            span_start: "НачальнаяОпора".to_string(),
            span_end: "КонечнаяОпора".to_string(),
            characteristics: "СтатическиеХарактеристики".to_string(),
            characteristic_row: "Row".to_string(),
            characteristic_id: "Характеристика".to_string(),
            characteristic_value: "Значение".to_string(),
            latitude_characteristic: LATITUDE_CHARACTERISTIC.to_string(),
            longitude_characteristic: LONGITUDE_CHARACTERISTIC.to_string(),
            id_dzo: "IdDZO".to_string(),
            filial: "Филиал".to_string(),
            responsible: "Ответственный".to_string(),
            voltage_class: "КлассНапряжения".to_string(),
            voltage_record_tag: "CatalogObject.КлассыНапряжения".to_string(),
            voltage_value: "Значение".to_string(),
        }
    }
}
