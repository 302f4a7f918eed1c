//! Minimal GeoJSON model for the emitted collection.
//!
//! Only the shapes the converter produces are modelled: `Point`, two-point
//! `LineString` and null geometry for aggregate levels.

use serde::Serialize;

use crate::diagnostics::FeatureCounts;
use crate::model::{AssetKind, ObjectRef};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    /// `[longitude, latitude]`
    Point([f64; 2]),
    LineString(Vec<[f64; 2]>),
}

/// Child reference listed in a feature's `relations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relation {
    #[serde(rename = "objectId")]
    pub object_id: ObjectRef,
}

impl Relation {
    pub fn new(object_id: ObjectRef) -> Self {
        Self { object_id }
    }
}

/// Organisational properties of the extended schema. Absent values serialize as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Enrichment {
    #[serde(rename = "IdDZO")]
    pub id_dzo: Option<String>,
    pub filial: Option<String>,
    pub responsible: Option<String>,
    pub voltage_id: Option<ObjectRef>,
    /// Nominal voltage in kV
    pub voltage: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureProperties {
    #[serde(rename = "ref")]
    pub reference: ObjectRef,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub tag: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relations: Option<Vec<Relation>>,
    #[serde(flatten)]
    pub enrichment: Option<Enrichment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FeatureType {
    Feature,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: FeatureType,
    pub properties: FeatureProperties,
    pub geometry: Option<Geometry>,
    /// Hierarchy level that produced this feature
    #[serde(skip)]
    pub level: AssetKind,
}

impl Feature {
    pub fn new(level: AssetKind, properties: FeatureProperties, geometry: Option<Geometry>) -> Self {
        Self {
            kind: FeatureType::Feature,
            properties,
            geometry,
            level,
        }
    }

    pub fn reference(&self) -> &ObjectRef {
        &self.properties.reference
    }

    /// Refs listed in `relations`, empty for leaves.
    pub fn related_refs(&self) -> impl Iterator<Item = &ObjectRef> {
        self.properties
            .relations
            .iter()
            .flatten()
            .map(|relation| &relation.object_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CollectionType {
    FeatureCollection,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: CollectionType,
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self {
            kind: CollectionType::FeatureCollection,
            features,
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn counts(&self) -> FeatureCounts {
        let mut counts = FeatureCounts::default();
        for feature in &self.features {
            match feature.level {
                AssetKind::Support => counts.supports += 1,
                AssetKind::Span => counts.spans += 1,
                AssetKind::Section => counts.sections += 1,
                AssetKind::PowerLine => counts.power_lines += 1,
            }
        }
        counts
    }

    pub fn find(&self, reference: &str) -> Option<&Feature> {
        self.features
            .iter()
            .find(|feature| feature.reference().as_str() == reference)
    }
}
