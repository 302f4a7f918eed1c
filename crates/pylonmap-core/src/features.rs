//! Projection of valid assets into GeoJSON features.
//!
//! Levels are emitted in the order Support, Span, Section, PowerLine, so every
//! ref named in a `relations` list belongs to a feature of an earlier level.
//! Within a level, features follow ref order (grouped levels: group key, then
//! ref), which keeps repeated runs byte-identical.

use tracing::info;

use crate::classify::Classification;
use crate::geojson::{Enrichment, Feature, FeatureCollection, FeatureProperties, Geometry, Relation};
use crate::model::{Asset, AssetKind, ObjectRef};
use crate::schema::{ConversionOptions, PropertySchema};
use crate::validity::ValiditySets;
use crate::voltage::VoltageTable;

/// Value of `properties.type` for a level under a schema.
pub fn type_tag(schema: PropertySchema, kind: AssetKind) -> &'static str {
    match (schema, kind) {
        (PropertySchema::Extended, AssetKind::Support) => "pylons",
        (PropertySchema::Extended, AssetKind::Span) => "span",
        (PropertySchema::Extended, AssetKind::Section) => "lines",
        (PropertySchema::Extended, AssetKind::PowerLine) => "fulllines",
        (PropertySchema::Simple, AssetKind::Support) => "support",
        (PropertySchema::Simple, AssetKind::Span) => "span",
        (PropertySchema::Simple, AssetKind::Section) => "section",
        (PropertySchema::Simple, AssetKind::PowerLine) => "powerline",
    }
}

pub struct FeatureBuilder<'b, 'a> {
    classification: &'b Classification<'a>,
    validity: &'b ValiditySets<'a>,
    options: &'b ConversionOptions,
    voltages: &'b VoltageTable,
}

impl<'b, 'a> FeatureBuilder<'b, 'a> {
    pub fn new(
        classification: &'b Classification<'a>,
        validity: &'b ValiditySets<'a>,
        options: &'b ConversionOptions,
        voltages: &'b VoltageTable,
    ) -> Self {
        Self {
            classification,
            validity,
            options,
            voltages,
        }
    }

    /// Build every feature, all four levels.
    pub fn build(&self) -> Vec<Feature> {
        let mut features = Vec::new();
        self.push_supports(&mut features);
        self.push_spans(&mut features);
        self.push_sections(&mut features);
        self.push_power_lines(&mut features);
        info!("Generated {} features", features.len());
        features
    }

    pub fn build_collection(&self) -> FeatureCollection {
        FeatureCollection::new(self.build())
    }

    fn push_supports(&self, features: &mut Vec<Feature>) {
        for (reference, support) in &self.classification.supports {
            let Some(point) = self.validity.support_position(reference.as_str()) else {
                continue;
            };
            features.push(Feature::new(
                AssetKind::Support,
                self.properties(*support, None),
                Some(Geometry::Point(point.position())),
            ));
        }
    }

    fn push_spans(&self, features: &mut Vec<Feature>) {
        for span in self.classification.spans_by_parent.values().flatten() {
            if !self.validity.is_valid_span(span.reference().as_str()) {
                continue;
            }
            let (Some(start), Some(end)) = (&span.start, &span.end) else {
                continue;
            };
            let (Some(from), Some(to)) = (
                self.validity.support_position(start.as_str()),
                self.validity.support_position(end.as_str()),
            ) else {
                continue;
            };
            let relations = vec![Relation::new(start.clone()), Relation::new(end.clone())];
            features.push(Feature::new(
                AssetKind::Span,
                self.properties(*span, Some(relations)),
                Some(Geometry::LineString(vec![from.position(), to.position()])),
            ));
        }
    }

    fn push_sections(&self, features: &mut Vec<Feature>) {
        for section in self.classification.sections_by_alt_key.values().flatten() {
            let reference = section.reference();
            if !self.validity.is_valid_section(reference.as_str()) {
                continue;
            }
            let relations = self.relations(
                self.classification
                    .spans_under(reference.as_str())
                    .iter()
                    .map(|span| span.reference())
                    .filter(|r| self.validity.is_valid_span(r.as_str())),
            );
            if relations.is_empty() {
                continue;
            }
            features.push(Feature::new(
                AssetKind::Section,
                self.properties(*section, Some(relations)),
                None,
            ));
        }
    }

    fn push_power_lines(&self, features: &mut Vec<Feature>) {
        for (reference, line) in &self.classification.power_lines {
            if !self.validity.is_valid_power_line(reference.as_str()) {
                continue;
            }
            let Some(alt_key) = &line.alt_key else {
                continue;
            };
            let relations = self.relations(
                self.classification
                    .sections_under(alt_key.as_str())
                    .iter()
                    .map(|section| section.reference())
                    .filter(|r| self.validity.is_valid_section(r.as_str())),
            );
            if relations.is_empty() {
                continue;
            }
            features.push(Feature::new(
                AssetKind::PowerLine,
                self.properties(*line, Some(relations)),
                None,
            ));
        }
    }

    fn relations<'r>(&self, refs: impl Iterator<Item = &'r ObjectRef>) -> Vec<Relation> {
        refs.cloned().map(Relation::new).collect()
    }

    fn properties<A: Asset>(&self, asset: &A, relations: Option<Vec<Relation>>) -> FeatureProperties {
        let schema = self.options.property_schema;
        FeatureProperties {
            reference: asset.reference().clone(),
            name: asset.name().map(str::to_string),
            tag: type_tag(schema, A::KIND),
            relations,
            enrichment: match schema {
                PropertySchema::Extended => Some(self.enrichment(asset)),
                PropertySchema::Simple => None,
            },
        }
    }

    fn enrichment<A: Asset>(&self, asset: &A) -> Enrichment {
        let attributes = &asset.header().attributes;
        let voltage = if self.options.include_voltage {
            attributes
                .voltage_class
                .as_ref()
                .and_then(|class| self.voltages.kilovolts(class.as_str()))
        } else {
            None
        };
        Enrichment {
            id_dzo: attributes.id_dzo.clone(),
            filial: attributes.filial.clone(),
            responsible: attributes.responsible.clone(),
            voltage_id: attributes.voltage_class.clone(),
            voltage,
        }
    }
}
