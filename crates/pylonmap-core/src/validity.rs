//! Bottom-up validity propagation.
//!
//! Four passes, each reading only the previous pass's result:
//!
//! 1. a support is valid iff both coordinates resolve;
//! 2. a span is valid iff both endpoints are valid supports;
//! 3. a section (span group key) is valid iff it holds at least one valid span;
//! 4. a power line is valid iff a section grouped under its alternate key is valid.
//!
//! Validity only ever flows upward, so no pass revisits an earlier level.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info};

use crate::classify::Classification;
use crate::coordinates::{self, GeoPoint};
use crate::diagnostics::ConversionDiagnostics;
use crate::model::{Asset, ObjectRef, Support};
use crate::schema::SchemaNames;

/// Refs eligible for output at each level.
#[derive(Debug, Clone, Default)]
pub struct ValiditySets<'a> {
    /// Valid supports with their resolved position
    pub supports: BTreeMap<ObjectRef, GeoPoint>,
    pub spans: BTreeSet<ObjectRef>,
    pub sections: BTreeSet<ObjectRef>,
    pub power_lines: BTreeSet<ObjectRef>,
    /// Supports dropped for missing or malformed coordinates, in ref order
    pub rejected_supports: Vec<&'a Support>,
}

impl<'a> ValiditySets<'a> {
    pub fn support_position(&self, reference: &str) -> Option<GeoPoint> {
        self.supports.get(reference).copied()
    }

    pub fn is_valid_support(&self, reference: &str) -> bool {
        self.supports.contains_key(reference)
    }

    pub fn is_valid_span(&self, reference: &str) -> bool {
        self.spans.contains(reference)
    }

    pub fn is_valid_section(&self, reference: &str) -> bool {
        self.sections.contains(reference)
    }

    pub fn is_valid_power_line(&self, reference: &str) -> bool {
        self.power_lines.contains(reference)
    }
}

/// Run all four passes over a classification.
pub fn propagate<'a>(
    classification: &Classification<'a>,
    names: &SchemaNames,
    diagnostics: &mut ConversionDiagnostics,
) -> ValiditySets<'a> {
    let mut validity = ValiditySets::default();

    validate_supports(classification, names, diagnostics, &mut validity);
    validate_spans(classification, &mut validity);
    validate_sections(classification, &mut validity);
    validate_power_lines(classification, &mut validity);

    let stats = &mut diagnostics.stats;
    stats.valid_supports = validity.supports.len();
    stats.valid_spans = validity.spans.len();
    stats.valid_sections = validity.sections.len();
    stats.valid_power_lines = validity.power_lines.len();

    validity
}

fn validate_supports<'a>(
    classification: &Classification<'a>,
    names: &SchemaNames,
    diagnostics: &mut ConversionDiagnostics,
    validity: &mut ValiditySets<'a>,
) {
    for (reference, support) in &classification.supports {
        let resolution = coordinates::resolve(support.characteristics.as_deref(), names);
        for malformed in &resolution.malformed {
            diagnostics.add_warning_with_entity(
                "coordinates",
                &format!("malformed {} '{}'", malformed.axis.name(), malformed.raw),
                support.display_name(),
            );
        }
        match resolution.pair.resolved() {
            Some(point) => {
                validity.supports.insert(reference.clone(), point);
            }
            None => {
                debug!(support = support.display_name(), "support has no coordinates");
                diagnostics.add_warning_with_entity(
                    "hierarchy",
                    "support rejected: coordinates missing or malformed",
                    support.display_name(),
                );
                validity.rejected_supports.push(*support);
            }
        }
    }
    info!("Found {} valid supports with coordinates", validity.supports.len());
}

fn validate_spans(classification: &Classification<'_>, validity: &mut ValiditySets<'_>) {
    for span in classification.spans_by_parent.values().flatten() {
        let valid = [&span.start, &span.end].into_iter().all(|endpoint| {
            endpoint
                .as_ref()
                .is_some_and(|r| validity.is_valid_support(r.as_str()))
        });
        if valid {
            validity.spans.insert(span.reference().clone());
        } else {
            debug!(span = span.display_name(), "span endpoints are not both valid supports");
        }
    }
    info!("Found {} valid spans", validity.spans.len());
}

fn validate_sections(classification: &Classification<'_>, validity: &mut ValiditySets<'_>) {
    for (section, spans) in &classification.spans_by_parent {
        if spans
            .iter()
            .any(|span| validity.is_valid_span(span.reference().as_str()))
        {
            validity.sections.insert(section.clone());
        }
    }
    info!("Found {} valid sections", validity.sections.len());
}

fn validate_power_lines(classification: &Classification<'_>, validity: &mut ValiditySets<'_>) {
    for (reference, line) in &classification.power_lines {
        let Some(alt_key) = &line.alt_key else {
            continue;
        };
        if classification
            .sections_under(alt_key.as_str())
            .iter()
            .any(|section| validity.is_valid_section(section.reference().as_str()))
        {
            validity.power_lines.insert(reference.clone());
        }
    }
    info!("Found {} valid power lines", validity.power_lines.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::model::{
        AssetAttributes, AssetHeader, CharacteristicRow, NetworkDocument, NetworkObject,
        PowerLine, Section, Span,
    };

    fn header(reference: &str, parent: Option<&str>) -> AssetHeader {
        AssetHeader {
            reference: ObjectRef::new(reference),
            name: Some(format!("name of {reference}")),
            parent: ObjectRef::link(parent),
            attributes: AssetAttributes::default(),
        }
    }

    fn support(reference: &str, coords: Option<(&str, &str)>) -> NetworkObject {
        let names = SchemaNames::default();
        let characteristics = coords.map(|(lat, lon)| {
            vec![
                CharacteristicRow {
                    characteristic: Some(names.latitude_characteristic.clone()),
                    value: Some(lat.to_string()),
                },
                CharacteristicRow {
                    characteristic: Some(names.longitude_characteristic.clone()),
                    value: Some(lon.to_string()),
                },
            ]
        });
        NetworkObject::Support(Support {
            header: header(reference, None),
            characteristics,
        })
    }

    fn span(reference: &str, parent: &str, start: &str, end: &str) -> NetworkObject {
        NetworkObject::Span(Span {
            header: header(reference, Some(parent)),
            start: ObjectRef::link(Some(start)),
            end: ObjectRef::link(Some(end)),
        })
    }

    fn hierarchy(b_coords: Option<(&str, &str)>) -> NetworkDocument {
        vec![
            NetworkObject::PowerLine(PowerLine {
                header: header("L1", None),
                alt_key: Some(ObjectRef::new("K1")),
            }),
            NetworkObject::Section(Section {
                header: header("S1", Some("K1")),
            }),
            span("P1", "S1", "A", "B"),
            support("A", Some(("55.0N", "37.0E"))),
            support("B", b_coords),
        ]
        .into_iter()
        .collect()
    }

    fn run(document: &NetworkDocument) -> (ValiditySets<'_>, ConversionDiagnostics) {
        let mut diag = ConversionDiagnostics::new();
        let classification = classify(document, &mut diag);
        let validity = propagate(&classification, &SchemaNames::default(), &mut diag);
        (validity, diag)
    }

    #[test]
    fn test_invalid_leaf_blocks_everything_above() {
        let document = hierarchy(None);
        let (validity, diag) = run(&document);

        assert!(validity.is_valid_support("A"));
        assert!(!validity.is_valid_support("B"));
        assert!(validity.spans.is_empty());
        assert!(validity.sections.is_empty());
        assert!(validity.power_lines.is_empty());
        assert_eq!(validity.rejected_supports.len(), 1);
        assert_eq!(validity.rejected_supports[0].reference().as_str(), "B");
        assert_eq!(diag.stats.valid_supports, 1);
        let hierarchy: Vec<_> = diag.issues_by_category("hierarchy").collect();
        assert_eq!(hierarchy.len(), 1);
        assert_eq!(
            hierarchy[0].entity.as_deref(),
            Some(validity.rejected_supports[0].display_name())
        );
    }

    #[test]
    fn test_full_chain_is_valid() {
        let document = hierarchy(Some(("55.1N", "37.1E")));
        let (validity, diag) = run(&document);

        assert_eq!(validity.support_position("B"), Some(GeoPoint::new(55.1, 37.1)));
        assert!(validity.is_valid_span("P1"));
        assert!(validity.is_valid_section("S1"));
        assert!(validity.is_valid_power_line("L1"));
        assert_eq!(diag.stats.valid_power_lines, 1);
    }

    #[test]
    fn test_one_valid_span_is_enough_for_section() {
        let mut objects: Vec<NetworkObject> = hierarchy(Some(("55.1N", "37.1E")))
            .iter()
            .cloned()
            .collect();
        objects.push(span("P2", "S1", "A", "MISSING"));
        let document: NetworkDocument = objects.into_iter().collect();
        let (validity, _) = run(&document);

        assert!(validity.is_valid_span("P1"));
        assert!(!validity.is_valid_span("P2"));
        assert!(validity.is_valid_section("S1"));
    }

    #[test]
    fn test_power_line_needs_alt_key() {
        let mut objects: Vec<NetworkObject> = hierarchy(Some(("55.1N", "37.1E")))
            .iter()
            .cloned()
            .collect();
        objects.push(NetworkObject::PowerLine(PowerLine {
            header: header("L2", None),
            alt_key: None,
        }));
        // Linked by ref instead of alternate key: must not match.
        objects.push(NetworkObject::PowerLine(PowerLine {
            header: header("K9", None),
            alt_key: Some(ObjectRef::new("S1")),
        }));
        let document: NetworkDocument = objects.into_iter().collect();
        let (validity, _) = run(&document);

        assert!(validity.is_valid_power_line("L1"));
        assert!(!validity.is_valid_power_line("L2"));
        assert!(!validity.is_valid_power_line("K9"));
    }

    #[test]
    fn test_malformed_coordinate_reported() {
        let document: NetworkDocument = vec![support("A", Some(("north", "37E")))]
            .into_iter()
            .collect();
        let (validity, diag) = run(&document);

        assert!(validity.supports.is_empty());
        assert_eq!(diag.issues_by_category("coordinates").count(), 1);
    }
}
