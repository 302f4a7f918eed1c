//! In-memory conversion: tagged objects in, feature collection out.
//!
//! File loading and writing live in `pylonmap-io`; everything here is pure and
//! owns no state beyond a single call, so concurrent or repeated runs cannot
//! observe one another.

use serde::Serialize;
use tracing::info;

use crate::classify::classify;
use crate::diagnostics::ConversionDiagnostics;
use crate::document::TaggedObject;
use crate::features::FeatureBuilder;
use crate::geojson::FeatureCollection;
use crate::model::{Asset, NetworkDocument, ObjectRef};
use crate::schema::{ConversionOptions, SchemaNames};
use crate::validity::propagate;
use crate::voltage::VoltageTable;

/// A support dropped for lacking a usable coordinate pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingCoordinates {
    pub reference: ObjectRef,
    pub name: Option<String>,
}

impl MissingCoordinates {
    /// `<name>\t<ref>` line for the missing-coordinate log.
    pub fn log_line(&self) -> String {
        format!(
            "{}\t{}",
            self.name.as_deref().unwrap_or("<unnamed>"),
            self.reference
        )
    }
}

#[derive(Debug, Clone)]
pub struct ConversionOutcome {
    pub collection: FeatureCollection,
    /// Filled only when `emit_missing_coordinates` is set
    pub missing_coordinates: Vec<MissingCoordinates>,
}

/// Run decode → classify → propagate → build over already-loaded objects.
pub fn convert_objects(
    objects: &[TaggedObject],
    voltages: &VoltageTable,
    options: &ConversionOptions,
    names: &SchemaNames,
    diagnostics: &mut ConversionDiagnostics,
) -> ConversionOutcome {
    let document = NetworkDocument::from_tagged(objects, names, diagnostics);
    info!("Parsed {} objects", document.len());

    let classification = classify(&document, diagnostics);
    let validity = propagate(&classification, names, diagnostics);

    let collection =
        FeatureBuilder::new(&classification, &validity, options, voltages).build_collection();
    diagnostics.stats.features = collection.counts();

    let missing_coordinates = if options.emit_missing_coordinates {
        validity
            .rejected_supports
            .iter()
            .map(|support| MissingCoordinates {
                reference: support.reference().clone(),
                name: support.name().map(str::to_string),
            })
            .collect()
    } else {
        Vec::new()
    };

    ConversionOutcome {
        collection,
        missing_coordinates,
    }
}

/// Classification and validity counts only; builds no features.
pub fn inspect_objects(
    objects: &[TaggedObject],
    names: &SchemaNames,
    diagnostics: &mut ConversionDiagnostics,
) {
    let document = NetworkDocument::from_tagged(objects, names, diagnostics);
    let classification = classify(&document, diagnostics);
    propagate(&classification, names, diagnostics);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::AssetKind;
    use std::collections::BTreeSet;

    fn object(reference: &str, kind: AssetKind) -> TaggedObject {
        TaggedObject::new("CatalogObject.урскСтруктураСети")
            .with_field("Ref", reference)
            .with_field("Description", format!("{reference} name"))
            .with_field("ВидТехническогоМеста", kind.discriminator())
    }

    fn support(reference: &str, coords: Option<(&str, &str)>) -> TaggedObject {
        let names = SchemaNames::default();
        let mut obj = object(reference, AssetKind::Support);
        if let Some((lat, lon)) = coords {
            obj = obj.with_child(
                TaggedObject::new("СтатическиеХарактеристики")
                    .with_child(
                        TaggedObject::new("Row")
                            .with_field("Характеристика", names.latitude_characteristic.clone())
                            .with_field("Значение", lat),
                    )
                    .with_child(
                        TaggedObject::new("Row")
                            .with_field("Характеристика", names.longitude_characteristic.clone())
                            .with_field("Значение", lon),
                    ),
            );
        }
        obj
    }

    fn scenario(b_coords: Option<(&str, &str)>) -> Vec<TaggedObject> {
        vec![
            object("L1", AssetKind::PowerLine).with_field("гуид", "K1"),
            object("S1", AssetKind::Section).with_field("Parent", "K1"),
            object("P1", AssetKind::Span)
                .with_field("Parent", "S1")
                .with_field("НачальнаяОпора", "A")
                .with_field("КонечнаяОпора", "B"),
            support("A", Some(("55.0N", "37.0E"))),
            support("B", b_coords),
        ]
    }

    fn run(objects: &[TaggedObject], options: &ConversionOptions) -> (ConversionOutcome, ConversionDiagnostics) {
        let mut diag = ConversionDiagnostics::new();
        let outcome = convert_objects(
            objects,
            &VoltageTable::new(),
            options,
            &SchemaNames::default(),
            &mut diag,
        );
        (outcome, diag)
    }

    #[test]
    fn test_missing_endpoint_coordinates_yields_single_point() {
        let (outcome, diag) = run(&scenario(None), &ConversionOptions::default());
        let collection = outcome.collection;

        assert_eq!(collection.len(), 1);
        assert_eq!(collection.features[0].reference().as_str(), "A");
        assert_eq!(collection.features[0].level, AssetKind::Support);
        assert_eq!(diag.stats.features.total(), 1);
    }

    #[test]
    fn test_complete_chain_yields_all_levels() {
        let (outcome, _) = run(
            &scenario(Some(("55.1N", "37.1E"))),
            &ConversionOptions::default(),
        );
        let counts = outcome.collection.counts();
        assert_eq!(counts.supports, 2);
        assert_eq!(counts.spans, 1);
        assert_eq!(counts.sections, 1);
        assert_eq!(counts.power_lines, 1);
    }

    #[test]
    fn test_empty_input_is_empty_collection() {
        let (outcome, diag) = run(&[], &ConversionOptions::default());
        assert!(outcome.collection.is_empty());
        assert_eq!(diag.stats.objects, 0);
    }

    #[test]
    fn test_missing_coordinates_listed_when_enabled() {
        let options = ConversionOptions {
            emit_missing_coordinates: true,
            ..ConversionOptions::default()
        };
        let (outcome, _) = run(&scenario(None), &options);
        assert_eq!(
            outcome.missing_coordinates,
            vec![MissingCoordinates {
                reference: ObjectRef::new("B"),
                name: Some("B name".into()),
            }]
        );
        assert_eq!(outcome.missing_coordinates[0].log_line(), "B name\tB");

        let (silent, _) = run(&scenario(None), &ConversionOptions::default());
        assert!(silent.missing_coordinates.is_empty());
    }

    #[test]
    fn test_repeated_runs_produce_equal_feature_sets() {
        let objects = scenario(Some(("55.1N", "37.1E")));
        let refs = |collection: &FeatureCollection| -> BTreeSet<String> {
            collection
                .features
                .iter()
                .map(|f| serde_json::to_string(f).unwrap())
                .collect()
        };
        let (first, _) = run(&objects, &ConversionOptions::default());
        let (second, _) = run(&objects, &ConversionOptions::default());
        assert_eq!(refs(&first.collection), refs(&second.collection));
    }

    #[test]
    fn test_inspect_fills_stats_only() {
        let mut diag = ConversionDiagnostics::new();
        inspect_objects(
            &scenario(Some(("55.1N", "37.1E"))),
            &SchemaNames::default(),
            &mut diag,
        );
        assert_eq!(diag.stats.valid_power_lines, 1);
        assert_eq!(diag.stats.features.total(), 0);
    }
}
