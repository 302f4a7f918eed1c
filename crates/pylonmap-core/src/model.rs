//! Typed network assets decoded from tagged objects.
//!
//! The hierarchy is fixed at four levels:
//!
//! ```text
//! PowerLine --(alt_key)--> Section --(parent)--> Span --(start/end)--> Support
//! ```
//!
//! Only [`Support`] carries coordinates. Sections find their power line through
//! the line's alternate key rather than its ref; spans find their section
//! through `parent`; spans name their supports in dedicated endpoint fields.
//!
//! Every link field is an `Option<ObjectRef>`. Absent, blank and sentinel
//! (all-zero GUID) values all decode to `None`, so no downstream lookup can
//! ever be keyed by the sentinel.

use std::borrow::Borrow;
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::diagnostics::ConversionDiagnostics;
use crate::document::TaggedObject;
use crate::schema::SchemaNames;

/// GUID text identifying an object or naming a link target.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectRef(String);

impl ObjectRef {
    #[inline]
    pub fn new(value: impl Into<String>) -> Self {
        ObjectRef(value.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True for any spelling of the nil UUID.
    pub fn is_sentinel(&self) -> bool {
        is_sentinel(&self.0)
    }

    /// Decode a link field. Absent, blank and sentinel values mean "no link".
    pub fn link(raw: Option<&str>) -> Option<ObjectRef> {
        let raw = raw?.trim();
        if raw.is_empty() || is_sentinel(raw) {
            None
        } else {
            Some(ObjectRef::new(raw))
        }
    }
}

fn is_sentinel(raw: &str) -> bool {
    Uuid::parse_str(raw.trim())
        .map(|uuid| uuid.is_nil())
        .unwrap_or(false)
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for ObjectRef {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ObjectRef {
    fn from(value: &str) -> Self {
        ObjectRef::new(value)
    }
}

/// The four hierarchy levels, keyed by the export's technical-place GUIDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetKind {
    PowerLine,
    Section,
    Span,
    Support,
}

impl AssetKind {
    pub const ALL: &'static [AssetKind] = &[
        AssetKind::PowerLine,
        AssetKind::Section,
        AssetKind::Span,
        AssetKind::Support,
    ];

    pub fn discriminator(&self) -> &'static str {
        match self {
            AssetKind::PowerLine => "c0c2ac9d-fcee-11e1-8837-20cf30e80dd7",
            AssetKind::Section => "c0c2ad20-fcee-11e1-8837-20cf30e80dd7",
            AssetKind::Span => "c0c2acd0-fcee-11e1-8837-20cf30e80dd7",
            AssetKind::Support => "c0c2aca6-fcee-11e1-8837-20cf30e80dd7",
        }
    }

    /// Match a discriminator value (case-insensitive). Unknown values are `None`.
    pub fn from_discriminator(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.discriminator().eq_ignore_ascii_case(raw))
    }

    /// Whether features at this level carry their own geometry.
    pub fn has_geometry(&self) -> bool {
        matches!(self, AssetKind::Support | AssetKind::Span)
    }

    /// Whether features at this level list child refs in `relations`.
    pub fn has_relations(&self) -> bool {
        !matches!(self, AssetKind::Support)
    }
}

/// Optional organisational fields shared by every level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetAttributes {
    pub id_dzo: Option<String>,
    pub filial: Option<String>,
    pub responsible: Option<String>,
    pub voltage_class: Option<ObjectRef>,
}

/// Fields common to every decoded object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetHeader {
    pub reference: ObjectRef,
    pub name: Option<String>,
    pub parent: Option<ObjectRef>,
    pub attributes: AssetAttributes,
}

/// One key/value row of a support's characteristic table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CharacteristicRow {
    pub characteristic: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Support {
    pub header: AssetHeader,
    /// `None` when the object has no characteristic table at all
    pub characteristics: Option<Vec<CharacteristicRow>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub header: AssetHeader,
    pub start: Option<ObjectRef>,
    pub end: Option<ObjectRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub header: AssetHeader,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PowerLine {
    pub header: AssetHeader,
    /// Key that sections carry in their `parent` field
    pub alt_key: Option<ObjectRef>,
}

/// Object whose discriminator matched none of the four levels.
#[derive(Debug, Clone, PartialEq)]
pub struct Unclassified {
    pub header: AssetHeader,
    pub discriminator: Option<String>,
}

/// Shared accessors for the four hierarchy levels.
pub trait Asset {
    const KIND: AssetKind;

    fn header(&self) -> &AssetHeader;

    fn reference(&self) -> &ObjectRef {
        &self.header().reference
    }

    fn name(&self) -> Option<&str> {
        self.header().name.as_deref()
    }

    /// Name for log lines: the description, else the ref.
    fn display_name(&self) -> &str {
        self.name().unwrap_or_else(|| self.reference().as_str())
    }
}

impl Asset for Support {
    const KIND: AssetKind = AssetKind::Support;
    fn header(&self) -> &AssetHeader {
        &self.header
    }
}

impl Asset for Span {
    const KIND: AssetKind = AssetKind::Span;
    fn header(&self) -> &AssetHeader {
        &self.header
    }
}

impl Asset for Section {
    const KIND: AssetKind = AssetKind::Section;
    fn header(&self) -> &AssetHeader {
        &self.header
    }
}

impl Asset for PowerLine {
    const KIND: AssetKind = AssetKind::PowerLine;
    fn header(&self) -> &AssetHeader {
        &self.header
    }
}

/// A parsed catalog object in one of its role variants.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkObject {
    Support(Support),
    Span(Span),
    Section(Section),
    PowerLine(PowerLine),
    Unclassified(Unclassified),
}

impl NetworkObject {
    pub fn header(&self) -> &AssetHeader {
        match self {
            NetworkObject::Support(s) => &s.header,
            NetworkObject::Span(s) => &s.header,
            NetworkObject::Section(s) => &s.header,
            NetworkObject::PowerLine(l) => &l.header,
            NetworkObject::Unclassified(u) => &u.header,
        }
    }

    pub fn reference(&self) -> &ObjectRef {
        &self.header().reference
    }

    pub fn kind(&self) -> Option<AssetKind> {
        match self {
            NetworkObject::Support(_) => Some(AssetKind::Support),
            NetworkObject::Span(_) => Some(AssetKind::Span),
            NetworkObject::Section(_) => Some(AssetKind::Section),
            NetworkObject::PowerLine(_) => Some(AssetKind::PowerLine),
            NetworkObject::Unclassified(_) => None,
        }
    }

    /// Decode a tagged object. Returns `None` when the object has no ref.
    pub fn decode(obj: &TaggedObject, names: &SchemaNames) -> Option<NetworkObject> {
        let reference = ObjectRef::new(obj.field(&names.reference)?);
        let header = AssetHeader {
            reference,
            name: obj.field_owned(&names.description),
            parent: ObjectRef::link(obj.field(&names.parent)),
            attributes: AssetAttributes {
                id_dzo: obj.field_owned(&names.id_dzo),
                filial: obj.field_owned(&names.filial),
                responsible: obj.field_owned(&names.responsible),
                voltage_class: ObjectRef::link(obj.field(&names.voltage_class)),
            },
        };

        let discriminator = obj.field(&names.discriminator);
        let object = match discriminator.and_then(AssetKind::from_discriminator) {
            Some(AssetKind::Support) => NetworkObject::Support(Support {
                header,
                characteristics: decode_characteristics(obj, names),
            }),
            Some(AssetKind::Span) => NetworkObject::Span(Span {
                header,
                start: ObjectRef::link(obj.field(&names.span_start)),
                end: ObjectRef::link(obj.field(&names.span_end)),
            }),
            Some(AssetKind::Section) => NetworkObject::Section(Section { header }),
            Some(AssetKind::PowerLine) => NetworkObject::PowerLine(PowerLine {
                header,
                alt_key: ObjectRef::link(obj.field(&names.alt_key)),
            }),
            None => NetworkObject::Unclassified(Unclassified {
                header,
                discriminator: discriminator.map(str::to_string),
            }),
        };
        Some(object)
    }
}

fn decode_characteristics(
    obj: &TaggedObject,
    names: &SchemaNames,
) -> Option<Vec<CharacteristicRow>> {
    let table = obj.child(&names.characteristics)?;
    Some(
        table
            .children_named(&names.characteristic_row)
            .map(|row| CharacteristicRow {
                characteristic: row.field_owned(&names.characteristic_id),
                value: row.field_owned(&names.characteristic_value),
            })
            .collect(),
    )
}

/// Flat ref → object mapping for one parsed export.
///
/// Built once and read-only afterwards; the classifier only borrows from it.
#[derive(Debug, Clone, Default)]
pub struct NetworkDocument {
    objects: BTreeMap<ObjectRef, NetworkObject>,
}

impl NetworkDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode every tagged object, recording skipped and duplicated refs.
    pub fn from_tagged(
        objects: &[TaggedObject],
        names: &SchemaNames,
        diagnostics: &mut ConversionDiagnostics,
    ) -> Self {
        let mut document = NetworkDocument::new();
        for obj in objects {
            let Some(decoded) = NetworkObject::decode(obj, names) else {
                diagnostics.stats.skipped_without_ref += 1;
                diagnostics.add_warning(
                    "document",
                    &format!(
                        "object without '{}' skipped ({})",
                        names.reference,
                        obj.field(&names.description).unwrap_or("<unnamed>")
                    ),
                );
                continue;
            };
            if let Some(previous) = document.insert(decoded) {
                diagnostics.stats.duplicate_refs += 1;
                diagnostics.add_warning_with_entity(
                    "document",
                    "duplicate ref; later object replaces earlier one",
                    previous.reference().as_str(),
                );
            }
        }
        diagnostics.stats.objects = document.len();
        debug!(objects = document.len(), "decoded network document");
        document
    }

    /// Insert an object, returning the one it replaced.
    pub fn insert(&mut self, object: NetworkObject) -> Option<NetworkObject> {
        self.objects.insert(object.reference().clone(), object)
    }

    pub fn get(&self, reference: &str) -> Option<&NetworkObject> {
        self.objects.get(reference)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Objects in ref order.
    pub fn iter(&self) -> btree_map::Values<'_, ObjectRef, NetworkObject> {
        self.objects.values()
    }
}

impl FromIterator<NetworkObject> for NetworkDocument {
    fn from_iter<T: IntoIterator<Item = NetworkObject>>(iter: T) -> Self {
        let mut document = NetworkDocument::new();
        for object in iter {
            document.insert(object);
        }
        document
    }
}
