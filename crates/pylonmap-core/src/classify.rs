//! Partition of a [`NetworkDocument`] into the four hierarchy levels.
//!
//! Two linkage strategies coexist:
//! - supports and power lines are indexed by their own ref;
//! - spans and sections are grouped under the ref they point *up* to
//!   (`parent`), which for sections is the owning power line's alternate key.
//!
//! The result borrows every object from the document and is never mutated
//! after construction, so one document can be classified any number of times.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::diagnostics::ConversionDiagnostics;
use crate::model::{Asset, NetworkDocument, NetworkObject, ObjectRef, PowerLine, Section, Span, Support};

#[derive(Debug, Clone, Default)]
pub struct Classification<'a> {
    pub power_lines: BTreeMap<ObjectRef, &'a PowerLine>,
    /// Sections keyed by their parent, i.e. a power line's alternate key
    pub sections_by_alt_key: BTreeMap<ObjectRef, Vec<&'a Section>>,
    /// Spans keyed by their parent section ref
    pub spans_by_parent: BTreeMap<ObjectRef, Vec<&'a Span>>,
    pub supports: BTreeMap<ObjectRef, &'a Support>,
}

impl<'a> Classification<'a> {
    /// Sections grouped under an alternate key; empty when none.
    pub fn sections_under(&self, alt_key: &str) -> &[&'a Section] {
        self.sections_by_alt_key
            .get(alt_key)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Spans grouped under a section ref; empty when none.
    pub fn spans_under(&self, section: &str) -> &[&'a Span] {
        self.spans_by_parent
            .get(section)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn section_count(&self) -> usize {
        self.sections_by_alt_key.values().map(Vec::len).sum()
    }

    pub fn span_count(&self) -> usize {
        self.spans_by_parent.values().map(Vec::len).sum()
    }
}

/// Classify every object of the document by its discriminator.
///
/// Unclassified objects are ignored. Sections and spans without a parent are
/// left out of the groupings because nothing can reach them.
pub fn classify<'a>(
    document: &'a NetworkDocument,
    diagnostics: &mut ConversionDiagnostics,
) -> Classification<'a> {
    let mut classification = Classification::default();

    for object in document.iter() {
        match object {
            NetworkObject::PowerLine(line) => {
                if line.alt_key.is_none() {
                    diagnostics.stats.unlinked_power_lines += 1;
                    debug!(line = line.display_name(), "power line has no alternate key");
                }
                classification
                    .power_lines
                    .insert(line.reference().clone(), line);
            }
            NetworkObject::Section(section) => match &section.header.parent {
                Some(parent) => classification
                    .sections_by_alt_key
                    .entry(parent.clone())
                    .or_default()
                    .push(section),
                None => {
                    diagnostics.stats.ungrouped += 1;
                    debug!(section = section.display_name(), "section has no parent");
                }
            },
            NetworkObject::Span(span) => match &span.header.parent {
                Some(parent) => classification
                    .spans_by_parent
                    .entry(parent.clone())
                    .or_default()
                    .push(span),
                None => {
                    diagnostics.stats.ungrouped += 1;
                    debug!(span = span.display_name(), "span has no parent");
                }
            },
            NetworkObject::Support(support) => {
                classification
                    .supports
                    .insert(support.reference().clone(), support);
            }
            NetworkObject::Unclassified(_) => diagnostics.stats.unclassified += 1,
        }
    }

    let stats = &mut diagnostics.stats;
    stats.power_lines = classification.power_lines.len();
    stats.sections = classification.section_count();
    stats.spans = classification.span_count();
    stats.supports = classification.supports.len();

    info!(
        "Found {} power lines, {} sections, {} spans, {} supports",
        stats.power_lines, stats.sections, stats.spans, stats.supports
    );

    classification
}
