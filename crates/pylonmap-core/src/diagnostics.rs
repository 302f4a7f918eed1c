//! Diagnostics collected during a conversion run.
//!
//! Entity-level problems never abort a conversion. They are counted in
//! [`ConversionStats`] and, where a reader would want the details, recorded as
//! a [`DiagnosticIssue`]. The whole structure serializes to the JSON report.
//!
//! # Example
//!
//! ```
//! use pylonmap_core::diagnostics::{ConversionDiagnostics, Severity};
//!
//! let mut diag = ConversionDiagnostics::new();
//! diag.add_warning_with_entity("coordinates", "malformed latitude '55,5X'", "Опора 7");
//!
//! assert_eq!(diag.warning_count(), 1);
//! assert_eq!(diag.issues[0].severity, Severity::Warning);
//! ```

use serde::Serialize;

/// Severity level for diagnostic issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Value degraded or entity excluded; the run continued
    Warning,
    /// Input could not be used at all (e.g., unreadable side document)
    Error,
}

/// A single issue encountered during conversion
#[derive(Debug, Clone, Serialize)]
pub struct DiagnosticIssue {
    pub severity: Severity,
    /// Grouping key: "document", "coordinates", "voltage", "hierarchy"
    pub category: String,
    pub message: String,
    /// Display name or ref of the entity concerned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
}

impl DiagnosticIssue {
    pub fn new(
        severity: Severity,
        category: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category: category.into(),
            message: message.into(),
            entity: None,
        }
    }

    pub fn with_entity(mut self, entity: impl Into<String>) -> Self {
        self.entity = Some(entity.into());
        self
    }
}

impl std::fmt::Display for DiagnosticIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let severity = match self.severity {
            Severity::Warning => "warning",
            Severity::Error => "error",
        };

        write!(f, "[{}:{}] {}", severity, self.category, self.message)?;

        if let Some(entity) = &self.entity {
            write!(f, " ({})", entity)?;
        }

        Ok(())
    }
}

/// Features emitted per hierarchy level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FeatureCounts {
    pub supports: usize,
    pub spans: usize,
    pub sections: usize,
    pub power_lines: usize,
}

impl FeatureCounts {
    pub fn total(&self) -> usize {
        self.supports + self.spans + self.sections + self.power_lines
    }
}

/// Counters for every pipeline stage
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionStats {
    /// Objects with a ref after de-duplication
    pub objects: usize,
    pub skipped_without_ref: usize,
    pub duplicate_refs: usize,
    /// Objects whose discriminator matched none of the four levels
    pub unclassified: usize,

    pub power_lines: usize,
    pub sections: usize,
    pub spans: usize,
    pub supports: usize,
    /// Sections and spans dropped from grouping for a missing parent
    pub ungrouped: usize,
    /// Power lines without a usable alternate key
    pub unlinked_power_lines: usize,

    pub valid_supports: usize,
    pub valid_spans: usize,
    pub valid_sections: usize,
    pub valid_power_lines: usize,

    pub voltage_classes: usize,
    pub features: FeatureCounts,
}

/// Stats plus issues for one conversion
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConversionDiagnostics {
    pub stats: ConversionStats,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<DiagnosticIssue>,
}

impl ConversionDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_warning(&mut self, category: &str, message: &str) {
        self.issues
            .push(DiagnosticIssue::new(Severity::Warning, category, message));
    }

    pub fn add_warning_with_entity(&mut self, category: &str, message: &str, entity: &str) {
        self.issues
            .push(DiagnosticIssue::new(Severity::Warning, category, message).with_entity(entity));
    }

    pub fn add_error(&mut self, category: &str, message: &str) {
        self.issues
            .push(DiagnosticIssue::new(Severity::Error, category, message));
    }

    pub fn warning_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .count()
    }

    pub fn error_count(&self) -> usize {
        self.issues
            .iter()
            .filter(|i| i.severity == Severity::Error)
            .count()
    }

    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn issues_by_category<'a>(
        &'a self,
        category: &'a str,
    ) -> impl Iterator<Item = &'a DiagnosticIssue> {
        self.issues.iter().filter(move |i| i.category == category)
    }

    pub fn summary(&self) -> String {
        let warnings = self.warning_count();
        let errors = self.error_count();

        match (warnings, errors) {
            (0, 0) => "No issues".to_string(),
            (w, 0) => format!("{} warning{}", w, if w == 1 { "" } else { "s" }),
            (0, e) => format!("{} error{}", e, if e == 1 { "" } else { "s" }),
            (w, e) => format!(
                "{} warning{}, {} error{}",
                w,
                if w == 1 { "" } else { "s" },
                e,
                if e == 1 { "" } else { "s" }
            ),
        }
    }
}

impl std::fmt::Display for ConversionDiagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Diagnostics: {}", self.summary())?;
        for issue in &self.issues {
            writeln!(f, "  {}", issue)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_counts() {
        let mut diag = ConversionDiagnostics::new();
        diag.add_warning("coordinates", "malformed latitude");
        diag.add_error("voltage", "side document unreadable");
        diag.add_warning_with_entity("hierarchy", "dangling endpoint", "Пролет 3");

        assert_eq!(diag.warning_count(), 2);
        assert_eq!(diag.error_count(), 1);
        assert_eq!(diag.issues_by_category("hierarchy").count(), 1);
        assert_eq!(diag.summary(), "2 warnings, 1 error");
    }

    #[test]
    fn test_diagnostics_display_lists_issues() {
        let mut diag = ConversionDiagnostics::new();
        diag.add_warning_with_entity("coordinates", "malformed latitude 'abcN'", "Опора 5");
        diag.add_error("voltage", "side document unreadable");

        let text = diag.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Diagnostics: 1 warning, 1 error",
                "  [warning:coordinates] malformed latitude 'abcN' (Опора 5)",
                "  [error:voltage] side document unreadable",
            ]
        );
    }

    #[test]
    fn test_diagnostics_serialization() {
        let mut diag = ConversionDiagnostics::new();
        diag.stats.supports = 12;
        diag.stats.features.spans = 3;
        diag.add_warning_with_entity("coordinates", "missing coordinates", "Опора 1");

        let json = serde_json::to_string_pretty(&diag).unwrap();
        assert!(json.contains("\"supports\": 12"));
        assert!(json.contains("\"warning\""));
        assert!(json.contains("Опора 1"));
    }

    #[test]
    fn test_empty_issues_omitted() {
        let diag = ConversionDiagnostics::new();
        let json = serde_json::to_string(&diag).unwrap();
        assert!(!json.contains("issues"));
        assert_eq!(diag.summary(), "No issues");
    }

    #[test]
    fn test_feature_counts_total() {
        let counts = FeatureCounts {
            supports: 2,
            spans: 1,
            sections: 1,
            power_lines: 1,
        };
        assert_eq!(counts.total(), 5);
    }
}
