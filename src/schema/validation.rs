//! JSON Schema validation of canonical documents

use crate::error::AsconfigError;
use crate::model::Section;
use anyhow::{Context as _, Result};
use core::fmt;
use jsonschema::error::ValidationErrorKind;
use serde_json::Value as Json;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Error type of `oneOf` failures
///
/// Dropped from reports whenever a more precise issue exists at or below
/// the same context.
pub const NUMBER_ONE_OF: &str = "number_one_of";

/// A single schema violation
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ValidationIssue {
    /// Dotted location in the document, rooted at `(root)`
    pub context: String,
    pub description: String,
    pub error_type: String,
}

impl ValidationIssue {
    #[must_use]
    #[inline]
    pub fn new<C: Into<String>, D: Into<String>, T: Into<String>>(
        context: C,
        description: D,
        error_type: T,
    ) -> Self {
        Self {
            context: context.into(),
            description: description.into(),
            error_type: error_type.into(),
        }
    }
}

/// Every unique violation of a document, sorted by context then description
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Build a report, dropping shadowed `number_one_of` issues and duplicate
    /// `(context, description)` pairs
    #[must_use]
    #[inline]
    pub fn from_issues<I: IntoIterator<Item = ValidationIssue>>(issues: I) -> Self {
        let issues: Vec<ValidationIssue> = issues.into_iter().collect();
        let precise: Vec<&str> = issues
            .iter()
            .filter(|issue| issue.error_type != NUMBER_ONE_OF)
            .map(|issue| issue.context.as_str())
            .collect();

        let mut seen = BTreeSet::new();
        let mut issues: Vec<ValidationIssue> = issues
            .iter()
            .filter(|issue| {
                issue.error_type != NUMBER_ONE_OF || !is_shadowed(&issue.context, &precise)
            })
            .filter(|issue| seen.insert((issue.context.clone(), issue.description.clone())))
            .cloned()
            .collect();
        issues.sort_by(|left, right| {
            left.context
                .cmp(&right.context)
                .then_with(|| left.description.cmp(&right.description))
        });
        Self { issues }
    }

    #[must_use]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    #[must_use]
    #[inline]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    #[must_use]
    #[inline]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    /// Issues grouped by context
    #[must_use]
    #[inline]
    pub fn grouped(&self) -> BTreeMap<&str, Vec<&ValidationIssue>> {
        let mut groups: BTreeMap<&str, Vec<&ValidationIssue>> = BTreeMap::new();
        for issue in &self.issues {
            groups.entry(issue.context.as_str()).or_default().push(issue);
        }
        groups
    }

    /// Turn a non-empty report into an error
    ///
    /// # Errors
    ///
    /// Returns `AsconfigError::Validation` if the report holds any issue
    #[inline]
    pub fn into_result(self) -> Result<(), AsconfigError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AsconfigError::Validation { report: self })
        }
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (context, issues) in self.grouped() {
            writeln!(f, "context: {context}")?;
            for issue in issues {
                writeln!(
                    f,
                    "\t- description: {}, error-type: {}",
                    issue.description, issue.error_type
                )?;
            }
        }
        Ok(())
    }
}

/// Something that checks a canonical document against a schema
pub trait Validator {
    /// Collect every violation of the document
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be presented to the validator
    fn validate(&self, document: &Section) -> Result<ValidationReport>;
}

/// Validator backed by the `jsonschema` crate
pub struct JsonSchemaValidator {
    validator: jsonschema::Validator,
}

impl JsonSchemaValidator {
    /// Compile a schema; the draft is taken from its `$schema` keyword
    ///
    /// # Errors
    ///
    /// Returns a schema error if the schema does not compile
    #[inline]
    pub fn new(schema: &Json) -> Result<Self, AsconfigError> {
        let validator = jsonschema::validator_for(schema)
            .map_err(|e| AsconfigError::schema(format!("Failed to compile JSON schema: {e}")))?;
        Ok(Self { validator })
    }
}

impl Validator for JsonSchemaValidator {
    fn validate(&self, document: &Section) -> Result<ValidationReport> {
        let instance = serde_json::to_value(document)
            .context("Failed to convert configuration to JSON for validation")?;

        let issues: Vec<ValidationIssue> = self
            .validator
            .iter_errors(&instance)
            .map(|e| {
                ValidationIssue::new(
                    pointer_to_context(&e.instance_path.to_string()),
                    e.to_string(),
                    error_type(&e.kind),
                )
            })
            .collect();

        debug!("Schema validation produced {} raw issue(s)", issues.len());
        Ok(ValidationReport::from_issues(issues))
    }
}

/// Whether a precise issue sits at `context` or below it
fn is_shadowed(context: &str, precise: &[&str]) -> bool {
    precise.iter().any(|other| {
        other
            .strip_prefix(context)
            .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
    })
}

/// `/namespaces/0/replication-factor` becomes `(root).namespaces.0.replication-factor`
fn pointer_to_context(pointer: &str) -> String {
    let mut context = "(root)".to_owned();
    for segment in pointer.split('/').filter(|segment| !segment.is_empty()) {
        context.push('.');
        context.push_str(&segment.replace("~1", "/").replace("~0", "~"));
    }
    context
}

const fn error_type(kind: &ValidationErrorKind) -> &'static str {
    match kind {
        ValidationErrorKind::OneOfNotValid { .. }
        | ValidationErrorKind::OneOfMultipleValid { .. } => NUMBER_ONE_OF,
        ValidationErrorKind::Required { .. } => "required",
        ValidationErrorKind::AdditionalProperties { .. } => "additional_property_not_allowed",
        ValidationErrorKind::Type { .. } => "invalid_type",
        ValidationErrorKind::Enum { .. } => "enum",
        ValidationErrorKind::Minimum { .. } => "number_gte",
        ValidationErrorKind::Maximum { .. } => "number_lte",
        _ => "schema_violation",
    }
}
