//! Normalization pipeline
//!
//! Rewrites a document into the canonical shape expected by the schema
//! validator. The pipeline visits every entry after its children (post-order)
//! and feeds it through each pass in order. Running it twice is a no-op.

pub mod keys;
pub mod passes;

use crate::error::AsconfigError;
use crate::model::{Section, Value};
use passes::{IdentifierSort, PluralRewrite, TypedContextPromotion};
use tracing::debug;

/// A single rewrite applied to every `(key, value)` entry of a section
///
/// `parent` is the section the entry is being re-inserted into; it already
/// holds every entry that precedes this one.
pub trait Pass {
    /// Name used in trace output
    fn name(&self) -> &'static str;

    /// Rewrite one entry
    ///
    /// # Errors
    ///
    /// Returns an error if the entry is in a state the pass cannot resolve
    fn apply(
        &self,
        key: String,
        value: Value,
        parent: &Section,
    ) -> Result<(String, Value), AsconfigError>;
}

/// Ordered list of passes
pub struct Pipeline {
    passes: Vec<Box<dyn Pass>>,
}

impl Pipeline {
    /// Create an empty pipeline
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self { passes: Vec::new() }
    }

    /// Append a pass (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_pass<P: Pass + 'static>(mut self, pass: P) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// The canonical pipeline: typed-context promotion, plural rewrite, list sorting
    #[must_use]
    #[inline]
    pub fn canonical() -> Self {
        Self::new()
            .with_pass(TypedContextPromotion)
            .with_pass(PluralRewrite)
            .with_pass(IdentifierSort)
    }

    /// Normalize a document in place
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A rewrite would create a key that already exists in its section
    /// - A list of sections contains the same identifier twice
    #[inline]
    pub fn run(&self, root: &mut Section) -> Result<(), AsconfigError> {
        debug!(
            "Normalizing document with passes: {}",
            self.passes
                .iter()
                .map(|pass| pass.name())
                .collect::<Vec<_>>()
                .join(", ")
        );
        self.normalize_section(root)
    }

    fn normalize_section(&self, section: &mut Section) -> Result<(), AsconfigError> {
        for (key, mut value) in section.take_entries() {
            self.normalize_value(&mut value)?;

            let mut entry = (key, value);
            for pass in &self.passes {
                entry = pass.apply(entry.0, entry.1, section)?;
            }

            let (key, value) = entry;
            if section.contains_key(&key) {
                return Err(AsconfigError::normalization(format!(
                    "key '{key}' appears in both its singular and plural form"
                )));
            }
            section.insert(key, value);
        }
        Ok(())
    }

    fn normalize_value(&self, value: &mut Value) -> Result<(), AsconfigError> {
        match value {
            Value::Section(section) => self.normalize_section(section),
            Value::Sections(sections) => sections
                .iter_mut()
                .try_for_each(|section| self.normalize_section(section)),
            Value::Scalar(_) | Value::Scalars(_) => Ok(()),
        }
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::canonical()
    }
}

/// Run the canonical pipeline over a document
///
/// # Errors
///
/// Returns an error if the document cannot be put in canonical form
#[inline]
pub fn normalize(root: &mut Section) -> Result<(), AsconfigError> {
    Pipeline::canonical().run(root)
}
