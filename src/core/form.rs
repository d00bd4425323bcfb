use crate::error::{AppError, Result};
use crate::models::comparison::{ComparisonResult, SimilarityFunction};

/// Ordered, index-addressable list of compare texts that never holds fewer
/// than one entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareTexts {
    entries: Vec<String>,
}

impl Default for CompareTexts {
    fn default() -> Self {
        Self {
            entries: vec![String::new()],
        }
    }
}

impl CompareTexts {
    /// Build a list from existing entries; an empty iterator yields one
    /// empty field.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<String> = entries.into_iter().map(Into::into).collect();
        if entries.is_empty() {
            Self::default()
        } else {
            Self { entries }
        }
    }

    /// Number of fields, always at least one
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All fields, blank ones included
    pub fn as_slice(&self) -> &[String] {
        &self.entries
    }

    /// Field at `index`, if any
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Replace the field at `index`
    pub fn set(&mut self, index: usize, text: impl Into<String>) -> Result<()> {
        let len = self.entries.len();
        let slot = self
            .entries
            .get_mut(index)
            .ok_or(AppError::IndexOutOfBounds { index, len })?;
        *slot = text.into();
        Ok(())
    }

    /// Append one empty field
    pub fn push_empty(&mut self) {
        self.entries.push(String::new());
    }

    /// Remove the field at `index`, refusing to drop the last one
    pub fn remove(&mut self, index: usize) -> Result<String> {
        let len = self.entries.len();
        if index >= len {
            return Err(AppError::IndexOutOfBounds { index, len });
        }
        if len == 1 {
            return Err(AppError::LastCompareField);
        }
        Ok(self.entries.remove(index))
    }

    /// Non-blank fields in order, as typed
    pub fn non_blank(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|t| !t.trim().is_empty())
            .cloned()
            .collect()
    }

    /// True when at least one field holds more than whitespace
    pub fn has_non_blank(&self) -> bool {
        self.entries.iter().any(|t| !t.trim().is_empty())
    }
}

/// Submission phase of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Editable, submit allowed when the guards pass
    #[default]
    Idle,
    /// A request is in flight
    Submitting,
}

/// Everything the comparator form owns for the lifetime of a session
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormState {
    /// Reference text
    pub target_text: String,
    /// Candidate texts
    pub compare_texts: CompareTexts,
    /// Selected scoring method
    pub function: SimilarityFunction,
    /// Results of the last successful submission
    pub results: Vec<ComparisonResult>,
    /// Current submission phase
    pub phase: Phase,
}

impl FormState {
    /// Fresh state: empty target, one empty compare field, cosine
    pub fn new() -> Self {
        Self::default()
    }

    /// True while a request is in flight
    pub fn is_submitting(&self) -> bool {
        self.phase == Phase::Submitting
    }

    /// Check the submission guards without touching the state
    pub fn validate(&self) -> Result<()> {
        if self.target_text.is_empty() {
            return Err(AppError::Validation("target text is required".to_string()));
        }
        if !self.compare_texts.has_non_blank() {
            return Err(AppError::Validation(
                "at least one non-blank compare text is required".to_string(),
            ));
        }
        Ok(())
    }
}
