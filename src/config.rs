//! Diff run configuration

use crate::error::{Result, TablediffError};
use crate::model::Header;

/// Output policy of one diff run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffOptions {
    /// Order entries by key instead of table 1 order followed by leftovers
    pub sort_lines: bool,
    pub suppress_unchanged: bool,
    /// Emit added/removed rows without a mark or highlight
    pub suppress_added_removed_marks: bool,
    /// Name of a trailing column carrying the status text
    pub mark_column: Option<String>,
    pub show_change_details: bool,
    pub disable_colors: bool,
    pub emit_synthesis: bool,
}

impl DiffOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort_lines(mut self, yes: bool) -> Self {
        self.sort_lines = yes;
        self
    }

    pub fn suppress_unchanged(mut self, yes: bool) -> Self {
        self.suppress_unchanged = yes;
        self
    }

    pub fn suppress_added_removed_marks(mut self, yes: bool) -> Self {
        self.suppress_added_removed_marks = yes;
        self
    }

    pub fn mark_column(mut self, name: impl Into<String>) -> Self {
        self.mark_column = Some(name.into());
        self
    }

    pub fn show_change_details(mut self, yes: bool) -> Self {
        self.show_change_details = yes;
        self
    }

    pub fn disable_colors(mut self, yes: bool) -> Self {
        self.disable_colors = yes;
        self
    }

    pub fn emit_synthesis(mut self, yes: bool) -> Self {
        self.emit_synthesis = yes;
        self
    }

    /// Checks that do not depend on the tables
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = &self.mark_column {
            if name.trim().is_empty() {
                return Err(TablediffError::config("mark column name must not be empty"));
            }
        }
        Ok(())
    }

    /// The mark column must not shadow a data column
    pub fn validate_against(&self, header: &Header) -> Result<()> {
        self.validate()?;
        if let Some(name) = &self.mark_column {
            if header.contains(name) {
                return Err(TablediffError::config(format!(
                    "mark column '{}' collides with an existing column",
                    name
                )));
            }
        }
        Ok(())
    }
}
