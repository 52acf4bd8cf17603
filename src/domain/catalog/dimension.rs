//! Dimension - one bipolar question of the quiz.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DimensionId, ValidationError};

/// A fixed bipolar question with two labelled and described poles.
///
/// Value 1 on the scale corresponds to the left pole, 5 to the right.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    id: DimensionId,
    title: String,
    left_label: String,
    left_description: String,
    right_label: String,
    right_description: String,
}

impl Dimension {
    /// Creates a dimension, rejecting blank text fields.
    pub fn new(
        id: DimensionId,
        title: impl Into<String>,
        left_label: impl Into<String>,
        left_description: impl Into<String>,
        right_label: impl Into<String>,
        right_description: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let dimension = Self {
            id,
            title: title.into(),
            left_label: left_label.into(),
            left_description: left_description.into(),
            right_label: right_label.into(),
            right_description: right_description.into(),
        };
        dimension.validate()?;
        Ok(dimension)
    }

    /// Checks that every text field carries content.
    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        let fields = [
            ("title", &self.title),
            ("left_label", &self.left_label),
            ("left_description", &self.left_description),
            ("right_label", &self.right_label),
            ("right_description", &self.right_description),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ValidationError::empty_field(format!(
                    "{}.{}",
                    self.id, name
                )));
            }
        }
        Ok(())
    }

    pub fn id(&self) -> &DimensionId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn left_label(&self) -> &str {
        &self.left_label
    }

    pub fn left_description(&self) -> &str {
        &self.left_description
    }

    pub fn right_label(&self) -> &str {
        &self.right_label
    }

    pub fn right_description(&self) -> &str {
        &self.right_description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id() -> DimensionId {
        DimensionId::new("test_dim").unwrap()
    }

    #[test]
    fn new_accepts_complete_dimension() {
        let dim = Dimension::new(id(), "A – B", "A", "left", "B", "right").unwrap();
        assert_eq!(dim.title(), "A – B");
        assert_eq!(dim.left_label(), "A");
        assert_eq!(dim.right_description(), "right");
    }

    #[test]
    fn new_rejects_blank_pole_label() {
        let err = Dimension::new(id(), "A – B", " ", "left", "B", "right").unwrap_err();
        assert_eq!(err, ValidationError::empty_field("test_dim.left_label"));
    }
}
