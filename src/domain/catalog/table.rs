//! DimensionCatalog - the ordered, immutable table of quiz dimensions.
//!
//! The catalog is data, not code: the built-in table is a YAML document
//! embedded at build time, and an alternative table can be loaded from a
//! file named in configuration. The session state machine is generic over
//! the catalog length.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use super::Dimension;
use crate::domain::foundation::{DimensionId, ValidationError};

const BUILTIN_CATALOG_YAML: &str = include_str!("dimensions.yaml");

/// Errors raised while loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Dimension catalog is empty")]
    Empty,

    #[error("Duplicate dimension id: {0}")]
    DuplicateId(DimensionId),

    #[error("Invalid dimension: {0}")]
    Invalid(#[from] ValidationError),

    #[error("Failed to parse dimension catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Failed to read dimension catalog: {0}")]
    Io(#[from] std::io::Error),
}

/// Ordered list of dimensions. Cheap to clone.
///
/// # Invariants
///
/// - at least one dimension
/// - ids are unique
/// - every text field is non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimensionCatalog {
    dimensions: Arc<[Dimension]>,
}

impl DimensionCatalog {
    /// Builds a catalog from dimensions in presentation order.
    pub fn new(dimensions: Vec<Dimension>) -> Result<Self, CatalogError> {
        if dimensions.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for dimension in &dimensions {
            dimension.validate()?;
            if !seen.insert(dimension.id().clone()) {
                return Err(CatalogError::DuplicateId(dimension.id().clone()));
            }
        }

        Ok(Self {
            dimensions: dimensions.into(),
        })
    }

    /// The four built-in dimensions of the view-of-human-nature quiz.
    pub fn builtin() -> Result<Self, CatalogError> {
        Self::from_yaml_str(BUILTIN_CATALOG_YAML)
    }

    /// Parses a YAML sequence of dimensions.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, CatalogError> {
        let dimensions: Vec<Dimension> = serde_yaml::from_str(yaml)?;
        Self::new(dimensions)
    }

    /// Loads a YAML catalog from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    /// Number of dimensions.
    pub fn len(&self) -> usize {
        self.dimensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dimensions.is_empty()
    }

    /// Index of the final dimension.
    pub fn last_index(&self) -> usize {
        self.dimensions.len() - 1
    }

    /// Dimension at the given position.
    pub fn get(&self, index: usize) -> Option<&Dimension> {
        self.dimensions.get(index)
    }

    /// Looks up a dimension by id.
    pub fn find(&self, id: &DimensionId) -> Option<&Dimension> {
        self.dimensions.iter().find(|d| d.id() == id)
    }

    /// Position of the dimension with the given id.
    pub fn index_of(&self, id: &DimensionId) -> Option<usize> {
        self.dimensions.iter().position(|d| d.id() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Dimension> {
        self.dimensions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn dim(id: &str) -> Dimension {
        Dimension::new(DimensionId::new(id).unwrap(), "T", "L", "ld", "R", "rd").unwrap()
    }

    #[test]
    fn builtin_catalog_has_four_dimensions_in_order() {
        let catalog = DimensionCatalog::builtin().unwrap();
        let ids: Vec<&str> = catalog.iter().map(|d| d.id().as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "actor_pawn",
                "nature_nurture",
                "uniqueness_similarity",
                "optimism_pessimism"
            ]
        );
        assert_eq!(catalog.last_index(), 3);
    }

    #[test]
    fn builtin_catalog_carries_pole_texts() {
        let catalog = DimensionCatalog::builtin().unwrap();
        let first = catalog.get(0).unwrap();
        assert_eq!(first.title(), "Aktør – Brikke");
        assert_eq!(first.left_label(), "Aktør");
        assert_eq!(first.right_label(), "Brikke");
        assert_eq!(first.left_description(), "Vi handler ut fra egne initiativer.");
    }

    #[test]
    fn new_rejects_empty_catalog() {
        assert!(matches!(
            DimensionCatalog::new(vec![]),
            Err(CatalogError::Empty)
        ));
    }

    #[test]
    fn new_rejects_duplicate_ids() {
        let result = DimensionCatalog::new(vec![dim("a"), dim("b"), dim("a")]);
        assert!(matches!(result, Err(CatalogError::DuplicateId(id)) if id.as_str() == "a"));
    }

    #[test]
    fn yaml_with_blank_field_is_rejected() {
        let yaml = r#"
- id: x
  title: ""
  left_label: L
  left_description: ld
  right_label: R
  right_description: rd
"#;
        assert!(matches!(
            DimensionCatalog::from_yaml_str(yaml),
            Err(CatalogError::Invalid(_))
        ));
    }

    #[test]
    fn malformed_yaml_is_a_parse_error() {
        assert!(matches!(
            DimensionCatalog::from_yaml_str("- id: [unterminated"),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn find_and_index_of_agree() {
        let catalog = DimensionCatalog::new(vec![dim("a"), dim("b")]).unwrap();
        let b = DimensionId::new("b").unwrap();
        assert_eq!(catalog.index_of(&b), Some(1));
        assert_eq!(catalog.find(&b).map(|d| d.id().as_str()), Some("b"));
        assert!(catalog.find(&DimensionId::new("c").unwrap()).is_none());
    }

    #[test]
    fn loads_catalog_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "- id: solo\n  title: Solo\n  left_label: L\n  left_description: ld\n  right_label: R\n  right_description: rd\n"
        )
        .unwrap();

        let catalog = DimensionCatalog::from_path(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.last_index(), 0);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = DimensionCatalog::from_path(dir.path().join("missing.yaml"));
        assert!(matches!(result, Err(CatalogError::Io(_))));
    }
}
