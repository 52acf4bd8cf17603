//! Quiz content configuration

use serde::Deserialize;
use std::path::PathBuf;

use crate::domain::catalog::{CatalogError, DimensionCatalog};

/// Quiz configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuizConfig {
    /// YAML file replacing the built-in dimension catalog
    pub catalog_path: Option<PathBuf>,
}

impl QuizConfig {
    /// Loads the configured catalog, or the built-in one
    pub fn catalog(&self) -> Result<DimensionCatalog, CatalogError> {
        match &self.catalog_path {
            Some(path) => DimensionCatalog::from_path(path),
            None => DimensionCatalog::builtin(),
        }
    }
}
