//! Dimension Catalog - static, ordered quiz questions.

mod table;
mod dimension;

pub use table::{CatalogError, DimensionCatalog};
pub use dimension::Dimension;
