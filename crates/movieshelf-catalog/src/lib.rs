pub mod error;
pub mod rest;
pub mod traits;

pub use error::CatalogError;
pub use rest::CatalogClient;
pub use traits::{is_unfiltered_genre, MovieCatalog, ALL_GENRES};
