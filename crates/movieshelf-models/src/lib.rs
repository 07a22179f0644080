pub mod collection;
pub mod error;
pub mod movie;
pub mod normalize;

pub use collection::Collection;
pub use error::NormalizeError;
pub use movie::{rating_desc, Movie, MovieId};
pub use normalize::{extract_year, is_adult, normalize_record, parse_rating, split_genres};
