pub mod results;

pub use results::{SearchHit, SearchResponse};
