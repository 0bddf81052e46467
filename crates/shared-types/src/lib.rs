pub mod types;

pub use types::{Citation, HighlightRequest};
