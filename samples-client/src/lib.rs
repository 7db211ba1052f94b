pub mod api;
pub mod domain;
pub mod error;

pub use api::{Page, SamplesApi};
pub use error::{ConfigError, FetchError};
