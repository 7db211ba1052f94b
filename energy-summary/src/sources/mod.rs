pub mod api_samples;

pub use api_samples::ApiSamplesSource;
