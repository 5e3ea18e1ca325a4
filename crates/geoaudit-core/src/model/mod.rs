//! Data model for feature collections as delivered by the feature service.

pub mod feature;

pub use feature::{Feature, FeatureCollection, Properties};
