//! Property module - listings, feature windows and the listing read gate.

mod aggregate;
mod feature;
mod visibility;

pub use aggregate::{Property, PropertyDetails};
pub use feature::{FeatureWindow, MAX_FEATURE_DAYS};
pub use visibility::Viewer;

#[cfg(test)]
pub(crate) use aggregate::tests::details as sample_details;
