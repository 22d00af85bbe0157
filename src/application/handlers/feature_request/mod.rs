//! Feature request handlers.

mod approve;
mod list;
mod reject;
mod submit;

pub use approve::{ApproveFeatureRequestHandler, ApproveFeatureRequestResult};
pub use list::ListFeatureRequestsHandler;
pub use reject::{RejectFeatureRequestHandler, RejectFeatureRequestResult};
pub use submit::{SubmitFeatureRequestCommand, SubmitFeatureRequestHandler};
