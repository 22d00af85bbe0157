//! Support tickets and guest reviews.

mod reviews;
mod tickets;

pub use reviews::{
    ListReviewsHandler, ModerateReviewCommand, ModerateReviewHandler, SubmitReviewCommand,
    SubmitReviewHandler,
};
pub use tickets::{
    AdvanceTicketCommand, AdvanceTicketHandler, ListTicketsHandler, OpenTicketCommand,
    OpenTicketHandler,
};
