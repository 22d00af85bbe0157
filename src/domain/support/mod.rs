//! Support module - support tickets and guest reviews.

mod review;
mod ticket;

pub use review::{Review, ReviewStatus};
pub use ticket::{SupportTicket, TicketStatus};
