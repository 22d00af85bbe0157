//! Booking handlers.

mod create_booking;
mod list_bookings;
mod respond_to_booking;

pub use create_booking::{CreateBookingCommand, CreateBookingHandler, CreateBookingResult};
pub use list_bookings::ListBookingsHandler;
pub use respond_to_booking::{
    RespondToBookingCommand, RespondToBookingHandler, RespondToBookingResult,
};
