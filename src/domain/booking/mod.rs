//! Booking module - guest booking requests and their partner responses.

mod aggregate;
mod stay;

pub use aggregate::{Booking, BookingResponse, GuestContact};
pub use stay::StayDates;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Booking lifecycle. Confirmed and Declined are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    #[serde(alias = "cancelled")]
    Declined,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Declined => "declined",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "declined" | "cancelled" => Some(BookingStatus::Declined),
            _ => None,
        }
    }
}

impl StateMachine for BookingStatus {
    const ENTITY: &'static str = "booking";

    fn valid_transitions(&self) -> Vec<Self> {
        use BookingStatus::*;
        match self {
            Pending => vec![Confirmed, Declined],
            Confirmed | Declined => vec![],
        }
    }
}
