//! Read-time earnings reports.
//!
//! Rates are applied when the report is built; nothing here is stored.

use serde::Serialize;

use super::{CommissionPolicy, CommissionRecord, CommissionStatus};
use crate::domain::booking::{Booking, BookingStatus};
use crate::domain::foundation::Money;

/// Partner dashboard totals over confirmed bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PartnerRevenueReport {
    pub gross: Money,
    pub platform_commission: Money,
    pub net: Money,
    pub confirmed_bookings: usize,
}

impl PartnerRevenueReport {
    pub fn build(bookings: &[Booking], policy: &CommissionPolicy) -> Self {
        let confirmed: Vec<&Booking> = bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Confirmed)
            .collect();
        let gross: Money = confirmed.iter().map(|b| b.total_price).sum();
        let platform_commission = policy.platform_commission(gross);
        Self {
            gross,
            platform_commission,
            net: gross - platform_commission,
            confirmed_bookings: confirmed.len(),
        }
    }
}

/// Agent dashboard totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgentEarningsReport {
    pub referred_partners: usize,
    /// Everything not rejected.
    pub total: Money,
    pub pending: Money,
    pub paid: Money,
}

impl AgentEarningsReport {
    pub fn build(referred_partners: usize, records: &[CommissionRecord]) -> Self {
        let sum_where = |pred: fn(CommissionStatus) -> bool| -> Money {
            records
                .iter()
                .filter(|r| pred(r.status))
                .map(|r| r.amount)
                .sum()
        };
        Self {
            referred_partners,
            total: sum_where(|s| s != CommissionStatus::Rejected),
            pending: sum_where(|s| s.is_outstanding()),
            paid: sum_where(|s| s == CommissionStatus::Paid),
        }
    }
}
