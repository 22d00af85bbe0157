//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors, state machine)
//! - `session` - Role priority and the pure session decision
//! - `account` - Partner and referral-agent accounts, referral links
//! - `property` - Listings, feature windows, listing visibility
//! - `feature_request` - Partner requests to feature a listing
//! - `booking` - Guest bookings and stay pricing
//! - `commission` - Referral commissions and revenue reports
//! - `notification` - In-app notifications
//! - `support` - Support tickets and guest reviews
//! - `contact` - Phone normalisation and outbound deep links

pub mod account;
pub mod booking;
pub mod commission;
pub mod contact;
pub mod feature_request;
pub mod foundation;
pub mod notification;
pub mod property;
pub mod session;
pub mod support;
