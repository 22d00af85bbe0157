//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Auth Ports
//!
//! - `SessionValidator` - Bearer token to principal
//! - `SessionTerminator` - Revokes a live session
//! - `RoleReader` - Role assignments per principal
//!
//! ## Repository Ports
//!
//! One per status-gated entity. Every method is a single remote call; none
//! of them retries.

mod agent_repository;
mod booking_repository;
mod commission_repository;
mod feature_request_repository;
mod notification_repository;
mod partner_repository;
mod property_repository;
mod referral_link_repository;
mod role_reader;
mod session_terminator;
mod session_validator;
mod support_repository;

pub use agent_repository::AgentRepository;
pub use booking_repository::BookingRepository;
pub use commission_repository::CommissionRepository;
pub use feature_request_repository::FeatureRequestRepository;
pub use notification_repository::NotificationRepository;
pub use partner_repository::PartnerRepository;
pub use property_repository::PropertyRepository;
pub use referral_link_repository::ReferralLinkRepository;
pub use role_reader::RoleReader;
pub use session_terminator::SessionTerminator;
pub use session_validator::SessionValidator;
pub use support_repository::{ReviewRepository, SupportTicketRepository};
