//! Dependency wiring for the HTTP surface.
//!
//! Repositories are constructed once at process start and handed in here;
//! every handler shares the same access guard, notifier and in-flight
//! registry.

use std::sync::Arc;
use std::time::Duration;

use crate::application::handlers::session::AccessGuard;
use crate::application::{InFlightRegistry, Notifier};
use crate::domain::commission::CommissionPolicy;
use crate::ports::{
    AgentRepository, BookingRepository, CommissionRepository, FeatureRequestRepository,
    NotificationRepository, PartnerRepository, PropertyRepository, ReferralLinkRepository,
    ReviewRepository, RoleReader, SessionTerminator, SupportTicketRepository,
};

use super::{
    admin::AdminHandlers, agent::AgentHandlers, partner::PartnerHandlers, public::PublicHandlers,
    session::SessionHandlers,
};

/// One handle per repository port.
#[derive(Clone)]
pub struct Repositories {
    pub roles: Arc<dyn RoleReader>,
    pub partners: Arc<dyn PartnerRepository>,
    pub agents: Arc<dyn AgentRepository>,
    pub links: Arc<dyn ReferralLinkRepository>,
    pub properties: Arc<dyn PropertyRepository>,
    pub feature_requests: Arc<dyn FeatureRequestRepository>,
    pub bookings: Arc<dyn BookingRepository>,
    pub commissions: Arc<dyn CommissionRepository>,
    pub notifications: Arc<dyn NotificationRepository>,
    pub tickets: Arc<dyn SupportTicketRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
}

impl Repositories {
    /// Uses one store for every port, e.g. the in-memory adapter.
    pub fn shared<S>(store: Arc<S>) -> Self
    where
        S: RoleReader
            + PartnerRepository
            + AgentRepository
            + ReferralLinkRepository
            + PropertyRepository
            + FeatureRequestRepository
            + BookingRepository
            + CommissionRepository
            + NotificationRepository
            + SupportTicketRepository
            + ReviewRepository
            + 'static,
    {
        Self {
            roles: store.clone(),
            partners: store.clone(),
            agents: store.clone(),
            links: store.clone(),
            properties: store.clone(),
            feature_requests: store.clone(),
            bookings: store.clone(),
            commissions: store.clone(),
            notifications: store.clone(),
            tickets: store.clone(),
            reviews: store,
        }
    }
}

/// Runtime settings the handlers need.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub commission: CommissionPolicy,
    pub status_poll_interval: Duration,
    pub default_country_code: String,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            commission: CommissionPolicy::default(),
            status_poll_interval: Duration::from_secs(10),
            default_country_code: "91".to_string(),
        }
    }
}

/// Shared building blocks handed to each area when it builds its handlers.
pub struct Workflows {
    pub repos: Repositories,
    pub guard: AccessGuard,
    pub notifier: Notifier,
    pub in_flight: InFlightRegistry,
    pub settings: ServiceSettings,
}

impl Workflows {
    pub fn new(repos: Repositories, settings: ServiceSettings) -> Self {
        let guard = AccessGuard::new(
            repos.roles.clone(),
            repos.partners.clone(),
            repos.agents.clone(),
        );
        let notifier = Notifier::new(repos.notifications.clone());
        Self {
            repos,
            guard,
            notifier,
            in_flight: InFlightRegistry::new(),
            settings,
        }
    }
}

/// Handler bundles for every API area.
#[derive(Clone)]
pub struct AppState {
    pub session: SessionHandlers,
    pub admin: AdminHandlers,
    pub partner: PartnerHandlers,
    pub agent: AgentHandlers,
    pub public: PublicHandlers,
}

impl AppState {
    pub fn new(
        repos: Repositories,
        terminator: Arc<dyn SessionTerminator>,
        settings: ServiceSettings,
    ) -> Self {
        let workflows = Workflows::new(repos, settings);
        Self {
            session: SessionHandlers::new(&workflows, terminator),
            admin: AdminHandlers::new(&workflows),
            partner: PartnerHandlers::new(&workflows),
            agent: AgentHandlers::new(&workflows),
            public: PublicHandlers::new(&workflows),
        }
    }
}
