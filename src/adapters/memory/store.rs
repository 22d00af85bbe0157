//! Single in-memory store implementing every repository port.
//!
//! Uniqueness rules match the PostgreSQL schema: one partner and one agent
//! account per principal, unique referral codes, one referral link per
//! partner, one commission per booking. Individual operations can be made to
//! fail with [`InMemoryStore::fail_on`] to exercise error paths.

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::account::{
    AccountStatus, PartnerAccount, ReferralAgent, ReferralCode, ReferralLink,
};
use crate::domain::booking::Booking;
use crate::domain::commission::CommissionRecord;
use crate::domain::feature_request::{FeatureRequest, FeatureRequestStatus};
use crate::domain::foundation::{
    AgentId, BookingId, CommissionId, DomainError, ErrorCode, FeatureRequestId, NotificationId,
    PartnerId, PropertyId, ReviewId, SupportTicketId, UserId,
};
use crate::domain::notification::{Notification, Recipient};
use crate::domain::property::Property;
use crate::domain::session::Role;
use crate::domain::support::{Review, SupportTicket};
use crate::ports::{
    AgentRepository, BookingRepository, CommissionRepository, FeatureRequestRepository,
    NotificationRepository, PartnerRepository, PropertyRepository, ReferralLinkRepository,
    ReviewRepository, RoleReader, SupportTicketRepository,
};

#[derive(Default)]
pub struct InMemoryStore {
    roles: RwLock<HashMap<UserId, Vec<Role>>>,
    partners: RwLock<HashMap<PartnerId, PartnerAccount>>,
    agents: RwLock<HashMap<AgentId, ReferralAgent>>,
    links: RwLock<Vec<ReferralLink>>,
    properties: RwLock<HashMap<PropertyId, Property>>,
    feature_requests: RwLock<HashMap<FeatureRequestId, FeatureRequest>>,
    bookings: RwLock<HashMap<BookingId, Booking>>,
    commissions: RwLock<HashMap<CommissionId, CommissionRecord>>,
    notifications: RwLock<HashMap<NotificationId, Notification>>,
    tickets: RwLock<HashMap<SupportTicketId, SupportTicket>>,
    reviews: RwLock<HashMap<ReviewId, Review>>,
    failing: RwLock<HashSet<&'static str>>,
}

fn read<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, DomainError> {
    lock.read()
        .map_err(|_| DomainError::new(ErrorCode::InternalError, "in-memory store lock poisoned"))
}

fn write<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, DomainError> {
    lock.write()
        .map_err(|_| DomainError::new(ErrorCode::InternalError, "in-memory store lock poisoned"))
}

fn newest_first<T, K: Ord>(mut items: Vec<T>, key: impl Fn(&T) -> K) -> Vec<T> {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
    items
}

fn missing(entity: &str, id: impl std::fmt::Display) -> DomainError {
    DomainError::new(ErrorCode::NotFound, format!("{} {} not found", entity, id))
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every call of operation `op` (e.g. `"property.update"`) fail with
    /// a database error until [`InMemoryStore::clear_failures`] is called.
    pub fn fail_on(&self, op: &'static str) {
        if let Ok(mut failing) = self.failing.write() {
            failing.insert(op);
        }
    }

    pub fn clear_failures(&self) {
        if let Ok(mut failing) = self.failing.write() {
            failing.clear();
        }
    }

    fn check(&self, op: &'static str) -> Result<(), DomainError> {
        if read(&self.failing)?.contains(op) {
            return Err(DomainError::database(format!("simulated failure in {}", op)));
        }
        Ok(())
    }

    /// Number of notifications addressed to `recipient`.
    pub fn notification_count(&self, recipient: &Recipient) -> usize {
        self.notifications
            .read()
            .map(|n| n.values().filter(|n| &n.recipient == recipient).count())
            .unwrap_or(0)
    }
}

#[async_trait]
impl RoleReader for InMemoryStore {
    async fn roles_for(&self, user_id: &UserId) -> Result<Vec<Role>, DomainError> {
        self.check("roles.read")?;
        Ok(read(&self.roles)?.get(user_id).cloned().unwrap_or_default())
    }

    async fn assign(&self, user_id: &UserId, role: Role) -> Result<(), DomainError> {
        self.check("roles.assign")?;
        let mut roles = write(&self.roles)?;
        let held = roles.entry(user_id.clone()).or_default();
        if !held.contains(&role) {
            held.push(role);
        }
        Ok(())
    }
}

#[async_trait]
impl PartnerRepository for InMemoryStore {
    async fn save(&self, partner: &PartnerAccount) -> Result<(), DomainError> {
        self.check("partner.save")?;
        let mut partners = write(&self.partners)?;
        if partners.values().any(|p| p.user_id == partner.user_id) {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                "Principal already has a partner account",
            ));
        }
        partners.insert(partner.id, partner.clone());
        Ok(())
    }

    async fn update(&self, partner: &PartnerAccount) -> Result<(), DomainError> {
        self.check("partner.update")?;
        let mut partners = write(&self.partners)?;
        match partners.get_mut(&partner.id) {
            Some(slot) => {
                *slot = partner.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::AccountNotFound,
                format!("Partner {} not found", partner.id),
            )),
        }
    }

    async fn find_by_id(&self, id: &PartnerId) -> Result<Option<PartnerAccount>, DomainError> {
        self.check("partner.read")?;
        Ok(read(&self.partners)?.get(id).cloned())
    }

    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<PartnerAccount>, DomainError> {
        self.check("partner.read")?;
        Ok(read(&self.partners)?
            .values()
            .find(|p| &p.user_id == user_id)
            .cloned())
    }

    async fn list(
        &self,
        status: Option<AccountStatus>,
    ) -> Result<Vec<PartnerAccount>, DomainError> {
        self.check("partner.read")?;
        let items = read(&self.partners)?
            .values()
            .filter(|p| status.map_or(true, |s| p.status == s))
            .cloned()
            .collect();
        Ok(newest_first(items, |p: &PartnerAccount| p.created_at))
    }
}

#[async_trait]
impl AgentRepository for InMemoryStore {
    async fn save(&self, agent: &ReferralAgent) -> Result<(), DomainError> {
        self.check("agent.save")?;
        let mut agents = write(&self.agents)?;
        if agents
            .values()
            .any(|a| a.user_id == agent.user_id || a.referral_code == agent.referral_code)
        {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                "Principal already has an agent account or the referral code is taken",
            ));
        }
        agents.insert(agent.id, agent.clone());
        Ok(())
    }

    async fn update(&self, agent: &ReferralAgent) -> Result<(), DomainError> {
        self.check("agent.update")?;
        let mut agents = write(&self.agents)?;
        match agents.get_mut(&agent.id) {
            Some(slot) => {
                *slot = agent.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::AccountNotFound,
                format!("Agent {} not found", agent.id),
            )),
        }
    }

    async fn find_by_id(&self, id: &AgentId) -> Result<Option<ReferralAgent>, DomainError> {
        self.check("agent.read")?;
        Ok(read(&self.agents)?.get(id).cloned())
    }

    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<ReferralAgent>, DomainError> {
        self.check("agent.read")?;
        Ok(read(&self.agents)?
            .values()
            .find(|a| &a.user_id == user_id)
            .cloned())
    }

    async fn find_by_referral_code(
        &self,
        code: &ReferralCode,
    ) -> Result<Option<ReferralAgent>, DomainError> {
        self.check("agent.read")?;
        Ok(read(&self.agents)?
            .values()
            .find(|a| &a.referral_code == code)
            .cloned())
    }

    async fn list(&self, status: Option<AccountStatus>) -> Result<Vec<ReferralAgent>, DomainError> {
        self.check("agent.read")?;
        let items = read(&self.agents)?
            .values()
            .filter(|a| status.map_or(true, |s| a.status == s))
            .cloned()
            .collect();
        Ok(newest_first(items, |a: &ReferralAgent| a.created_at))
    }
}

#[async_trait]
impl ReferralLinkRepository for InMemoryStore {
    async fn save(&self, link: &ReferralLink) -> Result<(), DomainError> {
        self.check("referral_link.save")?;
        let mut links = write(&self.links)?;
        if links.iter().any(|l| l.partner_id == link.partner_id) {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                "Partner already has a referral link",
            ));
        }
        links.push(link.clone());
        Ok(())
    }

    async fn find_by_partner(
        &self,
        partner_id: &PartnerId,
    ) -> Result<Option<ReferralLink>, DomainError> {
        self.check("referral_link.read")?;
        Ok(read(&self.links)?
            .iter()
            .find(|l| &l.partner_id == partner_id)
            .cloned())
    }

    async fn list_by_agent(&self, agent_id: &AgentId) -> Result<Vec<ReferralLink>, DomainError> {
        self.check("referral_link.read")?;
        Ok(read(&self.links)?
            .iter()
            .filter(|l| &l.agent_id == agent_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PropertyRepository for InMemoryStore {
    async fn save(&self, property: &Property) -> Result<(), DomainError> {
        self.check("property.save")?;
        write(&self.properties)?.insert(property.id, property.clone());
        Ok(())
    }

    async fn update(&self, property: &Property) -> Result<(), DomainError> {
        self.check("property.update")?;
        let mut properties = write(&self.properties)?;
        match properties.get_mut(&property.id) {
            Some(slot) => {
                *slot = property.clone();
                Ok(())
            }
            None => Err(missing("Property", property.id)),
        }
    }

    async fn find_by_id(&self, id: &PropertyId) -> Result<Option<Property>, DomainError> {
        self.check("property.read")?;
        Ok(read(&self.properties)?.get(id).cloned())
    }

    async fn list_by_partner(&self, partner_id: &PartnerId) -> Result<Vec<Property>, DomainError> {
        self.check("property.read")?;
        let items = read(&self.properties)?
            .values()
            .filter(|p| &p.partner_id == partner_id)
            .cloned()
            .collect();
        Ok(newest_first(items, |p: &Property| p.created_at))
    }

    async fn list_all(&self) -> Result<Vec<Property>, DomainError> {
        self.check("property.read")?;
        let items = read(&self.properties)?.values().cloned().collect();
        Ok(newest_first(items, |p: &Property| p.created_at))
    }
}

#[async_trait]
impl FeatureRequestRepository for InMemoryStore {
    async fn save(&self, request: &FeatureRequest) -> Result<(), DomainError> {
        self.check("feature_request.save")?;
        write(&self.feature_requests)?.insert(request.id, request.clone());
        Ok(())
    }

    async fn update(&self, request: &FeatureRequest) -> Result<(), DomainError> {
        self.check("feature_request.update")?;
        let mut requests = write(&self.feature_requests)?;
        match requests.get_mut(&request.id) {
            Some(slot) => {
                *slot = request.clone();
                Ok(())
            }
            None => Err(missing("Feature request", request.id)),
        }
    }

    async fn find_by_id(
        &self,
        id: &FeatureRequestId,
    ) -> Result<Option<FeatureRequest>, DomainError> {
        self.check("feature_request.read")?;
        Ok(read(&self.feature_requests)?.get(id).cloned())
    }

    async fn list_by_partner(
        &self,
        partner_id: &PartnerId,
    ) -> Result<Vec<FeatureRequest>, DomainError> {
        self.check("feature_request.read")?;
        let items = read(&self.feature_requests)?
            .values()
            .filter(|r| &r.partner_id == partner_id)
            .cloned()
            .collect();
        Ok(newest_first(items, |r: &FeatureRequest| r.created_at))
    }

    async fn list(
        &self,
        status: Option<FeatureRequestStatus>,
    ) -> Result<Vec<FeatureRequest>, DomainError> {
        self.check("feature_request.read")?;
        let items = read(&self.feature_requests)?
            .values()
            .filter(|r| status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        Ok(newest_first(items, |r: &FeatureRequest| r.created_at))
    }
}

#[async_trait]
impl BookingRepository for InMemoryStore {
    async fn save(&self, booking: &Booking) -> Result<(), DomainError> {
        self.check("booking.save")?;
        write(&self.bookings)?.insert(booking.id, booking.clone());
        Ok(())
    }

    async fn update(&self, booking: &Booking) -> Result<(), DomainError> {
        self.check("booking.update")?;
        let mut bookings = write(&self.bookings)?;
        match bookings.get_mut(&booking.id) {
            Some(slot) => {
                *slot = booking.clone();
                Ok(())
            }
            None => Err(missing("Booking", booking.id)),
        }
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
        self.check("booking.read")?;
        Ok(read(&self.bookings)?.get(id).cloned())
    }

    async fn list_by_partner(&self, partner_id: &PartnerId) -> Result<Vec<Booking>, DomainError> {
        self.check("booking.read")?;
        let items = read(&self.bookings)?
            .values()
            .filter(|b| &b.partner_id == partner_id)
            .cloned()
            .collect();
        Ok(newest_first(items, |b: &Booking| b.created_at))
    }

    async fn list_all(&self) -> Result<Vec<Booking>, DomainError> {
        self.check("booking.read")?;
        let items = read(&self.bookings)?.values().cloned().collect();
        Ok(newest_first(items, |b: &Booking| b.created_at))
    }
}

#[async_trait]
impl CommissionRepository for InMemoryStore {
    async fn save(&self, record: &CommissionRecord) -> Result<(), DomainError> {
        self.check("commission.save")?;
        let mut commissions = write(&self.commissions)?;
        if commissions.values().any(|c| c.booking_id == record.booking_id) {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                format!("Booking {} already has a commission", record.booking_id),
            ));
        }
        commissions.insert(record.id, record.clone());
        Ok(())
    }

    async fn update(&self, record: &CommissionRecord) -> Result<(), DomainError> {
        self.check("commission.update")?;
        let mut commissions = write(&self.commissions)?;
        match commissions.get_mut(&record.id) {
            Some(slot) => {
                *slot = record.clone();
                Ok(())
            }
            None => Err(missing("Commission", record.id)),
        }
    }

    async fn find_by_id(&self, id: &CommissionId) -> Result<Option<CommissionRecord>, DomainError> {
        self.check("commission.read")?;
        Ok(read(&self.commissions)?.get(id).cloned())
    }

    async fn find_by_booking(
        &self,
        booking_id: &BookingId,
    ) -> Result<Option<CommissionRecord>, DomainError> {
        self.check("commission.read")?;
        Ok(read(&self.commissions)?
            .values()
            .find(|c| &c.booking_id == booking_id)
            .cloned())
    }

    async fn list_by_agent(
        &self,
        agent_id: &AgentId,
    ) -> Result<Vec<CommissionRecord>, DomainError> {
        self.check("commission.read")?;
        let items = read(&self.commissions)?
            .values()
            .filter(|c| &c.agent_id == agent_id)
            .cloned()
            .collect();
        Ok(newest_first(items, |c: &CommissionRecord| c.created_at))
    }

    async fn list_all(&self) -> Result<Vec<CommissionRecord>, DomainError> {
        self.check("commission.read")?;
        let items = read(&self.commissions)?.values().cloned().collect();
        Ok(newest_first(items, |c: &CommissionRecord| c.created_at))
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn save(&self, notification: &Notification) -> Result<(), DomainError> {
        self.check("notification.save")?;
        write(&self.notifications)?.insert(notification.id, notification.clone());
        Ok(())
    }

    async fn update(&self, notification: &Notification) -> Result<(), DomainError> {
        self.check("notification.update")?;
        let mut notifications = write(&self.notifications)?;
        match notifications.get_mut(&notification.id) {
            Some(slot) => {
                *slot = notification.clone();
                Ok(())
            }
            None => Err(missing("Notification", notification.id)),
        }
    }

    async fn find_by_id(&self, id: &NotificationId) -> Result<Option<Notification>, DomainError> {
        self.check("notification.read")?;
        Ok(read(&self.notifications)?.get(id).cloned())
    }

    async fn list_for(&self, recipient: &Recipient) -> Result<Vec<Notification>, DomainError> {
        self.check("notification.read")?;
        let items = read(&self.notifications)?
            .values()
            .filter(|n| &n.recipient == recipient)
            .cloned()
            .collect();
        Ok(newest_first(items, |n: &Notification| n.created_at))
    }
}

#[async_trait]
impl SupportTicketRepository for InMemoryStore {
    async fn save(&self, ticket: &SupportTicket) -> Result<(), DomainError> {
        self.check("ticket.save")?;
        write(&self.tickets)?.insert(ticket.id, ticket.clone());
        Ok(())
    }

    async fn update(&self, ticket: &SupportTicket) -> Result<(), DomainError> {
        self.check("ticket.update")?;
        let mut tickets = write(&self.tickets)?;
        match tickets.get_mut(&ticket.id) {
            Some(slot) => {
                *slot = ticket.clone();
                Ok(())
            }
            None => Err(missing("Support ticket", ticket.id)),
        }
    }

    async fn find_by_id(&self, id: &SupportTicketId) -> Result<Option<SupportTicket>, DomainError> {
        self.check("ticket.read")?;
        Ok(read(&self.tickets)?.get(id).cloned())
    }

    async fn list_for(&self, requester: &Recipient) -> Result<Vec<SupportTicket>, DomainError> {
        self.check("ticket.read")?;
        let items = read(&self.tickets)?
            .values()
            .filter(|t| &t.requester == requester)
            .cloned()
            .collect();
        Ok(newest_first(items, |t: &SupportTicket| t.created_at))
    }

    async fn list_all(&self) -> Result<Vec<SupportTicket>, DomainError> {
        self.check("ticket.read")?;
        let items = read(&self.tickets)?.values().cloned().collect();
        Ok(newest_first(items, |t: &SupportTicket| t.created_at))
    }
}

#[async_trait]
impl ReviewRepository for InMemoryStore {
    async fn save(&self, review: &Review) -> Result<(), DomainError> {
        self.check("review.save")?;
        write(&self.reviews)?.insert(review.id, review.clone());
        Ok(())
    }

    async fn update(&self, review: &Review) -> Result<(), DomainError> {
        self.check("review.update")?;
        let mut reviews = write(&self.reviews)?;
        match reviews.get_mut(&review.id) {
            Some(slot) => {
                *slot = review.clone();
                Ok(())
            }
            None => Err(missing("Review", review.id)),
        }
    }

    async fn find_by_id(&self, id: &ReviewId) -> Result<Option<Review>, DomainError> {
        self.check("review.read")?;
        Ok(read(&self.reviews)?.get(id).cloned())
    }

    async fn list_by_property(&self, property_id: &PropertyId) -> Result<Vec<Review>, DomainError> {
        self.check("review.read")?;
        let items = read(&self.reviews)?
            .values()
            .filter(|r| &r.property_id == property_id)
            .cloned()
            .collect();
        Ok(newest_first(items, |r: &Review| r.created_at))
    }

    async fn list_all(&self) -> Result<Vec<Review>, DomainError> {
        self.check("review.read")?;
        let items = read(&self.reviews)?.values().cloned().collect();
        Ok(newest_first(items, |r: &Review| r.created_at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::PartnerProfile;
    use crate::domain::foundation::Timestamp;

    fn partner(user: &str) -> PartnerAccount {
        PartnerAccount::register(
            UserId::new(user).unwrap(),
            PartnerProfile {
                business_name: "Biz".to_string(),
                location: "Town".to_string(),
                bio: None,
                show_contact_info: false,
                phone: None,
                whatsapp: None,
            },
            Timestamp::now(),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn second_partner_for_same_principal_conflicts() {
        let store = InMemoryStore::new();
        PartnerRepository::save(&store, &partner("u-1")).await.unwrap();
        let err = PartnerRepository::save(&store, &partner("u-1"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn update_of_unknown_partner_is_not_found() {
        let store = InMemoryStore::new();
        let err = PartnerRepository::update(&store, &partner("u-1"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::AccountNotFound);
    }

    #[tokio::test]
    async fn roles_assign_is_idempotent() {
        let store = InMemoryStore::new();
        let user = UserId::new("u-1").unwrap();
        store.assign(&user, Role::Partner).await.unwrap();
        store.assign(&user, Role::Partner).await.unwrap();
        assert_eq!(store.roles_for(&user).await.unwrap(), vec![Role::Partner]);
    }

    #[tokio::test]
    async fn injected_failure_applies_until_cleared() {
        let store = InMemoryStore::new();
        store.fail_on("roles.read");
        let user = UserId::new("u-1").unwrap();
        let err = store.roles_for(&user).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        store.clear_failures();
        assert!(store.roles_for(&user).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_filters_by_status() {
        let store = InMemoryStore::new();
        PartnerRepository::save(&store, &partner("u-1")).await.unwrap();
        assert_eq!(
            PartnerRepository::list(&store, Some(AccountStatus::Pending))
                .await
                .unwrap()
                .len(),
            1
        );
        assert!(PartnerRepository::list(&store, Some(AccountStatus::Active))
            .await
            .unwrap()
            .is_empty());
    }
}
