//! Fixtures shared by handler tests.

use std::sync::Arc;

use crate::adapters::memory::InMemoryStore;
use crate::application::{InFlightRegistry, Notifier};
use crate::domain::account::{
    AccountDecision, AccountStatus, PartnerAccount, PartnerProfile, ReferralAgent,
};
use crate::domain::foundation::{AuthenticatedUser, Money, Timestamp, UserId};
use crate::domain::property::{Property, PropertyDetails};
use crate::domain::session::{Administrator, Role};
use crate::ports::{AgentRepository, PartnerRepository, PropertyRepository, RoleReader};

use super::session::AccessGuard;

pub(crate) struct Harness {
    pub store: Arc<InMemoryStore>,
    pub guard: AccessGuard,
    pub notifier: Notifier,
    pub in_flight: InFlightRegistry,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            guard: AccessGuard::new(store.clone(), store.clone(), store.clone()),
            notifier: Notifier::new(store.clone()),
            in_flight: InFlightRegistry::new(),
            store,
        }
    }

    pub async fn admin(&self, id: &str) -> AuthenticatedUser {
        let user = user(id);
        self.store.assign(&user.id, Role::Administrator).await.unwrap();
        user
    }

    pub async fn partner(&self, id: &str, status: AccountStatus) -> (AuthenticatedUser, PartnerAccount) {
        let user = user(id);
        self.store.assign(&user.id, Role::Partner).await.unwrap();
        let mut account = PartnerAccount::register(user.id.clone(), profile(), Timestamp::now()).unwrap();
        for decision in path_to(status) {
            account.review(*decision, &reviewer(), Timestamp::now()).unwrap();
        }
        PartnerRepository::save(self.store.as_ref(), &account).await.unwrap();
        (user, account)
    }

    pub async fn agent(&self, id: &str, status: AccountStatus) -> (AuthenticatedUser, ReferralAgent) {
        let user = user(id);
        self.store.assign(&user.id, Role::ReferralAgent).await.unwrap();
        let mut agent = ReferralAgent::register(user.id.clone(), "Ravi Agent", None, Timestamp::now()).unwrap();
        for decision in path_to(status) {
            agent.review(*decision, &reviewer(), Timestamp::now()).unwrap();
        }
        AgentRepository::save(self.store.as_ref(), &agent).await.unwrap();
        (user, agent)
    }

    /// An active listing owned by `partner`, 5,000 per night for up to 4 guests.
    pub async fn property(&self, partner: &PartnerAccount) -> Property {
        let property = Property::create(partner.id, details(), Timestamp::now()).unwrap();
        PropertyRepository::save(self.store.as_ref(), &property).await.unwrap();
        property
    }
}

pub(crate) fn user(id: &str) -> AuthenticatedUser {
    AuthenticatedUser::new(
        UserId::new(id).unwrap(),
        format!("{}@example.com", id),
        None,
        format!("token-{}", id),
    )
}

pub(crate) fn reviewer() -> Administrator {
    Administrator::new(UserId::new("reviewer").unwrap())
}

pub(crate) fn profile() -> PartnerProfile {
    PartnerProfile {
        business_name: "Seaside Villas".to_string(),
        location: "Goa".to_string(),
        bio: None,
        show_contact_info: true,
        phone: Some("+91 98765 43210".to_string()),
        whatsapp: None,
    }
}

pub(crate) fn details() -> PropertyDetails {
    PropertyDetails {
        name: "Palm Cottage".to_string(),
        property_type: "cottage".to_string(),
        location: "Goa".to_string(),
        price_per_night: Money::new(5_000),
        units: 1,
        capacity: 4,
        amenities: ["wifi".to_string(), "pool".to_string()].into_iter().collect(),
        images: Vec::new(),
    }
}

fn path_to(status: AccountStatus) -> &'static [AccountDecision] {
    match status {
        AccountStatus::Pending => &[],
        AccountStatus::Active => &[AccountDecision::Approve],
        AccountStatus::Rejected => &[AccountDecision::Reject],
        AccountStatus::Suspended => &[AccountDecision::Approve, AccountDecision::Suspend],
    }
}
