//! SetPropertyActiveHandler - administrator activates or deactivates a listing.

use std::sync::Arc;

use crate::application::error::WorkflowError;
use crate::application::handlers::session::AccessGuard;
use crate::application::InFlightRegistry;
use crate::domain::foundation::{AuthenticatedUser, PropertyId, Timestamp};
use crate::domain::property::Property;
use crate::ports::PropertyRepository;

#[derive(Debug, Clone, Copy)]
pub struct SetPropertyActiveCommand {
    pub property_id: PropertyId,
    pub active: bool,
}

pub struct SetPropertyActiveHandler {
    guard: AccessGuard,
    properties: Arc<dyn PropertyRepository>,
    in_flight: InFlightRegistry,
}

impl SetPropertyActiveHandler {
    pub fn new(
        guard: AccessGuard,
        properties: Arc<dyn PropertyRepository>,
        in_flight: InFlightRegistry,
    ) -> Self {
        Self {
            guard,
            properties,
            in_flight,
        }
    }

    pub async fn handle(
        &self,
        actor: &AuthenticatedUser,
        cmd: SetPropertyActiveCommand,
    ) -> Result<Property, WorkflowError> {
        let admin = self.guard.require_admin(actor).await?;
        let _token = self.in_flight.acquire("property", cmd.property_id)?;

        let mut property = self
            .properties
            .find_by_id(&cmd.property_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("Property", cmd.property_id))?;
        property.set_active(cmd.active, &admin, Timestamp::now());
        self.properties.update(&property).await?;

        tracing::info!(
            property_id = %property.id,
            active = cmd.active,
            admin = %admin.user_id(),
            "Property visibility changed"
        );
        Ok(property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::Harness;
    use crate::domain::account::AccountStatus;

    #[tokio::test]
    async fn admin_deactivates_listing() {
        let h = Harness::new();
        let admin = h.admin("boss").await;
        let (_, partner) = h.partner("p1", AccountStatus::Active).await;
        let property = h.property(&partner).await;
        let handler =
            SetPropertyActiveHandler::new(h.guard.clone(), h.store.clone(), h.in_flight.clone());

        let updated = handler
            .handle(
                &admin,
                SetPropertyActiveCommand {
                    property_id: property.id,
                    active: false,
                },
            )
            .await
            .unwrap();
        assert!(!updated.is_active);
    }

    #[tokio::test]
    async fn owner_cannot_toggle_active_flag() {
        let h = Harness::new();
        let (u, partner) = h.partner("p1", AccountStatus::Active).await;
        let property = h.property(&partner).await;
        let handler =
            SetPropertyActiveHandler::new(h.guard.clone(), h.store.clone(), h.in_flight.clone());

        let err = handler
            .handle(
                &u,
                SetPropertyActiveCommand {
                    property_id: property.id,
                    active: false,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Forbidden(_)));
    }
}
