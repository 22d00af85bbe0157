//! UpdatePropertyHandler - the owning partner edits listing content.
//!
//! Only content fields change here. The active flag and feature window
//! belong to administrators.

use std::sync::Arc;

use crate::application::error::WorkflowError;
use crate::application::handlers::session::AccessGuard;
use crate::application::InFlightRegistry;
use crate::domain::foundation::{check_partner_ownership, AuthenticatedUser, PropertyId, Timestamp};
use crate::domain::property::{Property, PropertyDetails};
use crate::ports::PropertyRepository;

#[derive(Debug, Clone)]
pub struct UpdatePropertyCommand {
    pub property_id: PropertyId,
    pub details: PropertyDetails,
}

pub struct UpdatePropertyHandler {
    guard: AccessGuard,
    properties: Arc<dyn PropertyRepository>,
    in_flight: InFlightRegistry,
}

impl UpdatePropertyHandler {
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
        cmd: UpdatePropertyCommand,
    ) -> Result<Property, WorkflowError> {
        let partner = self.guard.require_active_partner(actor).await?;
        let _token = self.in_flight.acquire("property", cmd.property_id)?;

        let mut property = self
            .properties
            .find_by_id(&cmd.property_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("Property", cmd.property_id))?;

        let authorization = check_partner_ownership(&property, partner.id);
        if !authorization.is_granted() {
            tracing::warn!(
                property_id = %property.id,
                partner_id = %partner.id,
                "Refused edit of another partner's property"
            );
        }
        authorization.into_result()?;

        property.update_details(cmd.details, Timestamp::now())?;
        self.properties.update(&property).await?;
        Ok(property)
    }
}
