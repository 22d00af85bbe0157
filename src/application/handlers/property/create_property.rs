//! CreatePropertyHandler - an active partner lists a new property.

use std::sync::Arc;

use crate::application::error::WorkflowError;
use crate::application::handlers::session::AccessGuard;
use crate::application::InFlightRegistry;
use crate::domain::foundation::{AuthenticatedUser, Timestamp};
use crate::domain::property::{Property, PropertyDetails};
use crate::ports::PropertyRepository;

pub struct CreatePropertyHandler {
    guard: AccessGuard,
    properties: Arc<dyn PropertyRepository>,
    in_flight: InFlightRegistry,
}

impl CreatePropertyHandler {
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
        details: PropertyDetails,
    ) -> Result<Property, WorkflowError> {
        let partner = self.guard.require_active_partner(actor).await?;
        let _token = self.in_flight.acquire("property.create", partner.id)?;

        let property = Property::create(partner.id, details, Timestamp::now())?;
        self.properties.save(&property).await?;

        tracing::info!(
            property_id = %property.id,
            partner_id = %partner.id,
            "Property listed"
        );
        Ok(property)
    }
}
