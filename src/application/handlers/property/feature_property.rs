//! Administrator control of a listing's feature window.
//!
//! - force: window `[now, now + days]`, replacing any current window
//! - extend: end moves out from the current end; requires a current window
//! - clear: removes the window

use std::sync::Arc;

use crate::application::error::WorkflowError;
use crate::application::handlers::session::AccessGuard;
use crate::application::InFlightRegistry;
use crate::domain::foundation::{AuthenticatedUser, PropertyId, Timestamp};
use crate::domain::property::{FeatureWindow, Property};
use crate::domain::session::Administrator;
use crate::ports::PropertyRepository;

#[derive(Debug, Clone, Copy)]
pub struct FeatureCommand {
    pub property_id: PropertyId,
    pub days: u32,
}

/// Shared load-mutate-save cycle for the three feature actions.
#[derive(Clone)]
struct FeatureEditor {
    guard: AccessGuard,
    properties: Arc<dyn PropertyRepository>,
    in_flight: InFlightRegistry,
}

impl FeatureEditor {
    async fn apply<F>(
        &self,
        actor: &AuthenticatedUser,
        property_id: PropertyId,
        action: &'static str,
        edit: F,
    ) -> Result<Property, WorkflowError>
    where
        F: FnOnce(&mut Property, &Administrator, Timestamp) -> Result<(), WorkflowError>,
    {
        let admin = self.guard.require_admin(actor).await?;
        let _token = self.in_flight.acquire("property", property_id)?;

        let mut property = self
            .properties
            .find_by_id(&property_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("Property", property_id))?;
        edit(&mut property, &admin, Timestamp::now())?;
        self.properties.update(&property).await?;

        tracing::info!(
            property_id = %property.id,
            action,
            feature_end = ?property.feature.map(|w| w.end()),
            admin = %admin.user_id(),
            "Property feature changed"
        );
        Ok(property)
    }
}

pub struct ForceFeatureHandler {
    editor: FeatureEditor,
}

impl ForceFeatureHandler {
    pub fn new(
        guard: AccessGuard,
        properties: Arc<dyn PropertyRepository>,
        in_flight: InFlightRegistry,
    ) -> Self {
        Self {
            editor: FeatureEditor {
                guard,
                properties,
                in_flight,
            },
        }
    }

    pub async fn handle(
        &self,
        actor: &AuthenticatedUser,
        cmd: FeatureCommand,
    ) -> Result<Property, WorkflowError> {
        self.editor
            .apply(actor, cmd.property_id, "force", |property, _admin, now| {
                property.feature_for(cmd.days, now)?;
                Ok(())
            })
            .await
    }
}

pub struct ExtendFeatureHandler {
    editor: FeatureEditor,
}

impl ExtendFeatureHandler {
    pub fn new(
        guard: AccessGuard,
        properties: Arc<dyn PropertyRepository>,
        in_flight: InFlightRegistry,
    ) -> Self {
        Self {
            editor: FeatureEditor {
                guard,
                properties,
                in_flight,
            },
        }
    }

    pub async fn handle(
        &self,
        actor: &AuthenticatedUser,
        cmd: FeatureCommand,
    ) -> Result<Property, WorkflowError> {
        self.editor
            .apply(actor, cmd.property_id, "extend", |property, admin, now| {
                let extended: Option<FeatureWindow> =
                    property.extend_feature(cmd.days, admin, now)?;
                extended.map(|_| ()).ok_or_else(|| {
                    WorkflowError::validation("is_featured", "property is not featured")
                })
            })
            .await
    }
}

pub struct ClearFeatureHandler {
    editor: FeatureEditor,
}

impl ClearFeatureHandler {
    pub fn new(
        guard: AccessGuard,
        properties: Arc<dyn PropertyRepository>,
        in_flight: InFlightRegistry,
    ) -> Self {
        Self {
            editor: FeatureEditor {
                guard,
                properties,
                in_flight,
            },
        }
    }

    pub async fn handle(
        &self,
        actor: &AuthenticatedUser,
        property_id: PropertyId,
    ) -> Result<Property, WorkflowError> {
        self.editor
            .apply(actor, property_id, "clear", |property, admin, now| {
                property.clear_feature(admin, now);
                Ok(())
            })
            .await
    }
}
