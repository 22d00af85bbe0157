//! Read side of listings, filtered through [`Viewer`].

use std::sync::Arc;

use crate::application::error::WorkflowError;
use crate::domain::foundation::{PropertyId, Timestamp};
use crate::domain::property::{Property, Viewer};
use crate::ports::PropertyRepository;

#[derive(Debug, Clone, Copy, Default)]
pub struct ListPropertiesQuery {
    /// Only listings whose feature window covers the current instant.
    pub featured_only: bool,
}

pub struct ListPropertiesHandler {
    properties: Arc<dyn PropertyRepository>,
}

impl ListPropertiesHandler {
    pub fn new(properties: Arc<dyn PropertyRepository>) -> Self {
        Self { properties }
    }

    /// Visible listings, currently featured first, then newest first.
    pub async fn handle(
        &self,
        viewer: Viewer,
        query: ListPropertiesQuery,
    ) -> Result<Vec<Property>, WorkflowError> {
        let candidates = match viewer {
            Viewer::Partner(partner_id) => self.properties.list_by_partner(&partner_id).await?,
            Viewer::Administrator | Viewer::Public => self.properties.list_all().await?,
        };

        let now = Timestamp::now();
        let featured_now = |p: &Property| p.feature.map_or(false, |w| w.covers(&now));

        let mut visible: Vec<Property> = candidates
            .into_iter()
            .filter(|p| viewer.can_see(p))
            .filter(|p| !query.featured_only || featured_now(p))
            .collect();
        visible.sort_by(|a, b| {
            featured_now(b)
                .cmp(&featured_now(a))
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(visible)
    }
}

pub struct GetPropertyHandler {
    properties: Arc<dyn PropertyRepository>,
}

impl GetPropertyHandler {
    pub fn new(properties: Arc<dyn PropertyRepository>) -> Self {
        Self { properties }
    }

    /// A listing the viewer may not see is reported as missing.
    pub async fn handle(&self, viewer: Viewer, id: PropertyId) -> Result<Property, WorkflowError> {
        self.properties
            .find_by_id(&id)
            .await?
            .filter(|p| viewer.can_see(p))
            .ok_or_else(|| WorkflowError::not_found("Property", id))
    }
}
