//! Property listing aggregate.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::FeatureWindow;
use crate::domain::foundation::{
    require_text, Authorizable, Money, OwnedByPartner, PartnerId, PropertyId, Timestamp,
    ValidationError,
};
use crate::domain::session::Administrator;

/// Partner-editable listing content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDetails {
    pub name: String,
    pub property_type: String,
    pub location: String,
    pub price_per_night: Money,
    pub units: u32,
    pub capacity: u32,
    #[serde(default)]
    pub amenities: BTreeSet<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl PropertyDetails {
    pub fn validated(self) -> Result<Self, ValidationError> {
        if self.price_per_night.amount() <= 0 {
            return Err(ValidationError::out_of_range(
                "price_per_night",
                1,
                i64::MAX,
                self.price_per_night.amount(),
            ));
        }
        if self.units == 0 {
            return Err(ValidationError::out_of_range("units", 1, i64::from(u32::MAX), 0));
        }
        if self.capacity == 0 {
            return Err(ValidationError::out_of_range("capacity", 1, i64::from(u32::MAX), 0));
        }
        Ok(Self {
            name: require_text("name", &self.name)?,
            property_type: require_text("property_type", &self.property_type)?,
            location: require_text("location", &self.location)?,
            amenities: self
                .amenities
                .into_iter()
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect(),
            ..self
        })
    }
}

/// A lodging listed by a partner.
///
/// # Invariants
///
/// - owned by exactly one partner, never reassigned
/// - `is_featured()` iff `feature` is set, and the window satisfies `end > start`
/// - `is_active` and `feature` change only through administrator methods or an
///   approved feature request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub partner_id: PartnerId,
    pub details: PropertyDetails,
    pub is_active: bool,
    pub feature: Option<FeatureWindow>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Property {
    /// New listings go live immediately; an administrator may deactivate them.
    pub fn create(
        partner_id: PartnerId,
        details: PropertyDetails,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            id: PropertyId::new(),
            partner_id,
            details: details.validated()?,
            is_active: true,
            feature: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_featured(&self) -> bool {
        self.feature.is_some()
    }

    pub fn update_details(
        &mut self,
        details: PropertyDetails,
        now: Timestamp,
    ) -> Result<(), ValidationError> {
        self.details = details.validated()?;
        self.updated_at = now;
        Ok(())
    }

    pub fn set_active(&mut self, active: bool, _admin: &Administrator, now: Timestamp) {
        self.is_active = active;
        self.updated_at = now;
    }

    /// Starts a promotion `[now, now + days]`, replacing any current one.
    pub fn feature_for(&mut self, days: u32, now: Timestamp) -> Result<FeatureWindow, ValidationError> {
        let window = FeatureWindow::starting_at(now, days)?;
        self.feature = Some(window);
        self.updated_at = now;
        Ok(window)
    }

    /// Pushes the current promotion's end out by `days`.
    ///
    /// Returns `Ok(None)` when the property is not featured; extension has no
    /// meaning without an existing window.
    pub fn extend_feature(
        &mut self,
        days: u32,
        _admin: &Administrator,
        now: Timestamp,
    ) -> Result<Option<FeatureWindow>, ValidationError> {
        let Some(current) = self.feature else {
            return Ok(None);
        };
        let extended = current.extended_by(days)?;
        self.feature = Some(extended);
        self.updated_at = now;
        Ok(Some(extended))
    }

    pub fn clear_feature(&mut self, _admin: &Administrator, now: Timestamp) {
        self.feature = None;
        self.updated_at = now;
    }

    /// Rejects parties that exceed the listing's capacity.
    pub fn check_guests(&self, guests: u32) -> Result<(), ValidationError> {
        if guests == 0 || guests > self.details.capacity {
            return Err(ValidationError::out_of_range(
                "guests",
                1,
                i64::from(self.details.capacity),
                i64::from(guests),
            ));
        }
        Ok(())
    }
}

impl OwnedByPartner for Property {
    fn owner_partner_id(&self) -> PartnerId {
        self.partner_id
    }
}

impl Authorizable for Property {
    const RESOURCE_TYPE: &'static str = "Property";

    fn resource_id(&self) -> String {
        self.id.to_string()
    }
}
