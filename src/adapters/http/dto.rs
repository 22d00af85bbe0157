//! Request and response bodies shared by the API areas.
//!
//! Domain entities serialize as-is; these types cover request shapes and the
//! few responses that add something to an entity.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::account::{AccountDecision, PartnerProfile};
use crate::domain::booking::{BookingResponse, GuestContact};
use crate::domain::commission::CommissionStatus;
use crate::domain::foundation::{Money, PropertyId};
use crate::domain::property::{Property, PropertyDetails};
use crate::domain::support::{ReviewStatus, TicketStatus};

use super::error::ApiError;

// ════════════════════════════════════════════════════════════════════════════
// Requests
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Deserialize)]
pub struct PartnerProfileRequest {
    pub business_name: String,
    pub location: String,
    pub bio: Option<String>,
    #[serde(default)]
    pub show_contact_info: bool,
    pub phone: Option<String>,
    pub whatsapp: Option<String>,
}

impl From<PartnerProfileRequest> for PartnerProfile {
    fn from(req: PartnerProfileRequest) -> Self {
        PartnerProfile {
            business_name: req.business_name,
            location: req.location,
            bio: req.bio,
            show_contact_info: req.show_contact_info,
            phone: req.phone,
            whatsapp: req.whatsapp,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterPartnerRequest {
    #[serde(flatten)]
    pub profile: PartnerProfileRequest,
    pub referral_code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterAgentRequest {
    pub full_name: String,
    pub payout_details: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayoutDetailsRequest {
    pub payout_details: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PropertyRequest {
    pub name: String,
    pub property_type: String,
    pub location: String,
    pub price_per_night: i64,
    pub units: u32,
    pub capacity: u32,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

impl From<PropertyRequest> for PropertyDetails {
    fn from(req: PropertyRequest) -> Self {
        PropertyDetails {
            name: req.name,
            property_type: req.property_type,
            location: req.location,
            price_per_night: Money::new(req.price_per_night),
            units: req.units,
            capacity: req.capacity,
            amenities: req.amenities.into_iter().collect(),
            images: req.images,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureRequestRequest {
    pub property_id: PropertyId,
    pub duration_days: u32,
    pub payment_method: String,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub property_id: PropertyId,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: Option<String>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests: u32,
}

impl BookingRequest {
    pub fn guest(&self) -> GuestContact {
        GuestContact {
            name: self.guest_name.clone(),
            email: self.guest_email.clone(),
            phone: self.guest_phone.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRequest {
    pub guest_name: String,
    pub rating: u8,
    pub comment: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TicketRequest {
    pub subject: String,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DaysRequest {
    pub days: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ActiveRequest {
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecisionRequest {
    pub decision: AccountDecision,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BookingResponseRequest {
    pub response: BookingResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommissionStatusRequest {
    pub status: CommissionStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TicketUpdateRequest {
    pub status: TicketStatus,
    pub response: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModerationRequest {
    pub status: ReviewStatus,
}

/// `?status=` filter shared by every list endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusFilter {
    pub status: Option<String>,
}

impl StatusFilter {
    /// Parses the filter with the entity's own status parser.
    pub fn parse<T>(&self, parse: impl Fn(&str) -> Option<T>) -> Result<Option<T>, ApiError> {
        match self.status.as_deref().map(str::trim) {
            None | Some("") | Some("all") => Ok(None),
            Some(raw) => parse(raw)
                .map(Some)
                .ok_or_else(|| ApiError::bad_request(format!("Unknown status '{}'", raw))),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotificationFilter {
    #[serde(default)]
    pub unread_only: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingFilter {
    #[serde(default)]
    pub featured_only: bool,
}

/// Parses a path segment into a typed id.
pub fn parse_id<T: FromStr>(raw: &str, entity: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid {} id", entity)))
}

// ════════════════════════════════════════════════════════════════════════════
// Responses
// ════════════════════════════════════════════════════════════════════════════

/// A workflow result plus the text of a notification that could not be sent.
#[derive(Debug, Clone, Serialize)]
pub struct WithNotice<T> {
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_error: Option<String>,
}

impl<T> WithNotice<T> {
    pub fn new(data: T, notification_error: Option<String>) -> Self {
        Self {
            data,
            notification_error,
        }
    }
}

/// How a guest can reach the host, present only when the host opted in.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HostContact {
    pub business_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub whatsapp: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublicPropertyResponse {
    #[serde(flatten)]
    pub property: Property,
    pub is_featured: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<HostContact>,
}
