//! HTTP adapter for guest-facing endpoints. No authentication required.
//!
//! - `GET /api/public/properties?featured_only=` - Active listings
//! - `GET /api/public/properties/:id` - One listing with host contact links
//! - `GET /api/public/properties/:id/reviews` - Published reviews
//! - `POST /api/public/properties/:id/reviews` - Leave a review for moderation
//! - `POST /api/public/bookings` - Request a stay

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use crate::adapters::http::dto::{
    parse_id, BookingRequest, HostContact, ListingFilter, PublicPropertyResponse, ReviewRequest,
};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::Workflows;
use crate::application::handlers::booking::{CreateBookingCommand, CreateBookingHandler};
use crate::application::handlers::property::{
    GetPropertyHandler, ListPropertiesHandler, ListPropertiesQuery,
};
use crate::application::handlers::support::{
    ListReviewsHandler, SubmitReviewCommand, SubmitReviewHandler,
};
use crate::domain::account::PartnerAccount;
use crate::domain::contact;
use crate::domain::property::{Property, Viewer};
use crate::ports::PartnerRepository;

#[derive(Clone)]
pub struct PublicHandlers {
    list_properties: Arc<ListPropertiesHandler>,
    get_property: Arc<GetPropertyHandler>,
    create_booking: Arc<CreateBookingHandler>,
    submit_review: Arc<SubmitReviewHandler>,
    reviews: Arc<ListReviewsHandler>,
    partners: Arc<dyn PartnerRepository>,
    country_code: Arc<str>,
}

impl PublicHandlers {
    pub fn new(w: &Workflows) -> Self {
        let r = &w.repos;
        Self {
            list_properties: Arc::new(ListPropertiesHandler::new(r.properties.clone())),
            get_property: Arc::new(GetPropertyHandler::new(r.properties.clone())),
            create_booking: Arc::new(CreateBookingHandler::new(
                r.properties.clone(),
                r.bookings.clone(),
                w.notifier.clone(),
                w.in_flight.clone(),
            )),
            submit_review: Arc::new(SubmitReviewHandler::new(
                r.properties.clone(),
                r.reviews.clone(),
            )),
            reviews: Arc::new(ListReviewsHandler::new(w.guard.clone(), r.reviews.clone())),
            partners: r.partners.clone(),
            country_code: Arc::from(w.settings.default_country_code.as_str()),
        }
    }

    /// Contact links for the listing's host, when the host opted in.
    ///
    /// A host lookup failure degrades to no contact block rather than failing
    /// the page.
    async fn host_contact(&self, property: &Property) -> Option<HostContact> {
        let partner = match self.partners.find_by_id(&property.partner_id).await {
            Ok(found) => found?,
            Err(e) => {
                tracing::warn!(property_id = %property.id, error = %e, "Host lookup failed");
                return None;
            }
        };
        if !partner.profile.show_contact_info {
            return None;
        }
        Some(host_links(&partner, property, &self.country_code))
    }
}

fn host_links(partner: &PartnerAccount, property: &Property, country_code: &str) -> HostContact {
    let greeting = format!("Hi, I'm interested in {}", property.details.name);
    let tel = partner
        .profile
        .phone
        .as_deref()
        .and_then(|raw| contact::tel_link(raw, country_code).ok());
    let whatsapp = partner
        .profile
        .whatsapp
        .as_deref()
        .or(partner.profile.phone.as_deref())
        .and_then(|raw| contact::whatsapp_link(raw, country_code, &greeting).ok());
    HostContact {
        business_name: partner.profile.business_name.clone(),
        tel,
        whatsapp,
    }
}

pub fn public_routes(handlers: PublicHandlers) -> Router {
    Router::new()
        .route("/properties", get(list_properties))
        .route("/properties/:id", get(get_property))
        .route("/properties/:id/reviews", get(list_reviews).post(submit_review))
        .route("/bookings", post(create_booking))
        .with_state(handlers)
}

async fn list_properties(
    State(h): State<PublicHandlers>,
    Query(filter): Query<ListingFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let query = ListPropertiesQuery {
        featured_only: filter.featured_only,
    };
    let listed: Vec<PublicPropertyResponse> = h
        .list_properties
        .handle(Viewer::Public, query)
        .await?
        .into_iter()
        .map(|property| PublicPropertyResponse {
            is_featured: property.is_featured(),
            property,
            host: None,
        })
        .collect();
    Ok(Json(listed))
}

async fn get_property(
    State(h): State<PublicHandlers>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let property = h
        .get_property
        .handle(Viewer::Public, parse_id(&id, "property")?)
        .await?;
    let host = h.host_contact(&property).await;
    Ok(Json(PublicPropertyResponse {
        is_featured: property.is_featured(),
        property,
        host,
    }))
}

async fn create_booking(
    State(h): State<PublicHandlers>,
    Json(req): Json<BookingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = CreateBookingCommand {
        property_id: req.property_id,
        guest: req.guest(),
        check_in: req.check_in,
        check_out: req.check_out,
        guests: req.guests,
    };
    let result = h.create_booking.handle(cmd).await?;
    // The guest is not told when the host's notification failed.
    Ok((StatusCode::CREATED, Json(result.booking)))
}

async fn list_reviews(
    State(h): State<PublicHandlers>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let property_id = parse_id(&id, "property")?;
    Ok(Json(h.reviews.published(property_id).await?))
}

async fn submit_review(
    State(h): State<PublicHandlers>,
    Path(id): Path<String>,
    Json(req): Json<ReviewRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = SubmitReviewCommand {
        property_id: parse_id(&id, "property")?,
        guest_name: req.guest_name,
        rating: req.rating,
        comment: req.comment,
    };
    let review = h.submit_review.handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(review)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::PartnerProfile;
    use crate::domain::foundation::{Timestamp, UserId};
    use crate::domain::property::sample_details;

    fn partner(phone: Option<&str>, whatsapp: Option<&str>) -> PartnerAccount {
        PartnerAccount::register(
            UserId::new("host").unwrap(),
            PartnerProfile {
                business_name: "Hill Stays".to_string(),
                location: "Munnar".to_string(),
                bio: None,
                show_contact_info: true,
                phone: phone.map(str::to_string),
                whatsapp: whatsapp.map(str::to_string),
            },
            Timestamp::now(),
        )
        .unwrap()
    }

    #[test]
    fn host_links_use_default_country_code() {
        let host = partner(Some("98765 43210"), None);
        let property = Property::create(host.id, sample_details(), Timestamp::now()).unwrap();
        let contact = host_links(&host, &property, "91");

        assert_eq!(contact.business_name, "Hill Stays");
        assert_eq!(contact.tel.as_deref(), Some("tel:+919876543210"));
        let whatsapp = contact.whatsapp.unwrap();
        assert!(whatsapp.starts_with("https://wa.me/919876543210?text="));
    }

    #[test]
    fn unusable_numbers_are_left_out() {
        let host = partner(Some("call me"), None);
        let property = Property::create(host.id, sample_details(), Timestamp::now()).unwrap();
        let contact = host_links(&host, &property, "91");
        assert!(contact.tel.is_none());
        assert!(contact.whatsapp.is_none());
    }
}
