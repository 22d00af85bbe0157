//! Guest review handlers.

use std::sync::Arc;

use crate::application::error::WorkflowError;
use crate::application::handlers::session::AccessGuard;
use crate::application::InFlightRegistry;
use crate::domain::foundation::{AuthenticatedUser, PropertyId, ReviewId, Timestamp};
use crate::domain::support::{Review, ReviewStatus};
use crate::ports::{PropertyRepository, ReviewRepository};

#[derive(Debug, Clone)]
pub struct SubmitReviewCommand {
    pub property_id: PropertyId,
    pub guest_name: String,
    pub rating: u8,
    pub comment: Option<String>,
}

/// Anonymous guests review active listings. Reviews wait for moderation.
pub struct SubmitReviewHandler {
    properties: Arc<dyn PropertyRepository>,
    reviews: Arc<dyn ReviewRepository>,
}

impl SubmitReviewHandler {
    pub fn new(properties: Arc<dyn PropertyRepository>, reviews: Arc<dyn ReviewRepository>) -> Self {
        Self {
            properties,
            reviews,
        }
    }

    pub async fn handle(&self, cmd: SubmitReviewCommand) -> Result<Review, WorkflowError> {
        let property = self
            .properties
            .find_by_id(&cmd.property_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or_else(|| WorkflowError::not_found("Property", cmd.property_id))?;

        let review = Review::submit(
            property.id,
            &cmd.guest_name,
            cmd.rating,
            cmd.comment,
            Timestamp::now(),
        )?;
        self.reviews.save(&review).await?;
        tracing::info!(review_id = %review.id, property_id = %property.id, "Review submitted");
        Ok(review)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ModerateReviewCommand {
    pub review_id: ReviewId,
    pub status: ReviewStatus,
}

pub struct ModerateReviewHandler {
    guard: AccessGuard,
    reviews: Arc<dyn ReviewRepository>,
    in_flight: InFlightRegistry,
}

impl ModerateReviewHandler {
    pub fn new(
        guard: AccessGuard,
        reviews: Arc<dyn ReviewRepository>,
        in_flight: InFlightRegistry,
    ) -> Self {
        Self {
            guard,
            reviews,
            in_flight,
        }
    }

    pub async fn handle(
        &self,
        actor: &AuthenticatedUser,
        cmd: ModerateReviewCommand,
    ) -> Result<Review, WorkflowError> {
        let admin = self.guard.require_admin(actor).await?;
        let _token = self.in_flight.acquire("review", cmd.review_id)?;

        let mut review = self
            .reviews
            .find_by_id(&cmd.review_id)
            .await?
            .ok_or_else(|| WorkflowError::not_found("Review", cmd.review_id))?;
        review.moderate(cmd.status, &admin, Timestamp::now())?;
        self.reviews.update(&review).await?;

        tracing::info!(
            review_id = %review.id,
            status = review.status.as_str(),
            admin = %admin.user_id(),
            "Review moderated"
        );
        Ok(review)
    }
}

pub struct ListReviewsHandler {
    guard: AccessGuard,
    reviews: Arc<dyn ReviewRepository>,
}

impl ListReviewsHandler {
    pub fn new(guard: AccessGuard, reviews: Arc<dyn ReviewRepository>) -> Self {
        Self { guard, reviews }
    }

    /// Published reviews of one listing.
    pub async fn published(&self, property_id: PropertyId) -> Result<Vec<Review>, WorkflowError> {
        let mut reviews = self.reviews.list_by_property(&property_id).await?;
        reviews.retain(Review::is_visible);
        Ok(reviews)
    }

    /// Moderation queue.
    pub async fn all(
        &self,
        actor: &AuthenticatedUser,
        status: Option<ReviewStatus>,
    ) -> Result<Vec<Review>, WorkflowError> {
        self.guard.require_admin(actor).await?;
        let reviews = self.reviews.list_all().await?;
        Ok(match status {
            Some(status) => reviews.into_iter().filter(|r| r.status == status).collect(),
            None => reviews,
        })
    }
}
