//! Guest reviews of properties, moderated by administrators.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    require_text, PropertyId, ReviewId, StateMachine, Timestamp, TransitionError, UserId,
    ValidationError,
};
use crate::domain::session::Administrator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    Pending,
    Published,
    Hidden,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewStatus::Pending => "pending",
            ReviewStatus::Published => "published",
            ReviewStatus::Hidden => "hidden",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(ReviewStatus::Pending),
            "published" => Some(ReviewStatus::Published),
            "hidden" => Some(ReviewStatus::Hidden),
            _ => None,
        }
    }
}

impl StateMachine for ReviewStatus {
    const ENTITY: &'static str = "review";

    fn valid_transitions(&self) -> Vec<Self> {
        use ReviewStatus::*;
        match self {
            Pending => vec![Published, Hidden],
            Published => vec![Hidden],
            Hidden => vec![Published],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub property_id: PropertyId,
    pub guest_name: String,
    /// 1 to 5 stars.
    pub rating: u8,
    pub comment: Option<String>,
    pub status: ReviewStatus,
    pub moderated_by: Option<UserId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Review {
    pub fn submit(
        property_id: PropertyId,
        guest_name: &str,
        rating: u8,
        comment: Option<String>,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        if !(1..=5).contains(&rating) {
            return Err(ValidationError::out_of_range("rating", 1, 5, i64::from(rating)));
        }
        Ok(Self {
            id: ReviewId::new(),
            property_id,
            guest_name: require_text("guest_name", guest_name)?,
            rating,
            comment: comment
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            status: ReviewStatus::Pending,
            moderated_by: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_visible(&self) -> bool {
        self.status == ReviewStatus::Published
    }

    pub fn moderate(
        &mut self,
        target: ReviewStatus,
        admin: &Administrator,
        now: Timestamp,
    ) -> Result<(), TransitionError> {
        self.status = self.status.transition_to(target)?;
        self.moderated_by = Some(admin.user_id().clone());
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Administrator {
        Administrator::new(UserId::new("admin").unwrap())
    }

    #[test]
    fn rating_must_be_one_to_five() {
        assert!(Review::submit(PropertyId::new(), "Ann", 0, None, Timestamp::now()).is_err());
        assert!(Review::submit(PropertyId::new(), "Ann", 6, None, Timestamp::now()).is_err());
        assert!(Review::submit(PropertyId::new(), "Ann", 5, None, Timestamp::now()).is_ok());
    }

    #[test]
    fn published_and_hidden_toggle() {
        let mut review =
            Review::submit(PropertyId::new(), "Ann", 4, None, Timestamp::now()).unwrap();
        assert!(!review.is_visible());
        review
            .moderate(ReviewStatus::Published, &admin(), Timestamp::now())
            .unwrap();
        assert!(review.is_visible());
        review
            .moderate(ReviewStatus::Hidden, &admin(), Timestamp::now())
            .unwrap();
        review
            .moderate(ReviewStatus::Published, &admin(), Timestamp::now())
            .unwrap();
        assert!(review
            .moderate(ReviewStatus::Pending, &admin(), Timestamp::now())
            .is_err());
    }
}
