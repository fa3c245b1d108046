//! Restaurant reviews

use crate::catalog::Catalog;
use crate::notify::ChangeNotifier;
use crate::storage::{BookingStore, StorageError};
use shared::error::{AppError, ErrorCode};
use shared::message::{ChangeEvent, ChangeEventType};
use shared::models::{MAX_RATING, MIN_RATING, Review, ReviewCreate};
use shared::types::{Actor, now_millis};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReviewError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Restaurant not found: {0}")]
    RestaurantNotFound(i64),

    #[error("Rating {0} must be between 1 and 5")]
    InvalidRating(i32),
}

impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        match err {
            ReviewError::Storage(e) => {
                tracing::error!(error = %e, "Review storage error");
                AppError::internal()
            }
            ReviewError::RestaurantNotFound(id) => {
                AppError::new(ErrorCode::RestaurantNotFound).with_detail("restaurant_id", id)
            }
            ReviewError::InvalidRating(rating) => {
                AppError::new(ErrorCode::InvalidRating).with_detail("rating", rating)
            }
        }
    }
}

pub struct ReviewService {
    catalog: Arc<dyn Catalog>,
    store: Arc<dyn BookingStore>,
    notifier: ChangeNotifier,
}

impl std::fmt::Debug for ReviewService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewService").finish_non_exhaustive()
    }
}

impl ReviewService {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        store: Arc<dyn BookingStore>,
        notifier: ChangeNotifier,
    ) -> Self {
        Self {
            catalog,
            store,
            notifier,
        }
    }

    pub fn create(&self, actor: &Actor, req: ReviewCreate) -> Result<Review, ReviewError> {
        if !(MIN_RATING..=MAX_RATING).contains(&req.rating) {
            return Err(ReviewError::InvalidRating(req.rating));
        }
        if self.catalog.restaurant(req.restaurant_id).is_none() {
            return Err(ReviewError::RestaurantNotFound(req.restaurant_id));
        }

        let review = Review {
            id: uuid::Uuid::new_v4().to_string(),
            restaurant_id: req.restaurant_id,
            customer_id: actor.id.clone(),
            rating: req.rating,
            comment: req
                .comment
                .map(|c| c.trim().to_string())
                .filter(|c| !c.is_empty()),
            created_at: now_millis(),
        };
        self.store.save_review(&review)?;

        tracing::info!(
            review_id = %review.id,
            restaurant_id = review.restaurant_id,
            rating = review.rating,
            "Review created"
        );
        self.notifier.publish(ChangeEvent::new(
            ChangeEventType::ReviewCreated,
            review.restaurant_id,
            &review.id,
            &review,
        ));
        Ok(review)
    }

    /// Newest first
    pub fn list(&self, restaurant_id: i64) -> Result<Vec<Review>, ReviewError> {
        if self.catalog.restaurant(restaurant_id).is_none() {
            return Err(ReviewError::RestaurantNotFound(restaurant_id));
        }
        let mut reviews = self.store.list_reviews(restaurant_id)?;
        reviews.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(reviews)
    }
}
