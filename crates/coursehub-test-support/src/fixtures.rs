//! Builders for catalog records used across test suites.

use chrono::{TimeZone, Utc};
use coursehub_core::model::{Course, CourseStatus, RatingAndReview, RatingAndReviews};
use uuid::Uuid;

/// Builds a course with the given status and sales count and no reviews.
#[must_use]
pub fn course(name: &str, status: CourseStatus, sold: u64) -> Course {
    Course {
        id: Uuid::new_v4(),
        course_name: name.to_owned(),
        course_description: format!("{name} description"),
        price: 4_999,
        status,
        sold,
        rating_and_reviews: RatingAndReviews::default(),
        created_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
    }
}

/// Builds a five-star review of `course_id`.
#[must_use]
pub fn review(course_id: Uuid) -> RatingAndReview {
    RatingAndReview {
        id: Uuid::new_v4(),
        course_id,
        user_id: Uuid::new_v4(),
        rating: 5,
        review: "Clear and well paced.".to_owned(),
        created_at: Utc.with_ymd_and_hms(2026, 1, 16, 9, 30, 0).unwrap(),
    }
}
