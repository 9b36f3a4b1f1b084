//! Catalog records as held by the category store.
//!
//! `Category` owns an ordered list of course references. Courses and their
//! reviews belong to other subsystems; the store only resolves them on demand
//! according to a [`CoursePopulation`].

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// A catalog category with unresolved course references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    /// Store-assigned identifier.
    pub id: Uuid,
    /// Unique display name.
    pub name: String,
    /// Optional free-form description.
    pub description: Option<String>,
    /// Ordered references to the courses filed under this category.
    #[serde(rename = "courses")]
    pub course_ids: Vec<Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Category {
    /// Creates a category with no courses.
    #[must_use]
    pub fn new(
        id: Uuid,
        name: String,
        description: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            description,
            course_ids: Vec::new(),
            created_at,
        }
    }
}

/// Publication state of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CourseStatus {
    /// Not yet visible to learners.
    Draft,
    /// Visible in the catalog.
    Published,
}

impl CourseStatus {
    /// Returns the stored representation of the status.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "Draft",
            Self::Published => "Published",
        }
    }
}

impl fmt::Display for CourseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stored status string is not a known `CourseStatus`.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown course status: {0}")]
pub struct UnknownCourseStatus(pub String);

impl FromStr for CourseStatus {
    type Err = UnknownCourseStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Draft" => Ok(Self::Draft),
            "Published" => Ok(Self::Published),
            other => Err(UnknownCourseStatus(other.to_owned())),
        }
    }
}

/// A learner's rating and review of a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingAndReview {
    /// Review identifier.
    pub id: Uuid,
    /// The reviewed course.
    pub course_id: Uuid,
    /// The reviewing learner.
    pub user_id: Uuid,
    /// Star rating, 1 through 5.
    pub rating: u8,
    /// Review text.
    pub review: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A course's reviews, either as bare references or resolved records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RatingAndReviews {
    /// Review identifiers only.
    Ids(Vec<Uuid>),
    /// Fully resolved reviews.
    Resolved(Vec<RatingAndReview>),
}

impl RatingAndReviews {
    /// Number of reviews, resolved or not.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Ids(ids) => ids.len(),
            Self::Resolved(reviews) => reviews.len(),
        }
    }

    /// Returns `true` if the course has no reviews.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the reviews have been resolved to full records.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

impl Default for RatingAndReviews {
    fn default() -> Self {
        Self::Ids(Vec::new())
    }
}

/// A course as resolved through a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    /// Course identifier.
    pub id: Uuid,
    /// Display name.
    pub course_name: String,
    /// Short description.
    pub course_description: String,
    /// Price in minor currency units.
    pub price: i64,
    /// Publication state.
    pub status: CourseStatus,
    /// Number of enrolments sold.
    pub sold: u64,
    /// Reviews, resolved only when the population asks for them.
    pub rating_and_reviews: RatingAndReviews,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Describes how a category's course references are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoursePopulation {
    /// Only courses with this status are returned; `None` returns all.
    pub status: Option<CourseStatus>,
    /// Whether each course's reviews are resolved to full records.
    pub include_reviews: bool,
}

impl CoursePopulation {
    /// Every referenced course, reviews left as ids.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            status: None,
            include_reviews: false,
        }
    }

    /// Published courses only, reviews left as ids.
    #[must_use]
    pub const fn published() -> Self {
        Self {
            status: Some(CourseStatus::Published),
            include_reviews: false,
        }
    }

    /// Same population with reviews resolved.
    #[must_use]
    pub const fn with_reviews(self) -> Self {
        Self {
            include_reviews: true,
            ..self
        }
    }

    /// Returns `true` if `status` passes this population's filter.
    #[must_use]
    pub fn admits(&self, status: CourseStatus) -> bool {
        self.status.is_none_or(|wanted| wanted == status)
    }
}
