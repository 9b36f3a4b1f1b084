//! Best-seller ranking.

use coursehub_core::model::Course;

/// How many courses a landing page lists as best sellers.
pub const TOP_SELLING_LIMIT: usize = 10;

/// Orders `courses` by `sold`, highest first, and keeps at most `limit`.
///
/// The sort is stable: courses with equal sales keep their input order.
#[must_use]
pub fn top_selling(mut courses: Vec<Course>, limit: usize) -> Vec<Course> {
    courses.sort_by(|a, b| b.sold.cmp(&a.sold));
    courses.truncate(limit);
    courses
}
