//! Query handlers for the Catalog context.
//!
//! This module contains the read paths: the full category listing and the
//! category landing page, which combines the requested category, one
//! randomly drawn peer category and the catalog-wide best sellers.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use coursehub_core::clock::Clock;
use coursehub_core::error::DomainError;
use coursehub_core::model::{Category, Course, CoursePopulation};
use coursehub_core::repository::CategoryRepository;
use coursehub_core::rng::DeterministicRng;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::application::command_handlers;
use crate::domain::ranking::{TOP_SELLING_LIMIT, top_selling};

/// Read-only view of a category with its course references resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    /// The category identifier.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Resolved courses, in the category's stored order.
    pub courses: Vec<Course>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl CategoryView {
    fn new(category: Category, courses: Vec<Course>) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
            courses,
            created_at: category.created_at,
        }
    }
}

/// The landing page of a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum CategoryPage {
    /// The category has no published courses; nothing else was looked up.
    Empty {
        /// The requested category.
        selected_category: CategoryView,
    },
    /// The complete page.
    Full {
        /// The requested category, published courses only, reviews resolved.
        selected_category: CategoryView,
        /// A uniformly drawn other category, or `None` if there is none.
        different_category: Option<CategoryView>,
        /// Best-selling published courses across every category.
        most_selling_courses: Vec<Course>,
    },
}

impl CategoryPage {
    /// Returns the requested category.
    #[must_use]
    pub fn selected_category(&self) -> &CategoryView {
        match self {
            Self::Empty { selected_category } | Self::Full { selected_category, .. } => {
                selected_category
            }
        }
    }
}

async fn populate(
    category: Category,
    population: CoursePopulation,
    repo: &dyn CategoryRepository,
) -> Result<CategoryView, DomainError> {
    let courses = repo.resolve_courses(category.id, population).await?;
    Ok(CategoryView::new(category, courses))
}

/// Lists every category with all of its courses resolved, creating the
/// default category first if needed.
///
/// Courses are not filtered by status here.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if any store call fails.
pub async fn show_all_categories(
    clock: &dyn Clock,
    repo: &dyn CategoryRepository,
) -> Result<Vec<CategoryView>, DomainError> {
    command_handlers::ensure_default_category(clock, repo).await?;

    let categories = repo.list().await?;
    let mut views = Vec::with_capacity(categories.len());
    for category in categories {
        views.push(populate(category, CoursePopulation::all(), repo).await?);
    }
    Ok(views)
}

/// Builds the landing page for `category_id`.
///
/// When the category has no published courses the page is returned as
/// [`CategoryPage::Empty`] without looking at any other category.
///
/// # Errors
///
/// Returns `DomainError::NotFound` if no category has the given ID.
/// Returns `DomainError::Infrastructure` if any store call fails or the RNG
/// mutex is poisoned.
pub async fn category_page_details(
    category_id: Uuid,
    rng: &Mutex<dyn DeterministicRng + Send>,
    repo: &dyn CategoryRepository,
) -> Result<CategoryPage, DomainError> {
    let Some(category) = repo.find_by_id(category_id).await? else {
        warn!(%category_id, "category not found");
        return Err(DomainError::NotFound(category_id));
    };

    let selected_category =
        populate(category, CoursePopulation::published().with_reviews(), repo).await?;

    if selected_category.courses.is_empty() {
        debug!(%category_id, "no published courses in the selected category");
        return Ok(CategoryPage::Empty { selected_category });
    }

    let different_category = draw_different_category(category_id, rng, repo).await?;
    let most_selling_courses = most_selling_courses(repo).await?;

    Ok(CategoryPage::Full {
        selected_category,
        different_category,
        most_selling_courses,
    })
}

async fn draw_different_category(
    category_id: Uuid,
    rng: &Mutex<dyn DeterministicRng + Send>,
    repo: &dyn CategoryRepository,
) -> Result<Option<CategoryView>, DomainError> {
    let mut peers = repo.list_except(category_id).await?;
    if peers.is_empty() {
        return Ok(None);
    }

    let index = draw_index(peers.len(), rng)?;
    let peer = peers.swap_remove(index);
    debug!(%category_id, peer_id = %peer.id, "drew different category");

    populate(peer, CoursePopulation::published(), repo)
        .await
        .map(Some)
}

/// Draws an index uniformly from `[0, len)`. `len` must be non-zero.
fn draw_index(len: usize, rng: &Mutex<dyn DeterministicRng + Send>) -> Result<usize, DomainError> {
    let max = u32::try_from(len - 1)
        .map_err(|_| DomainError::Infrastructure(format!("cannot sample from {len} categories")))?;

    // Lock RNG only for the draw, never across an await.
    let drawn = {
        let mut rng_guard = rng
            .lock()
            .map_err(|e| DomainError::Infrastructure(format!("RNG mutex poisoned: {e}")))?;
        rng_guard.next_u32_range(0, max)
    };

    usize::try_from(drawn)
        .ok()
        .filter(|index| *index < len)
        .ok_or_else(|| {
            DomainError::Infrastructure(format!("RNG drew {drawn} outside 0..={max}"))
        })
}

async fn most_selling_courses(repo: &dyn CategoryRepository) -> Result<Vec<Course>, DomainError> {
    let mut published = Vec::new();
    for category in repo.list().await? {
        published.extend(
            repo.resolve_courses(category.id, CoursePopulation::published())
                .await?,
        );
    }
    Ok(top_selling(published, TOP_SELLING_LIMIT))
}
