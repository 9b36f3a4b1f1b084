//! `PostgreSQL` implementation of the `CategoryRepository` trait.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use coursehub_core::error::DomainError;
use coursehub_core::model::{
    Category, Course, CoursePopulation, CourseStatus, RatingAndReview, RatingAndReviews,
};
use coursehub_core::repository::CategoryRepository;

/// Category columns plus the ordered course references.
const SELECT_CATEGORIES: &str = r"
SELECT c.id, c.name, c.description, c.created_at,
       COALESCE(
           ARRAY_AGG(cc.course_id ORDER BY cc.position) FILTER (WHERE cc.course_id IS NOT NULL),
           '{}'::uuid[]
       ) AS course_ids
FROM categories c
LEFT JOIN category_courses cc ON cc.category_id = c.id
";

const GROUP_AND_ORDER: &str = "GROUP BY c.id ORDER BY c.created_at, c.id";

const INSERT_CATEGORY: &str = r"
INSERT INTO categories (id, name, description, created_at)
VALUES ($1, $2, $3, $4)
RETURNING id, name, description, created_at
";

const INSERT_COURSE_REFERENCES: &str = r"
INSERT INTO category_courses (category_id, course_id, position)
SELECT $1::uuid, refs.course_id, (refs.ordinal - 1)::int
FROM UNNEST($2::uuid[]) WITH ORDINALITY AS refs(course_id, ordinal)
";

const SELECT_COURSES: &str = r"
SELECT co.id, co.course_name, co.course_description, co.price, co.status, co.sold, co.created_at
FROM category_courses cc
JOIN courses co ON co.id = cc.course_id
WHERE cc.category_id = $1 AND ($2::text IS NULL OR co.status = $2)
ORDER BY cc.position
";

const SELECT_REVIEWS: &str = r"
SELECT id, course_id, user_id, rating, review, created_at
FROM rating_and_reviews
WHERE course_id = ANY($1)
ORDER BY created_at, id
";

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
    course_ids: Vec<Uuid>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            course_ids: row.course_ids,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct InsertedCategoryRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct CourseRow {
    id: Uuid,
    course_name: String,
    course_description: String,
    price: i64,
    status: String,
    sold: i64,
    created_at: DateTime<Utc>,
}

impl CourseRow {
    fn into_course(self, rating_and_reviews: RatingAndReviews) -> Result<Course, DomainError> {
        let status: CourseStatus = self
            .status
            .parse()
            .map_err(|e| DomainError::Infrastructure(format!("course {}: {e}", self.id)))?;
        let sold = u64::try_from(self.sold).map_err(|_| {
            DomainError::Infrastructure(format!("course {}: negative sold count", self.id))
        })?;
        Ok(Course {
            id: self.id,
            course_name: self.course_name,
            course_description: self.course_description,
            price: self.price,
            status,
            sold,
            rating_and_reviews,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ReviewRow {
    id: Uuid,
    course_id: Uuid,
    user_id: Uuid,
    rating: i16,
    review: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ReviewRow> for RatingAndReview {
    type Error = DomainError;

    fn try_from(row: ReviewRow) -> Result<Self, Self::Error> {
        let rating = u8::try_from(row.rating).map_err(|_| {
            DomainError::Infrastructure(format!("review {}: rating out of range", row.id))
        })?;
        Ok(Self {
            id: row.id,
            course_id: row.course_id,
            user_id: row.user_id,
            rating,
            review: row.review,
            created_at: row.created_at,
        })
    }
}

fn infrastructure(err: sqlx::Error) -> DomainError {
    DomainError::Infrastructure(err.to_string())
}

/// PostgreSQL-backed category repository.
#[derive(Debug, Clone)]
pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    /// Creates a new `PgCategoryRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_categories(
        &self,
        filter: &str,
        bind: Option<Uuid>,
    ) -> Result<Vec<Category>, DomainError> {
        let sql = format!("{SELECT_CATEGORIES} {filter} {GROUP_AND_ORDER}");
        let mut query = sqlx::query_as::<_, CategoryRow>(&sql);
        if let Some(id) = bind {
            query = query.bind(id);
        }
        let rows = query.fetch_all(&self.pool).await.map_err(infrastructure)?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn reviews_by_course(
        &self,
        course_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<RatingAndReview>>, DomainError> {
        let rows = sqlx::query_as::<_, ReviewRow>(SELECT_REVIEWS)
            .bind(course_ids)
            .fetch_all(&self.pool)
            .await
            .map_err(infrastructure)?;

        let mut by_course: HashMap<Uuid, Vec<RatingAndReview>> = HashMap::new();
        for row in rows {
            let review = RatingAndReview::try_from(row)?;
            by_course.entry(review.course_id).or_default().push(review);
        }
        Ok(by_course)
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn find_by_id(&self, category_id: Uuid) -> Result<Option<Category>, DomainError> {
        let mut found = self
            .fetch_categories("WHERE c.id = $1", Some(category_id))
            .await?;
        Ok(found.pop())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Category>, DomainError> {
        let sql = format!("{SELECT_CATEGORIES} WHERE c.name = $1 {GROUP_AND_ORDER}");
        let row = sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(infrastructure)?;
        Ok(row.map(Category::from))
    }

    async fn insert(&self, category: &Category) -> Result<Category, DomainError> {
        let mut tx = self.pool.begin().await.map_err(infrastructure)?;

        let row = sqlx::query_as::<_, InsertedCategoryRow>(INSERT_CATEGORY)
            .bind(category.id)
            .bind(&category.name)
            .bind(category.description.as_deref())
            .bind(category.created_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(infrastructure)?;

        if !category.course_ids.is_empty() {
            sqlx::query(INSERT_COURSE_REFERENCES)
                .bind(row.id)
                .bind(category.course_ids.as_slice())
                .execute(&mut *tx)
                .await
                .map_err(infrastructure)?;
        }

        tx.commit().await.map_err(infrastructure)?;

        debug!(category_id = %row.id, "category inserted");

        Ok(Category {
            id: row.id,
            name: row.name,
            description: row.description,
            course_ids: category.course_ids.clone(),
            created_at: row.created_at,
        })
    }

    async fn list(&self) -> Result<Vec<Category>, DomainError> {
        self.fetch_categories("", None).await
    }

    async fn list_except(&self, category_id: Uuid) -> Result<Vec<Category>, DomainError> {
        self.fetch_categories("WHERE c.id <> $1", Some(category_id))
            .await
    }

    async fn resolve_courses(
        &self,
        category_id: Uuid,
        population: CoursePopulation,
    ) -> Result<Vec<Course>, DomainError> {
        let rows = sqlx::query_as::<_, CourseRow>(SELECT_COURSES)
            .bind(category_id)
            .bind(population.status.map(CourseStatus::as_str))
            .fetch_all(&self.pool)
            .await
            .map_err(infrastructure)?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let course_ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let mut reviews = self.reviews_by_course(&course_ids).await?;

        let courses = rows
            .into_iter()
            .map(|row| {
                let course_reviews = reviews.remove(&row.id).unwrap_or_default();
                let rating_and_reviews = if population.include_reviews {
                    RatingAndReviews::Resolved(course_reviews)
                } else {
                    RatingAndReviews::Ids(course_reviews.iter().map(|r| r.id).collect())
                };
                row.into_course(rating_and_reviews)
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(%category_id, count = courses.len(), "resolved courses");

        Ok(courses)
    }
}
