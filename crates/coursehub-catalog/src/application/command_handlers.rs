//! Command handlers for the Catalog context.
//!
//! This module contains the write paths: creating a category on request and
//! guaranteeing that the default category exists.

use coursehub_core::clock::Clock;
use coursehub_core::command::Command;
use coursehub_core::error::DomainError;
use coursehub_core::model::Category;
use coursehub_core::repository::CategoryRepository;
use tracing::info;
use uuid::Uuid;

use crate::domain::commands::CreateCategory;
use crate::domain::{DEFAULT_CATEGORY_DESCRIPTION, DEFAULT_CATEGORY_NAME};

/// Returns the default "General" category, creating it first if it does not
/// exist yet.
///
/// The lookup and the insert are not atomic. Two concurrent first calls can
/// both try to create the category; the store's unique name constraint
/// rejects the second insert, which then surfaces as an infrastructure error.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the lookup or the insert fails.
pub async fn ensure_default_category(
    clock: &dyn Clock,
    repo: &dyn CategoryRepository,
) -> Result<Category, DomainError> {
    if let Some(existing) = repo.find_by_name(DEFAULT_CATEGORY_NAME).await? {
        return Ok(existing);
    }

    let category = Category::new(
        Uuid::new_v4(),
        DEFAULT_CATEGORY_NAME.to_owned(),
        Some(DEFAULT_CATEGORY_DESCRIPTION.to_owned()),
        clock.now(),
    );
    let stored = repo.insert(&category).await?;

    info!(category_id = %stored.id, "default category created");

    Ok(stored)
}

/// Handles the `CreateCategory` command: validates the name and persists a
/// new category with no courses.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the name is missing or blank.
/// Returns `DomainError::Infrastructure` if the insert fails, including when
/// the name is already taken.
pub async fn handle_create_category(
    command: &CreateCategory,
    clock: &dyn Clock,
    repo: &dyn CategoryRepository,
) -> Result<Category, DomainError> {
    let name = match command.name.as_deref() {
        Some(name) if !name.trim().is_empty() => name,
        _ => return Err(DomainError::Validation("category name is required".into())),
    };

    let category = Category::new(
        Uuid::new_v4(),
        name.to_owned(),
        command.description.clone(),
        clock.now(),
    );
    let stored = repo.insert(&category).await?;

    info!(
        command_type = command.command_type(),
        correlation_id = %command.correlation_id(),
        category_id = %stored.id,
        "category created"
    );

    Ok(stored)
}
