//! Domain layer for the Catalog context.

pub mod commands;
pub mod ranking;

/// Name of the category that is guaranteed to exist.
pub const DEFAULT_CATEGORY_NAME: &str = "General";

/// Description given to the default category when it is created.
pub const DEFAULT_CATEGORY_DESCRIPTION: &str = "Default category for uncategorized courses";
