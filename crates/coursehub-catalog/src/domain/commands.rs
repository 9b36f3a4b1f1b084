//! Commands for the Catalog context.

use coursehub_core::command::Command;
use uuid::Uuid;

/// Command to create a new category.
///
/// `name` stays optional here so that a missing name is reported as a
/// validation failure by the handler rather than as a malformed request.
#[derive(Debug, Clone)]
pub struct CreateCategory {
    /// Correlation ID for tracing.
    pub correlation_id: Uuid,
    /// Requested category name.
    pub name: Option<String>,
    /// Optional description.
    pub description: Option<String>,
}

impl Command for CreateCategory {
    fn command_type(&self) -> &'static str {
        "catalog.create_category"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
