/// API route handlers
///
/// Organized by resource:
///
/// - `health`: Health check endpoint
/// - `columns`: Column CRUD, column reorder, tasks of a column
/// - `tasks`: Task CRUD, filters, move
/// - `board`: Status lanes and drag-and-drop

pub mod board;
pub mod columns;
pub mod health;
pub mod tasks;

use serde::{Deserialize, Serialize};

/// Body of the reorder endpoints: ids in their new order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderRequest {
    pub ids: Vec<String>,
}
