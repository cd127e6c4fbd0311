/// Database layer
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool built from environment settings
/// - `migrations`: Embedded schema migrations
/// - `seed`: Resets the board to the three default columns and sample tasks
///
/// Models are in the [`models`](crate::models) module at crate root level.

pub mod migrations;
pub mod pool;
pub mod seed;
