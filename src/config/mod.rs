//! # Configuration
//!
//! One JSON file, every field optional. Environment variables applied after
//! the file:
//!
//! | Variable                 | Field             |
//! |--------------------------|-------------------|
//! | `MOVIES_TABLE`           | `table_name`      |
//! | `MOVIES_STORE`           | `store`           |
//! | `MOVIES_IDENTITY_SECRET` | `identity.secret` |

mod app;
mod errors;

pub use app::{AppConfig, StoreBackend, DEFAULT_TABLE_NAME};
pub use errors::{ConfigError, ConfigResult};
