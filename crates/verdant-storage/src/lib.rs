//! Storage layer for the Verdant sensor-collection daemon.
//!
//! SQLite-backed persistence for per-cycle observations, built from three
//! pieces:
//!
//! - [`Database`]: connection pool wrapper that idempotently creates the
//!   schema on open (create-if-absent, never destructive)
//! - [`MeasurementRepository`]: data access trait with a SQLite
//!   implementation; one insert per observation, absent fields become NULL
//! - [`MeasurementWriter`]: the worker that drains the observation channel
//!   into the repository, tolerating persistence failures
//!
//! # Durability model
//!
//! Every insert commits on its own; there is no batching, so a crash can
//! lose at most the single observation in flight. A failed insert is logged
//! and the record dropped; the writer never stops looping because of the
//! database, only because of the stop signal or a closed channel.
//!
//! # Examples
//!
//! ```no_run
//! use verdant_storage::{Database, DatabaseConfig};
//! use verdant_storage::repository::{MeasurementRepository, SqliteMeasurementRepository};
//! use verdant_core::Observation;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new(DatabaseConfig::new("sensors.db")).await?;
//! let repo = SqliteMeasurementRepository::new(db.pool().clone());
//!
//! let observation = Observation {
//!     air_temperature: Some(21.4),
//!     ..Default::default()
//! };
//! let id = repo.insert(&observation).await?;
//! println!("stored measurement {id}");
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod error;
pub mod models;
pub mod repository;
pub mod writer;

pub use connection::{Database, DatabaseConfig};
pub use error::{StorageError, StorageResult};
pub use models::Measurement;
pub use repository::{MeasurementRepository, SqliteMeasurementRepository};
pub use writer::MeasurementWriter;
