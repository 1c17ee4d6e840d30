//! Car Registry Core - headless in-memory car records.
//!
//! This crate holds the car record types, the shared `CarStore`, and the
//! search filters. It has no HTTP layer; see the `car-registry-server` crate
//! for the REST surface.
//!
//! # Example
//!
//! ```rust
//! use car_registry::{CarStore, SearchQuery};
//!
//! let store = CarStore::seeded();
//! assert_eq!(store.len().unwrap(), 3);
//!
//! let query = SearchQuery {
//!     make: Some("honda".to_string()),
//!     ..Default::default()
//! };
//! let hondas = store.search(&query).unwrap();
//! assert_eq!(hondas[0].model, "Civic");
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod search;
pub mod store;

pub use config::{MessageConfig, ServerConfig};
pub use error::{RegistryError, Result};
pub use models::{seed_cars, Car, CarPatch, NewCar, CAR_FIELDS};
pub use search::SearchQuery;
pub use store::CarStore;
