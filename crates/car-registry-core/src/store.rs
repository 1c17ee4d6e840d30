//! In-memory car store.
//!
//! `CarStore` owns the ordered car sequence behind a single `RwLock`. Every
//! operation takes the lock exactly once, so a request's lookup and mutation
//! cannot interleave with another request's.
//!
//! Ids are assigned as `len + 1` at creation time. After a delete this can
//! hand out an id that is still in use; lookups and updates then act on the
//! first match and deletes remove every match.

use crate::error::{RegistryError, Result};
use crate::models::{seed_cars, Car, CarPatch, NewCar};
use crate::search::SearchQuery;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Process-wide car collection.
#[derive(Debug, Default)]
pub struct CarStore {
    cars: RwLock<Vec<Car>>,
}

impl CarStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the startup seed records.
    pub fn seeded() -> Self {
        Self::with_cars(seed_cars())
    }

    pub fn with_cars(cars: Vec<Car>) -> Self {
        Self {
            cars: RwLock::new(cars),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Car>>> {
        self.cars.read().map_err(|_| RegistryError::Lock)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Car>>> {
        self.cars.write().map_err(|_| RegistryError::Lock)
    }

    /// All cars in insertion order.
    pub fn list(&self) -> Result<Vec<Car>> {
        Ok(self.read()?.clone())
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    /// First car whose id matches.
    pub fn get(&self, id: i64) -> Result<Car> {
        self.read()?
            .iter()
            .find(|car| car.id == id)
            .cloned()
            .ok_or(RegistryError::CarNotFound { id })
    }

    /// Append a new car with id `len + 1`.
    pub fn create(&self, new_car: NewCar) -> Result<Car> {
        let mut cars = self.write()?;
        let id = cars.len() as i64 + 1;
        let car = new_car.into_car(id);
        cars.push(car.clone());
        debug!("Created car {} ({} {})", car.id, car.make, car.model);
        Ok(car)
    }

    /// Overwrite the provided fields on the first car whose id matches.
    pub fn update(&self, id: i64, patch: &CarPatch) -> Result<Car> {
        let mut cars = self.write()?;
        let car = cars
            .iter_mut()
            .find(|car| car.id == id)
            .ok_or(RegistryError::CarNotFound { id })?;
        car.apply(patch);
        debug!("Updated car {}", id);
        Ok(car.clone())
    }

    /// Remove every car whose id matches. Returns how many were removed.
    pub fn delete(&self, id: i64) -> Result<usize> {
        let mut cars = self.write()?;
        let before = cars.len();
        cars.retain(|car| car.id != id);
        let removed = before - cars.len();
        debug!("Deleted {} car(s) with id {}", removed, id);
        Ok(removed)
    }

    /// Cars passing every filter in `query`, in insertion order.
    pub fn search(&self, query: &SearchQuery) -> Result<Vec<Car>> {
        let results = query.apply(self.list()?);
        debug!("Search {:?} matched {} car(s)", query, results.len());
        Ok(results)
    }
}
