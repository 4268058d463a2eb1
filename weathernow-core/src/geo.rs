use async_trait::async_trait;
use std::fmt::Debug;

use crate::{error::LocationError, model::Coordinates};

/// Source of the user's current position.
#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn locate(&self) -> Result<Coordinates, LocationError>;
}

/// A position known up front, e.g. from command-line flags. Without one the
/// service reports itself as unavailable.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPosition(Option<Coordinates>);

impl FixedPosition {
    pub fn new(coordinates: Coordinates) -> Self {
        Self(Some(coordinates))
    }

    pub fn unavailable() -> Self {
        Self(None)
    }
}

#[async_trait]
impl Geolocator for FixedPosition {
    async fn locate(&self) -> Result<Coordinates, LocationError> {
        self.0.ok_or(LocationError::Unavailable)
    }
}
