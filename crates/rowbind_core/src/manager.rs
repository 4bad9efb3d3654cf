//! Gateway/hydrator composition root.

use crate::gateway::Gateway;
use crate::hydrator::Hydrator;

/// Binds one [`Gateway`] to one [`Hydrator`].
///
/// A `DataManager` is constructed once per storage backend and shared
/// (behind an `Arc`) by every repository working against that backend.
#[derive(Debug)]
pub struct DataManager {
    gateway: Gateway,
    hydrator: Hydrator,
}

impl DataManager {
    /// Creates a data manager from its two collaborators.
    #[must_use]
    pub fn new(gateway: Gateway, hydrator: Hydrator) -> Self {
        Self { gateway, hydrator }
    }

    /// The gateway.
    #[must_use]
    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// The hydrator.
    #[must_use]
    pub fn hydrator(&self) -> &Hydrator {
        &self.hydrator
    }
}
