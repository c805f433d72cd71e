//! Order placement seam
//!
//! There is no order backend yet. `SimulatedPlacer` stands in for one: it
//! waits for a fixed latency and then accepts the order. A real integration
//! implements `OrderPlacer` and may fail; the checkout flow handles both
//! outcomes.

use crate::config::StoreConfig;
use crate::core::error::Error;
use crate::models::{OrderRequest, PlacementReceipt};
use crate::Result;

use async_trait::async_trait;
use chrono::Utc;
use log::{info, warn};
use std::time::Duration;
use uuid::Uuid;

/// Backend that accepts orders
#[async_trait]
pub trait OrderPlacer: Send + Sync {
    /// Places the order, resolving to a receipt or a placement error
    async fn place(&self, request: OrderRequest) -> Result<PlacementReceipt>;
}

/// Placeholder backend with a fixed delay
#[derive(Debug, Clone)]
pub struct SimulatedPlacer {
    /// Delay before the placement resolves
    latency: Duration,
    /// When set, every placement fails with this reason
    failure: Option<String>,
}

impl Default for SimulatedPlacer {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

impl SimulatedPlacer {
    /// Creates a placer that always succeeds after `latency`
    pub fn new(latency: Duration) -> Self {
        Self {
            latency,
            failure: None,
        }
    }

    /// Creates a placer using the configured latency
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.placement_latency())
    }

    /// Creates a placer that always fails after `latency`
    pub fn failing(latency: Duration, reason: impl Into<String>) -> Self {
        Self {
            latency,
            failure: Some(reason.into()),
        }
    }

    /// Configured delay
    pub fn latency(&self) -> Duration {
        self.latency
    }
}

#[async_trait]
impl OrderPlacer for SimulatedPlacer {
    async fn place(&self, request: OrderRequest) -> Result<PlacementReceipt> {
        tokio::time::sleep(self.latency).await;

        if let Some(reason) = &self.failure {
            warn!("Simulated placement for session {} failed: {}", request.session_id, reason);
            return Err(Error::Placement(reason.clone()));
        }

        let receipt = PlacementReceipt::new(
            Uuid::new_v4().to_string(),
            request.total(),
            Utc::now().timestamp() as u64,
        );
        info!(
            "Placed order {} for {} via {}",
            receipt.order_id,
            receipt.total,
            request.payment_method.as_str()
        );
        Ok(receipt)
    }
}
