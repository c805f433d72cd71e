use crate::core::cart::CartSnapshot;
use crate::core::types::PaymentMethod;
use crate::models::AddressRecord;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Everything the order backend needs to place an order
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct OrderRequest {
    /// Checkout session that produced this request
    pub session_id: Uuid,
    /// Cart contents and totals frozen when checkout opened
    pub snapshot: CartSnapshot,
    /// Delivery address
    pub address: AddressRecord,
    /// Chosen payment method
    pub payment_method: PaymentMethod,
    /// Unix timestamp when placement was requested
    pub requested_timestamp: u64,
}

impl OrderRequest {
    /// Creates a new OrderRequest
    pub fn new(
        session_id: Uuid,
        snapshot: CartSnapshot,
        address: AddressRecord,
        payment_method: PaymentMethod,
        requested_timestamp: u64,
    ) -> Self {
        Self {
            session_id,
            snapshot,
            address,
            payment_method,
            requested_timestamp,
        }
    }

    /// Amount to charge
    pub fn total(&self) -> u64 {
        self.snapshot.total
    }

    /// Serializes the request to the JSON body a backend would receive
    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// Confirmation returned by the order backend
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PlacementReceipt {
    /// Identifier assigned to the placed order
    pub order_id: String,
    /// Amount charged
    pub total: u64,
    /// Unix timestamp when the order was placed
    pub placed_timestamp: u64,
}

impl PlacementReceipt {
    /// Creates a new PlacementReceipt
    pub fn new(order_id: String, total: u64, placed_timestamp: u64) -> Self {
        Self {
            order_id,
            total,
            placed_timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::cart::{CartStore, DeliveryPolicy};
    use crate::models::CatalogItem;

    #[test]
    fn test_order_request_json_body() {
        let mut cart = CartStore::new(DeliveryPolicy::default());
        cart.add_item(&CatalogItem::new(1, "Margherita Pizza", 299, "pizza"), 2);

        let request = OrderRequest::new(
            Uuid::new_v4(),
            cart.snapshot(),
            AddressRecord::new("12 Marine Drive", "+91 98765 43210"),
            PaymentMethod::Upi,
            1_700_000_000,
        );

        assert_eq!(request.total(), 598);

        let body = request.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["payment_method"], "Upi");
        assert_eq!(value["snapshot"]["subtotal"], 598);
        assert_eq!(value["snapshot"]["delivery_fee"], 0);
        assert_eq!(value["requested_timestamp"], 1_700_000_000u64);
    }
}
