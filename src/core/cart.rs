//! Cart aggregation and pricing

use crate::config::StoreConfig;
use crate::models::{CartLine, CatalogItem, ItemId};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// Delivery fee rule: free strictly above the threshold, flat fee otherwise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryPolicy {
    /// Subtotal that must be exceeded for free delivery
    pub free_threshold: u64,
    /// Fee charged when the subtotal does not exceed the threshold
    pub fee: u64,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            free_threshold: 500,
            fee: 40,
        }
    }
}

impl DeliveryPolicy {
    /// Builds the policy from the store configuration
    pub fn from_config(config: &StoreConfig) -> Self {
        Self {
            free_threshold: config.free_delivery_threshold,
            fee: config.delivery_fee,
        }
    }

    /// Fee for the given subtotal
    pub fn fee_for(&self, subtotal: u64) -> u64 {
        if subtotal > self.free_threshold {
            0
        } else {
            self.fee
        }
    }

    /// How much more must be added to get free delivery (0 if already free)
    pub fn shortfall(&self, subtotal: u64) -> u64 {
        if subtotal > self.free_threshold {
            0
        } else {
            (self.free_threshold - subtotal).saturating_add(1)
        }
    }
}

/// Derived view of the cart: lines plus totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Lines in insertion order
    pub lines: Vec<CartLine>,
    /// Sum of unit price times quantity
    pub subtotal: u64,
    /// Either 0 or the policy's flat fee
    pub delivery_fee: u64,
    /// Subtotal plus delivery fee
    pub total: u64,
    /// Sum of all quantities
    pub item_count: u64,
    /// Amount still needed to waive the delivery fee
    pub amount_to_free_delivery: u64,
}

impl CartSnapshot {
    /// Number of distinct lines
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Checks if the snapshot has no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Checks if delivery is free
    pub fn has_free_delivery(&self) -> bool {
        self.delivery_fee == 0
    }
}

/// Quantity-indexed shopping cart
#[derive(Debug, Clone, Default)]
pub struct CartStore {
    /// One line per item id, in the order items were first added
    lines: Vec<CartLine>,
    /// Pricing rule used by `snapshot`
    policy: DeliveryPolicy,
}

impl CartStore {
    /// Creates an empty cart with the given delivery policy
    pub fn new(policy: DeliveryPolicy) -> Self {
        Self {
            lines: Vec::new(),
            policy,
        }
    }

    /// Adds `quantity` of an item, merging with an existing line.
    ///
    /// A quantity of zero is treated as one; callers are expected to clamp
    /// their selectors to at least one.
    pub fn add_item(&mut self, item: &CatalogItem, quantity: u32) {
        let quantity = if quantity == 0 {
            warn!("add_item called with zero quantity for item {}, using 1", item.id);
            1
        } else {
            quantity
        };

        match self.line_mut(item.id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(quantity);
                debug!("Cart line {} now has quantity {}", item.id, line.quantity);
            }
            None => {
                self.lines.push(CartLine::new(item.clone(), quantity));
                debug!("Added cart line {} with quantity {}", item.id, quantity);
            }
        }
    }

    /// Sets the quantity of an existing line; zero or less removes it.
    ///
    /// Setting a quantity for an item that is not in the cart does nothing.
    pub fn set_quantity(&mut self, item_id: ItemId, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(item_id);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.line_mut(item_id) {
            Some(line) => {
                line.quantity = quantity;
                debug!("Cart line {} set to quantity {}", item_id, quantity);
            }
            None => debug!("Ignoring quantity change for item {} not in cart", item_id),
        }
    }

    /// Removes the line for an item; no-op if absent
    pub fn remove_item(&mut self, item_id: ItemId) {
        let before = self.lines.len();
        self.lines.retain(|line| line.item_id() != item_id);
        if self.lines.len() < before {
            debug!("Removed cart line {}", item_id);
        }
    }

    /// Empties the cart
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Computes totals for the current contents
    pub fn snapshot(&self) -> CartSnapshot {
        let subtotal = self
            .lines
            .iter()
            .fold(0u64, |acc, line| acc.saturating_add(line.line_total()));
        let delivery_fee = self.policy.fee_for(subtotal);

        CartSnapshot {
            lines: self.lines.clone(),
            subtotal,
            delivery_fee,
            total: subtotal.saturating_add(delivery_fee),
            item_count: self.item_count(),
            amount_to_free_delivery: self.policy.shortfall(subtotal),
        }
    }

    /// Sum of all quantities (the cart badge count)
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Quantity of an item, if it is in the cart
    pub fn quantity_of(&self, item_id: ItemId) -> Option<u32> {
        self.lines
            .iter()
            .find(|line| line.item_id() == item_id)
            .map(|line| line.quantity)
    }

    /// Lines in insertion order
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of distinct lines
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Checks if the cart is empty
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Delivery policy in use
    pub fn policy(&self) -> DeliveryPolicy {
        self.policy
    }

    fn line_mut(&mut self, item_id: ItemId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.item_id() == item_id)
    }
}
