use crate::models::{CatalogItem, ItemId};
use serde::{Deserialize, Serialize};

/// Represents one line of the cart: an item and how many of it
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CartLine {
    /// Copy of the catalog item the line was created from
    pub item: CatalogItem,
    /// Quantity, always at least 1
    pub quantity: u32,
}

impl CartLine {
    /// Creates a new CartLine
    pub fn new(item: CatalogItem, quantity: u32) -> Self {
        Self { item, quantity }
    }

    /// Identifier of the item on this line
    pub fn item_id(&self) -> ItemId {
        self.item.id
    }

    /// Unit price times quantity
    pub fn line_total(&self) -> u64 {
        self.item.price.saturating_mul(u64::from(self.quantity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cart_line_total() {
        let line = CartLine::new(CatalogItem::new(1, "Fries", 99, "sides"), 3);

        assert_eq!(line.item_id(), 1);
        assert_eq!(line.quantity, 3);
        assert_eq!(line.line_total(), 297);
    }
}
