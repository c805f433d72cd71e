mod address;
mod cart_line;
mod category;
mod item;
mod order;

pub use address::AddressRecord;
pub use cart_line::CartLine;
pub use category::Category;
pub use item::{CatalogItem, ItemId};
pub use order::{OrderRequest, PlacementReceipt};
