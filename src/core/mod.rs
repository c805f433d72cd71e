//! Core storefront logic: cart, catalog, checkout

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod placement;
pub mod search;
pub mod types;
