//! Entry points for the presentation layer

pub mod identity;
pub mod storefront;
