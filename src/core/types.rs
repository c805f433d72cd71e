//! Common data types and enums

use serde::{Deserialize, Serialize};

/// Checkout step enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckoutStep {
    /// Collecting the delivery address
    Address,
    /// Choosing a payment method and placing the order
    Payment,
    /// Order has been placed
    Success,
}

impl CheckoutStep {
    /// Converts the enum to a string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Address => "address",
            CheckoutStep::Payment => "payment",
            CheckoutStep::Success => "success",
        }
    }

    /// Converts a string to a CheckoutStep enum
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "address" => Some(CheckoutStep::Address),
            "payment" => Some(CheckoutStep::Payment),
            "success" => Some(CheckoutStep::Success),
            _ => None,
        }
    }

    /// Position shown to the user ("Step 1 of 2"); Success has none
    pub fn ordinal(&self) -> Option<u8> {
        match self {
            CheckoutStep::Address => Some(1),
            CheckoutStep::Payment => Some(2),
            CheckoutStep::Success => None,
        }
    }

    /// Checks if moving from this step to `to` is allowed
    pub fn can_transition_to(&self, to: CheckoutStep) -> bool {
        matches!(
            (self, to),
            (CheckoutStep::Address, CheckoutStep::Payment)
                | (CheckoutStep::Payment, CheckoutStep::Address)
                | (CheckoutStep::Payment, CheckoutStep::Success)
        )
    }
}

/// Payment method enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaymentMethod {
    /// Pay the courier on delivery
    #[default]
    CashOnDelivery,
    /// UPI transfer
    Upi,
    /// Credit or debit card
    Card,
}

impl PaymentMethod {
    /// All methods, in the order they are offered
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::CashOnDelivery,
        PaymentMethod::Upi,
        PaymentMethod::Card,
    ];

    /// Converts the enum to a string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "cod",
            PaymentMethod::Upi => "upi",
            PaymentMethod::Card => "card",
        }
    }

    /// Converts a string to a PaymentMethod enum
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "cod" => Some(PaymentMethod::CashOnDelivery),
            "upi" => Some(PaymentMethod::Upi),
            "card" => Some(PaymentMethod::Card),
            _ => None,
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::CashOnDelivery => "Cash on Delivery",
            PaymentMethod::Upi => "UPI",
            PaymentMethod::Card => "Credit/Debit Card",
        }
    }
}

/// Order placement status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlacementStatus {
    /// No placement running
    #[default]
    Idle,
    /// A placement call is awaiting its result
    InFlight,
}
