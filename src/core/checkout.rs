//! Checkout session and step state machine
//!
//! Address -> Payment -> Success, with Payment -> Address for corrections.
//! Success is terminal until the session is closed. Placing an order is split
//! into `begin_placement` and `complete_placement` so the backend call can run
//! without holding the flow; `place_order` composes the two.

use crate::core::cart::CartSnapshot;
use crate::core::error::Error;
use crate::core::placement::OrderPlacer;
use crate::core::types::{CheckoutStep, PaymentMethod, PlacementStatus};
use crate::models::{AddressRecord, OrderRequest, PlacementReceipt};
use crate::Result;

use chrono::Utc;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Message shown when required address fields are blank
const MISSING_FIELDS_MESSAGE: &str = "Please fill in all required fields.";

/// State of one checkout attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Unique identifier for the session
    pub id: Uuid,
    /// Current step
    pub step: CheckoutStep,
    /// Last accepted delivery address
    pub address: AddressRecord,
    /// Chosen payment method
    pub payment_method: PaymentMethod,
    /// Cart contents and totals frozen when the session opened
    pub snapshot: CartSnapshot,
    /// Whether a placement call is running
    pub placement: PlacementStatus,
    /// Reason the last placement attempt failed, if it did
    pub last_error: Option<String>,
    /// Receipt of the placed order, set on Success
    pub receipt: Option<PlacementReceipt>,
    /// Unix timestamp when the session opened
    pub opened_timestamp: u64,
}

impl CheckoutSession {
    fn new(snapshot: CartSnapshot) -> Self {
        Self {
            id: Uuid::new_v4(),
            step: CheckoutStep::Address,
            address: AddressRecord::default(),
            payment_method: PaymentMethod::default(),
            snapshot,
            placement: PlacementStatus::Idle,
            last_error: None,
            receipt: None,
            opened_timestamp: Utc::now().timestamp() as u64,
        }
    }

    /// Checks if a placement call is running
    pub fn is_placing(&self) -> bool {
        self.placement == PlacementStatus::InFlight
    }

    fn transition(&mut self, to: CheckoutStep) -> Result<()> {
        if !self.step.can_transition_to(to) {
            return Err(Error::InvalidState(format!(
                "Invalid checkout transition: from {} to {}",
                self.step.as_str(),
                to.as_str()
            )));
        }
        debug!(
            "Checkout {} moved from {} to {}",
            self.id,
            self.step.as_str(),
            to.as_str()
        );
        self.step = to;
        Ok(())
    }

    fn require_step(&self, step: CheckoutStep, operation: &str) -> Result<()> {
        if self.step != step {
            return Err(Error::InvalidState(format!(
                "Cannot {} during the {} step",
                operation,
                self.step.as_str()
            )));
        }
        Ok(())
    }

    fn require_idle(&self, operation: &str) -> Result<()> {
        if self.is_placing() {
            return Err(Error::InvalidState(format!(
                "Cannot {} while the order is being placed",
                operation
            )));
        }
        Ok(())
    }
}

/// Checkout state machine; holds at most one session
#[derive(Debug, Default)]
pub struct CheckoutFlow {
    session: Option<CheckoutSession>,
}

impl CheckoutFlow {
    /// Creates a flow with no open session
    pub fn new() -> Self {
        Self { session: None }
    }

    /// Starts a fresh session, freezing `snapshot` for its lifetime
    pub fn open(&mut self, snapshot: CartSnapshot) -> &CheckoutSession {
        if let Some(previous) = &self.session {
            debug!("Replacing checkout session {}", previous.id);
        }
        let session = CheckoutSession::new(snapshot);
        info!(
            "Opened checkout {} for total {}",
            session.id, session.snapshot.total
        );
        self.session.insert(session)
    }

    /// Current session, if any
    pub fn session(&self) -> Option<&CheckoutSession> {
        self.session.as_ref()
    }

    /// Current step, if a session is open
    pub fn step(&self) -> Option<CheckoutStep> {
        self.session.as_ref().map(|session| session.step)
    }

    /// Checks if a session is open
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Checks if a placement call is running
    pub fn is_placing(&self) -> bool {
        self.session
            .as_ref()
            .map_or(false, CheckoutSession::is_placing)
    }

    /// Validates and stores the address, then moves to Payment.
    ///
    /// Blank full address or phone yields `Error::Validation` and leaves the
    /// session on the Address step.
    pub fn submit_address(&mut self, record: AddressRecord) -> Result<()> {
        let session = self.session_mut()?;
        session.require_step(CheckoutStep::Address, "submit an address")?;

        let missing = record.missing_fields();
        if !missing.is_empty() {
            warn!("Checkout {} address rejected, missing {:?}", session.id, missing);
            return Err(Error::Validation {
                message: MISSING_FIELDS_MESSAGE.to_string(),
                fields: missing,
            });
        }

        session.address = record;
        session.transition(CheckoutStep::Payment)
    }

    /// Changes the payment method; only on the Payment step
    pub fn select_payment_method(&mut self, method: PaymentMethod) -> Result<()> {
        let session = self.session_mut()?;
        session.require_step(CheckoutStep::Payment, "choose a payment method")?;
        session.require_idle("change the payment method")?;

        session.payment_method = method;
        debug!("Checkout {} payment method set to {}", session.id, method.as_str());
        Ok(())
    }

    /// Returns to the Address step, keeping the entered address
    pub fn go_back(&mut self) -> Result<()> {
        let session = self.session_mut()?;
        session.require_step(CheckoutStep::Payment, "go back")?;
        session.require_idle("go back")?;

        session.transition(CheckoutStep::Address)
    }

    /// Marks the placement as in flight and returns the request to send.
    ///
    /// Returns `Ok(None)` without side effects if a placement is already
    /// running.
    pub fn begin_placement(&mut self) -> Result<Option<OrderRequest>> {
        let session = self.session_mut()?;
        session.require_step(CheckoutStep::Payment, "place the order")?;

        if session.is_placing() {
            debug!("Checkout {} placement already in flight", session.id);
            return Ok(None);
        }

        session.placement = PlacementStatus::InFlight;
        session.last_error = None;
        info!("Checkout {} placing order", session.id);

        Ok(Some(OrderRequest::new(
            session.id,
            session.snapshot.clone(),
            session.address.clone(),
            session.payment_method,
            Utc::now().timestamp() as u64,
        )))
    }

    /// Applies the outcome of a placement started by `begin_placement`.
    ///
    /// Success moves to the Success step. Failure stays on Payment with all
    /// data kept and the reason recorded, and is returned to the caller.
    /// Outcomes for a session that is no longer open are ignored.
    pub fn complete_placement(
        &mut self,
        session_id: Uuid,
        outcome: Result<PlacementReceipt>,
    ) -> Result<()> {
        let session = match self.session.as_mut() {
            Some(session) if session.id == session_id && session.is_placing() => session,
            _ => {
                debug!("Ignoring placement outcome for stale checkout {}", session_id);
                return Ok(());
            }
        };

        session.placement = PlacementStatus::Idle;
        match outcome {
            Ok(receipt) => {
                info!("Checkout {} completed as order {}", session.id, receipt.order_id);
                session.receipt = Some(receipt);
                session.transition(CheckoutStep::Success)
            }
            Err(err) => {
                warn!("Checkout {} placement failed: {}", session.id, err);
                session.last_error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Places the order through `placer` and waits for the outcome.
    ///
    /// A no-op if a placement is already running.
    pub async fn place_order(&mut self, placer: &dyn OrderPlacer) -> Result<()> {
        let Some(request) = self.begin_placement()? else {
            return Ok(());
        };
        let session_id = request.session_id;
        let outcome = placer.place(request).await;
        self.complete_placement(session_id, outcome)
    }

    /// Tears the session down.
    ///
    /// Returns the receipt when closing after a successful placement so the
    /// owner can clear the cart. An in-flight placement is not cancelled; its
    /// outcome will be ignored.
    pub fn close(&mut self) -> Option<PlacementReceipt> {
        let session = self.session.take()?;
        match session.step {
            CheckoutStep::Success => {
                info!("Closed completed checkout {}", session.id);
                session.receipt
            }
            _ => {
                if session.is_placing() {
                    warn!("Closed checkout {} with a placement in flight", session.id);
                } else {
                    debug!("Closed checkout {} at {}", session.id, session.step.as_str());
                }
                None
            }
        }
    }

    fn session_mut(&mut self) -> Result<&mut CheckoutSession> {
        self.session
            .as_mut()
            .ok_or_else(|| Error::InvalidState("No checkout session is open".into()))
    }
}
