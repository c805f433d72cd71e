//! Page-level controller tying catalog, cart and checkout together

use crate::api::identity::IdentityProvider;
use crate::config::StoreConfig;
use crate::core::cart::{CartSnapshot, CartStore, DeliveryPolicy};
use crate::core::catalog::CatalogIndex;
use crate::core::checkout::CheckoutFlow;
use crate::core::error::Error;
use crate::core::placement::{OrderPlacer, SimulatedPlacer};
use crate::core::search::FuzzyMatcher;
use crate::core::types::PaymentMethod;
use crate::models::{AddressRecord, CatalogItem, ItemId, PlacementReceipt};
use crate::Result;

use log::{debug, info};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use uuid::Uuid;

/// What the item list is currently showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewMode {
    /// Items of one category
    Browse {
        /// Active category id
        category: String,
    },
    /// Fuzzy search results
    Search {
        /// Query text as entered
        query: String,
    },
}

/// Result of asking to enter checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutGate {
    /// Checkout opened with a frozen snapshot of the cart
    Opened,
    /// Nobody is signed in; the sign-in overlay was opened instead
    SignInRequired,
    /// The cart is empty; nothing was opened
    EmptyCart,
}

/// Placement running on the tokio runtime, started by `start_placement`.
///
/// The checkout session stays in flight until the outcome of `wait` is
/// handed to `Storefront::finish_placement`. Dropping this without doing so
/// leaves the session locked on the payment step until checkout is closed.
#[derive(Debug)]
#[must_use = "the placement outcome must be passed to finish_placement"]
pub struct PendingPlacement {
    session_id: Uuid,
    handle: JoinHandle<Result<PlacementReceipt>>,
}

impl PendingPlacement {
    /// Checkout session the placement belongs to
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Waits for the placer to finish
    pub async fn wait(self) -> (Uuid, Result<PlacementReceipt>) {
        let outcome = match self.handle.await {
            Ok(outcome) => outcome,
            Err(err) => Err(Error::Placement(format!("Placement task failed: {}", err))),
        };
        (self.session_id, outcome)
    }
}

/// Owner of all mutable storefront state.
///
/// Every operation goes through `&mut self`, so a single owner serializes
/// cart and checkout mutations. To share one across tasks, wrap it in a
/// `tokio::sync::Mutex`.
pub struct Storefront {
    config: StoreConfig,
    catalog: CatalogIndex,
    cart: CartStore,
    checkout: CheckoutFlow,
    placer: Arc<dyn OrderPlacer>,
    identity: Box<dyn IdentityProvider>,
    active_category: String,
    search_query: String,
    selected: Option<ItemId>,
    selector_quantity: u32,
    cart_open: bool,
    auth_open: bool,
}

impl Storefront {
    /// Creates a storefront with an explicit order placer
    pub fn new(
        config: StoreConfig,
        catalog: CatalogIndex,
        identity: Box<dyn IdentityProvider>,
        placer: Arc<dyn OrderPlacer>,
    ) -> Result<Self> {
        config.validate()?;

        let catalog = catalog.with_matcher(FuzzyMatcher::from_config(&config));
        let cart = CartStore::new(DeliveryPolicy::from_config(&config));
        let active_category = config.default_category.clone();

        let mut storefront = Self {
            config,
            catalog,
            cart,
            checkout: CheckoutFlow::new(),
            placer,
            identity,
            active_category,
            search_query: String::new(),
            selected: None,
            selector_quantity: 1,
            cart_open: false,
            auth_open: false,
        };
        storefront.select_first_visible();
        Ok(storefront)
    }

    /// Creates a storefront using the simulated order placer
    pub fn with_simulated_placer(
        config: StoreConfig,
        catalog: CatalogIndex,
        identity: Box<dyn IdentityProvider>,
    ) -> Result<Self> {
        let placer = Arc::new(SimulatedPlacer::from_config(&config));
        Self::new(config, catalog, identity, placer)
    }

    /// Configuration in use
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// The catalog
    pub fn catalog(&self) -> &CatalogIndex {
        &self.catalog
    }

    // Browsing

    /// Current view mode; a non-blank query overrides the category
    pub fn view_mode(&self) -> ViewMode {
        if self.search_query.trim().is_empty() {
            ViewMode::Browse {
                category: self.active_category.clone(),
            }
        } else {
            ViewMode::Search {
                query: self.search_query.clone(),
            }
        }
    }

    /// Items to display for the current view mode
    pub fn visible_items(&self) -> Vec<&CatalogItem> {
        match self.view_mode() {
            ViewMode::Browse { category } => self.catalog.by_category(&category),
            ViewMode::Search { query } => self.catalog.search(&query),
        }
    }

    /// Active category id
    pub fn active_category(&self) -> &str {
        &self.active_category
    }

    /// Current search text
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// Switches category and selects its first item
    pub fn set_category(&mut self, category_id: impl Into<String>) {
        self.active_category = category_id.into();
        debug!("Active category set to {}", self.active_category);
        self.select_first_visible();
    }

    /// Updates the search text and selects the best match
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
        debug!("Search query set to {:?}", self.search_query);
        self.select_first_visible();
    }

    /// Selects an item and resets the quantity selector; false if unknown
    pub fn select_product(&mut self, item_id: ItemId) -> bool {
        if self.catalog.get(item_id).is_none() {
            debug!("Ignoring selection of unknown item {}", item_id);
            return false;
        }
        self.selected = Some(item_id);
        self.selector_quantity = 1;
        true
    }

    /// Clears the selected item
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Currently selected item
    pub fn selected_product(&self) -> Option<&CatalogItem> {
        self.selected.and_then(|id| self.catalog.get(id))
    }

    /// Quantity shown in the product detail selector
    pub fn selector_quantity(&self) -> u32 {
        self.selector_quantity
    }

    /// Raises the selector quantity by one
    pub fn increment_quantity(&mut self) {
        self.selector_quantity = self.selector_quantity.saturating_add(1);
    }

    /// Lowers the selector quantity by one, never below 1
    pub fn decrement_quantity(&mut self) {
        self.selector_quantity = self.selector_quantity.saturating_sub(1).max(1);
    }

    fn select_first_visible(&mut self) {
        let first = self.visible_items().first().map(|item| item.id);
        if let Some(id) = first {
            self.selected = Some(id);
            self.selector_quantity = 1;
        }
    }

    // Cart

    /// Adds the selected item at the selector quantity; false if nothing is selected
    pub fn add_selected_to_cart(&mut self) -> bool {
        match self.selected {
            Some(id) => self.add_to_cart(id, self.selector_quantity),
            None => false,
        }
    }

    /// Adds an item by id; false if the id is not in the catalog
    pub fn add_to_cart(&mut self, item_id: ItemId, quantity: u32) -> bool {
        match self.catalog.get(item_id) {
            Some(item) => {
                self.cart.add_item(item, quantity);
                true
            }
            None => {
                debug!("Ignoring add of unknown item {}", item_id);
                false
            }
        }
    }

    /// Sets a cart line's quantity; zero or less removes it
    pub fn update_quantity(&mut self, item_id: ItemId, quantity: i64) {
        self.cart.set_quantity(item_id, quantity);
    }

    /// Removes a cart line
    pub fn remove_from_cart(&mut self, item_id: ItemId) {
        self.cart.remove_item(item_id);
    }

    /// The cart
    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// Live cart totals
    pub fn cart_snapshot(&self) -> CartSnapshot {
        self.cart.snapshot()
    }

    /// Badge count: sum of all quantities
    pub fn cart_count(&self) -> u64 {
        self.cart.item_count()
    }

    // Overlays

    /// Opens the cart overlay
    pub fn open_cart(&mut self) {
        self.cart_open = true;
    }

    /// Closes the cart overlay
    pub fn close_cart(&mut self) {
        self.cart_open = false;
    }

    /// Checks if the cart overlay is open
    pub fn is_cart_open(&self) -> bool {
        self.cart_open
    }

    /// Opens the sign-in overlay
    pub fn open_auth(&mut self) {
        self.auth_open = true;
    }

    /// Closes the sign-in overlay
    pub fn close_auth(&mut self) {
        self.auth_open = false;
    }

    /// Checks if the sign-in overlay is open
    pub fn is_auth_open(&self) -> bool {
        self.auth_open
    }

    /// Checks if the checkout overlay is open
    pub fn is_checkout_open(&self) -> bool {
        self.checkout.is_open()
    }

    // Identity

    /// Identity provider in use
    pub fn identity(&self) -> &dyn IdentityProvider {
        self.identity.as_ref()
    }

    /// Swaps the identity provider, e.g. after sign-in or sign-out
    pub fn set_identity(&mut self, identity: Box<dyn IdentityProvider>) {
        self.identity = identity;
        if self.identity.is_signed_in() {
            self.auth_open = false;
        }
    }

    // Checkout

    /// Enters checkout from the cart.
    ///
    /// Requires a non-empty cart and a signed-in user. The cart total is
    /// frozen for the lifetime of the checkout session.
    pub fn request_checkout(&mut self) -> CheckoutGate {
        if self.cart.is_empty() {
            return CheckoutGate::EmptyCart;
        }

        self.cart_open = false;
        if !self.identity.is_signed_in() {
            info!("Checkout requested without a signed-in user");
            self.auth_open = true;
            return CheckoutGate::SignInRequired;
        }

        self.checkout.open(self.cart.snapshot());
        CheckoutGate::Opened
    }

    /// The checkout flow
    pub fn checkout(&self) -> &CheckoutFlow {
        &self.checkout
    }

    /// Submits the delivery address
    pub fn submit_address(&mut self, record: AddressRecord) -> Result<()> {
        self.checkout.submit_address(record)
    }

    /// Chooses the payment method
    pub fn select_payment_method(&mut self, method: PaymentMethod) -> Result<()> {
        self.checkout.select_payment_method(method)
    }

    /// Returns from payment to the address step
    pub fn checkout_back(&mut self) -> Result<()> {
        self.checkout.go_back()
    }

    /// Places the order and waits for the outcome
    pub async fn place_order(&mut self) -> Result<()> {
        let placer = Arc::clone(&self.placer);
        self.checkout.place_order(placer.as_ref()).await
    }

    /// Starts placement on the tokio runtime without waiting.
    ///
    /// Returns `Ok(None)` if a placement is already running. Feed the
    /// outcome of `PendingPlacement::wait` to `finish_placement`. Fails
    /// with `Error::InvalidState` when called outside a tokio runtime, in
    /// which case the session is left untouched.
    pub fn start_placement(&mut self) -> Result<Option<PendingPlacement>> {
        let runtime = Handle::try_current()
            .map_err(|err| Error::InvalidState(format!("No runtime to place order on: {}", err)))?;
        let Some(request) = self.checkout.begin_placement()? else {
            return Ok(None);
        };

        let session_id = request.session_id;
        let placer = Arc::clone(&self.placer);
        let handle = runtime.spawn(async move { placer.place(request).await });

        Ok(Some(PendingPlacement { session_id, handle }))
    }

    /// Applies the outcome of a placement started with `start_placement`
    pub fn finish_placement(
        &mut self,
        session_id: Uuid,
        outcome: Result<PlacementReceipt>,
    ) -> Result<()> {
        self.checkout.complete_placement(session_id, outcome)
    }

    /// Closes checkout; clears the cart if the order went through
    pub fn close_checkout(&mut self) -> Option<PlacementReceipt> {
        let receipt = self.checkout.close()?;
        self.cart.clear();
        info!("Order {} completed, cart cleared", receipt.order_id);
        Some(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::identity::StaticIdentity;
    use crate::core::types::CheckoutStep;
    use crate::models::Category;

    fn create_test_catalog() -> CatalogIndex {
        let items = vec![
            CatalogItem::new(1, "Classic Burger", 200, "burger"),
            CatalogItem::new(2, "Margherita Pizza", 150, "pizza")
                .with_description("Tomato, mozzarella and basil"),
            CatalogItem::new(3, "Double Cheese Burger", 260, "burger"),
            CatalogItem::new(4, "Farmhouse Pizza", 349, "pizza"),
        ];
        let categories = vec![
            Category::new("burger", "Burgers"),
            Category::new("pizza", "Pizzas"),
            Category::new("desserts", "Desserts"),
        ];
        CatalogIndex::new(items, categories).unwrap()
    }

    fn create_storefront(identity: StaticIdentity) -> Storefront {
        Storefront::with_simulated_placer(
            StoreConfig::default(),
            create_test_catalog(),
            Box::new(identity),
        )
        .unwrap()
    }

    #[test]
    fn test_initial_selection_is_first_item_of_default_category() {
        let storefront = create_storefront(StaticIdentity::anonymous());

        assert_eq!(storefront.active_category(), "burger");
        assert_eq!(storefront.selected_product().map(|i| i.id), Some(1));
        assert_eq!(storefront.selector_quantity(), 1);
    }

    #[test]
    fn test_empty_query_matches_category_view() {
        let mut storefront = create_storefront(StaticIdentity::anonymous());
        storefront.set_category("pizza");

        let browse: Vec<ItemId> = storefront.visible_items().iter().map(|i| i.id).collect();

        storefront.set_search_query("   ");
        let blank: Vec<ItemId> = storefront.visible_items().iter().map(|i| i.id).collect();

        assert_eq!(browse, blank);
        assert_eq!(
            storefront.view_mode(),
            ViewMode::Browse {
                category: "pizza".to_string()
            }
        );
    }

    #[test]
    fn test_search_overrides_category_and_selects_best_match() {
        let mut storefront = create_storefront(StaticIdentity::anonymous());
        storefront.increment_quantity();

        storefront.set_search_query("piza");

        let ids: Vec<ItemId> = storefront.visible_items().iter().map(|i| i.id).collect();
        assert!(ids.contains(&2));
        assert!(ids.contains(&4));
        assert!(!ids.contains(&1));
        assert_eq!(storefront.selected_product().map(|i| i.id), ids.first().copied());
        assert_eq!(storefront.selector_quantity(), 1);
    }

    #[test]
    fn test_empty_result_keeps_previous_selection() {
        let mut storefront = create_storefront(StaticIdentity::anonymous());

        storefront.set_category("desserts");

        assert!(storefront.visible_items().is_empty());
        assert_eq!(storefront.selected_product().map(|i| i.id), Some(1));
    }

    #[test]
    fn test_selector_quantity_floor() {
        let mut storefront = create_storefront(StaticIdentity::anonymous());

        storefront.decrement_quantity();
        assert_eq!(storefront.selector_quantity(), 1);

        storefront.increment_quantity();
        storefront.increment_quantity();
        assert!(storefront.add_selected_to_cart());
        assert_eq!(storefront.cart().quantity_of(1), Some(3));

        assert!(storefront.select_product(3));
        assert_eq!(storefront.selector_quantity(), 1);
        assert!(!storefront.select_product(99));
    }

    #[test]
    fn test_checkout_gating() {
        let mut storefront = create_storefront(StaticIdentity::anonymous());
        assert_eq!(storefront.request_checkout(), CheckoutGate::EmptyCart);

        storefront.add_to_cart(1, 1);
        storefront.open_cart();
        assert_eq!(storefront.request_checkout(), CheckoutGate::SignInRequired);
        assert!(storefront.is_auth_open());
        assert!(!storefront.is_cart_open());
        assert!(!storefront.is_checkout_open());

        storefront.set_identity(Box::new(StaticIdentity::signed_in("asha@example.com")));
        assert!(!storefront.is_auth_open());
        assert_eq!(storefront.request_checkout(), CheckoutGate::Opened);
        assert!(storefront.is_checkout_open());
    }

    #[test]
    fn test_snapshot_frozen_while_checkout_open() {
        let mut storefront = create_storefront(StaticIdentity::signed_in("asha@example.com"));
        storefront.add_to_cart(1, 2);
        storefront.add_to_cart(2, 1);
        storefront.request_checkout();

        storefront.add_to_cart(3, 4);

        let session = storefront.checkout().session().unwrap();
        assert_eq!(session.snapshot.subtotal, 550);
        assert_eq!(storefront.cart_snapshot().subtotal, 1590);
    }

    #[test]
    fn test_unknown_item_is_noop() {
        let mut storefront = create_storefront(StaticIdentity::anonymous());

        assert!(!storefront.add_to_cart(42, 1));
        storefront.update_quantity(42, 3);
        storefront.remove_from_cart(42);

        assert!(storefront.cart().is_empty());
        assert_eq!(storefront.cart_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_completed_order_clears_cart_on_close() {
        let mut storefront = create_storefront(StaticIdentity::signed_in("asha@example.com"));
        storefront.add_to_cart(1, 2);
        storefront.request_checkout();
        storefront
            .submit_address(AddressRecord::new("12 Marine Drive", "+91 98765 43210"))
            .unwrap();

        storefront.place_order().await.unwrap();
        assert_eq!(storefront.checkout().step(), Some(CheckoutStep::Success));
        assert_eq!(storefront.cart_count(), 2);

        let receipt = storefront.close_checkout().unwrap();
        assert_eq!(receipt.total, 440);
        assert!(storefront.cart().is_empty());
        assert!(!storefront.is_checkout_open());
    }

    #[test]
    fn test_start_placement_outside_runtime_leaves_session_idle() {
        let mut storefront = create_storefront(StaticIdentity::signed_in("asha@example.com"));
        storefront.add_to_cart(1, 1);
        storefront.request_checkout();
        storefront
            .submit_address(AddressRecord::new("12 Marine Drive", "+91 98765 43210"))
            .unwrap();

        let result = storefront.start_placement();

        assert!(matches!(result, Err(Error::InvalidState(_))));
        assert!(!storefront.checkout().is_placing());
        storefront.select_payment_method(PaymentMethod::Card).unwrap();
        storefront.checkout_back().unwrap();
    }

    #[test]
    fn test_abandoned_checkout_keeps_cart() {
        let mut storefront = create_storefront(StaticIdentity::signed_in("asha@example.com"));
        storefront.add_to_cart(1, 2);
        storefront.request_checkout();

        assert_eq!(storefront.close_checkout(), None);
        assert_eq!(storefront.cart_count(), 2);
    }
}
