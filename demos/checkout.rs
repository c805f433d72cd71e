//! Walks through a complete checkout with the simulated order placer

use libcloudbite::{
    api::identity::StaticIdentity,
    core::{catalog::CatalogIndex, types::PaymentMethod},
    AddressRecord, CheckoutGate, Error, StoreConfig, Storefront,
};

const MENU: &str = include_str!("../data/menu.json");

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Shorter latency so the demo does not sit idle
    let config = StoreConfig {
        placement_latency_ms: 500,
        ..StoreConfig::default()
    };
    let catalog = CatalogIndex::from_json(MENU)?;
    let mut storefront = Storefront::with_simulated_placer(
        config,
        catalog,
        Box::new(StaticIdentity::anonymous()),
    )?;

    // Pick a pizza through search, despite the typo
    storefront.set_search_query("margarita piza");
    if let Some(item) = storefront.selected_product() {
        println!("Best match: {} (₹{})", item.name, item.price);
    }
    storefront.increment_quantity();
    storefront.add_selected_to_cart();

    // And a dessert from the category view
    storefront.set_search_query("");
    storefront.set_category("desserts");
    storefront.add_selected_to_cart();

    let snapshot = storefront.cart_snapshot();
    println!(
        "Cart: {} items, subtotal ₹{}, delivery ₹{}, total ₹{}",
        snapshot.item_count, snapshot.subtotal, snapshot.delivery_fee, snapshot.total
    );

    // Checkout is gated on sign-in
    if storefront.request_checkout() == CheckoutGate::SignInRequired {
        println!("Login to checkout");
        storefront.set_identity(Box::new(StaticIdentity::signed_in("asha@example.com")));
    }
    assert_eq!(storefront.request_checkout(), CheckoutGate::Opened);

    // A blank phone number is rejected and the flow stays on the address step
    match storefront.submit_address(AddressRecord::new("12 Marine Drive, Mumbai", " ")) {
        Err(Error::Validation { message, fields }) => {
            println!("Missing Information: {} {:?}", message, fields)
        }
        other => println!("Unexpected result: {:?}", other),
    }

    storefront.submit_address(
        AddressRecord::new("12 Marine Drive, Mumbai", "+91 98765 43210")
            .with_landmark("Near the promenade"),
    )?;
    storefront.select_payment_method(PaymentMethod::Upi)?;

    println!("Placing order...");
    storefront.place_order().await?;

    if let Some(receipt) = storefront.close_checkout() {
        println!("Order placed! {} for ₹{}", receipt.order_id, receipt.total);
    }
    println!("Cart now has {} items", storefront.cart_count());

    Ok(())
}
