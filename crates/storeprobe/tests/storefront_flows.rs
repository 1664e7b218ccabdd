//! Page-object flows against the in-memory storefront

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;
use std::time::Duration;
use storeprobe::data::CheckoutInfo;
use storeprobe::driver::{MockStorefront, CATALOGUE, TAX_RATE};
use storeprobe::prelude::*;

const BASE: &str = "http://shop.local/";
const PASSWORD: &str = "secret_sauce";

fn start() -> (Arc<MockStorefront>, LoginPage) {
    start_with(MockStorefront::new(BASE), WaitPolicy::default())
}

fn start_with(shop: MockStorefront, wait: WaitPolicy) -> (Arc<MockStorefront>, LoginPage) {
    let shop = Arc::new(shop);
    let session = Session::new(shop.clone(), wait, SiteUrls::new(BASE));
    (shop, LoginPage::from_session(session))
}

async fn standard_products() -> (Arc<MockStorefront>, ProductsPage) {
    log_in_standard(start()).await
}

async fn log_in_standard(
    (shop, login): (Arc<MockStorefront>, LoginPage),
) -> (Arc<MockStorefront>, ProductsPage) {
    login.open_login().await.unwrap();
    let products = login
        .login("standard_user", PASSWORD)
        .await
        .unwrap()
        .into_products()
        .await
        .unwrap();
    (shop, products)
}

fn checkout_info() -> CheckoutInfo {
    CheckoutInfo {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        postal_code: "90210".to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn test_login_lands_on_catalogue() {
    let (shop, products) = standard_products().await;
    assert!(products.is_displayed().await);
    assert_eq!(products.title_text().await.unwrap(), "Products");
    assert_eq!(
        products.current_url().await.unwrap(),
        "http://shop.local/inventory.html"
    );
    assert_eq!(shop.logged_in_user().await.as_deref(), Some("standard_user"));
    assert_eq!(products.cart_badge_count().await.unwrap(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_locked_out_login_is_rejected() {
    let (_shop, login) = start();
    login.open_login().await.unwrap();
    let rejected = login
        .login("locked_out_user", PASSWORD)
        .await
        .unwrap()
        .into_rejected()
        .unwrap();
    assert_eq!(
        rejected.error_message().await.unwrap(),
        "Epic sadface: Sorry, this user has been locked out."
    );
    assert!(rejected.is_login_box_visible().await);
}

#[tokio::test(start_paused = true)]
async fn test_rejected_outcome_is_not_products() {
    let (_shop, login) = start();
    login.open_login().await.unwrap();
    let outcome = login.login("standard_user", "wrong_password").await.unwrap();
    assert!(matches!(outcome, LoginOutcome::Rejected(_)));
    assert!(outcome.into_products().await.is_err());
}

#[tokio::test(start_paused = true)]
async fn test_glitch_user_is_admitted_within_wait() {
    let (_shop, login) = start();
    login.open_login().await.unwrap();
    let started = tokio::time::Instant::now();
    let products = login
        .login("performance_glitch_user", PASSWORD)
        .await
        .unwrap()
        .into_products()
        .await
        .unwrap();
    assert!(started.elapsed() >= std::time::Duration::from_millis(2_500));
    assert!(products.is_displayed().await);
}

#[tokio::test(start_paused = true)]
async fn test_backpack_toggles_to_remove() {
    let (shop, products) = standard_products().await;
    assert!(products.is_add_backpack_button_displayed().await);
    products.add_backpack().await.unwrap();
    assert!(products.is_remove_backpack_button_displayed().await);
    assert_eq!(products.cart_badge_count().await.unwrap(), 1);
    assert_eq!(shop.cart_names().await, vec![CATALOGUE[0].name]);
}

#[tokio::test(start_paused = true)]
async fn test_random_items_reach_cart() {
    let (shop, products) = standard_products().await;
    let mut rng = scenario_rng();
    let names = products.add_random_products_named(&mut rng).await.unwrap();
    assert!(!names.is_empty());
    assert_eq!(products.cart_badge_count().await.unwrap(), names.len());
    assert_eq!(products.remove_button_count().await.unwrap(), names.len());
    assert_eq!(shop.cart_names().await.len(), names.len());

    let cart = products.open_cart().await.unwrap();
    assert!(cart.is_displayed().await);
    for name in &names {
        assert!(cart.contains_item(name).await, "{name} missing from cart");
    }
}

#[tokio::test(start_paused = true)]
async fn test_slow_badge_is_still_counted() {
    let shop = MockStorefront::new(BASE).with_badge_delay(Duration::from_millis(1_500));
    let (_shop, products) = log_in_standard(start_with(shop, WaitPolicy::default())).await;
    products.add_backpack().await.unwrap();

    let started = tokio::time::Instant::now();
    assert_eq!(products.cart_badge_count().await.unwrap(), 1);
    assert!(started.elapsed() >= Duration::from_millis(1_000));
}

#[tokio::test(start_paused = true)]
async fn test_badge_settle_caps_the_wait() {
    let shop = MockStorefront::new(BASE).with_badge_delay(Duration::from_millis(1_500));
    let wait = WaitPolicy::default().with_badge_settle(500);
    let (shop, products) = log_in_standard(start_with(shop, wait)).await;
    products.add_backpack().await.unwrap();

    assert_eq!(products.cart_badge_count().await.unwrap(), 0);
    assert_eq!(shop.cart_names().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_remove_random_item_from_cart() {
    let (shop, products) = standard_products().await;
    let mut rng = scenario_rng();
    let names = products.add_random_products_named(&mut rng).await.unwrap();
    let cart = products.open_cart().await.unwrap();

    let removed = cart.remove_random_item(&mut rng).await.unwrap();
    assert!(names.contains(&removed), "{removed} was never added");

    let remaining = cart.item_names().await.unwrap();
    assert_eq!(remaining.len(), names.len() - 1);
    assert!(!remaining.contains(&removed));
    let expected: Vec<String> = names.iter().filter(|n| **n != removed).cloned().collect();
    Assertion::same_items(&expected, &remaining, "cart after removal").unwrap();
    assert_eq!(shop.cart_names().await.len(), remaining.len());
    assert_eq!(cart.cart_badge_count().await.unwrap(), remaining.len());
}

#[tokio::test(start_paused = true)]
async fn test_reset_leaves_remove_buttons() {
    let (shop, products) = standard_products().await;
    products.add_backpack().await.unwrap();
    products.open_menu().await.unwrap();
    products.reset_app_state().await.unwrap();

    assert!(shop.cart_names().await.is_empty());
    assert_eq!(products.cart_badge_count().await.unwrap(), 0);
    assert_eq!(products.remove_button_count().await.unwrap(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_logout_returns_to_login() {
    let (shop, products) = standard_products().await;
    products.open_menu().await.unwrap();
    let login = products.logout().await.unwrap();
    assert!(login.is_login_box_visible().await);
    assert_eq!(login.current_url().await.unwrap(), BASE);
    assert!(shop.logged_in_user().await.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_full_checkout_totals() {
    let (shop, products) = standard_products().await;
    products.add_backpack().await.unwrap();
    let cart = products.open_cart().await.unwrap();
    assert_eq!(cart.item_names().await.unwrap(), vec![CATALOGUE[0].name]);

    let info_page = cart.checkout().await.unwrap();
    info_page.fill_form(&checkout_info()).await.unwrap();
    let overview = info_page
        .continue_checkout()
        .await
        .unwrap()
        .into_overview()
        .await
        .unwrap();

    let subtotal = overview.item_total().await.unwrap();
    let tax = overview.tax().await.unwrap();
    let total = overview.total().await.unwrap();
    assert!((subtotal - 29.99).abs() < 0.005);
    assert!((tax - (subtotal * TAX_RATE * 100.0).round() / 100.0).abs() < 0.005);
    assert!((total - (subtotal + tax)).abs() < 0.005);

    let complete = overview.finish().await.unwrap();
    assert!(complete.is_thank_you_displayed().await);
    assert!(shop.cart_names().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_missing_postal_code_is_rejected() {
    let (_shop, products) = standard_products().await;
    products.add_backpack().await.unwrap();
    let info_page = products.open_cart().await.unwrap().checkout().await.unwrap();
    let info = CheckoutInfo {
        postal_code: String::new(),
        ..checkout_info()
    };
    info_page.fill_form(&info).await.unwrap();

    let rejected = info_page
        .continue_checkout()
        .await
        .unwrap()
        .into_rejected()
        .unwrap();
    assert!(rejected.is_error_displayed().await);
    assert_eq!(
        rejected.error_text().await.unwrap(),
        "Error: Postal Code is required"
    );
    assert_eq!(
        rejected.current_url().await.unwrap(),
        "http://shop.local/checkout-step-one.html"
    );
}

#[tokio::test(start_paused = true)]
async fn test_sorting_by_price() {
    let (_shop, products) = standard_products().await;

    products.sort_by(SortOrder::Lohi).await.unwrap();
    let ascending = products.prices().await.unwrap();
    assert_eq!(ascending.len(), CATALOGUE.len());
    assert!(ascending.windows(2).all(|w| w[0] <= w[1]));

    products.sort_by(SortOrder::Hilo).await.unwrap();
    let descending = products.prices().await.unwrap();
    assert!(descending.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test(start_paused = true)]
async fn test_details_match_card() {
    let (_shop, products) = standard_products().await;
    let mut rng = scenario_rng();
    let (card, details) = products.open_random_product(&mut rng).await.unwrap();
    assert_eq!(details.summary().await.unwrap(), card);

    let products = details.back_to_products().await.unwrap();
    assert!(products.is_displayed().await);
}

#[tokio::test(start_paused = true)]
async fn test_protected_page_needs_login() {
    let (_shop, login) = start();
    login
        .open("http://shop.local/inventory.html")
        .await
        .unwrap();
    assert_eq!(login.current_url().await.unwrap(), BASE);
    assert!(login
        .error_message()
        .await
        .unwrap()
        .contains("when you are logged in"));
}
