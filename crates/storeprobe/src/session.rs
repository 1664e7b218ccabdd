//! Shared browser session handed to every page object.

use crate::driver::BrowserDriver;
use crate::wait::WaitPolicy;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Absolute storefront URLs derived from one base URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteUrls {
    base: String,
}

impl SiteUrls {
    /// Build from a base URL; a trailing slash is added when missing
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        let mut base = base.into();
        if !base.ends_with('/') {
            base.push('/');
        }
        Self { base }
    }

    /// Login screen, which is the site root
    #[must_use]
    pub fn login(&self) -> &str {
        &self.base
    }

    /// Product listing
    #[must_use]
    pub fn inventory(&self) -> String {
        self.page("inventory.html")
    }

    /// Shopping cart
    #[must_use]
    pub fn cart(&self) -> String {
        self.page("cart.html")
    }

    /// Checkout step one (customer information)
    #[must_use]
    pub fn checkout_step_one(&self) -> String {
        self.page("checkout-step-one.html")
    }

    /// Checkout step two (order overview)
    #[must_use]
    pub fn checkout_step_two(&self) -> String {
        self.page("checkout-step-two.html")
    }

    /// Order confirmation
    #[must_use]
    pub fn checkout_complete(&self) -> String {
        self.page("checkout-complete.html")
    }

    /// Details page of one product
    #[must_use]
    pub fn product_details(&self, product_id: usize) -> String {
        format!("{}?id={product_id}", self.product_details_prefix())
    }

    /// Common prefix of every product details URL
    #[must_use]
    pub fn product_details_prefix(&self) -> String {
        self.page("inventory-item.html")
    }

    /// Path of `url` relative to the base, or `None` for foreign URLs
    #[must_use]
    pub fn relative<'a>(&self, url: &'a str) -> Option<&'a str> {
        url.strip_prefix(self.base.as_str())
    }

    fn page(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }
}

/// Driver plus the wait policy and URLs every page object needs.
///
/// Cloning is cheap and every clone drives the same browser.
#[derive(Debug, Clone)]
pub struct Session {
    driver: Arc<dyn BrowserDriver>,
    wait: WaitPolicy,
    urls: SiteUrls,
}

impl Session {
    /// Create a new session
    #[must_use]
    pub fn new(driver: Arc<dyn BrowserDriver>, wait: WaitPolicy, urls: SiteUrls) -> Self {
        Self { driver, wait, urls }
    }

    /// The underlying driver
    #[must_use]
    pub fn driver(&self) -> &dyn BrowserDriver {
        self.driver.as_ref()
    }

    /// Shared handle to the underlying driver
    #[must_use]
    pub fn driver_arc(&self) -> Arc<dyn BrowserDriver> {
        Arc::clone(&self.driver)
    }

    /// Default wait policy
    #[must_use]
    pub const fn wait(&self) -> &WaitPolicy {
        &self.wait
    }

    /// Storefront URLs
    #[must_use]
    pub const fn urls(&self) -> &SiteUrls {
        &self.urls
    }
}
