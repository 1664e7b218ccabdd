use super::{page_object, BasePage, CheckoutInfoPage, PageObject, ProductsPage};
use crate::locator::{xpath_literal, Locator, Strategy};
use crate::result::{ProbeError, ProbeResult};
use rand::seq::IndexedRandom;
use rand::Rng;
use tracing::info;

/// The shopping cart
#[derive(Debug, Clone)]
pub struct CartPage {
    base: BasePage,
}

page_object!(CartPage, "cart", |urls| urls.cart());

impl CartPage {
    /// Checkout button
    pub const CHECKOUT: Locator = Locator::id("checkout");
    /// Continue shopping button
    pub const CONTINUE_SHOPPING: Locator = Locator::id("continue-shopping");
    /// Page title
    pub const TITLE: Locator = Locator::xpath("//span[@class='title' and text()='Your Cart']");
    /// Every "Remove" button in the cart
    pub const REMOVE_BUTTONS: Locator = Locator::xpath(
        "//button[contains(@class, 'btn_secondary') and contains (text(), 'Remove')]",
    );
    /// Every item name in the cart
    pub const ITEM_NAMES: Locator = Locator::class_name("inventory_item_name");
    /// Item name, relative to the row's "Remove" button
    pub const NAME_FROM_REMOVE: Locator = Locator::xpath(
        "./ancestor::div[@class='cart_item_label']//div[@class='inventory_item_name']",
    );

    /// Locator of the cart row named exactly `name`
    #[must_use]
    pub fn item_locator(name: &str) -> Locator {
        Locator::new(
            Strategy::XPath,
            format!(
                "//div[@class='inventory_item_name' and text()={}]",
                xpath_literal(name)
            ),
        )
    }

    /// Whether the "Your Cart" title shows
    pub async fn is_displayed(&self) -> bool {
        self.base.is_displayed(&Self::TITLE).await
    }

    /// Whether a row named `name` shows
    pub async fn contains_item(&self, name: &str) -> bool {
        self.base.is_displayed(&Self::item_locator(name)).await
    }

    /// Names of all rows in display order
    pub async fn item_names(&self) -> ProbeResult<Vec<String>> {
        let labels = self.find_all_visible(&Self::ITEM_NAMES).await?;
        let mut names = Vec::with_capacity(labels.len());
        for label in &labels {
            names.push(self.element_text(label).await?);
        }
        Ok(names)
    }

    /// Remove one row chosen at random; returns its name
    pub async fn remove_random_item<R: Rng + ?Sized>(&self, rng: &mut R) -> ProbeResult<String> {
        let buttons = self.find_all_visible(&Self::REMOVE_BUTTONS).await?;
        let button = buttons
            .choose(rng)
            .ok_or_else(|| ProbeError::assertion("cart is empty"))?;
        let label = self.find_within(button, &Self::NAME_FROM_REMOVE).await?;
        let name = self.element_text(&label).await?;
        self.click_element(button).await?;
        info!(%name, "removed from cart");
        Ok(name)
    }

    /// Back to the catalogue
    pub async fn continue_shopping(&self) -> ProbeResult<ProductsPage> {
        self.click_when_clickable(&Self::CONTINUE_SHOPPING).await?;
        info!(page = ProductsPage::NAME, "navigate");
        Ok(self.page())
    }

    /// Start checkout; fails unless the browser lands on step one
    pub async fn checkout(&self) -> ProbeResult<CheckoutInfoPage> {
        self.click_when_clickable(&Self::CHECKOUT).await?;
        self.wait_for_url(&CheckoutInfoPage::url(self.urls())).await?;
        info!(page = CheckoutInfoPage::NAME, "navigate");
        Ok(self.page())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_locator_quotes_name() {
        let locator = CartPage::item_locator("Sauce Labs Onesie");
        assert_eq!(
            locator.selector(),
            "//div[@class='inventory_item_name' and text()='Sauce Labs Onesie']"
        );
    }

    #[test]
    fn test_item_locator_with_apostrophe() {
        let locator = CartPage::item_locator("Bob's Mug");
        assert!(locator.selector().ends_with("text()=\"Bob's Mug\"]"));
    }
}
