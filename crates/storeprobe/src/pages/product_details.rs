use super::{page_object, BasePage, PageObject, ProductSummary, ProductsPage};
use crate::locator::Locator;
use crate::result::ProbeResult;
use tracing::info;

/// Details page of a single product.
///
/// [`PageObject::url`] is only the prefix shared by every product; the live
/// URL adds `?id=<n>`, see [`SiteUrls::product_details`].
///
/// [`SiteUrls::product_details`]: crate::session::SiteUrls::product_details
#[derive(Debug, Clone)]
pub struct ProductDetailsPage {
    base: BasePage,
}

page_object!(ProductDetailsPage, "product details", |urls| urls
    .product_details_prefix());

impl ProductDetailsPage {
    /// Product name
    pub const NAME_LABEL: Locator =
        Locator::xpath("//div[contains(@class, 'inventory_details_name')]");
    /// Product description; the trailing space keeps it from matching the container
    pub const DESCRIPTION: Locator =
        Locator::xpath("//div[contains(@class, 'inventory_details_desc ')]");
    /// Product price
    pub const PRICE: Locator = Locator::class_name("inventory_details_price");
    /// Add to cart button
    pub const ADD_TO_CART: Locator = Locator::id("add-to-cart");
    /// Back to products button
    pub const BACK: Locator = Locator::id("back-to-products");

    /// Product name as shown in the heading
    pub async fn name(&self) -> ProbeResult<String> {
        self.text(&Self::NAME_LABEL).await
    }

    /// Product description text
    pub async fn description(&self) -> ProbeResult<String> {
        self.text(&Self::DESCRIPTION).await
    }

    /// Price as displayed, e.g. `$29.99`
    pub async fn price(&self) -> ProbeResult<String> {
        self.text(&Self::PRICE).await
    }

    /// Name, description and price together
    pub async fn summary(&self) -> ProbeResult<ProductSummary> {
        Ok(ProductSummary {
            name: self.name().await?,
            description: self.description().await?,
            price: self.price().await?,
        })
    }

    /// Put this product in the cart
    pub async fn add_to_cart(&self) -> ProbeResult<()> {
        self.click_when_clickable(&Self::ADD_TO_CART).await
    }

    /// Return to the catalogue
    pub async fn back_to_products(&self) -> ProbeResult<ProductsPage> {
        self.click_when_clickable(&Self::BACK).await?;
        info!(page = ProductsPage::NAME, "navigate");
        Ok(self.page())
    }
}
