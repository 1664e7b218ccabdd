use super::{
    extract_amount, page_object, BasePage, PageObject, ProductDetailsPage, ProductSummary,
    SortOrder,
};
use crate::locator::Locator;
use crate::result::{ProbeError, ProbeResult};
use rand::seq::{index, IndexedRandom};
use rand::Rng;
use tracing::{debug, info};

/// The catalogue shown after login
#[derive(Debug, Clone)]
pub struct ProductsPage {
    base: BasePage,
}

page_object!(ProductsPage, "products", |urls| urls.inventory());

impl ProductsPage {
    /// Page title
    pub const TITLE: Locator = Locator::xpath("//span[@class='title' and text()='Products']");
    /// "Add to cart" on the backpack card
    pub const ADD_BACKPACK: Locator = Locator::id("add-to-cart-sauce-labs-backpack");
    /// "Remove" on the backpack card
    pub const REMOVE_BACKPACK: Locator = Locator::id("remove-sauce-labs-backpack");
    /// Every "Add to cart" button
    pub const ADD_BUTTONS: Locator = Locator::xpath(
        "//button[contains(@class, 'btn_inventory') and contains(text(), 'Add to cart')]",
    );
    /// Every "Remove" button
    pub const REMOVE_BUTTONS: Locator = Locator::xpath(
        "//button[contains(@class, 'btn_inventory') and contains(text(), 'Remove')]",
    );
    /// Product name, relative to one of the card's buttons
    pub const NAME_FROM_BUTTON: Locator = Locator::xpath(
        "./ancestor::div[contains(@class,'inventory_item_description')]//div[contains(@class,'inventory_item_name')]",
    );
    /// Sort dropdown
    pub const SORT_SELECT: Locator = Locator::class_name("product_sort_container");
    /// Every price label
    pub const PRICES: Locator = Locator::xpath("//div[@class='inventory_item_price']");
    /// Every product card
    pub const CARDS: Locator = Locator::xpath("//div[@class='inventory_item']");
    /// Name, relative to a card
    pub const CARD_NAME: Locator = Locator::xpath(".//div[contains(@class, 'inventory_item_name')]");
    /// Description, relative to a card
    pub const CARD_DESCRIPTION: Locator = Locator::xpath(".//div[@class='inventory_item_desc']");
    /// Price, relative to a card
    pub const CARD_PRICE: Locator = Locator::xpath(".//div[@class='inventory_item_price']");

    /// Whether the "Products" title shows
    pub async fn is_displayed(&self) -> bool {
        self.base.is_displayed(&Self::TITLE).await
    }

    /// Text of the page title
    pub async fn title_text(&self) -> ProbeResult<String> {
        self.text(&Self::TITLE).await
    }

    /// Put the backpack in the cart
    pub async fn add_backpack(&self) -> ProbeResult<()> {
        self.click_when_clickable(&Self::ADD_BACKPACK).await
    }

    /// Whether the backpack's "Add to cart" button shows right now
    pub async fn is_add_backpack_button_displayed(&self) -> bool {
        self.is_displayed_now(&Self::ADD_BACKPACK).await
    }

    /// Whether the backpack's "Remove" button shows
    pub async fn is_remove_backpack_button_displayed(&self) -> bool {
        self.base.is_displayed(&Self::REMOVE_BACKPACK).await
    }

    /// Add between one and all of the addable products; returns how many
    pub async fn add_random_products<R: Rng + ?Sized>(&self, rng: &mut R) -> ProbeResult<usize> {
        let buttons = self.find_all_visible(&Self::ADD_BUTTONS).await?;
        let count = rng.random_range(1..=buttons.len());
        for i in index::sample(rng, buttons.len(), count) {
            self.click_element(&buttons[i]).await?;
        }
        info!(count, "added random products");
        Ok(count)
    }

    /// Add between two and all of the addable products; returns their names
    /// in the order they were added
    pub async fn add_random_products_named<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> ProbeResult<Vec<String>> {
        let buttons = self.find_all_visible(&Self::ADD_BUTTONS).await?;
        if buttons.len() < 2 {
            return Err(ProbeError::assertion(format!(
                "need at least 2 addable products, found {}",
                buttons.len()
            )));
        }
        let count = rng.random_range(2..=buttons.len());
        let mut names = Vec::with_capacity(count);
        for i in index::sample(rng, buttons.len(), count) {
            let button = &buttons[i];
            let name_el = self.find_within(button, &Self::NAME_FROM_BUTTON).await?;
            let name = self.element_text(&name_el).await?;
            self.click_element(button).await?;
            debug!(%name, "added to cart");
            names.push(name);
        }
        info!(count, "added random products");
        Ok(names)
    }

    /// Re-order the catalogue
    pub async fn sort_by(&self, order: SortOrder) -> ProbeResult<()> {
        self.select_by_value(&Self::SORT_SELECT, order.value()).await
    }

    /// Prices of all cards in display order
    pub async fn prices(&self) -> ProbeResult<Vec<f64>> {
        let labels = self.find_all_visible(&Self::PRICES).await?;
        let mut prices = Vec::with_capacity(labels.len());
        for label in &labels {
            let text = self.element_text(label).await?;
            prices.push(extract_amount("product price", &text)?);
        }
        Ok(prices)
    }

    /// Number of visible "Add to cart" buttons
    pub async fn add_button_count(&self) -> ProbeResult<usize> {
        self.wait_for_displayed(&Self::TITLE).await?;
        self.count_displayed(&Self::ADD_BUTTONS).await
    }

    /// Number of visible "Remove" buttons
    pub async fn remove_button_count(&self) -> ProbeResult<usize> {
        self.wait_for_displayed(&Self::TITLE).await?;
        self.count_displayed(&Self::REMOVE_BUTTONS).await
    }

    /// Read a random card, then open its details page by clicking the name
    pub async fn open_random_product<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> ProbeResult<(ProductSummary, ProductDetailsPage)> {
        let cards = self.find_all_visible(&Self::CARDS).await?;
        let card = cards
            .choose(rng)
            .ok_or_else(|| ProbeError::assertion("catalogue has no products"))?;

        let name_el = self.find_within(card, &Self::CARD_NAME).await?;
        let description_el = self.find_within(card, &Self::CARD_DESCRIPTION).await?;
        let price_el = self.find_within(card, &Self::CARD_PRICE).await?;
        let summary = ProductSummary {
            name: self.element_text(&name_el).await?,
            description: self.element_text(&description_el).await?,
            price: self.element_text(&price_el).await?,
        };

        self.click_element(&name_el).await?;
        info!(product = %summary.name, page = ProductDetailsPage::NAME, "navigate");
        Ok((summary, self.page()))
    }
}
