use super::{extract_amount, page_object, BasePage, CheckoutCompletePage, PageObject};
use crate::locator::Locator;
use crate::result::ProbeResult;
use tracing::info;

/// Checkout step two: order overview with totals
#[derive(Debug, Clone)]
pub struct CheckoutOverviewPage {
    base: BasePage,
}

page_object!(CheckoutOverviewPage, "checkout overview", |urls| urls
    .checkout_step_two());

impl CheckoutOverviewPage {
    /// "Item total: $x" label
    pub const ITEM_TOTAL: Locator = Locator::class_name("summary_subtotal_label");
    /// "Tax: $x" label
    pub const TAX: Locator = Locator::class_name("summary_tax_label");
    /// "Total: $x" label
    pub const TOTAL: Locator = Locator::class_name("summary_total_label");
    /// Places the order
    pub const FINISH: Locator = Locator::id("finish");

    /// Sum of item prices before tax
    pub async fn item_total(&self) -> ProbeResult<f64> {
        extract_amount("item total", &self.text(&Self::ITEM_TOTAL).await?)
    }

    /// Sales tax on the item total
    pub async fn tax(&self) -> ProbeResult<f64> {
        extract_amount("tax", &self.text(&Self::TAX).await?)
    }

    /// Grand total
    pub async fn total(&self) -> ProbeResult<f64> {
        extract_amount("total", &self.text(&Self::TOTAL).await?)
    }

    /// Place the order; fails unless the browser lands on the confirmation
    pub async fn finish(&self) -> ProbeResult<CheckoutCompletePage> {
        self.click_when_clickable(&Self::FINISH).await?;
        self.wait_for_url(&CheckoutCompletePage::url(self.urls()))
            .await?;
        info!(page = CheckoutCompletePage::NAME, "navigate");
        Ok(self.page())
    }
}
