use super::{page_object, BasePage};
use crate::locator::Locator;

/// Order confirmation
#[derive(Debug, Clone)]
pub struct CheckoutCompletePage {
    base: BasePage,
}

page_object!(CheckoutCompletePage, "checkout complete", |urls| urls
    .checkout_complete());

impl CheckoutCompletePage {
    /// "Thank you for your order!" heading
    pub const HEADER: Locator = Locator::class_name("complete-header");

    /// Whether the confirmation heading shows
    pub async fn is_thank_you_displayed(&self) -> bool {
        self.is_displayed(&Self::HEADER).await
    }
}
