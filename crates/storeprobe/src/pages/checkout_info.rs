use super::{page_object, BasePage, CheckoutOverviewPage, PageObject};
use crate::data::CheckoutInfo;
use crate::locator::Locator;
use crate::result::{ProbeError, ProbeResult};
use tracing::info;

/// Where submitting the customer information ended up
#[derive(Debug)]
pub enum CheckoutInfoOutcome {
    /// Form accepted, overview shown
    Overview(CheckoutOverviewPage),
    /// Validation failed; the form now shows an error
    Rejected(CheckoutInfoPage),
}

impl CheckoutInfoOutcome {
    /// The overview, or an assertion failure carrying the form error
    pub async fn into_overview(self) -> ProbeResult<CheckoutOverviewPage> {
        match self {
            Self::Overview(page) => Ok(page),
            Self::Rejected(page) => {
                let error = page.error_text().await.unwrap_or_default();
                Err(ProbeError::assertion(format!(
                    "expected checkout to continue, the form was rejected: {error}"
                )))
            }
        }
    }

    /// The rejected form, or an assertion failure
    pub fn into_rejected(self) -> ProbeResult<CheckoutInfoPage> {
        match self {
            Self::Rejected(page) => Ok(page),
            Self::Overview(_) => Err(ProbeError::assertion(
                "expected the checkout form to be rejected, it was accepted",
            )),
        }
    }
}

/// Checkout step one: customer information
#[derive(Debug, Clone)]
pub struct CheckoutInfoPage {
    base: BasePage,
}

page_object!(CheckoutInfoPage, "checkout information", |urls| urls
    .checkout_step_one());

impl CheckoutInfoPage {
    /// First name field
    pub const FIRST_NAME: Locator = Locator::id("first-name");
    /// Last name field
    pub const LAST_NAME: Locator = Locator::id("last-name");
    /// Zip/postal code field
    pub const POSTAL_CODE: Locator = Locator::id("postal-code");
    /// Submits the form
    pub const CONTINUE: Locator = Locator::id("continue");
    /// Validation error banner
    pub const ERROR: Locator = Locator::xpath("//h3[@data-test='error']");

    /// Type all three fields; empty values leave the field empty
    pub async fn fill_form(&self, info: &CheckoutInfo) -> ProbeResult<()> {
        self.set_text(&Self::FIRST_NAME, &info.first_name).await?;
        self.set_text(&Self::LAST_NAME, &info.last_name).await?;
        self.set_text(&Self::POSTAL_CODE, &info.postal_code).await
    }

    /// Submit the form and wait until either the overview loads or an error
    /// banner appears
    pub async fn continue_checkout(&self) -> ProbeResult<CheckoutInfoOutcome> {
        self.click_when_clickable(&Self::CONTINUE).await?;

        let overview = CheckoutOverviewPage::url(self.urls());
        let base = &self.base;
        let target = overview.as_str();
        let landed = base
            .session()
            .wait()
            .poll_until(move || async move {
                if base.current_url().await.is_ok_and(|url| url == target) {
                    return Ok(Some(true));
                }
                Ok(base.is_displayed_now(&Self::ERROR).await.then_some(false))
            })
            .await?;

        match landed {
            Some(true) => {
                info!(page = CheckoutOverviewPage::NAME, "navigate");
                Ok(CheckoutInfoOutcome::Overview(self.page()))
            }
            Some(false) => {
                info!("checkout information rejected");
                Ok(CheckoutInfoOutcome::Rejected(self.clone()))
            }
            None => Err(ProbeError::UrlMismatch {
                expected: overview.clone(),
                actual: self.current_url().await.unwrap_or_default(),
                timeout_ms: self.session().wait().timeout_ms,
            }),
        }
    }

    /// Whether the validation error shows
    pub async fn is_error_displayed(&self) -> bool {
        self.is_displayed(&Self::ERROR).await
    }

    /// Text of the validation error
    pub async fn error_text(&self) -> ProbeResult<String> {
        self.text(&Self::ERROR).await
    }
}
