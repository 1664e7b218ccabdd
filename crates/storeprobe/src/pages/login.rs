use super::{page_object, BasePage, PageObject, ProductsPage};
use crate::locator::Locator;
use crate::result::{ProbeError, ProbeResult};
use tracing::info;

/// Where a login attempt ended up
#[derive(Debug)]
pub enum LoginOutcome {
    /// Credentials accepted, catalogue shown
    Products(ProductsPage),
    /// Credentials refused; the login page now shows an error
    Rejected(LoginPage),
}

impl LoginOutcome {
    /// The catalogue, or an assertion failure carrying the login error
    pub async fn into_products(self) -> ProbeResult<ProductsPage> {
        match self {
            Self::Products(page) => Ok(page),
            Self::Rejected(page) => {
                let error = page.error_message().await.unwrap_or_default();
                Err(ProbeError::assertion(format!(
                    "expected login to succeed, it was rejected: {error}"
                )))
            }
        }
    }

    /// The rejected login page, or an assertion failure
    pub fn into_rejected(self) -> ProbeResult<LoginPage> {
        match self {
            Self::Rejected(page) => Ok(page),
            Self::Products(_) => Err(ProbeError::assertion(
                "expected login to be rejected, it succeeded",
            )),
        }
    }
}

/// The login screen at the site root
#[derive(Debug, Clone)]
pub struct LoginPage {
    base: BasePage,
}

page_object!(LoginPage, "login", |urls| urls.login().to_string());

impl LoginPage {
    /// Username input
    pub const USERNAME: Locator = Locator::id("user-name");
    /// Password input
    pub const PASSWORD: Locator = Locator::id("password");
    /// Submit button
    pub const LOGIN_BUTTON: Locator = Locator::id("login-button");
    /// Error banner
    pub const ERROR: Locator = Locator::xpath("//h3[@data-test='error']");
    /// Form container
    pub const LOGIN_BOX: Locator = Locator::class_name("login-box");

    /// Navigate to the login screen
    pub async fn open_login(&self) -> ProbeResult<()> {
        self.open(self.urls().login()).await
    }

    /// Submit credentials and wait until either the catalogue loads or an
    /// error banner appears
    pub async fn login(&self, username: &str, password: &str) -> ProbeResult<LoginOutcome> {
        self.set_text(&Self::USERNAME, username).await?;
        self.set_text(&Self::PASSWORD, password).await?;
        self.click_when_clickable(&Self::LOGIN_BUTTON).await?;

        let inventory = ProductsPage::url(self.urls());
        let base = &self.base;
        let target = inventory.as_str();
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
                info!(username, page = ProductsPage::NAME, "logged in");
                Ok(LoginOutcome::Products(self.page()))
            }
            Some(false) => {
                info!(username, "login rejected");
                Ok(LoginOutcome::Rejected(self.clone()))
            }
            None => Err(ProbeError::UrlMismatch {
                expected: inventory.clone(),
                actual: self.current_url().await.unwrap_or_default(),
                timeout_ms: self.session().wait().timeout_ms,
            }),
        }
    }

    /// Text of the error banner
    pub async fn error_message(&self) -> ProbeResult<String> {
        self.text(&Self::ERROR).await
    }

    /// Whether the login form is showing
    pub async fn is_login_box_visible(&self) -> bool {
        self.is_displayed(&Self::LOGIN_BOX).await
    }
}
