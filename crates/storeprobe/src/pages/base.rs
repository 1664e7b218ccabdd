use super::{CartPage, LoginPage, PageObject};
use crate::driver::{BrowserDriver, ElementHandle};
use crate::locator::Locator;
use crate::result::{ProbeError, ProbeResult};
use crate::session::{Session, SiteUrls};
use crate::wait::WaitPolicy;
use tracing::{debug, info};

/// Interaction primitives shared by every page object.
///
/// All lookups wait according to the session's [`WaitPolicy`]; a lookup that
/// finds a node which detaches mid-check simply tries again on the next poll.
#[derive(Debug, Clone)]
pub struct BasePage {
    session: Session,
}

impl BasePage {
    /// Cart icon in the header
    pub const CART_ICON: Locator = Locator::id("shopping_cart_container");
    /// Item count on the cart icon, absent when the cart is empty
    pub const CART_BADGE: Locator = Locator::class_name("shopping_cart_badge");
    /// Burger menu button
    pub const MENU_BUTTON: Locator = Locator::id("react-burger-menu-btn");
    /// Side menu container
    pub const MENU_WRAP: Locator = Locator::class_name("bm-menu-wrap");
    /// Logout link in the side menu
    pub const LOGOUT_LINK: Locator = Locator::id("logout_sidebar_link");
    /// Reset App State link in the side menu
    pub const RESET_LINK: Locator = Locator::id("reset_sidebar_link");
    /// Side menu close button
    pub const MENU_CLOSE: Locator = Locator::id("react-burger-cross-btn");

    /// Wrap a session
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }

    /// The session this page drives
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Storefront URLs
    #[must_use]
    pub const fn urls(&self) -> &SiteUrls {
        self.session.urls()
    }

    fn driver(&self) -> &dyn BrowserDriver {
        self.session.driver()
    }

    const fn wait(&self) -> &WaitPolicy {
        self.session.wait()
    }

    /// Turn another page type's view of the same session into `P`
    pub(crate) fn page<P: PageObject>(&self) -> P {
        P::from_session(self.session.clone())
    }

    /// Navigate to `url`
    pub async fn open(&self, url: &str) -> ProbeResult<()> {
        debug!(url, "open");
        self.driver().navigate(url).await
    }

    /// URL of the current document
    pub async fn current_url(&self) -> ProbeResult<String> {
        self.driver().current_url().await
    }

    /// First visible match of `locator`, waiting up to the session timeout
    pub async fn find_visible(&self, locator: &Locator) -> ProbeResult<ElementHandle> {
        self.find_visible_within(locator, self.wait().timeout_ms)
            .await
    }

    /// First visible match of `locator`, waiting up to `timeout_ms`
    pub async fn find_visible_within(
        &self,
        locator: &Locator,
        timeout_ms: u64,
    ) -> ProbeResult<ElementHandle> {
        let this = self;
        self.wait()
            .with_timeout(timeout_ms)
            .poll_until(move || async move {
                not_yet(this.probe_visible(locator, None).await)
            })
            .await?
            .ok_or_else(|| not_found(locator, timeout_ms))
    }

    /// Every match of `locator`, once there is at least one and all are visible
    pub async fn find_all_visible(&self, locator: &Locator) -> ProbeResult<Vec<ElementHandle>> {
        let this = self;
        self.wait()
            .poll_until(move || async move {
                not_yet(this.probe_all_visible(locator).await)
            })
            .await?
            .ok_or_else(|| not_found(locator, self.wait().timeout_ms))
    }

    /// First match of `locator` evaluated relative to `parent`
    pub async fn find_within(
        &self,
        parent: &ElementHandle,
        locator: &Locator,
    ) -> ProbeResult<ElementHandle> {
        let this = self;
        let found = self
            .wait()
            .poll_until(move || async move {
                let matches = this.driver().query(locator, Some(parent)).await;
                not_yet(matches.map(|m| m.into_iter().next()))
            })
            .await?;
        found.ok_or_else(|| ProbeError::ElementNotFound {
            locator: format!("{locator} within {parent}"),
            timeout_ms: self.wait().timeout_ms,
        })
    }

    /// Wait until the first match of `locator` is visible and enabled, then click it
    pub async fn click_when_clickable(&self, locator: &Locator) -> ProbeResult<()> {
        let this = self;
        let handle = self
            .wait()
            .poll_until(move || async move {
                not_yet(this.probe_clickable(locator).await)
            })
            .await?
            .ok_or_else(|| not_found(locator, self.wait().timeout_ms))?;
        debug!(%locator, "click");
        self.driver().click(&handle).await
    }

    /// Wait until `element` is visible and enabled, then click it
    pub async fn click_element(&self, element: &ElementHandle) -> ProbeResult<()> {
        let this = self;
        let ready = self
            .wait()
            .poll_until(move || async move {
                let state = this.driver().state(element).await?;
                if !state.attached {
                    return Err(ProbeError::StaleElement {
                        element: element.to_string(),
                    });
                }
                Ok(state.is_clickable().then_some(()))
            })
            .await?;
        if ready.is_none() {
            return Err(ProbeError::ElementNotFound {
                locator: element.to_string(),
                timeout_ms: self.wait().timeout_ms,
            });
        }
        debug!(%element, "click");
        self.driver().click(element).await
    }

    /// Replace the content of the input at `locator` with `value`
    pub async fn set_text(&self, locator: &Locator, value: &str) -> ProbeResult<()> {
        let input = self.find_visible(locator).await?;
        debug!(%locator, len = value.len(), "set text");
        self.driver().clear(&input).await?;
        if !value.is_empty() {
            self.driver().type_text(&input, value).await?;
        }
        Ok(())
    }

    /// Text of the first visible match of `locator`
    pub async fn text(&self, locator: &Locator) -> ProbeResult<String> {
        let element = self.find_visible(locator).await?;
        self.element_text(&element).await
    }

    /// Text of an element already in hand
    pub async fn element_text(&self, element: &ElementHandle) -> ProbeResult<String> {
        self.driver().text(element).await
    }

    /// Whether `locator` becomes visible within the session timeout.
    ///
    /// Never fails: any error reads as "not displayed".
    pub async fn is_displayed(&self, locator: &Locator) -> bool {
        self.find_visible(locator).await.is_ok()
    }

    /// Whether `locator` is visible right now, without waiting
    pub async fn is_displayed_now(&self, locator: &Locator) -> bool {
        matches!(self.probe_visible(locator, None).await, Ok(Some(_)))
    }

    /// Number of visible matches of `locator` right now
    pub async fn count_displayed(&self, locator: &Locator) -> ProbeResult<usize> {
        let mut count = 0;
        for handle in self.driver().query(locator, None).await? {
            match self.driver().state(&handle).await {
                Ok(state) if state.visible => count += 1,
                Ok(_) => {}
                Err(err) if err.is_lookup_failure() => {}
                Err(err) => return Err(err),
            }
        }
        Ok(count)
    }

    /// Wait until `locator` is visible
    pub async fn wait_for_displayed(&self, locator: &Locator) -> ProbeResult<ElementHandle> {
        self.find_visible(locator).await
    }

    /// Wait until the browser shows exactly `expected`
    pub async fn wait_for_url(&self, expected: &str) -> ProbeResult<()> {
        let this = self;
        let reached = self
            .wait()
            .poll_until(move || async move {
                let url = not_yet(this.current_url().await.map(Some))?;
                Ok(url.filter(|u| u == expected).map(|_| ()))
            })
            .await?;
        if reached.is_some() {
            return Ok(());
        }
        let actual = self.current_url().await.unwrap_or_default();
        Err(ProbeError::UrlMismatch {
            expected: expected.to_string(),
            actual,
            timeout_ms: self.wait().timeout_ms,
        })
    }

    /// Choose the `<option>` with `value` in the `<select>` at `locator`
    pub async fn select_by_value(&self, locator: &Locator, value: &str) -> ProbeResult<()> {
        let select = self.find_visible(locator).await?;
        debug!(%locator, value, "select");
        self.driver().select_value(&select, value).await
    }

    /// Click the cart icon
    pub async fn open_cart(&self) -> ProbeResult<CartPage> {
        self.click_when_clickable(&Self::CART_ICON).await?;
        info!(page = CartPage::NAME, "navigate");
        Ok(self.page())
    }

    /// Number on the cart badge; 0 when no badge shows within
    /// [`WaitPolicy::badge_timeout_ms`]
    pub async fn cart_badge_count(&self) -> ProbeResult<usize> {
        let Ok(badge) = self
            .find_visible_within(&Self::CART_BADGE, self.wait().badge_timeout_ms())
            .await
        else {
            return Ok(0);
        };
        let text = match self.element_text(&badge).await {
            Ok(text) => text,
            Err(err) if err.is_lookup_failure() => return Ok(0),
            Err(err) => return Err(err),
        };
        text.trim().parse().map_err(|_| ProbeError::Parse {
            what: "cart badge count",
            text,
        })
    }

    /// Open the side menu and wait for it to show
    pub async fn open_menu(&self) -> ProbeResult<()> {
        self.click_when_clickable(&Self::MENU_BUTTON).await?;
        self.wait_for_displayed(&Self::MENU_WRAP).await?;
        Ok(())
    }

    /// Log out through the side menu, which must already be open
    pub async fn logout(&self) -> ProbeResult<LoginPage> {
        self.click_when_clickable(&Self::LOGOUT_LINK).await?;
        info!(page = LoginPage::NAME, "navigate");
        Ok(self.page())
    }

    /// Reset App State through the side menu, then close the menu
    pub async fn reset_app_state(&self) -> ProbeResult<()> {
        self.click_when_clickable(&Self::RESET_LINK).await?;
        self.click_when_clickable(&Self::MENU_CLOSE).await?;
        info!("app state reset");
        Ok(())
    }

    async fn probe_visible(
        &self,
        locator: &Locator,
        scope: Option<&ElementHandle>,
    ) -> ProbeResult<Option<ElementHandle>> {
        for handle in self.driver().query(locator, scope).await? {
            if self.driver().state(&handle).await?.visible {
                return Ok(Some(handle));
            }
        }
        Ok(None)
    }

    async fn probe_all_visible(&self, locator: &Locator) -> ProbeResult<Option<Vec<ElementHandle>>> {
        let handles = self.driver().query(locator, None).await?;
        if handles.is_empty() {
            return Ok(None);
        }
        for handle in &handles {
            if !self.driver().state(handle).await?.visible {
                return Ok(None);
            }
        }
        Ok(Some(handles))
    }

    async fn probe_clickable(&self, locator: &Locator) -> ProbeResult<Option<ElementHandle>> {
        let Some(first) = self.driver().query(locator, None).await?.into_iter().next() else {
            return Ok(None);
        };
        let state = self.driver().state(&first).await?;
        Ok(state.is_clickable().then_some(first))
    }
}

/// Stale nodes and vanished documents mean "try again", not "fail"
fn not_yet<T>(result: ProbeResult<Option<T>>) -> ProbeResult<Option<T>> {
    match result {
        Err(err) if err.is_lookup_failure() => Ok(None),
        other => other,
    }
}

fn not_found(locator: &Locator, timeout_ms: u64) -> ProbeError {
    ProbeError::ElementNotFound {
        locator: locator.to_string(),
        timeout_ms,
    }
}
