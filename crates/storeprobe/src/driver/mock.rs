//! In-memory storefront for exercising page objects without a browser.
//!
//! [`MockStorefront`] renders the same screens as the real demo shop as a flat
//! list of nodes. Each node knows which page-object locators match it, either
//! page-wide or relative to another node, so lookups go through exactly the
//! selectors the page objects declare. Node ids are stable across renders and
//! a node that stops being rendered becomes stale, just like a detached DOM
//! element.
//!
//! Behaviour worth knowing about:
//! - `performance_glitch_user` is admitted only after a delay
//! - the cart badge can be made to lag behind cart changes, see
//!   [`MockStorefront::with_badge_delay`]
//! - Reset App State empties the cart but leaves the catalogue's "Remove"
//!   buttons in place until the next navigation, as the live site does
//! - pages behind the login redirect to the login screen with an error

use super::{BrowserDriver, ElementHandle, ElementState, Launcher};
use crate::locator::{Locator, Strategy};
use crate::pages::{
    BasePage, CartPage, CheckoutCompletePage, CheckoutInfoPage, CheckoutOverviewPage, LoginPage,
    ProductDetailsPage, ProductsPage, SortOrder,
};
use crate::result::{ProbeError, ProbeResult};
use crate::session::SiteUrls;
use async_trait::async_trait;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Sales tax applied at checkout
pub const TAX_RATE: f64 = 0.08;

/// Delay before `performance_glitch_user` reaches the catalogue
const GLITCH_LOGIN_DELAY: Duration = Duration::from_millis(2_500);

const PASSWORD: &str = "secret_sauce";
const LOCKED_OUT_USER: &str = "locked_out_user";
const GLITCH_USER: &str = "performance_glitch_user";
const ACCOUNTS: [&str; 6] = [
    "standard_user",
    LOCKED_OUT_USER,
    "problem_user",
    GLITCH_USER,
    "error_user",
    "visual_user",
];

/// One product of the demo catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogueItem {
    /// Id used in the details URL
    pub id: usize,
    /// Suffix of the card's button ids
    pub slug: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub price_cents: u32,
}

impl CatalogueItem {
    /// Price as the site prints it, e.g. `$29.99`
    #[must_use]
    pub fn price_label(&self) -> String {
        format!("${}", money(self.price_cents))
    }
}

/// The catalogue in name order
pub const CATALOGUE: [CatalogueItem; 6] = [
    CatalogueItem {
        id: 4,
        slug: "sauce-labs-backpack",
        name: "Sauce Labs Backpack",
        description: "carry.allTheThings() with the sleek, streamlined Sly Pack that melds uncompromising style with unequaled laptop and tablet protection.",
        price_cents: 2999,
    },
    CatalogueItem {
        id: 0,
        slug: "sauce-labs-bike-light",
        name: "Sauce Labs Bike Light",
        description: "A red light isn't the desired state in testing but it sure helps when riding your bike at night. Water-resistant with 3 lighting modes, 1 AAA battery included.",
        price_cents: 999,
    },
    CatalogueItem {
        id: 1,
        slug: "sauce-labs-bolt-t-shirt",
        name: "Sauce Labs Bolt T-Shirt",
        description: "Get your testing superhero on with the Sauce Labs bolt T-shirt. From American Apparel, 100% ringspun combed cotton, heather gray with red bolt.",
        price_cents: 1599,
    },
    CatalogueItem {
        id: 5,
        slug: "sauce-labs-fleece-jacket",
        name: "Sauce Labs Fleece Jacket",
        description: "It's not every day that you come across a midweight quarter-zip fleece jacket capable of handling everything from a relaxing day outdoors to a busy day at the office.",
        price_cents: 4999,
    },
    CatalogueItem {
        id: 2,
        slug: "sauce-labs-onesie",
        name: "Sauce Labs Onesie",
        description: "Rib snap infant onesie for the junior automation engineer in development. Reinforced 3-snap bottom closure, two-needle hemmed sleeved and bottom won't unravel.",
        price_cents: 799,
    },
    CatalogueItem {
        id: 3,
        slug: "test.allthethings()-t-shirt-(red)",
        name: "Test.allTheThings() T-Shirt (Red)",
        description: "This classic Sauce Labs t-shirt is perfect to wear when cozying up to your keyboard to automate a few tests. Super-soft and comfy ringspun combed cotton.",
        price_cents: 1599,
    },
];

fn money(cents: u32) -> String {
    format!("{}.{:02}", cents / 100, cents % 100)
}

fn tax_cents(subtotal_cents: u32) -> u32 {
    (f64::from(subtotal_cents) * TAX_RATE).round() as u32
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Screen {
    Blank(String),
    Login,
    Inventory,
    Details(usize),
    Cart,
    CheckoutInfo,
    CheckoutOverview,
    Complete,
}

impl Screen {
    const fn needs_login(&self) -> bool {
        !matches!(self, Self::Blank(_) | Self::Login)
    }

    fn url(&self, urls: &SiteUrls) -> String {
        match self {
            Self::Blank(url) => url.clone(),
            Self::Login => urls.login().to_string(),
            Self::Inventory => urls.inventory(),
            Self::Details(index) => urls.product_details(CATALOGUE[*index].id),
            Self::Cart => urls.cart(),
            Self::CheckoutInfo => urls.checkout_step_one(),
            Self::CheckoutOverview => urls.checkout_step_two(),
            Self::Complete => urls.checkout_complete(),
        }
    }

    fn parse(urls: &SiteUrls, url: &str) -> Self {
        let Some(path) = urls.relative(url) else {
            return Self::Blank(url.to_string());
        };
        match path {
            "" | "index.html" => Self::Login,
            "inventory.html" => Self::Inventory,
            "cart.html" => Self::Cart,
            "checkout-step-one.html" => Self::CheckoutInfo,
            "checkout-step-two.html" => Self::CheckoutOverview,
            "checkout-complete.html" => Self::Complete,
            other => other
                .strip_prefix("inventory-item.html?id=")
                .and_then(|id| id.parse::<usize>().ok())
                .and_then(|id| CATALOGUE.iter().position(|item| item.id == id))
                .map_or_else(|| Self::Blank(url.to_string()), Self::Details),
        }
    }

    fn path(&self) -> &'static str {
        match self {
            Self::Blank(_) | Self::Login => "/",
            Self::Inventory => "/inventory.html",
            Self::Details(_) => "/inventory-item.html",
            Self::Cart => "/cart.html",
            Self::CheckoutInfo => "/checkout-step-one.html",
            Self::CheckoutOverview => "/checkout-step-two.html",
            Self::Complete => "/checkout-complete.html",
        }
    }
}

#[derive(Debug)]
struct State {
    screen: Screen,
    pending: Option<(Instant, Screen)>,
    user: Option<String>,
    cart: Vec<usize>,
    stale_remove: BTreeSet<usize>,
    sort: SortOrder,
    menu_open: bool,
    inputs: HashMap<String, String>,
    error: Option<String>,
    closed: bool,
    history: Vec<String>,
    badge_delay: Duration,
    badge_due: Instant,
}

impl State {
    fn new() -> Self {
        Self {
            screen: Screen::Blank("about:blank".to_string()),
            pending: None,
            user: None,
            cart: Vec::new(),
            stale_remove: BTreeSet::new(),
            sort: SortOrder::Az,
            menu_open: false,
            inputs: HashMap::new(),
            error: None,
            closed: false,
            history: Vec::new(),
            badge_delay: Duration::ZERO,
            badge_due: Instant::now(),
        }
    }

    /// Apply a delayed navigation once it is due
    fn settle(&mut self) {
        if let Some((at, _)) = &self.pending {
            if Instant::now() >= *at {
                if let Some((_, screen)) = self.pending.take() {
                    self.show(screen);
                }
            }
        }
    }

    fn show(&mut self, screen: Screen) {
        if screen.needs_login() && self.user.is_none() {
            self.error = Some(format!(
                "Epic sadface: You can only access '{}' when you are logged in.",
                screen.path()
            ));
            self.screen = Screen::Login;
        } else {
            self.error = None;
            self.screen = screen;
        }
        self.pending = None;
        self.menu_open = false;
        self.stale_remove.clear();
        self.inputs.clear();
    }

    fn input(&self, field: &str) -> &str {
        self.inputs.get(field).map_or("", String::as_str)
    }

    fn catalogue_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..CATALOGUE.len()).collect();
        match self.sort {
            SortOrder::Az => order.sort_by_key(|&i| CATALOGUE[i].name),
            SortOrder::Za => order.sort_by_key(|&i| std::cmp::Reverse(CATALOGUE[i].name)),
            SortOrder::Lohi => order.sort_by_key(|&i| (CATALOGUE[i].price_cents, CATALOGUE[i].name)),
            SortOrder::Hilo => order.sort_by_key(|&i| {
                (
                    std::cmp::Reverse(CATALOGUE[i].price_cents),
                    CATALOGUE[i].name,
                )
            }),
        }
        order
    }

    fn shows_remove(&self, index: usize) -> bool {
        self.cart.contains(&index) || self.stale_remove.contains(&index)
    }

    fn add_to_cart(&mut self, index: usize) {
        if !self.cart.contains(&index) {
            self.cart.push(index);
            self.badge_due = Instant::now() + self.badge_delay;
        }
    }

    fn remove_from_cart(&mut self, index: usize) {
        if !self.stale_remove.remove(&index) {
            self.cart.retain(|&i| i != index);
            self.badge_due = Instant::now() + self.badge_delay;
        }
    }

    fn badge_rendered(&self) -> bool {
        !self.cart.is_empty() && Instant::now() >= self.badge_due
    }

    fn submit_login(&mut self) {
        let username = self.input("user-name").to_string();
        let password = self.input("password").to_string();
        let known = ACCOUNTS.contains(&username.as_str());

        let error = if username.is_empty() {
            Some("Epic sadface: Username is required")
        } else if password.is_empty() {
            Some("Epic sadface: Password is required")
        } else if !known || password != PASSWORD {
            Some("Epic sadface: Username and password do not match any user in this service")
        } else if username == LOCKED_OUT_USER {
            Some("Epic sadface: Sorry, this user has been locked out.")
        } else {
            None
        };

        if let Some(error) = error {
            self.error = Some(error.to_string());
            return;
        }
        let glitch = username == GLITCH_USER;
        self.user = Some(username);
        if glitch {
            self.pending = Some((Instant::now() + GLITCH_LOGIN_DELAY, Screen::Inventory));
        } else {
            self.show(Screen::Inventory);
        }
    }

    fn submit_checkout_info(&mut self) {
        let error = if self.input("first-name").is_empty() {
            Some("Error: First Name is required")
        } else if self.input("last-name").is_empty() {
            Some("Error: Last Name is required")
        } else if self.input("postal-code").is_empty() {
            Some("Error: Postal Code is required")
        } else {
            None
        };
        match error {
            Some(error) => self.error = Some(error.to_string()),
            None => self.show(Screen::CheckoutOverview),
        }
    }

    fn subtotal_cents(&self) -> u32 {
        self.cart.iter().map(|&i| CATALOGUE[i].price_cents).sum()
    }
}

#[derive(Debug)]
struct Node {
    id: String,
    text: String,
    visible: bool,
    global: Vec<Locator>,
    relative: Vec<(String, Locator)>,
}

impl Node {
    fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            visible: true,
            global: Vec::new(),
            relative: Vec::new(),
        }
    }

    fn matching(mut self, locator: Locator) -> Self {
        self.global.push(locator);
        self
    }

    fn within(mut self, parent: impl Into<String>, locator: Locator) -> Self {
        self.relative.push((parent.into(), locator));
        self
    }

    const fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    fn matches(&self, locator: &Locator, scope: Option<&str>) -> bool {
        match scope {
            None => self.global.contains(locator),
            Some(parent) => self
                .relative
                .iter()
                .any(|(p, l)| p == parent && l == locator),
        }
    }
}

fn render(state: &State) -> Vec<Node> {
    let mut nodes = Vec::new();
    match &state.screen {
        Screen::Blank(_) => {}
        Screen::Login => {
            nodes.push(Node::new("login-box", "").matching(LoginPage::LOGIN_BOX));
            nodes.push(Node::new("input:user-name", "").matching(LoginPage::USERNAME));
            nodes.push(Node::new("input:password", "").matching(LoginPage::PASSWORD));
            nodes.push(Node::new("login-button", "Login").matching(LoginPage::LOGIN_BUTTON));
            if let Some(error) = &state.error {
                nodes.push(Node::new("error", error.as_str()).matching(LoginPage::ERROR));
            }
        }
        Screen::Inventory => {
            render_chrome(state, &mut nodes);
            nodes.push(Node::new("title", "Products").matching(ProductsPage::TITLE));
            nodes.push(Node::new("sort", "").matching(ProductsPage::SORT_SELECT));
            for index in state.catalogue_order() {
                render_card(state, index, &mut nodes);
            }
        }
        Screen::Details(index) => {
            render_chrome(state, &mut nodes);
            let item = &CATALOGUE[*index];
            nodes.push(Node::new("details-name", item.name).matching(ProductDetailsPage::NAME_LABEL));
            nodes.push(
                Node::new("details-desc", item.description)
                    .matching(ProductDetailsPage::DESCRIPTION),
            );
            nodes.push(
                Node::new("details-price", item.price_label()).matching(ProductDetailsPage::PRICE),
            );
            if state.cart.contains(index) {
                nodes.push(Node::new("details-remove", "Remove").matching(Locator::id("remove")));
            } else {
                nodes.push(
                    Node::new("details-add", "Add to cart").matching(ProductDetailsPage::ADD_TO_CART),
                );
            }
            nodes.push(Node::new("back", "Back to products").matching(ProductDetailsPage::BACK));
        }
        Screen::Cart => {
            render_chrome(state, &mut nodes);
            nodes.push(Node::new("title", "Your Cart").matching(CartPage::TITLE));
            for &index in &state.cart {
                let item = &CATALOGUE[index];
                let remove_id = format!("cart-remove:{index}");
                nodes.push(
                    Node::new(format!("cart-name:{index}"), item.name)
                        .matching(CartPage::ITEM_NAMES)
                        .matching(CartPage::item_locator(item.name))
                        .within(remove_id.as_str(), CartPage::NAME_FROM_REMOVE),
                );
                nodes.push(Node::new(format!("cart-price:{index}"), item.price_label()));
                nodes.push(Node::new(remove_id, "Remove").matching(CartPage::REMOVE_BUTTONS));
            }
            nodes.push(
                Node::new("continue-shopping", "Continue Shopping")
                    .matching(CartPage::CONTINUE_SHOPPING),
            );
            nodes.push(Node::new("checkout", "Checkout").matching(CartPage::CHECKOUT));
        }
        Screen::CheckoutInfo => {
            render_chrome(state, &mut nodes);
            nodes.push(Node::new("input:first-name", "").matching(CheckoutInfoPage::FIRST_NAME));
            nodes.push(Node::new("input:last-name", "").matching(CheckoutInfoPage::LAST_NAME));
            nodes.push(Node::new("input:postal-code", "").matching(CheckoutInfoPage::POSTAL_CODE));
            nodes.push(Node::new("continue", "Continue").matching(CheckoutInfoPage::CONTINUE));
            if let Some(error) = &state.error {
                nodes.push(Node::new("error", error.as_str()).matching(CheckoutInfoPage::ERROR));
            }
        }
        Screen::CheckoutOverview => {
            render_chrome(state, &mut nodes);
            let subtotal = state.subtotal_cents();
            let tax = tax_cents(subtotal);
            nodes.push(
                Node::new("subtotal", format!("Item total: ${}", money(subtotal)))
                    .matching(CheckoutOverviewPage::ITEM_TOTAL),
            );
            nodes.push(
                Node::new("tax", format!("Tax: ${}", money(tax)))
                    .matching(CheckoutOverviewPage::TAX),
            );
            nodes.push(
                Node::new("total", format!("Total: ${}", money(subtotal + tax)))
                    .matching(CheckoutOverviewPage::TOTAL),
            );
            nodes.push(Node::new("finish", "Finish").matching(CheckoutOverviewPage::FINISH));
        }
        Screen::Complete => {
            render_chrome(state, &mut nodes);
            nodes.push(
                Node::new("complete-header", "Thank you for your order!")
                    .matching(CheckoutCompletePage::HEADER),
            );
        }
    }
    nodes
}

fn render_chrome(state: &State, nodes: &mut Vec<Node>) {
    nodes.push(Node::new("cart-link", "").matching(BasePage::CART_ICON));
    if state.badge_rendered() {
        nodes.push(Node::new("badge", state.cart.len().to_string()).matching(BasePage::CART_BADGE));
    }
    nodes.push(Node::new("burger", "Open Menu").matching(BasePage::MENU_BUTTON));
    let open = state.menu_open;
    nodes.push(Node::new("menu", "").matching(BasePage::MENU_WRAP).visible(open));
    nodes.push(Node::new("logout", "Logout").matching(BasePage::LOGOUT_LINK).visible(open));
    nodes.push(
        Node::new("reset", "Reset App State")
            .matching(BasePage::RESET_LINK)
            .visible(open),
    );
    nodes.push(
        Node::new("menu-close", "Close Menu")
            .matching(BasePage::MENU_CLOSE)
            .visible(open),
    );
}

fn render_card(state: &State, index: usize, nodes: &mut Vec<Node>) {
    let item = &CATALOGUE[index];
    let card = format!("card:{index}");
    let button = if state.shows_remove(index) {
        format!("remove:{index}")
    } else {
        format!("add:{index}")
    };

    nodes.push(Node::new(card.as_str(), "").matching(ProductsPage::CARDS));
    nodes.push(
        Node::new(format!("card-name:{index}"), item.name)
            .within(card.as_str(), ProductsPage::CARD_NAME)
            .within(button.as_str(), ProductsPage::NAME_FROM_BUTTON),
    );
    nodes.push(
        Node::new(format!("card-desc:{index}"), item.description)
            .within(card.as_str(), ProductsPage::CARD_DESCRIPTION),
    );
    nodes.push(
        Node::new(format!("card-price:{index}"), item.price_label())
            .matching(ProductsPage::PRICES)
            .within(card.as_str(), ProductsPage::CARD_PRICE),
    );

    let slug_id = |prefix: &str| Locator::new(Strategy::Id, format!("{prefix}-{}", item.slug));
    if state.shows_remove(index) {
        nodes.push(
            Node::new(button, "Remove")
                .matching(ProductsPage::REMOVE_BUTTONS)
                .matching(slug_id("remove")),
        );
    } else {
        nodes.push(
            Node::new(button, "Add to cart")
                .matching(ProductsPage::ADD_BUTTONS)
                .matching(slug_id("add-to-cart")),
        );
    }
}

/// Split `"kind:3"` into `("kind", Some(3))`
fn split_id(id: &str) -> (&str, Option<usize>) {
    match id.split_once(':') {
        Some((kind, rest)) => (kind, rest.parse().ok()),
        None => (id, None),
    }
}

/// Simulated storefront implementing [`BrowserDriver`]
#[derive(Debug)]
pub struct MockStorefront {
    urls: SiteUrls,
    state: Mutex<State>,
}

impl MockStorefront {
    /// Create a storefront served at `base_url`; the browser starts on `about:blank`
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            urls: SiteUrls::new(base_url),
            state: Mutex::new(State::new()),
        }
    }

    /// Render the cart badge only `delay` after the cart last changed
    #[must_use]
    pub fn with_badge_delay(mut self, delay: Duration) -> Self {
        self.state.get_mut().badge_delay = delay;
        self
    }

    /// Names of the products in the cart, in the order they were added
    pub async fn cart_names(&self) -> Vec<&'static str> {
        let state = self.state.lock().await;
        state.cart.iter().map(|&i| CATALOGUE[i].name).collect()
    }

    /// Logged-in account, if any
    pub async fn logged_in_user(&self) -> Option<String> {
        self.state.lock().await.user.clone()
    }

    /// Whether [`BrowserDriver::close`] has been called
    pub async fn is_closed(&self) -> bool {
        self.state.lock().await.closed
    }

    /// Every driver call so far, e.g. `navigate:<url>` or `click:login-button`
    pub async fn history(&self) -> Vec<String> {
        self.state.lock().await.history.clone()
    }

    /// Check if a driver method was called
    pub async fn was_called(&self, method: &str) -> bool {
        self.state
            .lock()
            .await
            .history
            .iter()
            .any(|c| c.starts_with(method))
    }

    async fn open_state(&self) -> ProbeResult<tokio::sync::MutexGuard<'_, State>> {
        let mut state = self.state.lock().await;
        if state.closed {
            return Err(ProbeError::driver("browser has been closed"));
        }
        state.settle();
        Ok(state)
    }
}

fn find_node<'a>(nodes: &'a [Node], element: &ElementHandle) -> ProbeResult<&'a Node> {
    nodes
        .iter()
        .find(|n| n.id == element.id)
        .ok_or_else(|| ProbeError::StaleElement {
            element: element.to_string(),
        })
}

#[async_trait]
impl BrowserDriver for MockStorefront {
    async fn navigate(&self, url: &str) -> ProbeResult<()> {
        let mut state = self.open_state().await?;
        state.history.push(format!("navigate:{url}"));
        let screen = Screen::parse(&self.urls, url);
        state.show(screen);
        Ok(())
    }

    async fn current_url(&self) -> ProbeResult<String> {
        let state = self.open_state().await?;
        Ok(state.screen.url(&self.urls))
    }

    async fn query(
        &self,
        locator: &Locator,
        scope: Option<&ElementHandle>,
    ) -> ProbeResult<Vec<ElementHandle>> {
        let state = self.open_state().await?;
        let nodes = render(&state);
        if let Some(parent) = scope {
            find_node(&nodes, parent)?;
        }
        let scope_id = scope.map(|s| s.id.as_str());
        Ok(nodes
            .iter()
            .filter(|n| n.matches(locator, scope_id))
            .map(|n| ElementHandle::new(n.id.as_str(), locator.to_string()))
            .collect())
    }

    async fn state(&self, element: &ElementHandle) -> ProbeResult<ElementState> {
        let state = self.open_state().await?;
        let nodes = render(&state);
        Ok(nodes
            .iter()
            .find(|n| n.id == element.id)
            .map_or_else(ElementState::detached, |n| ElementState {
                attached: true,
                visible: n.visible,
                enabled: true,
            }))
    }

    async fn text(&self, element: &ElementHandle) -> ProbeResult<String> {
        let state = self.open_state().await?;
        let nodes = render(&state);
        Ok(find_node(&nodes, element)?.text.clone())
    }

    async fn click(&self, element: &ElementHandle) -> ProbeResult<()> {
        let mut state = self.open_state().await?;
        let nodes = render(&state);
        let node = find_node(&nodes, element)?;
        if !node.visible {
            return Err(ProbeError::driver(format!(
                "element not interactable: {element}"
            )));
        }
        state.history.push(format!("click:{}", node.id));
        debug!(id = %node.id, "mock click");

        match split_id(&node.id) {
            ("login-button", _) => state.submit_login(),
            ("add", Some(i)) => state.add_to_cart(i),
            ("remove", Some(i)) => state.remove_from_cart(i),
            ("card-name", Some(i)) => state.show(Screen::Details(i)),
            ("details-add", _) => {
                if let Screen::Details(i) = state.screen {
                    state.add_to_cart(i);
                }
            }
            ("details-remove", _) => {
                if let Screen::Details(i) = state.screen {
                    state.remove_from_cart(i);
                }
            }
            ("back" | "continue-shopping", _) => state.show(Screen::Inventory),
            ("cart-link", _) => state.show(Screen::Cart),
            ("cart-remove", Some(i)) => state.remove_from_cart(i),
            ("checkout", _) => state.show(Screen::CheckoutInfo),
            ("continue", _) => state.submit_checkout_info(),
            ("finish", _) => {
                state.cart.clear();
                state.show(Screen::Complete);
            }
            ("burger", _) => state.menu_open = true,
            ("menu-close", _) => state.menu_open = false,
            ("logout", _) => {
                state.user = None;
                state.show(Screen::Login);
            }
            ("reset", _) => {
                let removed: Vec<usize> = state.cart.drain(..).collect();
                if state.screen == Screen::Inventory {
                    state.stale_remove.extend(removed);
                }
            }
            _ => {}
        }
        Ok(())
    }

    async fn clear(&self, element: &ElementHandle) -> ProbeResult<()> {
        let mut state = self.open_state().await?;
        let nodes = render(&state);
        let node = find_node(&nodes, element)?;
        let Some(field) = node.id.strip_prefix("input:") else {
            return Err(ProbeError::driver(format!("element is not editable: {element}")));
        };
        let field = field.to_string();
        state.history.push(format!("clear:{field}"));
        let _ = state.inputs.insert(field, String::new());
        Ok(())
    }

    async fn type_text(&self, element: &ElementHandle, text: &str) -> ProbeResult<()> {
        let mut state = self.open_state().await?;
        let nodes = render(&state);
        let node = find_node(&nodes, element)?;
        let Some(field) = node.id.strip_prefix("input:") else {
            return Err(ProbeError::driver(format!("element is not editable: {element}")));
        };
        let field = field.to_string();
        state.history.push(format!("type:{field}"));
        state.inputs.entry(field).or_default().push_str(text);
        Ok(())
    }

    async fn select_value(&self, element: &ElementHandle, value: &str) -> ProbeResult<()> {
        let mut state = self.open_state().await?;
        let nodes = render(&state);
        let node = find_node(&nodes, element)?;
        if node.id != "sort" {
            return Err(ProbeError::driver(format!("element is not a <select>: {element}")));
        }
        let order: SortOrder = value.parse().map_err(|_| {
            ProbeError::driver(format!("no <option> with value {value:?}"))
        })?;
        state.history.push(format!("select:{value}"));
        state.sort = order;
        Ok(())
    }

    async fn clear_cookies(&self) -> ProbeResult<()> {
        let mut state = self.open_state().await?;
        state.history.push("clear_cookies".to_string());
        state.user = None;
        Ok(())
    }

    async fn clear_storage(&self) -> ProbeResult<()> {
        let mut state = self.open_state().await?;
        state.history.push("clear_storage".to_string());
        state.cart.clear();
        state.sort = SortOrder::Az;
        Ok(())
    }

    async fn close(&self) -> ProbeResult<()> {
        let mut state = self.state.lock().await;
        state.history.push("close".to_string());
        state.closed = true;
        Ok(())
    }
}

/// Launches a fresh [`MockStorefront`] per browser
#[derive(Debug)]
pub struct MockLauncher {
    base_url: String,
    launched: Mutex<Vec<Arc<MockStorefront>>>,
}

impl MockLauncher {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            launched: Mutex::new(Vec::new()),
        }
    }

    /// Every storefront launched so far
    pub async fn launched(&self) -> Vec<Arc<MockStorefront>> {
        self.launched.lock().await.clone()
    }
}

#[async_trait]
impl Launcher for MockLauncher {
    async fn launch(&self) -> ProbeResult<Arc<dyn BrowserDriver>> {
        let storefront = Arc::new(MockStorefront::new(&self.base_url));
        self.launched.lock().await.push(Arc::clone(&storefront));
        Ok(storefront)
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
