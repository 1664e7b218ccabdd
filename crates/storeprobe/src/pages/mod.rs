//! Page objects for the storefront.
//!
//! Each screen is a small struct wrapping a [`BasePage`]. Locators are
//! associated `const` items so tests and the mock storefront can refer to the
//! exact same selectors. Navigating actions consume nothing and return the
//! next page object; when a screen can lead to more than one place the action
//! returns a closed outcome enum instead.

mod base;
mod cart;
mod checkout_complete;
mod checkout_info;
mod checkout_overview;
mod login;
mod product_details;
mod products;

pub use base::BasePage;
pub use cart::CartPage;
pub use checkout_complete::CheckoutCompletePage;
pub use checkout_info::{CheckoutInfoOutcome, CheckoutInfoPage};
pub use checkout_overview::CheckoutOverviewPage;
pub use login::{LoginOutcome, LoginPage};
pub use product_details::ProductDetailsPage;
pub use products::ProductsPage;

use crate::result::{ProbeError, ProbeResult};
use crate::session::{Session, SiteUrls};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// A screen of the storefront
pub trait PageObject: Sized {
    /// Page name for logs and error messages
    const NAME: &'static str;

    /// Wrap a session without touching the browser
    fn from_session(session: Session) -> Self;

    /// Shared primitives
    fn base(&self) -> &BasePage;

    /// URL the browser shows while this page is active.
    ///
    /// Exact for every screen except [`ProductDetailsPage`], whose URL carries
    /// the product id; there this is only the common prefix.
    fn url(urls: &SiteUrls) -> String;
}

macro_rules! page_object {
    ($page:ident, $name:literal, |$urls:ident| $url:expr) => {
        impl $crate::pages::PageObject for $page {
            const NAME: &'static str = $name;

            fn from_session(session: $crate::session::Session) -> Self {
                Self {
                    base: $crate::pages::BasePage::new(session),
                }
            }

            fn base(&self) -> &$crate::pages::BasePage {
                &self.base
            }

            fn url($urls: &$crate::session::SiteUrls) -> String {
                $url
            }
        }

        impl std::ops::Deref for $page {
            type Target = $crate::pages::BasePage;

            fn deref(&self) -> &Self::Target {
                &self.base
            }
        }
    };
}
pub(crate) use page_object;

/// What a catalogue card shows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    /// Product name
    pub name: String,
    /// Description text
    pub description: String,
    /// Price exactly as displayed, e.g. `$29.99`
    pub price: String,
}

/// Catalogue sort options, named by their `<option value>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Name (A to Z)
    Az,
    /// Name (Z to A)
    Za,
    /// Price (low to high)
    Lohi,
    /// Price (high to low)
    Hilo,
}

impl SortOrder {
    /// Every option in the order the dropdown lists them
    pub const ALL: [Self; 4] = [Self::Az, Self::Za, Self::Lohi, Self::Hilo];

    /// `<option value>` of this order
    #[must_use]
    pub const fn value(&self) -> &'static str {
        match self {
            Self::Az => "az",
            Self::Za => "za",
            Self::Lohi => "lohi",
            Self::Hilo => "hilo",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

impl FromStr for SortOrder {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|order| order.value() == s)
            .ok_or_else(|| ProbeError::Parse {
                what: "sort order",
                text: s.to_string(),
            })
    }
}

static AMOUNT_RE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"\d+\.\d+"));

/// First decimal amount (`\d+\.\d+`) in `text`
pub fn extract_amount(what: &'static str, text: &str) -> ProbeResult<f64> {
    let re = AMOUNT_RE.as_ref().map_err(ProbeError::driver)?;
    re.find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .ok_or_else(|| ProbeError::Parse {
            what,
            text: text.to_string(),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod sort_order_tests {
        use super::*;

        #[test]
        fn test_values() {
            let values: Vec<_> = SortOrder::ALL.iter().map(SortOrder::value).collect();
            assert_eq!(values, ["az", "za", "lohi", "hilo"]);
        }

        #[test]
        fn test_parse() {
            assert_eq!("hilo".parse::<SortOrder>().unwrap(), SortOrder::Hilo);
            assert!("price".parse::<SortOrder>().is_err());
        }

        #[test]
        fn test_serde_matches_option_value() {
            let json = serde_json::to_string(&SortOrder::Lohi).unwrap();
            assert_eq!(json, "\"lohi\"");
        }
    }

    mod url_tests {
        use super::*;

        #[test]
        fn test_details_url_is_a_prefix() {
            let urls = SiteUrls::new("http://shop.local/");
            let prefix = ProductDetailsPage::url(&urls);
            assert_eq!(prefix, "http://shop.local/inventory-item.html");
            assert_ne!(prefix, urls.product_details(4));
            assert!(urls.product_details(4).starts_with(&prefix));
        }

        #[test]
        fn test_other_urls_are_exact() {
            let urls = SiteUrls::new("http://shop.local/");
            assert_eq!(ProductsPage::url(&urls), urls.inventory());
            assert_eq!(CartPage::url(&urls), "http://shop.local/cart.html");
        }
    }

    mod amount_tests {
        use super::*;
        use proptest::prelude::*;

        #[test]
        fn test_labels() {
            assert_eq!(extract_amount("item total", "Item total: $29.99").unwrap(), 29.99);
            assert_eq!(extract_amount("tax", "Tax: $2.40").unwrap(), 2.40);
            assert_eq!(extract_amount("price", "$7.99").unwrap(), 7.99);
        }

        #[test]
        fn test_pattern_compiles_once() {
            assert!(AMOUNT_RE.is_ok());
        }

        #[test]
        fn test_first_amount_wins() {
            assert_eq!(extract_amount("total", "1.50 then 2.75").unwrap(), 1.50);
        }

        #[test]
        fn test_no_decimal_is_parse_error() {
            let err = extract_amount("total", "Total: $30").unwrap_err();
            assert!(matches!(err, ProbeError::Parse { what: "total", .. }));
            assert!(err.to_string().contains("Total: $30"));
        }

        proptest! {
            #[test]
            fn prop_formatted_cents_round_trip(cents in 0u32..10_000_000) {
                let text = format!("Total: ${}.{:02}", cents / 100, cents % 100);
                let parsed = extract_amount("total", &text).unwrap();
                prop_assert!((parsed - f64::from(cents) / 100.0).abs() < 1e-9);
            }
        }
    }
}
