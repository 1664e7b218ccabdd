//! Locator abstraction for element selection.
//!
//! A [`Locator`] is an immutable `(strategy, selector)` pair that identifies
//! zero or more DOM nodes. Page objects declare their locators as `const`
//! items; dynamic locators (e.g. "cart row with this name") are built at
//! runtime with [`Locator::new`].
//!
//! Locators are turned into DOM queries by [`Locator::to_query`], which the
//! CDP driver evaluates in the page. The query is evaluated relative to a
//! scope node so relative XPath (`./ancestor::…`) works from a parent element.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Selector strategy for locating elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// `id` attribute
    Id,
    /// Single class name
    ClassName,
    /// CSS selector (e.g., "button.primary")
    Css,
    /// XPath expression
    XPath,
    /// `name` attribute
    Name,
    /// Tag name
    TagName,
}

impl Strategy {
    /// Short name used in descriptions
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::ClassName => "class",
            Self::Css => "css",
            Self::XPath => "xpath",
            Self::Name => "name",
            Self::TagName => "tag",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `(strategy, selector)` pair identifying UI elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Locator {
    strategy: Strategy,
    selector: Cow<'static, str>,
}

impl Locator {
    /// Create a locator from a strategy and an owned or borrowed selector
    #[must_use]
    pub fn new(strategy: Strategy, selector: impl Into<Cow<'static, str>>) -> Self {
        Self {
            strategy,
            selector: selector.into(),
        }
    }

    /// Locate by `id`
    #[must_use]
    pub const fn id(selector: &'static str) -> Self {
        Self::from_static(Strategy::Id, selector)
    }

    /// Locate by class name
    #[must_use]
    pub const fn class_name(selector: &'static str) -> Self {
        Self::from_static(Strategy::ClassName, selector)
    }

    /// Locate by CSS selector
    #[must_use]
    pub const fn css(selector: &'static str) -> Self {
        Self::from_static(Strategy::Css, selector)
    }

    /// Locate by XPath expression
    #[must_use]
    pub const fn xpath(selector: &'static str) -> Self {
        Self::from_static(Strategy::XPath, selector)
    }

    /// Locate by `name` attribute
    #[must_use]
    pub const fn name(selector: &'static str) -> Self {
        Self::from_static(Strategy::Name, selector)
    }

    /// Locate by tag name
    #[must_use]
    pub const fn tag_name(selector: &'static str) -> Self {
        Self::from_static(Strategy::TagName, selector)
    }

    const fn from_static(strategy: Strategy, selector: &'static str) -> Self {
        Self {
            strategy,
            selector: Cow::Borrowed(selector),
        }
    }

    /// Get the strategy
    #[must_use]
    pub const fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Get the raw selector string
    #[must_use]
    pub fn selector(&self) -> &str {
        &self.selector
    }

    /// Equivalent CSS selector, for strategies that have one
    #[must_use]
    pub fn to_css(&self) -> Option<String> {
        let s = self.selector.as_ref();
        match self.strategy {
            Strategy::Id => Some(format!("[id={}]", css_string(s))),
            Strategy::ClassName => Some(format!(".{}", css_ident(s))),
            Strategy::Css => Some(s.to_string()),
            Strategy::Name => Some(format!("[name={}]", css_string(s))),
            Strategy::TagName => Some(s.to_string()),
            Strategy::XPath => None,
        }
    }

    /// JavaScript expression yielding an `Array` of matching nodes.
    ///
    /// `scope` must be a JavaScript expression evaluating to the node the
    /// query is relative to (`document` for page-wide lookups).
    #[must_use]
    pub fn to_query(&self, scope: &str) -> String {
        match self.to_css() {
            Some(css) => format!(
                "Array.from(({scope}).querySelectorAll({}))",
                js_string(&css)
            ),
            None => format!(
                "(function(){{const r=document.evaluate({},{scope},null,XPathResult.ORDERED_NODE_SNAPSHOT_TYPE,null);const out=[];for(let i=0;i<r.snapshotLength;i++){{out.push(r.snapshotItem(i));}}return out;}})()",
                js_string(self.selector.as_ref())
            ),
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy, self.selector)
    }
}

/// Quote a string as an XPath 1.0 literal.
///
/// XPath has no escape sequences, so values containing both quote kinds are
/// assembled with `concat()`.
#[must_use]
pub fn xpath_literal(value: &str) -> String {
    if !value.contains('\'') {
        return format!("'{value}'");
    }
    if !value.contains('"') {
        return format!("\"{value}\"");
    }
    let parts: Vec<String> = value
        .split('\'')
        .map(|part| format!("'{part}'"))
        .collect();
    format!("concat({})", parts.join(", \"'\", "))
}

fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn css_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

fn css_ident(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for (i, ch) in value.chars().enumerate() {
        if i == 0 && ch.is_ascii_digit() {
            out.push_str(&format!("\\3{ch} "));
        } else if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || !ch.is_ascii() {
            out.push(ch);
        } else {
            out.push('\\');
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod locator_tests {
        use super::*;

        const LOGIN_BUTTON: Locator = Locator::id("login-button");

        #[test]
        fn test_const_locator() {
            assert_eq!(LOGIN_BUTTON.strategy(), Strategy::Id);
            assert_eq!(LOGIN_BUTTON.selector(), "login-button");
        }

        #[test]
        fn test_dynamic_equals_const() {
            let dynamic = Locator::new(Strategy::Id, "login-button".to_string());
            assert_eq!(dynamic, LOGIN_BUTTON);
        }

        #[test]
        fn test_display() {
            assert_eq!(LOGIN_BUTTON.to_string(), "id=login-button");
            assert_eq!(
                Locator::xpath("//h3[@data-test='error']").to_string(),
                "xpath=//h3[@data-test='error']"
            );
        }

        #[test]
        fn test_to_css() {
            assert_eq!(
                Locator::id("user-name").to_css().unwrap(),
                "[id=\"user-name\"]"
            );
            assert_eq!(
                Locator::class_name("shopping_cart_badge").to_css().unwrap(),
                ".shopping_cart_badge"
            );
            assert_eq!(
                Locator::name("postalCode").to_css().unwrap(),
                "[name=\"postalCode\"]"
            );
            assert!(Locator::xpath("//div").to_css().is_none());
        }

        #[test]
        fn test_css_query_is_scoped() {
            let query = Locator::class_name("login-box").to_query("document");
            assert_eq!(
                query,
                "Array.from((document).querySelectorAll(\".login-box\"))"
            );
        }

        #[test]
        fn test_xpath_query_uses_scope_as_context() {
            let query = Locator::xpath("./ancestor::div").to_query("el");
            assert!(query.contains("document.evaluate(\"./ancestor::div\",el,"));
            assert!(query.contains("ORDERED_NODE_SNAPSHOT_TYPE"));
        }

        #[test]
        fn test_class_name_with_leading_digit_is_escaped() {
            assert_eq!(Locator::class_name("1col").to_css().unwrap(), ".\\31 col");
        }
    }

    mod xpath_literal_tests {
        use super::*;
        use proptest::prelude::*;

        #[test]
        fn test_plain() {
            assert_eq!(xpath_literal("Sauce Labs Onesie"), "'Sauce Labs Onesie'");
        }

        #[test]
        fn test_single_quote() {
            assert_eq!(xpath_literal("Bob's"), "\"Bob's\"");
        }

        #[test]
        fn test_both_quotes() {
            assert_eq!(
                xpath_literal("a'b\"c"),
                "concat('a', \"'\", 'b\"c')"
            );
        }

        proptest! {
            #[test]
            fn prop_literal_is_quoted(value in "[a-zA-Z0-9 '\"().-]{0,24}") {
                let lit = xpath_literal(&value);
                let quoted = (lit.starts_with('\'') && lit.ends_with('\''))
                    || (lit.starts_with('"') && lit.ends_with('"'))
                    || (lit.starts_with("concat(") && lit.ends_with(')'));
                prop_assert!(quoted);
            }

            #[test]
            fn prop_concat_only_when_needed(value in "[a-z ]{0,16}") {
                prop_assert!(!xpath_literal(&value).starts_with("concat("));
            }
        }
    }
}
