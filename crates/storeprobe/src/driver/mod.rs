//! Browser driver seam.
//!
//! Page objects never talk to a browser directly. They go through
//! [`BrowserDriver`], which exposes a small set of primitive operations on
//! opaque [`ElementHandle`]s. Two implementations ship with the crate:
//!
//! - `CdpDriver` (feature `browser`): real Chromium over the DevTools protocol
//! - [`MockStorefront`]: an in-memory model of the storefront for tests
//!
//! Drivers report what the page looks like right now; all waiting happens one
//! layer up, in the page objects.

#[cfg(feature = "browser")]
mod cdp;
mod mock;

#[cfg(feature = "browser")]
pub use cdp::{CdpDriver, CdpLauncher};
pub use mock::{MockLauncher, MockStorefront, CATALOGUE, TAX_RATE};

use crate::locator::Locator;
use crate::result::ProbeResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Reference to one live DOM node produced by a driver lookup.
///
/// The id is stable for as long as the node stays attached, so a handle taken
/// before a DOM change still addresses the same node afterwards. Once the node
/// is detached every operation on the handle fails with `StaleElement`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Driver-assigned node id
    pub id: String,
    /// Locator the node was found with, for error messages
    pub description: String,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(id: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
        }
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.description, self.id)
    }
}

/// Observable state of a node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementState {
    /// Node is still part of the document
    pub attached: bool,
    /// Node is rendered with a non-empty box
    pub visible: bool,
    /// Node accepts input
    pub enabled: bool,
}

impl ElementState {
    /// State reported for a node that is gone
    #[must_use]
    pub const fn detached() -> Self {
        Self {
            attached: false,
            visible: false,
            enabled: false,
        }
    }

    /// Attached, visible and enabled
    #[must_use]
    pub const fn interactable() -> Self {
        Self {
            attached: true,
            visible: true,
            enabled: true,
        }
    }

    /// Visible and enabled, i.e. safe to click
    #[must_use]
    pub const fn is_clickable(&self) -> bool {
        self.attached && self.visible && self.enabled
    }
}

/// Primitive browser operations.
///
/// Every method reflects the page as it is at the moment of the call; none of
/// them wait for elements to appear.
#[async_trait]
pub trait BrowserDriver: Send + Sync + fmt::Debug {
    /// Navigate to an absolute URL
    async fn navigate(&self, url: &str) -> ProbeResult<()>;

    /// URL of the current document
    async fn current_url(&self) -> ProbeResult<String>;

    /// All nodes matching `locator`, in document order.
    ///
    /// With `scope` set the locator is evaluated relative to that node.
    async fn query(
        &self,
        locator: &Locator,
        scope: Option<&ElementHandle>,
    ) -> ProbeResult<Vec<ElementHandle>>;

    /// Current state of a node; detached nodes report [`ElementState::detached`]
    async fn state(&self, element: &ElementHandle) -> ProbeResult<ElementState>;

    /// Rendered text of a node
    async fn text(&self, element: &ElementHandle) -> ProbeResult<String>;

    /// Click a node
    async fn click(&self, element: &ElementHandle) -> ProbeResult<()>;

    /// Empty an input
    async fn clear(&self, element: &ElementHandle) -> ProbeResult<()>;

    /// Type into an input, appending to its value
    async fn type_text(&self, element: &ElementHandle, text: &str) -> ProbeResult<()>;

    /// Choose the `<option>` with the given value in a `<select>`
    async fn select_value(&self, element: &ElementHandle, value: &str) -> ProbeResult<()>;

    /// Delete all cookies
    async fn clear_cookies(&self) -> ProbeResult<()>;

    /// Clear local and session storage of the current origin
    async fn clear_storage(&self) -> ProbeResult<()>;

    /// Shut the browser down
    async fn close(&self) -> ProbeResult<()>;
}

/// Produces fresh, isolated browser drivers
#[async_trait]
pub trait Launcher: Send + Sync + fmt::Debug {
    /// Start a new browser
    async fn launch(&self) -> ProbeResult<Arc<dyn BrowserDriver>>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}
