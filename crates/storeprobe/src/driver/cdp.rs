//! Chromium over the DevTools protocol.
//!
//! Lookups run as JavaScript in the page. Every matched node is tagged with a
//! `data-probe-id` attribute the first time it is seen, and that attribute is
//! the [`ElementHandle`] id. A node that has been removed from the document can
//! no longer be found by its tag, which is how stale handles are detected.

#![allow(clippy::missing_errors_doc)]

use super::{BrowserDriver, ElementHandle, ElementState, Launcher};
use crate::config::BrowserConfig;
use crate::locator::Locator;
use crate::result::{ProbeError, ProbeResult};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::network::ClearBrowserCookiesParams;
use chromiumoxide::error::CdpError;
use chromiumoxide::page::Page as CdpPage;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

const PROBE_ATTR: &str = "data-probe-id";

fn js_string(value: &str) -> String {
    serde_json::Value::String(value.to_string()).to_string()
}

fn element_expr(id: &str) -> String {
    format!(
        "document.querySelector({})",
        js_string(&format!("[{PROBE_ATTR}=\"{id}\"]"))
    )
}

fn element_css(id: &str) -> String {
    format!("[{PROBE_ATTR}=\"{id}\"]")
}

/// A navigation in flight tears down the execution context; callers that
/// poll treat that the same as a node that has not appeared yet.
fn eval_error(err: CdpError) -> ProbeError {
    let message = err.to_string();
    if message.contains("context") {
        ProbeError::StaleElement {
            element: "document".to_string(),
        }
    } else {
        ProbeError::driver(message)
    }
}

#[derive(Debug, Deserialize)]
struct QueryResult {
    stale: bool,
    ids: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TextResult {
    stale: bool,
    text: String,
}

/// Real browser driver
#[derive(Debug)]
pub struct CdpDriver {
    browser: Arc<Mutex<CdpBrowser>>,
    page: CdpPage,
    handler: tokio::task::JoinHandle<()>,
    _profile: tempfile::TempDir,
}

impl CdpDriver {
    /// Launch Chromium with a throwaway profile and open a blank page
    pub async fn launch(config: &BrowserConfig) -> ProbeResult<Self> {
        let profile = tempfile::tempdir()?;
        let mut builder = CdpConfig::builder();

        if !config.headless {
            builder = builder.with_head();
        }

        if !config.sandbox {
            builder = builder.no_sandbox();
        }

        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }

        let cdp_config = builder
            .window_size(config.window_width, config.window_height)
            .args(["--disable-dev-shm-usage", "--disable-gpu", "--incognito"])
            .user_data_dir(profile.path())
            .build()
            .map_err(|e| ProbeError::BrowserLaunch { message: e })?;

        let (browser, mut handler) =
            CdpBrowser::launch(cdp_config)
                .await
                .map_err(|e| ProbeError::BrowserLaunch {
                    message: e.to_string(),
                })?;

        let handler = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .map_err(|e| ProbeError::BrowserLaunch {
                message: e.to_string(),
            })?;

        info!(headless = config.headless, "chromium launched");
        Ok(Self {
            browser: Arc::new(Mutex::new(browser)),
            page,
            handler,
            _profile: profile,
        })
    }

    async fn eval<T: DeserializeOwned>(&self, expr: String) -> ProbeResult<T> {
        let result = self.page.evaluate(expr).await.map_err(eval_error)?;
        Ok(result.into_value()?)
    }

    /// Run `body` with `el` bound to the tagged node; `body` must return a
    /// string, and a missing node yields `"stale"`
    async fn with_element(&self, element: &ElementHandle, body: &str) -> ProbeResult<String> {
        let expr = format!(
            "(function(){{const el={};if(!el||!el.isConnected){{return 'stale';}}{body}}})()",
            element_expr(&element.id)
        );
        let outcome: String = self.eval(expr).await?;
        if outcome == "stale" {
            return Err(ProbeError::StaleElement {
                element: element.to_string(),
            });
        }
        Ok(outcome)
    }

    async fn find(&self, element: &ElementHandle) -> ProbeResult<chromiumoxide::element::Element> {
        self.page
            .find_element(element_css(&element.id))
            .await
            .map_err(|_| ProbeError::StaleElement {
                element: element.to_string(),
            })
    }

    async fn set_value(&self, element: &ElementHandle, value: &str) -> ProbeResult<String> {
        let body = format!(
            "const proto=el instanceof HTMLSelectElement?HTMLSelectElement.prototype:HTMLInputElement.prototype;\
             if(el instanceof HTMLSelectElement&&!Array.from(el.options).some(o=>o.value==={v})){{return 'missing';}}\
             Object.getOwnPropertyDescriptor(proto,'value').set.call(el,{v});\
             el.dispatchEvent(new Event('input',{{bubbles:true}}));\
             el.dispatchEvent(new Event('change',{{bubbles:true}}));\
             return 'ok';",
            v = js_string(value)
        );
        self.with_element(element, &body).await
    }
}

#[async_trait]
impl BrowserDriver for CdpDriver {
    async fn navigate(&self, url: &str) -> ProbeResult<()> {
        debug!(url, "navigate");
        self.page.goto(url).await.map_err(ProbeError::driver)?;
        Ok(())
    }

    async fn current_url(&self) -> ProbeResult<String> {
        self.eval("location.href".to_string()).await
    }

    async fn query(
        &self,
        locator: &Locator,
        scope: Option<&ElementHandle>,
    ) -> ProbeResult<Vec<ElementHandle>> {
        let scope_expr = scope.map_or_else(|| "document".to_string(), |s| element_expr(&s.id));
        let expr = format!(
            "(function(){{const scope={scope_expr};if(!scope){{return {{stale:true,ids:[]}};}}\
             const nodes={query};\
             const ids=nodes.filter(n=>n.dataset).map(n=>{{if(!n.dataset.probeId){{window.__probeSeq=(window.__probeSeq||0)+1;n.dataset.probeId='p'+window.__probeSeq;}}return n.dataset.probeId;}});\
             return {{stale:false,ids}};}})()",
            query = locator.to_query("scope")
        );
        let result: QueryResult = self.eval(expr).await?;
        if result.stale {
            return Err(ProbeError::StaleElement {
                element: scope.map_or_else(|| "document".to_string(), ToString::to_string),
            });
        }
        let description = locator.to_string();
        Ok(result
            .ids
            .into_iter()
            .map(|id| ElementHandle::new(id, description.as_str()))
            .collect())
    }

    async fn state(&self, element: &ElementHandle) -> ProbeResult<ElementState> {
        let expr = format!(
            "(function(){{const el={};\
             if(!el||!el.isConnected){{return {{attached:false,visible:false,enabled:false}};}}\
             const r=el.getBoundingClientRect();const s=getComputedStyle(el);\
             const visible=r.width>0&&r.height>0&&r.right>0&&r.bottom>0&&s.visibility!=='hidden'&&s.display!=='none'&&parseFloat(s.opacity||'1')>0;\
             return {{attached:true,visible,enabled:!el.disabled}};}})()",
            element_expr(&element.id)
        );
        self.eval(expr).await
    }

    async fn text(&self, element: &ElementHandle) -> ProbeResult<String> {
        let expr = format!(
            "(function(){{const el={};if(!el){{return {{stale:true,text:''}};}}\
             return {{stale:false,text:(el.innerText||el.textContent||'').trim()}};}})()",
            element_expr(&element.id)
        );
        let result: TextResult = self.eval(expr).await?;
        if result.stale {
            return Err(ProbeError::StaleElement {
                element: element.to_string(),
            });
        }
        Ok(result.text)
    }

    async fn click(&self, element: &ElementHandle) -> ProbeResult<()> {
        let node = self.find(element).await?;
        node.click().await.map_err(ProbeError::driver)?;
        Ok(())
    }

    async fn clear(&self, element: &ElementHandle) -> ProbeResult<()> {
        self.set_value(element, "").await?;
        Ok(())
    }

    async fn type_text(&self, element: &ElementHandle, text: &str) -> ProbeResult<()> {
        let node = self.find(element).await?;
        node.focus().await.map_err(ProbeError::driver)?;
        node.type_str(text).await.map_err(ProbeError::driver)?;
        Ok(())
    }

    async fn select_value(&self, element: &ElementHandle, value: &str) -> ProbeResult<()> {
        if self.set_value(element, value).await? == "missing" {
            return Err(ProbeError::driver(format!(
                "no <option> with value {value:?} in {element}"
            )));
        }
        Ok(())
    }

    async fn clear_cookies(&self) -> ProbeResult<()> {
        self.page
            .execute(ClearBrowserCookiesParams::default())
            .await
            .map_err(ProbeError::driver)?;
        Ok(())
    }

    async fn clear_storage(&self) -> ProbeResult<()> {
        let _: bool = self
            .eval(
                "(function(){try{localStorage.clear();sessionStorage.clear();}catch(e){}return true;})()"
                    .to_string(),
            )
            .await?;
        Ok(())
    }

    async fn close(&self) -> ProbeResult<()> {
        let mut browser = self.browser.lock().await;
        browser.close().await.map_err(ProbeError::driver)?;
        let _ = browser.wait().await;
        self.handler.abort();
        info!("chromium closed");
        Ok(())
    }
}

/// Launches one Chromium per call
#[derive(Debug, Clone)]
pub struct CdpLauncher {
    config: BrowserConfig,
}

impl CdpLauncher {
    #[must_use]
    pub const fn new(config: BrowserConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Launcher for CdpLauncher {
    async fn launch(&self) -> ProbeResult<Arc<dyn BrowserDriver>> {
        Ok(Arc::new(CdpDriver::launch(&self.config).await?))
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_expr_quotes_selector() {
        assert_eq!(
            element_expr("p3"),
            r#"document.querySelector("[data-probe-id=\"p3\"]")"#
        );
    }

    #[test]
    fn test_context_loss_is_stale() {
        let err = eval_error(CdpError::ChromeMessage("Execution context was destroyed".to_string()));
        assert!(err.is_lookup_failure());
    }
}
