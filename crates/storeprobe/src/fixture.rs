//! Scoped test resources.
//!
//! A [`Fixture`] acquires something a case needs and releases it afterwards.
//! [`with_fixture`] guarantees the release: teardown runs exactly once whether
//! the body succeeds, returns an error or panics.
//!
//! ```ignore
//! let mut pets = PetFixture::new(pet_api);
//! with_fixture(&mut pets, |pet| async move {
//!     // the pet exists here and is deleted afterwards
//!     Ok(())
//! })
//! .await?;
//! ```

use crate::api::{Pet, PetApi, User, UserApi};
use crate::config::ProbeConfig;
use crate::data::{random_entity_id, sample_pet, sample_user, scenario_rng};
use crate::driver::{BrowserDriver, Launcher};
use crate::result::{ProbeError, ProbeResult};
use crate::session::Session;
use async_trait::async_trait;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A resource with explicit setup and teardown
#[async_trait]
pub trait Fixture: Send {
    /// What setup hands to the body
    type Resource: Send;

    /// Acquire the resource
    async fn setup(&mut self) -> ProbeResult<Self::Resource>;

    /// Release whatever setup acquired. Called once, even if the body failed.
    async fn teardown(&mut self) -> ProbeResult<()>;

    /// Fixture name for logs
    fn name(&self) -> &'static str;
}

/// Set `fixture` up, run `body` with the resource, then tear it down.
///
/// A body error takes precedence over a teardown error, which is then only
/// logged. A panic in the body is re-raised after teardown.
pub async fn with_fixture<F, T, B, Fut>(fixture: &mut F, body: B) -> ProbeResult<T>
where
    F: Fixture,
    B: FnOnce(F::Resource) -> Fut,
    Fut: Future<Output = ProbeResult<T>>,
{
    let name = fixture.name();
    let resource = match fixture.setup().await {
        Ok(resource) => resource,
        Err(e) => {
            // setup may have acquired part of the resource
            if let Err(t) = fixture.teardown().await {
                warn!(fixture = name, error = %t, "teardown after failed setup failed");
            }
            return Err(ProbeError::Fixture {
                message: format!("{name} setup failed: {e}"),
            });
        }
    };
    debug!(fixture = name, "set up");

    let outcome = AssertUnwindSafe(body(resource)).catch_unwind().await;
    let teardown = fixture.teardown().await;
    debug!(fixture = name, ok = teardown.is_ok(), "torn down");

    match outcome {
        Err(panic) => {
            if let Err(t) = teardown {
                warn!(fixture = name, error = %t, "teardown failed");
            }
            std::panic::resume_unwind(panic)
        }
        Ok(Err(e)) => {
            if let Err(t) = teardown {
                warn!(fixture = name, error = %t, "teardown failed");
            }
            Err(e)
        }
        Ok(Ok(value)) => {
            teardown.map_err(|t| ProbeError::Fixture {
                message: format!("{name} teardown failed: {t}"),
            })?;
            Ok(value)
        }
    }
}

/// A fresh browser on the storefront's login page with cookies and storage
/// cleared
#[derive(Debug)]
pub struct BrowserFixture {
    launcher: Arc<dyn Launcher>,
    config: ProbeConfig,
    driver: Option<Arc<dyn BrowserDriver>>,
}

impl BrowserFixture {
    /// Fixture that launches through `launcher` using the browser and site
    /// settings of `config`
    #[must_use]
    pub fn new(launcher: Arc<dyn Launcher>, config: ProbeConfig) -> Self {
        Self {
            launcher,
            config,
            driver: None,
        }
    }
}

#[async_trait]
impl Fixture for BrowserFixture {
    type Resource = Session;

    async fn setup(&mut self) -> ProbeResult<Session> {
        let driver = self.launcher.launch().await?;
        self.driver = Some(Arc::clone(&driver));

        let urls = self.config.site.urls();
        driver.navigate(urls.login()).await?;
        driver.clear_cookies().await?;
        driver.clear_storage().await?;

        info!(launcher = self.launcher.name(), url = urls.login(), "browser ready");
        Ok(Session::new(driver, self.config.site.wait, urls))
    }

    async fn teardown(&mut self) -> ProbeResult<()> {
        match self.driver.take() {
            Some(driver) => driver.close().await,
            None => Ok(()),
        }
    }

    fn name(&self) -> &'static str {
        "browser"
    }
}

/// A pet created through the API and deleted afterwards
#[derive(Debug)]
pub struct PetFixture {
    api: PetApi,
    created: Option<i64>,
}

impl PetFixture {
    #[must_use]
    pub const fn new(api: PetApi) -> Self {
        Self { api, created: None }
    }
}

#[async_trait]
impl Fixture for PetFixture {
    type Resource = Pet;

    async fn setup(&mut self) -> ProbeResult<Pet> {
        let id = random_entity_id(&mut scenario_rng());
        let pet = sample_pet(id);
        self.api.create_pet(&pet).await?.expect_status(200)?;
        self.created = Some(id);
        info!(id, "pet created");
        Ok(pet)
    }

    /// Deletion failures are logged, never raised: the service is known to
    /// answer 404 for pets it has just created.
    async fn teardown(&mut self) -> ProbeResult<()> {
        if let Some(id) = self.created.take() {
            match self.api.delete_pet(id).await {
                Ok(response) if response.is_success() => debug!(id, "pet deleted"),
                Ok(response) => warn!(id, status = response.status, "pet cleanup refused"),
                Err(e) => warn!(id, error = %e, "pet cleanup failed"),
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "pet"
    }
}

/// A user created through the API and deleted afterwards
#[derive(Debug)]
pub struct UserFixture {
    api: UserApi,
    created: Option<String>,
}

impl UserFixture {
    #[must_use]
    pub const fn new(api: UserApi) -> Self {
        Self { api, created: None }
    }
}

#[async_trait]
impl Fixture for UserFixture {
    type Resource = User;

    async fn setup(&mut self) -> ProbeResult<User> {
        let id = random_entity_id(&mut scenario_rng());
        let user = sample_user(id);
        self.api.create_user(&user).await?.expect_status(200)?;
        let username = user.username.clone().unwrap_or_default();
        info!(%username, "user created");
        self.created = Some(username);
        Ok(user)
    }

    async fn teardown(&mut self) -> ProbeResult<()> {
        if let Some(username) = self.created.take() {
            match self.api.delete_user(&username).await {
                Ok(response) if response.is_success() => debug!(%username, "user deleted"),
                Ok(response) => warn!(%username, status = response.status, "user cleanup refused"),
                Err(e) => warn!(%username, error = %e, "user cleanup failed"),
            }
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "user"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::driver::MockLauncher;
    use crate::pages::{LoginPage, PageObject};

    #[derive(Debug, Default)]
    struct Counting {
        setups: u32,
        teardowns: u32,
        fail_setup: bool,
        fail_teardown: bool,
    }

    #[async_trait]
    impl Fixture for Counting {
        type Resource = u32;

        async fn setup(&mut self) -> ProbeResult<u32> {
            self.setups += 1;
            if self.fail_setup {
                return Err(ProbeError::driver("no browser"));
            }
            Ok(7)
        }

        async fn teardown(&mut self) -> ProbeResult<()> {
            self.teardowns += 1;
            if self.fail_teardown {
                return Err(ProbeError::driver("close failed"));
            }
            Ok(())
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    mod with_fixture_tests {
        use super::*;

        #[tokio::test]
        async fn test_success_tears_down_once() {
            let mut fixture = Counting::default();
            let value = with_fixture(&mut fixture, |n| async move { Ok(n * 2) })
                .await
                .unwrap();
            assert_eq!(value, 14);
            assert_eq!((fixture.setups, fixture.teardowns), (1, 1));
        }

        #[tokio::test]
        async fn test_error_tears_down_and_keeps_body_error() {
            let mut fixture = Counting {
                fail_teardown: true,
                ..Counting::default()
            };
            let err = with_fixture(&mut fixture, |_| async move {
                Err::<(), _>(ProbeError::assertion("cart not empty"))
            })
            .await
            .unwrap_err();
            assert!(matches!(err, ProbeError::AssertionFailed { .. }));
            assert_eq!(fixture.teardowns, 1);
        }

        #[tokio::test]
        async fn test_panic_tears_down_and_resumes() {
            let mut fixture = Counting::default();
            let caught = AssertUnwindSafe(with_fixture(&mut fixture, |_| async move {
                if true {
                    panic!("boom");
                }
                Ok(())
            }))
            .catch_unwind()
            .await;
            assert!(caught.is_err());
            assert_eq!(fixture.teardowns, 1);
        }

        #[tokio::test]
        async fn test_teardown_error_fails_successful_body() {
            let mut fixture = Counting {
                fail_teardown: true,
                ..Counting::default()
            };
            let err = with_fixture(&mut fixture, |_| async move { Ok(()) })
                .await
                .unwrap_err();
            assert!(matches!(err, ProbeError::Fixture { .. }));
        }

        #[tokio::test]
        async fn test_setup_error_skips_body() {
            let mut fixture = Counting {
                fail_setup: true,
                ..Counting::default()
            };
            let mut ran = false;
            let err = with_fixture(&mut fixture, |_| {
                ran = true;
                async move { Ok(()) }
            })
            .await
            .unwrap_err();
            assert!(!ran);
            assert!(err.to_string().contains("counting setup failed"));
        }
    }

    mod browser_fixture_tests {
        use super::*;

        #[tokio::test]
        async fn test_opens_login_and_closes() {
            let mut config = ProbeConfig::default();
            config.site.base_url = "http://shop.local/".to_string();
            let launcher = Arc::new(MockLauncher::new("http://shop.local/"));
            let mut fixture = BrowserFixture::new(launcher.clone(), config);

            with_fixture(&mut fixture, |session| async move {
                let login: LoginPage = LoginPage::from_session(session);
                assert_eq!(login.current_url().await?, "http://shop.local/");
                assert!(login.is_login_box_visible().await);
                Ok(())
            })
            .await
            .unwrap();

            let shops = launcher.launched().await;
            assert_eq!(shops.len(), 1);
            assert!(shops[0].is_closed().await);
            assert!(shops[0].was_called("clear_cookies").await);
            assert!(shops[0].was_called("clear_storage").await);
        }
    }
}
