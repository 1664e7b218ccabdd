use super::{Case, CaseBody, CaseFuture, UiContext};
use crate::assertion::Assertion;
use crate::data::{scenario_rng, CheckoutInfo};
use crate::pages::{CheckoutInfoPage, LoginOutcome, LoginPage, PageObject, ProductsPage, SortOrder};
use crate::result::ProbeResult;
use futures::FutureExt;

const RESET_LEAVES_REMOVE_BUTTONS: &str =
    "Reset App State empties the cart but the catalogue keeps showing Remove buttons";

pub(super) fn cases() -> Vec<Case> {
    vec![
        Case::passing("ui.login.standard_user", CaseBody::Ui(login_standard_user)),
        Case::passing("ui.login.locked_out_user", CaseBody::Ui(login_locked_out_user)),
        Case::passing("ui.login.problem_user", CaseBody::Ui(login_problem_user)),
        Case::passing(
            "ui.login.performance_glitch_user",
            CaseBody::Ui(login_performance_glitch_user),
        ),
        Case::passing("ui.login.invalid_password", CaseBody::Ui(login_invalid_password)),
        Case::passing("ui.navigation.logout", CaseBody::Ui(logout_from_menu)),
        Case::known_failure(
            "ui.navigation.reset_app_state",
            RESET_LEAVES_REMOVE_BUTTONS,
            CaseBody::Ui(reset_app_state),
        ),
        Case::passing("ui.catalogue.add_backpack", CaseBody::Ui(add_backpack)),
        Case::passing("ui.catalogue.add_random_items_badge", CaseBody::Ui(add_random_items_badge)),
        Case::passing("ui.catalogue.add_random_items_cart", CaseBody::Ui(add_random_items_cart)),
        Case::passing("ui.catalogue.remove_random_item", CaseBody::Ui(remove_random_item)),
        Case::passing("ui.catalogue.checkout", CaseBody::Ui(checkout)),
        Case::passing(
            "ui.catalogue.checkout_without_postal_code",
            CaseBody::Ui(checkout_without_postal_code),
        ),
        Case::passing("ui.catalogue.price_sorting", CaseBody::Ui(price_sorting)),
        Case::passing("ui.catalogue.product_details", CaseBody::Ui(product_details)),
    ]
}

async fn log_in(ctx: &UiContext, username: &str, password: &str) -> ProbeResult<LoginOutcome> {
    let login = LoginPage::from_session(ctx.session.clone());
    login.open_login().await?;
    login.login(username, password).await
}

async fn logged_in(ctx: &UiContext) -> ProbeResult<ProductsPage> {
    let accounts = &ctx.site.accounts;
    log_in(ctx, &accounts.standard, &accounts.password)
        .await?
        .into_products()
        .await
}

async fn check_catalogue_shown(ctx: &UiContext, products: &ProductsPage) -> ProbeResult<()> {
    let expected = ProductsPage::url(ctx.session.urls());
    let actual = products.current_url().await?;
    Assertion::equals(expected.as_str(), actual.as_str(), "URL after login")?;
    Assertion::is_true(products.is_displayed().await, "products title is not displayed")?;
    let title = products.title_text().await?;
    Assertion::equals("Products", title.as_str(), "products title")
}

async fn accepted_login(ctx: UiContext, username: String) -> ProbeResult<()> {
    let products = log_in(&ctx, &username, &ctx.site.accounts.password)
        .await?
        .into_products()
        .await?;
    check_catalogue_shown(&ctx, &products).await
}

async fn rejected_login(
    ctx: UiContext,
    username: String,
    password: String,
    expected_error: &str,
) -> ProbeResult<()> {
    let login = log_in(&ctx, &username, &password).await?.into_rejected()?;
    let actual = login.current_url().await?;
    Assertion::equals(ctx.session.urls().login(), actual.as_str(), "URL after rejected login")?;
    Assertion::equals_ignore_case(expected_error, &login.error_message().await?, "login error")
}

fn login_standard_user(ctx: UiContext) -> CaseFuture {
    let username = ctx.site.accounts.standard.clone();
    accepted_login(ctx, username).boxed_local()
}

fn login_problem_user(ctx: UiContext) -> CaseFuture {
    let username = ctx.site.accounts.problem.clone();
    accepted_login(ctx, username).boxed_local()
}

fn login_performance_glitch_user(ctx: UiContext) -> CaseFuture {
    let username = ctx.site.accounts.performance_glitch.clone();
    accepted_login(ctx, username).boxed_local()
}

fn login_locked_out_user(ctx: UiContext) -> CaseFuture {
    let username = ctx.site.accounts.locked_out.clone();
    let password = ctx.site.accounts.password.clone();
    rejected_login(
        ctx,
        username,
        password,
        "Epic sadface: Sorry, this user has been locked out.",
    )
    .boxed_local()
}

fn login_invalid_password(ctx: UiContext) -> CaseFuture {
    let username = ctx.site.accounts.standard.clone();
    let password = ctx.site.accounts.invalid_password.clone();
    rejected_login(
        ctx,
        username,
        password,
        "Epic sadface: Username and password do not match any user in this service",
    )
    .boxed_local()
}

fn logout_from_menu(ctx: UiContext) -> CaseFuture {
    async move {
        let products = logged_in(&ctx).await?;
        products.open_menu().await?;
        let login = products.logout().await?;
        Assertion::is_true(login.is_login_box_visible().await, "login box is not visible after logout")
    }
    .boxed_local()
}

fn reset_app_state(ctx: UiContext) -> CaseFuture {
    async move {
        let mut rng = scenario_rng();
        let products = logged_in(&ctx).await?;
        let initial_add_buttons = products.add_button_count().await?;

        let added = products.add_random_products(&mut rng).await?;
        Assertion::equals(&added, &products.cart_badge_count().await?, "badge after adding")?;

        products.open_menu().await?;
        products.reset_app_state().await?;
        Assertion::equals(&0, &products.cart_badge_count().await?, "badge after reset")?;

        let add_buttons = products.add_button_count().await?;
        let remove_buttons = products.remove_button_count().await?;
        Assertion::equals(&initial_add_buttons, &add_buttons, "Add to cart buttons after reset")?;
        Assertion::equals(&0, &remove_buttons, "Remove buttons after reset")
    }
    .boxed_local()
}

fn add_backpack(ctx: UiContext) -> CaseFuture {
    async move {
        let products = logged_in(&ctx).await?;
        products.add_backpack().await?;
        Assertion::equals(&1, &products.cart_badge_count().await?, "badge")?;
        Assertion::is_false(
            products.is_add_backpack_button_displayed().await,
            "backpack Add to cart button still shows",
        )?;
        Assertion::is_true(
            products.is_remove_backpack_button_displayed().await,
            "backpack Remove button does not show",
        )
    }
    .boxed_local()
}

fn add_random_items_badge(ctx: UiContext) -> CaseFuture {
    async move {
        let mut rng = scenario_rng();
        let products = logged_in(&ctx).await?;
        let added = products.add_random_products(&mut rng).await?;
        Assertion::equals(&added, &products.cart_badge_count().await?, "badge")
    }
    .boxed_local()
}

fn add_random_items_cart(ctx: UiContext) -> CaseFuture {
    async move {
        let mut rng = scenario_rng();
        let products = logged_in(&ctx).await?;
        let names = products.add_random_products_named(&mut rng).await?;
        Assertion::equals(&names.len(), &products.cart_badge_count().await?, "badge")?;

        let cart = products.open_cart().await?;
        Assertion::is_true(cart.is_displayed().await, "cart page is not displayed")?;
        for name in &names {
            Assertion::is_true(cart.contains_item(name).await, format!("{name} is not in the cart"))?;
        }
        Ok(())
    }
    .boxed_local()
}

fn remove_random_item(ctx: UiContext) -> CaseFuture {
    async move {
        let mut rng = scenario_rng();
        let products = logged_in(&ctx).await?;
        let names = products.add_random_products_named(&mut rng).await?;
        Assertion::equals(&names.len(), &products.cart_badge_count().await?, "badge")?;

        let cart = products.open_cart().await?;
        for name in &names {
            Assertion::is_true(cart.contains_item(name).await, format!("{name} is not in the cart"))?;
        }

        let removed = cart.remove_random_item(&mut rng).await?;
        let remaining = cart.item_names().await?;
        Assertion::equals(&(names.len() - 1), &remaining.len(), "items left in the cart")?;
        Assertion::is_false(
            remaining.contains(&removed),
            format!("{removed} is still in the cart"),
        )?;
        let expected: Vec<String> = names.into_iter().filter(|n| *n != removed).collect();
        Assertion::same_items(&expected, &remaining, "cart after removal")
    }
    .boxed_local()
}

fn checkout(ctx: UiContext) -> CaseFuture {
    async move {
        let mut rng = scenario_rng();
        let products = logged_in(&ctx).await?;
        let names = products.add_random_products_named(&mut rng).await?;
        Assertion::equals(&names.len(), &products.cart_badge_count().await?, "badge")?;

        let cart = products.open_cart().await?;
        for name in &names {
            Assertion::is_true(cart.contains_item(name).await, format!("{name} is not in the cart"))?;
        }

        let info = cart.checkout().await?;
        info.fill_form(&CheckoutInfo::random(&mut rng)).await?;
        let overview = info.continue_checkout().await?.into_overview().await?;

        let item_total = overview.item_total().await?;
        let tax = overview.tax().await?;
        let total = overview.total().await?;
        Assertion::approx_eq(item_total + tax, total, 0.01, "order total")?;

        let complete = overview.finish().await?;
        Assertion::is_true(
            complete.is_thank_you_displayed().await,
            "order confirmation is not displayed",
        )
    }
    .boxed_local()
}

fn checkout_without_postal_code(ctx: UiContext) -> CaseFuture {
    async move {
        let mut rng = scenario_rng();
        let products = logged_in(&ctx).await?;
        let names = products.add_random_products_named(&mut rng).await?;
        Assertion::equals(&names.len(), &products.cart_badge_count().await?, "badge")?;

        let info = products.open_cart().await?.checkout().await?;
        info.fill_form(&CheckoutInfo::random_without_postal_code(&mut rng))
            .await?;
        let info = info.continue_checkout().await?.into_rejected()?;

        Assertion::is_true(info.is_error_displayed().await, "no error for missing postal code")?;
        Assertion::equals_ignore_case(
            "Error: Postal Code is required",
            &info.error_text().await?,
            "checkout error",
        )?;
        let expected = CheckoutInfoPage::url(ctx.session.urls());
        let actual = info.current_url().await?;
        Assertion::equals(expected.as_str(), actual.as_str(), "URL after rejection")
    }
    .boxed_local()
}

fn price_sorting(ctx: UiContext) -> CaseFuture {
    async move {
        let products = logged_in(&ctx).await?;

        products.sort_by(SortOrder::Lohi).await?;
        let low_to_high = products.prices().await?;
        products.sort_by(SortOrder::Hilo).await?;
        let high_to_low = products.prices().await?;

        Assertion::sorted_by(&low_to_high, |a, b| a.total_cmp(b), "prices low to high")?;
        Assertion::sorted_by(&high_to_low, |a, b| b.total_cmp(a), "prices high to low")
    }
    .boxed_local()
}

fn product_details(ctx: UiContext) -> CaseFuture {
    async move {
        let mut rng = scenario_rng();
        let products = logged_in(&ctx).await?;
        let (from_list, details) = products.open_random_product(&mut rng).await?;

        let from_details = details.summary().await?;
        Assertion::equals(&from_list, &from_details, "product card vs details page")?;

        let products = details.back_to_products().await?;
        Assertion::is_true(products.is_displayed().await, "catalogue is not displayed")
    }
    .boxed_local()
}
