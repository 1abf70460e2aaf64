//! Cart route handlers.
//!
//! The cart is serialized into the visitor's session. Form posts mutate it
//! and redirect back to `/cart`; `/api/cart` exposes the same data as JSON.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json,
    extract::State,
    response::Redirect,
};
use boutique_core::cart::{Cart, CartItem};
use boutique_core::{Price, Slug};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::CatalogRepository;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::middleware::session::CART_KEY;
use crate::state::AppState;

// =============================================================================
// Session Helpers
// =============================================================================

/// Load the cart from the session, empty when none has been stored.
async fn load_cart(session: &Session) -> Result<Cart> {
    Ok(session.get::<Cart>(CART_KEY).await?.unwrap_or_default())
}

/// Store the cart in the session.
async fn save_cart(session: &Session, cart: &Cart) -> Result<()> {
    session.insert(CART_KEY, cart).await?;
    Ok(())
}

/// Units in the cart for the header badge. Session failures count as empty.
pub async fn cart_count(session: &Session) -> u32 {
    match session.get::<Cart>(CART_KEY).await {
        Ok(cart) => cart.map_or(0, |cart| cart.item_count()),
        Err(e) => {
            tracing::warn!("Failed to read cart from session: {e}");
            0
        }
    }
}

fn parse_slug(raw: &str) -> Result<Slug> {
    Slug::parse(raw).map_err(|e| AppError::BadRequest(format!("invalid slug: {e}")))
}

// =============================================================================
// Views
// =============================================================================

/// Cart line display data for templates.
#[derive(Debug, Clone)]
pub struct CartLineView {
    pub slug: String,
    pub url: String,
    pub name: String,
    pub image: String,
    pub price: String,
    pub quantity: u32,
    pub max_quantity: i32,
    pub line_total: String,
}

impl From<&CartItem> for CartLineView {
    fn from(item: &CartItem) -> Self {
        Self {
            slug: item.slug.to_string(),
            url: format!("/product/{}", item.slug),
            name: item.name.clone(),
            image: item.image.clone(),
            price: item.price.display(),
            quantity: item.quantity,
            max_quantity: item.count_in_stock.get(),
            line_total: item.line_total().display(),
        }
    }
}

/// JSON cart response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub cart_items: Vec<CartItem>,
    pub item_count: u32,
    pub subtotal: Price,
}

impl From<Cart> for CartResponse {
    fn from(cart: Cart) -> Self {
        Self {
            item_count: cart.item_count(),
            subtotal: cart.subtotal(),
            cart_items: cart.items().to_vec(),
        }
    }
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub lines: Vec<CartLineView>,
    pub subtotal: String,
    pub cart_count: u32,
}

// =============================================================================
// Forms
// =============================================================================

/// Add or remove form data.
#[derive(Debug, Deserialize)]
pub struct SlugForm {
    pub slug: String,
}

/// Update quantity form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub slug: String,
    pub quantity: u32,
}

// =============================================================================
// Handlers
// =============================================================================

/// Display cart page.
#[instrument(skip(session))]
pub async fn show(session: Session) -> Result<CartShowTemplate> {
    let cart = load_cart(&session).await?;

    Ok(CartShowTemplate {
        lines: cart.items().iter().map(CartLineView::from).collect(),
        subtotal: cart.subtotal().display(),
        cart_count: cart.item_count(),
    })
}

/// Cart contents as JSON.
#[instrument(skip(session))]
pub async fn api_show(session: Session) -> Result<Json<CartResponse>> {
    load_cart(&session).await.map(|cart| Json(cart.into()))
}

/// Add one unit of a product.
///
/// Re-reads the product so the stock check uses current data.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<SlugForm>,
) -> Result<Redirect> {
    let slug = parse_slug(&form.slug)?;
    let product = CatalogRepository::new(state.pool())
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    let mut cart = load_cart(&session).await?;
    let quantity = cart.add(&product)?;
    save_cart(&session, &cart).await?;

    add_breadcrumb(
        "cart",
        "Added to cart",
        &[("slug", slug.as_str()), ("quantity", &quantity.to_string())],
    );
    tracing::info!(%slug, quantity, "Added to cart");

    Ok(Redirect::to("/cart"))
}

/// Set the quantity of a cart line. Zero removes it.
///
/// Like `add`, re-reads the product so the stock check uses current data.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<Redirect> {
    let slug = parse_slug(&form.slug)?;
    let mut cart = load_cart(&session).await?;

    if form.quantity == 0 {
        if cart.remove(&slug) {
            save_cart(&session, &cart).await?;
        }
        return Ok(Redirect::to("/cart"));
    }

    let product = CatalogRepository::new(state.pool())
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {slug}")))?;

    cart.update_quantity(&product, form.quantity)?;
    save_cart(&session, &cart).await?;
    tracing::info!(%slug, quantity = form.quantity, "Cart quantity updated");

    Ok(Redirect::to("/cart"))
}

/// Remove a cart line.
#[instrument(skip(session))]
pub async fn remove(session: Session, Form(form): Form<SlugForm>) -> Result<Redirect> {
    let slug = parse_slug(&form.slug)?;

    let mut cart = load_cart(&session).await?;
    if cart.remove(&slug) {
        save_cart(&session, &cart).await?;
    }

    Ok(Redirect::to("/cart"))
}

/// Empty the cart.
#[instrument(skip(session))]
pub async fn clear(session: Session) -> Result<Redirect> {
    session.remove::<Cart>(CART_KEY).await?;
    Ok(Redirect::to("/cart"))
}
