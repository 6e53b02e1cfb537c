//! Cart route handlers.
//!
//! Both actions mutate the session quote and answer with the refreshed cart
//! section, so the client can update its cached copy without a second
//! section load.

use axum::{
    Form, Json,
    extract::State,
};
use serde::Deserialize;
use serde_json::Value;
use tower_sessions::Session;
use tracing::instrument;

use minicart_core::{ItemId, ProductId, Qty, QtyError};
use rust_decimal::Decimal;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::sections::{SectionError, SectionSource};
use crate::services::{QuoteSource, SessionQuoteSource};
use crate::state::AppState;

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: i32,
    pub qty: Option<String>,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub item_id: i32,
}

fn quote_source(state: &AppState, session: Session) -> SessionQuoteSource {
    let config = state.config();
    SessionQuoteSource::new(session, config.store_id, config.currency_code)
}

/// Largest quantity a single add may request.
const MAX_ADD_QTY: i64 = 10_000;

/// Parse the requested quantity; absent means one.
fn requested_qty(raw: Option<&str>) -> Result<Qty> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(Qty::from(1_i64));
    };
    let qty: Qty = raw
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid qty '{raw}'")))?;
    if qty.is_zero() || qty.value().is_sign_negative() {
        return Err(AppError::BadRequest(format!("qty must be positive, got '{raw}'")));
    }
    if qty.value() > Decimal::from(MAX_ADD_QTY) {
        return Err(AppError::BadRequest(format!(
            "qty must not exceed {MAX_ADD_QTY}, got '{raw}'"
        )));
    }
    Ok(qty)
}

/// Add a product to the session quote.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Json<Value>> {
    let product_id = ProductId::new(form.product_id);
    let qty = requested_qty(form.qty.as_deref())?;
    let product = state
        .catalog()
        .product(product_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    let quotes = quote_source(&state, session.clone());
    let mut quote = quotes.active_quote().await?;
    let item_id = quote.add_product(product, qty).map_err(|err| match err {
        QtyError::Overflow => {
            AppError::BadRequest(format!("qty {qty} is too large for this cart"))
        }
        err @ QtyError::Invalid(_) => SectionError::from(err).into(),
    })?;
    quotes.save(&quote).await?;

    add_breadcrumb(
        "cart",
        "Added product to cart",
        &[("product_id", product_id.to_string()), ("qty", qty.to_string())],
    );
    tracing::info!(%product_id, %item_id, %qty, "Added to cart");

    Ok(Json(state.cart().section_data(&session).await?))
}

/// Remove a line from the session quote.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Json<Value>> {
    let item_id = ItemId::new(form.item_id);

    let quotes = quote_source(&state, session.clone());
    let mut quote = quotes.active_quote().await?;
    let removed = quote.remove_item(item_id).map_err(SectionError::from)?;
    if !removed {
        return Err(AppError::NotFound(format!("cart item {item_id}")));
    }
    quotes.save(&quote).await?;

    add_breadcrumb("cart", "Removed item from cart", &[("item_id", item_id.to_string())]);
    tracing::info!(%item_id, "Removed from cart");

    Ok(Json(state.cart().section_data(&session).await?))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_requested_qty_defaults_to_one() {
        assert_eq!(requested_qty(None).unwrap(), Qty::from(1_i64));
        assert_eq!(requested_qty(Some("  ")).unwrap(), Qty::from(1_i64));
    }

    #[test]
    fn test_requested_qty_accepts_decimals() {
        assert_eq!(requested_qty(Some("1.5")).unwrap().to_string(), "1.5");
    }

    #[test]
    fn test_requested_qty_rejects_bad_input() {
        for raw in ["abc", "0", "-2"] {
            assert!(
                matches!(requested_qty(Some(raw)), Err(AppError::BadRequest(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn test_requested_qty_rejects_oversized() {
        for raw in ["10001", "79228162514264337593543950335"] {
            assert!(
                matches!(requested_qty(Some(raw)), Err(AppError::BadRequest(_))),
                "{raw} should be rejected"
            );
        }
        assert_eq!(requested_qty(Some("10000")).unwrap(), Qty::from(MAX_ADD_QTY));
    }
}
