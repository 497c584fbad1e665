//! Sale CRUD endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use chrono::{DateTime, Utc};
use common::{SaleId, SaleItemId};
use domain::{EventNotifier, Money, Sale, SaleItem, SaleLine};
use sale_store::SaleRepository;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::service::{NewSale, SaleUpdate, SalesService};

/// Shared application state accessible from all handlers.
pub struct AppState<R: SaleRepository, N: EventNotifier> {
    pub sales: SalesService<R, N>,
}

// -- Request types --

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSaleRequest {
    pub sale_number: String,
    pub sale_date: Option<DateTime<Utc>>,
    pub customer: String,
    pub branch: String,
    #[serde(default)]
    pub items: Vec<SaleItemRequest>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSaleRequest {
    pub id: SaleId,
    pub customer: String,
    pub branch: String,
    #[serde(default)]
    pub items: Vec<SaleItemRequest>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemRequest {
    /// Ignored on create. On update, keeps an item of the same sale.
    pub id: Option<SaleItemId>,
    pub product: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    #[serde(default)]
    pub discount_cents: i64,
    #[serde(default)]
    pub is_cancelled: bool,
}

impl From<SaleItemRequest> for SaleLine {
    fn from(req: SaleItemRequest) -> Self {
        SaleLine {
            id: req.id,
            product: req.product,
            quantity: req.quantity,
            unit_price: Money::from_cents(req.unit_price_cents),
            discount: Money::from_cents(req.discount_cents),
            is_cancelled: req.is_cancelled,
        }
    }
}

// -- Response types --

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleResponse {
    pub id: SaleId,
    pub sale_number: String,
    pub sale_date: DateTime<Utc>,
    pub customer: String,
    pub total_amount_cents: i64,
    pub branch: String,
    pub is_cancelled: bool,
    pub items: Vec<SaleItemResponse>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItemResponse {
    pub id: SaleItemId,
    pub sale_id: SaleId,
    pub product: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub discount_cents: i64,
    pub total_amount_cents: i64,
    pub is_cancelled: bool,
}

impl From<&Sale> for SaleResponse {
    fn from(sale: &Sale) -> Self {
        Self {
            id: sale.id(),
            sale_number: sale.sale_number().to_string(),
            sale_date: sale.sale_date(),
            customer: sale.customer().to_string(),
            total_amount_cents: sale.total_amount().cents(),
            branch: sale.branch().to_string(),
            is_cancelled: sale.is_cancelled(),
            items: sale.items().iter().map(SaleItemResponse::from).collect(),
        }
    }
}

impl From<&SaleItem> for SaleItemResponse {
    fn from(item: &SaleItem) -> Self {
        Self {
            id: item.id,
            sale_id: item.sale_id,
            product: item.product.clone(),
            quantity: item.quantity,
            unit_price_cents: item.unit_price.cents(),
            discount_cents: item.discount.cents(),
            total_amount_cents: item.total_amount().cents(),
            is_cancelled: item.is_cancelled,
        }
    }
}

// -- Handlers --

/// POST /sales: create a sale after checking the business rules.
#[tracing::instrument(skip(state, payload))]
pub async fn create<R: SaleRepository + 'static, N: EventNotifier + 'static>(
    State(state): State<Arc<AppState<R, N>>>,
    payload: Result<Json<CreateSaleRequest>, JsonRejection>,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<SaleResponse>), ApiError> {
    let Json(req) = payload?;
    let sale = state
        .sales
        .create(NewSale {
            sale_number: req.sale_number,
            sale_date: req.sale_date,
            customer: req.customer,
            branch: req.branch,
            items: req.items.into_iter().map(SaleLine::from).collect(),
        })
        .await?;

    let location = format!("/sales/{}", sale.id());
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(SaleResponse::from(&sale)),
    ))
}

/// GET /sales/:id: load a sale with its items.
#[tracing::instrument(skip(state))]
pub async fn get<R: SaleRepository + 'static, N: EventNotifier + 'static>(
    State(state): State<Arc<AppState<R, N>>>,
    Path(id): Path<String>,
) -> Result<Json<SaleResponse>, ApiError> {
    let sale_id = parse_sale_id(&id)?;
    let sale = state.sales.get(sale_id).await?;
    Ok(Json(SaleResponse::from(&sale)))
}

/// PUT /sales/:id: replace customer, branch and items of a sale.
#[tracing::instrument(skip(state, payload))]
pub async fn update<R: SaleRepository + 'static, N: EventNotifier + 'static>(
    State(state): State<Arc<AppState<R, N>>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateSaleRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let sale_id = parse_sale_id(&id)?;
    let Json(req) = payload?;

    state
        .sales
        .update(
            sale_id,
            SaleUpdate {
                id: req.id,
                customer: req.customer,
                branch: req.branch,
                items: req.items.into_iter().map(SaleLine::from).collect(),
            },
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /sales/:id: cancel a sale. The sale is kept, only flagged.
#[tracing::instrument(skip(state))]
pub async fn cancel<R: SaleRepository + 'static, N: EventNotifier + 'static>(
    State(state): State<Arc<AppState<R, N>>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let sale_id = parse_sale_id(&id)?;
    state.sales.cancel(sale_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /sales/:id/items/:item_id: cancel one line item.
#[tracing::instrument(skip(state))]
pub async fn cancel_item<R: SaleRepository + 'static, N: EventNotifier + 'static>(
    State(state): State<Arc<AppState<R, N>>>,
    Path((id, item_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let sale_id = parse_sale_id(&id)?;
    let item_id = item_id
        .parse::<SaleItemId>()
        .map_err(|e| ApiError::BadRequest(format!("Invalid item ID format: {e}")))?;

    state.sales.cancel_item(sale_id, item_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_sale_id(id: &str) -> Result<SaleId, ApiError> {
    id.parse::<SaleId>()
        .map_err(|e| ApiError::BadRequest(format!("Invalid ID format: {e}")))
}
