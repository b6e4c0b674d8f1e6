//! Client for the external stock API.
//!
//! The upstream is tolerated, not trusted: numeric item fields arrive as
//! numbers or strings (sometimes neither), finish dates are free-form, and
//! the catalog endpoint has shipped three different envelope shapes. Decoding
//! coerces what it can and defaults the rest, so no NaN or malformed value
//! ever reaches the report core.

use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use serde_json::Value;

use crate::{
    Category, Direction, EngineError, GradedItem, Party, RequestedCategory, SubCategory,
    Transaction, TransactionParties,
};

const TRANSACTIONS_PATH: &str = "/Stock/query-transaction-demo";
const PRODUCTS_PATH: &str = "/category/query-product-demo";

/// Coerces a JSON number, numeric string or anything else to `f64`.
///
/// Missing and non-numeric values become 0 (uniform policy for price,
/// quantity and total).
fn coerce_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn coerce_date(value: Option<&str>) -> Option<NaiveDate> {
    let raw = value?.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

fn coerce_grade(value: Option<String>) -> Option<String> {
    value.map(|g| g.trim().to_string()).filter(|g| !g.is_empty())
}

#[derive(Debug, Default, Deserialize)]
pub struct PartyPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PartiesPayload {
    #[serde(default)]
    pub customer: Option<PartyPayload>,
    #[serde(default)]
    pub transport: Option<PartyPayload>,
    #[serde(default)]
    pub collector: Option<PartyPayload>,
}

#[derive(Debug, Deserialize)]
pub struct ItemPayload {
    #[serde(default)]
    pub grade: Option<String>,
    #[serde(default)]
    pub price: Value,
    #[serde(default)]
    pub quantity: Value,
    #[serde(default)]
    pub total: Value,
}

#[derive(Debug, Deserialize)]
pub struct RequestPayload {
    #[serde(rename = "categoryID", default)]
    pub category_id: String,
    #[serde(rename = "subCategoryID", default)]
    pub sub_category_id: String,
    /// The upstream reuses the name `requestList` for the graded items.
    #[serde(rename = "requestList", default)]
    pub items: Vec<ItemPayload>,
}

#[derive(Debug, Deserialize)]
pub struct OrderPayload {
    #[serde(rename = "orderId", default)]
    pub order_id: String,
    #[serde(rename = "requestList", default)]
    pub request_list: Vec<RequestPayload>,
    #[serde(rename = "transactionParties", default)]
    pub transaction_parties: Option<PartiesPayload>,
    #[serde(rename = "orderFinishedDate", default)]
    pub order_finished_date: Option<String>,
    #[serde(rename = "orderFinishedTime", default)]
    pub order_finished_time: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TransactionsPayload {
    #[serde(rename = "buyTransaction", default)]
    pub buy_transaction: Vec<OrderPayload>,
    #[serde(rename = "sellTransaction", default)]
    pub sell_transaction: Vec<OrderPayload>,
}

#[derive(Debug, Deserialize)]
pub struct SubCategoryPayload {
    #[serde(rename = "subCategoryId", default)]
    pub sub_category_id: String,
    #[serde(rename = "subCategoryName", default)]
    pub sub_category_name: String,
}

#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    #[serde(rename = "categoryId", default)]
    pub category_id: String,
    #[serde(rename = "categoryName", default)]
    pub category_name: String,
    #[serde(default)]
    pub subcategory: Vec<SubCategoryPayload>,
}

fn party(payload: Option<PartyPayload>) -> Party {
    let payload = payload.unwrap_or_default();
    Party {
        name: payload.name.unwrap_or_default(),
        id: payload.id.unwrap_or_default(),
    }
}

impl OrderPayload {
    /// Converts one upstream order into a domain transaction tagged with the
    /// list it came from.
    pub fn into_transaction(self, direction: Direction) -> Transaction {
        let parties = self.transaction_parties.unwrap_or_default();
        let requested_categories = self
            .request_list
            .into_iter()
            .map(|request| RequestedCategory {
                category_id: request.category_id,
                sub_category_id: request.sub_category_id,
                items: request
                    .items
                    .into_iter()
                    .map(|item| GradedItem {
                        grade: coerce_grade(item.grade),
                        price: coerce_number(&item.price),
                        quantity: coerce_number(&item.quantity),
                        total: coerce_number(&item.total),
                    })
                    .collect(),
            })
            .collect();

        Transaction::new(
            direction,
            self.order_id,
            TransactionParties {
                customer: party(parties.customer),
                transport: party(parties.transport),
                collector: party(parties.collector),
            },
            coerce_date(self.order_finished_date.as_deref()),
            self.order_finished_time.filter(|t| !t.is_empty()),
            requested_categories,
        )
    }
}

impl From<CategoryPayload> for Category {
    fn from(payload: CategoryPayload) -> Self {
        Category::new(
            payload.category_id,
            payload.category_name,
            payload
                .subcategory
                .into_iter()
                .map(|sub| SubCategory {
                    sub_category_id: sub.sub_category_id,
                    sub_category_name: sub.sub_category_name,
                })
                .collect(),
        )
    }
}

/// Unwraps the catalog envelope: a bare array, `{"productList": [...]}` or
/// `{"data": [...]}` have all been observed upstream.
pub fn parse_catalog(value: Value) -> Result<Vec<CategoryPayload>, EngineError> {
    let list = match value {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => map
            .remove("productList")
            .or_else(|| map.remove("data"))
            .ok_or_else(|| {
                EngineError::InvalidPayload("unrecognized catalog response shape".to_string())
            })?,
        _ => {
            return Err(EngineError::InvalidPayload(
                "unrecognized catalog response shape".to_string(),
            ));
        }
    };

    serde_json::from_value(list)
        .map_err(|err| EngineError::InvalidPayload(format!("malformed catalog entry: {err}")))
}

/// Thin HTTP client over the stock API. No retry, auth or pagination; a
/// failed fetch surfaces as [`EngineError::Upstream`].
#[derive(Clone, Debug)]
pub struct StockApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl StockApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn query_transactions(&self) -> Result<TransactionsPayload, EngineError> {
        let url = format!("{}{TRANSACTIONS_PATH}", self.base_url);
        let response = self.http.get(&url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }

    pub async fn query_products(&self) -> Result<Vec<CategoryPayload>, EngineError> {
        let url = format!("{}{PRODUCTS_PATH}", self.base_url);
        let response = self.http.get(&url).send().await?.error_for_status()?;
        let value: Value = response.json().await?;
        parse_catalog(value)
    }
}
