//! Transaction primitives.
//!
//! A `Transaction` is one completed buy or sell order pulled from the stock
//! API. Its requested categories and graded line items are kept nested, the
//! way the upstream payload ships them; the report core flattens them on
//! demand.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

/// Direction tag: which side of the trade a transaction records.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl TryFrom<&str> for Direction {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            other => Err(EngineError::InvalidPayload(format!(
                "invalid transaction direction: {other}"
            ))),
        }
    }
}

/// One identity involved in a transaction (name plus external id).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    pub name: String,
    pub id: String,
}

/// Customer/transport/collector triple carried on every order.
///
/// The report core never reads these; they are kept for parity with the
/// upstream record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionParties {
    pub customer: Party,
    pub transport: Party,
    pub collector: Party,
}

/// One graded line item inside a requested category.
///
/// `total` is trusted verbatim from the source; it is never recomputed from
/// `price * quantity`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GradedItem {
    pub grade: Option<String>,
    pub price: f64,
    pub quantity: f64,
    pub total: f64,
}

/// One category/subcategory requested within an order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequestedCategory {
    pub category_id: String,
    pub sub_category_id: String,
    pub items: Vec<GradedItem>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub direction: Direction,
    pub order_id: String,
    pub parties: TransactionParties,
    pub finished_date: Option<NaiveDate>,
    pub finished_time: Option<String>,
    pub requested_categories: Vec<RequestedCategory>,
}

impl Transaction {
    pub fn new(
        direction: Direction,
        order_id: String,
        parties: TransactionParties,
        finished_date: Option<NaiveDate>,
        finished_time: Option<String>,
        requested_categories: Vec<RequestedCategory>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            direction,
            order_id,
            parties,
            finished_date,
            finished_time,
            requested_categories,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "order_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub direction: String,
    pub order_id: String,
    pub customer_name: String,
    pub customer_id: String,
    pub transport_name: String,
    pub transport_id: String,
    pub collector_name: String,
    pub collector_id: String,
    pub finished_date: Option<Date>,
    pub finished_time: Option<String>,
    pub requested_categories: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            direction: ActiveValue::Set(tx.direction.as_str().to_string()),
            order_id: ActiveValue::Set(tx.order_id.clone()),
            customer_name: ActiveValue::Set(tx.parties.customer.name.clone()),
            customer_id: ActiveValue::Set(tx.parties.customer.id.clone()),
            transport_name: ActiveValue::Set(tx.parties.transport.name.clone()),
            transport_id: ActiveValue::Set(tx.parties.transport.id.clone()),
            collector_name: ActiveValue::Set(tx.parties.collector.name.clone()),
            collector_id: ActiveValue::Set(tx.parties.collector.id.clone()),
            finished_date: ActiveValue::Set(tx.finished_date),
            finished_time: ActiveValue::Set(tx.finished_time.clone()),
            requested_categories: ActiveValue::Set(
                serde_json::to_value(&tx.requested_categories).unwrap_or_default(),
            ),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let requested_categories: Vec<RequestedCategory> =
            serde_json::from_value(model.requested_categories).map_err(|err| {
                EngineError::InvalidPayload(format!("stored order items are malformed: {err}"))
            })?;

        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("transaction not exists".to_string()))?,
            direction: Direction::try_from(model.direction.as_str())?,
            order_id: model.order_id,
            parties: TransactionParties {
                customer: Party {
                    name: model.customer_name,
                    id: model.customer_id,
                },
                transport: Party {
                    name: model.transport_name,
                    id: model.transport_id,
                },
                collector: Party {
                    name: model.collector_name,
                    id: model.collector_id,
                },
            },
            finished_date: model.finished_date,
            finished_time: model.finished_time,
            requested_categories,
        })
    }
}
