//! Product catalog: categories and their subcategories.
//!
//! The catalog is reference data used for display-name resolution in the
//! stock summary; it never decides grouping membership.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubCategory {
    pub sub_category_id: String,
    pub sub_category_name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub category_id: String,
    pub category_name: String,
    pub subcategory: Vec<SubCategory>,
}

impl Category {
    pub fn new(category_id: String, category_name: String, subcategory: Vec<SubCategory>) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_id,
            category_name,
            subcategory,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub category_id: String,
    pub category_name: String,
    pub subcategory: Json,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Category> for ActiveModel {
    fn from(category: &Category) -> Self {
        Self {
            id: ActiveValue::Set(category.id.to_string()),
            category_id: ActiveValue::Set(category.category_id.clone()),
            category_name: ActiveValue::Set(category.category_name.clone()),
            subcategory: ActiveValue::Set(
                serde_json::to_value(&category.subcategory).unwrap_or_default(),
            ),
        }
    }
}

impl TryFrom<Model> for Category {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let subcategory: Vec<SubCategory> =
            serde_json::from_value(model.subcategory).map_err(|err| {
                EngineError::InvalidPayload(format!("stored subcategories are malformed: {err}"))
            })?;

        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::KeyNotFound("category not exists".to_string()))?,
            category_id: model.category_id,
            category_name: model.category_name,
            subcategory,
        })
    }
}
