//! Category API endpoints.

use api_types::category::{CategorySyncResponse, CategoryView, SubCategoryView};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

fn map_category(category: engine::Category) -> CategoryView {
    CategoryView {
        category_id: category.category_id,
        category_name: category.category_name,
        subcategory: category
            .subcategory
            .into_iter()
            .map(|sub| SubCategoryView {
                sub_category_id: sub.sub_category_id,
                sub_category_name: sub.sub_category_name,
            })
            .collect(),
    }
}

pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state
        .engine
        .categories()
        .await?
        .into_iter()
        .map(map_category)
        .collect();

    Ok(Json(categories))
}

/// Pulls the latest product catalog from the stock API into the store.
pub async fn sync(
    State(state): State<ServerState>,
) -> Result<Json<CategorySyncResponse>, ServerError> {
    let report = state.engine.sync_categories().await?;

    Ok(Json(CategorySyncResponse {
        message: format!(
            "Sync completed successfully. Categories: {}, Subcategories: {}",
            report.categories, report.subcategories
        ),
    }))
}
