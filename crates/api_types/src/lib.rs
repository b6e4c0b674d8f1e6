use serde::{Deserialize, Serialize};

pub mod report {
    use super::*;

    /// Query-string filter for `GET /report/stock-summary`.
    ///
    /// Field names match the original service's query parameters; the three
    /// set fields (`categoryId`, `subCategoryId`, `grade`) take
    /// comma-separated values.
    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StockSummaryQuery {
        /// Inclusive lower bound on the order finish date, `YYYY-MM-DD`.
        pub start_order_finish_date: Option<String>,
        /// Inclusive upper bound on the order finish date, `YYYY-MM-DD`.
        pub end_order_finish_date: Option<String>,
        pub category_id: Option<String>,
        pub sub_category_id: Option<String>,
        pub order_id: Option<String>,
        pub price_min: Option<f64>,
        pub price_max: Option<f64>,
        pub grade: Option<String>,
    }

    /// One summary row, serialized camelCase on the wire.
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct StockSummaryRow {
        pub category_id: String,
        pub sub_category_id: String,
        pub product_name: String,
        pub total_buy_weight: f64,
        pub total_buy_amount: f64,
        pub total_sell_weight: f64,
        pub total_sell_amount: f64,
        pub remain_weight: f64,
        pub remain_amount: f64,
    }
}

pub mod order {
    use super::*;

    /// Response of `POST /order/sync`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct OrderSyncResponse {
        pub message: String,
    }

    /// Response of `GET /order/grades`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct GradesResponse {
        pub grades: Vec<String>,
    }
}

pub mod category {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SubCategoryView {
        pub sub_category_id: String,
        pub sub_category_name: String,
    }

    /// One catalog entry as returned by `GET /category/list`.
    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CategoryView {
        pub category_id: String,
        pub category_name: String,
        pub subcategory: Vec<SubCategoryView>,
    }

    /// Response of `POST /category/sync`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategorySyncResponse {
        pub message: String,
    }
}
