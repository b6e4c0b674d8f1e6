//! Stock summary report endpoint.

use api_types::report::{StockSummaryQuery, StockSummaryRow};
use axum::{
    Json,
    extract::{Query, State},
};
use chrono::NaiveDate;

use crate::{ServerError, server::ServerState};

/// Splits a comma-separated filter value into a trimmed set.
///
/// An absent or all-blank value means "no constraint", matching the original
/// service where an empty query field disabled the predicate.
fn csv_set(raw: Option<&str>) -> Option<Vec<String>> {
    let values: Vec<String> = raw?
        .split(',')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect();

    if values.is_empty() { None } else { Some(values) }
}

fn parse_date(raw: Option<&str>, field: &str) -> Result<Option<NaiveDate>, ServerError> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| ServerError::Generic(format!("{field} must be a YYYY-MM-DD date")))
}

fn parse_filter(query: &StockSummaryQuery) -> Result<engine::SummaryFilter, ServerError> {
    Ok(engine::SummaryFilter {
        start_finish_date: parse_date(
            query.start_order_finish_date.as_deref(),
            "startOrderFinishDate",
        )?,
        end_finish_date: parse_date(query.end_order_finish_date.as_deref(), "endOrderFinishDate")?,
        category_ids: csv_set(query.category_id.as_deref()),
        sub_category_ids: csv_set(query.sub_category_id.as_deref()),
        order_id: query
            .order_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string),
        price_min: query.price_min,
        price_max: query.price_max,
        grades: csv_set(query.grade.as_deref()),
    })
}

fn map_row(row: engine::StockSummary) -> StockSummaryRow {
    StockSummaryRow {
        category_id: row.category_id,
        sub_category_id: row.sub_category_id,
        product_name: row.product_name,
        total_buy_weight: row.total_buy_weight,
        total_buy_amount: row.total_buy_amount,
        total_sell_weight: row.total_sell_weight,
        total_sell_amount: row.total_sell_amount,
        remain_weight: row.remain_weight,
        remain_amount: row.remain_amount,
    }
}

pub async fn stock_summary(
    State(state): State<ServerState>,
    Query(query): Query<StockSummaryQuery>,
) -> Result<Json<Vec<StockSummaryRow>>, ServerError> {
    let filter = parse_filter(&query)?;
    let rows = state.engine.stock_summary(&filter).await?;

    Ok(Json(rows.into_iter().map(map_row).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_set_trims_and_drops_blanks() {
        assert_eq!(
            csv_set(Some("A, B ,,C")),
            Some(vec!["A".to_string(), "B".to_string(), "C".to_string()])
        );
        assert_eq!(csv_set(Some("  ,  ")), None);
        assert_eq!(csv_set(None), None);
    }

    #[test]
    fn filter_parses_all_fields() {
        let query = StockSummaryQuery {
            start_order_finish_date: Some("2024-05-01".to_string()),
            end_order_finish_date: Some("2024-05-31".to_string()),
            category_id: Some("01,02".to_string()),
            sub_category_id: Some("0101".to_string()),
            order_id: Some("ORD-1".to_string()),
            price_min: Some(5.0),
            price_max: Some(20.0),
            grade: Some("A,B".to_string()),
        };

        let filter = parse_filter(&query).unwrap();

        assert_eq!(
            filter.start_finish_date,
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );
        assert_eq!(filter.end_finish_date, NaiveDate::from_ymd_opt(2024, 5, 31));
        assert_eq!(
            filter.category_ids,
            Some(vec!["01".to_string(), "02".to_string()])
        );
        assert_eq!(filter.sub_category_ids, Some(vec!["0101".to_string()]));
        assert_eq!(filter.order_id, Some("ORD-1".to_string()));
        assert_eq!(filter.price_min, Some(5.0));
        assert_eq!(filter.price_max, Some(20.0));
        assert_eq!(filter.grades, Some(vec!["A".to_string(), "B".to_string()]));
    }

    #[test]
    fn empty_query_means_no_constraints() {
        let filter = parse_filter(&StockSummaryQuery::default()).unwrap();
        assert_eq!(filter, engine::SummaryFilter::default());
    }

    #[test]
    fn malformed_date_is_rejected() {
        let query = StockSummaryQuery {
            start_order_finish_date: Some("05/01/2024".to_string()),
            ..Default::default()
        };

        assert!(parse_filter(&query).is_err());
    }
}
