//! Recycling stock engine.
//!
//! Owns the synced transaction/category store and the stock-summary report
//! core. The HTTP layer lives in the `server` crate; this crate is the only
//! place that touches the database or the upstream stock API.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};

pub use categories::{Category, SubCategory};
pub use error::EngineError;
pub use report::{CategoryIndex, FlatFact, ProductName, StockSummary, SummaryFilter};
pub use stock_api::StockApiClient;
pub use transactions::{
    Direction, GradedItem, Party, RequestedCategory, Transaction, TransactionParties,
};

mod categories;
mod error;
pub mod report;
mod stock_api;
mod transactions;

type ResultEngine<T> = Result<T, EngineError>;

/// Counts reported after a transaction sync.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TransactionSyncReport {
    pub buy: usize,
    pub sell: usize,
}

/// Counts reported after a catalog sync.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CategorySyncReport {
    pub categories: usize,
    pub subcategories: usize,
}

#[derive(Debug)]
pub struct Engine {
    database: DatabaseConnection,
    stock_api: StockApiClient,
}

impl Engine {
    /// Return a builder for `Engine`.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    /// Stored transactions for one direction, ordered by order id so output
    /// is reproducible.
    pub async fn transactions(&self, direction: Direction) -> ResultEngine<Vec<Transaction>> {
        let models = transactions::Entity::find()
            .filter(transactions::Column::Direction.eq(direction.as_str()))
            .order_by_asc(transactions::Column::OrderId)
            .all(&self.database)
            .await?;

        models.into_iter().map(Transaction::try_from).collect()
    }

    /// The stored product catalog, ordered by category id.
    pub async fn categories(&self) -> ResultEngine<Vec<Category>> {
        let models = categories::Entity::find()
            .order_by_asc(categories::Column::CategoryId)
            .all(&self.database)
            .await?;

        models.into_iter().map(Category::try_from).collect()
    }

    /// Replaces the whole transaction store in one database transaction, so
    /// a failed sync never leaves a half-empty store.
    pub async fn replace_transactions(&self, transactions_new: &[Transaction]) -> ResultEngine<()> {
        let db_tx = self.database.begin().await?;
        transactions::Entity::delete_many().exec(&db_tx).await?;
        for tx in transactions_new {
            transactions::ActiveModel::from(tx).insert(&db_tx).await?;
        }
        db_tx.commit().await?;
        Ok(())
    }

    /// Replaces the whole catalog in one database transaction.
    pub async fn replace_categories(&self, categories_new: &[Category]) -> ResultEngine<()> {
        let db_tx = self.database.begin().await?;
        categories::Entity::delete_many().exec(&db_tx).await?;
        for category in categories_new {
            categories::ActiveModel::from(category).insert(&db_tx).await?;
        }
        db_tx.commit().await?;
        Ok(())
    }

    /// Fetches the combined buy/sell payload from the stock API and replaces
    /// the stored transactions.
    pub async fn sync_transactions(&self) -> ResultEngine<TransactionSyncReport> {
        let payload = self.stock_api.query_transactions().await?;

        let mut all: Vec<Transaction> = payload
            .buy_transaction
            .into_iter()
            .map(|order| order.into_transaction(Direction::Buy))
            .collect();
        let buy = all.len();
        all.extend(
            payload
                .sell_transaction
                .into_iter()
                .map(|order| order.into_transaction(Direction::Sell)),
        );
        let sell = all.len() - buy;

        self.replace_transactions(&all).await?;
        tracing::info!(buy, sell, "transaction sync completed");
        Ok(TransactionSyncReport { buy, sell })
    }

    /// Fetches the product catalog from the stock API and replaces the
    /// stored categories.
    pub async fn sync_categories(&self) -> ResultEngine<CategorySyncReport> {
        let payload = self.stock_api.query_products().await?;

        let categories_new: Vec<Category> = payload.into_iter().map(Category::from).collect();
        let categories = categories_new.len();
        let subcategories = categories_new.iter().map(|c| c.subcategory.len()).sum();

        self.replace_categories(&categories_new).await?;
        tracing::info!(categories, subcategories, "category sync completed");
        Ok(CategorySyncReport {
            categories,
            subcategories,
        })
    }

    /// The stock summary report: loads both directions and the catalog, then
    /// runs the pure pipeline in [`report`].
    ///
    /// Store failures propagate; empty stores yield an empty row list.
    pub async fn stock_summary(&self, filter: &SummaryFilter) -> ResultEngine<Vec<StockSummary>> {
        let buy = self.transactions(Direction::Buy).await?;
        let sell = self.transactions(Direction::Sell).await?;
        let categories = self.categories().await?;

        Ok(report::summarize(&buy, &sell, &categories, filter))
    }

    /// Sorted unique grade labels across the whole store.
    pub async fn distinct_grades(&self) -> ResultEngine<Vec<String>> {
        let models = transactions::Entity::find().all(&self.database).await?;
        let all: Vec<Transaction> = models
            .into_iter()
            .map(Transaction::try_from)
            .collect::<ResultEngine<_>>()?;

        Ok(report::distinct_grades(&all))
    }
}

/// The builder for `Engine`.
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    stock_api: Option<StockApiClient>,
}

impl EngineBuilder {
    /// Pass the required database.
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Pass the stock API client. Defaults to the production endpoint.
    pub fn stock_api(mut self, client: StockApiClient) -> EngineBuilder {
        self.stock_api = Some(client);
        self
    }

    /// Construct `Engine`.
    pub fn build(self) -> Engine {
        Engine {
            database: self.database,
            stock_api: self
                .stock_api
                .unwrap_or_else(|| StockApiClient::new("https://apirecycle.unii.co.th")),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use migration::{Migrator, MigratorTrait};

    use super::*;

    async fn engine() -> Engine {
        let db = sea_orm::Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        Engine::builder().database(db).build()
    }

    fn buy_order(order_id: &str, quantity: f64, total: f64) -> Transaction {
        Transaction::new(
            Direction::Buy,
            order_id.to_string(),
            TransactionParties {
                customer: Party {
                    name: "Somchai".to_string(),
                    id: "C-1".to_string(),
                },
                ..Default::default()
            },
            NaiveDate::from_ymd_opt(2024, 5, 1),
            Some("10:30".to_string()),
            vec![RequestedCategory {
                category_id: "01".to_string(),
                sub_category_id: "0101".to_string(),
                items: vec![GradedItem {
                    grade: Some("A".to_string()),
                    price: 10.0,
                    quantity,
                    total,
                }],
            }],
        )
    }

    fn sell_order(order_id: &str, quantity: f64, total: f64) -> Transaction {
        Transaction::new(
            Direction::Sell,
            order_id.to_string(),
            TransactionParties::default(),
            NaiveDate::from_ymd_opt(2024, 5, 2),
            None,
            vec![RequestedCategory {
                category_id: "01".to_string(),
                sub_category_id: "0101".to_string(),
                items: vec![GradedItem {
                    grade: Some("A".to_string()),
                    price: 10.0,
                    quantity,
                    total,
                }],
            }],
        )
    }

    fn metal_catalog() -> Vec<Category> {
        vec![Category::new(
            "01".to_string(),
            "Metal".to_string(),
            vec![SubCategory {
                sub_category_id: "0101".to_string(),
                sub_category_name: "Copper".to_string(),
            }],
        )]
    }

    #[tokio::test]
    async fn store_round_trip_preserves_transactions() {
        let engine = engine().await;
        let stored = vec![buy_order("ORD-1", 5.0, 50.0), sell_order("ORD-2", 2.0, 20.0)];

        engine.replace_transactions(&stored).await.unwrap();

        let buy = engine.transactions(Direction::Buy).await.unwrap();
        let sell = engine.transactions(Direction::Sell).await.unwrap();
        assert_eq!(buy, vec![stored[0].clone()]);
        assert_eq!(sell, vec![stored[1].clone()]);
    }

    #[tokio::test]
    async fn replace_drops_previous_sync() {
        let engine = engine().await;
        engine
            .replace_transactions(&[buy_order("ORD-1", 5.0, 50.0)])
            .await
            .unwrap();
        engine
            .replace_transactions(&[buy_order("ORD-2", 1.0, 10.0)])
            .await
            .unwrap();

        let buy = engine.transactions(Direction::Buy).await.unwrap();
        assert_eq!(buy.len(), 1);
        assert_eq!(buy[0].order_id, "ORD-2");
    }

    #[tokio::test]
    async fn category_round_trip() {
        let engine = engine().await;
        let catalog = metal_catalog();

        engine.replace_categories(&catalog).await.unwrap();

        assert_eq!(engine.categories().await.unwrap(), catalog);
    }

    #[tokio::test]
    async fn stock_summary_end_to_end() {
        let engine = engine().await;
        engine
            .replace_transactions(&[buy_order("ORD-1", 5.0, 50.0), sell_order("ORD-2", 2.0, 20.0)])
            .await
            .unwrap();
        engine.replace_categories(&metal_catalog()).await.unwrap();

        let rows = engine.stock_summary(&SummaryFilter::default()).await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].product_name, "Metal / Copper");
        assert_eq!(rows[0].remain_weight, 3.0);
        assert_eq!(rows[0].remain_amount, 30.0);
    }

    #[tokio::test]
    async fn stock_summary_on_empty_store_is_empty() {
        let engine = engine().await;
        engine.replace_categories(&metal_catalog()).await.unwrap();

        let rows = engine.stock_summary(&SummaryFilter::default()).await.unwrap();

        assert!(rows.is_empty());
    }

    #[tokio::test]
    async fn distinct_grades_spans_both_directions() {
        let engine = engine().await;
        let mut sell = sell_order("ORD-2", 2.0, 20.0);
        sell.requested_categories[0].items[0].grade = Some("C".to_string());
        engine
            .replace_transactions(&[buy_order("ORD-1", 5.0, 50.0), sell])
            .await
            .unwrap();

        assert_eq!(
            engine.distinct_grades().await.unwrap(),
            vec!["A".to_string(), "C".to_string()]
        );
    }
}
