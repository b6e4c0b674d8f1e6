use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum OrderTransactions {
    Table,
    Id,
    Direction,
    OrderId,
    CustomerName,
    CustomerId,
    TransportName,
    TransportId,
    CollectorName,
    CollectorId,
    FinishedDate,
    FinishedTime,
    RequestedCategories,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    CategoryId,
    CategoryName,
    Subcategory,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OrderTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OrderTransactions::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(OrderTransactions::Direction)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrderTransactions::OrderId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OrderTransactions::CustomerName)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(OrderTransactions::CustomerId)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(OrderTransactions::TransportName)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(OrderTransactions::TransportId)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(OrderTransactions::CollectorName)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(OrderTransactions::CollectorId)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(OrderTransactions::FinishedDate).date())
                    .col(ColumnDef::new(OrderTransactions::FinishedTime).string())
                    .col(
                        ColumnDef::new(OrderTransactions::RequestedCategories)
                            .json()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-order_transactions-direction")
                    .table(OrderTransactions::Table)
                    .col(OrderTransactions::Direction)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-order_transactions-order_id")
                    .table(OrderTransactions::Table)
                    .col(OrderTransactions::OrderId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::CategoryId).string().not_null())
                    .col(ColumnDef::new(Categories::CategoryName).string().not_null())
                    .col(ColumnDef::new(Categories::Subcategory).json().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-categories-category_id")
                    .table(Categories::Table)
                    .col(Categories::CategoryId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OrderTransactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await
    }
}
