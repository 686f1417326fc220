use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_sales_requests_table::Migration),
            Box::new(m20250301_000002_create_approval_history_table::Migration),
            Box::new(m20250301_000003_create_inventory_tables::Migration),
            Box::new(m20250301_000004_create_dispatch_records_table::Migration),
            Box::new(m20250301_000005_create_pricing_tables::Migration),
            Box::new(m20250301_000006_create_showrooms_table::Migration),
            Box::new(m20250301_000007_create_users_table::Migration),
            Box::new(m20250301_000008_create_notifications_table::Migration),
        ]
    }
}

// Migration implementations

mod m20250301_000001_create_sales_requests_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000001_create_sales_requests_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(SalesRequests::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SalesRequests::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SalesRequests::RequestType).string().not_null())
                        .col(ColumnDef::new(SalesRequests::RequestedBy).string().not_null())
                        .col(
                            ColumnDef::new(SalesRequests::RequestedByName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SalesRequests::RequesterRole)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SalesRequests::Items).json().null())
                        .col(ColumnDef::new(SalesRequests::Product).string().null())
                        .col(ColumnDef::new(SalesRequests::Quantity).json().null())
                        .col(ColumnDef::new(SalesRequests::Products).json().null())
                        .col(
                            ColumnDef::new(SalesRequests::Priority)
                                .string()
                                .not_null()
                                .default("normal"),
                        )
                        .col(ColumnDef::new(SalesRequests::Notes).string().null())
                        .col(ColumnDef::new(SalesRequests::ShopName).string().null())
                        .col(ColumnDef::new(SalesRequests::Status).string().not_null())
                        .col(ColumnDef::new(SalesRequests::ApprovedBy).string().null())
                        .col(ColumnDef::new(SalesRequests::ApproverName).string().null())
                        .col(ColumnDef::new(SalesRequests::ApproverRole).string().null())
                        .col(ColumnDef::new(SalesRequests::ApprovedAt).timestamp().null())
                        .col(ColumnDef::new(SalesRequests::RejectedBy).string().null())
                        .col(
                            ColumnDef::new(SalesRequests::RejectionReason)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(SalesRequests::RejectedAt).timestamp().null())
                        .col(
                            ColumnDef::new(SalesRequests::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SalesRequests::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_sales_requests_status")
                        .table(SalesRequests::Table)
                        .col(SalesRequests::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_sales_requests_created_at")
                        .table(SalesRequests::Table)
                        .col(SalesRequests::CreatedAt)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SalesRequests::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum SalesRequests {
        Table,
        Id,
        RequestType,
        RequestedBy,
        RequestedByName,
        RequesterRole,
        Items,
        Product,
        Quantity,
        Products,
        Priority,
        Notes,
        ShopName,
        Status,
        ApprovedBy,
        ApproverName,
        ApproverRole,
        ApprovedAt,
        RejectedBy,
        RejectionReason,
        RejectedAt,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000002_create_approval_history_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000002_create_approval_history_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ApprovalHistory::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ApprovalHistory::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ApprovalHistory::RequestId).uuid().not_null())
                        .col(ColumnDef::new(ApprovalHistory::Items).json().not_null())
                        .col(
                            ColumnDef::new(ApprovalHistory::TotalQuantity)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ApprovalHistory::RequesterId)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ApprovalHistory::RequesterName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ApprovalHistory::RequesterRole)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ApprovalHistory::RequestType)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ApprovalHistory::RecordType)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ApprovalHistory::Priority).string().not_null())
                        .col(ColumnDef::new(ApprovalHistory::Notes).string().null())
                        .col(ColumnDef::new(ApprovalHistory::Status).string().not_null())
                        .col(ColumnDef::new(ApprovalHistory::ApprovedBy).string().not_null())
                        .col(
                            ColumnDef::new(ApprovalHistory::ApproverName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ApprovalHistory::ApproverRole)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ApprovalHistory::ApprovedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ApprovalHistory::IsDispatched)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(ApprovalHistory::IsCompletedByFg)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(ApprovalHistory::ShopName).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_approval_history_request_id")
                        .table(ApprovalHistory::Table)
                        .col(ApprovalHistory::RequestId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_approval_history_is_dispatched")
                        .table(ApprovalHistory::Table)
                        .col(ApprovalHistory::IsDispatched)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(ApprovalHistory::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ApprovalHistory {
        Table,
        Id,
        RequestId,
        Items,
        TotalQuantity,
        RequesterId,
        RequesterName,
        RequesterRole,
        RequestType,
        RecordType,
        Priority,
        Notes,
        Status,
        ApprovedBy,
        ApproverName,
        ApproverRole,
        ApprovedAt,
        IsDispatched,
        IsCompletedByFg,
        ShopName,
    }
}

mod m20250301_000003_create_inventory_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000003_create_inventory_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(BulkInventory::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(BulkInventory::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(BulkInventory::ProductId).string().not_null())
                        .col(
                            ColumnDef::new(BulkInventory::ProductName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BulkInventory::BatchNumber)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BulkInventory::Quantity)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(BulkInventory::Unit).string().not_null())
                        .col(
                            ColumnDef::new(BulkInventory::QualityGrade)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(BulkInventory::ExpiryDate).date().null())
                        .col(
                            ColumnDef::new(BulkInventory::ReleaseCode)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(BulkInventory::Location).string().not_null())
                        .col(
                            ColumnDef::new(BulkInventory::ReceivedFrom)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(BulkInventory::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(ColumnDef::new(BulkInventory::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_bulk_inventory_product_batch")
                        .table(BulkInventory::Table)
                        .col(BulkInventory::ProductId)
                        .col(BulkInventory::BatchNumber)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PackagedInventory::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PackagedInventory::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PackagedInventory::ProductId)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PackagedInventory::ProductName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PackagedInventory::VariantName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PackagedInventory::VariantSize)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PackagedInventory::VariantUnit)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PackagedInventory::BatchNumber)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PackagedInventory::UnitsInStock)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PackagedInventory::QualityGrade)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PackagedInventory::ExpiryDate).date().null())
                        .col(
                            ColumnDef::new(PackagedInventory::ReleaseCode)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PackagedInventory::Location)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PackagedInventory::ReceivedFrom)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PackagedInventory::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PackagedInventory::UpdatedAt)
                                .timestamp()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_packaged_inventory_product_batch_variant")
                        .table(PackagedInventory::Table)
                        .col(PackagedInventory::ProductId)
                        .col(PackagedInventory::BatchNumber)
                        .col(PackagedInventory::VariantName)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(StockMovements::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockMovements::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockMovements::MovementType)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockMovements::InventoryKind)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockMovements::ProductId).string().not_null())
                        .col(
                            ColumnDef::new(StockMovements::ProductName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockMovements::BatchNumber)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockMovements::QuantityChange)
                                .decimal()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockMovements::Location).string().not_null())
                        .col(ColumnDef::new(StockMovements::Reference).string().not_null())
                        .col(ColumnDef::new(StockMovements::Reason).string().null())
                        .col(
                            ColumnDef::new(StockMovements::RecordedBy)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StockMovements::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_stock_movements_created_at")
                        .table(StockMovements::Table)
                        .col(StockMovements::CreatedAt)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(StorageLocations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StorageLocations::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StorageLocations::Code)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(StorageLocations::Name).string().not_null())
                        .col(ColumnDef::new(StorageLocations::Capacity).integer().null())
                        .col(
                            ColumnDef::new(StorageLocations::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StorageLocations::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(StockMovements::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PackagedInventory::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(BulkInventory::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum BulkInventory {
        Table,
        Id,
        ProductId,
        ProductName,
        BatchNumber,
        Quantity,
        Unit,
        QualityGrade,
        ExpiryDate,
        ReleaseCode,
        Location,
        ReceivedFrom,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum PackagedInventory {
        Table,
        Id,
        ProductId,
        ProductName,
        VariantName,
        VariantSize,
        VariantUnit,
        BatchNumber,
        UnitsInStock,
        QualityGrade,
        ExpiryDate,
        ReleaseCode,
        Location,
        ReceivedFrom,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum StockMovements {
        Table,
        Id,
        MovementType,
        InventoryKind,
        ProductId,
        ProductName,
        BatchNumber,
        QuantityChange,
        Location,
        Reference,
        Reason,
        RecordedBy,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum StorageLocations {
        Table,
        Id,
        Code,
        Name,
        Capacity,
        CreatedAt,
    }
}

mod m20250301_000004_create_dispatch_records_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000004_create_dispatch_records_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(DispatchRecords::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(DispatchRecords::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DispatchRecords::HistoryId).uuid().not_null())
                        .col(ColumnDef::new(DispatchRecords::Items).json().not_null())
                        .col(
                            ColumnDef::new(DispatchRecords::ReferenceCode)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DispatchRecords::DispatchedBy)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DispatchRecords::DispatchedByName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(DispatchRecords::DispatchedByRole)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(DispatchRecords::Notes).string().null())
                        .col(
                            ColumnDef::new(DispatchRecords::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_dispatch_records_history_id")
                        .table(DispatchRecords::Table)
                        .col(DispatchRecords::HistoryId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(DispatchRecords::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum DispatchRecords {
        Table,
        Id,
        HistoryId,
        Items,
        ReferenceCode,
        DispatchedBy,
        DispatchedByName,
        DispatchedByRole,
        Notes,
        CreatedAt,
    }
}

mod m20250301_000005_create_pricing_tables {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000005_create_pricing_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ProductPrices::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductPrices::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductPrices::ProductKey)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(ProductPrices::ProductName)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductPrices::Price)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(ProductPrices::Currency).string().not_null())
                        .col(ColumnDef::new(ProductPrices::PriceType).string().not_null())
                        .col(
                            ColumnDef::new(ProductPrices::EffectiveDate)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductPrices::UpdatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PriceHistory::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PriceHistory::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PriceHistory::ProductKey).string().not_null())
                        .col(ColumnDef::new(PriceHistory::ProductName).string().not_null())
                        .col(
                            ColumnDef::new(PriceHistory::PreviousPrice)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PriceHistory::NewPrice)
                                .decimal()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PriceHistory::Currency).string().not_null())
                        .col(ColumnDef::new(PriceHistory::PriceType).string().not_null())
                        .col(
                            ColumnDef::new(PriceHistory::ChangeReason)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PriceHistory::ChangedBy).string().not_null())
                        .col(
                            ColumnDef::new(PriceHistory::EffectiveDate)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PriceHistory::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_price_history_product_key")
                        .table(PriceHistory::Table)
                        .col(PriceHistory::ProductKey)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PriceHistory::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ProductPrices::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ProductPrices {
        Table,
        Id,
        ProductKey,
        ProductName,
        Price,
        Currency,
        PriceType,
        EffectiveDate,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum PriceHistory {
        Table,
        Id,
        ProductKey,
        ProductName,
        PreviousPrice,
        NewPrice,
        Currency,
        PriceType,
        ChangeReason,
        ChangedBy,
        EffectiveDate,
        CreatedAt,
    }
}

mod m20250301_000006_create_showrooms_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000006_create_showrooms_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Showrooms::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Showrooms::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Showrooms::Name).string().not_null())
                        .col(
                            ColumnDef::new(Showrooms::Code)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Showrooms::Location).string().not_null())
                        .col(ColumnDef::new(Showrooms::City).string().not_null())
                        .col(
                            ColumnDef::new(Showrooms::ContactNumber)
                                .string()
                                .not_null()
                                .default(""),
                        )
                        .col(
                            ColumnDef::new(Showrooms::Email)
                                .string()
                                .not_null()
                                .default(""),
                        )
                        .col(ColumnDef::new(Showrooms::ManagerId).string().null())
                        .col(ColumnDef::new(Showrooms::Status).string().not_null())
                        .col(ColumnDef::new(Showrooms::OpeningHours).json().not_null())
                        .col(
                            ColumnDef::new(Showrooms::TargetSales)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(Showrooms::CreatedBy).string().not_null())
                        .col(ColumnDef::new(Showrooms::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Showrooms::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Showrooms::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Showrooms {
        Table,
        Id,
        Name,
        Code,
        Location,
        City,
        ContactNumber,
        Email,
        ManagerId,
        Status,
        OpeningHours,
        TargetSales,
        CreatedBy,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20250301_000007_create_users_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000007_create_users_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Users::Id)
                                .string()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Users::DisplayName).string().not_null())
                        .col(ColumnDef::new(Users::Role).string().not_null())
                        .col(
                            ColumnDef::new(Users::Status)
                                .string()
                                .not_null()
                                .default("active"),
                        )
                        .col(ColumnDef::new(Users::ShowroomId).uuid().null())
                        .col(ColumnDef::new(Users::ShowroomName).string().null())
                        .col(ColumnDef::new(Users::ShowroomCode).string().null())
                        .col(ColumnDef::new(Users::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_users_role")
                        .table(Users::Table)
                        .col(Users::Role)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Users {
        Table,
        Id,
        DisplayName,
        Role,
        Status,
        ShowroomId,
        ShowroomName,
        ShowroomCode,
        CreatedAt,
    }
}

mod m20250301_000008_create_notifications_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250301_000008_create_notifications_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Notifications::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Notifications::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Notifications::UserId).string().not_null())
                        .col(
                            ColumnDef::new(Notifications::NotificationType)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Notifications::Message).string().not_null())
                        .col(ColumnDef::new(Notifications::Data).json().not_null())
                        .col(
                            ColumnDef::new(Notifications::Status)
                                .string()
                                .not_null()
                                .default("unread"),
                        )
                        .col(
                            ColumnDef::new(Notifications::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_notifications_user_id")
                        .table(Notifications::Table)
                        .col(Notifications::UserId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Notifications::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Notifications {
        Table,
        Id,
        UserId,
        NotificationType,
        Message,
        Data,
        Status,
        CreatedAt,
    }
}
