use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240501_000001_create_supplier_tables::Migration),
            Box::new(m20240501_000002_create_company_tables::Migration),
            Box::new(m20240501_000003_create_purchase_document_tables::Migration),
        ]
    }
}

// Migration implementations

mod m20240501_000001_create_supplier_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240501_000001_create_supplier_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Suppliers::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Suppliers::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Suppliers::SupplierCode)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Suppliers::TaxId)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Suppliers::Name).string().not_null())
                        .col(ColumnDef::new(Suppliers::LegalName).string().null())
                        .col(ColumnDef::new(Suppliers::BusinessActivity).string().null())
                        .col(ColumnDef::new(Suppliers::ActivityCode1).string().null())
                        .col(ColumnDef::new(Suppliers::ActivityCode2).string().null())
                        .col(ColumnDef::new(Suppliers::ActivityCode3).string().null())
                        .col(ColumnDef::new(Suppliers::ActivityCode4).string().null())
                        .col(ColumnDef::new(Suppliers::Phone).string().null())
                        .col(ColumnDef::new(Suppliers::Email).string().null())
                        .col(
                            ColumnDef::new(Suppliers::Country)
                                .string()
                                .not_null()
                                .default("Chile"),
                        )
                        .col(
                            ColumnDef::new(Suppliers::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Suppliers::CreatedAt).timestamp().not_null())
                        .col(ColumnDef::new(Suppliers::UpdatedAt).timestamp().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SupplierAddresses::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SupplierAddresses::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(SupplierAddresses::SupplierId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SupplierAddresses::AddressType)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SupplierAddresses::StreetAddress)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SupplierAddresses::Commune).string().null())
                        .col(ColumnDef::new(SupplierAddresses::City).string().null())
                        .col(
                            ColumnDef::new(SupplierAddresses::Country)
                                .string()
                                .not_null()
                                .default("Chile"),
                        )
                        .col(
                            ColumnDef::new(SupplierAddresses::IsPrimary)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(SupplierAddresses::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(SupplierAddresses::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_supplier_addresses_supplier_id")
                                .from(SupplierAddresses::Table, SupplierAddresses::SupplierId)
                                .to(Suppliers::Table, Suppliers::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_supplier_addresses_supplier_id")
                        .table(SupplierAddresses::Table)
                        .col(SupplierAddresses::SupplierId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SupplierAddresses::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Suppliers::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Suppliers {
        Table,
        Id,
        SupplierCode,
        TaxId,
        Name,
        LegalName,
        BusinessActivity,
        #[sea_orm(iden = "activity_code_1")]
        ActivityCode1,
        #[sea_orm(iden = "activity_code_2")]
        ActivityCode2,
        #[sea_orm(iden = "activity_code_3")]
        ActivityCode3,
        #[sea_orm(iden = "activity_code_4")]
        ActivityCode4,
        Phone,
        Email,
        Country,
        Active,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum SupplierAddresses {
        Table,
        Id,
        SupplierId,
        AddressType,
        StreetAddress,
        Commune,
        City,
        Country,
        IsPrimary,
        Active,
        CreatedAt,
    }
}

mod m20240501_000002_create_company_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240501_000002_create_company_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Companies::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Companies::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(Companies::TaxId)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Companies::LegalName).string().not_null())
                        .col(ColumnDef::new(Companies::TradeName).string().null())
                        .col(
                            ColumnDef::new(Companies::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(Companies::CreatedAt).timestamp().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PurchaseDocumentTypes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseDocumentTypes::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocumentTypes::DteCode)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocumentTypes::Description)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocumentTypes::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocumentTypes::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PurchaseDocumentTypes::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Companies::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Companies {
        Table,
        Id,
        TaxId,
        LegalName,
        TradeName,
        Active,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum PurchaseDocumentTypes {
        Table,
        Id,
        DteCode,
        Description,
        Active,
        CreatedAt,
    }
}

mod m20240501_000003_create_purchase_document_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240501_000003_create_purchase_document_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PurchaseDocuments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseDocuments::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocuments::SupplierId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocuments::CompanyId)
                                .big_integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocuments::DocumentTypeId)
                                .big_integer()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocuments::DocumentNumber)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PurchaseDocuments::Folio).string().not_null())
                        .col(
                            ColumnDef::new(PurchaseDocuments::DocumentDate)
                                .date()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocuments::IssuerTaxId)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocuments::ReceiverTaxId)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocuments::Observations)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocuments::Subtotal)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocuments::TaxAmount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocuments::DiscountTotal)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocuments::Total)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocuments::Currency)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocuments::ExchangeRate)
                                .decimal()
                                .not_null()
                                .default(1),
                        )
                        .col(ColumnDef::new(PurchaseDocuments::RawXml).text().not_null())
                        .col(
                            ColumnDef::new(PurchaseDocuments::Status)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocuments::WarehouseAvailable)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocuments::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocuments::CreatedAt)
                                .timestamp()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocuments::UpdatedAt)
                                .timestamp()
                                .null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchase_documents_supplier_id")
                                .from(PurchaseDocuments::Table, PurchaseDocuments::SupplierId)
                                .to(Suppliers::Table, Suppliers::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchase_documents_company_id")
                                .from(PurchaseDocuments::Table, PurchaseDocuments::CompanyId)
                                .to(Companies::Table, Companies::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchase_documents_document_type_id")
                                .from(PurchaseDocuments::Table, PurchaseDocuments::DocumentTypeId)
                                .to(PurchaseDocumentTypes::Table, PurchaseDocumentTypes::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PurchaseDocumentDetails::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseDocumentDetails::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocumentDetails::DocumentId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocumentDetails::ProductCode)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocumentDetails::Description)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocumentDetails::Quantity)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocumentDetails::UnitPrice)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocumentDetails::LineDiscount)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocumentDetails::LineSubtotal)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocumentDetails::LineTax)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocumentDetails::LineTotal)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocumentDetails::LineNumber)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocumentDetails::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchase_document_details_document_id")
                                .from(
                                    PurchaseDocumentDetails::Table,
                                    PurchaseDocumentDetails::DocumentId,
                                )
                                .to(PurchaseDocuments::Table, PurchaseDocuments::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchase_document_details_document_id")
                        .table(PurchaseDocumentDetails::Table)
                        .col(PurchaseDocumentDetails::DocumentId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PurchaseDocumentReferences::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PurchaseDocumentReferences::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocumentReferences::DocumentId)
                                .big_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocumentReferences::LineNumber)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocumentReferences::ReferencedDocumentType)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocumentReferences::ReferencedFolio)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocumentReferences::ReferencedDate)
                                .date()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocumentReferences::ReferenceCode)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocumentReferences::Reason)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(PurchaseDocumentReferences::Active)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_purchase_document_references_document_id")
                                .from(
                                    PurchaseDocumentReferences::Table,
                                    PurchaseDocumentReferences::DocumentId,
                                )
                                .to(PurchaseDocuments::Table, PurchaseDocuments::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchase_documents_folio")
                        .table(PurchaseDocuments::Table)
                        .col(PurchaseDocuments::Folio)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_purchase_documents_supplier_id")
                        .table(PurchaseDocuments::Table)
                        .col(PurchaseDocuments::SupplierId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(
                    Table::drop()
                        .table(PurchaseDocumentReferences::Table)
                        .to_owned(),
                )
                .await?;
            manager
                .drop_table(Table::drop().table(PurchaseDocumentDetails::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PurchaseDocuments::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Suppliers {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Companies {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum PurchaseDocumentTypes {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum PurchaseDocuments {
        Table,
        Id,
        SupplierId,
        CompanyId,
        DocumentTypeId,
        DocumentNumber,
        Folio,
        DocumentDate,
        IssuerTaxId,
        ReceiverTaxId,
        Observations,
        Subtotal,
        TaxAmount,
        DiscountTotal,
        Total,
        Currency,
        ExchangeRate,
        RawXml,
        Status,
        WarehouseAvailable,
        Active,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum PurchaseDocumentDetails {
        Table,
        Id,
        DocumentId,
        ProductCode,
        Description,
        Quantity,
        UnitPrice,
        LineDiscount,
        LineSubtotal,
        LineTax,
        LineTotal,
        LineNumber,
        Active,
    }

    #[derive(DeriveIden)]
    enum PurchaseDocumentReferences {
        Table,
        Id,
        DocumentId,
        LineNumber,
        ReferencedDocumentType,
        ReferencedFolio,
        ReferencedDate,
        ReferenceCode,
        Reason,
        Active,
    }
}
