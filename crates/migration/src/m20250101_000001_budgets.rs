use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Budgets::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Budgets::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Budgets::Name).string().not_null())
                    .col(
                        ColumnDef::new(Budgets::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Budgets::EndDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Incomes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Incomes::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Incomes::Name).string().not_null())
                    .col(ColumnDef::new(Incomes::Description).string())
                    .col(
                        ColumnDef::new(Incomes::Status)
                            .string()
                            .not_null()
                            .default("planned"),
                    )
                    .col(ColumnDef::new(Incomes::PlannedAmount).string().not_null())
                    .col(ColumnDef::new(Incomes::ActualAmount).string())
                    .col(
                        ColumnDef::new(Incomes::PlannedPayDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Incomes::ActualPayDate).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Incomes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Incomes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Incomes::CompletedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Incomes::BudgetId).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-incomes-budget_id")
                            .from(Incomes::Table, Incomes::BudgetId)
                            .to(Budgets::Table, Budgets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Expenses::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Expenses::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Expenses::Name).string().not_null())
                    .col(ColumnDef::new(Expenses::Description).string())
                    .col(
                        ColumnDef::new(Expenses::Status)
                            .string()
                            .not_null()
                            .default("planned"),
                    )
                    .col(ColumnDef::new(Expenses::PlannedAmount).string().not_null())
                    .col(ColumnDef::new(Expenses::ActualAmount).string())
                    .col(
                        ColumnDef::new(Expenses::DueDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Expenses::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Expenses::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Expenses::InitiationDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Expenses::CompletionDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Expenses::CancelationDate).timestamp_with_time_zone())
                    .col(ColumnDef::new(Expenses::BudgetId).string().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-expenses-budget_id")
                            .from(Expenses::Table, Expenses::BudgetId)
                            .to(Budgets::Table, Budgets::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-incomes-budget_id")
                    .table(Incomes::Table)
                    .col(Incomes::BudgetId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-expenses-budget_id")
                    .table(Expenses::Table)
                    .col(Expenses::BudgetId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Expenses::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Incomes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Budgets::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Budgets {
    Table,
    Id,
    Name,
    StartDate,
    EndDate,
}

#[derive(Iden)]
enum Incomes {
    Table,
    Id,
    Name,
    Description,
    Status,
    PlannedAmount,
    ActualAmount,
    PlannedPayDate,
    ActualPayDate,
    CreatedAt,
    UpdatedAt,
    CompletedAt,
    BudgetId,
}

#[derive(Iden)]
pub enum Expenses {
    Table,
    Id,
    Name,
    Description,
    Status,
    PlannedAmount,
    ActualAmount,
    DueDate,
    CreatedAt,
    UpdatedAt,
    InitiationDate,
    CompletionDate,
    CancelationDate,
    BudgetId,
}
