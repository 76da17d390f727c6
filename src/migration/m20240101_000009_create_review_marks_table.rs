use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum ReviewMarks {
    Table,
    Id,
    ReviewId,
    UserId,
    IsPositive,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Reviews {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ReviewMarks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ReviewMarks::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ReviewMarks::ReviewId).integer().not_null())
                    .col(ColumnDef::new(ReviewMarks::UserId).integer().not_null())
                    .col(
                        ColumnDef::new(ReviewMarks::IsPositive)
                            .boolean()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ReviewMarks::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_marks_review_id")
                            .from(ReviewMarks::Table, ReviewMarks::ReviewId)
                            .to(Reviews::Table, Reviews::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_marks_user_id")
                            .from(ReviewMarks::Table, ReviewMarks::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One mark per (review, user); the duplicate-mark rejection rests on this.
        manager
            .create_index(
                Index::create()
                    .name("idx_review_marks_unique")
                    .table(ReviewMarks::Table)
                    .col(ReviewMarks::ReviewId)
                    .col(ReviewMarks::UserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_review_marks_review")
                    .table(ReviewMarks::Table)
                    .col(ReviewMarks::ReviewId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ReviewMarks::Table).to_owned())
            .await
    }
}
