use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Films {
    Table,
    Id,
    Name,
    Description,
    ReleaseDate,
    Duration,
    MpaId,
    CreatedAt,
}

#[derive(DeriveIden)]
enum MpaRatings {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Films::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Films::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Films::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Films::Description).text().not_null())
                    .col(ColumnDef::new(Films::ReleaseDate).date().not_null())
                    .col(ColumnDef::new(Films::Duration).integer().not_null())
                    .col(ColumnDef::new(Films::MpaId).integer().not_null())
                    .col(
                        ColumnDef::new(Films::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_films_mpa_id")
                            .from(Films::Table, Films::MpaId)
                            .to(MpaRatings::Table, MpaRatings::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Films::Table).to_owned())
            .await
    }
}
