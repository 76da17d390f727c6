use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS mpa_ratings (
                id SERIAL PRIMARY KEY,
                name VARCHAR(10) NOT NULL UNIQUE
            )",
        )
        .await?;

        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS genres (
                id SERIAL PRIMARY KEY,
                name VARCHAR(50) NOT NULL UNIQUE
            )",
        )
        .await?;

        // Both dictionaries are fixed; the service layer only ever reads them.
        db.execute_unprepared(
            "INSERT INTO mpa_ratings (name)
             VALUES ('G'), ('PG'), ('PG-13'), ('R'), ('NC-17')
             ON CONFLICT (name) DO NOTHING",
        )
        .await?;

        db.execute_unprepared(
            "INSERT INTO genres (name)
             VALUES ('Comedy'), ('Drama'), ('Cartoon'), ('Thriller'),
                    ('Documentary'), ('Action')
             ON CONFLICT (name) DO NOTHING",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS genres").await?;
        db.execute_unprepared("DROP TABLE IF EXISTS mpa_ratings")
            .await?;
        Ok(())
    }
}
