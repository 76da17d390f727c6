use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS directors (
                id SERIAL PRIMARY KEY,
                name VARCHAR(200) NOT NULL
            )",
        )
        .await?;

        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS film_directors (
                id SERIAL PRIMARY KEY,
                film_id INTEGER NOT NULL REFERENCES films(id) ON DELETE CASCADE,
                director_id INTEGER NOT NULL REFERENCES directors(id) ON DELETE CASCADE
            )",
        )
        .await?;

        db.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_film_directors_pair \
             ON film_directors(film_id, director_id)",
        )
        .await?;

        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_film_directors_film ON film_directors(film_id)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS film_directors")
            .await?;
        db.execute_unprepared("DROP TABLE IF EXISTS directors")
            .await?;
        Ok(())
    }
}
