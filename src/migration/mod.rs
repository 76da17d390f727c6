use sea_orm_migration::prelude::*;

mod m20240101_000001_create_users_table;
mod m20240101_000002_create_dictionary_tables;
mod m20240101_000003_create_films_table;
mod m20240101_000004_create_film_genres_table;
mod m20240101_000005_create_directors_tables;
mod m20240101_000006_create_film_likes_table;
mod m20240101_000007_create_friendships_table;
mod m20240101_000008_create_reviews_table;
mod m20240101_000009_create_review_marks_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_users_table::Migration),
            Box::new(m20240101_000002_create_dictionary_tables::Migration),
            Box::new(m20240101_000003_create_films_table::Migration),
            Box::new(m20240101_000004_create_film_genres_table::Migration),
            Box::new(m20240101_000005_create_directors_tables::Migration),
            Box::new(m20240101_000006_create_film_likes_table::Migration),
            Box::new(m20240101_000007_create_friendships_table::Migration),
            Box::new(m20240101_000008_create_reviews_table::Migration),
            Box::new(m20240101_000009_create_review_marks_table::Migration),
        ]
    }
}
