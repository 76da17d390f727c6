use crate::{
    error::{AppError, AppResult},
    models::{genre, Genre, GenreModel},
};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

pub struct GenreService {
    db: DatabaseConnection,
}

impl GenreService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AppResult<Vec<GenreModel>> {
        let genres = Genre::find()
            .order_by_asc(genre::Column::Id)
            .all(&self.db)
            .await?;
        Ok(genres)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<GenreModel> {
        Genre::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }
}
