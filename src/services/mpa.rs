use crate::{
    error::{AppError, AppResult},
    models::{mpa, Mpa, MpaModel},
};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

pub struct MpaService {
    db: DatabaseConnection,
}

impl MpaService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AppResult<Vec<MpaModel>> {
        let ratings = Mpa::find()
            .order_by_asc(mpa::Column::Id)
            .all(&self.db)
            .await?;
        Ok(ratings)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<MpaModel> {
        Mpa::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }
}
