use crate::{
    error::{AppError, AppResult},
    models::{director, Director, DirectorModel},
};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder};

pub struct DirectorService {
    db: DatabaseConnection,
}

impl DirectorService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AppResult<Vec<DirectorModel>> {
        let directors = Director::find()
            .order_by_asc(director::Column::Id)
            .all(&self.db)
            .await?;
        Ok(directors)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<DirectorModel> {
        Director::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn create(&self, name: &str) -> AppResult<DirectorModel> {
        let new_director = director::ActiveModel {
            name: sea_orm::ActiveValue::Set(name.to_string()),
            ..Default::default()
        };

        let director = new_director.insert(&self.db).await?;
        Ok(director)
    }

    pub async fn update(&self, id: i32, name: &str) -> AppResult<DirectorModel> {
        let existing = self.get_by_id(id).await?;

        let mut active: director::ActiveModel = existing.into();
        active.name = sea_orm::ActiveValue::Set(name.to_string());

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    /// Film links disappear with the director via the FK cascade.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.get_by_id(id).await?;
        Director::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }
}
