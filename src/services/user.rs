use crate::{
    error::{AppError, AppResult},
    models::{user, User, UserModel},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder,
};

pub struct UserService {
    db: DatabaseConnection,
}

impl UserService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AppResult<Vec<UserModel>> {
        let users = User::find()
            .order_by_asc(user::Column::Id)
            .all(&self.db)
            .await?;
        Ok(users)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<UserModel> {
        User::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)
    }

    pub async fn create(
        &self,
        email: &str,
        login: &str,
        name: Option<&str>,
        birthday: chrono::NaiveDate,
    ) -> AppResult<UserModel> {
        self.check_unique(email, login, None).await?;

        let now = chrono::Utc::now().naive_utc();

        let new_user = user::ActiveModel {
            email: sea_orm::ActiveValue::Set(email.to_string()),
            login: sea_orm::ActiveValue::Set(login.to_string()),
            name: sea_orm::ActiveValue::Set(display_name(name, login)),
            birthday: sea_orm::ActiveValue::Set(birthday),
            created_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        let user = new_user.insert(&self.db).await?;
        Ok(user)
    }

    pub async fn update(
        &self,
        id: i32,
        email: &str,
        login: &str,
        name: Option<&str>,
        birthday: chrono::NaiveDate,
    ) -> AppResult<UserModel> {
        let existing = self.get_by_id(id).await?;
        self.check_unique(email, login, Some(id)).await?;

        let mut active: user::ActiveModel = existing.into();
        active.email = sea_orm::ActiveValue::Set(email.to_string());
        active.login = sea_orm::ActiveValue::Set(login.to_string());
        active.name = sea_orm::ActiveValue::Set(display_name(name, login));
        active.birthday = sea_orm::ActiveValue::Set(birthday);

        let updated = active.update(&self.db).await?;
        Ok(updated)
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.get_by_id(id).await?;
        User::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    async fn check_unique(&self, email: &str, login: &str, exclude: Option<i32>) -> AppResult<()> {
        let mut query = User::find().filter(
            Condition::any()
                .add(user::Column::Email.eq(email))
                .add(user::Column::Login.eq(login)),
        );
        if let Some(id) = exclude {
            query = query.filter(user::Column::Id.ne(id));
        }

        if query.one(&self.db).await?.is_some() {
            return Err(AppError::Conflict(
                "Email or login is already in use".to_string(),
            ));
        }

        Ok(())
    }
}

/// A blank display name falls back to the login.
pub fn display_name(name: Option<&str>, login: &str) -> String {
    match name {
        Some(n) if !n.trim().is_empty() => n.to_string(),
        _ => login.to_string(),
    }
}
