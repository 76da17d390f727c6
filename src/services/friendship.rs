use crate::{
    error::{AppError, AppResult},
    models::{friendship, user, Friendship, User, UserModel},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};
use std::collections::{HashMap, HashSet};

pub struct FriendshipService {
    db: DatabaseConnection,
}

impl FriendshipService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Adds a directed edge. Re-adding an existing edge is a no-op. When the
    /// reverse edge already exists, both directions become confirmed.
    pub async fn add(&self, user_id: i32, friend_id: i32) -> AppResult<()> {
        if user_id == friend_id {
            return Err(AppError::Validation(
                "Cannot add yourself as a friend".to_string(),
            ));
        }

        User::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;
        User::find_by_id(friend_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let reverse = Friendship::find()
            .filter(friendship::Column::UserId.eq(friend_id))
            .filter(friendship::Column::FriendId.eq(user_id))
            .one(&self.db)
            .await?;

        let existing = Friendship::find()
            .filter(friendship::Column::UserId.eq(user_id))
            .filter(friendship::Column::FriendId.eq(friend_id))
            .one(&self.db)
            .await?;

        if existing.is_none() {
            let now = chrono::Utc::now().naive_utc();
            let edge = friendship::ActiveModel {
                user_id: sea_orm::ActiveValue::Set(user_id),
                friend_id: sea_orm::ActiveValue::Set(friend_id),
                confirmed: sea_orm::ActiveValue::Set(reverse.is_some()),
                created_at: sea_orm::ActiveValue::Set(now),
                ..Default::default()
            };
            edge.insert(&self.db).await?;
        }

        if let Some(rev) = reverse {
            if !rev.confirmed {
                let mut active: friendship::ActiveModel = rev.into();
                active.confirmed = sea_orm::ActiveValue::Set(true);
                active.update(&self.db).await?;
            }
        }

        Ok(())
    }

    /// Removes the directed edge; the reverse edge, if any, loses its
    /// confirmation but survives.
    pub async fn remove(&self, user_id: i32, friend_id: i32) -> AppResult<()> {
        let res = Friendship::delete_many()
            .filter(friendship::Column::UserId.eq(user_id))
            .filter(friendship::Column::FriendId.eq(friend_id))
            .exec(&self.db)
            .await?;

        if res.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        let reverse = Friendship::find()
            .filter(friendship::Column::UserId.eq(friend_id))
            .filter(friendship::Column::FriendId.eq(user_id))
            .one(&self.db)
            .await?;

        if let Some(rev) = reverse {
            if rev.confirmed {
                let mut active: friendship::ActiveModel = rev.into();
                active.confirmed = sea_orm::ActiveValue::Set(false);
                active.update(&self.db).await?;
            }
        }

        Ok(())
    }

    /// Users this user befriended, in the order the edges were added.
    pub async fn friends(&self, user_id: i32) -> AppResult<Vec<UserModel>> {
        User::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let edges = Friendship::find()
            .filter(friendship::Column::UserId.eq(user_id))
            .order_by_asc(friendship::Column::Id)
            .all(&self.db)
            .await?;

        let friend_ids: Vec<i32> = edges.iter().map(|e| e.friend_id).collect();
        if friend_ids.is_empty() {
            return Ok(vec![]);
        }

        let users = User::find()
            .filter(user::Column::Id.is_in(friend_ids.clone()))
            .all(&self.db)
            .await?;

        // Reorder to match edge order
        let user_map: HashMap<i32, UserModel> = users.into_iter().map(|u| (u.id, u)).collect();
        let ordered: Vec<UserModel> = friend_ids
            .into_iter()
            .filter_map(|id| user_map.get(&id).cloned())
            .collect();

        Ok(ordered)
    }

    /// Intersection of the two users' friend lists.
    pub async fn common_friends(&self, user_id: i32, other_id: i32) -> AppResult<Vec<UserModel>> {
        let mine = self.friends(user_id).await?;
        let theirs: HashSet<i32> = self
            .friends(other_id)
            .await?
            .into_iter()
            .map(|u| u.id)
            .collect();

        Ok(mine
            .into_iter()
            .filter(|u| theirs.contains(&u.id))
            .collect())
    }
}
