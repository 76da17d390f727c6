use crate::{
    error::{AppError, AppResult},
    models::{review, review_mark, Film, Review, ReviewMark, User},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter,
    Statement,
};

pub const DEFAULT_REVIEW_COUNT: u64 = 10;

/// A review together with its helpfulness score. `useful` is aggregated from
/// review_marks at read time (+1 per positive mark, -1 per negative mark) and
/// is never stored on the review row, so it cannot drift from the marks.
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct ReviewWithUseful {
    pub id: i32,
    pub content: String,
    pub user_id: i32,
    pub film_id: i32,
    pub is_positive: bool,
    pub useful: i64,
}

const SELECT_WITH_USEFUL: &str = "SELECT r.id, r.content, r.user_id, r.film_id, r.is_positive, \
     COALESCE(SUM(CASE WHEN m.is_positive THEN 1 ELSE -1 END), 0)::bigint AS useful \
     FROM reviews r \
     LEFT JOIN review_marks m ON m.review_id = r.id";

pub struct ReviewService {
    db: DatabaseConnection,
}

impl ReviewService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        content: &str,
        film_id: i32,
        user_id: i32,
        is_positive: bool,
    ) -> AppResult<ReviewWithUseful> {
        Film::find_by_id(film_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;
        User::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let now = chrono::Utc::now().naive_utc();

        let new_review = review::ActiveModel {
            content: sea_orm::ActiveValue::Set(content.to_string()),
            user_id: sea_orm::ActiveValue::Set(user_id),
            film_id: sea_orm::ActiveValue::Set(film_id),
            is_positive: sea_orm::ActiveValue::Set(is_positive),
            created_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        let review = new_review.insert(&self.db).await?;

        Ok(ReviewWithUseful {
            id: review.id,
            content: review.content,
            user_id: review.user_id,
            film_id: review.film_id,
            is_positive: review.is_positive,
            useful: 0,
        })
    }

    /// Content and polarity are mutable; author, film and the computed
    /// `useful` are not.
    pub async fn update(
        &self,
        id: i32,
        content: &str,
        is_positive: bool,
    ) -> AppResult<ReviewWithUseful> {
        let existing = Review::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut active: review::ActiveModel = existing.into();
        active.content = sea_orm::ActiveValue::Set(content.to_string());
        active.is_positive = sea_orm::ActiveValue::Set(is_positive);
        active.update(&self.db).await?;

        self.get_by_id(id).await
    }

    /// Physical delete; marks go with the review via the FK cascade.
    /// Deleting an id twice is an error, not a no-op.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        Review::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        Review::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<ReviewWithUseful> {
        let sql = format!("{SELECT_WITH_USEFUL} WHERE r.id = $1 GROUP BY r.id");

        ReviewWithUseful::find_by_statement(Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            &sql,
            [id.into()],
        ))
        .one(&self.db)
        .await?
        .ok_or(AppError::NotFound)
    }

    /// Up to `count` reviews, optionally narrowed to one film, most useful
    /// first. Ties sort by id ascending, i.e. insertion order.
    pub async fn list(&self, film_id: Option<i32>, count: u64) -> AppResult<Vec<ReviewWithUseful>> {
        let (sql, values): (String, Vec<sea_orm::Value>) = match film_id {
            Some(fid) => (
                format!(
                    "{SELECT_WITH_USEFUL} WHERE r.film_id = $1 \
                     GROUP BY r.id ORDER BY useful DESC, r.id ASC LIMIT $2"
                ),
                vec![fid.into(), (count as i64).into()],
            ),
            None => (
                format!(
                    "{SELECT_WITH_USEFUL} \
                     GROUP BY r.id ORDER BY useful DESC, r.id ASC LIMIT $1"
                ),
                vec![(count as i64).into()],
            ),
        };

        let reviews = ReviewWithUseful::find_by_statement(Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            &sql,
            values,
        ))
        .all(&self.db)
        .await?;

        Ok(reviews)
    }

    /// Records a helpfulness vote. A (review, user) pair can hold at most one
    /// mark; a second add is rejected regardless of polarity — there is no
    /// vote-change path, callers must delete and re-add.
    pub async fn add_mark(
        &self,
        review_id: i32,
        user_id: i32,
        is_positive: bool,
    ) -> AppResult<()> {
        Review::find_by_id(review_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;
        User::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let existing = ReviewMark::find()
            .filter(review_mark::Column::ReviewId.eq(review_id))
            .filter(review_mark::Column::UserId.eq(user_id))
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Err(AppError::Conflict(format!(
                "User {user_id} has already marked review {review_id}"
            )));
        }

        let now = chrono::Utc::now().naive_utc();

        let mark = review_mark::ActiveModel {
            review_id: sea_orm::ActiveValue::Set(review_id),
            user_id: sea_orm::ActiveValue::Set(user_id),
            is_positive: sea_orm::ActiveValue::Set(is_positive),
            created_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };
        mark.insert(&self.db).await?;

        Ok(())
    }

    /// The pair identity alone selects the mark: only one mark can exist per
    /// (review, user), so the polarity from the URL takes no part in matching.
    pub async fn delete_mark(&self, review_id: i32, user_id: i32) -> AppResult<()> {
        let res = ReviewMark::delete_many()
            .filter(review_mark::Column::ReviewId.eq(review_id))
            .filter(review_mark::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        if res.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }
}
