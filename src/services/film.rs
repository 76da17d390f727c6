use crate::{
    error::{AppError, AppResult},
    models::{
        director, film, film_director, film_genre, film_like, genre, mpa, Director, DirectorModel,
        Film, FilmDirector, FilmGenre, FilmLike, FilmModel, Genre, GenreModel, Mpa, MpaModel, User,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, QueryFilter, QueryOrder, Statement, TransactionTrait,
};
use std::collections::HashMap;

pub const DEFAULT_POPULAR_COUNT: u64 = 10;

/// A film with its MPA rating and link sets resolved.
#[derive(Debug, Clone)]
pub struct FilmDetails {
    pub film: FilmModel,
    pub mpa: MpaModel,
    pub genres: Vec<GenreModel>,
    pub directors: Vec<DirectorModel>,
}

pub struct FilmService {
    db: DatabaseConnection,
}

impl FilmService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self) -> AppResult<Vec<FilmDetails>> {
        let films = Film::find()
            .order_by_asc(film::Column::Id)
            .all(&self.db)
            .await?;
        self.resolve_details(films).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<FilmDetails> {
        let film = Film::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let mut details = self.resolve_details(vec![film]).await?;
        details.pop().ok_or(AppError::NotFound)
    }

    pub async fn create(
        &self,
        name: &str,
        description: &str,
        release_date: chrono::NaiveDate,
        duration: i32,
        mpa_id: i32,
        genre_ids: Vec<i32>,
        director_ids: Vec<i32>,
    ) -> AppResult<FilmDetails> {
        let genre_ids = dedup_ids(genre_ids);
        let director_ids = dedup_ids(director_ids);
        self.check_references(mpa_id, &genre_ids, &director_ids)
            .await?;

        let now = chrono::Utc::now().naive_utc();

        let txn = self.db.begin().await?;

        let new_film = film::ActiveModel {
            name: sea_orm::ActiveValue::Set(name.to_string()),
            description: sea_orm::ActiveValue::Set(description.to_string()),
            release_date: sea_orm::ActiveValue::Set(release_date),
            duration: sea_orm::ActiveValue::Set(duration),
            mpa_id: sea_orm::ActiveValue::Set(mpa_id),
            created_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };
        let film = new_film.insert(&txn).await?;

        Self::insert_links(&txn, film.id, &genre_ids, &director_ids).await?;
        txn.commit().await?;

        self.get_by_id(film.id).await
    }

    /// Full replacement: scalar columns are overwritten and both link sets
    /// are rebuilt from the request.
    pub async fn update(
        &self,
        id: i32,
        name: &str,
        description: &str,
        release_date: chrono::NaiveDate,
        duration: i32,
        mpa_id: i32,
        genre_ids: Vec<i32>,
        director_ids: Vec<i32>,
    ) -> AppResult<FilmDetails> {
        let existing = Film::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        let genre_ids = dedup_ids(genre_ids);
        let director_ids = dedup_ids(director_ids);
        self.check_references(mpa_id, &genre_ids, &director_ids)
            .await?;

        let txn = self.db.begin().await?;

        let mut active: film::ActiveModel = existing.into();
        active.name = sea_orm::ActiveValue::Set(name.to_string());
        active.description = sea_orm::ActiveValue::Set(description.to_string());
        active.release_date = sea_orm::ActiveValue::Set(release_date);
        active.duration = sea_orm::ActiveValue::Set(duration);
        active.mpa_id = sea_orm::ActiveValue::Set(mpa_id);
        active.update(&txn).await?;

        FilmGenre::delete_many()
            .filter(film_genre::Column::FilmId.eq(id))
            .exec(&txn)
            .await?;
        FilmDirector::delete_many()
            .filter(film_director::Column::FilmId.eq(id))
            .exec(&txn)
            .await?;
        Self::insert_links(&txn, id, &genre_ids, &director_ids).await?;

        txn.commit().await?;

        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        Film::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        Film::delete_by_id(id).exec(&self.db).await?;
        Ok(())
    }

    /// Idempotent: liking a film twice leaves a single like behind.
    pub async fn add_like(&self, film_id: i32, user_id: i32) -> AppResult<()> {
        Film::find_by_id(film_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;
        User::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        self.db
            .execute(Statement::from_sql_and_values(
                sea_orm::DatabaseBackend::Postgres,
                "INSERT INTO film_likes (film_id, user_id, created_at)
                 VALUES ($1, $2, NOW())
                 ON CONFLICT (film_id, user_id) DO NOTHING",
                [film_id.into(), user_id.into()],
            ))
            .await?;

        Ok(())
    }

    pub async fn remove_like(&self, film_id: i32, user_id: i32) -> AppResult<()> {
        let res = FilmLike::delete_many()
            .filter(film_like::Column::FilmId.eq(film_id))
            .filter(film_like::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;

        if res.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    /// Films ordered by like count descending, ties by id.
    pub async fn popular(&self, count: u64) -> AppResult<Vec<FilmDetails>> {
        let films = FilmModel::find_by_statement(Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT f.id, f.name, f.description, f.release_date, f.duration, f.mpa_id, f.created_at \
             FROM films f \
             LEFT JOIN film_likes l ON l.film_id = f.id \
             GROUP BY f.id \
             ORDER BY COUNT(l.user_id) DESC, f.id ASC \
             LIMIT $1",
            [(count as i64).into()],
        ))
        .all(&self.db)
        .await?;

        self.resolve_details(films).await
    }

    /// Films liked by both users, most liked overall first.
    pub async fn common(&self, user_id: i32, friend_id: i32) -> AppResult<Vec<FilmDetails>> {
        let films = FilmModel::find_by_statement(Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT f.id, f.name, f.description, f.release_date, f.duration, f.mpa_id, f.created_at \
             FROM films f \
             JOIN film_likes ul ON ul.film_id = f.id AND ul.user_id = $1 \
             JOIN film_likes fl ON fl.film_id = f.id AND fl.user_id = $2 \
             LEFT JOIN film_likes l ON l.film_id = f.id \
             GROUP BY f.id \
             ORDER BY COUNT(l.user_id) DESC, f.id ASC",
            [user_id.into(), friend_id.into()],
        ))
        .all(&self.db)
        .await?;

        self.resolve_details(films).await
    }

    /// Batch fetch. Membership of `ids` is the only order guarantee.
    pub async fn by_ids(&self, ids: Vec<i32>) -> AppResult<Vec<FilmDetails>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        let films = Film::find()
            .filter(film::Column::Id.is_in(ids))
            .all(&self.db)
            .await?;

        self.resolve_details(films).await
    }

    /// Static lookup, not a model: take the user whose like set overlaps this
    /// user's the most, and return that user's likes minus the user's own.
    pub async fn recommendations(&self, user_id: i32) -> AppResult<Vec<FilmDetails>> {
        User::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        #[derive(FromQueryResult)]
        struct FilmId {
            film_id: i32,
        }

        let rows = FilmId::find_by_statement(Statement::from_sql_and_values(
            sea_orm::DatabaseBackend::Postgres,
            "SELECT l2.film_id \
             FROM film_likes l2 \
             WHERE l2.user_id = ( \
                 SELECT l1.user_id \
                 FROM film_likes l1 \
                 JOIN film_likes me ON me.film_id = l1.film_id AND me.user_id = $1 \
                 WHERE l1.user_id <> $1 \
                 GROUP BY l1.user_id \
                 ORDER BY COUNT(*) DESC \
                 LIMIT 1 \
             ) \
             AND l2.film_id NOT IN (SELECT film_id FROM film_likes WHERE user_id = $1)",
            [user_id.into()],
        ))
        .all(&self.db)
        .await?;

        self.by_ids(rows.into_iter().map(|r| r.film_id).collect())
            .await
    }

    async fn check_references(
        &self,
        mpa_id: i32,
        genre_ids: &[i32],
        director_ids: &[i32],
    ) -> AppResult<()> {
        Mpa::find_by_id(mpa_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound)?;

        if !genre_ids.is_empty() {
            let found = Genre::find()
                .filter(genre::Column::Id.is_in(genre_ids.to_vec()))
                .all(&self.db)
                .await?;
            if found.len() != genre_ids.len() {
                return Err(AppError::NotFound);
            }
        }

        if !director_ids.is_empty() {
            let found = Director::find()
                .filter(director::Column::Id.is_in(director_ids.to_vec()))
                .all(&self.db)
                .await?;
            if found.len() != director_ids.len() {
                return Err(AppError::NotFound);
            }
        }

        Ok(())
    }

    async fn insert_links<C: ConnectionTrait>(
        conn: &C,
        film_id: i32,
        genre_ids: &[i32],
        director_ids: &[i32],
    ) -> AppResult<()> {
        for &genre_id in genre_ids {
            let link = film_genre::ActiveModel {
                film_id: sea_orm::ActiveValue::Set(film_id),
                genre_id: sea_orm::ActiveValue::Set(genre_id),
                ..Default::default()
            };
            link.insert(conn).await?;
        }

        for &director_id in director_ids {
            let link = film_director::ActiveModel {
                film_id: sea_orm::ActiveValue::Set(film_id),
                director_id: sea_orm::ActiveValue::Set(director_id),
                ..Default::default()
            };
            link.insert(conn).await?;
        }

        Ok(())
    }

    /// Resolves MPA rows and both link sets for a batch of films with one
    /// query per table, preserving the films' order.
    async fn resolve_details(&self, films: Vec<FilmModel>) -> AppResult<Vec<FilmDetails>> {
        if films.is_empty() {
            return Ok(vec![]);
        }

        let film_ids: Vec<i32> = films.iter().map(|f| f.id).collect();
        let mpa_ids: Vec<i32> = films.iter().map(|f| f.mpa_id).collect();

        let mpa_map: HashMap<i32, MpaModel> = Mpa::find()
            .filter(mpa::Column::Id.is_in(mpa_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|m| (m.id, m))
            .collect();

        let genre_links = FilmGenre::find()
            .filter(film_genre::Column::FilmId.is_in(film_ids.clone()))
            .all(&self.db)
            .await?;
        let genre_map: HashMap<i32, GenreModel> = Genre::find()
            .filter(genre::Column::Id.is_in(genre_links.iter().map(|l| l.genre_id).collect::<Vec<_>>()))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|g| (g.id, g))
            .collect();

        let director_links = FilmDirector::find()
            .filter(film_director::Column::FilmId.is_in(film_ids))
            .all(&self.db)
            .await?;
        let director_map: HashMap<i32, DirectorModel> = Director::find()
            .filter(
                director::Column::Id
                    .is_in(director_links.iter().map(|l| l.director_id).collect::<Vec<_>>()),
            )
            .all(&self.db)
            .await?
            .into_iter()
            .map(|d| (d.id, d))
            .collect();

        let mut genres_by_film: HashMap<i32, Vec<GenreModel>> = HashMap::new();
        for link in genre_links {
            if let Some(genre) = genre_map.get(&link.genre_id) {
                genres_by_film
                    .entry(link.film_id)
                    .or_default()
                    .push(genre.clone());
            }
        }

        let mut directors_by_film: HashMap<i32, Vec<DirectorModel>> = HashMap::new();
        for link in director_links {
            if let Some(d) = director_map.get(&link.director_id) {
                directors_by_film
                    .entry(link.film_id)
                    .or_default()
                    .push(d.clone());
            }
        }

        let mut details = Vec::with_capacity(films.len());
        for f in films {
            let mpa = mpa_map
                .get(&f.mpa_id)
                .cloned()
                .ok_or(AppError::Internal(anyhow::anyhow!(
                    "film {} references missing MPA rating {}",
                    f.id,
                    f.mpa_id
                )))?;

            let mut genres = genres_by_film.remove(&f.id).unwrap_or_default();
            genres.sort_by_key(|g| g.id);
            let mut directors = directors_by_film.remove(&f.id).unwrap_or_default();
            directors.sort_by_key(|d| d.id);

            details.push(FilmDetails {
                film: f,
                mpa,
                genres,
                directors,
            });
        }

        Ok(details)
    }
}

fn dedup_ids(mut ids: Vec<i32>) -> Vec<i32> {
    ids.sort_unstable();
    ids.dedup();
    ids
}
