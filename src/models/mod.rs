pub mod director;
pub mod film;
pub mod film_director;
pub mod film_genre;
pub mod film_like;
pub mod friendship;
pub mod genre;
pub mod mpa;
pub mod review;
pub mod review_mark;
pub mod user;

pub use director::{Entity as Director, Model as DirectorModel};
pub use film::{Entity as Film, Model as FilmModel};
pub use film_director::Entity as FilmDirector;
pub use film_genre::Entity as FilmGenre;
pub use film_like::Entity as FilmLike;
pub use friendship::Entity as Friendship;
pub use genre::{Entity as Genre, Model as GenreModel};
pub use mpa::{Entity as Mpa, Model as MpaModel};
pub use review::{Entity as Review, Model as ReviewModel};
pub use review_mark::Entity as ReviewMark;
pub use user::{Entity as User, Model as UserModel};
