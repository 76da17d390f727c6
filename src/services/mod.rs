pub mod director;
pub mod film;
pub mod friendship;
pub mod genre;
pub mod mpa;
pub mod review;
pub mod user;
