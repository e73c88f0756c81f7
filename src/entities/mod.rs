pub mod film_work;
pub mod film_work_type;
pub mod genre;
pub mod genre_film_work;
pub mod person;
pub mod person_film_work;
pub mod staff_session;
pub mod staff_user;
