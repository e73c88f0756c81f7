use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select,
};
use uuid::Uuid;

use crate::{
    entities::{
        film_work, genre, genre_film_work, person,
        person_film_work::{self, PersonRole},
    },
    error::{AppError, AppResult},
    models::{Movie, MoviePage},
    pagination::{PAGE_SIZE, Paginator},
};

#[derive(Debug, FromQueryResult)]
struct FilmRow {
    id: Uuid,
    title: String,
    description: String,
    creation_date: Option<NaiveDate>,
    rating: Option<f64>,
    film_type: Option<String>,
}

#[derive(Debug, FromQueryResult)]
struct CreditRow {
    film_work_id: Uuid,
    role: PersonRole,
    full_name: String,
}

#[derive(Debug, FromQueryResult)]
struct GenreRow {
    film_work_id: Uuid,
    name: String,
}

/// Names related to one film. Sets keep them distinct and sorted.
#[derive(Debug, Default)]
struct RelatedNames {
    genres: BTreeSet<String>,
    actors: BTreeSet<String>,
    directors: BTreeSet<String>,
    writers: BTreeSet<String>,
}

impl RelatedNames {
    fn credits(&mut self, role: PersonRole) -> &mut BTreeSet<String> {
        match role {
            PersonRole::Actor => &mut self.actors,
            PersonRole::Director => &mut self.directors,
            PersonRole::Writer => &mut self.writers,
        }
    }
}

/// Read-only access to films as the API presents them.
#[derive(Clone)]
pub struct MovieCatalog {
    db: DatabaseConnection,
}

impl MovieCatalog {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(&self, raw_page: Option<&str>) -> AppResult<MoviePage> {
        let paginator = film_query().into_model::<FilmRow>().paginate(&self.db, PAGE_SIZE);
        let count = paginator.num_items().await?;
        let page = Paginator::new(count, PAGE_SIZE).page(raw_page)?;

        let rows = paginator.fetch_page(page.index()).await?;
        let results = self.with_related(rows).await?;

        Ok(MoviePage {
            count,
            total_pages: page.num_pages,
            prev: page.previous(),
            next: page.next(),
            results,
        })
    }

    pub async fn movie(&self, id: Uuid) -> AppResult<Movie> {
        let row = film_query()
            .filter(film_work::Column::Id.eq(id))
            .into_model::<FilmRow>()
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::not_found("no film found matching the query"))?;

        self.with_related(vec![row])
            .await?
            .pop()
            .ok_or_else(|| AppError::not_found("no film found matching the query"))
    }

    async fn with_related(&self, rows: Vec<FilmRow>) -> AppResult<Vec<Movie>> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let (credits, genres) = futures::try_join!(self.credits(&ids), self.genres(&ids))?;

        let mut related: HashMap<Uuid, RelatedNames> = HashMap::with_capacity(rows.len());
        for credit in credits {
            related
                .entry(credit.film_work_id)
                .or_default()
                .credits(credit.role)
                .insert(credit.full_name);
        }
        for genre in genres {
            related.entry(genre.film_work_id).or_default().genres.insert(genre.name);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let names = related.remove(&row.id).unwrap_or_default();
                Movie {
                    id: row.id,
                    title: row.title,
                    description: row.description,
                    creation_date: row.creation_date,
                    rating: row.rating,
                    film_type: row.film_type,
                    genres: names.genres.into_iter().collect(),
                    actors: names.actors.into_iter().collect(),
                    directors: names.directors.into_iter().collect(),
                    writers: names.writers.into_iter().collect(),
                }
            })
            .collect())
    }

    async fn credits(&self, ids: &[Uuid]) -> Result<Vec<CreditRow>, sea_orm::DbErr> {
        person_film_work::Entity::find()
            .select_only()
            .column(person_film_work::Column::FilmWorkId)
            .column(person_film_work::Column::Role)
            .column(person::Column::FullName)
            .inner_join(person::Entity)
            .filter(person_film_work::Column::FilmWorkId.is_in(ids.iter().copied()))
            .into_model::<CreditRow>()
            .all(&self.db)
            .await
    }

    async fn genres(&self, ids: &[Uuid]) -> Result<Vec<GenreRow>, sea_orm::DbErr> {
        genre_film_work::Entity::find()
            .select_only()
            .column(genre_film_work::Column::FilmWorkId)
            .column(genre::Column::Name)
            .inner_join(genre::Entity)
            .filter(genre_film_work::Column::FilmWorkId.is_in(ids.iter().copied()))
            .into_model::<GenreRow>()
            .all(&self.db)
            .await
    }
}

/// Film projection in a stable order: title, then id.
fn film_query() -> Select<film_work::Entity> {
    film_work::Entity::find()
        .select_only()
        .columns([
            film_work::Column::Id,
            film_work::Column::Title,
            film_work::Column::Description,
            film_work::Column::CreationDate,
            film_work::Column::Rating,
        ])
        .column_as(film_work::Column::FilmType, "film_type")
        .order_by_asc(film_work::Column::Title)
        .order_by_asc(film_work::Column::Id)
}
