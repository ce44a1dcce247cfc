//! # Articles
//!
//! A small resource guarded by the validating extractors.
//!
//! | Method  | Path                 | Guard                     |
//! |---------|----------------------|---------------------------|
//! | `POST`  | `/v1/articles`       | `Bounced<Article>` create |
//! | `PUT`   | `/v1/articles/{id}`  | `Bounced<Article>` create |
//! | `PATCH` | `/v1/articles/{id}`  | `BouncedPatch<Article>`   |
//! | `GET`   | `/v1/articles`       | none                      |
//! | `GET`   | `/v1/articles/{id}`  | none                      |
//!
//! `views` is server-managed: clients may never set it, and reading an
//! article increments it.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use bouncer_schema::{FieldMut, FieldRule, Fields, Schema, Shape};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::{Bounced, BouncedPatch};
use crate::patch::apply_merge_patch;
use crate::state::AppState;

/// An article's author.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Person {
    pub name: String,
    pub email: String,
}

impl Fields for Person {
    fn field_mut(&mut self, name: &str) -> Option<FieldMut<'_>> {
        match name {
            "name" => Some(FieldMut::Text(&mut self.name)),
            "email" => Some(FieldMut::Text(&mut self.email)),
            _ => None,
        }
    }
}

impl Shape for Person {
    fn schema() -> Schema {
        Schema::new("Person")
            .field(FieldRule::scalar("name").required_on_create())
            .field(FieldRule::scalar("email"))
    }
}

/// Article body as accepted from and returned to clients.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Article {
    pub title: String,
    pub content: String,
    pub author: Option<Person>,
    pub tags: Vec<String>,
    pub views: u64,
}

impl Fields for Article {
    fn field_mut(&mut self, name: &str) -> Option<FieldMut<'_>> {
        match name {
            "title" => Some(FieldMut::Text(&mut self.title)),
            "content" => Some(FieldMut::Text(&mut self.content)),
            "author" => Some(FieldMut::OptionalNested(
                self.author.as_mut().map(|p| p as &mut dyn Fields),
            )),
            "tags" => Some(FieldMut::Value(&self.tags)),
            "views" => Some(FieldMut::Value(&self.views)),
            _ => None,
        }
    }
}

impl Shape for Article {
    fn schema() -> Schema {
        Schema::new("Article")
            .field(FieldRule::scalar("title").required_on_create().immutable_on_update())
            .field(FieldRule::scalar("content").required_on_create())
            .field(FieldRule::optional_nested("author", Person::schema()))
            .field(FieldRule::sequence("tags"))
            .field(
                FieldRule::scalar("views")
                    .immutable_on_create()
                    .immutable_on_update(),
            )
    }
}

/// A stored article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    pub id: Uuid,
    #[serde(flatten)]
    pub article: Article,
}

/// Build the articles router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/articles", get(list_articles).post(create_article))
        .route(
            "/v1/articles/{id}",
            get(get_article).put(replace_article).patch(patch_article),
        )
}

fn not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("article {id} not found"))
}

/// POST /v1/articles — Create an article.
async fn create_article(
    State(state): State<AppState>,
    Bounced(article): Bounced<Article>,
) -> (StatusCode, Json<ArticleRecord>) {
    let id = Uuid::new_v4();
    let record = ArticleRecord { id, article };
    state.articles.insert(id, record.clone());
    tracing::info!(%id, "article created");
    (StatusCode::CREATED, Json(record))
}

/// GET /v1/articles — List articles.
async fn list_articles(State(state): State<AppState>) -> Json<Vec<ArticleRecord>> {
    Json(state.articles.list())
}

/// GET /v1/articles/{id} — Read an article, counting the view.
async fn get_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ArticleRecord>, AppError> {
    state
        .articles
        .update(&id, |record| record.article.views += 1)
        .map(Json)
        .ok_or_else(|| not_found(id))
}

/// PUT /v1/articles/{id} — Replace an article, creating it if absent.
async fn replace_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Bounced(mut article): Bounced<Article>,
) -> (StatusCode, Json<ArticleRecord>) {
    let previous = state.articles.get(&id);
    article.views = previous.as_ref().map_or(0, |r| r.article.views);

    let record = ArticleRecord { id, article };
    state.articles.insert(id, record.clone());

    let status = if previous.is_some() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    (status, Json(record))
}

/// PATCH /v1/articles/{id} — Apply the keys the client sent.
async fn patch_article(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    patch: BouncedPatch<Article>,
) -> Result<Json<ArticleRecord>, AppError> {
    let document = patch
        .document_value()
        .map_err(|e| AppError::Internal(format!("merged document is not JSON: {e}")))?;

    let outcome = state.articles.try_update(&id, |record| {
        let current = serde_json::to_value(&record.article)?;
        let mut article: Article = serde_json::from_value(apply_merge_patch(current, document))?;
        article.views = record.article.views;
        record.article = article;
        Ok::<_, serde_json::Error>(record.clone())
    });

    match outcome {
        Some(Ok(record)) => {
            tracing::info!(%id, "article patched");
            Ok(Json(record))
        }
        Some(Err(e)) => Err(AppError::Internal(format!(
            "failed to apply patch to article {id}: {e}"
        ))),
        None => Err(not_found(id)),
    }
}
