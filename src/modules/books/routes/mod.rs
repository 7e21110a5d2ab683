//! HTML routes for the books module, mounted under `/books`.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Response},
    routing::get,
    Form, Router,
};
use bookcase_http::{error::AppError, redirect};
use bookcase_kernel::ViewRenderer;
use serde_json::json;

use super::models::{Book, BookDraft, BookForm, BookId, ValidationErrors};
use super::store::{BookStore, StoreError};
use crate::utils;

/// Per-request handles shared by every books handler.
#[derive(Clone)]
pub struct BooksState {
    pub store: Arc<dyn BookStore>,
    pub views: Arc<dyn ViewRenderer>,
}

/// Registers HTTP routes for the Books module.
///
/// Create and update accept posts on both the REST-style path and the form
/// path (`/` and `/new`, `/{id}` and `/{id}/edit`).
pub fn router(state: BooksState) -> Router {
    let prefix = utils::log_prefix("books");
    tracing::debug!(target: "project.routes", %prefix, "registering books routes");

    Router::new()
        .route("/", get(list_books).post(create_book))
        .route("/new", get(new_book_form).post(create_book))
        .route("/health", get(health_check))
        .route("/{id}", get(show_book).post(update_book))
        .route("/{id}/edit", get(edit_book_form).post(update_book))
        .route("/{id}/delete", get(confirm_delete).post(delete_book))
        .with_state(state)
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => AppError::not_found(format!("Book {id} not found")),
            StoreError::Validation(errors) => AppError::Internal(
                anyhow::Error::new(errors).context("book validation reached the error path"),
            ),
            StoreError::Unavailable(cause) => AppError::Internal(cause),
        }
    }
}

fn render(
    views: &dyn ViewRenderer,
    template: &str,
    data: serde_json::Value,
) -> Result<Response, AppError> {
    let html = views
        .render(template, &data)
        .map_err(|err| anyhow::Error::new(err).context("failed to render page"))?;
    Ok(Html(html).into_response())
}

fn render_form(
    views: &dyn ViewRenderer,
    template: &str,
    title: &str,
    book: &BookDraft,
    errors: &ValidationErrors,
) -> Result<Response, AppError> {
    render(
        views,
        template,
        json!({
            "title": title,
            "book": book,
            "errors": errors,
        }),
    )
}

/// Ids that are not positive integers cannot name a book.
fn parse_id(raw: &str) -> Result<BookId, AppError> {
    raw.parse::<BookId>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::not_found(format!("Book {raw} not found")))
}

async fn find_book(store: &dyn BookStore, raw_id: &str) -> Result<Book, AppError> {
    let id = parse_id(raw_id)?;
    store
        .get(id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Book {id} not found")))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "books module is healthy"
}

async fn list_books(State(state): State<BooksState>) -> Result<Response, AppError> {
    let books = state.store.list().await?;
    tracing::debug!(count = books.len(), "listing books");

    render(
        state.views.as_ref(),
        "books",
        json!({ "title": "Books", "books": books }),
    )
}

async fn new_book_form(State(state): State<BooksState>) -> Result<Response, AppError> {
    render_form(
        state.views.as_ref(),
        "new-book",
        "New Book",
        &BookDraft::blank(),
        &ValidationErrors::default(),
    )
}

async fn create_book(
    State(state): State<BooksState>,
    Form(form): Form<BookForm>,
) -> Result<Response, AppError> {
    match state.store.create(form.clone()).await {
        Ok(book) => Ok(redirect::found(&format!("/books/{}", book.id))),
        Err(StoreError::Validation(errors)) => {
            tracing::debug!(errors = %errors, "book creation rejected");
            render_form(
                state.views.as_ref(),
                "new-book",
                "New Book",
                &BookDraft::rejected(None, form),
                &errors,
            )
        }
        Err(err) => Err(err.into()),
    }
}

async fn show_book(
    State(state): State<BooksState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let book = find_book(state.store.as_ref(), &id).await?;
    render(
        state.views.as_ref(),
        "book",
        json!({ "title": book.title, "book": book }),
    )
}

async fn edit_book_form(
    State(state): State<BooksState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let book = find_book(state.store.as_ref(), &id).await?;
    render_form(
        state.views.as_ref(),
        "edit",
        "Edit Book",
        &BookDraft::from(&book),
        &ValidationErrors::default(),
    )
}

async fn update_book(
    State(state): State<BooksState>,
    Path(id): Path<String>,
    Form(form): Form<BookForm>,
) -> Result<Response, AppError> {
    let book = find_book(state.store.as_ref(), &id).await?;

    match state.store.update(book.id, form.clone()).await {
        Ok(()) => Ok(redirect::found("/books")),
        Err(StoreError::Validation(errors)) => {
            tracing::debug!(book_id = book.id, errors = %errors, "book update rejected");
            render_form(
                state.views.as_ref(),
                "edit",
                "Edit Book",
                &BookDraft::rejected(Some(book.id), form),
                &errors,
            )
        }
        Err(err) => Err(err.into()),
    }
}

async fn confirm_delete(
    State(state): State<BooksState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let book = find_book(state.store.as_ref(), &id).await?;
    render(
        state.views.as_ref(),
        "delete",
        json!({ "title": "Delete Book", "book": book }),
    )
}

async fn delete_book(
    State(state): State<BooksState>,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let book = find_book(state.store.as_ref(), &id).await?;
    state.store.delete(book.id).await?;
    Ok(redirect::found("/books"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::store::MemoryBookStore;
    use crate::views::HtmlRenderer;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    fn state_with(store: Arc<dyn BookStore>) -> BooksState {
        BooksState {
            store,
            views: Arc::new(HtmlRenderer::new()),
        }
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn parse_id_rejects_zero_and_garbage() {
        assert_eq!(parse_id("12").unwrap(), 12);
        assert!(matches!(parse_id("0"), Err(AppError::NotFound { .. })));
        assert!(matches!(parse_id("abc"), Err(AppError::NotFound { .. })));
        assert!(matches!(parse_id("-3"), Err(AppError::NotFound { .. })));
    }

    #[tokio::test]
    async fn create_redirects_to_detail_page() {
        let store = Arc::new(MemoryBookStore::new());
        let app = router(state_with(store.clone()));

        let response = app
            .oneshot(post_form("/", "title=Dune&author=Herbert"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], "/books/1");
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rejected_create_redisplays_submitted_values() {
        let store = Arc::new(MemoryBookStore::new());
        let app = router(state_with(store.clone()));

        let response = app
            .oneshot(post_form("/new", "title=&author=Herbert&year=1965"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Please provide a value for &quot;Title&quot;"));
        assert!(body.contains("value=\"Herbert\""));
        assert!(body.contains("value=\"1965\""));
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_update_keeps_id_and_input() {
        let store = Arc::new(MemoryBookStore::new());
        let book = store
            .create(BookForm {
                title: "Emma".to_string(),
                author: "Austen".to_string(),
                ..BookForm::default()
            })
            .await
            .unwrap();
        let app = router(state_with(store.clone()));

        let response = app
            .oneshot(post_form(
                &format!("/{}/edit", book.id),
                "title=Emma%20Revised&author=",
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains(&format!("action=\"/books/{}/edit\"", book.id)));
        assert!(body.contains("value=\"Emma Revised\""));
        assert!(body.contains("&quot;Author&quot;"));
        assert_eq!(store.get(book.id).await.unwrap(), Some(book));
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found_on_every_route() {
        let app = router(state_with(Arc::new(MemoryBookStore::new())));

        for request in [
            get_request("/42"),
            get_request("/42/edit"),
            get_request("/42/delete"),
            get_request("/not-a-number"),
            post_form("/42", "title=A&author=B"),
            post_form("/42/edit", "title=A&author=B"),
            post_form("/42/delete", ""),
        ] {
            let uri = request.uri().clone();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }

    struct UnavailableStore;

    #[async_trait]
    impl BookStore for UnavailableStore {
        async fn list(&self) -> Result<Vec<Book>, StoreError> {
            Err(StoreError::Unavailable(anyhow::anyhow!("connection refused")))
        }

        async fn get(&self, _id: BookId) -> Result<Option<Book>, StoreError> {
            Err(StoreError::Unavailable(anyhow::anyhow!("connection refused")))
        }

        async fn create(&self, _form: BookForm) -> Result<Book, StoreError> {
            Err(StoreError::Unavailable(anyhow::anyhow!("connection refused")))
        }

        async fn update(&self, _id: BookId, _form: BookForm) -> Result<(), StoreError> {
            Err(StoreError::Unavailable(anyhow::anyhow!("connection refused")))
        }

        async fn delete(&self, _id: BookId) -> Result<(), StoreError> {
            Err(StoreError::Unavailable(anyhow::anyhow!("connection refused")))
        }
    }

    #[tokio::test]
    async fn store_faults_become_internal_errors() {
        let app = router(state_with(Arc::new(UnavailableStore)));

        let listed = app.clone().oneshot(get_request("/")).await.unwrap();
        assert_eq!(listed.status(), StatusCode::INTERNAL_SERVER_ERROR);

        for request in [
            post_form("/", "title=Dune&author=Herbert"),
            get_request("/1"),
            get_request("/1/edit"),
            post_form("/1/edit", "title=Dune&author=Herbert"),
            post_form("/1/delete", ""),
        ] {
            let uri = request.uri().clone();
            let response = app.clone().oneshot(request).await.unwrap();
            assert_eq!(
                response.status(),
                StatusCode::INTERNAL_SERVER_ERROR,
                "{uri}"
            );
        }
    }

    #[test]
    fn unhandled_validation_failures_are_internal() {
        let err = AppError::from(StoreError::Validation(ValidationErrors::default()));
        assert!(matches!(err, AppError::Internal(_)));
    }
}
