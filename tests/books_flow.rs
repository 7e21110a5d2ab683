//! End-to-end catalog flows through the composed router, fault boundary included.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use bookcase_app::{app, Book, BookForm, BookStore, MemoryBookStore, StoreError};
use bookcase_kernel::settings::Settings;
use tower::ServiceExt;

fn catalog() -> (Router, Arc<MemoryBookStore>) {
    let store = Arc::new(MemoryBookStore::new());
    let router = app::router(&Settings::default(), store.clone());
    (router, store)
}

fn get(uri: &str) -> Request<Body> {
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

async fn send(router: &Router, request: Request<Body>) -> Response {
    router.clone().oneshot(request).await.unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn location(response: &Response) -> String {
    response.headers()[header::LOCATION]
        .to_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn create_then_view_shows_the_book() {
    let (router, _store) = catalog();

    let created = send(&router, post_form("/books", "title=Dune&author=Herbert")).await;
    assert_eq!(created.status(), StatusCode::FOUND);
    let detail = location(&created);
    assert!(detail.starts_with("/books/"));

    let page = send(&router, get(&detail)).await;
    assert_eq!(page.status(), StatusCode::OK);
    let body = body_text(page).await;
    assert!(body.contains("Dune"));
    assert!(body.contains("by Herbert"));
}

#[tokio::test]
async fn blank_title_redisplays_the_new_book_form() {
    let (router, store) = catalog();

    let response = send(
        &router,
        post_form("/books", "title=&author=Herbert&genre=Sci-Fi"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("<h1>New Book</h1>"));
    assert!(body.contains("<li data-field=\"title\">"));
    assert!(body.contains("value=\"Sci-Fi\""));
    assert!(store.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn edit_updates_and_redirects_to_list() {
    let (router, store) = catalog();
    send(&router, post_form("/books/new", "title=Emma&author=Austen")).await;

    let form = send(&router, get("/books/1/edit")).await;
    assert_eq!(form.status(), StatusCode::OK);
    assert!(body_text(form).await.contains("value=\"Emma\""));

    let updated = send(
        &router,
        post_form("/books/1/edit", "title=Emma&author=Jane+Austen&year=1815"),
    )
    .await;
    assert_eq!(updated.status(), StatusCode::FOUND);
    assert_eq!(location(&updated), "/books");

    let book = store.get(1).await.unwrap().unwrap();
    assert_eq!(book.author, "Jane Austen");
    assert_eq!(book.year, Some(1815));
}

#[tokio::test]
async fn delete_then_fetch_is_not_found() {
    let (router, _store) = catalog();
    send(&router, post_form("/books", "title=Dune&author=Herbert")).await;

    let confirm = send(&router, get("/books/1/delete")).await;
    assert_eq!(confirm.status(), StatusCode::OK);
    assert!(body_text(confirm).await.contains("action=\"/books/1/delete\""));

    let deleted = send(&router, post_form("/books/1/delete", "")).await;
    assert_eq!(deleted.status(), StatusCode::FOUND);
    assert_eq!(location(&deleted), "/books");

    let missing = send(&router, get("/books/1")).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    let body = body_text(missing).await;
    assert!(body.contains("Book 1 not found"));
    assert!(body.contains("<h2>404</h2>"));
}

#[tokio::test]
async fn list_reflects_creates_minus_deletes() {
    let (router, store) = catalog();
    for title in ["One", "Two", "Three", "Four"] {
        let body = format!("title={title}&author=Anon");
        send(&router, post_form("/books", &body)).await;
    }
    send(&router, post_form("/books/2/delete", "")).await;

    let list = send(&router, get("/books")).await;
    assert_eq!(list.status(), StatusCode::OK);
    let body = body_text(list).await;
    assert!(body.contains(">One</a>"));
    assert!(!body.contains(">Two</a>"));
    assert!(body.contains(">Four</a>"));
    assert_eq!(store.list().await.unwrap().len(), 3);
}

#[tokio::test]
async fn missing_records_render_error_pages() {
    let (router, _store) = catalog();

    for request in [
        get("/books/99"),
        get("/books/99/edit"),
        get("/books/99/delete"),
        post_form("/books/99/edit", "title=A&author=B"),
        post_form("/books/99/delete", ""),
    ] {
        let response = send(&router, request).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
        assert!(body_text(response).await.contains("Book 99 not found"));
    }
}

#[tokio::test]
async fn root_redirects_to_catalog_and_unknown_paths_render_errors() {
    let (router, _store) = catalog();

    let root = send(&router, get("/")).await;
    assert_eq!(root.status(), StatusCode::FOUND);
    assert_eq!(location(&root), "/books");

    let unknown = send(&router, get("/shelves")).await;
    assert_eq!(unknown.status(), StatusCode::NOT_FOUND);
    assert!(body_text(unknown).await.contains("<h2>404</h2>"));

    let health = send(&router, get("/healthz")).await;
    assert_eq!(health.status(), StatusCode::OK);
    assert!(health.headers().contains_key("x-request-id"));
}

/// Answers every call only after `delay`.
struct SlowStore {
    delay: Duration,
    inner: MemoryBookStore,
}

#[async_trait]
impl BookStore for SlowStore {
    async fn list(&self) -> Result<Vec<Book>, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.list().await
    }

    async fn get(&self, id: u64) -> Result<Option<Book>, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.get(id).await
    }

    async fn create(&self, form: BookForm) -> Result<Book, StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.create(form).await
    }

    async fn update(&self, id: u64, form: BookForm) -> Result<(), StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.update(id, form).await
    }

    async fn delete(&self, id: u64) -> Result<(), StoreError> {
        tokio::time::sleep(self.delay).await;
        self.inner.delete(id).await
    }
}

#[tokio::test]
async fn slow_requests_time_out_as_error_pages() {
    let mut settings = Settings::default();
    settings.server.request_timeout_ms = 20;
    let store = Arc::new(SlowStore {
        delay: Duration::from_millis(500),
        inner: MemoryBookStore::new(),
    });
    let router = app::router(&settings, store);

    let response = send(&router, get("/books")).await;
    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    assert!(body_text(response).await.contains("<h2>408</h2>"));
}

#[tokio::test]
async fn form_post_without_content_type_renders_error_page() {
    let (router, store) = catalog();

    let request = Request::builder()
        .method("POST")
        .uri("/books")
        .body(Body::from("title=Dune&author=Herbert"))
        .unwrap();
    let response = send(&router, request).await;

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    assert!(body_text(response).await.contains("<h2>415</h2>"));
    assert!(store.list().await.unwrap().is_empty());
}
