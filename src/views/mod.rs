//! Built-in HTML pages for the catalog.
//!
//! Every page reads its fields from the JSON data bag handed over by the
//! handlers and escapes all interpolated text.

use bookcase_kernel::{RenderError, ViewRenderer};
use serde_json::Value;

use crate::utils::escape_html;

/// Renders the `books`, `new-book`, `book`, `edit`, `delete` and `error` pages.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    site_name: String,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self {
            site_name: "Library".to_string(),
        }
    }

    fn layout(&self, data: &Value, body: &str) -> String {
        let title = text(&data["title"]);
        format!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
             <title>{title} | {site}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n\
             <div id=\"wrapper\">\n<header><a href=\"/books\">{site}</a></header>\n\
             <main>\n{body}</main>\n</div>\n</body>\n</html>\n",
            title = escape_html(&title),
            site = escape_html(&self.site_name),
        )
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewRenderer for HtmlRenderer {
    fn render(&self, template: &str, data: &Value) -> Result<String, RenderError> {
        let body = match template {
            "books" => book_list(data)?,
            "new-book" => book_form(
                "new-book",
                data,
                "/books/new".to_string(),
                "Create New Book",
            )?,
            "edit" => {
                let id = require("edit", data, "book")?["id"].clone();
                let action = format!("/books/{}/edit", text(&id));
                book_form("edit", data, action, "Update Book")?
            }
            "book" => book_detail(data)?,
            "delete" => delete_confirmation(data)?,
            "error" => error_page(data)?,
            other => return Err(RenderError::UnknownTemplate(other.to_string())),
        };

        Ok(self.layout(data, &body))
    }
}

const STYLE: &str = "body{font-family:sans-serif;margin:2rem}\
table{border-collapse:collapse}td,th{padding:.4rem .8rem;border-bottom:1px solid #ddd}\
.validation-errors{color:#b00}.button{display:inline-block;margin:.5rem 0}";

fn require<'a>(
    template: &'static str,
    data: &'a Value,
    field: &'static str,
) -> Result<&'a Value, RenderError> {
    match data.get(field) {
        Some(value) if !value.is_null() => Ok(value),
        _ => Err(RenderError::MissingField { template, field }),
    }
}

/// Display form of a scalar; null renders as nothing.
fn text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn field(value: &Value, key: &str) -> String {
    escape_html(&text(&value[key]))
}

fn book_list(data: &Value) -> Result<String, RenderError> {
    let books = require("books", data, "books")?
        .as_array()
        .ok_or(RenderError::MissingField {
            template: "books",
            field: "books",
        })?;

    let mut html = String::from("<h1>Books</h1>\n");
    html.push_str("<p><a class=\"button\" href=\"/books/new\">Create New Book</a></p>\n");

    if books.is_empty() {
        html.push_str("<p class=\"empty\">No books in the catalog yet.</p>\n");
        return Ok(html);
    }

    html.push_str(
        "<table>\n<thead><tr><th>Title</th><th>Author</th><th>Genre</th><th>Year</th></tr></thead>\n<tbody>\n",
    );
    for book in books {
        html.push_str(&format!(
            "<tr><td><a href=\"/books/{id}\">{title}</a></td><td>{author}</td>\
             <td>{genre}</td><td>{year}</td></tr>\n",
            id = field(book, "id"),
            title = field(book, "title"),
            author = field(book, "author"),
            genre = field(book, "genre"),
            year = field(book, "year"),
        ));
    }
    html.push_str("</tbody>\n</table>\n");
    Ok(html)
}

fn error_list(data: &Value) -> String {
    let errors = match data.get("errors").and_then(Value::as_array) {
        Some(errors) if !errors.is_empty() => errors,
        _ => return String::new(),
    };

    let mut html = String::from(
        "<h2 class=\"validation--errors--label\">Oops!</h2>\n<div class=\"validation-errors\">\n<ul>\n",
    );
    for error in errors {
        html.push_str(&format!(
            "<li data-field=\"{}\">{}</li>\n",
            field(error, "field"),
            field(error, "message"),
        ));
    }
    html.push_str("</ul>\n</div>\n");
    html
}

fn book_form(
    template: &'static str,
    data: &Value,
    action: String,
    submit: &str,
) -> Result<String, RenderError> {
    let book = require(template, data, "book")?;

    let mut html = format!("<h1>{}</h1>\n", escape_html(&text(&data["title"])));
    html.push_str(&error_list(data));
    html.push_str(&format!(
        "<form action=\"{}\" method=\"post\">\n",
        escape_html(&action)
    ));
    for (name, label) in [
        ("title", "Title"),
        ("author", "Author"),
        ("genre", "Genre"),
        ("year", "Year"),
    ] {
        html.push_str(&format!(
            "<p><label for=\"{name}\">{label}</label>\
             <input name=\"{name}\" type=\"text\" id=\"{name}\" value=\"{value}\"></p>\n",
            value = field(book, name),
        ));
    }
    html.push_str(&format!(
        "<p><input type=\"submit\" value=\"{}\"></p>\n</form>\n",
        escape_html(submit)
    ));

    if template == "edit" {
        html.push_str(&format!(
            "<p><a class=\"button\" href=\"/books/{}/delete\">Delete Book</a></p>\n",
            field(book, "id"),
        ));
    }
    html.push_str("<p><a class=\"button\" href=\"/books\">Cancel</a></p>\n");
    Ok(html)
}

fn book_detail(data: &Value) -> Result<String, RenderError> {
    let book = require("book", data, "book")?;
    let id = field(book, "id");

    let mut html = format!(
        "<h1>{}</h1>\n<p class=\"author\">by {}</p>\n<dl>\n",
        field(book, "title"),
        field(book, "author"),
    );
    html.push_str(&format!("<dt>Genre</dt><dd>{}</dd>\n", field(book, "genre")));
    html.push_str(&format!("<dt>Year</dt><dd>{}</dd>\n", field(book, "year")));
    html.push_str("</dl>\n");
    html.push_str(&format!(
        "<p><a class=\"button\" href=\"/books/{id}/edit\">Edit Book</a> \
         <a class=\"button\" href=\"/books/{id}/delete\">Delete Book</a> \
         <a class=\"button\" href=\"/books\">Back to Books</a></p>\n"
    ));
    Ok(html)
}

fn delete_confirmation(data: &Value) -> Result<String, RenderError> {
    let book = require("delete", data, "book")?;
    let id = field(book, "id");

    Ok(format!(
        "<h1>Delete Book</h1>\n\
         <p>Are you sure you want to delete &ldquo;{title}&rdquo; by {author}?</p>\n\
         <form action=\"/books/{id}/delete\" method=\"post\">\n\
         <p><input type=\"submit\" value=\"Delete Book\"></p>\n</form>\n\
         <p><a class=\"button\" href=\"/books/{id}\">Cancel</a></p>\n",
        title = field(book, "title"),
        author = field(book, "author"),
    ))
}

fn error_page(data: &Value) -> Result<String, RenderError> {
    let error = require("error", data, "error")?;

    Ok(format!(
        "<h1>{message}</h1>\n<h2>{status}</h2>\n\
         <p class=\"trace\">Reference: {trace_id}</p>\n\
         <p><a class=\"button\" href=\"/books\">Back to Books</a></p>\n",
        message = field(error, "message"),
        status = field(error, "status"),
        trace_id = field(error, "trace_id"),
    ))
}
