use std::num::IntErrorKind;

use bookcase_db::RowId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Store-assigned book identifier.
pub type BookId = RowId;

/// A persisted catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Book {
    /// Unique identifier assigned by the store
    pub id: BookId,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    /// Free-form genre
    pub genre: Option<String>,
    /// Publication year
    pub year: Option<i32>,
}

/// Raw URL-encoded submission from the new/edit forms.
///
/// Every field is kept exactly as typed so a rejected submission can be
/// shown back to the user unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct BookForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub year: String,
}

/// Editable fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFields {
    pub title: String,
    pub author: String,
    pub genre: Option<String>,
    pub year: Option<i32>,
}

impl BookFields {
    pub fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            genre: self.genre,
            year: self.year,
        }
    }
}

/// One field-level validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Ordered list of field errors for one submission.
#[derive(Error, Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[error("{} field(s) failed validation", .0.len())]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Whether any message concerns `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|error| error.field == field)
    }
}

fn required(
    value: &str,
    field: &'static str,
    label: &str,
    errors: &mut ValidationErrors,
) -> String {
    let value = value.trim();
    if value.is_empty() {
        errors.push(field, format!("Please provide a value for \"{label}\""));
    }
    value.to_string()
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

impl BookForm {
    /// Check the submission. Title and author must be non-blank and a
    /// non-blank year must be an integer.
    pub fn validate(&self) -> Result<BookFields, ValidationErrors> {
        let mut errors = ValidationErrors::default();

        let title = required(&self.title, "title", "Title", &mut errors);
        let author = required(&self.author, "author", "Author", &mut errors);
        let genre = optional(&self.genre);
        let year = match optional(&self.year) {
            None => None,
            Some(raw) => match raw.parse::<i32>() {
                Ok(year) => Some(year),
                Err(err) => {
                    let message = match err.kind() {
                        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                            "\"Year\" is out of range"
                        }
                        _ => "\"Year\" must be a whole number",
                    };
                    errors.push("year", message);
                    None
                }
            },
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(BookFields {
            title,
            author,
            genre,
            year,
        })
    }
}

/// Unsaved copy of a book shown in a form: blank, pre-filled from a record,
/// or holding a rejected submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BookDraft {
    pub id: Option<BookId>,
    pub title: String,
    pub author: String,
    pub genre: String,
    pub year: String,
}

impl BookDraft {
    pub fn blank() -> Self {
        Self::default()
    }

    /// Keep exactly what the user typed, plus the id being edited.
    pub fn rejected(id: Option<BookId>, form: BookForm) -> Self {
        Self {
            id,
            title: form.title,
            author: form.author,
            genre: form.genre,
            year: form.year,
        }
    }
}

impl From<&Book> for BookDraft {
    fn from(book: &Book) -> Self {
        Self {
            id: Some(book.id),
            title: book.title.clone(),
            author: book.author.clone(),
            genre: book.genre.clone().unwrap_or_default(),
            year: book.year.map(|year| year.to_string()).unwrap_or_default(),
        }
    }
}

/// Entry of a JSON seed file.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedBook {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

impl From<SeedBook> for BookForm {
    fn from(seed: SeedBook) -> Self {
        Self {
            title: seed.title,
            author: seed.author,
            genre: seed.genre.unwrap_or_default(),
            year: seed.year.map(|year| year.to_string()).unwrap_or_default(),
        }
    }
}
