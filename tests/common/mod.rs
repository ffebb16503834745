#![allow(dead_code)]

use std::io;

use novadb_cursor::bson::{doc, Document};
use novadb_cursor::{field_table, Cursor, DecodePolicy, Error, MemoryStream, QueryContext};
use serde::Deserialize;

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct Person {
    pub name: String,
    pub age: i32,
    #[serde(rename = "mail")]
    pub email: String,
    #[serde(skip)]
    pub note: String,
}

field_table!(Person {
    name => "name,omitempty",
    age => "age",
    email => "mail",
});

/// Three people; the second one's age is not a number.
pub fn people() -> Vec<Document> {
    vec![
        doc! { "name": "ada", "age": 36, "mail": "ada@example.com" },
        doc! { "name": "bob", "age": "old", "mail": "bob@example.com" },
        doc! { "name": "cy", "age": 41, "mail": "cy@example.com" },
    ]
}

pub fn clean_people() -> Vec<Document> {
    vec![
        doc! { "name": "ada", "age": 36, "mail": "ada@example.com" },
        doc! { "name": "cy", "age": 41, "mail": "cy@example.com" },
    ]
}

pub fn stream(docs: &[Document]) -> MemoryStream {
    MemoryStream::from_documents(docs).expect("documents serialize")
}

pub fn cursor(docs: &[Document], policy: DecodePolicy) -> Cursor<MemoryStream> {
    Cursor::new(stream(docs), QueryContext::background(), policy)
}

pub fn connection_reset() -> Error {
    Error::Driver(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset").into())
}
