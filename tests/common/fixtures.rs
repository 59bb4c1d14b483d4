//! Test fixtures for integration tests.

#![allow(dead_code)]

use mongodb::bson::{Document, doc};

/// Generate a batch of test documents for bulk operations.
pub fn generate_test_documents(count: usize) -> Vec<Document> {
    (0..count)
        .map(|i| {
            doc! {
                "index": i as i32,
                "name": format!("Document {}", i),
                "category": if i % 2 == 0 { "even" } else { "odd" },
                "value": (i * 10) as i32,
            }
        })
        .collect()
}

/// Prefecture records; only some carry an English name.
pub fn prefectures() -> Vec<Document> {
    vec![
        doc! { "_id": 13, "ja": "東京都", "en": "Tokyo" },
        doc! { "_id": 27, "ja": "大阪府", "en": "Osaka" },
        doc! { "_id": 26, "ja": "京都府" },
        doc! { "_id": 1, "ja": "北海道" },
    ]
}
