//! Blocking iterator over a driver cursor.

use futures::TryStreamExt;
use mongodb::Cursor;
use mongodb::bson::Document;
use tokio::runtime::Runtime;

use crate::error::Result;

/// A server-backed result set borrowed from a `MongoSession`.
///
/// Documents are fetched lazily in batches as the iterator advances. The cursor
/// is released on `close`, on exhaustion, or on drop, always inside the session
/// runtime so the driver can schedule `killCursors`.
pub struct DocumentCursor<'s> {
    inner: Option<Cursor<Document>>,
    runtime: &'s Runtime,
}

impl<'s> DocumentCursor<'s> {
    pub(crate) fn new(cursor: Cursor<Document>, runtime: &'s Runtime) -> Self {
        Self { inner: Some(cursor), runtime }
    }

    /// Drain every remaining document.
    pub fn collect_all(mut self) -> Result<Vec<Document>> {
        let Some(cursor) = self.inner.take() else {
            return Ok(Vec::new());
        };
        let documents = self.runtime.block_on(async { cursor.try_collect::<Vec<_>>().await })?;
        Ok(documents)
    }

    /// Release the server-side cursor now.
    pub fn close(mut self) {
        self.release();
    }

    pub fn is_closed(&self) -> bool {
        self.inner.is_none()
    }

    fn release(&mut self) {
        if let Some(cursor) = self.inner.take() {
            let _guard = self.runtime.enter();
            drop(cursor);
            log::debug!("Cursor closed");
        }
    }
}

impl Iterator for DocumentCursor<'_> {
    type Item = Result<Document>;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.inner.as_mut()?;
        match self.runtime.block_on(async { cursor.try_next().await }) {
            Ok(Some(document)) => Some(Ok(document)),
            Ok(None) => {
                self.release();
                None
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}

impl Drop for DocumentCursor<'_> {
    fn drop(&mut self) {
        self.release();
    }
}
