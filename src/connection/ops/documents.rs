//! Document CRUD passthroughs on the session's active collection.
//!
//! Every method forwards its arguments to the driver unchanged and returns the
//! driver's own result. Only the missing-collection precondition is checked here.

use mongodb::Collection;
use mongodb::bson::{Bson, Document, doc};
use mongodb::options::UpdateModifications;
use mongodb::results::{DeleteResult, InsertManyResult, InsertOneResult, UpdateResult};

use crate::connection::MongoSession;
use crate::connection::cursor::DocumentCursor;
use crate::document::key_exists_filter;
use crate::error::{Error, Result};

impl MongoSession {
    fn active_collection(&self) -> Result<&Collection<Document>> {
        self.collection.as_ref().ok_or(Error::NotConnected("collection"))
    }

    /// Find a single document.
    /// e.g. filter `{ "_id": id }`
    pub fn find_one(&self, filter: Document) -> Result<Option<Document>> {
        let coll = self.active_collection()?;
        log::debug!("find_one on {}", coll.namespace());
        let found = self.runtime.block_on(async { coll.find_one(filter).await })?;
        Ok(found)
    }

    /// Find every matching document.
    /// e.g. filter `{ "name": "bob" }`
    pub fn find_many(&self, filter: Document) -> Result<DocumentCursor<'_>> {
        let coll = self.active_collection()?;
        log::debug!("find on {}", coll.namespace());
        let cursor = self.runtime.block_on(async { coll.find(filter).await })?;
        Ok(DocumentCursor::new(cursor, &self.runtime))
    }

    /// Find documents where `key` exists (or, with `exists = false`, is missing).
    pub fn find_key_exists(&self, key: &str, exists: bool) -> Result<DocumentCursor<'_>> {
        self.find_many(key_exists_filter(key, exists))
    }

    /// e.g. document `{ "name": "pi", "value": 3.14159 }`
    pub fn insert_one(&self, document: Document) -> Result<InsertOneResult> {
        let coll = self.active_collection()?;
        log::debug!("insert_one on {}", coll.namespace());
        let result = self.runtime.block_on(async { coll.insert_one(document).await })?;
        Ok(result)
    }

    pub fn insert_many(&self, documents: Vec<Document>) -> Result<InsertManyResult> {
        let coll = self.active_collection()?;
        log::debug!("insert_many ({} documents) on {}", documents.len(), coll.namespace());
        let result = self.runtime.block_on(async { coll.insert_many(documents).await })?;
        Ok(result)
    }

    /// e.g. update `{ "$set": { "email": "newemail@example.com" } }`
    pub fn update_one(
        &self,
        filter: Document,
        update: impl Into<UpdateModifications>,
    ) -> Result<UpdateResult> {
        let coll = self.active_collection()?;
        log::debug!("update_one on {}", coll.namespace());
        let result = self.runtime.block_on(async { coll.update_one(filter, update).await })?;
        Ok(result)
    }

    /// e.g. update `{ "$inc": { "age": 1 } }`
    pub fn update_many(
        &self,
        filter: Document,
        update: impl Into<UpdateModifications>,
    ) -> Result<UpdateResult> {
        let coll = self.active_collection()?;
        log::debug!("update_many on {}", coll.namespace());
        let result = self.runtime.block_on(async { coll.update_many(filter, update).await })?;
        Ok(result)
    }

    /// Update the document whose `_id` equals `id`.
    pub fn update_by_id(
        &self,
        id: impl Into<Bson>,
        update: impl Into<UpdateModifications>,
    ) -> Result<UpdateResult> {
        self.update_one(doc! { "_id": id.into() }, update)
    }

    pub fn replace_one(&self, filter: Document, replacement: Document) -> Result<UpdateResult> {
        let coll = self.active_collection()?;
        log::debug!("replace_one on {}", coll.namespace());
        let result =
            self.runtime.block_on(async { coll.replace_one(filter, replacement).await })?;
        Ok(result)
    }

    pub fn delete_one(&self, filter: Document) -> Result<DeleteResult> {
        let coll = self.active_collection()?;
        log::debug!("delete_one on {}", coll.namespace());
        let result = self.runtime.block_on(async { coll.delete_one(filter).await })?;
        Ok(result)
    }

    pub fn delete_many(&self, filter: Document) -> Result<DeleteResult> {
        let coll = self.active_collection()?;
        log::debug!("delete_many on {}", coll.namespace());
        let result = self.runtime.block_on(async { coll.delete_many(filter).await })?;
        Ok(result)
    }

    /// Delete one document and return it.
    pub fn find_one_and_delete(&self, filter: Document) -> Result<Option<Document>> {
        let coll = self.active_collection()?;
        log::debug!("find_one_and_delete on {}", coll.namespace());
        let found = self.runtime.block_on(async { coll.find_one_and_delete(filter).await })?;
        Ok(found)
    }

    /// Replace one document and return it as it was before the replacement.
    pub fn find_one_and_replace(
        &self,
        filter: Document,
        replacement: Document,
    ) -> Result<Option<Document>> {
        let coll = self.active_collection()?;
        log::debug!("find_one_and_replace on {}", coll.namespace());
        let found = self
            .runtime
            .block_on(async { coll.find_one_and_replace(filter, replacement).await })?;
        Ok(found)
    }

    /// Update one document and return it as it was before the update.
    pub fn find_one_and_update(
        &self,
        filter: Document,
        update: impl Into<UpdateModifications>,
    ) -> Result<Option<Document>> {
        let coll = self.active_collection()?;
        log::debug!("find_one_and_update on {}", coll.namespace());
        let found =
            self.runtime.block_on(async { coll.find_one_and_update(filter, update).await })?;
        Ok(found)
    }
}
