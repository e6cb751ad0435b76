//! Driving ports for owner-scoped item access.
//!
//! Every method takes the owner explicitly and there is no variant that
//! accepts a different owner for the target record: the id of the caller's
//! session is the only owner these ports ever see.

use async_trait::async_trait;

use crate::domain::{Error, Item, ItemId, ItemName, ItemPatch, Quantity, UserId};

/// Read side.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemsQuery: Send + Sync {
    /// Every item owned by `owner`.
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Item>, Error>;

    /// One item, or `NotFound` when it is missing or owned by someone else.
    async fn get(&self, owner: &UserId, id: ItemId) -> Result<Item, Error>;
}

/// Write side.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ItemsCommand: Send + Sync {
    async fn add(&self, owner: &UserId, name: ItemName, quantity: Quantity) -> Result<Item, Error>;

    /// Apply `patch`; `NotFound` under the same rules as [`ItemsQuery::get`].
    async fn edit(&self, owner: &UserId, id: ItemId, patch: ItemPatch) -> Result<Item, Error>;

    async fn delete(&self, owner: &UserId, id: ItemId) -> Result<(), Error>;
}
