//! Owner-scoped item repository over the `items` collection.
//!
//! Every query filters on `ownerId` as well as `id`, so an item owned by
//! someone else is indistinguishable from one that does not exist.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::document_mapping::{from_document, map_document_store_error, to_document};
use super::ports::{Collection, Document, DocumentStore, Filter, ID_FIELD, ItemsCommand, ItemsQuery};
use super::{Error, Item, ItemId, ItemName, ItemPatch, Quantity, UserId};

const OWNER_FIELD: &str = "ownerId";

/// Items inserted once for an owner with an empty inventory when seeding is on.
pub const STARTER_ITEMS: [(&str, &str); 4] = [
    ("Basil", "5g"),
    ("Basils", "15g"),
    ("Mint", "3g"),
    ("Cilantro", "2g"),
];

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemDocument {
    id: ItemId,
    owner_id: UserId,
    name: ItemName,
    quantity: Quantity,
}

impl From<&Item> for ItemDocument {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id(),
            owner_id: item.owner().clone(),
            name: item.name().clone(),
            quantity: item.quantity().clone(),
        }
    }
}

impl From<ItemDocument> for Item {
    fn from(value: ItemDocument) -> Self {
        Item::new(value.id, value.owner_id, value.name, value.quantity)
    }
}

/// Item CRUD for a single owner at a time.
#[derive(Clone)]
pub struct ItemRepository {
    store: Arc<dyn DocumentStore>,
    seed_starter_items: bool,
}

impl ItemRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            seed_starter_items: false,
        }
    }

    /// Fill empty inventories with [`STARTER_ITEMS`] on an owner's first listing.
    #[must_use]
    pub fn with_starter_items(mut self, enabled: bool) -> Self {
        self.seed_starter_items = enabled;
        self
    }

    fn owner_filter(owner: &UserId) -> Filter {
        Filter::new().eq(OWNER_FIELD, owner.as_ref())
    }

    fn item_filter(owner: &UserId, id: ItemId) -> Filter {
        Self::owner_filter(owner).eq(ID_FIELD, id.to_string())
    }

    fn not_found(id: ItemId) -> Error {
        Error::not_found(format!("item {id} not found"))
    }

    async fn insert(&self, item: &Item) -> Result<(), Error> {
        let document = to_document(&ItemDocument::from(item))?;
        self.store
            .insert(Collection::Items, document)
            .await
            .map_err(map_document_store_error)?;
        Ok(())
    }

    /// Record that `owner` has had its one chance at starter items.
    ///
    /// Returns `false` when the marker was already present.
    async fn claim_starter_seed(&self, owner: &UserId) -> Result<bool, Error> {
        let marker = Filter::by_id(owner.as_ref());
        let existing = self
            .store
            .find_one(Collection::StarterSeeds, &marker)
            .await
            .map_err(map_document_store_error)?;
        if existing.is_some() {
            return Ok(false);
        }
        let mut document = Document::new();
        document.insert(ID_FIELD.to_owned(), Value::from(owner.as_ref()));
        self.store
            .insert(Collection::StarterSeeds, document)
            .await
            .map_err(map_document_store_error)?;
        Ok(true)
    }

    async fn seed(&self, owner: &UserId) -> Result<Vec<Item>, Error> {
        let mut seeded = Vec::with_capacity(STARTER_ITEMS.len());
        for (name, quantity) in STARTER_ITEMS {
            let item = Item::new(
                ItemId::random(),
                owner.clone(),
                ItemName::new(name).map_err(|err| Error::internal(err.to_string()))?,
                Quantity::new(quantity),
            );
            self.insert(&item).await?;
            seeded.push(item);
        }
        info!(owner = %owner, count = seeded.len(), "seeded starter items");
        Ok(seeded)
    }

    /// Every item owned by `owner`, in insertion order.
    ///
    /// With seeding on, the first listing for an owner inserts
    /// [`STARTER_ITEMS`] if the inventory is empty. Later listings never
    /// reseed, even after every item has been deleted.
    pub async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Item>, Error> {
        let items = self
            .store
            .find(Collection::Items, &Self::owner_filter(owner))
            .await
            .map_err(map_document_store_error)?
            .into_iter()
            .map(|document| from_document::<ItemDocument>(document).map(Item::from))
            .collect::<Result<Vec<_>, _>>()?;

        if self.seed_starter_items
            && self.claim_starter_seed(owner).await?
            && items.is_empty()
        {
            return self.seed(owner).await;
        }
        Ok(items)
    }

    pub async fn get(&self, owner: &UserId, id: ItemId) -> Result<Item, Error> {
        self.store
            .find_one(Collection::Items, &Self::item_filter(owner, id))
            .await
            .map_err(map_document_store_error)?
            .map(|document| from_document::<ItemDocument>(document).map(Item::from))
            .transpose()?
            .ok_or_else(|| Self::not_found(id))
    }

    pub async fn add(
        &self,
        owner: &UserId,
        name: ItemName,
        quantity: Quantity,
    ) -> Result<Item, Error> {
        let item = Item::new(ItemId::random(), owner.clone(), name, quantity);
        self.insert(&item).await?;
        debug!(owner = %owner, item_id = %item.id(), "item added");
        Ok(item)
    }

    /// Apply `patch` to an item the owner holds; `NotFound` otherwise.
    pub async fn edit(&self, owner: &UserId, id: ItemId, patch: ItemPatch) -> Result<Item, Error> {
        let current = self.get(owner, id).await?;
        if patch.is_empty() {
            return Ok(current);
        }

        let mut changes = Document::new();
        if let Some(name) = &patch.name {
            changes.insert("name".to_owned(), Value::from(name.as_ref()));
        }
        if let Some(quantity) = &patch.quantity {
            changes.insert("quantity".to_owned(), Value::from(quantity.as_ref()));
        }

        let matched = self
            .store
            .update(Collection::Items, &Self::item_filter(owner, id), changes)
            .await
            .map_err(map_document_store_error)?;
        if matched == 0 {
            return Err(Self::not_found(id));
        }
        debug!(owner = %owner, item_id = %id, "item edited");
        Ok(current.patched(patch))
    }

    pub async fn delete(&self, owner: &UserId, id: ItemId) -> Result<(), Error> {
        let removed = self
            .store
            .delete(Collection::Items, &Self::item_filter(owner, id))
            .await
            .map_err(map_document_store_error)?;
        if removed == 0 {
            return Err(Self::not_found(id));
        }
        debug!(owner = %owner, item_id = %id, "item deleted");
        Ok(())
    }
}

#[async_trait]
impl ItemsQuery for ItemRepository {
    async fn list_for_owner(&self, owner: &UserId) -> Result<Vec<Item>, Error> {
        ItemRepository::list_for_owner(self, owner).await
    }

    async fn get(&self, owner: &UserId, id: ItemId) -> Result<Item, Error> {
        ItemRepository::get(self, owner, id).await
    }
}

#[async_trait]
impl ItemsCommand for ItemRepository {
    async fn add(&self, owner: &UserId, name: ItemName, quantity: Quantity) -> Result<Item, Error> {
        ItemRepository::add(self, owner, name, quantity).await
    }

    async fn edit(&self, owner: &UserId, id: ItemId, patch: ItemPatch) -> Result<Item, Error> {
        ItemRepository::edit(self, owner, id, patch).await
    }

    async fn delete(&self, owner: &UserId, id: ItemId) -> Result<(), Error> {
        ItemRepository::delete(self, owner, id).await
    }
}
