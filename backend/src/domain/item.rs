//! Inventory items and their value types.
//!
//! Quantities are free text and never rejected. The only canonical form
//! enforced is the trailing gram marker: `"10"` and `"10G"` are both stored as
//! `"10g"`, and a blank quantity becomes a bare `"g"`.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Unit marker every stored quantity ends with.
pub const QUANTITY_UNIT: char = 'g';

/// Validation failures for item fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    InvalidId,
    EmptyName,
}

impl fmt::Display for ItemValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "item id must be a valid UUID"),
            Self::EmptyName => write!(f, "name must not be empty"),
        }
    }
}

impl std::error::Error for ItemValidationError {}

/// Item identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn new(raw: impl AsRef<str>) -> Result<Self, ItemValidationError> {
        Uuid::parse_str(raw.as_ref())
            .map(Self)
            .map_err(|_| ItemValidationError::InvalidId)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name of an item, non-empty once trimmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemName(String);

impl ItemName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ItemValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ItemValidationError::EmptyName);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for ItemName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<ItemName> for String {
    fn from(value: ItemName) -> Self {
        value.0
    }
}

impl TryFrom<String> for ItemName {
    type Error = ItemValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Quantity string normalised to end with [`QUANTITY_UNIT`].
///
/// # Examples
/// ```
/// use herbarium::domain::Quantity;
///
/// assert_eq!(Quantity::new("10").as_ref(), "10g");
/// assert_eq!(Quantity::new("10g").as_ref(), "10g");
/// assert_eq!(Quantity::new("10G").as_ref(), "10g");
/// assert_eq!(Quantity::new(" 2.5 ").as_ref(), "2.5g");
/// assert_eq!(Quantity::new("").as_ref(), "g");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Quantity(String);

impl Quantity {
    #[must_use]
    pub fn new(raw: impl AsRef<str>) -> Self {
        let trimmed = raw.as_ref().trim();
        let stem = trimmed.strip_suffix(['g', 'G']).unwrap_or(trimmed);
        Self(format!("{stem}{QUANTITY_UNIT}"))
    }
}

impl AsRef<str> for Quantity {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Quantity> for String {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl From<String> for Quantity {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Owner-tagged inventory entry.
///
/// ## Invariants
/// - `owner` is fixed at creation; no method changes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    id: ItemId,
    owner: UserId,
    name: ItemName,
    quantity: Quantity,
}

impl Item {
    #[must_use]
    pub fn new(id: ItemId, owner: UserId, name: ItemName, quantity: Quantity) -> Self {
        Self {
            id,
            owner,
            name,
            quantity,
        }
    }

    #[must_use]
    pub fn id(&self) -> ItemId {
        self.id
    }

    #[must_use]
    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    #[must_use]
    pub fn name(&self) -> &ItemName {
        &self.name
    }

    #[must_use]
    pub fn quantity(&self) -> &Quantity {
        &self.quantity
    }

    /// Apply a patch, keeping fields the patch leaves out.
    #[must_use]
    pub fn patched(self, patch: ItemPatch) -> Self {
        Self {
            name: patch.name.unwrap_or(self.name),
            quantity: patch.quantity.unwrap_or(self.quantity),
            ..self
        }
    }
}

/// Partial update for an item; `None` fields keep their stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPatch {
    pub name: Option<ItemName>,
    pub quantity: Option<Quantity>,
}

impl ItemPatch {
    /// Validate optional raw fields into a patch.
    pub fn try_from_parts(
        name: Option<&str>,
        quantity: Option<&str>,
    ) -> Result<Self, ItemValidationError> {
        Ok(Self {
            name: name.map(ItemName::new).transpose()?,
            quantity: quantity.map(Quantity::new),
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.quantity.is_none()
    }
}
