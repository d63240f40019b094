//! Creature profile domain model.
//!
//! # Responsibility
//! - Define the canonical record shared by the loader, the store and the
//!   timeline generator.
//! - Own the wire shape of the bundled resource (`types`, `image_reference`).
//!
//! # Invariants
//! - A `DomainRecord` is immutable once constructed; fields are read-only.
//! - `categories` is never empty and the first entry is the primary category.
//! - `id()` is derived from `name` and is stable across store instances.
//!
//! # See also
//! - DESIGN.md (model)

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable store identifier for a record, derived from its name.
pub type RecordId = Uuid;

const RECORD_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6d1f_3a5e_92c4_4b70_8e21_5f0a_7c3d_b914);

/// Opaque handle to a renderable image asset.
///
/// Resolution to pixels happens in the rendering layer, never in core.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageRef(String);

impl ImageRef {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for ImageRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Validation failures for record construction and decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    BlankName,
    NoCategories,
    BlankCategory { index: usize },
    BlankImageReference,
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankName => write!(f, "record name must not be blank"),
            Self::NoCategories => write!(f, "record must have at least one category"),
            Self::BlankCategory { index } => {
                write!(f, "record category at index {index} must not be blank")
            }
            Self::BlankImageReference => write!(f, "record image_reference must not be blank"),
        }
    }
}

impl Error for RecordValidationError {}

/// Canonical creature profile.
///
/// Serializes to the bundled wire shape (`types`, `image_reference`) and
/// deserializes from the key-converted shape (`types`, `imageReference`).
/// Both directions go through validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RecordFields", into = "RecordFields")]
pub struct DomainRecord {
    name: String,
    categories: Vec<String>,
    image_reference: ImageRef,
}

/// Raw field set as it appears after key conversion. Unvalidated.
#[doc(hidden)]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all(serialize = "snake_case", deserialize = "camelCase"))]
pub struct RecordFields {
    pub(crate) name: String,
    #[serde(rename = "types")]
    pub(crate) categories: Vec<String>,
    pub(crate) image_reference: ImageRef,
}

impl DomainRecord {
    /// Builds a validated record.
    ///
    /// # Errors
    /// - Returns `RecordValidationError` when any field breaks the record
    ///   invariants (blank name, no categories, blank tag or image).
    pub fn new(
        name: impl Into<String>,
        categories: Vec<String>,
        image_reference: ImageRef,
    ) -> Result<Self, RecordValidationError> {
        let record = Self {
            name: name.into(),
            categories,
            image_reference,
        };
        record.validate()?;
        Ok(record)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ordered classification tags, primary first.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Primary category. Always present for a validated record.
    pub fn primary_category(&self) -> &str {
        self.categories
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn image_reference(&self) -> &ImageRef {
        &self.image_reference
    }

    /// Deterministic store identity derived from `name`.
    pub fn id(&self) -> RecordId {
        record_id_for(&self.name)
    }

    /// Checks record invariants.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.name.trim().is_empty() {
            return Err(RecordValidationError::BlankName);
        }
        if self.categories.is_empty() {
            return Err(RecordValidationError::NoCategories);
        }
        if let Some(index) = self
            .categories
            .iter()
            .position(|category| category.trim().is_empty())
        {
            return Err(RecordValidationError::BlankCategory { index });
        }
        if self.image_reference.as_str().trim().is_empty() {
            return Err(RecordValidationError::BlankImageReference);
        }
        Ok(())
    }
}

/// Returns the record id a record named `name` would have.
pub fn record_id_for(name: &str) -> RecordId {
    Uuid::new_v5(&RECORD_ID_NAMESPACE, name.as_bytes())
}

impl TryFrom<RecordFields> for DomainRecord {
    type Error = RecordValidationError;

    fn try_from(value: RecordFields) -> Result<Self, Self::Error> {
        Self::new(value.name, value.categories, value.image_reference)
    }
}

impl From<DomainRecord> for RecordFields {
    fn from(value: DomainRecord) -> Self {
        Self {
            name: value.name,
            categories: value.categories,
            image_reference: value.image_reference,
        }
    }
}
