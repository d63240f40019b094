//! Bundled resource access.
//!
//! # Responsibility
//! - Resolve fixed logical resource names to read-only bytes.
//! - Keep asset packaging details out of the loader.
//!
//! # Invariants
//! - A missing resource is reported as `DecodeError::MissingResource`.
//! - `DirectoryBundle` never resolves names outside its root.

use crate::decode::{DecodeError, DecodeResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Logical name of the bundled sample record.
pub const SAMPLE_RECORD_RESOURCE: &str = "samplepokemon.json";

const SAMPLE_RECORD_BYTES: &[u8] = include_bytes!("../../assets/samplepokemon.json");

static RESOURCE_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]*$").expect("valid resource name regex")
});

/// Read-only source of named resources.
pub trait ResourceBundle {
    /// Returns the bytes for `name`.
    ///
    /// # Errors
    /// - `MissingResource` when the bundle has no such resource.
    fn read(&self, name: &str) -> DecodeResult<Cow<'_, [u8]>>;
}

/// Resources compiled into the binary.
#[derive(Debug, Clone, Default)]
pub struct EmbeddedBundle {
    resources: BTreeMap<String, Cow<'static, [u8]>>,
}

impl EmbeddedBundle {
    /// Bundle shipped with the crate (contains the sample record).
    pub fn bundled() -> Self {
        Self::default().with_resource(SAMPLE_RECORD_RESOURCE, SAMPLE_RECORD_BYTES)
    }

    /// Adds or replaces one resource.
    pub fn with_resource(
        mut self,
        name: impl Into<String>,
        bytes: impl Into<Cow<'static, [u8]>>,
    ) -> Self {
        self.resources.insert(name.into(), bytes.into());
        self
    }
}

impl ResourceBundle for EmbeddedBundle {
    fn read(&self, name: &str) -> DecodeResult<Cow<'_, [u8]>> {
        self.resources
            .get(name)
            .map(|bytes| Cow::Borrowed(bytes.as_ref()))
            .ok_or_else(|| DecodeError::MissingResource {
                name: name.to_string(),
            })
    }
}

/// Resources read from files under one root directory.
#[derive(Debug, Clone)]
pub struct DirectoryBundle {
    root: PathBuf,
}

impl DirectoryBundle {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ResourceBundle for DirectoryBundle {
    fn read(&self, name: &str) -> DecodeResult<Cow<'_, [u8]>> {
        if !RESOURCE_NAME_RE.is_match(name) {
            return Err(DecodeError::InvalidResourceName {
                name: name.to_string(),
            });
        }

        match std::fs::read(self.root.join(name)) {
            Ok(bytes) => Ok(Cow::Owned(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(DecodeError::MissingResource {
                    name: name.to_string(),
                })
            }
            Err(source) => Err(DecodeError::Io {
                name: name.to_string(),
                source,
            }),
        }
    }
}
