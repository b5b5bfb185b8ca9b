//! Decoding of loosely-typed JSON requests.
//!
//! Requests arrive from an HTTP handler or the CLI as arbitrary JSON. `null`
//! list entries are dropped like blank strings; anything with the wrong shape
//! is rejected with [`Error::InvalidInput`] naming the offending field.

use std::collections::HashSet;
use std::io::Read;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::deduplication::{dedupe_for_create, detect, reconcile};
use crate::error::{Error, Result};
use crate::types::{DedupeOutcome, Detection, ReconciliationResult, SupportingMediaItem};

/// Images gathered while composing a new post
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateRequest {
    pub images: Vec<String>,
}

impl CreateRequest {
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = as_object(value)?;
        Ok(Self {
            images: string_list(object, "images")?.unwrap_or_default(),
        })
    }

    pub fn run(&self) -> DedupeOutcome {
        dedupe_for_create(&self.images)
    }
}

/// References to check for duplicates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectRequest {
    pub urls: Vec<String>,
}

impl DetectRequest {
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = as_object(value)?;
        Ok(Self {
            urls: string_list(object, "urls")?.unwrap_or_default(),
        })
    }

    pub fn run(&self) -> Detection {
        detect(&self.urls)
    }
}

/// Everything needed to reconcile an edited post
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconcileRequest {
    pub existing_images: Vec<String>,
    pub new_images: Vec<String>,
    pub supporting_media: Option<Vec<SupportingMediaItem>>,
    pub images_backup: Option<HashSet<String>>,
    pub explicitly_deleted: Option<HashSet<String>>,
}

impl ReconcileRequest {
    /// Decode a request; missing or `null` image lists count as empty
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = as_object(value)?;
        Ok(Self {
            existing_images: string_list(object, "existingImages")?.unwrap_or_default(),
            new_images: string_list(object, "newImages")?.unwrap_or_default(),
            supporting_media: supporting_media(object)?,
            images_backup: string_list(object, "imagesBackup")?
                .map(|urls| urls.into_iter().collect()),
            explicitly_deleted: string_list(object, "explicitlyDeleted")?
                .map(|urls| urls.into_iter().collect()),
        })
    }

    pub fn run(&self) -> ReconciliationResult {
        reconcile(
            &self.existing_images,
            &self.new_images,
            self.supporting_media.as_deref(),
            self.images_backup.as_ref(),
            self.explicitly_deleted.as_ref(),
        )
    }
}

/// Read a whole JSON document from a reader
pub fn read_value(reader: impl Read) -> Result<Value> {
    Ok(serde_json::from_reader(reader)?)
}

fn as_object(value: &Value) -> Result<&Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| Error::InvalidInput("request must be a JSON object".to_string()))
}

/// Optional array of strings; `null` entries are skipped
fn string_list(object: &Map<String, Value>, field: &str) -> Result<Option<Vec<String>>> {
    let items = match object.get(field) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(Error::InvalidInput(format!("{} must be an array", field)));
        }
    };

    let mut urls = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        match item {
            Value::String(url) => urls.push(url.clone()),
            Value::Null => {}
            _ => {
                return Err(Error::InvalidInput(format!(
                    "{}[{}] must be a string or null",
                    field, index
                )));
            }
        }
    }
    Ok(Some(urls))
}

fn supporting_media(object: &Map<String, Value>) -> Result<Option<Vec<SupportingMediaItem>>> {
    let items = match object.get("supportingMedia") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Array(items)) => items,
        Some(_) => {
            return Err(Error::InvalidInput(
                "supportingMedia must be an array".to_string(),
            ));
        }
    };

    items
        .iter()
        .enumerate()
        .filter(|(_, item)| !item.is_null())
        .map(|(index, item)| {
            SupportingMediaItem::deserialize(item).map_err(|e| {
                Error::InvalidInput(format!("supportingMedia[{}]: {}", index, e))
            })
        })
        .collect::<Result<Vec<_>>>()
        .map(Some)
}
