//! The item blob codec: JSON, deflated, base64.
//!
//! Storage-bound item data (vault contents, kit layouts, mail attachments)
//! travels as one opaque string. Items that refuse to serialize become empty
//! slots instead of failing the whole batch; a menu with one corrupt button
//! should still load its other 53.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use serde_json::Value;
use std::io::{Read, Write};
use tracing::error;

use super::ItemStack;
use crate::error::{ItemError, ItemResult};

/// Encodes a slice of optional items to a base64 blob.
///
/// Items that fail [`ItemStack::is_valid`] or refuse to serialize are
/// counted, logged once as `Failed to serialize N invalid items`, and
/// written as empty slots.
pub fn encode_items(items: &[Option<ItemStack>]) -> ItemResult<String> {
    let mut failed = 0usize;
    let values: Vec<Value> = items
        .iter()
        .map(|slot| match slot {
            None => Value::Null,
            Some(item) => match serde_json::to_value(item) {
                Ok(value) if item.is_valid() => value,
                _ => {
                    failed += 1;
                    Value::Null
                }
            },
        })
        .collect();

    if failed > 0 {
        error!("Failed to serialize {failed} invalid items");
    }

    let json = serde_json::to_vec(&values).map_err(ItemError::Encode)?;
    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&json).map_err(ItemError::Compress)?;
    let compressed = encoder.finish().map_err(ItemError::Compress)?;
    Ok(STANDARD.encode(compressed))
}

/// Decodes a blob back into its slots, empty ones included.
pub fn decode_items(blob: &str) -> ItemResult<Vec<Option<ItemStack>>> {
    let compressed = STANDARD.decode(blob.trim())?;
    let mut json = Vec::new();
    DeflateDecoder::new(compressed.as_slice())
        .read_to_end(&mut json)
        .map_err(ItemError::Inflate)?;
    serde_json::from_slice(&json).map_err(ItemError::Decode)
}

/// Encodes a single item.
pub fn encode_item(item: &ItemStack) -> ItemResult<String> {
    encode_items(&[Some(item.clone())])
}

/// Decodes a single item. A blob holding no items, or an empty first slot,
/// is an error.
pub fn decode_item(blob: &str) -> ItemResult<ItemStack> {
    decode_items(blob)?
        .into_iter()
        .next()
        .flatten()
        .ok_or(ItemError::Empty)
}
