//! Deep merge of a partial update into an existing record
//!
//! The merged record is what gets sent to update endpoints, so fields the
//! caller did not touch are carried over instead of being dropped by the
//! remote side.
//!
//! Rules:
//! - keys only in `existing` are kept verbatim
//! - keys in both whose values are both objects are merged recursively
//! - anything else takes the `update` value, arrays included (no element-wise
//!   merge, remote array order is not stable)

use serde_json::Value;
use vendorlink_domain::Record;

/// Recursive union of `existing` and `update`; `update` wins on conflicts.
pub fn deep_merge(existing: &Record, update: &Record) -> Record {
    let mut merged = existing.clone();
    deep_merge_into(&mut merged, update);
    merged
}

/// In-place variant of [`deep_merge`].
pub fn deep_merge_into(target: &mut Record, update: &Record) {
    for (key, incoming) in update {
        match (target.get_mut(key), incoming) {
            (Some(Value::Object(current)), Value::Object(nested)) => deep_merge_into(current, nested),
            _ => {
                target.insert(key.clone(), incoming.clone());
            }
        }
    }
}
