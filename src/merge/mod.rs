//! Deep-merge engine for configuration trees.
//!
//! Combines two or more mapping layers left-to-right: nested mappings
//! merge recursively, sequences union while preserving base order, and
//! everything else is replaced by the overlay. The result is a
//! structural copy sharing no nodes with any input.

use thiserror::Error;

use crate::models::{Mapping, Value};

/// Errors from [`merge`]. Both variants are contract violations by the
/// caller and are never recovered internally.
#[derive(Debug, Error)]
pub enum MergeError {
    /// Fewer than two layers were supplied.
    #[error("merge requires at least two layers, got {0}")]
    TooFewLayers(usize),

    /// A layer was not a mapping.
    #[error("merge layer {index} is not a mapping")]
    NotAMapping {
        /// Zero-based position of the offending layer.
        index: usize,
    },
}

/// Merge two or more mapping layers into a new tree.
///
/// Layers are applied left-to-right, so each overlay's values take
/// precedence over accumulated state:
///
/// - mapping over mapping merges recursively;
/// - sequence over sequence unions: base order is preserved, then
///   overlay elements not already present are appended in their
///   original relative order;
/// - anything else (scalars, nulls, type mismatches) is replaced by
///   the overlay value.
///
/// The result is detached from every input: mutating it never mutates
/// a source tree, at any depth.
pub fn merge(layers: &[Value]) -> Result<Value, MergeError> {
    if layers.len() < 2 {
        return Err(MergeError::TooFewLayers(layers.len()));
    }

    let mut result = layers[0]
        .as_mapping()
        .ok_or(MergeError::NotAMapping { index: 0 })?
        .clone();

    for (index, layer) in layers.iter().enumerate().skip(1) {
        let overlay = layer
            .as_mapping()
            .ok_or(MergeError::NotAMapping { index })?;
        merge_into(&mut result, overlay);
    }

    Ok(Value::Mapping(result))
}

/// Merge `overlay` into `base` in place, recursively.
///
/// This is the single merge implementation; [`merge`] and the store's
/// file/root-set paths all funnel through it.
pub(crate) fn merge_into(base: &mut Mapping, overlay: &Mapping) {
    for (key, overlay_val) in overlay {
        match (base.get_mut(key), overlay_val) {
            (Some(Value::Mapping(base_map)), Value::Mapping(overlay_map)) => {
                merge_into(base_map, overlay_map);
            }
            (Some(Value::Sequence(base_seq)), Value::Sequence(overlay_seq)) => {
                for item in overlay_seq {
                    if !base_seq.contains(item) {
                        base_seq.push(item.clone());
                    }
                }
            }
            (Some(slot), _) => {
                *slot = overlay_val.clone();
            }
            (None, _) => {
                base.insert(key.clone(), overlay_val.clone());
            }
        }
    }
}
