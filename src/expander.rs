//! Resolution of the extension set to apply.

use crate::error::{Error, Result};
use crate::registry::ExtensionRegistry;
use indexmap::IndexSet;

/// Expands a selection into the ordered list of extensions to apply.
///
/// Every selected identifier is preceded by its `extends` ancestors, root-most
/// first. Duplicates keep their first position, so a parent shared by several
/// selections is applied once, before the earliest of them.
///
/// # Errors
/// * `Error::UnknownExtensionError` for a selected or parent identifier missing
///   from the registry
/// * `Error::ExtendsCycleError` if `extends` links form a loop
pub fn expand<S: AsRef<str>>(selected: &[S], registry: &ExtensionRegistry) -> Result<Vec<String>> {
    let mut expanded = IndexSet::new();
    for id in selected {
        for ext in lineage(id.as_ref(), registry)? {
            expanded.insert(ext);
        }
    }
    Ok(expanded.into_iter().collect())
}

/// Returns `id` and its ancestors, root-most first.
fn lineage(id: &str, registry: &ExtensionRegistry) -> Result<Vec<String>> {
    let mut chain = vec![id.to_string()];
    let mut current = registry.require(id)?;

    while let Some(parent) = current.extends.clone() {
        if chain.contains(&parent) {
            chain.push(parent);
            chain.reverse();
            return Err(Error::ExtendsCycleError { chain: chain.join(" -> ") });
        }
        current = registry.require(&parent)?;
        chain.push(parent);
    }

    chain.reverse();
    Ok(chain)
}
