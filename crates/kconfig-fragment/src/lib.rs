//! Conditional kernel config fragment resolution.
//!
//! A conditional fragment is a list of groups. Each group pairs required
//! base config values with config assignments that apply when every
//! condition holds. Resolution evaluates the groups against a base config
//! set and unions the assignments of the matching ones.

mod base;
mod group;
mod resolved;
pub mod version;

pub use base::{BaseConfigError, BaseConfigSet, CONFIG_PREFIX};
pub use group::{load_groups, parse_groups, ConfigGroup, GroupParseError};
pub use resolved::{ConditionalOutput, ResolvedConfig};
pub use version::{KernelVersion, VersionError};

use std::fs;
use std::io;
use std::path::Path;

use tracing::debug;

/// Whether every condition of `group` holds in `base`.
///
/// A condition on a key absent from `base` never holds. A group with no
/// conditions always matches.
pub fn group_matches(group: &ConfigGroup, base: &BaseConfigSet) -> bool {
    group
        .conditions
        .iter()
        .all(|(key, value)| base.get(key) == Some(value.as_str()))
}

/// Union the configs of all groups matching `base`.
///
/// Groups are applied in order, so a later matching group overrides the
/// value an earlier one set for the same key.
pub fn resolve(groups: &[ConfigGroup], base: &BaseConfigSet) -> ResolvedConfig {
    let mut resolved = ResolvedConfig::default();

    for (index, group) in groups.iter().enumerate() {
        if !group_matches(group, base) {
            debug!(group = index, "conditions not met");
            continue;
        }
        debug!(group = index, configs = group.configs.len(), "group matched");
        for (key, value) in &group.configs {
            resolved.set(key, value);
        }
    }

    resolved
}

/// Resolve `groups` and write the result to `dest`.
///
/// With no groups nothing is produced, not even an empty file. Without a
/// destination the result is handed back unwritten.
pub fn generate_conditional_config(
    groups: &[ConfigGroup],
    base: &BaseConfigSet,
    dest: Option<&Path>,
) -> io::Result<ConditionalOutput> {
    if groups.is_empty() {
        return Ok(ConditionalOutput::NoGroups);
    }

    let resolved = resolve(groups, base);

    match dest {
        Some(path) => {
            fs::write(path, resolved.render())?;
            debug!(path = %path.display(), entries = resolved.len(), "wrote conditional config");
            Ok(ConditionalOutput::Written {
                path: path.to_path_buf(),
                resolved,
            })
        }
        None => Ok(ConditionalOutput::Rendered(resolved)),
    }
}
