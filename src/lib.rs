//! Android kernel config tooling.
//!
//! Generates `android-base-conditional.config` for a platform defconfig by
//! evaluating the conditional groups of the kernel configs repository
//! against the platform's base configs, and suggests the
//! `merge_config.sh` invocation that produces the final kernel config.

pub mod combine;
pub mod layout;
pub mod merge_hint;
pub mod settings;

pub use combine::{run, CombineError, CombinePlan, CombineReport, CombineRequest, Destination};
pub use layout::{AndroidVersion, ConfigsLayout, DefconfigLocation, LayoutError};
pub use merge_hint::MergeCommand;
pub use settings::{SettingsError, SettingsOverrides, ToolSettings};
