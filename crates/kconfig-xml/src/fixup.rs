//! Text rewrite of conditional config XML.
//!
//! The hand-maintained file names its sections `<group>` and states the LTS
//! version once on the first line. The compatibility matrix wants one
//! `<kernel version="...">` section per group and understands only tristate
//! values, so both are rewritten here.

use std::fmt;
use std::sync::OnceLock;

use regex_lite::Regex;

use crate::FixupError;

const BOOL_VALUE_TAG: &str = "<value type=\"bool\">";
const TRISTATE_VALUE_TAG: &str = "<value type=\"tristate\">";
const GROUP_OPEN_TAG: &str = "<group>";
const GROUP_CLOSE_TAG: &str = "</group>";
const KERNEL_CLOSE_TAG: &str = "</kernel>";

fn version_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^<kernel minlts="(\w+)\.(\w+)\.(\w+)"\s+/>"#)
            .expect("version tag pattern is valid")
    })
}

/// The `minlts` version declared on the first line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LtsVersion {
    pub major: String,
    pub minor: String,
    pub tiny: String,
}

impl LtsVersion {
    /// Parse the `<kernel minlts="x.y.z" />` tag at the start of `line`.
    pub fn from_tag_line(line: &str) -> Option<Self> {
        let caps = version_tag_re().captures(line)?;
        Some(Self {
            major: caps[1].to_string(),
            minor: caps[2].to_string(),
            tiny: caps[3].to_string(),
        })
    }

    /// Opening tag that replaces `<group>`.
    pub fn kernel_open_tag(&self) -> String {
        format!("<kernel version=\"{}\">", self)
    }
}

impl fmt::Display for LtsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.tiny)
    }
}

/// Result of rewriting one source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedUpXml {
    pub lts: LtsVersion,
    /// Rewritten text, without the version tag line.
    pub body: String,
}

/// Rewrite a conditional config XML source.
pub fn fixup_str(source: &str) -> Result<FixedUpXml, FixupError> {
    let mut lines = source.split_inclusive('\n');
    let first = lines.next().unwrap_or_default();
    let lts = LtsVersion::from_tag_line(first).ok_or_else(|| {
        FixupError::MalformedVersionTag(first.trim_end().to_string())
    })?;

    let open_tag = lts.kernel_open_tag();
    let mut body = String::with_capacity(source.len());
    for line in lines {
        body.push_str(&rewrite_line(line, &open_tag));
    }

    Ok(FixedUpXml { lts, body })
}

fn rewrite_line(line: &str, kernel_open_tag: &str) -> String {
    line.replace(BOOL_VALUE_TAG, TRISTATE_VALUE_TAG)
        .replace(GROUP_OPEN_TAG, kernel_open_tag)
        .replace(GROUP_CLOSE_TAG, KERNEL_CLOSE_TAG)
}
