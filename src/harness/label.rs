//! Decoding of raw case identifiers into display labels.
//!
//! Engines mark executable cases with a four character prefix (`test`) and
//! encode punctuation in the identifier itself:
//!
//! - `__` stands for a call boundary and renders as `() `
//! - `0xHH` stands for the character with code point `HH`
//! - a trailing `_<digits>` is a data-provider variant index
//! - any other `_` is a space

use std::sync::LazyLock;

use regex::{Captures, Regex};

const PREFIX_LEN: usize = 4;

static HEX_ESCAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"0x([0-9A-Fa-f]{2})").expect("hex escape pattern is valid"));

static VARIANT_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_([0-9]+)\z").expect("variant suffix pattern is valid"));

/// Translate a raw case identifier into a human-readable label.
///
/// Total and deterministic: every input yields a label, possibly empty.
pub fn decode_label(raw: &str) -> String {
    let name: String = raw.chars().skip(PREFIX_LEN).collect();
    let name = name.replace("__", "() ");
    let name = HEX_ESCAPE.replace_all(&name, |caps: &Captures<'_>| {
        u8::from_str_radix(&caps[1], 16)
            .map(|code| char::from(code).to_string())
            .unwrap_or_else(|_| caps[0].to_string())
    });
    let name = VARIANT_SUFFIX.replace(&name, " [${1}]");
    name.replace('_', " ").trim().to_string()
}
