//! Snapshot codec
//!
//! A snapshot is a JSON array of bead objects. Every object carries a
//! discriminator pair (`@class`, `@encoding`) naming what it encodes:
//!
//! | `@class`    | `@encoding` | encodes                   |
//! |-------------|-------------|---------------------------|
//! | `Dummy`     | `attrs`     | a bead record             |
//! | `InputSpec` | `attrs`     | one input of a bead       |
//! | `Freshness` | `enum`      | a freshness tag (`value`) |
//!
//! Snapshots are compared as text, so the writer is canonical: keys in
//! alphabetical order, four-space indentation, one trailing newline. Reading
//! canonical text and writing it back yields the same bytes. The reader is
//! strict: unknown discriminators and unknown or missing fields are errors.
//!
//! Non-ASCII text is written as raw UTF-8 by default. Snapshots produced by
//! writers that escape it as `\uXXXX` round-trip byte for byte only with
//! [`SnapshotFormat::with_ascii`].

use crate::error::{SnapshotError, SnapshotResult};
use crate::freshness::{Freshness, UnknownFreshness};
use bead_meta::{BeadName, BeadRecord, ContentId, FreezeTime, InputSpec};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::path::Path;

const CLASS_KEY: &str = "@class";
const ENCODING_KEY: &str = "@encoding";

/// Bead record as stored in a snapshot, with its stored freshness tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotBead {
    pub bead: BeadRecord,
    /// Tag as written; `None` when the snapshot holds `null` or no tag
    pub freshness: Option<Freshness>,
}

impl SnapshotBead {
    #[must_use]
    pub fn new(bead: BeadRecord, freshness: Option<Freshness>) -> Self {
        Self { bead, freshness }
    }
}

impl From<BeadRecord> for SnapshotBead {
    fn from(bead: BeadRecord) -> Self {
        Self::new(bead, None)
    }
}

/// Writer settings
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SnapshotFormat {
    /// Spaces per indentation level
    pub indent: usize,
    /// Escape non-ASCII characters as `\uXXXX` (lower-case hex, UTF-16 units)
    pub ascii: bool,
}

impl SnapshotFormat {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    #[inline]
    #[must_use]
    pub fn with_ascii(mut self, ascii: bool) -> Self {
        self.ascii = ascii;
        self
    }
}

impl Default for SnapshotFormat {
    fn default() -> Self {
        Self {
            indent: 4,
            ascii: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Bead,
    Input,
    Freshness,
}

/// Discriminator table
const CLASSES: [(Class, &str, &str, &[&str]); 3] = [
    (
        Class::Bead,
        "Dummy",
        "attrs",
        &[
            "box_name",
            "content_id",
            "freeze_time_str",
            "freshness",
            "inputs",
            "kind",
            "name",
        ],
    ),
    (
        Class::Input,
        "InputSpec",
        "attrs",
        &["content_id", "freeze_time_str", "kind", "name"],
    ),
    (Class::Freshness, "Freshness", "enum", &["value"]),
];

impl Class {
    fn entry(self) -> (&'static str, &'static str, &'static [&'static str]) {
        CLASSES
            .iter()
            .find(|(class, ..)| *class == self)
            .map(|(_, name, encoding, fields)| (*name, *encoding, *fields))
            .unwrap_or(("", "", &[]))
    }

    fn from_tag(name: &str, encoding: &str) -> Option<Self> {
        CLASSES
            .iter()
            .find(|(_, n, e, _)| *n == name && *e == encoding)
            .map(|(class, ..)| *class)
    }

    fn tagged(self) -> Map<String, Value> {
        let (name, encoding, _) = self.entry();
        let mut obj = Map::new();
        obj.insert(CLASS_KEY.to_string(), Value::from(name));
        obj.insert(ENCODING_KEY.to_string(), Value::from(encoding));
        obj
    }
}

// ---------------------------------------------------------------------------
// Reading
// ---------------------------------------------------------------------------

/// Decode snapshot text
///
/// Stored freshness tags are returned as written; they are not checked.
///
/// # Errors
/// Returns [`SnapshotError::Deserialization`] for invalid JSON, a wrong
/// shape, an unknown discriminator, a missing or unexpected field, or an
/// unparsable freeze time.
pub fn decode(text: &str) -> SnapshotResult<Vec<SnapshotBead>> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(items) = value else {
        return Err(SnapshotError::deserialization("$", "expected an array of beads"));
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| decode_bead(item, &format!("$[{i}]")))
        .collect()
}

/// Read and decode a snapshot file
///
/// # Errors
/// Returns [`SnapshotError::NotFound`] if the file does not exist, other
/// IO errors as [`SnapshotError::Io`], and decoding errors as for [`decode`].
pub fn read_snapshot(path: impl AsRef<Path>) -> SnapshotResult<Vec<SnapshotBead>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| SnapshotError::io_error(path, e))?;
    let beads = decode(&text)?;
    tracing::debug!(path = %path.display(), beads = beads.len(), "read snapshot");
    Ok(beads)
}

fn decode_bead(value: &Value, at: &str) -> SnapshotResult<SnapshotBead> {
    let obj = expect_class(value, Class::Bead, at)?;

    let inputs = match field(obj, "inputs", at)? {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| decode_input(item, &format!("{at}.inputs[{i}]")))
            .collect::<SnapshotResult<Vec<_>>>()?,
        _ => return Err(SnapshotError::deserialization(format!("{at}.inputs"), "expected an array")),
    };

    let freshness = match obj.get("freshness") {
        None | Some(Value::Null) => None,
        Some(tag) => Some(decode_freshness(tag, &format!("{at}.freshness"))?),
    };

    let bead = BeadRecord::new(
        BeadName::new(str_field(obj, "name", at)?),
        str_field(obj, "kind", at)?,
        str_field(obj, "box_name", at)?,
        ContentId::new(str_field(obj, "content_id", at)?),
        freeze_time_field(obj, at)?,
        inputs,
    );
    Ok(SnapshotBead { bead, freshness })
}

fn decode_input(value: &Value, at: &str) -> SnapshotResult<InputSpec> {
    let obj = expect_class(value, Class::Input, at)?;
    Ok(InputSpec::new(
        str_field(obj, "name", at)?,
        str_field(obj, "kind", at)?,
        ContentId::new(str_field(obj, "content_id", at)?),
        freeze_time_field(obj, at)?,
    ))
}

fn decode_freshness(value: &Value, at: &str) -> SnapshotResult<Freshness> {
    let obj = expect_class(value, Class::Freshness, at)?;
    let value = str_field(obj, "value", at)?;
    Freshness::ALL
        .into_iter()
        .find(|f| f.as_str() == value)
        .ok_or_else(|| {
            SnapshotError::deserialization(format!("{at}.value"), UnknownFreshness(value.to_string()).to_string())
        })
}

/// Check the discriminator and the field set of an encoded object
fn expect_class<'a>(value: &'a Value, expected: Class, at: &str) -> SnapshotResult<&'a Map<String, Value>> {
    let Value::Object(obj) = value else {
        return Err(SnapshotError::deserialization(at, "expected an object"));
    };
    let name = str_field(obj, CLASS_KEY, at)?;
    let encoding = str_field(obj, ENCODING_KEY, at)?;
    let class = Class::from_tag(name, encoding).ok_or_else(|| {
        SnapshotError::deserialization(at, format!("unknown discriminator '{name}' / '{encoding}'"))
    })?;
    let (expected_name, _, fields) = expected.entry();
    if class != expected {
        return Err(SnapshotError::deserialization(
            at,
            format!("expected '{expected_name}' but found '{name}'"),
        ));
    }
    if let Some(key) = obj
        .keys()
        .find(|k| *k != CLASS_KEY && *k != ENCODING_KEY && !fields.contains(&k.as_str()))
    {
        return Err(SnapshotError::deserialization(
            at,
            format!("unexpected field '{key}' in '{name}'"),
        ));
    }
    Ok(obj)
}

fn field<'a>(obj: &'a Map<String, Value>, key: &str, at: &str) -> SnapshotResult<&'a Value> {
    obj.get(key)
        .ok_or_else(|| SnapshotError::deserialization(at, format!("missing field '{key}'")))
}

fn str_field<'a>(obj: &'a Map<String, Value>, key: &str, at: &str) -> SnapshotResult<&'a str> {
    field(obj, key, at)?
        .as_str()
        .ok_or_else(|| SnapshotError::deserialization(format!("{at}.{key}"), "expected a string"))
}

fn freeze_time_field(obj: &Map<String, Value>, at: &str) -> SnapshotResult<FreezeTime> {
    FreezeTime::parse(str_field(obj, "freeze_time_str", at)?)
        .map_err(|e| SnapshotError::deserialization(format!("{at}.freeze_time_str"), e.to_string()))
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Encode beads as canonical snapshot text
///
/// # Errors
/// Returns [`SnapshotError::Serialization`] if the JSON writer fails
pub fn encode(beads: &[SnapshotBead]) -> SnapshotResult<String> {
    encode_with(beads, &SnapshotFormat::default())
}

/// Encode beads with explicit writer settings
///
/// # Errors
/// Returns [`SnapshotError::Serialization`] if the JSON writer fails
pub fn encode_with(beads: &[SnapshotBead], format: &SnapshotFormat) -> SnapshotResult<String> {
    let value = Value::Array(beads.iter().map(encode_bead).collect());
    let indent = " ".repeat(format.indent);
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(indent.as_bytes()));
    value
        .serialize(&mut serializer)
        .map_err(|e| SnapshotError::Serialization(e.to_string()))?;
    let mut text = String::from_utf8(buf).map_err(|e| SnapshotError::Serialization(e.to_string()))?;
    if format.ascii {
        text = escape_non_ascii(&text);
    }
    text.push('\n');
    Ok(text)
}

/// Encode beads and write them to `path`
///
/// # Errors
/// Returns [`SnapshotError::Io`] if the file cannot be written
pub fn write_snapshot(path: impl AsRef<Path>, beads: &[SnapshotBead]) -> SnapshotResult<()> {
    let path = path.as_ref();
    std::fs::write(path, encode(beads)?).map_err(|e| SnapshotError::io_error(path, e))?;
    tracing::debug!(path = %path.display(), beads = beads.len(), "wrote snapshot");
    Ok(())
}

// Keys are inserted alphabetically so the order holds whichever map
// implementation serde_json was built with.
fn encode_bead(entry: &SnapshotBead) -> Value {
    let bead = &entry.bead;
    let mut obj = Class::Bead.tagged();
    obj.insert("box_name".into(), Value::from(bead.box_name()));
    obj.insert("content_id".into(), Value::from(bead.content_id().as_str()));
    obj.insert("freeze_time_str".into(), Value::from(bead.freeze_time().as_str()));
    obj.insert(
        "freshness".into(),
        entry.freshness.map_or(Value::Null, encode_freshness),
    );
    obj.insert(
        "inputs".into(),
        Value::Array(bead.inputs().iter().map(encode_input).collect()),
    );
    obj.insert("kind".into(), Value::from(bead.kind()));
    obj.insert("name".into(), Value::from(bead.name().as_str()));
    Value::Object(obj)
}

fn encode_input(input: &InputSpec) -> Value {
    let mut obj = Class::Input.tagged();
    obj.insert("content_id".into(), Value::from(input.content_id.as_str()));
    obj.insert("freeze_time_str".into(), Value::from(input.freeze_time.as_str()));
    obj.insert("kind".into(), Value::from(input.kind.as_str()));
    obj.insert("name".into(), Value::from(input.name.as_str()));
    Value::Object(obj)
}

// Outside strings the document is ASCII, so every non-ASCII char is string content
fn escape_non_ascii(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut units = [0u16; 2];
    for c in text.chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            for unit in c.encode_utf16(&mut units) {
                out.push_str(&format!("\\u{unit:04x}"));
            }
        }
    }
    out
}

fn encode_freshness(freshness: Freshness) -> Value {
    let mut obj = Class::Freshness.tagged();
    obj.insert("value".into(), Value::from(freshness.as_str()));
    Value::Object(obj)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_BEAD: &str = r#"[
    {
        "@class": "Dummy",
        "@encoding": "attrs",
        "box_name": "main",
        "content_id": "id_a",
        "freeze_time_str": "20190321T191922693711+0100",
        "freshness": {
            "@class": "Freshness",
            "@encoding": "enum",
            "value": "UP_TO_DATE"
        },
        "inputs": [],
        "kind": "kind_a",
        "name": "a"
    }
]
"#;

    #[test]
    fn decode_then_encode_is_identity() {
        let beads = decode(ONE_BEAD).unwrap();
        assert_eq!(beads.len(), 1);
        assert_eq!(beads[0].freshness, Some(Freshness::UpToDate));
        assert_eq!(beads[0].bead.box_name(), "main");
        assert_eq!(encode(&beads).unwrap(), ONE_BEAD);
    }

    #[test]
    fn empty_snapshot() {
        assert_eq!(encode(&[]).unwrap(), "[]\n");
        assert!(decode("[]").unwrap().is_empty());
    }

    #[test]
    fn null_freshness_is_none() {
        let text = ONE_BEAD.replace(
            r#"{
            "@class": "Freshness",
            "@encoding": "enum",
            "value": "UP_TO_DATE"
        }"#,
            "null",
        );
        let beads = decode(&text).unwrap();
        assert_eq!(beads[0].freshness, None);
        assert_eq!(encode(&beads).unwrap(), text);
    }

    #[test]
    fn missing_freshness_is_none() {
        let mut value: Value = serde_json::from_str(ONE_BEAD).unwrap();
        value[0].as_object_mut().unwrap().remove("freshness");
        let beads = decode(&value.to_string()).unwrap();
        assert_eq!(beads[0].freshness, None);
    }

    #[test]
    fn unknown_discriminator_is_rejected() {
        let text = ONE_BEAD.replace("\"Dummy\"", "\"Mystery\"");
        let err = decode(&text).unwrap_err();
        assert!(err.is_deserialization());
        assert!(err.to_string().contains("unknown discriminator 'Mystery'"));
    }

    #[test]
    fn wrong_class_in_position_is_rejected() {
        let text = ONE_BEAD.replace("\"Dummy\"", "\"InputSpec\"");
        let err = decode(&text).unwrap_err();
        assert!(err.to_string().contains("expected 'Dummy' but found 'InputSpec'"));
    }

    #[test]
    fn missing_field_is_rejected() {
        let text = ONE_BEAD.replace("\"kind\": \"kind_a\",\n", "");
        let err = decode(&text).unwrap_err();
        assert!(err.to_string().contains("missing field 'kind'"), "{err}");
    }

    #[test]
    fn unexpected_field_is_rejected() {
        let text = ONE_BEAD.replace("\"kind\": \"kind_a\",", "\"kind\": \"kind_a\",\n        \"color\": \"red\",");
        let err = decode(&text).unwrap_err();
        assert!(err.to_string().contains("unexpected field 'color'"), "{err}");
    }

    #[test]
    fn bad_freshness_value_is_rejected() {
        let text = ONE_BEAD.replace("UP_TO_DATE", "FRESH");
        let err = decode(&text).unwrap_err();
        assert!(err.to_string().contains("$[0].freshness.value"), "{err}");

        let text = ONE_BEAD.replace("UP_TO_DATE", "up-to-date");
        assert!(decode(&text).unwrap_err().is_deserialization());
    }

    #[test]
    fn bad_freeze_time_is_rejected() {
        let text = ONE_BEAD.replace("20190321T191922693711+0100", "last tuesday");
        let err = decode(&text).unwrap_err();
        assert!(err.to_string().contains("freeze_time_str"), "{err}");
    }

    #[test]
    fn non_array_is_rejected() {
        let err = decode("{}").unwrap_err();
        assert!(err.to_string().contains("expected an array"));
    }

    #[test]
    fn custom_indent() {
        let beads = decode(ONE_BEAD).unwrap();
        let text = encode_with(&beads, &SnapshotFormat::new().with_indent(2)).unwrap();
        assert!(text.starts_with("[\n  {\n    \"@class\": \"Dummy\""));
        assert_eq!(decode(&text).unwrap(), beads);
    }

    #[test]
    fn non_ascii_is_raw_unless_escaping_is_asked_for() {
        let escaped = ONE_BEAD.replace(r#""kind": "kind_a""#, r#""kind": "k\u00e9\ud83d\ude00""#);
        let beads = decode(&escaped).unwrap();
        assert_eq!(beads[0].bead.kind(), "k\u{e9}\u{1f600}");

        let raw = encode(&beads).unwrap();
        assert!(raw.contains("\"kind\": \"k\u{e9}\u{1f600}\""));
        let ascii = encode_with(&beads, &SnapshotFormat::new().with_ascii(true)).unwrap();
        assert_eq!(ascii, escaped);
        assert!(ascii.is_ascii());
    }

    #[test]
    fn format_settings_default_when_missing() {
        let format: SnapshotFormat = serde_json::from_str(r#"{"ascii": true}"#).unwrap();
        assert_eq!(format, SnapshotFormat::new().with_ascii(true));
    }
}
