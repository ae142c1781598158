//! Testing utilities for the bead web workspace
//!
//! [`Sketcher`] builds coherent bead graphs from a compact notation:
//!
//! - a proto `a1` is bead `a`, version `1`, with content id `content_id_a1`
//! - later letters and higher digits freeze later: `a1 < a2 < a9 < b1`
//! - `a1 -:nick:-> b2` makes `b2` take `a1` as input `nick`; a bare `->`
//!   uses the source bead's name as nick
//!
//! ```rust
//! use bead_test_utils::{bead, Sketcher};
//! use bead_web::Freshness;
//!
//! let mut sketcher = Sketcher::new();
//! sketcher.define("a1 a2 b1", "*", "main");
//! sketcher.compile("a1 -> b1");
//! let sketch = sketcher.sketch();
//! assert_eq!(bead(&sketch, "b1").inputs()[0].name, "a");
//! assert_eq!(sketch.freshness("content_id_b1"), Some(Freshness::OutOfDate));
//! ```

#![allow(missing_docs)]
#![allow(clippy::missing_panics_doc)]

use bead_meta::{BeadName, BeadRecord, ContentId, FreezeTime, InputSpec};
use bead_web::Sketch;
use chrono::{Duration, TimeZone, Utc};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

pub const DEFAULT_BOX_NAME: &str = "main";

#[derive(Debug, Clone)]
struct Entry {
    name: BeadName,
    kind: String,
    box_name: String,
    content_id: ContentId,
    freeze_time: FreezeTime,
    /// Key of the input list; clones share their proto's list
    inputs: String,
}

/// Factory of properly connected bead records
#[derive(Debug, Clone, Default)]
pub struct Sketcher {
    entries: IndexMap<String, Entry>,
    inputs: HashMap<String, Vec<InputSpec>>,
    phantoms: HashSet<String>,
}

impl Sketcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Define beads from whitespace separated protos, e.g. `"a1 a2 b3"`
    pub fn define(&mut self, protos: &str, kind: &str, box_name: &str) -> &mut Self {
        for proto in protos.split_whitespace() {
            let entry = make_entry(proto, proto, kind, box_name, proto);
            self.inputs.insert(proto.to_string(), Vec::new());
            self.entries.insert(proto.to_string(), entry);
        }
        self
    }

    /// Same content as `proto` under the key `alias`, found in `box_name`
    ///
    /// The clone shares the proto's inputs, including those added later.
    pub fn clone_bead(&mut self, proto: &str, alias: &str, box_name: &str) -> &mut Self {
        assert!(!self.entries.contains_key(alias), "{alias} already defined");
        let source = self.entry(proto);
        let clone = make_entry(proto, alias, &source.kind, box_name, &source.inputs);
        self.entries.insert(alias.to_string(), clone);
        self
    }

    /// Connect beads, e.g. `"a1 -:older:-> b2 -> c4"`
    pub fn compile(&mut self, dag: &str) -> &mut Self {
        let mut label: Option<String> = None;
        let mut src: Option<&str> = None;
        for fragment in dag.split_whitespace() {
            if fragment.starts_with('-') {
                let nick = fragment
                    .trim_end_matches('>')
                    .trim_matches('-')
                    .trim_matches(':');
                label = Some(nick.to_string());
                continue;
            }
            assert!(self.entries.contains_key(fragment), "{fragment} is not defined");
            if let Some(src) = src {
                if let Some(nick) = label.take() {
                    let nick = if nick.is_empty() {
                        self.entry(src).name.as_str().to_string()
                    } else {
                        nick
                    };
                    self.add_input(fragment, &nick, src);
                }
            }
            src = Some(fragment);
        }
        self
    }

    /// Leave the given protos out of [`beads`](Self::beads)
    pub fn phantom(&mut self, protos: &str) -> &mut Self {
        self.phantoms
            .extend(protos.split_whitespace().map(str::to_string));
        self
    }

    /// Record defined under `key`
    #[must_use]
    pub fn record(&self, key: &str) -> BeadRecord {
        let entry = self.entry(key);
        BeadRecord::new(
            entry.name.clone(),
            entry.kind.clone(),
            entry.box_name.clone(),
            entry.content_id.clone(),
            entry.freeze_time.clone(),
            self.inputs[&entry.inputs].clone(),
        )
    }

    /// All non-phantom records in definition order
    #[must_use]
    pub fn beads(&self) -> Vec<BeadRecord> {
        self.entries
            .keys()
            .filter(|key| !self.phantoms.contains(*key))
            .map(|key| self.record(key))
            .collect()
    }

    #[must_use]
    pub fn sketch(&self) -> Sketch {
        Sketch::from_beads(self.beads())
    }

    fn entry(&self, key: &str) -> &Entry {
        self.entries
            .get(key)
            .unwrap_or_else(|| panic!("{key} is not defined"))
    }

    fn add_input(&mut self, dest: &str, nick: &str, src: &str) {
        let spec = InputSpec::referencing(nick, &self.record(src));
        let list = self.entry(dest).inputs.clone();
        let inputs = self.inputs.entry(list).or_default();
        assert!(
            inputs.iter().all(|input| input.name != nick),
            "{dest} already has input {nick}"
        );
        inputs.push(spec);
    }
}

fn make_entry(proto: &str, key: &str, kind: &str, box_name: &str, inputs: &str) -> Entry {
    let mut chars = proto.chars();
    let (Some(letter), Some(version), None) = (chars.next(), chars.next(), chars.next()) else {
        panic!("proto must look like a1, got {proto}");
    };
    assert!(letter.is_ascii_lowercase(), "bad proto name in {proto}");
    let version = version
        .to_digit(10)
        .unwrap_or_else(|| panic!("bad proto version in {proto}"));

    let base = Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap();
    let frozen = base
        + Duration::days(i64::from(letter as u8 - b'a'))
        + Duration::hours(i64::from(version));

    Entry {
        name: BeadName::new(key.trim_end_matches(|c: char| c.is_ascii_digit())),
        kind: kind.to_string(),
        box_name: box_name.to_string(),
        content_id: content_id(proto),
        freeze_time: FreezeTime::from_datetime(&frozen),
        inputs: inputs.to_string(),
    }
}

/// Content id of a proto
#[must_use]
pub fn content_id(proto: &str) -> ContentId {
    ContentId::new(format!("content_id_{proto}"))
}

/// First record of `proto` in `sketch`
#[must_use]
pub fn bead<'a>(sketch: &'a Sketch, proto: &str) -> &'a BeadRecord {
    sketch
        .get(content_id(proto).as_str())
        .unwrap_or_else(|| panic!("bead {proto} not found"))
}
