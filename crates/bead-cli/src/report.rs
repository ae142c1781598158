//! Human and JSON renderings of a sketch

use bead_meta::BeadRecord;
use bead_web::{Freshness, Sketch};
use serde::Serialize;
use std::fmt::{self, Display, Formatter};

#[derive(Debug, Serialize)]
struct ReportRow<'a> {
    name: &'a str,
    #[serde(rename = "box")]
    box_name: &'a str,
    kind: &'a str,
    content_id: &'a str,
    freeze_time: &'a str,
    freshness: Freshness,
}

fn rows(sketch: &Sketch, filter: Option<Freshness>) -> Vec<ReportRow<'_>> {
    sketch
        .beads()
        .filter(|(_, freshness)| filter.map_or(true, |f| f == *freshness))
        .map(|(bead, freshness)| ReportRow {
            name: bead.name().as_str(),
            box_name: bead.box_name(),
            kind: bead.kind(),
            content_id: bead.content_id().as_str(),
            freeze_time: bead.freeze_time().as_str(),
            freshness,
        })
        .collect()
}

/// Table of beads, then totals and diagnostics
pub(crate) struct Table<'a> {
    sketch: &'a Sketch,
    filter: Option<Freshness>,
}

impl<'a> Table<'a> {
    pub(crate) fn new(sketch: &'a Sketch, filter: Option<Freshness>) -> Self {
        Self { sketch, filter }
    }
}

impl Display for Table<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let rows = rows(self.sketch, self.filter);
        let name_width = rows.iter().map(|r| r.name.len()).max().unwrap_or(0).max(4);
        let box_width = rows.iter().map(|r| r.box_name.len()).max().unwrap_or(0).max(3);

        writeln!(
            f,
            "{:<name_width$}  {:<box_width$}  {:<11}  {:<12}  FREEZE TIME",
            "NAME", "BOX", "FRESHNESS", "CONTENT ID"
        )?;
        for row in &rows {
            let short: String = row.content_id.chars().take(12).collect();
            writeln!(
                f,
                "{:<name_width$}  {:<box_width$}  {:<11}  {:<12}  {}",
                row.name, row.box_name, row.freshness, short, row.freeze_time
            )?;
        }

        let totals: Vec<String> = self
            .sketch
            .counts()
            .iter()
            .map(|(freshness, count)| format!("{count} {}", label(*freshness)))
            .collect();
        writeln!(f, "\n{} beads: {}", self.sketch.len(), totals.join(", "))?;
        let phantoms = self.sketch.phantoms().count();
        if phantoms > 0 {
            writeln!(f, "{phantoms} missing input beads")?;
        }
        for diagnostic in self.sketch.diagnostics() {
            writeln!(f, "warning: {diagnostic}")?;
        }
        Ok(())
    }
}

/// Beads as a JSON array
pub(crate) fn render_json(sketch: &Sketch, filter: Option<Freshness>) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&rows(sketch, filter))
}

/// Versions of a name, oldest first, one line each
pub(crate) struct History<'a> {
    sketch: &'a Sketch,
    name: &'a str,
}

impl<'a> History<'a> {
    pub(crate) fn new(sketch: &'a Sketch, name: &'a str) -> Self {
        Self { sketch, name }
    }
}

impl Display for History<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for bead in self.sketch.history(self.name) {
            writeln!(f, "{}", VersionLine::new(self.sketch, bead))?;
        }
        Ok(())
    }
}

/// One version: freeze time, freshness, content id and boxes
pub(crate) struct VersionLine<'a> {
    sketch: &'a Sketch,
    bead: &'a BeadRecord,
}

impl<'a> VersionLine<'a> {
    pub(crate) fn new(sketch: &'a Sketch, bead: &'a BeadRecord) -> Self {
        Self { sketch, bead }
    }
}

impl Display for VersionLine<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let id = self.bead.content_id();
        let freshness = self
            .sketch
            .freshness(id.as_str())
            .map_or_else(|| "?".to_string(), |state| state.to_string());
        write!(
            f,
            "{}  {:<11}  {}  [{}]",
            self.bead.freeze_time(),
            freshness,
            id.short(),
            self.sketch.locations(id.as_str()).join(", ")
        )
    }
}

fn label(freshness: Freshness) -> &'static str {
    match freshness {
        Freshness::UpToDate => "up to date",
        Freshness::OutOfDate => "out of date",
        Freshness::Superseded => "superseded",
    }
}
