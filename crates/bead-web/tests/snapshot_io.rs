//! Snapshot reading and writing against a stored bead list

use bead_web::{decode, encode, read_snapshot, write_snapshot, Freshness, Sketch, SnapshotBead};
use pretty_assertions::assert_eq;
use std::collections::HashMap;

const META_JSON: &str = r#"[
    {
        "@class": "Dummy",
        "@encoding": "attrs",
        "box_name": "box",
        "content_id": "id_ood2",
        "freeze_time_str": "20190321T191922693711+0100",
        "freshness": {
            "@class": "Freshness",
            "@encoding": "enum",
            "value": "SUPERSEDED"
        },
        "inputs": [
            {
                "@class": "InputSpec",
                "@encoding": "attrs",
                "content_id": "id_ood1",
                "freeze_time_str": "20190321T191922693711+0100",
                "kind": "kind_ood1",
                "name": "ood1"
            },
            {
                "@class": "InputSpec",
                "@encoding": "attrs",
                "content_id": "id_root2_utd",
                "freeze_time_str": "20190321T191922693711+0100",
                "kind": "kind_root_2",
                "name": "root2"
            }
        ],
        "kind": "kind_ood2",
        "name": "ood2"
    },
    {
        "@class": "Dummy",
        "@encoding": "attrs",
        "box_name": "box",
        "content_id": "id_ood1",
        "freeze_time_str": "20190321T191922693711+0100",
        "freshness": {
            "@class": "Freshness",
            "@encoding": "enum",
            "value": "UP_TO_DATE"
        },
        "inputs": [
            {
                "@class": "InputSpec",
                "@encoding": "attrs",
                "content_id": "id_root1_ood",
                "freeze_time_str": "20180321T191922693711+0100",
                "kind": "kind_root_1",
                "name": "root"
            }
        ],
        "kind": "kind_ood1",
        "name": "ood1"
    },
    {
        "@class": "Dummy",
        "@encoding": "attrs",
        "box_name": "",
        "content_id": "id_root2_utd",
        "freeze_time_str": "20190321T191922693711+0100",
        "freshness": {
            "@class": "Freshness",
            "@encoding": "enum",
            "value": "OUT_OF_DATE"
        },
        "inputs": [],
        "kind": "kind_root_2",
        "name": "root2"
    },
    {
        "@class": "Dummy",
        "@encoding": "attrs",
        "box_name": "",
        "content_id": "id_root1_utd",
        "freeze_time_str": "20190321T191922693711+0100",
        "freshness": {
            "@class": "Freshness",
            "@encoding": "enum",
            "value": "SUPERSEDED"
        },
        "inputs": [],
        "kind": "kind_root_1",
        "name": "root1"
    },
    {
        "@class": "Dummy",
        "@encoding": "attrs",
        "box_name": "",
        "content_id": "id_root1_ood",
        "freeze_time_str": "20180321T191922693711+0100",
        "freshness": {
            "@class": "Freshness",
            "@encoding": "enum",
            "value": "SUPERSEDED"
        },
        "inputs": [],
        "kind": "kind_root_1",
        "name": "root1"
    },
    {
        "@class": "Dummy",
        "@encoding": "attrs",
        "box_name": "",
        "content_id": "id_ood3",
        "freeze_time_str": "20190321T191922693711+0100",
        "freshness": {
            "@class": "Freshness",
            "@encoding": "enum",
            "value": "UP_TO_DATE"
        },
        "inputs": [
            {
                "@class": "InputSpec",
                "@encoding": "attrs",
                "content_id": "id_ood2",
                "freeze_time_str": "20190321T191922693711+0100",
                "kind": "kind_ood2",
                "name": "ood2"
            },
            {
                "@class": "InputSpec",
                "@encoding": "attrs",
                "content_id": "id_phantom",
                "freeze_time_str": "20140321T191922693711+0100",
                "kind": "kind_ood2",
                "name": "phantom"
            }
        ],
        "kind": "kind_ood3",
        "name": "ood3"
    }
]
"#;

fn by_name(beads: &[SnapshotBead]) -> HashMap<&str, Option<Freshness>> {
    beads
        .iter()
        .map(|b| (b.bead.name().as_str(), b.freshness))
        .collect()
}

#[test]
fn stored_freshness_is_returned_as_written() {
    let beads = decode(META_JSON).unwrap();
    assert_eq!(beads.len(), 6);
    let tags = by_name(&beads);
    assert_eq!(tags["ood2"], Some(Freshness::Superseded));
    assert_eq!(tags["ood1"], Some(Freshness::UpToDate));
    assert_eq!(tags["root2"], Some(Freshness::OutOfDate));
}

#[test]
fn decoded_fields_and_order() {
    let beads = decode(META_JSON).unwrap();
    let ids: Vec<&str> = beads.iter().map(|b| b.bead.content_id().as_str()).collect();
    assert_eq!(
        ids,
        ["id_ood2", "id_ood1", "id_root2_utd", "id_root1_utd", "id_root1_ood", "id_ood3"]
    );

    let ood2 = &beads[0].bead;
    assert_eq!(ood2.box_name(), "box");
    assert_eq!(ood2.kind(), "kind_ood2");
    assert_eq!(ood2.freeze_time().as_str(), "20190321T191922693711+0100");
    let nicks: Vec<&str> = ood2.inputs().iter().map(|i| i.name.as_str()).collect();
    assert_eq!(nicks, ["ood1", "root2"]);
    assert_eq!(beads[2].bead.box_name(), "");
}

#[test]
fn written_text_is_unchanged() {
    let beads = decode(META_JSON).unwrap();
    assert_eq!(encode(&beads).unwrap(), META_JSON);
}

#[test]
fn file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("new_meta");

    let beads = decode(META_JSON).unwrap();
    write_snapshot(&path, &beads).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), META_JSON);
    assert_eq!(read_snapshot(&path).unwrap(), beads);
}

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_snapshot(dir.path().join("nonexisting_file")).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn sketch_recomputes_freshness() {
    let sketch = Sketch::from_snapshot(decode(META_JSON).unwrap());
    let expected = [
        ("id_ood2", Freshness::OutOfDate),
        ("id_ood1", Freshness::OutOfDate),
        ("id_root2_utd", Freshness::UpToDate),
        ("id_root1_utd", Freshness::UpToDate),
        ("id_root1_ood", Freshness::Superseded),
        ("id_ood3", Freshness::OutOfDate),
    ];
    for (id, freshness) in expected {
        assert_eq!(sketch.freshness(id), Some(freshness), "{id}");
    }

    let phantoms: Vec<&str> = sketch.phantoms().map(|p| p.content_id.as_str()).collect();
    assert_eq!(phantoms, ["id_phantom"]);
    assert!(sketch.diagnostics().is_empty());
}

#[test]
fn resolved_snapshot_survives_a_round_trip() {
    let sketch = Sketch::from_snapshot(decode(META_JSON).unwrap());
    let text = encode(&sketch.to_snapshot()).unwrap();
    let again = decode(&text).unwrap();

    assert_eq!(Sketch::from_snapshot(again.clone()), sketch);
    assert_eq!(encode(&again).unwrap(), text);
    assert!(again.iter().all(|b| b.freshness.is_some()));
}

#[test]
fn empty_list() {
    assert_eq!(encode(&[]).unwrap(), "[]\n");
    assert!(decode("[]").unwrap().is_empty());
}
