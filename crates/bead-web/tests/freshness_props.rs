use bead_meta::{BeadName, BeadRecord, ContentId, FreezeTime, InputSpec};
use bead_web::{decode, encode, Freshness, Sketch};
use proptest::prelude::*;

const NAMES: [&str; 4] = ["alpha", "beta", "gamma", "delta"];

/// (name index, hour, input picks) per bead; inputs only point backwards
/// except for picks past the end, which become phantoms
fn web_strategy() -> impl Strategy<Value = Vec<(usize, u32, Vec<usize>)>> {
    proptest::collection::vec(
        (0..NAMES.len(), 0..24u32, proptest::collection::vec(0..40usize, 0..4)),
        1..20,
    )
}

fn build(spec: &[(usize, u32, Vec<usize>)]) -> Vec<BeadRecord> {
    let mut records: Vec<BeadRecord> = Vec::new();
    for (i, (name, hour, picks)) in spec.iter().enumerate() {
        let inputs = picks
            .iter()
            .enumerate()
            .map(|(n, &pick)| {
                let nick = format!("in{n}");
                if pick < i {
                    InputSpec::referencing(nick, &records[pick])
                } else {
                    InputSpec::new(
                        nick,
                        "k",
                        ContentId::new(format!("missing_{pick}")),
                        FreezeTime::parse("20000101T000000000000+0000").unwrap(),
                    )
                }
            })
            .collect();
        records.push(BeadRecord::new(
            BeadName::new(NAMES[*name]),
            "k",
            "box",
            ContentId::new(format!("id_{i:02}")),
            FreezeTime::parse(&format!("20200101T{hour:02}0000000000+0000")).unwrap(),
            inputs,
        ));
    }
    records
}

proptest! {
    #[test]
    fn prop_freshness_rules_hold(spec in web_strategy()) {
        let records = build(&spec);
        let sketch = Sketch::from_beads(records.clone());

        for record in &records {
            let id = record.content_id().as_str();
            let freshness = sketch.freshness(id).unwrap();
            let newest = sketch.newest(record.name().as_str()).unwrap();

            if newest.content_id() != record.content_id() {
                prop_assert_eq!(freshness, Freshness::Superseded);
                continue;
            }
            prop_assert_ne!(freshness, Freshness::Superseded);

            let inputs_fresh = record.inputs().iter().all(|input| {
                sketch.freshness(input.content_id.as_str()) == Some(Freshness::UpToDate)
            });
            prop_assert_eq!(freshness == Freshness::UpToDate, inputs_fresh);
        }
    }

    #[test]
    fn prop_newest_is_maximal(spec in web_strategy()) {
        let sketch = Sketch::from_beads(build(&spec));
        for name in NAMES {
            let history = sketch.history(name);
            if let Some(newest) = sketch.newest(name) {
                prop_assert!(history
                    .iter()
                    .all(|b| (b.freeze_time().instant(), b.content_id())
                        <= (newest.freeze_time().instant(), newest.content_id())));
            } else {
                prop_assert!(history.is_empty());
            }
        }
    }

    #[test]
    fn prop_load_order_does_not_matter(spec in web_strategy()) {
        let records = build(&spec);
        let forward = Sketch::from_beads(records.clone());
        let backward = Sketch::from_beads(records.iter().rev().cloned());
        for record in &records {
            let id = record.content_id().as_str();
            prop_assert_eq!(forward.freshness(id), backward.freshness(id));
        }
    }

    #[test]
    fn prop_resolved_snapshot_is_stable(spec in web_strategy()) {
        let sketch = Sketch::from_beads(build(&spec));
        let text = encode(&sketch.to_snapshot()).unwrap();
        let decoded = decode(&text).unwrap();
        prop_assert_eq!(encode(&decoded).unwrap(), text);
        prop_assert_eq!(Sketch::from_snapshot(decoded), sketch);
    }
}
