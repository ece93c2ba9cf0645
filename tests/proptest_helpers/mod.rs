#![allow(dead_code)]

use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

/// The ten integer columns of one valid box line.
pub type RecordColumns = [i64; 10];

pub fn arb_record_columns() -> impl Strategy<Value = RecordColumns> {
    (
        (0i64..5000, 0i64..5000, 0i64..2000, 0i64..2000),
        (0i64..3, 0i64..2, 0i64..2, 0i64..2, 0i64..3, 0i64..2),
    )
        .prop_map(|((x, y, w, h), (blur, expr, illum, invalid, occl, pose))| {
            [x, y, w, h, blur, expr, illum, invalid, occl, pose]
        })
}

/// Joins columns with random runs of spaces/tabs and optional padding.
pub fn arb_record_line() -> impl Strategy<Value = (RecordColumns, String)> {
    (
        arb_record_columns(),
        prop::collection::vec(prop::sample::select(vec![" ", "  ", "\t", " \t "]), 9),
        prop::sample::select(vec!["", " ", "\t"]),
        prop::sample::select(vec!["", " ", "  "]),
    )
        .prop_map(|(cols, seps, lead, trail)| {
            let mut line = String::from(lead);
            for (i, col) in cols.iter().enumerate() {
                if i > 0 {
                    line.push_str(seps[i - 1]);
                }
                line.push_str(&col.to_string());
            }
            line.push_str(trail);
            (cols, line)
        })
}

/// One generated image block: relative header path plus its box lines.
#[derive(Clone, Debug)]
pub struct Block {
    pub header: String,
    pub records: Vec<RecordColumns>,
}

pub fn arb_block() -> impl Strategy<Value = Block> {
    (
        0u32..4,
        "[a-z]{1,6}",
        0u32..30,
        prop::collection::vec(arb_record_columns(), 0..5),
    )
        .prop_map(|(event, word, n, records)| Block {
            header: format!("{event}--Event/{event}_{word}_{n}.jpg"),
            records,
        })
}

pub fn render_blocks(blocks: &[Block], placeholder_for_empty: bool) -> String {
    let mut out = String::new();
    for block in blocks {
        out.push_str(&block.header);
        out.push('\n');
        out.push_str(&block.records.len().to_string());
        out.push('\n');
        for cols in &block.records {
            let cols: Vec<String> = cols.iter().map(|c| c.to_string()).collect();
            out.push_str(&cols.join(" "));
            out.push_str(" \n");
        }
        if block.records.is_empty() && placeholder_for_empty {
            out.push_str("0 0 0 0 0 0 0 0 0 0 \n");
        }
    }
    out
}
