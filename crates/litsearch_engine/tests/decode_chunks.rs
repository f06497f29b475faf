use litsearch_engine::{DecodedRecord, StreamDecoder, StreamRecord};
use pretty_assertions::assert_eq;

const STREAM: &str = concat!(
    ": connected\n",
    "data: {\"type\":\"log\",\"content\":{\"timestamp\":\"10:00:01\",\"level\":\"info\",\"message\":\"🚀 开始搜索关键词: 维生素D\"}}\n",
    "\n",
    "data: {\"type\":\"row\",\"content\":{\"标题\":\"Study A\",\"PMID\":\"111\"}}\n\n",
    "data: {broken json}\n",
    "data: {\"type\":\"row\",\"content\":{\"标题\":\"研究 B\",\"国家\":\"中国\"}}\r\n",
    "data: {\"type\":\"end\"}\n",
);

fn decode_in_chunks(bytes: &[u8], cuts: &[usize]) -> Vec<DecodedRecord> {
    let mut decoder = StreamDecoder::new();
    let mut out = Vec::new();
    let mut start = 0;
    for &cut in cuts {
        out.extend(decoder.push(&bytes[start..cut]));
        start = cut;
    }
    out.extend(decoder.push(&bytes[start..]));
    out.extend(decoder.finish());
    out
}

#[test]
fn whole_stream_decodes_in_order() {
    let records = decode_in_chunks(STREAM.as_bytes(), &[]);
    assert_eq!(records.len(), 5);
    assert!(matches!(&records[0], Ok(StreamRecord::Log(log)) if log.message.contains("开始搜索")));
    assert!(matches!(&records[1], Ok(StreamRecord::Row(row)) if row["标题"] == "Study A"));
    assert!(records[2].is_err());
    assert!(matches!(&records[3], Ok(StreamRecord::Row(row)) if row["国家"] == "中国"));
    assert_eq!(records[4], Ok(StreamRecord::End));
}

#[test]
fn every_single_split_yields_the_same_records() {
    let bytes = STREAM.as_bytes();
    let expected = decode_in_chunks(bytes, &[]);
    // Includes cuts inside multi-byte characters.
    for cut in 0..=bytes.len() {
        assert_eq!(decode_in_chunks(bytes, &[cut]), expected, "cut at {cut}");
    }
}

#[test]
fn pairs_of_splits_yield_the_same_records() {
    let bytes = STREAM.as_bytes();
    let expected = decode_in_chunks(bytes, &[]);
    for first in (0..bytes.len()).step_by(3) {
        for second in (first..=bytes.len()).step_by(7) {
            assert_eq!(
                decode_in_chunks(bytes, &[first, second]),
                expected,
                "cuts at {first} and {second}"
            );
        }
    }
}

#[test]
fn byte_at_a_time_yields_the_same_records() {
    let bytes = STREAM.as_bytes();
    let cuts: Vec<usize> = (1..bytes.len()).collect();
    assert_eq!(decode_in_chunks(bytes, &cuts), decode_in_chunks(bytes, &[]));
}

#[test]
fn unprefixed_lines_never_produce_records() {
    let noise = "event: message\nid: 4\nretry: 100\n{\"type\":\"end\"}\ndata\n : data: {\"type\":\"end\"}\n";
    assert!(decode_in_chunks(noise.as_bytes(), &[]).is_empty());
}
