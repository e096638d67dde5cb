use crate::trace::{parse_line, AccessKind, AccessRecord, Trace};
use crate::config::CacheConfig;
use crate::simulator::run;
use crate::stats::Stats;
use crate::{Error, RecordError};

#[test]
fn parses_data_lines() {
    assert_eq!(
        parse_line(" L 7ff0005c8,8"),
        Ok(Some(AccessRecord { kind: AccessKind::Load, address: 0x7ff0005c8, size: 8 }))
    );
    assert_eq!(
        parse_line(" S 0x10,4\r"),
        Ok(Some(AccessRecord { kind: AccessKind::Store, address: 0x10, size: 4 }))
    );
    assert_eq!(
        parse_line("  M   ffffffffffffffff,16"),
        Ok(Some(AccessRecord { kind: AccessKind::Modify, address: u64::MAX, size: 16 }))
    );
}

#[test]
fn skips_annotation_lines() {
    assert_eq!(parse_line("I  0400d7d4,8"), Ok(None));
    assert_eq!(parse_line("==31337== header"), Ok(None));
    assert_eq!(parse_line(""), Ok(None));
}

#[test]
fn rejects_malformed_data_lines() {
    assert_eq!(parse_line(" "), Err(RecordError::Syntax));
    assert_eq!(parse_line(" L 10"), Err(RecordError::Syntax));
    assert_eq!(parse_line(" L10,1"), Err(RecordError::Syntax));
    assert_eq!(parse_line(" LS 10,1"), Err(RecordError::Syntax));
    assert_eq!(parse_line(" L 10,1 trailing"), Err(RecordError::Syntax));
    assert_eq!(parse_line(" I 10,1"), Err(RecordError::UnknownKind('I')));
    assert_eq!(parse_line(" L 10g,1"), Err(RecordError::Address("10g".to_string())));
    assert_eq!(parse_line(" L 10000000000000000,1"), Err(RecordError::Address("10000000000000000".to_string())));
    assert_eq!(parse_line(" L 10,x"), Err(RecordError::Size("x".to_string())));
    assert_eq!(parse_line(" L 10,0"), Err(RecordError::ZeroSize));
}

#[test]
fn record_display_round_trips_through_the_parser() {
    let record = AccessRecord { kind: AccessKind::Modify, address: 0x421c7f0, size: 4 };
    assert_eq!(record.to_string(), "M 421c7f0,4");
    assert_eq!(parse_line(&format!(" {record}")), Ok(Some(record)));
}

#[test]
fn trace_stops_after_first_error() {
    let source = "I  0400d7d4,8\n L 10,1\n S 20,oops\n L 30,1\n";
    let mut trace = Trace::new(source.as_bytes());
    assert!(matches!(trace.next(), Some(Ok(AccessRecord { address: 0x10, .. }))));
    match trace.next() {
        Some(Err(Error::MalformedRecord { line, reason, .. })) => {
            assert_eq!(line, 3);
            assert_eq!(reason, RecordError::Size("oops".to_string()));
        }
        other => panic!("Expected a malformed record, got {other:?}"),
    }
    assert!(trace.next().is_none());
    assert_eq!(trace.line_number(), 3);
}

#[test]
fn invalid_utf8_data_line_is_malformed() {
    let source: &[u8] = b" L 10,1\n \xff\xfe\n";
    let results: Vec<_> = Trace::new(source).collect();
    assert_eq!(results.len(), 2);
    match &results[1] {
        Err(Error::MalformedRecord { line, reason, .. }) => {
            assert_eq!(*line, 2);
            assert_eq!(*reason, RecordError::Syntax);
        }
        other => panic!("Expected a malformed record, got {other:?}"),
    }
}

#[test]
fn annotation_lines_may_hold_any_bytes() {
    let source: &[u8] = b"==1== Command: ./caf\xe9\n L 10,1\n L 10,1\n";
    let config = CacheConfig::new(0, 2, 0).unwrap();
    let stats = run(&config, source).unwrap();
    assert_eq!(stats, Stats { hits: 1, misses: 1, evictions: 0 });
}
