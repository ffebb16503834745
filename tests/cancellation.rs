mod common;

use std::time::Duration;

use common::{clean_people, stream, Person};
use novadb_cursor::{Cursor, DecodePolicy, Error, QueryContext};

#[tokio::test]
async fn deadline_surfaces_through_err() {
    let stalled = stream(&clean_people()).stall_at(1);
    let ctx = QueryContext::background().with_timeout(Duration::from_millis(20));
    let mut cursor = Cursor::new(stalled, ctx, DecodePolicy::IgnoreField);
    let mut person = Person::default();

    assert!(cursor.next(&mut person).await);
    assert!(!cursor.next(&mut person).await);
    assert!(matches!(cursor.err(), Some(Error::DeadlineExceeded)));
}

#[tokio::test]
async fn cancellation_stops_bulk_read() {
    let (ctx, handle) = QueryContext::background().with_cancel();
    let mut cursor = Cursor::new(stream(&clean_people()), ctx, DecodePolicy::IgnoreRow);
    handle.cancel();

    let mut rows: Vec<Person> = Vec::new();
    let err = cursor.all(&mut rows).await.unwrap_err();
    assert!(matches!(err, Error::Cancelled));
    assert!(rows.is_empty());
    assert!(matches!(cursor.err(), Some(Error::Cancelled)));
    assert!(cursor.get_ref().unwrap().is_closed());
}
