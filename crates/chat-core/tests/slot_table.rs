// crates/chat-core/tests/slot_table.rs
use chat_core::{SlotTable, NULL_ID};

#[test]
fn allocates_lowest_free_slot_first() {
    let mut table = SlotTable::new(4);

    assert_eq!(table.allocate("a"), Ok(0));
    assert_eq!(table.allocate("b"), Ok(1));
    assert_eq!(table.allocate("c"), Ok(2));
    assert_eq!(table.len(), 3);

    assert_eq!(table.release(1), Some("b"));
    assert_eq!(table.len(), 2);

    // Vacated slot 1 is reused before the never-used slot 3.
    assert_eq!(table.allocate("d"), Ok(1));
    assert_eq!(table.allocate("e"), Ok(3));
}

#[test]
fn full_table_hands_the_handle_back() {
    let mut table = SlotTable::new(2);
    table.allocate(10).unwrap();
    table.allocate(11).unwrap();

    assert!(table.is_full());
    assert_eq!(table.allocate(12), Err(12));
    assert_eq!(table.len(), 2);
}

#[test]
fn release_of_empty_or_out_of_range_slot_is_a_no_op() {
    let mut table = SlotTable::new(3);
    table.allocate(()).unwrap();

    assert_eq!(table.release(2), None);
    assert_eq!(table.release(NULL_ID), None);
    assert_eq!(table.release(99), None);
    assert_eq!(table.len(), 1);
}

#[test]
fn list_is_comma_joined_without_trailing_delimiter() {
    let mut table = SlotTable::new(6);
    for h in 0..4 {
        table.allocate(h).unwrap();
    }
    table.release(1);

    assert_eq!(table.list(), "0,2,3");
    assert_eq!(table.list_except(2), "0,3");
}

#[test]
fn empty_roster_lists_as_empty_string() {
    let mut table: SlotTable<u8> = SlotTable::new(3);
    assert_eq!(table.list(), "");

    table.allocate(7).unwrap();
    assert_eq!(table.list_except(0), "");
}

#[test]
fn others_skips_the_given_id() {
    let mut table = SlotTable::new(3);
    table.allocate('x').unwrap();
    table.allocate('y').unwrap();
    table.allocate('z').unwrap();

    assert_eq!(table.others(1), vec![(0, 'x'), (2, 'z')]);
    assert_eq!(table.others(NULL_ID).len(), 3);
}

#[test]
fn lookups_reject_out_of_range_ids() {
    let mut table = SlotTable::new(2);
    table.allocate("only").unwrap();

    assert!(table.is_active(0));
    assert!(!table.is_active(1));
    assert!(!table.is_active(-5));
    assert!(!table.is_active(2));
    assert_eq!(table.get(0), Some(&"only"));
}
