//! Subject-based merging of thread roots.

use std::collections::HashMap;

use chrono::{TimeZone, Utc};
use loread::{thread, ContainerId, Forest, MessageId, ParsedArticle};

fn article(id: &str, refs: &[&str], subject: &str, day: u32) -> ParsedArticle {
    ParsedArticle {
        id: MessageId::new(id),
        subject: subject.to_string(),
        references: refs.iter().map(|r| MessageId::new(*r)).collect(),
        other_headers: HashMap::new(),
        body: String::new(),
        date: Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
    }
}

fn child_ids(forest: &Forest, of: ContainerId) -> Vec<String> {
    let mut out = Vec::new();
    let mut cursor = forest.get(of).child;
    while let Some(current) = cursor {
        out.push(forest.get(current).id.to_string());
        cursor = forest.get(current).next;
    }
    out
}

#[test]
fn test_two_real_roots_bind_under_new_phantom() {
    let forest = thread(vec![
        article("<h1@x>", &[], "Hello", 1),
        article("<h2@x>", &[], "Hello", 2),
    ]);

    assert_eq!(forest.roots().len(), 1);
    let top = forest.roots()[0];
    assert!(forest.get(top).is_phantom());
    assert!(forest.get(top).id.is_empty());
    assert_eq!(child_ids(&forest, top), vec!["<h1@x>", "<h2@x>"]);
    assert_eq!(forest.article_count(), 2);
}

#[test]
fn test_follow_up_nests_under_original() {
    let forest = thread(vec![
        article("<fu@x>", &[], "Re: Hello", 1),
        article("<orig@x>", &[], "Hello", 2),
    ]);

    assert_eq!(forest.roots().len(), 1);
    let top = forest.roots()[0];
    assert_eq!(forest.get(top).id, MessageId::new("<orig@x>"));
    assert_eq!(child_ids(&forest, top), vec!["<fu@x>"]);
}

#[test]
fn test_aw_prefix_counts_as_follow_up() {
    let forest = thread(vec![
        article("<orig@x>", &[], "Hallo", 1),
        article("<fu@x>", &[], "Aw: Hallo", 2),
    ]);

    assert_eq!(forest.roots().len(), 1);
    let top = forest.roots()[0];
    assert_eq!(forest.get(top).id, MessageId::new("<orig@x>"));
    assert_eq!(child_ids(&forest, top), vec!["<fu@x>"]);
}

#[test]
fn test_stacked_prefixes_normalise_together() {
    let forest = thread(vec![
        article("<orig@x>", &[], "Hallo", 1),
        article("<fu@x>", &[], "Re: AW: re: Hallo", 2),
    ]);

    assert_eq!(forest.roots().len(), 1);
    assert_eq!(
        forest.get(forest.roots()[0]).id,
        MessageId::new("<orig@x>"),
    );
}

#[test]
fn test_real_root_files_under_phantom_with_same_subject() {
    // the phantom's subject comes from its first child
    let forest = thread(vec![
        article("<r1@x>", &["<gone@x>"], "Re: Lost", 1),
        article("<r2@x>", &["<gone@x>"], "Re: Lost", 2),
        article("<solo@x>", &[], "Lost", 3),
    ]);

    // the phantom <gone@x> hosts r1 and r2; solo files underneath it
    assert_eq!(forest.roots().len(), 1);
    let top = forest.roots()[0];
    assert!(forest.get(top).is_phantom());
    assert_eq!(forest.get(top).id, MessageId::new("<gone@x>"));
    assert_eq!(
        child_ids(&forest, top),
        vec!["<r1@x>", "<r2@x>", "<solo@x>"],
    );
}

#[test]
fn test_two_phantoms_fold_together() {
    let forest = thread(vec![
        article("<a1@x>", &["<gone1@x>"], "Re: Lost", 1),
        article("<a2@x>", &["<gone1@x>"], "Re: Lost", 2),
        article("<b1@x>", &["<gone2@x>"], "Re: Lost", 3),
        article("<b2@x>", &["<gone2@x>"], "Re: Lost", 4),
    ]);

    // both phantom roots normalise to "Lost"; one absorbs the other's
    // children
    assert_eq!(forest.roots().len(), 1);
    let top = forest.roots()[0];
    assert!(forest.get(top).is_phantom());
    assert_eq!(
        child_ids(&forest, top),
        vec!["<a1@x>", "<a2@x>", "<b1@x>", "<b2@x>"],
    );
    assert_eq!(forest.article_count(), 4);
}

#[test]
fn test_different_subjects_stay_separate() {
    let forest = thread(vec![
        article("<a@x>", &[], "Apples", 1),
        article("<b@x>", &[], "Oranges", 2),
    ]);

    assert_eq!(forest.roots().len(), 2);
}

#[test]
fn test_empty_subjects_never_merge() {
    let forest = thread(vec![
        article("<a@x>", &[], "", 1),
        article("<b@x>", &[], "", 2),
        article("<c@x>", &[], "Re: ", 3),
    ]);

    // nothing to normalise, nothing to merge
    assert_eq!(forest.roots().len(), 3);
}

#[test]
fn test_merge_does_not_break_reference_threads() {
    // a complete reference thread plus a stray same-subject root
    let forest = thread(vec![
        article("<a@x>", &[], "Topic", 1),
        article("<b@x>", &["<a@x>"], "Re: Topic", 2),
        article("<stray@x>", &[], "Re: Topic", 3),
    ]);

    assert_eq!(forest.roots().len(), 1);
    let top = forest.roots()[0];
    assert_eq!(forest.get(top).id, MessageId::new("<a@x>"));
    // b stays below a; stray joins as another child of a
    assert_eq!(child_ids(&forest, top), vec!["<b@x>", "<stray@x>"]);
}
