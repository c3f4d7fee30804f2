//! Header parsing tests: unfolding, canonical case, reference merging
//! and the date layouts.

use chrono::{DateTime, Datelike, Timelike};
use loread::{parse_article, parse_article_with, MessageId, ParseError, ParseOptions};

#[test]
fn test_headers_canonical_case() {
    let raw = b"from: alice@example.com\n\
                CONTENT-TYPE: text/plain\n\
                x-no-archive: yes\n\
                \n\
                body";
    let article = parse_article(raw).unwrap();

    assert_eq!(article.header("From"), Some("alice@example.com"));
    assert!(article.other_headers.contains_key("Content-Type"));
    assert!(article.other_headers.contains_key("X-No-Archive"));
    assert!(!article.other_headers.contains_key("from"));
}

#[test]
fn test_headers_folded_references() {
    // continuation lines start with a space or a tab
    let raw = b"Message-Id: <d@x>\n\
                References: <a@x>\n\
                \x20<b@x>\n\
                \t<c@x>\n\
                \n\
                body";
    let article = parse_article(raw).unwrap();

    assert_eq!(
        article.references,
        vec![
            MessageId::new("<a@x>"),
            MessageId::new("<b@x>"),
            MessageId::new("<c@x>"),
        ],
    );
}

#[test]
fn test_headers_duplicate_last_writer_wins() {
    let raw = b"Subject: first\n\
                Subject: second\n\
                \n\
                body";
    let article = parse_article(raw).unwrap();
    assert_eq!(article.subject, "second");
}

#[test]
fn test_headers_malformed_line_lenient_vs_strict() {
    let raw = b"this line has no separator\n\
                From: alice@example.com\n\
                \n\
                body";

    let article = parse_article(raw).unwrap();
    assert_eq!(article.header("From"), Some("alice@example.com"));

    let err = parse_article_with(raw, ParseOptions::strict()).unwrap_err();
    assert!(matches!(err, ParseError::MalformedHeader(_)));
}

#[test]
fn test_message_id_round_trip() {
    let raw = b"Message-Id: <exact.id+tag@news.example.com>\n\
                Subject: hi\n\
                \n\
                body";
    let article = parse_article(raw).unwrap();
    assert_eq!(article.id.as_str(), "<exact.id+tag@news.example.com>");
    assert!(article.id.looks_like_message_id());
}

#[test]
fn test_missing_message_id_yields_empty_id() {
    let article = parse_article(b"Subject: hi\n\nbody").unwrap();
    assert!(article.id.is_empty());
    assert!(!article.id.looks_like_message_id());
}

#[test]
fn test_references_with_in_reply_to_prose() {
    // In-Reply-To often carries prose; only the first token that looks
    // like a message-id joins the chain when References is present
    let raw = b"Message-Id: <c@x>\n\
                References: <a@x> <b@x>\n\
                In-Reply-To: your message <b@x> from yesterday\n\
                \n\
                body";
    let article = parse_article(raw).unwrap();
    assert_eq!(
        article.references,
        vec![
            MessageId::new("<a@x>"),
            MessageId::new("<b@x>"),
            MessageId::new("<b@x>"),
        ],
    );
    assert!(!article.other_headers.contains_key("References"));
    assert!(!article.other_headers.contains_key("In-Reply-To"));
}

#[test]
fn test_date_layout_catalogue() {
    let layouts: &[&str] = &[
        "Mon, 2 Jan 2006 15:04:05 -0700 (MST)",
        "Mon, 2 Jan 2006 15:04:05 -0700",
        "Mon, 2 Jan 2006 15:04:05 MST",
        "Mon, 2 Jan 2006 15:04:05 -0700 (MST-07:00)",
        "2 Jan 2006 15:04:05 -0700",
        "2 Jan 2006 15:04:05 MST",
        "Mon, 2 Jan 2006 15:04 -0700",
    ];

    for layout in layouts {
        let raw = format!("Subject: hi\nDate: {layout}\n\nbody");
        let article = parse_article(raw.as_bytes()).unwrap();
        assert_eq!(article.date.year(), 2006, "layout failed: {layout}");
        assert_eq!(article.date.hour(), 22, "layout failed: {layout}");
    }
}

#[test]
fn test_unparseable_date_is_epoch() {
    let article = parse_article(b"Subject: hi\nDate: the day after tomorrow\n\nbody").unwrap();
    assert_eq!(article.date, DateTime::UNIX_EPOCH);

    let article = parse_article(b"Subject: hi\n\nbody").unwrap();
    assert_eq!(article.date, DateTime::UNIX_EPOCH);
}
