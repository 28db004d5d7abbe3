use chrono::Utc;
use mailgram::{Disposition, NO_SENDER, NO_SUBJECT, RawMessage};

#[test]
fn test_parse_simple_message() {
    let raw = b"From: John Doe <john@example.com>\r\n\
                To: recipient@example.com\r\n\
                Subject: Test Email\r\n\
                Date: Thu, 01 Jan 2026 12:00:00 +0000\r\n\
                \r\n\
                Hello, this is a test email.";

    let message = RawMessage::parse(7, raw).unwrap();

    assert_eq!(message.uid, 7);
    assert_eq!(message.subject, "Test Email");
    assert_eq!(message.from, "John Doe <john@example.com>");
    assert_eq!(message.parts.len(), 1);
    assert_eq!(message.parts[0].content_type, "text/plain");
    assert_eq!(message.parts[0].disposition, Disposition::Inline);
    assert!(message.parts[0].bytes.starts_with(b"Hello"));
}

#[test]
fn test_missing_headers_use_placeholders() {
    let raw = b"Date: Thu, 01 Jan 2026 12:00:00 +0000\r\n\
                \r\n\
                Body without sender or subject.";

    let message = RawMessage::parse(1, raw).unwrap();

    assert_eq!(message.subject, NO_SUBJECT);
    assert_eq!(message.from, NO_SENDER);
}

#[test]
fn test_date_converted_to_utc() {
    let raw = b"From: a@example.com\r\n\
                Subject: Zoned\r\n\
                Date: Thu, 01 Jan 2026 12:00:00 +0200\r\n\
                \r\n\
                Body";

    let message = RawMessage::parse(1, raw).unwrap();

    assert_eq!(message.date.to_rfc3339(), "2026-01-01T10:00:00+00:00");
}

#[test]
fn test_unparseable_date_falls_back_to_now() {
    let raw = b"From: a@example.com\r\n\
                Subject: Undated\r\n\
                Date: not a date\r\n\
                \r\n\
                Body";

    let message = RawMessage::parse(1, raw).unwrap();
    let age = Utc::now().signed_duration_since(message.date);

    assert!(age.num_seconds().abs() < 60);
}

#[test]
fn test_multipart_flattened_to_leaf_parts() {
    let raw = b"From: a@example.com\r\n\
                Subject: Multi\r\n\
                Date: Thu, 01 Jan 2026 12:00:00 +0000\r\n\
                MIME-Version: 1.0\r\n\
                Content-Type: multipart/mixed; boundary=\"b1\"\r\n\
                \r\n\
                --b1\r\n\
                Content-Type: text/plain; charset=\"utf-8\"\r\n\
                \r\n\
                The body.\r\n\
                --b1\r\n\
                Content-Type: application/octet-stream\r\n\
                Content-Disposition: attachment; filename=\"data.bin\"\r\n\
                \r\n\
                payload\r\n\
                --b1--\r\n";

    let message = RawMessage::parse(1, raw).unwrap();

    assert_eq!(message.parts.len(), 2);
    assert_eq!(message.parts[0].content_type, "text/plain");
    assert_eq!(message.parts[0].charset.as_deref(), Some("utf-8"));
    assert_eq!(message.parts[1].disposition, Disposition::Attachment);
    assert_eq!(message.parts[1].filename.as_deref(), Some("data.bin"));
}

#[test]
fn test_content_type_lowercased() {
    let raw = b"From: a@example.com\r\n\
                Subject: Caps\r\n\
                Date: Thu, 01 Jan 2026 12:00:00 +0000\r\n\
                Content-Type: TEXT/HTML\r\n\
                \r\n\
                <p>Hi</p>";

    let message = RawMessage::parse(1, raw).unwrap();

    assert_eq!(message.parts[0].content_type, "text/html");
}
