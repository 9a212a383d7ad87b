use bytes::Bytes;
use stomp_wire::Frame;

fn sample() -> Frame {
    Frame {
        command: "MESSAGE".to_string(),
        headers: vec![
            ("destination".to_string(), "/queue/a".to_string()),
            ("message-id".to_string(), "m-1".to_string()),
        ],
        body: Some(Bytes::from_static(b"hello")),
    }
}

// ===== Header access =====

#[test]
fn get_header_returns_first_match() {
    let frame = sample();
    assert_eq!(frame.get_header("destination"), Some("/queue/a"));
    assert_eq!(frame.get_header("message-id"), Some("m-1"));
}

#[test]
fn get_header_is_case_sensitive_and_total() {
    let frame = sample();
    assert_eq!(frame.get_header("Destination"), None);
    assert_eq!(frame.get_header("missing"), None);
}

// ===== Body access =====

#[test]
fn body_str_for_utf8_bodies() {
    let frame = sample();
    assert_eq!(frame.body_str(), Some("hello"));
}

#[test]
fn body_str_is_none_for_binary_or_absent_bodies() {
    let mut frame = sample();
    frame.body = Some(Bytes::from_static(&[0xff, 0xfe]));
    assert_eq!(frame.body_str(), None);
    frame.body = None;
    assert_eq!(frame.body_str(), None);
}

// ===== Display =====

#[test]
fn display_lists_command_headers_and_body_size() {
    let text = sample().to_string();
    assert!(text.contains("Command: MESSAGE"));
    assert!(text.contains("destination: /queue/a"));
    assert!(text.contains("Body (5 bytes)"));
}

#[test]
fn display_omits_the_body_line_when_there_is_none() {
    let mut frame = sample();
    frame.body = None;
    let text = frame.to_string();
    assert!(!text.contains("Body ("));
}
