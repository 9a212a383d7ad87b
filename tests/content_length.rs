use stomp_wire::{Parser, ProtocolError, format};

// ===== Binary-safe bodies =====

#[test]
fn body_with_embedded_nul_parses_intact() {
    let mut parser = Parser::new();
    parser
        .receive(b"SEND\ncontent-length:3\n\na\0b\0")
        .expect("valid frame");
    let frame = parser.next().expect("one frame");
    assert_eq!(frame.body.as_deref(), Some(&b"a\0b"[..]));
    assert!(!parser.can_read());
}

#[test]
fn all_nul_body() {
    let mut parser = Parser::new();
    parser
        .receive(b"SEND\ncontent-length:4\n\n\0\0\0\0\0")
        .expect("valid frame");
    let frame = parser.next().expect("one frame");
    assert_eq!(frame.body.as_deref(), Some(&[0u8, 0, 0, 0][..]));
}

// The embedded NUL arrives before the body end is in the buffer: the parser
// must note the announced end and wait rather than mis-terminate.
#[test]
fn announced_body_end_is_waited_for() {
    let mut parser = Parser::new();
    parser
        .receive(b"SEND\ncontent-length:8\n\nab\0")
        .expect("incomplete body is not an error");
    assert!(!parser.can_read());

    parser.receive(b"cdefg").expect("still incomplete");
    assert!(!parser.can_read());

    // the real terminator
    parser.receive(b"\0").expect("now complete");
    let frame = parser.next().expect("one frame");
    assert_eq!(frame.body.as_deref(), Some(&b"ab\0cdefg"[..]));
}

#[test]
fn formatter_output_with_binary_body_round_trips() {
    let payload = b"a\0b";
    let raw = format::send("/queue/bin", payload, &[]);

    let mut parser = Parser::new();
    parser.receive(&raw).expect("valid frame");
    let frame = parser.next().expect("one frame");
    assert_eq!(frame.get_header("content-length"), Some("3"));
    assert_eq!(frame.body.as_deref(), Some(&payload[..]));
}

// ===== content-length interpretation =====

#[test]
fn length_matching_the_nul_terminator() {
    let mut parser = Parser::new();
    parser
        .receive(b"SEND\ncontent-length:4\n\ndave\0")
        .expect("valid frame");
    let frame = parser.next().expect("one frame");
    assert_eq!(frame.body.as_deref(), Some(&b"dave"[..]));
}

#[test]
fn zero_length_means_nul_delimited() {
    // 0 is "unknown": the body still runs to the NUL
    let mut parser = Parser::new();
    parser
        .receive(b"SEND\ncontent-length:0\n\nhi\0")
        .expect("valid frame");
    let frame = parser.next().expect("one frame");
    assert_eq!(frame.body.as_deref(), Some(&b"hi"[..]));
}

#[test]
fn header_name_is_case_insensitive_and_value_trimmed() {
    let mut parser = Parser::new();
    parser
        .receive(b"SEND\nContent-Length: 3 \n\na\0b\0")
        .expect("valid frame");
    let frame = parser.next().expect("one frame");
    assert_eq!(frame.body.as_deref(), Some(&b"a\0b"[..]));
}

#[test]
fn large_body_in_chunks() {
    let body = b"dave".repeat(2000);
    let mut raw = Vec::new();
    raw.extend_from_slice(b"SEND\ncontent-length:8000\n\n");
    raw.extend_from_slice(&body);
    raw.push(0);

    let mut parser = Parser::new();
    for chunk in raw.chunks(150) {
        parser.receive(chunk).expect("receive failed");
    }
    let frame = parser.next().expect("one frame");
    assert_eq!(frame.body.as_deref(), Some(&body[..]));
}

// ===== Violations =====

#[test]
fn unparsable_content_length_is_rejected() {
    let mut parser = Parser::new();
    let err = parser
        .receive(b"SEND\ncontent-length:abc\n\nbody\0")
        .expect_err("non-numeric length");
    assert!(matches!(err, ProtocolError::InvalidContentLength(v) if v == "abc"));
}

#[test]
fn empty_content_length_is_rejected() {
    let mut parser = Parser::new();
    let err = parser
        .receive(b"SEND\ncontent-length:\n\nbody\0")
        .expect_err("empty length");
    assert!(matches!(err, ProtocolError::InvalidContentLength(_)));
}

#[test]
fn terminator_must_sit_at_the_announced_end() {
    // announced length 3, but the byte after "abc" is 'd', not NUL
    let mut parser = Parser::new();
    let err = parser
        .receive(b"SEND\ncontent-length:3\n\nabcd\0")
        .expect_err("length and terminator disagree");
    assert!(matches!(err, ProtocolError::MissingNulTerminator));
}

#[test]
fn length_landing_on_an_embedded_nul_terminates_there() {
    // announced end coincides with the first NUL: that NUL is the
    // terminator and the bytes after it belong to the next frame
    let mut parser = Parser::new();
    parser
        .receive(b"SEND\ncontent-length:2\n\nab\0SEND\n\nnext\0")
        .expect("valid frames");
    let first = parser.next().expect("first frame");
    assert_eq!(first.body.as_deref(), Some(&b"ab"[..]));
    let second = parser.next().expect("second frame");
    assert_eq!(second.body.as_deref(), Some(&b"next"[..]));
}

#[test]
fn length_past_an_embedded_nul_must_still_land_on_nul() {
    // announced length 3 covers the embedded NUL, but the byte at the
    // announced end is 'c'
    let mut parser = Parser::new();
    let err = parser
        .receive(b"SEND\ncontent-length:3\n\nab\0c\0")
        .expect_err("length points at a non-NUL byte");
    assert!(matches!(err, ProtocolError::MissingNulTerminator));
}
