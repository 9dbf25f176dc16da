use lettre::address::Envelope;
use mailparse::{DispositionType, MailHeaderMap};
use std::fs;

use mailbox_lib::{
    send_message, send_message_with, sender, Credentials, Message, Sender,
};

#[derive(Debug, Default)]
struct RecordingSender {
    calls: Vec<(Option<String>, Vec<String>, Vec<u8>)>,
}

impl Sender for RecordingSender {
    fn send(
        &mut self,
        _creds: &Credentials,
        envelope: &Envelope,
        payload: &[u8],
    ) -> sender::Result<()> {
        self.calls.push((
            envelope.from().map(ToString::to_string),
            envelope.to().iter().map(ToString::to_string).collect(),
            payload.to_vec(),
        ));
        Ok(())
    }
}

fn creds() -> Credentials {
    let mut creds = Credentials::new("localhost:3025");
    creds.set_plain_auth("alice@localhost", "password");
    creds
}

fn message() -> Message {
    let mut msg = Message::new();
    msg.from("Alice", "alice@x.com")
        .to("Bob", "bob@x.com")
        .subject("Hi")
        .body("hello");
    msg
}

#[test]
fn test_send_plain_message() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut sender = RecordingSender::default();
    let payload = send_message_with(&mut sender, Some(&creds()), Some(&message())).unwrap();

    assert_eq!(1, sender.calls.len());
    let (from, to, sent) = &sender.calls[0];
    assert_eq!(&Some("alice@x.com".to_owned()), from);
    assert_eq!(&vec!["bob@x.com".to_owned()], to);
    assert_eq!(&payload, sent);

    let raw = String::from_utf8(payload.clone()).unwrap();
    assert!(raw.starts_with(concat!(
        "From: \"Alice\" <alice@x.com>\r\n",
        "To: \"Bob\" <bob@x.com>\r\n",
        "Subject: Hi\r\n",
        "MIME-Version: 1.0\r\n",
    )));
    assert!(!raw.contains("--mailbox_"));
    assert!(!raw.contains("multipart"));
    assert_eq!(1, raw.matches("Content-Type: text/plain").count());

    let email = mailparse::parse_mail(&payload).unwrap();
    assert_eq!("text/plain", email.ctype.mimetype);
    assert_eq!("utf-8", email.ctype.charset);
    assert!(email.subparts.is_empty());
    assert_eq!("hello", email.get_body().unwrap());
}

#[test]
fn test_send_message_with_attachments() {
    let dir = tempfile::tempdir().unwrap();

    let report = dir.path().join("report.txt");
    fs::write(&report, "quarterly numbers\n").unwrap();

    let binary: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
    let image = dir.path().join("image.bin");
    fs::write(&image, &binary).unwrap();

    let mut msg = message();
    msg.body("See attached: ünïcødé");
    msg.attach(&report).unwrap().attach(&image).unwrap();

    let mut sender = RecordingSender::default();
    let payload = send_message_with(&mut sender, Some(&creds()), Some(&msg)).unwrap();

    let raw = String::from_utf8(payload.clone()).unwrap();
    assert_eq!(3, raw.matches("Content-Transfer-Encoding: base64").count());

    let email = mailparse::parse_mail(&payload).unwrap();
    assert_eq!("multipart/mixed", email.ctype.mimetype);
    let boundary = email.ctype.params.get("boundary").unwrap();
    assert!(boundary.starts_with("mailbox_"));
    assert_eq!(1, raw.matches(&format!("--{}--", boundary)).count());

    assert_eq!(3, email.subparts.len());

    let text = &email.subparts[0];
    assert_eq!("text/plain", text.ctype.mimetype);
    assert_eq!("See attached: ünïcødé", text.get_body().unwrap());

    let expected = [
        ("report.txt", b"quarterly numbers\n".to_vec()),
        ("image.bin", binary),
    ];
    for (part, (filename, content)) in email.subparts[1..].iter().zip(expected.iter()) {
        assert_eq!("application/octet-stream", part.ctype.mimetype);
        let disposition = part.get_content_disposition();
        assert_eq!(DispositionType::Attachment, disposition.disposition);
        assert_eq!(Some(&filename.to_string()), disposition.params.get("filename"));
        assert_eq!(content, &part.get_body_raw().unwrap());
    }
}

#[test]
fn test_send_keeps_recipients_order() {
    let mut msg = message();
    msg.to("A", "a@x.com").to("B", "b@x.com");

    let mut sender = RecordingSender::default();
    let payload = send_message_with(&mut sender, Some(&creds()), Some(&msg)).unwrap();

    let raw = String::from_utf8(payload).unwrap();
    assert!(raw.contains("To: \"Bob\" <bob@x.com>,\"A\" <a@x.com>,\"B\" <b@x.com>\r\n"));

    let (_, to, _) = &sender.calls[0];
    assert_eq!(&vec!["bob@x.com", "a@x.com", "b@x.com"], to);
}

#[test]
fn test_send_without_credentials_or_message() {
    let mut sender = RecordingSender::default();

    let err = send_message_with(&mut sender, None, Some(&message())).unwrap_err();
    assert!(matches!(err, sender::Error::MissingCredentialsError));
    assert!(err.is_invalid_argument());
    assert_eq!(
        "cannot send message: credentials must not be nil",
        err.to_string()
    );

    let err = send_message_with(&mut sender, Some(&creds()), None).unwrap_err();
    assert!(matches!(err, sender::Error::MissingMessageError));
    assert!(err.is_invalid_argument());

    assert!(sender.calls.is_empty());

    // the smtp entry point fails the same way, without connecting
    assert!(matches!(
        send_message(None, Some(&message())),
        Err(sender::Error::MissingCredentialsError)
    ));
    assert!(matches!(
        send_message(Some(&creds()), None),
        Err(sender::Error::MissingMessageError)
    ));
}

#[test]
fn test_send_rejects_header_injection() {
    let mut msg = message();
    msg.subject("Hi\r\nBcc: eve@x.com");

    let mut sender = RecordingSender::default();
    let err = send_message_with(&mut sender, Some(&creds()), Some(&msg)).unwrap_err();

    assert!(err.is_invalid_argument());
    assert!(sender.calls.is_empty());
}

#[test]
fn test_failed_attach_then_send() {
    let dir = tempfile::tempdir().unwrap();
    let mut msg = message();

    assert!(msg.attach(dir.path().join("missing.txt")).is_err());
    assert!(msg.attachments().is_empty());

    let path = dir.path().join("notes.txt");
    fs::write(&path, "notes").unwrap();
    msg.attach(&path).unwrap();

    let mut sender = RecordingSender::default();
    let payload = send_message_with(&mut sender, Some(&creds()), Some(&msg)).unwrap();

    let email = mailparse::parse_mail(&payload).unwrap();
    assert_eq!(2, email.subparts.len());
    assert_eq!(b"notes".to_vec(), email.subparts[1].get_body_raw().unwrap());
}

#[test]
fn test_boundaries_differ_between_messages() {
    let mut msg = message();
    msg.attach_bytes("a.txt", "a");

    let mut sender = RecordingSender::default();
    let first = send_message_with(&mut sender, Some(&creds()), Some(&msg)).unwrap();
    let second = send_message_with(&mut sender, Some(&creds()), Some(&msg)).unwrap();

    let boundary = |payload: &[u8]| {
        mailparse::parse_mail(payload)
            .unwrap()
            .ctype
            .params
            .get("boundary")
            .cloned()
            .unwrap()
    };
    assert_ne!(boundary(&first), boundary(&second));
}

#[test]
fn test_non_ascii_headers() {
    let mut msg = message();
    msg.from("Zoë", "zoe@x.com").subject("Café ☕");

    let mut sender = RecordingSender::default();
    let payload = send_message_with(&mut sender, Some(&creds()), Some(&msg)).unwrap();

    let email = mailparse::parse_mail(&payload).unwrap();
    assert_eq!(
        Some("Café ☕".to_owned()),
        email.headers.get_first_value("Subject")
    );
    assert!(email
        .headers
        .get_first_value("From")
        .unwrap()
        .contains("Zoë"));
}
