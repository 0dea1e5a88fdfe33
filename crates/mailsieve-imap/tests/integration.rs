//! Client conversations against scripted servers.

#![allow(clippy::unwrap_used)]

use mailsieve_imap::{
    Client, Error, FetchItems, SearchCriteria, SeqNum, SequenceSet, StoreAction,
};
use tokio_test::io::Builder;

const GREETING: &[u8] = b"* OK [CAPABILITY IMAP4rev1 AUTH=PLAIN] server ready\r\n";

fn seq(n: u32) -> SeqNum {
    SeqNum::new(n).unwrap()
}

#[tokio::test]
async fn full_pruning_session() {
    let message = b"From: Ann <ann@example.com>\r\nSubject: hi\r\n\r\nbody\r\n";
    let mut fetch_reply = format!("* 1 FETCH (RFC822 {{{}}}\r\n", message.len()).into_bytes();
    fetch_reply.extend_from_slice(message);
    fetch_reply.extend_from_slice(b")\r\nA0003 OK FETCH completed\r\n");

    let mock = Builder::new()
        .read(GREETING)
        .write(b"A0000 LOGIN jane secret\r\n")
        .read(b"A0000 OK LOGIN completed\r\n")
        .write(b"A0001 SELECT INBOX\r\n")
        .read(b"* 2 EXISTS\r\n* 0 RECENT\r\n* OK [UIDVALIDITY 7] ok\r\n")
        .read(b"A0001 OK [READ-WRITE] SELECT completed\r\n")
        .write(b"A0002 SEARCH ALL\r\n")
        .read(b"* SEARCH 1 2\r\nA0002 OK SEARCH completed\r\n")
        .write(b"A0003 FETCH 1 RFC822\r\n")
        .read(&fetch_reply)
        .write(b"A0004 STORE 2 +FLAGS.SILENT (\\Deleted)\r\n")
        .read(b"A0004 OK STORE completed\r\n")
        .write(b"A0005 EXPUNGE\r\n")
        .read(b"* 2 EXPUNGE\r\nA0005 OK EXPUNGE completed\r\n")
        .write(b"A0006 CLOSE\r\n")
        .read(b"A0006 OK CLOSE completed\r\n")
        .write(b"A0007 LOGOUT\r\n")
        .read(b"* BYE logging out\r\nA0007 OK LOGOUT completed\r\n")
        .build();

    let client = Client::from_stream(mock).await.unwrap();
    assert_eq!(client.capabilities().len(), 2);

    let client = client.login("jane", "secret").await.unwrap();
    let (mut client, status) = client.select("INBOX").await.unwrap();
    assert_eq!(status.exists, 2);
    assert_eq!(status.uid_validity, Some(7));
    assert_eq!(client.mailbox(), "INBOX");

    let ids = client.search(&SearchCriteria::All).await.unwrap();
    assert_eq!(ids, vec![seq(1), seq(2)]);

    let fetched = client
        .fetch(&SequenceSet::Single(seq(1)), FetchItems::Rfc822)
        .await
        .unwrap();
    assert_eq!(fetched.len(), 1);
    assert_eq!(fetched[0].0, seq(1));
    let body = fetched[0].1.iter().find_map(|item| item.full_message()).unwrap();
    assert_eq!(body, message);

    client
        .store(&SequenceSet::Single(seq(2)), StoreAction::mark_deleted())
        .await
        .unwrap();
    let expunged = client.expunge().await.unwrap();
    assert_eq!(expunged, vec![seq(2)]);
    assert_eq!(client.status().exists, 1);

    let client = client.close().await.unwrap();
    client.logout().await.unwrap();
}

#[tokio::test]
async fn non_ascii_password_is_sent_as_literal() {
    let mock = Builder::new()
        .read(GREETING)
        .write(b"A0000 LOGIN jane {9}\r\n")
        .read(b"+ Ready for literal data\r\n")
        .write("pässword\r\n".as_bytes())
        .read(b"A0000 OK LOGIN completed\r\n")
        .build();

    let client = Client::from_stream(mock).await.unwrap();
    client.login("jane", "pässword").await.unwrap();
}

#[tokio::test]
async fn literal_refused_before_continuation() {
    let mock = Builder::new()
        .read(GREETING)
        .write(b"A0000 LOGIN jane {9}\r\n")
        .read(b"A0000 NO literal too big\r\n")
        .build();

    let client = Client::from_stream(mock).await.unwrap();
    let err = client.login("jane", "pässword").await.unwrap_err();
    assert!(matches!(err, Error::No(text) if text == "literal too big"));
}

#[tokio::test]
async fn failed_login_reports_no() {
    let mock = Builder::new()
        .read(GREETING)
        .write(b"A0000 LOGIN jane wrong\r\n")
        .read(b"A0000 NO [AUTHENTICATIONFAILED] Invalid credentials\r\n")
        .build();

    let client = Client::from_stream(mock).await.unwrap();
    let err = client.login("jane", "wrong").await.unwrap_err();
    assert!(err.is_refusal());
}

#[tokio::test]
async fn refused_select_returns_client_for_logout() {
    let mock = Builder::new()
        .read(GREETING)
        .write(b"A0000 LOGIN jane secret\r\n")
        .read(b"A0000 OK done\r\n")
        .write(b"A0001 SELECT Nowhere\r\n")
        .read(b"A0001 NO [NONEXISTENT] Unknown mailbox\r\n")
        .write(b"A0002 LOGOUT\r\n")
        .read(b"* BYE\r\nA0002 OK\r\n")
        .build();

    let client = Client::from_stream(mock).await.unwrap();
    let client = client.login("jane", "secret").await.unwrap();
    let rejected = client.select("Nowhere").await.unwrap_err();
    assert!(matches!(rejected.error, Error::No(_)));
    rejected.client.logout().await.unwrap();
}

#[tokio::test]
async fn quoted_mailbox_name() {
    let mock = Builder::new()
        .read(GREETING)
        .write(b"A0000 LOGIN jane secret\r\n")
        .read(b"A0000 OK done\r\n")
        .write(b"A0001 SELECT \"Old Mail\"\r\n")
        .read(b"* 0 EXISTS\r\nA0001 OK [READ-WRITE] done\r\n")
        .build();

    let client = Client::from_stream(mock).await.unwrap();
    let client = client.login("jane", "secret").await.unwrap();
    let (_client, status) = client.select("Old Mail").await.unwrap();
    assert!(status.is_empty());
}

#[tokio::test]
async fn bye_then_hangup_surfaces_as_bye() {
    let mock = Builder::new()
        .read(GREETING)
        .write(b"A0000 LOGIN jane secret\r\n")
        .read(b"A0000 OK done\r\n")
        .write(b"A0001 SELECT INBOX\r\n")
        .read(b"* 1 EXISTS\r\nA0001 OK done\r\n")
        .write(b"A0002 SEARCH ALL\r\n")
        .read(b"* BYE server shutting down\r\n")
        .build();

    let client = Client::from_stream(mock).await.unwrap();
    let client = client.login("jane", "secret").await.unwrap();
    let (mut client, _) = client.select("INBOX").await.unwrap();
    let err = client.search(&SearchCriteria::All).await.unwrap_err();
    assert!(matches!(err, Error::Bye(text) if text == "server shutting down"));
}

#[tokio::test]
async fn bye_greeting_is_an_error() {
    let mock = Builder::new().read(b"* BYE too many connections\r\n").build();
    let err = Client::from_stream(mock).await.unwrap_err();
    assert!(matches!(err, Error::Bye(_)));
}

#[tokio::test]
async fn logout_tolerates_hangup_after_bye() {
    let mock = Builder::new()
        .read(GREETING)
        .write(b"A0000 LOGOUT\r\n")
        .read(b"* BYE see you\r\n")
        .build();

    let client = Client::from_stream(mock).await.unwrap();
    client.logout().await.unwrap();
}
