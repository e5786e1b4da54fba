//! # Ingestion & Serving Core
//!
//! The protocol decision tree, with transport stripped away. Handlers take
//! a key plus the pieces of the request they actually care about, and
//! return either a typed [`ServiceResponse`] or a typed error. An HTTP
//! adapter turns those into real responses elsewhere; this module never
//! sees a socket, which is what makes it testable without one.
//!
//! ## Request flow
//!
//! Both GET and PUT share a preamble: the test key short-circuits first
//! (it must keep working even after its embedded expiry passes), then key
//! validity, then the deny list. After that the two verbs diverge into
//! their own state machines — see [`BoardService::handle_get`] and
//! [`BoardService::handle_put`].

use std::sync::Arc;

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::board::{self, Board, TimestampError};
use crate::config::{
    self, HEADER_SPRING_SIGNATURE, HEADER_SPRING_VERSION, SPRING_VERSION,
};
use crate::crypto::keys::{BoardKey, BoardKeypair, KeyError};
use crate::crypto::signatures::{decode_signature, SignatureDecodeError};
use crate::denylist::DenyList;
use crate::error::{ServerError, ServiceError};
use crate::store::{BoardStore, StoreError};
use crate::test_board;

/// Body of the index response. The protocol asks for nothing fancier.
pub const INDEX_BODY: &str = "hello";

/// Body of a successful PUT. Stable; clients match on it.
pub const MESSAGE_KEY_UPDATED: &str =
    "Content for the given key has been updated successfully.";

/// HTTP-date, the format of `Last-Modified` and `If-Modified-Since`.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// A transport-agnostic response: status, body, and the headers the
/// protocol defines. The HTTP adapter copies these out verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    pub status: u16,
    pub body: Vec<u8>,
    pub headers: Vec<(&'static str, String)>,
}

/// The ingestion and serving core.
///
/// Dependencies arrive explicitly — store, deny list, clock — rather than
/// through globals, so tests can pin all three.
pub struct BoardService {
    store: Arc<dyn BoardStore>,
    deny_list: Arc<dyn DenyList>,
    test_keypair: BoardKeypair,
    time_now: fn() -> DateTime<Utc>,
}

impl BoardService {
    pub fn new(store: Arc<dyn BoardStore>, deny_list: Arc<dyn DenyList>) -> Self {
        Self {
            store,
            deny_list,
            test_keypair: BoardKeypair::from_seed_hex(config::TEST_PRIVATE_KEY)
                .expect("bundled test private key is valid"),
            time_now: Utc::now,
        }
    }

    /// Replaces the clock. Tests pin time with this; production never calls it.
    pub fn with_time_source(mut self, time_now: fn() -> DateTime<Utc>) -> Self {
        self.time_now = time_now;
        self
    }

    /// `GET /` — proof of life.
    pub fn handle_index(&self) -> ServiceResponse {
        ServiceResponse {
            status: 200,
            body: INDEX_BODY.as_bytes().to_vec(),
            headers: Vec::new(),
        }
    }

    /// `GET /{key}` — serve the key's current board.
    pub async fn handle_get(
        &self,
        key: &str,
        if_modified_since: Option<&str>,
    ) -> Result<ServiceResponse, ServiceError> {
        // The test key bypasses the standard checks entirely: its embedded
        // expiry will pass within a couple of years and it must keep
        // working regardless. Fresh random content per request keeps its
        // timestamp from ever looking stale.
        if key == self.test_keypair.public_hex() {
            let board = self.randomize_test_board().await?;
            return Ok(self.board_response(&board));
        }

        self.check_key(key)?;

        let board = match self.store.get(key).await {
            Ok(board) => board,
            // All not-found shapes funnel into one stable message so they
            // stay indistinguishable from each other.
            Err(StoreError::NotFound) => return Err(not_found(key)),
            Err(err) => {
                return Err(ServiceError::internal(
                    &format!("getting key {key:?} from store"),
                    err,
                ))
            }
        };

        // A board holding nothing but its <time> tag was deleted in the
        // only way the protocol allows. Respond exactly as if it had never
        // existed.
        if board::is_timestamp_only(&board.content) {
            return Err(not_found(key));
        }

        if let Some(raw) = if_modified_since {
            let since = parse_http_date(raw)
                .ok_or_else(|| ServerError::IfModifiedSinceParse(raw.to_owned()))?;

            // Not modified is reported with the not-found body, not a 304:
            // clients treat "no update" and "no board" uniformly.
            if since > board.timestamp {
                return Err(not_found(key));
            }
        }

        Ok(self.board_response(&board))
    }

    /// `PUT /{key}` — accept a new board for the key.
    pub async fn handle_put(
        &self,
        key: &str,
        signature: Option<&str>,
        content: &[u8],
    ) -> Result<ServiceResponse, ServiceError> {
        if key == self.test_keypair.public_hex() {
            return Err(ServerError::TestKey.into());
        }

        let board_key = self.check_key(key)?;

        if content.len() > config::MAX_CONTENT_SIZE {
            return Err(ServerError::ContentTooLarge.into());
        }

        let sig_hex = match signature {
            None | Some("") => return Err(ServerError::SignatureMissing.into()),
            Some(s) => s,
        };
        let sig = decode_signature(sig_hex).map_err(|err| match err {
            SignatureDecodeError::Unparseable => ServerError::SignatureUnparseable,
            SignatureDecodeError::BadLength => ServerError::SignatureBadLength,
        })?;

        // Verify before touching the content: the signature check is a
        // fixed-cost barrier in front of every scan that follows, and an
        // unsigned flood shouldn't get to spend our regex time.
        if !board_key.verify(content, &sig) {
            return Err(ServerError::SignatureInvalid.into());
        }

        let timestamp = board::parse_content_timestamp(content).map_err(|err| match err {
            TimestampError::Missing => ServerError::TimestampMissing,
            TimestampError::Unparseable => ServerError::TimestampUnparseable,
        })?;

        let now = (self.time_now)();
        if timestamp - config::timestamp_tolerance() > now {
            return Err(ServerError::TimestampInFuture.into());
        }
        if timestamp + config::timestamp_tolerance() < now - config::max_content_age() {
            return Err(ServerError::TimestampTooOld.into());
        }

        // A board with a newer timestamp already registered wins; the
        // submitted one is stale and the author should know.
        match self.store.get(key).await {
            Ok(current) if current.timestamp > timestamp => {
                return Err(ServerError::TimestampOlderThanCurrent.into());
            }
            Ok(_) | Err(StoreError::NotFound) => {}
            Err(err) => {
                return Err(ServiceError::internal(
                    &format!("getting current board for key {key:?}"),
                    err,
                ))
            }
        }

        let board = Board {
            content: content.to_vec(),
            signature: sig_hex.to_owned(),
            timestamp,
        };
        self.store
            .put(key, board)
            .await
            .map_err(|err| ServiceError::internal(&format!("storing board for key {key:?}"), err))?;

        Ok(ServiceResponse {
            status: 200,
            body: MESSAGE_KEY_UPDATED.as_bytes().to_vec(),
            headers: vec![(HEADER_SPRING_VERSION, SPRING_VERSION.to_owned())],
        })
    }

    /// Shared preamble: key validity, then the deny list. Each of the three
    /// validity failures maps to its own 403 so authors can tell whether to
    /// fix their key or wait.
    fn check_key(&self, key: &str) -> Result<BoardKey, ServiceError> {
        let parsed = BoardKey::parse(key, (self.time_now)()).map_err(|err| match err {
            KeyError::Expired => ServerError::KeyExpired,
            KeyError::NotYetValid => ServerError::KeyNotYetValid,
            KeyError::Invalid | KeyError::BadSeed => ServerError::KeyInvalid,
        })?;

        if self.deny_list.contains(key) {
            return Err(ServerError::DeniedKey.into());
        }

        Ok(parsed)
    }

    /// Builds, signs, stores, and returns fresh content for the test key.
    /// The write-through keeps the stored copy's timestamp current too.
    async fn randomize_test_board(&self) -> Result<Board, ServiceError> {
        let content = test_board::random_quote();
        let board = Board {
            content: content.as_bytes().to_vec(),
            signature: self.test_keypair.sign_hex(content.as_bytes()),
            timestamp: (self.time_now)(),
        };

        self.store
            .put(self.test_keypair.public_hex(), board.clone())
            .await
            .map_err(|err| ServiceError::internal("storing test board", err))?;

        Ok(board)
    }

    fn board_response(&self, board: &Board) -> ServiceResponse {
        ServiceResponse {
            status: 200,
            body: board.content.clone(),
            headers: vec![
                ("Last-Modified", format_http_date(board.timestamp)),
                (HEADER_SPRING_SIGNATURE, board.signature.clone()),
                (HEADER_SPRING_VERSION, SPRING_VERSION.to_owned()),
            ],
        }
    }
}

fn not_found(key: &str) -> ServiceError {
    ServerError::BoardNotFound(key.to_owned()).into()
}

fn format_http_date(t: DateTime<Utc>) -> String {
    t.format(HTTP_DATE_FORMAT).to_string()
}

fn parse_http_date(s: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(s, HTTP_DATE_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{TEST_PRIVATE_KEY, TEST_PUBLIC_KEY};
    use crate::denylist::MemoryDenyList;
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    const SAMPLE_PRIVATE_KEY: &str =
        "90ba51828ecc30132d4707d55d24456fbd726514cf56ab4668b62392798e2540";
    const SAMPLE_PUBLIC_KEY: &str =
        "e90e9091b13a6e5194c1fed2728d1fdb6de7df362497d877b8c0b8f0883e1124";

    fn stable_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 11, 9, 10, 11, 12).unwrap()
    }

    struct Harness {
        store: Arc<MemoryStore>,
        service: BoardService,
    }

    fn setup() -> Harness {
        setup_with_deny_list(MemoryDenyList::new())
    }

    fn setup_with_deny_list(deny_list: MemoryDenyList) -> Harness {
        let store = Arc::new(MemoryStore::with_time_source(stable_time));
        let service = BoardService::new(
            Arc::clone(&store) as Arc<dyn BoardStore>,
            Arc::new(deny_list),
        )
        .with_time_source(stable_time);
        Harness { store, service }
    }

    /// Signs `content` with `keypair` and stores the result directly,
    /// bypassing the PUT pipeline.
    async fn store_board(
        harness: &Harness,
        keypair: &BoardKeypair,
        timestamp: DateTime<Utc>,
        content: &str,
    ) -> Board {
        let board = Board {
            content: content.as_bytes().to_vec(),
            signature: keypair.sign_hex(content.as_bytes()),
            timestamp,
        };
        harness
            .store
            .put(keypair.public_hex(), board.clone())
            .await
            .unwrap();
        board
    }

    /// Content with a conforming <time> tag followed by a little body text.
    fn timestamped_content(timestamp: DateTime<Utc>) -> String {
        format!(
            r#"<time datetime="{}"> hi"#,
            timestamp.format("%Y-%m-%dT%H:%M:%SZ")
        )
    }

    fn sample_keypair() -> BoardKeypair {
        BoardKeypair::from_seed_hex(SAMPLE_PRIVATE_KEY).unwrap()
    }

    #[track_caller]
    fn assert_protocol_error(result: Result<ServiceResponse, ServiceError>, want: ServerError) {
        match result {
            Err(ServiceError::Protocol(err)) => assert_eq!(err, want),
            other => panic!("expected protocol error {want:?}, got {other:?}"),
        }
    }

    // -- Index --------------------------------------------------------------

    #[test]
    fn index_says_hello() {
        let harness = setup();
        let resp = harness.service.handle_index();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, b"hello");
    }

    // -- GET ----------------------------------------------------------------

    #[tokio::test]
    async fn get_serves_stored_board() {
        let harness = setup();
        let keypair = sample_keypair();
        let board = store_board(&harness, &keypair, stable_time(), "some board content").await;

        let resp = harness
            .service
            .handle_get(SAMPLE_PUBLIC_KEY, None)
            .await
            .unwrap();

        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, board.content);
        assert_eq!(
            resp.headers,
            vec![
                ("Last-Modified", "Wed, 09 Nov 2022 10:11:12 GMT".to_owned()),
                ("Spring-Signature", board.signature.clone()),
                ("Spring-Version", "83".to_owned()),
            ]
        );
    }

    #[tokio::test]
    async fn get_of_empty_store_is_not_found_with_stable_body() {
        let harness = setup();
        let err = harness
            .service
            .handle_get(SAMPLE_PUBLIC_KEY, None)
            .await
            .unwrap_err();

        match err {
            ServiceError::Protocol(err) => {
                assert_eq!(err.status_code(), 404);
                assert_eq!(
                    err.to_string(),
                    format!("Board not found: \"{SAMPLE_PUBLIC_KEY}\".")
                );
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn get_test_key_returns_fresh_signed_content() {
        let harness = setup();
        let test_pair = BoardKeypair::from_seed_hex(TEST_PRIVATE_KEY).unwrap();

        let resp = harness
            .service
            .handle_get(TEST_PUBLIC_KEY, None)
            .await
            .unwrap();

        assert_eq!(resp.status, 200);

        // Content is randomized; check the signature and timestamp instead.
        let sig_hex = &resp
            .headers
            .iter()
            .find(|(name, _)| *name == "Spring-Signature")
            .unwrap()
            .1;
        let sig = hex::decode(sig_hex).unwrap();
        assert!(test_pair.verify(&resp.body, &sig));

        let last_modified = &resp
            .headers
            .iter()
            .find(|(name, _)| *name == "Last-Modified")
            .unwrap()
            .1;
        assert_eq!(last_modified, "Wed, 09 Nov 2022 10:11:12 GMT");

        // Write-through: the store holds the synthesized board now.
        assert!(harness.store.get(TEST_PUBLIC_KEY).await.is_ok());
    }

    #[tokio::test]
    async fn get_rejects_invalid_key() {
        let harness = setup();
        // A private key is not a valid board key.
        assert_protocol_error(
            harness.service.handle_get(TEST_PRIVATE_KEY, None).await,
            ServerError::KeyInvalid,
        );
    }

    #[tokio::test]
    async fn get_rejects_expired_key() {
        fn after_expiry() -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()
        }

        let store = Arc::new(MemoryStore::with_time_source(after_expiry));
        let service = BoardService::new(store, Arc::new(MemoryDenyList::new()))
            .with_time_source(after_expiry);

        assert_protocol_error(
            service.handle_get(SAMPLE_PUBLIC_KEY, None).await,
            ServerError::KeyExpired,
        );
    }

    #[tokio::test]
    async fn get_rejects_not_yet_valid_key() {
        fn before_window() -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2022, 10, 1, 0, 0, 0).unwrap()
        }

        let store = Arc::new(MemoryStore::with_time_source(before_window));
        let service = BoardService::new(store, Arc::new(MemoryDenyList::new()))
            .with_time_source(before_window);

        assert_protocol_error(
            service.handle_get(SAMPLE_PUBLIC_KEY, None).await,
            ServerError::KeyNotYetValid,
        );
    }

    #[tokio::test]
    async fn get_rejects_denied_key() {
        let harness =
            setup_with_deny_list(MemoryDenyList::with_keys([SAMPLE_PUBLIC_KEY.to_owned()]));
        store_board(&harness, &sample_keypair(), stable_time(), "content").await;

        assert_protocol_error(
            harness.service.handle_get(SAMPLE_PUBLIC_KEY, None).await,
            ServerError::DeniedKey,
        );
    }

    #[tokio::test]
    async fn get_of_timestamp_only_board_matches_never_existed() {
        let harness = setup();
        store_board(
            &harness,
            &sample_keypair(),
            stable_time(),
            r#"  <time datetime="2022-11-09T10:11:12Z">  "#,
        )
        .await;

        // Indistinguishable from a key that was never written.
        assert_protocol_error(
            harness.service.handle_get(SAMPLE_PUBLIC_KEY, None).await,
            ServerError::BoardNotFound(SAMPLE_PUBLIC_KEY.to_owned()),
        );
    }

    #[tokio::test]
    async fn get_with_if_modified_since_after_board_is_not_found() {
        let harness = setup();
        store_board(&harness, &sample_keypair(), stable_time(), "content").await;

        assert_protocol_error(
            harness
                .service
                .handle_get(SAMPLE_PUBLIC_KEY, Some("Wed, 09 Nov 2022 10:11:17 GMT"))
                .await,
            ServerError::BoardNotFound(SAMPLE_PUBLIC_KEY.to_owned()),
        );
    }

    #[tokio::test]
    async fn get_with_if_modified_since_at_or_before_board_serves_it() {
        let harness = setup();
        store_board(&harness, &sample_keypair(), stable_time(), "content").await;

        for header in ["Wed, 09 Nov 2022 10:11:12 GMT", "Tue, 08 Nov 2022 00:00:00 GMT"] {
            let resp = harness
                .service
                .handle_get(SAMPLE_PUBLIC_KEY, Some(header))
                .await
                .unwrap();
            assert_eq!(resp.status, 200);
        }
    }

    #[tokio::test]
    async fn get_with_malformed_if_modified_since_is_bad_request() {
        let harness = setup();
        store_board(&harness, &sample_keypair(), stable_time(), "content").await;

        assert_protocol_error(
            harness
                .service
                .handle_get(SAMPLE_PUBLIC_KEY, Some("yesterday-ish"))
                .await,
            ServerError::IfModifiedSinceParse("yesterday-ish".to_owned()),
        );
    }

    // -- PUT ----------------------------------------------------------------

    #[tokio::test]
    async fn put_to_test_key_is_always_rejected() {
        let harness = setup();
        assert_protocol_error(
            harness
                .service
                .handle_put(TEST_PUBLIC_KEY, Some("unchecked"), b"anything")
                .await,
            ServerError::TestKey,
        );
    }

    #[tokio::test]
    async fn put_accepts_valid_board_and_persists_it() {
        let harness = setup();
        let keypair = sample_keypair();
        let content = timestamped_content(stable_time() - chrono::Duration::seconds(5));
        let sig_hex = keypair.sign_hex(content.as_bytes());

        let resp = harness
            .service
            .handle_put(SAMPLE_PUBLIC_KEY, Some(sig_hex.as_str()), content.as_bytes())
            .await
            .unwrap();

        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, MESSAGE_KEY_UPDATED.as_bytes());
        assert_eq!(
            resp.headers,
            vec![("Spring-Version", "83".to_owned())]
        );

        // A follow-up GET serves exactly what was accepted.
        let get = harness
            .service
            .handle_get(SAMPLE_PUBLIC_KEY, None)
            .await
            .unwrap();
        assert_eq!(get.body, content.as_bytes());
    }

    #[tokio::test]
    async fn put_rejects_oversize_content() {
        let harness = setup();
        let oversize = vec![b'x'; config::MAX_CONTENT_SIZE + 1];

        assert_protocol_error(
            harness
                .service
                .handle_put(SAMPLE_PUBLIC_KEY, None, &oversize)
                .await,
            ServerError::ContentTooLarge,
        );
    }

    #[tokio::test]
    async fn put_signature_header_failures_are_distinct() {
        let harness = setup();
        let content = timestamped_content(stable_time());

        assert_protocol_error(
            harness
                .service
                .handle_put(SAMPLE_PUBLIC_KEY, None, content.as_bytes())
                .await,
            ServerError::SignatureMissing,
        );
        assert_protocol_error(
            harness
                .service
                .handle_put(SAMPLE_PUBLIC_KEY, Some(""), content.as_bytes())
                .await,
            ServerError::SignatureMissing,
        );
        assert_protocol_error(
            harness
                .service
                .handle_put(SAMPLE_PUBLIC_KEY, Some("zz"), content.as_bytes())
                .await,
            ServerError::SignatureUnparseable,
        );
        assert_protocol_error(
            harness
                .service
                .handle_put(SAMPLE_PUBLIC_KEY, Some("deadbeef"), content.as_bytes())
                .await,
            ServerError::SignatureBadLength,
        );
    }

    #[tokio::test]
    async fn put_rejects_signature_by_wrong_key() {
        let harness = setup();
        let content = timestamped_content(stable_time());
        let interloper = BoardKeypair::generate();

        assert_protocol_error(
            harness
                .service
                .handle_put(
                    SAMPLE_PUBLIC_KEY,
                    Some(interloper.sign_hex(content.as_bytes()).as_str()),
                    content.as_bytes(),
                )
                .await,
            ServerError::SignatureInvalid,
        );
    }

    #[tokio::test]
    async fn put_timestamp_failures_are_distinct() {
        let harness = setup();
        let keypair = sample_keypair();

        // Signed fine, but no <time> tag at all.
        let untagged = "just some content";
        assert_protocol_error(
            harness
                .service
                .handle_put(
                    SAMPLE_PUBLIC_KEY,
                    Some(keypair.sign_hex(untagged.as_bytes()).as_str()),
                    untagged.as_bytes(),
                )
                .await,
            ServerError::TimestampMissing,
        );

        // Tag matches the pattern, but February 31st is not a day.
        let unparseable = r#"<time datetime="2022-02-31T10:11:12Z"> hi"#;
        assert_protocol_error(
            harness
                .service
                .handle_put(
                    SAMPLE_PUBLIC_KEY,
                    Some(keypair.sign_hex(unparseable.as_bytes()).as_str()),
                    unparseable.as_bytes(),
                )
                .await,
            ServerError::TimestampUnparseable,
        );
    }

    #[tokio::test]
    async fn put_rejects_future_timestamp() {
        let harness = setup();
        let keypair = sample_keypair();
        let content = timestamped_content(stable_time() + chrono::Duration::hours(3));

        assert_protocol_error(
            harness
                .service
                .handle_put(
                    SAMPLE_PUBLIC_KEY,
                    Some(keypair.sign_hex(content.as_bytes()).as_str()),
                    content.as_bytes(),
                )
                .await,
            ServerError::TimestampInFuture,
        );
    }

    #[tokio::test]
    async fn put_tolerates_slight_clock_skew() {
        let harness = setup();
        let keypair = sample_keypair();
        // Three minutes ahead of the server clock: inside the skew window.
        let content = timestamped_content(stable_time() + chrono::Duration::minutes(3));

        let resp = harness
            .service
            .handle_put(
                SAMPLE_PUBLIC_KEY,
                Some(keypair.sign_hex(content.as_bytes()).as_str()),
                content.as_bytes(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status, 200);
    }

    #[tokio::test]
    async fn put_rejects_ancient_timestamp() {
        let harness = setup();
        let keypair = sample_keypair();
        let content = timestamped_content(stable_time() - chrono::Duration::days(23));

        assert_protocol_error(
            harness
                .service
                .handle_put(
                    SAMPLE_PUBLIC_KEY,
                    Some(keypair.sign_hex(content.as_bytes()).as_str()),
                    content.as_bytes(),
                )
                .await,
            ServerError::TimestampTooOld,
        );
    }

    #[tokio::test]
    async fn put_older_than_current_board_conflicts() {
        let harness = setup();
        let keypair = sample_keypair();
        store_board(&harness, &keypair, stable_time(), "current content").await;

        let older = timestamped_content(stable_time() - chrono::Duration::minutes(5));
        assert_protocol_error(
            harness
                .service
                .handle_put(
                    SAMPLE_PUBLIC_KEY,
                    Some(keypair.sign_hex(older.as_bytes()).as_str()),
                    older.as_bytes(),
                )
                .await,
            ServerError::TimestampOlderThanCurrent,
        );
    }

    #[tokio::test]
    async fn put_rejects_denied_key() {
        let harness =
            setup_with_deny_list(MemoryDenyList::with_keys([SAMPLE_PUBLIC_KEY.to_owned()]));
        let content = timestamped_content(stable_time());
        let keypair = sample_keypair();

        assert_protocol_error(
            harness
                .service
                .handle_put(
                    SAMPLE_PUBLIC_KEY,
                    Some(keypair.sign_hex(content.as_bytes()).as_str()),
                    content.as_bytes(),
                )
                .await,
            ServerError::DeniedKey,
        );
    }

    // -- HTTP dates ---------------------------------------------------------

    #[test]
    fn http_date_round_trips() {
        let t = stable_time();
        let formatted = format_http_date(t);
        assert_eq!(formatted, "Wed, 09 Nov 2022 10:11:12 GMT");
        assert_eq!(parse_http_date(&formatted), Some(t));
    }

    #[test]
    fn http_date_parse_is_strict() {
        assert_eq!(parse_http_date("2022-11-09T10:11:12Z"), None);
        assert_eq!(parse_http_date(""), None);
    }
}
