fn main() {
    println!("Run `cargo test -p wire-compat` to execute wire compatibility tests.");
}

/// Wire compatibility tests: exercise the full router and pin down the
/// protocol surface other BITS clients depend on — exact header names,
/// the fixed protocol GUID, status classes, and the on-disk layout.
#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, Response, StatusCode};
    use http_body_util::BodyExt;
    use sha2::{Digest, Sha256};
    use tempfile::TempDir;
    use tower::ServiceExt;

    use bitsd_protocol::PROTOCOL_GUID;
    use bitsd_server::{AppState, bits_router};
    use bitsd_store::SessionStore;

    fn app(tmp: &TempDir) -> Router {
        bits_router("/bits", AppState::new(SessionStore::new(tmp.path())))
    }

    fn sha256_hex(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hex::encode(hasher.finalize())
    }

    async fn send(
        app: &Router,
        packet: &str,
        session: Option<&str>,
        range: Option<&str>,
        body: &[u8],
    ) -> Response<axum::body::Body> {
        let mut builder = Request::builder()
            .method("BITS_POST")
            .uri("/bits")
            .header("BITS-Packet-Type", packet);
        if let Some(session) = session {
            builder = builder.header("BITS-Session-Id", session);
        }
        if let Some(range) = range {
            builder = builder.header("Content-Range", range);
        }
        let req = builder.body(Body::from(body.to_vec())).unwrap();
        app.clone().oneshot(req).await.unwrap()
    }

    fn header(res: &Response<axum::body::Body>, name: &str) -> Option<String> {
        res.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    }

    /// Full happy path: create, two sequential fragments, close.
    #[tokio::test]
    async fn end_to_end_upload() {
        let tmp = TempDir::new().unwrap();
        let app = app(&tmp);

        // Create-Session.
        let res = send(&app, "Create-Session", None, None, b"").await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(header(&res, "BITS-Packet-Type").as_deref(), Some("Ack"));
        assert_eq!(header(&res, "BITS-Protocol").as_deref(), Some(PROTOCOL_GUID));
        assert_eq!(header(&res, "Accept-Encoding").as_deref(), Some("Identity"));
        let id = header(&res, "BITS-Session-Id").unwrap();

        // Fragment 0-4.
        let res = send(&app, "Fragment", Some(&id), Some("bytes 0-4/10"), b"ABCDE").await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            header(&res, "BITS-Received-Content-Range").as_deref(),
            Some("5")
        );

        // Fragment 5-9.
        let res = send(&app, "Fragment", Some(&id), Some("bytes 5-9/10"), b"FGHIJ").await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            header(&res, "BITS-Received-Content-Range").as_deref(),
            Some("10")
        );

        // Close-Session.
        let res = send(&app, "Close-Session", Some(&id), None, b"").await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(header(&res, "BITS-Session-Id").as_deref(), Some(id.as_str()));

        // On-disk layout: <base>/<s1>/<s2>/<id>/ with the four wire file names.
        let bare = &id[1..id.len() - 1];
        let dir = tmp.path().join(&bare[0..2]).join(&bare[3..5]).join(bare);
        assert!(dir.is_dir());
        assert_eq!(std::fs::read(dir.join(bare)).unwrap(), b"ABCDEFGHIJ");
        assert_eq!(
            std::fs::read_to_string(dir.join(format!("{bare}.Hash"))).unwrap(),
            sha256_hex(b"ABCDEFGHIJ")
        );
    }

    #[tokio::test]
    async fn acks_have_zero_content_length() {
        let tmp = TempDir::new().unwrap();
        let app = app(&tmp);

        for packet in ["Ping", "Create-Session"] {
            let res = send(&app, packet, None, None, b"").await;
            assert_eq!(res.status(), StatusCode::OK, "packet {packet}");
            assert_eq!(
                header(&res, "Content-Length").as_deref(),
                Some("0"),
                "packet {packet}"
            );
            let body = res.into_body().collect().await.unwrap().to_bytes();
            assert!(body.is_empty(), "packet {packet}");
        }
    }

    #[tokio::test]
    async fn error_bodies_are_short_plain_text() {
        let tmp = TempDir::new().unwrap();
        let app = app(&tmp);

        let res = send(
            &app,
            "Fragment",
            Some("{12345678-ABCD-4EF0-9876-0123456789AB}"),
            Some("bytes 0-4/10"),
            b"ABCDE",
        )
        .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body = res.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.starts_with("404 "), "body was {text:?}");
    }

    #[tokio::test]
    async fn sidecar_file_names_match_wire_headers() {
        let tmp = TempDir::new().unwrap();
        let app = app(&tmp);

        let res = send(&app, "Create-Session", None, None, b"").await;
        let id = header(&res, "BITS-Session-Id").unwrap();

        let req = Request::builder()
            .method("BITS_POST")
            .uri("/bits")
            .header("BITS-Packet-Type", "Fragment")
            .header("BITS-Session-Id", &id)
            .header("Content-Range", "bytes 0-2/3")
            .header("Content-Name", "notes.txt")
            .header("Content-Encoding", "identity")
            .body(Body::from(&b"abc"[..]))
            .unwrap();
        let res = app.clone().oneshot(req).await.unwrap();
        assert_eq!(res.status(), StatusCode::OK);

        let bare = &id[1..id.len() - 1];
        let dir = tmp.path().join(&bare[0..2]).join(&bare[3..5]).join(bare);
        assert!(dir.join(format!("{bare}.Content-Name")).is_file());
        assert!(dir.join(format!("{bare}.Content-Encoding")).is_file());
    }

    /// Cancel is terminal for the state machine but leaves no on-disk
    /// marker, so a later close still acknowledges (documented policy).
    #[tokio::test]
    async fn close_after_cancel_still_acknowledges() {
        let tmp = TempDir::new().unwrap();
        let app = app(&tmp);

        let res = send(&app, "Create-Session", None, None, b"").await;
        let id = header(&res, "BITS-Session-Id").unwrap();

        let res = send(&app, "Cancel-Session", Some(&id), None, b"").await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = send(&app, "Close-Session", Some(&id), None, b"").await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    /// Ping is the liveness probe: no session, no preconditions.
    #[tokio::test]
    async fn ping_requires_nothing() {
        let tmp = TempDir::new().unwrap();
        let app = app(&tmp);

        let res = send(&app, "Ping", None, None, b"").await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(header(&res, "BITS-Packet-Type").as_deref(), Some("Ack"));
        assert!(header(&res, "BITS-Session-Id").is_none());
    }
}
