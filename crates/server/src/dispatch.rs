//! Packet dispatch: one HTTP exchange per protocol transition.
//!
//! The state machine is implicit in filesystem existence: a session is
//! Active while its directory exists without a `.Hash` sidecar, and
//! Closed once the sidecar appears. Close and cancel are terminal but
//! delete nothing; a cancelled session is indistinguishable on disk
//! from an active one (accepted, see DESIGN.md).

use std::path::PathBuf;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::header::HeaderName;
use axum::http::{HeaderMap, HeaderValue, Method};
use axum::response::{IntoResponse, Response};
use tokio::task::spawn_blocking;

use bitsd_protocol::{
    ACK, BITS_METHOD, FragmentRange, HEADER_ACCEPT_ENCODING, HEADER_CONTENT_ENCODING,
    HEADER_CONTENT_NAME, HEADER_CONTENT_RANGE, HEADER_PACKET_TYPE, HEADER_PROTOCOL,
    HEADER_RECEIVED_CONTENT_RANGE, HEADER_SESSION_ID, IDENTITY_ENCODING, PROTOCOL_GUID,
    PacketType, ProtocolError, SessionId,
};
use bitsd_transfer::{SidecarKind, finalize, hash_sidecar_path, write_fragment, write_sidecar};

use crate::{AppState, BitsError};

pub(crate) async fn handle(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, BitsError> {
    if !method.as_str().eq_ignore_ascii_case(BITS_METHOD) {
        return Err(BitsError::BadRequest("invalid HTTP method".into()));
    }

    let packet: PacketType = header_str(&headers, &HEADER_PACKET_TYPE)
        .ok_or_else(|| BitsError::BadRequest("missing BITS-Packet-Type".into()))?
        .parse()
        .map_err(|e: ProtocolError| BitsError::BadRequest(e.to_string()))?;

    match packet {
        PacketType::Ping => Ok(ack().into_response()),
        PacketType::CreateSession => create_session(state).await,
        PacketType::Fragment => fragment(state, headers, body).await,
        PacketType::CloseSession => close_session(state, headers).await,
        PacketType::CancelSession => cancel_session(state, headers),
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Base acknowledgement headers shared by every successful transition.
///
/// The explicit zero content length is part of the protocol surface;
/// every ack carries it even though the body is empty anyway.
fn ack() -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(HEADER_PACKET_TYPE, HeaderValue::from_static(ACK));
    h.insert(
        axum::http::header::CONTENT_LENGTH,
        HeaderValue::from_static("0"),
    );
    h
}

/// Parses and resolves the `BITS-Session-Id` header.
///
/// A missing header is a client error; an identifier that fails the
/// canonical pattern or was never created is not-found. No filesystem
/// mutation happens on either path.
fn resolve_session(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<(SessionId, PathBuf), BitsError> {
    let raw = header_str(headers, &HEADER_SESSION_ID)
        .ok_or_else(|| BitsError::BadRequest("missing BITS-Session-Id".into()))?;
    let id: SessionId = raw
        .parse()
        .map_err(|e: ProtocolError| BitsError::NotFound(e.to_string()))?;

    match state.store.resolve(&id) {
        Some(dir) => Ok((id, dir)),
        None => {
            tracing::warn!(session = %id, "session not found");
            Err(BitsError::NotFound("BITS-Session-Id not found".into()))
        }
    }
}

async fn create_session(state: AppState) -> Result<Response, BitsError> {
    let id = state.store.generate();

    let store = state.store.clone();
    let create_id = id.clone();
    if let Err(e) = spawn_blocking(move || store.create(&create_id)).await? {
        tracing::error!(session = %id, "could not create session: {e}");
        return Err(BitsError::Internal("could not create session".into()));
    }
    tracing::info!(session = %id, "session created");

    let mut h = ack();
    h.insert(HEADER_PROTOCOL, HeaderValue::from_static(PROTOCOL_GUID));
    h.insert(HEADER_SESSION_ID, HeaderValue::try_from(id.braced())?);
    h.insert(
        HEADER_ACCEPT_ENCODING,
        HeaderValue::from_static(IDENTITY_ENCODING),
    );
    Ok(h.into_response())
}

async fn fragment(
    state: AppState,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, BitsError> {
    let (id, dir) = resolve_session(&state, &headers)?;
    let lock = state.locks.lock_for(id.bare());
    let _guard = lock.lock().await;

    let name = header_str(&headers, &HEADER_CONTENT_NAME).map(str::to_owned);
    let encoding = header_str(&headers, &HEADER_CONTENT_ENCODING).map(str::to_owned);
    // Parsed up front but acted on only after the sidecars are written,
    // so metadata lands even when the range is missing or malformed.
    let range = match header_str(&headers, &HEADER_CONTENT_RANGE) {
        None => Err(BitsError::BadRequest("missing Content-Range".into())),
        Some(raw) => raw
            .parse::<FragmentRange>()
            .map_err(|e| BitsError::BadRequest(e.to_string())),
    };

    let session = id.clone();
    let next = spawn_blocking(move || -> Result<u64, BitsError> {
        let content = session.bare();
        if hash_sidecar_path(&dir, content).exists() {
            return Err(BitsError::BadRequest("session already closed".into()));
        }

        if let Some(name) = name {
            if let Err(e) = write_sidecar(&dir, content, SidecarKind::Name, &name) {
                tracing::warn!(session = %session, "Content-Name: {e}");
            }
        }
        if let Some(encoding) = encoding {
            if let Err(e) = write_sidecar(&dir, content, SidecarKind::Encoding, &encoding) {
                tracing::warn!(session = %session, "Content-Encoding: {e}");
            }
        }

        let range = range?;
        match write_fragment(&dir, content, &range, &body) {
            Ok(next) => {
                tracing::info!(session = %session, wrote = body.len(), "fragment stored");
                Ok(next)
            }
            Err(e) => {
                tracing::error!(session = %session, "could not store content: {e}");
                Err(BitsError::Internal("could not store content".into()))
            }
        }
    })
    .await??;

    let mut h = ack();
    h.insert(HEADER_SESSION_ID, HeaderValue::try_from(id.braced())?);
    h.insert(HEADER_RECEIVED_CONTENT_RANGE, HeaderValue::from(next));
    Ok(h.into_response())
}

async fn close_session(state: AppState, headers: HeaderMap) -> Result<Response, BitsError> {
    let (id, dir) = resolve_session(&state, &headers)?;
    let lock = state.locks.lock_for(id.bare());
    let _guard = lock.lock().await;

    let session = id.clone();
    let digest = spawn_blocking(move || -> Result<Option<String>, BitsError> {
        let content = session.bare();
        if hash_sidecar_path(&dir, content).exists() {
            return Err(BitsError::BadRequest("session already closed".into()));
        }
        // Best-effort: a missing content file or a digest failure must
        // not block the close acknowledgement.
        Ok(finalize(&dir, content))
    })
    .await??;

    match digest {
        Some(hash) => tracing::info!(session = %id, %hash, "session closed"),
        None => tracing::info!(session = %id, "session closed without content"),
    }

    let mut h = ack();
    h.insert(HEADER_SESSION_ID, HeaderValue::try_from(id.braced())?);
    Ok(h.into_response())
}

fn cancel_session(state: AppState, headers: HeaderMap) -> Result<Response, BitsError> {
    let (id, dir) = resolve_session(&state, &headers)?;
    if hash_sidecar_path(&dir, id.bare()).exists() {
        return Err(BitsError::BadRequest("session already closed".into()));
    }
    tracing::info!(session = %id, "session cancelled");

    let mut h = ack();
    h.insert(HEADER_SESSION_ID, HeaderValue::try_from(id.braced())?);
    Ok(h.into_response())
}
