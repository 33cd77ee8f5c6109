//! Test fixtures: an in-process map service and the sealing side of the
//! envelope scheme.

use std::time::Duration;

use aes::Aes128;
use axum::Router;
use axum::http::StatusCode;
use axum::routing::get;
use base64::{Engine, engine::general_purpose::STANDARD as B64};
use cbc::cipher::{BlockEncryptMut, KeyIvInit, block_padding::Pkcs7};

use crate::crypto::{FIXED_TAIL_LENGTH, derive};
use crate::params::CryptoParameters;

type Aes128CbcEnc = cbc::Encryptor<Aes128>;

/// Key-segment plaintexts are padded to this length so they encrypt to four
/// blocks, which base64-encodes to exactly `FIXED_TAIL_LENGTH` characters.
const KEY_PLAINTEXT_LEN: usize = 48;

/// Versioned routes list: length of `s[0]` and `v[0]` is 2, so index 2 is used.
pub(crate) const ROUTES_LIST_VERSIONED: &str = r#"{
    "arr": ["keyA", "keyB", "keyC"],
    "s": ["ab", "ffff", "0123456789abcdef"],
    "v": ["cd", "ffff", "00112233445566778899aabbccddeeff"]
}"#;

/// Unversioned routes list: zoom levels sum to 1, selecting `arr[1]`.
pub(crate) const ROUTES_LIST: &str = r#"[
    {"Name": "Acela", "ZoomLevel": 1},
    {"Name": "Cardinal"},
    {"Name": "Pennsylvanian", "ZoomLevel": 0}
]"#;

pub(crate) const TRAINS_GEOJSON: &str = r#"{"type":"FeatureCollection","features":[{"type":"Feature","geometry":{"type":"Point","coordinates":[-77.0,38.9]},"properties":{"TrainNum":"171","RouteName":"Northeast Regional","TrainState":"Active"}},{"type":"Feature","geometry":{"type":"Point","coordinates":[-87.6,41.8]},"properties":{"TrainNum":"350","RouteName":"Pontiac/Wolverine Michigan Services","TrainState":"Predeparture"}}]}"#;

pub(crate) const STATIONS_GEOJSON: &str = r#"{"StationsDataResponse":{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"Code":"WAS","StationName":"Washington"}},{"type":"Feature","properties":{"Code":"BAL","StationName":"Baltimore"}}]}}"#;

/// Parameters the fixture documents above resolve to.
pub(crate) fn fixture_parameters() -> CryptoParameters {
    CryptoParameters::new("keyB", "0123456789abcdef", "00112233445566778899aabbccddeeff")
}

/// Encrypt `plaintext` under `derive(passphrase, salt)` and base64 it.
pub(crate) fn seal_segment(plaintext: &str, passphrase: &str, salt_hex: &str, iv_hex: &str) -> String {
    seal_bytes(plaintext.as_bytes(), passphrase, salt_hex, iv_hex)
}

/// Like [`seal_segment`], for plaintexts that need not be UTF-8.
pub(crate) fn seal_bytes(plaintext: &[u8], passphrase: &str, salt_hex: &str, iv_hex: &str) -> String {
    let key = derive(passphrase.as_bytes(), salt_hex).unwrap();
    let iv: [u8; 16] = hex::decode(iv_hex).unwrap().try_into().unwrap();

    let ciphertext = Aes128CbcEnc::new(&(*key.as_bytes()).into(), &iv.into())
        .encrypt_padded_vec_mut::<Pkcs7>(plaintext);

    B64.encode(ciphertext)
}

/// Build the key-segment plaintext: the content key, a delimiter, then filler.
pub(crate) fn key_plaintext(content_key: &str) -> String {
    let mut text = format!("{content_key}|");
    let filler = b"0123456789";
    let mut i = 0;
    while text.len() < KEY_PLAINTEXT_LEN {
        text.push(filler[i % filler.len()] as char);
        i += 1;
    }
    assert!(text.len() < 64, "content key too long for a four-block tail");
    text
}

/// Produce a two-layer payload the way the map service does.
pub(crate) fn seal_payload(content: &str, content_key: &str, params: &CryptoParameters) -> String {
    let content_segment = seal_segment(content, content_key, &params.salt, &params.iv);
    let key_segment = seal_segment(
        &key_plaintext(content_key),
        &params.public_key,
        &params.salt,
        &params.iv,
    );
    assert_eq!(key_segment.len(), FIXED_TAIL_LENGTH);

    content_segment + &key_segment
}

/// One canned response served by the fixture server.
pub(crate) enum Route {
    Ok(&'static str, String),
    Status(&'static str, u16, String),
    Slow(&'static str, Duration),
}

impl Route {
    pub(crate) fn ok(path: &'static str, body: impl Into<String>) -> Self {
        Route::Ok(path, body.into())
    }

    pub(crate) fn status(path: &'static str, status: u16, body: impl Into<String>) -> Self {
        Route::Status(path, status, body.into())
    }

    pub(crate) fn slow(path: &'static str, delay: Duration) -> Self {
        Route::Slow(path, delay)
    }
}

/// Serve `routes` on an ephemeral loopback port; returns the base URL.
pub(crate) async fn serve(routes: Vec<Route>) -> String {
    let mut app = Router::new();
    for route in routes {
        app = match route {
            Route::Ok(path, body) => app.route(path, get(move || async move { body })),
            Route::Status(path, status, body) => {
                let status = StatusCode::from_u16(status).unwrap();
                app.route(path, get(move || async move { (status, body) }))
            }
            Route::Slow(path, delay) => app.route(
                path,
                get(move || async move {
                    tokio::time::sleep(delay).await;
                    "too late"
                }),
            ),
        };
    }

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}")
}

/// Serve the full fixture map service with the given payloads.
pub(crate) async fn serve_map_service(trains_payload: String, stations_payload: String) -> String {
    serve(vec![
        Route::ok("/rttl/js/RoutesList.v.json", ROUTES_LIST_VERSIONED),
        Route::ok("/rttl/js/RoutesList.json", ROUTES_LIST),
        Route::ok("/services/MapDataService/trains/getTrainsData", trains_payload),
        Route::ok(
            "/services/MapDataService/stations/trainStations",
            stations_payload,
        ),
    ])
    .await
}
