//! Request handling against in-memory and directory object stores.

mod common;

use common::*;
use zenfit::handler::{HandlerConfig, ResizeRequest, ResizeResponse, handle, try_handle};
use zenfit::store::{Acl, DirStore, MemoryStore, ObjectStore};
use zenfit::{BoundingBox, Limits, Unstoppable};

fn request(filename: &str, width: u32, height: u32) -> ResizeRequest {
    ResizeRequest {
        filename: filename.into(),
        width,
        height,
    }
}

fn respond<S: ObjectStore>(store: &S, req: ResizeRequest) -> ResizeResponse {
    handle(store, &req, &HandlerConfig::default(), Unstoppable)
}

#[test]
fn stores_fitted_canvas_under_derived_key() {
    let store = MemoryStore::new("https://bucket.example.com/");
    store.insert("logo.png", png_bytes(&gradient(400, 400)));

    let response = respond(&store, request("logo.png", 0, 0));
    assert!(response.is_success(), "{response:?}");
    assert_eq!(
        response.body.download,
        "https://bucket.example.com/logo_600x300.png"
    );
    assert!(response.body.error.is_empty());
    assert_eq!(
        response.headers.get("Content-Type").map(String::as_str),
        Some("application/json")
    );

    let (bytes, acl) = store.object("logo_600x300.png").unwrap();
    assert_eq!(acl, Acl::PublicRead);
    let canvas = decode_png(&bytes);
    assert_eq!((canvas.width(), canvas.height()), (600, 300));
    assert_eq!(content_rect(&canvas), Some((150, 0, 300, 300)));
}

#[test]
fn explicit_box_and_multi_dot_name() {
    let store = MemoryStore::default();
    store.insert("team.photo.jpeg", gray_jpeg(32, 16));

    let req = request("team.photo.jpeg", 64, 64);
    let resized = try_handle(&store, &req, &HandlerConfig::default(), Unstoppable).unwrap();
    assert_eq!(resized.key, "team.photo_64x64.png");
    assert_eq!(resized.bbox, BoundingBox::new(64, 64));
    let canvas = decode_png(&store.get("team.photo_64x64.png").unwrap());
    assert_eq!(content_rect(&canvas), Some((0, 16, 64, 32)));
}

#[test]
fn unsupported_format_reports_failure_without_storing() {
    let store = MemoryStore::default();
    store.insert("logo.svg", b"<svg/>".to_vec());

    let response = respond(&store, request("logo.svg", 600, 300));
    assert_eq!(response.status_code, 415);
    assert!(response.body.download.is_empty());
    assert!(!response.body.error.is_empty());
    assert_eq!(store.len(), 1);
}

#[test]
fn missing_object_is_not_found() {
    let store = MemoryStore::default();
    let response = respond(&store, request("nope.png", 0, 0));
    assert_eq!(response.status_code, 404);
    assert!(store.is_empty());
}

#[test]
fn corrupt_source_is_bad_request() {
    let store = MemoryStore::default();
    store.insert("broken.png", b"\x89PNG\r\n\x1a\nnot really".to_vec());
    let response = respond(&store, request("broken.png", 0, 0));
    assert_eq!(response.status_code, 400);
    assert_eq!(store.len(), 1);
}

#[test]
fn response_serializes_like_the_wire_format() {
    let store = MemoryStore::new("mem://");
    store.insert("a.png", png_bytes(&gradient(2, 2)));
    let response = respond(&store, request("a.png", 10, 10));
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["statusCode"], 200);
    assert_eq!(json["headers"]["Content-Type"], "application/json");
    assert_eq!(json["body"]["download"], "mem://a_10x10.png");
    assert_eq!(json["body"]["error"], "");
}

#[test]
fn request_parses_from_json() {
    let req: ResizeRequest =
        serde_json::from_str(r#"{"filename":"x.jpg","width":320,"height":0}"#).unwrap();
    assert_eq!(req, request("x.jpg", 320, 0));
}

#[test]
fn directory_store_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("pic.png"), png_bytes(&gradient(30, 10))).unwrap();
    let store = DirStore::new(dir.path());

    let response = respond(&store, request("pic.png", 60, 60));
    assert!(response.is_success(), "{response:?}");
    let written = std::fs::read(dir.path().join("pic_60x60.png")).unwrap();
    let canvas = decode_png(&written);
    assert_eq!(content_rect(&canvas), Some((0, 20, 60, 20)));
}

#[test]
fn directory_store_refuses_path_traversal() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirStore::new(dir.path());
    let response = respond(&store, request("../outside.png", 0, 0));
    assert_eq!(response.status_code, 400);
}

#[test]
fn oversized_box_is_refused() {
    let store = MemoryStore::default();
    store.insert("a.png", png_bytes(&gradient(2, 2)));
    let response = respond(&store, request("a.png", 60_000, 60_000));
    assert_eq!(response.status_code, 413);
    assert!(response.body.download.is_empty());
    assert_eq!(store.len(), 1);
}

#[test]
fn configured_canvas_cap() {
    let store = MemoryStore::default();
    store.insert("a.png", png_bytes(&gradient(2, 2)));
    let config = HandlerConfig {
        limits: Limits {
            max_canvas_pixels: Some(10_000),
            ..Limits::default()
        },
        ..HandlerConfig::default()
    };
    let refused = handle(&store, &request("a.png", 0, 0), &config, Unstoppable);
    assert_eq!(refused.status_code, 413);
    let accepted = handle(&store, &request("a.png", 100, 100), &config, Unstoppable);
    assert!(accepted.is_success(), "{accepted:?}");
}
