use std::cell::Cell;
use std::rc::Rc;

use image::{ImageBuffer, Rgba};
use navconfig::ImageConfig;
use navcovers::{CoverResolver, CoverSource, CoverStore, ImgurUploader};
use tempfile::TempDir;

/// Source factice comptant les téléchargements
struct FakeSource {
    png: Vec<u8>,
    fetches: Rc<Cell<usize>>,
}

impl CoverSource for FakeSource {
    fn fetch_cover(&self, _cover_id: &str) -> anyhow::Result<Vec<u8>> {
        self.fetches.set(self.fetches.get() + 1);
        Ok(self.png.clone())
    }
}

fn test_png() -> Vec<u8> {
    let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_fn(64, 64, |_, _| Rgba([10, 200, 30, 255]));
    let mut buffer = Vec::new();
    img.write_to(
        &mut std::io::Cursor::new(&mut buffer),
        image::ImageFormat::Png,
    )
    .unwrap();
    buffer
}

struct Fixture {
    resolver: CoverResolver<FakeSource>,
    fetches: Rc<Cell<usize>>,
    #[allow(dead_code)]
    dir: TempDir,
    cache_path: std::path::PathBuf,
}

fn fixture(endpoint: &str, client_id: &str, fallback: Option<&str>) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("cover_cache.json");

    let fetches = Rc::new(Cell::new(0));
    let source = FakeSource {
        png: test_png(),
        fetches: fetches.clone(),
    };

    let store = CoverStore::load(&cache_path);
    let uploader = ImgurUploader::with_endpoint(client_id, endpoint).unwrap();
    let resolver = CoverResolver::new(
        source,
        store,
        uploader,
        ImageConfig::default(),
        fallback.map(str::to_string),
    );

    Fixture {
        resolver,
        fetches,
        dir,
        cache_path,
    }
}

const UPLOAD_OK: &str = r#"{"success":true,"data":{"link":"https://i.imgur.com/test.jpg"}}"#;

#[test]
fn cache_hit_makes_no_network_call() {
    let mut server = mockito::Server::new();
    let upload = server.mock("POST", "/").expect(0).create();

    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("cover_cache.json");

    // Pré-remplir le cache persisté avant de construire le résolveur
    {
        let mut store = CoverStore::load(&cache_path);
        store.insert("Abbey Road", "https://i.imgur.com/cached.jpg");
        store.save().unwrap();
    }

    let fetches = Rc::new(Cell::new(0));
    let source = FakeSource {
        png: test_png(),
        fetches: fetches.clone(),
    };
    let store = CoverStore::load(&cache_path);
    let uploader = ImgurUploader::with_endpoint("client-id", server.url()).unwrap();
    let mut resolver =
        CoverResolver::new(source, store, uploader, ImageConfig::default(), None);

    let url = resolver.resolve("Abbey Road", "al-1");
    assert_eq!(url.as_deref(), Some("https://i.imgur.com/cached.jpg"));
    assert_eq!(fetches.get(), 0);
    upload.assert();
}

#[test]
fn miss_uploads_once_then_serves_from_cache() {
    let mut server = mockito::Server::new();
    let upload = server
        .mock("POST", "/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(UPLOAD_OK)
        .expect(1)
        .create();

    let mut fx = fixture(&server.url(), "client-id", None);

    let first = fx.resolver.resolve("Kind of Blue", "al-2");
    assert_eq!(first.as_deref(), Some("https://i.imgur.com/test.jpg"));

    // Deuxième résolution : cache, pas de nouvel upload ni téléchargement
    let second = fx.resolver.resolve("Kind of Blue", "al-2");
    assert_eq!(second, first);
    assert_eq!(fx.fetches.get(), 1);
    upload.assert();

    // La correspondance a été persistée sur disque
    let persisted = std::fs::read_to_string(&fx.cache_path).unwrap();
    assert!(persisted.contains("Kind of Blue"));
    assert!(persisted.contains("https://i.imgur.com/test.jpg"));
}

#[test]
fn upload_failure_falls_back_to_static_asset() {
    let mut server = mockito::Server::new();
    let _upload = server
        .mock("POST", "/")
        .with_status(500)
        .with_body("{}")
        .create();

    let mut fx = fixture(&server.url(), "client-id", Some("navidrome_logo"));

    let url = fx.resolver.resolve("Blue Train", "al-3");
    assert_eq!(url.as_deref(), Some("navidrome_logo"));
    // Rien n'est mis en cache en cas d'échec
    assert!(fx.resolver.store().is_empty());
}

#[test]
fn upload_failure_without_asset_omits_artwork() {
    let mut server = mockito::Server::new();
    let _upload = server
        .mock("POST", "/")
        .with_status(500)
        .with_body("{}")
        .create();

    let mut fx = fixture(&server.url(), "client-id", None);
    assert_eq!(fx.resolver.resolve("Blue Train", "al-3"), None);
}

#[test]
fn missing_album_or_cover_id_skips_to_fallback() {
    let mut server = mockito::Server::new();
    let upload = server.mock("POST", "/").expect(0).create();

    let mut fx = fixture(&server.url(), "client-id", Some("navidrome_logo"));

    assert_eq!(
        fx.resolver.resolve("", "al-4").as_deref(),
        Some("navidrome_logo")
    );
    assert_eq!(
        fx.resolver.resolve("Some Album", "").as_deref(),
        Some("navidrome_logo")
    );
    assert_eq!(fx.fetches.get(), 0);
    upload.assert();
}

#[test]
fn unconfigured_uploader_never_downloads() {
    let mut server = mockito::Server::new();
    let upload = server.mock("POST", "/").expect(0).create();

    let mut fx = fixture(&server.url(), "", Some("navidrome_logo"));

    let url = fx.resolver.resolve("Abbey Road", "al-1");
    assert_eq!(url.as_deref(), Some("navidrome_logo"));
    assert_eq!(fx.fetches.get(), 0);
    upload.assert();
}

#[test]
fn unsuccessful_payload_is_rejected() {
    let mut server = mockito::Server::new();
    let _upload = server
        .mock("POST", "/")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"success":false,"data":{}}"#)
        .create();

    let mut fx = fixture(&server.url(), "client-id", None);
    assert_eq!(fx.resolver.resolve("Abbey Road", "al-1"), None);
}
