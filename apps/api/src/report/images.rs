//! Image Placer: resolves remote images into decoded pixels.
//!
//! # Rules
//! - Fetch and decode run under ONE timeout; expiry means "no image".
//! - Decoding is CPU-bound and runs inside `spawn_blocking`.
//! - Every failure is logged at `warn` and mapped to `None`. Nothing here
//!   ever fails a report.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use tracing::{debug, warn};

use crate::errors::ImageError;

/// Decoded RGB8 pixels at intrinsic size.
#[derive(Clone, PartialEq, Eq)]
pub struct ResolvedImage {
    pub width: u32,
    pub height: u32,
    /// Row-major RGB triplets, `width * height * 3` bytes.
    pub pixels: Bytes,
}

impl ResolvedImage {
    /// Height over width.
    pub fn aspect_ratio(&self) -> f32 {
        self.height as f32 / self.width as f32
    }

    /// Largest `(width, height)` with this image's aspect ratio that fits the box.
    pub fn fit_within(&self, max_width: f32, max_height: f32) -> (f32, f32) {
        let ratio = self.aspect_ratio();
        let width = max_width.min(max_height / ratio);
        (width, width * ratio)
    }
}

impl fmt::Debug for ResolvedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// Decodes PNG or JPEG bytes into RGB8 pixels.
pub fn decode_image(data: &[u8]) -> Result<ResolvedImage, ImageError> {
    let rgb = image::load_from_memory(data)?.to_rgb8();
    let (width, height) = rgb.dimensions();
    if width == 0 || height == 0 {
        return Err(ImageError::ZeroSized);
    }
    Ok(ResolvedImage {
        width,
        height,
        pixels: Bytes::from(rgb.into_raw()),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Fetching
// ────────────────────────────────────────────────────────────────────────────

/// Source of raw image bytes. HTTP by default; tests substitute stubs.
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Bytes, ImageError>;
}

/// Fetches images over HTTP(S).
#[derive(Clone)]
pub struct HttpImageFetcher {
    client: Client,
}

impl HttpImageFetcher {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

impl Default for HttpImageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes, ImageError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let body = response.bytes().await?;
        if body.is_empty() {
            return Err(ImageError::EmptyBody(url.to_string()));
        }
        Ok(body)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Placer
// ────────────────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ImagePlacer {
    fetcher: Arc<dyn ImageFetcher>,
}

impl ImagePlacer {
    pub fn new(fetcher: Arc<dyn ImageFetcher>) -> Self {
        Self { fetcher }
    }

    /// Fetches and decodes `url` within `timeout`. Returns `None` on any failure.
    pub async fn resolve(&self, url: &str, timeout: Duration) -> Option<ResolvedImage> {
        match tokio::time::timeout(timeout, self.fetch_and_decode(url)).await {
            Ok(Ok(image)) => {
                debug!(url, width = image.width, height = image.height, "image resolved");
                Some(image)
            }
            Ok(Err(e)) => {
                warn!(url, error = %e, "image unavailable, continuing without it");
                None
            }
            Err(_) => {
                warn!(
                    url,
                    timeout_ms = timeout.as_millis() as u64,
                    "image timed out, continuing without it"
                );
                None
            }
        }
    }

    async fn fetch_and_decode(&self, url: &str) -> Result<ResolvedImage, ImageError> {
        let data = self.fetcher.fetch(url).await?;
        tokio::task::spawn_blocking(move || decode_image(&data))
            .await
            .map_err(|e| ImageError::Task(e.to_string()))?
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;

    /// Encodes a solid-colour PNG of the given size.
    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_pixel(width, height, image::Rgb([200, 40, 40]));
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    /// Blank image for layout tests that only care about dimensions.
    pub(crate) fn solid_image(width: u32, height: u32) -> ResolvedImage {
        ResolvedImage {
            width,
            height,
            pixels: Bytes::from(vec![255u8; (width * height * 3) as usize]),
        }
    }

    enum Stub {
        Bytes(Vec<u8>),
        Fail,
        Hang,
    }

    #[async_trait]
    impl ImageFetcher for Stub {
        async fn fetch(&self, url: &str) -> Result<Bytes, ImageError> {
            match self {
                Stub::Bytes(b) => Ok(Bytes::from(b.clone())),
                Stub::Fail => Err(ImageError::EmptyBody(url.to_string())),
                Stub::Hang => {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok(Bytes::new())
                }
            }
        }
    }

    fn placer(stub: Stub) -> ImagePlacer {
        ImagePlacer::new(Arc::new(stub))
    }

    // ── decode ──────────────────────────────────────────────────────────────

    #[test]
    fn test_decode_png_keeps_intrinsic_size() {
        let image = decode_image(&png_bytes(8, 5)).unwrap();
        assert_eq!((image.width, image.height), (8, 5));
        assert_eq!(image.pixels.len(), 8 * 5 * 3);
        assert_eq!(&image.pixels[..3], &[200, 40, 40]);
    }

    #[test]
    fn test_decode_garbage_is_error() {
        assert!(decode_image(b"definitely not a png").is_err());
    }

    #[test]
    fn test_fit_within_keeps_aspect_ratio() {
        // Landscape 4:3 into 35x26 is height-bound.
        let (w, h) = solid_image(400, 300).fit_within(35.0, 26.0);
        assert!((h - 26.0).abs() < 1e-4, "h = {h}");
        assert!((w - 26.0 * 4.0 / 3.0).abs() < 1e-3, "w = {w}");

        // Very wide image is width-bound.
        let (w, h) = solid_image(1000, 100).fit_within(35.0, 26.0);
        assert!((w - 35.0).abs() < 1e-4);
        assert!((h - 3.5).abs() < 1e-4);
    }

    // ── resolve ─────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_resolve_success() {
        let image = placer(Stub::Bytes(png_bytes(3, 2)))
            .resolve("https://img.test/a.png", Duration::from_secs(2))
            .await;
        assert_eq!(image.map(|i| (i.width, i.height)), Some((3, 2)));
    }

    #[tokio::test]
    async fn test_resolve_decode_failure_is_none() {
        let image = placer(Stub::Bytes(b"<html>404</html>".to_vec()))
            .resolve("https://img.test/a.png", Duration::from_secs(2))
            .await;
        assert!(image.is_none());
    }

    #[tokio::test]
    async fn test_resolve_fetch_failure_is_none() {
        let image = placer(Stub::Fail)
            .resolve("https://img.test/a.png", Duration::from_secs(2))
            .await;
        assert!(image.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resolve_timeout_is_none() {
        let started = tokio::time::Instant::now();
        let image = placer(Stub::Hang)
            .resolve("https://img.test/slow.png", Duration::from_millis(2000))
            .await;
        assert!(image.is_none());
        assert!(started.elapsed() < Duration::from_secs(60));
    }
}
