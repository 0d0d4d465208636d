//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use image::codecs::jpeg::JpegEncoder;
use image::{GenericImageView, ImageFormat, Rgb, RgbImage};
use shrinkfs::cache::{JpegTranscoder, TranscodeError, Transcoder};
use shrinkfs::log::{Logger, NoOpLogger};
use shrinkfs::service::{ServiceConfig, ShrinkService};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Encode a `width` x `height` gradient as JPEG. `seed` varies the content.
pub fn jpeg_bytes(width: u32, height: u32, seed: u8) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x % 256) as u8,
            (y % 256) as u8,
            seed.wrapping_add(((x + y) % 256) as u8),
        ])
    });
    let mut out = Vec::new();
    JpegEncoder::new_with_quality(&mut out, 90)
        .encode_image(&img)
        .unwrap();
    out
}

pub fn write_file(root: &Path, rel: &str, data: &[u8]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, data).unwrap();
}

pub fn write_jpeg(root: &Path, rel: &str, width: u32, height: u32, seed: u8) -> Vec<u8> {
    let data = jpeg_bytes(width, height, seed);
    write_file(root, rel, &data);
    data
}

/// Decode JPEG bytes and return their dimensions.
pub fn jpeg_dimensions(data: &[u8]) -> (u32, u32) {
    image::load_from_memory_with_format(data, ImageFormat::Jpeg)
        .unwrap()
        .dimensions()
}

/// Production transcoder that counts how often it runs.
pub struct CountingTranscoder {
    inner: JpegTranscoder,
    pub calls: AtomicUsize,
}

impl CountingTranscoder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: JpegTranscoder::new(),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Transcoder for CountingTranscoder {
    fn transcode(&self, source: &[u8]) -> Result<Vec<u8>, TranscodeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.transcode(source)
    }

    fn name(&self) -> &str {
        "counting-jpeg"
    }
}

pub fn logger() -> Arc<dyn Logger> {
    Arc::new(NoOpLogger)
}

pub fn service(source: &Path, cache: &Path, transcoder: Arc<CountingTranscoder>) -> ShrinkService {
    let config = ServiceConfig::builder()
        .source(source)
        .cache_directory(cache)
        .workers(4)
        .build()
        .unwrap();
    ShrinkService::with_transcoder(config, transcoder, logger())
}
