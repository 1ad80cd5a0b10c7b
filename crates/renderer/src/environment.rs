//! Environment texture loading.
//!
//! The glass scenes sample an equirectangular HDR environment fetched over
//! HTTP; the bubble samples a six-face cubemap from a local directory. Both
//! are one-shot loads that complete off the frame loop and get uploaded on
//! the tick after they arrive; until then the shaders see a neutral
//! placeholder, which is tolerated rather than treated as an error.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use crossbeam_channel::{bounded, Receiver};
use image::GenericImageView;
use thiserror::Error;
use tracing::{debug, warn};

/// Face stems expected inside a cubemap directory.
pub const CUBEMAP_FACE_STEMS: [&str; 6] = ["posx", "negx", "posy", "negy", "posz", "negz"];

const FACE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("failed to fetch environment map from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("failed to decode environment image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("cubemap face '{stem}' missing in {}", directory.display())]
    MissingFace { stem: &'static str, directory: PathBuf },
    #[error("cubemap face {} is {width}x{height}, faces must be square", path.display())]
    NotSquare { path: PathBuf, width: u32, height: u32 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Decoded equirectangular environment, RGBA f32 scanlines.
pub struct EquirectImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<f32>,
}

/// Decoded cubemap: six square RGBA8 layers in face-stem order.
#[derive(Debug)]
pub struct CubemapImage {
    pub face_size: u32,
    pub layers: Vec<u8>,
}

fn decode_equirect(bytes: &[u8]) -> Result<EquirectImage, EnvironmentError> {
    let image = image::load_from_memory(bytes)?;
    let (width, height) = image.dimensions();
    let pixels = image.to_rgba32f().into_raw();
    Ok(EquirectImage { width, height, pixels })
}

/// Fetches and decodes the environment map, keeping a byte-for-byte copy in
/// `cache_path` so later runs skip the network entirely.
pub fn fetch_equirect(url: &str, cache_path: &Path) -> Result<EquirectImage, EnvironmentError> {
    if let Ok(bytes) = fs::read(cache_path) {
        debug!(path = %cache_path.display(), "using cached environment map");
        match decode_equirect(&bytes) {
            Ok(image) => return Ok(image),
            Err(error) => {
                warn!(error = %error, "cached environment map is corrupt; refetching");
            }
        }
    }

    debug!(url, "fetching environment map");
    let response = reqwest::blocking::get(url)
        .and_then(|response| response.error_for_status())
        .map_err(|source| EnvironmentError::Fetch { url: url.to_string(), source })?;
    let bytes = response
        .bytes()
        .map_err(|source| EnvironmentError::Fetch { url: url.to_string(), source })?;

    if let Some(parent) = cache_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(cache_path, &bytes)?;
    decode_equirect(&bytes)
}

fn find_face(directory: &Path, stem: &str) -> Option<PathBuf> {
    FACE_EXTENSIONS
        .iter()
        .map(|ext| directory.join(format!("{stem}.{ext}")))
        .find(|candidate| candidate.exists())
}

/// Loads the six cubemap faces from `directory`.
pub fn load_cubemap(directory: &Path) -> Result<CubemapImage, EnvironmentError> {
    let mut layers = Vec::new();
    let mut face_size = 0u32;
    for stem in CUBEMAP_FACE_STEMS {
        let path = find_face(directory, stem).ok_or(EnvironmentError::MissingFace {
            stem,
            directory: directory.to_path_buf(),
        })?;
        let image = image::open(&path)?;
        let (width, height) = image.dimensions();
        if width != height {
            return Err(EnvironmentError::NotSquare { path, width, height });
        }
        if face_size == 0 {
            face_size = width;
            layers.reserve((width * height * 4 * 6) as usize);
        } else if width != face_size {
            return Err(EnvironmentError::NotSquare { path, width, height: face_size });
        }
        layers.extend_from_slice(&image.to_rgba8());
    }
    Ok(CubemapImage { face_size, layers })
}

/// One-shot background load of the equirectangular environment.
///
/// The result lands in a bounded channel the frame loop polls each tick.
/// Until it arrives the affected texture binding keeps its placeholder; a
/// failed load is logged by the consumer and the placeholder simply stays.
pub struct EquirectLoader {
    receiver: Receiver<Result<EquirectImage, EnvironmentError>>,
}

impl EquirectLoader {
    pub fn spawn(url: String, cache_path: PathBuf) -> Self {
        let (sender, receiver) = bounded(1);
        thread::Builder::new()
            .name("environment-loader".into())
            .spawn(move || {
                let _ = sender.send(fetch_equirect(&url, &cache_path));
            })
            .expect("spawning the environment loader thread");
        Self { receiver }
    }

    /// Non-blocking; `Some` exactly once, when the load completes.
    pub fn poll(&self) -> Option<Result<EquirectImage, EnvironmentError>> {
        self.receiver.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_cubemap_face_is_reported_by_stem() {
        let dir = tempfile::tempdir().unwrap();
        let error = load_cubemap(dir.path()).unwrap_err();
        match error {
            EnvironmentError::MissingFace { stem, .. } => assert_eq!(stem, "posx"),
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn non_square_face_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        for stem in CUBEMAP_FACE_STEMS {
            let image = image::RgbaImage::new(8, if stem == "posy" { 4 } else { 8 });
            image.save(dir.path().join(format!("{stem}.png"))).unwrap();
        }
        let error = load_cubemap(dir.path()).unwrap_err();
        assert!(matches!(error, EnvironmentError::NotSquare { .. }));
    }

    #[test]
    fn cubemap_layers_are_packed_in_face_order() {
        let dir = tempfile::tempdir().unwrap();
        for (index, stem) in CUBEMAP_FACE_STEMS.iter().enumerate() {
            let mut image = image::RgbaImage::new(2, 2);
            for pixel in image.pixels_mut() {
                *pixel = image::Rgba([index as u8 * 40, 0, 0, 255]);
            }
            image.save(dir.path().join(format!("{stem}.png"))).unwrap();
        }
        let cubemap = load_cubemap(dir.path()).unwrap();
        assert_eq!(cubemap.face_size, 2);
        assert_eq!(cubemap.layers.len(), 2 * 2 * 4 * 6);
        for face in 0..6 {
            let offset = face * 2 * 2 * 4;
            assert_eq!(cubemap.layers[offset], face as u8 * 40);
        }
    }
}
