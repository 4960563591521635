//! Optimisation des pochettes avant upload
//!
//! Les pochettes servies par Navidrome peuvent être volumineuses (scans
//! haute résolution). Avant upload on les ramène aux dimensions configurées
//! et on les ré-encode en JPEG, puis on vérifie la limite de taille imposée
//! par l'hébergeur.

use crate::error::{CoverError, Result};
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use navconfig::ImageConfig;
use tracing::debug;

/// Redimensionne et ré-encode une image en JPEG selon la configuration
///
/// Le ratio d'aspect est préservé : l'image n'est réduite que si l'une de
/// ses dimensions dépasse `max_size`. Une image dont l'encodage optimisé
/// dépasse encore `max_file_bytes` est rejetée.
pub fn optimize(bytes: &[u8], config: &ImageConfig) -> Result<Vec<u8>> {
    let img = image::load_from_memory(bytes)?;

    let img = if img.width() > config.max_size || img.height() > config.max_size {
        let resized = img.resize(config.max_size, config.max_size, FilterType::Lanczos3);
        debug!(
            "Resized cover from {}x{} to {}x{}",
            img.width(),
            img.height(),
            resized.width(),
            resized.height()
        );
        resized
    } else {
        img
    };

    // Les JPEG ne portent pas d'alpha
    let rgb = img.to_rgb8();

    let mut buffer = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buffer, config.jpeg_quality);
    encoder.encode_image(&rgb)?;

    if buffer.len() > config.max_file_bytes {
        return Err(CoverError::TooLarge {
            size: buffer.len(),
            limit: config.max_file_bytes,
        });
    }

    debug!(
        "Optimized cover: {} bytes in, {} bytes out",
        bytes.len(),
        buffer.len()
    );
    Ok(buffer)
}
