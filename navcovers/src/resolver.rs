//! Chaîne de résolution ordonnée d'une pochette vers une image affichable
//!
//! La résolution suit une séquence explicite de stratégies, chacune passant
//! la main à la suivante en cas d'échec :
//!
//! 1. cache disque (aucun appel réseau sur un hit) ;
//! 2. téléchargement + optimisation + upload Imgur, avec mise en cache ;
//! 3. asset statique configuré côté Discord ;
//! 4. aucune image.

use crate::error::{CoverError, Result};
use crate::imgur::ImgurUploader;
use crate::optimize::optimize;
use crate::store::CoverStore;
use navconfig::ImageConfig;
use tracing::{debug, info, warn};

/// Source capable de fournir les octets bruts d'une pochette
///
/// Implémentée par le client Navidrome ; le trait isole la résolution du
/// transport pour les tests.
pub trait CoverSource {
    /// Télécharge les octets bruts de la pochette identifiée par `cover_id`
    fn fetch_cover(&self, cover_id: &str) -> anyhow::Result<Vec<u8>>;
}

impl<T: CoverSource + ?Sized> CoverSource for &T {
    fn fetch_cover(&self, cover_id: &str) -> anyhow::Result<Vec<u8>> {
        (**self).fetch_cover(cover_id)
    }
}

/// Résolveur de pochettes : cache → upload → asset statique
pub struct CoverResolver<S> {
    source: S,
    store: CoverStore,
    uploader: ImgurUploader,
    image: ImageConfig,
    fallback_asset: Option<String>,
}

impl<S: CoverSource> CoverResolver<S> {
    /// Assemble la chaîne de résolution
    pub fn new(
        source: S,
        store: CoverStore,
        uploader: ImgurUploader,
        image: ImageConfig,
        fallback_asset: Option<String>,
    ) -> Self {
        Self {
            source,
            store,
            uploader,
            image,
            fallback_asset,
        }
    }

    /// Résout la pochette d'un album vers une URL ou un nom d'asset
    ///
    /// Ne retourne jamais d'erreur : chaque échec est journalisé et la
    /// stratégie suivante prend le relais. `None` signifie "pas d'image".
    pub fn resolve(&mut self, album: &str, cover_id: &str) -> Option<String> {
        if album.is_empty() || cover_id.is_empty() {
            debug!("Track has no album or cover id, using fallback asset");
            return self.fallback();
        }

        if let Some(url) = self.store.get(album) {
            debug!(album, "Cover cache hit");
            return Some(url.to_string());
        }

        match self.upload_new(album, cover_id) {
            Ok(url) => Some(url),
            Err(e) => {
                warn!(album, "Cover resolution failed: {}", e);
                self.fallback()
            }
        }
    }

    /// Stratégie de miss : téléchargement, optimisation, upload, mise en cache
    fn upload_new(&mut self, album: &str, cover_id: &str) -> Result<String> {
        if !self.uploader.is_configured() {
            return Err(CoverError::NoUploader);
        }

        let bytes = self.source.fetch_cover(cover_id)?;
        debug!(album, "Downloaded cover ({} bytes)", bytes.len());

        let optimized = optimize(&bytes, &self.image)?;
        let url = self.uploader.upload(&optimized)?;

        self.store.insert(album, &url);
        if let Err(e) = self.store.save() {
            // Le cache reste valable en mémoire pour la durée du process
            warn!("Failed to persist cover cache: {}", e);
        }

        info!(album, url = %url, "Uploaded and cached cover");
        Ok(url)
    }

    fn fallback(&self) -> Option<String> {
        self.fallback_asset.clone()
    }

    /// Accès en lecture au cache sous-jacent
    pub fn store(&self) -> &CoverStore {
        &self.store
    }
}
