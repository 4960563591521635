//! Gestion des erreurs pour le pipeline de pochettes

use thiserror::Error;

/// Type Result personnalisé pour navcovers
pub type Result<T> = std::result::Result<T, CoverError>;

/// Erreurs possibles lors de la résolution d'une pochette
#[derive(Error, Debug)]
pub enum CoverError {
    /// Erreur HTTP lors de l'upload
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Réponse Imgur illisible
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Erreur d'entrée/sortie sur le fichier de cache
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Erreur de décodage ou d'encodage d'image
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// L'image optimisée dépasse encore la limite configurée
    #[error("optimized image is still too large ({size} bytes, limit {limit})")]
    TooLarge { size: usize, limit: usize },

    /// L'hébergeur d'images a refusé l'upload
    #[error("upload rejected: {0}")]
    UploadRejected(String),

    /// Aucun Client-ID Imgur configuré
    #[error("no Imgur client id configured, skipping upload")]
    NoUploader,

    /// Erreur remontée par la source de pochettes (Navidrome)
    #[error("cover source error: {0}")]
    Source(#[from] anyhow::Error),
}
