//! Gestion des erreurs pour le client Subsonic

use thiserror::Error;

/// Type Result personnalisé pour navsubsonic
pub type Result<T> = std::result::Result<T, SubsonicError>;

/// Erreurs possibles lors d'un appel à l'API Subsonic
#[derive(Error, Debug)]
pub enum SubsonicError {
    /// Erreur d'authentification (credentials invalides)
    #[error("authentication failed: {0}")]
    Unauthorized(String),

    /// Erreur HTTP ou de transport
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Erreur remontée par l'API Subsonic elle-même
    #[error("Subsonic API error (code {code}): {message}")]
    Api { code: u64, message: String },

    /// Réponse sans la structure attendue
    #[error("malformed Subsonic response: {0}")]
    Malformed(String),
}

impl SubsonicError {
    /// Crée une erreur depuis un code de statut HTTP et un message
    pub fn from_status_code(code: u16, message: impl Into<String>) -> Self {
        match code {
            401 | 403 => Self::Unauthorized(message.into()),
            _ => Self::Api {
                code: code as u64,
                message: message.into(),
            },
        }
    }
}
