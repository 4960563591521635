//! Upload des pochettes optimisées vers l'API Imgur

use crate::error::{CoverError, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Endpoint d'upload anonyme de l'API Imgur v3
const IMGUR_UPLOAD_URL: &str = "https://api.imgur.com/3/image";

/// Timeout de l'upload (les images font au plus quelques mégaoctets)
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(15);

/// Client d'upload vers Imgur
pub struct ImgurUploader {
    client: reqwest::blocking::Client,
    client_id: String,
    endpoint: String,
}

impl ImgurUploader {
    /// Crée un uploader avec le Client-ID fourni
    ///
    /// Un Client-ID vide donne un uploader non configuré : `upload` échoue
    /// immédiatement et la chaîne de résolution passe au repli suivant.
    pub fn new(client_id: impl Into<String>) -> Result<Self> {
        Self::with_endpoint(client_id, IMGUR_UPLOAD_URL)
    }

    /// Crée un uploader pointant vers un endpoint alternatif (tests)
    pub fn with_endpoint(client_id: impl Into<String>, endpoint: impl Into<String>) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(UPLOAD_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            client_id: client_id.into(),
            endpoint: endpoint.into(),
        })
    }

    /// Vrai si un Client-ID est renseigné
    pub fn is_configured(&self) -> bool {
        !self.client_id.trim().is_empty()
    }

    /// Upload une image et retourne son URL publique
    pub fn upload(&self, image: &[u8]) -> Result<String> {
        if !self.is_configured() {
            return Err(CoverError::NoUploader);
        }

        debug!("Uploading {} bytes to Imgur", image.len());

        let encoded = BASE64.encode(image);
        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Client-ID {}", self.client_id))
            .form(&[("image", encoded.as_str())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(CoverError::UploadRejected(format!("HTTP {status}: {body}")));
        }

        let payload: Value = response.json()?;
        if payload.get("success").and_then(Value::as_bool) != Some(true) {
            return Err(CoverError::UploadRejected(
                "response did not report success".into(),
            ));
        }

        payload
            .pointer("/data/link")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| CoverError::UploadRejected("missing data.link in response".into()))
    }
}
