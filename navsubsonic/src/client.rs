//! Client HTTP bloquant pour l'API Subsonic de Navidrome

use crate::error::{Result, SubsonicError};
use crate::models::Track;
use navconfig::NavidromeConfig;
use navcovers::CoverSource;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Version du protocole Subsonic annoncée au serveur
const SUBSONIC_API_VERSION: &str = "1.16.1";

/// Nom de client annoncé au serveur
const CLIENT_NAME: &str = "navrpc";

/// Timeout des appels de polling
const POLL_TIMEOUT: Duration = Duration::from_secs(5);

/// Timeout du téléchargement de pochettes
const COVER_TIMEOUT: Duration = Duration::from_secs(8);

/// Client Subsonic minimal : now-playing et pochettes
pub struct SubsonicClient {
    client: reqwest::blocking::Client,
    base_url: String,
    username: String,
    password: String,
}

impl SubsonicClient {
    /// Crée un client depuis la configuration Navidrome validée
    pub fn new(config: &NavidromeConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(POLL_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }

    /// Paramètres d'authentification joints à chaque requête
    fn auth_params(&self) -> [(&'static str, &str); 5] {
        [
            ("u", self.username.as_str()),
            ("p", self.password.as_str()),
            ("v", SUBSONIC_API_VERSION),
            ("c", CLIENT_NAME),
            ("f", "json"),
        ]
    }

    /// GET sur un endpoint, en réessayant avec le suffixe `.view`
    ///
    /// Les serveurs Subsonic historiques exposent `getNowPlaying.view` ;
    /// Navidrome accepte les deux mais on garde le repli par compatibilité.
    fn get_with_view_fallback(
        &self,
        endpoint: &str,
        extra: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<reqwest::blocking::Response> {
        match self.send(endpoint, extra, timeout) {
            Ok(response) => Ok(response),
            Err(e) => {
                debug!(endpoint, "Request failed ({}), retrying with .view suffix", e);
                self.send(&format!("{endpoint}.view"), extra, timeout)
            }
        }
    }

    fn send(
        &self,
        endpoint: &str,
        extra: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<reqwest::blocking::Response> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(&self.auth_params())
            .query(extra)
            .timeout(timeout)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubsonicError::from_status_code(
                status.as_u16(),
                status.canonical_reason().unwrap_or("HTTP error"),
            ));
        }
        Ok(response)
    }

    /// Récupère la piste en cours de lecture, en propageant les erreurs
    pub fn fetch_now_playing(&self) -> Result<Option<Track>> {
        let response = self.get_with_view_fallback("getNowPlaying", &[], POLL_TIMEOUT)?;
        let payload: Value = response.json()?;

        let envelope = payload
            .get("subsonic-response")
            .ok_or_else(|| SubsonicError::Malformed("missing subsonic-response envelope".into()))?;

        if envelope.get("status").and_then(Value::as_str) == Some("failed") {
            let code = envelope
                .pointer("/error/code")
                .and_then(Value::as_u64)
                .unwrap_or(0);
            let message = envelope
                .pointer("/error/message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(SubsonicError::Api { code, message });
        }

        let track = envelope
            .get("nowPlaying")
            .and_then(Track::from_now_playing);
        Ok(track)
    }

    /// Contrat de l'adaptateur pour la boucle de polling
    ///
    /// Toute erreur (transport, API, réponse malformée) est journalisée puis
    /// traitée comme "pas de piste" : la boucle réessaie au prochain tick.
    pub fn now_playing(&self) -> Option<Track> {
        match self.fetch_now_playing() {
            Ok(track) => track,
            Err(e) => {
                warn!("Navidrome now-playing request failed: {}", e);
                None
            }
        }
    }

    /// Télécharge les octets bruts d'une pochette
    pub fn cover_art(&self, cover_id: &str) -> Result<Vec<u8>> {
        let response =
            self.get_with_view_fallback("getCoverArt", &[("id", cover_id)], COVER_TIMEOUT)?;
        Ok(response.bytes()?.to_vec())
    }
}

impl CoverSource for SubsonicClient {
    fn fetch_cover(&self, cover_id: &str) -> anyhow::Result<Vec<u8>> {
        Ok(self.cover_art(cover_id)?)
    }
}
