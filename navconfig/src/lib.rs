//! # navconfig - Configuration typée pour NavRPC
//!
//! Cette crate charge la configuration YAML de NavRPC dans des structures
//! typées, validées une seule fois au démarrage. Les composants reçoivent
//! ensuite une référence vers la valeur validée : aucune relecture dynamique
//! en cours d'exécution.
//!
//! Le fichier `config.yaml` est recherché dans l'ordre suivant :
//! 1. Le chemin explicite fourni en argument
//! 2. La variable d'environnement `NAVRPC_CONFIG`
//! 3. `config.yaml` dans le répertoire courant
//! 4. `~/.config/navrpc/config.yaml`
//!
//! ## Usage
//!
//! ```no_run
//! use navconfig::Settings;
//!
//! let settings = Settings::load_default(None)?;
//! println!("Polling {} every {:?}", settings.navidrome.base_url, settings.poll_interval());
//! # Ok::<(), navconfig::ConfigError>(())
//! ```

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

/// Type Result personnalisé pour navconfig
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Erreurs possibles lors du chargement de la configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Fichier de configuration introuvable
    #[error(
        "configuration file not found at {0}; copy config.yaml.example to config.yaml and fill it in"
    )]
    NotFound(PathBuf),

    /// Erreur d'entrée/sortie
    #[error("I/O error while reading configuration: {0}")]
    Io(#[from] std::io::Error),

    /// YAML invalide ou clé requise manquante
    #[error("malformed configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// Valeur présente mais invalide
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Variable d'environnement pointant vers le fichier de configuration
const ENV_CONFIG_FILE: &str = "NAVRPC_CONFIG";

/// Nom du fichier de configuration
const CONFIG_FILE_NAME: &str = "config.yaml";

fn default_max_size() -> u32 {
    512
}

fn default_jpeg_quality() -> u8 {
    85
}

fn default_max_file_bytes() -> usize {
    4 * 1024 * 1024
}

fn default_poll_interval() -> u64 {
    5
}

fn default_cache_file() -> String {
    "cover_cache.json".to_string()
}

/// Connexion au serveur Navidrome
#[derive(Debug, Clone, Deserialize)]
pub struct NavidromeConfig {
    /// URL de base de l'API Subsonic (ex: `https://music.example.com/rest`)
    pub base_url: String,
    /// Nom d'utilisateur Navidrome
    pub username: String,
    /// Mot de passe Navidrome
    pub password: String,
}

/// Identifiants des services externes
#[derive(Debug, Clone, Deserialize)]
pub struct IntegrationConfig {
    /// Client-ID Imgur pour l'hébergement des pochettes (vide = pas d'upload)
    #[serde(default)]
    pub imgur_client_id: String,
    /// Application ID Discord pour le Rich Presence
    pub discord_client_id: String,
    /// Nom d'asset Discord statique utilisé quand l'upload échoue
    #[serde(default)]
    pub discord_asset_name: Option<String>,
}

/// Paramètres d'optimisation des images
#[derive(Debug, Clone, Deserialize)]
pub struct ImageConfig {
    /// Dimension maximale (largeur ou hauteur) en pixels
    #[serde(default = "default_max_size")]
    pub max_size: u32,
    /// Qualité JPEG (1-100)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    /// Taille maximale du fichier optimisé en octets
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: usize,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_size(),
            jpeg_quality: default_jpeg_quality(),
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

/// Paramètres généraux de la boucle de polling
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Intervalle entre deux interrogations de Navidrome, en secondes
    #[serde(default = "default_poll_interval")]
    pub poll_interval_seconds: u64,
    /// Fichier de cache pochette → URL, relatif au répertoire de configuration
    #[serde(default = "default_cache_file")]
    pub cache_file: String,
    /// Supprime les fragments entre parenthèses/crochets en fin de titre
    #[serde(default)]
    pub strip_title_suffixes: bool,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            poll_interval_seconds: default_poll_interval(),
            cache_file: default_cache_file(),
            strip_title_suffixes: false,
        }
    }
}

/// Configuration complète de NavRPC, validée au démarrage
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub navidrome: NavidromeConfig,
    pub integration: IntegrationConfig,
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub general: GeneralConfig,

    /// Répertoire contenant le fichier de configuration chargé
    #[serde(skip)]
    config_dir: PathBuf,
}

impl Settings {
    /// Recherche le fichier de configuration selon l'ordre documenté
    fn find_config_file(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }

        if let Ok(env_path) = env::var(ENV_CONFIG_FILE) {
            info!(env_var = ENV_CONFIG_FILE, path = %env_path, "Using config file from env");
            return PathBuf::from(env_path);
        }

        let local = PathBuf::from(CONFIG_FILE_NAME);
        if local.exists() {
            return local;
        }

        if let Some(config_home) = dirs::config_dir() {
            let user_config = config_home.join("navrpc").join(CONFIG_FILE_NAME);
            if user_config.exists() {
                return user_config;
            }
        }

        local
    }

    /// Charge la configuration en appliquant l'ordre de recherche standard
    ///
    /// # Arguments
    ///
    /// * `explicit` - Chemin explicite vers le fichier, ou `None` pour la recherche automatique
    pub fn load_default(explicit: Option<&Path>) -> Result<Self> {
        let path = Self::find_config_file(explicit);
        Self::load(&path)
    }

    /// Charge et valide la configuration depuis un fichier précis
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let yaml = fs::read_to_string(path)?;
        let mut settings: Settings = serde_yaml::from_str(&yaml)?;

        settings.config_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        settings.normalize();
        settings.validate()?;

        info!(config_file = %path.display(), "Loaded configuration");
        Ok(settings)
    }

    /// Parse et valide une configuration depuis une chaîne YAML
    ///
    /// Le fichier de cache est alors résolu par rapport au répertoire courant.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let mut settings: Settings = serde_yaml::from_str(yaml)?;
        settings.config_dir = PathBuf::from(".");
        settings.normalize();
        settings.validate()?;
        Ok(settings)
    }

    /// Normalisations sans perte : espaces et `/` final de l'URL de base
    fn normalize(&mut self) {
        let trimmed = self.navidrome.base_url.trim().trim_end_matches('/');
        self.navidrome.base_url = trimmed.to_string();
    }

    /// Valide les invariants que la désérialisation ne couvre pas
    fn validate(&self) -> Result<()> {
        if self.navidrome.base_url.is_empty() {
            return Err(ConfigError::Invalid("navidrome.base_url is empty".into()));
        }
        if !self.navidrome.base_url.starts_with("http://")
            && !self.navidrome.base_url.starts_with("https://")
        {
            return Err(ConfigError::Invalid(format!(
                "navidrome.base_url must start with http:// or https:// (got '{}')",
                self.navidrome.base_url
            )));
        }
        if self.navidrome.username.is_empty() {
            return Err(ConfigError::Invalid("navidrome.username is empty".into()));
        }
        if self.integration.discord_client_id.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "integration.discord_client_id is empty".into(),
            ));
        }
        if self.general.poll_interval_seconds == 0 {
            return Err(ConfigError::Invalid(
                "general.poll_interval_seconds must be at least 1".into(),
            ));
        }
        if self.image.jpeg_quality == 0 || self.image.jpeg_quality > 100 {
            return Err(ConfigError::Invalid(format!(
                "image.jpeg_quality must be between 1 and 100 (got {})",
                self.image.jpeg_quality
            )));
        }
        if self.image.max_size == 0 {
            return Err(ConfigError::Invalid("image.max_size must be positive".into()));
        }
        Ok(())
    }

    /// Intervalle de polling sous forme de `Duration`
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.general.poll_interval_seconds)
    }

    /// Chemin absolu ou relatif résolu du fichier de cache des pochettes
    ///
    /// Un chemin relatif est résolu par rapport au répertoire du fichier de
    /// configuration, comme les répertoires gérés du reste de l'écosystème.
    pub fn cache_file_path(&self) -> PathBuf {
        let path = Path::new(&self.general.cache_file);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.config_dir.join(path)
        }
    }
}
