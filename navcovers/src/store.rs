//! Cache disque simple pour les URLs de pochettes hébergées
//!
//! Ce module persiste la correspondance `album → URL Imgur` dans un fichier
//! JSON local, relu au démarrage du process et réécrit après chaque upload.
//! Le cache est volontairement non borné : quelques centaines d'albums
//! tiennent dans quelques kilooctets.

use crate::error::Result;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Correspondance persistée entre références de pochettes et URLs hébergées
#[derive(Debug)]
pub struct CoverStore {
    /// Fichier de persistance
    path: PathBuf,
    /// Entrées, triées pour une sérialisation stable
    entries: BTreeMap<String, String>,
}

impl CoverStore {
    /// Charge le cache depuis le fichier indiqué
    ///
    /// Un fichier absent donne un cache vide ; un fichier corrompu est
    /// signalé puis ignoré, on repart d'un cache vide.
    pub fn load<P: Into<PathBuf>>(path: P) -> Self {
        let path = path.into();

        let entries = match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(file = %path.display(), "Corrupt cover cache, starting fresh: {}", e);
                    BTreeMap::new()
                }
            },
            Err(_) => BTreeMap::new(),
        };

        debug!(file = %path.display(), entries = entries.len(), "Loaded cover cache");
        Self { path, entries }
    }

    /// Réécrit le fichier de cache complet
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json)?;
        debug!(file = %self.path.display(), "Saved cover cache");
        Ok(())
    }

    /// Retourne l'URL hébergée pour une référence, si connue
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Enregistre une nouvelle correspondance en mémoire
    ///
    /// L'appelant est responsable de `save()` pour la persistance.
    pub fn insert(&mut self, key: impl Into<String>, url: impl Into<String>) {
        self.entries.insert(key.into(), url.into());
    }

    /// Nombre d'entrées connues
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Vrai si le cache est vide
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Chemin du fichier de persistance
    pub fn path(&self) -> &Path {
        &self.path
    }
}
