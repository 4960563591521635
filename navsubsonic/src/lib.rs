//! # navsubsonic - Client Subsonic minimal pour NavRPC
//!
//! Cette crate interroge l'API Subsonic d'un serveur Navidrome pour deux
//! opérations seulement : la piste en cours de lecture (`getNowPlaying`) et
//! le téléchargement de pochettes (`getCoverArt`).
//!
//! Le contrat du client est pensé pour une boucle de polling résiliente :
//! [`SubsonicClient::now_playing`] convertit toute erreur de transport ou de
//! parsing en "pas de piste" après journalisation, la boucle réessaie
//! naturellement à l'itération suivante.

pub mod client;
pub mod error;
pub mod models;

pub use client::SubsonicClient;
pub use error::{Result, SubsonicError};
pub use models::{Track, TrackKey};
