//! Publication de la présence vers Discord via la socket IPC locale
//!
//! Le trait [`PresencePublisher`] isole la boucle du transport : les tests
//! enregistrent les appels, le binaire parle au client Discord de la
//! machine. Publication et effacement sont volontairement fire-and-forget,
//! le prochain tick de polling fait office de retry.

use crate::status::PresenceFields;
use discord_rich_presence::activity::{Activity, ActivityType, Assets, Timestamps};
use discord_rich_presence::{DiscordIpc, DiscordIpcClient};
use thiserror::Error;
use tracing::{debug, info};

/// Type Result personnalisé pour la publication de présence
pub type Result<T> = std::result::Result<T, PresenceError>;

/// Erreurs possibles lors d'un échange avec Discord
#[derive(Error, Debug)]
pub enum PresenceError {
    /// Échec de l'IPC Discord (socket absente, handshake, écriture)
    #[error("Discord IPC error: {0}")]
    Ipc(String),
}

fn ipc_err(e: impl std::fmt::Display) -> PresenceError {
    PresenceError::Ipc(e.to_string())
}

/// Cible de publication d'une présence
pub trait PresencePublisher {
    /// Publie un payload de présence complet
    fn publish(&mut self, fields: &PresenceFields) -> Result<()>;

    /// Efface la présence publiée
    fn clear(&mut self) -> Result<()>;
}

/// Publication vers le client Discord local
pub struct DiscordPresence {
    client: DiscordIpcClient,
}

impl DiscordPresence {
    /// Se connecte à la socket IPC du client Discord
    ///
    /// L'échec ici est fatal au démarrage : sans client Discord il n'y a
    /// rien à mettre à jour.
    pub fn connect(client_id: &str) -> Result<Self> {
        let mut client = DiscordIpcClient::new(client_id).map_err(ipc_err)?;
        client.connect().map_err(ipc_err)?;
        info!("Connected to Discord RPC");
        Ok(Self { client })
    }
}

impl PresencePublisher for DiscordPresence {
    fn publish(&mut self, fields: &PresenceFields) -> Result<()> {
        let mut assets = Assets::new().large_text(&fields.large_text);
        if let Some(image) = &fields.large_image {
            assets = assets.large_image(image);
        }

        let mut activity = Activity::new()
            .activity_type(ActivityType::Listening)
            .details(&fields.details)
            .state(&fields.state)
            .assets(assets);

        if let (Some(start), Some(end)) = (fields.start, fields.end) {
            activity = activity.timestamps(Timestamps::new().start(start).end(end));
        }

        self.client.set_activity(activity).map_err(ipc_err)?;
        debug!(details = %fields.details, "Presence updated");
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.client.clear_activity().map_err(ipc_err)
    }
}

impl Drop for DiscordPresence {
    fn drop(&mut self) {
        // Efface la présence avant de fermer la socket, comme à l'arrêt normal
        let _ = self.client.clear_activity();
        let _ = self.client.close();
    }
}
