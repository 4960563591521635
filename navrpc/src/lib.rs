//! # navrpc - Miroir Navidrome → Discord Rich Presence
//!
//! Le binaire assemble les crates du workspace autour d'une boucle de
//! polling mono-thread :
//!
//! - [`poll`] : la boucle elle-même, avec détection de changement de piste
//!   et suppression des mises à jour redondantes ;
//! - [`status`] : conversion d'une piste en champs de présence Discord
//!   (timestamps de début/fin, nettoyage optionnel des titres) ;
//! - [`presence`] : publication vers Discord via la socket IPC locale.
//!
//! Les accès à Navidrome et à Imgur vivent dans `navsubsonic` et
//! `navcovers` ; la configuration typée dans `navconfig`.

pub mod poll;
pub mod presence;
pub mod status;

pub use poll::{CoverResolve, PollLoop, PollState, TrackSource, poll_once};
pub use presence::{DiscordPresence, PresenceError, PresencePublisher};
pub use status::{PresenceFields, clean_title, format_presence};
