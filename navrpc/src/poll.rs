//! Boucle de polling : détection de changement de piste et publication
//!
//! La boucle est mono-thread et synchrone ; chaque itération reçoit l'état
//! précédent et retourne le suivant, sans état global. Les erreurs de
//! chaque étape sont journalisées et l'itération suivante réessaie
//! naturellement.

use crate::presence::PresencePublisher;
use crate::status::format_presence;
use navcovers::{CoverResolver, CoverSource};
use navsubsonic::{SubsonicClient, Track, TrackKey};
use std::thread;
use std::time::Duration;
use tracing::{info, warn};

/// Source de la piste en cours de lecture
pub trait TrackSource {
    /// Retourne la piste en cours, ou `None` si rien ne joue
    fn now_playing(&self) -> Option<Track>;
}

impl TrackSource for SubsonicClient {
    fn now_playing(&self) -> Option<Track> {
        SubsonicClient::now_playing(self)
    }
}

impl<T: TrackSource + ?Sized> TrackSource for &T {
    fn now_playing(&self) -> Option<Track> {
        (**self).now_playing()
    }
}

/// Résolution d'une pochette vers une image affichable
pub trait CoverResolve {
    /// Retourne une URL hébergée ou un nom d'asset, ou `None` sans image
    fn resolve_cover(&mut self, track: &Track) -> Option<String>;
}

impl<S: CoverSource> CoverResolve for CoverResolver<S> {
    fn resolve_cover(&mut self, track: &Track) -> Option<String> {
        self.resolve(&track.album, &track.cover_id)
    }
}

/// État de la boucle entre deux itérations
///
/// Invariant : `last_key` est `Some` exactement quand une présence est
/// publiée côté Discord.
#[derive(Debug, Default)]
pub struct PollState {
    last_key: Option<TrackKey>,
}

impl PollState {
    /// Vrai si une présence est actuellement publiée
    pub fn is_publishing(&self) -> bool {
        self.last_key.is_some()
    }
}

/// Exécute une itération de la boucle
///
/// Publie quand l'identité de la piste change, efface quand la lecture
/// s'arrête, ne fait rien quand la même piste persiste. En cas d'échec de
/// publication ou d'effacement, l'état précédent est conservé pour que le
/// tick suivant retente l'opération.
pub fn poll_once<S, C, P>(
    source: &S,
    covers: &mut C,
    publisher: &mut P,
    state: PollState,
    now: i64,
    strip_titles: bool,
) -> PollState
where
    S: TrackSource,
    C: CoverResolve,
    P: PresencePublisher,
{
    let Some(track) = source.now_playing() else {
        if state.is_publishing() {
            match publisher.clear() {
                Ok(()) => {
                    info!("No track playing, cleared presence");
                    return PollState::default();
                }
                Err(e) => {
                    warn!("Failed to clear presence: {}", e);
                    return state;
                }
            }
        }
        return state;
    };

    let key = track.key();
    if state.last_key.as_ref() == Some(&key) {
        // Même piste qu'au tick précédent, rien à faire
        return state;
    }

    info!(track_id = %track.id, "Now playing: {} - {}", track.artists, track.title);

    let cover = covers.resolve_cover(&track);
    let fields = format_presence(&track, cover, now, strip_titles);

    match publisher.publish(&fields) {
        Ok(()) => PollState {
            last_key: Some(key),
        },
        Err(e) => {
            warn!("Failed to update presence: {}", e);
            state
        }
    }
}

/// La boucle complète, assemblée depuis les composants du workspace
pub struct PollLoop<S, C, P> {
    source: S,
    covers: C,
    publisher: P,
    strip_titles: bool,
}

impl<S, C, P> PollLoop<S, C, P>
where
    S: TrackSource,
    C: CoverResolve,
    P: PresencePublisher,
{
    pub fn new(source: S, covers: C, publisher: P, strip_titles: bool) -> Self {
        Self {
            source,
            covers,
            publisher,
            strip_titles,
        }
    }

    /// Tourne indéfiniment au rythme de `interval`
    ///
    /// L'arrêt est au niveau du process (signal externe) ; chaque appel HTTP
    /// se termine ou expire avant l'itération suivante.
    pub fn run(mut self, interval: Duration) {
        let mut state = PollState::default();
        loop {
            let now = chrono::Utc::now().timestamp();
            state = poll_once(
                &self.source,
                &mut self.covers,
                &mut self.publisher,
                state,
                now,
                self.strip_titles,
            );
            thread::sleep(interval);
        }
    }
}
