//! Conversion d'une piste en champs de présence Discord
//!
//! Les timestamps sont recalculés à chaque changement de piste détecté :
//! `start = now - position écoulée`, `end = start + durée`. Discord anime
//! ensuite la barre de progression tout seul, sans republication.

use navsubsonic::Track;
use once_cell::sync::Lazy;
use regex::Regex;

/// Texte affiché quand la piste ne porte pas d'album
const DEFAULT_LARGE_TEXT: &str = "Navidrome";

/// Décalage supposé quand le serveur ne fournit aucune position (secondes)
const ASSUMED_ELAPSED_SECS: i64 = 3;

/// Fragment final entre parenthèses ou crochets, espaces compris
static TITLE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[(\[][^()\[\]]*[)\]]\s*$").expect("title suffix regex"));

/// Champs du payload de présence, prêts pour la publication
#[derive(Debug, Clone, PartialEq)]
pub struct PresenceFields {
    /// Première ligne : le titre
    pub details: String,
    /// Deuxième ligne : les artistes
    pub state: String,
    /// Texte au survol de la grande image
    pub large_text: String,
    /// URL hébergée ou nom d'asset statique, si résolue
    pub large_image: Option<String>,
    /// Timestamp unix de début de lecture
    pub start: Option<i64>,
    /// Timestamp unix de fin de lecture
    pub end: Option<i64>,
}

/// Construit les champs de présence pour une piste
///
/// `now` est le timestamp unix courant ; il borne les timestamps calculés
/// de sorte que `start <= now <= end` dès qu'une durée est connue.
pub fn format_presence(
    track: &Track,
    cover: Option<String>,
    now: i64,
    strip_titles: bool,
) -> PresenceFields {
    let details = if strip_titles {
        clean_title(&track.title)
    } else {
        track.title.clone()
    };

    let large_text = if track.album.is_empty() {
        DEFAULT_LARGE_TEXT.to_string()
    } else {
        track.album.clone()
    };

    let (start, end) = timestamps(track, now);

    PresenceFields {
        details,
        state: track.artists.clone(),
        large_text,
        large_image: cover,
        start,
        end,
    }
}

/// Calcule les timestamps de début et fin de lecture
///
/// Sans durée connue, pas de timestamps. L'estimation du début suit les
/// indices disponibles par ordre de fiabilité : `minutesAgo`, puis la
/// position rapportée, puis un petit décalage forfaitaire.
fn timestamps(track: &Track, now: i64) -> (Option<i64>, Option<i64>) {
    let Some(duration) = track.duration else {
        return (None, None);
    };
    let duration = i64::from(duration);

    let estimated = if let Some(minutes) = track.minutes_ago {
        now - i64::from(minutes) * 60
    } else if let Some(position) = track.position {
        now - position.round() as i64
    } else {
        now - ASSUMED_ELAPSED_SECS
    };

    // Garde now dans [start, end] même si l'estimation déborde
    let start = estimated.clamp(now - duration, now);
    (Some(start), Some(start + duration))
}

/// Retire les fragments de sous-titre en fin de titre
///
/// `"Song (Remastered 2011) [Live]"` devient `"Song"`. Un titre qui ne
/// serait plus que parenthèses reste intact.
pub fn clean_title(title: &str) -> String {
    let mut current = title.trim().to_string();
    loop {
        let stripped = TITLE_SUFFIX.replace(&current, "").trim_end().to_string();
        if stripped.is_empty() || stripped == current {
            return current;
        }
        current = stripped;
    }
}
