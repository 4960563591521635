//! Structures de données pour la réponse `getNowPlaying`
//!
//! Navidrome renvoie le JSON Subsonic classique, avec ses à-peu-près
//! historiques : `entry` peut être un objet ou un tableau, la position est
//! tantôt en secondes tantôt en millisecondes, les artistes arrivent en une
//! seule chaîne aux séparateurs variables. Le parsing absorbe tout cela.

use serde_json::Value;

/// Clé d'identité d'une piste pour la détection de changement
///
/// L'identité est le tuple de métadonnées (titre, artistes, album, pochette)
/// plutôt que l'id transitoire de la file de lecture : deux entrées de queue
/// différentes pour la même piste ne déclenchent pas de republication.
pub type TrackKey = (String, String, String, String);

/// Piste en cours de lecture sur le serveur
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    /// Identifiant Subsonic de la piste
    pub id: String,
    /// Titre
    pub title: String,
    /// Artistes normalisés, joints par `", "`
    pub artists: String,
    /// Album
    pub album: String,
    /// Référence de la pochette (`coverArt`)
    pub cover_id: String,
    /// Durée en secondes, si connue et positive
    pub duration: Option<u32>,
    /// Position de lecture en secondes au moment du poll
    pub position: Option<f64>,
    /// Ancienneté de l'entrée now-playing en minutes, si fournie
    pub minutes_ago: Option<u32>,
}

impl Track {
    /// Construit une piste depuis l'objet `nowPlaying` de la réponse
    ///
    /// Retourne `None` quand rien ne joue ou que l'entrée est inutilisable.
    pub fn from_now_playing(now_playing: &Value) -> Option<Self> {
        let entry = now_playing.get("entry")?;

        // `entry` est un objet pour une seule lecture, un tableau sinon
        let entry = match entry {
            Value::Array(list) => list.first()?,
            value => value,
        };
        let entry = entry.as_object()?;

        let title = entry
            .get("title")
            .or_else(|| entry.get("name"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let raw_artists = entry
            .get("artist")
            .or_else(|| entry.get("artists"))
            .and_then(Value::as_str)
            .unwrap_or_default();

        let duration = entry
            .get("duration")
            .and_then(Value::as_u64)
            .filter(|d| *d > 0)
            .map(|d| d as u32);

        let position = entry
            .get("position")
            .or_else(|| entry.get("elapsed"))
            .and_then(parse_position);

        let minutes_ago = entry
            .get("minutesAgo")
            .and_then(Value::as_u64)
            .map(|m| m as u32);

        Some(Self {
            id: entry
                .get("id")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            title,
            artists: normalize_artists(raw_artists),
            album: entry
                .get("album")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            cover_id: entry
                .get("coverArt")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            duration,
            position,
            minutes_ago,
        })
    }

    /// Tuple d'identité utilisé par la boucle pour la détection de changement
    pub fn key(&self) -> TrackKey {
        (
            self.title.clone(),
            self.artists.clone(),
            self.album.clone(),
            self.cover_id.clone(),
        )
    }
}

/// Normalise la chaîne d'artistes : `;` vaut `,`, espaces nettoyés
fn normalize_artists(raw: &str) -> String {
    let joined = raw
        .replace(';', ",")
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    if joined.is_empty() {
        "Unknown".to_string()
    } else {
        joined
    }
}

/// Interprète la position en secondes, avec l'heuristique millisecondes
///
/// Certains serveurs renvoient la position en millisecondes : au-delà de
/// 100 000 on considère qu'aucune piste ne dure 27 heures et on divise.
fn parse_position(value: &Value) -> Option<f64> {
    let pos = value.as_f64()?;
    if pos < 0.0 {
        return None;
    }
    if pos > 100_000.0 {
        Some(pos / 1000.0)
    } else {
        Some(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_single_entry_object() {
        let now_playing = json!({
            "entry": {
                "id": "tr-1",
                "title": "So What",
                "artist": "Miles Davis",
                "album": "Kind of Blue",
                "coverArt": "al-2",
                "duration": 545,
                "position": 120,
                "minutesAgo": 0
            }
        });

        let track = Track::from_now_playing(&now_playing).unwrap();
        assert_eq!(track.id, "tr-1");
        assert_eq!(track.title, "So What");
        assert_eq!(track.artists, "Miles Davis");
        assert_eq!(track.duration, Some(545));
        assert_eq!(track.position, Some(120.0));
        assert_eq!(track.minutes_ago, Some(0));
    }

    #[test]
    fn entry_array_takes_first_element() {
        let now_playing = json!({
            "entry": [
                { "title": "First", "artist": "A", "album": "X", "coverArt": "c1" },
                { "title": "Second", "artist": "B", "album": "Y", "coverArt": "c2" }
            ]
        });

        let track = Track::from_now_playing(&now_playing).unwrap();
        assert_eq!(track.title, "First");
    }

    #[test]
    fn no_entry_means_no_track() {
        assert!(Track::from_now_playing(&json!({})).is_none());
        assert!(Track::from_now_playing(&json!({ "entry": [] })).is_none());
        assert!(Track::from_now_playing(&json!({ "entry": "garbage" })).is_none());
    }

    #[test]
    fn artists_are_normalized() {
        assert_eq!(normalize_artists("Miles Davis; John Coltrane"), "Miles Davis, John Coltrane");
        assert_eq!(normalize_artists(" A ,B,  "), "A, B");
        assert_eq!(normalize_artists(""), "Unknown");
    }

    #[test]
    fn millisecond_positions_are_converted() {
        assert_eq!(parse_position(&json!(154_000)), Some(154.0));
        assert_eq!(parse_position(&json!(154)), Some(154.0));
        assert_eq!(parse_position(&json!(-3)), None);
    }

    #[test]
    fn zero_duration_is_dropped() {
        let now_playing = json!({
            "entry": { "title": "T", "artist": "A", "album": "X", "coverArt": "c", "duration": 0 }
        });
        let track = Track::from_now_playing(&now_playing).unwrap();
        assert_eq!(track.duration, None);
    }

    #[test]
    fn key_ignores_transient_queue_id() {
        let make = |id: &str| {
            let now_playing = json!({
                "entry": { "id": id, "title": "T", "artist": "A", "album": "X", "coverArt": "c" }
            });
            Track::from_now_playing(&now_playing).unwrap()
        };
        assert_eq!(make("q-1").key(), make("q-2").key());
    }
}
