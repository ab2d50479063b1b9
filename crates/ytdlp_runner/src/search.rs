use serde::Deserialize;

/// Top level object printed by `--dump-single-json --flat-playlist`.
#[derive(Debug, Deserialize)]
pub struct FlatPlaylist {
    #[serde(default)]
    pub entries: Vec<FlatEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FlatEntry {
    pub id: String,
    pub url: Option<String>,
    pub title: Option<String>,
    /// Seconds; yt-dlp reports a float
    pub duration: Option<f64>,
    #[serde(alias = "uploader")]
    pub channel: Option<String>,
}

impl FlatEntry {
    pub fn duration_secs(&self) -> Option<u64> {
        self.duration
            .filter(|d| d.is_finite() && *d >= 0.0)
            .map(|d| d.round() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_playlist_from_music_search() {
        let json = r#"{
            "_type": "playlist",
            "id": "song a artist x",
            "entries": [
                {"_type": "url", "id": "abc123", "url": "https://music.youtube.com/watch?v=abc123",
                 "title": "Song A", "duration": 201.0, "channel": "Artist X"},
                {"_type": "url", "id": "def456", "url": null, "title": "Song A (Live)"}
            ]
        }"#;

        let playlist = serde_json::from_str::<FlatPlaylist>(json).unwrap();
        assert_eq!(playlist.entries.len(), 2);
        assert_eq!(playlist.entries[0].duration_secs(), Some(201));
        assert_eq!(playlist.entries[0].channel.as_deref(), Some("Artist X"));
        assert_eq!(playlist.entries[1].url, None);
        assert_eq!(playlist.entries[1].duration_secs(), None);
    }

    #[test]
    fn test_flat_playlist_without_entries() {
        let playlist = serde_json::from_str::<FlatPlaylist>(r#"{"_type": "playlist"}"#).unwrap();
        assert!(playlist.entries.is_empty());
    }
}
