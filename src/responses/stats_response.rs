use std::collections::HashSet;

use serde::Serialize;

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub(crate) total_songs: u64,
    pub(crate) total_albums: u64,
    pub(crate) total_users: u64,
    pub(crate) total_artists: u64,
}

/// Distinct artist names across songs and albums. Names are compared as
/// exact strings.
pub fn count_artists(song_artists: Vec<String>, album_artists: Vec<String>) -> u64 {
    let all: HashSet<String> = song_artists.into_iter().chain(album_artists).collect();
    all.len() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn artists_are_a_union() {
        assert_eq!(count_artists(names(&["A", "B"]), names(&["B", "C"])), 3);
        assert_eq!(count_artists(vec![], vec![]), 0);
    }

    #[test]
    fn artist_names_are_not_normalised() {
        assert_eq!(count_artists(names(&["Muse"]), names(&["muse", "Muse "])), 3);
    }

    #[test]
    fn stats_serialise_in_camel_case() {
        let json = serde_json::to_value(StatsResponse {
            total_songs: 1,
            total_albums: 2,
            total_users: 3,
            total_artists: 4,
        })
        .unwrap();
        assert_eq!(json["totalSongs"], 1);
        assert_eq!(json["totalArtists"], 4);
    }
}
