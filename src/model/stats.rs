use serde::{Serialize, Serializer};
use std::fmt::Display;

pub fn format_elapsed_time(seconds: u64) -> String {
    if seconds < 60 {
        format!("{seconds} secs")
    } else {
        let minutes = seconds / 60;
        let seconds = seconds % 60;
        format!("{minutes}:{seconds:02} mins")
    }
}

fn serialize_elapsed_time<S>(secs: &u64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let formatted = format_elapsed_time(*secs);
    serializer.serialize_str(&formatted)
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchStats {
    #[serde(rename = "guide")]
    pub region: String,
    #[serde(rename = "channels")]
    pub channel_count: usize,
    #[serde(rename = "matched")]
    pub matched_count: usize,
    #[serde(rename = "id_matches")]
    pub id_match_count: usize,
    #[serde(rename = "name_matches")]
    pub name_match_count: usize,
    #[serde(rename = "took", serialize_with = "serialize_elapsed_time")]
    pub secs_took: u64,
}

impl Display for MatchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        serde_json::to_string(&self).map_or(Err(std::fmt::Error), |json_str| write!(f, "{json_str}"))
    }
}
