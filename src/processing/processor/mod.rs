pub mod epg;
pub mod playlist;
