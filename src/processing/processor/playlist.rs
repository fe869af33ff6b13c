use crate::create_epgsieve_error_result;
use crate::epgsieve_error::{EpgsieveError, EpgsieveErrorKind};
use crate::model::{Config, Epg, EpgRegion, MatchStats, PlaylistItem};
use crate::processing::parser::m3u::parse_m3u;
use crate::processing::parser::xmltv::parse_epg;
use crate::processing::processor::epg::{filter_epg, match_playlist, EpgIdCache, MatchCounts};
use crate::repository::epg_repository::epg_write;
use crate::utils::debug_if_enabled;
use crate::utils::request::{download_content, download_text_content, sanitize_sensitive_info};
use log::{info, warn};
use reqwest::blocking::Client;
use std::collections::BTreeSet;
use std::path::Path;
use std::time::Instant;

fn fetch_playlist(client: &Client, config: &Config) -> Result<Vec<PlaylistItem>, EpgsieveError> {
    debug_if_enabled!("Downloading playlist {}", sanitize_sensitive_info(&config.m3u_url));
    let content = download_text_content(client, &config.m3u_url)?;
    let channels = parse_m3u(&content);
    if channels.is_empty() {
        return create_epgsieve_error_result!(EpgsieveErrorKind::NoContent,
            "No channels found in playlist {}", sanitize_sensitive_info(&config.m3u_url));
    }
    Ok(channels)
}

/// Downloads and indexes one guide dataset and matches the playlist against it.
/// The guide is returned unfiltered, pruning happens after a dataset is chosen.
fn process_guide(client: &Client, url: &str, channels: &[PlaylistItem]) -> Result<(Epg, BTreeSet<String>, MatchCounts), EpgsieveError> {
    debug_if_enabled!("Downloading guide {}", sanitize_sensitive_info(url));
    let content = download_content(client, url)?;
    let epg = parse_epg(&content[..])?;
    let id_cache = EpgIdCache::index(&epg);
    let (keep, counts) = match_playlist(channels, &id_cache);
    Ok((epg, keep, counts))
}

const fn needs_fallback(counts: MatchCounts, region: EpgRegion) -> bool {
    counts.matched == 0 && !matches!(region, EpgRegion::All)
}

pub fn exec_processing(client: &Client, config: &Config) -> Result<(), EpgsieveError> {
    let start_time = Instant::now();

    let channels = fetch_playlist(client, config)?;
    info!("Playlist contains {} channels", channels.len());

    let mut region = config.region;
    let (mut epg, mut keep, mut counts) = process_guide(client, &config.guide_url, &channels)?;
    if needs_fallback(counts, region) {
        info!("No channels matched against the {region} guide, retrying with the {} guide", EpgRegion::All);
        region = EpgRegion::All;
        (epg, keep, counts) = process_guide(client, &config.guide_fallback_url, &channels)?;
    }
    if counts.matched == 0 {
        warn!("No channels matched, writing an empty guide");
    }

    let (channel_count, programme_count) = filter_epg(&mut epg, &keep);
    epg_write(&epg, Path::new(&config.output_path))?;
    info!("Wrote {channel_count} channels and {programme_count} programmes to {}", &config.output_path);

    let stats = MatchStats {
        region: region.to_string(),
        channel_count: channels.len(),
        matched_count: counts.matched,
        id_match_count: counts.id_matches,
        name_match_count: counts.name_matches,
        secs_took: start_time.elapsed().as_secs(),
    };
    info!("{stats}");
    Ok(())
}
