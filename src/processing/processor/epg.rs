use crate::model::{Epg, PlaylistItem, XmlTag, EPG_ATTRIB_CHANNEL, EPG_ATTRIB_ID, EPG_TAG_CHANNEL, EPG_TAG_DISPLAY_NAME, EPG_TAG_PROGRAMME};
use crate::utils::CONSTANTS;
use deunicode::deunicode;
use std::collections::{BTreeSet, HashMap, HashSet};

// Terms stripped from channel names before comparison: quality markers,
// directional feeds, region markers and generic channel naming words.
const NOISE_TOKENS: &[&str] = &[
    "hd", "sd", "fhd", "4k", "uhd",
    "east", "west",
    "us", "usa",
    "channel", "network", "tv", "feed", "alt",
];

const EAST_WEST_TOKENS: &[&str] = &["east", "west"];
const REGION_TOKENS: &[&str] = &["us", "usa"];

/// A token is noise only when it equals a noise term as a whole word.
/// Brand names carrying a digit like `espn2` or `tv2` are never stripped.
#[inline]
fn is_noise_token(token: &str) -> bool {
    NOISE_TOKENS.contains(&token)
}

pub fn normalize_channel_name(name: &str) -> String {
    let transliterated = deunicode(name.trim()).to_lowercase();
    // Parenthesized groups like "(US)" or "(backup)" carry no name information.
    let cleaned = CONSTANTS.re_parentheses.replace_all(&transliterated, "");
    let cleaned = CONSTANTS.re_non_alnum.replace_all(&cleaned, " ");
    cleaned
        .split_whitespace()
        .filter(|token| !is_noise_token(token))
        .collect::<Vec<&str>>()
        .join(" ")
}

fn strip_words(normalized: &str, words: &[&str]) -> String {
    normalized
        .split_whitespace()
        .filter(|token| !words.contains(token))
        .collect::<Vec<&str>>()
        .join(" ")
}

/// Returns the normalized name plus weakened forms without directional or
/// region qualifiers, deduplicated, empty forms discarded.
pub fn name_variants(name: &str) -> BTreeSet<String> {
    let base = normalize_channel_name(name);
    let mut variants = BTreeSet::new();
    variants.insert(strip_words(&base, EAST_WEST_TOKENS));
    variants.insert(strip_words(&base, REGION_TOKENS));
    variants.insert(base);
    variants.remove("");
    variants
}

/// Lookup structures built once per guide document.
pub struct EpgIdCache {
    /// Channel ids the guide declares.
    pub channel_epg_id: HashSet<String>,
    /// Normalized display name variant to the channel ids exposing it.
    /// A variant shared by several channels is an expected ambiguity.
    pub normalized: HashMap<String, BTreeSet<String>>,
    /// All variants recorded per channel id, consulted when narrowing
    /// an ambiguous candidate set.
    pub variants_by_id: HashMap<String, BTreeSet<String>>,
}

impl EpgIdCache {
    pub fn index(epg: &Epg) -> Self {
        let mut cache = Self {
            channel_epg_id: HashSet::new(),
            normalized: HashMap::new(),
            variants_by_id: HashMap::new(),
        };
        for tag in &epg.children {
            if tag.name != EPG_TAG_CHANNEL {
                continue;
            }
            let Some(channel_id) = tag.get_attribute_value(EPG_ATTRIB_ID) else { continue };
            // A channel without an id cannot be referenced by any programme.
            if channel_id.is_empty() {
                continue;
            }
            cache.channel_epg_id.insert(channel_id.clone());
            if let Some(children) = &tag.children {
                for child in children {
                    if child.name != EPG_TAG_DISPLAY_NAME {
                        continue;
                    }
                    let Some(display_name) = &child.value else { continue };
                    for variant in name_variants(display_name) {
                        cache.normalized.entry(variant.clone()).or_default().insert(channel_id.clone());
                        cache.variants_by_id.entry(channel_id.clone()).or_default().insert(variant);
                    }
                }
            }
        }
        cache
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MatchCounts {
    pub matched: usize,
    pub id_matches: usize,
    pub name_matches: usize,
}

/// Narrowing keeps candidates whose recorded variants contain the primary
/// normalized name as a substring. It can only shrink the set, a narrowing
/// that would drop every candidate is discarded.
fn narrow_candidates<'a>(name: &str, candidates: BTreeSet<&'a String>, id_cache: &'a EpgIdCache) -> BTreeSet<&'a String> {
    let primary = normalize_channel_name(name);
    if primary.is_empty() {
        return candidates;
    }
    let narrowed: BTreeSet<&String> = candidates
        .iter()
        .copied()
        .filter(|channel_id| {
            id_cache
                .variants_by_id
                .get(*channel_id)
                .is_some_and(|variants| variants.iter().any(|variant| variant.contains(&primary)))
        })
        .collect();
    if narrowed.is_empty() {
        candidates
    } else {
        narrowed
    }
}

/// Resolves each playlist channel to at most one guide channel id.
/// An id match always wins over a name match. Ambiguous name matches are
/// broken by the lexicographically smallest candidate id, iteration order
/// never leaks into the result.
pub fn match_playlist(channels: &[PlaylistItem], id_cache: &EpgIdCache) -> (BTreeSet<String>, MatchCounts) {
    let mut keep: BTreeSet<String> = BTreeSet::new();
    let mut counts = MatchCounts::default();
    for channel in channels {
        if !channel.id.is_empty() && id_cache.channel_epg_id.contains(&channel.id) {
            keep.insert(channel.id.clone());
            counts.matched += 1;
            counts.id_matches += 1;
            continue;
        }
        if channel.name.is_empty() {
            continue;
        }
        let mut candidates: BTreeSet<&String> = BTreeSet::new();
        for variant in name_variants(&channel.name) {
            if let Some(ids) = id_cache.normalized.get(&variant) {
                candidates.extend(ids);
            }
        }
        if candidates.len() > 1 {
            candidates = narrow_candidates(&channel.name, candidates, id_cache);
        }
        if let Some(channel_id) = candidates.first() {
            keep.insert((*channel_id).clone());
            counts.matched += 1;
            counts.name_matches += 1;
        }
    }
    (keep, counts)
}

/// Prunes the guide in place. Channels outside the keep set and programmes
/// referencing them are removed, every other tag and the relative order of
/// the survivors stay untouched. Returns kept channel and programme counts.
pub fn filter_epg(epg: &mut Epg, keep: &BTreeSet<String>) -> (usize, usize) {
    let mut channel_count = 0;
    let mut programme_count = 0;
    epg.children.retain(|tag: &XmlTag| match tag.name.as_str() {
        EPG_TAG_CHANNEL => {
            let kept = tag.get_attribute_value(EPG_ATTRIB_ID).is_some_and(|id| keep.contains(id));
            if kept {
                channel_count += 1;
            }
            kept
        }
        EPG_TAG_PROGRAMME => {
            let kept = tag.get_attribute_value(EPG_ATTRIB_CHANNEL).is_some_and(|id| keep.contains(id));
            if kept {
                programme_count += 1;
            }
            kept
        }
        _ => true,
    });
    (channel_count, programme_count)
}
