/// One channel entry assembled from an `#EXTINF` line and its stream url.
///
/// `title` keeps the raw trailing label of the metadata line, `name` is the
/// resolved display name used for matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaylistItem {
    pub id: String,
    pub name: String,
    pub title: String,
    pub logo: String,
    pub group: String,
    pub url: String,
}
