use crate::{
    runner::{CommandRunner, Tools},
    status::{truncate_with_ellipsis, SNIPPET_MAX_CHARS},
};
use tracing::debug;

const NO_PLAYERS_SENTINEL: &str = "No players found";
const LABEL_METADATA_FORMAT: &str = "{{xesam:artist}} - {{xesam:title}}";

/// A player instance discovered during one refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerHandle {
    pub id: String,
    pub label: String,
}

/// Lists the active players in the order `playerctl -l` reports them.
pub fn list_players<R: CommandRunner>(tools: &Tools<R>) -> Vec<PlayerHandle> {
    let Some(output) = tools.playerctl(&["-l"], None) else {
        debug!("no player list available");
        return Vec::new();
    };

    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(NO_PLAYERS_SENTINEL))
        .map(|id| PlayerHandle {
            id: id.to_string(),
            label: friendly_label(tools, id),
        })
        .collect()
}

/// `"App → artist - title"`, or just `"App"` when metadata is unavailable.
pub fn friendly_label<R: CommandRunner>(tools: &Tools<R>, player_id: &str) -> String {
    let app = app_name(player_id);
    match tools.playerctl(&["metadata", "--format", LABEL_METADATA_FORMAT], Some(player_id)) {
        Some(snippet) => format!(
            "{app} → {}",
            truncate_with_ellipsis(&snippet, SNIPPET_MAX_CHARS)
        ),
        None => app,
    }
}

/// The bus-name prefix before the first `.`, first letter upper-cased and the
/// rest lower-cased (`spotify.instance1` → `Spotify`).
pub fn app_name(player_id: &str) -> String {
    let prefix = player_id.split('.').next().unwrap_or_default();
    let mut chars = prefix.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
