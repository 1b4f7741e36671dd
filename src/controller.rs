use crate::{
    registry::{list_players, PlayerHandle},
    runner::{CommandRunner, Tools},
    schedule::TickScheduler,
    selection::SelectionState,
    status::{format_status_line, format_title, format_volume, PlaybackStatus, VOLUME_UNAVAILABLE},
};
use std::time::{Duration, Instant};
use tracing::debug;

pub const NO_ACTIVE_PLAYER: &str = "No active player";
pub const NO_PLAYER_SELECTED: &str = "No player selected";
pub const SELECT_PLAYER_PROMPT: &str = "Select a player above";
pub const TITLE_UNAVAILABLE: &str = "Title unavailable";
pub const LOADING: &str = "Loading...";

const DEFAULT_SINK: &str = "@DEFAULT_SINK@";
const SEEK_BACKWARD: &str = "10-";
const SEEK_FORWARD: &str = "10+";
const VOLUME_DOWN: &str = "-5%";
const VOLUME_UP: &str = "+5%";

/// Everything the panel renders, rebuilt on every refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayState {
    pub player_labels: Vec<String>,
    pub selected_index: Option<usize>,
    pub player_text: String,
    pub title: String,
    pub status: String,
    pub volume: String,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            player_labels: Vec::new(),
            selected_index: None,
            player_text: String::new(),
            title: LOADING.to_string(),
            status: String::new(),
            volume: VOLUME_UNAVAILABLE.to_string(),
        }
    }
}

/// Transient per-refresh view of the selected player and the default sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub status: PlaybackStatus,
    pub volume: String,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ControlAction {
    PlayPause,
    SeekBackward,
    SeekForward,
    VolumeDown,
    VolumeUp,
    Previous,
    Next,
}

impl ControlAction {
    /// Panel order, top to bottom.
    pub const ALL: [ControlAction; 7] = [
        ControlAction::PlayPause,
        ControlAction::SeekBackward,
        ControlAction::SeekForward,
        ControlAction::VolumeDown,
        ControlAction::VolumeUp,
        ControlAction::Previous,
        ControlAction::Next,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ControlAction::PlayPause => "⏯  Play / Pause",
            ControlAction::SeekBackward => "⏪  Rewind 10s",
            ControlAction::SeekForward => "⏩  Forward 10s",
            ControlAction::VolumeDown => "🔉  Volume -",
            ControlAction::VolumeUp => "🔊  Volume +",
            ControlAction::Previous => "⏮  Previous",
            ControlAction::Next => "⏭  Next",
        }
    }
}

/// Owns all mutable panel state. Timer ticks, drop-down picks and button
/// presses are all method calls on this one value.
pub struct MediaController<R> {
    tools: Tools<R>,
    players: Vec<PlayerHandle>,
    selection: SelectionState,
    display: DisplayState,
}

impl<R: CommandRunner> MediaController<R> {
    pub fn new(tools: Tools<R>) -> Self {
        Self {
            tools,
            players: Vec::new(),
            selection: SelectionState::default(),
            display: DisplayState::default(),
        }
    }

    #[cfg(test)]
    pub(crate) fn tools(&self) -> &Tools<R> {
        &self.tools
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn selected(&self) -> Option<&PlayerHandle> {
        self.selection.current()
    }

    /// One refresh cycle: re-list players, resolve the selection, query the
    /// selected player and the sink volume, rebuild the display.
    pub fn refresh(&mut self, force_reset: bool) {
        self.players = list_players(&self.tools);
        let selected = self.selection.resolve(&self.players, force_reset).cloned();

        let mut display = DisplayState {
            player_labels: self.players.iter().map(|p| p.label.clone()).collect(),
            ..DisplayState::default()
        };

        display.selected_index = selected
            .as_ref()
            .and_then(|current| self.players.iter().position(|p| p.id == current.id));

        let snapshot = self.snapshot(selected.as_ref());
        match &selected {
            Some(player) => {
                display.player_text = player.label.clone();
                let title = snapshot.title.as_deref().unwrap_or(TITLE_UNAVAILABLE);
                display.title = format_title(title);
                display.status =
                    format_status_line(snapshot.artist.as_deref().unwrap_or(""), snapshot.status);
            }
            None => {
                display.player_text = NO_ACTIVE_PLAYER.to_string();
                display.title = NO_PLAYER_SELECTED.to_string();
                display.status = SELECT_PLAYER_PROMPT.to_string();
            }
        }
        display.volume = snapshot.volume;
        debug!(
            players = self.players.len(),
            selected = selected.as_ref().map(|p| p.id.as_str()),
            "refreshed panel"
        );
        self.display = display;
    }

    /// Drop-down pick by position in the last listed players. Out-of-range
    /// picks are ignored.
    pub fn select_player(&mut self, index: usize) -> bool {
        let Some(player) = self.players.get(index).cloned() else {
            return false;
        };
        debug!("user selected {}", player.id);
        self.selection.pick(player);
        self.refresh(false);
        true
    }

    pub fn perform(&mut self, action: ControlAction) {
        match action {
            ControlAction::PlayPause => self.transport(&["play-pause"]),
            ControlAction::SeekBackward => self.transport(&["position", SEEK_BACKWARD]),
            ControlAction::SeekForward => self.transport(&["position", SEEK_FORWARD]),
            ControlAction::Previous => self.transport(&["previous"]),
            ControlAction::Next => self.transport(&["next"]),
            ControlAction::VolumeDown => self.change_volume(VOLUME_DOWN),
            ControlAction::VolumeUp => self.change_volume(VOLUME_UP),
        }
        self.refresh(false);
    }

    /// Queries the selected player, if any, and always the sink volume.
    fn snapshot(&self, player: Option<&PlayerHandle>) -> PlaybackSnapshot {
        let volume = format_volume(
            self.tools
                .pactl(&["get-sink-volume", DEFAULT_SINK])
                .as_deref(),
        );
        let Some(player) = player else {
            return PlaybackSnapshot {
                title: None,
                artist: None,
                status: PlaybackStatus::Stopped,
                volume,
            };
        };

        let target = Some(player.id.as_str());
        PlaybackSnapshot {
            title: self.tools.playerctl(&["metadata", "xesam:title"], target),
            artist: self.tools.playerctl(&["metadata", "xesam:artist"], target),
            status: PlaybackStatus::from_raw(self.tools.playerctl(&["status"], target).as_deref()),
            volume,
        }
    }

    fn transport(&self, args: &[&str]) {
        let Some(player) = self.selection.current() else {
            debug!("ignoring {args:?}: no player selected");
            return;
        };
        // Commands print nothing on success, so only the runner's own logging
        // tells failures apart.
        self.tools.playerctl(args, Some(player.id.as_str()));
    }

    fn change_volume(&self, delta: &str) {
        self.tools
            .pactl(&["--", "set-sink-volume", DEFAULT_SINK, delta]);
    }
}

/// The controller driven by its timer.
pub struct RefreshLoop<R> {
    controller: MediaController<R>,
    scheduler: TickScheduler,
}

impl<R: CommandRunner> RefreshLoop<R> {
    pub fn new(controller: MediaController<R>, scheduler: TickScheduler) -> Self {
        Self {
            controller,
            scheduler,
        }
    }

    pub fn controller(&self) -> &MediaController<R> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut MediaController<R> {
        &mut self.controller
    }

    /// Runs the tick if it is due and returns how long the caller may sleep
    /// before asking again. `None` means the loop has been shut down.
    pub fn pump(&mut self, mut now: Instant) -> Option<Duration> {
        if self.scheduler.is_shut_down() {
            return None;
        }
        if self.scheduler.is_due(now) {
            let started = Instant::now();
            self.controller.refresh(false);
            now += started.elapsed();
            self.scheduler.reschedule(now);
        }
        self.scheduler.time_until_due(now)
    }
}

impl<R> RefreshLoop<R> {
    /// Stops the timer; checked at the top of every later `pump`.
    pub fn shutdown(&mut self) {
        if !self.scheduler.is_shut_down() {
            debug!("shutting down refresh loop");
        }
        self.scheduler.shutdown();
    }

    pub fn is_shut_down(&self) -> bool {
        self.scheduler.is_shut_down()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::testing::{scripted_tools, ScriptedRunner};

    const LABEL_QUERY: &str = "metadata --format {{xesam:artist}} - {{xesam:title}}";
    const VOLUME_QUERY: &str = "pactl get-sink-volume @DEFAULT_SINK@";
    const VOLUME_OUTPUT: &str =
        "Volume: front-left: 29491 /  45% / -20.81 dB,   front-right: 29491 /  45% / -20.81 dB";

    fn controller_with_two_players() -> MediaController<ScriptedRunner> {
        let tools = scripted_tools();
        let runner = tools.runner();
        runner.respond("playerctl -l", "spotify.instance1\nfirefox.instance2");
        runner.respond(
            &format!("playerctl -p spotify.instance1 {LABEL_QUERY}"),
            "Daft Punk - One More Time",
        );
        runner.respond(
            &format!("playerctl -p firefox.instance2 {LABEL_QUERY}"),
            "Lofi Girl - beats to relax",
        );
        runner.respond(
            "playerctl -p spotify.instance1 metadata xesam:title",
            "One More Time",
        );
        runner.respond(
            "playerctl -p spotify.instance1 metadata xesam:artist",
            "Daft Punk",
        );
        runner.respond("playerctl -p spotify.instance1 status", "Playing");
        runner.respond(
            "playerctl -p firefox.instance2 metadata xesam:title",
            "beats to relax",
        );
        runner.respond("playerctl -p firefox.instance2 status", "Paused");
        runner.respond(VOLUME_QUERY, VOLUME_OUTPUT);
        MediaController::new(tools)
    }

    #[test]
    fn starts_with_loading_placeholders() {
        let controller = MediaController::new(scripted_tools());
        let display = controller.display();
        assert_eq!(display.title, LOADING);
        assert_eq!(display.status, "");
        assert_eq!(display.volume, "--%");
    }

    #[test]
    fn no_players_shows_placeholders_but_still_reads_volume() {
        let mut controller = MediaController::new(scripted_tools());
        controller.tools().runner().respond(VOLUME_QUERY, VOLUME_OUTPUT);

        controller.refresh(false);

        let display = controller.display();
        assert!(controller.selected().is_none());
        assert_eq!(display.player_text, NO_ACTIVE_PLAYER);
        assert_eq!(display.title, NO_PLAYER_SELECTED);
        assert_eq!(display.status, SELECT_PLAYER_PROMPT);
        assert_eq!(display.volume, "45%");
        assert!(controller
            .tools()
            .runner()
            .calls()
            .contains(&VOLUME_QUERY.to_string()));
    }

    #[test]
    fn snapshot_carries_volume_with_or_without_a_player() {
        let controller = controller_with_two_players();

        let idle = controller.snapshot(None);
        assert_eq!(idle.title, None);
        assert_eq!(idle.status, PlaybackStatus::Stopped);
        assert_eq!(idle.volume, "45%");

        let spotify = PlayerHandle {
            id: "spotify.instance1".into(),
            label: "Spotify".into(),
        };
        let playing = controller.snapshot(Some(&spotify));
        assert_eq!(playing.title.as_deref(), Some("One More Time"));
        assert_eq!(playing.artist.as_deref(), Some("Daft Punk"));
        assert_eq!(playing.status, PlaybackStatus::Playing);
        assert_eq!(playing.volume, "45%");
    }

    #[test]
    fn empty_player_list_labels_the_picker() {
        let mut controller = controller_with_two_players();
        controller.refresh(false);
        controller.tools().runner().respond("playerctl -l", "No players found");

        controller.refresh(false);

        assert_eq!(controller.display().player_text, NO_ACTIVE_PLAYER);
        assert_eq!(controller.display().selected_index, None);
    }

    #[test]
    fn first_refresh_selects_first_player() {
        let mut controller = controller_with_two_players();
        controller.refresh(false);

        let display = controller.display();
        assert_eq!(
            controller.selected().map(|p| p.id.as_str()),
            Some("spotify.instance1")
        );
        assert_eq!(
            display.player_labels,
            vec![
                "Spotify → Daft Punk - One More Time".to_string(),
                "Firefox → Lofi Girl - beats to relax".to_string(),
            ]
        );
        assert_eq!(display.selected_index, Some(0));
        assert_eq!(display.title, "One More Time");
        assert_eq!(display.status, "Daft Punk ▶ Playing");
        assert_eq!(display.volume, "45%");
    }

    #[test]
    fn refresh_is_idempotent_for_unchanged_tools() {
        let mut controller = controller_with_two_players();
        controller.refresh(false);
        let first = controller.display().clone();
        controller.refresh(false);
        assert_eq!(controller.display(), &first);
    }

    #[test]
    fn user_pick_sticks_until_forced_reset() {
        let mut controller = controller_with_two_players();
        controller.refresh(false);

        assert!(controller.select_player(1));
        assert_eq!(controller.display().selected_index, Some(1));
        assert_eq!(controller.display().title, "beats to relax");
        assert_eq!(controller.display().status, "⏸ Paused");

        controller.refresh(false);
        assert_eq!(
            controller.selected().map(|p| p.id.as_str()),
            Some("firefox.instance2")
        );

        controller.refresh(true);
        assert_eq!(
            controller.selected().map(|p| p.id.as_str()),
            Some("spotify.instance1")
        );
    }

    #[test]
    fn out_of_range_pick_is_ignored() {
        let mut controller = controller_with_two_players();
        controller.refresh(false);
        assert!(!controller.select_player(5));
        assert_eq!(controller.display().selected_index, Some(0));
    }

    #[test]
    fn missing_title_and_status_degrade_to_placeholders() {
        let mut controller = controller_with_two_players();
        let runner = controller.tools().runner();
        runner.forget("playerctl -p spotify.instance1 metadata xesam:title");
        runner.forget("playerctl -p spotify.instance1 metadata xesam:artist");
        runner.forget("playerctl -p spotify.instance1 status");
        runner.forget(VOLUME_QUERY);

        controller.refresh(false);

        let display = controller.display();
        assert_eq!(display.title, TITLE_UNAVAILABLE);
        assert_eq!(display.status, "■ Stopped");
        assert_eq!(display.volume, "--%");
    }

    #[test]
    fn vanished_player_clears_selection() {
        let mut controller = controller_with_two_players();
        controller.refresh(false);
        controller.tools().runner().forget("playerctl -l");

        controller.refresh(false);

        assert!(controller.selected().is_none());
        assert!(controller.display().player_labels.is_empty());
        assert_eq!(controller.display().title, NO_PLAYER_SELECTED);
    }

    #[test]
    fn transport_actions_target_selected_player() {
        let mut controller = controller_with_two_players();
        controller.refresh(false);
        controller.select_player(1);
        controller.tools().runner().clear_calls();

        controller.perform(ControlAction::PlayPause);
        controller.perform(ControlAction::SeekForward);
        controller.perform(ControlAction::SeekBackward);
        controller.perform(ControlAction::Next);
        controller.perform(ControlAction::Previous);

        let calls = controller.tools().runner().calls();
        for expected in [
            "playerctl -p firefox.instance2 play-pause",
            "playerctl -p firefox.instance2 position 10+",
            "playerctl -p firefox.instance2 position 10-",
            "playerctl -p firefox.instance2 next",
            "playerctl -p firefox.instance2 previous",
        ] {
            assert!(calls.contains(&expected.to_string()), "missing {expected}");
        }
    }

    #[test]
    fn transport_without_selection_is_a_no_op() {
        let mut controller = MediaController::new(scripted_tools());
        controller.perform(ControlAction::PlayPause);
        assert!(!controller
            .tools()
            .runner()
            .calls()
            .iter()
            .any(|call| call.ends_with("play-pause")));
    }

    #[test]
    fn volume_actions_adjust_default_sink() {
        let mut controller = MediaController::new(scripted_tools());
        controller.perform(ControlAction::VolumeUp);
        controller.perform(ControlAction::VolumeDown);

        let calls = controller.tools().runner().calls();
        assert!(calls.contains(&"pactl -- set-sink-volume @DEFAULT_SINK@ +5%".to_string()));
        assert!(calls.contains(&"pactl -- set-sink-volume @DEFAULT_SINK@ -5%".to_string()));
    }

    #[test]
    fn pump_runs_due_ticks_and_reschedules() {
        let start = Instant::now();
        let mut refresh =
            RefreshLoop::new(controller_with_two_players(), TickScheduler::starting_at(start));

        let wait = refresh.pump(start).expect("loop is running");
        assert!(wait <= crate::schedule::INITIAL_DELAY);
        assert_eq!(refresh.controller().display().title, LOADING);

        let wait = refresh
            .pump(start + crate::schedule::INITIAL_DELAY)
            .expect("loop is running");
        assert_eq!(refresh.controller().display().title, "One More Time");
        assert!(wait > Duration::from_millis(2500));
        assert!(wait <= crate::schedule::REFRESH_INTERVAL);
    }

    #[test]
    fn shut_down_loop_never_ticks_again() {
        let start = Instant::now();
        let mut refresh =
            RefreshLoop::new(controller_with_two_players(), TickScheduler::starting_at(start));
        refresh.shutdown();

        assert_eq!(refresh.pump(start + Duration::from_secs(60)), None);
        assert!(refresh.is_shut_down());
        assert!(refresh.controller().tools().runner().calls().is_empty());
    }
}
