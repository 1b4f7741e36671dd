use crate::registry::PlayerHandle;

/// Picks the player to show for this refresh.
///
/// The current selection survives only while its id is still listed and no
/// reset was requested; it is returned with the freshly built label.
/// Otherwise the first listed player wins.
pub fn resolve_selection(
    current: Option<&PlayerHandle>,
    players: &[PlayerHandle],
    force_reset: bool,
) -> Option<PlayerHandle> {
    let first = players.first()?;
    if !force_reset {
        if let Some(current) = current {
            if let Some(still_listed) = players.iter().find(|p| p.id == current.id) {
                return Some(still_listed.clone());
            }
        }
    }
    Some(first.clone())
}

/// The one piece of state that outlives a refresh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    current: Option<PlayerHandle>,
}

impl SelectionState {
    pub fn current(&self) -> Option<&PlayerHandle> {
        self.current.as_ref()
    }

    pub fn resolve(
        &mut self,
        players: &[PlayerHandle],
        force_reset: bool,
    ) -> Option<&PlayerHandle> {
        self.current = resolve_selection(self.current.as_ref(), players, force_reset);
        self.current.as_ref()
    }

    /// Explicit pick from the drop-down; replaces whatever was selected.
    pub fn pick(&mut self, player: PlayerHandle) {
        self.current = Some(player);
    }
}
