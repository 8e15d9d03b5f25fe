use std::fmt;

use sandplay_core::catalog::find_theme;
use sandplay_core::{
    GridCoord, Journal, JournalError, ObjectId, PendingAsset, PlacedObject, PlacementStore,
    Reframe, Shard, ShardId, Talisman, TalismanSummary, ThemeEntry, TrayGeometry, TrayRules,
    UserId,
};

use crate::input::{hit_test, GestureEffect, GestureMachine, GestureSettings, PointerId};
use crate::reflect::{normalize_reframes, ReflectError, ReflectionRequest, Reflector};
use crate::view::TrayView;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Grounding,
    Building,
    Reflecting,
    Released,
    Community,
    Profile,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Grounding => "grounding",
            Phase::Building => "building",
            Phase::Reflecting => "reflecting",
            Phase::Released => "released",
            Phase::Community => "community",
            Phase::Profile => "profile",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Destination {
    Profile,
    Restart,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationOutcome {
    Navigated(Phase),
    NeedsConfirmation,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("expected phase {expected}, session is in {found}")]
    WrongPhase { expected: Phase, found: Phase },
    #[error("unknown theme '{0}'")]
    UnknownTheme(String),
    #[error("no theme has been chosen")]
    NoTheme,
    #[error("the tray is empty")]
    EmptyScene,
    #[error("there is no talisman to save")]
    NothingToSave,
    #[error("talisman already saved as {0}")]
    AlreadySaved(ShardId),
    #[error("no navigation is waiting for confirmation")]
    NoPendingNavigation,
    #[error(transparent)]
    Reflect(#[from] ReflectError),
    #[error(transparent)]
    Journal(#[from] JournalError),
}

/// Everything one user session holds. The tray only changes through the
/// placement store's own operations.
#[derive(Debug)]
pub struct SandplaySession {
    rules: TrayRules,
    geometry: TrayGeometry,
    gesture_settings: GestureSettings,
    phase: Phase,
    theme: Option<&'static ThemeEntry>,
    tray: PlacementStore,
    view: TrayView,
    gestures: GestureMachine,
    pending_asset: Option<PendingAsset>,
    pending_cell: Option<GridCoord>,
    selected: Option<ObjectId>,
    reframes: Vec<Reframe>,
    talisman: Option<Talisman>,
    generation_error: Option<String>,
    saved: Option<ShardId>,
    pending_navigation: Option<Destination>,
}

impl SandplaySession {
    pub fn new(rules: TrayRules, gesture_settings: GestureSettings) -> Self {
        let geometry = rules.geometry();
        Self {
            rules,
            geometry,
            gesture_settings,
            phase: Phase::Grounding,
            theme: None,
            tray: PlacementStore::new(geometry.bounds),
            view: TrayView::default(),
            gestures: GestureMachine::new(gesture_settings),
            pending_asset: None,
            pending_cell: None,
            selected: None,
            reframes: Vec::new(),
            talisman: None,
            generation_error: None,
            saved: None,
            pending_navigation: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn rules(&self) -> &TrayRules {
        &self.rules
    }

    pub fn geometry(&self) -> &TrayGeometry {
        &self.geometry
    }

    pub fn theme(&self) -> Option<&'static ThemeEntry> {
        self.theme
    }

    pub fn tray(&self) -> &PlacementStore {
        &self.tray
    }

    pub fn view(&self) -> &TrayView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut TrayView {
        &mut self.view
    }

    pub fn gestures(&self) -> &GestureMachine {
        &self.gestures
    }

    pub fn pending_asset(&self) -> Option<&PendingAsset> {
        self.pending_asset.as_ref()
    }

    pub fn pending_cell(&self) -> Option<GridCoord> {
        self.pending_cell
    }

    pub fn selected(&self) -> Option<ObjectId> {
        self.selected
    }

    pub fn reframes(&self) -> &[Reframe] {
        &self.reframes
    }

    pub fn talisman(&self) -> Option<&Talisman> {
        self.talisman.as_ref()
    }

    pub fn generation_error(&self) -> Option<&str> {
        self.generation_error.as_deref()
    }

    pub fn saved_as(&self) -> Option<ShardId> {
        self.saved
    }

    pub fn is_saved(&self) -> bool {
        self.saved.is_some()
    }

    pub fn pending_navigation(&self) -> Option<Destination> {
        self.pending_navigation
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), SessionError> {
        if self.phase != expected {
            return Err(SessionError::WrongPhase {
                expected,
                found: self.phase,
            });
        }
        Ok(())
    }

    fn set_phase(&mut self, next: Phase) {
        if self.phase != next {
            tracing::debug!(from = %self.phase, to = %next, "session phase");
        }
        self.phase = next;
    }

    fn reset_gestures(&mut self) {
        if !self.gestures.is_idle() {
            tracing::debug!(phase = ?self.gestures.phase(), "dropping unfinished gesture");
        }
        self.gestures = GestureMachine::new(self.gesture_settings);
    }

    fn clear_outcome(&mut self) {
        self.reframes.clear();
        self.talisman = None;
        self.generation_error = None;
        self.saved = None;
        self.pending_navigation = None;
    }

    fn clear_build(&mut self) {
        self.tray.clear();
        self.view.reset();
        self.reset_gestures();
        self.pending_asset = None;
        self.pending_cell = None;
        self.selected = None;
        self.clear_outcome();
    }

    pub fn start(&mut self, theme: &str) -> Result<&'static ThemeEntry, SessionError> {
        self.expect_phase(Phase::Grounding)?;
        let entry = find_theme(theme).ok_or_else(|| SessionError::UnknownTheme(theme.to_string()))?;
        self.clear_build();
        self.theme = Some(entry);
        tracing::info!(theme = entry.name, "session started");
        self.set_phase(Phase::Building);
        Ok(entry)
    }

    /// Holds `asset` until a cell is chosen, or drops it at a cell chosen
    /// earlier.
    pub fn select_asset(&mut self, asset: PendingAsset) -> Result<Option<PlacedObject>, SessionError> {
        self.expect_phase(Phase::Building)?;
        match self.pending_cell.take() {
            Some(cell) => Ok(Some(self.place(asset, cell))),
            None => {
                self.pending_asset = Some(asset);
                Ok(None)
            }
        }
    }

    /// Drops the held asset at `cell`, or remembers the cell for the next
    /// asset.
    pub fn target_cell(&mut self, cell: GridCoord) -> Result<Option<PlacedObject>, SessionError> {
        self.expect_phase(Phase::Building)?;
        let cell = self.geometry.bounds.clamp(cell);
        match self.pending_asset.take() {
            Some(asset) => Ok(Some(self.place(asset, cell))),
            None => {
                self.pending_cell = Some(cell);
                Ok(None)
            }
        }
    }

    pub fn target_projected(&mut self, x: f32, y: f32) -> Result<Option<PlacedObject>, SessionError> {
        let cell = self.geometry.to_grid(x, y);
        self.target_cell(cell)
    }

    fn place(&mut self, asset: PendingAsset, cell: GridCoord) -> PlacedObject {
        let object = asset.place(&mut self.tray, cell);
        tracing::debug!(id = %object.id(), kind = object.kind(), col = cell.col, row = cell.row, "object placed");
        object
    }

    pub fn move_object(&mut self, id: ObjectId, cell: GridCoord) -> Result<bool, SessionError> {
        self.expect_phase(Phase::Building)?;
        Ok(self.tray.move_object(id, cell))
    }

    pub fn remove_object(&mut self, id: ObjectId) -> Result<bool, SessionError> {
        self.expect_phase(Phase::Building)?;
        if self.selected == Some(id) {
            self.selected = None;
        }
        Ok(self.tray.remove(id).is_some())
    }

    pub fn clear_scene(&mut self) -> Result<(), SessionError> {
        self.expect_phase(Phase::Building)?;
        self.tray.clear();
        self.selected = None;
        Ok(())
    }

    pub fn pointer_down(&mut self, pointer: PointerId, screen_x: f32, screen_y: f32) -> GestureEffect {
        if self.phase != Phase::Building {
            return GestureEffect::None;
        }
        let target = hit_test(&self.tray, &self.geometry, &self.view, screen_x, screen_y);
        let effect = self.gestures.pointer_down(pointer, screen_x, screen_y, target);
        self.apply_gesture(effect)
    }

    pub fn pointer_move(&mut self, pointer: PointerId, screen_x: f32, screen_y: f32) -> GestureEffect {
        if self.phase != Phase::Building {
            return GestureEffect::None;
        }
        let effect = self
            .gestures
            .pointer_move(pointer, screen_x, screen_y, &self.geometry, &self.view);
        self.apply_gesture(effect)
    }

    pub fn pointer_up(
        &mut self,
        pointer: PointerId,
        screen_x: f32,
        screen_y: f32,
        now_ms: f32,
    ) -> GestureEffect {
        // The release always ends the gesture, even after the phase moved on.
        let effect = self.gestures.pointer_up(
            pointer,
            screen_x,
            screen_y,
            now_ms,
            &self.geometry,
            &self.view,
        );
        if self.phase != Phase::Building {
            return GestureEffect::None;
        }
        self.apply_gesture(effect)
    }

    pub fn pointer_cancel(&mut self, pointer: PointerId) -> GestureEffect {
        let effect = self.gestures.pointer_cancel(pointer);
        if self.phase != Phase::Building {
            return GestureEffect::None;
        }
        self.apply_gesture(effect)
    }

    pub fn wheel(&mut self, delta_y: f32, screen_x: f32, screen_y: f32) -> GestureEffect {
        if self.phase != Phase::Building {
            return GestureEffect::None;
        }
        let effect = self.gestures.wheel(delta_y, screen_x, screen_y);
        self.apply_gesture(effect)
    }

    fn apply_gesture(&mut self, effect: GestureEffect) -> GestureEffect {
        match effect {
            GestureEffect::None => {}
            GestureEffect::DropAt { cell } => {
                let cell = self.geometry.bounds.clamp(cell);
                match self.pending_asset.take() {
                    Some(asset) => {
                        self.place(asset, cell);
                    }
                    None => self.pending_cell = Some(cell),
                }
                self.selected = None;
            }
            GestureEffect::SelectObject { id } => self.selected = Some(id),
            GestureEffect::DeleteObject { id } => {
                self.tray.remove(id);
                if self.selected == Some(id) {
                    self.selected = None;
                }
            }
            GestureEffect::MoveObject { id, cell } | GestureEffect::CommitObject { id, cell } => {
                self.tray.move_object(id, cell);
            }
            GestureEffect::Pan { dx, dy } => self.view.pan_by(dx, dy),
            GestureEffect::Zoom {
                factor,
                anchor_x,
                anchor_y,
            } => self.view.zoom_at(factor, anchor_x, anchor_y),
        }
        effect
    }

    fn request(&self) -> ReflectionRequest {
        let theme = self.theme.map(|entry| entry.name).unwrap_or_default();
        ReflectionRequest::new(theme, self.tray.objects().to_vec())
    }

    pub fn finish_scene(&mut self) -> Result<ReflectionRequest, SessionError> {
        self.expect_phase(Phase::Building)?;
        if self.tray.is_empty() {
            return Err(SessionError::EmptyScene);
        }
        self.reset_gestures();
        self.pending_asset = None;
        self.pending_cell = None;
        self.selected = None;
        self.reframes.clear();
        self.generation_error = None;
        self.set_phase(Phase::Reflecting);
        Ok(self.request())
    }

    pub fn receive_reframes(&mut self, reframes: Vec<Reframe>) -> Result<(), SessionError> {
        self.expect_phase(Phase::Reflecting)?;
        self.reframes = normalize_reframes(reframes);
        Ok(())
    }

    /// Finishes the scene and asks `reflector` for reframes. A failed
    /// call leaves the session reflecting with the error recorded.
    pub fn reflect_with(&mut self, reflector: &dyn Reflector) -> Result<&[Reframe], SessionError> {
        let request = self.finish_scene()?;
        match reflector.reframes(&request) {
            Ok(reframes) => self.receive_reframes(reframes)?,
            Err(err) => {
                tracing::warn!(error = %err, "reframe generation failed");
                self.generation_error = Some(err.to_string());
            }
        }
        Ok(&self.reframes)
    }

    pub fn begin_release(&mut self) -> Result<ReflectionRequest, SessionError> {
        self.expect_phase(Phase::Reflecting)?;
        self.generation_error = None;
        self.saved = None;
        self.set_phase(Phase::Released);
        Ok(self.request())
    }

    pub fn complete_release(
        &mut self,
        result: Result<TalismanSummary, ReflectError>,
        now_ms: u64,
    ) -> Result<&Talisman, SessionError> {
        self.expect_phase(Phase::Released)?;
        match result {
            Ok(summary) => {
                let color = self.theme.map(|entry| entry.color).unwrap_or_default();
                let talisman = Talisman::from_summary(summary, color, now_ms);
                tracing::info!(name = %talisman.name, mood = %talisman.mood, "talisman released");
                self.set_phase(Phase::Community);
                Ok(&*self.talisman.insert(talisman))
            }
            Err(err) => {
                tracing::warn!(error = %err, "talisman generation failed");
                self.generation_error = Some(err.to_string());
                self.set_phase(Phase::Reflecting);
                Err(SessionError::Reflect(err))
            }
        }
    }

    pub fn release_with(
        &mut self,
        reflector: &dyn Reflector,
        now_ms: u64,
    ) -> Result<&Talisman, SessionError> {
        let request = self.begin_release()?;
        let result = reflector.summarize(&request);
        self.complete_release(result, now_ms)
    }

    pub fn save_to_journal(
        &mut self,
        journal: &mut dyn Journal,
        user: &UserId,
    ) -> Result<Shard, SessionError> {
        self.expect_phase(Phase::Community)?;
        if let Some(id) = self.saved {
            return Err(SessionError::AlreadySaved(id));
        }
        let talisman = self.talisman.clone().ok_or(SessionError::NothingToSave)?;
        let theme = self.theme.map(|entry| entry.name).unwrap_or_default();
        let shard = journal.save(user, theme, talisman, self.tray.objects().to_vec())?;
        tracing::info!(user = %user, shard = %shard.id, "talisman saved");
        self.saved = Some(shard.id);
        Ok(shard)
    }

    fn has_unsaved_talisman(&self) -> bool {
        self.phase == Phase::Community && self.talisman.is_some() && self.saved.is_none()
    }

    pub fn request_navigation(&mut self, destination: Destination) -> NavigationOutcome {
        if self.has_unsaved_talisman() {
            self.pending_navigation = Some(destination);
            return NavigationOutcome::NeedsConfirmation;
        }
        NavigationOutcome::Navigated(self.navigate(destination))
    }

    pub fn confirm_discard(&mut self) -> Result<Phase, SessionError> {
        let destination = self
            .pending_navigation
            .take()
            .ok_or(SessionError::NoPendingNavigation)?;
        Ok(self.navigate(destination))
    }

    pub fn confirm_save_and_navigate(
        &mut self,
        journal: &mut dyn Journal,
        user: &UserId,
    ) -> Result<Phase, SessionError> {
        let destination = self.pending_navigation.ok_or(SessionError::NoPendingNavigation)?;
        self.save_to_journal(journal, user)?;
        self.pending_navigation = None;
        Ok(self.navigate(destination))
    }

    pub fn cancel_navigation(&mut self) {
        self.pending_navigation = None;
    }

    fn navigate(&mut self, destination: Destination) -> Phase {
        self.pending_navigation = None;
        match destination {
            Destination::Profile => self.set_phase(Phase::Profile),
            Destination::Restart => {
                self.clear_build();
                self.set_phase(Phase::Grounding);
            }
        }
        self.phase
    }

    pub fn back_to_themes(&mut self) -> Result<(), SessionError> {
        self.expect_phase(Phase::Profile)?;
        self.set_phase(Phase::Grounding);
        Ok(())
    }

    pub fn return_to_sandbox(&mut self) -> Result<(), SessionError> {
        self.expect_phase(Phase::Profile)?;
        if self.theme.is_none() {
            return Err(SessionError::NoTheme);
        }
        self.reset_gestures();
        self.clear_outcome();
        self.set_phase(Phase::Building);
        Ok(())
    }

    /// Drops everything, as on sign-out.
    pub fn reset(&mut self) {
        self.clear_build();
        self.theme = None;
        self.set_phase(Phase::Grounding);
    }
}

impl Default for SandplaySession {
    fn default() -> Self {
        Self::new(TrayRules::default(), GestureSettings::default())
    }
}
