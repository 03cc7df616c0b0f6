use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use floorops_core::clock::CLOCK_PLACEHOLDER;
use floorops_core::{
    ConnectionState, DashboardEvent, RenderModels, RuntimeState, ViewId, ViewReconciler,
};
use std::sync::Arc;
use tracing::debug;

/// Presentation-side state. Owned by the single UI loop; background tasks
/// reach it only through [`DashboardEvent`]s.
pub struct App {
    runtime: Arc<RuntimeState>,
    reconciler: ViewReconciler,
    connection: ConnectionState,
    clock: String,
    scroll: u16,
}

impl App {
    pub fn new(runtime: Arc<RuntimeState>) -> Self {
        Self {
            runtime,
            reconciler: ViewReconciler::new(),
            connection: ConnectionState::Offline,
            clock: CLOCK_PLACEHOLDER.to_string(),
            scroll: 0,
        }
    }

    pub fn view(&self) -> ViewId {
        self.runtime.active_view()
    }

    pub fn models(&self) -> &RenderModels {
        self.reconciler.models()
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn clock(&self) -> &str {
        &self.clock
    }

    pub fn scroll(&self) -> u16 {
        self.scroll
    }

    pub fn has_data(&self) -> bool {
        self.reconciler.latest().is_some()
    }

    pub fn apply_event(&mut self, event: DashboardEvent) {
        match event {
            DashboardEvent::Connection(state) => self.connection = state,
            DashboardEvent::Snapshot(snapshot) => {
                let view = self.view();
                self.reconciler.reconcile(snapshot, view);
            }
            DashboardEvent::Clock(text) => self.clock = text,
        }
    }

    pub fn switch_view(&mut self, view: ViewId) {
        let previous = self.runtime.set_active_view(view);
        if previous == view {
            return;
        }
        self.scroll = 0;
        let refreshed = self.reconciler.activate(view);
        debug!(
            event = "view_switch",
            from = previous.title(),
            to = view.title(),
            refreshed
        );
    }

    /// Returns true when the session should end.
    pub fn handle_input(&mut self, event: Event) -> bool {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
            _ => false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('1') => self.switch_view(ViewId::Dashboard),
            KeyCode::Char('2') => self.switch_view(ViewId::Monitor),
            KeyCode::Char('3') => self.switch_view(ViewId::Logs),
            KeyCode::Tab => self.switch_view(self.view().next()),
            KeyCode::Down | KeyCode::Char('j') => self.scroll = self.scroll.saturating_add(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll = self.scroll.saturating_sub(1),
            KeyCode::Char('g') => self.scroll = 0,
            _ => {}
        }
        false
    }
}
