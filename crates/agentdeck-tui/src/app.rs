use agentdeck_core::{DemoEvent, Home, Scheduler, Tab};
use ratatui::layout::{Position, Rect};

/// Cards per grid row
pub const GRID_COLUMNS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub home: Home,
    pub scheduler: Scheduler<DemoEvent>,

    // Agent grid state
    pub selected_card: usize,
    pub grid_offset: usize,  // first visible grid row
    pub visible_rows: usize, // updated during render
    pub card_scroll: Vec<u16>, // lines scrolled back from the newest message, per card

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Areas for mouse hit-testing (updated during render)
    pub tab_areas: Vec<(Tab, Rect)>,
    pub card_areas: Vec<(usize, Rect)>,
}

impl App {
    pub fn new(home: Home, scheduler: Scheduler<DemoEvent>) -> Self {
        let card_scroll = vec![0; home.agents().len()];
        Self {
            should_quit: false,
            input_mode: InputMode::Normal,
            home,
            scheduler,

            selected_card: 0,
            grid_offset: 0,
            visible_rows: 1,
            card_scroll,

            animation_frame: 0,

            tab_areas: Vec::new(),
            card_areas: Vec::new(),
        }
    }

    pub fn tab(&self) -> Tab {
        self.home.tab()
    }

    pub fn select_tab(&mut self, tab: Tab) {
        if self.home.select_tab(tab) {
            self.input_mode = InputMode::Normal;
            self.selected_card = 0;
            self.grid_offset = 0;
            self.card_scroll = vec![0; self.home.agents().len()];
            self.card_areas.clear();
        }
    }

    pub fn toggle_tab(&mut self) {
        self.select_tab(self.tab().other());
    }

    pub fn card_count(&self) -> usize {
        self.home.agents().len()
    }

    // Grid navigation
    pub fn select_next_card(&mut self) {
        let count = self.card_count();
        if count > 0 {
            self.selected_card = (self.selected_card + 1).min(count - 1);
            self.ensure_selected_visible();
        }
    }

    pub fn select_prev_card(&mut self) {
        self.selected_card = self.selected_card.saturating_sub(1);
        self.ensure_selected_visible();
    }

    pub fn select_card_below(&mut self) {
        let target = self.selected_card + GRID_COLUMNS;
        if target < self.card_count() {
            self.selected_card = target;
            self.ensure_selected_visible();
        }
    }

    pub fn select_card_above(&mut self) {
        if self.selected_card >= GRID_COLUMNS {
            self.selected_card -= GRID_COLUMNS;
            self.ensure_selected_visible();
        }
    }

    pub fn select_card(&mut self, index: usize) {
        if index < self.card_count() {
            self.selected_card = index;
            self.ensure_selected_visible();
        }
    }

    /// Scroll the grid so the selected card's row is on screen
    pub fn ensure_selected_visible(&mut self) {
        let row = self.selected_card / GRID_COLUMNS;
        let visible = self.visible_rows.max(1);
        if row < self.grid_offset {
            self.grid_offset = row;
        } else if row >= self.grid_offset + visible {
            self.grid_offset = row + 1 - visible;
        }
    }

    /// Send whatever is typed into the selected card
    pub fn submit_selected_card(&mut self) -> bool {
        let index = self.selected_card;
        let submitted = match self.home.agent_mut(index) {
            Some(card) => card.submit(&self.scheduler),
            None => false,
        };
        if submitted {
            self.follow_latest(index);
        }
        submitted
    }

    pub fn submit_search(&mut self) -> bool {
        match self.home.search_mut() {
            Some(tab) => tab.submit(&self.scheduler),
            None => false,
        }
    }

    /// Text box that typing currently goes to
    pub fn active_input_mut(&mut self) -> Option<&mut String> {
        match self.tab() {
            Tab::Agents => self.home.agent_mut(self.selected_card).map(|card| &mut card.input),
            Tab::Google => self.home.search_mut().map(|tab| &mut tab.query),
        }
    }

    pub fn apply_demo_event(&mut self, event: DemoEvent) {
        let card = match &event {
            DemoEvent::AgentReply { card, .. } => Some(*card),
            DemoEvent::SearchComplete { .. } => None,
        };
        if self.home.handle_event(event) {
            if let Some(index) = card {
                self.follow_latest(index);
            }
        }
    }

    /// Jump a card's history back to its newest message
    fn follow_latest(&mut self, index: usize) {
        if let Some(scroll) = self.card_scroll.get_mut(index) {
            *scroll = 0;
        }
    }

    pub fn scroll_card_back(&mut self, index: usize, lines: u16) {
        if let Some(scroll) = self.card_scroll.get_mut(index) {
            *scroll = scroll.saturating_add(lines);
        }
    }

    pub fn scroll_card_forward(&mut self, index: usize, lines: u16) {
        if let Some(scroll) = self.card_scroll.get_mut(index) {
            *scroll = scroll.saturating_sub(lines);
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        let searching = self.home.search().is_some_and(|tab| tab.is_loading());
        let typing = self.home.agents().iter().any(|card| card.is_awaiting_reply());
        if searching || typing {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    pub fn tab_at(&self, column: u16, row: u16) -> Option<Tab> {
        let pos = Position::new(column, row);
        self.tab_areas
            .iter()
            .find(|(_, area)| area.contains(pos))
            .map(|(tab, _)| *tab)
    }

    pub fn card_at(&self, column: u16, row: u16) -> Option<usize> {
        let pos = Position::new(column, row);
        self.card_areas
            .iter()
            .find(|(_, area)| area.contains(pos))
            .map(|(index, _)| *index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentdeck_core::Settings;

    fn app() -> (App, tokio::sync::mpsc::UnboundedReceiver<DemoEvent>) {
        let (scheduler, rx) = Scheduler::channel();
        (App::new(Home::new(Settings::default()), scheduler), rx)
    }

    #[test]
    fn test_grid_navigation_stays_in_bounds() {
        let (mut app, _rx) = app();
        app.select_prev_card();
        assert_eq!(app.selected_card, 0);

        app.select_card_below();
        assert_eq!(app.selected_card, 4);
        app.select_card(19);
        app.select_card_below();
        assert_eq!(app.selected_card, 19);
        app.select_next_card();
        assert_eq!(app.selected_card, 19);
        app.select_card_above();
        assert_eq!(app.selected_card, 15);
    }

    #[test]
    fn test_grid_scrolls_to_selected_row() {
        let (mut app, _rx) = app();
        app.visible_rows = 2;
        app.select_card(13); // row 3
        assert_eq!(app.grid_offset, 2);
        app.select_card(1);
        assert_eq!(app.grid_offset, 0);
    }

    #[test]
    fn test_tab_switch_resets_view_state() {
        let (mut app, _rx) = app();
        app.select_card(9);
        app.input_mode = InputMode::Editing;

        app.toggle_tab();
        assert_eq!(app.tab(), Tab::Google);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.card_count(), 0);

        app.toggle_tab();
        assert_eq!(app.selected_card, 0);
        assert_eq!(app.card_scroll.len(), 20);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reply_jumps_card_back_to_latest() {
        let (mut app, mut rx) = app();
        app.select_card(2);
        app.active_input_mut().unwrap().push_str("hey");
        assert!(app.submit_selected_card());

        app.scroll_card_back(2, 5);
        let event = rx.recv().await.unwrap();
        app.apply_demo_event(event);

        assert_eq!(app.card_scroll[2], 0);
        assert_eq!(app.home.agents()[2].messages().len(), 3);
    }
}
