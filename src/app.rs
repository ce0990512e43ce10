use crate::api::{FetchError, LaunchClient};
use crate::launch::LaunchRecord;
use crate::scroll::ScrollGate;
use crate::state::{Action, AppState, Phase};
use crate::ui::detail::DetailOverlay;
use crate::ui::layout::{self, OverlayHit};
use ratatui::layout::{Position, Rect};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::sync::oneshot::error::TryRecvError;

type FetchOutcome = Result<Vec<LaunchRecord>, FetchError>;

/// The one outstanding request. Dropping it aborts the request task, and a
/// result sent after that point goes nowhere.
struct FetchTask {
    rx: oneshot::Receiver<FetchOutcome>,
    handle: tokio::task::AbortHandle,
}

impl Drop for FetchTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Main application state.
pub struct App {
    pub should_quit: bool,
    pub show_help: bool,
    pub status_msg: String,

    state: AppState,
    scroll: ScrollGate,
    overlay: Option<DetailOverlay>,

    mounted: bool,
    fetch: Option<FetchTask>,

    // Grid view state
    cursor: usize,
    first_row: usize,
    viewport: Rect,
    spinner_frame: usize,
}

impl App {
    pub fn new(scroll: ScrollGate) -> Self {
        Self {
            should_quit: false,
            show_help: false,
            status_msg: "Loading launches...".to_string(),

            state: AppState::new(),
            scroll,
            overlay: None,

            mounted: false,
            fetch: None,

            cursor: 0,
            first_row: 0,
            viewport: Rect::new(0, 0, 80, 24),
            spinner_frame: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn overlay(&self) -> Option<&DetailOverlay> {
        self.overlay.as_ref()
    }

    #[cfg(test)]
    pub fn scroll_gate(&self) -> &ScrollGate {
        &self.scroll
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn first_row(&self) -> usize {
        self.first_row
    }

    pub fn spinner_frame(&self) -> usize {
        self.spinner_frame
    }

    /// Issue the launch request on a background task. Only the first call has
    /// any effect.
    pub fn mount(&mut self, client: LaunchClient) {
        if self.mounted {
            tracing::debug!("already mounted, not fetching again");
            return;
        }
        self.mounted = true;
        self.dispatch(Action::FetchStarted);

        let (tx, rx) = oneshot::channel();
        let join = tokio::spawn(async move {
            let outcome = client.fetch_launches().await;
            if tx.send(outcome).is_err() {
                tracing::debug!("launch list arrived after teardown, dropped");
            }
        });
        self.fetch = Some(FetchTask {
            rx,
            handle: join.abort_handle(),
        });
    }

    /// Apply the fetch outcome if it has arrived. Returns true when the state
    /// changed.
    pub fn poll_fetch(&mut self) -> bool {
        let Some(task) = self.fetch.as_mut() else {
            return false;
        };
        let outcome = match task.rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Closed) => {
                tracing::warn!("fetch task ended without a result");
                Err(FetchError::Transport(None))
            }
        };
        self.fetch = None;
        self.settle(outcome);
        true
    }

    /// Wait for the outstanding fetch, if any, and apply it.
    pub async fn wait_for_fetch(&mut self) {
        let Some(mut task) = self.fetch.take() else {
            return;
        };
        let outcome = match (&mut task.rx).await {
            Ok(outcome) => outcome,
            Err(_) => Err(FetchError::Transport(None)),
        };
        self.settle(outcome);
    }

    fn settle(&mut self, outcome: FetchOutcome) {
        let action = match outcome {
            Ok(records) => {
                self.status_msg = format!("{} launches loaded", records.len());
                Action::FetchSucceeded(records)
            }
            Err(err) => {
                tracing::warn!(protocol = err.is_protocol(), "launch fetch failed: {err}");
                self.status_msg.clear();
                Action::FetchFailed(err.user_message())
            }
        };
        self.dispatch(action);
    }

    /// The only path by which the state changes.
    pub fn dispatch(&mut self, action: Action) {
        self.state.dispatch(action);
        self.sync_overlay();
        let count = self.state.collection().len();
        if self.cursor >= count {
            self.cursor = count.saturating_sub(1);
        }
    }

    /// Mount or unmount the detail overlay to match the selection. The old
    /// overlay is dropped before a new one takes the scroll lock.
    fn sync_overlay(&mut self) {
        let wanted = self.state.selected().cloned();
        let unchanged = match (&wanted, &self.overlay) {
            (Some(record), Some(overlay)) => Arc::ptr_eq(record, overlay.record()),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }
        if self.overlay.take().is_some() {
            tracing::debug!("detail overlay unmounted");
        }
        if let Some(record) = wanted {
            tracing::debug!(key = %record.card_key(), "detail overlay mounted");
            self.overlay = Some(DetailOverlay::mount(record, &self.scroll));
        }
    }

    /// "See more" on the card at `index`.
    pub fn request_details(&mut self, index: usize) {
        if let Some(record) = self.state.collection().get(index) {
            let record = Arc::clone(record);
            self.cursor = index;
            self.dispatch(Action::Select(record));
        }
    }

    pub fn open_detail(&mut self) {
        self.request_details(self.cursor);
    }

    pub fn dismiss(&mut self) {
        self.dispatch(Action::Dismiss);
    }

    /// Scroll the open overlay's text. The grid underneath stays locked.
    pub fn scroll_detail(&mut self, delta: i16) {
        if let Some(overlay) = self.overlay.as_mut() {
            overlay.scroll_by(delta);
        }
    }

    pub fn tick(&mut self) {
        if self.state.is_loading() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    /// Update the terminal area used for grid paging and hit-testing.
    pub fn update_viewport(&mut self, area: Rect) {
        self.viewport = area;
        self.ensure_cursor_visible();
    }

    fn grid(&self) -> Rect {
        layout::grid_area(self.viewport)
    }

    fn columns(&self) -> usize {
        layout::columns_for(self.grid().width)
    }

    fn total_rows(&self) -> usize {
        self.state.collection().len().div_ceil(self.columns())
    }

    fn ensure_cursor_visible(&mut self) {
        let rows = layout::visible_rows(self.grid());
        let row = self.cursor / self.columns();
        if row < self.first_row {
            self.first_row = row;
        } else if row >= self.first_row + rows {
            self.first_row = row + 1 - rows;
        }
        let max_first = self.total_rows().saturating_sub(rows);
        self.first_row = self.first_row.min(max_first);
    }

    fn move_cursor(&mut self, to: usize) {
        let count = self.state.collection().len();
        if count == 0 || !self.scroll.can_scroll() {
            return;
        }
        self.cursor = to.min(count - 1);
        self.ensure_cursor_visible();
    }

    pub fn cursor_next(&mut self) {
        self.move_cursor(self.cursor + 1);
    }

    pub fn cursor_prev(&mut self) {
        self.move_cursor(self.cursor.saturating_sub(1));
    }

    pub fn cursor_down(&mut self) {
        self.move_cursor(self.cursor + self.columns());
    }

    pub fn cursor_up(&mut self) {
        if self.cursor >= self.columns() {
            self.move_cursor(self.cursor - self.columns());
        }
    }

    pub fn page_down(&mut self) {
        let step = layout::visible_rows(self.grid()) * self.columns();
        self.move_cursor(self.cursor + step);
    }

    pub fn page_up(&mut self) {
        let step = layout::visible_rows(self.grid()) * self.columns();
        self.move_cursor(self.cursor.saturating_sub(step));
    }

    pub fn cursor_first(&mut self) {
        self.move_cursor(0);
    }

    pub fn cursor_last(&mut self) {
        self.move_cursor(usize::MAX);
    }

    /// Mouse wheel. Moves the grid by whole rows and drags the cursor along.
    pub fn scroll_rows(&mut self, delta: isize) {
        if !self.scroll.can_scroll() || self.state.collection().is_empty() {
            return;
        }
        let rows = layout::visible_rows(self.grid());
        let max_first = self.total_rows().saturating_sub(rows);
        self.first_row = self.first_row.saturating_add_signed(delta).min(max_first);

        let columns = self.columns();
        let first_visible = self.first_row * columns;
        let last_visible = (self.first_row + rows) * columns - 1;
        let last = self.state.collection().len() - 1;
        self.cursor = self.cursor.clamp(first_visible, last_visible.min(last));
    }

    /// Left click at a terminal cell.
    pub fn click(&mut self, column: u16, row: u16) {
        if self.overlay.is_some() {
            match layout::overlay(self.viewport).hit(column, row) {
                OverlayHit::Close | OverlayHit::Outside => self.dismiss(),
                OverlayHit::Inside => {}
            }
            return;
        }
        if self.show_help {
            self.show_help = false;
            return;
        }
        if self.state.phase() != &Phase::Ready {
            return;
        }
        let pos = Position::new(column, row);
        let slots = layout::card_slots(self.grid(), self.state.collection().len(), self.first_row);
        if let Some(slot) = slots.iter().find(|s| s.area.contains(pos)) {
            if slot.button.contains(pos) {
                self.request_details(slot.index);
            } else {
                self.cursor = slot.index;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::launch::tests::{STARLINK_FIXTURE, record, starlink_records};
    use crate::scroll::Overflow;
    use std::time::Duration;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn ready_app(records: Vec<LaunchRecord>) -> App {
        let mut app = App::new(ScrollGate::default());
        app.update_viewport(Rect::new(0, 0, 120, 40));
        app.dispatch(Action::FetchSucceeded(records));
        app
    }

    fn many(n: u32) -> Vec<LaunchRecord> {
        (0..n).map(|i| record(i, &format!("Mission {i}"))).collect()
    }

    async fn client_for(server: &MockServer) -> LaunchClient {
        LaunchClient::new(&Config {
            endpoint: format!("{}/v3/launches?launch_year=2020", server.uri()),
            ..Config::default()
        })
        .unwrap()
    }

    #[test]
    fn test_app_creation() {
        let app = App::new(ScrollGate::default());
        assert!(app.state().is_loading());
        assert!(app.overlay().is_none());
        assert!(!app.should_quit);
    }

    #[test]
    fn test_request_details_mounts_overlay_and_locks_scroll() {
        let mut app = ready_app(starlink_records());
        app.request_details(1);

        let overlay = app.overlay().unwrap();
        assert_eq!(overlay.record().mission_name, "Starlink 3");
        assert_eq!(app.scroll_gate().overflow(), Overflow::Hidden);
        assert_eq!(app.cursor(), 1);

        app.dismiss();
        assert!(app.overlay().is_none());
        assert_eq!(app.scroll_gate().overflow(), Overflow::Auto);
    }

    #[test]
    fn test_switching_selection_keeps_original_overflow() {
        let mut app = ready_app(starlink_records());
        app.request_details(0);
        app.request_details(1);
        assert_eq!(app.overlay().unwrap().record().flight_number, 85);
        app.dismiss();
        assert_eq!(app.scroll_gate().overflow(), Overflow::Auto);
    }

    #[test]
    fn test_dropping_app_releases_scroll_lock() {
        let gate = ScrollGate::default();
        let mut app = App::new(gate.clone());
        app.dispatch(Action::FetchSucceeded(starlink_records()));
        app.request_details(0);
        assert!(!gate.can_scroll());
        drop(app);
        assert!(gate.can_scroll());
    }

    #[test]
    fn test_request_details_out_of_range_is_ignored() {
        let mut app = ready_app(starlink_records());
        app.request_details(7);
        assert!(app.overlay().is_none());
    }

    #[test]
    fn test_cursor_moves_and_scrolls_grid() {
        // 120 wide → 3 columns; 40 high → 4 visible card rows
        let mut app = ready_app(many(30));
        app.cursor_down();
        assert_eq!(app.cursor(), 3);
        app.cursor_last();
        assert_eq!(app.cursor(), 29);
        assert_eq!(app.first_row(), 6);
        app.cursor_first();
        assert_eq!(app.first_row(), 0);
        app.cursor_up();
        assert_eq!(app.cursor(), 0);
    }

    #[test]
    fn test_grid_does_not_scroll_while_locked() {
        let mut app = ready_app(many(30));
        app.request_details(0);
        app.cursor_last();
        app.scroll_rows(3);
        assert_eq!(app.cursor(), 0);
        assert_eq!(app.first_row(), 0);

        app.dismiss();
        app.scroll_rows(3);
        assert_eq!(app.first_row(), 3);
        assert_eq!(app.cursor(), 9);
    }

    #[test]
    fn test_clicks_route_through_overlay() {
        let mut app = ready_app(starlink_records());
        let slots = layout::card_slots(layout::grid_area(Rect::new(0, 0, 120, 40)), 2, 0);

        app.click(slots[0].button.x + 2, slots[0].button.y);
        assert_eq!(app.overlay().unwrap().record().flight_number, 84);

        let overlay = layout::overlay(Rect::new(0, 0, 120, 40));
        app.click(overlay.content.x + 3, overlay.content.y + 3);
        assert!(app.overlay().is_some(), "click inside must not dismiss");

        app.click(0, 0);
        assert!(app.overlay().is_none());

        app.request_details(1);
        app.click(overlay.close_icon.x, overlay.close_icon.y);
        assert!(app.overlay().is_none());
    }

    #[test]
    fn test_detail_scrolls_without_moving_grid() {
        let mut app = ready_app(many(30));
        app.request_details(0);
        app.scroll_detail(3);
        assert_eq!(app.overlay().unwrap().offset(), 3);
        app.scroll_detail(i16::MAX);
        // ten body lines for a record without date or site
        assert_eq!(app.overlay().unwrap().offset(), 9);
        app.scroll_detail(i16::MIN);
        assert_eq!(app.overlay().unwrap().offset(), 0);
        assert_eq!(app.first_row(), 0);

        // A fresh overlay starts at the top.
        app.scroll_detail(2);
        app.request_details(1);
        assert_eq!(app.overlay().unwrap().offset(), 0);
    }

    #[tokio::test]
    async fn test_mount_fetches_once_and_settles() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v3/launches"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(STARLINK_FIXTURE, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let mut app = App::new(ScrollGate::default());
        app.mount(client.clone());
        app.mount(client);
        app.wait_for_fetch().await;

        assert_eq!(app.state().phase(), &Phase::Ready);
        assert_eq!(app.state().collection().len(), 2);
        assert_eq!(app.status_msg, "2 launches loaded");
    }

    #[tokio::test]
    async fn test_poll_fetch_applies_error_once() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let mut app = App::new(ScrollGate::default());
        app.mount(client_for(&server).await);

        let mut changed = false;
        for _ in 0..200 {
            if app.poll_fetch() {
                changed = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(changed);
        assert_eq!(app.state().error(), Some("Failed to fetch launches"));
        assert!(!app.poll_fetch());
    }

    #[tokio::test]
    async fn test_teardown_with_request_in_flight() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(STARLINK_FIXTURE, "application/json")
                    .set_delay(Duration::from_millis(200)),
            )
            .mount(&server)
            .await;

        let mut app = App::new(ScrollGate::default());
        app.mount(client_for(&server).await);
        drop(app);

        // The response lands after the app is gone; nothing may panic.
        tokio::time::sleep(Duration::from_millis(300)).await;
    }
}
