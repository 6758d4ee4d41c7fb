//! The record navigator
//!
//! A [`Navigator`] owns everything one viewing session needs: the source it
//! loads from, the store it persists positions to, the loaded records with
//! their cursor, and the [`View`] the host displays. Hosts drive it with one
//! `load` followed by any number of `advance`/`handle_key` calls.

use tracing::{debug, error, info, warn};

use super::error::{LoadError, RenderError};
use super::record::{ParseMode, RecordSet};
use super::source::ResourceSource;
use super::storage::{parse_position, storage_key, PositionStore};

/// Navigation direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    /// Map a key name to a direction; `None` for keys that do nothing
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowRight" | "n" => Some(Self::Forward),
            "ArrowLeft" | "p" => Some(Self::Backward),
            _ => None,
        }
    }
}

/// What to do with a restored position that lies past the last record
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RestorePolicy {
    /// Use the stored position as-is
    #[default]
    Unchecked,
    /// Pull the stored position back onto the last record
    Clamp,
}

/// Load-time behavior
#[derive(Debug, Clone, Copy, Default)]
pub struct NavigatorOptions {
    pub parse_mode: ParseMode,
    pub restore: RestorePolicy,
}

/// Host-visible state after the last render
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    /// Reference shown in the display surface
    pub display: Option<String>,
    /// Position indicator, e.g. `"2 of 50"`
    pub counter: Option<String>,
    pub can_go_back: bool,
    pub can_go_forward: bool,
}

#[derive(Debug)]
enum State {
    Unloaded,
    Loaded {
        resource_id: String,
        records: RecordSet,
        cursor: usize,
    },
}

/// Sequential viewer over one pack
pub struct Navigator<Src, St> {
    source: Src,
    store: St,
    options: NavigatorOptions,
    state: State,
    view: View,
}

impl<Src: ResourceSource, St: PositionStore> Navigator<Src, St> {
    pub fn new(source: Src, store: St) -> Self {
        Self::with_options(source, store, NavigatorOptions::default())
    }

    pub fn with_options(source: Src, store: St, options: NavigatorOptions) -> Self {
        Self {
            source,
            store,
            options,
            state: State::Unloaded,
            view: View::default(),
        }
    }

    /// Retrieve and parse a pack, restore its saved position, and render
    ///
    /// On failure the error is logged, the navigator stays unloaded with
    /// inert controls, and the error is returned for the host to report.
    /// A render failure after a successful load does not fail the load.
    pub async fn load(&mut self, resource_id: &str) -> Result<usize, LoadError> {
        self.state = State::Unloaded;
        self.view = View::default();

        let records = match self.fetch_records(resource_id).await {
            Ok(records) => records,
            Err(e) => {
                error!(
                    resource = resource_id,
                    location = %self.source.locate(resource_id),
                    error = %e,
                    "error loading pack"
                );
                return Err(e);
            }
        };

        let cursor = self.restore_cursor(resource_id, records.len());
        info!(
            resource = resource_id,
            records = records.len(),
            cursor,
            "pack loaded"
        );

        self.state = State::Loaded {
            resource_id: resource_id.to_string(),
            records,
            cursor,
        };

        if let Err(e) = self.render() {
            warn!(resource = resource_id, error = %e, "initial render failed");
        }
        self.update_controls();

        Ok(cursor)
    }

    async fn fetch_records(&self, resource_id: &str) -> Result<RecordSet, LoadError> {
        if resource_id.is_empty() {
            return Err(LoadError::EmptyResourceId);
        }
        let text = self.source.fetch(resource_id).await?;
        Ok(RecordSet::parse(&text, self.options.parse_mode))
    }

    fn restore_cursor(&self, resource_id: &str, len: usize) -> usize {
        let key = storage_key(resource_id);

        let stored = match self.store.get(&key) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(key = %key, error = %e, "could not read saved position");
                None
            }
        };

        let Some(value) = stored else {
            return 0;
        };

        let Some(position) = parse_position(&value) else {
            warn!(key = %key, value = %value, "ignoring malformed saved position");
            return 0;
        };

        match self.options.restore {
            RestorePolicy::Unchecked => {
                if position >= len && len > 0 {
                    warn!(key = %key, position, len, "saved position is past the last record");
                }
                position
            }
            RestorePolicy::Clamp => position.min(len.saturating_sub(1)),
        }
    }

    /// Show the record under the cursor and persist the cursor
    ///
    /// No-op for an unloaded navigator or an empty pack. Otherwise updates
    /// the display (when the record carries a reference) and the counter,
    /// then writes the cursor to the store exactly once.
    pub fn render(&mut self) -> Result<(), RenderError> {
        let State::Loaded {
            resource_id,
            records,
            cursor,
        } = &self.state
        else {
            return Ok(());
        };

        if records.is_empty() {
            return Ok(());
        }

        let record = records.get(*cursor).ok_or(RenderError::CursorOutOfRange {
            cursor: *cursor,
            len: records.len(),
        })?;

        if let Some(reference) = record.reference() {
            self.view.display = Some(reference.to_string());
        }
        self.view.counter = Some(format!("{} of {}", cursor + 1, records.len()));

        debug!(resource = %resource_id, cursor, "saving position");
        self.store
            .set(&storage_key(resource_id), &cursor.to_string())?;
        Ok(())
    }

    /// Recompute which directions are available
    pub fn update_controls(&mut self) {
        let (back, forward) = match &self.state {
            State::Loaded {
                records, cursor, ..
            } => (*cursor > 0, *cursor < records.len().saturating_sub(1)),
            State::Unloaded => (false, false),
        };
        self.view.can_go_back = back;
        self.view.can_go_forward = forward;
    }

    /// Move one record, or do nothing at a boundary
    ///
    /// Returns the cursor after the move, `None` when nothing is loaded.
    pub fn advance(&mut self, direction: Direction) -> Option<usize> {
        let State::Loaded {
            records, cursor, ..
        } = &mut self.state
        else {
            return None;
        };

        let moved = match direction {
            Direction::Forward if *cursor < records.len().saturating_sub(1) => *cursor + 1,
            Direction::Backward if *cursor > 0 => *cursor - 1,
            _ => {
                debug!(?direction, cursor = *cursor, "at boundary, ignoring");
                return Some(*cursor);
            }
        };
        *cursor = moved;

        if let Err(e) = self.render() {
            warn!(error = %e, "render failed");
        }
        self.update_controls();
        Some(moved)
    }

    /// Dispatch a key press; unknown keys are ignored
    pub fn handle_key(&mut self, key: &str) -> Option<usize> {
        match Direction::from_key(key) {
            Some(direction) => self.advance(direction),
            None => self.cursor(),
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, State::Loaded { .. })
    }

    pub fn cursor(&self) -> Option<usize> {
        match &self.state {
            State::Loaded { cursor, .. } => Some(*cursor),
            State::Unloaded => None,
        }
    }

    pub fn records(&self) -> Option<&RecordSet> {
        match &self.state {
            State::Loaded { records, .. } => Some(records),
            State::Unloaded => None,
        }
    }

    pub fn resource_id(&self) -> Option<&str> {
        match &self.state {
            State::Loaded { resource_id, .. } => Some(resource_id),
            State::Unloaded => None,
        }
    }

    pub fn store(&self) -> &St {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut St {
        &mut self.store
    }

    /// Give back the store, e.g. to reuse it for another pack
    pub fn into_store(self) -> St {
        self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigator::source::MemorySource;
    use crate::navigator::storage::MemoryStore;

    const PACK: &str = "q,analysis_url\na,http://x\nb,http://y\nc,http://z";

    fn source() -> MemorySource {
        MemorySource::new()
            .with_pack("pack1", PACK)
            .with_pack("pack2", PACK)
            .with_pack("empty", "q,analysis_url\n")
            .with_pack("sparse", "q,analysis_url\na,http://x\nb\nc,")
    }

    async fn loaded(resource_id: &str) -> Navigator<MemorySource, MemoryStore> {
        let mut nav = Navigator::new(source(), MemoryStore::new());
        nav.load(resource_id).await.unwrap();
        nav
    }

    #[tokio::test]
    async fn test_load_renders_first_record() {
        let nav = loaded("pack1").await;

        let records = nav.records().unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records.get(1).unwrap().get("q"), Some("b"));

        assert_eq!(nav.cursor(), Some(0));
        assert_eq!(nav.view().display.as_deref(), Some("http://x"));
        assert_eq!(nav.view().counter.as_deref(), Some("1 of 3"));
        assert!(!nav.view().can_go_back);
        assert!(nav.view().can_go_forward);
    }

    #[tokio::test]
    async fn test_forward_to_last_record() {
        let mut nav = loaded("pack1").await;

        nav.advance(Direction::Forward);
        assert_eq!(nav.advance(Direction::Forward), Some(2));

        let view = nav.view();
        assert_eq!(view.display.as_deref(), Some("http://z"));
        assert_eq!(view.counter.as_deref(), Some("3 of 3"));
        assert!(!view.can_go_forward);
        assert!(view.can_go_back);
    }

    #[tokio::test]
    async fn test_boundary_advance_does_not_write() {
        let mut nav = loaded("pack1").await;
        let writes = nav.store().writes();

        assert_eq!(nav.advance(Direction::Backward), Some(0));
        assert_eq!(nav.store().writes(), writes);

        nav.advance(Direction::Forward);
        nav.advance(Direction::Forward);
        let writes = nav.store().writes();

        assert_eq!(nav.advance(Direction::Forward), Some(2));
        assert_eq!(nav.cursor(), Some(2));
        assert_eq!(nav.store().writes(), writes);
    }

    #[tokio::test]
    async fn test_render_is_idempotent() {
        let mut nav = loaded("pack1").await;
        nav.advance(Direction::Forward);

        let before = nav.view().clone();
        let writes = nav.store().writes();
        nav.render().unwrap();
        nav.render().unwrap();

        assert_eq!(nav.view(), &before);
        assert_eq!(nav.store().writes(), writes + 2);
        assert_eq!(
            nav.store().get("position_pack1").unwrap().as_deref(),
            Some("1")
        );
    }

    #[tokio::test]
    async fn test_position_survives_reload() {
        let mut nav = loaded("pack1").await;
        nav.advance(Direction::Forward);
        nav.advance(Direction::Forward);

        let mut fresh = Navigator::new(source(), nav.into_store());
        assert_eq!(fresh.load("pack1").await.unwrap(), 2);
        assert_eq!(fresh.view().display.as_deref(), Some("http://z"));
        assert_eq!(fresh.view().counter.as_deref(), Some("3 of 3"));
    }

    #[tokio::test]
    async fn test_arrow_left_moves_backward() {
        let mut nav = loaded("pack1").await;
        nav.handle_key("n");
        assert_eq!(nav.cursor(), Some(1));

        assert_eq!(nav.handle_key("ArrowLeft"), Some(0));
        assert_eq!(nav.view().display.as_deref(), Some("http://x"));
    }

    #[tokio::test]
    async fn test_key_bindings() {
        let mut nav = loaded("pack1").await;

        assert_eq!(nav.handle_key("ArrowRight"), Some(1));
        assert_eq!(nav.handle_key("n"), Some(2));
        assert_eq!(nav.handle_key("p"), Some(1));

        let writes = nav.store().writes();
        assert_eq!(nav.handle_key("x"), Some(1));
        assert_eq!(nav.handle_key("N"), Some(1));
        assert_eq!(nav.handle_key("Enter"), Some(1));
        assert_eq!(nav.store().writes(), writes);
    }

    #[tokio::test]
    async fn test_packs_persist_independently() {
        let mut nav = loaded("pack2").await;
        nav.advance(Direction::Forward);

        let mut nav = Navigator::new(source(), nav.into_store());
        nav.load("pack1").await.unwrap();
        nav.advance(Direction::Forward);
        nav.advance(Direction::Forward);

        let store = nav.into_store();
        assert_eq!(store.get("position_pack1").unwrap().as_deref(), Some("2"));
        assert_eq!(store.get("position_pack2").unwrap().as_deref(), Some("1"));
    }

    #[tokio::test]
    async fn test_missing_reference_keeps_previous_display() {
        let mut nav = loaded("sparse").await;
        assert_eq!(nav.view().display.as_deref(), Some("http://x"));

        nav.advance(Direction::Forward);
        assert_eq!(nav.view().display.as_deref(), Some("http://x"));
        assert_eq!(nav.view().counter.as_deref(), Some("2 of 3"));

        nav.advance(Direction::Forward);
        assert_eq!(nav.view().display.as_deref(), Some("http://x"));
        assert_eq!(nav.view().counter.as_deref(), Some("3 of 3"));
    }

    #[tokio::test]
    async fn test_empty_pack_is_inert() {
        let mut nav = loaded("empty").await;

        assert!(nav.is_loaded());
        assert_eq!(nav.view(), &View::default());
        assert_eq!(nav.advance(Direction::Forward), Some(0));
        assert_eq!(nav.store().writes(), 0);
    }

    #[tokio::test]
    async fn test_failed_load_leaves_navigator_unloaded() {
        let mut nav = Navigator::new(source(), MemoryStore::new());

        assert!(nav.load("missing").await.is_err());
        assert!(matches!(
            nav.load("").await,
            Err(LoadError::EmptyResourceId)
        ));

        assert!(!nav.is_loaded());
        assert_eq!(nav.advance(Direction::Forward), None);
        assert_eq!(nav.handle_key("n"), None);
        assert_eq!(nav.view(), &View::default());
        assert_eq!(nav.store().writes(), 0);
    }

    #[tokio::test]
    async fn test_out_of_range_restore_is_kept_unchecked() {
        let mut store = MemoryStore::new();
        store.set("position_pack1", "7").unwrap();

        let mut nav = Navigator::new(source(), store);
        assert_eq!(nav.load("pack1").await.unwrap(), 7);

        assert!(matches!(
            nav.render(),
            Err(RenderError::CursorOutOfRange { cursor: 7, len: 3 })
        ));
        assert_eq!(nav.view().display, None);
        assert!(!nav.view().can_go_forward);
        assert!(nav.view().can_go_back);
        assert_eq!(nav.store().writes(), 1);

        // Stepping back walks toward the valid range
        assert_eq!(nav.advance(Direction::Backward), Some(6));
        for _ in 0..4 {
            nav.advance(Direction::Backward);
        }
        assert_eq!(nav.cursor(), Some(2));
        assert_eq!(nav.view().counter.as_deref(), Some("3 of 3"));
    }

    #[tokio::test]
    async fn test_restore_of_largest_position_does_not_overflow() {
        let mut store = MemoryStore::new();
        store.set("position_pack1", &usize::MAX.to_string()).unwrap();

        let mut nav = Navigator::new(source(), store);
        assert_eq!(nav.load("pack1").await.unwrap(), usize::MAX);
        assert!(!nav.view().can_go_forward);
        assert!(nav.view().can_go_back);

        assert_eq!(nav.advance(Direction::Forward), Some(usize::MAX));
        assert_eq!(nav.advance(Direction::Backward), Some(usize::MAX - 1));
        assert!(matches!(
            nav.render(),
            Err(RenderError::CursorOutOfRange { len: 3, .. })
        ));
    }

    #[tokio::test]
    async fn test_clamp_policy_pulls_back_restore() {
        let mut store = MemoryStore::new();
        store.set("position_pack1", "7").unwrap();

        let options = NavigatorOptions {
            restore: RestorePolicy::Clamp,
            ..Default::default()
        };
        let mut nav = Navigator::with_options(source(), store, options);

        assert_eq!(nav.load("pack1").await.unwrap(), 2);
        assert_eq!(nav.view().display.as_deref(), Some("http://z"));
        assert_eq!(
            nav.store().get("position_pack1").unwrap().as_deref(),
            Some("2")
        );
    }

    #[tokio::test]
    async fn test_malformed_saved_position_starts_at_zero() {
        let mut store = MemoryStore::new();
        store.set("position_pack1", "NaN").unwrap();

        let mut nav = Navigator::new(source(), store);
        assert_eq!(nav.load("pack1").await.unwrap(), 0);
        assert_eq!(nav.view().counter.as_deref(), Some("1 of 3"));
    }

    #[tokio::test]
    async fn test_resume_from_disk_store() {
        use crate::navigator::source::FileSource;
        use crate::navigator::storage::SqliteStore;
        use tempfile::TempDir;

        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("opening.csv"), PACK).unwrap();
        let db = dir.path().join("positions.db");

        {
            let store = SqliteStore::open(&db).unwrap();
            let mut nav = Navigator::new(FileSource::new(dir.path()), store);
            nav.load("opening.csv").await.unwrap();
            nav.handle_key("n");
        }

        let store = SqliteStore::open(&db).unwrap();
        let mut nav = Navigator::new(FileSource::new(dir.path()), store);
        assert_eq!(nav.load("opening.csv").await.unwrap(), 1);
        assert_eq!(nav.view().display.as_deref(), Some("http://y"));
        assert_eq!(nav.resource_id(), Some("opening.csv"));
    }

    #[tokio::test]
    async fn test_quoted_mode_through_navigator() {
        let source = MemorySource::new().with_pack(
            "quoted",
            "q,analysis_url\n\"a, with comma\",http://x\nb,http://y",
        );
        let options = NavigatorOptions {
            parse_mode: ParseMode::Quoted,
            ..Default::default()
        };
        let mut nav = Navigator::with_options(source, MemoryStore::new(), options);
        nav.load("quoted").await.unwrap();

        let records = nav.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records.get(0).unwrap().get("q"), Some("a, with comma"));
        assert_eq!(nav.view().display.as_deref(), Some("http://x"));
    }

    #[test]
    fn test_direction_from_key() {
        assert_eq!(Direction::from_key("ArrowRight"), Some(Direction::Forward));
        assert_eq!(Direction::from_key("n"), Some(Direction::Forward));
        assert_eq!(Direction::from_key("ArrowLeft"), Some(Direction::Backward));
        assert_eq!(Direction::from_key("p"), Some(Direction::Backward));
        assert_eq!(Direction::from_key("ArrowUp"), None);
    }
}
