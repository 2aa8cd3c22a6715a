use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, info};

use crate::error::Result;
use crate::fs::listing::{DirectoryLister, DirectoryListing, EntryKind};
use crate::fs::operations::{self, OpenOptions, OpenedFile};

/// Stable handle of a node inside the navigator's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// One visited directory.
///
/// `parent` is a non-owning back-reference; `children` owns expanded subdirectories by name.
#[derive(Debug)]
pub struct TreeNode {
    pub name: String,
    pub listing: Arc<DirectoryListing>,
    pub parent: Option<NodeId>,
    pub children: HashMap<String, NodeId>,
}

/// What a navigation step produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    /// Nothing changed, or only the cursor moved.
    Idle,
    Descended(NodeId),
    Ascended(NodeId),
    Opened(OpenedFile),
    /// Ascend at the root, or an explicit cancel.
    Quit,
}

/// Zipper-style navigator over lazily expanded directories.
pub struct TreeNavigator {
    nodes: Vec<TreeNode>,
    current: NodeId,
    cursor: usize,
    lister: DirectoryLister,
    open_opts: OpenOptions,
    /// First visible row of the tree panel.
    pub scroll_offset: usize,
}

impl TreeNavigator {
    /// Create a navigator positioned at `root`.
    pub fn new(root: &Path, mut lister: DirectoryLister, open_opts: OpenOptions) -> Result<Self> {
        let listing = lister.list(root)?;
        let root_node = TreeNode {
            name: listing.path.to_string_lossy().to_string(),
            listing,
            parent: None,
            children: HashMap::new(),
        };
        Ok(Self {
            nodes: vec![root_node],
            current: NodeId(0),
            cursor: 0,
            lister,
            open_opts,
            scroll_offset: 0,
        })
    }

    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    #[allow(dead_code)]
    pub fn current_id(&self) -> NodeId {
        self.current
    }

    pub fn current(&self) -> &TreeNode {
        self.node(self.current)
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Keep the cursor row inside a window of `visible_height` rows.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.cursor < self.scroll_offset {
            self.scroll_offset = self.cursor;
        } else if self.cursor >= self.scroll_offset + visible_height {
            self.scroll_offset = self.cursor - visible_height + 1;
        }
    }

    /// Map a key to a navigation step.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<NavOutcome> {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Ok(NavOutcome::Quit)
            }
            KeyCode::Up => {
                self.move_up();
                Ok(NavOutcome::Idle)
            }
            KeyCode::Down => {
                self.move_down();
                Ok(NavOutcome::Idle)
            }
            KeyCode::Enter => self.select(),
            KeyCode::Left | KeyCode::Esc => Ok(self.ascend()),
            _ => Ok(NavOutcome::Idle),
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_down(&mut self) {
        let total = self.current().listing.total();
        if total > 0 && self.cursor < total - 1 {
            self.cursor += 1;
        }
    }

    /// Act on the item under the cursor: descend into a directory or open a file.
    ///
    /// On failure the position is left untouched and the error is returned.
    pub fn select(&mut self) -> Result<NavOutcome> {
        let listing = Arc::clone(&self.current().listing);
        let Some((kind, name)) = listing.item(self.cursor) else {
            return Ok(NavOutcome::Idle);
        };
        match kind {
            EntryKind::Directory => self.descend(name).map(NavOutcome::Descended),
            EntryKind::File | EntryKind::Executable => {
                let path = listing.path.join(name);
                let opened = operations::materialize(&path, &self.open_opts)?;
                info!(
                    source = %opened.source.display(),
                    materialized = %opened.materialized.display(),
                    size = opened.size,
                    "opened file"
                );
                Ok(NavOutcome::Opened(opened))
            }
        }
    }

    /// Descend into subdirectory `name` of the current node, reusing an
    /// already expanded child.
    pub fn descend(&mut self, name: &str) -> Result<NodeId> {
        let child_path = self.current().listing.path.join(name);
        let listing = self.lister.list(&child_path)?;

        let existing = self.current().children.get(name).copied();
        let id = match existing {
            Some(id) => {
                self.nodes[id.0].listing = listing;
                id
            }
            None => {
                let id = NodeId(self.nodes.len());
                self.nodes.push(TreeNode {
                    name: name.to_string(),
                    listing,
                    parent: Some(self.current),
                    children: HashMap::new(),
                });
                let current = self.current.0;
                self.nodes[current].children.insert(name.to_string(), id);
                id
            }
        };

        debug!(path = %child_path.display(), "descended");
        self.current = id;
        self.cursor = 0;
        self.scroll_offset = 0;
        Ok(id)
    }

    /// Move to the parent node, or request quit at the root.
    pub fn ascend(&mut self) -> NavOutcome {
        match self.current().parent {
            Some(parent) => {
                self.current = parent;
                self.cursor = 0;
                self.scroll_offset = 0;
                debug!(to = %self.current().name, "ascended");
                NavOutcome::Ascended(parent)
            }
            None => NavOutcome::Quit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::fs::listing::tests::MockSource;
    use crate::fs::listing::{ListingCache, RawEntry};
    use std::fs;
    use tempfile::TempDir;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mock_navigator() -> TreeNavigator {
        let source = MockSource::default()
            .with_dir(
                "/tmp/x",
                vec![
                    RawEntry::new("a", EntryKind::Directory),
                    RawEntry::new("b", EntryKind::Directory),
                    RawEntry::new("readme.txt", EntryKind::File),
                    RawEntry::new("run.sh", EntryKind::Executable),
                    RawEntry::new("locked", EntryKind::Directory),
                ],
            )
            .with_dir("/tmp/x/a", vec![RawEntry::new("inner", EntryKind::File)])
            .with_dir("/tmp/x/b", vec![]);
        let lister = DirectoryLister::new(Box::new(source), ListingCache::default(), true);
        TreeNavigator::new(Path::new("/tmp/x"), lister, OpenOptions::default()).unwrap()
    }

    fn setup_disk_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("hello.txt"), "hello").unwrap();
        dir
    }

    #[test]
    fn cursor_walks_regions_and_clamps() {
        let source = MockSource::default().with_dir(
            "/tmp/x",
            vec![
                RawEntry::new("a", EntryKind::Directory),
                RawEntry::new("b", EntryKind::Directory),
                RawEntry::new("readme.txt", EntryKind::File),
                RawEntry::new("run.sh", EntryKind::Executable),
            ],
        );
        let lister = DirectoryLister::new(Box::new(source), ListingCache::default(), true);
        let mut nav =
            TreeNavigator::new(Path::new("/tmp/x"), lister, OpenOptions::default()).unwrap();
        assert_eq!(nav.cursor(), 0);

        for _ in 0..2 {
            nav.move_down();
        }
        assert_eq!(nav.cursor(), 2);
        assert_eq!(
            nav.current().listing.item(2),
            Some((EntryKind::File, "readme.txt"))
        );

        nav.move_down();
        assert_eq!(
            nav.current().listing.item(nav.cursor()),
            Some((EntryKind::Executable, "run.sh"))
        );

        nav.move_down();
        assert_eq!(nav.cursor(), 3);
    }

    #[test]
    fn move_up_at_top_is_noop() {
        let mut nav = mock_navigator();
        nav.move_up();
        assert_eq!(nav.cursor(), 0);
    }

    #[test]
    fn movement_in_empty_directory_stays_at_zero() {
        let mut nav = mock_navigator();
        nav.move_down();
        nav.descend("b").unwrap();
        assert_eq!(nav.current().listing.total(), 0);
        nav.move_down();
        assert_eq!(nav.cursor(), 0);
        nav.move_up();
        assert_eq!(nav.cursor(), 0);
        assert_eq!(nav.select().unwrap(), NavOutcome::Idle);
    }

    #[test]
    fn descend_then_ascend_returns_same_node_with_cursor_reset() {
        let mut nav = mock_navigator();
        let root = nav.current_id();
        nav.move_down();
        nav.move_up();
        let outcome = nav.select().unwrap();
        let child = match outcome {
            NavOutcome::Descended(id) => id,
            other => panic!("expected descend, got {other:?}"),
        };
        assert_eq!(nav.current().name, "a");
        assert_eq!(nav.node(child).parent, Some(root));

        nav.move_down();
        assert_eq!(nav.ascend(), NavOutcome::Ascended(root));
        assert_eq!(nav.current_id(), root);
        assert_eq!(nav.cursor(), 0);
    }

    #[test]
    fn ascend_restores_cursor_to_zero_not_previous() {
        let mut nav = mock_navigator();
        nav.move_down();
        nav.select().unwrap();
        nav.ascend();
        assert_eq!(nav.cursor(), 0);
    }

    #[test]
    fn descending_twice_reuses_child() {
        let mut nav = mock_navigator();
        let first = nav.descend("a").unwrap();
        nav.ascend();
        let second = nav.descend("a").unwrap();
        assert_eq!(first, second);
        let root = nav.node(nav.current().parent.unwrap());
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn failed_expansion_leaves_position_unchanged() {
        let mut nav = mock_navigator();
        nav.move_down();
        nav.move_down();
        assert_eq!(
            nav.current().listing.item(nav.cursor()),
            Some((EntryKind::Directory, "locked"))
        );
        let root = nav.current_id();
        let err = nav.select().unwrap_err();
        assert!(matches!(err, AppError::ListDir { .. }));
        assert_eq!(nav.current_id(), root);
        assert_eq!(nav.cursor(), 2);
        assert!(nav.current().children.is_empty());
    }

    #[test]
    fn ascend_at_root_requests_quit() {
        let mut nav = mock_navigator();
        assert_eq!(nav.ascend(), NavOutcome::Quit);
        assert_eq!(nav.handle_key(key(KeyCode::Esc)).unwrap(), NavOutcome::Quit);
    }

    #[test]
    fn ctrl_c_quits_from_any_depth() {
        let mut nav = mock_navigator();
        nav.descend("a").unwrap();
        let outcome = nav
            .handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .unwrap();
        assert_eq!(outcome, NavOutcome::Quit);
    }

    #[test]
    fn keys_drive_navigation() {
        let mut nav = mock_navigator();
        nav.handle_key(key(KeyCode::Down)).unwrap();
        assert_eq!(nav.cursor(), 1);
        nav.handle_key(key(KeyCode::Up)).unwrap();
        let outcome = nav.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(matches!(outcome, NavOutcome::Descended(_)));
        let outcome = nav.handle_key(key(KeyCode::Left)).unwrap();
        assert!(matches!(outcome, NavOutcome::Ascended(_)));
    }

    #[test]
    fn selecting_file_materializes_it() {
        let dir = setup_disk_dir();
        let tmp = TempDir::new().unwrap();
        let opts = OpenOptions {
            temp_dir: tmp.path().to_path_buf(),
            ..Default::default()
        };
        let lister = DirectoryLister::disk(ListingCache::default(), true);
        let mut nav = TreeNavigator::new(dir.path(), lister, opts).unwrap();
        // sub, hello.txt
        nav.move_down();
        match nav.select().unwrap() {
            NavOutcome::Opened(opened) => {
                assert_eq!(opened.source, dir.path().join("hello.txt"));
                assert_eq!(opened.read_content().unwrap(), "hello");
            }
            other => panic!("expected open, got {other:?}"),
        }
    }

    #[test]
    fn oversized_file_is_rejected_without_moving() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("big.txt"), "0123456789").unwrap();
        let opts = OpenOptions {
            max_file_bytes: 4,
            temp_dir: dir.path().join("unused"),
        };
        let lister = DirectoryLister::disk(ListingCache::default(), true);
        let mut nav = TreeNavigator::new(dir.path(), lister, opts).unwrap();
        let err = nav.select().unwrap_err();
        assert!(matches!(err, AppError::FileTooLarge { size: 10, limit: 4 }));
        assert_eq!(nav.cursor(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn selecting_fifo_fails_without_moving() {
        let dir = setup_disk_dir();
        let status = std::process::Command::new("mkfifo")
            .arg(dir.path().join("pipe"))
            .status()
            .unwrap();
        assert!(status.success());
        let opts = OpenOptions {
            temp_dir: dir.path().join("sub"),
            ..Default::default()
        };
        let lister = DirectoryLister::disk(ListingCache::default(), true);
        let mut nav = TreeNavigator::new(dir.path(), lister, opts).unwrap();
        while nav.current().listing.item(nav.cursor()).map(|(_, n)| n) != Some("pipe") {
            nav.move_down();
        }
        let cursor = nav.cursor();
        let node = nav.current_id();

        let err = nav.select().unwrap_err();
        assert!(matches!(err, AppError::InvalidPath(_)));
        assert_eq!(nav.cursor(), cursor);
        assert_eq!(nav.current_id(), node);
        assert_eq!(fs::read_dir(dir.path().join("sub")).unwrap().count(), 0);
    }

    #[test]
    fn update_scroll_follows_cursor() {
        let mut nav = mock_navigator();
        for _ in 0..4 {
            nav.move_down();
        }
        nav.update_scroll(2);
        assert_eq!(nav.scroll_offset, 3);
        nav.move_up();
        nav.move_up();
        nav.update_scroll(2);
        assert_eq!(nav.scroll_offset, 2);
    }
}
