pub(crate) mod element;

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use crate::foundation::core::Rect;
use crate::foundation::error::{RippleError, RippleResult};
use element::Element;

/// A live, renderable UI region the transition captures.
pub trait ContentRegion {
    /// Addressable bounding rectangle in page coordinates.
    fn bounds(&self) -> Rect;

    /// Root of the rendered element tree. Reading the tree may fail (e.g. the host tore it
    /// down between layout and capture).
    fn root(&self) -> RippleResult<&Element>;
}

/// Region backed by an owned element tree. The root element's box is the region's bounds.
#[derive(Clone, Debug, PartialEq)]
pub struct StaticRegion {
    root: Element,
}

impl StaticRegion {
    /// Wrap an element tree.
    pub fn new(root: Element) -> Self {
        Self { root }
    }

    /// Parse a region from a JSON element tree.
    pub fn from_json_str(s: &str) -> RippleResult<Self> {
        let root: Element = serde_json::from_str(s)
            .map_err(|e| RippleError::validation(format!("invalid region json: {e}")))?;
        Ok(Self::new(root))
    }

    /// Load a region from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> RippleResult<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path).map_err(|e| {
            RippleError::validation(format!("failed to read region '{}': {e}", path.display()))
        })?;
        Self::from_json_str(&s)
    }
}

impl ContentRegion for StaticRegion {
    fn bounds(&self) -> Rect {
        self.root.rect()
    }

    fn root(&self) -> RippleResult<&Element> {
        Ok(&self.root)
    }
}

/// Finds the content region in the host's render tree at trigger time.
pub trait RegionLocator {
    /// The region, or `None` when it is not currently mounted.
    fn locate(&self) -> Option<Rc<dyn ContentRegion>>;
}

/// Shared mount point for the live region.
///
/// The host mounts the region it is displaying and unmounts it when the view goes away; clones
/// observe the same slot.
#[derive(Clone, Default)]
pub struct RegionSlot {
    current: Rc<RefCell<Option<Rc<dyn ContentRegion>>>>,
}

impl RegionSlot {
    /// Empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot with a region already mounted.
    pub fn with_region(region: Rc<dyn ContentRegion>) -> Self {
        let slot = Self::new();
        slot.mount(region);
        slot
    }

    /// Mount (or replace) the live region.
    pub fn mount(&self, region: Rc<dyn ContentRegion>) {
        *self.current.borrow_mut() = Some(region);
    }

    /// Remove the live region.
    pub fn unmount(&self) {
        self.current.borrow_mut().take();
    }

    /// `true` when a region is mounted.
    pub fn is_mounted(&self) -> bool {
        self.current.borrow().is_some()
    }
}

impl RegionLocator for RegionSlot {
    fn locate(&self) -> Option<Rc<dyn ContentRegion>> {
        self.current.borrow().clone()
    }
}

impl std::fmt::Debug for RegionSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionSlot")
            .field("mounted", &self.is_mounted())
            .finish()
    }
}
