//! Gallery filter and selection
//!
//! Category filtering and item selection are independent axes. The visible
//! set is never stored: it is recomputed from the catalog and the current
//! category on every read, so the last `set_category` call always wins.

use crate::catalog::{self, Category, GalleryItem, ItemId};
use crate::error::GalleryError;

/// Items admitted by `category`, in catalog order
pub fn filter(catalog: &[GalleryItem], category: Category) -> Vec<&GalleryItem> {
    catalog
        .iter()
        .filter(|item| category.admits(item.category))
        .collect()
}

/// Discrete gallery state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
    pub active_category: Category,
    pub selected: Option<ItemId>,
}

#[derive(Clone, Debug)]
pub struct GalleryController {
    catalog: &'static [GalleryItem],
    state: ViewState,
}

impl Default for GalleryController {
    fn default() -> Self {
        Self::new(catalog::gallery())
    }
}

impl GalleryController {
    pub fn new(catalog: &'static [GalleryItem]) -> Self {
        Self {
            catalog,
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn active_category(&self) -> Category {
        self.state.active_category
    }

    /// Replace the active filter. Selection is left alone.
    pub fn set_category(&mut self, category: Category) {
        if self.state.active_category != category {
            tracing::trace!(%category, "gallery filter changed");
        }
        self.state.active_category = category;
    }

    /// Items passing the current filter
    pub fn visible(&self) -> Vec<&'static GalleryItem> {
        let category = self.state.active_category;
        self.catalog
            .iter()
            .filter(|item| category.admits(item.category))
            .collect()
    }

    pub fn selected(&self) -> Option<ItemId> {
        self.state.selected
    }

    pub fn selected_item(&self) -> Option<&'static GalleryItem> {
        let id = self.state.selected?;
        self.catalog.iter().find(|item| item.id == id)
    }

    /// Select an item from the unfiltered catalog.
    ///
    /// Unknown ids are rejected and leave the current selection untouched.
    pub fn select(&mut self, id: ItemId) -> Result<(), GalleryError> {
        if !self.catalog.iter().any(|item| item.id == id) {
            tracing::debug!(%id, "rejected selection of unknown item");
            return Err(GalleryError::UnknownItem(id));
        }
        self.state.selected = Some(id);
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.state.selected = None;
    }

    /// Back to the mount-time state
    pub fn reset(&mut self) {
        self.state = ViewState::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portrait_filter_subset_and_order() {
        let portraits = filter(catalog::gallery(), Category::Portrait);
        let ids: Vec<u32> = portraits.iter().map(|i| i.id.0).collect();
        assert_eq!(ids, vec![1, 3, 5, 7, 9, 11, 14, 17]);
        assert!(portraits.iter().all(|i| i.category == Category::Portrait));

        // Pure: same inputs, same output
        assert_eq!(portraits, filter(catalog::gallery(), Category::Portrait));
    }

    #[test]
    fn test_all_admits_everything() {
        let gallery = GalleryController::default();
        assert_eq!(gallery.visible().len(), 18);
    }

    #[test]
    fn test_rapid_switching_last_call_wins() {
        let mut gallery = GalleryController::default();
        for category in [Category::Family, Category::Creative, Category::Portrait, Category::Family] {
            gallery.set_category(category);
        }
        let ids: Vec<u32> = gallery.visible().iter().map(|i| i.id.0).collect();
        assert_eq!(ids, vec![4, 8, 13, 16]);
    }

    #[test]
    fn test_selection_survives_filter_changes() {
        let mut gallery = GalleryController::default();
        gallery.select(ItemId(2)).unwrap();
        gallery.set_category(Category::Family);
        assert_eq!(gallery.selected(), Some(ItemId(2)));
        assert_eq!(gallery.selected_item().map(|i| i.title), Some("Shadow Play"));

        gallery.set_category(Category::Portrait);
        gallery.deselect();
        assert_eq!(gallery.selected(), None);
    }

    #[test]
    fn test_unknown_item_is_rejected() {
        let mut gallery = GalleryController::default();
        gallery.select(ItemId(5)).unwrap();
        assert_eq!(gallery.select(ItemId(42)), Err(GalleryError::UnknownItem(ItemId(42))));
        assert_eq!(gallery.selected(), Some(ItemId(5)));
    }
}
