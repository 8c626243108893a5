//! Static site content: gallery catalog, navigation, process and featured work

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SiteError;

/// Gallery item identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Gallery filter categories
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    All,
    Portrait,
    Creative,
    Family,
}

impl Category {
    /// Filter buttons, in display order
    pub const ALL: [Category; 4] = [Category::All, Category::Portrait, Category::Creative, Category::Family];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Portrait => "portrait",
            Category::Creative => "creative",
            Category::Family => "family",
        }
    }

    /// Whether an item of category `item` passes this filter
    pub fn admits(&self, item: Category) -> bool {
        *self == Category::All || *self == item
    }

    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|c| c == self).unwrap_or(0)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = SiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| SiteError::UnknownCategory(s.to_string()))
    }
}

/// One photograph in the gallery
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GalleryItem {
    pub id: ItemId,
    pub category: Category,
    pub title: &'static str,
    pub image_ref: &'static str,
}

const fn item(id: u32, category: Category, title: &'static str, image_ref: &'static str) -> GalleryItem {
    GalleryItem {
        id: ItemId(id),
        category,
        title,
        image_ref,
    }
}

use Category::{Creative, Family, Portrait};

static GALLERY: [GalleryItem; 18] = [
    item(1, Portrait, "Ethereal Light", "https://images.unsplash.com/photo-1531746020798-e6953c6e8e04?w=800&q=80"),
    item(2, Creative, "Shadow Play", "https://images.unsplash.com/photo-1617638924571-92d272ce9338?w=800&q=80"),
    item(3, Portrait, "Silent Thoughts", "https://images.unsplash.com/photo-1604514628550-37477afdf4e3?w=800&q=80"),
    item(4, Family, "Tender Moments", "https://images.unsplash.com/photo-1606216265946-61fe4a1d3b84?w=800&q=80"),
    item(5, Portrait, "Golden Hour", "https://images.unsplash.com/photo-1502823403499-6ccfcf4fb453?w=800&q=80"),
    item(6, Creative, "Urban Dreams", "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?w=800&q=80"),
    item(7, Portrait, "Soft Focus", "https://images.unsplash.com/photo-1488426862026-3ee34a7d66df?w=800&q=80"),
    item(8, Family, "Generations", "https://images.unsplash.com/photo-1495366691023-cc4eadcc2d7e?w=800&q=80"),
    item(9, Portrait, "Natural Beauty", "https://images.unsplash.com/photo-1544005313-94ddf0286df2?w=800&q=80"),
    item(10, Creative, "Contemplation", "https://images.unsplash.com/photo-1519058082700-08a0b56da9b4?w=800&q=80"),
    item(11, Portrait, "Vibrant Soul", "https://images.unsplash.com/photo-1534528741775-53994a69daeb?w=800&q=80"),
    item(12, Creative, "Artistic Vision", "https://images.unsplash.com/photo-1517841905240-472988babdf9?w=800&q=80"),
    item(13, Family, "Joy Unfiltered", "https://images.unsplash.com/photo-1511551203524-9a24350a5771?w=800&q=80"),
    item(14, Portrait, "Quiet Strength", "https://images.unsplash.com/photo-1529626455594-4ff0802cfb7e?w=800&q=80"),
    item(15, Creative, "Urban Poetry", "https://images.unsplash.com/photo-1504703395950-b89145a5425b?w=800&q=80"),
    item(16, Family, "Connection", "https://images.unsplash.com/photo-1496440737103-cd596325d314?w=800&q=80"),
    item(17, Portrait, "Bold Expression", "https://images.unsplash.com/photo-1521119989659-a83eee488004?w=800&q=80"),
    item(18, Creative, "Timeless", "https://images.unsplash.com/photo-1508214751196-bcfd4ca60f91?w=800&q=80"),
];

/// The full gallery, in display order
pub fn gallery() -> &'static [GalleryItem] {
    &GALLERY
}

/// Look up an item by id in the unfiltered catalog
pub fn find(id: ItemId) -> Option<&'static GalleryItem> {
    GALLERY.iter().find(|item| item.id == id)
}

/// Full-screen navigation destination
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavItem {
    pub path: &'static str,
    pub label: &'static str,
    pub preview_image: &'static str,
}

pub static NAV_ITEMS: [NavItem; 4] = [
    NavItem {
        path: "/",
        label: "Stories",
        preview_image: "https://images.unsplash.com/photo-1604514628550-37477afdf4e3?w=400&q=80",
    },
    NavItem {
        path: "/gallery",
        label: "Gallery",
        preview_image: "https://images.unsplash.com/photo-1606216265946-61fe4a1d3b84?w=400&q=80",
    },
    NavItem {
        path: "/process",
        label: "Process",
        preview_image: "https://images.unsplash.com/photo-1617638924571-92d272ce9338?w=400&q=80",
    },
    NavItem {
        path: "/connect",
        label: "Connect",
        preview_image: "https://images.unsplash.com/photo-1531746020798-e6953c6e8e04?w=400&q=80",
    },
];

/// Images floating in the home page hero
pub static HERO_IMAGES: [&str; 5] = [
    "https://images.unsplash.com/photo-1531746020798-e6953c6e8e04?auto=format&fit=crop&w=800&q=80",
    "https://images.unsplash.com/photo-1544005313-94ddf0286df2?auto=format&fit=crop&w=800&q=80",
    "https://images.unsplash.com/photo-1506794778202-cad84cf45f1d?auto=format&fit=crop&w=800&q=80",
    "https://images.unsplash.com/photo-1517841905240-472988babdf9?auto=format&fit=crop&w=800&q=80",
    "https://images.unsplash.com/photo-1507003211169-0a1dd7228f2d?auto=format&fit=crop&w=800&q=80",
];

/// One stage of the process narrative
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProcessStep {
    pub number: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub image: &'static str,
}

pub static PROCESS_STEPS: [ProcessStep; 4] = [
    ProcessStep {
        number: "01",
        title: "Vision",
        description: "We begin with understanding your story, your essence, and what makes you unique.",
        image: "https://images.unsplash.com/photo-1600298881974-6be191ceeda1?w=600&q=80",
    },
    ProcessStep {
        number: "02",
        title: "Creation",
        description: "Through careful composition and natural light, we capture authentic moments.",
        image: "https://images.unsplash.com/photo-1492691527719-9d1e07e534b4?w=600&q=80",
    },
    ProcessStep {
        number: "03",
        title: "Refinement",
        description: "Each image is thoughtfully edited to enhance the mood and emotion.",
        image: "https://images.unsplash.com/photo-1526510747491-58f928ec870f?w=600&q=80",
    },
    ProcessStep {
        number: "04",
        title: "Delivery",
        description: "Your visual story comes to life in a beautifully curated collection.",
        image: "https://images.unsplash.com/photo-1609220136736-443140cffec6?w=600&q=80",
    },
];

/// A project card on the home page
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeaturedProject {
    pub title: &'static str,
    pub category: &'static str,
    pub image: &'static str,
}

pub static FEATURED_WORK: [FeaturedProject; 3] = [
    FeaturedProject {
        title: "Ethereal Portraits",
        category: "Editorial",
        image: "https://images.unsplash.com/photo-1531746020798-e6953c6e8e04?w=800&q=80",
    },
    FeaturedProject {
        title: "Urban Stories",
        category: "Creative",
        image: "https://images.unsplash.com/photo-1617638924571-92d272ce9338?w=800&q=80",
    },
    FeaturedProject {
        title: "Family Moments",
        category: "Lifestyle",
        image: "https://images.unsplash.com/photo-1606216265946-61fe4a1d3b84?w=800&q=80",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_shape() {
        assert_eq!(gallery().len(), 18);
        let ids: Vec<u32> = gallery().iter().map(|i| i.id.0).collect();
        assert_eq!(ids, (1..=18).collect::<Vec<_>>());
        assert!(gallery().iter().all(|i| i.category != Category::All));
    }

    #[test]
    fn test_category_parse_and_display() {
        assert_eq!("portrait".parse::<Category>().unwrap(), Category::Portrait);
        assert_eq!(" Family ".parse::<Category>().unwrap(), Category::Family);
        assert_eq!(Category::Creative.to_string(), "creative");
        assert_eq!(
            "landscape".parse::<Category>(),
            Err(SiteError::UnknownCategory("landscape".to_string()))
        );
    }

    #[test]
    fn test_find() {
        assert_eq!(find(ItemId(9)).map(|i| i.title), Some("Natural Beauty"));
        assert!(find(ItemId(0)).is_none());
        assert!(find(ItemId(19)).is_none());
    }
}
