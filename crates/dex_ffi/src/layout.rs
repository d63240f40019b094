//! Widget layout descriptions per display size class.
//!
//! # Responsibility
//! - Map one snapshot entry to a render description for a size class.
//!
//! # Invariants
//! - Pure: no I/O, no clock, no store access.
//! - Background color always derives from the entry's primary category.

use dex_core::SnapshotEntry;

const LARGE_TITLE_LINE_LIMIT: u32 = 1;
const LARGE_TITLE_MIN_SCALE: f32 = 0.75;

/// Display surface size families.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetSizeClass {
    Small,
    Medium,
    Large,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleFont {
    Title,
    LargeTitle,
}

/// One category capsule; `color` names an asset color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryBadge {
    pub label: String,
    pub color: String,
}

/// What the rendering layer should paint for one entry.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderDescription {
    /// Sprite only.
    Image {
        image_reference: String,
        background_color: String,
    },
    /// Sprite leading, title and badges trailing.
    Row {
        image_reference: String,
        title: String,
        title_font: TitleFont,
        badges: Vec<CategoryBadge>,
        background_color: String,
    },
    /// Title over the sprite, badges pinned to the trailing bottom edge.
    Overlay {
        image_reference: String,
        title: String,
        title_font: TitleFont,
        title_line_limit: u32,
        title_min_scale: f32,
        badges: Vec<CategoryBadge>,
        background_color: String,
    },
}

impl RenderDescription {
    pub fn background_color(&self) -> &str {
        match self {
            Self::Image {
                background_color, ..
            }
            | Self::Row {
                background_color, ..
            }
            | Self::Overlay {
                background_color, ..
            } => background_color,
        }
    }
}

/// Lays out `entry` for `size_class`.
pub fn layout(size_class: WidgetSizeClass, entry: &SnapshotEntry) -> RenderDescription {
    let image_reference = entry.image_reference.as_str().to_string();
    let background_color = capitalized(entry.primary_category());

    match size_class {
        WidgetSizeClass::Small => RenderDescription::Image {
            image_reference,
            background_color,
        },
        WidgetSizeClass::Medium => RenderDescription::Row {
            image_reference,
            title: capitalized(&entry.name),
            title_font: TitleFont::Title,
            badges: badges(entry),
            background_color,
        },
        WidgetSizeClass::Large => RenderDescription::Overlay {
            image_reference,
            title: capitalized(&entry.name),
            title_font: TitleFont::LargeTitle,
            title_line_limit: LARGE_TITLE_LINE_LIMIT,
            title_min_scale: LARGE_TITLE_MIN_SCALE,
            badges: badges(entry),
            background_color,
        },
    }
}

fn badges(entry: &SnapshotEntry) -> Vec<CategoryBadge> {
    entry
        .categories
        .iter()
        .map(|category| {
            let label = capitalized(category);
            CategoryBadge {
                color: label.clone(),
                label,
            }
        })
        .collect()
}

/// Uppercases the first letter of each whitespace-separated word and
/// lowercases the rest.
pub fn capitalized(value: &str) -> String {
    let mut output = String::with_capacity(value.len());
    let mut at_word_start = true;
    for ch in value.chars() {
        if ch.is_whitespace() {
            at_word_start = true;
            output.push(ch);
        } else if at_word_start {
            at_word_start = false;
            output.extend(ch.to_uppercase());
        } else {
            output.extend(ch.to_lowercase());
        }
    }
    output
}
