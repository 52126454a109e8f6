use crate::models::{AdDraft, Availability};
use serde::Serialize;

/// Thumbnails shown under the main preview
pub const THUMBNAIL_LIMIT: usize = 3;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Thumbnail {
    /// Position in the image list, used to remove it
    pub index: usize,
    pub src: String,
}

/// Everything a renderer needs to draw the panel
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FormView {
    pub title: String,
    pub description: String,
    pub price: i64,
    pub status: Availability,
    /// `YYYY-MM-DD`, empty when unset
    pub move_in_date: String,
    /// Main preview, the most recently added image
    pub preview: Option<String>,
    pub thumbnails: Vec<Thumbnail>,
    pub image_count: usize,
    pub submit_label: &'static str,
    pub loading: bool,
}

impl FormView {
    pub(crate) fn render(draft: &AdDraft, editing: bool, loading: bool) -> Self {
        Self {
            title: draft.title.clone(),
            description: draft.description.clone(),
            price: draft.price,
            status: Availability::from_flag(draft.availability),
            move_in_date: draft
                .move_in_date
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            preview: draft.images.last().cloned(),
            thumbnails: draft
                .images
                .iter()
                .take(THUMBNAIL_LIMIT)
                .enumerate()
                .map(|(index, src)| Thumbnail {
                    index,
                    src: src.clone(),
                })
                .collect(),
            image_count: draft.images.len(),
            submit_label: if editing { "Update" } else { "Upload" },
            loading,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_is_last_and_thumbnails_are_first_three() {
        let draft = AdDraft {
            images: (0..5).map(|i| format!("data:image/png;base64,{}", i)).collect(),
            ..AdDraft::default()
        };
        let view = FormView::render(&draft, false, false);

        assert_eq!(view.preview.as_deref(), Some("data:image/png;base64,4"));
        assert_eq!(view.thumbnails.len(), 3);
        assert_eq!(view.thumbnails[2].index, 2);
        assert_eq!(view.image_count, 5);
        assert_eq!(view.submit_label, "Upload");
    }

    #[test]
    fn empty_draft_view() {
        let view = FormView::render(&AdDraft::default(), true, true);
        assert!(view.preview.is_none());
        assert!(view.thumbnails.is_empty());
        assert_eq!(view.move_in_date, "");
        assert_eq!(view.status, Availability::Available);
        assert_eq!(view.submit_label, "Update");
        assert!(view.loading);
    }
}
