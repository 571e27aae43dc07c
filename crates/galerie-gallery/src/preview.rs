//! Preview surface
//!
//! Stateless description of one stored file for rendering, plus the local
//! lightbox boolean. Nothing here touches shared state: clicks resolve to
//! actions the caller dispatches (opening the lightbox, or handing the file
//! to the registry's download path).

use galerie_core::{human_size, FileKind, StoredFile};

/// What a click on a file tile resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    /// Show the image full-size in the lightbox.
    OpenLightbox,
    /// Hand the file to `FileRegistry::request_download`.
    Download,
}

/// Icon name for a file tile.
pub fn icon(kind: FileKind) -> &'static str {
    match kind {
        FileKind::Image => "image",
        FileKind::Pdf => "pdf",
        FileKind::Doc => "doc",
        FileKind::Xls => "xls",
        FileKind::Video => "video",
        FileKind::Other => "file",
    }
}

/// Metadata line shown under the tile.
pub fn caption(file: &StoredFile) -> String {
    let mut line = format!(
        "{} - {} - {}",
        file.name,
        human_size(file.size_bytes),
        file.created_at.format("%Y-%m-%d")
    );
    if let Some(by) = &file.uploaded_by {
        line.push_str(&format!(" - {}", by));
    }
    line
}

/// Only images with a reachable URL open the lightbox; everything else
/// falls back to a direct download.
pub fn click_action(file: &StoredFile) -> ClickAction {
    if file.kind == FileKind::Image && !file.url.is_empty() {
        ClickAction::OpenLightbox
    } else {
        ClickAction::Download
    }
}

/// Local "is the lightbox open" state for one preview surface.
#[derive(Debug, Default)]
pub struct Lightbox {
    open: bool,
}

impl Lightbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Handle a click on a file tile, opening the lightbox when the file
    /// supports it. Returns the action for the caller to dispatch.
    pub fn on_file_click(&mut self, file: &StoredFile) -> ClickAction {
        let action = click_action(file);
        if action == ClickAction::OpenLightbox {
            self.open = true;
        }
        action
    }

    /// A click on the overlay closes the lightbox.
    pub fn on_overlay_click(&mut self) {
        self.open = false;
    }

    /// The explicit close affordance.
    pub fn close(&mut self) {
        self.open = false;
    }
}
