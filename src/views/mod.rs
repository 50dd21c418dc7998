use crate::dom::{Document, FormData, MountStatus, Reconciliation, Region};
use crate::model::{Recipe, RecipePreview, SearchState};
use log::debug;

mod add_recipe;
mod bookmarks;
mod pagination;
mod preview;
mod recipe;
mod results;
mod search;

pub use add_recipe::AddRecipeView;
pub use bookmarks::BookmarksView;
pub use pagination::PaginationView;
pub use preview::PreviewView;
pub use recipe::{format_quantity, RecipeView};
pub use results::ResultsView;
pub use search::SearchView;

pub const ICONS: &str = "img/icons.svg";

/// Data a view can display
pub trait ViewData {
    /// Blank data sends `render` down the error path and makes `update` a no-op
    fn is_blank(&self) -> bool {
        false
    }
}

impl ViewData for Recipe {}
impl ViewData for SearchState {}
impl ViewData for FormData {}

/// Previews plus the id of the recipe currently shown, so the matching link
/// can be highlighted
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewList {
    pub items: Vec<RecipePreview>,
    pub active_id: String,
}

impl PreviewList {
    pub fn new(items: Vec<RecipePreview>, active_id: impl Into<String>) -> Self {
        Self {
            items,
            active_id: active_id.into(),
        }
    }
}

impl ViewData for PreviewList {
    fn is_blank(&self) -> bool {
        self.items.is_empty()
    }
}

/// Rendering contract shared by every view. Views own their last data and
/// reach the page through the `Mount` of their region.
pub trait View {
    type Data: ViewData;

    fn region(&self) -> Region;

    /// Shown by `render_error` when no message is given
    fn error_message(&self) -> &str;

    /// Shown by `render_message` when no message is given
    fn message(&self) -> &str {
        ""
    }

    fn data(&self) -> Option<&Self::Data>;

    fn store(&mut self, data: Self::Data);

    fn generate_markup(&self, data: &Self::Data) -> String;

    /// Store `data` and return its markup without touching the document.
    /// Blank data yields `None`.
    fn render_markup(&mut self, data: Self::Data) -> Option<String> {
        if data.is_blank() {
            return None;
        }
        let markup = self.generate_markup(&data);
        self.store(data);
        Some(markup)
    }

    fn render(&mut self, document: &mut Document, data: Self::Data) {
        match self.render_markup(data) {
            Some(markup) => document
                .mount_mut(self.region())
                .replace(&markup, MountStatus::Content),
            None => self.render_error(document, None),
        }
    }

    /// Re-render into the existing fragment, patching it in place where possible
    fn update(&mut self, document: &mut Document, data: Self::Data) -> Option<Reconciliation> {
        let markup = self.render_markup(data)?;
        let outcome = document.mount_mut(self.region()).reconcile(&markup);
        debug!("{} update: {:?}", self.region().selector(), outcome);
        Some(outcome)
    }

    fn render_spinner(&self, document: &mut Document) {
        document
            .mount_mut(self.region())
            .replace(&spinner_markup(), MountStatus::Spinner);
    }

    fn render_error(&self, document: &mut Document, message: Option<&str>) {
        let message = message.unwrap_or(self.error_message());
        document
            .mount_mut(self.region())
            .replace(&status_markup("error", "icon-alert-triangle", message), MountStatus::Error);
    }

    fn render_message(&self, document: &mut Document, message: Option<&str>) {
        let message = message.unwrap_or(self.message());
        document
            .mount_mut(self.region())
            .replace(&status_markup("message", "icon-smile", message), MountStatus::Message);
    }
}

fn spinner_markup() -> String {
    format!(
        r#"<div class="spinner"><svg><use href="{}#icon-loader"></use></svg></div>"#,
        ICONS
    )
}

fn status_markup(class: &str, icon: &str, message: &str) -> String {
    format!(
        r#"<div class="{}"><div><svg><use href="{}#{}"></use></svg></div><p>{}</p></div>"#,
        class,
        ICONS,
        icon,
        text(message)
    )
}

/// Escape for element content
pub(crate) fn text(value: &str) -> String {
    html_escape::encode_text(value).into_owned()
}

/// Escape for a double-quoted attribute value
pub(crate) fn attr(value: &str) -> String {
    html_escape::encode_double_quoted_attribute(value).into_owned()
}
