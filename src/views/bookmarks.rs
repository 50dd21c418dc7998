use super::{PreviewList, PreviewView, View};
use crate::dom::{Region, UiEvent};
use crate::events::{Action, Dispatcher};

/// Bookmark dropdown list
#[derive(Debug, Default)]
pub struct BookmarksView {
    data: Option<PreviewList>,
}

impl BookmarksView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_handler_render(&self, dispatcher: &mut Dispatcher) {
        dispatcher.register(|event, _| match event {
            UiEvent::Load => Some(Action::RenderBookmarks),
            _ => None,
        });
    }
}

impl View for BookmarksView {
    type Data = PreviewList;

    fn region(&self) -> Region {
        Region::Bookmarks
    }

    fn error_message(&self) -> &str {
        "No bookmarks yet! Find a nice recipe and bookmark it :)"
    }

    fn data(&self) -> Option<&PreviewList> {
        self.data.as_ref()
    }

    fn store(&mut self, data: PreviewList) {
        self.data = Some(data);
    }

    fn generate_markup(&self, list: &PreviewList) -> String {
        PreviewView::generate_list(&list.items, &list.active_id)
    }
}
