use crate::dom::{Document, Region, UiEvent};
use crate::events::{Action, Dispatcher};

const QUERY_FIELD: &str = "query";

/// The search form in the header. It never renders; it only reads and clears
/// its input.
#[derive(Debug, Default)]
pub struct SearchView;

impl SearchView {
    pub fn new() -> Self {
        Self
    }

    /// Take the typed query and clear the field
    pub fn query(&self, document: &mut Document) -> String {
        let mount = document.mount_mut(Region::Search);
        let query = mount
            .form_data()
            .get(QUERY_FIELD)
            .unwrap_or_default()
            .to_string();
        mount.set_value(QUERY_FIELD, "");
        query
    }

    pub fn add_handler_search(&self, dispatcher: &mut Dispatcher) {
        dispatcher.register(|event, _| match event {
            UiEvent::Submit {
                region: Region::Search,
            } => Some(Action::Search),
            _ => None,
        });
    }
}
