use crate::dom::{Document, FormData, UiEvent};
use std::num::NonZeroU32;

/// Typed intent produced by a view from a raw `UiEvent`
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Load the recipe named by the location hash
    ShowRecipe,
    RenderBookmarks,
    Search,
    GoToPage(usize),
    UpdateServings(NonZeroU32),
    ToggleBookmark,
    ToggleWindow,
    Upload(FormData),
}

type Handler = Box<dyn Fn(&UiEvent, &Document) -> Option<Action> + Send>;

/// Handlers registered by the views, consulted in registration order
#[derive(Default)]
pub struct Dispatcher {
    handlers: Vec<Handler>,
}

impl Dispatcher {
    pub fn register<F>(&mut self, handler: F)
    where
        F: Fn(&UiEvent, &Document) -> Option<Action> + Send + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    /// Every action the registered handlers derive from `event`
    pub fn dispatch(&self, event: &UiEvent, document: &Document) -> Vec<Action> {
        self.handlers
            .iter()
            .filter_map(|handler| handler(event, document))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dispatch_keeps_registration_order() {
        let mut dispatcher = Dispatcher::default();
        dispatcher.register(|event, _| (*event == UiEvent::Load).then_some(Action::RenderBookmarks));
        dispatcher.register(|_, _| None);
        dispatcher.register(|event, _| (*event == UiEvent::Load).then_some(Action::ShowRecipe));

        let document = Document::new();
        assert_eq!(dispatcher.len(), 3);
        assert_eq!(
            dispatcher.dispatch(&UiEvent::Load, &document),
            vec![Action::RenderBookmarks, Action::ShowRecipe]
        );
        assert!(dispatcher
            .dispatch(&UiEvent::HashChange, &document)
            .is_empty());
    }
}
