use super::{PreviewList, PreviewView, View};
use crate::dom::Region;

/// Current page of search results
#[derive(Debug, Default)]
pub struct ResultsView {
    data: Option<PreviewList>,
}

impl ResultsView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl View for ResultsView {
    type Data = PreviewList;

    fn region(&self) -> Region {
        Region::Results
    }

    fn error_message(&self) -> &str {
        "No recipes found for your query! Please try again"
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
