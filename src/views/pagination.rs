use super::{View, ICONS};
use crate::dom::{Region, UiEvent};
use crate::events::{Action, Dispatcher};
use crate::model::SearchState;

/// Previous/next page buttons under the results
#[derive(Debug, Default)]
pub struct PaginationView {
    data: Option<SearchState>,
}

impl PaginationView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_handler_click(&self, dispatcher: &mut Dispatcher) {
        dispatcher.register(|event, document| {
            let UiEvent::Click {
                region: Region::Pagination,
                target: Some(target),
            } = event
            else {
                return None;
            };
            let button = document
                .mount(Region::Pagination)
                .closest(*target, "btn--inline")?;
            let page: usize = button.attr("data-goto")?.parse().ok()?;
            (page > 0).then_some(Action::GoToPage(page))
        });
    }

    fn prev_button(page: usize) -> String {
        format!(
            r#"<button data-goto="{page}" class="btn--inline pagination__btn--prev">
  <svg class="search__icon"><use href="{icons}#icon-arrow-left"></use></svg>
  <span>Page {page}</span>
</button>"#,
            page = page,
            icons = ICONS,
        )
    }

    fn next_button(page: usize) -> String {
        format!(
            r#"<button data-goto="{page}" class="btn--inline pagination__btn--next">
  <span>Page {page}</span>
  <svg class="search__icon"><use href="{icons}#icon-arrow-right"></use></svg>
</button>"#,
            page = page,
            icons = ICONS,
        )
    }
}

impl View for PaginationView {
    type Data = SearchState;

    fn region(&self) -> Region {
        Region::Pagination
    }

    fn error_message(&self) -> &str {
        ""
    }

    fn data(&self) -> Option<&SearchState> {
        self.data.as_ref()
    }

    fn store(&mut self, data: SearchState) {
        self.data = Some(data);
    }

    fn generate_markup(&self, search: &SearchState) -> String {
        let pages = search.page_count();
        let page = search.page;
        let mut markup = String::new();

        if page > 1 && pages > 0 {
            markup.push_str(&Self::prev_button(page - 1));
        }
        if page < pages {
            markup.push_str(&Self::next_button(page + 1));
        }
        markup
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use crate::model::RecipePreview;

    fn search(results: usize, page: usize) -> SearchState {
        let mut search = SearchState::new(10);
        search.results = (0..results)
            .map(|i| RecipePreview {
                id: i.to_string(),
                title: String::new(),
                publisher: String::new(),
                image: String::new(),
                key: None,
            })
            .collect();
        search.page = page;
        search
    }

    fn gotos(view: &PaginationView, search: &SearchState) -> Vec<String> {
        let mut document = Document::new();
        document
            .mount_mut(Region::Pagination)
            .replace(&view.generate_markup(search), crate::dom::MountStatus::Content);
        let mount = document.mount(Region::Pagination);
        mount
            .find_all("btn--inline")
            .into_iter()
            .filter_map(|i| mount.element(i)?.attr("data-goto").map(String::from))
            .collect()
    }

    #[test]
    fn test_buttons_per_page_position() {
        let view = PaginationView::new();
        assert_eq!(gotos(&view, &search(23, 1)), vec!["2"]);
        assert_eq!(gotos(&view, &search(23, 2)), vec!["1", "3"]);
        assert_eq!(gotos(&view, &search(23, 3)), vec!["2"]);
        assert!(gotos(&view, &search(7, 1)).is_empty());
        assert!(gotos(&view, &search(0, 1)).is_empty());
    }

    #[test]
    fn test_click_on_button_label_goes_to_page() {
        let mut document = Document::new();
        let mut view = PaginationView::new();
        let mut dispatcher = Dispatcher::default();
        view.add_handler_click(&mut dispatcher);
        view.render(&mut document, search(23, 2));

        let next = document
            .mount(Region::Pagination)
            .find("pagination__btn--next")
            .unwrap();
        // the span inside the button
        let event = UiEvent::Click {
            region: Region::Pagination,
            target: Some(next + 1),
        };
        assert_eq!(
            dispatcher.dispatch(&event, &document),
            vec![Action::GoToPage(3)]
        );
    }
}
