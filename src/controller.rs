//! Glue between the document, the views and the model.
//!
//! User actions arrive as `UiEvent`s, are translated to `Action`s by the
//! handlers the views registered, and are answered here. Network requests run
//! on a `JoinSet`; their results come back as `Completion`s and are applied on
//! the controller's own task, so state never needs a lock.

use crate::api::ForkifyApi;
use crate::config::AppConfig;
use crate::dom::{Document, FormData, UiEvent};
use crate::error::Result;
use crate::events::{Action, Dispatcher};
use crate::model::{Recipe, RecipePreview};
use crate::state::{parse_new_recipe, Model, Slot, Ticket};
use crate::storage::FileStore;
use crate::views::{
    AddRecipeView, BookmarksView, PaginationView, PreviewList, RecipeView, ResultsView,
    SearchView, View,
};
use log::{debug, error, info, warn};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};

/// One instance of every view on the page
#[derive(Debug, Default)]
pub struct Views {
    pub recipe: RecipeView,
    pub search: SearchView,
    pub results: ResultsView,
    pub pagination: PaginationView,
    pub bookmarks: BookmarksView,
    pub add_recipe: AddRecipeView,
}

/// Outcome of a spawned request, applied back on the controller task
#[derive(Debug)]
enum Completion {
    Recipe {
        ticket: Ticket,
        id: String,
        result: Result<Recipe>,
    },
    Search {
        ticket: Ticket,
        result: Result<Vec<RecipePreview>>,
    },
    Upload {
        result: Result<Recipe>,
    },
    CloseWindow,
}

pub struct Controller {
    model: Model,
    document: Document,
    views: Views,
    dispatcher: Dispatcher,
    pending: JoinSet<Completion>,
    modal_close: Duration,
    /// The latest search ended in an error
    search_failed: bool,
}

impl Controller {
    /// Restore bookmarks and wire every view handler to the document
    pub fn init(mut model: Model, modal_close: Duration) -> Result<Self> {
        model.restore_bookmarks()?;

        let views = Views::default();
        let mut dispatcher = Dispatcher::default();
        views.bookmarks.add_handler_render(&mut dispatcher);
        views.recipe.add_handler_render(&mut dispatcher);
        views.recipe.add_handler_update_servings(&mut dispatcher);
        views.recipe.add_handler_toggle_bookmark(&mut dispatcher);
        views.search.add_handler_search(&mut dispatcher);
        views.pagination.add_handler_click(&mut dispatcher);
        views.add_recipe.add_handler_upload(&mut dispatcher);
        views.add_recipe.add_handler_toggle_window(&mut dispatcher);

        let mut controller = Self {
            model,
            document: Document::new(),
            views,
            dispatcher,
            pending: JoinSet::new(),
            modal_close,
            search_failed: false,
        };
        controller
            .views
            .add_recipe
            .render_form(&mut controller.document);
        debug!(
            "Controller ready with {} handlers",
            controller.dispatcher.len()
        );
        Ok(controller)
    }

    /// Build the app against the configured API and bookmark file
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let api = Arc::new(ForkifyApi::new(config));
        let store = Box::new(FileStore::new(&config.bookmarks_path));
        let model = Model::new(api, store, config.results_per_page);
        Self::init(model, config.modal_close_delay())
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }

    /// Jump to `page` of the latest search. Does nothing when that search
    /// failed, so its error stays on screen.
    pub fn show_page(&mut self, page: usize) -> bool {
        if self.search_failed {
            debug!("Not paginating a failed search");
            return false;
        }
        self.handle(Action::GoToPage(page));
        true
    }

    /// Number of requests still in flight
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Feed one document event through the registered handlers
    pub fn dispatch(&mut self, event: UiEvent) {
        let actions = self.dispatcher.dispatch(&event, &self.document);
        if actions.is_empty() {
            debug!("No handler for {:?}", event);
        }
        for action in actions {
            self.handle(action);
        }
    }

    pub fn handle(&mut self, action: Action) {
        debug!("Handling {:?}", action);
        match action {
            Action::ShowRecipe => self.control_recipe(),
            Action::RenderBookmarks => self.control_bookmarks(),
            Action::Search => self.control_search(),
            Action::GoToPage(page) => self.render_results_page(Some(page)),
            Action::UpdateServings(servings) => self.control_servings(servings),
            Action::ToggleBookmark => self.control_toggle_bookmark(),
            Action::ToggleWindow => self.views.add_recipe.toggle_window(&mut self.document),
            Action::Upload(form) => self.control_upload(form),
        }
    }

    /// Wait until every in-flight request, and anything it scheduled, is applied
    pub async fn settle(&mut self) {
        while let Some(joined) = self.pending.join_next().await {
            self.on_joined(joined);
        }
    }

    /// Serve events until the sender side closes, then drain what is pending
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<UiEvent>) -> Self {
        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.dispatch(event),
                    None => break,
                },
                Some(joined) = self.pending.join_next(), if !self.pending.is_empty() => {
                    self.on_joined(joined);
                }
            }
        }
        self.settle().await;
        self
    }

    fn on_joined(&mut self, joined: std::result::Result<Completion, JoinError>) {
        match joined {
            Ok(completion) => self.complete(completion),
            Err(e) => error!("Background request failed to finish: {}", e),
        }
    }

    fn control_recipe(&mut self) {
        let id = self.document.hash().to_string();
        if id.is_empty() {
            return;
        }
        self.views.recipe.render_spinner(&mut self.document);

        let results = self.results_list(None);
        self.views.results.update(&mut self.document, results);
        let bookmarks = self.bookmark_list();
        self.views.bookmarks.update(&mut self.document, bookmarks);

        let ticket = self.model.issue(Slot::Recipe);
        let api = self.model.api();
        self.pending.spawn(async move {
            let result = api.get_recipe(&id).await;
            Completion::Recipe { ticket, id, result }
        });
    }

    fn control_bookmarks(&mut self) {
        let bookmarks = self.bookmark_list();
        self.views.bookmarks.render(&mut self.document, bookmarks);
    }

    fn control_search(&mut self) {
        let query = self.views.search.query(&mut self.document);
        let query = query.trim();
        if query.is_empty() {
            return;
        }
        self.views.results.render_spinner(&mut self.document);

        let ticket = self.model.begin_search(query);
        let api = self.model.api();
        let query = query.to_string();
        self.pending.spawn(async move {
            let result = api.search(&query).await;
            Completion::Search { ticket, result }
        });
    }

    fn control_servings(&mut self, servings: NonZeroU32) {
        self.model.update_servings(servings);
        if let Some(recipe) = self.model.state().recipe.clone() {
            self.views.recipe.update(&mut self.document, recipe);
        }
    }

    fn control_toggle_bookmark(&mut self) {
        let Some(recipe) = self.model.state().recipe.clone() else {
            return;
        };
        let outcome = if recipe.bookmarked {
            self.model.remove_bookmark(&recipe.id)
        } else {
            self.model.add_bookmark(recipe)
        };
        if let Err(e) = outcome {
            error!("Saving bookmarks failed: {}", e);
            self.views
                .recipe
                .render_error(&mut self.document, Some(&e.to_string()));
            return;
        }

        if let Some(recipe) = self.model.state().recipe.clone() {
            self.views.recipe.update(&mut self.document, recipe);
        }
        self.control_bookmarks();
    }

    fn control_upload(&mut self, form: FormData) {
        self.views.add_recipe.render_spinner(&mut self.document);

        let new_recipe = match parse_new_recipe(&form) {
            Ok(new_recipe) => new_recipe,
            Err(e) => {
                warn!("Rejected recipe form: {}", e);
                self.views
                    .add_recipe
                    .render_error(&mut self.document, Some(&e.to_string()));
                return;
            }
        };

        let api = self.model.api();
        self.pending.spawn(async move {
            let result = api.upload(&new_recipe).await;
            Completion::Upload { result }
        });
    }

    fn complete(&mut self, completion: Completion) {
        match completion {
            Completion::Recipe { ticket, id, result } => self.finish_recipe(ticket, &id, result),
            Completion::Search { ticket, result } => self.finish_search(ticket, result),
            Completion::Upload { result } => self.finish_upload(result),
            Completion::CloseWindow => self.views.add_recipe.close_window(&mut self.document),
        }
    }

    fn finish_recipe(&mut self, ticket: Ticket, id: &str, result: Result<Recipe>) {
        let recipe = match result {
            Ok(recipe) => recipe,
            Err(_) if !self.model.is_current(ticket) => {
                debug!("Ignoring failure of superseded load for {}", id);
                return;
            }
            Err(e) => {
                error!("Loading recipe {} failed: {}", id, e);
                self.views.recipe.render_error(&mut self.document, None);
                return;
            }
        };

        if self.model.apply_recipe(ticket, recipe) {
            if let Some(recipe) = self.model.state().recipe.clone() {
                self.views.recipe.render(&mut self.document, recipe);
            }
        }
    }

    fn finish_search(&mut self, ticket: Ticket, result: Result<Vec<RecipePreview>>) {
        match result {
            Ok(results) => {
                if self.model.apply_search(ticket, results) {
                    self.search_failed = false;
                    self.render_results_page(None);
                }
            }
            Err(_) if !self.model.is_current(ticket) => {
                debug!("Ignoring failure of superseded search");
            }
            Err(e) => {
                error!("Search failed: {}", e);
                self.search_failed = true;
                self.views
                    .results
                    .render_error(&mut self.document, Some(&e.to_string()));
            }
        }
    }

    fn finish_upload(&mut self, result: Result<Recipe>) {
        let applied = result.and_then(|recipe| {
            let id = recipe.id.clone();
            self.model.apply_upload(recipe).map(|_| id)
        });
        let id = match applied {
            Ok(id) => id,
            Err(e) => {
                error!("Uploading recipe failed: {}", e);
                self.views
                    .add_recipe
                    .render_error(&mut self.document, Some(&e.to_string()));
                return;
            }
        };

        if let Some(recipe) = self.model.state().recipe.clone() {
            self.views.recipe.render(&mut self.document, recipe);
        }
        self.views.add_recipe.render_message(&mut self.document, None);
        self.document.push_hash(&id);
        self.control_bookmarks();
        info!("Recipe {} uploaded and bookmarked", id);

        let delay = self.modal_close;
        self.pending.spawn(async move {
            tokio::time::sleep(delay).await;
            Completion::CloseWindow
        });
    }

    /// Render the results on `page` (the current page when `None`) and the
    /// pagination under them
    fn render_results_page(&mut self, page: Option<usize>) {
        let results = self.results_list(page);
        self.views.results.render(&mut self.document, results);
        let search = self.model.state().search.clone();
        self.views.pagination.render(&mut self.document, search);
    }

    fn results_list(&mut self, page: Option<usize>) -> PreviewList {
        let items = self.model.results_page(page).to_vec();
        PreviewList::new(items, self.document.hash())
    }

    fn bookmark_list(&self) -> PreviewList {
        let items = self
            .model
            .state()
            .bookmarks
            .iter()
            .map(RecipePreview::from)
            .collect();
        PreviewList::new(items, self.document.hash())
    }
}

impl std::fmt::Debug for Controller {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Controller")
            .field("document", &self.document)
            .field("views", &self.views)
            .field("pending", &self.pending.len())
            .finish()
    }
}
