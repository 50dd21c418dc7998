use crate::api::RecipeApi;
use crate::dom::FormData;
use crate::error::{ForkifyError, Result};
use crate::model::{Ingredient, NewRecipe, Recipe, RecipePreview, SearchState};
use crate::storage::BookmarkStore;
use log::{debug, info};
use std::num::NonZeroU32;
use std::sync::Arc;

const INGREDIENT_FORMAT_ERROR: &str = "Wrong ingredient format! Please use the correct format.";

/// Everything the views display
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub recipe: Option<Recipe>,
    pub search: SearchState,
    pub bookmarks: Vec<Recipe>,
}

impl AppState {
    pub fn new(results_per_page: usize) -> Self {
        Self {
            recipe: None,
            search: SearchState::new(results_per_page),
            bookmarks: Vec::new(),
        }
    }

    pub fn is_bookmarked(&self, id: &str) -> bool {
        self.bookmarks.iter().any(|bookmark| bookmark.id == id)
    }
}

/// Part of the state refreshed by a network request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Recipe,
    Search,
}

impl Slot {
    fn index(self) -> usize {
        match self {
            Slot::Recipe => 0,
            Slot::Search => 1,
        }
    }
}

/// Marks which request generation a response belongs to.
/// Only the latest ticket issued for a slot may write to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    slot: Slot,
    generation: u64,
}

/// Application state together with the services that fill it
pub struct Model {
    state: AppState,
    api: Arc<dyn RecipeApi>,
    store: Box<dyn BookmarkStore>,
    generations: [u64; 2],
}

impl Model {
    pub fn new(
        api: Arc<dyn RecipeApi>,
        store: Box<dyn BookmarkStore>,
        results_per_page: usize,
    ) -> Self {
        Self {
            state: AppState::new(results_per_page),
            api,
            store,
            generations: [0; 2],
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn api(&self) -> Arc<dyn RecipeApi> {
        Arc::clone(&self.api)
    }

    /// Start a new request generation for `slot`, invalidating older tickets
    pub fn issue(&mut self, slot: Slot) -> Ticket {
        let generation = &mut self.generations[slot.index()];
        *generation += 1;
        Ticket {
            slot,
            generation: *generation,
        }
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generations[ticket.slot.index()] == ticket.generation
    }

    /// Fetch a recipe and make it the current one.
    ///
    /// Sequential form of the recipe load. The controller runs the same
    /// `issue` / `get_recipe` / `apply_recipe` steps with the fetch spawned
    /// in the background.
    pub async fn load_recipe(&mut self, id: &str) -> Result<()> {
        let ticket = self.issue(Slot::Recipe);
        let recipe = self.api.get_recipe(id).await?;
        self.apply_recipe(ticket, recipe);
        Ok(())
    }

    /// Install a fetched recipe. Returns false when the ticket is stale and
    /// the recipe was discarded.
    pub fn apply_recipe(&mut self, ticket: Ticket, mut recipe: Recipe) -> bool {
        if !self.is_current(ticket) {
            debug!("Discarding stale recipe response for {}", recipe.id);
            return false;
        }
        recipe.bookmarked = self.state.is_bookmarked(&recipe.id);
        self.state.recipe = Some(recipe);
        true
    }

    /// Fetch search results for `query` and reset to the first page.
    ///
    /// Sequential form of `begin_search` / `search` / `apply_search`, which the
    /// controller runs with the fetch spawned in the background.
    pub async fn load_search_results(&mut self, query: &str) -> Result<()> {
        let ticket = self.begin_search(query);
        let results = self.api.search(query).await?;
        self.apply_search(ticket, results);
        Ok(())
    }

    /// Record the query and issue a ticket for its results
    pub fn begin_search(&mut self, query: &str) -> Ticket {
        self.state.search.query = query.to_string();
        self.issue(Slot::Search)
    }

    pub fn apply_search(&mut self, ticket: Ticket, results: Vec<RecipePreview>) -> bool {
        if !self.is_current(ticket) {
            debug!("Discarding stale search response");
            return false;
        }
        info!(
            "Loaded {} results for '{}'",
            results.len(),
            self.state.search.query
        );
        self.state.search.results = results;
        self.state.search.page = 1;
        true
    }

    /// Results on `page`, or on the current page when `None`.
    /// An explicit page also becomes the current one.
    pub fn results_page(&mut self, page: Option<usize>) -> &[RecipePreview] {
        let search = &mut self.state.search;
        let page = page.unwrap_or(search.page).max(1);
        search.page = page;

        let len = search.results.len();
        let start = (page - 1).saturating_mul(search.results_per_page).min(len);
        let end = page.saturating_mul(search.results_per_page).min(len);
        &search.results[start..end]
    }

    /// Scale every ingredient to `servings` and store the new count
    pub fn update_servings(&mut self, servings: NonZeroU32) {
        let Some(recipe) = self.state.recipe.as_mut() else {
            return;
        };
        let new = servings.get();
        if recipe.servings > 0 {
            let ratio = f64::from(new) / f64::from(recipe.servings);
            for ingredient in &mut recipe.ingredients {
                if let Some(quantity) = ingredient.quantity.as_mut() {
                    *quantity *= ratio;
                }
            }
        }
        recipe.servings = new;
    }

    /// Bookmark `recipe`. Memory is only changed once the new list is saved.
    pub fn add_bookmark(&mut self, mut recipe: Recipe) -> Result<()> {
        if self.state.is_bookmarked(&recipe.id) {
            return Ok(());
        }
        recipe.bookmarked = true;
        let id = recipe.id.clone();
        let mut bookmarks = self.state.bookmarks.clone();
        bookmarks.push(recipe);
        self.persist_bookmarks(&bookmarks)?;

        self.state.bookmarks = bookmarks;
        self.mark_current(&id, true);
        debug!("Bookmarked {}", id);
        Ok(())
    }

    /// Drop the bookmark for `id`. Memory is only changed once the new list is saved.
    pub fn remove_bookmark(&mut self, id: &str) -> Result<()> {
        if !self.state.is_bookmarked(id) {
            return Ok(());
        }
        let bookmarks: Vec<Recipe> = self
            .state
            .bookmarks
            .iter()
            .filter(|b| b.id != id)
            .cloned()
            .collect();
        self.persist_bookmarks(&bookmarks)?;

        self.state.bookmarks = bookmarks;
        self.mark_current(id, false);
        debug!("Removed bookmark {}", id);
        Ok(())
    }

    fn mark_current(&mut self, id: &str, bookmarked: bool) {
        if let Some(current) = self.state.recipe.as_mut() {
            if current.id == id {
                current.bookmarked = bookmarked;
            }
        }
    }

    fn persist_bookmarks(&mut self, bookmarks: &[Recipe]) -> Result<()> {
        let content = serde_json::to_string(bookmarks)?;
        self.store.save(&content)
    }

    /// Load bookmarks saved by a previous session
    pub fn restore_bookmarks(&mut self) -> Result<()> {
        let Some(content) = self.store.load()? else {
            return Ok(());
        };
        if content.trim().is_empty() {
            return Ok(());
        }

        let mut bookmarks: Vec<Recipe> =
            serde_json::from_str(&content).map_err(|e| ForkifyError::Storage(e.to_string()))?;
        // Older files may hold duplicates; the first entry wins.
        let mut seen = std::collections::HashSet::new();
        bookmarks.retain(|b| seen.insert(b.id.clone()));

        info!("Restored {} bookmarks", bookmarks.len());
        self.state.bookmarks = bookmarks;
        Ok(())
    }

    /// Parse the add-recipe form, submit it and bookmark the stored recipe.
    ///
    /// Sequential form of `parse_new_recipe` / `upload` / `apply_upload`, which
    /// the controller runs with the upload spawned in the background.
    pub async fn upload_recipe(&mut self, form: &FormData) -> Result<()> {
        let new_recipe = parse_new_recipe(form)?;
        let recipe = self.api.upload(&new_recipe).await?;
        self.apply_upload(recipe)
    }

    /// Make an uploaded recipe current and bookmark it. Pending recipe loads
    /// are invalidated so they cannot replace it.
    pub fn apply_upload(&mut self, recipe: Recipe) -> Result<()> {
        self.issue(Slot::Recipe);
        info!("Uploaded recipe {}", recipe.id);
        self.state.recipe = Some(recipe.clone());
        self.add_bookmark(recipe)
    }
}

/// Build an upload body from the add-recipe form fields
pub fn parse_new_recipe(form: &FormData) -> Result<NewRecipe> {
    let ingredients = form
        .entries()
        .filter(|(name, value)| name.starts_with("ingredient-") && !value.trim().is_empty())
        .map(|(_, value)| parse_ingredient(value))
        .collect::<Result<Vec<_>>>()?;

    Ok(NewRecipe {
        title: form.get("title").unwrap_or_default().to_string(),
        publisher: form.get("publisher").unwrap_or_default().to_string(),
        source_url: form.get("sourceUrl").unwrap_or_default().to_string(),
        image_url: form.get("image").unwrap_or_default().to_string(),
        cooking_time: parse_count(form, "cookingTime", "Cooking time")?,
        servings: parse_count(form, "servings", "Servings")?,
        ingredients,
    })
}

fn parse_ingredient(line: &str) -> Result<Ingredient> {
    let parts: Vec<&str> = line.split(',').map(str::trim).collect();
    let [quantity, unit, description] = parts[..] else {
        return Err(ForkifyError::Format(INGREDIENT_FORMAT_ERROR.to_string()));
    };

    let quantity = if quantity.is_empty() {
        None
    } else {
        let value: f64 = quantity.parse().map_err(|_| {
            ForkifyError::Format(format!("Ingredient quantity '{}' is not a number", quantity))
        })?;
        if !value.is_finite() || value <= 0.0 {
            return Err(ForkifyError::Format(format!(
                "Ingredient quantity '{}' must be positive",
                quantity
            )));
        }
        Some(value)
    };

    Ok(Ingredient {
        quantity,
        unit: unit.to_string(),
        description: description.to_string(),
    })
}

fn parse_count(form: &FormData, field: &str, label: &str) -> Result<u32> {
    let raw = form.get(field).unwrap_or_default().trim();
    match raw.parse::<u32>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ForkifyError::Format(format!(
            "{} must be a positive whole number",
            label
        ))),
    }
}
