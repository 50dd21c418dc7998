use serde::{Deserialize, Serialize};

/// A single ingredient line. Quantity is `None` for "to taste" style entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub description: String,
}

/// Full recipe as shown in the detail view and stored in bookmarks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub publisher: String,
    pub source_url: String,
    pub image: String,
    pub servings: u32,
    pub cooking_time: u32,
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub bookmarked: bool,
    /// Present only on recipes uploaded with our API key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl Recipe {
    pub fn is_user_generated(&self) -> bool {
        self.key.is_some()
    }
}

/// Lightweight projection used by result and bookmark lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipePreview {
    pub id: String,
    pub title: String,
    pub publisher: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl From<&Recipe> for RecipePreview {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id.clone(),
            title: recipe.title.clone(),
            publisher: recipe.publisher.clone(),
            image: recipe.image.clone(),
            key: recipe.key.clone(),
        }
    }
}

/// Current search session
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    pub query: String,
    pub results: Vec<RecipePreview>,
    /// 1-based
    pub page: usize,
    pub results_per_page: usize,
}

impl SearchState {
    pub fn new(results_per_page: usize) -> Self {
        Self {
            query: String::new(),
            results: Vec::new(),
            page: 1,
            results_per_page: results_per_page.max(1),
        }
    }

    pub fn page_count(&self) -> usize {
        self.results.len().div_ceil(self.results_per_page)
    }
}

// Wire types for the remote API. Field names follow the API's snake_case.

#[derive(Debug, Deserialize)]
pub(crate) struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecipeData {
    pub recipe: ApiRecipe,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecipesData {
    #[serde(default)]
    pub recipes: Vec<ApiPreview>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiRecipe {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub image_url: String,
    pub servings: u32,
    #[serde(default)]
    pub cooking_time: u32,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub key: Option<String>,
}

impl From<ApiRecipe> for Recipe {
    fn from(recipe: ApiRecipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            publisher: recipe.publisher,
            source_url: recipe.source_url,
            image: recipe.image_url,
            servings: recipe.servings,
            cooking_time: recipe.cooking_time,
            ingredients: recipe.ingredients,
            bookmarked: false,
            key: recipe.key,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiPreview {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub publisher: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub key: Option<String>,
}

impl From<ApiPreview> for RecipePreview {
    fn from(preview: ApiPreview) -> Self {
        Self {
            id: preview.id,
            title: preview.title,
            publisher: preview.publisher,
            image: preview.image_url,
            key: preview.key,
        }
    }
}

/// Body of an upload request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRecipe {
    pub title: String,
    pub publisher: String,
    pub source_url: String,
    pub image_url: String,
    pub cooking_time: u32,
    pub servings: u32,
    pub ingredients: Vec<Ingredient>,
}
