//! Recipe browser: search the Forkify API, read and scale recipes, keep
//! bookmarks and upload your own recipes.
//!
//! The page is modelled as a headless [`dom::Document`] that views render
//! into, driven by a [`controller::Controller`].

pub mod api;
pub mod config;
pub mod controller;
pub mod dom;
pub mod error;
pub mod events;
pub mod helpers;
pub mod model;
pub mod state;
pub mod storage;
pub mod views;

pub use api::{ForkifyApi, RecipeApi};
pub use config::AppConfig;
pub use controller::Controller;
pub use error::{ForkifyError, Result};
pub use model::{Ingredient, NewRecipe, Recipe, RecipePreview, SearchState};
pub use state::{AppState, Model};
