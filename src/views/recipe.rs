use super::{attr, text, View, ICONS};
use crate::dom::{Region, UiEvent};
use crate::events::{Action, Dispatcher};
use crate::model::{Ingredient, Recipe};
use std::num::NonZeroU32;

/// Recipe detail panel
#[derive(Debug, Default)]
pub struct RecipeView {
    data: Option<Recipe>,
}

impl RecipeView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the recipe named by the hash on page load and on every hash change
    pub fn add_handler_render(&self, dispatcher: &mut Dispatcher) {
        dispatcher.register(|event, _| match event {
            UiEvent::Load | UiEvent::HashChange => Some(Action::ShowRecipe),
            _ => None,
        });
    }

    pub fn add_handler_update_servings(&self, dispatcher: &mut Dispatcher) {
        dispatcher.register(|event, document| {
            let UiEvent::Click {
                region: Region::Recipe,
                target: Some(target),
            } = event
            else {
                return None;
            };
            let button = document
                .mount(Region::Recipe)
                .closest(*target, "btn--update-servings")?;
            let update_to: i64 = button.attr("data-update-to")?.parse().ok()?;
            let servings = NonZeroU32::new(u32::try_from(update_to).ok()?)?;
            Some(Action::UpdateServings(servings))
        });
    }

    pub fn add_handler_toggle_bookmark(&self, dispatcher: &mut Dispatcher) {
        dispatcher.register(|event, document| {
            let UiEvent::Click {
                region: Region::Recipe,
                target: Some(target),
            } = event
            else {
                return None;
            };
            document
                .mount(Region::Recipe)
                .closest(*target, "btn--bookmark")
                .map(|_| Action::ToggleBookmark)
        });
    }

    fn generate_markup_ingredient(ingredient: &Ingredient) -> String {
        let quantity = ingredient
            .quantity
            .map(format_quantity)
            .unwrap_or_default();
        format!(
            r#"<li class="recipe__ingredient">
  <svg class="recipe__icon"><use href="{icons}#icon-check"></use></svg>
  <div class="recipe__quantity">{quantity}</div>
  <div class="recipe__description">
    <span class="recipe__unit">{unit}</span>
    {description}
  </div>
</li>"#,
            icons = ICONS,
            quantity = quantity,
            unit = text(&ingredient.unit),
            description = text(&ingredient.description),
        )
    }
}

impl View for RecipeView {
    type Data = Recipe;

    fn region(&self) -> Region {
        Region::Recipe
    }

    fn error_message(&self) -> &str {
        "We could not find that recipe. Please try another one!"
    }

    fn data(&self) -> Option<&Recipe> {
        self.data.as_ref()
    }

    fn store(&mut self, data: Recipe) {
        self.data = Some(data);
    }

    fn generate_markup(&self, recipe: &Recipe) -> String {
        let ingredients: String = recipe
            .ingredients
            .iter()
            .map(Self::generate_markup_ingredient)
            .collect();

        format!(
            r#"<figure class="recipe__fig">
  <img src="{image}" alt="{title_attr}" class="recipe__img">
  <h1 class="recipe__title"><span>{title}</span></h1>
</figure>
<div class="recipe__details">
  <div class="recipe__info">
    <svg class="recipe__info-icon"><use href="{icons}#icon-clock"></use></svg>
    <span class="recipe__info-data recipe__info-data--minutes">{cooking_time}</span>
    <span class="recipe__info-text">minutes</span>
  </div>
  <div class="recipe__info">
    <svg class="recipe__info-icon"><use href="{icons}#icon-users"></use></svg>
    <span class="recipe__info-data recipe__info-data--people">{servings}</span>
    <span class="recipe__info-text">servings</span>
    <div class="recipe__info-buttons">
      <button data-update-to="{fewer}" class="btn--tiny btn--update-servings">
        <svg><use href="{icons}#icon-minus-circle"></use></svg>
      </button>
      <button data-update-to="{more}" class="btn--tiny btn--update-servings">
        <svg><use href="{icons}#icon-plus-circle"></use></svg>
      </button>
    </div>
  </div>
  <div class="recipe__user-generated {user_hidden}">
    <svg><use href="{icons}#icon-user"></use></svg>
  </div>
  <button class="btn--round btn--bookmark">
    <svg><use href="{icons}#icon-bookmark{fill}"></use></svg>
  </button>
</div>
<div class="recipe__ingredients">
  <h2 class="heading--2">Recipe ingredients</h2>
  <ul class="recipe__ingredient-list">
{ingredients}
  </ul>
</div>
<div class="recipe__directions">
  <h2 class="heading--2">How to cook it</h2>
  <p class="recipe__directions-text">
    This recipe was carefully designed and tested by
    <span class="recipe__publisher">{publisher}</span>. Please check out
    directions at their website.
  </p>
  <a class="btn--small recipe__btn" href="{source_url}" target="_blank">
    <span>Directions</span>
    <svg class="search__icon"><use href="{icons}#icon-arrow-right"></use></svg>
  </a>
</div>"#,
            image = attr(&recipe.image),
            title_attr = attr(&recipe.title),
            title = text(&recipe.title),
            icons = ICONS,
            cooking_time = recipe.cooking_time,
            servings = recipe.servings,
            fewer = i64::from(recipe.servings) - 1,
            more = i64::from(recipe.servings) + 1,
            user_hidden = if recipe.is_user_generated() { "" } else { "hidden" },
            fill = if recipe.bookmarked { "-fill" } else { "" },
            ingredients = ingredients,
            publisher = text(&recipe.publisher),
            source_url = attr(&recipe.source_url),
        )
    }
}

/// Print a quantity as a mixed fraction when it is close to one
/// (`1.5` → `1 1/2`, `0.333` → `1/3`), otherwise with up to two decimals.
pub fn format_quantity(quantity: f64) -> String {
    const TOLERANCE: f64 = 0.01;

    if !quantity.is_finite() {
        return String::new();
    }
    let mut whole = quantity.trunc();
    let fraction = quantity - whole;

    if fraction < TOLERANCE {
        return format!("{}", whole);
    }
    if 1.0 - fraction < TOLERANCE {
        whole += 1.0;
        return format!("{}", whole);
    }

    for denominator in [2.0, 3.0, 4.0, 5.0, 6.0, 8.0, 10.0, 16.0] {
        let numerator = (fraction * denominator).round();
        if (fraction - numerator / denominator).abs() < TOLERANCE / 2.0 {
            return if whole == 0.0 {
                format!("{}/{}", numerator, denominator)
            } else {
                format!("{} {}/{}", whole, numerator, denominator)
            };
        }
    }

    let decimal = format!("{:.2}", quantity);
    decimal.trim_end_matches('0').trim_end_matches('.').to_string()
}
