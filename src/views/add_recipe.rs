use super::{attr, View, ICONS};
use crate::dom::{Document, FormData, MountStatus, Region, UiEvent};
use crate::events::{Action, Dispatcher};

const INGREDIENT_SLOTS: usize = 6;
const INGREDIENT_PLACEHOLDER: &str = "Format: 'Quantity,Unit,Description'";

/// Upload form inside the add-recipe modal
#[derive(Debug, Default)]
pub struct AddRecipeView {
    data: Option<FormData>,
}

impl AddRecipeView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field names of an empty form, in display order
    pub fn blank_form() -> FormData {
        let mut form = FormData::default();
        for name in [
            "title",
            "sourceUrl",
            "image",
            "publisher",
            "cookingTime",
            "servings",
        ] {
            form.push(name, "");
        }
        for i in 1..=INGREDIENT_SLOTS {
            form.push(format!("ingredient-{}", i), "");
        }
        form
    }

    pub fn render_form(&mut self, document: &mut Document) {
        self.render(document, Self::blank_form());
    }

    /// Show or hide the modal. Reopening after a message brings back an empty form.
    pub fn toggle_window(&mut self, document: &mut Document) {
        document.toggle_modal();
        let reopened = !document.modal_hidden();
        if reopened && document.mount(Region::Upload).status() != MountStatus::Content {
            self.render_form(document);
        }
    }

    /// Hide the modal if it is still open
    pub fn close_window(&mut self, document: &mut Document) {
        if !document.modal_hidden() {
            self.toggle_window(document);
        }
    }

    pub fn add_handler_toggle_window(&self, dispatcher: &mut Dispatcher) {
        dispatcher.register(|event, document| {
            let UiEvent::Click { region, target } = event else {
                return None;
            };
            let class = match region {
                Region::Overlay => return Some(Action::ToggleWindow),
                Region::Nav => "nav__btn--add-recipe",
                Region::Window => "btn--close-modal",
                _ => return None,
            };
            document
                .mount(*region)
                .closest((*target)?, class)
                .map(|_| Action::ToggleWindow)
        });
    }

    pub fn add_handler_upload(&self, dispatcher: &mut Dispatcher) {
        dispatcher.register(|event, document| match event {
            UiEvent::Submit {
                region: Region::Upload,
            } => Some(Action::Upload(document.mount(Region::Upload).form_data())),
            _ => None,
        });
    }

    fn input(label: &str, name: &str, kind: &str, value: &str) -> String {
        format!(
            r#"<label>{label}</label>
<input value="{value}" required name="{name}" type="{kind}">
"#,
            label = label,
            value = attr(value),
            name = name,
            kind = kind,
        )
    }
}

impl View for AddRecipeView {
    type Data = FormData;

    fn region(&self) -> Region {
        Region::Upload
    }

    fn error_message(&self) -> &str {
        "Could not upload the recipe. Please try again!"
    }

    fn message(&self) -> &str {
        "Recipe was successfully uploaded!"
    }

    fn data(&self) -> Option<&FormData> {
        self.data.as_ref()
    }

    fn store(&mut self, data: FormData) {
        self.data = Some(data);
    }

    fn generate_markup(&self, form: &FormData) -> String {
        let value = |name: &str| form.get(name).unwrap_or_default();

        let details: String = [
            ("Title", "title", "text"),
            ("URL", "sourceUrl", "text"),
            ("Image URL", "image", "text"),
            ("Publisher", "publisher", "text"),
            ("Prep time", "cookingTime", "number"),
            ("Servings", "servings", "number"),
        ]
        .iter()
        .map(|&(label, name, kind)| Self::input(label, name, kind, value(name)))
        .collect();

        let ingredients: String = (1..=INGREDIENT_SLOTS)
            .map(|i| {
                let name = format!("ingredient-{}", i);
                format!(
                    r#"<label>Ingredient {i}</label>
<input value="{value}" type="text" name="{name}" placeholder="{placeholder}">
"#,
                    i = i,
                    value = attr(value(name.as_str())),
                    name = name,
                    placeholder = attr(INGREDIENT_PLACEHOLDER),
                )
            })
            .collect();

        format!(
            r#"<div class="upload__column">
  <h3 class="upload__heading">Recipe data</h3>
{details}</div>
<div class="upload__column">
  <h3 class="upload__heading">Ingredients</h3>
{ingredients}</div>
<button class="btn upload__btn">
  <svg><use href="{icons}#icon-upload-cloud"></use></svg>
  <span>Upload</span>
</button>"#,
            details = details,
            ingredients = ingredients,
            icons = ICONS,
        )
    }
}
