use super::{attr, text, ICONS};
use crate::model::RecipePreview;

/// Markup for one list entry, shared by the results and bookmarks lists
pub struct PreviewView;

impl PreviewView {
    pub fn generate_markup(preview: &RecipePreview, active_id: &str) -> String {
        let active = if preview.id == active_id {
            " preview__link--active"
        } else {
            ""
        };
        let user_hidden = if preview.key.is_some() { "" } else { " hidden" };

        format!(
            r##"<li class="preview">
  <a class="preview__link{active}" href="#{id}">
    <figure class="preview__fig"><img src="{image}" alt="{title_attr}"></figure>
    <div class="preview__data">
      <h4 class="preview__title">{title}</h4>
      <p class="preview__publisher">{publisher}</p>
      <div class="preview__user-generated{user_hidden}">
        <svg><use href="{icons}#icon-user"></use></svg>
      </div>
    </div>
  </a>
</li>"##,
            active = active,
            id = attr(&preview.id),
            image = attr(&preview.image),
            title_attr = attr(&preview.title),
            title = text(&preview.title),
            publisher = text(&preview.publisher),
            user_hidden = user_hidden,
            icons = ICONS,
        )
    }

    pub fn generate_list(previews: &[RecipePreview], active_id: &str) -> String {
        previews
            .iter()
            .map(|preview| Self::generate_markup(preview, active_id))
            .collect()
    }
}
