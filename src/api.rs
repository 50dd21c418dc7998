use crate::config::AppConfig;
use crate::error::{ForkifyError, Result};
use crate::helpers::Ajax;
use crate::model::{Envelope, NewRecipe, Recipe, RecipeData, RecipePreview, RecipesData};
use async_trait::async_trait;
use log::debug;
use reqwest::Url;

/// Remote recipe source
#[async_trait]
pub trait RecipeApi: Send + Sync {
    /// Fetch a single recipe by id
    async fn get_recipe(&self, id: &str) -> Result<Recipe>;

    /// Search recipe previews by free-text query
    async fn search(&self, query: &str) -> Result<Vec<RecipePreview>>;

    /// Submit a user-authored recipe, returning the stored version
    async fn upload(&self, recipe: &NewRecipe) -> Result<Recipe>;
}

/// `RecipeApi` backed by the Forkify REST endpoint
#[derive(Debug, Clone)]
pub struct ForkifyApi {
    ajax: Ajax,
    base_url: String,
    api_key: Option<String>,
}

impl ForkifyApi {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_base_url(
            config.api_url.clone(),
            config.api_key.clone(),
            Ajax::new(config.timeout_duration()),
        )
    }

    #[doc(hidden)]
    pub fn with_base_url(base_url: String, api_key: Option<String>, ajax: Ajax) -> Self {
        Self {
            ajax,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    fn url(&self, path: Option<&str>, search: Option<&str>) -> Result<String> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| ForkifyError::Url(format!("{}: {}", self.base_url, e)))?;
        if let Some(id) = path {
            // the id is always one encoded segment, whatever it contains
            url.path_segments_mut()
                .map_err(|_| ForkifyError::Url(format!("{} cannot take a path", self.base_url)))?
                .push(id);
        }

        {
            let mut query = url.query_pairs_mut();
            if let Some(search) = search {
                query.append_pair("search", search);
            }
            if let Some(key) = &self.api_key {
                query.append_pair("key", key);
            }
        }
        // query_pairs_mut leaves a dangling '?' when nothing was appended
        if url.query() == Some("") {
            url.set_query(None);
        }

        Ok(url.into())
    }
}

#[async_trait]
impl RecipeApi for ForkifyApi {
    async fn get_recipe(&self, id: &str) -> Result<Recipe> {
        let url = self.url(Some(id), None)?;
        let body = self.ajax.request(&url, None).await?;
        let envelope: Envelope<RecipeData> = serde_json::from_value(body)?;
        Ok(envelope.data.recipe.into())
    }

    async fn search(&self, query: &str) -> Result<Vec<RecipePreview>> {
        let url = self.url(None, Some(query))?;
        let body = self.ajax.request(&url, None).await?;
        let envelope: Envelope<RecipesData> = serde_json::from_value(body)?;
        debug!(
            "Search '{}' returned {} results",
            query,
            envelope.data.recipes.len()
        );
        Ok(envelope
            .data
            .recipes
            .into_iter()
            .map(RecipePreview::from)
            .collect())
    }

    async fn upload(&self, recipe: &NewRecipe) -> Result<Recipe> {
        let url = self.url(None, Some(&recipe.title))?;
        let payload = serde_json::to_value(recipe)?;
        let body = self.ajax.request(&url, Some(&payload)).await?;
        let envelope: Envelope<RecipeData> = serde_json::from_value(body)?;
        Ok(envelope.data.recipe.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use std::time::Duration;

    fn api(base: String) -> ForkifyApi {
        ForkifyApi::with_base_url(
            base,
            Some("test-key".to_string()),
            Ajax::new(Duration::from_secs(5)),
        )
    }

    #[test]
    fn test_url_building() {
        let api = api("https://example.com/api/v2/recipes/".to_string());
        assert_eq!(
            api.url(Some("abc"), None).unwrap(),
            "https://example.com/api/v2/recipes/abc?key=test-key"
        );
        assert_eq!(
            api.url(None, Some("pasta bake")).unwrap(),
            "https://example.com/api/v2/recipes?search=pasta+bake&key=test-key"
        );
    }

    #[test]
    fn test_recipe_id_is_a_single_path_segment() {
        let api = api("https://example.com/api/v2/recipes".to_string());
        assert_eq!(
            api.url(Some("a/b?c#d"), None).unwrap(),
            "https://example.com/api/v2/recipes/a%2Fb%3Fc%23d?key=test-key"
        );
    }

    #[test]
    fn test_url_without_key_has_no_query() {
        let api = ForkifyApi::with_base_url(
            "https://example.com/recipes".to_string(),
            None,
            Ajax::new(Duration::from_secs(5)),
        );
        assert_eq!(
            api.url(Some("abc"), None).unwrap(),
            "https://example.com/recipes/abc"
        );
    }

    #[tokio::test]
    async fn test_search_maps_previews() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/recipes")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("search".into(), "pizza".into()),
                Matcher::UrlEncoded("key".into(), "test-key".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"status": "success", "results": 2, "data": {"recipes": [
                    {"id": "a", "title": "Pizza A", "publisher": "P", "image_url": "a.jpg"},
                    {"id": "b", "title": "Pizza B", "publisher": "P", "image_url": "b.jpg", "key": "k"}
                ]}}"#,
            )
            .create_async()
            .await;

        let results = api(format!("{}/recipes", server.url()))
            .search("pizza")
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].image, "a.jpg");
        assert_eq!(results[1].key.as_deref(), Some("k"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_recipe_decode_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/recipes/abc")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"data": {}}"#)
            .create_async()
            .await;

        let err = api(format!("{}/recipes", server.url()))
            .get_recipe("abc")
            .await
            .unwrap_err();

        assert!(matches!(err, ForkifyError::Decode(_)));
    }
}
