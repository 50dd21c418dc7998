use forkify::dom::{MountStatus, Region, UiEvent};
use forkify::events::Action;
use forkify::helpers::Ajax;
use forkify::storage::MemoryStore;
use forkify::{Controller, ForkifyApi, Model};
use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

fn app_with(base_url: String, store: &MemoryStore, timeout: Duration) -> Controller {
    let api = ForkifyApi::with_base_url(
        base_url,
        Some("test-key".to_string()),
        Ajax::new(timeout),
    );
    let model = Model::new(Arc::new(api), Box::new(store.clone()), 10);
    Controller::init(model, Duration::from_millis(10)).unwrap()
}

fn app(server: &ServerGuard, store: &MemoryStore) -> Controller {
    app_with(
        format!("{}/api/v2/recipes", server.url()),
        store,
        Duration::from_secs(10),
    )
}

fn recipe_body(id: &str, title: &str, key: Option<&str>) -> String {
    let mut recipe = json!({
        "id": id,
        "title": title,
        "publisher": "Closet Cooking",
        "source_url": "http://www.closetcooking.com/recipe",
        "image_url": "http://forkify-api.herokuapp.com/images/recipe.jpg",
        "servings": 4,
        "cooking_time": 45,
        "ingredients": [
            {"quantity": 1.5, "unit": "cups", "description": "macaroni"},
            {"quantity": null, "unit": "", "description": "salt"}
        ]
    });
    if let Some(key) = key {
        recipe["key"] = json!(key);
    }
    json!({"status": "success", "data": {"recipe": recipe}}).to_string()
}

fn search_body(count: usize) -> String {
    let recipes: Vec<_> = (0..count)
        .map(|i| {
            json!({
                "id": format!("pizza-{}", i),
                "title": format!("Pizza {}", i),
                "publisher": "Pizza Place",
                "image_url": format!("http://example.com/{}.jpg", i)
            })
        })
        .collect();
    json!({"status": "success", "results": count, "data": {"recipes": recipes}}).to_string()
}

fn fill_upload_form(app: &mut Controller, ingredient: &str) {
    let document = app.document_mut();
    for (name, value) in [
        ("title", "Test Soup"),
        ("sourceUrl", "https://example.com/soup"),
        ("image", "https://example.com/soup.jpg"),
        ("publisher", "Me"),
        ("cookingTime", "25"),
        ("servings", "3"),
        ("ingredient-1", ingredient),
    ] {
        assert!(document.fill(Region::Upload, name, value));
    }
}

#[tokio::test]
async fn test_search_pizza_paginates_23_results() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v2/recipes")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("search".into(), "pizza".into()),
            Matcher::UrlEncoded("key".into(), "test-key".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(search_body(23))
        .expect(1)
        .create_async()
        .await;

    let store = MemoryStore::new();
    let mut app = app(&server, &store);
    app.document_mut().fill(Region::Search, "query", "pizza");
    let submit = app.document().submit(Region::Search);
    app.dispatch(submit);
    app.settle().await;

    let mut sizes = Vec::new();
    for page in 1..=3 {
        app.handle(Action::GoToPage(page));
        sizes.push(app.document().mount(Region::Results).find_all("preview").len());
    }
    assert_eq!(sizes, vec![10, 10, 3]);
    assert_eq!(app.model().state().search.page_count(), 3);

    app.handle(Action::GoToPage(4));
    let results = app.document().mount(Region::Results);
    assert_eq!(results.status(), MountStatus::Error);
    assert_eq!(
        results.text_content(),
        "No recipes found for your query! Please try again"
    );
    mock.assert_async().await;
}

#[tokio::test]
async fn test_empty_search_shows_no_results_message() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v2/recipes")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(search_body(0))
        .create_async()
        .await;

    let store = MemoryStore::new();
    let mut app = app(&server, &store);
    app.document_mut().fill(Region::Search, "query", "zzz");
    let submit = app.document().submit(Region::Search);
    app.dispatch(submit);
    app.settle().await;

    let document = app.document();
    assert_eq!(document.mount(Region::Results).status(), MountStatus::Error);
    assert_eq!(document.mount(Region::Pagination).text_content(), "");
}

#[tokio::test]
async fn test_bookmark_survives_restart() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/v2/recipes/abc")
        .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
        .with_status(200)
        .with_body(recipe_body("abc", "Mac & Cheese", None))
        .expect(2)
        .create_async()
        .await;

    let store = MemoryStore::new();
    let mut first = app(&server, &store);
    first.document_mut().push_hash("abc");
    first.dispatch(UiEvent::Load);
    first.settle().await;
    assert!(first
        .document()
        .mount(Region::Recipe)
        .text_content()
        .contains("Mac & Cheese"));

    let bookmark = first.document().click(Region::Recipe, "btn--bookmark").unwrap();
    first.dispatch(bookmark);
    assert!(store.content().unwrap().contains("Mac & Cheese"));

    let mut second = app(&server, &store);
    second.document_mut().push_hash("abc");
    second.dispatch(UiEvent::Load);
    let bookmarks = second.document().mount(Region::Bookmarks);
    assert_eq!(bookmarks.find_all("preview").len(), 1);
    second.settle().await;

    let recipe = second.model().state().recipe.as_ref().unwrap();
    assert!(recipe.bookmarked);
    assert!(second
        .document()
        .mount(Region::Recipe)
        .inner_html()
        .contains("#icon-bookmark-fill"));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_unknown_recipe_renders_error() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/v2/recipes/missing")
        .match_query(Matcher::Any)
        .with_status(400)
        .with_body(r#"{"status": "fail", "message": "Invalid _id: missing"}"#)
        .create_async()
        .await;

    let store = MemoryStore::new();
    let mut app = app(&server, &store);
    let event = app.document_mut().set_hash("missing");
    app.dispatch(event);
    app.settle().await;

    let recipe = app.document().mount(Region::Recipe);
    assert_eq!(recipe.status(), MountStatus::Error);
    assert_eq!(
        recipe.text_content(),
        "We could not find that recipe. Please try another one!"
    );
    assert!(app.model().state().recipe.is_none());
}

#[tokio::test]
async fn test_bad_ingredient_makes_no_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v2/recipes")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let store = MemoryStore::new();
    for ingredient in ["0.5,kg", "0.5,kg,Rice,extra"] {
        let mut app = app(&server, &store);
        fill_upload_form(&mut app, ingredient);
        let submit = app.document().submit(Region::Upload);
        app.dispatch(submit);
        app.settle().await;

        assert_eq!(
            app.document().mount(Region::Upload).text_content(),
            "Wrong ingredient format! Please use the correct format."
        );
        assert_eq!(app.pending(), 0);
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_upload_posts_and_bookmarks() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/api/v2/recipes")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("search".into(), "Test Soup".into()),
            Matcher::UrlEncoded("key".into(), "test-key".into()),
        ]))
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "title": "Test Soup",
            "source_url": "https://example.com/soup",
            "image_url": "https://example.com/soup.jpg",
            "cooking_time": 25,
            "servings": 3,
            "ingredients": [{"quantity": 0.5, "unit": "kg", "description": "Rice"}]
        })))
        .with_status(201)
        .with_body(recipe_body("own-1", "Test Soup", Some("test-key")))
        .create_async()
        .await;

    let store = MemoryStore::new();
    let mut app = app(&server, &store);
    let open = app.document().click(Region::Nav, "nav__btn--add-recipe").unwrap();
    app.dispatch(open);
    fill_upload_form(&mut app, "0.5, kg, Rice");
    let submit = app.document().submit(Region::Upload);
    app.dispatch(submit);
    app.settle().await;

    let document = app.document();
    assert_eq!(document.hash(), "own-1");
    assert!(document.modal_hidden());
    assert_eq!(
        document.mount(Region::Upload).text_content(),
        "Recipe was successfully uploaded!"
    );
    let bookmarks = document.mount(Region::Bookmarks);
    let active = bookmarks.find("preview__link--active").unwrap();
    assert_eq!(bookmarks.element(active).unwrap().attr("href"), Some("#own-1"));
    assert!(app.model().state().recipe.as_ref().unwrap().is_user_generated());
    assert!(store.content().unwrap().contains("own-1"));
    mock.assert_async().await;
}

#[tokio::test(start_paused = true)]
async fn test_silent_server_times_out_after_configured_seconds() {
    // accepts connections but never answers
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base_url = format!("http://{}/api/v2/recipes", listener.local_addr().unwrap());

    let store = MemoryStore::new();
    let mut app = app_with(base_url, &store, Duration::from_secs(10));
    app.document_mut().fill(Region::Search, "query", "pizza");
    let submit = app.document().submit(Region::Search);
    app.dispatch(submit);
    app.settle().await;

    let results = app.document().mount(Region::Results);
    assert_eq!(results.status(), MountStatus::Error);
    assert!(results.text_content().contains("10"));
    assert_eq!(
        results.text_content(),
        "Request took too long! Timeout after 10 second(s)"
    );
    drop(listener);
}
