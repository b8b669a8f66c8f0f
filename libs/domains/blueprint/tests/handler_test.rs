//! Handler tests for the Blueprint domain
//!
//! The three domain routers are mounted the way the application mounts them,
//! over an in-memory session store. Requests carry the session cookie
//! directly; the cookie-minting middleware is tested in axum-helpers.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use domain_blueprint::*;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt; // For oneshot()
use uuid::Uuid;

fn app() -> Router {
    app_over(Arc::new(InMemorySessionStore::new()))
}

fn app_over<S: SessionStore + 'static>(store: Arc<S>) -> Router {
    let repository = Arc::new(SessionBlueprintRepository::new(store));
    let rng = shared_rng(Some(7));

    Router::new()
        .nest(
            "/blueprint",
            handlers::blueprint::router(CatalogService::new(repository.clone(), rng.clone())),
        )
        .nest(
            "/pricing",
            handlers::pricing::router(PricingService::new(
                repository.clone(),
                ReportRenderer::new().unwrap(),
            )),
        )
        .nest(
            "/mockup",
            handlers::mockup::router(MockupService::new(
                repository,
                MockupRenderer::new().unwrap(),
                rng,
            )),
        )
}

// Helper to parse JSON response body
async fn json_body(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

struct Client {
    app: Router,
    session: Uuid,
}

impl Client {
    fn new() -> Self {
        Self::over(app())
    }

    fn over(app: Router) -> Self {
        Self {
            app,
            session: Uuid::new_v4(),
        }
    }

    fn with_session(&self, session: Uuid) -> Self {
        Self {
            app: self.app.clone(),
            session,
        }
    }

    async fn send(&self, method: &str, uri: &str, body: Option<Value>, ajax: bool) -> Response {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::COOKIE, format!("blueprint_session={}", self.session));
        if ajax {
            builder = builder.header("X-Requested-With", "XMLHttpRequest");
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        self.app.clone().oneshot(request).await.unwrap()
    }

    async fn get(&self, uri: &str) -> Response {
        self.send("GET", uri, None, false).await
    }

    async fn ajax(&self, method: &str, uri: &str, body: Option<Value>) -> Response {
        self.send(method, uri, body, true).await
    }

    async fn load_template(&self, name: &str) {
        let response = self
            .ajax(
                "POST",
                "/blueprint/templates/load",
                Some(json!({ "template_name": name })),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}

fn product_body() -> Value {
    json!({
        "name": "Product",
        "description": "Catalog item",
        "type": "core",
        "properties": [
            { "name": "Title", "type": "string", "is_required": true },
            { "name": "Price", "type": "decimal" }
        ],
        "relations": []
    })
}

#[tokio::test]
async fn test_create_entity_ajax_returns_envelope() {
    let client = Client::new();

    let response = client
        .ajax("POST", "/blueprint/entities", Some(product_body()))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Entita 'Product' byla úspěšně vytvořena.");
    assert_eq!(json["data"]["id"], 1);
    assert_eq!(json["data"]["development_hours"], 8);

    let list = json_body(client.get("/blueprint/entities").await).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["name"], "Product");
}

#[tokio::test]
async fn test_create_entity_page_request_redirects() {
    let client = Client::new();

    let response = client
        .send("POST", "/blueprint/entities", Some(product_body()), false)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("/?success="));
}

// A store rooted at a regular file fails every read and write
fn broken_store_client() -> (tempfile::NamedTempFile, Client) {
    let file = tempfile::NamedTempFile::new().unwrap();
    let store = Arc::new(FileSessionStore::new(file.path()));
    (file, Client::over(app_over(store)))
}

#[tokio::test]
async fn test_storage_failure_redirects_page_requests() {
    let (_file, client) = broken_store_client();

    let response = client
        .send("POST", "/blueprint/entities", Some(product_body()), false)
        .await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("/?error="));
    assert_eq!(
        urlencoding::decode(location.trim_start_matches("/?error=")).unwrap(),
        messages::UNEXPECTED_ERROR
    );
}

#[tokio::test]
async fn test_storage_failure_is_a_json_500_for_ajax() {
    let (_file, client) = broken_store_client();

    let response = client
        .ajax("POST", "/blueprint/entities", Some(product_body()))
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let json = json_body(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], messages::UNEXPECTED_ERROR);
    assert!(json.get("data").is_none());
}

#[tokio::test]
async fn test_create_entity_with_blank_name_fails_softly() {
    let client = Client::new();
    let mut body = product_body();
    body["name"] = json!("   ");

    let response = client.ajax("POST", "/blueprint/entities", Some(body)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let json = json_body(response).await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_request_without_session_cookie_is_rejected() {
    let request = Request::builder()
        .uri("/blueprint/entities")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["error"], "MISSING_SESSION");
}

#[tokio::test]
async fn test_get_missing_entity_returns_404() {
    let client = Client::new();

    let response = client.get("/blueprint/entities/99").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = json_body(response).await;
    assert_eq!(json["error"], "NOT_FOUND");
    assert_eq!(json["message"], "Entita nebyla nalezena.");
}

#[tokio::test]
async fn test_delete_missing_entity_is_a_soft_failure() {
    let client = Client::new();

    let response = client.ajax("DELETE", "/blueprint/entities/5", None).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(response).await["message"], "Entita nebyla nalezena.");
}

#[tokio::test]
async fn test_update_and_delete_entity() {
    let client = Client::new();
    client
        .ajax("POST", "/blueprint/entities", Some(product_body()))
        .await;

    let response = client
        .ajax(
            "PUT",
            "/blueprint/entities/1",
            Some(json!({ "description": "Updated" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["data"]["description"], "Updated");
    assert_eq!(json["data"]["name"], "Product");

    let response = client.ajax("DELETE", "/blueprint/entities/1", None).await;
    assert_eq!(
        json_body(response).await["message"],
        "Entita 'Product' byla smazána."
    );

    let list = json_body(client.get("/blueprint/entities").await).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_quick_add_blank_name() {
    let client = Client::new();

    let response = client
        .ajax(
            "POST",
            "/blueprint/entities/quick-add",
            Some(json!({ "entity_name": "", "entity_type": "lookup" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(response).await["message"], "Název entity je povinný.");
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let alice = Client::new();
    let bob = alice.with_session(Uuid::new_v4());

    alice
        .ajax("POST", "/blueprint/entities", Some(product_body()))
        .await;

    let alice_list = json_body(alice.get("/blueprint/entities").await).await;
    let bob_list = json_body(bob.get("/blueprint/entities").await).await;
    assert_eq!(alice_list.as_array().unwrap().len(), 1);
    assert!(bob_list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_load_unknown_template() {
    let client = Client::new();

    let response = client
        .ajax(
            "POST",
            "/blueprint/templates/load",
            Some(json!({ "template_name": "Spaceship" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json_body(response).await["message"], "Template nebyl nalezen.");
}

#[tokio::test]
async fn test_clear_entities_keeps_id_counter() {
    let client = Client::new();
    client.load_template("Blog Platform").await;

    let response = client.ajax("DELETE", "/blueprint/entities", None).await;
    assert_eq!(json_body(response).await["data"]["removed"], 4);

    let response = client
        .ajax("POST", "/blueprint/entities", Some(product_body()))
        .await;
    assert_eq!(json_body(response).await["data"]["id"], 5);
}

#[tokio::test]
async fn test_type_options() {
    let client = Client::new();

    let types = json_body(client.get("/blueprint/types/entity").await).await;
    assert_eq!(types.as_array().unwrap().len(), 5);
    assert_eq!(types[0], json!({ "value": 1, "text": "Core" }));

    let types = json_body(client.get("/blueprint/types/property").await).await;
    assert_eq!(types.as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_estimate_and_mock_data() {
    let client = Client::new();

    let response = client
        .ajax("POST", "/blueprint/estimate", Some(product_body()))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["hours"], 8);
    assert_eq!(json["formatted"], "545,00 €");

    let values = json_body(
        client
            .get("/blueprint/mock-data?property_type=url&count=2")
            .await,
    )
    .await;
    assert_eq!(values, json!(["https://example0.com", "https://example1.com"]));

    let response = client
        .get("/blueprint/mock-data?property_type=url&count=0")
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pricing_requires_entities() {
    let client = Client::new();

    let response = client.get("/pricing").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = client.get("/pricing/breakdown").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = client.get("/pricing/export").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_pricing_preview_uses_query_labels() {
    let client = Client::new();
    client.load_template("Blog Platform").await;

    let response = client
        .get("/pricing?project_name=Blog&client_name=Acme")
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    assert_eq!(json["project_name"], "Blog");
    assert_eq!(json["client_name"], "Acme");
    assert_eq!(json["entities"].as_array().unwrap().len(), 4);
    assert!(json["formatted_total"].as_str().unwrap().ends_with(" €"));
}

#[tokio::test]
async fn test_calculate_then_export() {
    let client = Client::new();
    client.load_template("E-commerce").await;

    let response = client
        .ajax(
            "POST",
            "/pricing/calculate",
            Some(json!({ "project_name": "Nový e-shop", "client_name": "Acme" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = client.get("/pricing/export").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/markdown; charset=utf-8"
    );
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.starts_with("attachment; filename=\"Cenova_nabidka_Nov__e-shop_"));
    assert!(disposition.contains("filename*=UTF-8''Cenova_nabidka_Nov%C3%BD%20e-shop_"));

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let report = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(report.contains("Nový e-shop"));
    assert!(report.contains("Acme"));

    let preview = json_body(client.get("/pricing/preview").await).await;
    assert_eq!(preview["pricing"]["project_name"], "Nový e-shop");
    assert_eq!(preview["report"].as_str().unwrap(), report);
}

#[tokio::test]
async fn test_compare_and_quick_estimate() {
    let client = Client::new();

    let rows = json_body(client.get("/pricing/compare").await).await;
    assert_eq!(rows.as_array().unwrap().len(), 4);

    client.load_template("CRM System").await;
    let rows = json_body(client.get("/pricing/compare").await).await;
    assert_eq!(rows.as_array().unwrap().len(), 5);
    assert_eq!(rows[0]["is_current_project"], true);
    assert_eq!(rows[0]["name"], "Váš aktuální projekt");

    let response = client
        .ajax(
            "POST",
            "/pricing/quick-estimate",
            Some(json!({ "entity_count": 3 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["breakdown"]["entities"]["amount"], 186_000);

    let response = client
        .ajax(
            "POST",
            "/pricing/quick-estimate",
            Some(json!({ "entity_count": 101 })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rates() {
    let client = Client::new();

    let json = json_body(client.get("/pricing/rates").await).await;
    assert_eq!(json["entity_types"].as_array().unwrap().len(), 5);
    assert_eq!(json["component_types"].as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn test_mockup_requires_entities() {
    let client = Client::new();

    let response = client.get("/mockup").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = client.get("/mockup/pages/Dashboard").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_mockup_pages_and_records() {
    let client = Client::new();
    client.load_template("Event Management").await;

    let project = json_body(client.get("/mockup").await).await;
    assert_eq!(project["name"], "Nový Projekt");
    assert_eq!(project["pages"].as_array().unwrap().len(), 9);

    let page = json_body(client.get("/mockup/pages/Event%20List").await).await;
    assert_eq!(page["route"], "/event");

    let response = client.get("/mockup/pages/Missing").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let records = json_body(client.get("/mockup/entities/event/records?count=3").await).await;
    assert_eq!(records["records"].as_array().unwrap().len(), 3);
    assert_eq!(records["records"][2]["Id"], "3");

    let detail = json_body(client.get("/mockup/entities/Venue/detail/42").await).await;
    assert_eq!(detail["record"]["Id"], "42");

    let form = json_body(client.get("/mockup/entities/Venue/form?id=4").await).await;
    assert_eq!(form["is_edit"], true);
    assert_eq!(form["record_id"], 4);

    let response = client.get("/mockup/entities/Spaceship/records").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = client.get("/mockup/mock-data/Event?count=500").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mockup_theme_update() {
    let client = Client::new();
    let theme = json!({
        "primary_color": "#112233",
        "secondary_color": "#445566",
        "font_family": "Inter",
        "logo_url": "/logo.svg",
        "company_name": "Acme"
    });

    let response = client.ajax("PUT", "/mockup/theme", Some(theme.clone())).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        json_body(response).await["message"],
        "Nejdříve vygenerujte mockup."
    );

    client.load_template("Blog Platform").await;
    client.get("/mockup").await;

    let response = client.ajax("PUT", "/mockup/theme", Some(theme)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let project = json_body(client.get("/mockup").await).await;
    assert_eq!(project["theme"]["primary_color"], "#112233");
    assert_eq!(project["theme"]["company_name"], "Acme");
}

#[tokio::test]
async fn test_dashboard_and_components() {
    let client = Client::new();
    client.load_template("Blog Platform").await;

    let data = json_body(client.get("/mockup/dashboard").await).await;
    assert_eq!(data["total_entities"], 4);
    assert_eq!(data["recent_activity"].as_array().unwrap().len(), 5);

    let response = client
        .ajax(
            "POST",
            "/mockup/components",
            Some(json!({ "entity_name": "article", "component_type": "list" })),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["name"], "Article List");
    assert_eq!(json["type"], "List");
    assert_eq!(json["hours"], 4);
}
