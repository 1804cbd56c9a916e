use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use belpaese::api::ContentSource;
use belpaese::config::Config;
use belpaese::services::{ContentSnapshot, InMemoryContentService};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

fn snapshot() -> ContentSnapshot {
    serde_json::from_value(json!({
        "destinations": [
            {"id": 1, "type": "region", "translations": [
                {"languages_code": "it", "destination_name": "Lazio", "slug_permalink": "lazio",
                 "seo_summary": "La regione di Roma"},
                {"languages_code": "en", "destination_name": "Lazio", "slug_permalink": "lazio"}
            ]},
            {"id": 2, "type": "province", "region_id": 1, "translations": [
                {"languages_code": "it", "destination_name": "Roma", "slug_permalink": "roma"}
            ]},
            {"id": 3, "type": "municipality", "region_id": 1, "province_id": 2, "translations": [
                {"languages_code": "it", "destination_name": "Tivoli", "slug_permalink": "tivoli"}
            ]},
            {"id": 4, "type": "municipality", "region_id": 1, "province_id": 2, "translations": [
                {"languages_code": "it", "destination_name": "Frascati", "slug_permalink": "frascati"}
            ]}
        ],
        "articles": [
            {"id": 10, "date_created": "2024-03-01T09:00:00Z", "featured_status": "homepage",
             "category_id": 7, "translations": [
                {"languages_code": "it", "titolo_articolo": "Weekend a Roma", "slug_permalink": "weekend-roma"}
            ]},
            {"id": 11, "date_created": "2024-01-01T09:00:00Z", "translations": [
                {"languages_code": "it", "titolo_articolo": "Vini dei Castelli", "slug_permalink": "vini-castelli"}
            ]}
        ],
        "categories": [
            {"id": 7, "visible": true, "translations": [
                {"languages_code": "it", "nome_categoria": "Viaggi", "slug_permalink": "viaggi"}
            ]}
        ],
        "companies": [
            {"id": 20, "company_name": "Cantina Tivoli", "category_id": 30, "featured": true,
             "translations": [{"languages_code": "it", "slug_permalink": "cantina-tivoli"}]},
            {"id": 21, "company_name": "Chiusa", "active": false,
             "translations": [{"languages_code": "it", "slug_permalink": "chiusa"}]}
        ],
        "company_categories": [
            {"id": 30, "sort": 1, "translations": [{"languages_code": "it", "nome_categoria": "Cantine"}]}
        ],
        "page_translations": {
            "homepage": {"it": {"hero": "Benvenuti"}}
        }
    }))
    .unwrap()
}

fn spawn_app() -> Router {
    let mut config = Config::default();
    config.site.base_url = "https://example.org".to_string();
    config.site.supported_languages = vec!["it".to_string(), "en".to_string()];

    let content = Arc::new(InMemoryContentService::new(snapshot()));
    let state = belpaese::api::create_app_state(config, content, ContentSource::Snapshot, None);
    belpaese::api::router(state)
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_search_ranks_and_links() {
    let app = spawn_app();

    let (status, body) = get(&app, "/api/search?q=roma&lang=it").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let destinations = body["data"]["destinations"].as_array().unwrap();
    assert_eq!(destinations[0]["link"], "/it/lazio/roma");
    assert_eq!(destinations[0]["score"], 25);
    let links: Vec<&str> = destinations
        .iter()
        .map(|d| d["link"].as_str().unwrap())
        .collect();
    assert!(links.contains(&"/it/lazio"));
    assert!(links.contains(&"/it/roma/tivoli"));

    let articles = body["data"]["articles"].as_array().unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0]["link"], "/it/magazine/weekend-roma");
}

#[tokio::test]
async fn test_blank_search_is_empty() {
    let app = spawn_app();

    let (status, body) = get(&app, "/api/search?q=%20%20").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["destinations"], json!([]));
    assert_eq!(body["data"]["articles"], json!([]));
}

#[tokio::test]
async fn test_unsupported_language_is_rejected() {
    let app = spawn_app();

    let (status, body) = get(&app, "/api/fr/destinations").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("fr"));

    let (status, _) = get(&app, "/api/search?q=roma&lang=de").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_destination_list_filters() {
    let app = spawn_app();

    let (status, body) = get(&app, "/api/it/destinations?type=municipality&province_id=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, _) = get(&app, "/api/it/destinations?type=country").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_destination_detail_with_trail_and_metadata() {
    let app = spawn_app();

    let (status, body) = get(&app, "/api/it/destinations/slug/tivoli").await;
    assert_eq!(status, StatusCode::OK);

    let data = &body["data"];
    assert_eq!(data["destination"]["id"], "3");
    assert_eq!(data["trail"]["region_slug"], "lazio");
    assert_eq!(data["trail"]["province_slug"], "roma");
    assert_eq!(data["trail"]["breadcrumb"][2]["path"], "/it/lazio/roma/tivoli");
    assert_eq!(
        data["metadata"]["canonical"],
        "https://example.org/it/lazio/roma/tivoli"
    );

    let (status, body) = get(&app, "/api/it/destinations/slug/atlantide").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_breadcrumb_and_siblings() {
    let app = spawn_app();

    let (status, body) = get(&app, "/api/it/destinations/2/breadcrumb").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["breadcrumb"][1]["path"], "/it/lazio/roma");

    let (status, _) = get(&app, "/api/en/destinations/2/breadcrumb").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get(&app, "/api/it/destinations/3/siblings?province_id=2").await;
    assert_eq!(status, StatusCode::OK);
    let siblings = body["data"].as_array().unwrap();
    assert_eq!(siblings.len(), 1);
    assert_eq!(siblings[0]["id"], "4");

    let (status, _) = get(&app, "/api/it/destinations/3/siblings").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_article_listing_and_detail() {
    let app = spawn_app();

    let (status, body) = get(&app, "/api/it/articles?limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 2);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["items"][0]["id"], "10");

    let (_, body) = get(&app, "/api/it/articles?featured=homepage").await;
    assert_eq!(body["data"]["total"], 1);

    let (status, _) = get(&app, "/api/it/articles?limit=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = get(&app, "/api/it/articles/weekend-roma").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["metadata"]["open_graph"]["type"], "article");
    assert_eq!(body["data"]["metadata"]["open_graph"]["article"]["section"], "Viaggi");

    let (_, body) = get(&app, "/api/it/categories/viaggi/articles").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_companies_only_active() {
    let app = spawn_app();

    let (status, body) = get(&app, "/api/it/companies").await;
    assert_eq!(status, StatusCode::OK);
    let companies = body["data"].as_array().unwrap();
    assert_eq!(companies.len(), 1);
    assert_eq!(companies[0]["company_name"], "Cantina Tivoli");

    let (_, body) = get(&app, "/api/it/companies?featured=false").await;
    assert_eq!(body["data"], json!([]));

    let (status, body) = get(&app, "/api/it/companies/cantina-tivoli").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["metadata"]["title"], "Cantina Tivoli");

    let (_, body) = get(&app, "/api/it/company-categories").await;
    assert_eq!(body["data"][0]["id"], "30");
}

#[tokio::test]
async fn test_page_translations() {
    let app = spawn_app();

    let (status, body) = get(&app, "/api/it/translations/homepage").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["hero"], "Benvenuti");

    let (status, _) = get(&app, "/api/en/translations/homepage").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_system_status() {
    let app = spawn_app();

    let (status, body) = get(&app, "/api/system/status").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["content_source"], "snapshot");
    assert_eq!(body["data"]["cms_reachable"], true);
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_sitemap_xml() {
    let app = spawn_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/sitemap.xml")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
    let mime: mime::Mime = content_type.parse().unwrap();
    assert_eq!(mime.subtype(), mime::XML);

    let body = response.into_body().collect().await.unwrap().to_bytes();
    let xml = String::from_utf8(body.to_vec()).unwrap();
    assert!(xml.contains("<loc>https://example.org/it/lazio/roma/tivoli</loc>"));
    assert!(xml.contains("<loc>https://example.org/it/magazine/weekend-roma</loc>"));
    assert!(xml.contains("<loc>https://example.org/en/lazio</loc>"));
    assert!(!xml.contains("chiusa"));
}
