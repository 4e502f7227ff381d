use std::collections::HashSet;

use actix_web::{get, post, web, HttpResponse};
use charybdis::types::Text;
use log::{debug, warn};
use serde::Deserialize;
use serde_json::json;

use crate::api::types::Response;
use crate::app::App;
use crate::errors::PortfolioError;
use crate::models::like::{validate_identifier, ContentId, ContentType, LikeTarget};
use crate::store::LikeStore;

#[derive(Debug, Deserialize)]
pub struct ToggleLikeParams {
    #[serde(default, alias = "userIdentifier")]
    user_identifier: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LikedIdsParams {
    #[serde(
        default,
        alias = "contentIds",
        alias = "blog_ids",
        alias = "blogIds",
        alias = "project_ids",
        alias = "projectIds"
    )]
    content_ids: Option<Vec<ContentId>>,

    #[serde(default, alias = "userIdentifier")]
    user_identifier: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LikeStatusQuery {
    #[serde(default, alias = "userIdentifier")]
    user_identifier: Option<String>,
}

fn parse_content_type(raw: &str) -> Result<ContentType, PortfolioError> {
    raw.parse()
        .map_err(|_| PortfolioError::InvalidRequest(format!("unknown content type `{}`", raw)))
}

fn parse_target(path: &(String, String)) -> Result<LikeTarget, PortfolioError> {
    let (content_type, content_id) = path;

    LikeTarget::new(parse_content_type(content_type)?, content_id)
}

#[post("/like-toggle/{content_type}/{content_id}")]
pub async fn toggle_like(
    app: web::Data<App>,
    path: web::Path<(String, String)>,
    params: web::Json<ToggleLikeParams>,
) -> Response {
    let user_identifier = validate_identifier(params.user_identifier.as_deref())?;
    let target = parse_target(&path)?;

    let liked = app.store.toggle_like(user_identifier, &target).await?;

    Ok(HttpResponse::Ok().json(json!({ "liked": liked })))
}

#[post("/likes-batch/{content_type}")]
pub async fn liked_ids(
    app: web::Data<App>,
    content_type: web::Path<String>,
    params: web::Json<LikedIdsParams>,
) -> Response {
    let content_type = parse_content_type(&content_type)?;
    let user_identifier = validate_identifier(params.user_identifier.as_deref())?;
    let content_ids = params
        .content_ids
        .as_ref()
        .ok_or_else(|| PortfolioError::InvalidRequest("content_ids must be an array".to_string()))?;

    // ids that cannot address any record are simply not liked
    let mut seen = HashSet::new();
    let requested: Vec<Text> = content_ids
        .iter()
        .filter_map(|id| {
            content_type
                .canonical_wire_id(id)
                .map_err(|e| debug!("Skipping {} id {:?} in batch: {}", content_type, id, e))
                .ok()
        })
        .filter(|id| seen.insert(id.clone()))
        .collect();

    if requested.is_empty() {
        return Ok(HttpResponse::Ok().json(json!({ "liked_ids": [] })));
    }

    let liked = app
        .store
        .liked_content_ids(user_identifier, content_type, &requested)
        .await?;

    let liked_ids: Vec<ContentId> = requested
        .iter()
        .filter(|id| liked.contains(*id))
        .filter_map(|id| content_type.wire_id(id))
        .collect();

    Ok(HttpResponse::Ok().json(json!({ "liked_ids": liked_ids })))
}

#[get("/like-status/{content_type}/{content_id}")]
pub async fn like_status(
    app: web::Data<App>,
    path: web::Path<(String, String)>,
    query: web::Query<LikeStatusQuery>,
) -> HttpResponse {
    let liked = match validate_identifier(query.user_identifier.as_deref()) {
        Ok(user_identifier) => {
            let res = match parse_target(&path) {
                Ok(target) => app.store.is_liked(user_identifier, &target).await,
                Err(e) => Err(e),
            };

            res.unwrap_or_else(|e| {
                warn!("Like status lookup failed for {}/{}: {}", path.0, path.1, e);

                false
            })
        }
        Err(_) => false,
    };

    HttpResponse::Ok().json(json!({ "liked": liked }))
}

#[get("/like-count/{content_type}/{content_id}")]
pub async fn like_count(app: web::Data<App>, path: web::Path<(String, String)>) -> Response {
    let target = parse_target(&path)?;
    let likes = app.store.like_count(&target).await?;

    Ok(HttpResponse::Ok().json(json!({
        "id": target.content_type.wire_id(&target.content_id),
        "likes": likes,
    })))
}

#[post("/likes-recount/{content_type}/{content_id}")]
pub async fn recount_likes(app: web::Data<App>, path: web::Path<(String, String)>) -> Response {
    let target = parse_target(&path)?;
    let likes = app.store.recount_likes(&target).await?;

    Ok(HttpResponse::Ok().json(json!({
        "id": target.content_type.wire_id(&target.content_id),
        "likes": likes,
    })))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test::{call_service, init_service, read_body_json, TestRequest};
    use actix_web::App as ActixWebApp;
    use serde_json::{json, Value};

    use crate::api;
    use crate::app::App;
    use crate::models::like::{ContentType, LikeTarget};
    use crate::store::LikeStore;
    use actix_web::web;

    macro_rules! test_app {
        ($app:expr) => {
            init_service(ActixWebApp::new().app_data($app.clone()).configure(api::config)).await
        };
    }

    fn toggle_request(path: &str, body: Value) -> TestRequest {
        TestRequest::post().uri(path).set_json(body)
    }

    #[actix_web::test]
    async fn toggle_twice_flips_state_and_restores_counter() {
        let app = web::Data::new(App::memory());
        let target = LikeTarget::new(ContentType::Blog, "blog-42").unwrap();
        app.memory_store().seed_like_count(&target, 5);
        let service = test_app!(app);

        let req = toggle_request("/like-toggle/blog/blog-42", json!({"user_identifier": "anon_1"})).to_request();
        let res = call_service(&service, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = read_body_json(res).await;
        assert_eq!(body, json!({"liked": true}));
        assert_eq!(app.store.like_count(&target).await.unwrap(), 6);

        let req = toggle_request("/like-toggle/blog/blog-42", json!({"userIdentifier": "anon_1"})).to_request();
        let res = call_service(&service, req).await;
        let body: Value = read_body_json(res).await;
        assert_eq!(body, json!({"liked": false}));
        assert_eq!(app.store.like_count(&target).await.unwrap(), 5);
    }

    #[actix_web::test]
    async fn toggle_without_identifier_is_rejected_without_mutation() {
        let app = web::Data::new(App::memory());
        let target = LikeTarget::new(ContentType::Blog, "blog-42").unwrap();
        let service = test_app!(app);

        for body in [json!({}), json!({"user_identifier": ""}), json!({"user_identifier": null})] {
            let req = toggle_request("/like-toggle/blog/blog-42", body).to_request();
            let res = call_service(&service, req).await;
            assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        }

        let res = call_service(
            &service,
            TestRequest::post()
                .uri("/like-toggle/blog/blog-42")
                .insert_header(("content-type", "application/json"))
                .set_payload("{not json")
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        assert_eq!(app.store.like_count(&target).await.unwrap(), 0);
        assert!(!app.store.is_liked("anon_1", &target).await.unwrap());
    }

    #[actix_web::test]
    async fn toggle_rejects_unknown_type_and_non_numeric_project_id() {
        let app = web::Data::new(App::memory());
        let service = test_app!(app);
        let body = json!({"user_identifier": "anon_1"});

        let req = toggle_request("/like-toggle/review/1", body.clone()).to_request();
        let res = call_service(&service, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let req = toggle_request("/like-toggle/project/abc", body).to_request();
        let res = call_service(&service, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn batch_returns_only_liked_blog_ids() {
        let app = web::Data::new(App::memory());
        app.store
            .toggle_like("anon_1", &LikeTarget::new(ContentType::Blog, "blog-2").unwrap())
            .await
            .unwrap();
        let service = test_app!(app);

        let req = TestRequest::post()
            .uri("/likes-batch/blog")
            .set_json(json!({"content_ids": ["blog-1", "blog-2", "blog-3"], "user_identifier": "anon_1"}))
            .to_request();
        let body: Value = read_body_json(call_service(&service, req).await).await;

        assert_eq!(body, json!({"liked_ids": ["blog-2"]}));
    }

    #[actix_web::test]
    async fn batch_returns_project_ids_as_numbers() {
        let app = web::Data::new(App::memory());
        app.store
            .toggle_like("anon_1", &LikeTarget::new(ContentType::Project, "11").unwrap())
            .await
            .unwrap();
        let service = test_app!(app);

        let req = TestRequest::post()
            .uri("/likes-batch/project")
            .set_json(json!({"projectIds": [10, 11], "userIdentifier": "anon_1"}))
            .to_request();
        let body: Value = read_body_json(call_service(&service, req).await).await;

        assert_eq!(body, json!({"liked_ids": [11]}));
    }

    #[actix_web::test]
    async fn batch_skips_ids_that_cannot_match() {
        let app = web::Data::new(App::memory());
        app.store
            .toggle_like("anon_1", &LikeTarget::new(ContentType::Blog, "blog-2").unwrap())
            .await
            .unwrap();
        app.store
            .toggle_like("anon_1", &LikeTarget::new(ContentType::Project, "10").unwrap())
            .await
            .unwrap();
        let service = test_app!(app);

        for (uri, ids, expected) in [
            ("/likes-batch/blog", json!(["blog-2", ""]), json!(["blog-2"])),
            ("/likes-batch/project", json!([10, "abc"]), json!([10])),
        ] {
            let req = TestRequest::post()
                .uri(uri)
                .set_json(json!({"content_ids": ids, "user_identifier": "anon_1"}))
                .to_request();
            let res = call_service(&service, req).await;
            assert_eq!(res.status(), StatusCode::OK);

            let body: Value = read_body_json(res).await;
            assert_eq!(body, json!({"liked_ids": expected}), "{}", uri);
        }
    }

    #[actix_web::test]
    async fn batch_for_unknown_identity_is_empty() {
        let app = web::Data::new(App::memory());
        let service = test_app!(app);

        let req = TestRequest::post()
            .uri("/likes-batch/blog")
            .set_json(json!({"content_ids": ["blog-1", "blog-1"], "user_identifier": "anon_nobody"}))
            .to_request();
        let body: Value = read_body_json(call_service(&service, req).await).await;

        assert_eq!(body, json!({"liked_ids": []}));
    }

    #[actix_web::test]
    async fn batch_requires_array_and_identifier() {
        let app = web::Data::new(App::memory());
        let service = test_app!(app);

        for body in [
            json!({"user_identifier": "anon_1"}),
            json!({"content_ids": "blog-1", "user_identifier": "anon_1"}),
            json!({"content_ids": ["blog-1"]}),
        ] {
            let req = TestRequest::post().uri("/likes-batch/blog").set_json(body).to_request();
            let res = call_service(&service, req).await;

            assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[actix_web::test]
    async fn status_defaults_to_not_liked() {
        let app = web::Data::new(App::memory());
        app.store
            .toggle_like("anon_1", &LikeTarget::new(ContentType::Blog, "blog-1").unwrap())
            .await
            .unwrap();
        let service = test_app!(app);

        for (uri, expected) in [
            ("/like-status/blog/blog-1?user_identifier=anon_1", true),
            ("/like-status/blog/blog-1?userIdentifier=anon_1", true),
            ("/like-status/blog/blog-1?user_identifier=anon_2", false),
            ("/like-status/blog/blog-1", false),
            ("/like-status/review/blog-1?user_identifier=anon_1", false),
        ] {
            let res = call_service(&service, TestRequest::get().uri(uri).to_request()).await;
            assert_eq!(res.status(), StatusCode::OK);

            let body: Value = read_body_json(res).await;
            assert_eq!(body, json!({"liked": expected}), "{}", uri);
        }
    }

    #[actix_web::test]
    async fn count_and_recount_report_coerced_id() {
        let app = web::Data::new(App::memory());
        let target = LikeTarget::new(ContentType::Project, "10").unwrap();
        app.store.toggle_like("anon_1", &target).await.unwrap();
        app.memory_store().seed_like_count(&target, 4);
        let service = test_app!(app);

        let res = call_service(&service, TestRequest::get().uri("/like-count/project/10").to_request()).await;
        let body: Value = read_body_json(res).await;
        assert_eq!(body, json!({"id": 10, "likes": 4}));

        let res = call_service(&service, TestRequest::post().uri("/likes-recount/project/10").to_request()).await;
        let body: Value = read_body_json(res).await;
        assert_eq!(body, json!({"id": 10, "likes": 1}));
    }
}
