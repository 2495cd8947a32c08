/// Integration tests for hashtag CRUD and listing
mod common;

#[cfg(test)]
mod tests {
    use actix_web::{test, web, App};
    use serde_json::json;
    use sqlx::PgPool;
    use uuid::Uuid;

    use social_api::config::MediaConfig;
    use social_api::routes;
    use social_api::services::MediaStorage;

    use crate::common::fixtures;

    async fn setup_test_app(
        pool: PgPool,
    ) -> impl actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
    > {
        fixtures::init_test_keys();

        let media = MediaStorage::new(&MediaConfig {
            root: std::env::temp_dir()
                .join("social-api-tests")
                .to_string_lossy()
                .into_owned(),
            max_image_bytes: 10 * 1024 * 1024,
        });

        test::init_service(
            App::new()
                .app_data(web::Data::new(pool))
                .app_data(web::Data::new(media))
                .configure(routes::configure),
        )
        .await
    }

    // ============================================
    // Create
    // ============================================

    #[actix_web::test]
    #[ignore = "Requires PostgreSQL database"]
    async fn test_create_hashtag() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let user = fixtures::create_test_user(&pool).await;
        let app = setup_test_app(pool.clone()).await;

        let req = test::TestRequest::post()
            .uri("/hashtags/")
            .insert_header(("Authorization", fixtures::bearer_token(&user)))
            .set_json(json!({"name": "photography"}))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["name"], "photography");
        assert!(body["id"].as_str().is_some());

        fixtures::cleanup_test_data(&pool).await;
    }

    #[actix_web::test]
    #[ignore = "Requires PostgreSQL database"]
    async fn test_create_duplicate_hashtag() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let user = fixtures::create_test_user(&pool).await;
        fixtures::create_test_hashtag(&pool, "duplicated").await;
        let app = setup_test_app(pool.clone()).await;

        let req = test::TestRequest::post()
            .uri("/hashtags/")
            .insert_header(("Authorization", fixtures::bearer_token(&user)))
            .set_json(json!({"name": "duplicated"}))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 409);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("A hashtag with that name already exists."));

        fixtures::cleanup_test_data(&pool).await;
    }

    // ============================================
    // Listing
    // ============================================

    #[actix_web::test]
    #[ignore = "Requires PostgreSQL database"]
    async fn test_list_hashtags_pagination() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let user = fixtures::create_test_user(&pool).await;
        for i in 1..=12 {
            fixtures::create_test_hashtag(&pool, &format!("tag{:02}", i)).await;
        }

        let app = setup_test_app(pool.clone()).await;
        let auth = fixtures::bearer_token(&user);

        let req = test::TestRequest::get()
            .uri("/hashtags/")
            .insert_header(("Authorization", auth.clone()))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["count"], 12);
        assert_eq!(body["results"].as_array().unwrap().len(), 10);
        assert_eq!(body["next"], "/hashtags/?page=2");
        assert!(body["previous"].is_null());
        // Ordered by name
        assert_eq!(body["results"][0]["name"], "tag01");

        let req = test::TestRequest::get()
            .uri("/hashtags/?page=2")
            .insert_header(("Authorization", auth))
            .to_request();

        let resp = test::call_service(&app, req).await;
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["results"].as_array().unwrap().len(), 2);
        assert_eq!(body["results"][0]["name"], "tag11");
        assert!(body["next"].is_null());
        assert_eq!(body["previous"], "/hashtags/");

        fixtures::cleanup_test_data(&pool).await;
    }

    #[actix_web::test]
    #[ignore = "Requires PostgreSQL database"]
    async fn test_list_hashtags_name_filter() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let user = fixtures::create_test_user(&pool).await;
        fixtures::create_test_hashtag(&pool, "rustacean").await;
        fixtures::create_test_hashtag(&pool, "gardening").await;

        let app = setup_test_app(pool.clone()).await;

        let req = test::TestRequest::get()
            .uri("/hashtags/?name=RUST")
            .insert_header(("Authorization", fixtures::bearer_token(&user)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["results"][0]["name"], "rustacean");

        fixtures::cleanup_test_data(&pool).await;
    }

    #[actix_web::test]
    #[ignore = "Requires PostgreSQL database"]
    async fn test_list_hashtags_requires_auth() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let app = setup_test_app(pool.clone()).await;

        let req = test::TestRequest::get().uri("/hashtags/").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 401);

        fixtures::cleanup_test_data(&pool).await;
    }

    // ============================================
    // Detail / Update / Delete
    // ============================================

    #[actix_web::test]
    #[ignore = "Requires PostgreSQL database"]
    async fn test_get_hashtag() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let user = fixtures::create_test_user(&pool).await;
        let tag = fixtures::create_test_hashtag(&pool, "findme").await;
        let app = setup_test_app(pool.clone()).await;

        let req = test::TestRequest::get()
            .uri(&format!("/hashtags/{}/", tag.id))
            .insert_header(("Authorization", fixtures::bearer_token(&user)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["name"], "findme");

        fixtures::cleanup_test_data(&pool).await;
    }

    #[actix_web::test]
    #[ignore = "Requires PostgreSQL database"]
    async fn test_get_hashtag_not_found() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let user = fixtures::create_test_user(&pool).await;
        let app = setup_test_app(pool.clone()).await;

        let req = test::TestRequest::get()
            .uri(&format!("/hashtags/{}/", Uuid::new_v4()))
            .insert_header(("Authorization", fixtures::bearer_token(&user)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("Hashtag not found"));

        fixtures::cleanup_test_data(&pool).await;
    }

    #[actix_web::test]
    #[ignore = "Requires PostgreSQL database"]
    async fn test_put_hashtag_rename() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let user = fixtures::create_test_user(&pool).await;
        let tag = fixtures::create_test_hashtag(&pool, "oldname").await;
        let app = setup_test_app(pool.clone()).await;

        let req = test::TestRequest::put()
            .uri(&format!("/hashtags/{}/", tag.id))
            .insert_header(("Authorization", fixtures::bearer_token(&user)))
            .set_json(json!({"name": "newname"}))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["name"], "newname");

        fixtures::cleanup_test_data(&pool).await;
    }

    #[actix_web::test]
    #[ignore = "Requires PostgreSQL database"]
    async fn test_put_hashtag_duplicate_name() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let user = fixtures::create_test_user(&pool).await;
        fixtures::create_test_hashtag(&pool, "occupied").await;
        let tag = fixtures::create_test_hashtag(&pool, "original").await;
        let app = setup_test_app(pool.clone()).await;

        let req = test::TestRequest::put()
            .uri(&format!("/hashtags/{}/", tag.id))
            .insert_header(("Authorization", fixtures::bearer_token(&user)))
            .set_json(json!({"name": "occupied"}))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 409);

        fixtures::cleanup_test_data(&pool).await;
    }

    #[actix_web::test]
    #[ignore = "Requires PostgreSQL database"]
    async fn test_patch_hashtag_without_name() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let user = fixtures::create_test_user(&pool).await;
        let tag = fixtures::create_test_hashtag(&pool, "untouched").await;
        let app = setup_test_app(pool.clone()).await;

        // A PATCH with no fields answers with the current row
        let req = test::TestRequest::patch()
            .uri(&format!("/hashtags/{}/", tag.id))
            .insert_header(("Authorization", fixtures::bearer_token(&user)))
            .set_json(json!({}))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: serde_json::Value = test::read_body_json(resp).await;
        assert_eq!(body["name"], "untouched");

        fixtures::cleanup_test_data(&pool).await;
    }

    #[actix_web::test]
    #[ignore = "Requires PostgreSQL database"]
    async fn test_delete_hashtag() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let user = fixtures::create_test_user(&pool).await;
        let tag = fixtures::create_test_hashtag(&pool, "shortlived").await;
        let app = setup_test_app(pool.clone()).await;
        let auth = fixtures::bearer_token(&user);

        let req = test::TestRequest::delete()
            .uri(&format!("/hashtags/{}/", tag.id))
            .insert_header(("Authorization", auth.clone()))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 204);

        // Deleting again is a 404
        let req = test::TestRequest::delete()
            .uri(&format!("/hashtags/{}/", tag.id))
            .insert_header(("Authorization", auth))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 404);

        fixtures::cleanup_test_data(&pool).await;
    }

    #[actix_web::test]
    #[ignore = "Requires PostgreSQL database"]
    async fn test_delete_hashtag_detaches_posts() {
        let pool = fixtures::create_test_pool().await;
        fixtures::cleanup_test_data(&pool).await;

        let user = fixtures::create_test_user(&pool).await;
        let post = fixtures::create_test_post(&pool, user.id, "Tagged", "content").await;
        let tag = fixtures::create_test_hashtag(&pool, "cascades").await;
        fixtures::attach_hashtag(&pool, post.id, tag.id).await;

        let app = setup_test_app(pool.clone()).await;

        let req = test::TestRequest::delete()
            .uri(&format!("/hashtags/{}/", tag.id))
            .insert_header(("Authorization", fixtures::bearer_token(&user)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 204);

        // The join row cascades away while the post survives
        let links: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM post_hashtags WHERE post_id = $1")
            .bind(post.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(links, 0);

        let posts: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE id = $1")
            .bind(post.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(posts, 1);

        fixtures::cleanup_test_data(&pool).await;
    }
}
