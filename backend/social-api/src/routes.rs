//! HTTP route table.
//!
//! Signup and token endpoints are public; everything else sits behind
//! [`JwtAuthMiddleware`]. Trailing slashes are part of the public API
//! contract and must not be normalized away.

use actix_web::web;

use crate::handlers;
use crate::middleware::JwtAuthMiddleware;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health_check))
        .service(
            web::scope("/user")
                .route("/signup/", web::post().to(handlers::signup))
                .route("/token/", web::post().to(handlers::obtain_token))
                .route("/token/refresh/", web::post().to(handlers::refresh_token))
                .route("/token/verify/", web::post().to(handlers::verify_token))
                .service(
                    web::scope("")
                        .wrap(JwtAuthMiddleware)
                        .route("/me/", web::get().to(handlers::get_me))
                        .route("/me/", web::put().to(handlers::put_me))
                        .route("/me/", web::patch().to(handlers::patch_me))
                        .route("/activity/", web::get().to(handlers::get_activity)),
                ),
        )
        .service(
            web::scope("/posts")
                .wrap(JwtAuthMiddleware)
                .route("/", web::get().to(handlers::list_posts))
                .route("/", web::post().to(handlers::create_post))
                // Registered before /{id}/ so "favorite" is not captured as a post id
                .route("/favorite/", web::get().to(handlers::list_favorite_posts))
                .route("/{id}/", web::get().to(handlers::get_post))
                .route("/{id}/", web::put().to(handlers::update_post))
                .route("/{id}/", web::patch().to(handlers::partial_update_post))
                .route("/{id}/", web::delete().to(handlers::delete_post))
                .route(
                    "/{id}/like-unlike/",
                    web::post().to(handlers::like_unlike_post),
                )
                .route("/{id}/add-comment/", web::post().to(handlers::add_comment))
                .route(
                    "/{id}/upload-image/",
                    web::post().to(handlers::upload_post_image),
                ),
        )
        .service(
            web::scope("/hashtags")
                .wrap(JwtAuthMiddleware)
                .route("/", web::get().to(handlers::list_hashtags))
                .route("/", web::post().to(handlers::create_hashtag))
                .route("/{id}/", web::get().to(handlers::get_hashtag))
                .route("/{id}/", web::put().to(handlers::update_hashtag))
                .route("/{id}/", web::patch().to(handlers::partial_update_hashtag))
                .route("/{id}/", web::delete().to(handlers::delete_hashtag)),
        )
        .service(
            web::scope("/analytics")
                .wrap(JwtAuthMiddleware)
                .route("/", web::get().to(handlers::get_analytics)),
        );
}
