/// Activity tracking middleware
///
/// Stamps `last_request_time` for the user named in the Bearer token
/// before the handler runs. Applied globally: anonymous requests and
/// bad tokens pass through untouched, and a failed stamp never fails
/// the request.
use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error,
};
use futures::future::LocalBoxFuture;
use sqlx::PgPool;
use std::rc::Rc;

use crate::db::user_repo;
use crate::security::jwt;

pub struct ActivityTrackerMiddleware;

impl<S, B> Transform<S, ServiceRequest> for ActivityTrackerMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = ActivityTrackerMiddlewareService<S>;
    type Future = std::future::Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        std::future::ready(Ok(ActivityTrackerMiddlewareService {
            service: Rc::new(service),
        }))
    }
}

pub struct ActivityTrackerMiddlewareService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for ActivityTrackerMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        let token = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::to_string);
        let pool = req.app_data::<web::Data<PgPool>>().cloned();

        Box::pin(async move {
            if let (Some(token), Some(pool)) = (token, pool) {
                match jwt::get_user_id_from_token(&token) {
                    Ok(user_id) => {
                        if let Err(err) =
                            user_repo::touch_last_request_time(pool.get_ref(), user_id).await
                        {
                            tracing::debug!(%user_id, "last_request_time update failed: {}", err);
                        }
                    }
                    Err(err) => {
                        tracing::debug!("activity stamp skipped: {}", err);
                    }
                }
            }

            service.call(req).await
        })
    }
}
