use crate::{
    api::{profile, salary},
    auth::middleware::auth_middleware,
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfig, GovernorConfigBuilder, PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use anyhow::anyhow;

pub type ProtectedLimiter = GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>;

/// Per-IP limiter for the protected scope. Built once so every worker shares
/// the same quota.
pub fn protected_limiter(requests_per_min: u32) -> anyhow::Result<ProtectedLimiter> {
    let per_ms = if requests_per_min == 0 {
        1
    } else {
        (60_000 / requests_per_min as u64).max(1)
    };

    GovernorConfigBuilder::default()
        .per_millisecond(per_ms)
        .burst_size(requests_per_min.max(1))
        .key_extractor(PeerIpKeyExtractor)
        .finish()
        .ok_or_else(|| anyhow!("Invalid rate limit: {requests_per_min} requests per minute"))
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limiter: &ProtectedLimiter) {
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(Governor::new(limiter)) // rate limiting
            // /profile
            .service(
                web::resource("/profile")
                    .route(web::get().to(profile::get_my_profile))
                    .route(web::put().to(profile::update_my_profile)),
            )
            // /salary/reconcile
            .service(
                web::resource("/salary/reconcile")
                    .route(web::post().to(salary::reconcile_snapshot)),
            )
            .service(
                web::scope("/employee/{id}")
                    // /employee/{id}/profile
                    .service(
                        web::resource("/profile")
                            .route(web::get().to(profile::get_employee_profile))
                            .route(web::put().to(profile::update_employee_profile)),
                    )
                    // /employee/{id}/salary/draft
                    .service(
                        web::resource("/salary/draft")
                            .route(web::post().to(salary::open_draft))
                            .route(web::get().to(salary::get_draft))
                            .route(web::patch().to(salary::edit_draft))
                            .route(web::delete().to(salary::discard_draft)),
                    )
                    // /employee/{id}/salary/draft/commit
                    .service(
                        web::resource("/salary/draft/commit")
                            .route(web::post().to(salary::commit_draft)),
                    ),
            ),
    );
}
