use crate::{
    api::{attendance, department, event, member, notification, report, zone},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use std::sync::Arc;

pub fn configure(cfg: &mut web::ServiceConfig, config: Config) {
    // Helper to build per-route limiter
    fn build_limiter(requests_per_min: u32) -> Governor<PeerIpKeyExtractor, NoOpMiddleware> {
        let per_ms = if requests_per_min == 0 {
            1
        } else {
            60_000 / requests_per_min as u64
        };
        let cfg = GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(requests_per_min)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .unwrap();
        Governor::new(&cfg)
    }

    let login_limiter = Arc::new(build_limiter(config.rate_login_per_min));
    let register_limiter = Arc::new(build_limiter(config.rate_register_per_min));
    let refresh_limiter = Arc::new(build_limiter(config.rate_refresh_per_min));
    let protected_limiter = Arc::new(build_limiter(config.rate_protected_per_min));

    // Public routes
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/login")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::login)),
            )
            .service(
                web::resource("/register")
                    .wrap(register_limiter.clone())
                    .route(web::post().to(handlers::register)),
            )
            .service(
                web::resource("/refresh")
                    .wrap(refresh_limiter.clone())
                    .route(web::post().to(handlers::refresh_token)),
            )
            .service(
                web::resource("/logout")
                    .wrap(login_limiter.clone())
                    .route(web::post().to(handlers::logout)),
            ),
    );

    // Protected routes
    cfg.service(
        web::scope(&config.api_prefix)
            .wrap(from_fn(auth_middleware)) // authentication
            .wrap(protected_limiter) // rate limiting
            .service(
                web::scope("/members")
                    // /members
                    .service(
                        web::resource("")
                            .route(web::post().to(member::create_member))
                            .route(web::get().to(member::list_members)),
                    )
                    // /members/{id}
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(member::get_member))
                            .route(web::put().to(member::update_member))
                            .route(web::delete().to(member::delete_member)),
                    ),
            )
            .service(
                web::scope("/attendance")
                    .service(
                        web::resource("/sessions")
                            .route(web::post().to(attendance::save_session)),
                    )
                    .service(
                        web::resource("/check-in").route(web::post().to(attendance::check_in)),
                    )
                    .service(web::resource("/stats").route(web::get().to(attendance::stats)))
                    .service(
                        web::resource("/members/{id}")
                            .route(web::get().to(attendance::member_history)),
                    ),
            )
            .service(
                web::scope("/departments")
                    .service(
                        web::resource("").route(web::get().to(department::list_departments)),
                    )
                    .service(
                        web::resource("/{id}/roster")
                            .route(web::get().to(department::roster))
                            .route(web::post().to(department::add_to_roster)),
                    )
                    .service(
                        web::resource("/{id}/roster/{member_id}")
                            .route(web::delete().to(department::remove_from_roster)),
                    ),
            )
            .service(
                web::scope("/zones")
                    .service(web::resource("").route(web::get().to(zone::list_zones)))
                    .service(web::resource("/{id}/roster").route(web::get().to(zone::roster))),
            )
            .service(
                web::scope("/events")
                    .service(
                        web::resource("")
                            .route(web::post().to(event::create_event))
                            .route(web::get().to(event::list_events)),
                    )
                    .service(
                        web::resource("/{id}/registrations")
                            .route(web::post().to(event::register_member)),
                    ),
            )
            .service(
                web::scope("/notifications")
                    .service(
                        web::resource("")
                            .route(web::post().to(notification::create_notification))
                            .route(web::get().to(notification::list_notifications)),
                    )
                    .service(
                        web::resource("/{id}/read")
                            .route(web::put().to(notification::mark_read)),
                    ),
            )
            .service(
                web::scope("/reports").service(
                    web::resource("/attendance")
                        .route(web::get().to(report::attendance_report)),
                ),
            ),
    );
}

// LOGIN
//  ├─ access_token (15 min)
//  └─ refresh_token (7 days)

// API REQUEST
//  └─ Authorization: Bearer access_token

// ACCESS EXPIRED
//  └─ POST /refresh with refresh_token
//       └─ returns new access_token
