pub mod error;
pub mod handlers;
pub mod middleware;
pub mod state;

pub use state::ApiState;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};

use crate::infra::http::RouterState;

/// `/auth/login` plus every `/admin` route. Admin routes sit behind the
/// bearer-token gate; only the upload route accepts bodies up to
/// `upload_body_limit` bytes.
pub fn build_api_router(state: RouterState, upload_body_limit: usize) -> Router<RouterState> {
    let auth_state = state.api.clone();

    let admin = Router::new()
        .route(
            "/admin/content",
            get(handlers::list_content).put(handlers::save_content),
        )
        .route(
            "/admin/content/quick-links",
            put(handlers::save_quick_links),
        )
        .route(
            "/admin/settings",
            get(handlers::get_settings).put(handlers::save_settings),
        )
        .route("/admin/all-data", get(handlers::all_data))
        .route(
            "/admin/solutions",
            get(handlers::list_solutions).post(handlers::create_solution),
        )
        .route(
            "/admin/solutions/{solution_id}",
            put(handlers::update_solution).delete(handlers::delete_solution),
        )
        .route(
            "/admin/segments",
            get(handlers::list_segments).post(handlers::create_segment),
        )
        .route(
            "/admin/segments/{segment_id}",
            put(handlers::update_segment).delete(handlers::delete_segment),
        )
        .route(
            "/admin/stats",
            get(handlers::list_stats).post(handlers::create_stat),
        )
        .route(
            "/admin/stats/{stat_id}",
            put(handlers::update_stat).delete(handlers::delete_stat),
        )
        .route(
            "/admin/banners",
            get(handlers::list_banners).post(handlers::create_banner),
        )
        .route("/admin/banners/pages", get(handlers::banner_pages))
        .route(
            "/admin/banners/{id}",
            get(handlers::get_banner)
                .put(handlers::update_banner)
                .delete(handlers::delete_banner),
        )
        .route(
            "/admin/solution-pages",
            get(handlers::list_solution_pages).post(handlers::create_solution_page),
        )
        .route(
            "/admin/solution-pages/{slug}",
            put(handlers::update_solution_page).delete(handlers::delete_solution_page),
        )
        .route(
            "/admin/help/categories",
            get(handlers::list_help_categories).post(handlers::create_help_category),
        )
        .route(
            "/admin/help/categories/{id}",
            put(handlers::update_help_category).delete(handlers::delete_help_category),
        )
        .route(
            "/admin/help/articles",
            get(handlers::list_help_articles).post(handlers::create_help_article),
        )
        .route(
            "/admin/help/articles/{id}",
            get(handlers::get_help_article)
                .put(handlers::update_help_article)
                .delete(handlers::delete_help_article),
        )
        .route(
            "/admin/help/articles/{id}/images",
            get(handlers::list_help_images).post(handlers::add_help_image),
        )
        .route(
            "/admin/help/articles/{id}/images/order",
            put(handlers::reorder_help_images),
        )
        .route(
            "/admin/help/images/{id}",
            put(handlers::update_help_image).delete(handlers::delete_help_image),
        )
        .route(
            "/admin/upload",
            post(handlers::upload_file).layer(DefaultBodyLimit::max(upload_body_limit)),
        )
        .route("/auth/me", get(handlers::me))
        .route_layer(axum_middleware::from_fn_with_state(
            auth_state,
            middleware::require_admin,
        ));

    Router::new()
        .route("/auth/login", post(handlers::login))
        .merge(admin)
}
