mod cors;

use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, patch, post, put};
use pagecraft_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, middleware};

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_handler))
        .route(
            "/api/pages/{slug}",
            get(handlers::public::published_page_handler),
        )
        .route(
            "/api/pages/{slug}/view",
            get(handlers::public::published_page_view_handler),
        )
        .route(
            "/api/pages/{slug}/submissions",
            post(handlers::public::submit_lead_handler),
        )
        .route(
            "/api/analytics/track",
            post(handlers::public::track_event_handler),
        )
        .route(
            "/api/suburbs",
            get(handlers::suburbs::list_active_suburbs_handler),
        )
        .route(
            "/api/suburbs/{name}",
            get(handlers::suburbs::suburb_by_name_handler),
        );

    let admin_routes = Router::new()
        .route(
            "/pages",
            get(handlers::pages::list_pages_handler).post(handlers::pages::create_page_handler),
        )
        .route(
            "/pages/{page_id}",
            get(handlers::pages::get_page_handler)
                .put(handlers::pages::update_page_handler)
                .delete(handlers::pages::delete_page_handler),
        )
        .route(
            "/pages/{page_id}/publish",
            post(handlers::pages::publish_page_handler),
        )
        .route(
            "/pages/{page_id}/unpublish",
            post(handlers::pages::unpublish_page_handler),
        )
        .route(
            "/pages/{page_id}/archive",
            post(handlers::pages::archive_page_handler),
        )
        .route(
            "/pages/{page_id}/editor",
            get(handlers::editor::editor_view_handler),
        )
        .route(
            "/pages/{page_id}/document/commands",
            post(handlers::editor::edit_document_handler),
        )
        .route(
            "/preview/{slug}",
            get(handlers::pages::preview_page_handler),
        )
        .route("/blocks", get(handlers::editor::block_catalog_handler))
        .route(
            "/blocks/{block_type}/default",
            get(handlers::editor::default_block_handler),
        )
        .route(
            "/page-templates",
            get(handlers::editor::list_templates_handler),
        )
        .route(
            "/page-templates/seed",
            post(handlers::editor::seed_templates_handler),
        )
        .route(
            "/templates",
            get(handlers::block_templates::list_block_templates_handler)
                .post(handlers::block_templates::create_block_template_handler),
        )
        .route(
            "/templates/seed",
            post(handlers::block_templates::seed_block_templates_handler),
        )
        .route(
            "/suburbs",
            get(handlers::suburbs::list_suburbs_handler)
                .post(handlers::suburbs::create_suburb_handler),
        )
        .route(
            "/suburbs/{suburb_id}",
            put(handlers::suburbs::update_suburb_handler),
        )
        .route("/leads", get(handlers::leads::list_leads_handler))
        .route("/leads/{lead_id}", get(handlers::leads::get_lead_handler))
        .route(
            "/leads/{lead_id}/status",
            patch(handlers::leads::update_lead_status_handler),
        )
        .route(
            "/analytics/{page_id}",
            get(handlers::analytics::analytics_summary_handler),
        )
        .route(
            "/analytics/{page_id}/events",
            get(handlers::analytics::analytics_events_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_admin,
        ));

    Ok(Router::new()
        .merge(public_routes)
        .nest("/api/admin", admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .with_state(app_state))
}

#[cfg(test)]
mod tests;
