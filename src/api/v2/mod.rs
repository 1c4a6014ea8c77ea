//! v2 workflow API endpoints

pub mod steps;
pub mod workflows;

use axum::{
    routing::{get, post, put},
    Router,
};

use super::state::AppState;

/// Create v2 API router
pub fn create_v2_router() -> Router<AppState> {
    Router::new()
        .route(
            "/workflows",
            post(workflows::create_workflow).get(workflows::search_workflows),
        )
        .route(
            "/workflows/{workflow_id}",
            get(workflows::get_workflow)
                .put(workflows::update_workflow)
                .patch(workflows::patch_workflow)
                .delete(workflows::delete_workflow),
        )
        .route("/workflows/{workflow_id}/sync", put(workflows::sync_workflow))
        .route(
            "/workflows/{workflow_id}/steps/{step_id}",
            get(steps::get_step_data).patch(steps::patch_step_data),
        )
        .route(
            "/workflows/{workflow_id}/step/{step_database_id}/preview",
            post(steps::generate_preview),
        )
        .route(
            "/workflows/{workflow_id}/test-data",
            get(workflows::get_test_data),
        )
}
