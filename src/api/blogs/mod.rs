//! Blog administration endpoints

use axum::{extract::State, http::StatusCode, routing::get, Router};
use serde::{Deserialize, Serialize};

use crate::api::middleware::RequireSession;
use crate::api::state::AppState;
use crate::api::types::{ApiError, Json};
use crate::domain::TenantBlog;

/// Create the blog administration router
pub fn create_blogs_router() -> Router<AppState> {
    Router::new().route("/admin", get(list_blogs).post(create_blog))
}

/// Blogs owned by the logged-in user
#[derive(Debug, Serialize)]
pub struct AdminResponse {
    pub user: String,
    pub blogs: Vec<TenantBlog>,
}

#[derive(Debug, Deserialize)]
pub struct CreateBlogRequest {
    pub blogname: String,
}

/// GET /admin
pub async fn list_blogs(
    State(state): State<AppState>,
    session: RequireSession,
) -> Result<Json<AdminResponse>, ApiError> {
    let blogs = state.orchestrator.blogs_of(&session.identity)?;

    Ok(Json(AdminResponse {
        user: session.identity.into(),
        blogs,
    }))
}

/// POST /admin
pub async fn create_blog(
    State(state): State<AppState>,
    session: RequireSession,
    Json(request): Json<CreateBlogRequest>,
) -> Result<(StatusCode, Json<TenantBlog>), ApiError> {
    let blog = state
        .orchestrator
        .create_blog(session.identity.as_str(), &request.blogname)
        .await?;

    Ok((StatusCode::CREATED, Json(blog)))
}
