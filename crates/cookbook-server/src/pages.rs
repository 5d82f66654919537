use std::path::Path;

use axum::Router;
use tower_http::services::{ServeDir, ServeFile};

/// Route → file under the pages directory.
const PAGES: &[(&str, &str)] = &[
    ("/", "index.html"),
    ("/help", "help.html"),
    ("/recipes", "recipes.html"),
    ("/err", "errors/404.html"),
    ("/login", "auth/login.html"),
    ("/register", "auth/register.html"),
    ("/users", "crud-test/users.html"),
];

/// Static HTML pages and `/static/*` assets. No fallback; the API router
/// owns it.
pub fn routes(pages_dir: &Path, static_dir: &Path) -> Router {
    let router = PAGES.iter().fold(Router::new(), |router, (route, file)| {
        router.route_service(route, ServeFile::new(pages_dir.join(file)))
    });
    router.nest_service("/static", ServeDir::new(static_dir))
}
