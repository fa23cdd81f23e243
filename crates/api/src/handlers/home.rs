use axum::{extract::State, response::Html};

use crate::AppState;

pub async fn home(State(state): State<AppState>) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Auth template</title></head>\n<body>\n\
         <h1>Auth template</h1>\n<p>Running in {} mode, version {}.</p>\n\
         <p>The API lives under <code>/api/v1</code>.</p>\n</body>\n</html>\n",
        state.settings.mode, state.settings.app_version
    ))
}
