use crate::SharedAppState;
use axum::extract::State;

pub async fn handler(State(_state): State<SharedAppState>) -> impl axum::response::IntoResponse {
    let template = HomeTemplate {};
    super::html_template::HtmlTemplate(template)
}

#[derive(askama::Template)]
#[template(path = "pages/home.html")]
struct HomeTemplate {}
