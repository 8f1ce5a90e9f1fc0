use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tracing::{error, info};

use crate::figures::ExampleFunction;
use crate::pipeline::DashboardContext;

async fn page(
    State(context): State<Arc<DashboardContext>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let selection = ExampleFunction::from_selection(params.get("example").map(String::as_str));
    match context.dashboard.render(selection) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("failed to render page: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

pub fn build_router(context: Arc<DashboardContext>) -> Router {
    Router::new().route("/", get(page)).with_state(context)
}

/// Serves the page until the process ends. The context must be fully built beforehand.
pub async fn serve(context: Arc<DashboardContext>, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("dashboard listening on http://{addr}");
    axum::serve(listener, build_router(context))
        .await
        .context("server failed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader;
    use crate::pipeline::{self, DashboardContext};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    fn context() -> Arc<DashboardContext> {
        let csv = "Timestamp,Choose your gender,Age,What is your course?,Your current year of Study,What is your CGPA?,Marital status,Do you have Depression?,Do you have Anxiety?,Do you have Panic attack?,Did you seek any specialist for a treatment?\n\
                   8/7/2020 12:02,Female,20,BCS,year 2,3.50-4.00,No,Yes,No,Yes,No\n";
        let prepared = pipeline::prepare(loader::read_table(csv.as_bytes()).unwrap()).unwrap();
        Arc::new(DashboardContext::from_prepared(prepared).unwrap())
    }

    async fn send_raw(addr: SocketAddr, path: &str) -> (u16, String) {
        let mut stream = tokio::net::TcpStream::connect(addr)
            .await
            .expect("connect server");
        let req = format!("GET {path} HTTP/1.1\r\nHost: {addr}\r\nConnection: close\r\n\r\n");
        stream
            .write_all(req.as_bytes())
            .await
            .expect("write request");
        let mut response = String::new();
        stream
            .read_to_string(&mut response)
            .await
            .expect("read response");
        let status = response
            .lines()
            .next()
            .and_then(|line| line.split_whitespace().nth(1))
            .and_then(|s| s.parse::<u16>().ok())
            .expect("status");
        (status, response)
    }

    #[tokio::test]
    async fn serves_the_page_and_the_selected_example() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("local addr");
        let app = build_router(context());
        tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });

        let (status, body) = send_raw(addr, "/").await;
        assert_eq!(status, 200);
        assert!(body.contains("Storytelling: Mental Health in University Students"));
        assert!(body.contains("<option value=\"linear\" selected>"));

        let (status, body) = send_raw(addr, "/?example=quadratic").await;
        assert_eq!(status, 200);
        assert!(body.contains("<option value=\"quadratic\" selected>"));

        let (status, _) = send_raw(addr, "/health").await;
        assert_eq!(status, 404);
    }
}
