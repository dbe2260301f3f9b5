use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use hyper::header::{HeaderValue, ACCESS_CONTROL_REQUEST_HEADERS, ALLOW, CONTENT_TYPE};
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};
use url::Url;

use crate::cors::add_cors_headers;
use crate::error::PageError;
use crate::pages;
use crate::App;

/// The pages this server knows about, with their raw path parameters.
#[derive(Debug, PartialEq)]
pub enum Route {
    Home,
    Heatmap { score_type: String, fire: String },
    Building { pand_id: String, fire: String },
    Export,
}

impl Route {
    /// None for any unknown path. `..` and repeated slashes are resolved first.
    pub fn parse(path: &str) -> Option<Route> {
        let base = Url::parse("http://firemap.invalid/").ok()?;
        // A leading `//` would otherwise be read as a host
        let collapsed = path
            .split('/')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        let url = base.join(&format!("/{}", collapsed)).ok()?;
        let parts: Vec<&str> = url
            .path_segments()?
            .filter(|part| !part.is_empty())
            .collect();
        match parts.as_slice() {
            [] => Some(Route::Home),
            ["export"] => Some(Route::Export),
            ["heatmap", score_type, fire] => Some(Route::Heatmap {
                score_type: score_type.to_string(),
                fire: fire.to_string(),
            }),
            ["building", pand_id, fire] => Some(Route::Building {
                pand_id: pand_id.to_string(),
                fire: fire.to_string(),
            }),
            _ => None,
        }
    }

    fn render(&self, app: &App) -> Result<String, PageError> {
        match self {
            Route::Home => pages::home(app),
            Route::Heatmap { score_type, fire } => {
                let score_type = pages::parse_score_type(score_type)?;
                let fire = pages::parse_fire(fire)?;
                pages::heatmap(app, score_type, fire)
            }
            Route::Building { pand_id, fire } => {
                let fire = pages::parse_fire(fire)?;
                pages::building(app, pand_id, fire)
            }
            Route::Export => pages::export(&app.templates),
        }
    }
}

/// Answers one request. Never fails; problems become error pages.
pub fn handle(app: &App, method: &Method, path: &str) -> Response<Body> {
    let route = match Route::parse(path) {
        Some(route) => route,
        None => {
            return error_response(
                app,
                &PageError::NotFound(format!("There's no page at {}", path)),
            )
        }
    };

    if method == Method::OPTIONS {
        let mut resp = Response::new(Body::empty());
        resp.headers_mut()
            .insert(ALLOW, HeaderValue::from_static("GET, HEAD, OPTIONS"));
        return resp;
    }
    if method != Method::GET && method != Method::HEAD {
        let mut resp = html_response(format!("{} isn't supported here", method));
        *resp.status_mut() = StatusCode::METHOD_NOT_ALLOWED;
        resp.headers_mut()
            .insert(ALLOW, HeaderValue::from_static("GET, HEAD, OPTIONS"));
        return resp;
    }

    match route.render(app) {
        Ok(html) => html_response(html),
        Err(err) => error_response(app, &err),
    }
}

fn html_response(html: String) -> Response<Body> {
    let mut resp = Response::new(Body::from(html));
    resp.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/html; charset=utf-8"),
    );
    resp
}

fn error_response(app: &App, err: &PageError) -> Response<Body> {
    match err {
        PageError::Internal(_) => error!("{}", err),
        _ => warn!("{}", err),
    }
    let mut resp = html_response(pages::error_page(&app.templates, err));
    *resp.status_mut() = err.status();
    resp
}

/// The hyper entry point: routes the request, then adds CORS headers and logs the outcome.
pub async fn serve_req(app: Arc<App>, req: Request<Body>) -> Result<Response<Body>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let request_headers = req.headers().get(ACCESS_CONTROL_REQUEST_HEADERS).cloned();

    // Drawing a page touches every building, so keep it off the async workers
    let handler_app = app.clone();
    let handler_method = method.clone();
    let handler_path = path.clone();
    let mut resp = match tokio::task::spawn_blocking(move || {
        handle(&handler_app, &handler_method, &handler_path)
    })
    .await
    {
        Ok(resp) => resp,
        Err(err) => error_response(
            &app,
            &PageError::Internal(anyhow!("handler for {} panicked: {}", path, err)),
        ),
    };

    add_cors_headers(
        &mut resp,
        &method,
        request_headers.as_ref(),
        &app.cors_origin,
    );
    info!("{} {} -> {}", method, path, resp.status().as_u16());
    Ok(resp)
}

/// Serves forever.
pub async fn serve(app: Arc<App>, addr: SocketAddr) -> Result<()> {
    let make_service = make_service_fn(move |_| {
        let app = app.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |req| serve_req(app.clone(), req)))
        }
    });
    let server = Server::try_bind(&addr)?.serve(make_service);
    info!("Listening on http://{}", addr);
    server.await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes() {
        assert_eq!(Some(Route::Home), Route::parse("/"));
        assert_eq!(Some(Route::Export), Route::parse("/export"));
        assert_eq!(Some(Route::Export), Route::parse("/export/"));
        assert_eq!(
            Some(Route::Heatmap {
                score_type: "roads".to_string(),
                fire: "big".to_string()
            }),
            Route::parse("/heatmap/roads/big")
        );
        assert_eq!(
            Some(Route::Building {
                pand_id: "363100012000001".to_string(),
                fire: "small".to_string()
            }),
            Route::parse("//building/363100012000001/small")
        );
        assert_eq!(Some(Route::Export), Route::parse("/heatmap/../export"));
        assert_eq!(Some(Route::Export), Route::parse("//export"));
        assert_eq!(Some(Route::Home), Route::parse("//"));
        assert_eq!(Some(Route::Home), Route::parse("/export/.."));
        assert_eq!(None, Route::parse("/heatmap/roads"));
        assert_eq!(None, Route::parse("/building/1/small/extra"));
        assert_eq!(None, Route::parse("/static/plot.js"));
    }
}
