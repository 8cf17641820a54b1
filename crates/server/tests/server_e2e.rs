//! End-to-end tests against the router

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use server::{app, AppState, ServerConfig};
use tower::ServiceExt;

const BOUNDARY: &str = "forecast-test-boundary";

fn test_app() -> Router {
    app(AppState::new(ServerConfig::default()))
}

fn daily_csv(rows: usize) -> String {
    let mut csv = String::from("ds,y\n");
    let mut day = chrono::NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
    for i in 0..rows {
        csv.push_str(&format!("{},{}\n", day.format("%Y-%m-%d"), 100.0 + (i % 7) as f64));
        day = day.succ_opt().unwrap();
    }
    csv
}

fn multipart_body(file_name: &str, content: &str) -> String {
    format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         {content}\r\n\
         --{BOUNDARY}--\r\n"
    )
}

fn upload_request(cookie: Option<&str>, file_name: &str, content: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        );
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder
        .body(Body::from(multipart_body(file_name, content)))
        .unwrap()
}

fn form_request(cookie: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/forecast")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::COOKIE, cookie)
        .body(Body::from(form.to_string()))
        .unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn json_request(body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/forecast")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

/// `name=value` part of the Set-Cookie header
fn session_cookie(response: &Response<Body>) -> String {
    response.headers()[header::SET_COOKIE]
        .to_str()
        .unwrap()
        .split(';')
        .next()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = test_app();

    let response = app.clone().oneshot(get("/health/live", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "alive");

    let response = app.clone().oneshot(get("/health", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/health/ready", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"][1]["name"], "model");
}

#[tokio::test]
async fn test_page_flow_upload_forecast_download() {
    let app = test_app();

    let response = app.clone().oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let cookie = session_cookie(&response);
    assert!(cookie.starts_with("forecast_session="));
    let html = body_text(response).await;
    assert!(html.contains("action=\"/upload\""));

    let response = app
        .clone()
        .oneshot(upload_request(Some(&cookie), "sales.csv", &daily_csv(100)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/");
    assert!(response.headers().get(header::SET_COOKIE).is_none());

    let html = body_text(app.clone().oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(html.contains("sales.csv"));
    assert!(html.contains("Showing 50 of 100 rows"));
    assert!(html.contains("<option value=\"ds\" selected>"));

    let response = app
        .clone()
        .oneshot(form_request(&cookie, "date_column=ds&metric_column=y&horizon=30"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let html = body_text(app.clone().oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(!html.contains("class=\"error\""));
    assert!(html.contains("class=\"forecast-table\""));
    assert!(html.contains("<td>2021-04-11</td>"));
    assert!(html.contains("<td>2021-05-10</td>"));
    assert!(html.contains("<svg"));
    assert!(html.contains("download=\"forecast.csv\""));

    let response = app.oneshot(get("/download", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"forecast.csv\""
    );
    let csv = body_text(response).await;
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines[0], "timestamp,predicted,lower,upper");
    assert_eq!(lines.len(), 31);
    assert!(lines[1].starts_with("2021-04-11,"));
    assert!(lines[30].starts_with("2021-05-10,"));
}

#[tokio::test]
async fn test_upload_without_cookie_starts_session() {
    let app = test_app();
    let response = app
        .clone()
        .oneshot(upload_request(None, "data.csv", &daily_csv(10)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let cookie = session_cookie(&response);

    let html = body_text(app.oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(html.contains("data.csv"));
}

#[tokio::test]
async fn test_step_errors_are_shown_inline() {
    let app = test_app();
    let response = app
        .clone()
        .oneshot(upload_request(None, "sales.csv", &daily_csv(20)))
        .await
        .unwrap();
    let cookie = session_cookie(&response);

    app.clone()
        .oneshot(form_request(&cookie, "date_column=ds&metric_column=y&horizon=366"))
        .await
        .unwrap();
    let html = body_text(app.clone().oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(html.contains("data-kind=\"invalid_horizon\""));
    assert!(!html.contains("class=\"forecast-table\""));

    app.clone()
        .oneshot(form_request(&cookie, "date_column=ds&metric_column=sales&horizon=10"))
        .await
        .unwrap();
    let html = body_text(app.clone().oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(html.contains("data-kind=\"schema\""));

    app.clone()
        .oneshot(upload_request(Some(&cookie), "empty.csv", ""))
        .await
        .unwrap();
    let html = body_text(app.oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(html.contains("data-kind=\"ingestion\""));
    // the previous upload is still shown
    assert!(html.contains("sales.csv"));
}

#[tokio::test]
async fn test_failed_selection_hides_previous_forecast() {
    let app = test_app();
    let response = app
        .clone()
        .oneshot(upload_request(None, "sales.csv", &daily_csv(30)))
        .await
        .unwrap();
    let cookie = session_cookie(&response);

    app.clone()
        .oneshot(form_request(&cookie, "date_column=ds&metric_column=y&horizon=10"))
        .await
        .unwrap();
    let response = app.clone().oneshot(get("/download", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    app.clone()
        .oneshot(form_request(&cookie, "date_column=ds&metric_column=sales&horizon=10"))
        .await
        .unwrap();
    let html = body_text(app.clone().oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(html.contains("data-kind=\"schema\""));
    assert!(!html.contains("class=\"forecast-table\""));
    assert!(!html.contains("href=\"/download\""));
    assert!(html.contains("sales.csv"));

    let response = app.oneshot(get("/download", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["kind"], "not_ready");
}

#[tokio::test]
async fn test_malformed_horizon_is_shown_inline() {
    let app = test_app();
    let response = app
        .clone()
        .oneshot(upload_request(None, "sales.csv", &daily_csv(20)))
        .await
        .unwrap();
    let cookie = session_cookie(&response);

    for form in [
        "date_column=ds&metric_column=y&horizon=",
        "date_column=ds&metric_column=y&horizon=abc",
        "date_column=ds&metric_column=y",
    ] {
        let response = app.clone().oneshot(form_request(&cookie, form)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{form}");
        assert_eq!(response.headers()[header::LOCATION], "/");

        let html = body_text(app.clone().oneshot(get("/", Some(&cookie))).await.unwrap()).await;
        assert!(html.contains("data-kind=\"invalid_horizon\""), "{form}");
        assert!(html.contains("whole number of periods"), "{form}");
        assert!(!html.contains("class=\"forecast-table\""), "{form}");
    }

    app.clone()
        .oneshot(form_request(&cookie, "date_column=ds&metric_column=y&horizon=+5"))
        .await
        .unwrap();
    let html = body_text(app.oneshot(get("/", Some(&cookie))).await.unwrap()).await;
    assert!(!html.contains("class=\"error\""));
    assert!(html.contains("class=\"forecast-table\""));
}

#[tokio::test]
async fn test_download_before_forecast() {
    let app = test_app();
    let response = app.clone().oneshot(get("/download", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["kind"], "not_ready");

    let response = app
        .clone()
        .oneshot(upload_request(None, "sales.csv", &daily_csv(20)))
        .await
        .unwrap();
    let cookie = session_cookie(&response);
    let response = app.oneshot(get("/download", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let app = app(AppState::new(
        ServerConfig::default().with_max_upload_bytes(256),
    ));
    let body = multipart_body("big.csv", &daily_csv(100));
    let request = Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(header::CONTENT_LENGTH, body.len())
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_api_forecast() {
    let response = test_app()
        .oneshot(json_request(serde_json::json!({
            "csv": daily_csv(100),
            "horizon": 30
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["frequency"], "daily");
    assert_eq!(json["warnings"].as_array().unwrap().len(), 0);
    assert!(json["renamed"].as_str().unwrap().contains("ds"));
    let forecast = json["forecast"].as_array().unwrap();
    assert_eq!(forecast.len(), 30);
    assert_eq!(forecast[0]["timestamp"], "2021-04-11T00:00:00");
    assert_eq!(forecast[29]["timestamp"], "2021-05-10T00:00:00");
    for row in forecast {
        let lower = row["lower"].as_f64().unwrap();
        let upper = row["upper"].as_f64().unwrap();
        let predicted = row["predicted"].as_f64().unwrap();
        assert!(lower <= predicted && predicted <= upper);
    }
}

#[tokio::test]
async fn test_api_reports_dropped_rows() {
    let csv = "when,amount\n2021-01-01,1\n2021-01-02,oops\n2021-01-03,3\n2021-01-04,4\n";
    let response = test_app()
        .oneshot(json_request(serde_json::json!({
            "csv": csv,
            "date_column": "when",
            "metric_column": "amount",
            "horizon": 2
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let warnings = json["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0]["row"], 2);
    assert_eq!(json["forecast"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_api_errors() {
    let app = test_app();

    let response = app
        .clone()
        .oneshot(json_request(serde_json::json!({
            "csv": daily_csv(20),
            "metric_column": "sales",
            "horizon": 10
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["kind"], "schema");

    let response = app
        .clone()
        .oneshot(json_request(serde_json::json!({
            "csv": daily_csv(20),
            "horizon": 366
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["kind"], "invalid_horizon");
    assert_eq!(json["error"], "Horizon must be between 1 and 365 periods, got 366");

    let response = app
        .clone()
        .oneshot(json_request(serde_json::json!({ "csv": "", "horizon": 5 })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["kind"], "ingestion");

    let response = app
        .clone()
        .oneshot(json_request(serde_json::json!({
            "csv": "ds,y\n2021-01-01,5\n",
            "horizon": 5
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["kind"], "insufficient_data");

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/forecast")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["kind"], "bad_request");
}
