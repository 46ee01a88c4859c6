//! Router-level tests driven through `tower::ServiceExt::oneshot`

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use egresados::{auth, router, AppConfig, AppState, Database};
use pretty_assertions::assert_eq;
use tower::ServiceExt;

const VALID_RECORD: &str = "matricula=20190042&nombre_completo=Ana+Ruiz&carrera=Medicina\
                            &generacion=2019-2023&estatus=Titulado&telefono=5512345678&email=";

async fn app() -> (Router, AppState) {
    let db = Database::init("sqlite::memory:").await.unwrap();
    auth::ensure_admin(&db).await.unwrap();
    let state = AppState::new(db, AppConfig::default());
    (router(state.clone()), state)
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// GET `uri` with the session cookie and return the body
async fn page(app: &Router, uri: &str, cookie: &str) -> String {
    body_text(app.clone().oneshot(get(uri, Some(cookie))).await.unwrap()).await
}

fn location(response: &Response) -> &str {
    response.headers().get(header::LOCATION).unwrap().to_str().unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_form(uri: &str, cookie: Option<&str>, body: &str) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Log in as the default admin, returning the `name=value` cookie pair
async fn login(app: &Router) -> String {
    let response = app
        .clone()
        .oneshot(post_form("/login", None, "username=admin&password=admin123"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");

    let set_cookie = response.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    set_cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn test_protected_pages_redirect_to_login() {
    let (app, _) = app().await;

    for uri in ["/dashboard", "/formularios", "/egresados/nuevo", "/exportar", "/api/egresados"] {
        let response = app.clone().oneshot(get(uri, None)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
        assert_eq!(location(&response), "/login");
    }
}

#[tokio::test]
async fn test_failed_login_rerenders_form() {
    let (app, _) = app().await;

    let response = app
        .clone()
        .oneshot(post_form("/login", None, "username=admin&password=nope"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    let body = body_text(response).await;
    assert!(body.contains("Invalid credentials."));
    assert!(body.contains(r#"value="admin""#));
}

#[tokio::test]
async fn test_login_flash_shows_once() {
    let (app, _) = app().await;
    let cookie = login(&app).await;

    let first = page(&app, "/dashboard", &cookie).await;
    assert!(first.contains("Logged in successfully."));

    let second = page(&app, "/dashboard", &cookie).await;
    assert!(!second.contains("Logged in successfully."));
}

#[tokio::test]
async fn test_logout_ends_session() {
    let (app, _) = app().await;
    let cookie = login(&app).await;

    let response = app.clone().oneshot(get("/logout", Some(&cookie))).await.unwrap();
    assert_eq!(location(&response), "/");

    let response = app.clone().oneshot(get("/dashboard", Some(&cookie))).await.unwrap();
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn test_create_record_and_list_it() {
    let (app, state) = app().await;
    let cookie = login(&app).await;

    let response = app
        .clone()
        .oneshot(post_form("/egresados", Some(&cookie), VALID_RECORD))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/dashboard");

    let stored = state.db.get_egresado("20190042").await.unwrap().unwrap();
    assert_eq!(stored.nombre_completo, "Ana Ruiz");
    assert_eq!(stored.email, None);

    let body = page(&app, "/dashboard", &cookie).await;
    assert!(body.contains("Record 20190042 saved."));
    assert!(body.contains(r#"data-matricula="20190042""#));
    assert!(body.contains("badge bg-success"));
}

#[tokio::test]
async fn test_create_rejects_short_matricula() {
    let (app, state) = app().await;
    let cookie = login(&app).await;

    let body = VALID_RECORD.replace("matricula=20190042", "matricula=201900");
    let response = app
        .clone()
        .oneshot(post_form("/egresados", Some(&cookie), &body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response).await;
    assert!(html.contains(r#"data-for="matricula">need 2 more digits"#));
    assert!(html.contains(r#"value="Ana Ruiz""#));
    assert_eq!(state.db.count_egresados().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_rejects_duplicate() {
    let (app, _) = app().await;
    let cookie = login(&app).await;

    app.clone()
        .oneshot(post_form("/egresados", Some(&cookie), VALID_RECORD))
        .await
        .unwrap();
    let response = app
        .clone()
        .oneshot(post_form("/egresados", Some(&cookie), VALID_RECORD))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body_text(response).await.contains("is already registered"));
}

#[tokio::test]
async fn test_unified_form_accepts_long_matricula_and_upserts() {
    let (app, state) = app().await;
    let cookie = login(&app).await;

    let body = VALID_RECORD.replace("matricula=20190042", "matricula=123456789012");
    let response = app
        .clone()
        .oneshot(post_form("/formularios", Some(&cookie), &body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let updated = body.replace("estatus=Titulado", "estatus=Egresado");
    app.clone()
        .oneshot(post_form("/formularios", Some(&cookie), &updated))
        .await
        .unwrap();

    let stored = state.db.get_egresado("123456789012").await.unwrap().unwrap();
    assert_eq!(stored.estatus, "Egresado");
    assert_eq!(state.db.count_egresados().await.unwrap(), 1);
}

#[tokio::test]
async fn test_edit_and_delete() {
    let (app, state) = app().await;
    let cookie = login(&app).await;

    app.clone()
        .oneshot(post_form("/egresados", Some(&cookie), VALID_RECORD))
        .await
        .unwrap();

    let form = page(&app, "/editar/20190042", &cookie).await;
    assert!(form.contains(r#"value="Ana Ruiz""#));
    assert!(form.contains("readonly"));

    let edited = VALID_RECORD.replace("carrera=Medicina", "carrera=Enfermeria");
    let response = app
        .clone()
        .oneshot(post_form("/editar/20190042", Some(&cookie), &edited))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        state.db.get_egresado("20190042").await.unwrap().unwrap().carrera,
        "Enfermeria"
    );

    let response = app
        .clone()
        .oneshot(post_form("/eliminar/20190042", Some(&cookie), ""))
        .await
        .unwrap();
    assert_eq!(location(&response), "/dashboard");
    assert_eq!(state.db.get_egresado("20190042").await.unwrap(), None);

    let body = page(&app, "/dashboard", &cookie).await;
    assert!(body.contains("Record 20190042 deleted."));
}

#[tokio::test]
async fn test_edit_cannot_change_matricula() {
    let (app, _) = app().await;
    let cookie = login(&app).await;

    app.clone()
        .oneshot(post_form("/egresados", Some(&cookie), VALID_RECORD))
        .await
        .unwrap();

    let moved = VALID_RECORD.replace("matricula=20190042", "matricula=20190043");
    let response = app
        .clone()
        .oneshot(post_form("/editar/20190042", Some(&cookie), &moved))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_record() {
    let (app, _) = app().await;
    let cookie = login(&app).await;

    let response = app.clone().oneshot(get("/editar/99999999", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    app.clone()
        .oneshot(post_form("/eliminar/99999999", Some(&cookie), ""))
        .await
        .unwrap();
    let body = page(&app, "/dashboard", &cookie).await;
    assert!(body.contains("No record with matrícula 99999999."));
}

#[tokio::test]
async fn test_dashboard_search() {
    let (app, _) = app().await;
    let cookie = login(&app).await;

    app.clone()
        .oneshot(post_form("/egresados", Some(&cookie), VALID_RECORD))
        .await
        .unwrap();
    let other = VALID_RECORD
        .replace("matricula=20190042", "matricula=20180077")
        .replace("Ana+Ruiz", "Juan+Lopez");
    app.clone()
        .oneshot(post_form("/egresados", Some(&cookie), &other))
        .await
        .unwrap();

    let body = page(&app, "/dashboard?q=juan", &cookie).await;
    assert!(body.contains(r#"data-matricula="20180077""#));
    assert!(!body.contains(r#"data-matricula="20190042""#));

    let body = page(&app, "/dashboard?q=_", &cookie).await;
    assert!(!body.contains("data-matricula="));
}

#[tokio::test]
async fn test_export_csv() {
    let (app, _) = app().await;
    let cookie = login(&app).await;

    app.clone()
        .oneshot(post_form("/egresados", Some(&cookie), VALID_RECORD))
        .await
        .unwrap();

    let response = app.clone().oneshot(get("/exportar", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .unwrap()
        .to_str()
        .unwrap()
        .contains("egresados.csv"));

    let csv = body_text(response).await;
    let mut lines = csv.lines();
    assert_eq!(
        lines.next(),
        Some("matricula,nombre_completo,carrera,generacion,estatus,domicilio,genero,telefono,email")
    );
    assert_eq!(
        lines.next(),
        Some("20190042,Ana Ruiz,Medicina,2019-2023,Titulado,,,5512345678,")
    );
}

#[tokio::test]
async fn test_json_api() {
    let (app, _) = app().await;
    let cookie = login(&app).await;

    let create = |body: &str| {
        Request::builder()
            .method("POST")
            .uri("/api/egresados")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::COOKIE, cookie.as_str())
            .body(Body::from(body.to_string()))
            .unwrap()
    };

    let record = r#"{"matricula":"20190042","nombre_completo":"Ana Ruiz","carrera":"Medicina",
                     "generacion":"2019-2023","estatus":"Egresado"}"#;

    let response = app.clone().oneshot(create(record)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.clone().oneshot(create(record)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(create(r#"{"matricula":"12ab","nombre_completo":""}"#))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let errors: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(errors["errors"]["matricula"], "digits only");
    assert_eq!(errors["errors"]["nombre_completo"], "this field is required");

    let response = app.clone().oneshot(get("/api/egresados", Some(&cookie))).await.unwrap();
    let list: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
    assert_eq!(list[0]["matricula"], "20190042");
    assert_eq!(list[0]["nombre"], "Ana Ruiz");
}

#[tokio::test]
async fn test_init_is_idempotent() {
    let db = Database::init("sqlite::memory:").await.unwrap();
    let app = router(AppState::new(db, AppConfig::default()));

    let first = body_text(app.clone().oneshot(get("/init", None)).await.unwrap()).await;
    assert!(first.starts_with("Database initialized."));

    let second = body_text(app.clone().oneshot(get("/init", None)).await.unwrap()).await;
    assert_eq!(second, "Database already initialized");
}

#[tokio::test]
async fn test_home_is_public() {
    let (app, _) = app().await;
    let response = app.oneshot(get("/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("Control de Egresados"));
}
