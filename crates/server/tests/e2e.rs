use models::db::driver::mock::ScriptedDriver;
use models::db::{ResultCursor, ResultSet, SqlValue};
use reqwest::StatusCode;
use serde_json::{json, Value};
use service::countries::source::mock::{rest_country, StaticCountrySource};
use tokio::net::TcpListener;

mod support;
use support::{build_app, TestApp, ADMIN_EMAIL, ADMIN_PASSWORD};

struct Running {
    base_url: String,
    client: reqwest::Client,
    token: String,
}

async fn start(app: TestApp) -> Running {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app.router).await;
    });
    let base_url = format!("http://{addr}");
    let client = reqwest::Client::new();
    let login: Value = client
        .post(format!("{base_url}/api/Authentication/login"))
        .json(&json!({"email": ADMIN_EMAIL, "password": ADMIN_PASSWORD}))
        .send()
        .await
        .expect("login")
        .json()
        .await
        .expect("login json");
    let token = login["data"]["token"].as_str().expect("token").to_string();
    Running { base_url, client, token }
}

impl Running {
    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let res = self.client.get(format!("{}{path}", self.base_url)).bearer_auth(&self.token).send().await.expect("get");
        (res.status(), res.json().await.expect("json"))
    }

    async fn send(&self, method: reqwest::Method, path: &str, body: Value) -> (StatusCode, Value) {
        let res = self
            .client
            .request(method, format!("{}{path}", self.base_url))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await
            .expect("send");
        (res.status(), res.json().await.expect("json"))
    }
}

fn command_row(message: &str, ok: bool) -> ResultCursor {
    ResultCursor::single(ResultSet::new(["Result", "IsSuccess"]).row([SqlValue::Text(message.into()), SqlValue::Bool(ok)]))
}

fn countries() -> StaticCountrySource {
    let all = vec![
        rest_country("COL", "Colombia", "Americas", 50_000_000, &["Spanish"]),
        rest_country("PER", "Peru", "Americas", 33_000_000, &["Spanish", "Quechua"]),
        rest_country("IND", "India", "Asia", 1_400_000_000, &["Hindi", "English"]),
        rest_country("FRA", "France", "Europe", 68_000_000, &["French"]),
    ];
    StaticCountrySource::new().with("all", Ok(all))
}

#[tokio::test]
async fn provider_listing_carries_rows_and_total() {
    let driver = ScriptedDriver::new().with_cursor(
        "dbo.sp_GetProvidersPaged",
        ResultCursor::new(vec![
            ResultSet::new(["ProviderId", "Nit", "ProviderName", "Email", "CustomFields", "CreatedAt", "UpdatedAt", "TotalServices"])
                .row([
                    SqlValue::Int(7),
                    SqlValue::Text("900123".into()),
                    SqlValue::Text("Acme".into()),
                    SqlValue::Text("ops@acme.co".into()),
                    SqlValue::Text("[]".into()),
                    SqlValue::Text("2024-03-01T10:00:00".into()),
                    SqlValue::Null,
                    SqlValue::Int(2),
                ]),
            ResultSet::new(["TotalRecords"]).row([SqlValue::Int(41)]),
        ]),
    );
    let app = build_app(driver, countries());
    let scripted = app.driver.clone();
    let running = start(app).await;

    let (status, body) = running.get("/api/Providers/paged?searchTerm=acme&pageSize=5&pageNumber=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isSuccess"], true);
    assert_eq!(body["data"]["totalRecords"], 41);
    assert_eq!(body["data"]["results"][0]["providerName"], "Acme");

    let call = scripted.last_call().expect("call");
    assert_eq!(call.param("@SearchTerm").map(|p| p.value.clone()), Some(SqlValue::Text("acme".into())));
    assert_eq!(call.param("@SortBy").map(|p| p.value.clone()), Some(SqlValue::Text("ProviderName".into())));
}

#[tokio::test]
async fn service_update_takes_the_id_from_the_route() {
    let driver = ScriptedDriver::new().with_cursor("dbo.sp_UpdateService", command_row("Service updated.", true));
    let app = build_app(driver, countries());
    let scripted = app.driver.clone();
    let running = start(app).await;

    let (status, body) = running
        .send(reqwest::Method::PUT, "/api/Services/12", json!({"serviceId": 99, "hourlyRateUSD": 120.5}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"isSuccess": true, "message": "Service updated.", "data": null}));

    let call = scripted.last_call().expect("call");
    assert_eq!(call.param("@ServiceId").map(|p| p.value.clone()), Some(SqlValue::Int(12)));
    assert_eq!(call.param("@HourlyRateUSD").map(|p| p.value.clone()), Some(SqlValue::Float(120.5)));
}

#[tokio::test]
async fn routine_verdicts_pass_through_unchanged() {
    let driver = ScriptedDriver::new()
        .with_cursor("dbo.sp_CreateProvider", command_row("A provider with that NIT already exists.", false))
        .with_cursor("dbo.sp_AssignServiceToProvider", command_row("Service assigned.", true));
    let running = start(build_app(driver, countries())).await;

    let (status, body) = running
        .send(reqwest::Method::POST, "/api/Providers", json!({"nit": "1", "providerName": "Dup", "email": "d@x.co"}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isSuccess"], false);
    assert_eq!(body["message"], "A provider with that NIT already exists.");

    let (_, body) = running
        .send(
            reqwest::Method::POST,
            "/api/ProviderServices/assign",
            json!({"providerId": 1, "serviceId": 2, "countryCodes": "[\"COL\",\"PER\"]"}),
        )
        .await;
    assert_eq!(body["isSuccess"], true);
}

#[tokio::test]
async fn dashboard_summary_is_decoded() {
    let raw = r#"{"TotalProviders":3,"TotalServices":5,"ProvidersByCountry":[{"Country":"COL","TotalProviders":2}],"ServicesByCountry":[]}"#;
    let driver = ScriptedDriver::new()
        .with_cursor("dbo.sp_ResumenDashboard", ResultCursor::single(ResultSet::new(["Json"]).row([SqlValue::Text(raw.into())])));
    let running = start(build_app(driver, countries())).await;

    let (status, body) = running.get("/api/Dashboard/summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isSuccess"], true);
    assert_eq!(body["message"], "Summary retrieved successfully");
    assert_eq!(body["data"]["totalProviders"], 3);
    assert_eq!(body["data"]["providersByCountry"][0]["country"], "COL");
}

#[tokio::test]
async fn country_catalog_pages_from_one_cached_fetch() {
    let app = build_app(ScriptedDriver::new(), countries());
    let source = app.countries.clone();
    let running = start(app).await;

    let (status, body) = running.get("/api/Countries/paged?region=Americas&language=spanish&sortBy=population&ascending=false").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalCount"], 2);
    assert_eq!(body["data"]["items"][0]["code"], "COL");
    assert_eq!(body["data"]["items"][1]["code"], "PER");

    let (_, body) = running.get("/api/Countries/regions").await;
    assert_eq!(body["data"], json!(["Americas", "Asia", "Europe"]));
    assert_eq!(body["message"], "3 regions available");

    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn unknown_country_code_is_a_failed_envelope() {
    let running = start(build_app(ScriptedDriver::new(), countries())).await;
    let (status, body) = running.get("/api/Countries/zzz").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isSuccess"], false);
    assert_eq!(body["data"], Value::Null);
}
