use super::common;

use common::test_server::TestServer;
use formsmith::config::RateLimitConfig;
use serde_json::{json, Value};

async fn create_form(client: &reqwest::Client, server: &TestServer) -> String {
    let response = client
        .post(server.url("/api/forms"))
        .json(&json!({ "prompt": "a contact form" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.unwrap();
    body["data"]["form_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_browser_flow() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/generate-form"))
        .form(&[("prompt", "a contact form")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let html = response.text().await.unwrap();
    assert!(html.contains("Form Generated Successfully"));
    assert!(html.contains("preview-form"));

    let listed: Value = client
        .get(server.url("/api/forms"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let form_id = listed["data"][0]["form_id"].as_str().unwrap().to_string();
    assert!(html.contains(&format!("/share/{}", form_id)));

    let share = client
        .get(server.url(&format!("/share/{}", form_id)))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(share.contains(&format!("action=\"/submit/{}\"", form_id)));

    for (name, age, topic) in [("Ann", "30", "sales"), ("Bob", "40", "sales")] {
        let response = client
            .post(server.url(&format!("/submit/{}", form_id)))
            .form(&[("name", name), ("age", age), ("topic", topic)])
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let page = response.text().await.unwrap();
        assert!(page.contains("Form Submitted Successfully"));
        assert!(page.contains(&format!("name: {}", name)));
    }

    let analytics = client
        .get(server.url(&format!("/analytics/{}", form_id)))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(analytics.contains("Analytics for Contact"));
    assert!(analytics.contains("Total Responses: 2"));
    assert!(analytics.contains("Average: 35"));
    assert!(analytics.contains("sales: 2"));
    assert!(analytics.contains("support: 0"));

    let home = client.get(server.url("/")).send().await.unwrap().text().await.unwrap();
    assert!(home.contains(&format!("/analytics/{}", form_id)));
}

#[tokio::test]
async fn test_unknown_form_pages_are_not_found() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    for path in ["/share/missing", "/analytics/missing"] {
        let response = client.get(server.url(path)).send().await.unwrap();
        assert_eq!(response.status(), 404);
        assert!(response.text().await.unwrap().contains("Form not found"));
    }

    let response = client
        .post(server.url("/submit/missing"))
        .form(&[("name", "x")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_empty_prompt_page() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();

    let response = client
        .post(server.url("/generate-form"))
        .form(&[("prompt", "  ")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    assert!(response
        .text()
        .await
        .unwrap()
        .contains("Error generating form. Please try again."));
}

#[tokio::test]
async fn test_api_responses_and_analytics() {
    let server = TestServer::new().await;
    let client = reqwest::Client::new();
    let form_id = create_form(&client, &server).await;

    let response = client
        .post(server.url(&format!("/api/forms/{}/responses", form_id)))
        .json(&json!({ "name": "Ann", "age": "10", "topic": "support" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 201);
    let created: Value = response.json().await.unwrap();
    assert_eq!(created["data"]["form_id"], form_id.as_str());

    client
        .post(server.url(&format!("/api/forms/{}/responses", form_id)))
        .json(&json!({ "name": "Bob", "age": "", "topic": "other" }))
        .send()
        .await
        .unwrap();

    let responses: Value = client
        .get(server.url(&format!("/api/forms/{}/responses", form_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(responses["data"].as_array().unwrap().len(), 2);

    let report: Value = client
        .get(server.url(&format!("/api/forms/{}/analytics", form_id)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let fields = &report["data"]["fields"];
    assert_eq!(report["data"]["total_responses"], 2);
    assert_eq!(fields[0]["summary"]["values"], json!(["Ann", "Bob"]));
    assert_eq!(fields[1]["summary"]["kind"], "statistics");
    assert_eq!(fields[1]["summary"]["average"], 10.0);
    assert_eq!(fields[2]["summary"]["counts"][1]["count"], 1);
}

#[tokio::test]
async fn test_generation_is_rate_limited() {
    let server = TestServer::with_rate_limit(Some(RateLimitConfig {
        enabled: true,
        requests_per_second: 1,
        burst_size: 1,
    }))
    .await;
    let client = reqwest::Client::new();

    create_form(&client, &server).await;

    let limited = client
        .post(server.url("/api/forms"))
        .json(&json!({ "prompt": "another" }))
        .send()
        .await
        .unwrap();
    assert_eq!(limited.status(), 429);

    // Reads are not limited
    let listed = client.get(server.url("/api/forms")).send().await.unwrap();
    assert_eq!(listed.status(), 200);
}
