
// Token lifecycle against an in-memory transport:
//  - a fresh token costs exactly one network call per operation
//  - a stale token is replaced by one sign-in before the payload goes out
//  - a rejected refresh aborts the call and keeps the previous token
//  - concurrent callers on a stale token share a single sign-in, in memory
//    and over HTTP against a slow sign-in endpoint

#[cfg(test)]
mod test {

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Path;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::future::join_all;
use http::{HeaderMap, Method};
use serde_json::json;
use tokio::time::sleep;

use crate::client::NfieldClient;
use crate::config::settings::ClientSettings;
use crate::error::NfieldError;
use crate::operations::{GET_SURVEY_SETTINGS, REMOVE_SURVEYS};
use crate::records::{RemoveSurveys, StopSurveyFieldwork};
use crate::tests::common::{credentials, settings_with_window, spawn_axum, ScriptedTransport};

#[tokio::test]
async fn fresh_token_sends_only_the_payload() {
    let transport = ScriptedTransport::new();
    let client = NfieldClient::with_transport(Default::default(), transport.clone()).unwrap();
    let connected = client.connect(credentials()).await.unwrap();
    assert_eq!(transport.sign_ins(), 1);

    let response = connected.survey_fieldwork().stop("12345").await.unwrap();

    assert_eq!(transport.sign_ins(), 1, "no extra sign-in for a fresh token");
    let payloads = transport.payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(payloads[0].method, Method::PUT);
    assert_eq!(payloads[0].path, "v1/Surveys/12345/Fieldwork/Stop");
    assert_eq!(
        payloads[0].headers.get("authorization").unwrap().to_str().unwrap(),
        "Basic token-1"
    );
    assert_eq!(
        response.body["body"],
        json!({"SurveyId": "12345", "TerminateRunningInterviews": ""})
    );
}

#[tokio::test]
async fn stale_token_is_refreshed_before_the_payload() {
    let transport = ScriptedTransport::new();
    let client = NfieldClient::with_transport(settings_with_window(1), transport.clone()).unwrap();
    let connected = client.connect(credentials()).await.unwrap();
    sleep(Duration::from_millis(10)).await;

    connected.call(&GET_SURVEY_SETTINGS, json!("s-1")).await.unwrap();

    assert_eq!(transport.sign_ins(), 2);
    let payloads = transport.payloads();
    assert_eq!(payloads.len(), 1);
    assert_eq!(
        payloads[0].headers.get("authorization").unwrap().to_str().unwrap(),
        "Basic token-2"
    );
    assert_eq!(connected.token_snapshot().await.bearer_value, "token-2");
}

#[tokio::test]
async fn rejected_refresh_aborts_and_keeps_old_token() {
    let transport = ScriptedTransport::failing_after(1);
    let client = NfieldClient::with_transport(settings_with_window(1), transport.clone()).unwrap();
    let connected = client.connect(credentials()).await.unwrap();
    sleep(Duration::from_millis(10)).await;

    let err = connected
        .execute(&StopSurveyFieldwork {
            survey_id: "12345".into(),
            terminate_running_interviews: None,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, NfieldError::AuthenticationFailed { status: 401, .. }));
    assert!(err.to_string().contains("bad credentials"));
    assert!(transport.payloads().is_empty(), "payload must not be sent");
    assert_eq!(connected.token_snapshot().await.bearer_value, "token-1");
}

#[tokio::test]
async fn invalid_parameters_never_reach_the_network() {
    let transport = ScriptedTransport::new();
    let client = NfieldClient::with_transport(Default::default(), transport.clone()).unwrap();
    let connected = client.connect(credentials()).await.unwrap();

    let err = connected.execute(&RemoveSurveys::default()).await.unwrap_err();
    assert!(matches!(err, NfieldError::MissingParameter { ref name, .. } if name == "SurveyId"));

    let err = connected.call(&REMOVE_SURVEYS, json!([1, 2])).await.unwrap_err();
    assert!(matches!(err, NfieldError::MissingParameter { ref name, .. } if name == "requestParams"));

    assert!(transport.payloads().is_empty());
    assert_eq!(transport.sign_ins(), 1);

    let text = connected.metrics().encode().unwrap();
    assert!(text.contains(r#"nfield_normalization_failures_total{schema="RemoveSurveys"} 2"#));
}

#[tokio::test]
async fn empty_credentials_are_rejected_before_sign_in() {
    let transport = ScriptedTransport::new();
    let client = NfieldClient::with_transport(Default::default(), transport.clone()).unwrap();

    let err = client
        .connect(crate::auth::Credentials::new("acme", "", "hunter2"))
        .await
        .unwrap_err();

    assert!(matches!(err, NfieldError::MissingParameter { ref name, .. } if name == "Username"));
    assert_eq!(transport.sign_ins(), 0);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_calls_on_stale_token_share_one_sign_in() {
    let transport = ScriptedTransport::with_sign_in_delay(Duration::from_millis(100));
    let client = NfieldClient::with_transport(settings_with_window(300), transport.clone()).unwrap();
    let connected = client.connect(credentials()).await.unwrap();
    sleep(Duration::from_millis(350)).await;

    let calls = (0..10).map(|i| connected.call(&GET_SURVEY_SETTINGS, json!(format!("s-{i}"))));
    let results = join_all(calls).await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(transport.sign_ins(), 2, "connect plus one shared refresh");
    let payloads = transport.payloads();
    assert_eq!(payloads.len(), 10);
    assert!(payloads.iter().all(|request| {
        request.headers.get("authorization").unwrap().to_str().unwrap() == "Basic token-2"
    }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_http_calls_wait_for_one_slow_sign_in() {
    let sign_ins = Arc::new(AtomicUsize::new(0));
    let counter = sign_ins.clone();
    let router = Router::new()
        .route("/v1/SignIn", post(move || {
            let c = counter.clone();
            async move {
                let n = c.fetch_add(1, Ordering::SeqCst) + 1;
                sleep(Duration::from_millis(100)).await;
                Json(json!({"AuthenticationToken": format!("tok-{n}")}))
            }
        }))
        .route("/v1/Surveys/{survey_id}/Settings", get(|Path(survey_id): Path<String>, headers: HeaderMap| async move {
            let authorization = headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_owned();
            Json(json!({"SurveyId": survey_id, "Authorization": authorization}))
        }));
    let (server, addr) = spawn_axum(router).await;

    let client = NfieldClient::with_settings(ClientSettings {
        base_url: format!("http://{addr}"),
        refresh_window_ms: 300,
        ..Default::default()
    })
    .unwrap();
    let connected = client.connect(credentials()).await.unwrap();
    sleep(Duration::from_millis(350)).await;

    let calls = (0..8).map(|i| connected.call(&GET_SURVEY_SETTINGS, json!(format!("s-{i}"))));
    let responses = join_all(calls).await;

    assert_eq!(sign_ins.load(Ordering::SeqCst), 2);
    for (i, response) in responses.into_iter().enumerate() {
        let response = response.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body["SurveyId"], json!(format!("s-{i}")));
        assert_eq!(response.body["Authorization"], json!("Basic tok-2"));
    }

    server.abort();
}

}
