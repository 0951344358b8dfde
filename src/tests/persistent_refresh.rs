
// Background refresher:
//  - start/stop lifecycle, duplicate start is a no-op, stop is idempotent
//  - refreshed tokens are committed for idle sessions
//  - failures reach the error callback and leave the held token alone

#[cfg(test)]
mod test {

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::sleep;

use crate::client::NfieldClient;
use crate::config::settings::{ClientSettings, PersistentRefreshConfig};
use crate::tests::common::{credentials, ScriptedTransport};

#[tokio::test]
async fn refresher_renews_token_until_stopped() {
    let transport = ScriptedTransport::new();
    let client = NfieldClient::with_transport(Default::default(), transport.clone()).unwrap();
    let connected = client.connect(credentials()).await.unwrap();

    assert!(!connected.is_persistent_refresh_running());
    assert!(connected.start_persistent_refresh(Duration::from_millis(40), |_| {}));
    assert!(!connected.start_persistent_refresh(Duration::from_millis(40), |_| {}), "second start is a no-op");
    assert!(connected.is_persistent_refresh_running());

    sleep(Duration::from_millis(150)).await;
    assert!(connected.stop_persistent_refresh());
    assert!(!connected.stop_persistent_refresh(), "stop is idempotent");
    assert!(!connected.is_persistent_refresh_running());

    // let a refresh that was already in progress land
    sleep(Duration::from_millis(20)).await;
    let sign_ins = transport.sign_ins();
    assert!(sign_ins >= 3, "connect plus at least two refreshes, got {sign_ins}");
    assert_eq!(
        connected.token_snapshot().await.bearer_value,
        format!("token-{sign_ins}")
    );

    sleep(Duration::from_millis(100)).await;
    assert_eq!(transport.sign_ins(), sign_ins, "no refresh after stop");
    assert!(transport.payloads().is_empty());
}

#[tokio::test]
async fn refresher_reports_failures_to_callback() {
    let transport = ScriptedTransport::failing_after(1);
    let client = NfieldClient::with_transport(Default::default(), transport.clone()).unwrap();
    let connected = client.connect(credentials()).await.unwrap();

    let errors = Arc::new(Mutex::new(Vec::new()));
    let sink = errors.clone();
    assert!(connected.start_persistent_refresh(Duration::from_millis(30), move |e| {
        sink.lock().unwrap().push(e.to_string());
    }));

    sleep(Duration::from_millis(100)).await;
    connected.stop_persistent_refresh();

    let errors = errors.lock().unwrap().clone();
    assert!(!errors.is_empty());
    assert!(errors.iter().all(|e| e.contains("401") && e.contains("bad credentials")));
    assert_eq!(connected.token_snapshot().await.bearer_value, "token-1");

    let text = connected.metrics().encode().unwrap();
    assert!(text.contains(r#"nfield_sign_in_failures_total{reason="authentication_failed"}"#));
}

#[tokio::test]
async fn settings_can_start_refresher_on_connect() {
    let settings = ClientSettings {
        persistent_refresh: PersistentRefreshConfig {
            enabled: true,
            interval_ms: 60_000,
        },
        ..Default::default()
    };
    let client = NfieldClient::with_transport(settings, ScriptedTransport::new()).unwrap();
    let connected = client.connect(credentials()).await.unwrap();

    assert!(connected.is_persistent_refresh_running());
    assert!(connected.stop_persistent_refresh());
}

#[tokio::test]
async fn zero_interval_is_refused() {
    let client = NfieldClient::with_transport(Default::default(), ScriptedTransport::new()).unwrap();
    let connected = client.connect(credentials()).await.unwrap();

    assert!(!connected.start_persistent_refresh(Duration::ZERO, |_| {}));
    assert!(!connected.is_persistent_refresh_running());
}

}
