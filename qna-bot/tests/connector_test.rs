//! Connector client tests against a mockito server standing in for the channel service and
//! the token endpoint.

use mockito::{Matcher, Server};
use serde_json::json;

use bot_core::{Activity, ActivityType, Bot, ChannelAccount, ConversationAccount};
use qna_bot::{AppCredentials, ConnectorClient};

fn reply(service_url: &str, channel_id: &str) -> Activity {
    Activity {
        service_url: Some(service_url.to_string()),
        channel_id: Some(channel_id.to_string()),
        from: Some(ChannelAccount::new("bot-1")),
        recipient: Some(ChannelAccount::new("user-1")),
        conversation: Some(ConversationAccount::new("conv-1")),
        reply_to_id: Some("in-1".to_string()),
        ..Activity::message("hello")
    }
}

/// **Test: Reply URLs target the conversation's activities and append the reply-to id.**
#[test]
fn test_activities_url() {
    let activity = reply("https://smba.example.com/amer/", "msteams");
    let url = ConnectorClient::activities_url(&activity).unwrap();
    assert_eq!(
        url.as_str(),
        "https://smba.example.com/amer/v3/conversations/conv-1/activities/in-1"
    );

    let mut no_reply = reply("http://localhost:5000", "emulator");
    no_reply.reply_to_id = None;
    let url = ConnectorClient::activities_url(&no_reply).unwrap();
    assert_eq!(
        url.as_str(),
        "http://localhost:5000/v3/conversations/conv-1/activities"
    );
}

/// **Test: Missing service url or conversation fails before any request.**
#[test]
fn test_activities_url_requires_addressing() {
    let mut activity = reply("http://localhost:5000", "emulator");
    activity.service_url = None;
    assert!(ConnectorClient::activities_url(&activity).is_err());

    let mut activity = reply("http://localhost:5000", "emulator");
    activity.conversation = None;
    assert!(ConnectorClient::activities_url(&activity).is_err());
}

/// **Test: Without credentials the activity is posted unauthenticated as camelCase JSON.**
#[tokio::test]
async fn test_send_without_credentials() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v3/conversations/conv-1/activities/in-1")
        .match_header("authorization", Matcher::Missing)
        .match_body(Matcher::PartialJson(json!({
            "type": "message",
            "text": "hello",
            "replyToId": "in-1",
            "recipient": {"id": "user-1"}
        })))
        .with_status(200)
        .with_body(r#"{"id":"out-1"}"#)
        .create_async()
        .await;

    let client = ConnectorClient::new(None);
    let response = client
        .send_activity(&reply(&server.url(), "emulator"))
        .await
        .unwrap();

    assert_eq!(response.id, "out-1");
    mock.assert_async().await;
}

/// **Test: Trace activities are delivered on the emulator channel only.**
#[tokio::test]
async fn test_trace_only_sent_to_emulator() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/v3/conversations/conv-1/activities/in-1")
        .match_body(Matcher::PartialJson(json!({"type": "trace"})))
        .with_status(200)
        .with_body("{}")
        .expect(1)
        .create_async()
        .await;

    let client = ConnectorClient::new(None);

    let mut emulator_trace = reply(&server.url(), "emulator");
    emulator_trace.activity_type = ActivityType::Trace;
    client.send_activity(&emulator_trace).await.unwrap();

    let mut teams_trace = reply(&server.url(), "msteams");
    teams_trace.activity_type = ActivityType::Trace;
    let response = client.send_activity(&teams_trace).await.unwrap();
    assert!(response.id.is_empty());

    mock.assert_async().await;
}

/// **Test: With credentials a token is fetched once and reused as a bearer token.**
///
/// **Setup:** Token endpoint returning a one-hour token; activities endpoint requiring it.
///
/// **Action:** Send two activities.
///
/// **Expected:** One token request with the client-credentials form; two authorized posts.
#[tokio::test]
async fn test_send_with_credentials_caches_token() {
    let mut server = Server::new_async().await;
    let token_mock = server
        .mock("POST", "/token")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("grant_type".into(), "client_credentials".into()),
            Matcher::UrlEncoded("client_id".into(), "app-id".into()),
            Matcher::UrlEncoded("client_secret".into(), "app-secret".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"token_type":"Bearer","expires_in":3600,"access_token":"token-123"}"#)
        .expect(1)
        .create_async()
        .await;
    let send_mock = server
        .mock("POST", "/v3/conversations/conv-1/activities/in-1")
        .match_header("authorization", "Bearer token-123")
        .with_status(201)
        .with_body(r#"{"id":"out-1"}"#)
        .expect(2)
        .create_async()
        .await;

    let client = ConnectorClient::new(Some(AppCredentials {
        app_id: "app-id".to_string(),
        app_password: "app-secret".to_string(),
    }))
    .with_login_url(format!("{}/token", server.url()));

    let activity = reply(&server.url(), "msteams");
    client.send_activity(&activity).await.unwrap();
    client.send_activity(&activity).await.unwrap();

    token_mock.assert_async().await;
    send_mock.assert_async().await;
}

/// **Test: A non-2xx connector response becomes an error carrying the status.**
#[tokio::test]
async fn test_send_error_status() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("POST", "/v3/conversations/conv-1/activities/in-1")
        .with_status(403)
        .with_body("forbidden")
        .create_async()
        .await;

    let client = ConnectorClient::new(None);
    let err = client
        .send_activity(&reply(&server.url(), "emulator"))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("403"));
}
