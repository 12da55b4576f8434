use conduit_core::catalog::ProcedureKind;
use conduit_core::client::ConduitClient;
use conduit_core::config::ConfigError;
use conduit_core::diagnostics;
use conduit_core::encoding::FixupRules;
use conduit_core::error::{CallError, DecodeError};
use scripted_transport::{
    API, ScriptedTransport, TOKEN, catalog, client, discovered, ok, remote_error,
};
use serde_json::json;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::fmt::writer::BoxMakeWriter;


#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn test_discovery_classifies_procedures() {
    let transport = ScriptedTransport::new();
    let client = discovered(
        &transport,
        &["maniphest.search", "maniphest.edit", "user.whoami", "project.search"],
    )
    .await;

    let catalog = client.catalog();
    assert_eq!(catalog.len(), 4);
    assert_eq!(catalog.kind("maniphest.search"), Some(ProcedureKind::Search));
    assert_eq!(catalog.kind("maniphest.edit"), Some(ProcedureKind::Edit));
    assert_eq!(catalog.kind("user.whoami"), Some(ProcedureKind::Unsupported));
    assert_eq!(catalog.kind("differential.revision.search"), None);

    let info = catalog.get("project.search").unwrap();
    assert_eq!(info.description, "Describes project.search.");
    assert!(info.params.is_empty());
    assert_eq!(info.returns, "map<string, wild>");

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].procedure, "conduit.query");
    assert_eq!(requests[0].body, "api.token=api-test");
}

#[tokio::test]
async fn test_discovery_keeps_declared_params() {
    let transport = ScriptedTransport::new();
    transport.respond(
        "conduit.query",
        ok(json!({
            "maniphest.search": {
                "description": "Read information about tasks.",
                "params": { "queryKey": "optional string", "constraints": "optional map<string, wild>" },
                "return": "map<string, wild>",
            }
        })),
    );

    let client = client(&transport).discover().await.unwrap();
    let params: Vec<_> = client
        .catalog()
        .get("maniphest.search")
        .unwrap()
        .param_names()
        .collect();

    assert_eq!(params, ["constraints", "queryKey"]);
}

#[tokio::test]
async fn test_discovery_needs_the_params_fixup() {
    let transport = ScriptedTransport::new();
    transport.respond("conduit.query", catalog(&["user.whoami"]));

    let err = client(&transport)
        .with_fixups(FixupRules::empty())
        .discover()
        .await
        .unwrap_err();

    assert!(matches!(err, CallError::Decode(DecodeError::Envelope { .. })));
}

#[tokio::test]
async fn test_discovery_surfaces_remote_error() {
    let transport = ScriptedTransport::new();
    transport.respond(
        "conduit.query",
        remote_error("ERR-INVALID-AUTH", "API token \"api-test\" has the wrong length."),
    );

    let err = client(&transport).discover().await.unwrap_err();

    assert!(matches!(err, CallError::Remote(ref remote) if remote.code == "ERR-INVALID-AUTH"));
}

#[tokio::test]
async fn test_whoami() {
    let transport = ScriptedTransport::new();
    transport.respond(
        "user.whoami",
        ok(json!({
            "phid": "PHID-USER-1",
            "userName": "alice",
            "realName": "Alice Liddell",
            "image": "https://phab.test/file/alice.png",
            "uri": "https://phab.test/p/alice/",
            "roles": ["verified", "approved", "activated"],
            "primaryEmail": "alice@example.com",
        })),
    );

    let me = client(&transport).whoami().await.unwrap();

    assert_eq!(me.user_name, "alice");
    assert_eq!(me.real_name, "Alice Liddell");
    assert_eq!(me.roles.len(), 3);
    assert_eq!(me.primary_email, "alice@example.com");
    assert_eq!(transport.requests_to("user.whoami")[0].body, "api.token=api-test");
}

#[tokio::test]
async fn test_whoami_surfaces_remote_error() {
    let transport = ScriptedTransport::new();
    transport.respond(
        "user.whoami",
        remote_error("ERR-INVALID-SESSION", "Session key is not present."),
    );

    let err = client(&transport).whoami().await.unwrap_err();

    assert!(matches!(err, CallError::Remote(ref remote) if remote.code == "ERR-INVALID-SESSION"));
}

#[tokio::test]
async fn test_diagnostics_go_to_the_client_sink() {
    let captured = Captured::default();
    let writer = captured.clone();
    let sink = diagnostics::sink(
        Level::DEBUG,
        Some(BoxMakeWriter::new(move || writer.clone())),
    );

    let transport = ScriptedTransport::new();
    transport.respond("conduit.query", catalog(&["maniphest.search", "user.whoami"]));

    client(&transport)
        .with_diagnostics(sink)
        .discover()
        .await
        .unwrap();

    let logs = captured.contents();
    assert!(logs.contains("Defining handler for a search procedure"));
    assert!(logs.contains("Procedure not supported yet - skipping"));
    assert!(logs.contains("user.whoami"));
    assert!(logs.contains("Endpoint discovery complete"));
}

#[test]
fn test_api_root_gets_a_trailing_slash() {
    let transport = ScriptedTransport::new();
    let client = ConduitClient::from_transport("https://phab.test/api", TOKEN, transport).unwrap();

    assert_eq!(client.api().as_str(), API);
}

#[test]
fn test_invalid_api_root() {
    let err = ConduitClient::from_transport("not a url", TOKEN, ScriptedTransport::new())
        .unwrap_err();

    assert!(matches!(err, ConfigError::InvalidUrl { .. }));
}
