use conduit_core::edit::EditArguments;
use conduit_core::error::CallError;
use scripted_transport::{ScriptedTransport, discovered, ok, remote_error};
use serde_json::json;
use tokio_util::sync::CancellationToken;


const EDIT: &str = "maniphest.edit";

fn receipt() -> String {
    ok(json!({
        "object": { "id": 42, "phid": "PHID-TASK-42" },
        "transactions": [ { "phid": "PHID-XACT-TASK-1" }, { "phid": "PHID-XACT-TASK-2" } ],
    }))
}

#[tokio::test]
async fn test_edit_sends_transactions_in_order() {
    let transport = ScriptedTransport::new();
    let client = discovered(&transport, &[EDIT]).await;
    transport.respond(EDIT, receipt());

    let args = EditArguments::for_object(42u64)
        .transaction("name", "Foo")
        .transaction("status", "open");

    client
        .edit(CancellationToken::new(), EDIT, &args)
        .await
        .unwrap();

    let requests = transport.requests_to(EDIT);
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].body,
        "api.token=api-test&objectIdentifier=42&transactions[0][type]=name&transactions[0][value]=Foo&transactions[1][type]=status&transactions[1][value]=open"
    );
}

#[tokio::test]
async fn test_edit_without_identifier_creates() {
    let transport = ScriptedTransport::new();
    let client = discovered(&transport, &[EDIT]).await;
    transport.respond(EDIT, receipt());

    let args = EditArguments::new()
        .transaction("title", "New task")
        .transaction("projects.add", json!(["PHID-PROJ-1"]));

    client
        .edit(CancellationToken::new(), EDIT, &args)
        .await
        .unwrap();

    assert_eq!(
        transport.requests_to(EDIT)[0].body,
        "api.token=api-test&transactions[0][type]=title&transactions[0][value]=New+task&transactions[1][type]=projects.add&transactions[1][value]=%5B%22PHID-PROJ-1%22%5D"
    );
}

#[tokio::test]
async fn test_edit_surfaces_remote_error() {
    let transport = ScriptedTransport::new();
    let client = discovered(&transport, &[EDIT]).await;
    transport.respond(
        EDIT,
        remote_error("ERR-CONDUIT-CORE", "Transaction type \"nope\" is unknown."),
    );

    let err = client
        .edit(
            CancellationToken::new(),
            EDIT,
            &EditArguments::for_object("T42").transaction("nope", 1),
        )
        .await
        .unwrap_err();

    match err {
        CallError::Remote(remote) => {
            assert_eq!(remote.code, "ERR-CONDUIT-CORE");
            assert_eq!(remote.to_string(), "[ERR-CONDUIT-CORE] Transaction type \"nope\" is unknown.");
        }
        other => panic!("Expected a remote error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_edit_of_unknown_procedure_fails_fast() {
    let transport = ScriptedTransport::new();
    let client = discovered(&transport, &[EDIT, "maniphest.search"]).await;

    for procedure in ["project.edit", "maniphest.search"] {
        let err = client
            .edit(
                CancellationToken::new(),
                procedure,
                &EditArguments::for_object(1u64).transaction("name", "x"),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CallError::UnknownProcedure { ref name, .. } if name == procedure));
    }

    assert_eq!(transport.requests().len(), 1);
}

#[tokio::test]
async fn test_cancelled_edit_is_not_sent() {
    let transport = ScriptedTransport::new();
    let client = discovered(&transport, &[EDIT]).await;
    let cancel = CancellationToken::new();
    cancel.cancel();

    let err = client
        .edit(cancel, EDIT, &EditArguments::for_object(1u64).transaction("name", "x"))
        .await
        .unwrap_err();

    assert!(matches!(err, CallError::Cancelled));
    assert!(transport.requests_to(EDIT).is_empty());
}
