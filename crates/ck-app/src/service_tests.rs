use ck_core::{Endpoint, Settings};

use crate::bus::{Reply, Request, Signal};
use crate::keybinder::KeyTrigger;
use crate::service::Service;
use crate::testutil::fixture;

#[tokio::test]
async fn request_reply_round_trip() {
    let fx = fixture(Settings::default());
    let (service, handle) = Service::new(fx.manager);
    let worker = tokio::spawn(service.run());

    let reply = handle
        .request(Request::Add {
            value: "from the bus".into(),
        })
        .await
        .unwrap();
    let id = match reply {
        Reply::Id { id } => id,
        other => panic!("expected id reply, got {other:?}"),
    };

    let reply = handle
        .request(Request::GetHistory { name: None })
        .await
        .unwrap();
    match reply {
        Reply::Items { items } => {
            assert_eq!(items.len(), 1);
            assert_eq!(items[0].id, id);
        }
        other => panic!("expected items reply, got {other:?}"),
    }

    handle.shutdown();
    worker.await.unwrap();
}

#[tokio::test]
async fn search_request_is_case_insensitive() {
    let fx = fixture(Settings::default());
    let (service, handle) = Service::new(fx.manager);
    let worker = tokio::spawn(service.run());

    for value in ["abcdef", "nomatch", "xyzabc"] {
        handle
            .request(Request::Add {
                value: value.into(),
            })
            .await
            .unwrap();
    }

    let reply = handle
        .request(Request::Search {
            query: "ABC".into(),
        })
        .await
        .unwrap();
    match reply {
        Reply::Items { items } => {
            let displays: Vec<_> = items.iter().map(|i| i.display.as_str()).collect();
            assert_eq!(displays, ["xyzabc", "abcdef"]);
        }
        other => panic!("expected items reply, got {other:?}"),
    }

    handle.shutdown();
    worker.await.unwrap();
}

#[tokio::test]
async fn stale_identifier_surfaces_as_error_reply() {
    let fx = fixture(Settings::default());
    let (service, handle) = Service::new(fx.manager);
    let worker = tokio::spawn(service.run());

    let id = match handle
        .request(Request::Add { value: "x".into() })
        .await
        .unwrap()
    {
        Reply::Id { id } => id,
        other => panic!("expected id reply, got {other:?}"),
    };
    handle
        .request(Request::Delete { id: id.clone() })
        .await
        .unwrap();

    let err = handle
        .request(Request::Select { id })
        .await
        .unwrap_err();
    assert!(err.contains("no entry"));

    handle.shutdown();
    worker.await.unwrap();
}

#[tokio::test]
async fn mutations_fan_signals_out_to_live_subscribers() {
    let fx = fixture(Settings::default());
    let (mut service, handle) = Service::new(fx.manager);
    let dropped = service.subscribe();
    let mut live = service.subscribe();
    drop(dropped);
    let worker = tokio::spawn(service.run());

    handle
        .request(Request::Add {
            value: "notify".into(),
        })
        .await
        .unwrap();

    assert_eq!(
        live.recv().await,
        Some(Signal::HistoryUpdated {
            name: "history".into(),
            len: 1
        })
    );

    handle.shutdown();
    worker.await.unwrap();
}

#[tokio::test]
async fn select_request_pushes_onto_the_clipboard() {
    let fx = fixture(Settings::default());
    let provider = fx.provider.clone();
    let (service, handle) = Service::new(fx.manager);
    let worker = tokio::spawn(service.run());

    let id = match handle
        .request(Request::Add {
            value: "paste me".into(),
        })
        .await
        .unwrap()
    {
        Reply::Id { id } => id,
        other => panic!("expected id reply, got {other:?}"),
    };
    handle.request(Request::Select { id }).await.unwrap();

    // the write claimed the clipboard; its echo must not duplicate the entry
    handle.notify_selection_changed(Endpoint::Clipboard);
    let reply = handle
        .request(Request::GetHistory { name: None })
        .await
        .unwrap();
    match reply {
        Reply::Items { items } => assert_eq!(items.len(), 1),
        other => panic!("expected items reply, got {other:?}"),
    }
    assert_eq!(provider.writes.lock().unwrap().len(), 1);

    handle.shutdown();
    worker.await.unwrap();
}

#[tokio::test]
async fn pop_trigger_drops_the_most_recent_entry() {
    let fx = fixture(Settings::default());
    let (service, handle) = Service::new(fx.manager);
    let worker = tokio::spawn(service.run());

    handle
        .request(Request::Add { value: "a".into() })
        .await
        .unwrap();
    handle
        .request(Request::Add { value: "b".into() })
        .await
        .unwrap();
    handle.trigger(KeyTrigger::PopRecent);

    let reply = handle
        .request(Request::GetHistory { name: None })
        .await
        .unwrap();
    match reply {
        Reply::Items { items } => {
            assert_eq!(items.len(), 1);
            assert_eq!(items[0].display, "a");
        }
        other => panic!("expected items reply, got {other:?}"),
    }

    handle.shutdown();
    worker.await.unwrap();
}

#[tokio::test]
async fn shutdown_runs_the_final_persist() {
    let fx = fixture(Settings::default());
    let store = fx.store.clone();
    let (service, handle) = Service::new(fx.manager);
    let worker = tokio::spawn(service.run());

    handle
        .request(Request::Add {
            value: "durable".into(),
        })
        .await
        .unwrap();
    handle.shutdown();
    worker.await.unwrap();

    assert_eq!(store.saved_len("history"), Some(1));
}

#[tokio::test]
async fn upload_request_reaches_the_collaborator() {
    let fx = fixture(Settings::default());
    let uploader = fx.uploader.clone();
    let (service, handle) = Service::new(fx.manager);
    let worker = tokio::spawn(service.run());

    let id = match handle
        .request(Request::Add {
            value: "share".into(),
        })
        .await
        .unwrap()
    {
        Reply::Id { id } => id,
        other => panic!("expected id reply, got {other:?}"),
    };
    handle.request(Request::Upload { id }).await.unwrap();

    assert_eq!(uploader.uploaded.lock().unwrap().len(), 1);

    handle.shutdown();
    worker.await.unwrap();
}
