//! Single-threaded service loop.
//!
//! Every selection notification, bus request, and key trigger is funneled
//! through one channel and processed one event at a time. This is the
//! serialization point the concurrency model requires: collaborators on
//! other threads only ever hold an [`AppEvent`] sender.

use ck_core::{CoreError, Endpoint};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;
use tracing::{debug, info};

use crate::bus::{Reply, Request, Signal, SignalHub};
use crate::keybinder::{self, KeyTrigger};
use crate::manager::ClipboardsManager;

#[derive(Debug)]
pub enum AppEvent {
    SelectionChanged { endpoint: Endpoint },
    Request {
        request: Request,
        reply: oneshot::Sender<Result<Reply, String>>,
    },
    Key(KeyTrigger),
    Shutdown,
}

/// Cloneable handle collaborators use to funnel events in.
#[derive(Clone, Debug)]
pub struct ServiceHandle {
    tx: UnboundedSender<AppEvent>,
}

impl ServiceHandle {
    pub fn notify_selection_changed(&self, endpoint: Endpoint) {
        let _ = self.tx.send(AppEvent::SelectionChanged { endpoint });
    }

    pub fn trigger(&self, trigger: KeyTrigger) {
        let _ = self.tx.send(AppEvent::Key(trigger));
    }

    pub async fn request(&self, request: Request) -> Result<Reply, String> {
        let (tx, rx) = oneshot::channel();
        self.tx
            .send(AppEvent::Request { request, reply: tx })
            .map_err(|_| "service stopped".to_string())?;
        rx.await.map_err(|_| "service stopped".to_string())?
    }

    pub fn shutdown(&self) {
        let _ = self.tx.send(AppEvent::Shutdown);
    }
}

#[derive(Debug)]
pub struct Service {
    manager: ClipboardsManager,
    hub: SignalHub,
    rx: UnboundedReceiver<AppEvent>,
}

impl Service {
    pub fn new(manager: ClipboardsManager) -> (Self, ServiceHandle) {
        let (tx, rx) = unbounded_channel();
        (
            Self {
                manager,
                hub: SignalHub::new(),
                rx,
            },
            ServiceHandle { tx },
        )
    }

    pub fn subscribe(&mut self) -> tokio::sync::mpsc::UnboundedReceiver<Signal> {
        self.hub.subscribe()
    }

    /// Process events until shutdown. The final persist runs before return.
    pub async fn run(mut self) {
        info!("service loop started");
        while let Some(event) = self.rx.recv().await {
            match event {
                AppEvent::SelectionChanged { endpoint } => {
                    self.manager.handle_selection_changed(endpoint);
                }
                AppEvent::Request { request, reply } => {
                    let result = self.handle_request(request).await;
                    let _ = reply.send(result);
                }
                AppEvent::Key(trigger) => {
                    keybinder::dispatch(trigger, &mut self.manager).await;
                }
                AppEvent::Shutdown => break,
            }
            for signal in self.manager.take_signals() {
                self.hub.publish(signal);
            }
        }
        self.manager.flush();
        info!("service loop stopped");
    }

    async fn handle_request(&mut self, request: Request) -> Result<Reply, String> {
        debug!(?request, "bus request");
        match request {
            Request::GetHistory { name } => self
                .manager
                .get_history(name.as_deref())
                .map(|items| Reply::Items { items })
                .map_err(stringify),
            Request::Add { value } => self
                .manager
                .add_text(value)
                .map(|id| Reply::Id { id })
                .map_err(stringify),
            Request::AddPassword { name, value } => self
                .manager
                .add_password(name, value)
                .map(|id| Reply::Id { id })
                .map_err(stringify),
            Request::Select { id } => self
                .manager
                .push_item(Endpoint::Clipboard, &id)
                .map(|()| Reply::Done)
                .map_err(stringify),
            Request::Delete { id } => self
                .manager
                .delete(&id)
                .map(|()| Reply::Done)
                .map_err(stringify),
            Request::Search { query } => Ok(Reply::Items {
                items: self.manager.search(&query),
            }),
            Request::SwitchHistory { name } => {
                self.manager.switch_history(&name);
                Ok(Reply::Done)
            }
            Request::EmptyHistory { name } => {
                self.manager.empty_history(&name);
                Ok(Reply::Done)
            }
            Request::Upload { id } => self
                .manager
                .upload(&id)
                .await
                .map(|()| Reply::Done)
                .map_err(|e| e.to_string()),
        }
    }
}

fn stringify(err: CoreError) -> String {
    err.to_string()
}
