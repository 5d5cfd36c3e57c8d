#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum_test::TestServer;
use playgate_api::router::{build_router, AppState};
use playgate_core::memory::MemoryAccountStore;
use playgate_core::types::Email;
use playgate_core::{BoxFuture, DeliveryError, Notifier, ServiceSettings};

/// Keeps the last code it was asked to send; can be switched to fail.
#[derive(Default)]
pub struct Outbox {
    codes: Mutex<Vec<String>>,
    failing: AtomicBool,
}

impl Outbox {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn last_code(&self) -> String {
        self.codes.lock().unwrap().last().cloned().expect("a code was sent")
    }

    pub fn sent(&self) -> usize {
        self.codes.lock().unwrap().len()
    }
}

impl Notifier for Outbox {
    fn send<'a>(
        &'a self,
        _to: &'a Email,
        _subject: &'a str,
        body: &'a str,
    ) -> BoxFuture<'a, Result<(), DeliveryError>> {
        Box::pin(async move {
            if self.failing.load(Ordering::SeqCst) {
                return Err(DeliveryError::Transport("mailbox unavailable".to_owned()));
            }
            let code = body
                .split("code is: ")
                .nth(1)
                .map(|rest| rest.trim().to_owned())
                .unwrap_or_default();
            self.codes.lock().unwrap().push(code);
            Ok(())
        })
    }
}

pub fn settings() -> ServiceSettings {
    ServiceSettings {
        store_timeout: Duration::from_secs(2),
        delivery_timeout: Duration::from_secs(2),
        password_iterations: 1_000,
    }
}

pub fn server() -> (TestServer, Arc<Outbox>) {
    let outbox = Arc::new(Outbox::default());
    let state = AppState::new(
        Arc::new(MemoryAccountStore::new()),
        outbox.clone(),
        settings(),
    );
    (TestServer::new(build_router(state)).unwrap(), outbox)
}
