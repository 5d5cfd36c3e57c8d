#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use playgate_core::code::CodeGenerator;
use playgate_core::memory::MemoryAccountStore;
use playgate_core::types::{AccountId, Email};
use playgate_core::{
    Account, AccountStore, BoxFuture, DeliveryError, Notifier, RegistrationService,
    ServiceSettings, StoreError, VerificationCode, VerificationService,
};

/// A message captured by [`RecordingNotifier`].
#[derive(Debug, Clone)]
pub struct Sent {
    pub to: String,
    pub subject: String,
    pub body: String,
}

impl Sent {
    pub fn code(&self) -> String {
        self.body
            .split("code is: ")
            .nth(1)
            .map(|rest| rest.trim().to_owned())
            .expect("message carries a code")
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Sent>>,
    failing: AtomicBool,
    stalled: AtomicBool,
}

impl RecordingNotifier {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn set_stalled(&self, stalled: bool) {
        self.stalled.store(stalled, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_code(&self) -> String {
        self.sent().last().expect("a message was sent").code()
    }
}

impl Notifier for RecordingNotifier {
    fn send<'a>(
        &'a self,
        to: &'a Email,
        subject: &'a str,
        body: &'a str,
    ) -> BoxFuture<'a, Result<(), DeliveryError>> {
        Box::pin(async move {
            if self.stalled.load(Ordering::SeqCst) {
                std::future::pending::<()>().await;
            }
            if self.failing.load(Ordering::SeqCst) {
                return Err(DeliveryError::Transport("provider returned 503".to_owned()));
            }
            self.sent.lock().unwrap().push(Sent {
                to: to.to_string(),
                subject: subject.to_owned(),
                body: body.to_owned(),
            });
            Ok(())
        })
    }
}

/// Hands out the queued codes in order, then repeats the last one.
pub struct QueuedCodes(Mutex<VecDeque<&'static str>>);

impl QueuedCodes {
    pub fn new(codes: &[&'static str]) -> Self {
        Self(Mutex::new(codes.iter().copied().collect()))
    }
}

impl CodeGenerator for QueuedCodes {
    fn generate(&self) -> String {
        let mut queue = self.0.lock().unwrap();
        if queue.len() > 1 {
            queue.pop_front().unwrap().to_owned()
        } else {
            queue.front().unwrap().to_string()
        }
    }
}

/// A store whose every call hangs forever.
pub struct StalledStore;

impl AccountStore for StalledStore {
    fn find_by_email<'a>(
        &'a self,
        _email: &'a Email,
    ) -> BoxFuture<'a, Result<Option<Account>, StoreError>> {
        Box::pin(std::future::pending())
    }

    fn find_by_id(
        &self,
        _id: AccountId,
    ) -> BoxFuture<'_, Result<Option<(Account, Option<VerificationCode>)>, StoreError>> {
        Box::pin(std::future::pending())
    }

    fn save(&self, _account: Account) -> BoxFuture<'_, Result<Account, StoreError>> {
        Box::pin(std::future::pending())
    }

    fn save_code(&self, _code: VerificationCode) -> BoxFuture<'_, Result<VerificationCode, StoreError>> {
        Box::pin(std::future::pending())
    }

    fn delete_code<'a>(&'a self, _code: &'a VerificationCode) -> BoxFuture<'a, Result<bool, StoreError>> {
        Box::pin(std::future::pending())
    }

    fn redeem_code<'a>(
        &'a self,
        _code: &'a VerificationCode,
    ) -> BoxFuture<'a, Result<Option<Account>, StoreError>> {
        Box::pin(std::future::pending())
    }
}

/// Wraps [`MemoryAccountStore`]; saving a verified account always fails and
/// the next `redeem_code` can be made to fail once.
#[derive(Default)]
pub struct FlakyStore {
    pub inner: MemoryAccountStore,
    fail_next_redeem: AtomicBool,
}

impl FlakyStore {
    pub fn fail_next_redeem(&self) {
        self.fail_next_redeem.store(true, Ordering::SeqCst);
    }
}

impl AccountStore for FlakyStore {
    fn find_by_email<'a>(
        &'a self,
        email: &'a Email,
    ) -> BoxFuture<'a, Result<Option<Account>, StoreError>> {
        self.inner.find_by_email(email)
    }

    fn find_by_id(
        &self,
        id: AccountId,
    ) -> BoxFuture<'_, Result<Option<(Account, Option<VerificationCode>)>, StoreError>> {
        self.inner.find_by_id(id)
    }

    fn save(&self, account: Account) -> BoxFuture<'_, Result<Account, StoreError>> {
        if account.verified {
            return Box::pin(async { Err(StoreError::Unavailable("write rejected".to_owned())) });
        }
        self.inner.save(account)
    }

    fn save_code(&self, code: VerificationCode) -> BoxFuture<'_, Result<VerificationCode, StoreError>> {
        self.inner.save_code(code)
    }

    fn delete_code<'a>(&'a self, code: &'a VerificationCode) -> BoxFuture<'a, Result<bool, StoreError>> {
        self.inner.delete_code(code)
    }

    fn redeem_code<'a>(
        &'a self,
        code: &'a VerificationCode,
    ) -> BoxFuture<'a, Result<Option<Account>, StoreError>> {
        if self.fail_next_redeem.swap(false, Ordering::SeqCst) {
            return Box::pin(async { Err(StoreError::Unavailable("connection reset".to_owned())) });
        }
        self.inner.redeem_code(code)
    }
}

pub fn settings() -> ServiceSettings {
    ServiceSettings {
        store_timeout: Duration::from_millis(200),
        delivery_timeout: Duration::from_millis(200),
        password_iterations: 1_000,
    }
}

pub struct Harness {
    pub store: Arc<MemoryAccountStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub registration: RegistrationService,
    pub verification: VerificationService,
}

pub fn harness() -> Harness {
    let store = Arc::new(MemoryAccountStore::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let registration = RegistrationService::new(store.clone(), notifier.clone(), settings());
    let verification = VerificationService::new(store.clone(), settings());
    Harness {
        store,
        notifier,
        registration,
        verification,
    }
}

pub fn harness_with_codes(codes: &[&'static str]) -> Harness {
    let mut h = harness();
    h.registration = h
        .registration
        .with_code_generator(Arc::new(QueuedCodes::new(codes)));
    h
}
