mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use playgate_core::registration::VERIFICATION_SUBJECT;
use playgate_core::types::{Email, ValidationError};
use playgate_core::memory::MemoryAccountStore;
use playgate_core::{
    AccountError, AccountStore, DeliveryError, RegistrationService, ServiceSettings, StoreError,
};

use common::{harness, harness_with_codes, settings, RecordingNotifier, StalledStore};

#[tokio::test]
async fn register_creates_unverified_account() {
    let h = harness();
    let account = h
        .registration
        .register("A", "a@x.com", "secret1".to_owned())
        .await
        .unwrap();
    assert!(!account.verified);
    assert_eq!(account.email.as_str(), "a@x.com");
    assert!(account.password.verify("secret1"));

    let email = Email::parse("a@x.com").unwrap();
    assert_eq!(h.store.count_by_email(&email).await, 1);
    let found = h.store.find_by_email(&email).await.unwrap().unwrap();
    assert_eq!(found.id, account.id);
}

#[tokio::test]
async fn register_emails_a_six_digit_code() {
    let h = harness();
    let account = h
        .registration
        .register("Ada", "ada@example.com", "secret1".to_owned())
        .await
        .unwrap();

    let sent = h.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ada@example.com");
    assert_eq!(sent[0].subject, VERIFICATION_SUBJECT);

    let code = sent[0].code();
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c: char| c.is_ascii_digit()));

    let (_, stored) = h.store.find_by_id(account.id).await.unwrap().unwrap();
    let stored = stored.unwrap();
    assert!(stored.matches(&code));
    assert_ne!(stored.code_hash, code);
}

#[tokio::test]
async fn second_registration_with_same_email_is_rejected() {
    let h = harness();
    h.registration
        .register("Ada", "ada@example.com", "secret1".to_owned())
        .await
        .unwrap();

    let err = h
        .registration
        .register("Ada Again", " ADA@Example.com ", "secret2".to_owned())
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::DuplicateEmail), "{err:?}");

    assert_eq!(h.store.account_count().await, 1);
    assert_eq!(h.notifier.sent().len(), 1);
}

#[tokio::test]
async fn duplicate_email_wins_over_invalid_name_and_password() {
    let h = harness();
    h.registration
        .register("Ada", "ada@example.com", "secret1".to_owned())
        .await
        .unwrap();

    let err = h
        .registration
        .register("", "ada@example.com", "x".to_owned())
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::DuplicateEmail), "{err:?}");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_registrations_leave_exactly_one_account() {
    let h = harness();
    let mut tasks = Vec::new();
    for i in 0..8 {
        let registration = h.registration.clone();
        tasks.push(tokio::spawn(async move {
            registration
                .register(&format!("Racer {i}"), "race@example.com", "secret1".to_owned())
                .await
        }));
    }

    let mut won = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => won += 1,
            Err(AccountError::DuplicateEmail) => {}
            Err(e) => panic!("unexpected error: {e:?}"),
        }
    }

    assert_eq!(won, 1);
    let email = Email::parse("race@example.com").unwrap();
    assert_eq!(h.store.count_by_email(&email).await, 1);
}

#[tokio::test]
async fn invalid_fields_store_nothing() {
    let h = harness();

    let err = h
        .registration
        .register("Ada", "not-an-email", "secret1".to_owned())
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::Invalid(ValidationError::MalformedEmail)));

    let err = h
        .registration
        .register("Ada", "ada@example.com", "12345".to_owned())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AccountError::Invalid(ValidationError::TooShort { field: "password", min: 6, got: 5 })
    ));

    let err = h
        .registration
        .register(&"n".repeat(33), "ada@example.com", "secret1".to_owned())
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::Invalid(ValidationError::Length { field: "name", .. })));

    assert_eq!(h.store.account_count().await, 0);
    assert!(h.notifier.sent().is_empty());
}

#[tokio::test]
async fn delivery_failure_keeps_account_and_code() {
    let h = harness();
    h.notifier.set_failing(true);

    let err = h
        .registration
        .register("Ada", "ada@example.com", "secret1".to_owned())
        .await
        .unwrap_err();
    assert!(
        matches!(err, AccountError::DeliveryFailed(DeliveryError::Transport(_))),
        "{err:?}"
    );

    let email = Email::parse("ada@example.com").unwrap();
    let account = h.store.find_by_email(&email).await.unwrap().unwrap();
    let (_, code) = h.store.find_by_id(account.id).await.unwrap().unwrap();
    assert!(code.is_some());

    h.notifier.set_failing(false);
    h.registration.resend("ada@example.com").await.unwrap();
    let verified = h
        .verification
        .redeem(account.id, &h.notifier.last_code())
        .await
        .unwrap();
    assert!(verified.verified);
}

#[tokio::test]
async fn stalled_delivery_times_out_as_delivery_failure() {
    let h = harness();
    h.notifier.set_stalled(true);

    let err = h
        .registration
        .register("Ada", "ada@example.com", "secret1".to_owned())
        .await
        .unwrap_err();
    assert!(
        matches!(err, AccountError::DeliveryFailed(DeliveryError::Timeout(_))),
        "{err:?}"
    );
    assert_eq!(h.store.account_count().await, 1);
}

#[tokio::test]
async fn stalled_store_times_out_as_store_error() {
    let service = RegistrationService::new(
        Arc::new(StalledStore),
        Arc::new(RecordingNotifier::default()),
        settings(),
    );
    let err = service
        .register("Ada", "ada@example.com", "secret1".to_owned())
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::Store(StoreError::Timeout(_))), "{err:?}");
}

#[tokio::test]
async fn resend_supersedes_previous_code() {
    let h = harness_with_codes(&["111111", "222222"]);
    let account = h
        .registration
        .register("Ada", "ada@example.com", "secret1".to_owned())
        .await
        .unwrap();
    h.registration.resend("ada@example.com").await.unwrap();
    assert_eq!(h.notifier.last_code(), "222222");

    let err = h.verification.redeem(account.id, "111111").await.unwrap_err();
    assert!(matches!(err, AccountError::InvalidCode), "{err:?}");
    h.verification.redeem(account.id, "222222").await.unwrap();
}

#[tokio::test]
async fn resend_for_unknown_email_is_not_found() {
    let h = harness();
    let err = h.registration.resend("nobody@example.com").await.unwrap_err();
    assert!(matches!(err, AccountError::AccountNotFound), "{err:?}");
}

#[tokio::test]
async fn resend_for_verified_account_is_rejected() {
    let h = harness();
    let account = h
        .registration
        .register("Ada", "ada@example.com", "secret1".to_owned())
        .await
        .unwrap();
    h.verification
        .redeem(account.id, &h.notifier.last_code())
        .await
        .unwrap();

    let err = h.registration.resend("ada@example.com").await.unwrap_err();
    assert!(matches!(err, AccountError::AlreadyVerified), "{err:?}");
    assert_eq!(h.notifier.sent().len(), 1);
}

#[tokio::test]
async fn code_stored_before_failed_delivery_stays_redeemable() {
    let h = harness_with_codes(&["731904"]);
    h.notifier.set_failing(true);
    let err = h
        .registration
        .register("Ada", "ada@example.com", "secret1".to_owned())
        .await
        .unwrap_err();
    assert!(matches!(err, AccountError::DeliveryFailed(_)), "{err:?}");

    let email = Email::parse("ada@example.com").unwrap();
    let account = h.store.find_by_email(&email).await.unwrap().unwrap();
    let verified = h.verification.redeem(account.id, "731904").await.unwrap();
    assert!(verified.verified);
}

#[tokio::test]
async fn password_hashing_does_not_block_the_runtime() {
    // Single-threaded runtime: the ticker only advances while register yields.
    let service = RegistrationService::new(
        Arc::new(MemoryAccountStore::new()),
        Arc::new(RecordingNotifier::default()),
        ServiceSettings {
            password_iterations: 50_000,
            ..settings()
        },
    );
    let ticks = Arc::new(AtomicUsize::new(0));
    let ticker = {
        let ticks = ticks.clone();
        tokio::spawn(async move {
            loop {
                tokio::time::sleep(Duration::from_millis(1)).await;
                ticks.fetch_add(1, Ordering::SeqCst);
            }
        })
    };

    let account = service
        .register("Ada", "ada@example.com", "secret1".to_owned())
        .await
        .unwrap();
    ticker.abort();

    assert!(account.password.verify("secret1"));
    assert_eq!(account.password.iterations(), 50_000);
    assert!(ticks.load(Ordering::SeqCst) > 2, "runtime was blocked while hashing");
}
