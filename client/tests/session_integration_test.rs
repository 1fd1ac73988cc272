//! End-to-end session tests: directory sign-in, onboarding and report
//! generation against a mocked messages endpoint.

mod common;

use common::{alex_profile, envelope, report_json, test_client, MESSAGES_PATH};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use irontrack_client::auth::AccountDirectory;
use irontrack_client::{Page, ReportError, ReportSlot, Screen, Session};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_demo_account_report_flow() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MESSAGES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(&report_json().to_string())))
        .expect(1)
        .mount(&server)
        .await;

    let directory = AccountDirectory::with_demo_accounts().unwrap();
    let account = directory.sign_in("alex@irontrack.io", "alex123").await.unwrap();

    let session = Session::new(Arc::new(test_client(&server)));
    assert_eq!(session.login(account).unwrap(), Screen::App);
    session.navigate(Page::Report).unwrap();

    let report = session.generate().await.unwrap();
    assert_eq!(report.score, 62.0);
    match session.report() {
        ReportSlot::Ready { report, .. } => assert_eq!(report.tdee, 2786.0),
        other => panic!("expected a ready report, got {:?}", other),
    }
}

#[tokio::test]
async fn test_new_account_onboards_then_reports() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MESSAGES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(&report_json().to_string())))
        .mount(&server)
        .await;

    let name: String = Name().fake();
    let email: String = SafeEmail().fake();
    let directory = AccountDirectory::empty();
    let account = directory.sign_up(&name, &email, "secret1").await.unwrap();
    assert!(account.avatar.chars().count() <= 2);
    assert_eq!(account.avatar, account.avatar.to_uppercase());

    let session = Session::new(Arc::new(test_client(&server)));
    assert_eq!(session.login(account).unwrap(), Screen::Onboarding);
    assert_eq!(session.generate().await.unwrap_err(), ReportError::NoProfile);

    session.complete_onboarding(alex_profile()).unwrap();
    assert_eq!(session.page(), Page::Report);
    session.generate().await.unwrap();
    assert!(session.report().report().is_some());
}

#[tokio::test]
async fn test_failed_generation_keeps_retry_available() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(MESSAGES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope("not json")))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(MESSAGES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(&report_json().to_string())))
        .mount(&server)
        .await;

    let directory = AccountDirectory::with_demo_accounts().unwrap();
    let account = directory.sign_in("alex@irontrack.io", "alex123").await.unwrap();
    let session = Session::new(Arc::new(test_client(&server)));
    session.login(account).unwrap();
    session.navigate(Page::Report).unwrap();

    let err = session.generate().await.unwrap_err();
    assert!(err.is_retryable());
    assert!(matches!(session.report(), ReportSlot::Failed(ReportError::Format(_))));

    session.generate().await.unwrap();
    assert!(session.report().report().is_some());
}
