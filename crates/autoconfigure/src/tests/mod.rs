use std::{cell::Cell, fs, path::PathBuf, rc::Rc};

use tempfile::TempDir;
use wavefront_client::{AccountInfo, MockAccountProvisioner};
use wavefront_config::{ConfigContext, PropertySource, properties};
use wavefront_errors::AccountProvisioningError;

use crate::{AccountProvisioning, LogLevel, PROPERTY_SOURCE_NAME, ProvisioningOutcome};

const DEFAULT_URI: &str = "https://wavefront.surf";

fn context(pairs: &[(&str, &str)]) -> ConfigContext {
    ConfigContext::new().with_source(
        PropertySource::from_pairs("operator", pairs.iter().map(|(k, v)| (*k, v.to_string())))
            .unwrap(),
    )
}

fn account(api_token: &str, login_url: &str) -> AccountInfo {
    AccountInfo::new(Some(api_token.to_string()), Some(login_url.to_string()))
}

fn provisioning_at(
    provisioner: MockAccountProvisioner,
    token_file: PathBuf,
) -> AccountProvisioning<MockAccountProvisioner> {
    AccountProvisioning::with_provisioner(provisioner)
        .with_token_file_locator(move || Some(token_file.clone()))
}

fn unused_provisioner() -> MockAccountProvisioner {
    let mut provisioner = MockAccountProvisioner::new();
    provisioner.expect_provision_account().times(0);
    provisioner
}

#[test]
fn test_existing_api_token_is_left_untouched() {
    let located = Rc::new(Cell::new(false));
    let located_flag = located.clone();
    let mut provisioning = AccountProvisioning::with_provisioner(unused_provisioner())
        .with_token_file_locator(move || {
            located_flag.set(true);
            None
        });
    let mut context = context(&[(properties::API_TOKEN, "existing")]);

    let outcome = provisioning.provision(&mut context);

    assert_eq!(outcome, ProvisioningOutcome::TokenAlreadyConfigured);
    assert!(!located.get());
    assert_eq!(context.sources().len(), 1);
    assert!(context.source(PROPERTY_SOURCE_NAME).is_none());
    assert_eq!(context.get_text(properties::API_TOKEN).as_deref(), Some("existing"));
}

#[test]
fn test_blank_api_token_is_not_an_existing_token() {
    let dir = TempDir::new().unwrap();
    let token_file = dir.path().join("test.token");
    fs::write(&token_file, "abc-def").unwrap();
    let mut provisioning = provisioning_at(unused_provisioner(), token_file);
    let mut context = context(&[(properties::API_TOKEN, "  ")]);

    let outcome = provisioning.provision(&mut context);

    assert_eq!(outcome, ProvisioningOutcome::RestoredFromCache);
    assert_eq!(context.get_text(properties::API_TOKEN).as_deref(), Some("abc-def"));
}

#[test]
fn test_api_token_is_restored_from_token_file() {
    let dir = TempDir::new().unwrap();
    let token_file = dir.path().join("test.token");
    fs::write(&token_file, "abc-def").unwrap();
    let mut provisioning = provisioning_at(unused_provisioner(), token_file);
    let mut context = ConfigContext::new();

    let outcome = provisioning.provision(&mut context);

    assert_eq!(outcome, ProvisioningOutcome::RestoredFromCache);
    assert_eq!(context.get_text(properties::API_TOKEN).as_deref(), Some("abc-def"));
    assert_eq!(context.sources().last().unwrap().name(), PROPERTY_SOURCE_NAME);
    assert!(provisioning.log().contains(LogLevel::Debug, "Existing Wavefront api token found"));
}

#[test]
fn test_restored_token_with_custom_uri_keeps_uri_untouched() {
    let dir = TempDir::new().unwrap();
    let token_file = dir.path().join("test.token");
    fs::write(&token_file, "abc-def").unwrap();
    let mut provisioning = provisioning_at(unused_provisioner(), token_file);
    let mut context = context(&[(properties::URI, "https://example.com")]);

    provisioning.provision(&mut context);

    let injected = context.source(PROPERTY_SOURCE_NAME).unwrap();
    assert_eq!(injected.get_string(properties::API_TOKEN).as_deref(), Some("abc-def"));
    assert_eq!(injected.get_string(properties::URI), None);
    assert_eq!(context.get_text(properties::URI).as_deref(), Some("https://example.com"));
}

#[test]
fn test_new_account_is_provisioned_when_token_file_does_not_exist() {
    let dir = TempDir::new().unwrap();
    let token_file = dir.path().join("test.token");
    let mut provisioner = MockAccountProvisioner::new();
    provisioner
        .expect_provision_account()
        .withf(|endpoint, _| endpoint.as_str() == "https://example.org")
        .times(1)
        .returning(|_, _| Ok(account("abc-def", "/us/test")));
    let mut provisioning = provisioning_at(provisioner, token_file.clone());
    let mut context = context(&[(properties::URI, "https://example.org")]);

    let outcome = provisioning.provision(&mut context);

    assert_eq!(outcome, ProvisioningOutcome::Provisioned);
    assert_eq!(context.get_text(properties::API_TOKEN).as_deref(), Some("abc-def"));
    assert_eq!(fs::read_to_string(&token_file).unwrap(), "abc-def");

    let log = provisioning.log();
    assert!(log.contains(
        LogLevel::Debug,
        "Auto-negotiating Wavefront credentials from: https://example.org"
    ));
    assert!(log.contains(LogLevel::Info, "https://example.org"));
    assert!(log.contains(LogLevel::Info, "https://example.org/us/test"));
    assert!(log.contains(LogLevel::Info, "wavefront.api_token=abc-def"));
}

#[test]
fn test_default_uri_is_used_for_negotiation() {
    let dir = TempDir::new().unwrap();
    let mut provisioner = MockAccountProvisioner::new();
    provisioner
        .expect_provision_account()
        .withf(|endpoint, _| endpoint.as_str() == DEFAULT_URI)
        .times(1)
        .returning(|_, _| Ok(account("abc-def", "/us/test")));
    let mut provisioning = provisioning_at(provisioner, dir.path().join("test.token"));

    let outcome = provisioning.provision(&mut ConfigContext::new());

    assert_eq!(outcome, ProvisioningOutcome::Provisioned);
    assert!(provisioning.log().contains(LogLevel::Info, "https://wavefront.surf/us/test"));
}

#[test]
fn test_application_info_is_resolved_from_configuration() {
    let dir = TempDir::new().unwrap();
    let mut provisioner = MockAccountProvisioner::new();
    provisioner
        .expect_provision_account()
        .withf(|_, application| {
            application.name() == "test-app"
                && application.service() == "unnamed_service"
                && application.cluster().is_none()
                && application.shard() == Some("east")
        })
        .times(1)
        .returning(|_, _| Ok(account("abc-def", "/us/test")));
    let mut provisioning = provisioning_at(provisioner, dir.path().join("test.token"));
    let mut context = context(&[
        (properties::LEGACY_APPLICATION_NAME, "test-app"),
        (properties::APPLICATION_SHARD, "east"),
    ]);

    assert_eq!(provisioning.provision(&mut context), ProvisioningOutcome::Provisioned);
}

#[test]
fn test_provisioning_failure_is_reported() {
    let dir = TempDir::new().unwrap();
    let token_file = dir.path().join("test.token");
    let mut provisioner = MockAccountProvisioner::new();
    provisioner.expect_provision_account().times(1).returning(|_, _| {
        Err(AccountProvisioningError::Provisioning {
            status: 406,
            body: "quota exceeded".to_string(),
        })
    });
    let mut provisioning = provisioning_at(provisioner, token_file.clone());
    let mut context = context(&[(properties::URI, "https://example.org")]);

    let outcome = provisioning.provision(&mut context);

    assert_eq!(outcome, ProvisioningOutcome::Failed);
    assert!(!outcome.has_token());
    assert_eq!(context.get_string(properties::API_TOKEN), None);
    assert!(context.source(PROPERTY_SOURCE_NAME).is_none());
    assert!(!token_file.exists());

    let log = provisioning.log();
    assert!(log.contains(LogLevel::Warn, "https://example.org"));
    assert!(log.contains(LogLevel::Warn, "quota exceeded"));
}

#[test]
fn test_transport_failure_is_reported() {
    let dir = TempDir::new().unwrap();
    let mut provisioner = MockAccountProvisioner::new();
    provisioner
        .expect_provision_account()
        .times(1)
        .returning(|_, _| Err(AccountProvisioningError::Transport("operation timed out".to_string())));
    let mut provisioning = provisioning_at(provisioner, dir.path().join("test.token"));
    let mut context = ConfigContext::new();

    assert_eq!(provisioning.provision(&mut context), ProvisioningOutcome::Failed);
    assert!(provisioning.log().contains(LogLevel::Warn, DEFAULT_URI));
    assert!(provisioning.log().contains(LogLevel::Warn, "operation timed out"));
}

#[test]
fn test_invalid_uri_fails_without_negotiation() {
    let dir = TempDir::new().unwrap();
    let mut provisioning = provisioning_at(unused_provisioner(), dir.path().join("test.token"));
    let mut context = context(&[(properties::URI, "not a uri")]);

    assert_eq!(provisioning.provision(&mut context), ProvisioningOutcome::Failed);
    assert!(context.source(PROPERTY_SOURCE_NAME).is_none());
    assert!(provisioning.log().contains(LogLevel::Warn, "from not a uri."));
    assert!(!provisioning.log().contains(LogLevel::Debug, "Auto-negotiating"));
}

#[test]
fn test_account_without_token_is_a_failure() {
    let dir = TempDir::new().unwrap();
    let token_file = dir.path().join("test.token");
    let mut provisioner = MockAccountProvisioner::new();
    provisioner
        .expect_provision_account()
        .times(1)
        .returning(|_, _| Ok(AccountInfo::new(None, Some("/us/test".to_string()))));
    let mut provisioning = provisioning_at(provisioner, token_file.clone());
    let mut context = ConfigContext::new();

    assert_eq!(provisioning.provision(&mut context), ProvisioningOutcome::Failed);
    assert_eq!(context.get_string(properties::API_TOKEN), None);
    assert!(!token_file.exists());
}

#[test]
fn test_token_file_directory_is_skipped() {
    let dir = TempDir::new().unwrap();
    let mut provisioner = MockAccountProvisioner::new();
    provisioner
        .expect_provision_account()
        .times(1)
        .returning(|_, _| Ok(account("abc-def", "/us/test")));
    let mut provisioning = provisioning_at(provisioner, dir.path().to_path_buf());
    let mut context = ConfigContext::new();

    let outcome = provisioning.provision(&mut context);

    assert_eq!(outcome, ProvisioningOutcome::Provisioned);
    assert_eq!(context.get_text(properties::API_TOKEN).as_deref(), Some("abc-def"));
    assert!(!provisioning.log().records().iter().any(|r| r.level == LogLevel::Warn));
    assert!(!provisioning.log().contains(LogLevel::Info, "saved to"));
}

#[test]
fn test_token_file_write_failure_keeps_token() {
    let dir = TempDir::new().unwrap();
    let token_file = dir.path().join("missing").join("test.token");
    let mut provisioner = MockAccountProvisioner::new();
    provisioner
        .expect_provision_account()
        .times(1)
        .returning(|_, _| Ok(account("abc-def", "/us/test")));
    let mut provisioning = provisioning_at(provisioner, token_file);
    let mut context = ConfigContext::new();

    assert_eq!(provisioning.provision(&mut context), ProvisioningOutcome::Provisioned);
    assert_eq!(context.get_text(properties::API_TOKEN).as_deref(), Some("abc-def"));
    assert!(provisioning.log().contains(LogLevel::Warn, "Failed to save Wavefront api token"));
}

#[test]
fn test_unreadable_token_file_falls_back_to_negotiation() {
    let dir = TempDir::new().unwrap();
    let token_file = dir.path().join("test.token");
    fs::write(&token_file, [0xff, 0xfe, 0xfd]).unwrap();
    let mut provisioner = MockAccountProvisioner::new();
    provisioner
        .expect_provision_account()
        .times(1)
        .returning(|_, _| Ok(account("test", "test")));
    let mut provisioning = provisioning_at(provisioner, token_file.clone());
    let mut context = ConfigContext::new();

    assert_eq!(provisioning.provision(&mut context), ProvisioningOutcome::Provisioned);
    assert_eq!(context.get_text(properties::API_TOKEN).as_deref(), Some("test"));
    assert!(provisioning.log().contains(LogLevel::Warn, "Failed to read Wavefront api token"));
    assert_eq!(fs::read_to_string(&token_file).unwrap(), "test");
}

#[test]
fn test_without_token_file_location_negotiates_every_time() {
    let mut provisioner = MockAccountProvisioner::new();
    provisioner
        .expect_provision_account()
        .times(2)
        .returning(|_, _| Ok(account("abc-def", "/us/test")));
    let mut provisioning =
        AccountProvisioning::with_provisioner(provisioner).with_token_file_locator(|| None);

    assert_eq!(provisioning.provision(&mut ConfigContext::new()), ProvisioningOutcome::Provisioned);
    assert_eq!(provisioning.provision(&mut ConfigContext::new()), ProvisioningOutcome::Provisioned);
}

#[test]
fn test_second_run_reuses_saved_token() {
    let dir = TempDir::new().unwrap();
    let token_file = dir.path().join("test.token");
    let mut provisioner = MockAccountProvisioner::new();
    provisioner
        .expect_provision_account()
        .times(1)
        .returning(|_, _| Ok(account("abc-def", "/us/test")));

    let mut first_run = provisioning_at(provisioner, token_file.clone());
    assert_eq!(first_run.provision(&mut ConfigContext::new()), ProvisioningOutcome::Provisioned);

    let mut second_run = provisioning_at(unused_provisioner(), token_file);
    let mut context = ConfigContext::new();
    assert_eq!(second_run.provision(&mut context), ProvisioningOutcome::RestoredFromCache);
    assert_eq!(context.get_text(properties::API_TOKEN).as_deref(), Some("abc-def"));
}

#[test]
fn test_replay_empties_deferred_log() {
    let dir = TempDir::new().unwrap();
    let token_file = dir.path().join("test.token");
    fs::write(&token_file, "abc-def").unwrap();
    let mut provisioning = provisioning_at(unused_provisioner(), token_file);

    provisioning.provision(&mut ConfigContext::new());

    assert!(provisioning.log_mut().replay() > 0);
    assert!(provisioning.log().is_empty());
}
