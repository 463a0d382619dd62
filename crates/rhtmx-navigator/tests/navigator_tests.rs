//! Integration tests for fragment navigation
//!
//! Covers:
//! - Resolving fragments to pages with bound parameters
//! - Home page and unknown page handling
//! - Interceptors
//! - Configuration-driven setup
//! - Logging through tracing

use pretty_assertions::assert_eq;
use rhtmx_navigator::*;
use rstest::rstest;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct DashboardPage;

impl Page for DashboardPage {}

struct ParamTestPage;

impl Page for ParamTestPage {
    fn declaration() -> PageDeclaration {
        PageDeclaration::of::<Self>()
            .crawlable()
            .with_param(ParamSpec::positional(0).required())
            .with_param(ParamSpec::named("ssn").required())
            .with_param(ParamSpec::named("userId").of_type(ParamType::Long))
    }
}

struct AdminPage;

impl Page for AdminPage {}

fn pages() -> Vec<PageDeclaration> {
    vec![
        DashboardPage::declaration(),
        ParamTestPage::declaration(),
        AdminPage::declaration(),
    ]
}

fn navigator() -> Navigator {
    let navigator = Navigator::new();
    navigator.register_pages(pages()).unwrap();
    navigator
}

// ============================================================================
// Resolution
// ============================================================================

#[rstest]
#[case("#!paramtest/John/ssn=1/userId=2")]
#[case("#paramtest/John/userId=2/ssn=1")]
#[case("ParamTest/John/ssn=1/userId=2/")]
#[case("/PARAMTEST/John/ssn=1/userId=2")]
fn test_navigate_binds_parameters(#[case] fragment: &str) {
    let outcome = navigator().navigate(fragment).unwrap();
    let nav = outcome.navigation().unwrap();

    assert_eq!(nav.page, ParamTestPage::page_id());
    assert_eq!(nav.fragment, fragment);
    assert_eq!(nav.params.text(0), Some("John"));
    assert_eq!(nav.params.text("ssn"), Some("1"));
    assert_eq!(nav.params.long("userId"), Some(2));
}

#[test]
fn test_navigate_reports_first_parameter_problem() {
    let err = navigator().navigate("#!paramtest/userId=AAA").unwrap_err();

    assert!(err.is_user_facing());
    assert_eq!(
        err,
        NavigatorError::Param(ParamError::MissingRequiredParameter {
            param: "position 0".to_string()
        })
    );
}

#[rstest]
#[case("")]
#[case("#")]
#[case("#!")]
#[case("/")]
fn test_empty_fragment_goes_home(#[case] fragment: &str) {
    let outcome = navigator().navigate(fragment).unwrap();

    assert_eq!(outcome.navigation().map(|n| n.page.clone()), Some(DashboardPage::page_id()));
}

#[test]
fn test_empty_fragment_without_pages_is_not_found() {
    let outcome = Navigator::new().navigate("").unwrap();

    assert!(matches!(
        outcome,
        NavigationOutcome::NotFound { ref requested, fallback: None } if requested.is_empty()
    ));
}

#[test]
fn test_unknown_page_falls_back_to_home() {
    let outcome = navigator().navigate("#nothere/1").unwrap();

    match outcome {
        NavigationOutcome::NotFound { requested, fallback } => {
            assert_eq!(requested, "nothere");
            assert_eq!(fallback, Some(DashboardPage::page_id()));
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_unknown_page_rejected_by_policy() {
    let config = NavigatorConfig {
        not_found: NotFoundPolicy::Reject,
        ..Default::default()
    };
    let navigator = Navigator::from_config(config, pages()).unwrap();

    assert!(matches!(
        navigator.navigate("#nothere").unwrap(),
        NavigationOutcome::NotFound { fallback: None, .. }
    ));
}

#[test]
fn test_bind_into_from_navigation() {
    #[derive(Default)]
    struct Fields {
        name: Option<String>,
        user_id: Option<i64>,
    }

    impl ParamTarget for Fields {
        fn assign(&mut self, spec: &ParamSpec, value: Option<&ParamValue>) {
            match spec.name() {
                Some("userId") => self.user_id = value.and_then(ParamValue::as_long),
                Some(_) => {}
                None => self.name = value.and_then(ParamValue::as_str).map(str::to_string),
            }
        }
    }

    let outcome = navigator().navigate("#!paramtest/John/ssn=1/userId=7").unwrap();
    let mut fields = Fields::default();
    outcome.navigation().unwrap().bind_into(&mut fields);

    assert_eq!(fields.name.as_deref(), Some("John"));
    assert_eq!(fields.user_id, Some(7));
}

// ============================================================================
// Links round trip
// ============================================================================

#[test]
fn test_url_for_then_navigate() {
    let navigator = navigator();
    let resource = ParamPageResource::with_positional(ParamTestPage::page_id(), "John-Rizzo-Belgium")
        .add_param("userId", 123i64)
        .add_param("ssn", "xxxxxx");

    let url = navigator.url_for(&resource).unwrap();
    assert_eq!(url, "#!paramtest/John-Rizzo-Belgium/userId=123/ssn=xxxxxx");

    let outcome = navigator.navigate(&url).unwrap();
    let nav = outcome.navigation().unwrap();
    assert_eq!(nav.payload, "John-Rizzo-Belgium/userId=123/ssn=xxxxxx");
    assert_eq!(nav.params.long("userId"), Some(123));
}

#[test]
fn test_display_name_links_still_resolve() {
    let config = NavigatorConfig {
        display_name_links: true,
        ..Default::default()
    };
    let navigator = Navigator::from_config(config, pages()).unwrap();

    let link = navigator.link_for(&PageResource::of::<AdminPage>()).unwrap();
    assert_eq!(link.href, "#Admin");
    assert_eq!(
        navigator.navigate(&link.href).unwrap().navigation().map(|n| n.page.clone()),
        Some(AdminPage::page_id())
    );
}

// ============================================================================
// Interceptors
// ============================================================================

struct RequireLogin {
    calls: Arc<AtomicUsize>,
}

impl Interceptor for RequireLogin {
    fn name(&self) -> &str {
        "require-login"
    }

    fn intercept(&self, event: &NavigationEvent<'_>) -> InterceptOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if event.descriptor.uri_key() == "admin" {
            InterceptOutcome::Handled
        } else {
            InterceptOutcome::Continue
        }
    }
}

struct CountingInterceptor {
    calls: Arc<AtomicUsize>,
}

impl Interceptor for CountingInterceptor {
    fn intercept(&self, _event: &NavigationEvent<'_>) -> InterceptOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        InterceptOutcome::Continue
    }
}

#[test]
fn test_interceptor_short_circuits_chain() {
    let first = Arc::new(AtomicUsize::new(0));
    let second = Arc::new(AtomicUsize::new(0));
    let navigator = Navigator::new()
        .with_interceptor(RequireLogin {
            calls: Arc::clone(&first),
        })
        .with_interceptor(CountingInterceptor {
            calls: Arc::clone(&second),
        });
    navigator.register_pages(pages()).unwrap();

    match navigator.navigate("#admin").unwrap() {
        NavigationOutcome::Intercepted { page, interceptor } => {
            assert_eq!(page, AdminPage::page_id());
            assert_eq!(interceptor, "require-login");
        }
        other => panic!("expected Intercepted, got {:?}", other),
    }
    assert_eq!(first.load(Ordering::SeqCst), 1);
    assert_eq!(second.load(Ordering::SeqCst), 0);

    assert!(navigator.navigate("#dashboard").unwrap().is_activated());
    assert_eq!(first.load(Ordering::SeqCst), 2);
    assert_eq!(second.load(Ordering::SeqCst), 1);
}

#[test]
fn test_interceptors_skip_navigations_with_bad_parameters() {
    let calls = Arc::new(AtomicUsize::new(0));
    let navigator = Navigator::new().with_interceptor(CountingInterceptor {
        calls: Arc::clone(&calls),
    });
    navigator.register_pages(pages()).unwrap();

    assert!(navigator.navigate("#paramtest").is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_default_interceptor_name_is_type_name() {
    let interceptor = CountingInterceptor {
        calls: Arc::new(AtomicUsize::new(0)),
    };
    assert!(interceptor.name().ends_with("CountingInterceptor"));
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_from_config_applies_home_page() {
    let config = NavigatorConfig::from_toml_str(
        r#"
        [navigator]
        home_page = "PARAMTEST"
        "#,
    )
    .unwrap();
    let navigator = Navigator::from_config(config, vec![DashboardPage::declaration(), AdminPage::declaration()]);
    assert!(matches!(
        navigator.unwrap_err(),
        NavigatorError::Registry(RegistryError::UnknownUriKey { .. })
    ));

    let config = NavigatorConfig {
        home_page: Some("Admin".to_string()),
        ..Default::default()
    };
    let navigator = Navigator::from_config(config, pages()).unwrap();
    assert_eq!(navigator.registry().home_page_id(), Some(AdminPage::page_id()));
}

#[test]
fn test_batch_policy_follows_config() {
    let clashing = || {
        vec![
            DashboardPage::declaration(),
            PageDeclaration::new("other::DashboardPage"),
        ]
    };

    let sequential = Navigator::new();
    assert!(sequential.register_pages(clashing()).is_err());
    assert_eq!(sequential.registry().len(), 1);

    let atomic = Navigator::new().with_config(NavigatorConfig {
        atomic_batch_registration: true,
        ..Default::default()
    });
    assert!(atomic.register_pages(clashing()).is_err());
    assert!(atomic.registry().is_empty());
}

#[test]
fn test_page_name_starting_with_configured_marker_is_rejected() {
    let navigator = Navigator::new().with_config(NavigatorConfig {
        crawlable_marker: "~".to_string(),
        ..Default::default()
    });

    let err = navigator
        .register_pages(vec![
            DashboardPage::declaration(),
            PageDeclaration::new("app::NewsPage").with_uri_name("~news"),
        ])
        .unwrap_err();

    assert_eq!(
        err,
        RegistryError::InvalidUriName {
            page: PageId::new("app::NewsPage"),
            uri_name: "~news".to_string(),
        }
    );
    assert!(navigator.registry().is_empty());
}

#[test]
fn test_shared_registry() {
    let registry = Arc::new(PageRegistry::new());
    let a = Navigator::new().with_registry(Arc::clone(&registry));
    let b = Navigator::new().with_registry(Arc::clone(&registry));

    a.register_pages(pages()).unwrap();

    assert!(b.navigate("#dashboard").unwrap().is_activated());
}

// ============================================================================
// Logging
// ============================================================================

#[test]
fn test_navigation_with_subscriber_installed() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let navigator = navigator();
        assert!(navigator.navigate("#dashboard").unwrap().is_activated());
        assert!(navigator.navigate("#paramtest/userId=x").is_err());
        assert!(matches!(
            navigator.navigate("#nothere").unwrap(),
            NavigationOutcome::NotFound { .. }
        ));
    });
}
