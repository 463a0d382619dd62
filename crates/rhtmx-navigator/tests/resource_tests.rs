//! Integration tests for link building
//!
//! Covers:
//! - Weak links (raw payload, no validation)
//! - Strong links (typed values, validated when built)
//! - Crawlable marker and display-name links
//! - Custom values rendered through converters

use pretty_assertions::assert_eq;
use rhtmx_navigator::*;
use std::fmt;
use std::str::FromStr;

struct ParamTestPage;

impl Page for ParamTestPage {
    fn declaration() -> PageDeclaration {
        PageDeclaration::of::<Self>()
            .crawlable()
            .with_param(ParamSpec::positional(0).required())
            .with_param(ParamSpec::named("ssn").required())
            .with_param(ParamSpec::named("userId").of_type(ParamType::Long))
            .with_param(ParamSpec::named("note"))
            .with_validator(|params: &BindingResult, _: &str| -> Option<String> {
                match params.long("userId") {
                    Some(id) if id >= 1000 => Some("userId should be below 1000".to_string()),
                    _ => None,
                }
            })
    }
}

struct TicketPage;

impl Page for TicketPage {
    fn declaration() -> PageDeclaration {
        PageDeclaration::of::<Self>()
            .with_param(ParamSpec::positional(0).required())
            .with_param(ParamSpec::named("priority").of_type(ParamType::custom::<Priority>()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Priority {
    Low,
    High,
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority {}", other)),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => f.write_str("low"),
            Priority::High => f.write_str("high"),
        }
    }
}

fn setup() -> (PageRegistry, UriAnalyzer) {
    let registry = PageRegistry::new();
    registry
        .register_pages(vec![ParamTestPage::declaration(), TicketPage::declaration()])
        .unwrap();
    let analyzer = UriAnalyzer::new().with_converter(FromStrConverter::<Priority>::new());
    (registry, analyzer)
}

// ============================================================================
// Weak links
// ============================================================================

#[test]
fn test_weak_link_is_not_validated() {
    let (registry, analyzer) = setup();
    let builder = ResourceBuilder::new(&registry, &analyzer);

    let resource = PageResource::with_payload(ParamTestPage::page_id(), "userId=AAA");

    assert_eq!(builder.url(&resource).unwrap(), "#!paramtest/userId=AAA");
    assert_eq!(builder.fragment(&resource).unwrap(), "paramtest/userId=AAA");
}

#[test]
fn test_weak_link_without_payload() {
    let (registry, analyzer) = setup();
    let builder = ResourceBuilder::new(&registry, &analyzer);

    assert_eq!(builder.url(&PageResource::of::<TicketPage>()).unwrap(), "#ticket");
}

#[test]
fn test_link_to_unregistered_page_fails() {
    let (registry, analyzer) = setup();
    let builder = ResourceBuilder::new(&registry, &analyzer);

    let err = builder
        .url(&PageResource::new("app::GhostPage"))
        .unwrap_err();

    assert_eq!(
        err,
        NavigatorError::Registry(RegistryError::IdentityNotRegistered {
            page: PageId::new("app::GhostPage")
        })
    );
    assert!(!err.is_user_facing());
}

// ============================================================================
// Strong links
// ============================================================================

#[test]
fn test_strong_link_formats_positional_then_named() {
    let (registry, analyzer) = setup();
    let builder = ResourceBuilder::new(&registry, &analyzer);

    let resource = ParamPageResource::with_positional(ParamTestPage::page_id(), "John-Rizzo-Belgium")
        .add_param("ssn", "xxxxxx")
        .add_param("userId", 123i64);

    let link = builder.link(&resource).unwrap();
    assert_eq!(
        link,
        Link {
            page: ParamTestPage::page_id(),
            fragment: "paramtest/John-Rizzo-Belgium/ssn=xxxxxx/userId=123".to_string(),
            href: "#!paramtest/John-Rizzo-Belgium/ssn=xxxxxx/userId=123".to_string(),
        }
    );
}

#[test]
fn test_strong_link_runs_business_validation() {
    let (registry, analyzer) = setup();
    let builder = ResourceBuilder::new(&registry, &analyzer);

    let too_big = ParamPageResource::with_positional(ParamTestPage::page_id(), "John")
        .add_param("ssn", "1")
        .add_param("userId", 1234567890123456789i64);

    assert_eq!(
        builder.url(&too_big).unwrap_err(),
        NavigatorError::Param(ParamError::BusinessValidationError {
            message: "userId should be below 1000".to_string()
        })
    );

    let fine = too_big.add_param("userId", 123i64);
    assert_eq!(builder.url(&fine).unwrap(), "#!paramtest/John/ssn=1/userId=123");
}

#[test]
fn test_add_param_replaces_in_place() {
    let resource = ParamPageResource::new("app::ParamTestPage")
        .add_param("userId", 1i64)
        .add_param("ssn", "x")
        .add_param("userId", 2i64);

    assert_eq!(
        resource.named().to_vec(),
        vec![
            ("userId".to_string(), ParamValue::Long(2)),
            ("ssn".to_string(), ParamValue::from("x")),
        ]
    );
}

#[test]
fn test_strong_link_missing_required_value() {
    let (registry, analyzer) = setup();
    let builder = ResourceBuilder::new(&registry, &analyzer);

    let resource = ParamPageResource::of::<ParamTestPage>().add_param("ssn", "1");

    assert_eq!(
        builder.url(&resource).unwrap_err(),
        NavigatorError::Param(ParamError::MissingRequiredParameter {
            param: "position 0".to_string()
        })
    );
}

#[test]
fn test_strong_link_rejects_undeclared_name() {
    let (registry, analyzer) = setup();
    let builder = ResourceBuilder::new(&registry, &analyzer);

    let resource = ParamPageResource::with_positional(ParamTestPage::page_id(), "John")
        .add_param("ssn", "1")
        .add_param("nickname", "Johnny");

    assert_eq!(
        builder.url(&resource).unwrap_err(),
        NavigatorError::Param(ParamError::UndeclaredParameter {
            page: ParamTestPage::page_id(),
            name: "nickname".to_string()
        })
    );
}

#[test]
fn test_strong_link_checks_text_against_declared_type() {
    let (registry, analyzer) = setup();
    let builder = ResourceBuilder::new(&registry, &analyzer);

    let base = ParamPageResource::with_positional(ParamTestPage::page_id(), "John").add_param("ssn", "1");

    assert_eq!(
        builder.url(&base.clone().add_param("userId", "42")).unwrap(),
        "#!paramtest/John/ssn=1/userId=42"
    );
    assert!(matches!(
        builder.url(&base.add_param("userId", "forty-two")),
        Err(NavigatorError::Param(ParamError::TypeConversionError { .. }))
    ));
}

#[test]
fn test_strong_link_rejects_separator_in_positional_value() {
    let (registry, analyzer) = setup();
    let builder = ResourceBuilder::new(&registry, &analyzer);

    let resource = ParamPageResource::with_positional(ParamTestPage::page_id(), "John/Belgium").add_param("ssn", "1");

    match builder.url(&resource).unwrap_err() {
        NavigatorError::Param(ParamError::TypeConversionError { param, raw, .. }) => {
            assert_eq!(param, "position 0");
            assert_eq!(raw, "John/Belgium");
        }
        other => panic!("expected TypeConversionError, got {:?}", other),
    }
}

#[test]
fn test_strong_link_rejects_equals_in_named_value() {
    let (registry, analyzer) = setup();
    let builder = ResourceBuilder::new(&registry, &analyzer);

    let base = ParamPageResource::with_positional(ParamTestPage::page_id(), "John").add_param("ssn", "1");

    match builder.url(&base.clone().add_param("note", "a=b")).unwrap_err() {
        NavigatorError::Param(ParamError::TypeConversionError { param, raw, .. }) => {
            assert_eq!(param, "note");
            assert_eq!(raw, "a=b");
        }
        other => panic!("expected TypeConversionError, got {:?}", other),
    }
    assert_eq!(
        builder.url(&base.add_param("note", "a-b")).unwrap(),
        "#!paramtest/John/ssn=1/note=a-b"
    );
}

#[test]
fn test_strong_link_with_custom_value() {
    let (registry, analyzer) = setup();
    let builder = ResourceBuilder::new(&registry, &analyzer);

    let resource = ParamPageResource::with_positional(TicketPage::page_id(), "ABC-12")
        .add_param("priority", CustomValue::new(Priority::High));

    assert_eq!(builder.url(&resource).unwrap(), "#ticket/ABC-12/priority=high");
}

#[test]
fn test_custom_value_without_converter_is_unsupported() {
    let (registry, _) = setup();
    let analyzer = UriAnalyzer::new();
    let builder = ResourceBuilder::new(&registry, &analyzer);

    let resource = ParamPageResource::with_positional(TicketPage::page_id(), "ABC-12")
        .add_param("priority", CustomValue::new(Priority::Low));

    assert!(matches!(
        builder.url(&resource),
        Err(NavigatorError::Param(ParamError::UnsupportedParamType { .. }))
    ));
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn test_display_name_links_and_custom_marker() {
    let (registry, analyzer) = setup();
    let builder = ResourceBuilder::new(&registry, &analyzer).with_options(LinkOptions {
        crawlable_marker: "~".to_string(),
        display_name_links: true,
    });

    let resource = PageResource::with_payload(ParamTestPage::page_id(), "John/ssn=1");

    assert_eq!(builder.url(&resource).unwrap(), "#~ParamTest/John/ssn=1");
    assert_eq!(
        builder.url(&PageResource::of::<TicketPage>()).unwrap(),
        "#Ticket"
    );
}
