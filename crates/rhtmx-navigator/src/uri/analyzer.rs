//! Parameter analysis: fragment payload → typed, validated parameters, and back

use tracing::debug;

use crate::error::ParamError;
use crate::fragment::{is_token_safe, KEY_VALUE_SEPARATOR, SEPARATOR};
use crate::page::PageId;
use crate::param::{ParamKey, ParamSpec, ParamType, ParamValue};

use super::binding::{BindingResult, BoundParam, ExtraValidator};
use super::convert::{Conversion, ConverterChain, ParamConverter};
use super::entity::EntityResolver;
use super::parsed::ParsedUri;

/// Converts fragment payloads into [`BindingResult`]s, and formats
/// parameter values back into payloads
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::{ParamSpec, ParamType, UriAnalyzer};
///
/// let specs = vec![
///     ParamSpec::positional(0).required(),
///     ParamSpec::named("ssn").required(),
///     ParamSpec::named("userId").of_type(ParamType::Long),
/// ];
///
/// let analyzer = UriAnalyzer::new();
/// let bound = analyzer.bind(&specs, "John-Rizzo-Belgium/userId=123/ssn=xxxxxx", None).unwrap();
///
/// assert_eq!(bound.text(0), Some("John-Rizzo-Belgium"));
/// assert_eq!(bound.text("ssn"), Some("xxxxxx"));
/// assert_eq!(bound.long("userId"), Some(123));
/// ```
#[derive(Debug, Clone, Default)]
pub struct UriAnalyzer {
    converters: ConverterChain,
}

impl UriAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_converters(converters: ConverterChain) -> Self {
        Self { converters }
    }

    /// Appends a converter for custom parameter types (functional builder)
    pub fn with_converter(mut self, converter: impl ParamConverter + 'static) -> Self {
        self.converters.push(converter);
        self
    }

    pub fn converters(&self) -> &ConverterChain {
        &self.converters
    }

    pub fn parse(&self, payload: &str) -> ParsedUri {
        ParsedUri::parse(payload)
    }

    /// Matches, converts and validates `payload` against `specs`
    ///
    /// Every spec is processed and every structural failure recorded.
    /// `validator` only runs when all of them passed; a non-blank message
    /// becomes a `BusinessValidationError`.
    pub fn analyze(
        &self,
        specs: &[ParamSpec],
        payload: &str,
        validator: Option<&dyn ExtraValidator>,
    ) -> BindingResult {
        let parsed = self.parse(payload);

        let (params, failures) = specs.iter().fold(
            (Vec::with_capacity(specs.len()), Vec::new()),
            |(mut params, mut failures), spec| {
                let raw = matching_token(&parsed, spec);
                let value = match raw {
                    None => {
                        if spec.is_required() {
                            failures.push(ParamError::MissingRequiredParameter {
                                param: spec.label(),
                            });
                        }
                        None
                    }
                    Some(raw) => match self.convert_value(spec, raw, payload) {
                        Ok(value) => Some(value),
                        Err(err) => {
                            failures.push(err);
                            None
                        }
                    },
                };
                params.push(BoundParam {
                    spec: spec.clone(),
                    raw: raw.map(str::to_string),
                    value,
                });
                (params, failures)
            },
        );

        let mut result = BindingResult::new(params, failures);

        if result.is_valid() {
            if let Some(validator) = validator {
                let message = validator
                    .extra_validate(&result, payload)
                    .filter(|message| !message.trim().is_empty());
                if let Some(message) = message {
                    result.push_failure(ParamError::BusinessValidationError { message });
                }
            }
        }

        debug!(
            payload,
            tokens = parsed.len(),
            failures = result.failures().len(),
            "analyzed fragment payload"
        );

        result
    }

    /// [`analyze`](Self::analyze), surfacing only the first failure
    pub fn bind(
        &self,
        specs: &[ParamSpec],
        payload: &str,
        validator: Option<&dyn ExtraValidator>,
    ) -> Result<BindingResult, ParamError> {
        self.analyze(specs, payload, validator).into_result()
    }

    /// Converts one raw token to the spec's declared type
    pub fn convert_value(
        &self,
        spec: &ParamSpec,
        raw: &str,
        fragment: &str,
    ) -> Result<ParamValue, ParamError> {
        let ty = spec.param_type();
        match ty {
            ParamType::Text => Ok(ParamValue::Text(raw.to_string())),
            ParamType::Int => raw
                .parse::<i32>()
                .map(ParamValue::Int)
                .map_err(|_| ParamError::conversion(spec.label(), raw, ty.name())),
            ParamType::Long => raw
                .parse::<i64>()
                .map(ParamValue::Long)
                .map_err(|_| ParamError::conversion(spec.label(), raw, ty.name())),
            ParamType::Custom(key) => match self.converters.convert(&key, raw, fragment) {
                Conversion::Converted(value) => Ok(ParamValue::Custom(value)),
                Conversion::Rejected(detail) => Err(ParamError::TypeConversionError {
                    param: spec.label(),
                    raw: raw.to_string(),
                    target: ty.name().to_string(),
                    detail: Some(detail),
                }),
                Conversion::NotHandled => Err(ParamError::UnsupportedParamType {
                    param: spec.label(),
                    type_name: key.name().to_string(),
                }),
            },
        }
    }

    /// Fragment text of a value, as declared by `spec`
    ///
    /// A value of another type than declared is accepted only if its text
    /// converts to the declared type. Text holding the separator or `=` is
    /// rejected: it would read back as other tokens.
    pub fn value_to_fragment(
        &self,
        spec: &ParamSpec,
        value: &ParamValue,
    ) -> Result<String, ParamError> {
        let text = match value {
            ParamValue::Custom(custom) => {
                self.converters
                    .to_fragment(custom)
                    .ok_or_else(|| ParamError::UnsupportedParamType {
                        param: spec.label(),
                        type_name: custom.type_key().name().to_string(),
                    })?
            }
            primitive => primitive.primitive_text().unwrap_or_default(),
        };

        if !is_token_safe(&text) {
            return Err(ParamError::TypeConversionError {
                param: spec.label(),
                raw: text,
                target: spec.param_type().name().to_string(),
                detail: Some(format!(
                    "`{}` and `{}` cannot appear in a link value",
                    SEPARATOR, KEY_VALUE_SEPARATOR
                )),
            });
        }

        if !value.matches_type(&spec.param_type()) {
            self.convert_value(spec, &text, "")?;
        }

        Ok(text)
    }

    /// Builds a payload from typed values
    ///
    /// The positional value comes first (it needs a spec at position 0),
    /// then named values in the order given, as `key=value`.
    pub fn format(
        &self,
        page: &PageId,
        specs: &[ParamSpec],
        positional: Option<&ParamValue>,
        named: &[(String, ParamValue)],
    ) -> Result<String, ParamError> {
        let mut tokens = Vec::with_capacity(named.len() + 1);

        if let Some(value) = positional {
            let spec = specs
                .iter()
                .find(|s| s.position() == Some(0))
                .ok_or_else(|| ParamError::UndeclaredParameter {
                    page: page.clone(),
                    name: "position 0".to_string(),
                })?;
            tokens.push(self.value_to_fragment(spec, value)?);
        }

        for (name, value) in named {
            let spec = specs
                .iter()
                .find(|s| s.name() == Some(name.as_str()))
                .ok_or_else(|| ParamError::UndeclaredParameter {
                    page: page.clone(),
                    name: name.clone(),
                })?;
            let text = self.value_to_fragment(spec, value)?;
            tokens.push(format!("{}={}", name, text));
        }

        Ok(tokens.join(&SEPARATOR.to_string()))
    }

    // ========================================================================
    // Manual read helpers
    // ========================================================================
    //
    // Single-field equivalents of `analyze`, for pages that read their
    // parameters by hand instead of declaring them.

    fn read(
        &self,
        payload: &str,
        key: ParamKey,
        ty: ParamType,
        required: bool,
    ) -> Result<Option<ParamValue>, ParamError> {
        let spec = match key {
            ParamKey::Position(pos) => ParamSpec::positional(pos),
            ParamKey::Name(name) => ParamSpec::named(name),
        }
        .of_type(ty);
        let spec = if required { spec.required() } else { spec };

        let bound = self.bind(std::slice::from_ref(&spec), payload, None)?;
        Ok(bound.params().first().and_then(|p| p.value.clone()))
    }

    fn read_mandatory(
        &self,
        payload: &str,
        key: ParamKey,
        ty: ParamType,
    ) -> Result<ParamValue, ParamError> {
        let label = key.to_string();
        self.read(payload, key, ty, true)?
            .ok_or(ParamError::MissingRequiredParameter { param: label })
    }

    pub fn get_string(&self, payload: &str, key: impl Into<ParamKey>) -> Option<String> {
        let parsed = self.parse(payload);
        raw_for_key(&parsed, &key.into()).map(str::to_string)
    }

    pub fn get_mandatory_string(
        &self,
        payload: &str,
        key: impl Into<ParamKey>,
    ) -> Result<String, ParamError> {
        self.read_mandatory(payload, key.into(), ParamType::Text)
            .map(|v| v.as_str().unwrap_or_default().to_string())
    }

    pub fn get_int(&self, payload: &str, key: impl Into<ParamKey>) -> Result<Option<i32>, ParamError> {
        Ok(self
            .read(payload, key.into(), ParamType::Int, false)?
            .and_then(|v| v.as_int()))
    }

    pub fn get_mandatory_int(&self, payload: &str, key: impl Into<ParamKey>) -> Result<i32, ParamError> {
        let key = key.into();
        let label = key.to_string();
        self.read_mandatory(payload, key, ParamType::Int)?
            .as_int()
            .ok_or(ParamError::MissingRequiredParameter { param: label })
    }

    pub fn get_long(&self, payload: &str, key: impl Into<ParamKey>) -> Result<Option<i64>, ParamError> {
        Ok(self
            .read(payload, key.into(), ParamType::Long, false)?
            .and_then(|v| v.as_long()))
    }

    pub fn get_mandatory_long(&self, payload: &str, key: impl Into<ParamKey>) -> Result<i64, ParamError> {
        let key = key.into();
        let label = key.to_string();
        self.read_mandatory(payload, key, ParamType::Long)?
            .as_long()
            .ok_or(ParamError::MissingRequiredParameter { param: label })
    }

    /// Entity whose key sits at `key`; `None` if the key is absent or unknown
    pub fn get_entity<R: EntityResolver>(
        &self,
        resolver: &R,
        payload: &str,
        key: impl Into<ParamKey>,
    ) -> Option<R::Entity> {
        let parsed = self.parse(payload);
        raw_for_key(&parsed, &key.into()).and_then(|raw| resolver.resolve(raw))
    }

    /// Entity whose key sits at `key`; a missing key or an unknown entity
    /// is an error.
    pub fn get_mandatory_entity<R: EntityResolver>(
        &self,
        resolver: &R,
        payload: &str,
        key: impl Into<ParamKey>,
    ) -> Result<R::Entity, ParamError> {
        let key = key.into();
        let raw = self.get_mandatory_string(payload, key.clone())?;
        let target = crate::param::TypeKey::of::<R::Entity>();
        resolver
            .resolve(&raw)
            .ok_or_else(|| ParamError::TypeConversionError {
                param: key.to_string(),
                raw: raw.clone(),
                target: target.simple_name().to_string(),
                detail: Some(format!("no {} found", target.simple_name())),
            })
    }
}

/// Token for a spec: a named token matching its name wins, else the
/// positional token at its position.
fn matching_token<'a>(parsed: &'a ParsedUri, spec: &ParamSpec) -> Option<&'a str> {
    spec.name()
        .and_then(|name| parsed.named(name))
        .or_else(|| spec.position().and_then(|pos| parsed.positional(pos)))
}

fn raw_for_key<'a>(parsed: &'a ParsedUri, key: &ParamKey) -> Option<&'a str> {
    match key {
        ParamKey::Position(pos) => parsed.positional(*pos),
        ParamKey::Name(name) => parsed.named(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param_test_specs() -> Vec<ParamSpec> {
        vec![
            ParamSpec::positional(0).required(),
            ParamSpec::named("ssn").required(),
            ParamSpec::named("userId").of_type(ParamType::Long),
        ]
    }

    #[test]
    fn test_optional_missing_is_absent_without_failure() {
        let bound = UriAnalyzer::new()
            .bind(&param_test_specs(), "abc/ssn=1", None)
            .unwrap();
        assert_eq!(bound.long("userId"), None);
        assert!(bound.is_valid());
    }

    #[test]
    fn test_int_overflow_is_conversion_error() {
        let specs = vec![ParamSpec::named("n").of_type(ParamType::Int)];
        let err = UriAnalyzer::new().bind(&specs, "n=3000000000", None).unwrap_err();
        assert!(matches!(err, ParamError::TypeConversionError { ref raw, .. } if raw == "3000000000"));
    }

    #[test]
    fn test_validator_skipped_after_structural_failure() {
        let called = std::sync::atomic::AtomicBool::new(false);
        let validator = |_: &BindingResult, _: &str| -> Option<String> {
            called.store(true, std::sync::atomic::Ordering::SeqCst);
            None
        };
        let result = UriAnalyzer::new().analyze(&param_test_specs(), "", Some(&validator));
        assert!(!result.is_valid());
        assert!(!called.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[test]
    fn test_blank_validator_message_is_not_a_failure() {
        let validator = |_: &BindingResult, _: &str| Some("  ".to_string());
        let result = UriAnalyzer::new().analyze(&param_test_specs(), "a/ssn=1", Some(&validator));
        assert!(result.is_valid());
    }

    #[test]
    fn test_spec_with_name_and_position_prefers_named_token() {
        let specs = vec![ParamSpec::positional(0).with_name("code")];
        let analyzer = UriAnalyzer::new();
        assert_eq!(analyzer.bind(&specs, "A/code=B", None).unwrap().text(0), Some("B"));
        assert_eq!(analyzer.bind(&specs, "A", None).unwrap().text("code"), Some("A"));
    }
}
