//! Operation catalog
//!
//! Every call the client can make is an `Operation`: an HTTP method, a path
//! template with `{{Field}}` placeholders, the parameter schema the caller's
//! input is normalized against, and how the normalized map becomes a body.

use std::collections::HashSet;

use http::Method;
use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::params::{NormalizedParameters, SchemaRegistry};
use crate::transport::RequestDescriptor;

pub mod template;

use template::{placeholders, render_path};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyMode {
    /// Everything travels in the path.
    None,
    /// The whole normalized map.
    Params,
    /// The normalized map minus fields that already went into the path.
    ParamsWithout(&'static [&'static str]),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operation {
    pub name: &'static str,
    #[serde(with = "http_serde::method")]
    pub method: Method,
    pub path: &'static str,
    pub schema: &'static str,
    pub body: BodyMode,
}

impl Operation {
    /// Turn normalized parameters into the request for this operation.
    pub fn descriptor(&self, params: &NormalizedParameters) -> Result<RequestDescriptor> {
        let path = render_path(self.path, params)?;
        let request = RequestDescriptor::new(self.method.clone(), path);

        let request = match self.body {
            BodyMode::None => request,
            BodyMode::Params => request.with_body(Value::Object(params.clone())),
            BodyMode::ParamsWithout(excluded) => {
                let body = params
                    .iter()
                    .filter(|(key, _)| !excluded.contains(&key.as_str()))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect();
                request.with_body(Value::Object(body))
            }
        };
        Ok(request)
    }
}

macro_rules! operation {
    ($const_name:ident, $name:literal, $method:ident, $path:literal, $body:expr) => {
        pub const $const_name: Operation = Operation {
            name: $name,
            method: Method::$method,
            path: $path,
            schema: $name,
            body: $body,
        };
    };
}

operation!(SIGN_IN, "SignIn", POST, "v1/SignIn", BodyMode::Params);

operation!(SURVEY_FIELDWORK_STATUS, "SurveyFieldworkStatus", GET, "v1/Surveys/{{SurveyId}}/Fieldwork/Status", BodyMode::None);
operation!(START_SURVEY_FIELDWORK, "StartSurveyFieldwork", PUT, "v1/Surveys/{{SurveyId}}/Fieldwork/Start", BodyMode::None);
operation!(STOP_SURVEY_FIELDWORK, "StopSurveyFieldwork", PUT, "v1/Surveys/{{SurveyId}}/Fieldwork/Stop", BodyMode::Params);

operation!(GET_DEFAULT_TEXTS, "GetDefaultTexts", GET, "v1/DefaultTexts/{{TranslationKey}}", BodyMode::None);

operation!(GET_SURVEY_TRANSLATIONS, "GetSurveyTranslations", GET, "v1/Surveys/{{SurveyId}}/Languages/{{LanguageId}}/Translations/{{TranslationKey}}", BodyMode::None);
operation!(ADD_SURVEY_TRANSLATIONS, "AddSurveyTranslations", POST, "v1/Surveys/{{SurveyId}}/Languages/{{LanguageId}}/Translations", BodyMode::Params);
operation!(UPDATE_SURVEY_TRANSLATIONS, "UpdateSurveyTranslations", PUT, "v1/Surveys/{{SurveyId}}/Languages/{{LanguageId}}/Translations", BodyMode::Params);
operation!(REMOVE_SURVEY_TRANSLATIONS, "RemoveSurveyTranslations", DELETE, "v1/Surveys/{{SurveyId}}/Languages/{{LanguageId}}/Translations/{{TranslationKey}}", BodyMode::None);

operation!(GET_SURVEY_LANGUAGES, "GetSurveyLanguages", GET, "v1/Surveys/{{SurveyId}}/Languages/{{LanguageId}}", BodyMode::None);
operation!(ADD_SURVEY_LANGUAGES, "AddSurveyLanguages", POST, "v1/Surveys/{{SurveyId}}/Languages", BodyMode::Params);
operation!(UPDATE_SURVEY_LANGUAGES, "UpdateSurveyLanguages", PUT, "v1/Surveys/{{SurveyId}}/Languages", BodyMode::Params);
operation!(REMOVE_SURVEY_LANGUAGES, "RemoveSurveyLanguages", DELETE, "v1/Surveys/{{SurveyId}}/Languages/{{LanguageId}}", BodyMode::None);

operation!(GET_SURVEY_SETTINGS, "GetSurveySettings", GET, "v1/Surveys/{{SurveyId}}/Settings", BodyMode::None);
operation!(UPDATE_SURVEY_SETTINGS, "UpdateSurveySettings", POST, "v1/Surveys/{{SurveyId}}/Settings", BodyMode::Params);

operation!(GET_SURVEY_SCRIPT, "GetSurveyScript", GET, "v1/Surveys/{{SurveyId}}/Script", BodyMode::None);
operation!(UPDATE_SURVEY_SCRIPT, "UpdateSurveyScript", POST, "v1/Surveys/{{SurveyId}}/Script", BodyMode::Params);

operation!(REQUEST_SURVEY_DATA, "RequestSurveyData", POST, "v1/Surveys/{{SurveyId}}/Data", BodyMode::Params);

operation!(GET_SURVEYS, "GetSurveys", GET, "v1/Surveys/{{SurveyId}}", BodyMode::None);
operation!(ADD_SURVEYS, "AddSurveys", POST, "v1/Surveys", BodyMode::Params);
operation!(UPDATE_SURVEYS, "UpdateSurveys", PATCH, "v1/Surveys/{{SurveyId}}", BodyMode::ParamsWithout(&["SurveyId"]));
operation!(REMOVE_SURVEYS, "RemoveSurveys", DELETE, "v1/Surveys/{{SurveyId}}", BodyMode::None);

operation!(GET_SURVEY_PUBLISH, "GetSurveyPublish", GET, "v1/Surveys/{{SurveyId}}/Publish", BodyMode::None);
operation!(UPDATE_SURVEY_PUBLISH, "UpdateSurveyPublish", PUT, "v1/Surveys/{{SurveyId}}/Publish", BodyMode::Params);

operation!(GET_BACKGROUND_TASKS, "GetBackgroundTasks", GET, "v1/BackgroundTasks/{{TaskId}}", BodyMode::None);

operation!(GET_INTERVIEW_QUALITY, "GetInterviewQuality", GET, "v1/Surveys/{{SurveyId}}/InterviewQuality/{{InterviewId}}", BodyMode::None);
operation!(UPDATE_INTERVIEW_QUALITY, "UpdateInterviewQuality", PUT, "v1/Surveys/{{SurveyId}}/InterviewQuality", BodyMode::Params);

pub static CATALOG: &[Operation] = &[
    SIGN_IN,
    SURVEY_FIELDWORK_STATUS,
    START_SURVEY_FIELDWORK,
    STOP_SURVEY_FIELDWORK,
    GET_DEFAULT_TEXTS,
    GET_SURVEY_TRANSLATIONS,
    ADD_SURVEY_TRANSLATIONS,
    UPDATE_SURVEY_TRANSLATIONS,
    REMOVE_SURVEY_TRANSLATIONS,
    GET_SURVEY_LANGUAGES,
    ADD_SURVEY_LANGUAGES,
    UPDATE_SURVEY_LANGUAGES,
    REMOVE_SURVEY_LANGUAGES,
    GET_SURVEY_SETTINGS,
    UPDATE_SURVEY_SETTINGS,
    GET_SURVEY_SCRIPT,
    UPDATE_SURVEY_SCRIPT,
    REQUEST_SURVEY_DATA,
    GET_SURVEYS,
    ADD_SURVEYS,
    UPDATE_SURVEYS,
    REMOVE_SURVEYS,
    GET_SURVEY_PUBLISH,
    UPDATE_SURVEY_PUBLISH,
    GET_BACKGROUND_TASKS,
    GET_INTERVIEW_QUALITY,
    UPDATE_INTERVIEW_QUALITY,
];

pub fn find(name: &str) -> Option<&'static Operation> {
    CATALOG.iter().find(|operation| operation.name == name)
}

/// Cross-check the catalog against a schema registry: every operation needs
/// its schema, and every path placeholder or excluded body field must be a
/// field of that schema.
pub fn validate_catalog(registry: &SchemaRegistry) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();
    let mut seen = HashSet::new();

    for operation in CATALOG {
        if !seen.insert(operation.name) {
            errors.push(format!("operation '{}' is declared twice", operation.name));
        }

        let schema = match registry.get(operation.schema) {
            Ok(schema) => schema,
            Err(e) => {
                errors.push(format!("operation '{}': {e}", operation.name));
                continue;
            }
        };

        match placeholders(operation.path) {
            Ok(fields) => {
                for field in fields.iter().filter(|f| !schema.has_field(f)) {
                    errors.push(format!(
                        "operation '{}': path placeholder '{field}' is not a field of schema '{}'",
                        operation.name, operation.schema
                    ));
                }
            }
            Err(e) => errors.push(format!("operation '{}': {e}", operation.name)),
        }

        if let BodyMode::ParamsWithout(excluded) = operation.body {
            for field in excluded.iter().filter(|f| !schema.has_field(f)) {
                errors.push(format!(
                    "operation '{}': excluded body field '{field}' is not a field of schema '{}'",
                    operation.name, operation.schema
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
