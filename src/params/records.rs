//! Typed request records.
//!
//! Each record serializes to the field names of its schema and goes through the
//! same normalizer as untyped input, so defaults and required checks stay in
//! one place. `None` fields are left out and pick up the schema default.

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::operations::{self, Operation};

pub trait OperationParams: Serialize {
    fn operation() -> Operation;

    fn to_raw(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SurveyFieldworkStatus {
    pub survey_id: String,
}

impl OperationParams for SurveyFieldworkStatus {
    fn operation() -> Operation {
        operations::SURVEY_FIELDWORK_STATUS
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StartSurveyFieldwork {
    pub survey_id: String,
}

impl OperationParams for StartSurveyFieldwork {
    fn operation() -> Operation {
        operations::START_SURVEY_FIELDWORK
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StopSurveyFieldwork {
    pub survey_id: String,
    /// Sent as given; the service does not document its effect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminate_running_interviews: Option<bool>,
}

impl OperationParams for StopSurveyFieldwork {
    fn operation() -> Operation {
        operations::STOP_SURVEY_FIELDWORK
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetDefaultTexts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation_key: Option<String>,
}

impl OperationParams for GetDefaultTexts {
    fn operation() -> Operation {
        operations::GET_DEFAULT_TEXTS
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetSurveyTranslations {
    pub survey_id: String,
    pub language_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translation_key: Option<String>,
}

impl OperationParams for GetSurveyTranslations {
    fn operation() -> Operation {
        operations::GET_SURVEY_TRANSLATIONS
    }
}

/// Body of both the add and update translation calls.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SurveyTranslation {
    pub survey_id: String,
    pub language_id: String,
    pub name: String,
    pub text: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct AddSurveyTranslations(pub SurveyTranslation);

impl OperationParams for AddSurveyTranslations {
    fn operation() -> Operation {
        operations::ADD_SURVEY_TRANSLATIONS
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct UpdateSurveyTranslations(pub SurveyTranslation);

impl OperationParams for UpdateSurveyTranslations {
    fn operation() -> Operation {
        operations::UPDATE_SURVEY_TRANSLATIONS
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoveSurveyTranslations {
    pub survey_id: String,
    pub language_id: String,
    pub translation_key: String,
}

impl OperationParams for RemoveSurveyTranslations {
    fn operation() -> Operation {
        operations::REMOVE_SURVEY_TRANSLATIONS
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetSurveyLanguages {
    pub survey_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_id: Option<String>,
}

impl OperationParams for GetSurveyLanguages {
    fn operation() -> Operation {
        operations::GET_SURVEY_LANGUAGES
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddSurveyLanguages {
    pub survey_id: String,
    pub name: String,
}

impl OperationParams for AddSurveyLanguages {
    fn operation() -> Operation {
        operations::ADD_SURVEY_LANGUAGES
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateSurveyLanguages {
    pub survey_id: String,
    pub id: String,
    pub name: String,
}

impl OperationParams for UpdateSurveyLanguages {
    fn operation() -> Operation {
        operations::UPDATE_SURVEY_LANGUAGES
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoveSurveyLanguages {
    pub survey_id: String,
    pub language_id: String,
}

impl OperationParams for RemoveSurveyLanguages {
    fn operation() -> Operation {
        operations::REMOVE_SURVEY_LANGUAGES
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetSurveySettings {
    pub survey_id: String,
}

impl OperationParams for GetSurveySettings {
    fn operation() -> Operation {
        operations::GET_SURVEY_SETTINGS
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateSurveySettings {
    pub survey_id: String,
    pub name: String,
    pub value: Value,
}

impl OperationParams for UpdateSurveySettings {
    fn operation() -> Operation {
        operations::UPDATE_SURVEY_SETTINGS
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetSurveyScript {
    pub survey_id: String,
}

impl OperationParams for GetSurveyScript {
    fn operation() -> Operation {
        operations::GET_SURVEY_SCRIPT
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateSurveyScript {
    pub survey_id: String,
    pub script: String,
    pub file_name: String,
}

impl OperationParams for UpdateSurveyScript {
    fn operation() -> Operation {
        operations::UPDATE_SURVEY_SCRIPT
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RequestSurveyData {
    pub survey_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_open_answer_data: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_closed_answer_data: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_test_data: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_para_data: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_captured_media_files: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_var_file: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_questionnaire_script: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_successful: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_rejected: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_not_successful: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_suspended: Option<bool>,
}

impl OperationParams for RequestSurveyData {
    fn operation() -> Operation {
        operations::REQUEST_SURVEY_DATA
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetSurveys {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub survey_id: Option<String>,
}

impl OperationParams for GetSurveys {
    fn operation() -> Operation {
        operations::GET_SURVEYS
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct AddSurveys {
    pub survey_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub survey_type: Option<String>,
}

impl OperationParams for AddSurveys {
    fn operation() -> Operation {
        operations::ADD_SURVEYS
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateSurveys {
    pub survey_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub survey_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl OperationParams for UpdateSurveys {
    fn operation() -> Operation {
        operations::UPDATE_SURVEYS
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct RemoveSurveys {
    pub survey_id: String,
}

impl OperationParams for RemoveSurveys {
    fn operation() -> Operation {
        operations::REMOVE_SURVEYS
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetSurveyPublish {
    pub survey_id: String,
}

impl OperationParams for GetSurveyPublish {
    fn operation() -> Operation {
        operations::GET_SURVEY_PUBLISH
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateSurveyPublish {
    pub survey_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_type: Option<String>,
    /// Sent as given; the service does not document its effect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_upgrade: Option<bool>,
}

impl OperationParams for UpdateSurveyPublish {
    fn operation() -> Operation {
        operations::UPDATE_SURVEY_PUBLISH
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetBackgroundTasks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
}

impl OperationParams for GetBackgroundTasks {
    fn operation() -> Operation {
        operations::GET_BACKGROUND_TASKS
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetInterviewQuality {
    pub survey_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interview_id: Option<String>,
}

impl OperationParams for GetInterviewQuality {
    fn operation() -> Operation {
        operations::GET_INTERVIEW_QUALITY
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateInterviewQuality {
    pub survey_id: String,
    /// INTNR from survey data, zero-padded to 8 characters.
    pub interview_id: String,
    pub new_state: Value,
}

impl OperationParams for UpdateInterviewQuality {
    fn operation() -> Operation {
        operations::UPDATE_INTERVIEW_QUALITY
    }
}
