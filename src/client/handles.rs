use serde_json::{json, Value};

use crate::client::ConnectedClient;
use crate::error::Result;
use crate::operations::{GET_DEFAULT_TEXTS, START_SURVEY_FIELDWORK, STOP_SURVEY_FIELDWORK, SURVEY_FIELDWORK_STATUS};
use crate::transport::{Transport, TransportResponse};

/// `client.survey_fieldwork().stop("12345")`
pub struct SurveyFieldwork<'a, T> {
    client: &'a ConnectedClient<T>,
}

impl<'a, T: Transport> SurveyFieldwork<'a, T> {
    pub(crate) fn new(client: &'a ConnectedClient<T>) -> Self {
        Self { client }
    }

    pub async fn status(&self, params: impl Into<Value>) -> Result<TransportResponse> {
        self.client.call(&SURVEY_FIELDWORK_STATUS, params.into()).await
    }

    pub async fn start(&self, params: impl Into<Value>) -> Result<TransportResponse> {
        self.client.call(&START_SURVEY_FIELDWORK, params.into()).await
    }

    pub async fn stop(&self, params: impl Into<Value>) -> Result<TransportResponse> {
        self.client.call(&STOP_SURVEY_FIELDWORK, params.into()).await
    }
}

pub struct DefaultTexts<'a, T> {
    client: &'a ConnectedClient<T>,
}

impl<'a, T: Transport> DefaultTexts<'a, T> {
    pub(crate) fn new(client: &'a ConnectedClient<T>) -> Self {
        Self { client }
    }

    /// Every default text, or just the one under `translation_key`.
    pub async fn get(&self, translation_key: Option<&str>) -> Result<TransportResponse> {
        self.client
            .call(&GET_DEFAULT_TEXTS, json!({ "TranslationKey": translation_key }))
            .await
    }
}
