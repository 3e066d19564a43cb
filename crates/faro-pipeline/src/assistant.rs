// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Assistant turn: one stateless request/response against a multimodal chat
// model. The model only ever sees the redacted artifact's pages.

use std::path::Path;

use chrono::{Local, NaiveDate};
use faro_core::error::Result;
use faro_core::human_errors::{GENERIC_APOLOGY, humanize_error};
use faro_core::{CaseId, EncodedPage};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::service::DocumentTools;

pub const DEFAULT_INSTRUCTION: &str = "Analiza este documento y entregame el análisis";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// One block of message content, in the shape multimodal chat APIs accept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentPart {
    Text {
        text: String,
    },
    Image {
        source_type: &'static str,
        data: String,
        mime_type: String,
    },
}

impl From<EncodedPage> for ContentPart {
    fn from(page: EncodedPage) -> Self {
        ContentPart::Image {
            source_type: "base64",
            data: page.data,
            mime_type: page.mime_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: Vec<ContentPart>,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: vec![ContentPart::Text { text: text.into() }],
        }
    }
}

/// Backend that turns a message list into reply text.
pub trait ChatModel: Send + Sync {
    fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssistantReply {
    pub text: String,
    pub case_id: Option<CaseId>,
}

pub struct CaseAssistant {
    tools: Box<dyn DocumentTools>,
    model: Box<dyn ChatModel>,
    system_template: String,
}

impl CaseAssistant {
    pub fn new(
        tools: Box<dyn DocumentTools>,
        model: Box<dyn ChatModel>,
        system_template: impl Into<String>,
    ) -> Self {
        Self {
            tools,
            model,
            system_template: system_template.into(),
        }
    }

    /// Answer one turn. Failures are logged and answered with the generic
    /// apology.
    #[instrument(skip_all, fields(has_document = document.is_some()))]
    pub fn respond(&self, document: Option<&Path>, instruction: Option<&str>) -> AssistantReply {
        let case_id = document.and_then(|path| match CaseId::from_document(path) {
            Ok(id) => Some(id),
            Err(err) => {
                warn!(error = %err, "Document has no usable case name");
                None
            }
        });

        match self.turn(document, instruction, case_id.as_ref()) {
            Ok(text) => {
                info!(chars = text.chars().count(), "Assistant reply ready");
                AssistantReply { text, case_id }
            }
            Err(err) => {
                let human = humanize_error(&err);
                error!(
                    error = %err,
                    stage = err.stage().unwrap_or("model"),
                    severity = ?human.severity,
                    "Assistant turn failed"
                );
                AssistantReply {
                    text: GENERIC_APOLOGY.to_string(),
                    case_id,
                }
            }
        }
    }

    fn turn(
        &self,
        document: Option<&Path>,
        instruction: Option<&str>,
        case_id: Option<&CaseId>,
    ) -> Result<String> {
        let file_name = case_id.map(CaseId::as_str).unwrap_or("");
        let system = render_system_prompt(&self.system_template, Local::now().date_naive(), file_name);
        let instruction = instruction
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_INSTRUCTION);

        let mut content = vec![ContentPart::Text {
            text: instruction.to_string(),
        }];
        if let Some(path) = document {
            let redacted = self.tools.redact(path)?;
            let pages = self.tools.encode_pages_as_images(&redacted)?;
            content.extend(pages.into_iter().map(ContentPart::from));
        }

        let messages = [
            ChatMessage::system(system),
            ChatMessage {
                role: Role::User,
                content,
            },
        ];
        self.model.complete(&messages)
    }
}

/// Fill `{today}` and `{file_name}` in a system prompt template.
pub fn render_system_prompt(template: &str, today: NaiveDate, file_name: &str) -> String {
    template
        .replace("{today}", &today.format("%Y-%m-%d").to_string())
        .replace("{file_name}", file_name)
}
