// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// faro-pipeline: case storage, the redaction orchestrator, and the two
// tool-layer operations an assistant runtime calls.

pub mod assistant;
pub mod cases;
pub mod orchestrator;
pub mod service;

pub use assistant::{AssistantReply, CaseAssistant, ChatMessage, ChatModel, ContentPart, Role};
pub use cases::{CaseDirectory, CaseStore};
pub use orchestrator::RedactionOrchestrator;
pub use service::{DocumentTools, RedactionService};
