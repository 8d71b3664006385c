//! Client side of IssueForge: a typed HTTP client for the issue API and the
//! board state (issue list, filters, edit target) that front ends render.

pub mod api;
pub mod board;
pub mod error;
pub mod form;

pub use api::{HttpIssueApi, IssueApi};
pub use board::{Board, DeleteOutcome, Mutation, StatusFilter};
pub use error::ClientError;
pub use form::{IssueDraft, IssueForm};

pub use issueforge_issue::model::{Issue, IssueId, IssueStatus};
