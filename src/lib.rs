//! # oxidized-agents
//!
//! Quality auditing and consistency checks for AI agent definition files.
//!
//! An agent definition is a Markdown document with a YAML metadata block
//! between `---` delimiters followed by free-form instructions. This crate
//! validates that metadata against a schema, scores the document with
//! heuristic rules, and scans whole documentation trees for schema drift.
//! Reports render as human-readable text, JSON, or [SARIF].
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use oxidized_agents::{audit, config::Config, output};
//!
//! let config = Config::load(None).expect("failed to load config");
//! let report = audit::run_audit(Path::new("agent/reviewer.md"), &config)
//!     .expect("malformed document");
//!
//! let text = output::format_audit(&report, &output::OutputFormat::Pretty);
//! print!("{text}");
//! ```
//!
//! ## Architecture
//!
//! Single-document flow:
//!
//! 1. **[`document`]**: split the file into metadata and body, parse the metadata.
//! 2. **[`validate`]**: check the metadata and body against [`schema`].
//! 3. **[`rules`]**: five heuristic [`rules::Rule`]s, each a table of deductions.
//! 4. **[`score`]**: overall score and risk tier.
//! 5. **[`audit`]**: run the rules in parallel and assemble a [`finding::AuditReport`].
//!
//! Tree-wide flow is handled by [`consistency`]. Both flows share the result
//! types in [`finding`], are configured through [`config`], and are rendered
//! by [`output`].
//!
//! ## Rule groups
//!
//! | Group | Module | Scored |
//! |-------|--------|--------|
//! | `frontmatter_quality` | [`rules::frontmatter`] | yes |
//! | `tool_safety` | [`rules::tool_safety`] | yes |
//! | `instruction_quality` | [`rules::instructions`] | yes |
//! | `security` | [`rules::security`] | yes |
//! | `documentation` | [`rules::documentation`] | yes |
//! | `schema` | [`validate`] | no |
//! | `consistency` | [`consistency`] | no |
//!
//! [SARIF]: https://sarifweb.azurewebsites.net/

pub mod audit;
pub mod config;
pub mod consistency;
pub mod document;
pub mod finding;
pub mod output;
pub mod rules;
pub mod schema;
pub mod score;
pub mod validate;
