// Use case wiring: load a parse tree from a source, decode it, and walk it.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::domain::{AncestryStack, LeafValue, TreeWalker, WalkOptions};
use crate::infrastructure::parse_document;
use crate::ports::ParseTreeSource;

/// One leaf delivered by the walker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeafRecord {
    /// Ancestor tag labels, root first.
    pub ancestry: Vec<String>,
    /// The leaf's own `node` tag, when it carries a well-formed one.
    pub node: Option<String>,
}

/// Every leaf of a tree, in traversal order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeafReport {
    pub leaves: Vec<LeafRecord>,
}

impl LeafReport {
    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// One line per leaf: `PROG > FUNC :: ASSIGN`.
    pub fn to_text(&self) -> String {
        self.leaves
            .iter()
            .map(|leaf| {
                format!(
                    "{} :: {}",
                    leaf.ancestry.join(" > "),
                    leaf.node.as_deref().unwrap_or("?")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Result of one analysis run.
#[derive(Debug)]
pub struct Analysis {
    pub document: Value,
    pub report: LeafReport,
}

/// Walk the leaves of an already-decoded document.
pub fn collect_leaves(document: &Value, options: WalkOptions) -> crate::domain::TreeResult<LeafReport> {
    let mut report = LeafReport::default();
    let mut stack = AncestryStack::new();
    let mut record = |leaf: LeafValue<'_>, ancestry: &AncestryStack<'_>| {
        report.leaves.push(LeafRecord {
            ancestry: ancestry.labels(),
            node: leaf.tag().map(|tag| tag.label()),
        });
    };
    TreeWalker::new(options).walk(document, &mut record, &mut stack)?;
    Ok(report)
}

pub struct AnalyzeUsecase<'a> {
    pub source: &'a dyn ParseTreeSource,
    pub options: WalkOptions,
}

impl<'a> AnalyzeUsecase<'a> {
    pub fn run(&self) -> Result<Analysis> {
        let description = self.source.describe();
        info!(source = %description, "loading parse tree");

        let text = self
            .source
            .load_parse_tree()
            .with_context(|| format!("failed to load parse tree from {}", description))?;
        let document = parse_document(&text)
            .with_context(|| format!("failed to decode parse tree from {}", description))?;

        let report = collect_leaves(&document, self.options).context("failed to walk parse tree")?;
        debug!(leaves = report.len(), "walk complete");

        Ok(Analysis { document, report })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::BridgeError;
    use serde_json::json;

    struct InMemorySource(&'static str);

    impl ParseTreeSource for InMemorySource {
        fn describe(&self) -> String {
            "in-memory tree".to_string()
        }

        fn load_parse_tree(&self) -> std::result::Result<String, BridgeError> {
            Ok(self.0.to_string())
        }
    }

    struct FailingSource;

    impl ParseTreeSource for FailingSource {
        fn describe(&self) -> String {
            "failing frontend".to_string()
        }

        fn load_parse_tree(&self) -> std::result::Result<String, BridgeError> {
            Err(BridgeError::FrontendFailed {
                module: "xion".to_string(),
                code: Some(1),
                stderr: "SyntaxError: unexpected token".to_string(),
            })
        }
    }

    #[test]
    fn test_collect_leaves() {
        let doc = json!({
            "node": "PROG",
            "root": "PROG",
            "left": [{"node": "ASSIGN"}, {"node": ["CALL", "EXTRN"]}],
            "right": {"label": "unnamed"}
        });
        let report = collect_leaves(&doc, WalkOptions::default()).unwrap();
        assert_eq!(report.len(), 3);
        assert_eq!(report.leaves[0].node.as_deref(), Some("ASSIGN"));
        assert_eq!(report.leaves[1].node.as_deref(), Some("CALL/EXTRN"));
        assert_eq!(report.leaves[2].node, None);
        assert_eq!(report.to_text(), "PROG :: ASSIGN\nPROG :: CALL/EXTRN\nPROG :: ?");
    }

    #[test]
    fn test_run_in_memory() {
        let source = InMemorySource(r#"{"node":"PROG","root":"PROG","left":{"node":"ASSIGN","root":"ASSIGN"},"right":null}"#);
        let usecase = AnalyzeUsecase {
            source: &source,
            options: WalkOptions::default(),
        };
        let analysis = usecase.run().unwrap();
        assert_eq!(analysis.report.leaves[0].ancestry, vec!["PROG"]);
        assert_eq!(analysis.document["node"], "PROG");
    }

    #[test]
    fn test_run_surfaces_frontend_message() {
        let usecase = AnalyzeUsecase {
            source: &FailingSource,
            options: WalkOptions::default(),
        };
        let err = usecase.run().unwrap_err();
        let chain = format!("{:#}", err);
        assert!(chain.contains("failing frontend"));
        assert!(chain.contains("SyntaxError: unexpected token"));
    }

    #[test]
    fn test_run_reports_malformed_tree() {
        let source = InMemorySource(r#"{"node":true,"root":"PROG"}"#);
        let usecase = AnalyzeUsecase {
            source: &source,
            options: WalkOptions::default(),
        };
        let err = usecase.run().unwrap_err();
        let tree_err = err.downcast_ref::<crate::domain::TreeError>().unwrap();
        assert_eq!(tree_err.field(), Some(crate::domain::Field::Node));
    }
}
