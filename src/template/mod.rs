//! Documentation skeleton generation
//!
//! Each generator inspects a [`SourceDocument`] and returns an [`EditPlan`]
//! of comment blocks to insert, computed against the unmodified text. The
//! caller applies the plan as a single edit.

pub mod contract;
pub mod header;
pub mod structdoc;

pub use contract::generate_contracts;
pub use header::{generate_header, today};
pub use structdoc::generate_struct_docs;

use crate::document::SourceDocument;
use crate::edit::EditPlan;
use std::fmt;

/// Which skeleton to generate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Header,
    Contracts,
    Structs,
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateKind::Header => write!(f, "header"),
            TemplateKind::Contracts => write!(f, "contracts"),
            TemplateKind::Structs => write!(f, "structs"),
        }
    }
}

impl std::str::FromStr for TemplateKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "header" => Ok(TemplateKind::Header),
            "contracts" | "contract" => Ok(TemplateKind::Contracts),
            "structs" | "struct" => Ok(TemplateKind::Structs),
            _ => Err(format!("Unknown template: {}", s)),
        }
    }
}

/// Outcome of one generation pass
#[derive(Debug, Clone)]
pub struct GenerationReport {
    pub kind: TemplateKind,
    pub plan: EditPlan,
}

impl GenerationReport {
    pub fn new(kind: TemplateKind) -> Self {
        Self {
            kind,
            plan: EditPlan::new(),
        }
    }

    /// Number of comment blocks produced
    pub fn generated(&self) -> usize {
        self.plan.len()
    }

    pub fn already_documented(&self) -> bool {
        self.plan.is_empty()
    }

    /// User-facing summary line
    pub fn message(&self) -> String {
        let n = self.generated();
        match (self.kind, n) {
            (TemplateKind::Header, 0) => "File already has a header comment".to_string(),
            (TemplateKind::Header, _) => {
                "File header generated! Fill in the bracketed sections.".to_string()
            }
            (TemplateKind::Contracts, 0) => "All functions already documented".to_string(),
            (TemplateKind::Contracts, _) => format!(
                "{} function contract(s) generated! Fill in the bracketed sections.",
                n
            ),
            (TemplateKind::Structs, 0) => "All structs already documented".to_string(),
            (TemplateKind::Structs, _) => format!(
                "{} struct description(s) generated! Fill in the bracketed sections.",
                n
            ),
        }
    }
}

/// Run the generator for `kind` against `document`
pub fn generate(kind: TemplateKind, document: &SourceDocument, date: &str) -> GenerationReport {
    match kind {
        TemplateKind::Header => generate_header(document, date),
        TemplateKind::Contracts => generate_contracts(document),
        TemplateKind::Structs => generate_struct_docs(document),
    }
}

/// Generate and apply in place, returning the report
pub fn generate_into(kind: TemplateKind, document: &mut SourceDocument, date: &str) -> GenerationReport {
    let report = generate(kind, document, date);
    document.apply(&report.plan);
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("header".parse::<TemplateKind>().unwrap(), TemplateKind::Header);
        assert_eq!("Contracts".parse::<TemplateKind>().unwrap(), TemplateKind::Contracts);
        assert_eq!("struct".parse::<TemplateKind>().unwrap(), TemplateKind::Structs);
        assert!("enum".parse::<TemplateKind>().is_err());
    }

    #[test]
    fn test_report_messages() {
        let report = GenerationReport::new(TemplateKind::Contracts);
        assert!(report.already_documented());
        assert_eq!(report.message(), "All functions already documented");

        let mut report = GenerationReport::new(TemplateKind::Contracts);
        report.plan.insert(crate::position::Position::new(0, 0), "x");
        report.plan.insert(crate::position::Position::new(1, 0), "y");
        assert_eq!(report.generated(), 2);
        assert!(report.message().starts_with("2 function contract(s) generated"));
    }

    #[test]
    fn test_generate_into_applies_plan() {
        let mut doc = SourceDocument::new("a.c", "int a;\n");
        let report = generate_into(TemplateKind::Header, &mut doc, "01/02/2026");
        assert_eq!(report.generated(), 1);
        assert!(doc.text().starts_with("/****"));
        assert!(doc.text().ends_with("int a;\n"));

        let again = generate_into(TemplateKind::Header, &mut doc, "01/02/2026");
        assert!(again.already_documented());
    }
}
