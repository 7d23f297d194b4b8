//! Error types with diagnostics using miette
//!
//! Resolution errors never escape a render pass: the pass logs them and skips
//! the offending pen. They surface directly only from the resolver functions
//! and from table loading.

use miette::Diagnostic;
use thiserror::Error;

// ============================================================================
// Resolution Errors
// ============================================================================

/// Errors that occur while resolving world geometry
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("unknown pen: {id}")]
    #[diagnostic(code(topopen::resolve::unknown_pen))]
    UnknownPen { id: String },

    #[error("pen {pen} references missing parent {parent}")]
    #[diagnostic(
        code(topopen::resolve::unknown_parent),
        help("insert the parent before resolving, or clear parentId on {pen}")
    )]
    UnknownParent { pen: String, parent: String },

    #[error("parent chain of pen {pen} does not reach a root")]
    #[diagnostic(
        code(topopen::resolve::parent_cycle),
        help("parentId links must form a tree")
    )]
    ParentCycle { pen: String },

    #[error("world rect of pen {pen} is not resolved")]
    #[diagnostic(
        code(topopen::resolve::unresolved),
        help("resolve the world rect before anchors and sub-rects")
    )]
    Unresolved { pen: String },
}

// ============================================================================
// Load Errors
// ============================================================================

/// Errors that occur while loading a pen table or options
#[derive(Error, Diagnostic, Debug)]
pub enum LoadError {
    #[error("invalid JSON: {0}")]
    #[diagnostic(code(topopen::load::json))]
    Json(#[from] serde_json::Error),

    #[error("duplicate pen id: {id}")]
    #[diagnostic(code(topopen::load::duplicate_id))]
    DuplicateId { id: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Integrity(#[from] ResolveError),
}

// ============================================================================
// Canvas Errors
// ============================================================================

/// Errors raised by drawing surfaces
#[derive(Error, Diagnostic, Debug)]
pub enum CanvasError {
    #[error("invalid surface size {width}x{height}")]
    #[diagnostic(code(topopen::canvas::invalid_size))]
    InvalidSize { width: u32, height: u32 },

    #[error("cannot decode image {src}: {message}")]
    #[diagnostic(
        code(topopen::canvas::image_decode),
        help("only PNG data is supported")
    )]
    ImageDecode { src: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_parent_message_names_both_pens() {
        let err = ResolveError::UnknownParent {
            pen: "child".into(),
            parent: "ghost".into(),
        };
        assert_eq!(err.to_string(), "pen child references missing parent ghost");
    }

    #[test]
    fn diagnostic_codes_are_namespaced() {
        let err = ResolveError::ParentCycle { pen: "a".into() };
        let code = err.code().map(|c| c.to_string());
        assert_eq!(code.as_deref(), Some("topopen::resolve::parent_cycle"));
    }

    #[test]
    fn load_error_wraps_integrity_errors() {
        let err: LoadError = ResolveError::UnknownPen { id: "x".into() }.into();
        assert_eq!(err.to_string(), "unknown pen: x");
    }
}
