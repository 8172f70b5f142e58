//! Error types for the template compiler.
//!
//! `CompileError` is what every public entry point returns. Rendering faults
//! and basename faults have their own enums so callers can match on the
//! structural cause without string inspection.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("no input files provided")]
    NoInput,

    #[error("input filename {basename:?} {reason}")]
    InvalidBasename {
        basename: String,
        reason: BasenameError,
    },

    #[error("duplicate component tag {tag:?}: {first:?} and {second:?}")]
    DuplicateTag {
        tag: String,
        first: String,
        second: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("tokenizer error: {0}")]
    Tokenizer(String),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("error sorting files in {dir}: circular dependency between {}", .components.join(", "))]
    Cycle {
        dir: String,
        components: Vec<String>,
    },

    #[error("failed to parse file {path:?}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: Box<CompileError>,
    },

    #[error("could not start worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

impl CompileError {
    /// Attach the path of the file being processed.
    pub fn in_file(self, path: impl Into<PathBuf>) -> Self {
        CompileError::File {
            path: path.into(),
            source: Box::new(self),
        }
    }
}

/// Structural violations found while emitting JSX.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    #[error("cannot render an error node")]
    ErrorNode,

    #[error("void element <{0}> has child nodes")]
    VoidChildren(String),

    #[error("component node is only allowed at the top level")]
    NestedComponent,

    #[error("tree root must be a component node")]
    RootNotComponent,

    #[error("malformed tree: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BasenameError {
    #[error("must be a filename")]
    NotAFilename,

    #[error("is not valid")]
    EmptyStem,

    #[error("must start with a letter")]
    MustStartWithLetter,

    #[error("contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// Why the tokenizer stopped producing tokens.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Normal end of input.
    #[error("end of input")]
    Eof,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid UTF-8 at byte offset {offset}")]
    InvalidUtf8 { offset: usize },
}

impl TokenError {
    pub fn is_eof(&self) -> bool {
        matches!(self, TokenError::Eof)
    }
}
