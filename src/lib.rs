//! # stache-jsx
//!
//! Compiles Mustache-flavored HTML templates into JSX components.
//!
//! ## Pipeline
//!
//! `bytes -> Tokenizer -> Parser -> Tree -> Renderer -> JSX bytes`
//!
//! 1. **Tokenizer** (`token`): html5ever handles tag syntax; text runs are
//!    scanned for `{name}`, `{?cond}`, `{^cond}`, `{#list}`, `{/name}` and
//!    `{! comment }`.
//! 2. **Parser** (`parse`): builds an arena `Tree`, tracks the iteration
//!    path opened by ranges and records references to sibling components.
//! 3. **Renderer** (`codegen`): emits one `export default function` per tree,
//!    rewriting HTML attribute names to their JSX forms.
//! 4. **Module builder** (`component`): parses a directory's files in
//!    parallel, wires imports and returns them in dependency order.
//!
//! ## Template example
//!
//! ```text
//! <ul class="users">
//!   {#users}<li><avatar src="{photo}"/> {name}</li>{/users}
//! </ul>
//! {^users}<p>No users yet.</p>{/users}
//! ```

mod codegen;
mod component;
mod discovery;
mod dump;
mod error;
mod node;
mod normalize;
mod parse;
mod table;
mod token;
mod validate;
mod visitor;

#[cfg(test)]
mod parse_tests;

use std::io::{Read, Write};

pub use codegen::{attribute_name, render, render_to_string};
pub use component::{
    parse_dir, toposort, Afters, Component, ModuleOptions, DEFAULT_EXTENSION, MAX_PARALLELISM,
};
pub use discovery::{discover, parse_tree, Module};
pub use dump::dump;
pub use error::{BasenameError, CompileError, RenderError, TokenError};
pub use node::{Attribute, Children, LinkError, Node, NodeData, NodeId, PathSegment, Tree};
pub use normalize::{
    collapse_whitespace, component_ident, escape_comment, kebab_to_camel, sanitize_ident,
};
pub use parse::{parse, Parsed, Parser};
pub use table::Atom;
pub use token::{TagAttr, TokenKind, Tokenizer};
pub use validate::{
    check_scope_paths, check_structure, check_tree, validate_basename, Basename, MAX_NESTING,
};
pub use visitor::{walk_children, walk_node, walk_tree, TreeVisitor};

/// Parse a template from `reader` and write its JSX to `writer`.
pub fn transpile<R: Read, W: Write>(reader: R, writer: W) -> Result<(), CompileError> {
    let tree = parse(reader)?;
    render(writer, &tree)
}
