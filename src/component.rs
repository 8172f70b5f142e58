//! Module builder.
//!
//! Compiles the template files of one directory as a unit: basenames become
//! component tags, files are parsed in parallel on a bounded rayon pool with a
//! shared tag lookup, references between files become dependency edges, and
//! the components come back in an order where every dependency precedes its
//! dependents.

use std::collections::{HashMap, VecDeque};
use std::fs::File;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::codegen;
use crate::error::CompileError;
use crate::node::{Attribute, Tree};
use crate::parse::{Parsed, Parser};
use crate::validate::{check_tree, validate_basename, Basename};

/// Upper bound for the default worker count.
pub const MAX_PARALLELISM: usize = 32;

pub const DEFAULT_EXTENSION: &str = "stache";

// ═══════════════════════════════════════════════════════════════════════════════
// OPTIONS
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModuleOptions {
    /// Worker count; the host CPU count capped at `MAX_PARALLELISM` when unset.
    pub parallelism: Option<usize>,
    /// Template file extension, without the dot. Used by discovery.
    pub extension: String,
}

impl Default for ModuleOptions {
    fn default() -> Self {
        ModuleOptions {
            parallelism: None,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl ModuleOptions {
    pub fn with_parallelism(mut self, workers: usize) -> Self {
        self.parallelism = Some(workers);
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    /// Workers to use for `files` inputs; never zero, never more than `files`.
    pub fn workers_for(&self, files: usize) -> usize {
        let requested = self.parallelism.unwrap_or_else(|| {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
                .min(MAX_PARALLELISM)
        });
        requested.min(files).max(1)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// COMPONENTS
// ═══════════════════════════════════════════════════════════════════════════════

/// One compiled template file.
#[derive(Debug, Clone)]
pub struct Component {
    pub path: PathBuf,
    pub basename: Basename,
    pub tree: Tree,
}

impl Component {
    pub fn stem(&self) -> &str {
        &self.basename.stem
    }

    pub fn tag(&self) -> &str {
        &self.basename.tag
    }

    /// `<Stem>.jsx`
    pub fn output_file_name(&self) -> String {
        format!("{}.jsx", self.basename.stem)
    }

    pub fn render_to_string(&self) -> Result<String, CompileError> {
        codegen::render_to_string(&self.tree)
    }
}

/// Anything with outgoing "must come after" edges to other items by index.
pub trait Afters {
    fn afters(&self) -> &[usize];
}

impl Afters for Parsed {
    fn afters(&self) -> &[usize] {
        &self.dependencies
    }
}

/// Breadth-first topological order of `items`.
///
/// Ties are broken by input position. On a cycle, returns the indices of
/// the items that lie on or between cycles, in input order.
pub fn toposort<T: Afters>(items: &[T]) -> Result<Vec<usize>, Vec<usize>> {
    let n = items.len();
    let mut pending = vec![0usize; n];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, item) in items.iter().enumerate() {
        for &dep in item.afters() {
            if dep < n && dep != i {
                pending[i] += 1;
                dependents[dep].push(i);
            }
        }
    }

    let mut queue: VecDeque<usize> = (0..n).filter(|&i| pending[i] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(i) = queue.pop_front() {
        order.push(i);
        for &d in &dependents[i] {
            pending[d] -= 1;
            if pending[d] == 0 {
                queue.push_back(d);
            }
        }
    }
    if order.len() == n {
        return Ok(order);
    }

    // Strip items that only hang off a cycle: nothing left depends on them.
    let mut remaining: Vec<bool> = pending.iter().map(|&p| p > 0).collect();
    loop {
        let leaf = (0..n).find(|&i| {
            remaining[i] && !dependents[i].iter().any(|&d| remaining[d] && d != i)
        });
        match leaf {
            Some(i) => remaining[i] = false,
            None => break,
        }
    }
    Err((0..n).filter(|&i| remaining[i]).collect())
}

// ═══════════════════════════════════════════════════════════════════════════════
// MODULE BUILD
// ═══════════════════════════════════════════════════════════════════════════════

struct Entry {
    file_name: String,
    path: PathBuf,
    basename: Basename,
}

/// Parse the files `basenames` inside `dir` and return them in dependency
/// order. Any failure aborts the whole build.
pub fn parse_dir<S: AsRef<str>>(
    dir: &Path,
    basenames: &[S],
    options: &ModuleOptions,
) -> Result<Vec<Component>, CompileError> {
    if basenames.is_empty() {
        return Err(CompileError::NoInput);
    }

    let mut entries = Vec::with_capacity(basenames.len());
    let mut lookup: HashMap<String, usize> = HashMap::with_capacity(basenames.len());
    for (i, name) in basenames.iter().enumerate() {
        let file_name = name.as_ref();
        let basename = validate_basename(file_name)?;
        if let Some(&first) = lookup.get(&basename.tag) {
            return Err(CompileError::DuplicateTag {
                tag: basename.tag,
                first: basenames[first].as_ref().to_string(),
                second: file_name.to_string(),
            });
        }
        lookup.insert(basename.tag.clone(), i);
        entries.push(Entry {
            file_name: file_name.to_string(),
            path: dir.join(file_name),
            basename,
        });
    }

    let workers = options.workers_for(entries.len());
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()?;
    let mut parsed: Vec<Parsed> = pool.install(|| {
        entries
            .par_iter()
            .map(|e| parse_file(e, &lookup))
            .collect::<Result<Vec<_>, _>>()
    })?;

    for (i, p) in parsed.iter_mut().enumerate() {
        if let Some(pos) = p.dependencies.iter().position(|&d| d == i) {
            p.dependencies.remove(pos);
            p.tree.set_self_recursive(true);
            warn!(component = %entries[i].basename.stem, "component references itself");
        }
        let imports = p
            .dependencies
            .iter()
            .map(|&d| Attribute::literal(&entries[d].basename.tag, &entries[d].basename.stem))
            .collect();
        p.tree.set_imports(imports);
    }

    let order = toposort(&parsed).map_err(|cycle| CompileError::Cycle {
        dir: dir.display().to_string(),
        components: cycle
            .iter()
            .map(|&i| entries[i].basename.stem.clone())
            .collect(),
    })?;

    for (e, p) in entries.iter().zip(&parsed) {
        check_tree(&p.tree).map_err(|err| CompileError::from(err).in_file(&e.path))?;
    }

    debug!(
        dir = %dir.display(),
        order = ?order.iter().map(|&i| entries[i].file_name.as_str()).collect::<Vec<_>>(),
        "sorted module"
    );

    let mut slots: Vec<Option<(Entry, Parsed)>> =
        entries.into_iter().zip(parsed).map(Some).collect();
    Ok(order
        .into_iter()
        .filter_map(|i| slots[i].take())
        .map(|(e, p)| Component {
            path: e.path,
            basename: e.basename,
            tree: p.tree,
        })
        .collect())
}

fn parse_file(entry: &Entry, lookup: &HashMap<String, usize>) -> Result<Parsed, CompileError> {
    let file = File::open(&entry.path).map_err(|e| CompileError::from(e).in_file(&entry.path))?;
    let parsed = Parser::new(file)
        .with_name(entry.basename.stem.clone())
        .with_lookup(lookup)
        .parse()
        .map_err(|e| e.in_file(&entry.path))?;
    debug!(
        path = %entry.path.display(),
        nodes = parsed.tree.len(),
        dependencies = parsed.dependencies.len(),
        "parsed template"
    );
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct V(Vec<usize>);

    impl Afters for V {
        fn afters(&self) -> &[usize] {
            &self.0
        }
    }

    #[test]
    fn test_toposort_orders_dependencies_first() {
        // 0 -> 2, 1 -> 0
        let items = vec![V(vec![2]), V(vec![0]), V(vec![])];
        assert_eq!(toposort(&items), Ok(vec![2, 0, 1]));
    }

    #[test]
    fn test_toposort_ties_keep_input_order() {
        let items = vec![V(vec![]), V(vec![]), V(vec![0]), V(vec![])];
        assert_eq!(toposort(&items), Ok(vec![0, 1, 3, 2]));
    }

    #[test]
    fn test_toposort_ignores_self_edges() {
        let items = vec![V(vec![0]), V(vec![0, 1])];
        assert_eq!(toposort(&items), Ok(vec![0, 1]));
    }

    #[test]
    fn test_toposort_reports_cycle_members() {
        // 0 <-> 1, 2 depends on the cycle, 3 is free.
        let items = vec![V(vec![1]), V(vec![0]), V(vec![0]), V(vec![])];
        assert_eq!(toposort(&items), Err(vec![0, 1]));
    }

    #[test]
    fn test_workers_for() {
        let opts = ModuleOptions::default().with_parallelism(8);
        assert_eq!(opts.workers_for(3), 3);
        assert_eq!(opts.workers_for(20), 8);
        let opts = ModuleOptions::default().with_parallelism(0);
        assert_eq!(opts.workers_for(5), 1);
        let auto = ModuleOptions::default().workers_for(1000);
        assert!((1..=MAX_PARALLELISM).contains(&auto));
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let opts: ModuleOptions = serde_json::from_str(r#"{"parallelism": 4}"#).unwrap();
        assert_eq!(opts.parallelism, Some(4));
        assert_eq!(opts.extension, "stache");
        let opts: ModuleOptions = serde_json::from_str(r#"{"extension": "html"}"#).unwrap();
        assert_eq!(opts, ModuleOptions::default().with_extension("html"));
    }
}
