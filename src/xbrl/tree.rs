//! The virtual presentation tree: pure flat sorting by position breaks
//! hierarchy, so this reconstructs parent-child relationships from the reference
//! filing's presentation order and re-orders only siblings.

/// One concept as it appears in the reference filing's presentation order, carrying the
/// final consolidated `position` from [`crate::xbrl::ordering::compute_positions`] so
/// the compatibility rules below can reason about section membership.
#[derive(Debug, Clone)]
pub struct TreeInput {
    pub concept_key: String,
    pub label: String,
    pub level: u32,
    /// Position within the reference filing's own statement (drives sibling order
    /// ties, alongside `position`).
    pub original_index: usize,
    /// Final position from the ordering pipeline; `None` for concepts the ordering
    /// pipeline could not place in any bucket.
    pub position: Option<f64>,
}

struct ArenaNode {
    input: TreeInput,
    children: Vec<usize>,
}

fn looks_like_per_share(label: &str) -> bool {
    let l = label.to_ascii_lowercase();
    l.contains("per share") || l.contains("eps") || l.contains("shares outstanding")
}

fn looks_like_interest(label: &str) -> bool {
    label.to_ascii_lowercase().contains("interest")
}

/// Hierarchical compatibility check: whether `child` may be admitted as
/// a child of `parent` in the presentation tree.
fn is_compatible(parent: &TreeInput, child: &TreeInput) -> bool {
    if looks_like_per_share(&child.label) && !looks_like_per_share(&parent.label) {
        return false;
    }
    if looks_like_interest(&child.label) && !looks_like_interest(&parent.label) {
        return false;
    }

    if let (Some(pp), Some(pc)) = (parent.position, child.position) {
        if pc >= 900.0 && pp < 800.0 {
            return false;
        }
        if (500.0..600.0).contains(&pc) && pp < 500.0 {
            return false;
        }
        if pp < 100.0 && pc >= 900.0 {
            return false;
        }
        if pp < 900.0 && pc < 900.0 && (pp - pc).abs() > 200.0 {
            return false;
        }
    }

    true
}

/// Builds the tree from nodes already in the reference filing's presentation order (so
/// `original_index` is implicitly each input's position in `inputs`), then flattens it
/// depth-first after sorting each node's children by `(position, original_index)`.
pub fn build_and_flatten(inputs: Vec<TreeInput>) -> Vec<String> {
    let mut arena: Vec<ArenaNode> = inputs
        .into_iter()
        .map(|input| ArenaNode { input, children: Vec::new() })
        .collect();
    let mut roots: Vec<usize> = Vec::new();
    let mut stack: Vec<usize> = Vec::new();

    for idx in 0..arena.len() {
        let level = arena[idx].input.level;
        while let Some(&top) = stack.last() {
            if arena[top].input.level >= level {
                stack.pop();
            } else {
                break;
            }
        }

        let mut admitted = false;
        if let Some(&parent_idx) = stack.last() {
            if is_compatible(&arena[parent_idx].input, &arena[idx].input) {
                arena[parent_idx].children.push(idx);
                admitted = true;
            }
        }
        if !admitted {
            roots.push(idx);
        }
        stack.push(idx);
    }

    sort_siblings(&mut arena, &mut roots);
    for i in 0..arena.len() {
        let mut children = std::mem::take(&mut arena[i].children);
        sort_siblings(&arena, &mut children);
        arena[i].children = children;
    }

    let mut out = Vec::with_capacity(arena.len());
    for root in roots {
        flatten_from(&arena, root, &mut out);
    }
    out
}

fn sort_key(node: &ArenaNode) -> (f64, usize) {
    (node.input.position.unwrap_or(f64::MAX), node.input.original_index)
}

fn sort_siblings(arena: &[ArenaNode], indices: &mut [usize]) {
    indices.sort_by(|&a, &b| sort_key(&arena[a]).partial_cmp(&sort_key(&arena[b])).unwrap());
}

fn flatten_from(arena: &[ArenaNode], idx: usize, out: &mut Vec<String>) {
    out.push(arena[idx].input.concept_key.clone());
    for &child in &arena[idx].children {
        flatten_from(arena, child, out);
    }
}
