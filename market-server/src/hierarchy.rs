//! Category tree walks
//!
//! Pure functions over one snapshot of the categories table. Every walk
//! loads the snapshot once; nothing here re-queries per node. A node
//! whose parent is missing from the snapshot (soft-deleted parent) is
//! treated as a root for depth purposes.

use std::collections::{HashMap, HashSet, VecDeque};

use shared::models::{Category, CategoryNode, CategoryStats, CategoryStatsEntry};

fn index(categories: &[Category]) -> HashMap<i64, &Category> {
    categories.iter().map(|c| (c.id, c)).collect()
}

fn children_map(categories: &[Category]) -> HashMap<i64, Vec<&Category>> {
    let mut map: HashMap<i64, Vec<&Category>> = HashMap::new();
    for category in categories {
        if let Some(parent_id) = category.parent_id {
            map.entry(parent_id).or_default().push(category);
        }
    }
    map
}

/// Root-to-leaf chain ending at `id`. None when the id is not in the
/// snapshot.
pub fn path(categories: &[Category], id: i64) -> Option<Vec<Category>> {
    let by_id = index(categories);
    let mut current = *by_id.get(&id)?;

    let mut chain = Vec::new();
    // The visited set stops a corrupted parent chain from looping
    let mut visited = HashSet::new();
    loop {
        if !visited.insert(current.id) {
            break;
        }
        chain.push(current.clone());
        match current.parent_id.and_then(|pid| by_id.get(&pid).copied()) {
            Some(parent) => current = parent,
            None => break,
        }
    }

    chain.reverse();
    Some(chain)
}

/// Pre-order traversal of the subtree below `id`, excluding `id` itself.
pub fn descendants(categories: &[Category], id: i64) -> Option<Vec<Category>> {
    let by_id = index(categories);
    by_id.get(&id)?;
    let children = children_map(categories);

    let mut out = Vec::new();
    let mut visited = HashSet::new();
    let mut stack: Vec<&Category> = match children.get(&id) {
        Some(kids) => kids.iter().rev().copied().collect(),
        None => Vec::new(),
    };
    while let Some(node) = stack.pop() {
        if !visited.insert(node.id) {
            continue;
        }
        out.push(node.clone());
        if let Some(kids) = children.get(&node.id) {
            for kid in kids.iter().rev() {
                stack.push(kid);
            }
        }
    }
    Some(out)
}

/// Whether `candidate` sits anywhere below `of` in the parent graph.
/// Walks up from `candidate`, so it costs one chain, not one subtree.
pub fn is_descendant(categories: &[Category], candidate: i64, of: i64) -> bool {
    let by_id = index(categories);
    let mut current = match by_id.get(&candidate) {
        Some(c) => *c,
        None => return false,
    };

    let mut visited = HashSet::new();
    while let Some(parent_id) = current.parent_id {
        if parent_id == of {
            return true;
        }
        if !visited.insert(parent_id) {
            return false;
        }
        match by_id.get(&parent_id).copied() {
            Some(parent) => current = parent,
            None => return false,
        }
    }
    false
}

/// Number of ancestors present in the snapshot; roots are level 0.
pub fn level(categories: &[Category], id: i64) -> Option<i32> {
    path(categories, id).map(|chain| (chain.len() - 1) as i32)
}

pub fn is_leaf(categories: &[Category], id: i64) -> Option<bool> {
    index(categories).get(&id)?;
    Some(!categories.iter().any(|c| c.parent_id == Some(id)))
}

/// Nested tree, children sorted by name at every level.
pub fn tree(categories: &[Category]) -> Vec<CategoryNode> {
    let children = children_map(categories);
    let mut roots: Vec<&Category> = categories
        .iter()
        .filter(|c| c.parent_id.is_none())
        .collect();
    roots.sort_by(|a, b| a.name.cmp(&b.name));
    roots
        .into_iter()
        .map(|root| build_node(root, &children))
        .collect()
}

fn build_node(category: &Category, children: &HashMap<i64, Vec<&Category>>) -> CategoryNode {
    let mut kids: Vec<&Category> = children
        .get(&category.id)
        .map(|k| k.to_vec())
        .unwrap_or_default();
    kids.sort_by(|a, b| a.name.cmp(&b.name));

    CategoryNode {
        id: category.id,
        name: category.name.clone(),
        description: category.description.clone(),
        parent_id: category.parent_id,
        children: kids
            .into_iter()
            .map(|kid| build_node(kid, children))
            .collect(),
    }
}

/// Aggregate stats in one pass: levels come from a single BFS over the
/// snapshot, counts from two shared maps. No per-category re-walk.
pub fn stats(categories: &[Category], product_counts: &HashMap<i64, i64>) -> CategoryStats {
    let by_id = index(categories);
    let children = children_map(categories);

    let mut levels: HashMap<i64, i32> = HashMap::new();
    let mut queue: VecDeque<(i64, i32)> = categories
        .iter()
        .filter(|c| c.parent_id.is_none_or(|pid| !by_id.contains_key(&pid)))
        .map(|c| (c.id, 0))
        .collect();
    while let Some((id, lvl)) = queue.pop_front() {
        if levels.contains_key(&id) {
            continue;
        }
        levels.insert(id, lvl);
        if let Some(kids) = children.get(&id) {
            for kid in kids {
                queue.push_back((kid.id, lvl + 1));
            }
        }
    }

    let mut entries = Vec::with_capacity(categories.len());
    let mut leaf_categories = 0i64;
    let mut max_depth = 0i32;
    for category in categories {
        let level = levels.get(&category.id).copied().unwrap_or(0);
        let child_count = children.get(&category.id).map_or(0, |k| k.len() as i64);
        let is_leaf = child_count == 0;
        if is_leaf {
            leaf_categories += 1;
        }
        max_depth = max_depth.max(level);
        entries.push(CategoryStatsEntry {
            id: category.id,
            name: category.name.clone(),
            level,
            child_count,
            product_count: product_counts.get(&category.id).copied().unwrap_or(0),
            is_leaf,
        });
    }

    CategoryStats {
        total_categories: categories.len() as i64,
        root_categories: categories.iter().filter(|c| c.parent_id.is_none()).count() as i64,
        leaf_categories,
        max_depth,
        categories: entries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(id: i64, name: &str, parent_id: Option<i64>) -> Category {
        Category {
            id,
            name: name.to_string(),
            description: None,
            parent_id,
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    /// electronics(1) -> phones(2) -> android(4)
    ///                -> laptops(3)
    /// books(5)
    fn sample() -> Vec<Category> {
        vec![
            cat(1, "Electronics", None),
            cat(2, "Phones", Some(1)),
            cat(3, "Laptops", Some(1)),
            cat(4, "Android", Some(2)),
            cat(5, "Books", None),
        ]
    }

    #[test]
    fn test_path_root_to_leaf() {
        let cats = sample();
        let chain = path(&cats, 4).unwrap();
        let ids: Vec<i64> = chain.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 4]);

        let root_chain = path(&cats, 5).unwrap();
        assert_eq!(root_chain.len(), 1);
        assert_eq!(root_chain[0].id, 5);

        assert!(path(&cats, 99).is_none());
    }

    #[test]
    fn test_descendants_preorder() {
        let cats = sample();
        let subtree = descendants(&cats, 1).unwrap();
        let ids: Vec<i64> = subtree.iter().map(|c| c.id).collect();
        // Pre-order: phones before its child, laptops after the phones subtree
        assert_eq!(ids, vec![2, 4, 3]);

        assert!(descendants(&cats, 4).unwrap().is_empty());
        assert!(descendants(&cats, 99).is_none());
    }

    #[test]
    fn test_is_descendant() {
        let cats = sample();
        assert!(is_descendant(&cats, 4, 1));
        assert!(is_descendant(&cats, 2, 1));
        assert!(!is_descendant(&cats, 1, 4));
        assert!(!is_descendant(&cats, 5, 1));
        // A node is not its own descendant
        assert!(!is_descendant(&cats, 1, 1));
    }

    #[test]
    fn test_reparent_to_descendant_is_cycle() {
        // A (root) -> B: moving A under B must read as a cycle
        let cats = vec![cat(1, "A", None), cat(2, "B", Some(1))];
        assert!(is_descendant(&cats, 2, 1));
    }

    #[test]
    fn test_level() {
        let cats = sample();
        assert_eq!(level(&cats, 1), Some(0));
        assert_eq!(level(&cats, 2), Some(1));
        assert_eq!(level(&cats, 4), Some(2));
        assert_eq!(level(&cats, 99), None);
    }

    #[test]
    fn test_is_leaf() {
        let cats = sample();
        assert_eq!(is_leaf(&cats, 1), Some(false));
        assert_eq!(is_leaf(&cats, 4), Some(true));
        assert_eq!(is_leaf(&cats, 5), Some(true));
        assert_eq!(is_leaf(&cats, 99), None);
    }

    #[test]
    fn test_tree_shape() {
        let cats = sample();
        let roots = tree(&cats);

        // Roots sorted by name: Books before Electronics
        assert_eq!(roots.len(), 2);
        assert_eq!(roots[0].name, "Books");
        assert!(roots[0].children.is_empty());

        let electronics = &roots[1];
        assert_eq!(electronics.children.len(), 2);
        assert_eq!(electronics.children[0].name, "Laptops");
        assert_eq!(electronics.children[1].name, "Phones");
        assert_eq!(electronics.children[1].children[0].name, "Android");
    }

    #[test]
    fn test_stats_single_snapshot() {
        let cats = sample();
        let product_counts = HashMap::from([(2, 3i64), (5, 1i64)]);
        let stats = stats(&cats, &product_counts);

        assert_eq!(stats.total_categories, 5);
        assert_eq!(stats.root_categories, 2);
        assert_eq!(stats.leaf_categories, 3); // laptops, android, books
        assert_eq!(stats.max_depth, 2);

        let by_id: HashMap<i64, &CategoryStatsEntry> =
            stats.categories.iter().map(|e| (e.id, e)).collect();
        assert_eq!(by_id[&1].level, 0);
        assert_eq!(by_id[&1].child_count, 2);
        assert_eq!(by_id[&2].product_count, 3);
        assert_eq!(by_id[&4].level, 2);
        assert!(by_id[&4].is_leaf);
        assert_eq!(by_id[&5].product_count, 1);
    }

    #[test]
    fn test_stats_orphan_counts_as_root_depth() {
        // Parent 1 soft-deleted: child 2 keeps parent_id = 1 but the
        // snapshot no longer contains it
        let cats = vec![cat(2, "Orphan", Some(1)), cat(3, "Child", Some(2))];
        let stats = stats(&cats, &HashMap::new());

        assert_eq!(stats.total_categories, 2);
        assert_eq!(stats.root_categories, 0);
        assert_eq!(stats.max_depth, 1);
    }

    #[test]
    fn test_empty_snapshot() {
        let stats = stats(&[], &HashMap::new());
        assert_eq!(stats.total_categories, 0);
        assert_eq!(stats.max_depth, 0);
        assert!(tree(&[]).is_empty());
    }
}
