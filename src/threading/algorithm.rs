//! Conversation threading after Jamie Zawinski's algorithm
//! (<http://www.jwz.org/doc/threading.html>).
//!
//! The passes, in order: seed containers and install parent links from
//! each article's reference chain, materialise the child lists, collect
//! the root set, prune empty containers to a fixpoint, merge roots that
//! share a normalised subject, and sort sibling lists by date. The
//! id→container table lives only for the duration of one [`thread`]
//! call; afterwards the root set owns the forest.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::article::{MessageId, ParsedArticle};
use crate::subject;
use crate::threading::forest::{Container, ContainerId, Forest};

/// Thread a batch of parsed articles into a forest.
///
/// Threading never fails: duplicate ids, dangling references and
/// reference cycles all degrade gracefully (ignored duplicates, phantom
/// ancestors, refused links).
///
/// # Examples
///
/// ```
/// use loread::{parse_batch, thread};
///
/// let raws = vec![
///     b"Message-Id: <1@x>\nSubject: Hello\n\nHi".to_vec(),
///     b"Message-Id: <2@x>\nSubject: Re: Hello\nReferences: <1@x>\n\nHi back".to_vec(),
/// ];
/// let forest = thread(parse_batch(&raws));
///
/// assert_eq!(forest.roots().len(), 1);
/// assert_eq!(forest.article_count(), 2);
/// ```
pub fn thread(articles: Vec<ParsedArticle>) -> Forest {
    let mut forest = Forest::default();
    let mut id_table: HashMap<MessageId, ContainerId> = HashMap::with_capacity(articles.len());

    let mut seeded = Vec::with_capacity(articles.len());
    for article in articles {
        seeded.push(link_article(&mut forest, &mut id_table, article));
    }

    materialise_children(&mut forest);
    collect_roots(&mut forest, &seeded);
    drop(id_table);

    prune_empty(&mut forest);
    merge_by_subject(&mut forest);
    sort_siblings(&mut forest);
    forest.link_secondary();

    forest
}

/// Seed the container for one article and install the parent links its
/// reference chain implies. Returns the article's container.
fn link_article(
    forest: &mut Forest,
    id_table: &mut HashMap<MessageId, ContainerId>,
    article: ParsedArticle,
) -> ContainerId {
    let references = article.references.clone();
    let cid = intern(forest, id_table, article.id.clone());

    if forest.get(cid).article.is_some() {
        debug!("duplicate article id {}; keeping the first", article.id);
        return cid;
    }
    forest.get_mut(cid).article = Some(article);

    // each reference is the alleged parent of the one after it; an
    // already-known parent is never displaced by hearsay
    for pair in references.windows(2) {
        let parent = intern(forest, id_table, pair[0].clone());
        let child = intern(forest, id_table, pair[1].clone());
        if forest.get(child).parent.is_none() && may_link(forest, parent, child) {
            forest.get_mut(child).parent = Some(parent);
        }
    }

    // the last reference is this article's own parent; the article's
    // own chain outranks a parent guessed from someone else's
    if let Some(last) = references.last() {
        let parent = intern(forest, id_table, last.clone());
        if may_link(forest, parent, cid) {
            forest.get_mut(cid).parent = Some(parent);
        }
    }

    cid
}

/// Fetch the container for an id, creating a phantom if it is new.
fn intern(
    forest: &mut Forest,
    id_table: &mut HashMap<MessageId, ContainerId>,
    id: MessageId,
) -> ContainerId {
    match id_table.entry(id) {
        Entry::Occupied(entry) => *entry.get(),
        Entry::Vacant(entry) => {
            let cid = forest.alloc(Container::phantom(entry.key().clone()));
            entry.insert(cid);
            cid
        }
    }
}

/// A parent link is legal when the two containers differ and neither
/// is an ancestor of the other. Only `parent` links exist while the
/// linking pass runs, so walking upward is sufficient to keep the
/// forest acyclic.
fn may_link(forest: &Forest, parent: ContainerId, child: ContainerId) -> bool {
    if parent == child {
        return false;
    }
    if is_ancestor(forest, parent, child) || is_ancestor(forest, child, parent) {
        debug!(
            "refusing link {} -> {}: would create a cycle",
            forest.get(parent).id,
            forest.get(child).id,
        );
        return false;
    }
    true
}

fn is_ancestor(forest: &Forest, ancestor: ContainerId, of: ContainerId) -> bool {
    let mut cursor = forest.get(of).parent;
    while let Some(current) = cursor {
        if current == ancestor {
            return true;
        }
        cursor = forest.get(current).parent;
    }
    false
}

/// Attach every parented container into its parent's child chain, in
/// arena order. Idempotent: a container already in the chain stays put.
fn materialise_children(forest: &mut Forest) {
    for index in 0..forest.containers.len() {
        let child = ContainerId(index);
        if let Some(parent) = forest.get(child).parent {
            forest.append_child(parent, child);
        }
    }
}

/// Walk upward from every seeded container; the top of each chain is a
/// root. First-discovery order is kept.
fn collect_roots(forest: &mut Forest, seeded: &[ContainerId]) {
    let mut seen: HashSet<ContainerId> = HashSet::new();
    let mut roots = Vec::new();

    for &cid in seeded {
        let mut current = cid;
        while let Some(parent) = forest.get(current).parent {
            current = parent;
        }
        if seen.insert(current) {
            roots.push(current);
        }
    }

    forest.roots = roots;
}

/// Remove phantoms that carry nothing: a childless phantom disappears,
/// a phantom root with a single child yields its place to that child,
/// and a phantom below root level is spliced out with its children
/// promoted one level. A phantom root with several children stays — it
/// is what keeps sibling orphans together. Runs until a full pass
/// changes nothing.
fn prune_empty(forest: &mut Forest) {
    loop {
        let snapshot: Vec<ContainerId> = forest.walk().map(|(id, _)| id).collect();
        let mut changed = false;

        // children before parents, so chains of phantoms collapse
        // bottom-up within one pass
        for &cid in snapshot.iter().rev() {
            changed |= prune_one(forest, cid);
        }

        if !changed {
            break;
        }
    }
}

fn prune_one(forest: &mut Forest, cid: ContainerId) -> bool {
    if forest.get(cid).article.is_some() {
        return false;
    }

    let parent = forest.get(cid).parent;
    let root_position = forest.roots.iter().position(|&root| root == cid);

    let Some(first_child) = forest.get(cid).child else {
        // childless phantom: drop it from wherever it hangs
        if let Some(p) = parent {
            forest.remove_child(p, cid);
            return true;
        }
        if let Some(i) = root_position {
            forest.roots.remove(i);
            return true;
        }
        return false;
    };

    if let Some(p) = parent {
        // phantom inside the tree: splice its children into its slot
        splice_up(forest, p, cid);
        return true;
    }

    if let Some(i) = root_position {
        if forest.get(first_child).next.is_none() {
            // single child takes the phantom's place in the root set
            forest.roots[i] = first_child;
            let node = forest.get_mut(first_child);
            node.parent = None;
            node.next = None;
            forest.get_mut(cid).child = None;
            return true;
        }
    }

    false
}

/// Replace `cid` in `parent`'s child chain with `cid`'s own children,
/// preserving sibling order.
fn splice_up(forest: &mut Forest, parent: ContainerId, cid: ContainerId) {
    let mut rebuilt = Vec::new();
    for sibling in forest.children(parent) {
        if sibling == cid {
            rebuilt.extend(forest.children(cid));
        } else {
            rebuilt.push(sibling);
        }
    }
    forest.set_children(parent, &rebuilt);

    let node = forest.get_mut(cid);
    node.parent = None;
    node.child = None;
    node.next = None;
}

/// Merge roots whose normalised subjects coincide, so "Hello" and
/// "Re: Hello" land in one thread even when the reference chain is
/// broken or the ancestor expired.
fn merge_by_subject(forest: &mut Forest) {
    let mut table: HashMap<String, ContainerId> = HashMap::new();

    // pick the most plausible representative root per subject
    for root in forest.roots.clone() {
        let Some(normalised) = root_subject(forest, root) else {
            continue;
        };
        match table.entry(normalised) {
            Entry::Vacant(entry) => {
                entry.insert(root);
            }
            Entry::Occupied(mut entry) => {
                if prefer_new(forest, *entry.get(), root) {
                    entry.insert(root);
                }
            }
        }
    }

    for this in forest.roots.clone() {
        // earlier merges may have removed this root already
        if !forest.roots.contains(&this) {
            continue;
        }
        let Some(normalised) = root_subject(forest, this) else {
            continue;
        };
        let Some(&that) = table.get(&normalised) else {
            continue;
        };
        if that == this {
            continue;
        }
        merge_roots(forest, &mut table, normalised, this, that);
    }
}

/// Subject of a root: its own article's, or its first child's for a
/// phantom, normalised by stripping follow-up prefixes. `None` when no
/// subject exists or it normalises to nothing.
fn root_subject(forest: &Forest, root: ContainerId) -> Option<String> {
    let raw = raw_subject(forest, root)?;
    let normalised = subject::strip_prefixes(raw);
    if normalised.is_empty() {
        return None;
    }
    Some(normalised.to_string())
}

fn raw_subject(forest: &Forest, root: ContainerId) -> Option<&str> {
    let container = forest.get(root);
    match &container.article {
        Some(article) => Some(&article.subject),
        None => {
            let child = container.child?;
            forest
                .get(child)
                .article
                .as_ref()
                .map(|article| article.subject.as_str())
        }
    }
}

fn is_follow_up_root(forest: &Forest, root: ContainerId) -> bool {
    raw_subject(forest, root).is_some_and(subject::is_follow_up)
}

/// Representative tie-breaks: a phantom beats a real container, a
/// plain subject beats a follow-up, otherwise the first entry stays.
fn prefer_new(forest: &Forest, old: ContainerId, new: ContainerId) -> bool {
    let new_phantom = forest.get(new).is_phantom();
    let old_phantom = forest.get(old).is_phantom();
    if new_phantom && !old_phantom {
        return true;
    }
    // the follow-up rule compares real roots; a phantom entry already
    // won above and keeps its slot
    !old_phantom && is_follow_up_root(forest, old) && !is_follow_up_root(forest, new)
}

/// Merge the root `this` with the representative `that` of the same
/// normalised subject.
fn merge_roots(
    forest: &mut Forest,
    table: &mut HashMap<String, ContainerId>,
    normalised: String,
    this: ContainerId,
    that: ContainerId,
) {
    let this_phantom = forest.get(this).is_phantom();
    let that_phantom = forest.get(that).is_phantom();

    if this_phantom && that_phantom {
        // two phantoms: fold that's children into this
        for child in forest.children(that) {
            forest.append_child(this, child);
        }
        remove_root(forest, that);
        table.insert(normalised, this);
        return;
    }

    if this_phantom != that_phantom {
        // the real root files under the phantom one
        let (phantom, real) = if this_phantom { (this, that) } else { (that, this) };
        forest.append_child(phantom, real);
        remove_root(forest, real);
        return;
    }

    let this_follow_up = is_follow_up_root(forest, this);
    let that_follow_up = is_follow_up_root(forest, that);

    if this_follow_up && !that_follow_up {
        // "Re: X" nests under the original X
        forest.append_child(that, this);
        remove_root(forest, this);
        return;
    }
    if that_follow_up && !this_follow_up {
        forest.append_child(this, that);
        remove_root(forest, that);
        return;
    }

    // neither (or both) is a follow-up: bind them under a fresh phantom
    let phantom = forest.alloc(Container::phantom(MessageId::default()));
    let position = forest
        .roots
        .iter()
        .position(|&root| root == this)
        .unwrap_or(forest.roots.len());
    forest.append_child(phantom, this);
    forest.append_child(phantom, that);
    remove_root(forest, this);
    remove_root(forest, that);
    let position = position.min(forest.roots.len());
    forest.roots.insert(position, phantom);
    table.insert(normalised, phantom);
}

fn remove_root(forest: &mut Forest, root: ContainerId) {
    forest.roots.retain(|&r| r != root);
}

/// Sort every child chain by article date ascending. Phantoms order
/// first; ties keep their existing order. The root list keeps its
/// discovery order.
fn sort_siblings(forest: &mut Forest) {
    let all: Vec<ContainerId> = forest.walk().map(|(id, _)| id).collect();
    for cid in all {
        let mut children = forest.children(cid);
        if children.len() < 2 {
            continue;
        }
        children.sort_by_key(|&child| forest.get(child).article.as_ref().map(|a| a.date));
        forest.set_children(cid, &children);
    }
}
