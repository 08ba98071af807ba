//! Dependency resolution.
//!
//! Builds the depends-on graph over a set of descriptors and produces a
//! deterministic topological activation order. Resolution never fails for a
//! partially-bad graph: modules with unsatisfiable dependencies and modules
//! participating in cycles are excluded with a reported reason, and the
//! acyclic remainder still resolves. Ties are broken by declaration order so
//! identical input always yields an identical order.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use capstan_core::ModuleId;

use crate::descriptor::ModuleDescriptor;

/// Why a module was left out of the activation order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionReason {
    /// A declared dependency is absent from the catalog, or was itself
    /// excluded.
    MissingDependency(ModuleId),
    /// The module participates in a dependency cycle with the named members.
    DependencyCycle(Vec<ModuleId>),
}

/// A module excluded from the activation order, with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exclusion {
    /// The excluded module.
    pub id: ModuleId,
    /// Why it was excluded.
    pub reason: ExclusionReason,
}

/// The outcome of dependency resolution.
pub struct Resolution {
    /// Modules that resolved, in activation order: every dependency precedes
    /// its dependents.
    pub ordered: Vec<ModuleDescriptor>,
    /// Modules left out of the order, with reasons.
    pub excluded: Vec<Exclusion>,
}

impl Resolution {
    /// IDs of the resolved modules, in activation order.
    #[must_use]
    pub fn order_ids(&self) -> Vec<&ModuleId> {
        self.ordered.iter().map(ModuleDescriptor::id).collect()
    }
}

impl std::fmt::Debug for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolution")
            .field("order", &self.order_ids())
            .field("excluded", &self.excluded)
            .finish()
    }
}

/// Resolve descriptors into a deterministic activation order.
///
/// Kahn's algorithm with ties broken by declaration order. Modules naming a
/// dependency that is not in the catalog are excluded (transitively: a
/// module depending on an excluded module is excluded too), each with its
/// own warning. Cycle participants are excluded with a single diagnostic
/// naming every member.
#[must_use]
pub fn resolve(descriptors: Vec<ModuleDescriptor>) -> Resolution {
    let known: HashSet<ModuleId> = descriptors.iter().map(|d| d.id().clone()).collect();
    let mut excluded = Vec::new();

    // Modules whose dependencies cannot be satisfied, to a fixpoint so that
    // dependents of an excluded module are excluded as well.
    let mut dropped: HashMap<ModuleId, ModuleId> = HashMap::new();
    loop {
        let mut changed = false;
        for desc in &descriptors {
            if dropped.contains_key(desc.id()) {
                continue;
            }
            let unsatisfied = desc
                .depends_on()
                .iter()
                .find(|&dep| !known.contains(dep) || dropped.contains_key(dep));
            if let Some(dep) = unsatisfied {
                warn!(
                    module_id = %desc.id(),
                    dependency = %dep,
                    "Excluding module: dependency cannot be satisfied"
                );
                dropped.insert(desc.id().clone(), dep.clone());
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }
    for desc in &descriptors {
        if let Some(dep) = dropped.get(desc.id()) {
            excluded.push(Exclusion {
                id: desc.id().clone(),
                reason: ExclusionReason::MissingDependency(dep.clone()),
            });
        }
    }

    // Kahn's algorithm over the remainder. Restarting the scan after every
    // placement keeps the invariant: of all ready modules, the one declared
    // earliest activates first.
    let count = descriptors.len();
    let mut placed = vec![false; count];
    let mut order = Vec::new();
    let ready = |placed: &[bool], i: usize| {
        let desc = &descriptors[i];
        !placed[i]
            && !dropped.contains_key(desc.id())
            && desc.depends_on().iter().all(|dep| {
                descriptors
                    .iter()
                    .position(|d| d.id() == dep)
                    .is_some_and(|j| placed[j])
            })
    };
    while let Some(i) = (0..count).find(|&i| ready(&placed, i)) {
        placed[i] = true;
        order.push(i);
    }

    // Whatever is still standing is on a cycle, or depends on one.
    let stalled: Vec<usize> = (0..count)
        .filter(|&i| !placed[i] && !dropped.contains_key(descriptors[i].id()))
        .collect();
    if !stalled.is_empty() {
        let stalled_ids: HashSet<&ModuleId> =
            stalled.iter().map(|&i| descriptors[i].id()).collect();
        let members: Vec<ModuleId> = stalled
            .iter()
            .filter(|&&i| on_cycle(&descriptors, &stalled_ids, i))
            .map(|&i| descriptors[i].id().clone())
            .collect();

        let names: Vec<&str> = members.iter().map(ModuleId::as_str).collect();
        warn!(
            members = %names.join(", "),
            "Excluding dependency cycle from activation order"
        );

        for &i in &stalled {
            let id = descriptors[i].id().clone();
            if members.contains(&id) {
                excluded.push(Exclusion {
                    id,
                    reason: ExclusionReason::DependencyCycle(members.clone()),
                });
            } else if let Some(dep) = descriptors[i]
                .depends_on()
                .iter()
                .find(|dep| stalled_ids.contains(dep))
            {
                // Not on the cycle itself, but waiting on a module that is.
                warn!(
                    module_id = %id,
                    dependency = %dep,
                    "Excluding module: dependency cannot be satisfied"
                );
                excluded.push(Exclusion {
                    id,
                    reason: ExclusionReason::MissingDependency(dep.clone()),
                });
            }
        }
    }

    let mut by_index: Vec<Option<ModuleDescriptor>> = descriptors.into_iter().map(Some).collect();
    let ordered = order
        .into_iter()
        .filter_map(|i| by_index[i].take())
        .collect();

    Resolution { ordered, excluded }
}

/// Whether the stalled module at `index` can reach itself along depends-on
/// edges restricted to the stalled subgraph.
fn on_cycle(descriptors: &[ModuleDescriptor], stalled: &HashSet<&ModuleId>, index: usize) -> bool {
    let start = descriptors[index].id();
    let mut visited: HashSet<&ModuleId> = HashSet::new();
    let mut frontier: Vec<&ModuleId> = descriptors[index]
        .depends_on()
        .iter()
        .filter(|dep| stalled.contains(dep))
        .collect();

    while let Some(id) = frontier.pop() {
        if id == start {
            return true;
        }
        if !visited.insert(id) {
            continue;
        }
        if let Some(desc) = descriptors.iter().find(|d| d.id() == id) {
            frontier.extend(
                desc.depends_on()
                    .iter()
                    .filter(|dep| stalled.contains(dep)),
            );
        }
    }
    false
}
