//! Transitive lemma dependency resolution.
//!
//! Starting from seed proofs, the resolver constructs every registered lemma
//! they cite, and every lemma those cite, until nothing new turns up. Only
//! then is the whole set checked: each citation must name an axiom, a reserved
//! label (rules, syntax) or a resolved lemma. Problems are reported together,
//! never one at a time.

use crate::error::{IntegrityError, KernelError, Result, UnresolvedReference};
use crate::proof::Proof;
use crate::system::LogicSystem;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

/// Pure constructor for one lemma. Calling it twice yields equivalent proofs.
pub type LemmaCtor = fn(&LogicSystem) -> Result<Proof>;

#[derive(Debug, Clone, Default)]
pub struct LemmaRegistry {
    entries: BTreeMap<String, LemmaCtor>,
}

impl LemmaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the constructor previously registered under `name`, if any.
    pub fn register(&mut self, name: impl Into<String>, ctor: LemmaCtor) -> Option<LemmaCtor> {
        self.entries.insert(name.into(), ctor)
    }

    pub fn with(mut self, name: impl Into<String>, ctor: LemmaCtor) -> Self {
        self.register(name, ctor);
        self
    }

    pub fn get(&self, name: &str) -> Option<LemmaCtor> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Result
// ============================================================================

/// A closed, reference-complete set of proofs in registration order.
#[derive(Debug, Clone, Default)]
pub struct ResolvedLemmas {
    proofs: Vec<Proof>,
    index: BTreeMap<String, usize>,
}

impl ResolvedLemmas {
    fn insert(&mut self, proof: Proof) {
        self.index.insert(proof.name().to_string(), self.proofs.len());
        self.proofs.push(proof);
    }

    pub fn get(&self, name: &str) -> Option<&Proof> {
        self.index.get(name).map(|&i| &self.proofs[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.proofs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proofs.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.proofs.iter().map(Proof::name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Proof> {
        self.proofs.iter()
    }

    pub fn into_proofs(self) -> Vec<Proof> {
        self.proofs
    }

    /// Cited lemmas before the lemmas citing them.
    ///
    /// Depth-first post-order over citation edges, visiting roots in
    /// registration order. An edge back into a lemma already on the path (a
    /// citation cycle) is skipped, so the order is total and deterministic.
    pub fn emission_order(&self) -> Vec<&Proof> {
        let mut visited = vec![false; self.proofs.len()];
        let mut order = Vec::with_capacity(self.proofs.len());

        for root in 0..self.proofs.len() {
            if visited[root] {
                continue;
            }
            visited[root] = true;
            let mut stack: Vec<(usize, Vec<usize>)> = vec![(root, self.children(root))];
            while let Some((node, pending)) = stack.last_mut() {
                let node = *node;
                match pending.pop() {
                    Some(child) if !visited[child] => {
                        visited[child] = true;
                        let grandchildren = self.children(child);
                        stack.push((child, grandchildren));
                    }
                    Some(_) => {}
                    None => {
                        order.push(&self.proofs[node]);
                        stack.pop();
                    }
                }
            }
        }
        order
    }

    /// Indices of resolved lemmas cited by `idx`, reversed so `pop` yields
    /// them in citation order.
    fn children(&self, idx: usize) -> Vec<usize> {
        let mut out: Vec<usize> = self.proofs[idx]
            .references()
            .into_iter()
            .filter_map(|name| self.index.get(name).copied())
            .collect();
        out.reverse();
        out
    }
}

// ============================================================================
// Resolver
// ============================================================================

pub struct DependencyResolver<'a> {
    system: &'a LogicSystem,
    registry: &'a LemmaRegistry,
    reserved: BTreeSet<String>,
    axioms: BTreeSet<String>,
}

impl<'a> DependencyResolver<'a> {
    /// Reserves the system's rule labels and knows its axioms.
    pub fn new(system: &'a LogicSystem, registry: &'a LemmaRegistry) -> Self {
        Self {
            system,
            registry,
            reserved: system.rule_labels().into_iter().map(str::to_string).collect(),
            axioms: system.axiom_names().map(str::to_string).collect(),
        }
    }

    pub fn reserve(mut self, labels: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.reserved.extend(labels.into_iter().map(Into::into));
        self
    }

    pub fn with_axioms(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.axioms.extend(names.into_iter().map(Into::into));
        self
    }

    fn is_primitive(&self, name: &str) -> bool {
        self.reserved.contains(name) || self.axioms.contains(name)
    }

    fn construct(&self, name: &str, ctor: LemmaCtor) -> Result<Proof> {
        tracing::debug!(lemma = name, "constructing lemma");
        let proof = ctor(self.system)?;
        if proof.name() != name {
            return Err(KernelError::integrity(
                format!("resolve/{name}"),
                IntegrityError::LemmaNameMismatch {
                    registered: name.to_string(),
                    produced: proof.name().to_string(),
                },
            ));
        }
        Ok(proof)
    }

    /// Close `seeds` over their citations.
    pub fn resolve(&self, seeds: &[LemmaCtor]) -> Result<ResolvedLemmas> {
        let worklist = seeds
            .iter()
            .map(|ctor| ctor(self.system))
            .collect::<Result<VecDeque<_>>>()?;
        self.close(worklist)
    }

    /// Like [`resolve`](Self::resolve), seeding by registry name. Names the
    /// registry does not know are reported in one unresolved-dependency error.
    pub fn resolve_names<S: AsRef<str>>(&self, names: &[S]) -> Result<ResolvedLemmas> {
        let names: Vec<&str> = names.iter().map(|name| name.as_ref()).collect();
        let unknown: Vec<UnresolvedReference> = names
            .iter()
            .filter(|name| !self.registry.contains(name))
            .map(|name| UnresolvedReference {
                lemma: None,
                step: None,
                reference: name.to_string(),
            })
            .collect();
        if !unknown.is_empty() {
            return Err(KernelError::UnresolvedDependency {
                context: "resolve".to_string(),
                unresolved: unknown,
            });
        }

        let mut worklist = VecDeque::with_capacity(names.len());
        for &name in &names {
            if let Some(ctor) = self.registry.get(name) {
                worklist.push_back(self.construct(name, ctor)?);
            }
        }
        self.close(worklist)
    }

    fn close(&self, mut worklist: VecDeque<Proof>) -> Result<ResolvedLemmas> {
        let mut resolved = ResolvedLemmas::default();

        while let Some(proof) = worklist.pop_front() {
            if resolved.contains(proof.name()) {
                continue;
            }

            // Cited lemmas still to build; each at most once per scan.
            let mut scheduled: Vec<(String, LemmaCtor)> = Vec::new();
            for name in proof.references() {
                if self.is_primitive(name)
                    || resolved.contains(name)
                    || name == proof.name()
                    || scheduled.iter().any(|(n, _)| n == name)
                {
                    continue;
                }
                if let Some(ctor) = self.registry.get(name) {
                    scheduled.push((name.to_string(), ctor));
                }
            }

            tracing::debug!(
                lemma = proof.name(),
                steps = proof.steps().len(),
                new_citations = scheduled.len(),
                "registered lemma"
            );
            resolved.insert(proof);

            for (name, ctor) in scheduled {
                worklist.push_back(self.construct(&name, ctor)?);
            }
        }

        let unresolved = self.unresolved(&resolved);
        if !unresolved.is_empty() {
            return Err(KernelError::UnresolvedDependency {
                context: "resolve".to_string(),
                unresolved,
            });
        }

        tracing::debug!(lemmas = resolved.len(), "dependency closure complete");
        Ok(resolved)
    }

    fn unresolved(&self, resolved: &ResolvedLemmas) -> Vec<UnresolvedReference> {
        let mut out = Vec::new();
        for proof in resolved.iter() {
            for step in proof.steps() {
                let Some(reference) = step.reference.as_deref() else {
                    continue;
                };
                if !self.is_primitive(reference) && !resolved.contains(reference) {
                    out.push(UnresolvedReference {
                        lemma: Some(proof.name().to_string()),
                        step: Some(step.label.clone()),
                        reference: reference.to_string(),
                    });
                }
            }
        }
        out
    }
}
