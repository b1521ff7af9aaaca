//! The lemma registry and set.mm label lookup.

use crate::lemmas;
use crate::{predicate, propositional};
use hilbertkit_kernel::{LemmaCtor, LemmaRegistry};

/// Every proved lemma, keyed by its set.mm name.
pub const LEMMAS: [(&str, LemmaCtor); 13] = [
    ("id", lemmas::id),
    ("idd", lemmas::idd),
    ("a1i", lemmas::a1i),
    ("a2i", lemmas::a2i),
    ("mpd", lemmas::mpd),
    ("syl", lemmas::syl),
    ("a1d", lemmas::a1d),
    ("com12", lemmas::com12),
    ("con4", lemmas::con4),
    ("con4d", lemmas::con4d),
    ("pm2.21d", lemmas::pm2_21d),
    ("pm2.21", lemmas::pm2_21),
    ("pm2.24", lemmas::pm2_24),
];

pub fn registry() -> LemmaRegistry {
    LEMMAS
        .iter()
        .fold(LemmaRegistry::new(), |reg, (name, ctor)| reg.with(*name, *ctor))
}

pub fn lemma_names() -> Vec<String> {
    LEMMAS.iter().map(|(name, _)| name.to_string()).collect()
}

/// Local label for a set.mm label: an axiom, `mp`, or a catalogued lemma.
pub fn setmm_label(label: &str) -> Option<&'static str> {
    propositional::setmm_label(label)
        .or_else(|| predicate::setmm_label(label))
        .or_else(|| {
            LEMMAS
                .iter()
                .find(|(name, _)| *name == label)
                .map(|(name, _)| *name)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::propositional::hilbert_system;
    use hilbertkit_kernel::{DependencyResolver, SymbolInterner};
    use std::sync::Arc;

    #[test]
    fn every_lemma_builds_under_its_registered_name() {
        let sys = hilbert_system(Arc::new(SymbolInterner::new())).unwrap();
        for (name, ctor) in LEMMAS {
            let proof = ctor(&sys).unwrap_or_else(|e| panic!("{name}: {e}"));
            assert_eq!(proof.name(), name);
        }
    }

    #[test]
    fn catalogue_is_closed_under_citation() {
        let sys = hilbert_system(Arc::new(SymbolInterner::new())).unwrap();
        let reg = registry();
        let resolved = DependencyResolver::new(&sys, &reg)
            .resolve_names(&lemma_names())
            .unwrap();
        assert_eq!(resolved.len(), LEMMAS.len());
    }

    #[test]
    fn setmm_lookup_covers_axioms_rules_and_lemmas() {
        assert_eq!(setmm_label("ax-1"), Some("A1"));
        assert_eq!(setmm_label("ax-mp"), Some("mp"));
        assert_eq!(setmm_label("ax-7"), Some("AX7"));
        assert_eq!(setmm_label("pm2.21"), Some("pm2.21"));
        assert_eq!(setmm_label("peirce"), None);
    }
}
