use hilbertkit_dsl::Sort;
use hilbertkit_kernel::lowering::{lower_imp, lower_not};
use hilbertkit_kernel::{
    DependencyResolver, ErrorKind, IntegrityError, KernelError, LemmaRegistry, LogicSystem, Proof,
    ProofBuilder, Result, RuleImpl, Signature, UnresolvedReference,
};

fn system() -> LogicSystem {
    let wff2 = Signature::new([Sort::Wff, Sort::Wff], Sort::Wff);
    LogicSystem::builder("hilbert")
        .constructor("→", wff2.clone(), lower_imp)
        .constructor("¬", Signature::new([Sort::Wff], Sort::Wff), lower_not)
        .rule("wi", wff2.clone(), RuleImpl::Constructor("→".to_string()))
        .rule("mp", wff2, RuleImpl::ModusPonens)
        .axiom_text("A1", "φ → (ψ → φ)")
        .build()
        .expect("system")
}

fn citing(sys: &LogicSystem, name: &str, cites: &[&str]) -> Result<Proof> {
    let mut pb = ProofBuilder::new(sys, name);
    let mut last = None;
    for (i, cited) in cites.iter().enumerate() {
        last = Some(pb.reference(&format!("s{i}"), "φ → (ψ → φ)", cited, "")?);
    }
    let last = match last {
        Some(f) => f,
        None => pb.opaque("s0", "φ", "")?,
    };
    pb.finish(&last)
}

fn lemma_a(sys: &LogicSystem) -> Result<Proof> {
    citing(sys, "a", &["b", "A1"])
}

fn lemma_b(sys: &LogicSystem) -> Result<Proof> {
    citing(sys, "b", &["a"])
}

fn lemma_c(sys: &LogicSystem) -> Result<Proof> {
    citing(sys, "c", &["A1", "missing", "wi"])
}

fn lemma_d(sys: &LogicSystem) -> Result<Proof> {
    citing(sys, "d", &["e", "c"])
}

fn lemma_e(sys: &LogicSystem) -> Result<Proof> {
    citing(sys, "e", &[])
}

fn lemma_top(sys: &LogicSystem) -> Result<Proof> {
    citing(sys, "top", &["d", "e", "top"])
}

fn lemma_misnamed(sys: &LogicSystem) -> Result<Proof> {
    citing(sys, "not_what_was_registered", &[])
}

fn lemma_broken(sys: &LogicSystem) -> Result<Proof> {
    let mut pb = ProofBuilder::new(sys, "broken");
    let f = pb.hypothesis("h", "φ ∧ ψ")?;
    pb.finish(&f)
}

fn registry() -> LemmaRegistry {
    LemmaRegistry::new()
        .with("a", lemma_a)
        .with("b", lemma_b)
        .with("c", lemma_c)
        .with("d", lemma_d)
        .with("e", lemma_e)
        .with("top", lemma_top)
        .with("misnamed", lemma_misnamed)
        .with("broken", lemma_broken)
}

#[test]
fn mutual_citation_closes_without_looping() {
    let sys = system();
    let reg = registry();
    let resolved = DependencyResolver::new(&sys, &reg)
        .resolve(&[lemma_a])
        .expect("closure");

    let names: Vec<_> = resolved.names().collect();
    assert_eq!(names, vec!["a", "b"]);

    // Each lemma is only ever registered once and the cycle still orders.
    let order: Vec<_> = resolved.emission_order().iter().map(|p| p.name()).collect();
    assert_eq!(order, vec!["b", "a"]);
}

#[test]
fn unresolved_citations_are_named_exactly() {
    let sys = system();
    let reg = registry();
    let err = DependencyResolver::new(&sys, &reg)
        .resolve(&[lemma_c])
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::UnresolvedDependency);
    match err {
        KernelError::UnresolvedDependency { unresolved, .. } => assert_eq!(
            unresolved,
            vec![UnresolvedReference {
                lemma: Some("c".to_string()),
                step: Some("s1".to_string()),
                reference: "missing".to_string(),
            }]
        ),
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn every_offending_reference_is_reported_at_once() {
    let sys = system();
    let reg = registry();
    // `d` pulls in `c`, whose citation is missing; `top` cites `d` and `e`.
    let err = DependencyResolver::new(&sys, &reg)
        .resolve_names(&["top"])
        .unwrap_err();
    let KernelError::UnresolvedDependency { unresolved, .. } = err else {
        panic!("expected unresolved dependency");
    };
    assert_eq!(unresolved.len(), 1);
    assert_eq!(unresolved[0].lemma.as_deref(), Some("c"));

    let err = DependencyResolver::new(&sys, &reg)
        .resolve_names(&["nope", "e", "nada"])
        .unwrap_err();
    let KernelError::UnresolvedDependency { unresolved, .. } = err else {
        panic!("expected unresolved dependency");
    };
    let names: Vec<_> = unresolved.iter().map(|u| u.reference.as_str()).collect();
    assert_eq!(names, vec!["nope", "nada"]);
    assert!(unresolved.iter().all(|u| u.lemma.is_none()));
}

#[test]
fn reserving_a_label_resolves_it() {
    let sys = system();
    let reg = registry();
    let resolved = DependencyResolver::new(&sys, &reg)
        .reserve(["missing"])
        .resolve_names(&["d"])
        .expect("closure");
    let order: Vec<_> = resolved.emission_order().iter().map(|p| p.name()).collect();
    assert_eq!(order, vec!["e", "c", "d"]);
}

#[test]
fn dependencies_precede_dependents() {
    let sys = system();
    let reg = registry();
    let resolved = DependencyResolver::new(&sys, &reg)
        .with_axioms(["missing"])
        .resolve_names(&["top"])
        .expect("closure");

    assert_eq!(resolved.names().collect::<Vec<_>>(), vec!["top", "d", "e", "c"]);
    let order: Vec<_> = resolved.emission_order().iter().map(|p| p.name()).collect();
    assert_eq!(order, vec!["e", "c", "d", "top"]);
}

#[test]
fn constructor_failures_propagate_immediately() {
    let sys = system();
    let reg = registry();

    let err = DependencyResolver::new(&sys, &reg)
        .resolve_names(&["broken"])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Typing);
    assert_eq!(err.context(), "broken/h");

    let err = DependencyResolver::new(&sys, &reg)
        .resolve_names(&["misnamed"])
        .unwrap_err();
    assert!(matches!(
        err,
        KernelError::ReferentialIntegrity {
            detail: IntegrityError::LemmaNameMismatch { .. },
            ..
        }
    ));
}
