//! Relative Duquenne–Guigues basis via Next Closure.
//!
//! Enumerates, in lectic order, every attribute set closed under the
//! confirmed implications plus the implications found so far. Each such set
//! `A` is either an intent of the context (`A'' == A`) or a pseudo-intent, in
//! which case `A -> A'' \ A` joins the basis. Implications entailed by the
//! confirmed base are never produced, because sets that violate them are never
//! enumerated.

use crate::implication::{self, AttributeSet, Implication};

use super::Context;

/// Compute the basis of `context` relative to `confirmed`.
///
/// Premises rejected by `cond` are skipped and do not take part in later
/// closures.
pub fn relative_basis<C>(
    context: &C,
    confirmed: &[Implication],
    cond: &dyn Fn(&AttributeSet) -> bool,
) -> Vec<Implication>
where
    C: Context,
{
    let attributes = context.attributes();
    let background = restrict(confirmed, attributes);

    let mut basis: Vec<Implication> = Vec::new();
    let mut current = implication::closure(&AttributeSet::new(), &background);

    loop {
        let closed = context.closure(&current);
        if closed != current && cond(&current) {
            let conclusion = closed.difference(&current).cloned().collect();
            basis.push(Implication::new(current.clone(), conclusion));
        }

        let next = next_closure(&current, attributes, |set| {
            implication::closure(set, background.iter().chain(basis.iter()))
        });
        match next {
            Some(set) => current = set,
            None => return basis,
        }
    }
}

/// Drop everything `confirmed` says about attributes outside the context.
///
/// An implication whose premise mentions a missing attribute can never fire;
/// conclusion attributes outside the context are unobservable.
fn restrict(confirmed: &[Implication], attributes: &[String]) -> Vec<Implication> {
    confirmed
        .iter()
        .filter(|imp| imp.premise().iter().all(|a| attributes.contains(a)))
        .map(|imp| {
            let conclusion = imp
                .conclusion()
                .iter()
                .filter(|a| attributes.contains(a))
                .cloned()
                .collect();
            Implication::new(imp.premise().clone(), conclusion)
        })
        .collect()
}

/// The lectically next set closed under `close`, or `None` after the last one.
pub(crate) fn next_closure<F>(
    current: &AttributeSet,
    attributes: &[String],
    close: F,
) -> Option<AttributeSet>
where
    F: Fn(&AttributeSet) -> AttributeSet,
{
    let mut prefix = current.clone();
    for (i, attribute) in attributes.iter().enumerate().rev() {
        if prefix.remove(attribute) {
            continue;
        }
        let mut candidate = prefix.clone();
        candidate.insert(attribute.clone());
        let closed = close(&candidate);
        let adds_earlier = attributes[..i]
            .iter()
            .any(|earlier| closed.contains(earlier) && !prefix.contains(earlier));
        if !adds_earlier {
            return Some(closed);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::FormalContext;
    use crate::implication::name_set;

    fn accept_all(_: &AttributeSet) -> bool {
        true
    }

    fn context(attributes: &[&str], rows: &[(&str, &[&str])]) -> FormalContext {
        let mut cxt = FormalContext::with_attributes(attributes.iter().copied()).unwrap();
        for (name, intent) in rows {
            cxt.add_object_with_intent(name, name_set(intent.iter().copied()))
                .unwrap();
        }
        cxt
    }

    #[test]
    fn next_closure_enumerates_powerset_in_lectic_order() {
        let attributes: Vec<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
        let mut seen = vec![AttributeSet::new()];
        let mut current = AttributeSet::new();
        while let Some(next) = next_closure(&current, &attributes, |s| s.clone()) {
            seen.push(next.clone());
            current = next;
        }
        assert_eq!(
            seen,
            vec![
                AttributeSet::new(),
                name_set(["b"]),
                name_set(["a"]),
                name_set(["a", "b"]),
            ]
        );
    }

    #[test]
    fn single_implication_is_found() {
        let cxt = context(&["x", "y"], &[("a", &["x", "y"]), ("b", &["y"]), ("e", &[])]);
        let basis = relative_basis(&cxt, &[], &accept_all);
        assert_eq!(basis, vec![Implication::from_names(["x"], ["y"])]);
    }

    #[test]
    fn empty_premise_when_attribute_is_universal() {
        let cxt = context(&["x", "y"], &[("a", &["x", "y"]), ("b", &["y"])]);
        let basis = relative_basis(&cxt, &[], &accept_all);
        assert_eq!(
            basis,
            vec![Implication::from_names(Vec::<String>::new(), ["y"])]
        );
    }

    #[test]
    fn confirmed_implications_are_not_repeated() {
        let cxt = context(&["x", "y"], &[("a", &["x", "y"]), ("b", &["y"]), ("e", &[])]);
        let confirmed = vec![Implication::from_names(["x"], ["y"])];
        assert!(relative_basis(&cxt, &confirmed, &accept_all).is_empty());
    }

    #[test]
    fn filter_suppresses_premises() {
        let cxt = context(&["x", "y"], &[("a", &["x", "y"]), ("b", &["y"]), ("e", &[])]);
        let basis = relative_basis(&cxt, &[], &|premise: &AttributeSet| premise.is_empty());
        assert!(basis.is_empty());
    }

    #[test]
    fn every_basis_implication_holds_in_context() {
        let cxt = context(
            &["a", "b", "c", "d"],
            &[
                ("o1", &["a", "b"]),
                ("o2", &["a", "b", "c"]),
                ("o3", &["c", "d"]),
                ("o4", &["b", "c", "d"]),
            ],
        );
        let basis = relative_basis(&cxt, &[], &accept_all);
        assert!(!basis.is_empty());
        for imp in &basis {
            assert!(!imp.is_trivial());
            for (_, intent) in cxt.intents() {
                assert!(imp.is_respected(intent), "{imp} fails in context");
            }
        }
        // Every implication valid in the context follows from the basis.
        assert!(implication::entails(
            &basis,
            &Implication::from_names(["a"], ["b"])
        ));
        assert!(implication::entails(
            &basis,
            &Implication::from_names(["d"], ["c"])
        ));
    }

    #[test]
    fn empty_context_implies_everything_from_nothing() {
        let cxt = context(&["x", "y"], &[]);
        let basis = relative_basis(&cxt, &[], &accept_all);
        assert_eq!(
            basis,
            vec![Implication::from_names(Vec::<String>::new(), ["x", "y"])]
        );
    }

    #[test]
    fn no_attributes_no_basis() {
        let cxt = context(&[], &[("a", &[])]);
        assert!(relative_basis(&cxt, &[], &accept_all).is_empty());
    }

    #[test]
    fn confirmed_mentioning_missing_attributes_is_ignored() {
        let cxt = context(&["x", "y"], &[("a", &["x", "y"]), ("b", &["y"]), ("e", &[])]);
        let confirmed = vec![Implication::from_names(["gone"], ["x"])];
        let basis = relative_basis(&cxt, &confirmed, &accept_all);
        assert_eq!(basis, vec![Implication::from_names(["x"], ["y"])]);
    }
}
