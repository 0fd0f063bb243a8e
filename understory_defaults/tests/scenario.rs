// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end tests rendering small trees through `WithDefaults`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use understory_defaults::{
    DefaultsDecl, Diagnostic, DiagnosticKind, MergeMode, Prop, PropertyBag, ResolveMode,
    ResolvedProps, ScopeHost, ScopeStack, ScopeValues, Validation, WithDefaults, publish,
    republish, resolve, validate,
};

const THEME: Prop<&'static str> = Prop::new("theme");
const X: Prop<i32> = Prop::new("x");
const Y: Prop<&'static str> = Prop::new("y");

fn themed_root() -> ScopeStack {
    ScopeStack::with_root(ScopeValues::builder().default_with(THEME, || "light").build())
}

fn leaf() -> WithDefaults<impl Fn(&ResolvedProps<'_>, &mut ScopeStack) -> &'static str> {
    WithDefaults::new(
        "Leaf",
        DefaultsDecl::new().request(THEME),
        |props: &ResolvedProps<'_>, _: &mut ScopeStack| {
            props.require(THEME).unwrap_or("<missing>")
        },
    )
}

#[test]
fn override_flows_to_grandchildren_only() {
    let mut tree = themed_root();
    let grandchild = leaf();

    // Child A: no explicit theme.
    let child_a = leaf();
    assert_eq!(child_a.render(&mut tree, &PropertyBag::new()), "light");

    // Child B: explicit theme, rendering a grandchild.
    let child_b = WithDefaults::new(
        "ChildB",
        DefaultsDecl::new().request(THEME),
        |props: &ResolvedProps<'_>, tree: &mut ScopeStack| {
            let own = props.require(THEME).unwrap_or("<missing>");
            let below = grandchild.render(tree, &PropertyBag::new());
            (own, below)
        },
    );
    let dark = PropertyBag::new().with(THEME, "dark");
    assert_eq!(child_b.render(&mut tree, &dark), ("dark", "dark"));

    // Child C: a sibling of B, not under it.
    let child_c = leaf();
    assert_eq!(child_c.render(&mut tree, &PropertyBag::new()), "light");
    assert_eq!(tree.depth(), 0);
}

#[test]
fn republished_value_replaces_producer_one_level_down() {
    let calls = Rc::new(Cell::new(0));
    let counter = Rc::clone(&calls);
    let store = ScopeValues::builder()
        .default_with(X, move || {
            counter.set(counter.get() + 1);
            100
        })
        .build();
    let explicit = PropertyBag::new().with(X, 5);

    let local = republish(&explicit, &store).expect("x overrides a default");
    let republished = local
        .producer("x")
        .and_then(|make| make().downcast_ref::<i32>().copied());
    assert_eq!(republished, Some(5));

    let deeper = publish(&store, &local, MergeMode::Extend);
    let none = PropertyBag::new();
    let props = resolve(&none, &deeper, ResolveMode::Lenient);
    assert_eq!(props.get(X), Ok(Some(5)));
    assert_eq!(calls.get(), 0, "the original producer is shadowed");
}

#[test]
fn fixed_override_is_reported_but_explicit_still_wins() {
    let store = ScopeValues::builder().fixed(Y, "Y").build();
    let decl = DefaultsDecl::new().request(Y);
    let explicit = PropertyBag::new().with(Y, "Z");

    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    validate(&decl, &explicit, &store, "Field", &mut diagnostics);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].kind,
        DiagnosticKind::FixedPropertyOverrideAttempt
    );
    assert_eq!(diagnostics[0].key, "y");

    let props = resolve(&explicit, &store, ResolveMode::Strict);
    assert_eq!(props.get(Y), Ok(Some("Z")));
}

#[test]
fn component_fixing_a_value_flags_descendant_override() {
    let mut tree = ScopeStack::new();
    let diagnostics: RefCell<Vec<Diagnostic>> = RefCell::new(Vec::new());

    let field = WithDefaults::new(
        "Field",
        DefaultsDecl::new().request(Y),
        |props: &ResolvedProps<'_>, _: &mut ScopeStack| props.get(Y),
    )
    .with_validation(Validation::Always);

    let form = WithDefaults::new(
        "Form",
        DefaultsDecl::new().fix(Y, "locked"),
        |_: &ResolvedProps<'_>, tree: &mut ScopeStack| {
            assert!(tree.current().contains_fixed("y"));
            let mut sink = diagnostics.borrow_mut();
            let inherited = field.render_with_sink(tree, &PropertyBag::new(), &mut *sink);
            let overridden =
                field.render_with_sink(tree, &PropertyBag::new().with(Y, "mine"), &mut *sink);
            (inherited, overridden)
        },
    )
    .with_validation(Validation::Never);

    let (inherited, overridden) = form.render(&mut tree, &PropertyBag::new());
    assert_eq!(inherited, Ok(Some("locked")));
    assert_eq!(overridden, Ok(Some("mine")));
    assert_eq!(
        diagnostics.borrow().iter().map(|d| d.kind).collect::<Vec<_>>(),
        [DiagnosticKind::FixedPropertyOverrideAttempt]
    );
}

#[test]
fn replace_scope_hides_ancestors() {
    let mut tree = themed_root();
    let isolated = ScopeValues::builder().default_value(X, 1).build();

    let theme = tree.with_scope(&isolated, MergeMode::Replace, |tree| {
        let explicit = PropertyBag::new();
        let props = resolve(&explicit, tree.current(), ResolveMode::Lenient);
        (props.get(THEME), props.get(X))
    });
    assert_eq!(theme, (Ok(None), Ok(Some(1))));
}
