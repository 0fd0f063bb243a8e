// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Diagnostics logged through `tracing`.

use tracing_test::traced_test;
use understory_defaults::{
    DefaultsDecl, Prop, PropertyBag, ResolvedProps, ScopeStack, ScopeValues,
    TracingSink, Validation, WithDefaults, validate,
};

const SIZE: Prop<u8> = Prop::new("size");
const COLOR: Prop<&'static str> = Prop::new("color");

#[traced_test]
#[test]
fn fixed_override_is_logged_as_warning() {
    let root = ScopeValues::builder().fixed(SIZE, 12).build();
    let mut tree = ScopeStack::with_root(root);
    let text = WithDefaults::new(
        "Text",
        DefaultsDecl::new().request(SIZE),
        |props: &ResolvedProps<'_>, _: &mut ScopeStack| props.get(SIZE),
    )
    .with_validation(Validation::Always);

    let size = text.render(&mut tree, &PropertyBag::new().with(SIZE, 20));

    assert_eq!(size, Ok(Some(20)));
    assert!(logs_contain("attempting to override a fixed default"));
    assert!(logs_contain("component=\"Text\""));
    assert!(logs_contain("key=\"size\""));
}

#[traced_test]
#[test]
fn missing_request_is_logged() {
    let mut sink = TracingSink;
    let decl = DefaultsDecl::new().request(COLOR);
    let count = validate(&decl, &PropertyBag::new(), &ScopeValues::new(), "Swatch", &mut sink);

    assert_eq!(count, 1);
    assert!(logs_contain("requested default not provided"));
    assert!(logs_contain("RequestedDefaultMissing"));
}

#[traced_test]
#[test]
fn silent_when_declaration_is_satisfied() {
    let root = ScopeValues::builder().default_value(COLOR, "red").build();
    let mut tree = ScopeStack::with_root(root);
    let swatch = WithDefaults::new(
        "Swatch",
        DefaultsDecl::new().request(COLOR),
        |props: &ResolvedProps<'_>, _: &mut ScopeStack| props.require(COLOR),
    )
    .with_validation(Validation::Always);

    assert_eq!(swatch.render(&mut tree, &PropertyBag::new()), Ok("red"));
    assert!(!logs_contain("WARN"));
}
