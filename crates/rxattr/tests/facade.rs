//! End-to-end smoke test through the facade prelude.

use std::cell::RefCell;
use std::rc::Rc;

use rxattr::prelude::*;

#[test]
fn value_and_computed_compose_through_the_prelude() {
    let errors = Rc::new(RefCell::new(Vec::new()));
    let errors_clone = Rc::clone(&errors);
    let attrs = Attributes::create(move |e: SubscriberPanic| {
        errors_clone.borrow_mut().push(e.to_string());
    });

    let width = attrs.with_value(80u32);
    let width_clone = width.clone();
    let label = attrs.from_function(move || format!("{} cols", width_clone.get()));

    let log = Rc::new(RefCell::new(Vec::new()));
    let log_clone = Rc::clone(&log);
    let handle = width.subscribe(move |w| log_clone.borrow_mut().push(*w));

    width.set(120).unwrap();
    width.set(120).unwrap();
    assert_eq!(*log.borrow(), vec![120]);
    assert_eq!(label.get(), "120 cols");

    assert_eq!(
        label.set("other".to_string()),
        Err(AttributeError::SetUnsupported)
    );

    handle.unsubscribe();
    width.set(200).unwrap();
    assert_eq!(*log.borrow(), vec![120]);
    assert!(errors.borrow().is_empty());
}

#[test]
fn core_alias_reaches_the_same_types() {
    let attrs = rxattr::core::Attributes::create(|_| {});
    let cell: rxattr::core::Attribute<i32> = attrs.with_value(3);
    assert!(cell.is_value());
    assert_eq!(cell.get(), 3);
}
