#![allow(clippy::self_named_module_files)]

//! Recursive structural merge of a target with one or more sources.
//!
//! Sources are applied left to right, so later sources win on conflicting
//! keys. The target is mutated in place and returned; sources are only read.
//!
//! The only cycle protection is the same-reference guard: a source value that
//! is the target container itself, or that is already identical to the
//! target's value at the same key, is skipped. Distinct containers that refer
//! to each other recursively are not detected and recurse without bound.

use crate::structure::{parse_index, Structure};
use std::slice;
use tracing::{debug, trace};

pub mod mode;

pub use mode::ArrayMode;

/// Options controlling a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MergeOptions {
    /// Recurse into nested containers, copying them instead of sharing them.
    pub deep: bool,
    pub array_mode: ArrayMode,
}

impl MergeOptions {
    pub const fn new(deep: bool, array_mode: ArrayMode) -> Self {
        Self { deep, array_mode }
    }

    pub const fn deep() -> Self {
        Self::new(true, ArrayMode::Default)
    }

    pub const fn shallow() -> Self {
        Self::new(false, ArrayMode::Default)
    }

    #[must_use]
    pub const fn with_array_mode(self, array_mode: ArrayMode) -> Self {
        Self { array_mode, ..self }
    }
}

/// Merge `sources` into `target` and return the result.
///
/// A target that is not a container is replaced by an empty mapping. With no
/// sources the (possibly replaced) target is returned as is. `Null` and
/// `Undefined` sources are skipped.
///
/// The returned value is the target handle, except when a sequence source is
/// merged in a non-default array mode into a target that is not a sequence:
/// the fresh sequence then takes the target's place.
pub fn merge(options: MergeOptions, target: Structure, sources: &[Structure]) -> Structure {
    let mut target = if target.is_container() {
        target
    } else {
        trace!("Replacing non-container target with an empty mapping");
        Structure::mapping()
    };

    for (position, source) in sources.iter().enumerate() {
        if source.is_nullish() {
            trace!("Skipping empty source at position {position}");
            continue;
        }
        target = merge_source(options, target, source);
    }

    target
}

/// Merge using the historical positional argument convention.
///
/// A leading `Bool` is taken as the deep flag. The next argument, if a
/// `String`, names the array mode (case-insensitive; unknown names fall back
/// to `default`). The following argument is the target and the rest are
/// sources.
pub fn extendext<I>(args: I) -> Structure
where
    I: IntoIterator<Item = Structure>,
{
    let mut args = args.into_iter();
    let mut options = MergeOptions::default();
    let mut target = args.next().unwrap_or_default();

    if let Structure::Bool(deep) = target {
        options.deep = deep;
        target = args.next().unwrap_or_default();
    }

    if let Structure::String(ref name) = target {
        options.array_mode = ArrayMode::parse_lenient(name);
        target = args.next().unwrap_or_default();
    }

    let sources: Vec<Structure> = args.collect();
    debug!(
        "Resolved positional merge: deep={}, array_mode={}, {} source(s)",
        options.deep,
        options.array_mode,
        sources.len()
    );

    merge(options, target, &sources)
}

fn merge_source(options: MergeOptions, target: Structure, source: &Structure) -> Structure {
    if !source.is_sequence() || options.array_mode == ArrayMode::Default {
        merge_entries(options, &target, source);
        return target;
    }

    let working = if target.is_sequence() { target } else { Structure::sequence() };
    match options.array_mode {
        ArrayMode::Concat => {
            for item in copy_items(options.deep, source) {
                working.push(item);
            }
        },
        ArrayMode::Replace => {
            let copied = copy_items(options.deep, source);
            if let Structure::Sequence(items) = &working {
                *items.borrow_mut() = copied;
            }
        },
        ArrayMode::Extend => extend_items(options, &working, source),
        ArrayMode::Default => {},
    }

    working
}

/// Copy a sequence's elements the way a default-mode merge into a fresh
/// sequence would: nested containers are copied when `deep`, shared otherwise.
fn copy_items(deep: bool, source: &Structure) -> Vec<Structure> {
    merge(MergeOptions::new(deep, ArrayMode::Default), Structure::sequence(), slice::from_ref(source))
        .items()
}

fn extend_items(options: MergeOptions, working: &Structure, source: &Structure) {
    for (index, element) in source.items().into_iter().enumerate() {
        if element.is_undefined() {
            continue;
        }

        if element.is_container() {
            let slot = working
                .get_index(index)
                .filter(|existing| existing.same_shape(&element))
                .unwrap_or_else(|| element.empty_like());
            let merged = merge(options, slot, slice::from_ref(&element));
            working.set_index(index, merged);
        } else if !working.items().iter().any(|item| item.identical(&element)) {
            working.push(element);
        }
    }
}

fn merge_entries(options: MergeOptions, target: &Structure, source: &Structure) {
    // Sequence targets grow by at most the source's size
    let index_limit = target.len().max(source.len());

    for (key, value) in source.entries() {
        if target.is_sequence() && !parse_index(&key).is_some_and(|i| i <= index_limit) {
            debug!("Dropping key \"{key}\": not a usable index for a sequence target");
            continue;
        }

        let existing = target.get(&key);

        if value.identical(target) || existing.as_ref().is_some_and(|e| e.identical(&value)) {
            trace!("Skipping \"{key}\": same reference as target");
            continue;
        }

        if options.deep && value.is_container() {
            let slot = existing
                .filter(|existing| existing.same_shape(&value))
                .unwrap_or_else(|| value.empty_like());
            target.set(&key, merge(options, slot, slice::from_ref(&value)));
        } else if !value.is_undefined() {
            target.set(&key, value);
        }
    }
}
