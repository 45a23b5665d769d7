// Copyright 2025 Diivanand Ramalingam
// Licensed under the Apache License, Version 2.0

use std::collections::{HashMap, HashSet};

use crate::ast::{Class, FeatureKind, Program, OBJECT};

use super::diagnostics::{Diagnostics, SemanticError};

/// Built-in class names in COOL.
pub const INT: &str = "Int";
pub const BOOL: &str = "Bool";
pub const STRING: &str = "String";
pub const SELF_TYPE: &str = "SELF_TYPE";

/// Known without declaration.
pub const BUILTIN_CLASSES: [&str; 5] = [OBJECT, BOOL, INT, STRING, SELF_TYPE];

/// Builtins no class may inherit from.
pub const NON_INHERITABLE: [&str; 4] = [BOOL, INT, STRING, SELF_TYPE];

/// Declared type of every feature, per class, as written in the source.
///
/// Lookups here are name-based only. Nothing resolves the static type of a
/// dispatch receiver, so answers are approximations and never a proof of
/// well-typedness.
#[derive(Debug, Default)]
pub struct FeatureTypeIndex<'p> {
    by_class: HashMap<&'p str, HashMap<&'p str, (FeatureKind, &'p str)>>,
}

impl<'p> FeatureTypeIndex<'p> {
    fn record(&mut self, class: &'p Class) {
        let table = self.by_class.entry(class.name()).or_default();
        for feature in class.features() {
            table
                .entry(feature.name())
                .or_insert((feature.kind(), feature.declared_type()));
        }
    }

    /// Declared type of `feature` in `class` itself, ignoring ancestors.
    pub fn own_feature_type(&self, class: &str, feature: &str) -> Option<(FeatureKind, &'p str)> {
        self.by_class.get(class)?.get(feature).copied()
    }

    /// Whether any class at all declares a feature `feature` of type `ty`.
    /// The receiver is never consulted.
    pub fn approximate_feature_type_is(&self, feature: &str, ty: &str) -> bool {
        self.by_class
            .values()
            .filter_map(|table| table.get(feature))
            .any(|&(_, declared)| declared == ty)
    }
}

/// Known class names, the declared parent map and the feature-type index,
/// all borrowed from the program under analysis.
#[derive(Debug)]
pub struct ClassRegistry<'p> {
    known: HashSet<&'p str>,
    // every declaration as written, duplicates included
    declared: Vec<(&'p str, &'p str)>,
    // last declaration wins, as in a plain map insert
    parents: HashMap<&'p str, &'p str>,
    // first declaration wins; used for lookup-by-declaration
    declarations: HashMap<&'p str, &'p Class>,
    feature_types: FeatureTypeIndex<'p>,
}

impl<'p> ClassRegistry<'p> {
    /// Registers builtins and every declared class, reporting duplicate
    /// names. Never stops early.
    pub fn build(program: &'p Program, diags: &mut Diagnostics) -> Self {
        let mut registry = ClassRegistry {
            known: BUILTIN_CLASSES.into_iter().collect(),
            declared: Vec::new(),
            parents: HashMap::new(),
            declarations: HashMap::new(),
            feature_types: FeatureTypeIndex::default(),
        };

        for class in &program.classes {
            let name = class.name();
            tracing::trace!(class = name, parent = class.parent_name(), "registering class");

            if !registry.known.insert(name) {
                if name == SELF_TYPE {
                    diags.report(SemanticError::SelfTypeRedeclared);
                }
                diags.report(SemanticError::DuplicateClass {
                    class: name.to_string(),
                });
            }

            registry.declared.push((name, class.parent_name()));
            registry.parents.insert(name, class.parent_name());
            registry.declarations.entry(name).or_insert(class);
            registry.feature_types.record(class);
        }

        tracing::debug!(
            declared = program.classes.len(),
            known = registry.known.len(),
            "class registry built"
        );
        registry
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.known.contains(name)
    }

    /// Declared in the program, as opposed to builtin-only.
    pub fn is_declared(&self, name: &str) -> bool {
        self.declarations.contains_key(name)
    }

    pub fn declaration(&self, name: &str) -> Option<&'p Class> {
        self.declarations.get(name).copied()
    }

    pub fn parent_of(&self, name: &str) -> Option<&'p str> {
        self.parents.get(name).copied()
    }

    /// `(class, parent)` for every class declaration, in source order.
    /// A name declared twice appears twice.
    pub fn declared_parents(&self) -> impl Iterator<Item = (&'p str, &'p str)> + '_ {
        self.declared.iter().copied()
    }

    /// The child/parent map: one entry per declared name, first-declaration
    /// order, with the parent of that name's last declaration.
    pub fn hierarchy(&self) -> Vec<(String, String)> {
        let mut seen = HashSet::new();
        self.declared
            .iter()
            .filter(|(name, _)| seen.insert(*name))
            .map(|(name, _)| (name.to_string(), self.parents[name].to_string()))
            .collect()
    }

    /// `class` followed by its declared ancestors, stopping at `Object`,
    /// at an undeclared parent, or where the chain loops back on itself.
    pub fn lineage(&self, class: &'p str) -> Vec<&'p str> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut cur = Some(class);
        while let Some(name) = cur {
            if name == OBJECT || !seen.insert(name) {
                break;
            }
            chain.push(name);
            cur = self.parent_of(name);
        }
        chain
    }

    pub fn feature_types(&self) -> &FeatureTypeIndex<'p> {
        &self.feature_types
    }

    /// Declared type of `feature` as seen from `class`: its own table first,
    /// then each ancestor's.
    pub fn inherited_feature_type(
        &self,
        class: &'p str,
        feature: &str,
    ) -> Option<(FeatureKind, &'p str)> {
        self.lineage(class)
            .into_iter()
            .find_map(|c| self.feature_types.own_feature_type(c, feature))
    }
}
