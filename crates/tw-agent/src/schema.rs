//! Variable layouts and the breed table.
//!
//! Every agent kind has a fixed prefix of builtin variables followed by the
//! user-declared `-own` variables:
//!
//! ```text
//! turtle:  [builtins (13)][turtles-own][breed-own]
//! patch:   [builtins (5)] [patches-own]
//! link:    [builtins (10)][links-own]  [link-breed-own]
//! ```
//!
//! Builtins live in typed struct fields; only the user part is stored as a
//! `Vec<Value>` on the agent.  Indices handed to `get_variable` /
//! `set_variable` are always *full-layout* indices, so they stay stable
//! across a save/load cycle as long as the schema does.

use rustc_hash::FxHashMap;
use tw_core::{BreedId, EngineError, EngineResult, Value};

use crate::link::LINK_BUILTINS;
use crate::patch::PATCH_BUILTINS;
use crate::turtle::TURTLE_BUILTINS;

// ── VarSchema ─────────────────────────────────────────────────────────────────

/// An ordered list of variable names with O(1) name lookup.
#[derive(Clone, Debug, Default)]
pub struct VarSchema {
    names: Vec<String>,
    index: FxHashMap<String, usize>,
}

impl VarSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `name`.  Returns `false` (and does nothing) if it is already
    /// present.
    pub(crate) fn push(&mut self, name: &str) -> bool {
        let name = name.to_ascii_lowercase();
        if self.index.contains_key(&name) {
            return false;
        }
        self.index.insert(name.clone(), self.names.len());
        self.names.push(name);
        true
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[inline]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(&name.to_ascii_lowercase()).copied()
    }

    pub fn name(&self, i: usize) -> Option<&str> {
        self.names.get(i).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Fresh value storage for this schema, every slot zero.
    pub fn zeroed(&self) -> Vec<Value> {
        vec![Value::ZERO; self.names.len()]
    }
}

// ── Breeds ────────────────────────────────────────────────────────────────────

/// Directedness of a link breed.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Directedness {
    Directed,
    Undirected,
    /// The unbreeded `links` set: decided by the first link created and
    /// reset once the last unbreeded link dies.
    Dynamic,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BreedKind {
    Turtle,
    Link(Directedness),
}

/// One entry of the breed table.
#[derive(Clone, Debug)]
pub struct BreedDef {
    pub id:       BreedId,
    /// Plural name, e.g. `wolves`.
    pub name:     String,
    /// Singular name, e.g. `wolf`.
    pub singular: String,
    pub kind:     BreedKind,
    /// Breed-specific variables layered after the common `-own` variables.
    pub own:      VarSchema,
}

impl BreedDef {
    #[inline]
    pub fn is_turtle_breed(&self) -> bool {
        self.kind == BreedKind::Turtle
    }

    #[inline]
    pub fn is_link_breed(&self) -> bool {
        matches!(self.kind, BreedKind::Link(_))
    }

    /// `Some(true)` for directed link breeds, `Some(false)` for undirected
    /// ones, `None` for turtle breeds and the unbreeded link set.
    pub fn fixed_directedness(&self) -> Option<bool> {
        match self.kind {
            BreedKind::Link(Directedness::Directed)   => Some(true),
            BreedKind::Link(Directedness::Undirected) => Some(false),
            _ => None,
        }
    }
}

// ── RemapPlan ─────────────────────────────────────────────────────────────────

/// Source index (into the old user-variable vector) for every slot of the
/// new one.  `None` slots are zero-filled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemapPlan {
    pub sources: Vec<Option<usize>>,
}

impl RemapPlan {
    /// Build the new user-variable vector, moving values out of `old`.
    pub fn apply(&self, mut old: Vec<Value>) -> Vec<Value> {
        self.sources
            .iter()
            .map(|src| match src {
                Some(i) => old.get_mut(*i).map(std::mem::take).unwrap_or(Value::ZERO),
                None => Value::ZERO,
            })
            .collect()
    }
}

// ── Schema ────────────────────────────────────────────────────────────────────

/// All variable layouts and breeds of a model.  Immutable once built; use
/// [`SchemaBuilder`](crate::SchemaBuilder).
#[derive(Clone, Debug)]
pub struct Schema {
    pub(crate) turtles_own:  VarSchema,
    pub(crate) patches_own:  VarSchema,
    pub(crate) links_own:    VarSchema,
    pub(crate) globals:      VarSchema,
    pub(crate) breeds:       Vec<BreedDef>,
    pub(crate) by_name:      FxHashMap<String, BreedId>,
    pub(crate) by_singular:  FxHashMap<String, BreedId>,
}

impl Schema {
    pub fn turtles_own(&self) -> &VarSchema {
        &self.turtles_own
    }

    pub fn patches_own(&self) -> &VarSchema {
        &self.patches_own
    }

    pub fn links_own(&self) -> &VarSchema {
        &self.links_own
    }

    pub fn globals(&self) -> &VarSchema {
        &self.globals
    }

    /// All breeds, including the `turtles` / `links` pseudo-breeds at
    /// indices 0 and 1.
    pub fn breeds(&self) -> &[BreedDef] {
        &self.breeds
    }

    pub fn breed(&self, id: BreedId) -> EngineResult<&BreedDef> {
        self.breeds
            .get(id.index())
            .ok_or_else(|| EngineError::UnknownBreed(id.to_string()))
    }

    /// Look a breed up by plural or singular name.
    pub fn breed_id(&self, name: &str) -> EngineResult<BreedId> {
        let key = name.to_ascii_lowercase();
        self.by_name
            .get(&key)
            .or_else(|| self.by_singular.get(&key))
            .copied()
            .ok_or_else(|| EngineError::UnknownBreed(name.to_owned()))
    }

    pub fn turtle_breed(&self, id: BreedId) -> EngineResult<&BreedDef> {
        let b = self.breed(id)?;
        if b.is_turtle_breed() {
            Ok(b)
        } else {
            Err(EngineError::UnknownBreed(format!("{} is not a turtle breed", b.name)))
        }
    }

    pub fn link_breed(&self, id: BreedId) -> EngineResult<&BreedDef> {
        let b = self.breed(id)?;
        if b.is_link_breed() {
            Ok(b)
        } else {
            Err(EngineError::UnknownBreed(format!("{} is not a link breed", b.name)))
        }
    }

    pub fn turtle_breed_ids(&self) -> impl Iterator<Item = BreedId> + '_ {
        self.breeds.iter().filter(|b| b.is_turtle_breed()).map(|b| b.id)
    }

    pub fn link_breed_ids(&self) -> impl Iterator<Item = BreedId> + '_ {
        self.breeds.iter().filter(|b| b.is_link_breed()).map(|b| b.id)
    }

    // ── Layouts ───────────────────────────────────────────────────────────

    /// Length of the user part of a turtle of `breed`.
    pub fn turtle_user_len(&self, breed: BreedId) -> EngineResult<usize> {
        Ok(self.turtles_own.len() + self.turtle_breed(breed)?.own.len())
    }

    /// Fresh zeroed user variables for a turtle of `breed`.
    pub fn turtle_user_vars(&self, breed: BreedId) -> EngineResult<Vec<Value>> {
        Ok(vec![Value::ZERO; self.turtle_user_len(breed)?])
    }

    pub fn link_user_len(&self, breed: BreedId) -> EngineResult<usize> {
        Ok(self.links_own.len() + self.link_breed(breed)?.own.len())
    }

    pub fn link_user_vars(&self, breed: BreedId) -> EngineResult<Vec<Value>> {
        Ok(vec![Value::ZERO; self.link_user_len(breed)?])
    }

    /// Full-layout index of a turtle variable by name.
    pub fn turtle_var_index(&self, breed: BreedId, name: &str) -> EngineResult<Option<usize>> {
        let lname = name.to_ascii_lowercase();
        if let Some(i) = TURTLE_BUILTINS.iter().position(|b| *b == lname) {
            return Ok(Some(i));
        }
        let base = TURTLE_BUILTINS.len();
        if let Some(i) = self.turtles_own.index_of(&lname) {
            return Ok(Some(base + i));
        }
        let own = &self.turtle_breed(breed)?.own;
        Ok(own.index_of(&lname).map(|i| base + self.turtles_own.len() + i))
    }

    pub fn patch_var_index(&self, name: &str) -> Option<usize> {
        let lname = name.to_ascii_lowercase();
        PATCH_BUILTINS
            .iter()
            .position(|b| *b == lname)
            .or_else(|| self.patches_own.index_of(&lname).map(|i| PATCH_BUILTINS.len() + i))
    }

    pub fn link_var_index(&self, breed: BreedId, name: &str) -> EngineResult<Option<usize>> {
        let lname = name.to_ascii_lowercase();
        if let Some(i) = LINK_BUILTINS.iter().position(|b| *b == lname) {
            return Ok(Some(i));
        }
        let base = LINK_BUILTINS.len();
        if let Some(i) = self.links_own.index_of(&lname) {
            return Ok(Some(base + i));
        }
        let own = &self.link_breed(breed)?.own;
        Ok(own.index_of(&lname).map(|i| base + self.links_own.len() + i))
    }

    /// Full-layout name of variable `vn` on a turtle of `breed`.
    pub fn turtle_var_name(&self, breed: BreedId, vn: usize) -> EngineResult<Option<&str>> {
        if let Some(b) = TURTLE_BUILTINS.get(vn) {
            return Ok(Some(b));
        }
        let user = vn - TURTLE_BUILTINS.len();
        if user < self.turtles_own.len() {
            return Ok(self.turtles_own.name(user));
        }
        Ok(self.turtle_breed(breed)?.own.name(user - self.turtles_own.len()))
    }

    // ── Breed change ──────────────────────────────────────────────────────

    /// How to carry a turtle's user variables from `old` to `new` breed.
    ///
    /// The `turtles-own` prefix is shared and copied positionally.
    /// Breed-own variables are matched by name against the old breed, so a
    /// variable two breeds both declare keeps its value.
    pub fn turtle_remap_plan(&self, old: BreedId, new: BreedId) -> EngineResult<RemapPlan> {
        Ok(Self::remap(&self.turtles_own, &self.turtle_breed(old)?.own, &self.turtle_breed(new)?.own))
    }

    pub fn link_remap_plan(&self, old: BreedId, new: BreedId) -> EngineResult<RemapPlan> {
        Ok(Self::remap(&self.links_own, &self.link_breed(old)?.own, &self.link_breed(new)?.own))
    }

    fn remap(common: &VarSchema, old: &VarSchema, new: &VarSchema) -> RemapPlan {
        let base = common.len();
        let mut sources: Vec<Option<usize>> = (0..base).map(Some).collect();
        sources.reserve(new.len());
        for name in new.names() {
            sources.push(old.index_of(name).map(|i| base + i));
        }
        RemapPlan { sources }
    }
}
