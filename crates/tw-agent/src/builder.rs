//! Fluent builder for a model [`Schema`].
//!
//! # Usage
//!
//! ```rust
//! use tw_agent::SchemaBuilder;
//!
//! let schema = SchemaBuilder::new()
//!     .turtles_own(&["energy"])
//!     .patches_own(&["grass"])
//!     .breed("wolves", "wolf", &["hunger"])
//!     .undirected_link_breed("friendships", "friendship", &["strength"])
//!     .globals(&["population"])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(schema.breed_id("wolf").unwrap(), schema.breed_id("wolves").unwrap());
//! ```

use rustc_hash::FxHashMap;
use tw_core::{BreedId, EngineError, EngineResult};

use crate::link::LINK_BUILTINS;
use crate::patch::PATCH_BUILTINS;
use crate::schema::{BreedDef, BreedKind, Directedness, Schema, VarSchema};
use crate::turtle::TURTLE_BUILTINS;

struct PendingBreed {
    name:     String,
    singular: String,
    kind:     BreedKind,
    own:      Vec<String>,
}

/// Collects variable and breed declarations, then validates them all at
/// once in [`build`](Self::build).
#[derive(Default)]
pub struct SchemaBuilder {
    turtles_own: Vec<String>,
    patches_own: Vec<String>,
    links_own:   Vec<String>,
    globals:     Vec<String>,
    breeds:      Vec<PendingBreed>,
}

fn owned<'a>(names: &'a [&'a str]) -> impl Iterator<Item = String> + 'a {
    names.iter().map(|s| s.to_ascii_lowercase())
}

impl SchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn turtles_own(mut self, names: &[&str]) -> Self {
        self.turtles_own.extend(owned(names));
        self
    }

    pub fn patches_own(mut self, names: &[&str]) -> Self {
        self.patches_own.extend(owned(names));
        self
    }

    pub fn links_own(mut self, names: &[&str]) -> Self {
        self.links_own.extend(owned(names));
        self
    }

    pub fn globals(mut self, names: &[&str]) -> Self {
        self.globals.extend(owned(names));
        self
    }

    /// Declare a turtle breed.  Breed ids are assigned in declaration order
    /// after the two pseudo-breeds, turtle and link breeds interleaved.
    pub fn breed(self, name: &str, singular: &str, own: &[&str]) -> Self {
        self.push_breed(name, singular, BreedKind::Turtle, own)
    }

    pub fn directed_link_breed(self, name: &str, singular: &str, own: &[&str]) -> Self {
        self.push_breed(name, singular, BreedKind::Link(Directedness::Directed), own)
    }

    pub fn undirected_link_breed(self, name: &str, singular: &str, own: &[&str]) -> Self {
        self.push_breed(name, singular, BreedKind::Link(Directedness::Undirected), own)
    }

    fn push_breed(mut self, name: &str, singular: &str, kind: BreedKind, own: &[&str]) -> Self {
        self.breeds.push(PendingBreed {
            name: name.to_ascii_lowercase(),
            singular: singular.to_ascii_lowercase(),
            kind,
            own: owned(own).collect(),
        });
        self
    }

    pub fn build(self) -> EngineResult<Schema> {
        let turtles_own = declare("turtles-own", TURTLE_BUILTINS, &[], &self.turtles_own)?;
        let patches_own = declare("patches-own", PATCH_BUILTINS, &[], &self.patches_own)?;
        let links_own = declare("links-own", LINK_BUILTINS, &[], &self.links_own)?;
        let globals = declare("globals", &[], &[], &self.globals)?;

        let mut breeds = vec![
            BreedDef {
                id:       BreedId::TURTLES,
                name:     "turtles".into(),
                singular: "turtle".into(),
                kind:     BreedKind::Turtle,
                own:      VarSchema::new(),
            },
            BreedDef {
                id:       BreedId::LINKS,
                name:     "links".into(),
                singular: "link".into(),
                kind:     BreedKind::Link(Directedness::Dynamic),
                own:      VarSchema::new(),
            },
        ];
        let mut by_name = FxHashMap::default();
        let mut by_singular = FxHashMap::default();
        for b in &breeds {
            by_name.insert(b.name.clone(), b.id);
            by_singular.insert(b.singular.clone(), b.id);
        }

        for pending in self.breeds {
            let id = BreedId::try_from(breeds.len())
                .map_err(|_| EngineError::Config("too many breeds".into()))?;
            if by_name.contains_key(&pending.name)
                || by_singular.contains_key(&pending.name)
                || by_name.contains_key(&pending.singular)
                || by_singular.contains_key(&pending.singular)
            {
                return Err(EngineError::Config(format!(
                    "breed {} / {} is already defined",
                    pending.name, pending.singular
                )));
            }
            let (builtins, common) = match pending.kind {
                BreedKind::Turtle  => (TURTLE_BUILTINS, &turtles_own),
                BreedKind::Link(_) => (LINK_BUILTINS, &links_own),
            };
            let label = format!("{}-own", pending.name);
            let own = declare(&label, builtins, common.names(), &pending.own)?;
            by_name.insert(pending.name.clone(), id);
            by_singular.insert(pending.singular.clone(), id);
            breeds.push(BreedDef {
                id,
                name: pending.name,
                singular: pending.singular,
                kind: pending.kind,
                own,
            });
        }

        Ok(Schema {
            turtles_own,
            patches_own,
            links_own,
            globals,
            breeds,
            by_name,
            by_singular,
        })
    }
}

/// Build a `VarSchema` rejecting duplicates and clashes with `reserved`
/// builtins or `common` variables.
fn declare(
    what: &str,
    reserved: &[&str],
    common: &[String],
    names: &[String],
) -> EngineResult<VarSchema> {
    let mut schema = VarSchema::new();
    for name in names {
        let clash = reserved.contains(&name.as_str()) || common.iter().any(|c| c == name);
        if clash || !schema.push(name) {
            return Err(EngineError::Config(format!(
                "{what}: variable {name} is already defined"
            )));
        }
    }
    Ok(schema)
}
