//! Language-neutral interface outline.
//!
//! Emits one line per generated operation, with nested lines showing the
//! storage steps each operation performs. Useful for reviewing what a
//! schema generates without committing to a target language.

use std::collections::HashMap;

use entigen_foundation::ScalarType;
use entigen_model::{Entity, EntityRef, Field, ID_FIELD, Model, Reference, SearchKey};

use crate::error::BackendResult;
use crate::generator::{Access, Generator};
use crate::output::Output;

/// Outline backend.
#[derive(Clone, Debug, Default)]
pub struct OutlineBackend {
    /// Table names computed during this run.
    tables: HashMap<EntityRef, String>,
}

impl OutlineBackend {
    /// Creates an outline backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the storage table of an entity, computing it on first use.
    fn table(&mut self, entity: &Entity) -> String {
        self.tables
            .entry(entity.id)
            .or_insert_with(|| snake_case(&entity.name))
            .clone()
    }
}

impl Generator for OutlineBackend {
    fn name(&self) -> &'static str {
        "outline"
    }

    fn extension(&self) -> &'static str {
        "outline"
    }

    fn namespaces(&mut self, model: &Model, namespace: &str, out: &mut Output) -> BackendResult<()> {
        self.tables.clear();
        out.line(format!("namespace {namespace}"));
        for enumeration in model.enums() {
            out.blank();
            let tag = if enumeration.discriminator {
                " (discriminator)"
            } else {
                ""
            };
            out.line(format!("enum {}{tag}", enumeration.name));
            out.nested(|out| {
                for variant in &enumeration.variants {
                    out.line(format!("{} = {}", variant.name, variant.value));
                }
            });
        }
        Ok(())
    }

    fn declarations(&mut self, model: &Model, entities: &[&Entity], out: &mut Output) -> BackendResult<()> {
        out.blank().line("tables");
        out.indent();
        for entity in entities {
            let table = self.table(entity);
            let mut columns = vec![format!("{ID_FIELD}: {}", ScalarType::IDENTIFIER.output_name())];
            columns.extend(
                entity
                    .fields
                    .iter()
                    .filter(|f| !f.is_dynamic())
                    .map(column),
            );
            let parent = model
                .parent(entity)
                .map(|p| format!(" extends {}", snake_case(&p.name)))
                .unwrap_or_default();
            out.line(format!("{table}{parent} ({})", columns.join(", ")));
        }
        out.dedent();
        Ok(())
    }

    fn begin_entity(&mut self, _model: &Model, entity: &Entity, out: &mut Output) -> BackendResult<()> {
        let kind = if entity.is_abstract() { " (abstract)" } else { "" };
        let table = self.table(entity);
        out.blank()
            .line(format!("entity {}{kind} -> {table}", entity.name))
            .indent();
        Ok(())
    }

    fn end_entity(&mut self, _model: &Model, _entity: &Entity, out: &mut Output) -> BackendResult<()> {
        out.dedent();
        Ok(())
    }

    fn create(&mut self, model: &Model, entity: &Entity, access: Access, out: &mut Output) -> BackendResult<()> {
        let params: Vec<String> = match access {
            Access::Public => model.constructor_fields(entity).into_iter().map(param).collect(),
            Access::Inherited => {
                let mut params = vec![format!(
                    "kind: {}",
                    entity.kind_enum.as_deref().unwrap_or_default()
                )];
                params.extend(
                    model
                        .constructor_fields(entity)
                        .into_iter()
                        .map(param),
                );
                params
            }
        };
        let prefix = if access == Access::Inherited { "inherited " } else { "" };
        out.line(format!("{prefix}create({}) -> {ID_FIELD}", params.join(", ")));

        let mut steps = Vec::new();
        let mut child: Option<&Entity> = None;
        for owner in model.lineage(entity).into_iter().rev() {
            let step = match (owner.kind_enum.as_deref(), child) {
                (Some(kind), Some(child)) => {
                    format!("insert {} ({kind} = {})", self.table(owner), child.name)
                }
                (Some(kind), None) => format!("insert {} ({kind} = kind)", self.table(owner)),
                _ => format!("insert {}", self.table(owner)),
            };
            steps.push(step);
            child = Some(owner);
        }
        steps.push(format!("assign {ID_FIELD}"));
        out.nested(|out| {
            for step in steps.iter().rev() {
                out.line(step);
            }
        });
        Ok(())
    }

    fn delete(&mut self, model: &Model, entity: &Entity, access: Access, out: &mut Output) -> BackendResult<()> {
        let prefix = if access == Access::Inherited { "inherited " } else { "" };
        out.line(format!("{prefix}delete({ID_FIELD}) -> bool"));
        let steps: Vec<String> = model
            .lineage(entity)
            .into_iter()
            .map(|owner| format!("delete {}", self.table(owner)))
            .collect();
        out.nested(|out| {
            let last = steps.len().saturating_sub(1);
            for (i, step) in steps.iter().enumerate() {
                if i < last {
                    out.line(format!("{step} or fail"));
                } else {
                    out.line(step);
                }
            }
        });
        Ok(())
    }

    fn find(&mut self, model: &Model, entity: &Entity, key: SearchKey<'_>, out: &mut Output) -> BackendResult<()> {
        let arg = match key {
            SearchKey::Id => format!("{ID_FIELD}: {}", ScalarType::IDENTIFIER.output_name()),
            SearchKey::Field(field) => param(field),
        };
        out.line(format!("find_by_{}({arg}) -> {}?", key.name(), entity.name));

        let table = self.table(entity);
        out.nested(|out| {
            if key == SearchKey::Id {
                out.line(format!("{ID_FIELD} = 0 => none"));
            }
            out.line(format!("select {table} where {} = value", key.name()));
            if let Some(kind) = entity.kind_enum.as_deref() {
                for subtype in &entity.subtypes {
                    let child = model.entity(subtype.entity);
                    out.line(format!(
                        "{kind} = {} => {}.find_by_{ID_FIELD}",
                        child.name, child.name
                    ));
                }
            }
        });
        Ok(())
    }

    fn list(&mut self, _model: &Model, entity: &Entity, out: &mut Output) -> BackendResult<()> {
        let table = self.table(entity);
        out.line(format!("list(page: uint32, count: uint32) -> [{}]", entity.name));
        out.nested(|out| {
            out.line(format!("select {table} offset page * count limit count"));
        });
        Ok(())
    }

    fn count(&mut self, _model: &Model, entity: &Entity, out: &mut Output) -> BackendResult<()> {
        let table = self.table(entity);
        out.line("count() -> uint64");
        out.nested(|out| {
            out.line(format!("count {table}"));
        });
        Ok(())
    }

    fn aggregate(&mut self, model: &Model, reference: &Reference, out: &mut Output) -> BackendResult<()> {
        let source = model.entity(reference.source);
        let table = self.table(source);
        let column = source
            .decl_of(&reference.field)
            .map_or(reference.field.as_str(), |d| d.name.as_str());
        let result = if reference.unique {
            format!("{}?", source.name)
        } else {
            format!("[{}]", source.name)
        };
        out.line(format!(
            "{}({ID_FIELD}: {}) -> {result}",
            reference.accessor_name(),
            ScalarType::IDENTIFIER.output_name()
        ));
        out.nested(|out| {
            let limit = if reference.unique { " limit 1" } else { "" };
            out.line(format!("select {table} where {column} = {ID_FIELD}{limit}"));
        });
        Ok(())
    }

    fn edit(&mut self, model: &Model, entity: &Entity, out: &mut Output) -> BackendResult<()> {
        out.line(format!("edit({ID_FIELD}, field: string, value: string) -> bool"));
        let editable: Vec<String> = model
            .lineage(entity)
            .into_iter()
            .flat_map(|owner| owner.editable_fields().map(move |f| (owner, f)))
            .map(|(owner, f)| {
                format!(
                    "{} => parse {} into {}",
                    f.decl.name,
                    f.decl.ty.name(),
                    snake_case(&owner.name)
                )
            })
            .collect();
        out.nested(|out| {
            for line in &editable {
                out.line(line);
            }
            out.line("otherwise => false");
        });
        Ok(())
    }
}

fn param(field: &Field) -> String {
    format!("{}: {}", field.decl.name, field.decl.ty.name())
}

fn column(field: &Field) -> String {
    if field.flags.is_empty() {
        param(field)
    } else {
        format!("{} [{}]", param(field), field.flags)
    }
}

/// Converts `CamelCase` to `snake_case`.
fn snake_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_ascii_lowercase() || c.is_ascii_digit();
        }
    }
    out
}
