//! Semantic model builder.
//!
//! Runs after every declaration is parsed. Pass one indexes the declared
//! entities and links parents; pass two derives abstract status, the
//! discriminator fields, output declarations, and the reference index,
//! then validates the result.

use std::collections::HashSet;

use entigen_foundation::{Error, ErrorKind, FieldFlags, Result};
use entigen_language::{Declarations, EntityDecl, TypeDecl};
use tracing::{debug, info, warn};

use crate::entity::{Entity, EntityRef, Field, FieldDecl, ID_FIELD, Subtype};
use crate::model::{Enumerate, Model, Variant, Warning};
use crate::reference::Reference;

/// Scans, parses, and links `source` into a model named `name`.
///
/// # Errors
/// Returns the first compile error; no partial model is produced.
pub fn compile(name: &str, source: &str) -> Result<Model> {
    let decls = entigen_language::parse(source)?;
    let model = build(name, &decls)?;
    info!(
        model = %model.name(),
        entities = model.entities().len(),
        enums = model.enums().len(),
        warnings = model.warnings().len(),
        "compiled model"
    );
    Ok(model)
}

/// Links parsed declarations into a model.
///
/// # Errors
/// Returns an error for unknown parents, cyclic inheritance, or duplicate
/// field names along an inheritance chain.
pub fn build(name: &str, decls: &Declarations) -> Result<Model> {
    let parents = link_parents(decls)?;
    check_cycles(decls, &parents)?;

    let subtypes = collect_subtypes(decls, &parents)?;
    let entities: Vec<Entity> = decls
        .entities
        .iter()
        .enumerate()
        .map(|(i, decl)| resolve_entity(EntityRef(i), decl, parents[i], subtypes[i].clone()))
        .collect();

    for entity in &entities {
        check_duplicate_fields(&entities, entity)?;
    }

    let mut warnings = Vec::new();
    let references = index_references(&entities, &mut warnings);

    let enums = decls
        .enums
        .iter()
        .map(|decl| Enumerate {
            name: decl.name.clone(),
            variants: decl
                .members
                .iter()
                .map(|m| Variant {
                    name: m.name.clone(),
                    value: m.value,
                })
                .collect(),
            discriminator: decl.discriminator,
        })
        .collect();

    Ok(Model {
        name: name.to_string(),
        enums,
        entities,
        references,
        warnings,
    })
}

/// Resolves every declared parent name to an entity index.
fn link_parents(decls: &Declarations) -> Result<Vec<Option<EntityRef>>> {
    decls
        .entities
        .iter()
        .map(|decl| {
            let Some(parent) = decl.parent.as_deref() else {
                return Ok(None);
            };
            decls
                .entities
                .iter()
                .position(|e| e.name == parent)
                .map(|i| Some(EntityRef(i)))
                .ok_or_else(|| {
                    Error::new(ErrorKind::UnknownParent {
                        line: decl.span.line,
                        entity: decl.name.clone(),
                        parent: parent.to_string(),
                    })
                })
        })
        .collect()
}

/// Walks each parent chain; a walk longer than the entity count, or one
/// that returns to its start, is a cycle.
fn check_cycles(decls: &Declarations, parents: &[Option<EntityRef>]) -> Result<()> {
    let bound = parents.len();
    for (i, decl) in decls.entities.iter().enumerate() {
        let mut current = parents[i];
        let mut steps = 0;
        while let Some(parent) = current {
            steps += 1;
            if parent.0 == i || steps > bound {
                return Err(Error::cyclic_inheritance(decl.span.line, &decl.name));
            }
            current = parents[parent.0];
        }
    }
    Ok(())
}

/// Collects each entity's direct children with their discriminator values.
fn collect_subtypes(
    decls: &Declarations,
    parents: &[Option<EntityRef>],
) -> Result<Vec<Vec<Subtype>>> {
    let mut subtypes = vec![Vec::new(); decls.entities.len()];
    for (i, decl) in decls.entities.iter().enumerate() {
        let Some(parent) = parents[i] else {
            continue;
        };
        let kind_name = kind_enum_name(&decls.entities[parent.0].name);
        let value = decls
            .enumeration(&kind_name)
            .and_then(|kind| kind.value_of(&decl.name))
            .ok_or_else(|| {
                Error::new(ErrorKind::Internal(format!(
                    "{kind_name} has no member for {}",
                    decl.name
                )))
            })?;
        subtypes[parent.0].push(Subtype {
            value,
            entity: EntityRef(i),
        });
    }
    Ok(subtypes)
}

/// Builds the linked entity, prefixing the discriminator field when abstract.
fn resolve_entity(
    id: EntityRef,
    decl: &EntityDecl,
    parent: Option<EntityRef>,
    subtypes: Vec<Subtype>,
) -> Entity {
    let kind_enum = (!subtypes.is_empty()).then(|| kind_enum_name(&decl.name));

    let discriminator = kind_enum.as_ref().map(|kind| {
        let ty = TypeDecl::Enum(kind.clone());
        Field {
            name: kind.clone(),
            decl: FieldDecl::for_field(kind, &ty),
            ty,
            flags: FieldFlags::INTERNAL,
            line: decl.span.line,
        }
    });

    let declared = decl.fields.iter().map(|f| Field {
        name: f.name.clone(),
        ty: f.ty.clone(),
        flags: f.flags,
        decl: FieldDecl::for_field(&f.name, &f.ty),
        line: f.span.line,
    });

    let fields = discriminator.into_iter().chain(declared).collect();

    debug!(entity = %decl.name, abstract_ = kind_enum.is_some(), "resolved entity");
    Entity {
        id,
        name: decl.name.clone(),
        parent,
        fields,
        subtypes,
        kind_enum,
        line: decl.span.line,
    }
}

/// Fails if a field name (or its output name) repeats along the entity's
/// inheritance chain, including the implicit id.
fn check_duplicate_fields(entities: &[Entity], entity: &Entity) -> Result<()> {
    let mut chain = vec![entity];
    let mut current = entity;
    while let Some(parent) = current.parent {
        current = &entities[parent.0];
        chain.push(current);
    }

    let mut seen: HashSet<&str> = HashSet::from([ID_FIELD]);
    for field in chain.into_iter().rev().flat_map(|e| e.fields.iter()) {
        let clash = !seen.insert(field.name.as_str())
            || (field.decl.name != field.name && !seen.insert(field.decl.name.as_str()));
        if clash {
            return Err(Error::new(ErrorKind::DuplicateField {
                line: field.line,
                entity: entity.name.clone(),
                field: field.name.clone(),
            }));
        }
    }
    Ok(())
}

/// Indexes references by target. Entity-typed fields not named after their
/// entity are skipped with a warning.
fn index_references(entities: &[Entity], warnings: &mut Vec<Warning>) -> Vec<Vec<Reference>> {
    let mut references = vec![Vec::new(); entities.len()];
    for source in entities {
        for field in &source.fields {
            let Some(target_name) = field.ty.as_entity() else {
                continue;
            };
            let Some(target) = entities.iter().find(|e| e.name == target_name) else {
                continue;
            };
            if field.name != target.name {
                let message = format!(
                    "field '{}' of entity {} has type {} but is not named {}; not treated as a reference",
                    field.name, source.name, target.name, target.name
                );
                warn!(line = field.line, "{message}");
                warnings.push(Warning {
                    line: field.line,
                    message,
                });
                continue;
            }
            references[target.id.0].push(Reference {
                source: source.id,
                source_name: source.name.clone(),
                target: target.id,
                target_name: target.name.clone(),
                field: field.name.clone(),
                unique: field.has(FieldFlags::UNIQUE),
            });
        }
    }
    references
}

/// Name of the discriminator enum for an abstract entity.
fn kind_enum_name(entity: &str) -> String {
    format!("{entity}Kind")
}
