//! Comparator kernel.
//!
//! Identity extraction, uniqueness checks, observed-side deduplication,
//! identity maps and result builders. Every entity comparator is composed
//! from these free functions plus [`EntityMatcher`], which runs the shared
//! create/update/delete matching pass.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

use super::normalize::values_equal;
use super::types::{DiffChange, DiffOperation, DiffResult, EntityType, default_description};
use crate::config::{
    AttributeDefinition, Category, Channel, Collection, Menu, PageType, Product, ProductType,
    ShippingZone, TaxClass, Warehouse,
};
use crate::error::{EntityValidationError, Result, Side};

/// An entity with an identity field.
pub trait Entity: Serialize {
    /// Name of the identity field, used in validation messages.
    const IDENTITY_FIELD: &'static str;

    /// Returns the raw identity value, if any.
    fn identity_value(&self) -> Option<&str>;
}

macro_rules! impl_entity {
    ($ty:ty, slug) => {
        impl Entity for $ty {
            const IDENTITY_FIELD: &'static str = "slug";

            fn identity_value(&self) -> Option<&str> {
                Some(self.slug.as_str())
            }
        }
    };
    ($ty:ty, name) => {
        impl Entity for $ty {
            const IDENTITY_FIELD: &'static str = "name";

            fn identity_value(&self) -> Option<&str> {
                Some(self.name.as_str())
            }
        }
    };
}

impl_entity!(Channel, slug);
impl_entity!(Warehouse, slug);
impl_entity!(Category, slug);
impl_entity!(Collection, slug);
impl_entity!(Product, slug);
impl_entity!(Menu, slug);
impl_entity!(ShippingZone, name);
impl_entity!(TaxClass, name);
impl_entity!(AttributeDefinition, name);
impl_entity!(ProductType, name);
impl_entity!(PageType, name);

/// Extracts the trimmed identity of an entity.
///
/// # Errors
///
/// Returns an error if the identity is absent or blank.
pub fn identity<E: Entity>(
    entity: &E,
    entity_type: EntityType,
    index: usize,
    side: Side,
) -> std::result::Result<&str, EntityValidationError> {
    entity
        .identity_value()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| EntityValidationError::MissingIdentity {
            entity_type: entity_type.label().to_string(),
            field: E::IDENTITY_FIELD,
            index,
            side,
        })
}

/// Fails if any identity repeats within the collection.
///
/// The error lists every duplicated identity once, in first-seen order.
///
/// # Errors
///
/// Returns an error on a missing identity or on duplicates.
pub fn validate_unique_identifiers<E: Entity>(
    entities: &[E],
    entity_type: EntityType,
    side: Side,
) -> std::result::Result<(), EntityValidationError> {
    let mut seen: HashMap<&str, usize> = HashMap::new();
    let mut duplicates: Vec<String> = Vec::new();

    for (index, entity) in entities.iter().enumerate() {
        let id = identity(entity, entity_type, index, side)?;
        let count = seen.entry(id).or_insert(0);
        *count += 1;
        if *count == 2 {
            duplicates.push(id.to_string());
        }
    }

    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(EntityValidationError::DuplicateIdentifiers {
            entity_type: entity_type.label().to_string(),
            identifiers: duplicates,
            side,
        })
    }
}

/// Keeps the first occurrence of each identity on the observed side.
///
/// Dropped records are logged as warnings.
///
/// # Errors
///
/// Returns an error if an entity has no identity.
pub fn deduplicate_entities<E: Entity>(
    entities: &[E],
    entity_type: EntityType,
) -> std::result::Result<Vec<&E>, EntityValidationError> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut kept = Vec::with_capacity(entities.len());

    for (index, entity) in entities.iter().enumerate() {
        let id = identity(entity, entity_type, index, Side::Observed)?;
        if !seen.insert(id) {
            warn!("Dropping duplicate observed {entity_type} record '{id}' at position {index}");
            continue;
        }
        kept.push(entity);
    }

    Ok(kept)
}

/// Builds an insertion-ordered identity map.
///
/// Later records with an identity already present are ignored.
///
/// # Errors
///
/// Returns an error if an entity has no identity.
pub fn build_identity_map<'a, E: Entity>(
    entities: impl IntoIterator<Item = &'a E>,
    entity_type: EntityType,
    side: Side,
) -> std::result::Result<IndexMap<String, &'a E>, EntityValidationError> {
    let mut map = IndexMap::new();
    for (index, entity) in entities.into_iter().enumerate() {
        let id = identity(entity, entity_type, index, side)?;
        map.entry(id.to_string()).or_insert(entity);
    }
    Ok(map)
}

/// Serializes an entity into a result snapshot.
#[must_use]
pub fn snapshot<T: Serialize + ?Sized>(entity: &T) -> Value {
    serde_json::to_value(entity).unwrap_or_default()
}

/// Builds a CREATE result.
#[must_use]
pub fn create_result<T: Serialize + ?Sized>(
    entity_type: EntityType,
    name: impl Into<String>,
    desired: &T,
    changes: Vec<DiffChange>,
) -> DiffResult {
    DiffResult {
        operation: DiffOperation::Create,
        entity_type,
        entity_name: name.into(),
        current: None,
        desired: Some(snapshot(desired)),
        changes,
    }
}

/// Builds an UPDATE result.
#[must_use]
pub fn update_result<T: Serialize + ?Sized>(
    entity_type: EntityType,
    name: impl Into<String>,
    current: &T,
    desired: &T,
    changes: Vec<DiffChange>,
) -> DiffResult {
    DiffResult {
        operation: DiffOperation::Update,
        entity_type,
        entity_name: name.into(),
        current: Some(snapshot(current)),
        desired: Some(snapshot(desired)),
        changes,
    }
}

/// Builds a DELETE result.
#[must_use]
pub fn delete_result<T: Serialize + ?Sized>(
    entity_type: EntityType,
    name: impl Into<String>,
    current: &T,
) -> DiffResult {
    DiffResult {
        operation: DiffOperation::Delete,
        entity_type,
        entity_name: name.into(),
        current: Some(snapshot(current)),
        desired: None,
        changes: Vec::new(),
    }
}

/// Builds a field change, using the default description when none is given.
#[must_use]
pub fn field_change(
    field: impl Into<String>,
    current: Value,
    desired: Value,
    description: Option<String>,
) -> DiffChange {
    let field = field.into();
    let description =
        description.unwrap_or_else(|| default_description(&field, &current, &desired));
    DiffChange {
        field,
        current_value: current,
        desired_value: desired,
        description,
    }
}

/// Joins a dotted path prefix and a field name.
#[must_use]
pub fn join_path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

/// Diffs the listed fields of two serialized entities.
///
/// Fields absent or null on the desired side are unmanaged and skipped.
#[must_use]
pub fn fixed_field_changes<T: Serialize>(
    prefix: &str,
    current: &T,
    desired: &T,
    fields: &[&str],
) -> Vec<DiffChange> {
    fixed_field_changes_by(prefix, current, desired, fields, |_, c, d| values_equal(c, d))
}

/// Like [`fixed_field_changes`], with a per-field equality function.
#[must_use]
pub fn fixed_field_changes_by<T: Serialize>(
    prefix: &str,
    current: &T,
    desired: &T,
    fields: &[&str],
    eq: impl Fn(&str, &Value, &Value) -> bool,
) -> Vec<DiffChange> {
    let current = snapshot(current);
    let desired = snapshot(desired);

    fields
        .iter()
        .filter_map(|field| {
            let wanted = desired.get(*field).filter(|v| !v.is_null())?;
            let actual = current.get(*field).cloned().unwrap_or(Value::Null);
            if eq(*field, &actual, wanted) {
                None
            } else {
                Some(field_change(
                    join_path(prefix, field),
                    actual,
                    wanted.clone(),
                    None,
                ))
            }
        })
        .collect()
}

/// Diffs every key present on the desired side of two JSON objects.
#[must_use]
pub fn object_changes(prefix: &str, current: &Value, desired: &Value) -> Vec<DiffChange> {
    let Some(wanted) = desired.as_object() else {
        return Vec::new();
    };

    wanted
        .iter()
        .filter(|(_, v)| !v.is_null())
        .filter_map(|(field, wanted)| {
            let actual = current.get(field).cloned().unwrap_or(Value::Null);
            if values_equal(&actual, wanted) {
                None
            } else {
                Some(field_change(
                    join_path(prefix, field),
                    actual,
                    wanted.clone(),
                    None,
                ))
            }
        })
        .collect()
}

/// Returns true if any managed key of `desired` differs from `current`.
#[must_use]
pub fn managed_fields_differ(current: &Value, desired: &Value) -> bool {
    !object_changes("", current, desired).is_empty()
}

/// Diffs two keyed sub-collections of normalized records.
///
/// Added and removed keys yield one change each at `<path>.<key>`; matched
/// keys are diffed field by field below that path.
#[must_use]
pub fn keyed_changes(
    path: &str,
    noun: &str,
    current: &IndexMap<String, Value>,
    desired: &IndexMap<String, Value>,
) -> Vec<DiffChange> {
    let mut changes = Vec::new();

    for (key, wanted) in desired {
        let field = join_path(path, key);
        match current.get(key) {
            None => changes.push(field_change(
                field,
                Value::Null,
                wanted.clone(),
                Some(format!("{noun} \"{key}\" added")),
            )),
            Some(actual) => changes.extend(object_changes(&field, actual, wanted)),
        }
    }

    for (key, actual) in current {
        if !desired.contains_key(key) {
            changes.push(field_change(
                join_path(path, key),
                actual.clone(),
                Value::Null,
                Some(format!("{noun} \"{key}\" removed")),
            ));
        }
    }

    changes
}

type CreateHook<'a, E> = Box<dyn Fn(&E) -> Vec<DiffChange> + 'a>;

/// Which source the target tree of a comparison came from.
///
/// Results always describe how to turn the baseline into the target. A
/// forward run targets the local file and reports remote changes; an
/// introspect run targets the remote platform and reports file changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Target is the desired (local) tree.
    #[default]
    Forward,
    /// Target is the observed (remote) tree.
    Introspect,
}

impl Direction {
    /// Returns the source sides of the target and the baseline.
    #[must_use]
    pub const fn sides(self) -> (Side, Side) {
        match self {
            Self::Forward => (Side::Desired, Side::Observed),
            Self::Introspect => (Side::Observed, Side::Desired),
        }
    }
}

/// Runs the shared identity-matching pass for one entity collection.
///
/// CREATE results come in target order, followed by UPDATE results in
/// target order and DELETE results in baseline order.
pub struct EntityMatcher<'a, E> {
    entity_type: EntityType,
    direction: Direction,
    dedupe_observed: bool,
    on_create: Option<CreateHook<'a, E>>,
}

impl<'a, E: Entity> EntityMatcher<'a, E> {
    /// Creates a matcher for the given entity type.
    #[must_use]
    pub const fn new(entity_type: EntityType) -> Self {
        Self {
            entity_type,
            direction: Direction::Forward,
            dedupe_observed: false,
            on_create: None,
        }
    }

    /// Sets which source the `desired` argument of [`Self::run`] came from.
    #[must_use]
    pub const fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Tolerates duplicate observed records, keeping the first occurrence.
    #[must_use]
    pub const fn dedupe_observed(mut self) -> Self {
        self.dedupe_observed = true;
        self
    }

    /// Attaches informational changes to CREATE results.
    #[must_use]
    pub fn on_create(mut self, hook: impl Fn(&E) -> Vec<DiffChange> + 'a) -> Self {
        self.on_create = Some(Box::new(hook));
        self
    }

    /// Matches `desired` (the target) against `observed` (the baseline)
    /// and builds the results.
    ///
    /// Duplicate tolerance follows the source, not the argument position:
    /// records from the observed source may be deduplicated, records from
    /// the desired source never are.
    ///
    /// # Errors
    ///
    /// Returns an error on a missing identity, on desired-source
    /// duplicates, or on observed-source duplicates for strict entity types.
    pub fn run(
        &self,
        desired: &[E],
        observed: &[E],
        compare: impl Fn(&E, &E) -> Vec<DiffChange>,
    ) -> Result<Vec<DiffResult>> {
        let entity_type = self.entity_type;
        let (target_side, baseline_side) = self.direction.sides();

        let desired = self.admit(desired, target_side)?;
        let observed = self.admit(observed, baseline_side)?;

        let desired_map = build_identity_map(desired, entity_type, target_side)?;
        let observed_map = build_identity_map(observed, entity_type, baseline_side)?;

        let mut creates = Vec::new();
        let mut updates = Vec::new();
        for (id, wanted) in &desired_map {
            match observed_map.get(id) {
                None => {
                    let changes = self
                        .on_create
                        .as_ref()
                        .map(|hook| hook(*wanted))
                        .unwrap_or_default();
                    creates.push(create_result(entity_type, id.as_str(), *wanted, changes));
                }
                Some(actual) => {
                    let changes = compare(*wanted, *actual);
                    if !changes.is_empty() {
                        updates.push(update_result(
                            entity_type,
                            id.as_str(),
                            *actual,
                            *wanted,
                            changes,
                        ));
                    }
                }
            }
        }

        let deletes: Vec<DiffResult> = observed_map
            .iter()
            .filter(|(id, _)| !desired_map.contains_key(*id))
            .map(|(id, actual)| delete_result(entity_type, id.as_str(), *actual))
            .collect();

        debug!(
            "{entity_type} ({:?}): {} target, {} baseline -> {} creates, {} updates, {} deletes",
            self.direction,
            desired_map.len(),
            observed_map.len(),
            creates.len(),
            updates.len(),
            deletes.len()
        );

        let mut results = creates;
        results.extend(updates);
        results.extend(deletes);
        Ok(results)
    }

    fn admit<'e>(&self, entities: &'e [E], side: Side) -> Result<Vec<&'e E>> {
        if self.dedupe_observed && side == Side::Observed {
            return Ok(deduplicate_entities(entities, self.entity_type)?);
        }
        validate_unique_identifiers(entities, self.entity_type, side)?;
        Ok(entities.iter().collect())
    }
}
