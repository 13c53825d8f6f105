//! Name heuristics linking paths and parameters to objects
//!
//! A path like `/users/{userId}/orders` names objects in its segments. Each
//! contiguous run of segments is concatenated and compared with the schema
//! names, either as written or in singular form (`orders` → `order`).

use apiseq_model::{lookup, ref_at, Parameter, SpecModel};
use indexmap::IndexSet;
use inflector::string::singularize::to_singular;
use serde_json::{Map, Value};

use crate::types::ParameterResolution;

/// Matches path segments and parameters against the document's schemas
#[derive(Debug, Clone, Copy)]
pub struct ObjectMatcher<'a> {
    model: &'a SpecModel,
}

impl<'a> ObjectMatcher<'a> {
    /// Create a matcher over `model`'s schemas
    #[must_use]
    pub fn new(model: &'a SpecModel) -> Self {
        Self { model }
    }

    /// Object most plausibly addressed by `path`
    ///
    /// Every contiguous run of segments is tried, shortest first from each
    /// start; the last run that matches wins. Within one run the first
    /// schema in declaration order wins.
    #[must_use]
    pub fn potential_object(&self, path: &str) -> Option<&'a str> {
        let trimmed = path.strip_prefix('/').unwrap_or(path);
        let segments: Vec<&str> = trimmed.split('/').collect();

        let mut found = None;
        for start in 0..segments.len() {
            for end in start..segments.len() {
                let word = segments[start..=end].concat();
                if let Some(name) = self.match_word(&word) {
                    found = Some(name);
                }
            }
        }
        found
    }

    fn match_word(&self, word: &str) -> Option<&'a str> {
        let lower = word.to_lowercase();
        let singular = if lower.is_empty() {
            None
        } else {
            Some(to_singular(&lower)).filter(|s| *s != lower)
        };

        self.model.schemas().map(|(name, _)| name).find(|name| {
            let candidate = name.to_lowercase();
            candidate == lower || singular.as_deref() == Some(candidate.as_str())
        })
    }

    /// Resolve one parameter given the path's potential object
    ///
    /// Only path and query parameters are matched, and only when the path
    /// names an object. A property of that object with the same name and
    /// type wins; its own reference (direct or list item) takes precedence
    /// over the owner. Failing that, a name containing `id` is matched to
    /// the first schema whose name it contains.
    #[must_use]
    pub fn resolve_parameter(
        &self,
        parameter: &Parameter,
        potential: Option<&str>,
    ) -> ParameterResolution {
        let unresolved = || ParameterResolution::unresolved(&parameter.name, parameter.location);
        let Some(potential) = potential else {
            return unresolved();
        };
        if !parameter.location.addresses_object() {
            return unresolved();
        }

        if let Some(resolution) = self.match_property(parameter, potential) {
            return resolution;
        }

        let parameter_lower = parameter.name.to_lowercase();
        if !parameter_lower.contains("id") {
            return unresolved();
        }
        self.model
            .schemas()
            .map(|(name, _)| name)
            .find(|name| !name.is_empty() && parameter_lower.contains(&name.to_lowercase()))
            .map_or_else(unresolved, |name| {
                ParameterResolution::resolved(&parameter.name, parameter.location, name, "id")
            })
    }

    fn match_property(
        &self,
        parameter: &Parameter,
        potential: &str,
    ) -> Option<ParameterResolution> {
        let properties = self
            .model
            .schema(potential)
            .and_then(|schema| lookup(schema, &["properties"]))
            .and_then(Value::as_object)?;

        let property = properties.iter().find_map(|(name, property)| {
            let property_type = lookup(property, &["type"]).and_then(Value::as_str).unwrap_or("");
            (*name == parameter.name && property_type == parameter.schema_type).then_some(property)
        })?;

        let object = ref_at(property, &[])
            .or_else(|| ref_at(property, &["items"]))
            .unwrap_or(potential);

        Some(ParameterResolution::resolved(
            &parameter.name,
            parameter.location,
            object,
            "",
        ))
    }
}

/// Objects referenced by a `content` map (request body or response)
///
/// Each media type contributes `schema.$ref` or else `schema.items.$ref`;
/// repeats across media types collapse to one entry.
#[must_use]
pub fn content_objects(content: &Map<String, Value>) -> Vec<&str> {
    let mut objects = IndexSet::new();
    for media in content.values() {
        if let Some(name) =
            ref_at(media, &["schema"]).or_else(|| ref_at(media, &["schema", "items"]))
        {
            objects.insert(name);
        }
    }
    objects.into_iter().collect()
}
