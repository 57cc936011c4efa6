//! JSON document validator for the three stage documents.
//!
//! Walks the untrusted JSON by hand, builds a normalized copy with defaults
//! applied, and reports violations with dotted paths (`required.title.source`,
//! `mainQuestions[2].choices[0].code`).

use regex::Regex;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, HashSet};

use crate::domain::foundation::Timestamp;
use crate::domain::survey::{
    FieldContent, FieldPath, FieldSource, FieldValue, InternalType, QuestionFormat, QuestionSet,
    RequiredField, DEFAULT_LOCALE, DEFAULT_VERSION,
};
use crate::ports::{DocumentShape, DocumentValidator, SchemaViolation};

const SOURCES: [&str; 3] = ["user", "inferred", "empty"];
const PRIORITIES: [&str; 3] = ["high", "medium", "low"];
const EXPECTED_FORMATS: [&str; 5] = ["text", "enum", "multi", "number", "scale"];
const NEXT_ACTIONS: [&str; 3] = ["confirm", "regenerate", "proceed"];

type Object = Map<String, Value>;

/// Hand-written validator for Requirements, QuestionSet and FollowUp.
#[derive(Debug, Clone, Default)]
pub struct JsonDocumentValidator;

impl JsonDocumentValidator {
    pub fn new() -> Self {
        Self
    }

    // ───────────────────────────── Requirements ─────────────────────────────

    fn validate_requirements(&self, doc: &Value) -> Result<Value, SchemaViolation> {
        let root = require_object(doc, "$")?;
        let mut out = Object::new();
        out.insert("meta".into(), normalize_meta(root.get("meta"))?);

        let required = require_object(
            root.get("required")
                .ok_or_else(|| missing("", "required"))?,
            "required",
        )?;
        let mut required_out = Object::new();
        let mut errors = Vec::new();
        for field in RequiredField::ALL {
            let path = join("required", field.key());
            match required.get(field.key()) {
                None | Some(Value::Null) => errors.push(SchemaViolation::MissingRequired { path }),
                Some(v) => match normalize_field_value(v, &path) {
                    Ok(fv) => {
                        required_out.insert(field.key().into(), fv);
                    }
                    Err(e) => errors.push(e),
                },
            }
        }
        if let Some(err) = SchemaViolation::collect(errors) {
            return Err(err);
        }
        out.insert("required".into(), Value::Object(required_out));

        let mut optional_out = Object::new();
        if let Some(optional) = present(root, "optional") {
            for (key, value) in require_object(optional, "optional")? {
                if value.is_null() {
                    continue;
                }
                let fv = normalize_field_value(value, &join("optional", key))?;
                optional_out.insert(key.clone(), fv);
            }
        }
        out.insert("optional".into(), Value::Object(optional_out));

        if let Some(policy) = present(root, "completionPolicy") {
            let obj = require_object(policy, "completionPolicy")?;
            out.insert(
                "completionPolicy".into(),
                json!({
                    "whenEmpty": required_string(obj, "whenEmpty", "completionPolicy")?,
                    "whenInferable": required_string(obj, "whenInferable", "completionPolicy")?,
                    "notes": string_list(obj, "notes", "completionPolicy")?,
                }),
            );
        }

        let mut questions = Vec::new();
        for (i, item) in array_items(root, "confirmationQuestions", "")?.iter().enumerate() {
            let path = format!("confirmationQuestions[{}]", i);
            let obj = require_object(item, &path)?;
            let mut q = Object::new();
            q.insert("id".into(), non_empty_string(obj, "id", &path)?.into());
            if let Some(target) = optional_string(obj, "targetField", &path)? {
                q.insert("targetField".into(), target.into());
            }
            q.insert(
                "questionText".into(),
                non_empty_string(obj, "questionText", &path)?.into(),
            );
            if let Some(rationale) = optional_string(obj, "rationale", &path)? {
                q.insert("rationale".into(), rationale.into());
            }
            q.insert(
                "exampleAnswers".into(),
                json!(string_list(obj, "exampleAnswers", &path)?),
            );
            if present(obj, "priority").is_some() {
                q.insert(
                    "priority".into(),
                    enum_value(obj, "priority", &path, &PRIORITIES, None)?.into(),
                );
            }
            questions.push(Value::Object(q));
        }
        out.insert("confirmationQuestions".into(), Value::Array(questions));

        Ok(Value::Object(out))
    }

    // ───────────────────────────── QuestionSet ──────────────────────────────

    fn validate_question_set(&self, doc: &Value) -> Result<Value, SchemaViolation> {
        let root = require_object(doc, "$")?;
        let mut out = Object::new();
        out.insert("meta".into(), normalize_meta(root.get("meta"))?);

        let method = require_object(
            root.get("methodDecomposition")
                .ok_or_else(|| missing("", "methodDecomposition"))?,
            "methodDecomposition",
        )?;
        out.insert(
            "methodDecomposition".into(),
            json!({
                "screening": required_string(method, "screening", "methodDecomposition")?,
                "main": required_string(method, "main", "methodDecomposition")?,
            }),
        );

        let mut seen_ids = HashSet::new();
        for list in ["screeningQuestions", "mainQuestions"] {
            let mut normalized = Vec::new();
            for (i, item) in array_items(root, list, "")?.iter().enumerate() {
                let path = format!("{}[{}]", list, i);
                let question = normalize_question(item, &path)?;
                let id = question["id"].as_str().unwrap_or_default().to_string();
                if !seen_ids.insert(id.clone()) {
                    return Err(SchemaViolation::Duplicate {
                        path: join(&path, "id"),
                        value: id,
                    });
                }
                normalized.push(question);
            }
            out.insert(list.into(), Value::Array(normalized));
        }

        let mut rationale = Object::new();
        if let Some(value) = present(root, "questionRationale") {
            for (id, text) in require_object(value, "questionRationale")? {
                let path = join("questionRationale", id);
                let text = text.as_str().ok_or_else(|| invalid_type(&path, "string", text))?;
                rationale.insert(id.clone(), text.into());
            }
        }
        out.insert("questionRationale".into(), Value::Object(rationale));

        let mut rules = Vec::new();
        for (i, item) in array_items(root, "branchRules", "")?.iter().enumerate() {
            rules.push(normalize_branch_rule(item, &format!("branchRules[{}]", i))?);
        }
        out.insert("branchRules".into(), Value::Array(rules));

        if let Some(value) = present(root, "constraints") {
            let obj = require_object(value, "constraints")?;
            let mut constraints = Object::new();
            for key in ["maxScreening", "maxMain", "maxDepth"] {
                if let Some(n) = optional_uint(obj, key, "constraints")? {
                    constraints.insert(key.into(), n.into());
                }
            }
            out.insert("constraints".into(), Value::Object(constraints));
        }

        let normalized = Value::Object(out);
        let typed: QuestionSet = serde_json::from_value(normalized.clone()).map_err(|e| {
            SchemaViolation::Invariant {
                path: "$".into(),
                reason: e.to_string(),
            }
        })?;
        typed.check_references()?;
        check_constraints(&typed)?;
        Ok(normalized)
    }

    // ────────────────────────────── FollowUp ────────────────────────────────

    fn validate_follow_up(&self, doc: &Value) -> Result<Value, SchemaViolation> {
        let root = require_object(doc, "$")?;
        let mut out = Object::new();
        out.insert("meta".into(), normalize_meta(root.get("meta"))?);

        let missing_fields = string_list(root, "missingFields", "")?;
        let deferred = string_list(root, "deferredFields", "")?;

        let mut questions = Vec::new();
        let mut ids: Vec<String> = Vec::new();
        let mut last_rank = 0usize;
        for (i, item) in array_items(root, "additionalQuestions", "")?.iter().enumerate() {
            let path = format!("additionalQuestions[{}]", i);
            let q = normalize_follow_up_question(item, &path)?;
            let id = q["id"].as_str().unwrap_or_default().to_string();
            if ids.contains(&id) {
                return Err(SchemaViolation::Duplicate {
                    path: join(&path, "id"),
                    value: id,
                });
            }
            let rank = PRIORITIES
                .iter()
                .position(|p| Some(*p) == q["priority"].as_str())
                .unwrap_or(1);
            if rank < last_rank {
                return Err(SchemaViolation::Invariant {
                    path: join(&path, "priority"),
                    reason: "additionalQuestions must be ordered high, medium, low".into(),
                });
            }
            last_rank = rank;
            ids.push(id);
            questions.push(q);
        }

        for (i, q) in questions.iter().enumerate() {
            for dep in q["dependsOn"].as_array().into_iter().flatten() {
                let dep = dep.as_str().unwrap_or_default();
                if !ids.iter().any(|id| id == dep) {
                    return Err(SchemaViolation::Invariant {
                        path: format!("additionalQuestions[{}].dependsOn", i),
                        reason: format!("unknown question id '{}'", dep),
                    });
                }
            }
        }

        for (i, name) in missing_fields.iter().enumerate() {
            let covered = deferred.contains(name)
                || questions.iter().any(|q| {
                    let path = q["path"].as_str().unwrap_or_default();
                    q["targetField"].as_str() == Some(name.as_str())
                        || path == name
                        || path.rsplit('.').next() == Some(name.as_str())
                });
            if !covered {
                return Err(SchemaViolation::Invariant {
                    path: format!("missingFields[{}]", i),
                    reason: format!("'{}' has no follow-up question and is not deferred", name),
                });
            }
        }

        let mut mapping = BTreeMap::new();
        match present(root, "fieldMapping") {
            Some(value) => {
                for (key, id) in require_object(value, "fieldMapping")? {
                    let path = join("fieldMapping", key);
                    key.parse::<FieldPath>().map_err(|_| SchemaViolation::InvalidFormat {
                        path: path.clone(),
                        format: "required.<key> or optional.<key>".into(),
                    })?;
                    let id = id.as_str().ok_or_else(|| invalid_type(&path, "string", id))?;
                    if !ids.iter().any(|known| known == id) {
                        return Err(SchemaViolation::Invariant {
                            path,
                            reason: format!("unknown question id '{}'", id),
                        });
                    }
                    mapping.insert(key.clone(), Value::String(id.to_string()));
                }
            }
            None => {
                for q in &questions {
                    let key = q["path"].as_str().unwrap_or_default().to_string();
                    mapping.entry(key).or_insert_with(|| q["id"].clone());
                }
            }
        }

        let next_action = match present(root, "nextAction") {
            Some(_) => enum_value(root, "nextAction", "", &NEXT_ACTIONS, None)?,
            None if questions.is_empty() => "proceed".to_string(),
            None => "confirm".to_string(),
        };

        out.insert("missingFields".into(), json!(missing_fields));
        out.insert("additionalQuestions".into(), Value::Array(questions));
        out.insert("fieldMapping".into(), Value::Object(mapping.into_iter().collect()));
        out.insert("deferredFields".into(), json!(deferred));
        out.insert("nextAction".into(), next_action.into());
        if let Some(text) = optional_string(root, "displayText", "")? {
            out.insert("displayText".into(), text.into());
        }
        Ok(Value::Object(out))
    }
}

impl DocumentValidator for JsonDocumentValidator {
    fn validate(&self, shape: DocumentShape, document: &Value) -> Result<Value, SchemaViolation> {
        match shape {
            DocumentShape::Requirements => self.validate_requirements(document),
            DocumentShape::QuestionSet => self.validate_question_set(document),
            DocumentShape::FollowUp => self.validate_follow_up(document),
        }
    }
}

// ─────────────────────────────── Sub-shapes ─────────────────────────────────

fn normalize_meta(meta: Option<&Value>) -> Result<Value, SchemaViolation> {
    let empty = Object::new();
    let obj = match meta {
        None | Some(Value::Null) => &empty,
        Some(v) => require_object(v, "meta")?,
    };
    let version = optional_string(obj, "version", "meta")?.unwrap_or_else(|| DEFAULT_VERSION.into());
    let locale = optional_string(obj, "locale", "meta")?.unwrap_or_else(|| DEFAULT_LOCALE.into());
    let generated_at = match optional_string(obj, "generatedAt", "meta")? {
        Some(s) => Timestamp::parse_rfc3339(&s).ok_or_else(|| SchemaViolation::InvalidFormat {
            path: "meta.generatedAt".into(),
            format: "RFC 3339 timestamp".into(),
        })?,
        None => Timestamp::now(),
    };

    let mut out = json!({
        "version": version,
        "locale": locale,
        "generatedAt": generated_at,
    });
    if let Some(chain) = present(obj, "promptChain") {
        let chain = require_object(chain, "meta.promptChain")?;
        out["promptChain"] = json!({
            "previous": required_string(chain, "previous", "meta.promptChain")?,
            "schemaVersion": required_string(chain, "schemaVersion", "meta.promptChain")?,
        });
    }
    Ok(out)
}

fn normalize_field_value(value: &Value, path: &str) -> Result<Value, SchemaViolation> {
    let obj = require_object(value, path)?;

    let content = match obj.get("value") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(FieldContent::Text(s.clone())),
        Some(Value::Array(items)) => {
            let mut list = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let item_path = format!("{}.value[{}]", path, i);
                let s = item.as_str().ok_or_else(|| invalid_type(&item_path, "string", item))?;
                list.push(s.to_string());
            }
            Some(FieldContent::List(list))
        }
        Some(other) => {
            return Err(invalid_type(&join(path, "value"), "string | string[] | null", other))
        }
    };

    let source = match enum_value(obj, "source", path, &SOURCES, Some("empty"))?.as_str() {
        "user" => FieldSource::User,
        "inferred" => FieldSource::Inferred,
        _ => FieldSource::Empty,
    };

    let confidence = match obj.get("confidence") {
        None | Some(Value::Null) => 0.0,
        Some(v) => {
            let c = v
                .as_f64()
                .ok_or_else(|| invalid_type(&join(path, "confidence"), "number", v))?;
            if !(0.0..=1.0).contains(&c) {
                return Err(SchemaViolation::OutOfRange {
                    path: join(path, "confidence"),
                    value: c.to_string(),
                    min: "0".into(),
                    max: "1".into(),
                });
            }
            c
        }
    };

    let field = FieldValue {
        value: content,
        source,
        confidence,
    };
    if let Some(reason) = field.consistency_error() {
        return Err(SchemaViolation::InconsistentField {
            path: path.to_string(),
            reason: reason.to_string(),
        });
    }
    serde_json::to_value(field).map_err(|e| SchemaViolation::Invariant {
        path: path.to_string(),
        reason: e.to_string(),
    })
}

fn normalize_question(value: &Value, path: &str) -> Result<Value, SchemaViolation> {
    let obj = require_object(value, path)?;
    let formats: Vec<&str> = QuestionFormat::ALL.iter().map(|f| f.as_str()).collect();
    let format_name = enum_value(obj, "format", path, &formats, None)?;
    let format = QuestionFormat::ALL
        .into_iter()
        .find(|f| f.as_str() == format_name)
        .unwrap_or(QuestionFormat::FreeText);
    let default_internal = serde_json::to_value(format.internal_type())
        .ok()
        .and_then(|v| v.as_str().map(str::to_string));
    let internal = enum_value(
        obj,
        "internalType",
        path,
        &InternalType::CODES,
        default_internal.as_deref(),
    )?;

    let mut choices = Vec::new();
    let mut codes = HashSet::new();
    for (i, item) in array_items(obj, "choices", path)?.iter().enumerate() {
        let choice_path = format!("{}.choices[{}]", path, i);
        let choice = require_object(item, &choice_path)?;
        let code = non_empty_string(choice, "code", &choice_path)?;
        let label = required_string(choice, "label", &choice_path)?;
        if !codes.insert(code.clone()) {
            return Err(SchemaViolation::Duplicate {
                path: join(&choice_path, "code"),
                value: code,
            });
        }
        choices.push(json!({"code": code, "label": label}));
    }

    let mut out = json!({
        "id": non_empty_string(obj, "id", path)?,
        "text": non_empty_string(obj, "text", path)?,
        "format": format_name,
        "internalType": internal,
        "choices": choices,
    });

    if let Some(scale) = present(obj, "scale") {
        let scale_path = join(path, "scale");
        let s = require_object(scale, &scale_path)?;
        let min = required_int(s, "min", &scale_path)?;
        let max = required_int(s, "max", &scale_path)?;
        if min >= max {
            return Err(SchemaViolation::Invariant {
                path: scale_path,
                reason: format!("min ({}) must be less than max ({})", min, max),
            });
        }
        let labels = string_list(s, "labels", &scale_path)?;
        if labels.len() < 2 {
            return Err(SchemaViolation::OutOfRange {
                path: join(&scale_path, "labels"),
                value: labels.len().to_string(),
                min: "2".into(),
                max: "unbounded".into(),
            });
        }
        out["scale"] = json!({"min": min, "max": max, "labels": labels});
    }
    if let Some(purpose) = optional_string(obj, "analysisPurpose", path)? {
        out["analysisPurpose"] = purpose.into();
    }
    Ok(out)
}

fn normalize_branch_rule(value: &Value, path: &str) -> Result<Value, SchemaViolation> {
    let obj = require_object(value, path)?;
    let mut out = Object::new();
    out.insert("from".into(), non_empty_string(obj, "from", path)?.into());

    if let Some(when) = present(obj, "when") {
        let when_path = join(path, "when");
        let w = require_object(when, &when_path)?;
        let mut when_out = Object::new();
        for key in ["equals", "code", "regex"] {
            if let Some(s) = optional_string(w, key, &when_path)? {
                if key == "regex" && Regex::new(&s).is_err() {
                    return Err(SchemaViolation::InvalidFormat {
                        path: join(&when_path, "regex"),
                        format: "regular expression".into(),
                    });
                }
                when_out.insert(key.into(), s.into());
            }
        }
        out.insert("when".into(), Value::Object(when_out));
    }

    let go_to = optional_string(obj, "goTo", path)?;
    let otherwise = optional_string(obj, "else", path)?;
    if go_to.is_none() && otherwise.is_none() {
        return Err(SchemaViolation::Invariant {
            path: path.to_string(),
            reason: "branch rule needs goTo or else".into(),
        });
    }
    if let Some(target) = go_to {
        out.insert("goTo".into(), target.into());
    }
    if let Some(target) = otherwise {
        out.insert("else".into(), target.into());
    }
    Ok(Value::Object(out))
}

fn check_constraints(set: &QuestionSet) -> Result<(), SchemaViolation> {
    let Some(limits) = &set.constraints else {
        return Ok(());
    };
    let checks = [
        ("constraints.maxScreening", limits.max_screening, set.screening_questions.len()),
        ("constraints.maxMain", limits.max_main, set.main_questions.len()),
    ];
    for (path, limit, actual) in checks {
        if let Some(limit) = limit {
            if actual > limit as usize {
                return Err(SchemaViolation::Invariant {
                    path: path.to_string(),
                    reason: format!("{} questions exceed the limit of {}", actual, limit),
                });
            }
        }
    }
    Ok(())
}

fn normalize_follow_up_question(value: &Value, path: &str) -> Result<Value, SchemaViolation> {
    let obj = require_object(value, path)?;
    let id = non_empty_string(obj, "id", path)?;
    let target = optional_string(obj, "targetField", path)?;

    let field_path = match optional_string(obj, "path", path)? {
        Some(p) => p.parse::<FieldPath>().map_err(|_| SchemaViolation::InvalidFormat {
            path: join(path, "path"),
            format: "required.<key> or optional.<key>".into(),
        })?,
        None => target
            .as_deref()
            .and_then(FieldPath::for_field_name)
            .ok_or_else(|| missing(path, "path"))?,
    };
    let target = target.unwrap_or_else(|| field_path.key().to_string());

    let mut out = json!({
        "id": id,
        "targetField": target,
        "path": field_path.to_string(),
        "questionText": non_empty_string(obj, "questionText", path)?,
        "expectedFormat": enum_value(obj, "expectedFormat", path, &EXPECTED_FORMATS, Some("text"))?,
        "options": string_list(obj, "options", path)?,
        "exampleAnswers": string_list(obj, "exampleAnswers", path)?,
        "priority": enum_value(obj, "priority", path, &PRIORITIES, Some("medium"))?,
        "dependsOn": string_list(obj, "dependsOn", path)?,
    });

    if let Some(validation) = present(obj, "validation") {
        let v_path = join(path, "validation");
        let v = require_object(validation, &v_path)?;
        let mut v_out = v.clone();
        let required = match v.get("required") {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(other) => return Err(invalid_type(&join(&v_path, "required"), "boolean", other)),
        };
        v_out.insert("required".into(), required.into());
        for key in ["min", "max"] {
            match optional_uint(v, key, &v_path)? {
                Some(n) => {
                    v_out.insert(key.into(), n.into());
                }
                None => {
                    v_out.remove(key);
                }
            }
        }
        out["validation"] = Value::Object(v_out);
    }
    Ok(out)
}

// ──────────────────────────────── Helpers ───────────────────────────────────

fn join(parent: &str, key: &str) -> String {
    if parent.is_empty() || parent == "$" {
        key.to_string()
    } else {
        format!("{}.{}", parent, key)
    }
}

fn type_name(value: &Value) -> String {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
    .to_string()
}

fn missing(parent: &str, key: &str) -> SchemaViolation {
    SchemaViolation::MissingRequired {
        path: join(parent, key),
    }
}

fn invalid_type(path: &str, expected: &str, actual: &Value) -> SchemaViolation {
    SchemaViolation::InvalidType {
        path: path.to_string(),
        expected: expected.to_string(),
        actual: type_name(actual),
    }
}

/// The field's value unless it is absent or null.
fn present<'a>(obj: &'a Object, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

fn require_object<'a>(value: &'a Value, path: &str) -> Result<&'a Object, SchemaViolation> {
    value.as_object().ok_or_else(|| invalid_type(path, "object", value))
}

fn required_string(obj: &Object, key: &str, parent: &str) -> Result<String, SchemaViolation> {
    let value = present(obj, key).ok_or_else(|| missing(parent, key))?;
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid_type(&join(parent, key), "string", value))
}

fn non_empty_string(obj: &Object, key: &str, parent: &str) -> Result<String, SchemaViolation> {
    let s = required_string(obj, key, parent)?;
    if s.trim().is_empty() {
        return Err(SchemaViolation::InvalidFormat {
            path: join(parent, key),
            format: "non-empty string".into(),
        });
    }
    Ok(s)
}

fn optional_string(obj: &Object, key: &str, parent: &str) -> Result<Option<String>, SchemaViolation> {
    match present(obj, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(invalid_type(&join(parent, key), "string", other)),
    }
}

fn required_int(obj: &Object, key: &str, parent: &str) -> Result<i64, SchemaViolation> {
    let value = present(obj, key).ok_or_else(|| missing(parent, key))?;
    value
        .as_i64()
        .ok_or_else(|| invalid_type(&join(parent, key), "integer", value))
}

fn optional_uint(obj: &Object, key: &str, parent: &str) -> Result<Option<u64>, SchemaViolation> {
    match present(obj, key) {
        None => Ok(None),
        Some(v) => v
            .as_u64()
            .map(Some)
            .ok_or_else(|| invalid_type(&join(parent, key), "non-negative integer", v)),
    }
}

fn array_items<'a>(obj: &'a Object, key: &str, parent: &str) -> Result<&'a [Value], SchemaViolation> {
    match present(obj, key) {
        None => Ok(&[]),
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(other) => Err(invalid_type(&join(parent, key), "array", other)),
    }
}

fn string_list(obj: &Object, key: &str, parent: &str) -> Result<Vec<String>, SchemaViolation> {
    let path = join(parent, key);
    array_items(obj, key, parent)?
        .iter()
        .enumerate()
        .map(|(i, item)| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| invalid_type(&format!("{}[{}]", path, i), "string", item))
        })
        .collect()
}

fn enum_value(
    obj: &Object,
    key: &str,
    parent: &str,
    allowed: &[&str],
    default: Option<&str>,
) -> Result<String, SchemaViolation> {
    let path = join(parent, key);
    let value = match (present(obj, key), default) {
        (None, Some(d)) => return Ok(d.to_string()),
        (None, None) => return Err(SchemaViolation::MissingRequired { path }),
        (Some(v), _) => v,
    };
    match value.as_str() {
        Some(s) if allowed.contains(&s) => Ok(s.to_string()),
        _ => Err(SchemaViolation::InvalidEnum {
            path,
            expected: allowed.join(", "),
            actual: value.to_string(),
        }),
    }
}
