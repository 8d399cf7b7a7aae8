//! Projection of the recovered cache into `{name, value}` pairs.
//!
//! A video descriptor looks like `{"name": "...", "id": {"value": "..."}}`.
//! Descriptors missing either field are common in partial records and are
//! dropped rather than treated as errors.

use serde_json::Value;

use crate::domain::errors::json_kind;
use crate::domain::video::{NAME_FIELD, VALUE_FIELD};
use crate::domain::{FormatError, MissingField, ProjectedVideo, Projection};

/// Read a non-empty text field. Numbers are accepted and rendered as text.
fn text_field(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };

    (!text.is_empty()).then_some(text)
}

/// Check a descriptor, naming the first missing field
pub fn check_video(descriptor: &Value) -> Result<ProjectedVideo, MissingField> {
    let missing = |field| MissingField {
        field,
        descriptor: descriptor.to_string(),
    };

    let name = text_field(descriptor.get("name")).ok_or_else(|| missing(NAME_FIELD))?;
    let value = text_field(descriptor.get("id").and_then(|id| id.get("value")))
        .ok_or_else(|| missing(VALUE_FIELD))?;

    Ok(ProjectedVideo { name, value })
}

/// Project one descriptor, or `None` if it lacks a name or identifier
pub fn project_video(descriptor: &Value) -> Option<ProjectedVideo> {
    check_video(descriptor).ok()
}

/// Project every usable descriptor under `videos`, preserving order
pub fn project_videos(entry: &Value) -> Result<Projection, FormatError> {
    let object = entry.as_object().ok_or(FormatError::NotAnObject {
        found: json_kind(entry),
    })?;

    let descriptors = match object.get("videos") {
        Some(Value::Array(items)) => items.as_slice(),
        _ => &[][..],
    };

    let mut projection = Projection::default();
    for descriptor in descriptors {
        match check_video(descriptor) {
            Ok(video) => projection.videos.push(video),
            Err(missing) => {
                tracing::warn!("{}", missing);
                projection.dropped += 1;
            }
        }
    }

    Ok(projection)
}
