use rmcp::ErrorData;
use rmcp::model::{
    AnnotateAble, CallToolResult, Content, RawResource, ReadResourceResult, Resource,
    ResourceContents,
};

const JSON_MIME: &str = "application/json";

/// Wraps a tool outcome as one text block, flagging failures with `isError`.
pub fn tool_text(outcome: Result<String, String>) -> CallToolResult {
    match outcome {
        Ok(text) => CallToolResult::success(vec![Content::text(text)]),
        Err(text) => CallToolResult::error(vec![Content::text(text)]),
    }
}

pub fn json_resource(uri: &str, name: &str, description: &str) -> Resource {
    RawResource {
        uri: uri.to_string(),
        name: name.to_string(),
        title: Some(name.to_string()),
        description: Some(description.to_string()),
        mime_type: Some(JSON_MIME.to_string()),
        size: None,
        icons: None,
        meta: None,
    }
    .no_annotation()
}

pub fn resource_text(uri: &str, text: String) -> ReadResourceResult {
    ReadResourceResult {
        contents: vec![ResourceContents::TextResourceContents {
            uri: uri.to_string(),
            mime_type: Some(JSON_MIME.to_string()),
            text,
            meta: None,
        }],
    }
}

pub fn unknown_resource(uri: &str) -> ErrorData {
    ErrorData::resource_not_found(
        format!("unknown resource: {uri}"),
        Some(serde_json::json!({ "uri": uri })),
    )
}

/// Text of the first content block, or `""` when there is none.
pub fn response_text(result: &CallToolResult) -> &str {
    result
        .content
        .first()
        .and_then(|content| content.as_text())
        .map_or("", |text| text.text.as_str())
}

#[cfg(test)]
pub fn resource_body(result: &ReadResourceResult) -> &str {
    match result.contents.first() {
        Some(ResourceContents::TextResourceContents { text, .. }) => text,
        _ => "",
    }
}
